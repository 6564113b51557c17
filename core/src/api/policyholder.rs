//! Policyholders.

use serde_json::Value;

use crate::api::require_id_object;
use crate::client::RootClient;
use crate::error::RootError;
use crate::fields::{format_included, Fields, IncludedObjects};
use crate::http::{segment, HttpMethod, HttpRequest};
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreatePolicyholder {
    /// Must be an object such as `{"type": "id", "number": ..., "country": ...}`.
    pub id: Value,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    /// An object such as `{"number": ..., "country": ...}`, see `Cellphone`.
    pub cellphone: Option<Value>,
    pub app_data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListPolicyholders {
    pub id_number: Option<String>,
    pub included_objects: Option<IncludedObjects>,
}

/// Only the mutable subset of policyholder fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdatePolicyholder {
    pub email: Option<String>,
    /// An object such as `{"number": ..., "country": ...}`, see `Cellphone`.
    pub cellphone: Option<Value>,
    pub app_data: Option<Value>,
}

impl<T> RootClient<T> {
    pub fn build_create_policyholder(
        &self,
        params: &CreatePolicyholder,
    ) -> Result<HttpRequest, RootError> {
        require_id_object(&params.id)?;
        let body = Fields::new()
            .field("id", params.id.clone())
            .field("first_name", params.first_name.clone())
            .field("last_name", params.last_name.clone())
            .optional("date_of_birth", params.date_of_birth.clone())
            .optional("email", params.email.clone())
            .optional("cellphone", params.cellphone.clone())
            .optional("app_data", params.app_data.clone());
        self.write_request(HttpMethod::Post, "policyholders", body)
    }

    pub fn build_list_policyholders(&self, params: &ListPolicyholders) -> HttpRequest {
        let query = Fields::new()
            .optional("include", format_included(params.included_objects.as_ref()))
            .optional("id_number", params.id_number.clone());
        self.get_request("policyholders", query)
    }

    pub fn build_get_policyholder(
        &self,
        id: &str,
        included_objects: Option<&IncludedObjects>,
    ) -> HttpRequest {
        let query = Fields::new().optional("include", format_included(included_objects));
        self.get_request(format!("policyholders/{}", segment(id)), query)
    }

    pub fn build_update_policyholder(
        &self,
        id: &str,
        params: &UpdatePolicyholder,
    ) -> Result<HttpRequest, RootError> {
        let body = Fields::new()
            .optional("email", params.email.clone())
            .optional("cellphone", params.cellphone.clone())
            .optional("app_data", params.app_data.clone());
        self.write_request(HttpMethod::Patch, format!("policyholders/{}", segment(id)), body)
    }

    pub fn build_list_policyholder_events(&self, id: &str) -> HttpRequest {
        self.get_request(format!("policyholders/{}/events", segment(id)), Fields::new())
    }
}

impl<T: Transport> RootClient<T> {
    pub fn create_policyholder(&self, params: &CreatePolicyholder) -> Result<Value, RootError> {
        self.execute(self.build_create_policyholder(params)?)
    }

    pub fn list_policyholders(&self, params: &ListPolicyholders) -> Result<Value, RootError> {
        self.execute(self.build_list_policyholders(params))
    }

    pub fn get_policyholder(
        &self,
        id: &str,
        included_objects: Option<&IncludedObjects>,
    ) -> Result<Value, RootError> {
        self.execute(self.build_get_policyholder(id, included_objects))
    }

    pub fn update_policyholder(
        &self,
        id: &str,
        params: &UpdatePolicyholder,
    ) -> Result<Value, RootError> {
        self.execute(self.build_update_policyholder(id, params)?)
    }

    pub fn list_policyholder_events(&self, id: &str) -> Result<Value, RootError> {
        self.execute(self.build_list_policyholder_events(id))
    }
}
