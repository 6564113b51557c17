//! Applications turn an accepted quote package into a pending policy.

use serde_json::Value;

use crate::client::RootClient;
use crate::error::RootError;
use crate::fields::Fields;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateApplication {
    pub policyholder_id: String,
    pub quote_package_id: String,
    /// In cents.
    pub monthly_premium: u64,
    /// Gadget cover.
    pub serial_number: Option<String>,
    /// Funeral cover.
    pub spouse_id: Option<String>,
    pub children_ids: Option<Vec<String>>,
    pub extended_family_ids: Option<Vec<String>>,
}

impl CreateApplication {
    /// Product-specific fields. A serial number means gadget cover and
    /// suppresses the funeral family fields entirely.
    fn module_fields(&self) -> Fields {
        if let Some(serial_number) = &self.serial_number {
            return Fields::new().field("serial_number", serial_number.clone());
        }
        Fields::new()
            .optional("spouse_id", self.spouse_id.clone())
            .optional("children_ids", self.children_ids.clone())
            .optional("extended_family_ids", self.extended_family_ids.clone())
    }
}

impl<T> RootClient<T> {
    pub fn build_create_application(
        &self,
        params: &CreateApplication,
    ) -> Result<HttpRequest, RootError> {
        let body = Fields::new()
            .field("policyholder_id", params.policyholder_id.clone())
            .field("quote_package_id", params.quote_package_id.clone())
            .field("monthly_premium", params.monthly_premium)
            .merge(params.module_fields());
        self.write_request(HttpMethod::Post, "applications", body)
    }
}

impl<T: Transport> RootClient<T> {
    pub fn create_application(&self, params: &CreateApplication) -> Result<Value, RootError> {
        self.execute(self.build_create_application(params)?)
    }
}
