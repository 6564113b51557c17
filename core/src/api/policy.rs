//! Issued policies and their beneficiaries.

use serde_json::Value;

use crate::api::require_id_object;
use crate::client::RootClient;
use crate::error::RootError;
use crate::fields::Fields;
use crate::http::{segment, HttpMethod, HttpRequest};
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddBeneficiary {
    /// Must be an identification object, see `Identification`.
    pub id: Value,
    pub first_name: String,
    pub last_name: String,
    pub percentage: u32,
    /// An object such as `{"number": ..., "country": ...}`, see `Cellphone`.
    pub cellphone: Option<Value>,
}

impl<T> RootClient<T> {
    pub fn build_issue_policy(
        &self,
        application_id: &str,
        app_data: Option<&Value>,
    ) -> Result<HttpRequest, RootError> {
        let body = Fields::new()
            .field("application_id", application_id)
            .optional("app_data", app_data.cloned());
        self.write_request(HttpMethod::Post, "policies", body)
    }

    pub fn build_add_policy_beneficiary(
        &self,
        policy_id: &str,
        params: &AddBeneficiary,
    ) -> Result<HttpRequest, RootError> {
        require_id_object(&params.id)?;
        let body = Fields::new()
            .field("id", params.id.clone())
            .field("first_name", params.first_name.clone())
            .field("last_name", params.last_name.clone())
            .field("percentage", params.percentage)
            .optional("cellphone", params.cellphone.clone());
        self.write_request(
            HttpMethod::Put,
            format!("policies/{}/beneficiaries", segment(policy_id)),
            body,
        )
    }

    pub fn build_list_policies(&self, id_number: Option<&str>) -> HttpRequest {
        self.get_request("policies", Fields::new().optional("id_number", id_number))
    }

    pub fn build_get_policy(&self, id: &str) -> HttpRequest {
        self.get_request(format!("policies/{}", segment(id)), Fields::new())
    }

    pub fn build_cancel_policy(&self, id: &str, reason: &str) -> Result<HttpRequest, RootError> {
        let body = Fields::new().field("reason", reason);
        self.write_request(HttpMethod::Post, format!("policies/{}/cancel", segment(id)), body)
    }

    pub fn build_update_policy(&self, id: &str, app_data: &Value) -> Result<HttpRequest, RootError> {
        let body = Fields::new().field("app_data", app_data.clone());
        self.write_request(HttpMethod::Patch, format!("policies/{}", segment(id)), body)
    }

    /// `billing_amount` is in cents.
    pub fn build_update_policy_billing_amount(
        &self,
        id: &str,
        billing_amount: u64,
    ) -> Result<HttpRequest, RootError> {
        let body = Fields::new().field("billing_amount", billing_amount);
        self.write_request(HttpMethod::Post, format!("policies/{}/billing_amount", segment(id)), body)
    }

    pub fn build_list_policy_beneficiaries(&self, id: &str) -> HttpRequest {
        self.get_request(format!("policies/{}/beneficiaries", segment(id)), Fields::new())
    }

    pub fn build_list_policy_events(&self, id: &str) -> HttpRequest {
        self.get_request(format!("policies/{}/events", segment(id)), Fields::new())
    }
}

impl<T: Transport> RootClient<T> {
    pub fn issue_policy(
        &self,
        application_id: &str,
        app_data: Option<&Value>,
    ) -> Result<Value, RootError> {
        self.execute(self.build_issue_policy(application_id, app_data)?)
    }

    pub fn add_policy_beneficiary(
        &self,
        policy_id: &str,
        params: &AddBeneficiary,
    ) -> Result<Value, RootError> {
        self.execute(self.build_add_policy_beneficiary(policy_id, params)?)
    }

    pub fn list_policies(&self, id_number: Option<&str>) -> Result<Value, RootError> {
        self.execute(self.build_list_policies(id_number))
    }

    pub fn get_policy(&self, id: &str) -> Result<Value, RootError> {
        self.execute(self.build_get_policy(id))
    }

    pub fn cancel_policy(&self, id: &str, reason: &str) -> Result<Value, RootError> {
        self.execute(self.build_cancel_policy(id, reason)?)
    }

    pub fn update_policy(&self, id: &str, app_data: &Value) -> Result<Value, RootError> {
        self.execute(self.build_update_policy(id, app_data)?)
    }

    pub fn update_policy_billing_amount(
        &self,
        id: &str,
        billing_amount: u64,
    ) -> Result<Value, RootError> {
        self.execute(self.build_update_policy_billing_amount(id, billing_amount)?)
    }

    pub fn list_policy_beneficiaries(&self, id: &str) -> Result<Value, RootError> {
        self.execute(self.build_list_policy_beneficiaries(id))
    }

    pub fn list_policy_events(&self, id: &str) -> Result<Value, RootError> {
        self.execute(self.build_list_policy_events(id))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::{Cellphone, Identification};
    use crate::config::{Credentials, Environment};

    const POLICY: &str = "8349345c-a6c5-4bf9-8ebb-6bbfc1628715";

    fn client() -> RootClient {
        RootClient::new(Credentials::new("app_id", "", Environment::Sandbox))
    }

    fn body(req: &HttpRequest) -> Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn issue_without_app_data() {
        let req = client().build_issue_policy("app-1", None).unwrap();
        assert_eq!(req.path, "policies");
        assert_eq!(body(&req), json!({"application_id": "app-1"}));
    }

    #[test]
    fn issue_with_app_data() {
        let data = json!({"channel": "web"});
        let req = client().build_issue_policy("app-1", Some(&data)).unwrap();
        assert_eq!(body(&req), json!({"application_id": "app-1", "app_data": {"channel": "web"}}));
    }

    #[test]
    fn beneficiary_is_put() {
        let params = AddBeneficiary {
            id: Identification::id("6801015800084", "ZA").into(),
            first_name: "Jared".to_string(),
            last_name: "Dunn".to_string(),
            percentage: 100,
            cellphone: None,
        };
        let req = client().build_add_policy_beneficiary(POLICY, &params).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, format!("policies/{POLICY}/beneficiaries"));
        let b = body(&req);
        assert_eq!(b["percentage"], 100);
        assert!(b.get("cellphone").is_none());
    }

    #[test]
    fn beneficiary_cellphone_is_an_object() {
        let params = AddBeneficiary {
            id: Identification::id("6801015800084", "ZA").into(),
            first_name: "Jared".to_string(),
            last_name: "Dunn".to_string(),
            percentage: 100,
            cellphone: Some(Cellphone::new("07741011337", "ZA").into()),
        };
        let b = body(&client().build_add_policy_beneficiary(POLICY, &params).unwrap());
        assert_eq!(b["cellphone"], json!({"number": "07741011337", "country": "ZA"}));
    }

    #[test]
    fn beneficiary_requires_id_object() {
        let params = AddBeneficiary {
            id: json!(42),
            ..AddBeneficiary::default()
        };
        let err = client().build_add_policy_beneficiary(POLICY, &params).unwrap_err();
        assert_eq!(err.to_string(), "id needs to be a hash");
    }

    #[test]
    fn list_policies_query() {
        assert!(client().build_list_policies(None).query.is_empty());
        let req = client().build_list_policies(Some("6801015800084"));
        assert_eq!(req.query_value("id_number"), Some("6801015800084"));
    }

    #[test]
    fn actions_and_updates() {
        let c = client();

        let req = c.build_cancel_policy(POLICY, "no longer needed").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, format!("policies/{POLICY}/cancel"));
        assert_eq!(body(&req), json!({"reason": "no longer needed"}));

        let req = c.build_update_policy(POLICY, &json!({"k": 1})).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(body(&req), json!({"app_data": {"k": 1}}));

        let req = c.build_update_policy_billing_amount(POLICY, 0).unwrap();
        assert_eq!(req.path, format!("policies/{POLICY}/billing_amount"));
        assert_eq!(body(&req), json!({"billing_amount": 0}));
    }

    #[test]
    fn sub_resource_reads() {
        let c = client();
        assert_eq!(c.build_get_policy(POLICY).path, format!("policies/{POLICY}"));
        assert_eq!(
            c.build_list_policy_beneficiaries(POLICY).path,
            format!("policies/{POLICY}/beneficiaries")
        );
        assert_eq!(
            c.build_list_policy_events(POLICY).path,
            format!("policies/{POLICY}/events")
        );
    }
}
