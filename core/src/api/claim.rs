//! Claims, their links to policies/policyholders, and evidence attachments.

use serde_json::Value;

use crate::attachment::{encode_attachment, AttachmentInput};
use crate::client::RootClient;
use crate::error::RootError;
use crate::fields::Fields;
use crate::http::{segment, HttpMethod, HttpRequest};
use crate::transport::Transport;

/// Filters for listing claims. Each becomes its own query key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListClaims {
    /// Sent as `claim_status`.
    pub status: Option<String>,
    /// Sent as `approval_status`.
    pub approval: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpenClaim {
    pub policy_id: Option<String>,
    pub policyholder_id: Option<String>,
    pub incident_type: Option<String>,
    pub incident_cause: Option<String>,
    /// ISO 8601 timestamp.
    pub incident_date: Option<String>,
    pub app_data: Option<Value>,
    pub claimant: Option<Value>,
    /// In cents.
    pub requested_amount: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateClaim {
    pub incident_type: Option<String>,
    pub incident_cause: Option<String>,
    pub incident_date: Option<String>,
    pub app_data: Option<Value>,
    pub requested_amount: Option<u64>,
}

impl<T> RootClient<T> {
    pub fn build_list_claims(&self, params: &ListClaims) -> HttpRequest {
        let query = Fields::new()
            .optional("claim_status", params.status.clone())
            .optional("approval_status", params.approval.clone());
        self.get_request("claims", query)
    }

    pub fn build_get_claim(&self, id: &str) -> HttpRequest {
        self.get_request(format!("claims/{}", segment(id)), Fields::new())
    }

    pub fn build_open_claim(&self, params: &OpenClaim) -> Result<HttpRequest, RootError> {
        let body = Fields::new()
            .optional("policy_id", params.policy_id.clone())
            .optional("policyholder_id", params.policyholder_id.clone())
            .optional("incident_type", params.incident_type.clone())
            .optional("incident_cause", params.incident_cause.clone())
            .optional("incident_date", params.incident_date.clone())
            .optional("app_data", params.app_data.clone())
            .optional("claimant", params.claimant.clone())
            .optional("requested_amount", params.requested_amount);
        self.write_request(HttpMethod::Post, "claims", body)
    }

    pub fn build_update_claim(
        &self,
        claim_id: &str,
        params: &UpdateClaim,
    ) -> Result<HttpRequest, RootError> {
        let body = Fields::new()
            .optional("incident_type", params.incident_type.clone())
            .optional("incident_cause", params.incident_cause.clone())
            .optional("incident_date", params.incident_date.clone())
            .optional("app_data", params.app_data.clone())
            .optional("requested_amount", params.requested_amount);
        self.write_request(HttpMethod::Patch, format!("claims/{}", segment(claim_id)), body)
    }

    pub fn build_link_policy_to_claim(
        &self,
        claim_id: &str,
        policy_id: &str,
    ) -> Result<HttpRequest, RootError> {
        let body = Fields::new().field("policy_id", policy_id);
        self.write_request(HttpMethod::Post, format!("claims/{}/policy", segment(claim_id)), body)
    }

    pub fn build_link_policyholder_to_claim(
        &self,
        claim_id: &str,
        policyholder_id: &str,
    ) -> Result<HttpRequest, RootError> {
        let body = Fields::new().field("policyholder_id", policyholder_id);
        self.write_request(HttpMethod::Post, format!("claims/{}/policyholder", segment(claim_id)), body)
    }

    pub fn build_list_claim_events(&self, claim_id: &str) -> HttpRequest {
        self.get_request(format!("claims/{}/events", segment(claim_id)), Fields::new())
    }

    /// Reads and encodes the attachment source, so this can fail on I/O.
    pub fn build_create_claim_attachment(
        &self,
        claim_id: &str,
        input: AttachmentInput,
        description: &str,
    ) -> Result<HttpRequest, RootError> {
        let descriptor = encode_attachment(input, description, self.sniffer())?;
        self.write_request(
            HttpMethod::Post,
            format!("claims/{}/attachments", segment(claim_id)),
            descriptor.into_fields(),
        )
    }
}

impl<T: Transport> RootClient<T> {
    pub fn list_claims(&self, params: &ListClaims) -> Result<Value, RootError> {
        self.execute(self.build_list_claims(params))
    }

    pub fn get_claim(&self, id: &str) -> Result<Value, RootError> {
        self.execute(self.build_get_claim(id))
    }

    pub fn open_claim(&self, params: &OpenClaim) -> Result<Value, RootError> {
        self.execute(self.build_open_claim(params)?)
    }

    pub fn update_claim(&self, claim_id: &str, params: &UpdateClaim) -> Result<Value, RootError> {
        self.execute(self.build_update_claim(claim_id, params)?)
    }

    pub fn link_policy_to_claim(&self, claim_id: &str, policy_id: &str) -> Result<Value, RootError> {
        self.execute(self.build_link_policy_to_claim(claim_id, policy_id)?)
    }

    pub fn link_policyholder_to_claim(
        &self,
        claim_id: &str,
        policyholder_id: &str,
    ) -> Result<Value, RootError> {
        self.execute(self.build_link_policyholder_to_claim(claim_id, policyholder_id)?)
    }

    pub fn list_claim_events(&self, claim_id: &str) -> Result<Value, RootError> {
        self.execute(self.build_list_claim_events(claim_id))
    }

    pub fn create_claim_attachment(
        &self,
        claim_id: &str,
        input: AttachmentInput,
        description: &str,
    ) -> Result<Value, RootError> {
        self.execute(self.build_create_claim_attachment(claim_id, input, description)?)
    }
}
