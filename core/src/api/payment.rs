//! Payment methods for policyholders and their link to policies.

use serde_json::Value;

use crate::client::RootClient;
use crate::error::RootError;
use crate::fields::{normalize_policy_ids, Fields, PolicyIds};
use crate::http::{segment, HttpMethod, HttpRequest};
use crate::transport::Transport;

/// Checked in this order; the first missing key is reported.
pub const BANK_DETAIL_KEYS: [&str; 5] =
    ["first_name", "last_name", "bank", "branch_code", "account_number"];

pub const DEFAULT_PAYMENT_METHOD_TYPE: &str = "debit_order";

/// Typed convenience for the `bank_details` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankDetails {
    pub first_name: String,
    pub last_name: String,
    pub bank: String,
    pub branch_code: String,
    pub account_number: String,
}

impl From<BankDetails> for Value {
    fn from(details: BankDetails) -> Self {
        serde_json::json!({
            "first_name": details.first_name,
            "last_name": details.last_name,
            "bank": details.bank,
            "branch_code": details.branch_code,
            "account_number": details.account_number,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatePaymentMethod {
    /// Sent as `type`.
    pub method_type: String,
    pub bank_details: Value,
    pub policy_ids: Option<PolicyIds>,
}

impl CreatePaymentMethod {
    pub fn debit_order(bank_details: impl Into<Value>) -> Self {
        Self {
            method_type: DEFAULT_PAYMENT_METHOD_TYPE.to_string(),
            bank_details: bank_details.into(),
            policy_ids: None,
        }
    }

    pub fn with_policy_ids(mut self, policy_ids: impl Into<PolicyIds>) -> Self {
        self.policy_ids = Some(policy_ids.into());
        self
    }
}

/// A key counts as missing when absent, `null` or `false`.
pub fn validate_bank_details(bank_details: &Value) -> Result<(), RootError> {
    for key in BANK_DETAIL_KEYS {
        match bank_details.get(key) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => {
                return Err(RootError::invalid(format!("Bank details need to include {key}")));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

impl<T> RootClient<T> {
    pub fn build_create_payment_method(
        &self,
        policyholder_id: &str,
        params: &CreatePaymentMethod,
    ) -> Result<HttpRequest, RootError> {
        validate_bank_details(&params.bank_details)?;
        let body = Fields::new()
            .field("type", params.method_type.clone())
            .field("bank_details", params.bank_details.clone())
            .optional("policy_ids", normalize_policy_ids(params.policy_ids.clone()));
        self.write_request(
            HttpMethod::Post,
            format!("policyholders/{}/payment-methods", segment(policyholder_id)),
            body,
        )
    }

    pub fn build_link_payment_method(
        &self,
        policy_id: &str,
        payment_method_id: &str,
    ) -> Result<HttpRequest, RootError> {
        let body = Fields::new().field("payment_method_id", payment_method_id);
        self.write_request(HttpMethod::Put, format!("policies/{}/payment-method", segment(policy_id)), body)
    }
}

impl<T: Transport> RootClient<T> {
    pub fn create_payment_method(
        &self,
        policyholder_id: &str,
        params: &CreatePaymentMethod,
    ) -> Result<Value, RootError> {
        self.execute(self.build_create_payment_method(policyholder_id, params)?)
    }

    pub fn link_payment_method(
        &self,
        policy_id: &str,
        payment_method_id: &str,
    ) -> Result<Value, RootError> {
        self.execute(self.build_link_payment_method(policy_id, payment_method_id)?)
    }
}
