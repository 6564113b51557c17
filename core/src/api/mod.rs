//! Per-resource operations on `RootClient`.
//!
//! Each submodule adds `build_*` methods (pure, produce an `HttpRequest`) and
//! executing methods of the same name without the prefix.

pub mod application;
pub mod call;
pub mod claim;
pub mod payment;
pub mod policy;
pub mod policyholder;
pub mod quote;

use serde_json::Value;

use crate::error::RootError;

/// A South African ID or passport, as the API expects under `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    /// Sent as `type`.
    pub kind: String,
    pub number: String,
    pub country: String,
}

impl Identification {
    pub fn id(number: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            kind: "id".to_string(),
            number: number.into(),
            country: country.into(),
        }
    }

    pub fn passport(number: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            kind: "passport".to_string(),
            number: number.into(),
            country: country.into(),
        }
    }
}

impl From<Identification> for Value {
    fn from(identification: Identification) -> Self {
        serde_json::json!({
            "type": identification.kind,
            "number": identification.number,
            "country": identification.country,
        })
    }
}

/// A cellphone number with its country, as the API expects under `cellphone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cellphone {
    pub number: String,
    pub country: String,
}

impl Cellphone {
    pub fn new(number: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            country: country.into(),
        }
    }
}

impl From<Cellphone> for Value {
    fn from(cellphone: Cellphone) -> Self {
        serde_json::json!({
            "number": cellphone.number,
            "country": cellphone.country,
        })
    }
}

/// Identifier parameters must be a structured object, not a bare string.
pub(crate) fn require_id_object(id: &Value) -> Result<(), RootError> {
    if id.is_object() {
        Ok(())
    } else {
        Err(RootError::invalid("id needs to be a hash"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn identification_serializes_with_type_key() {
        let value = Value::from(Identification::id("6801015800084", "ZA"));
        assert_eq!(
            value,
            json!({"type": "id", "number": "6801015800084", "country": "ZA"})
        );
        assert_eq!(Value::from(Identification::passport("A1", "GB"))["type"], "passport");
    }

    #[test]
    fn cellphone_is_an_object() {
        let value = Value::from(Cellphone::new("07741011337", "ZA"));
        assert_eq!(value, json!({"number": "07741011337", "country": "ZA"}));
    }

    #[test]
    fn id_must_be_an_object() {
        assert!(require_id_object(&json!({"type": "id"})).is_ok());
        let err = require_id_object(&json!("6801015800084")).unwrap_err();
        assert_eq!(err.to_string(), "id needs to be a hash");
    }
}
