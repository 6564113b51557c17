//! Quotes: one POST endpoint whose body shape depends on the product type.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::client::RootClient;
use crate::error::RootError;
use crate::fields::Fields;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::Transport;

/// The `type` discriminant of a quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteType {
    Gadgets,
    Term,
    Funeral,
}

impl QuoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteType::Gadgets => "root_gadgets",
            QuoteType::Term => "root_term",
            QuoteType::Funeral => "root_funeral",
        }
    }
}

impl FromStr for QuoteType {
    type Err = RootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root_gadgets" => Ok(QuoteType::Gadgets),
            "root_term" => Ok(QuoteType::Term),
            "root_funeral" => Ok(QuoteType::Funeral),
            other => Err(RootError::invalid(format!("Unknown quote type: {other}"))),
        }
    }
}

impl fmt::Display for QuoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GadgetQuote {
    pub model_name: String,
}

/// Term life cover. Amounts are in cents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TermQuote {
    pub cover_amount: u64,
    pub cover_period: String,
    pub education_status: String,
    pub smoker: bool,
    pub gender: String,
    pub age: u32,
    pub basic_income_per_month: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FuneralQuote {
    pub cover_amount: u64,
    pub has_spouse: bool,
    pub number_of_children: u32,
    #[serde(default)]
    pub extended_family_ages: Option<Vec<u32>>,
}

/// A quote request; each variant carries only its own fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteRequest {
    Gadget(GadgetQuote),
    Term(TermQuote),
    Funeral(FuneralQuote),
}

impl QuoteRequest {
    pub fn quote_type(&self) -> QuoteType {
        match self {
            QuoteRequest::Gadget(_) => QuoteType::Gadgets,
            QuoteRequest::Term(_) => QuoteType::Term,
            QuoteRequest::Funeral(_) => QuoteType::Funeral,
        }
    }

    /// Build from a loose JSON object, dispatching on its `type` field.
    ///
    /// Fields that belong to another variant are ignored.
    pub fn from_json(value: Value) -> Result<Self, RootError> {
        let quote_type: QuoteType = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| RootError::invalid("quote type is required"))?
            .parse()?;

        Ok(match quote_type {
            QuoteType::Gadgets => QuoteRequest::Gadget(variant(value)?),
            QuoteType::Term => QuoteRequest::Term(variant(value)?),
            QuoteType::Funeral => QuoteRequest::Funeral(variant(value)?),
        })
    }

    fn into_fields(self) -> Fields {
        let fields = Fields::new().field("type", self.quote_type().as_str());
        match self {
            QuoteRequest::Gadget(q) => fields.field("model_name", q.model_name),
            QuoteRequest::Term(q) => fields
                .field("cover_amount", q.cover_amount)
                .field("cover_period", q.cover_period)
                .field("education_status", q.education_status)
                .field("smoker", q.smoker)
                .field("gender", q.gender)
                .field("age", q.age)
                .field("basic_income_per_month", q.basic_income_per_month),
            QuoteRequest::Funeral(q) => fields
                .field("cover_amount", q.cover_amount)
                .field("has_spouse", q.has_spouse)
                .field("number_of_children", q.number_of_children)
                .optional("extended_family_ages", q.extended_family_ages),
        }
    }
}

fn variant<T: DeserializeOwned>(value: Value) -> Result<T, RootError> {
    serde_json::from_value(value).map_err(|e| RootError::invalid(e.to_string()))
}

impl<T> RootClient<T> {
    pub fn build_create_quote(&self, quote: &QuoteRequest) -> Result<HttpRequest, RootError> {
        self.write_request(HttpMethod::Post, "quotes", quote.clone().into_fields())
    }

    pub fn build_list_gadget_models(&self) -> HttpRequest {
        self.get_request("gadgets/models", Fields::new())
    }
}

impl<T: Transport> RootClient<T> {
    pub fn create_quote(&self, quote: &QuoteRequest) -> Result<Value, RootError> {
        self.execute(self.build_create_quote(quote)?)
    }

    pub fn list_gadget_models(&self) -> Result<Value, RootError> {
        self.execute(self.build_list_gadget_models())
    }
}
