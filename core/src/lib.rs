//! Synchronous client for the Root insurance API.
//!
//! # Overview
//! Builds `HttpRequest` values for quotes, policyholders, applications,
//! policies, claims, calls and payment methods, and maps `HttpResponse`
//! values back to JSON or a typed `RootError`. Requests can be executed
//! through the built-in ureq `Transport` or by the caller (host-does-IO).
//!
//! # Design
//! - `RootClient` is immutable after construction: credentials, base URL,
//!   MIME sniffer and transport.
//! - Every operation is a `build_*` method (pure) plus an executing method
//!   that performs exactly one HTTP exchange. There are no retries.
//! - Unset optional fields are left out of bodies and queries entirely
//!   (`fields::Fields`); falsy values are still sent.
//! - Claim attachments accept a path, reader, bytes or base64 and are
//!   normalized by `attachment::encode_attachment`.
//!
//! ```no_run
//! use root_insurance::{Credentials, Environment, RootClient};
//!
//! let client = RootClient::new(Credentials::new("app_id", "", Environment::Sandbox));
//! let models = client.list_gadget_models()?;
//! # Ok::<(), root_insurance::RootError>(())
//! ```

pub mod api;
pub mod attachment;
pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod http;
pub mod transport;

pub use api::application::CreateApplication;
pub use api::claim::{ListClaims, OpenClaim, UpdateClaim};
pub use api::payment::{BankDetails, CreatePaymentMethod};
pub use api::policy::AddBeneficiary;
pub use api::policyholder::{CreatePolicyholder, ListPolicyholders, UpdatePolicyholder};
pub use api::quote::{FuneralQuote, GadgetQuote, QuoteRequest, QuoteType, TermQuote};
pub use api::{Cellphone, Identification};
pub use attachment::{AttachmentDescriptor, AttachmentInput, InferSniffer, MimeSniffer};
pub use client::{parse_response, RootClient};
pub use config::{Credentials, Environment};
pub use error::RootError;
pub use fields::{Fields, IncludedObjects, OneOrMany, PolicyIds};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
