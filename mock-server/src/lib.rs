//! In-memory stand-in for the Root insurance sandbox API.
//!
//! Covers enough of the surface to drive the client end-to-end: basic auth,
//! policyholders (with `include` and events), claims (with status filters and
//! base64 attachments) and the gadget model catalogue. Error bodies follow the
//! real API: `{"error": ...}` for input problems, `{"message": ...}` for
//! authentication and missing resources.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Policyholder {
    pub policyholder_id: Uuid,
    pub id: Value,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub cellphone: Option<Value>,
    pub app_data: Option<Value>,
}

#[derive(Deserialize)]
pub struct CreatePolicyholder {
    pub id: Option<Value>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub cellphone: Option<Value>,
    pub app_data: Option<Value>,
}

#[derive(Deserialize)]
pub struct UpdatePolicyholder {
    pub email: Option<String>,
    pub cellphone: Option<Value>,
    pub app_data: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: Uuid,
    pub policy_id: Option<String>,
    pub policyholder_id: Option<String>,
    pub incident_type: Option<String>,
    pub incident_cause: Option<String>,
    pub incident_date: Option<String>,
    pub requested_amount: Option<u64>,
    pub app_data: Option<Value>,
    pub claimant: Option<Value>,
    pub claim_status: String,
    pub approval_status: String,
}

#[derive(Deserialize)]
pub struct OpenClaim {
    pub policy_id: Option<String>,
    pub policyholder_id: Option<String>,
    pub incident_type: Option<String>,
    pub incident_cause: Option<String>,
    pub incident_date: Option<String>,
    pub requested_amount: Option<u64>,
    pub app_data: Option<Value>,
    pub claimant: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attachment {
    pub attachment_id: Uuid,
    pub claim_id: Uuid,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub size: usize,
    pub description: String,
}

#[derive(Deserialize)]
pub struct CreateAttachment {
    pub file_base64: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Default)]
pub struct Store {
    policyholders: HashMap<Uuid, Policyholder>,
    policyholder_events: HashMap<Uuid, Vec<Value>>,
    claims: HashMap<Uuid, Claim>,
    attachments: HashMap<Uuid, Vec<Attachment>>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    expected_auth: Arc<String>,
}

pub const GADGET_MODELS: [&str; 3] = [
    "iPhone 6s 64GB LTE",
    "iPhone 7 128GB LTE",
    "Samsung Galaxy S8 64GB LTE",
];

/// Router accepting only `app_id:app_secret` via HTTP basic auth.
pub fn app(app_id: &str, app_secret: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        expected_auth: Arc::new(format!(
            "Basic {}",
            STANDARD.encode(format!("{app_id}:{app_secret}"))
        )),
    };
    Router::new()
        .route("/gadgets/models", get(list_gadget_models))
        .route("/policyholders", get(list_policyholders).post(create_policyholder))
        .route("/policyholders/{id}", get(get_policyholder).patch(update_policyholder))
        .route("/policyholders/{id}/events", get(list_policyholder_events))
        .route("/claims", get(list_claims).post(open_claim))
        .route("/claims/{id}", get(get_claim))
        .route(
            "/claims/{id}/attachments",
            get(list_attachments).post(create_attachment),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener, app_id: &str, app_secret: &str) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr().ok(), "mock Root API listening");
    axum::serve(listener, app(app_id, app_secret)).await
}

fn input_error(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid, Response> {
    raw.parse()
        .map_err(|_| input_error(&format!("{what} must be a valid UUID")))
}

async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let supplied = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if supplied != Some(state.expected_auth.as_str()) {
        debug!(path = %request.uri().path(), "rejecting request with bad credentials");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid API credentials" })),
        )
            .into_response();
    }
    next.run(request).await
}

async fn list_gadget_models() -> Json<Value> {
    let models: Vec<Value> = GADGET_MODELS
        .iter()
        .map(|name| json!({ "make": name.split(' ').next(), "name": name }))
        .collect();
    Json(Value::Array(models))
}

async fn create_policyholder(
    State(state): State<AppState>,
    Json(input): Json<CreatePolicyholder>,
) -> Response {
    let id = match input.id {
        Some(id @ Value::Object(_)) => id,
        Some(_) => return input_error("id must be an object"),
        None => return input_error("id is required"),
    };
    let (Some(first_name), Some(last_name)) = (input.first_name, input.last_name) else {
        return input_error("first_name and last_name are required");
    };
    let policyholder = Policyholder {
        policyholder_id: Uuid::new_v4(),
        id,
        first_name,
        last_name,
        date_of_birth: input.date_of_birth,
        email: input.email,
        cellphone: input.cellphone,
        app_data: input.app_data,
    };
    let mut db = state.db.write().await;
    db.policyholder_events
        .entry(policyholder.policyholder_id)
        .or_default()
        .push(json!({ "type": "policyholder_created" }));
    db.policyholders
        .insert(policyholder.policyholder_id, policyholder.clone());
    Json(policyholder).into_response()
}

/// Attach empty related collections named by `include=a,b`.
fn with_includes(policyholder: &Policyholder, include: Option<&String>) -> Value {
    let mut value = json!(policyholder);
    if let (Some(include), Some(object)) = (include, value.as_object_mut()) {
        for key in include.split(',').filter(|k| !k.is_empty()) {
            object.insert(key.to_string(), json!([]));
        }
    }
    value
}

async fn list_policyholders(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let db = state.db.read().await;
    let id_number = query.get("id_number");
    Json(
        db.policyholders
            .values()
            .filter(|p| match id_number {
                Some(number) => p.id.get("number").and_then(Value::as_str) == Some(number.as_str()),
                None => true,
            })
            .map(|p| with_includes(p, query.get("include")))
            .collect(),
    )
}

async fn get_policyholder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let id = match parse_id(&id, "policyholder_id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let db = state.db.read().await;
    match db.policyholders.get(&id) {
        Some(p) => Json(with_includes(p, query.get("include"))).into_response(),
        None => not_found("Policyholder not found"),
    }
}

async fn update_policyholder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePolicyholder>,
) -> Response {
    let id = match parse_id(&id, "policyholder_id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let mut db = state.db.write().await;
    let Some(policyholder) = db.policyholders.get_mut(&id) else {
        return not_found("Policyholder not found");
    };
    if let Some(email) = input.email {
        policyholder.email = Some(email);
    }
    if let Some(cellphone) = input.cellphone {
        policyholder.cellphone = Some(cellphone);
    }
    if let Some(app_data) = input.app_data {
        policyholder.app_data = Some(app_data);
    }
    let updated = policyholder.clone();
    db.policyholder_events
        .entry(id)
        .or_default()
        .push(json!({ "type": "policyholder_updated" }));
    Json(updated).into_response()
}

async fn list_policyholder_events(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id, "policyholder_id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let db = state.db.read().await;
    match db.policyholder_events.get(&id) {
        Some(events) => Json(events.clone()).into_response(),
        None => not_found("Policyholder not found"),
    }
}

async fn open_claim(State(state): State<AppState>, Json(input): Json<OpenClaim>) -> Json<Claim> {
    let claim = Claim {
        claim_id: Uuid::new_v4(),
        policy_id: input.policy_id,
        policyholder_id: input.policyholder_id,
        incident_type: input.incident_type,
        incident_cause: input.incident_cause,
        incident_date: input.incident_date,
        requested_amount: input.requested_amount,
        app_data: input.app_data,
        claimant: input.claimant,
        claim_status: "open".to_string(),
        approval_status: "pending".to_string(),
    };
    state.db.write().await.claims.insert(claim.claim_id, claim.clone());
    Json(claim)
}

async fn list_claims(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Vec<Claim>> {
    let db = state.db.read().await;
    let matches = |wanted: Option<&String>, actual: &str| wanted.is_none_or(|w| w == actual);
    Json(
        db.claims
            .values()
            .filter(|c| matches(query.get("claim_status"), &c.claim_status))
            .filter(|c| matches(query.get("approval_status"), &c.approval_status))
            .cloned()
            .collect(),
    )
}

async fn get_claim(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id, "claim_id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let db = state.db.read().await;
    match db.claims.get(&id) {
        Some(claim) => Json(claim.clone()).into_response(),
        None => not_found("Claim not found"),
    }
}

async fn create_attachment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateAttachment>,
) -> Response {
    let claim_id = match parse_id(&id, "claim_id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let size = match input.file_base64.as_deref().map(|data| STANDARD.decode(data)) {
        Some(Ok(bytes)) => bytes.len(),
        Some(Err(_)) => return input_error("file_base64 is not valid base64"),
        None => 0,
    };
    let mut db = state.db.write().await;
    if !db.claims.contains_key(&claim_id) {
        return not_found("Claim not found");
    }
    let attachment = Attachment {
        attachment_id: Uuid::new_v4(),
        claim_id,
        file_name: input.file_name,
        file_type: input.file_type,
        size,
        description: input.description,
    };
    db.attachments
        .entry(claim_id)
        .or_default()
        .push(attachment.clone());
    Json(attachment).into_response()
}

async fn list_attachments(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let claim_id = match parse_id(&id, "claim_id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let db = state.db.read().await;
    Json(db.attachments.get(&claim_id).cloned().unwrap_or_default()).into_response()
}
