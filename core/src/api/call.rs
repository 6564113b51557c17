//! Recorded calls. Read-only.

use serde_json::Value;

use crate::client::RootClient;
use crate::error::RootError;
use crate::fields::Fields;
use crate::http::{segment, HttpRequest};
use crate::transport::Transport;

impl<T> RootClient<T> {
    pub fn build_list_calls(&self) -> HttpRequest {
        self.get_request("calls", Fields::new())
    }

    pub fn build_get_call(&self, id: &str) -> HttpRequest {
        self.get_request(format!("calls/{}", segment(id)), Fields::new())
    }

    pub fn build_list_call_events(&self, id: &str) -> HttpRequest {
        self.get_request(format!("calls/{}/events", segment(id)), Fields::new())
    }
}

impl<T: Transport> RootClient<T> {
    pub fn list_calls(&self) -> Result<Value, RootError> {
        self.execute(self.build_list_calls())
    }

    pub fn get_call(&self, id: &str) -> Result<Value, RootError> {
        self.execute(self.build_get_call(id))
    }

    pub fn list_call_events(&self, id: &str) -> Result<Value, RootError> {
        self.execute(self.build_list_call_events(id))
    }
}
