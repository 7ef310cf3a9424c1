use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest<T> {
    pub jsonrpc: String,
    pub method: String,
    pub params: T,
    pub id: i32,
}

impl<T> JsonRpcRequest<T> {
    pub fn new(method: impl Into<String>, params: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: 1,
        }
    }
}

/// Error object embedded in a JSON-RPC response.
///
/// `code` is a number for JSON-RPC level failures (e.g. `-32099`) and a
/// string for some gateway errors, so it stays an untyped value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: Value,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Body returned by the interactive login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl LoginResponse {
    pub fn is_success(&self) -> bool {
        self.status == "SUCCESS"
    }
}
