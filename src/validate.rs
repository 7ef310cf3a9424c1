//! Detection of API errors embedded in JSON-RPC responses.

use crate::dto::rpc::RpcError;
use crate::error::{BetfairError, Result};
use crate::request::Method;
use serde_json::Value;

/// Fails with [`BetfairError::Api`] when the body carries an `error` object,
/// otherwise hands the body back unchanged.
pub fn check(raw: Value, method: Method) -> Result<Value> {
    if !raw.get("error").is_some_and(|e| !e.is_null()) {
        return Ok(raw);
    }

    let error = &raw["error"];
    let (code, description) = match serde_json::from_value::<RpcError>(error.clone()) {
        Ok(rpc) => describe(&rpc),
        Err(_) => ("UNKNOWN".to_string(), error.to_string()),
    };

    Err(BetfairError::Api {
        method: method.api_name().to_string(),
        code,
        description,
    })
}

/// Takes the `result` payload out of a checked response.
pub fn result_of(raw: Value, method: Method) -> Result<Value> {
    match raw {
        Value::Object(mut body) => body
            .remove("result")
            .ok_or_else(|| BetfairError::parse(method.api_name(), None, "result")),
        _ => Err(BetfairError::parse(method.api_name(), None, "result")),
    }
}

/// Prefers the exception detail under `data` (e.g. `APINGException`) over the
/// generic JSON-RPC code and message.
fn describe(rpc: &RpcError) -> (String, String) {
    let exception = rpc.data.as_ref().and_then(|data| {
        let name = data
            .get("exceptionname")
            .and_then(Value::as_str)
            .unwrap_or("APINGException");
        data.get(name)
    });

    let text = |value: Option<&Value>| {
        value
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let code = text(exception.and_then(|e| e.get("errorCode"))).unwrap_or_else(|| match &rpc.code {
        Value::String(code) => code.clone(),
        other => other.to_string(),
    });
    let description = text(exception.and_then(|e| e.get("errorDetails")))
        .or_else(|| rpc.message.clone())
        .unwrap_or_default();

    (code, description)
}
