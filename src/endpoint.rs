//! Transport-agnostic endpoint for the hash service
//!
//! [`HashEndpoint`] maps a [`HashRequest`] onto a [`HashService`] call and turns
//! the outcome into a [`HashResponse`]. Domain errors become the `err` field of
//! the response; the endpoint itself never fails.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::service::HashService;

/// Request body for POST /hash
///
/// A missing `s` field decodes to the empty string. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRequest {
    #[serde(default)]
    pub s: String,
}

/// Response body for POST /hash
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResponse {
    /// Hex digest, empty on failure
    pub v: String,
    /// Validation message, only present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

/// Adapter from [`HashRequest`] to the (possibly decorated) service
#[derive(Clone)]
pub struct HashEndpoint {
    service: Arc<dyn HashService>,
}

impl HashEndpoint {
    pub fn new(service: Arc<dyn HashService>) -> Self {
        Self { service }
    }

    pub fn call(&self, request: HashRequest) -> HashResponse {
        match self.service.hash(&request.s) {
            Ok(v) => HashResponse { v, err: None },
            Err(e) => HashResponse {
                v: String::new(),
                err: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Sha256HashService;

    fn endpoint() -> HashEndpoint {
        HashEndpoint::new(Arc::new(Sha256HashService::new()))
    }

    #[test]
    fn test_endpoint_success() {
        let response = endpoint().call(HashRequest {
            s: "world".to_string(),
        });

        assert_eq!(
            response.v,
            "486ea46224d1bb4fb680f34f7c9ad96a8f24ec88be73ea8e5a6c65260e9cb8a7"
        );
        assert_eq!(response.err, None);
    }

    #[test]
    fn test_endpoint_empty_input() {
        let response = endpoint().call(HashRequest::default());

        assert_eq!(response.v, "");
        assert_eq!(response.err.as_deref(), Some("Empty input string"));
    }

    #[test]
    fn test_request_missing_field_decodes_to_empty() {
        let request: HashRequest = serde_json::from_str(r#"{"sdfs":""}"#).unwrap();
        assert_eq!(request, HashRequest::default());
    }

    #[test]
    fn test_request_rejects_malformed_json() {
        assert!(serde_json::from_str::<HashRequest>("invalid").is_err());
        assert!(serde_json::from_str::<HashRequest>(r#"{"s": 42}"#).is_err());
    }

    #[test]
    fn test_response_serialization_omits_missing_err() {
        let ok = HashResponse {
            v: "abc".to_string(),
            err: None,
        };
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"v":"abc"}"#);

        let failed = endpoint().call(HashRequest::default());
        assert_eq!(
            serde_json::to_string(&failed).unwrap(),
            r#"{"v":"","err":"Empty input string"}"#
        );
    }
}
