//! Client-related types shared between the UI shell and the gateway
//!
//! Request/response DTOs for the auth endpoints. Wire names are camelCase.

use serde::{Deserialize, Serialize};

/// The only role allowed to establish a customer session in the UI layer.
pub const ROLE_CLIENT: &str = "CLIENT";

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

/// Registration request for `POST auth/client-register`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub phone_number: String,
    pub password: String,
}

/// Login response: identity plus optional token material.
///
/// `role` is optional on the wire; callers must treat its absence as a
/// refusal to establish a session, not as an implicit CLIENT.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user_id: i64,
    pub name: String,
    pub phone_number: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl LoginResponse {
    /// True only when the backend explicitly granted the CLIENT role.
    pub fn is_client(&self) -> bool {
        self.role.as_deref() == Some(ROLE_CLIENT)
    }
}

/// Registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Payload for `POST auth/update-password`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_role_is_not_client() {
        let json = r#"{"userId":1,"name":"An","phoneNumber":"0900000000"}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.is_client());
    }

    #[test]
    fn test_staff_role_is_not_client() {
        let json =
            r#"{"userId":1,"name":"An","phoneNumber":"0900000000","role":"STAFF"}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.is_client());
    }

    #[test]
    fn test_client_role_accepted() {
        let json = r#"{"userId":1,"name":"An","phoneNumber":"0900000000","role":"CLIENT","token":"t","refreshToken":"r"}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert!(resp.is_client());
        assert_eq!(resp.token.as_deref(), Some("t"));
    }
}
