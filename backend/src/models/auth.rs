//! Authentication request and response bodies for KodBank

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::UserRole;

// ============================================================================
// Request DTOs
// ============================================================================

/// Registration form. Every field is required; presence is checked by the
/// auth service so a missing field and a blank one get the same answer.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 50, message = "UID must be at most 50 characters"))]
    pub uid: Option<String>,

    #[serde(alias = "uname")]
    #[validate(length(max = 50, message = "Username must be at most 50 characters"))]
    pub username: Option<String>,

    pub password: Option<String>,

    #[validate(
        email(message = "Invalid email address"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
}

/// Login form
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "uname")]
    pub username: Option<String>,
    pub password: Option<String>,
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub username: String,
    pub role: UserRole,
}

/// Body for endpoints that only report an outcome
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub success: bool,
    pub username: String,
    pub balance: i64,
    pub currency: String,
}

/// First human readable message from a validation failure, picked by field
/// name so the answer is stable across runs.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by_key(|(field, _)| **field);

    fields
        .into_iter()
        .flat_map(|(field, errs)| errs.iter().map(move |e| (field, e)))
        .map(|(field, e)| match &e.message {
            Some(message) => message.to_string(),
            None => format!("Invalid value for {}", field),
        })
        .next()
        .unwrap_or_else(|| "Invalid request".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_request() -> RegisterRequest {
        RegisterRequest {
            uid: Some("U1".to_string()),
            username: Some("alice".to_string()),
            password: Some("p1".to_string()),
            email: Some("a@x.com".to_string()),
            phone: Some("555".to_string()),
        }
    }

    #[test]
    fn test_register_request_accepts_uname_alias() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"uid":"U1","uname":"alice","password":"p1","email":"a@x.com","phone":"555"}"#,
        )
        .unwrap();
        assert_eq!(req.username.as_deref(), Some("alice"));

        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","password":"p1"}"#).unwrap();
        assert_eq!(req.username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let req: RegisterRequest = serde_json::from_str(r#"{"uid":"U1"}"#).unwrap();
        assert!(req.username.is_none());
        assert!(req.phone.is_none());
    }

    #[test]
    fn test_valid_request_passes_validation() {
        assert!(complete_request().validate().is_ok());
    }

    #[test]
    fn test_bad_email_is_reported() {
        let req = RegisterRequest {
            email: Some("not-an-email".to_string()),
            ..complete_request()
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "Invalid email address");
    }

    #[test]
    fn test_overlong_username_is_reported() {
        let req = RegisterRequest {
            username: Some("a".repeat(51)),
            ..complete_request()
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(
            first_validation_message(&errors),
            "Username must be at most 50 characters"
        );
    }

    #[test]
    fn test_register_response_uses_camel_case() {
        let body = serde_json::to_value(RegisterResponse {
            success: true,
            message: "User registered successfully".to_string(),
            user_id: 7,
        })
        .unwrap();
        assert_eq!(body["userId"], 7);
    }
}
