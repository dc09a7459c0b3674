//! Request and response bodies for `POST /api/checkKey`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::PremiumValidation;

/// Request body.
///
/// # JSON Example
///
/// ```json
/// {
///   "key": "PREM-1234",
///   "userId": "client-machine-7"
/// }
/// ```
///
/// `userId` is optional; usage without one is recorded as `"unknown"`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckKeyRequest {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub user_id: Option<String>,
}

impl CheckKeyRequest {
    pub fn consumer_id(&self) -> &str {
        self.user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or("unknown")
    }
}

/// Response body.
///
/// Invalid, inactive, expired and unknown keys all produce the same
/// `{"isValid": false}`.
///
/// ```json
/// { "isValid": true, "isPremium": true, "expiry": null }
/// ```
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum CheckKeyResponse {
    Valid {
        is_valid: bool,
        is_premium: bool,
        expiry: Option<DateTime<Utc>>,
    },
    Invalid {
        is_valid: bool,
    },
}

impl From<PremiumValidation> for CheckKeyResponse {
    fn from(outcome: PremiumValidation) -> Self {
        match outcome {
            PremiumValidation::Valid { expiry } => CheckKeyResponse::Valid {
                is_valid: true,
                is_premium: true,
                expiry,
            },
            PremiumValidation::Invalid => CheckKeyResponse::Invalid { is_valid: false },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invalid_response_carries_only_the_flag() {
        let body = serde_json::to_value(CheckKeyResponse::from(PremiumValidation::Invalid)).unwrap();
        assert_eq!(body, json!({ "isValid": false }));
    }

    #[test]
    fn perpetual_key_reports_null_expiry() {
        let body = serde_json::to_value(CheckKeyResponse::from(PremiumValidation::Valid {
            expiry: None,
        }))
        .unwrap();
        assert_eq!(
            body,
            json!({ "isValid": true, "isPremium": true, "expiry": null })
        );
    }

    #[test]
    fn missing_user_id_falls_back_to_unknown() {
        let request: CheckKeyRequest = serde_json::from_value(json!({ "key": "K" })).unwrap();
        assert_eq!(request.consumer_id(), "unknown");

        let request: CheckKeyRequest =
            serde_json::from_value(json!({ "key": "K", "userId": "u9" })).unwrap();
        assert_eq!(request.consumer_id(), "u9");
    }
}
