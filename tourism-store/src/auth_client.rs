use serde::{Deserialize, Serialize};
use tourism_shared::Masked;
use tracing::{info, warn};
use uuid::Uuid;
use crate::app_config::ServiceCredentials;
use crate::http::{ApiClient, StoreResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Portal user as returned by `/users/me`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortalUser {
    pub id: Uuid,
    pub email: Masked<String>,
    pub full_name: String,
    pub user_type: String,
    #[serde(default)]
    pub phone: Option<Masked<String>>,
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
}

/// Client for the auth service
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// OAuth2 password flow; credentials are form-encoded
    pub async fn login(&self, username: &str, password: &str) -> StoreResult<TokenResponse> {
        let token: TokenResponse = self
            .api
            .post_form("/login/access-token", &[("username", username), ("password", password)])
            .await?;
        info!("Logged in to auth service as {}", username);
        Ok(token)
    }

    /// Bearer token for calls to the catalog and booking services
    pub async fn service_token(&self, credentials: &ServiceCredentials) -> StoreResult<Option<String>> {
        match credentials {
            ServiceCredentials::Token(token) => Ok(Some(token.clone())),
            ServiceCredentials::Login { username, password } => {
                let token = self.login(username, password.reveal()).await?;
                Ok(Some(token.access_token))
            }
            ServiceCredentials::Anonymous => {
                warn!("No service credentials configured; upstream calls are unauthenticated");
                Ok(None)
            }
        }
    }

    /// Current user for the token the client was built with
    pub async fn me(&self) -> StoreResult<PortalUser> {
        self.api.get_json("/users/me").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_user_hides_contact_details() {
        let user: PortalUser = serde_json::from_value(serde_json::json!({
            "id": "6f1c1f3e-8d2a-4a63-9b7e-3c1d8d6a9a10",
            "email": "staff@example.com",
            "full_name": "Front Desk",
            "user_type": "PORTAL_STAFF",
            "phone": "9000000000",
            "is_active": true,
            "is_verified": true
        }))
        .unwrap();

        assert_eq!(user.email.reveal(), "staff@example.com");
        let debug = format!("{:?}", user);
        assert!(!debug.contains("staff@example.com"));
        assert!(!debug.contains("9000000000"));
    }

    #[tokio::test]
    async fn test_configured_token_needs_no_login() {
        // Nothing listens here; a login attempt would fail
        let client = AuthClient::new(ApiClient::new("http://127.0.0.1:9/api/v1"));
        let token = client
            .service_token(&ServiceCredentials::Token("tok".to_string()))
            .await
            .unwrap();
        assert_eq!(token.as_deref(), Some("tok"));
        assert!(client.service_token(&ServiceCredentials::Anonymous).await.unwrap().is_none());
    }

    #[test]
    fn test_token_response_shape() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "token_type": "bearer"}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.token_type, "bearer");
    }
}
