//! Email/password sign-in against the identity provider's REST endpoint.

use async_trait::async_trait;
use chrono::Utc;
use gloo_net::http::Request;
use shared::{
    AuthError, Authenticator, ClientConfig, ProviderErrorResponse, Session, SignInRequest,
    SignInResponse,
};

#[derive(Clone, PartialEq)]
pub struct IdentityClient {
    config: ClientConfig,
}

impl IdentityClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

#[async_trait(?Send)]
impl Authenticator for IdentityClient {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let body = SignInRequest {
            email,
            password,
            return_secure_token: true,
        };

        let resp = Request::post(&self.config.sign_in_url())
            .json(&body)
            .map_err(|e| AuthError::Unknown(format!("Failed to encode request: {}", e)))?
            .send()
            .await
            .map_err(AuthError::from_transport)?;

        if resp.ok() {
            let data = resp
                .json::<SignInResponse>()
                .await
                .map_err(|e| AuthError::Unknown(format!("Failed to parse response: {}", e)))?;
            return Session::from_sign_in(data, Utc::now());
        }

        let body = resp.json::<ProviderErrorResponse>().await.ok();
        Err(AuthError::from_failed_response(resp.status(), body))
    }
}
