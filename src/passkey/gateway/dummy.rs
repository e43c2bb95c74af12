use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{AuthenticatorError, PasskeyAuthenticator};
use crate::passkey::entities::{
    AssertionResponse, AttestationResponse, AuthenticationOptions, AuthenticationResult,
    PUBLIC_KEY_CREDENTIAL_TYPE, RegistrationOptions, RegistrationResult,
};

/// Stand-in authenticator for running the app without a platform bridge.
/// Logs each request and answers with synthetic, unsigned data.
pub struct DummyAuthenticator {
    supported: bool,
    user_cancels: bool,
}

impl DummyAuthenticator {
    pub fn new(supported: bool, user_cancels: bool) -> Self {
        Self {
            supported,
            user_cancels,
        }
    }

    /// Failures a platform authenticator reports before touching any key.
    fn check_request(&self, rp_id: &str) -> Result<(), AuthenticatorError> {
        if !self.supported {
            return Err(AuthenticatorError::NotSupported);
        }
        if rp_id.is_empty() {
            return Err(AuthenticatorError::RequestFailed(
                "relying party id is empty".to_string(),
            ));
        }
        if self.user_cancels {
            return Err(AuthenticatorError::Cancelled);
        }
        Ok(())
    }

    fn client_data(kind: &str, challenge: &str, rp_id: &str) -> String {
        let client_data = json!({
            "type": kind,
            "challenge": challenge,
            "origin": format!("https://{}", rp_id),
        });
        BASE64_URL.encode(client_data.to_string())
    }
}

#[async_trait]
impl PasskeyAuthenticator for DummyAuthenticator {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn register(
        &self,
        options: &RegistrationOptions,
    ) -> Result<RegistrationResult, AuthenticatorError> {
        self.check_request(&options.rp.id)?;

        let credential_id = BASE64_URL.encode(Uuid::new_v4().as_bytes());
        info!(rp_id = %options.rp.id, user = %options.user.name, %credential_id, "Dummy registration");

        Ok(RegistrationResult {
            id: credential_id.clone(),
            raw_id: credential_id,
            credential_type: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
            response: AttestationResponse {
                client_data_json: Self::client_data(
                    "webauthn.create",
                    options.challenge.as_ref(),
                    &options.rp.id,
                ),
                attestation_object: String::new(),
            },
        })
    }

    async fn authenticate(
        &self,
        options: &AuthenticationOptions,
    ) -> Result<AuthenticationResult, AuthenticatorError> {
        self.check_request(&options.rp_id)?;

        let credential_id = BASE64_URL.encode(Uuid::new_v4().as_bytes());
        info!(rp_id = %options.rp_id, %credential_id, "Dummy authentication");

        Ok(AuthenticationResult {
            id: credential_id.clone(),
            raw_id: credential_id,
            credential_type: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
            response: AssertionResponse {
                client_data_json: Self::client_data(
                    "webauthn.get",
                    options.challenge.as_ref(),
                    &options.rp_id,
                ),
                authenticator_data: String::new(),
                signature: String::new(),
                user_handle: None,
            },
        })
    }
}
