use serde_json::Map;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use crate::crypto::challenge::Challenge;
use crate::settings::PasskeySettings;

use super::entities::{
    AttestationConveyance, AuthenticationOptions, AuthenticationResult, AuthenticatorSelection,
    PasskeyUser, PublicKeyCredentialParameters, RegistrationOptions, RegistrationResult,
    RelyingParty, ResidentKeyRequirement, UserVerificationRequirement,
};
use super::gateway::PasskeyAuthenticator;

/// Handlers behind the "Create Passkey" and "Sign with Passkey" actions.
///
/// Both handlers are error boundaries: authenticator failures are logged and
/// turned into `None`, never propagated.
pub struct PasskeyService<A: PasskeyAuthenticator> {
    authenticator: Arc<A>,
    settings: PasskeySettings,
}

impl<A: PasskeyAuthenticator> PasskeyService<A> {
    pub fn new(authenticator: Arc<A>, settings: PasskeySettings) -> Self {
        Self {
            authenticator,
            settings,
        }
    }

    pub fn registration_options(&self) -> RegistrationOptions {
        RegistrationOptions {
            challenge: Challenge::from_payload(&self.settings.registration_payload),
            rp: RelyingParty {
                id: self.settings.rp_id.clone(),
                name: self.settings.rp_name.clone(),
            },
            user: PasskeyUser {
                id: self.settings.user_id.clone(),
                name: self.settings.user_name.clone(),
                display_name: self.settings.user_display_name.clone(),
            },
            exclude_credentials: Vec::new(),
            authenticator_selection: AuthenticatorSelection {
                require_resident_key: true,
                resident_key: ResidentKeyRequirement::Required,
                user_verification: UserVerificationRequirement::Preferred,
            },
            attestation: AttestationConveyance::None,
            extensions: Map::new(),
            pub_key_cred_params: PublicKeyCredentialParameters::supported(),
        }
    }

    pub fn authentication_options(&self) -> AuthenticationOptions {
        AuthenticationOptions {
            rp_id: self.settings.rp_id.clone(),
            challenge: Challenge::from_payload(&self.settings.signature_payload),
        }
    }

    #[instrument(skip(self))]
    pub async fn create_passkey(&self) -> Option<RegistrationResult> {
        // Support is only reported; an unsupported platform fails in `register`.
        debug!(
            challenge = %Challenge::from_payload(&self.settings.registration_payload),
            random_challenge = %Challenge::random(),
            supported = self.authenticator.is_supported(),
            "Checked challenge generation and passkey support"
        );
        info!(rp_id = %self.settings.rp_id, "Registering a passkey");

        let options = self.registration_options();
        match self.authenticator.register(&options).await {
            Ok(result) => {
                info!(?result, "Passkey created");
                Some(result)
            }
            Err(err) => {
                error!(error = ?err, "error during passkey creation");
                None
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn sign_with_passkey(&self) -> Option<AuthenticationResult> {
        let options = self.authentication_options();
        match self.authenticator.authenticate(&options).await {
            Ok(result) => {
                info!(?result, "success");
                Some(result)
            }
            Err(err) => {
                error!(error = ?err, "error during passkey signature");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::challenge::challenge_from_payload;
    use crate::passkey::entities::{AssertionResponse, AttestationResponse};
    use crate::passkey::gateway::{AuthenticatorError, MockPasskeyAuthenticator};

    const RP_ID: &str = "passkeyapp.tkhqlabs.xyz";

    fn settings() -> PasskeySettings {
        PasskeySettings {
            rp_id: RP_ID.to_string(),
            rp_name: "Passkey App".to_string(),
            user_id: "new-id".to_string(),
            user_name: "New Passkey".to_string(),
            user_display_name: "New Passkey".to_string(),
            registration_payload: "hello".to_string(),
            signature_payload: "test payload".to_string(),
        }
    }

    fn registration_result() -> RegistrationResult {
        RegistrationResult {
            id: "cred".to_string(),
            raw_id: "cred".to_string(),
            credential_type: "public-key".to_string(),
            response: AttestationResponse {
                client_data_json: "e30".to_string(),
                attestation_object: "o2Nm".to_string(),
            },
        }
    }

    fn authentication_result() -> AuthenticationResult {
        AuthenticationResult {
            id: "cred".to_string(),
            raw_id: "cred".to_string(),
            credential_type: "public-key".to_string(),
            response: AssertionResponse {
                client_data_json: "e30".to_string(),
                authenticator_data: "AAAA".to_string(),
                signature: "MEUC".to_string(),
                user_handle: Some("new-id".to_string()),
            },
        }
    }

    #[tokio::test]
    async fn test_create_passkey_registers_once_with_fixed_rp() {
        let mut mock_authenticator = MockPasskeyAuthenticator::new();
        mock_authenticator.expect_is_supported().return_const(true);
        mock_authenticator
            .expect_register()
            .once()
            .withf(|options| {
                let algs: Vec<i32> = options.pub_key_cred_params.iter().map(|p| p.alg).collect();
                options.rp.id == RP_ID
                    && algs == vec![-7, -257]
                    && options
                        .pub_key_cred_params
                        .iter()
                        .all(|p| p.credential_type == "public-key")
                    && options.challenge.as_ref() == challenge_from_payload("hello")
                    && options.attestation == AttestationConveyance::None
                    && options.authenticator_selection.require_resident_key
                    && options.authenticator_selection.resident_key
                        == ResidentKeyRequirement::Required
            })
            .returning(|_| Ok(registration_result()));

        let service = PasskeyService::new(Arc::new(mock_authenticator), settings());
        let result = service.create_passkey().await;

        assert_eq!(result, Some(registration_result()));
    }

    // The `error!` line is not captured; these tests pin the catch-all
    // boundary: a rejected request returns `None` instead of propagating.
    #[tokio::test]
    async fn test_create_passkey_failure_returns_normally() {
        let mut mock_authenticator = MockPasskeyAuthenticator::new();
        mock_authenticator.expect_is_supported().return_const(false);
        mock_authenticator
            .expect_register()
            .once()
            .returning(|_| Err(AuthenticatorError::NotSupported));

        let service = PasskeyService::new(Arc::new(mock_authenticator), settings());

        assert!(service.create_passkey().await.is_none());
    }

    #[tokio::test]
    async fn test_sign_with_passkey_success() {
        let mut mock_authenticator = MockPasskeyAuthenticator::new();
        mock_authenticator
            .expect_authenticate()
            .once()
            .withf(|options| {
                options.rp_id == RP_ID
                    && options.challenge.as_ref() == challenge_from_payload("test payload")
            })
            .returning(|_| Ok(authentication_result()));

        let service = PasskeyService::new(Arc::new(mock_authenticator), settings());

        assert_eq!(
            service.sign_with_passkey().await,
            Some(authentication_result())
        );
    }

    #[tokio::test]
    async fn test_sign_with_passkey_cancelled_returns_normally() {
        let mut mock_authenticator = MockPasskeyAuthenticator::new();
        mock_authenticator
            .expect_authenticate()
            .once()
            .returning(|_| Err(AuthenticatorError::Cancelled));

        let service = PasskeyService::new(Arc::new(mock_authenticator), settings());

        assert!(service.sign_with_passkey().await.is_none());
    }

    #[test]
    fn test_registration_options_from_settings() {
        let mut settings = settings();
        settings.rp_id = "example.com".to_string();
        settings.user_display_name = "Someone".to_string();

        let service = PasskeyService::new(Arc::new(MockPasskeyAuthenticator::new()), settings);
        let options = service.registration_options();

        assert_eq!(options.rp.id, "example.com");
        assert_eq!(options.rp.name, "Passkey App");
        assert_eq!(options.user.display_name, "Someone");
        assert!(options.exclude_credentials.is_empty());
        assert!(options.extensions.is_empty());
        assert_eq!(
            options.authenticator_selection.user_verification,
            UserVerificationRequirement::Preferred
        );
        assert_eq!(service.authentication_options().rp_id, "example.com");
    }
}
