pub mod dummy;

use async_trait::async_trait;
use thiserror::Error;

use super::entities::{
    AuthenticationOptions, AuthenticationResult, RegistrationOptions, RegistrationResult,
};

#[derive(Error, Debug)]
pub enum AuthenticatorError {
    #[error("Passkeys are not supported on this platform")]
    NotSupported,

    #[error("Request was cancelled by the user")]
    Cancelled,

    #[error("Authenticator request failed: {0}")]
    RequestFailed(String),
}

/// The platform authenticator capability. Key storage, attestation and
/// signing all happen behind this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasskeyAuthenticator {
    fn is_supported(&self) -> bool;

    async fn register(
        &self,
        options: &RegistrationOptions,
    ) -> Result<RegistrationResult, AuthenticatorError>;

    async fn authenticate(
        &self,
        options: &AuthenticationOptions,
    ) -> Result<AuthenticationResult, AuthenticatorError>;
}
