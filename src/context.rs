use std::sync::Arc;

use crate::{
    passkey::{gateway::dummy::DummyAuthenticator, service::PasskeyService},
    settings::{AuthenticatorSettings, Settings},
};

pub struct AppContext {
    pub passkey_service: PasskeyService<DummyAuthenticator>,
}

impl AppContext {
    pub fn from_settings(settings: &Settings) -> Self {
        let authenticator = match settings.authenticator {
            AuthenticatorSettings::Dummy {
                supported,
                user_cancels,
            } => DummyAuthenticator::new(supported, user_cancels),
        };

        let passkey_service =
            PasskeyService::new(Arc::new(authenticator), settings.passkey.clone());

        Self { passkey_service }
    }
}
