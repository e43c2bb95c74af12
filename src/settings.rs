use std::path::Path;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PasskeySettings {
    pub rp_id: String,
    pub rp_name: String,
    pub user_id: String,
    pub user_name: String,
    pub user_display_name: String,
    /// Payload whose derived challenge is signed at registration.
    pub registration_payload: String,
    /// Payload whose derived challenge is signed when using the passkey.
    pub signature_payload: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub enum AuthenticatorSettings {
    Dummy {
        supported: bool,
        /// Answer every request as if the user dismissed the prompt.
        user_cancels: bool,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub authenticator: AuthenticatorSettings,
    pub passkey: PasskeySettings,
}

impl Settings {
    pub fn load() -> Result<Settings, ConfigError> {
        let settings = Self::with_defaults()?
            .add_source(File::with_name("settings").required(false))
            .add_source(Self::environment())
            .build()?;

        settings.try_deserialize()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
        let settings = Self::with_defaults()?
            .add_source(File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?;

        settings.try_deserialize()
    }

    /// `PASSKEY_APP__SECTION__KEY` variables. Values are parsed so booleans
    /// like `PASSKEY_APP__AUTHENTICATOR__SUPPORTED=false` deserialize.
    fn environment() -> Environment {
        Environment::with_prefix("PASSKEY_APP")
            .separator("__")
            .try_parsing(true)
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("authenticator.type", "dummy")?
            .set_default("authenticator.supported", true)?
            .set_default("authenticator.user_cancels", false)?
            .set_default("passkey.rp_id", "passkeyapp.tkhqlabs.xyz")?
            .set_default("passkey.rp_name", "Passkey App")?
            .set_default("passkey.user_id", "new-id")?
            .set_default("passkey.user_name", "New Passkey")?
            .set_default("passkey.user_display_name", "New Passkey")?
            .set_default("passkey.registration_payload", "hello")?
            .set_default("passkey.signature_payload", "test payload")
    }
}
