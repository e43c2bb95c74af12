use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};

const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
const RANDOM_CHALLENGE_LEN: usize = 64;

/// Derives a base64-encoded challenge from an arbitrary payload.
///
/// The payload is hashed with SHA-256 and the lowercase hex text of the digest
/// is base64-encoded as text. The result is the base64 of the 64 hex characters,
/// not of the 32 raw digest bytes. Relying parties consuming these challenges
/// expect that exact form, so it must not be collapsed into a single
/// digest-to-base64 step.
pub fn challenge_from_payload(payload: &str) -> String {
    let hex_string = hex::encode(Sha256::digest(payload.as_bytes()));
    BASE64.encode(hex_string.as_bytes())
}

/// Returns 64 random lowercase hex characters (32 bytes' worth, hex encoded),
/// e.g. `5e4c2c235fc876a9bef433506cf596f2f7db19a959e3e30c5a2d965ec149d40f`.
///
/// The source is a general purpose PRNG and is not cryptographically strong.
/// That is acceptable for registration challenges:
/// - a brand new key pair is generated by the authenticator during the same
///   registration call, which makes replaying an old signature impractical
/// - a replayed registration would still be unusable because the relying party
///   enforces anti-replay on activity payloads through their timestamp field
pub fn random_challenge() -> String {
    let mut rng = rand::rng();
    (0..RANDOM_CHALLENGE_LEN)
        .map(|_| HEX_CHARS[rng.random_range(0..HEX_CHARS.len())] as char)
        .collect()
}

/// An encoded challenge, ready to be handed to an authenticator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Challenge(String);

impl Challenge {
    #[cfg(test)]
    pub fn new(challenge: String) -> Self {
        Self(challenge)
    }

    pub fn from_payload(payload: &str) -> Self {
        Self(challenge_from_payload(payload))
    }

    pub fn random() -> Self {
        Self(random_challenge())
    }
}

impl AsRef<str> for Challenge {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Challenge {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
