//! Signing-key resolution collaborators.
//!
//! The sponsored-gas path may need to decrypt a password-protected
//! key. The interactive prompt and the key store are injected as two
//! collaborators so the provider itself stays transport- and
//! UI-agnostic (the CLI wires in rpassword; tests wire in stubs).

use shoal_crypto::{decrypt_private_key, EncryptedKey};

use crate::SwapError;

/// Interactive password prompt. Implementations may read from a
/// terminal, an environment variable, or a test stub.
pub trait PasswordPrompt {
    fn password(&self) -> Result<String, String>;
}

/// Where the sponsored-gas signing key comes from.
pub enum SigningKeySource {
    /// Hex secret key already held in the session.
    Raw(String),
    /// Password-protected key; the prompt is consulted on resolve.
    Encrypted(EncryptedKey),
}

impl SigningKeySource {
    /// Resolve to the hex secret key, prompting and decrypting if
    /// necessary. No length validation happens here — the swap path
    /// rejects short keys with its own sentinel before signing.
    pub fn resolve(&self, prompt: &dyn PasswordPrompt) -> Result<String, SwapError> {
        match self {
            SigningKeySource::Raw(secret) => Ok(secret.clone()),
            SigningKeySource::Encrypted(encrypted) => {
                let password = prompt.password().map_err(SwapError::Prompt)?;
                Ok(decrypt_private_key(encrypted, &password)?)
            }
        }
    }
}
