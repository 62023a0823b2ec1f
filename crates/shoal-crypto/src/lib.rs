// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SHOAL - CRYPTOGRAPHY MODULE
//
// Ed25519 command signing for the Pact-style exec API.
// - Key generation and reconstruction from a 64-char hex secret
// - Blake2b-256 command hashing and base64url request keys
// - Signing account derivation ("k:" + public key)
// - Private key encryption at rest via age (scrypt-based)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use age::{Decryptor, Encryptor};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use blake2::Blake2b;
use digest::consts::U32;
use digest::Digest;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use zeroize::Zeroize;

/// Blake2b with 256-bit output — the chain's command hash function.
type Blake2b256 = Blake2b<U32>;

/// Length of a hex-encoded Ed25519 secret key (32 bytes).
/// A decrypted signing key of any other length is rejected before use.
pub const SECRET_KEY_HEX_LEN: usize = 64;

#[derive(Debug)]
pub enum CryptoError {
    InvalidKey,
    InvalidSignature,
    VerificationFailed,
    EncryptionFailed(String),
    DecryptionFailed(String),
    InvalidPassword,
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CryptoError::InvalidKey => write!(f, "Invalid key format"),
            CryptoError::InvalidSignature => write!(f, "Invalid signature format"),
            CryptoError::VerificationFailed => write!(f, "Signature verification failed"),
            CryptoError::EncryptionFailed(msg) => write!(f, "Encryption failed: {}", msg),
            CryptoError::DecryptionFailed(msg) => write!(f, "Decryption failed: {}", msg),
            CryptoError::InvalidPassword => write!(f, "Invalid password"),
        }
    }
}

impl std::error::Error for CryptoError {}

/// Ed25519 keypair, both halves hex-encoded.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct KeyPair {
    pub public_key: String,
    pub secret_key: String,
}

/// SECURITY: Zeroize secret key from memory on drop to prevent
/// recovery via memory dump, swap file, or core dump.
impl Drop for KeyPair {
    fn drop(&mut self) {
        self.secret_key.zeroize();
    }
}

/// Encrypted key structure with metadata
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EncryptedKey {
    /// age ciphertext of the hex-encoded secret key
    pub ciphertext: Vec<u8>,
    /// Encryption version (for future upgrades)
    pub version: u32,
    /// Public key hex (not encrypted)
    pub public_key: String,
}

/// Generate a new Ed25519 keypair from the OS RNG.
pub fn generate_keypair() -> KeyPair {
    let mut seed = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut seed);
    let signing = SigningKey::from_bytes(&seed);
    let keypair = KeyPair {
        public_key: hex::encode(signing.verifying_key().as_bytes()),
        secret_key: hex::encode(seed),
    };
    seed.zeroize();
    keypair
}

/// Reconstruct a KeyPair from a 64-char hex secret key.
/// The public half is re-derived, so a corrupted secret cannot pair
/// with a stale public key.
pub fn keypair_from_secret(secret_hex: &str) -> Result<KeyPair, CryptoError> {
    let seed = decode_secret(secret_hex)?;
    let signing = SigningKey::from_bytes(&seed);
    Ok(KeyPair {
        public_key: hex::encode(signing.verifying_key().as_bytes()),
        secret_key: secret_hex.to_string(),
    })
}

fn decode_secret(secret_hex: &str) -> Result<[u8; 32], CryptoError> {
    if secret_hex.len() != SECRET_KEY_HEX_LEN {
        return Err(CryptoError::InvalidKey);
    }
    let bytes = hex::decode(secret_hex).map_err(|_| CryptoError::InvalidKey)?;
    bytes.try_into().map_err(|_| CryptoError::InvalidKey)
}

/// Signing account for a public key: `k:<public key hex>`.
pub fn account_for(public_key_hex: &str) -> String {
    format!("k:{}", public_key_hex)
}

/// Blake2b-256 hash of the canonical command JSON string.
pub fn command_hash(cmd: &str) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(cmd.as_bytes());
    hasher.finalize().into()
}

/// Request key for a command: unpadded base64url of its Blake2b-256 hash.
/// This is the identifier the node hands back from `/api/v1/send`.
pub fn request_key(cmd: &str) -> String {
    URL_SAFE_NO_PAD.encode(command_hash(cmd))
}

/// A command signature: the request key plus the hex Ed25519 signature
/// over the hash bytes.
#[derive(Debug, Clone)]
pub struct CommandSig {
    pub request_key: String,
    pub sig: String,
}

/// Sign a canonical command string. The signature covers the Blake2b-256
/// hash bytes, not the raw JSON.
pub fn sign_command(cmd: &str, secret_hex: &str) -> Result<CommandSig, CryptoError> {
    let seed = decode_secret(secret_hex)?;
    let signing = SigningKey::from_bytes(&seed);
    let hash = command_hash(cmd);
    let signature = signing.sign(&hash);
    Ok(CommandSig {
        request_key: URL_SAFE_NO_PAD.encode(hash),
        sig: hex::encode(signature.to_bytes()),
    })
}

/// Verify a hex signature over a command string against a hex public key.
pub fn verify_command(cmd: &str, sig_hex: &str, public_key_hex: &str) -> Result<(), CryptoError> {
    let pk_bytes: [u8; 32] = hex::decode(public_key_hex)
        .map_err(|_| CryptoError::InvalidKey)?
        .try_into()
        .map_err(|_| CryptoError::InvalidKey)?;
    let vk = VerifyingKey::from_bytes(&pk_bytes).map_err(|_| CryptoError::InvalidKey)?;
    let sig_bytes = hex::decode(sig_hex).map_err(|_| CryptoError::InvalidSignature)?;
    let sig = Signature::from_slice(&sig_bytes).map_err(|_| CryptoError::InvalidSignature)?;
    vk.verify(&command_hash(cmd), &sig)
        .map_err(|_| CryptoError::VerificationFailed)
}

// ─────────────────────────────────────────────────────────────────
// KEY ENCRYPTION — password-protected key files
// ─────────────────────────────────────────────────────────────────

/// Encrypt a hex secret key with a password using age encryption.
///
/// Security: uses age's built-in scrypt key derivation.
/// The `public_key` field is left empty for the caller to fill.
pub fn encrypt_private_key(secret_hex: &str, password: &str) -> Result<EncryptedKey, CryptoError> {
    let password_secret = Secret::new(password.to_string());
    let encryptor = Encryptor::with_user_passphrase(password_secret);

    let mut encrypted_output = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut encrypted_output)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    writer
        .write_all(secret_hex.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok(EncryptedKey {
        ciphertext: encrypted_output,
        version: 1,
        public_key: String::new(),
    })
}

/// Decrypt a password-protected key. Returns the hex secret key string.
/// Length validation is the caller's concern — a swap attempt rejects
/// anything that is not [`SECRET_KEY_HEX_LEN`] chars before signing.
pub fn decrypt_private_key(
    encrypted_key: &EncryptedKey,
    password: &str,
) -> Result<String, CryptoError> {
    let password_secret = Secret::new(password.to_string());

    let decryptor = match Decryptor::new(&encrypted_key.ciphertext[..]) {
        Ok(Decryptor::Passphrase(d)) => d,
        Ok(_) => {
            return Err(CryptoError::DecryptionFailed(
                "Expected passphrase encryption".to_string(),
            ))
        }
        Err(e) => return Err(CryptoError::DecryptionFailed(e.to_string())),
    };

    let mut reader = decryptor
        .decrypt(&password_secret, None)
        .map_err(|e| match e {
            age::DecryptError::DecryptionFailed => CryptoError::InvalidPassword,
            _ => CryptoError::DecryptionFailed(e.to_string()),
        })?;

    let mut decrypted = Vec::new();
    reader
        .read_to_end(&mut decrypted)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

    String::from_utf8(decrypted).map_err(|_| CryptoError::InvalidKey)
}

/// Generate a fresh keypair and encrypt its secret under `password`.
/// The returned structure carries the public key in the clear.
pub fn generate_encrypted_keypair(password: &str) -> Result<EncryptedKey, CryptoError> {
    let keypair = generate_keypair();
    let mut encrypted = encrypt_private_key(&keypair.secret_key, password)?;
    encrypted.public_key = keypair.public_key.clone();
    Ok(encrypted)
}
