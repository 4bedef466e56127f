//! Customer input encryption.
//!
//! Card data never leaves the device in the clear. The client API hands out
//! a public key ([`PublicKeyResponse`]); customer input is sealed to that key
//! and only the payment platform can open it.
//!
//! # Envelope Format
//!
//! ```text
//! BASE64URL(header) . BASE64URL(ephemeral public key) . BASE64URL(nonce) . BASE64URL(ciphertext + tag)
//! ```
//!
//! - header: `{"alg":"ECDH-ES+HKDF-SHA256","enc":"A256GCM","kid":"<key id>"}`,
//!   its encoded form is the AEAD associated data
//! - content key: HKDF-SHA256 over the X25519 shared secret, salted with the
//!   ephemeral and recipient public keys
//! - content encryption: AES-256-GCM with a random 96-bit nonce

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use hkdf::Hkdf;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};
use zeroize::Zeroizing;

/// Key agreement + derivation identifier carried in the header.
pub const ALGORITHM: &str = "ECDH-ES+HKDF-SHA256";

/// Content encryption identifier carried in the header.
pub const CONTENT_ENCRYPTION: &str = "A256GCM";

/// Size of an X25519 public key in bytes.
const KEY_SIZE: usize = 32;

/// Size of the nonce in bytes (96 bits for GCM).
const NONCE_SIZE: usize = 12;

const HKDF_INFO: &[u8] = b"cardkit customer input v1";

/// Encryption error types.
#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Encryption failed: {0}")]
    EncryptFailed(String),
    #[error("Decryption failed: {0}")]
    DecryptFailed(String),
    #[error("Invalid envelope format")]
    InvalidFormat,
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("Key agreement produced a non-contributory secret")]
    WeakKey,
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
}

/// Result type for encryption operations.
pub type EncryptionResult<T> = Result<T, EncryptionError>;

/// Public key served by the client API for encrypting customer input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    key_id: String,
    /// Base64 of the 32-byte X25519 public key.
    public_key: String,
}

impl PublicKeyResponse {
    pub fn new(key_id: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            public_key: public_key.into(),
        }
    }

    /// Build a response from raw key bytes.
    pub fn from_key_bytes(key_id: impl Into<String>, key: &[u8; KEY_SIZE]) -> Self {
        Self::new(key_id, STANDARD.encode(key))
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Decode the key material.
    pub fn decode_key(&self) -> EncryptionResult<[u8; KEY_SIZE]> {
        let bytes = STANDARD
            .decode(self.public_key.trim())
            .map_err(|e| EncryptionError::InvalidPublicKey(e.to_string()))?;
        bytes.try_into().map_err(|b: Vec<u8>| {
            EncryptionError::InvalidPublicKey(format!(
                "expected {} bytes, got {}",
                KEY_SIZE,
                b.len()
            ))
        })
    }
}

#[derive(Serialize, Deserialize)]
struct EnvelopeHeader {
    alg: String,
    enc: String,
    kid: String,
}

/// Seals customer input to a [`PublicKeyResponse`].
///
/// # Example
///
/// ```ignore
/// use cardkit_lib::encryption::{CustomerInputEncryptor, PublicKeyResponse};
///
/// let key = session.public_key().await?;
/// let encryptor = CustomerInputEncryptor::new(&key)?;
/// let envelope = encryptor.encrypt(br#"{"paymentValues":[]}"#)?;
/// ```
#[derive(Clone)]
pub struct CustomerInputEncryptor {
    key_id: String,
    recipient: PublicKey,
}

impl CustomerInputEncryptor {
    /// Create an encryptor for the given public key.
    pub fn new(key: &PublicKeyResponse) -> EncryptionResult<Self> {
        Ok(Self {
            key_id: key.key_id.clone(),
            recipient: PublicKey::from(key.decode_key()?),
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Encrypt `plaintext` into a compact envelope.
    ///
    /// Every call uses a fresh ephemeral key and nonce.
    pub fn encrypt(&self, plaintext: &[u8]) -> EncryptionResult<String> {
        let header = EnvelopeHeader {
            alg: ALGORITHM.to_string(),
            enc: CONTENT_ENCRYPTION.to_string(),
            kid: self.key_id.clone(),
        };
        let header_json = serde_json::to_vec(&header)
            .map_err(|e| EncryptionError::EncryptFailed(e.to_string()))?;
        let header_b64 = URL_SAFE_NO_PAD.encode(header_json);

        let ephemeral = EphemeralSecret::random_from_rng(OsRng);
        let ephemeral_public = PublicKey::from(&ephemeral);
        let shared = ephemeral.diffie_hellman(&self.recipient);
        if !shared.was_contributory() {
            return Err(EncryptionError::WeakKey);
        }
        let key = derive_key(shared.as_bytes(), &ephemeral_public, &self.recipient)?;

        let cipher = Aes256Gcm::new_from_slice(&key[..])
            .map_err(|e| EncryptionError::EncryptFailed(e.to_string()))?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(
                nonce,
                Payload {
                    msg: plaintext,
                    aad: header_b64.as_bytes(),
                },
            )
            .map_err(|e| EncryptionError::EncryptFailed(e.to_string()))?;

        Ok(format!(
            "{}.{}.{}.{}",
            header_b64,
            URL_SAFE_NO_PAD.encode(ephemeral_public.as_bytes()),
            URL_SAFE_NO_PAD.encode(nonce_bytes),
            URL_SAFE_NO_PAD.encode(ciphertext)
        ))
    }
}

/// Open an envelope with the recipient's secret key.
///
/// This is the payment platform's side of the exchange; the SDK uses it for
/// verifying its own output.
pub fn open_envelope(secret: &StaticSecret, envelope: &str) -> EncryptionResult<Vec<u8>> {
    let parts: Vec<&str> = envelope.split('.').collect();
    let [header_b64, epk_b64, nonce_b64, ciphertext_b64] = parts[..] else {
        return Err(EncryptionError::InvalidFormat);
    };

    let decode = |segment: &str| {
        URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|_| EncryptionError::InvalidFormat)
    };

    let header: EnvelopeHeader =
        serde_json::from_slice(&decode(header_b64)?).map_err(|_| EncryptionError::InvalidFormat)?;
    if header.alg != ALGORITHM {
        return Err(EncryptionError::UnsupportedAlgorithm(header.alg));
    }
    if header.enc != CONTENT_ENCRYPTION {
        return Err(EncryptionError::UnsupportedAlgorithm(header.enc));
    }

    let epk: [u8; KEY_SIZE] = decode(epk_b64)?
        .try_into()
        .map_err(|_| EncryptionError::InvalidFormat)?;
    let nonce_bytes = decode(nonce_b64)?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(EncryptionError::InvalidFormat);
    }
    let ciphertext = decode(ciphertext_b64)?;

    let ephemeral_public = PublicKey::from(epk);
    let recipient = PublicKey::from(secret);
    let shared = secret.diffie_hellman(&ephemeral_public);
    if !shared.was_contributory() {
        return Err(EncryptionError::WeakKey);
    }
    let key = derive_key(shared.as_bytes(), &ephemeral_public, &recipient)?;

    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| EncryptionError::DecryptFailed(e.to_string()))?;
    cipher
        .decrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: &ciphertext,
                aad: header_b64.as_bytes(),
            },
        )
        .map_err(|e| EncryptionError::DecryptFailed(e.to_string()))
}

/// Key id named in an envelope's header, without decrypting it.
pub fn envelope_key_id(envelope: &str) -> EncryptionResult<String> {
    let header_b64 = envelope.split('.').next().unwrap_or_default();
    let header_json = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|_| EncryptionError::InvalidFormat)?;
    let header: EnvelopeHeader =
        serde_json::from_slice(&header_json).map_err(|_| EncryptionError::InvalidFormat)?;
    Ok(header.kid)
}

fn derive_key(
    shared_secret: &[u8; KEY_SIZE],
    ephemeral: &PublicKey,
    recipient: &PublicKey,
) -> EncryptionResult<Zeroizing<[u8; 32]>> {
    let mut salt = [0u8; KEY_SIZE * 2];
    salt[..KEY_SIZE].copy_from_slice(ephemeral.as_bytes());
    salt[KEY_SIZE..].copy_from_slice(recipient.as_bytes());

    let hk = Hkdf::<Sha256>::new(Some(&salt[..]), shared_secret);
    let mut key = Zeroizing::new([0u8; 32]);
    hk.expand(HKDF_INFO, &mut key[..])
        .map_err(|e| EncryptionError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypair(seed: u8) -> (StaticSecret, PublicKeyResponse) {
        let secret = StaticSecret::from([seed; 32]);
        let public = PublicKey::from(&secret);
        let response = PublicKeyResponse::from_key_bytes(format!("key-{seed}"), public.as_bytes());
        (secret, response)
    }

    #[test]
    fn test_public_key_response_json() {
        let (_, key) = keypair(7);
        let json = serde_json::to_string(&key).unwrap();
        assert!(json.contains("\"keyId\":\"key-7\""));
        assert!(json.contains("\"publicKey\""));
        let decoded: PublicKeyResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.key_id(), key.key_id());
        assert_eq!(decoded.public_key(), key.public_key());
    }

    #[test]
    fn test_decode_key_rejects_bad_material() {
        assert!(matches!(
            PublicKeyResponse::new("k", "not base64!").decode_key(),
            Err(EncryptionError::InvalidPublicKey(_))
        ));
        assert!(matches!(
            PublicKeyResponse::new("k", STANDARD.encode([1u8; 16])).decode_key(),
            Err(EncryptionError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn test_encrypt_then_open() {
        let (secret, key) = keypair(7);
        let encryptor = CustomerInputEncryptor::new(&key).unwrap();
        let envelope = encryptor.encrypt(b"card data").unwrap();

        assert_eq!(envelope.split('.').count(), 4);
        assert_eq!(envelope_key_id(&envelope).unwrap(), "key-7");
        assert_eq!(open_envelope(&secret, &envelope).unwrap(), b"card data");
    }

    #[test]
    fn test_envelopes_are_randomized() {
        let (_, key) = keypair(7);
        let encryptor = CustomerInputEncryptor::new(&key).unwrap();
        let a = encryptor.encrypt(b"same").unwrap();
        let b = encryptor.encrypt(b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let (_, key) = keypair(7);
        let (other, _) = keypair(9);
        let envelope = CustomerInputEncryptor::new(&key)
            .unwrap()
            .encrypt(b"card data")
            .unwrap();
        assert!(matches!(
            open_envelope(&other, &envelope),
            Err(EncryptionError::DecryptFailed(_))
        ));
    }

    #[test]
    fn test_tampered_header_fails() {
        let (secret, key) = keypair(7);
        let envelope = CustomerInputEncryptor::new(&key)
            .unwrap()
            .encrypt(b"card data")
            .unwrap();
        let forged_header = URL_SAFE_NO_PAD
            .encode(br#"{"alg":"ECDH-ES+HKDF-SHA256","enc":"A256GCM","kid":"other"}"#);
        let rest = envelope.split_once('.').unwrap().1;
        let forged = format!("{forged_header}.{rest}");
        assert!(open_envelope(&secret, &forged).is_err());
    }

    #[test]
    fn test_malformed_envelope() {
        let (secret, _) = keypair(7);
        assert!(matches!(
            open_envelope(&secret, "a.b.c"),
            Err(EncryptionError::InvalidFormat)
        ));
        assert!(matches!(
            open_envelope(&secret, "!!.b.c.d"),
            Err(EncryptionError::InvalidFormat)
        ));
    }
}
