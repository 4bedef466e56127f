//! Key pair able to open customer input envelopes.

use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};

use crate::encryption::{open_envelope, EncryptionResult, PublicKeyResponse};

/// The platform side of the envelope exchange.
pub struct TestKeyPair {
    secret: StaticSecret,
    public_key: PublicKeyResponse,
}

impl TestKeyPair {
    /// Random key pair published under `key_id`.
    pub fn generate(key_id: &str) -> Self {
        Self::from_secret(key_id, StaticSecret::random_from_rng(OsRng))
    }

    /// Deterministic key pair, for fixtures that must not change between runs.
    pub fn from_seed(key_id: &str, seed: [u8; 32]) -> Self {
        Self::from_secret(key_id, StaticSecret::from(seed))
    }

    fn from_secret(key_id: &str, secret: StaticSecret) -> Self {
        let public = PublicKey::from(&secret);
        Self {
            public_key: PublicKeyResponse::from_key_bytes(key_id, public.as_bytes()),
            secret,
        }
    }

    /// What the client API's `crypto/publickey` endpoint would return.
    pub fn public_key(&self) -> &PublicKeyResponse {
        &self.public_key
    }

    pub fn secret(&self) -> &StaticSecret {
        &self.secret
    }

    /// Decrypt an envelope sealed to this key pair.
    pub fn open(&self, envelope: &str) -> EncryptionResult<Vec<u8>> {
        open_envelope(&self.secret, envelope)
    }
}
