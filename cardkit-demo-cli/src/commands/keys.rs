//! Key commands - stand in for the payment platform in offline demos
//!
//! `keygen` creates the key pair the platform would hold, `decrypt` opens
//! what `encrypt` produced.

use anyhow::{anyhow, Context, Result};
use cardkit_lib::encryption::{envelope_key_id, open_envelope, PublicKeyResponse};
use rand::rngs::OsRng;
use std::path::{Path, PathBuf};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::ui;

pub const PUBLIC_KEY_FILE: &str = "public-key.json";
pub const SECRET_KEY_FILE: &str = "secret.key";

/// Generate a key pair into `out_dir`, returning the public key file path.
pub fn generate(out_dir: &Path, key_id: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let secret = StaticSecret::random_from_rng(OsRng);
    let public = PublicKeyResponse::from_key_bytes(key_id, PublicKey::from(&secret).as_bytes());

    let secret_hex = Zeroizing::new(hex::encode(secret.to_bytes()));
    std::fs::write(out_dir.join(SECRET_KEY_FILE), secret_hex.as_bytes())?;

    let public_path = out_dir.join(PUBLIC_KEY_FILE);
    std::fs::write(&public_path, serde_json::to_string_pretty(&public)?)?;
    tracing::debug!(key_id, path = %public_path.display(), "wrote key pair");
    Ok(public_path)
}

/// Read a secret key written by [`generate`].
pub fn load_secret(path: &Path) -> Result<StaticSecret> {
    let text = Zeroizing::new(
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
    );
    let bytes = Zeroizing::new(hex::decode(text.trim()).context("Secret key is not hex")?);
    let bytes: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("Secret key must be 32 bytes, got {}", bytes.len()))?;
    Ok(StaticSecret::from(bytes))
}

pub fn keygen(out_dir: &Path, key_id: &str) -> Result<()> {
    let public_path = generate(out_dir, key_id)?;
    ui::success(&format!("Generated key pair '{}'", key_id));
    ui::key_value("Public key", &public_path.display().to_string());
    ui::key_value(
        "Secret key",
        &out_dir.join(SECRET_KEY_FILE).display().to_string(),
    );
    Ok(())
}

pub fn decrypt(secret_path: &Path, envelope: &str, json: bool) -> Result<()> {
    let secret = load_secret(secret_path)?;
    let key_id = envelope_key_id(envelope)?;
    let plaintext = Zeroizing::new(open_envelope(&secret, envelope)?);

    match serde_json::from_slice::<serde_json::Value>(&plaintext) {
        Ok(value) if json => ui::json(&value),
        Ok(value) => {
            ui::header(&format!("Customer input (key {})", key_id));
            ui::json(&value);
        }
        Err(_) => println!("{}", String::from_utf8_lossy(&plaintext)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardkit_lib::encryption::CustomerInputEncryptor;

    #[test]
    fn test_generate_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let public_path = generate(dir.path(), "demo").unwrap();

        let public: PublicKeyResponse =
            serde_json::from_str(&std::fs::read_to_string(public_path).unwrap()).unwrap();
        assert_eq!(public.key_id(), "demo");

        let envelope = CustomerInputEncryptor::new(&public)
            .unwrap()
            .encrypt(b"hello")
            .unwrap();
        let secret = load_secret(&dir.path().join(SECRET_KEY_FILE)).unwrap();
        assert_eq!(open_envelope(&secret, &envelope).unwrap(), b"hello");
    }

    #[test]
    fn test_load_secret_rejects_short_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SECRET_KEY_FILE);
        std::fs::write(&path, "abcd").unwrap();
        assert!(load_secret(&path).is_err());
    }
}
