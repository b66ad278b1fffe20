//! Payload encryption and request signing
//!
//! Request and response bodies travel as base64-encoded AES-GCM blobs
//! (`nonce || ciphertext+tag`, 12-byte random nonce, no associated data).
//! Each request additionally carries an HMAC-SHA256 signature bound to the
//! millisecond timestamp it was built at. The GCM tag check on responses is
//! the only tamper/corruption detector in the pipeline.

use crate::error::{ClientError, Result};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, AeadCore, OsRng};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt::Write as _;

type Aes192Gcm = AesGcm<Aes192, U12>;
type HmacSha256 = Hmac<Sha256>;

/// GCM nonce length in bytes, prepended to every ciphertext
pub const NONCE_LEN: usize = 12;

/// Encrypt `plaintext` with AES-GCM under `secret_key`
///
/// The key length selects the AES variant (16/24/32 bytes). Returns
/// base64 of `nonce || ciphertext+tag`.
pub fn encrypt(secret_key: &[u8], plaintext: &[u8]) -> Result<String> {
    match secret_key.len() {
        16 => seal::<Aes128Gcm>(secret_key, plaintext),
        24 => seal::<Aes192Gcm>(secret_key, plaintext),
        32 => seal::<Aes256Gcm>(secret_key, plaintext),
        n => Err(ClientError::InvalidKeyLength(n)),
    }
}

/// Decrypt a base64 `nonce || ciphertext+tag` blob produced by [`encrypt`]
///
/// Fails on malformed base64, a blob shorter than the nonce, or GCM tag
/// mismatch (wrong key or tampered data).
pub fn decrypt(secret_key: &[u8], body: &str) -> Result<Vec<u8>> {
    let data = BASE64
        .decode(body.trim())
        .map_err(|e| ClientError::Decryption(format!("invalid base64: {e}")))?;
    match secret_key.len() {
        16 => open::<Aes128Gcm>(secret_key, &data),
        24 => open::<Aes192Gcm>(secret_key, &data),
        32 => open::<Aes256Gcm>(secret_key, &data),
        n => Err(ClientError::InvalidKeyLength(n)),
    }
}

fn seal<C>(key: &[u8], plaintext: &[u8]) -> Result<String>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).map_err(|_| ClientError::InvalidKeyLength(key.len()))?;
    let nonce = C::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| ClientError::Encryption)?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(nonce.as_slice());
    blob.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(blob))
}

fn open<C>(key: &[u8], data: &[u8]) -> Result<Vec<u8>>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    if data.len() < NONCE_LEN {
        return Err(ClientError::Decryption("ciphertext too short".into()));
    }
    let cipher = C::new_from_slice(key).map_err(|_| ClientError::InvalidKeyLength(key.len()))?;
    let (nonce, ciphertext) = data.split_at(NONCE_LEN);
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| ClientError::Decryption("authentication failed".into()))
}

/// Compute the `maestro-authentication` header value
///
/// HMAC-SHA256 keyed by `secret_key + date` over
/// `"M3-POST:" + access_key + ":" + date`, where `date` is the millisecond
/// timestamp the request is built at. Each digest byte is rendered as
/// `byte | 0x100` in lowercase hex, a fixed 3-character token per byte.
/// This encoding is what the platform expects on the wire; it is not
/// standard hex.
pub fn generate_signature(secret_key: &str, access_key: &str, date: &str) -> String {
    // qualified: the in-scope KeyInit also has a new_from_slice for Hmac
    let mut mac = <HmacSha256 as Mac>::new_from_slice(format!("{secret_key}{date}").as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(format!("M3-POST:{access_key}:{date}").as_bytes());
    let digest = mac.finalize().into_bytes();

    let mut signature = String::with_capacity(digest.len() * 3);
    for byte in digest {
        let _ = write!(signature, "{:x}", u16::from(byte) | 0x100);
    }
    signature
}
