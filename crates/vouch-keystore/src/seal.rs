use crate::error::{KeyStoreError, KeyStoreResult};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce as AesNonce};
use hkdf::Hkdf;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

// Password sealing for persisted key store entries.
//
// Each entry is encrypted with AES-256-GCM under a key derived from the
// entry password via HKDF-SHA-256 with a per-entry random salt. A wrong
// password fails GCM authentication and surfaces as an access fault.

const SALT_SIZE: usize = 16;
const NONCE_SIZE: usize = 12; // AES-GCM standard nonce size

/// Sealed entry: salt + nonce + ciphertext (includes GCM tag).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedRecord {
    pub salt: [u8; SALT_SIZE],
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

fn derive_key(password: &str, salt: &[u8]) -> KeyStoreResult<Zeroizing<[u8; 32]>> {
    let hk = Hkdf::<Sha256>::new(Some(salt), password.as_bytes());
    let mut okm = Zeroizing::new([0u8; 32]);
    hk.expand(b"vouch-entry-sealing-key", &mut *okm)
        .map_err(|e| KeyStoreError::Crypto(format!("key derivation failed: {}", e)))?;
    Ok(okm)
}

pub fn seal(password: &str, plaintext: &[u8]) -> KeyStoreResult<SealedRecord> {
    let mut salt = [0u8; SALT_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut salt);

    let key = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&*key)
        .map_err(|e| KeyStoreError::Crypto(format!("cipher init failed: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = AesNonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| KeyStoreError::Crypto(format!("sealing failed: {}", e)))?;

    Ok(SealedRecord {
        salt,
        nonce: nonce_bytes,
        ciphertext,
    })
}

pub fn open(password: &str, record: &SealedRecord) -> KeyStoreResult<Zeroizing<Vec<u8>>> {
    let key = derive_key(password, &record.salt)?;
    let cipher = Aes256Gcm::new_from_slice(&*key)
        .map_err(|e| KeyStoreError::Crypto(format!("cipher init failed: {}", e)))?;

    let nonce = AesNonce::from_slice(&record.nonce);
    cipher
        .decrypt(nonce, record.ciphertext.as_ref())
        .map(Zeroizing::new)
        .map_err(|_| {
            KeyStoreError::Access("unable to open sealed entry (wrong password or corrupted data)".to_string())
        })
}
