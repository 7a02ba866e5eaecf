use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

// ---------------------------------------------------------------------------
// Timestamp — canonical time representation (seconds + nanoseconds)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds_since_epoch: u64,
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn now() -> Self {
        let now = chrono::Utc::now();
        Self {
            seconds_since_epoch: now.timestamp() as u64,
            nanoseconds: now.timestamp_subsec_nanos(),
        }
    }

    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            seconds_since_epoch: seconds,
            nanoseconds: 0,
        }
    }

    pub fn to_rfc3339(&self) -> String {
        let dt =
            chrono::DateTime::from_timestamp(self.seconds_since_epoch as i64, self.nanoseconds);
        dt.map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "invalid".to_string())
    }

    pub fn is_past(&self) -> bool {
        *self < Self::now()
    }
}

// ---------------------------------------------------------------------------
// EntityId — identifier of the entity owning a credential or store entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// UsageType — intended use of a key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageType {
    Signing,
    Encryption,
    #[default]
    Unspecified,
}

impl fmt::Display for UsageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageType::Signing => write!(f, "signing"),
            UsageType::Encryption => write!(f, "encryption"),
            UsageType::Unspecified => write!(f, "unspecified"),
        }
    }
}

// ---------------------------------------------------------------------------
// KeyAlgorithm — algorithm tag carried alongside raw key bytes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    Ed25519,
    Rsa,
    EcdsaP256,
    Aes128,
    Aes256,
    HmacSha256,
}

impl KeyAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAlgorithm::Ed25519 => "ed25519",
            KeyAlgorithm::Rsa => "rsa",
            KeyAlgorithm::EcdsaP256 => "ecdsa-p256",
            KeyAlgorithm::Aes128 => "aes-128",
            KeyAlgorithm::Aes256 => "aes-256",
            KeyAlgorithm::HmacSha256 => "hmac-sha256",
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PublicKey — algorithm-tagged public key bytes (SubjectPublicKeyInfo or raw)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub algorithm: KeyAlgorithm,
    pub bytes: Vec<u8>,
}

impl PublicKey {
    pub fn new(algorithm: KeyAlgorithm, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            bytes: bytes.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PrivateKey — sensitive. Zeroized on drop, redacted Debug, no serde.
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PrivateKey {
    algorithm: KeyAlgorithm,
    bytes: Zeroizing<Vec<u8>>,
}

impl PrivateKey {
    pub fn new(algorithm: KeyAlgorithm, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            bytes: Zeroizing::new(bytes.into()),
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({}, <redacted>)", self.algorithm)
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm
            && bool::from(self.bytes.as_slice().ct_eq(other.bytes.as_slice()))
    }
}

impl Eq for PrivateKey {}

// ---------------------------------------------------------------------------
// SecretKey — sensitive symmetric key, same handling as PrivateKey
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SecretKey {
    algorithm: KeyAlgorithm,
    bytes: Zeroizing<Vec<u8>>,
}

impl SecretKey {
    pub fn new(algorithm: KeyAlgorithm, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            bytes: Zeroizing::new(bytes.into()),
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({}, <redacted>)", self.algorithm)
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm
            && bool::from(self.bytes.as_slice().ct_eq(other.bytes.as_slice()))
    }
}

impl Eq for SecretKey {}

// ---------------------------------------------------------------------------
// Certificate — pre-parsed metadata plus the opaque DER encoding.
//
// This core never parses ASN.1; whoever loads a certificate into a store
// supplies the subject, issuer, public key and validity alongside the DER.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub subject: String,
    pub issuer: String,
    pub public_key: PublicKey,
    pub not_after: Timestamp,
    pub der: Vec<u8>,
}

impl Certificate {
    pub fn new(
        subject: impl Into<String>,
        issuer: impl Into<String>,
        public_key: PublicKey,
        not_after: Timestamp,
        der: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            subject: subject.into(),
            issuer: issuer.into(),
            public_key,
            not_after,
            der: der.into(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.not_after.is_past()
    }
}

// ---------------------------------------------------------------------------
// Crl — certificate revocation list, opaque DER plus issue metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crl {
    pub issuer: String,
    pub this_update: Timestamp,
    pub der: Vec<u8>,
}

impl Crl {
    pub fn new(
        issuer: impl Into<String>,
        this_update: Timestamp,
        der: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            this_update,
            der: der.into(),
        }
    }
}
