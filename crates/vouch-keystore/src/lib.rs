//! Key-store-backed credential resolution.
//!
//! A [`store::KeyStore`] maps entity aliases to tagged entries
//! (private-key-bearing, trusted-certificate-only, secret-key). The
//! [`resolver::KeyStoreCredentialResolver`] turns matching entries into
//! [`vouch_core::Credential`] values: absence and per-entity access faults
//! resolve to empty results, while malformed criteria and unsupported
//! entry shapes are errors.
//!
//! Two backends ship here: an in-memory store for tests and password-less
//! deployments, and (behind the `sqlite` feature) a persistent store whose
//! entries are sealed with AES-256-GCM under a password-derived key.

pub mod entry;
pub mod error;
pub mod in_memory;
pub mod resolver;
pub mod seal;
pub mod store;

#[cfg(feature = "sqlite")]
pub mod storage;

pub use entry::KeyStoreEntry;
pub use error::*;
pub use in_memory::MemoryKeyStore;
pub use resolver::KeyStoreCredentialResolver;
pub use store::KeyStore;

#[cfg(feature = "sqlite")]
pub use storage::SqliteKeyStore;
