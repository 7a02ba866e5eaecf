//! Core value types and contracts for the vouch credential-resolution
//! stack: resolved credentials, typed resolution criteria, the resolver
//! contract, and the PKIX trust-data carrier handed to an external
//! path validator.
//!
//! Key material held here is either public (freely cloneable and
//! serializable) or sensitive (private/secret keys: zeroized on drop,
//! redacted in Debug output, never serializable). Resolvers construct
//! fresh `Credential` values per call and keep no cache, so ownership of
//! sensitive material transfers cleanly to the caller.

pub mod credential;
pub mod criteria;
pub mod error;
pub mod pkix;
pub mod traits;
pub mod types;

pub use credential::*;
pub use criteria::*;
pub use error::*;
pub use pkix::*;
pub use traits::*;
pub use types::*;
