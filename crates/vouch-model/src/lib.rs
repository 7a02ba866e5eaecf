//! Object-model support for the vouch stack: qualified names, the
//! index-maintaining children container used by composite elements, and
//! the key-description (`KeyInfo`) structure built on top of it.

pub mod error;
pub mod indexed;
pub mod key_info;
pub mod qname;

pub use error::*;
pub use indexed::*;
pub use key_info::*;
pub use qname::*;
