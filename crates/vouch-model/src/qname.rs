use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// QName — qualified name used as both classification axes of the indexed
// children container: the structural element kind and the declared schema
// type of an element.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QName {
    pub namespace_uri: String,
    pub local_name: String,
}

impl QName {
    pub fn new(namespace_uri: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            local_name: local_name.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace_uri, self.local_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let name = QName::new("urn:example:ns", "KeyName");
        assert_eq!(name.to_string(), "{urn:example:ns}KeyName");
    }

    #[test]
    fn test_equality_covers_both_parts() {
        let a = QName::new("urn:a", "Name");
        let b = QName::new("urn:b", "Name");
        let c = QName::new("urn:a", "Other");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, QName::new("urn:a", "Name"));
    }
}
