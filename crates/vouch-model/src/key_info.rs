use crate::error::ModelError;
use crate::indexed::{IndexedChildren, KeyedElement};
use crate::qname::QName;
use vouch_core::{Certificate, Crl, PublicKey, VouchResult};

// ---------------------------------------------------------------------------
// KeyInfo — composite key-description structure.
//
// Children live in an IndexedChildren container, so keyed sublists
// (all key names, all certificates) are index lookups rather than scans.
// ---------------------------------------------------------------------------

/// Qualified names of the key-description vocabulary.
pub mod names {
    use super::QName;

    pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

    pub fn key_name() -> QName {
        QName::new(XMLDSIG_NS, "KeyName")
    }

    pub fn key_value() -> QName {
        QName::new(XMLDSIG_NS, "KeyValue")
    }

    pub fn x509_certificate() -> QName {
        QName::new(XMLDSIG_NS, "X509Certificate")
    }

    pub fn x509_crl() -> QName {
        QName::new(XMLDSIG_NS, "X509CRL")
    }
}

/// One child of a key-description structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInfoNode {
    /// Human-readable key name.
    KeyName(String),
    /// Inline public key material.
    KeyValue(PublicKey),
    /// An X.509 certificate carried inline.
    X509Certificate(Certificate),
    /// A CRL carried inline.
    X509Crl(Crl),
    /// Extension content this model does not interpret, retained verbatim.
    Unparsed { kind: QName, content: String },
}

impl KeyedElement for KeyInfoNode {
    fn element_kind(&self) -> QName {
        match self {
            KeyInfoNode::KeyName(_) => names::key_name(),
            KeyInfoNode::KeyValue(_) => names::key_value(),
            KeyInfoNode::X509Certificate(_) => names::x509_certificate(),
            KeyInfoNode::X509Crl(_) => names::x509_crl(),
            KeyInfoNode::Unparsed { kind, .. } => kind.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct KeyInfo {
    id: Option<String>,
    children: IndexedChildren<KeyInfoNode>,
}

impl KeyInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            children: IndexedChildren::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn push(&mut self, node: KeyInfoNode) {
        self.children.push(node);
    }

    pub fn children(&self) -> &IndexedChildren<KeyInfoNode> {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut IndexedChildren<KeyInfoNode> {
        &mut self.children
    }

    /// Declared key names in document order, duplicates preserved.
    pub fn key_names(&self) -> Vec<&str> {
        self.children
            .by_element_kind(&names::key_name())
            .iter()
            .filter_map(|node| match node {
                KeyInfoNode::KeyName(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Inline key values in document order.
    pub fn key_values(&self) -> Vec<&PublicKey> {
        self.children
            .by_element_kind(&names::key_value())
            .iter()
            .filter_map(|node| match node {
                KeyInfoNode::KeyValue(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    /// Inline certificates in document order.
    pub fn certificates(&self) -> Vec<&Certificate> {
        self.children
            .by_element_kind(&names::x509_certificate())
            .iter()
            .filter_map(|node| match node {
                KeyInfoNode::X509Certificate(cert) => Some(cert),
                _ => None,
            })
            .collect()
    }

    /// Inline CRLs in document order.
    pub fn crls(&self) -> Vec<&Crl> {
        self.children
            .by_element_kind(&names::x509_crl())
            .iter()
            .filter_map(|node| match node {
                KeyInfoNode::X509Crl(crl) => Some(crl),
                _ => None,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// KeyInfoResolver — extracting key material from a key description
// ---------------------------------------------------------------------------

/// Extracts keys and key names from a [`KeyInfo`].
///
/// A well-formed structure yielding no keys or names resolves to an empty
/// result; only a structure the implementation cannot interpret at all is
/// an error.
pub trait KeyInfoResolver: Send + Sync {
    type Key;

    /// The primary key of the structure. When several keys are present the
    /// tie-break is implementation-defined and must be documented.
    fn resolve_key(&self, key_info: &KeyInfo) -> VouchResult<Option<Self::Key>>;

    /// Every key the structure yields, in the order encountered.
    fn resolve_keys(&self, key_info: &KeyInfo) -> VouchResult<Vec<Self::Key>>;

    /// Every declared key name, in order, duplicates preserved.
    fn resolve_key_names(&self, key_info: &KeyInfo) -> Vec<String>;
}

/// Resolves inline key material: `KeyValue` nodes directly, plus the
/// subject public key of each inline `X509Certificate`.
///
/// Primary-key tie-break: the first key in document order, whichever node
/// kind it came from.
#[derive(Debug, Default)]
pub struct InlineKeyInfoResolver;

impl InlineKeyInfoResolver {
    pub fn new() -> Self {
        Self
    }
}

impl KeyInfoResolver for InlineKeyInfoResolver {
    type Key = PublicKey;

    fn resolve_key(&self, key_info: &KeyInfo) -> VouchResult<Option<PublicKey>> {
        Ok(self.resolve_keys(key_info)?.into_iter().next())
    }

    fn resolve_keys(&self, key_info: &KeyInfo) -> VouchResult<Vec<PublicKey>> {
        let children = key_info.children();
        if !children.is_empty()
            && children
                .iter()
                .all(|node| matches!(node, KeyInfoNode::Unparsed { .. }))
        {
            return Err(ModelError::Uninterpretable(
                "key description contains only unrecognized content".to_string(),
            )
            .into());
        }

        let keys = children
            .iter()
            .filter_map(|node| match node {
                KeyInfoNode::KeyValue(key) => Some(key.clone()),
                KeyInfoNode::X509Certificate(cert) => Some(cert.public_key.clone()),
                _ => None,
            })
            .collect();
        Ok(keys)
    }

    fn resolve_key_names(&self, key_info: &KeyInfo) -> Vec<String> {
        key_info
            .key_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
