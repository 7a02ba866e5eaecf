use crate::error::{VouchError, VouchResult};
use crate::types::{Certificate, EntityId, KeyAlgorithm, PrivateKey, PublicKey, SecretKey, UsageType};

// ---------------------------------------------------------------------------
// Credential — the resolved-key value object.
//
// Constructed fresh per resolution call. Resolvers never cache or reuse
// instances, so the caller takes exclusive ownership of any sensitive key
// material, and drop zeroizes it.
// ---------------------------------------------------------------------------

/// Cryptographic material resolved for one entity and usage.
///
/// Invariants (enforced by [`CredentialBuilder::build`]):
/// - at least one of public / private / secret key is present;
/// - if a primary certificate is present, the public key equals the
///   certificate's public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    entity_id: EntityId,
    usage_type: UsageType,
    public_key: Option<PublicKey>,
    private_key: Option<PrivateKey>,
    secret_key: Option<SecretKey>,
    certificate: Option<Certificate>,
    certificate_chain: Vec<Certificate>,
}

impl Credential {
    pub fn builder(entity_id: impl Into<EntityId>) -> CredentialBuilder {
        CredentialBuilder {
            entity_id: entity_id.into(),
            usage_type: UsageType::Unspecified,
            public_key: None,
            private_key: None,
            secret_key: None,
            certificate: None,
            certificate_chain: Vec::new(),
        }
    }

    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    pub fn usage_type(&self) -> UsageType {
        self.usage_type
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        self.public_key.as_ref()
    }

    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.private_key.as_ref()
    }

    pub fn secret_key(&self) -> Option<&SecretKey> {
        self.secret_key.as_ref()
    }

    /// The entity's primary certificate, when the backing store supplied one.
    pub fn certificate(&self) -> Option<&Certificate> {
        self.certificate.as_ref()
    }

    /// Leaf-first certificate chain; empty when no certificate was supplied.
    pub fn certificate_chain(&self) -> &[Certificate] {
        &self.certificate_chain
    }

    /// Algorithm of the strongest key slot present, public first.
    pub fn key_algorithm(&self) -> Option<KeyAlgorithm> {
        self.public_key
            .as_ref()
            .map(|k| k.algorithm)
            .or_else(|| self.private_key.as_ref().map(|k| k.algorithm()))
            .or_else(|| self.secret_key.as_ref().map(|k| k.algorithm()))
    }
}

// ---------------------------------------------------------------------------
// CredentialBuilder
// ---------------------------------------------------------------------------

pub struct CredentialBuilder {
    entity_id: EntityId,
    usage_type: UsageType,
    public_key: Option<PublicKey>,
    private_key: Option<PrivateKey>,
    secret_key: Option<SecretKey>,
    certificate: Option<Certificate>,
    certificate_chain: Vec<Certificate>,
}

impl CredentialBuilder {
    pub fn usage(mut self, usage: UsageType) -> Self {
        self.usage_type = usage;
        self
    }

    pub fn public_key(mut self, key: PublicKey) -> Self {
        self.public_key = Some(key);
        self
    }

    pub fn private_key(mut self, key: PrivateKey) -> Self {
        self.private_key = Some(key);
        self
    }

    pub fn secret_key(mut self, key: SecretKey) -> Self {
        self.secret_key = Some(key);
        self
    }

    /// Sets the primary certificate. The public key is taken from the
    /// certificate at build time if not set explicitly.
    pub fn certificate(mut self, certificate: Certificate) -> Self {
        self.certificate = Some(certificate);
        self
    }

    /// Sets the leaf-first certificate chain.
    pub fn certificate_chain(mut self, chain: Vec<Certificate>) -> Self {
        self.certificate_chain = chain;
        self
    }

    pub fn build(mut self) -> VouchResult<Credential> {
        if let Some(cert) = &self.certificate {
            match &self.public_key {
                None => self.public_key = Some(cert.public_key.clone()),
                Some(key) if *key != cert.public_key => {
                    return Err(VouchError::Credential(format!(
                        "public key does not match certificate '{}' for entity {}",
                        cert.subject, self.entity_id
                    )));
                }
                Some(_) => {}
            }
        }

        if self.public_key.is_none() && self.private_key.is_none() && self.secret_key.is_none() {
            return Err(VouchError::Credential(format!(
                "credential for entity {} carries no key material",
                self.entity_id
            )));
        }

        Ok(Credential {
            entity_id: self.entity_id,
            usage_type: self.usage_type,
            public_key: self.public_key,
            private_key: self.private_key,
            secret_key: self.secret_key,
            certificate: self.certificate,
            certificate_chain: self.certificate_chain,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timestamp;

    fn test_cert(subject: &str, key_byte: u8) -> Certificate {
        Certificate::new(
            subject,
            "CN=test-ca",
            PublicKey::new(KeyAlgorithm::Ed25519, vec![key_byte; 32]),
            Timestamp::from_seconds(4_000_000_000),
            vec![0x30, key_byte],
        )
    }

    #[test]
    fn test_build_with_public_key_only() {
        let cred = Credential::builder("idp1")
            .usage(UsageType::Signing)
            .public_key(PublicKey::new(KeyAlgorithm::Ed25519, vec![1; 32]))
            .build()
            .unwrap();
        assert_eq!(cred.entity_id().as_str(), "idp1");
        assert_eq!(cred.usage_type(), UsageType::Signing);
        assert!(cred.private_key().is_none());
        assert_eq!(cred.key_algorithm(), Some(KeyAlgorithm::Ed25519));
    }

    #[test]
    fn test_build_without_keys_fails() {
        let err = Credential::builder("idp1").build().unwrap_err();
        assert!(matches!(err, VouchError::Credential(_)));
    }

    #[test]
    fn test_public_key_derived_from_certificate() {
        let cert = test_cert("CN=idp1", 7);
        let cred = Credential::builder("idp1")
            .certificate(cert.clone())
            .certificate_chain(vec![cert.clone()])
            .build()
            .unwrap();
        assert_eq!(cred.public_key(), Some(&cert.public_key));
        assert_eq!(cred.certificate_chain().len(), 1);
    }

    #[test]
    fn test_mismatched_public_key_rejected() {
        let cert = test_cert("CN=idp1", 7);
        let err = Credential::builder("idp1")
            .public_key(PublicKey::new(KeyAlgorithm::Ed25519, vec![9; 32]))
            .certificate(cert)
            .build()
            .unwrap_err();
        assert!(matches!(err, VouchError::Credential(_)));
    }

    #[test]
    fn test_secret_key_only_credential() {
        let cred = Credential::builder("sp1")
            .secret_key(SecretKey::new(KeyAlgorithm::Aes256, vec![3; 32]))
            .build()
            .unwrap();
        assert_eq!(cred.key_algorithm(), Some(KeyAlgorithm::Aes256));
        assert!(cred.certificate().is_none());
    }

    #[test]
    fn test_debug_output_redacts_private_key() {
        let cred = Credential::builder("idp1")
            .private_key(PrivateKey::new(KeyAlgorithm::Ed25519, vec![0x42; 32]))
            .build()
            .unwrap();
        let rendered = format!("{:?}", cred);
        assert!(rendered.contains("redacted"));
        assert!(!rendered.contains("66")); // 0x42 as decimal
    }
}
