use crate::entry::KeyStoreEntry;
use crate::error::{KeyStoreError, KeyStoreResult};
use crate::store::KeyStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};
use vouch_core::{
    Credential, CredentialResolver, CriteriaSet, EntityId, UsageType, VouchResult,
};

// ---------------------------------------------------------------------------
// KeyStoreCredentialResolver — resolves credentials from a backing store.
//
// Requires an entity criterion; anything else in the criteria set is
// ignored. If constructed with a fixed usage type, criteria requesting a
// different usage resolve to an empty result. Per-entity access faults
// (wrong password, corrupted entry) are logged and collapsed to empty
// results so resolution stays total; only malformed criteria and
// unsupported entry shapes raise.
// ---------------------------------------------------------------------------

pub struct KeyStoreCredentialResolver {
    store: Arc<dyn KeyStore>,
    passwords: HashMap<EntityId, String>,
    fixed_usage: Option<UsageType>,
}

impl KeyStoreCredentialResolver {
    /// Binds to an initialized store and an alias → password mapping;
    /// aliases absent from the mapping are accessed without a password.
    pub fn new(
        store: Arc<dyn KeyStore>,
        passwords: HashMap<EntityId, String>,
    ) -> KeyStoreResult<Self> {
        Self::build(store, passwords, None)
    }

    /// Like [`new`](Self::new), but every key in the store is declared to
    /// have the given usage; criteria requesting any other usage resolve
    /// to an empty result.
    pub fn with_fixed_usage(
        store: Arc<dyn KeyStore>,
        passwords: HashMap<EntityId, String>,
        usage: UsageType,
    ) -> KeyStoreResult<Self> {
        Self::build(store, passwords, Some(usage))
    }

    fn build(
        store: Arc<dyn KeyStore>,
        passwords: HashMap<EntityId, String>,
        fixed_usage: Option<UsageType>,
    ) -> KeyStoreResult<Self> {
        // initialization probe
        store
            .len()
            .map_err(|e| KeyStoreError::NotInitialized(e.to_string()))?;

        Ok(Self {
            store,
            passwords,
            fixed_usage,
        })
    }

    fn credential_from_entry(
        &self,
        owner: &EntityId,
        usage: UsageType,
        entry: KeyStoreEntry,
    ) -> VouchResult<Credential> {
        match entry {
            KeyStoreEntry::PrivateKey { private_key, chain } => {
                let leaf = chain.first().cloned().ok_or_else(|| {
                    KeyStoreError::UnsupportedEntry(format!(
                        "private-key entry for {} carries no certificate chain",
                        owner
                    ))
                })?;
                Credential::builder(owner.clone())
                    .usage(usage)
                    .private_key(private_key)
                    .certificate(leaf)
                    .certificate_chain(chain)
                    .build()
            }
            KeyStoreEntry::TrustedCertificate(cert) => Credential::builder(owner.clone())
                .usage(usage)
                .certificate(cert.clone())
                .certificate_chain(vec![cert])
                .build(),
            other => Err(KeyStoreError::UnsupportedEntry(format!(
                "entry for {} has unsupported shape: {}",
                owner,
                other.shape()
            ))
            .into()),
        }
    }
}

impl CredentialResolver for KeyStoreCredentialResolver {
    fn resolve(&self, criteria: &CriteriaSet) -> VouchResult<Vec<Credential>> {
        let entity = criteria.entity().ok_or_else(|| {
            KeyStoreError::MissingCriterion(
                "entity-credential criterion is required for key store resolution".to_string(),
            )
        })?;
        let usage = entity.usage();
        let owner = entity.owner_id();

        if let Some(fixed) = self.fixed_usage {
            if fixed != usage {
                debug!(entity = %owner, requested = %usage, fixed = %fixed,
                    "store keys not eligible for requested usage");
                return Ok(Vec::new());
            }
        }

        let password = self.passwords.get(owner).map(String::as_str);
        let entry = match self.store.entry(owner, password) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!(entity = %owner, "no key store entry for entity");
                return Ok(Vec::new());
            }
            // entity-scoped access fault: logged, resolved as empty
            Err(e) => {
                error!(entity = %owner, error = %e, "unable to retrieve key store entry");
                return Ok(Vec::new());
            }
        };

        let credential = self.credential_from_entry(owner, usage, entry)?;
        Ok(vec![credential])
    }
}
