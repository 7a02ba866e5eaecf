use crate::entry::KeyStoreEntry;
use crate::error::KeyStoreResult;
use vouch_core::EntityId;

// ---------------------------------------------------------------------------
// KeyStore — the backing-store boundary: alias in, tagged entry out.
//
// The concrete technology (in-memory map, encrypted database, hardware
// token) is pluggable behind this shape.
// ---------------------------------------------------------------------------

pub trait KeyStore: Send + Sync {
    /// Looks up the entry for `alias`, unlocking it with `password` where
    /// the entry is protected. `Ok(None)` means no entry exists; an `Err`
    /// is an access or storage fault for this alias only and must not
    /// affect later lookups of other aliases.
    fn entry(&self, alias: &EntityId, password: Option<&str>)
        -> KeyStoreResult<Option<KeyStoreEntry>>;

    fn contains(&self, alias: &EntityId) -> KeyStoreResult<bool>;

    /// Number of entries. Also serves as the initialization probe: a store
    /// that cannot report its size is not usable for resolution.
    fn len(&self) -> KeyStoreResult<usize>;
}
