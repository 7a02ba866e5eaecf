use crate::credential::Credential;
use crate::criteria::CriteriaSet;
use crate::error::VouchResult;

// ---------------------------------------------------------------------------
// CredentialResolver — criteria set in, zero-or-more credentials out.
//
// Implementations may consult one or more backing stores. The returned
// order is implementation-defined but deterministic for identical inputs
// and backing-store state. Absence of a matching entry is an empty result,
// never an error; errors are reserved for malformed input (a required
// criterion missing) and for backing-store data the implementation cannot
// safely interpret as "no match".
// ---------------------------------------------------------------------------

pub trait CredentialResolver: Send + Sync {
    fn resolve(&self, criteria: &CriteriaSet) -> VouchResult<Vec<Credential>>;

    /// The first resolved credential, if any.
    fn resolve_single(&self, criteria: &CriteriaSet) -> VouchResult<Option<Credential>> {
        Ok(self.resolve(criteria)?.into_iter().next())
    }
}
