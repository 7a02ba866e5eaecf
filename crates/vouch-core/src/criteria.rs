use crate::error::{VouchError, VouchResult};
use crate::types::{EntityId, UsageType};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CriteriaSet — kind-keyed bag of typed match predicates.
//
// At most one criterion of each kind; insertion order is irrelevant.
// Resolvers declare which kinds they require and fail fast when a required
// kind is absent, rather than guessing a default.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CriterionKind {
    EntityCredential,
    KeyName,
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriterionKind::EntityCredential => write!(f, "entity-credential"),
            CriterionKind::KeyName => write!(f, "key-name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    Entity(EntityCriteria),
    KeyName(KeyNameCriteria),
}

impl Criterion {
    pub fn kind(&self) -> CriterionKind {
        match self {
            Criterion::Entity(_) => CriterionKind::EntityCredential,
            Criterion::KeyName(_) => CriterionKind::KeyName,
        }
    }
}

/// Which entity's credentials are wanted, and for which use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCriteria {
    owner_id: EntityId,
    usage: UsageType,
}

impl EntityCriteria {
    pub fn new(owner_id: impl Into<EntityId>) -> VouchResult<Self> {
        let owner_id = owner_id.into();
        if owner_id.is_empty() {
            return Err(VouchError::Criteria(
                "entity criteria owner id must be non-empty".to_string(),
            ));
        }
        Ok(Self {
            owner_id,
            usage: UsageType::Unspecified,
        })
    }

    pub fn with_usage(mut self, usage: UsageType) -> Self {
        self.usage = usage;
        self
    }

    pub fn owner_id(&self) -> &EntityId {
        &self.owner_id
    }

    pub fn usage(&self) -> UsageType {
        self.usage
    }
}

/// A declared key name to match against, e.g. from a KeyName element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNameCriteria {
    name: String,
}

impl KeyNameCriteria {
    pub fn new(name: impl Into<String>) -> VouchResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(VouchError::Criteria(
                "key name criteria must be non-empty".to_string(),
            ));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaSet {
    criteria: BTreeMap<CriterionKind, Criterion>,
}

impl CriteriaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a criterion, replacing any previous one of the same kind.
    /// Returns the replaced criterion, if any.
    pub fn insert(&mut self, criterion: Criterion) -> Option<Criterion> {
        self.criteria.insert(criterion.kind(), criterion)
    }

    pub fn get(&self, kind: CriterionKind) -> Option<&Criterion> {
        self.criteria.get(&kind)
    }

    pub fn contains(&self, kind: CriterionKind) -> bool {
        self.criteria.contains_key(&kind)
    }

    pub fn entity(&self) -> Option<&EntityCriteria> {
        match self.criteria.get(&CriterionKind::EntityCredential) {
            Some(Criterion::Entity(c)) => Some(c),
            _ => None,
        }
    }

    pub fn key_name(&self) -> Option<&KeyNameCriteria> {
        match self.criteria.get(&CriterionKind::KeyName) {
            Some(Criterion::KeyName(c)) => Some(c),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_owner_rejected() {
        assert!(EntityCriteria::new("").is_err());
    }

    #[test]
    fn test_default_usage_is_unspecified() {
        let criteria = EntityCriteria::new("idp1").unwrap();
        assert_eq!(criteria.usage(), UsageType::Unspecified);
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut set = CriteriaSet::new();
        let entity = EntityCriteria::new("idp1")
            .unwrap()
            .with_usage(UsageType::Signing);
        assert!(set.insert(Criterion::Entity(entity)).is_none());

        let found = set.entity().unwrap();
        assert_eq!(found.owner_id().as_str(), "idp1");
        assert_eq!(found.usage(), UsageType::Signing);
        assert!(set.contains(CriterionKind::EntityCredential));
        assert!(!set.contains(CriterionKind::KeyName));
    }

    #[test]
    fn test_kind_uniqueness() {
        let mut set = CriteriaSet::new();
        set.insert(Criterion::Entity(EntityCriteria::new("first").unwrap()));
        let replaced = set.insert(Criterion::Entity(EntityCriteria::new("second").unwrap()));
        assert!(replaced.is_some());
        assert_eq!(set.len(), 1);
        assert_eq!(set.entity().unwrap().owner_id().as_str(), "second");
    }

    #[test]
    fn test_mixed_kinds() {
        let mut set = CriteriaSet::new();
        set.insert(Criterion::Entity(EntityCriteria::new("idp1").unwrap()));
        set.insert(Criterion::KeyName(KeyNameCriteria::new("signer-1").unwrap()));
        assert_eq!(set.len(), 2);
        assert_eq!(set.key_name().unwrap().name(), "signer-1");
    }
}
