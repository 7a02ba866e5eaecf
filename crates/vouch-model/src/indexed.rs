use crate::error::{ModelError, ModelResult};
use crate::qname::QName;
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// IndexedChildren — ordered children container with two synchronized
// secondary indices.
//
// The primary Vec is the sole source of truth. The index maps hold
// positions into it and are rebuilt after any mutation that can shift
// positions, so after every mutation the bucket for a key equals, in
// order, exactly the primary-sequence elements bearing that key.
// Not safe for concurrent mutation; callers serialize access.
// ---------------------------------------------------------------------------

/// Classification keys contributed by a child element: a mandatory element
/// kind and an optional declared schema type.
pub trait KeyedElement {
    fn element_kind(&self) -> QName;

    fn schema_type(&self) -> Option<QName> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    ElementKind,
    SchemaType,
}

pub struct IndexedChildren<T: KeyedElement> {
    items: Vec<T>,
    by_kind: HashMap<QName, Vec<usize>>,
    by_type: HashMap<QName, Vec<usize>>,
    on_change: Option<Box<dyn Fn() + Send + Sync>>,
}

impl<T: KeyedElement> IndexedChildren<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            by_kind: HashMap::new(),
            by_type: HashMap::new(),
            on_change: None,
        }
    }

    /// Registers the owner's mutation notification hook, invoked after
    /// every successful structural mutation (e.g. to mark the owning
    /// element dirty). Correctness of the container does not depend on it.
    pub fn set_change_listener(&mut self, listener: impl Fn() + Send + Sync + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Appends to the end of the primary sequence and registers the
    /// element at the end of the bucket(s) for its computed keys.
    pub fn push(&mut self, item: T) {
        let position = self.items.len();
        let kind = item.element_kind();
        let schema_type = item.schema_type();
        self.items.push(item);
        self.by_kind.entry(kind).or_default().push(position);
        if let Some(ty) = schema_type {
            self.by_type.entry(ty).or_default().push(position);
        }
        self.notify();
    }

    /// Replaces the element at `position`, deregistering the displaced
    /// element from every bucket and registering the replacement under its
    /// own keys. Returns the displaced element.
    pub fn set(&mut self, position: usize, item: T) -> ModelResult<T> {
        if position >= self.items.len() {
            return Err(ModelError::OutOfBounds {
                position,
                len: self.items.len(),
            });
        }
        let displaced = std::mem::replace(&mut self.items[position], item);
        self.reindex();
        self.notify();
        Ok(displaced)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.by_kind.clear();
        self.by_type.clear();
        self.notify();
    }

    fn reindex(&mut self) {
        self.by_kind.clear();
        self.by_type.clear();
        for (position, item) in self.items.iter().enumerate() {
            self.by_kind
                .entry(item.element_kind())
                .or_default()
                .push(position);
            if let Some(ty) = item.schema_type() {
                self.by_type.entry(ty).or_default().push(position);
            }
        }
    }

    fn notify(&self) {
        if let Some(listener) = &self.on_change {
            listener();
        }
    }

    fn positions(&self, axis: Axis, key: &QName) -> &[usize] {
        let map = match axis {
            Axis::ElementKind => &self.by_kind,
            Axis::SchemaType => &self.by_type,
        };
        map.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Read-only bucket view keyed by element kind.
    pub fn by_element_kind<'a>(&'a self, key: &QName) -> BucketRef<'a, T> {
        BucketRef {
            list: self,
            axis: Axis::ElementKind,
            key: key.clone(),
        }
    }

    /// Read-only bucket view keyed by schema type.
    pub fn by_schema_type<'a>(&'a self, key: &QName) -> BucketRef<'a, T> {
        BucketRef {
            list: self,
            axis: Axis::SchemaType,
            key: key.clone(),
        }
    }

    /// Live mutable bucket view keyed by element kind.
    pub fn view_by_element_kind(&mut self, key: QName) -> BucketMut<'_, T> {
        BucketMut {
            list: self,
            axis: Axis::ElementKind,
            key,
        }
    }

    /// Live mutable bucket view keyed by schema type.
    pub fn view_by_schema_type(&mut self, key: QName) -> BucketMut<'_, T> {
        BucketMut {
            list: self,
            axis: Axis::SchemaType,
            key,
        }
    }
}

impl<T: KeyedElement + PartialEq> IndexedChildren<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|x| x == item)
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|x| x == item)
    }

    pub fn last_index_of(&self, item: &T) -> Option<usize> {
        self.items.iter().rposition(|x| x == item)
    }

    /// Removes the first occurrence equal to `item` from the primary
    /// sequence and every bucket. Returns false if no occurrence exists.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.items.iter().position(|x| x == item) {
            Some(position) => {
                self.items.remove(position);
                self.reindex();
                self.notify();
                true
            }
            None => false,
        }
    }
}

impl<T: KeyedElement> Default for IndexedChildren<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: KeyedElement + fmt::Debug> fmt::Debug for IndexedChildren<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedChildren")
            .field("items", &self.items)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// BucketRef — read-only view of one key's bucket.
//
// Views hold no copied state: every read goes back to the container's
// index, so a view observed after a mutation reflects it.
// ---------------------------------------------------------------------------

pub struct BucketRef<'a, T: KeyedElement> {
    list: &'a IndexedChildren<T>,
    axis: Axis,
    key: QName,
}

impl<'a, T: KeyedElement> BucketRef<'a, T> {
    pub fn len(&self) -> usize {
        self.list.positions(self.axis, &self.key).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, position: usize) -> Option<&'a T> {
        self.list
            .positions(self.axis, &self.key)
            .get(position)
            .map(|&p| &self.list.items[p])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.list
            .positions(self.axis, &self.key)
            .iter()
            .map(|&p| &self.list.items[p])
    }
}

impl<'a, T: KeyedElement + PartialEq> BucketRef<'a, T> {
    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|x| x == item)
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.iter().position(|x| x == item)
    }

    pub fn last_index_of(&self, item: &T) -> Option<usize> {
        let positions = self.list.positions(self.axis, &self.key);
        positions
            .iter()
            .rposition(|&p| &self.list.items[p] == item)
    }
}

// ---------------------------------------------------------------------------
// BucketMut — live, partially-mutable view of one key's bucket.
//
// Supports append, removal by equality, and clear. Positional replacement
// and positional removal are rejected: a bucket position does not map 1:1
// to a primary-sequence position, so reinterpreting it would corrupt the
// primary order.
// ---------------------------------------------------------------------------

pub struct BucketMut<'a, T: KeyedElement> {
    list: &'a mut IndexedChildren<T>,
    axis: Axis,
    key: QName,
}

impl<'a, T: KeyedElement> BucketMut<'a, T> {
    pub fn len(&self) -> usize {
        self.list.positions(self.axis, &self.key).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, position: usize) -> Option<&T> {
        self.list
            .positions(self.axis, &self.key)
            .get(position)
            .map(|&p| &self.list.items[p])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.list
            .positions(self.axis, &self.key)
            .iter()
            .map(|&p| &self.list.items[p])
    }

    /// Appends to the container. The element is registered under its own
    /// computed keys, whatever key this view was obtained through.
    pub fn push(&mut self, item: T) {
        self.list.push(item);
    }

    /// Removes exactly the elements currently in this bucket from the
    /// primary sequence; all other elements keep their relative order.
    pub fn clear(&mut self) {
        let mut positions: Vec<usize> = self.list.positions(self.axis, &self.key).to_vec();
        if positions.is_empty() {
            return;
        }
        positions.sort_unstable();
        for position in positions.into_iter().rev() {
            self.list.items.remove(position);
        }
        self.list.reindex();
        self.list.notify();
    }

    /// Positional replacement is not supported on a view.
    pub fn set(&mut self, _position: usize, _item: T) -> ModelResult<()> {
        Err(ModelError::UnsupportedViewOperation(
            "positional set on a bucket view",
        ))
    }

    /// Positional removal is not supported on a view.
    pub fn remove_at(&mut self, _position: usize) -> ModelResult<T> {
        Err(ModelError::UnsupportedViewOperation(
            "positional remove on a bucket view",
        ))
    }
}

impl<'a, T: KeyedElement + PartialEq> BucketMut<'a, T> {
    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|x| x == item)
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.iter().position(|x| x == item)
    }

    pub fn last_index_of(&self, item: &T) -> Option<usize> {
        let len = self.len();
        (0..len).rev().find(|&i| self.get(i) == Some(item))
    }

    /// Removes the first occurrence from the primary sequence and every
    /// bucket, like [`IndexedChildren::remove`].
    pub fn remove(&mut self, item: &T) -> bool {
        self.list.remove(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestElement {
        kind: QName,
        schema: Option<QName>,
        id: u32,
    }

    fn kind_a() -> QName {
        QName::new("urn:test:ns", "ElementA")
    }

    fn kind_b() -> QName {
        QName::new("urn:test:ns", "ElementB")
    }

    fn type1() -> QName {
        QName::new("urn:test:types", "Type1")
    }

    fn type2() -> QName {
        QName::new("urn:test:types", "Type2")
    }

    fn elem(kind: QName, schema: Option<QName>, id: u32) -> TestElement {
        TestElement { kind, schema, id }
    }

    impl KeyedElement for TestElement {
        fn element_kind(&self) -> QName {
            self.kind.clone()
        }

        fn schema_type(&self) -> Option<QName> {
            self.schema.clone()
        }
    }

    /// Checks the consistency invariant: every bucket equals, in order,
    /// the primary-sequence elements whose corresponding key matches.
    fn assert_consistent(list: &IndexedChildren<TestElement>) {
        let mut kinds: Vec<QName> = list.iter().map(|e| e.element_kind()).collect();
        let mut types: Vec<QName> = list.iter().filter_map(|e| e.schema_type()).collect();
        kinds.dedup();
        types.dedup();

        for key in kinds {
            let expected: Vec<u32> = list
                .iter()
                .filter(|e| e.element_kind() == key)
                .map(|e| e.id)
                .collect();
            let actual: Vec<u32> = list.by_element_kind(&key).iter().map(|e| e.id).collect();
            assert_eq!(expected, actual, "kind bucket {} out of sync", key);
        }
        for key in types {
            let expected: Vec<u32> = list
                .iter()
                .filter(|e| e.schema_type().as_ref() == Some(&key))
                .map(|e| e.id)
                .collect();
            let actual: Vec<u32> = list.by_schema_type(&key).iter().map(|e| e.id).collect();
            assert_eq!(expected, actual, "type bucket {} out of sync", key);
        }
    }

    #[test]
    fn test_push_indexes_both_axes() {
        let mut list = IndexedChildren::new();
        list.push(elem(kind_a(), Some(type1()), 1));
        assert_eq!(list.by_element_kind(&kind_a()).len(), 1);
        assert_eq!(list.by_schema_type(&type1()).len(), 1);

        // typeless element joins only the kind bucket
        list.push(elem(kind_a(), None, 2));
        assert_eq!(list.by_element_kind(&kind_a()).len(), 2);
        assert_eq!(list.by_schema_type(&type1()).len(), 1);
        assert_consistent(&list);
    }

    #[test]
    fn test_set_deregisters_displaced_element() {
        let mut list = IndexedChildren::new();
        list.push(elem(kind_a(), Some(type1()), 1));

        let displaced = list.set(0, elem(kind_a(), None, 2)).unwrap();
        assert_eq!(displaced.id, 1);
        assert_eq!(list.by_element_kind(&kind_a()).len(), 1);
        assert!(list.by_schema_type(&type1()).is_empty());
        assert_consistent(&list);
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut list = IndexedChildren::new();
        list.push(elem(kind_a(), None, 1));
        let err = list.set(5, elem(kind_a(), None, 2)).unwrap_err();
        assert!(matches!(err, ModelError::OutOfBounds { position: 5, len: 1 }));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_deregisters_everywhere() {
        let mut list = IndexedChildren::new();
        let first = elem(kind_a(), Some(type1()), 1);
        list.push(first.clone());
        list.push(elem(kind_a(), None, 2));

        assert!(list.remove(&first));
        assert_eq!(list.by_element_kind(&kind_a()).len(), 1);
        assert!(list.by_schema_type(&type1()).is_empty());
        assert_consistent(&list);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut list = IndexedChildren::new();
        list.push(elem(kind_a(), None, 1));
        assert!(!list.remove(&elem(kind_b(), None, 99)));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_bucket_sizes_across_keys() {
        let mut list = IndexedChildren::new();
        list.push(elem(kind_a(), Some(type1()), 1));
        list.push(elem(kind_a(), Some(type2()), 2));
        list.push(elem(kind_a(), None, 3));
        list.push(elem(kind_a(), Some(type2()), 4));
        list.push(elem(kind_a(), Some(type1()), 5));
        list.push(elem(kind_a(), Some(type1()), 6));

        assert_eq!(list.by_element_kind(&kind_a()).len(), 6);
        assert_eq!(list.by_schema_type(&type1()).len(), 3);
        assert_eq!(list.by_schema_type(&type2()).len(), 2);
        assert_consistent(&list);
    }

    #[test]
    fn test_view_append_propagates_to_container() {
        let mut list = IndexedChildren::new();
        list.push(elem(kind_a(), Some(type1()), 1));

        let appended = elem(kind_a(), Some(type1()), 2);
        let mut view = list.view_by_schema_type(type1());
        view.push(appended.clone());
        assert_eq!(view.len(), 2);
        assert!(view.contains(&appended));

        assert_eq!(list.len(), 2);
        assert!(list.contains(&appended));
        assert_consistent(&list);
    }

    #[test]
    fn test_view_append_registers_under_own_keys() {
        let mut list = IndexedChildren::new();
        let mut view = list.view_by_schema_type(type1());
        // element of a different type: lands in the container and in the
        // type2 bucket, not in this view
        view.push(elem(kind_a(), Some(type2()), 1));
        assert_eq!(view.len(), 0);

        assert_eq!(list.len(), 1);
        assert_eq!(list.by_schema_type(&type2()).len(), 1);
        assert_consistent(&list);
    }

    #[test]
    fn test_view_remove_propagates() {
        let mut list = IndexedChildren::new();
        let target = elem(kind_a(), Some(type1()), 1);
        list.push(target.clone());
        list.push(elem(kind_b(), Some(type2()), 2));

        let mut view = list.view_by_schema_type(type1());
        assert!(view.remove(&target));
        assert!(view.is_empty());
        assert!(!list.contains(&target));
        assert_eq!(list.len(), 1);
        assert_consistent(&list);
    }

    #[test]
    fn test_view_positional_mutation_rejected() {
        let mut list = IndexedChildren::new();
        list.push(elem(kind_a(), Some(type1()), 1));
        list.push(elem(kind_b(), Some(type1()), 2));

        let mut view = list.view_by_schema_type(type1());
        assert!(matches!(
            view.set(0, elem(kind_a(), Some(type1()), 9)),
            Err(ModelError::UnsupportedViewOperation(_))
        ));
        assert!(matches!(
            view.remove_at(0),
            Err(ModelError::UnsupportedViewOperation(_))
        ));

        // container untouched
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).unwrap().id, 1);
        assert_eq!(list.get(1).unwrap().id, 2);
        assert_consistent(&list);
    }

    #[test]
    fn test_view_clear_removes_only_bucket_elements() {
        let mut list = IndexedChildren::new();
        list.push(elem(kind_a(), Some(type1()), 1));
        list.push(elem(kind_b(), Some(type2()), 2));
        list.push(elem(kind_a(), Some(type1()), 3));
        list.push(elem(kind_b(), None, 4));

        list.view_by_schema_type(type1()).clear();

        let remaining: Vec<u32> = list.iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![2, 4]);
        assert!(list.by_schema_type(&type1()).is_empty());
        assert_consistent(&list);
    }

    #[test]
    fn test_view_index_of_and_last_index_of() {
        let mut list = IndexedChildren::new();
        let dup = elem(kind_a(), Some(type1()), 7);
        list.push(elem(kind_b(), Some(type2()), 1));
        list.push(dup.clone());
        list.push(elem(kind_a(), Some(type1()), 8));
        list.push(dup.clone());

        let bucket = list.by_schema_type(&type1());
        assert_eq!(bucket.index_of(&dup), Some(0));
        assert_eq!(bucket.last_index_of(&dup), Some(2));
        assert_eq!(bucket.get(bucket.index_of(&dup).unwrap()), Some(&dup));
    }

    #[test]
    fn test_index_consistency_under_mixed_mutations() {
        let mut list = IndexedChildren::new();
        for i in 0..10 {
            let schema = match i % 3 {
                0 => Some(type1()),
                1 => Some(type2()),
                _ => None,
            };
            let kind = if i % 2 == 0 { kind_a() } else { kind_b() };
            list.push(elem(kind, schema, i));
            assert_consistent(&list);
        }

        let victim = elem(kind_b(), Some(type2()), 1);
        assert!(list.remove(&victim));
        assert_consistent(&list);

        list.set(3, elem(kind_a(), Some(type2()), 42)).unwrap();
        assert_consistent(&list);

        list.view_by_element_kind(kind_a()).clear();
        assert_consistent(&list);
    }

    #[test]
    fn test_change_listener_fires_on_mutation() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let counter = Arc::new(AtomicUsize::new(0));
        let hook = Arc::clone(&counter);

        let mut list = IndexedChildren::new();
        list.set_change_listener(move || {
            hook.fetch_add(1, Ordering::SeqCst);
        });

        let first = elem(kind_a(), None, 1);
        list.push(first.clone()); // 1
        list.set(0, elem(kind_a(), None, 2)).unwrap(); // 2
        list.remove(&elem(kind_a(), None, 2)); // 3
        list.push(first); // 4
        list.clear(); // 5
        assert_eq!(counter.load(Ordering::SeqCst), 5);

        // failed mutations do not notify
        assert!(list.set(9, elem(kind_a(), None, 3)).is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }
}
