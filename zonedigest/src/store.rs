//! Zone storage back ends.
//!
//! Two implementations share one interface: [`FlatStore`] keeps an unordered list of records and
//! relies on sorting at read time, while [`TreeStore`] keeps records bucketed into a fixed-arity
//! hash tree so that only the buckets touched by a mutation need to be re-hashed. Which one is in
//! use is a runtime choice, not a compile-time one: both compile in always, and the CLI driver
//! picks one at startup based on `-D`/`-W`.

use zonedigest_proto::{Name, NonOptRecord, RecordType};

/// The operations the digest engine and the CLI driver need from a zone's storage, independent of
/// how it is laid out internally.
pub trait ZoneStore {
    /// The zone's origin.
    fn origin(&self) -> &Name;

    /// Adds `record` to the store.
    fn add(&mut self, record: NonOptRecord);

    /// Removes every apex record (owner equal to [`Self::origin`]) of type `rtype` from the
    /// store, returning how many were removed.
    ///
    /// If `type_covered` is [`Some`], only `RRSIG` records whose `type_covered` field matches it
    /// are removed (used to remove only the `RRSIG`s that cover the digest record, leaving any
    /// others untouched); it is ignored for other record types.
    fn remove_at_apex(&mut self, rtype: RecordType, type_covered: Option<RecordType>) -> usize;

    /// Returns every stored record, in canonical zone order (owner, then type, then RDATA).
    fn enumerate_canonical(&self) -> Vec<NonOptRecord>;

    /// Returns every apex record (owner equal to [`Self::origin`]), in an unspecified order.
    fn apex_records(&self) -> Vec<&NonOptRecord>;

    /// Like [`Self::apex_records`], but returning mutable references, for patching apex records in
    /// place (e.g. writing a computed digest into a placeholder).
    fn apex_records_mut(&mut self) -> Vec<&mut NonOptRecord>;

    /// Removes the first stored record (in an unspecified order) matching `predicate`, returning
    /// whether one was found.
    ///
    /// Used by the update-file `del` directive, which targets a single record equal in owner,
    /// type, class, and RDATA to the one given, wherever in the zone it happens to live (unlike
    /// [`Self::remove_at_apex`], which only ever looks at the origin).
    fn remove_first(&mut self, predicate: &mut dyn FnMut(&NonOptRecord) -> bool) -> bool;

    /// Computes this store's zone digest under `algorithm`, reporting any warnings (e.g.
    /// duplicate records collapsed during the walk) through `warn`.
    ///
    /// `&mut self` because the tree variant caches per-subtree digests as it walks; the flat
    /// variant ignores the opportunity and just re-walks every record every time.
    ///
    /// Returns `None` if `algorithm` is not supported.
    fn digest(
        &mut self,
        policy: crate::encoder::RecordEncoderPolicy,
        algorithm: zonedigest_proto::rdata::zonemd::DigestAlgorithm,
        warn: &mut dyn FnMut(String),
    ) -> Option<Vec<u8>>;
}

fn record_matches(rec: &NonOptRecord, rtype: RecordType, type_covered: Option<RecordType>) -> bool {
    if rec.rtype != rtype {
        return false;
    }
    match type_covered {
        None => true,
        Some(tc) => rec
            .rdata()
            .as_rrsig()
            .map(|rrsig| rrsig.type_covered == tc)
            .unwrap_or(false),
    }
}

/// An unordered zone store; canonical order is produced on demand by sorting.
#[derive(Debug)]
pub struct FlatStore {
    origin: Name,
    records: Vec<NonOptRecord>,
}

impl FlatStore {
    pub fn new(origin: Name) -> Self {
        Self {
            origin,
            records: Vec::new(),
        }
    }

    /// Builds a store already populated with `records`.
    pub fn from_records(origin: Name, records: Vec<NonOptRecord>) -> Self {
        Self { origin, records }
    }
}

impl ZoneStore for FlatStore {
    fn origin(&self) -> &Name {
        &self.origin
    }

    fn add(&mut self, record: NonOptRecord) {
        self.records.push(record);
    }

    fn remove_at_apex(&mut self, rtype: RecordType, type_covered: Option<RecordType>) -> usize {
        let origin = self.origin.clone();
        let before = self.records.len();
        self.records
            .retain(|rec| !(rec.owner == origin && record_matches(rec, rtype, type_covered)));
        before - self.records.len()
    }

    fn enumerate_canonical(&self) -> Vec<NonOptRecord> {
        let mut records = self.records.clone();
        zonedigest_proto::zonefile::sort_canonical(&mut records);
        records
    }

    fn apex_records(&self) -> Vec<&NonOptRecord> {
        self.records.iter().filter(|r| r.owner == self.origin).collect()
    }

    fn apex_records_mut(&mut self) -> Vec<&mut NonOptRecord> {
        let origin = self.origin.clone();
        self.records
            .iter_mut()
            .filter(|r| r.owner == origin)
            .collect()
    }

    fn remove_first(&mut self, predicate: &mut dyn FnMut(&NonOptRecord) -> bool) -> bool {
        match self.records.iter().position(|rec| predicate(rec)) {
            Some(idx) => {
                self.records.remove(idx);
                true
            }
            None => false,
        }
    }

    fn digest(
        &mut self,
        policy: crate::encoder::RecordEncoderPolicy,
        algorithm: zonedigest_proto::rdata::zonemd::DigestAlgorithm,
        warn: &mut dyn FnMut(String),
    ) -> Option<Vec<u8>> {
        crate::digest::digest_flat(self, policy, algorithm, warn)
    }
}

/// A node of a [`TreeStore`]'s hash tree.
///
/// A node with `children` set is an internal node; one without is a leaf, and only leaves hold
/// records. There are no parent back-references: ownership runs strictly root-down, since nothing
/// in the digest engine or the store's own operations needs to walk upward.
#[derive(Debug)]
struct TreeNode {
    children: Option<Vec<Option<Box<TreeNode>>>>,
    records: Vec<NonOptRecord>,
    cached_digest: Option<Vec<u8>>,
    dirty: bool,
}

impl TreeNode {
    fn new(is_leaf: bool, width: usize) -> Self {
        Self {
            children: if is_leaf { None } else { Some(vec![None; width]) },
            records: Vec::new(),
            cached_digest: None,
            dirty: true,
        }
    }
}

/// Computes the child slot `name` routes to at tree depth `depth`, under the given `width`.
///
/// The name is canonicalized (lowercased) first, since the routing function is otherwise
/// sensitive to case and must be applied identically by whoever produces a digest and whoever
/// verifies it. The exact function used (this one) is part of that producer/verifier contract,
/// not something carried in the digest record itself.
fn route_index(name: &Name, depth: usize, width: usize) -> usize {
    let mut canon = name.clone();
    canon.canonicalize();
    let mut bytes = Vec::new();
    canon
        .encode_into(&mut bytes)
        .expect("encoding a Name into a Vec<u8> cannot fail");
    bytes[depth % bytes.len()] as usize % width
}

/// A zone store backed by a fixed-arity hash tree, so that only the buckets touched by a mutation
/// need to be re-hashed when computing a digest.
///
/// `max_depth` of 0 degenerates to a single leaf holding every record, i.e. behaves like
/// [`FlatStore`] but through the tree code path.
#[derive(Debug)]
pub struct TreeStore {
    origin: Name,
    root: TreeNode,
    max_depth: usize,
    width: usize,
}

impl TreeStore {
    pub fn new(origin: Name, max_depth: usize, width: usize) -> Self {
        let root = TreeNode::new(max_depth == 0, width);
        Self {
            origin,
            root,
            max_depth,
            width,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Read-only lookup of the leaf bucket `owner` routes to. Returns `None` if no record routing
    /// through that path has been added yet, without allocating anything.
    ///
    /// Kept deliberately separate from [`Self::leaf_for_mut`]: calling the mutating lookup for a
    /// read would wrongly mark clean subtrees dirty, invalidating cached digests for no reason.
    fn leaf_for(&self, owner: &Name) -> Option<&TreeNode> {
        let mut node = &self.root;
        for depth in 0..self.max_depth {
            let idx = route_index(owner, depth, self.width);
            let children = node.children.as_ref()?;
            node = children[idx].as_deref()?;
        }
        Some(node)
    }

    /// Mutating lookup of the leaf bucket `owner` routes to, lazily allocating nodes along the
    /// path and marking every node on the path (including the leaf) dirty.
    fn leaf_for_mut(&mut self, owner: &Name) -> &mut TreeNode {
        let max_depth = self.max_depth;
        let width = self.width;

        let mut node = &mut self.root;
        node.dirty = true;
        for depth in 0..max_depth {
            let idx = route_index(owner, depth, width);
            let is_leaf_next = depth + 1 == max_depth;
            let children = node.children.get_or_insert_with(|| vec![None; width]);
            let child = children[idx].get_or_insert_with(|| Box::new(TreeNode::new(is_leaf_next, width)));
            child.dirty = true;
            node = child;
        }
        node
    }

    fn collect_records<'a>(node: &'a TreeNode, out: &mut Vec<&'a NonOptRecord>) {
        out.extend(node.records.iter());
        if let Some(children) = &node.children {
            for child in children.iter().flatten() {
                Self::collect_records(child, out);
            }
        }
    }

    fn collect_records_mut<'a>(node: &'a mut TreeNode, out: &mut Vec<&'a mut NonOptRecord>) {
        out.extend(node.records.iter_mut());
        if let Some(children) = &mut node.children {
            for child in children.iter_mut().flatten() {
                Self::collect_records_mut(child, out);
            }
        }
    }

    /// Computes this store's zone digest under `algorithm`, recursing through the tree.
    ///
    /// A clean node returns its cached digest unchanged. A dirty internal node hashes the
    /// subtree digests of its occupied children, in ascending child-index order (empty slots
    /// contribute nothing); a dirty leaf hashes its bucket's records the same way a flat walk
    /// would. Either way the node is then marked clean and its digest cached.
    ///
    /// Returns `None` if `algorithm` is not supported.
    fn digest_internal(
        &mut self,
        policy: crate::encoder::RecordEncoderPolicy,
        algorithm: zonedigest_proto::rdata::zonemd::DigestAlgorithm,
        warn: &mut dyn FnMut(String),
    ) -> Option<Vec<u8>> {
        let origin = self.origin.clone();
        Self::digest_node(&mut self.root, &origin, policy, algorithm, warn)
    }

    /// Removes the first record anywhere in the tree matching `predicate`, marking every node on
    /// the path from the root to the removal dirty. Returns whether a record was removed.
    fn remove_first_node(node: &mut TreeNode, predicate: &mut dyn FnMut(&NonOptRecord) -> bool) -> bool {
        if let Some(idx) = node.records.iter().position(|rec| predicate(rec)) {
            node.records.remove(idx);
            node.dirty = true;
            return true;
        }
        if let Some(children) = &mut node.children {
            for slot in children.iter_mut() {
                if let Some(child) = slot {
                    if Self::remove_first_node(child, predicate) {
                        node.dirty = true;
                        return true;
                    }
                }
            }
        }
        false
    }

    fn digest_node(
        node: &mut TreeNode,
        origin: &Name,
        policy: crate::encoder::RecordEncoderPolicy,
        algorithm: zonedigest_proto::rdata::zonemd::DigestAlgorithm,
        warn: &mut dyn FnMut(String),
    ) -> Option<Vec<u8>> {
        if !node.dirty {
            if let Some(cached) = &node.cached_digest {
                return Some(cached.clone());
            }
        }

        let mut hasher = crate::digest::Hasher::new(algorithm)?;
        let digest_type = policy.digest_record_type();

        if let Some(children) = &mut node.children {
            for slot in children.iter_mut() {
                if let Some(child) = slot {
                    let child_digest = Self::digest_node(child, origin, policy, algorithm, warn)?;
                    hasher.update(&child_digest);
                }
            }
        } else {
            let mut records = node.records.clone();
            zonedigest_proto::zonefile::sort_canonical(&mut records);
            crate::digest::hash_records_into(&mut hasher, &records, origin, digest_type, &mut *warn);
        }

        let result = hasher.finalize();
        node.cached_digest = Some(result.clone());
        node.dirty = false;
        Some(result)
    }
}

impl ZoneStore for TreeStore {
    fn origin(&self) -> &Name {
        &self.origin
    }

    fn add(&mut self, record: NonOptRecord) {
        let owner = record.owner.clone();
        self.leaf_for_mut(&owner).records.push(record);
    }

    fn remove_at_apex(&mut self, rtype: RecordType, type_covered: Option<RecordType>) -> usize {
        let origin = self.origin.clone();
        let leaf = self.leaf_for_mut(&origin);
        let before = leaf.records.len();
        leaf.records
            .retain(|rec| !(rec.owner == origin && record_matches(rec, rtype, type_covered)));
        before - leaf.records.len()
    }

    fn enumerate_canonical(&self) -> Vec<NonOptRecord> {
        let mut refs = Vec::new();
        Self::collect_records(&self.root, &mut refs);
        let mut records: Vec<NonOptRecord> = refs.into_iter().cloned().collect();
        zonedigest_proto::zonefile::sort_canonical(&mut records);
        records
    }

    fn apex_records(&self) -> Vec<&NonOptRecord> {
        match self.leaf_for(&self.origin) {
            Some(leaf) => leaf.records.iter().filter(|r| r.owner == self.origin).collect(),
            None => Vec::new(),
        }
    }

    fn apex_records_mut(&mut self) -> Vec<&mut NonOptRecord> {
        let origin = self.origin.clone();
        let leaf = self.leaf_for_mut(&origin);
        leaf.records
            .iter_mut()
            .filter(|r| r.owner == origin)
            .collect()
    }

    fn remove_first(&mut self, predicate: &mut dyn FnMut(&NonOptRecord) -> bool) -> bool {
        Self::remove_first_node(&mut self.root, predicate)
    }

    fn digest(
        &mut self,
        policy: crate::encoder::RecordEncoderPolicy,
        algorithm: zonedigest_proto::rdata::zonemd::DigestAlgorithm,
        warn: &mut dyn FnMut(String),
    ) -> Option<Vec<u8>> {
        self.digest_internal(policy, algorithm, warn)
    }
}

#[cfg(test)]
mod tests {
    use zonedigest_proto::rdata::A;
    use zonedigest_proto::{Class, Rdata};

    use super::*;

    fn a_record(owner: &str, addr: &str) -> NonOptRecord {
        NonOptRecord::new(
            Name::from_ascii(owner).unwrap(),
            Class::IN,
            3600,
            Rdata::A(A {
                address: addr.parse().unwrap(),
            }),
        )
        .unwrap()
    }

    #[test]
    fn read_only_lookup_does_not_dirty() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut store = TreeStore::new(origin.clone(), 2, 13);
        store.add(a_record("www.example.com", "192.0.2.1"));

        let digest1 = store.digest(
            crate::encoder::RecordEncoderPolicy::Typed,
            zonedigest_proto::rdata::zonemd::DigestAlgorithm::SHA384,
            &mut |_| {},
        );
        assert!(!store.root.dirty);

        // a pure read must not mark anything dirty
        let _ = store.apex_records();
        assert!(!store.root.dirty);

        let digest2 = store.digest(
            crate::encoder::RecordEncoderPolicy::Typed,
            zonedigest_proto::rdata::zonemd::DigestAlgorithm::SHA384,
            &mut |_| {},
        );
        assert_eq!(digest1, digest2);
    }

    #[test]
    fn degenerate_tree_matches_flat() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut flat = FlatStore::new(origin.clone());
        let mut tree = TreeStore::new(origin.clone(), 0, 13);

        for rec in [
            a_record("example.com", "192.0.2.1"),
            a_record("www.example.com", "192.0.2.2"),
        ] {
            flat.add(rec.clone());
            tree.add(rec);
        }

        let flat_digest = crate::digest::digest_flat(
            &flat,
            crate::encoder::RecordEncoderPolicy::Typed,
            zonedigest_proto::rdata::zonemd::DigestAlgorithm::SHA384,
            |_| {},
        );
        let tree_digest = tree.digest(
            crate::encoder::RecordEncoderPolicy::Typed,
            zonedigest_proto::rdata::zonemd::DigestAlgorithm::SHA384,
            &mut |_| {},
        );
        assert_eq!(flat_digest, tree_digest);
    }
}
