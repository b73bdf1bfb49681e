//! The digest engine (C4): walking a zone in canonical order and feeding its wire encoding into a
//! hash context.
//!
//! [`store::TreeStore`](crate::store::TreeStore) drives its own incremental variant of this walk
//! directly (see its `digest_node`), reusing [`hash_records_into`] for the records held in a single
//! leaf bucket; this module owns the flat, whole-zone walk plus the hash context abstraction both
//! variants share.

use sha2::{Digest, Sha384};

use zonedigest_proto::rdata::zonemd::DigestAlgorithm;
use zonedigest_proto::{Name, NonOptRecord, RecordType};

use crate::encoder::{self, RecordEncoderPolicy};
use crate::store::ZoneStore;

/// A hash context for a single digest algorithm.
///
/// Kept as an enum rather than a trait object since there is currently exactly one supported
/// algorithm; adding another just means adding a variant here and to [`DigestAlgorithm`].
pub enum Hasher {
    Sha384(Box<Sha384>),
}

impl Hasher {
    /// Creates a fresh hash context for `algorithm`. Returns `None` if `algorithm` is not
    /// supported.
    pub fn new(algorithm: DigestAlgorithm) -> Option<Self> {
        match algorithm {
            DigestAlgorithm::SHA384 => Some(Hasher::Sha384(Box::new(Sha384::new()))),
            DigestAlgorithm::Unassigned(_) => None,
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Sha384(h) => h.update(data),
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        match self {
            Hasher::Sha384(h) => h.finalize().to_vec(),
        }
    }
}

/// Feeds the canonical wire bytes of every record in `records` into `hasher`, in order.
///
/// `records` must already be in canonical zone order. Applies the apex digest record's
/// zeroization rule, excludes RRSIGs covering `digest_type`, and collapses consecutive exact
/// duplicates (reporting each via `warn`) exactly as the flat and tree walks require.
pub fn hash_records_into(
    hasher: &mut Hasher,
    records: &[NonOptRecord],
    origin: &Name,
    digest_type: RecordType,
    mut warn: impl FnMut(String),
) {
    let mut prev: Option<&NonOptRecord> = None;
    for record in records {
        if record.rtype == RecordType::RRSIG {
            if let Some(rrsig) = record.rdata().as_rrsig() {
                if rrsig.type_covered == digest_type {
                    continue;
                }
            }
        }

        if let Some(p) = prev {
            if p.owner == record.owner && p.rtype == record.rtype && p.rdata() == record.rdata() {
                warn(format!(
                    "duplicate record for {} {:?} after canonical sort, skipping",
                    record.owner, record.rtype
                ));
                continue;
            }
        }

        let canon = encoder::canonical(record, origin, digest_type);
        if let Ok(bytes) = encoder::wire(&canon) {
            hasher.update(&bytes);
        }
        prev = Some(record);
    }
}

/// Computes the zone digest for `algorithm` over `store` by walking every record in canonical
/// order, i.e. the flat (non-incremental) variant used by [`store::FlatStore`](crate::store::FlatStore)
/// and also by [`store::TreeStore`](crate::store::TreeStore) when its whole tree is dirty.
///
/// Returns `None` if `algorithm` is not supported.
pub fn digest_flat(
    store: &dyn ZoneStore,
    policy: RecordEncoderPolicy,
    algorithm: DigestAlgorithm,
    warn: impl FnMut(String),
) -> Option<Vec<u8>> {
    let mut hasher = Hasher::new(algorithm)?;
    let records = store.enumerate_canonical();
    hash_records_into(&mut hasher, &records, store.origin(), policy.digest_record_type(), warn);
    Some(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use zonedigest_proto::rdata::A;
    use zonedigest_proto::{Class, Rdata};

    use crate::store::FlatStore;

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
    fn order_independent() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut a = FlatStore::new(origin.clone());
        a.add(a_record("www.example.com", "192.0.2.1"));
        a.add(a_record("mail.example.com", "192.0.2.2"));

        let mut b = FlatStore::new(origin);
        b.add(a_record("mail.example.com", "192.0.2.2"));
        b.add(a_record("www.example.com", "192.0.2.1"));

        let da = digest_flat(&a, RecordEncoderPolicy::Typed, DigestAlgorithm::SHA384, |_| {});
        let db = digest_flat(&b, RecordEncoderPolicy::Typed, DigestAlgorithm::SHA384, |_| {});
        assert_eq!(da, db);
    }

    #[test]
    fn duplicate_records_collapse() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut with_dup = FlatStore::new(origin.clone());
        with_dup.add(a_record("www.example.com", "192.0.2.1"));
        with_dup.add(a_record("www.example.com", "192.0.2.1"));

        let mut without_dup = FlatStore::new(origin);
        without_dup.add(a_record("www.example.com", "192.0.2.1"));

        let mut warned = false;
        let d_dup = digest_flat(&with_dup, RecordEncoderPolicy::Typed, DigestAlgorithm::SHA384, |_| {
            warned = true;
        });
        let d_plain = digest_flat(
            &without_dup,
            RecordEncoderPolicy::Typed,
            DigestAlgorithm::SHA384,
            |_| {},
        );
        assert!(warned);
        assert_eq!(d_dup, d_plain);
    }

    #[test]
    fn unsupported_algorithm_returns_none() {
        let origin = Name::from_ascii("example.com").unwrap();
        let store = FlatStore::new(origin);
        assert!(digest_flat(
            &store,
            RecordEncoderPolicy::Typed,
            DigestAlgorithm::Unassigned(99),
            |_| {}
        )
        .is_none());
    }
}
