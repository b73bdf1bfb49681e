//! Apex operations (C3): locating the digest records and their covering `RRSIG`s at the zone
//! apex.

use zonedigest_proto::{NonOptRecord, RecordType};

use crate::encoder::RecordEncoderPolicy;
use crate::store::ZoneStore;

/// Returns every apex record whose type is the digest type under `policy`, preserving the order
/// in which the store reports them.
pub fn find_apex_digest_records<'a>(
    store: &'a dyn ZoneStore,
    policy: RecordEncoderPolicy,
) -> Vec<&'a NonOptRecord> {
    let digest_type = policy.digest_record_type();
    store
        .apex_records()
        .into_iter()
        .filter(|rec| rec.rtype == digest_type)
        .collect()
}

/// Returns mutable references to every apex digest record under `policy`.
pub fn find_apex_digest_records_mut<'a>(
    store: &'a mut dyn ZoneStore,
    policy: RecordEncoderPolicy,
) -> Vec<&'a mut NonOptRecord> {
    let digest_type = policy.digest_record_type();
    store
        .apex_records_mut()
        .into_iter()
        .filter(|rec| rec.rtype == digest_type)
        .collect()
}

/// Returns every apex `RRSIG` that covers `type_covered`.
pub fn find_apex_rrsigs_covering<'a>(
    store: &'a dyn ZoneStore,
    type_covered: RecordType,
) -> Vec<&'a NonOptRecord> {
    store
        .apex_records()
        .into_iter()
        .filter(|rec| {
            rec.rtype == RecordType::RRSIG
                && rec
                    .rdata()
                    .as_rrsig()
                    .map(|rrsig| rrsig.type_covered == type_covered)
                    .unwrap_or(false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use zonedigest_proto::rdata::zonemd::{DigestAlgorithm, ZONEMD};
    use zonedigest_proto::{Class, Name, Rdata};

    use crate::store::FlatStore;

    use super::*;

    #[test]
    fn finds_only_digest_type_records_at_apex() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut store = FlatStore::new(origin.clone());
        store.add(
            NonOptRecord::new(
                origin.clone(),
                Class::IN,
                3600,
                Rdata::ZONEMD(ZONEMD {
                    serial: 1,
                    algorithm: DigestAlgorithm::SHA384,
                    reserved: 0,
                    digest: vec![0; 48],
                }),
            )
            .unwrap(),
        );
        store.add(
            NonOptRecord::new(
                Name::from_ascii("www.example.com").unwrap(),
                Class::IN,
                3600,
                Rdata::A(zonedigest_proto::rdata::A {
                    address: "192.0.2.1".parse().unwrap(),
                }),
            )
            .unwrap(),
        );

        let found = find_apex_digest_records(&store, RecordEncoderPolicy::Typed);
        assert_eq!(found.len(), 1);
    }
}
