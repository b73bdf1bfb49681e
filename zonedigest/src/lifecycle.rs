//! Placeholder insertion and the calculate/verify lifecycle of the apex digest record (C5).

use data_encoding::HEXUPPER;
use zonedigest_proto::rdata::zonemd::{DigestAlgorithm, ZONEMD};
use zonedigest_proto::signing::ZoneSigningKey;
use zonedigest_proto::{dnssec::RrSet, Class, Name, RecordType, Rdata};

use crate::apex;
use crate::encoder::RecordEncoderPolicy;
use crate::error::DriverError;
use crate::store::ZoneStore;

/// Reads the zone's current SOA record at `origin`. Used both to stamp placeholders with the
/// zone's serial/TTL and to compare against a stored digest record's serial at verify time.
fn soa_record<'a>(
    store: &'a dyn ZoneStore,
) -> Option<(&'a zonedigest_proto::rdata::soa::SOA, u32)> {
    store
        .apex_records()
        .into_iter()
        .find(|rec| rec.rtype == RecordType::SOA)
        .and_then(|rec| rec.rdata().as_soa().map(|soa| (soa, rec.ttl)))
}

/// Inserts a placeholder apex digest record (digest bytes all zero) for each algorithm in
/// `algorithms`, after removing any that already exist.
///
/// `algorithms` is deduplicated preserving first occurrence; duplicates are reported through
/// `warn` and otherwise ignored (I3, S4). Requesting an algorithm this build cannot produce a
/// digest for aborts, since placeholder creation cannot proceed without knowing the eventual
/// digest length.
pub fn add_placeholders(
    store: &mut dyn ZoneStore,
    algorithms: &[u8],
    policy: RecordEncoderPolicy,
    mut warn: impl FnMut(String),
) -> Result<(), DriverError> {
    let digest_type = policy.digest_record_type();
    store.remove_at_apex(digest_type, None);

    let (soa, soa_ttl) = soa_record(store).ok_or(DriverError::MissingSoa)?;
    let serial = soa.serial;
    let origin = store.origin().clone();

    let mut seen = Vec::new();
    for &algorithm in algorithms {
        if seen.contains(&algorithm) {
            warn(format!(
                "duplicate placeholder requested for algorithm {}, ignoring",
                algorithm
            ));
            continue;
        }
        seen.push(algorithm);

        let parsed: DigestAlgorithm = algorithm.into();
        let output_len = parsed
            .output_len()
            .ok_or(DriverError::UnsupportedAlgorithm(algorithm))?;

        let mut record = zonedigest_proto::NonOptRecord::new(
            origin.clone(),
            Class::IN,
            soa_ttl,
            Rdata::ZONEMD(ZONEMD {
                serial,
                algorithm: parsed,
                reserved: 0,
                digest: vec![0; output_len],
            }),
        )
        .expect("constructing a ZONEMD record cannot fail");
        policy.apply(&mut record);
        store.add(record);
    }

    Ok(())
}

/// Computes the zone digest for every apex digest record and patches it in place, then, if
/// `signing_key` is given, re-signs the apex digest record set.
pub fn calculate(
    store: &mut dyn ZoneStore,
    policy: RecordEncoderPolicy,
    signing_key: Option<&ZoneSigningKey>,
    mut warn: impl FnMut(String),
) -> Result<(), DriverError> {
    let algorithms: Vec<DigestAlgorithm> = apex::find_apex_digest_records(store, policy)
        .iter()
        .filter_map(|rec| rec.rdata().as_zonemd().map(|z| z.algorithm))
        .collect();
    if algorithms.is_empty() {
        return Err(DriverError::NoDigestRecord);
    }

    let mut computed = Vec::new();
    for algorithm in algorithms {
        match store.digest(policy, algorithm, &mut warn) {
            Some(digest) => computed.push((algorithm, digest)),
            None => warn(format!(
                "algorithm {:?} is not supported, leaving its digest record unpatched",
                algorithm
            )),
        }
    }

    for rec in apex::find_apex_digest_records_mut(store, policy) {
        let Some(zonemd) = rec.rdata().as_zonemd().cloned() else {
            continue;
        };
        if let Some((_, digest)) = computed.iter().find(|(a, _)| *a == zonemd.algorithm) {
            let mut patched = zonemd;
            patched.digest = digest.clone();
            rec.set_rdata(Rdata::ZONEMD(patched))
                .expect("re-encoding a ZONEMD record cannot fail");
        }
    }

    if let Some(key) = signing_key {
        let digest_type = policy.digest_record_type();
        store.remove_at_apex(RecordType::RRSIG, Some(digest_type));

        let origin = store.origin().clone();
        let records: Vec<_> = apex::find_apex_digest_records(store, policy)
            .into_iter()
            .cloned()
            .collect();
        let ttl = records.first().map(|r| r.ttl).unwrap_or(3600);
        let mut rrset = RrSet::new(records).map_err(DriverError::Dnssec)?;

        let now = now_unix();
        let inception = now.saturating_sub(3600);
        let expiration = now.saturating_add(30 * 24 * 3600);
        let labels = origin.label_count();

        let rrsig = rrset
            .sign(key, labels, ttl, inception, expiration)
            .map_err(DriverError::Dnssec)?;
        let rrsig_record =
            zonedigest_proto::NonOptRecord::new(origin, Class::IN, ttl, Rdata::RRSIG(rrsig))
                .expect("constructing an RRSIG record cannot fail");
        store.add(rrsig_record);
    }

    Ok(())
}

/// Verifies every apex digest record against a freshly computed digest and the current SOA
/// serial.
///
/// Returns `true` if every check passed. Failures are reported through `warn`/`report` but do not
/// abort; every apex digest record is checked regardless of earlier failures.
pub fn verify(
    store: &mut dyn ZoneStore,
    policy: RecordEncoderPolicy,
    mut report: impl FnMut(String),
) -> Result<bool, DriverError> {
    let current_serial = soa_record(store).map(|(soa, _)| soa.serial);

    let records: Vec<_> = apex::find_apex_digest_records(store, policy)
        .into_iter()
        .cloned()
        .collect();
    if records.is_empty() {
        return Err(DriverError::NoDigestRecord);
    }

    let mut ok = true;
    for record in records {
        let Some(zonemd) = record.rdata().as_zonemd() else {
            continue;
        };

        if let Some(current) = current_serial {
            if zonemd.serial != current {
                report(format!(
                    "SOA serial ({}) does not match digest record serial ({})",
                    current, zonemd.serial
                ));
                ok = false;
            }
        }

        let mut warn_noop = |_: String| {};
        let computed = match store.digest(policy, zonemd.algorithm, &mut warn_noop) {
            Some(digest) => digest,
            None => {
                report(format!(
                    "algorithm {:?} is not supported, skipping",
                    zonemd.algorithm
                ));
                continue;
            }
        };

        if computed != zonemd.digest {
            report(format!(
                "digest mismatch for algorithm {:?}: stored {}, computed {}",
                zonemd.algorithm,
                HEXUPPER.encode(&zonemd.digest),
                HEXUPPER.encode(&computed)
            ));
            ok = false;
        }
    }

    Ok(ok)
}

/// Returns the current Unix time. Kept as its own function so signing's inception/expiration
/// window is computed in exactly one place.
fn now_unix() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as u32
}

#[cfg(test)]
mod tests {
    use zonedigest_proto::rdata::soa::SOA;
    use zonedigest_proto::Class;

    use crate::store::FlatStore;

    use super::*;

    fn zone_with_soa(origin: &Name, serial: u32) -> FlatStore {
        let mut store = FlatStore::new(origin.clone());
        store.add(
            zonedigest_proto::NonOptRecord::new(
                origin.clone(),
                Class::IN,
                3600,
                Rdata::SOA(SOA {
                    mname: Name::from_ascii("ns1.example.com").unwrap(),
                    rname: Name::from_ascii("hostmaster.example.com").unwrap(),
                    serial,
                    refresh: 3600,
                    retry: 900,
                    expire: 604800,
                    minimum: 3600,
                }),
            )
            .unwrap(),
        );
        store
    }

    #[test]
    fn placeholder_then_calculate_then_verify_round_trips() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut store = zone_with_soa(&origin, 2024010100);
        store.add(
            zonedigest_proto::NonOptRecord::new(
                Name::from_ascii("www.example.com").unwrap(),
                Class::IN,
                3600,
                Rdata::A(zonedigest_proto::rdata::A {
                    address: "192.0.2.1".parse().unwrap(),
                }),
            )
            .unwrap(),
        );

        add_placeholders(&mut store, &[1], RecordEncoderPolicy::Typed, |_| {}).unwrap();
        calculate(&mut store, RecordEncoderPolicy::Typed, None, |_| {}).unwrap();
        let ok = verify(&mut store, RecordEncoderPolicy::Typed, |_| {}).unwrap();
        assert!(ok);
    }

    #[test]
    fn verify_detects_tampering() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut store = zone_with_soa(&origin, 1);
        add_placeholders(&mut store, &[1], RecordEncoderPolicy::Typed, |_| {}).unwrap();
        calculate(&mut store, RecordEncoderPolicy::Typed, None, |_| {}).unwrap();

        store.add(
            zonedigest_proto::NonOptRecord::new(
                Name::from_ascii("new.example.com").unwrap(),
                Class::IN,
                3600,
                Rdata::A(zonedigest_proto::rdata::A {
                    address: "192.0.2.9".parse().unwrap(),
                }),
            )
            .unwrap(),
        );

        let mut messages = Vec::new();
        let ok = verify(&mut store, RecordEncoderPolicy::Typed, |m| messages.push(m)).unwrap();
        assert!(!ok);
        assert!(!messages.is_empty());
    }

    #[test]
    fn duplicate_placeholder_requests_coalesce() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut store = zone_with_soa(&origin, 1);
        let mut warnings = Vec::new();
        add_placeholders(&mut store, &[1, 1], RecordEncoderPolicy::Typed, |m| {
            warnings.push(m)
        })
        .unwrap();
        assert_eq!(apex::find_apex_digest_records(&store, RecordEncoderPolicy::Typed).len(), 1);
        assert_eq!(warnings.len(), 1);
    }
}
