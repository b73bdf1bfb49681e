//! Canonical record encoding for the digest engine.
//!
//! This isolates the one place where the tool has to decide whether the zone-digest apex record
//! is written under its IANA type (`ZONEMD`, type 63) or, for interoperability with a parser that
//! predates the type, as opaque RDATA under the historical fallback type 65317. Both encodings
//! carry identical RDATA bytes; only the owning record's declared type differs.

use zonedigest_proto::{NonOptRecord, RecordType};

/// The registered `ZONEMD` type.
pub const ZONEMD_TYPE: u16 = 63;
/// The type used for the digest record before `ZONEMD` was assigned its own type.
pub const ZONEMD_FALLBACK_TYPE: u16 = 65317;

/// Chooses under which [`RecordType`] the apex digest record is declared.
///
/// Chosen once at startup and threaded through every place that needs to know the digest record's
/// type, rather than branching on it ad hoc or behind a conditional compilation flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecordEncoderPolicy {
    /// Declare the record as `RecordType::ZONEMD`.
    Typed,
    /// Declare the record as `RecordType::Unknown(n)`, for a collaborator that does not know the
    /// `ZONEMD` type yet.
    Opaque(u16),
}

impl Default for RecordEncoderPolicy {
    fn default() -> Self {
        RecordEncoderPolicy::Typed
    }
}

impl RecordEncoderPolicy {
    /// The [`RecordType`] a digest record's `rtype` field should carry under this policy.
    pub fn digest_record_type(&self) -> RecordType {
        match self {
            RecordEncoderPolicy::Typed => RecordType::ZONEMD,
            RecordEncoderPolicy::Opaque(n) => RecordType::Unknown(*n),
        }
    }

    /// Overrides `record`'s declared type to match this policy.
    ///
    /// `record` must carry [`zonedigest_proto::rdata::ZONEMD`] RDATA; its RDATA bytes are
    /// unaffected, only the wire `TYPE` field written for it changes.
    pub fn apply(&self, record: &mut NonOptRecord) {
        debug_assert!(record.rdata().as_zonemd().is_some());
        record.rtype = self.digest_record_type();
    }
}

/// Returns the canonical wire encoding of `record`, i.e. the bytes that would appear for it in
/// the ANSWER section of a DNS message. This is the authoritative encoding that the digest is
/// computed over.
pub fn wire(record: &NonOptRecord) -> Result<Vec<u8>, zonedigest_proto::error::EncodeError> {
    record.encode()
}

/// Returns a copy of `record`, with its digest bytes zeroed out if it is the apex digest record
/// under `digest_type`.
///
/// Per the placeholder/zeroization protocol, a digest record's own eventual digest value must not
/// be part of the data the digest is computed over, so it is hashed with its digest field set to
/// all zero bytes (the serial, algorithm, and reserved fields are left untouched).
pub fn canonical(
    record: &NonOptRecord,
    origin: &zonedigest_proto::Name,
    digest_type: RecordType,
) -> NonOptRecord {
    let mut record = record.clone();
    if &record.owner == origin && record.rtype == digest_type {
        if let Some(mut zonemd) = record.rdata().as_zonemd().cloned() {
            zonemd.digest.iter_mut().for_each(|b| *b = 0);
            // `rdata_mut()` alone would leave the cached `encoded_rdata` buffer holding the real
            // digest bytes, so `wire()` would hash the real digest instead of the zeroed one.
            record
                .set_rdata(zonedigest_proto::Rdata::ZONEMD(zonemd))
                .expect("re-encoding a ZONEMD record cannot fail");
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use zonedigest_proto::rdata::zonemd::{DigestAlgorithm, ZONEMD};
    use zonedigest_proto::{Class, Name, Rdata};

    use super::*;

    fn placeholder(origin: &Name) -> NonOptRecord {
        let rdata = Rdata::ZONEMD(ZONEMD {
            serial: 1,
            algorithm: DigestAlgorithm::SHA384,
            reserved: 0,
            digest: vec![0xAB; 48],
        });
        NonOptRecord::new(origin.clone(), Class::IN, 3600, rdata).unwrap()
    }

    #[test]
    fn canonical_zeroes_apex_digest_but_not_others() {
        let origin = Name::from_ascii("example.com").unwrap();
        let record = placeholder(&origin);
        let zeroed = canonical(&record, &origin, RecordType::ZONEMD);
        let zonemd = zeroed.rdata().as_zonemd().unwrap();
        assert!(zonemd.digest.iter().all(|&b| b == 0));
        assert_eq!(zonemd.serial, 1);
        assert_eq!(zonemd.algorithm, DigestAlgorithm::SHA384);
    }

    /// A record built with `NonOptRecord::new`/`set_rdata` carries a real digest in its cached
    /// `encoded_rdata` buffer, exactly like the apex record does by the time `verify()` runs after
    /// `calculate()`. The zeroization must be visible in the *wire* bytes, not just the `Rdata`
    /// struct, or `calculate()` and a later `verify()` would hash different bytes for what should
    /// be the same placeholder state.
    #[test]
    fn canonical_zeroes_the_wire_encoding_not_just_the_struct() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut record = placeholder(&origin);
        record
            .set_rdata(Rdata::ZONEMD(ZONEMD {
                serial: 1,
                algorithm: DigestAlgorithm::SHA384,
                reserved: 0,
                digest: vec![0xAB; 48],
            }))
            .unwrap();

        let zeroed = canonical(&record, &origin, RecordType::ZONEMD);
        let wire_bytes = wire(&zeroed).unwrap();
        let digest_bytes = &wire_bytes[wire_bytes.len() - 48..];
        assert!(digest_bytes.iter().all(|&b| b == 0), "wire encoding still carries the real digest");
    }

    #[test]
    fn opaque_policy_changes_type_not_bytes() {
        let origin = Name::from_ascii("example.com").unwrap();
        let record = placeholder(&origin);
        let mut opaque = record.clone();
        RecordEncoderPolicy::Opaque(ZONEMD_FALLBACK_TYPE).apply(&mut opaque);
        assert_eq!(opaque.rtype, RecordType::Unknown(ZONEMD_FALLBACK_TYPE));
        assert_eq!(
            wire(&record).unwrap()[wire(&record).unwrap().len() - 50..],
            wire(&opaque).unwrap()[wire(&opaque).unwrap().len() - 50..]
        );
    }
}
