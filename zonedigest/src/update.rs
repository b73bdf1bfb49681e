//! Incremental update-file application: `add`/`del` directives applied to a zone store after
//! initial load (see spec §6's update-file format).

use zonedigest_proto::{Name, NonOptRecord};

use crate::error::DriverError;
use crate::store::ZoneStore;

/// A single parsed update directive.
#[derive(Debug)]
enum Directive {
    Add(NonOptRecord),
    Del(NonOptRecord),
}

/// Whether a line failed to parse because it doesn't start with a recognized verb, or because it
/// does but the RR body after it doesn't parse. Only the latter aborts (see spec §6: "Lines
/// failing to parse a leading `add`/`del` token ... emit a warning and are skipped; an
/// unparseable RR aborts").
enum DirectiveError {
    UnrecognizedVerb,
    MalformedRr(zonedigest_proto::error::ZoneFileError),
}

/// Parses and applies every directive in `input`, one per line, against `store`.
///
/// Lines that fail to parse a leading `add`/`del` token are reported through `warn` and skipped.
/// A line that does start with `add`/`del` but whose RR body fails to parse aborts the run
/// with [`DriverError::Update`]. `del` removes the first record equal in owner, type, class, and
/// RDATA to the one given; if none matches, a warning is emitted and the directive is otherwise a
/// no-op. `default_ttl` is used for directives that omit an explicit TTL.
pub fn apply(
    store: &mut dyn ZoneStore,
    input: impl std::io::BufRead,
    default_ttl: u32,
    mut warn: impl FnMut(String),
) -> Result<(), DriverError> {
    let origin = store.origin().clone();

    for (lineno, line) in input.lines().enumerate() {
        let lineno = lineno + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }

        match parse_directive(trimmed, &origin, default_ttl) {
            Ok(Directive::Add(record)) => store.add(record),
            Ok(Directive::Del(record)) => {
                if !remove_matching(store, &record) {
                    warn(format!(
                        "line {}: del directive does not match any stored record, ignoring",
                        lineno
                    ));
                }
            }
            Err(DirectiveError::UnrecognizedVerb) => warn(format!(
                "line {}: does not start with 'add' or 'del', skipping",
                lineno
            )),
            Err(DirectiveError::MalformedRr(e)) => {
                return Err(DriverError::Update(format!("line {}: {}", lineno, e)))
            }
        }
    }

    Ok(())
}

fn parse_directive(
    line: &str,
    origin: &Name,
    default_ttl: u32,
) -> Result<Directive, DirectiveError> {
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .ok_or(DirectiveError::UnrecognizedVerb)?;

    if verb.eq_ignore_ascii_case("add") {
        let record = zonedigest_proto::zonefile::parse_record_line(rest, origin, default_ttl)
            .map_err(DirectiveError::MalformedRr)?;
        Ok(Directive::Add(record))
    } else if verb.eq_ignore_ascii_case("del") {
        let record = zonedigest_proto::zonefile::parse_record_line(rest, origin, default_ttl)
            .map_err(DirectiveError::MalformedRr)?;
        Ok(Directive::Del(record))
    } else {
        Err(DirectiveError::UnrecognizedVerb)
    }
}

/// Removes the first record in `store` equal to `target` in owner, type, class, and RDATA.
/// Returns whether a record was removed.
fn remove_matching(store: &mut dyn ZoneStore, target: &NonOptRecord) -> bool {
    store.remove_first(&mut |rec| {
        rec.owner == target.owner
            && rec.rtype == target.rtype
            && rec.class == target.class
            && rec.rdata() == target.rdata()
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

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
    fn add_directive_inserts_record() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut store = FlatStore::new(origin);
        let input = "add new.example.com 3600 IN A 192.0.2.5\n";
        apply(&mut store, Cursor::new(input), 3600, |_| {}).unwrap();
        assert_eq!(store.enumerate_canonical().len(), 1);
    }

    #[test]
    fn del_directive_removes_matching_record() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut store = FlatStore::new(origin);
        store.add(a_record("www.example.com", "192.0.2.1"));
        store.add(a_record("mail.example.com", "192.0.2.2"));

        let input = "del www.example.com 3600 IN A 192.0.2.1\n";
        apply(&mut store, Cursor::new(input), 3600, |_| {}).unwrap();

        let remaining = store.enumerate_canonical();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].owner, Name::from_ascii("mail.example.com").unwrap());
    }

    #[test]
    fn del_directive_with_no_match_warns() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut store = FlatStore::new(origin);
        store.add(a_record("www.example.com", "192.0.2.1"));

        let input = "del www.example.com 3600 IN A 192.0.2.9\n";
        let mut warnings = Vec::new();
        apply(&mut store, Cursor::new(input), 3600, |m| warnings.push(m)).unwrap();
        assert_eq!(store.enumerate_canonical().len(), 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn unrecognized_verb_warns_and_is_skipped() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut store = FlatStore::new(origin);
        let input = "bogus line here\n";
        let mut warnings = Vec::new();
        apply(&mut store, Cursor::new(input), 3600, |m| warnings.push(m)).unwrap();
        assert!(store.enumerate_canonical().is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn malformed_rr_body_after_add_aborts() {
        let origin = Name::from_ascii("example.com").unwrap();
        let mut store = FlatStore::new(origin);
        let input = "add www.example.com 3600 IN A not-an-address\n";
        let err = apply(&mut store, Cursor::new(input), 3600, |_| {}).unwrap_err();
        assert!(matches!(err, DriverError::Update(_)));
        assert!(store.enumerate_canonical().is_empty());
    }
}
