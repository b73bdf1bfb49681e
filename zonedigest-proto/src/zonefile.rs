//! Reading and writing DNS zones in presentation (text) format.
//!
//! This supports a practical subset of [RFC 1035](https://www.rfc-editor.org/rfc/rfc1035)'s
//! master file grammar: `$ORIGIN` and `$TTL` directives, parenthesized multi-line records,
//! `;`-comments, an explicit owner name on every record (no blank-field continuation), and
//! RDATA given either in a type's native presentation form or as the generic
//! [RFC 3597](https://www.rfc-editor.org/rfc/rfc3597) `\# <len> <hex>` escape, which is accepted
//! for every record type and is the only form accepted for types this module has no native
//! reader for.

use std::io::{BufRead, Write};
use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::TimeZone;
use data_encoding::{BASE64, HEXUPPER};

use crate::error::ZoneFileError;
use crate::name::Name;
use crate::rdata::dnskey::{Algorithm as DnskeyAlgorithm, DNSKEY};
use crate::rdata::rrsig::RRSIG;
use crate::rdata::soa::SOA;
use crate::rdata::zonemd::{DigestAlgorithm, ZONEMD};
use crate::rdata::{Rdata, A, AAAA, CNAME, MX, NS, PTR, SRV, TXT};
use crate::{Class, NonOptRecord, RecordType};

/// Reads a zone from `input` in presentation format.
///
/// Owner names that are not fully qualified (no trailing dot) are resolved against the most
/// recent `$ORIGIN` directive, defaulting to `origin`.
///
/// Out-of-zone records (owner neither equal to nor below `origin`) are reported via `warn` and
/// omitted from the returned list, per the load-time rejection rule.
pub fn read(
    input: impl BufRead,
    origin: &Name,
    mut warn: impl FnMut(String),
) -> Result<Vec<NonOptRecord>, ZoneFileError> {
    let mut records = Vec::new();
    let mut current_origin = origin.clone();
    let mut default_ttl: u32 = 3600;

    for (lineno, logical_line) in join_parens(input)?.into_iter().enumerate() {
        let lineno = lineno + 1;
        let line = strip_comment(&logical_line);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("$ORIGIN") {
            current_origin = Name::from_ascii(rest.trim())?;
            continue;
        }
        if let Some(rest) = line.strip_prefix("$TTL") {
            default_ttl = rest
                .trim()
                .parse()
                .map_err(|_| ZoneFileError::MalformedRecord(lineno, "invalid $TTL".to_string()))?;
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let record = match parse_record(&tokens, &current_origin, default_ttl, lineno) {
            Ok(record) => record,
            Err(e) => return Err(e),
        };

        if origin.zone_of(&record.owner) {
            records.push(record);
        } else {
            warn(format!(
                "line {}: record owner {} is outside of zone {}, skipping",
                lineno, record.owner, origin
            ));
        }
    }

    Ok(records)
}

/// Sorts `records` into canonical zone order: by owner name, then by type, then by RDATA wire
/// bytes. See [`Name`]'s `Ord` impl for the owner name ordering rules.
pub fn sort_canonical(records: &mut [NonOptRecord]) {
    records.sort_by(|a, b| {
        a.owner
            .cmp(&b.owner)
            .then_with(|| u16::from(a.rtype).cmp(&u16::from(b.rtype)))
            .then_with(|| {
                let a_rdata = a.rdata().encode().unwrap_or_default();
                let b_rdata = b.rdata().encode().unwrap_or_default();
                a_rdata.cmp(&b_rdata)
            })
    });
}

/// Finds the single SOA record among `records` at `origin`.
///
/// Returns [`ZoneFileError::MissingSoa`]/[`ZoneFileError::MultipleSoa`] if there is not exactly
/// one.
pub fn find_soa<'a>(
    records: &'a [NonOptRecord],
    origin: &Name,
) -> Result<&'a SOA, ZoneFileError> {
    let mut found = records
        .iter()
        .filter(|rec| &rec.owner == origin && rec.rtype == RecordType::SOA)
        .filter_map(|rec| rec.rdata().as_soa());

    let soa = found.next().ok_or(ZoneFileError::MissingSoa)?;
    if found.next().is_some() {
        return Err(ZoneFileError::MultipleSoa);
    }
    Ok(soa)
}

/// Writes `records` to `output` in canonical presentation format, one record per line.
///
/// `records` should already be in canonical order; this function does not sort.
pub fn write(records: &[NonOptRecord], mut output: impl Write) -> Result<(), ZoneFileError> {
    for record in records {
        let line = record.as_string(false, None, None, None);
        writeln!(output, "{}", line)?;
    }
    Ok(())
}

/// Parses a single record given in presentation format, e.g. the RR body of an update-file
/// directive.
///
/// Unlike [`read()`], this does not track `$ORIGIN`/`$TTL` state or reject out-of-zone owners;
/// the caller is expected to do that (an update directive's target zone is implied by context,
/// not by a preceding `$ORIGIN`).
pub fn parse_record_line(
    line: &str,
    origin: &Name,
    default_ttl: u32,
) -> Result<NonOptRecord, ZoneFileError> {
    let line = strip_comment(line);
    let tokens: Vec<&str> = line.split_whitespace().collect();
    parse_record(&tokens, origin, default_ttl, 0)
}

fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Joins parenthesized multi-line records into a single logical line each, so that the rest of
/// the reader can work line-by-line. Comments are left untouched here; `strip_comment` runs
/// per logical line afterwards.
fn join_parens(input: impl BufRead) -> Result<Vec<String>, ZoneFileError> {
    let mut logical_lines = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;

    for line in input.lines() {
        let line = line?;
        let comment_free = strip_comment(&line);
        depth += comment_free.matches('(').count() as i32;
        depth -= comment_free.matches(')').count() as i32;

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&line.replace(['(', ')'], " "));

        if depth <= 0 {
            logical_lines.push(std::mem::take(&mut current));
            depth = 0;
        }
    }
    if !current.trim().is_empty() {
        logical_lines.push(current);
    }

    Ok(logical_lines)
}

fn parse_record(
    tokens: &[&str],
    origin: &Name,
    default_ttl: u32,
    lineno: usize,
) -> Result<NonOptRecord, ZoneFileError> {
    if tokens.is_empty() {
        return Err(ZoneFileError::MalformedRecord(lineno, "empty line".to_string()));
    }

    let owner = resolve_name(tokens[0], origin)?;
    let mut idx = 1;

    let mut ttl = default_ttl;
    let mut class = Class::IN;

    loop {
        let Some(tok) = tokens.get(idx) else {
            return Err(ZoneFileError::MalformedRecord(
                lineno,
                "missing record type".to_string(),
            ));
        };
        if let Ok(parsed_ttl) = tok.parse::<u32>() {
            ttl = parsed_ttl;
            idx += 1;
        } else if tok.eq_ignore_ascii_case("IN") {
            class = Class::IN;
            idx += 1;
        } else if tok.eq_ignore_ascii_case("CH") || tok.eq_ignore_ascii_case("HS") {
            return Err(ZoneFileError::UnknownClass((*tok).to_string(), lineno));
        } else {
            break;
        }
    }

    let rtype_token = tokens[idx];
    idx += 1;
    let rtype = parse_record_type(rtype_token, lineno)?;
    let rdata_tokens = &tokens[idx..];

    let rdata = if rdata_tokens.first() == Some(&"\\#") {
        parse_generic_rdata(rdata_tokens, lineno)?
    } else {
        parse_typed_rdata(rtype, rdata_tokens, origin, lineno)?
    };

    let mut record = NonOptRecord::new(owner, class, ttl, rdata)
        .map_err(|e| ZoneFileError::MalformedRecord(lineno, e.to_string()))?;
    // a record using the generic `\#` escape keeps its declared type even if it is one we also
    // know how to parse natively (e.g. to force opaque encoding of a ZONEMD record).
    record.rtype = rtype;
    Ok(record)
}

fn resolve_name(token: &str, origin: &Name) -> Result<Name, ZoneFileError> {
    if token == "@" {
        return Ok(origin.clone());
    }
    if token.ends_with('.') {
        return Ok(Name::from_ascii(token.trim_end_matches('.'))?);
    }
    let mut name = Name::from_ascii(token)?;
    name.append_name(origin.clone());
    Ok(name)
}

fn parse_record_type(token: &str, lineno: usize) -> Result<RecordType, ZoneFileError> {
    if let Some(digits) = token.strip_prefix("TYPE") {
        let value: u16 = digits
            .parse()
            .map_err(|_| ZoneFileError::UnknownRecordType(token.to_string(), lineno))?;
        return Ok(value.into());
    }
    match token.to_ascii_uppercase().as_str() {
        "A" => Ok(RecordType::A),
        "NS" => Ok(RecordType::NS),
        "CNAME" => Ok(RecordType::CNAME),
        "SOA" => Ok(RecordType::SOA),
        "PTR" => Ok(RecordType::PTR),
        "MX" => Ok(RecordType::MX),
        "TXT" => Ok(RecordType::TXT),
        "AAAA" => Ok(RecordType::AAAA),
        "SRV" => Ok(RecordType::SRV),
        "RRSIG" => Ok(RecordType::RRSIG),
        "DNSKEY" => Ok(RecordType::DNSKEY),
        "ZONEMD" => Ok(RecordType::ZONEMD),
        _ => Err(ZoneFileError::UnknownRecordType(token.to_string(), lineno)),
    }
}

fn parse_generic_rdata(tokens: &[&str], lineno: usize) -> Result<Rdata, ZoneFileError> {
    // `\# <len> <hex...>`, see RFC 3597 Section 5
    let len: usize = tokens
        .get(1)
        .ok_or_else(|| ZoneFileError::MalformedRecord(lineno, "missing \\# length".to_string()))?
        .parse()
        .map_err(|_| ZoneFileError::MalformedRecord(lineno, "invalid \\# length".to_string()))?;
    let hex: String = tokens[2..].concat();
    let bytes = HEXUPPER
        .decode(hex.to_ascii_uppercase().as_bytes())
        .map_err(|_| ZoneFileError::MalformedRecord(lineno, "invalid hex in \\# escape".to_string()))?;
    if bytes.len() != len {
        return Err(ZoneFileError::MalformedRecord(
            lineno,
            format!("\\# declared {} bytes but got {}", len, bytes.len()),
        ));
    }
    Ok(Rdata::Unknown(bytes))
}

fn parse_typed_rdata(
    rtype: RecordType,
    tokens: &[&str],
    origin: &Name,
    lineno: usize,
) -> Result<Rdata, ZoneFileError> {
    let err = |msg: &str| ZoneFileError::MalformedRecord(lineno, msg.to_string());
    match rtype {
        RecordType::A => {
            let address = tokens
                .first()
                .ok_or_else(|| err("missing A address"))?
                .parse::<Ipv4Addr>()
                .map_err(|_| err("invalid IPv4 address"))?;
            Ok(Rdata::A(A { address }))
        }
        RecordType::AAAA => {
            let address = tokens
                .first()
                .ok_or_else(|| err("missing AAAA address"))?
                .parse::<Ipv6Addr>()
                .map_err(|_| err("invalid IPv6 address"))?;
            Ok(Rdata::AAAA(AAAA { address }))
        }
        RecordType::NS => Ok(Rdata::NS(NS {
            name: resolve_name(tokens.first().ok_or_else(|| err("missing NS target"))?, origin)?,
        })),
        RecordType::CNAME => Ok(Rdata::CNAME(CNAME {
            cname: resolve_name(tokens.first().ok_or_else(|| err("missing CNAME target"))?, origin)?,
        })),
        RecordType::PTR => Ok(Rdata::PTR(PTR {
            location: resolve_name(tokens.first().ok_or_else(|| err("missing PTR target"))?, origin)?,
        })),
        RecordType::MX => {
            let preference = tokens
                .first()
                .ok_or_else(|| err("missing MX preference"))?
                .parse()
                .map_err(|_| err("invalid MX preference"))?;
            let exchange = resolve_name(tokens.get(1).ok_or_else(|| err("missing MX exchange"))?, origin)?;
            Ok(Rdata::MX(MX {
                preference,
                exchange,
            }))
        }
        RecordType::TXT => {
            let text = tokens
                .iter()
                .map(|tok| tok.trim_matches('"').to_string())
                .collect();
            Ok(Rdata::TXT(TXT { text }))
        }
        RecordType::SRV => {
            let priority = tokens.first().ok_or_else(|| err("missing SRV priority"))?.parse().map_err(|_| err("invalid SRV priority"))?;
            let weight = tokens.get(1).ok_or_else(|| err("missing SRV weight"))?.parse().map_err(|_| err("invalid SRV weight"))?;
            let port = tokens.get(2).ok_or_else(|| err("missing SRV port"))?.parse().map_err(|_| err("invalid SRV port"))?;
            let target = resolve_name(tokens.get(3).ok_or_else(|| err("missing SRV target"))?, origin)?;
            Ok(Rdata::SRV(SRV {
                priority,
                weight,
                port,
                target,
            }))
        }
        RecordType::SOA => {
            if tokens.len() < 7 {
                return Err(err("SOA record needs 7 fields"));
            }
            let mname = resolve_name(tokens[0], origin)?;
            let rname = resolve_name(tokens[1], origin)?;
            let serial = tokens[2].parse().map_err(|_| err("invalid SOA serial"))?;
            let refresh = tokens[3].parse().map_err(|_| err("invalid SOA refresh"))?;
            let retry = tokens[4].parse().map_err(|_| err("invalid SOA retry"))?;
            let expire = tokens[5].parse().map_err(|_| err("invalid SOA expire"))?;
            let minimum = tokens[6].parse().map_err(|_| err("invalid SOA minimum"))?;
            Ok(Rdata::SOA(SOA {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            }))
        }
        RecordType::ZONEMD => {
            if tokens.len() < 4 {
                return Err(err("ZONEMD record needs 4 fields"));
            }
            let serial = tokens[0].parse().map_err(|_| err("invalid ZONEMD serial"))?;
            let algorithm_val: u8 = tokens[1].parse().map_err(|_| err("invalid ZONEMD algorithm"))?;
            let reserved = tokens[2].parse().map_err(|_| err("invalid ZONEMD reserved byte"))?;
            let digest = HEXUPPER
                .decode(tokens[3..].concat().to_ascii_uppercase().as_bytes())
                .map_err(|_| err("invalid ZONEMD digest hex"))?;
            Ok(Rdata::ZONEMD(ZONEMD {
                serial,
                algorithm: algorithm_val.into(),
                reserved,
                digest,
            }))
        }
        RecordType::DNSKEY => {
            if tokens.len() < 4 {
                return Err(err("DNSKEY record needs 4 fields"));
            }
            let flags: u16 = tokens[0].parse().map_err(|_| err("invalid DNSKEY flags"))?;
            let protocol: u8 = tokens[1].parse().map_err(|_| err("invalid DNSKEY protocol"))?;
            if protocol != 3 {
                return Err(err("DNSKEY protocol must be 3"));
            }
            let algorithm_val: u8 = tokens[2].parse().map_err(|_| err("invalid DNSKEY algorithm"))?;
            let key = BASE64
                .decode(tokens[3..].concat().as_bytes())
                .map_err(|_| err("invalid DNSKEY key base64"))?;
            Ok(Rdata::DNSKEY(DNSKEY {
                zone: (flags & (1 << 8)) != 0,
                revoked: (flags & (1 << 7)) != 0,
                secure_entry_point: (flags & 1) != 0,
                algorithm: DnskeyAlgorithm::from(algorithm_val),
                key,
            }))
        }
        RecordType::RRSIG => {
            if tokens.len() < 9 {
                return Err(err("RRSIG record needs 9 fields"));
            }
            let type_covered = parse_record_type(tokens[0], lineno)?;
            let algorithm_val: u8 = tokens[1].parse().map_err(|_| err("invalid RRSIG algorithm"))?;
            let labels = tokens[2].parse().map_err(|_| err("invalid RRSIG labels"))?;
            let original_ttl = tokens[3].parse().map_err(|_| err("invalid RRSIG original TTL"))?;
            let signature_expiration = parse_rrsig_time(tokens[4])
                .ok_or_else(|| err("invalid RRSIG expiration"))?;
            let signature_inception =
                parse_rrsig_time(tokens[5]).ok_or_else(|| err("invalid RRSIG inception"))?;
            let key_tag = tokens[6].parse().map_err(|_| err("invalid RRSIG key tag"))?;
            let signer_name = resolve_name(tokens[7], origin)?;
            let signature = BASE64
                .decode(tokens[8..].concat().as_bytes())
                .map_err(|_| err("invalid RRSIG signature base64"))?;
            Ok(Rdata::RRSIG(RRSIG {
                type_covered,
                algorithm: DnskeyAlgorithm::from(algorithm_val),
                labels,
                original_ttl,
                signature_expiration,
                signature_inception,
                key_tag,
                signer_name,
                signature,
            }))
        }
        _ => Err(ZoneFileError::MalformedRecord(
            lineno,
            format!(
                "no native presentation-format reader for {:?}; use the \\# escape",
                rtype
            ),
        )),
    }
}

fn parse_rrsig_time(token: &str) -> Option<u32> {
    if let Ok(value) = token.parse::<u32>() {
        return Some(value);
    }
    let dt = chrono::Utc
        .datetime_from_str(token, "%Y%m%d%H%M%S")
        .ok()?;
    Some(dt.timestamp() as u32)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_simple_zone() {
        let zone = "\
example.com. 3600 IN SOA ns1.example.com. hostmaster.example.com. 2024010100 3600 900 604800 3600
example.com. 3600 IN NS ns1.example.com.
example.com. 3600 IN A 192.0.2.1
www.example.com. 3600 IN A 192.0.2.2
";
        let origin = Name::from_ascii("example.com").unwrap();
        let records = read(Cursor::new(zone), &origin, |_| {}).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].rtype, RecordType::SOA);
    }

    #[test]
    fn resolves_relative_names_against_origin() {
        let zone = "www 3600 IN A 192.0.2.1\n";
        let origin = Name::from_ascii("example.com").unwrap();
        let records = read(Cursor::new(zone), &origin, |_| {}).unwrap();
        assert_eq!(records[0].owner, Name::from_ascii("www.example.com").unwrap());
    }

    #[test]
    fn joins_parenthesized_soa() {
        let zone = "example.com. 3600 IN SOA ns1.example.com. hostmaster.example.com. (\n    2024010100\n    3600\n    900\n    604800\n    3600 )\n";
        let origin = Name::from_ascii("example.com").unwrap();
        let records = read(Cursor::new(zone), &origin, |_| {}).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rdata().as_soa().unwrap().serial, 2024010100);
    }

    #[test]
    fn generic_escape_forces_opaque_type() {
        let zone = "example.com. 3600 IN TYPE65317 \\# 6 0000000100\n";
        let origin = Name::from_ascii("example.com").unwrap();
        let records = read(Cursor::new(zone), &origin, |_| {}).unwrap();
        assert_eq!(records[0].rtype, RecordType::Unknown(65317));
    }

    #[test]
    fn sorts_by_owner_then_type_then_rdata() {
        let zone = "\
example.com. 3600 IN SOA ns1.example.com. hostmaster.example.com. 1 3600 900 604800 3600
example.com. 3600 IN NS ns1.example.com.
a.example.com. 3600 IN A 192.0.2.2
a.example.com. 3600 IN A 192.0.2.1
";
        let origin = Name::from_ascii("example.com").unwrap();
        let mut records = read(Cursor::new(zone), &origin, |_| {}).unwrap();
        sort_canonical(&mut records);
        assert_eq!(records[0].rtype, RecordType::NS);
        assert_eq!(records[1].rtype, RecordType::SOA);
        assert_eq!(
            records[2].rdata().as_a().unwrap().address,
            "192.0.2.1".parse().unwrap()
        );
        assert_eq!(
            records[3].rdata().as_a().unwrap().address,
            "192.0.2.2".parse().unwrap()
        );
    }

    #[test]
    fn finds_soa() {
        let zone = "example.com. 3600 IN SOA ns1.example.com. hostmaster.example.com. 1 3600 900 604800 3600\n";
        let origin = Name::from_ascii("example.com").unwrap();
        let records = read(Cursor::new(zone), &origin, |_| {}).unwrap();
        assert_eq!(find_soa(&records, &origin).unwrap().serial, 1);
    }
}
