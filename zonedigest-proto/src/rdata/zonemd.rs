//! `ZONEMD` RDATA definition (the zone-digest record).

use std::fmt::Display;
use std::io::{Read, Write};

use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use data_encoding::HEXUPPER;
use repr_with_fallback::repr_with_fallback;

use crate::error::{EncodeError, ParseError};

use super::{Rdata, RdataTrait};

#[cfg(feature = "serde")]
use serde::Serialize;

repr_with_fallback! {
    /// The digest algorithm used to compute a [`ZONEMD`] digest.
    #[cfg_attr(feature = "serde", derive(Serialize))]
    #[derive(PartialEq, Eq, Copy, Clone, Debug)]
    #[non_exhaustive]
    pub enum DigestAlgorithm {
        SHA384 = 1,
        Unassigned(u8),
    }
}

impl DigestAlgorithm {
    /// The length in bytes of a digest produced by this algorithm, if known.
    pub fn output_len(&self) -> Option<usize> {
        match self {
            DigestAlgorithm::SHA384 => Some(48),
            DigestAlgorithm::Unassigned(_) => None,
        }
    }
}

/// A record carrying a digest over the canonical serialization of an entire zone, at the zone
/// apex.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ZONEMD {
    /// The SOA serial number of the zone the digest was computed over.
    pub serial: u32,
    /// The digest algorithm.
    pub algorithm: DigestAlgorithm,
    /// Reserved parameter byte; must be written as zero.
    pub reserved: u8,
    /// The digest bytes themselves.
    pub digest: Vec<u8>,
}

impl RdataTrait for ZONEMD {
    fn parse_rdata(rdata: &mut std::io::Cursor<&[u8]>, rdlength: u16) -> Result<Rdata, ParseError> {
        let serial = rdata.read_u32::<NetworkEndian>()?;
        let algorithm: DigestAlgorithm = rdata.read_u8()?.into();
        let reserved = rdata.read_u8()?;
        // already read: u32 (4) + u8 (1) + u8 (1) = 6 bytes
        let mut digest = vec![0; (rdlength - 6) as usize];
        rdata.read_exact(&mut digest)?;

        Ok(Rdata::ZONEMD(Self {
            serial,
            algorithm,
            reserved,
            digest,
        }))
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        buf.write_u32::<NetworkEndian>(self.serial)?;
        buf.write_u8(self.algorithm.into())?;
        buf.write_u8(self.reserved)?;
        buf.write_all(&self.digest)?;

        Ok(self.digest.len() as u16 + 6)
    }
}

impl Display for ZONEMD {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let algorithm: u8 = self.algorithm.into();
        write!(
            f,
            "{} {} {} {}",
            self.serial,
            algorithm,
            self.reserved,
            HEXUPPER.encode(&self.digest)
        )
    }
}
