//! Driver-level error kinds and their exit codes (see spec §7: usage errors exit 2, everything
//! else that aborts exits 1).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{0}")]
    Usage(String),

    #[error("could not read zone file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse zone file: {0}")]
    ZoneFile(#[from] zonedigest_proto::error::ZoneFileError),

    #[error("could not load signing key: {0}")]
    Signing(#[from] zonedigest_proto::error::SigningError),

    #[error("zone has no SOA record at the origin")]
    MissingSoa,

    #[error("no apex digest record found")]
    NoDigestRecord,

    #[error("requested digest algorithm {0} is not supported")]
    UnsupportedAlgorithm(u8),

    #[error("could not produce a signature: {0}")]
    Dnssec(#[from] zonedigest_proto::error::DnssecError),

    #[error("an update directive could not be parsed: {0}")]
    Update(String),
}

impl DriverError {
    /// The process exit code this error should produce, per §6's exit code table.
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::Usage(_) => 2,
            _ => 1,
        }
    }
}
