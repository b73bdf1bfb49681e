//! Loading a zone-signing key and producing signatures with it.

use std::path::Path;

use ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;

use crate::error::SigningError;
use crate::name::Name;
use crate::rdata::dnskey::{Algorithm, DNSKEY};

/// A private ECDSAP256SHA256 zone-signing key, together with the owner name its public key is
/// published under.
pub struct ZoneSigningKey {
    signing_key: SigningKey,
    public_key: DNSKEY,
    owner: Name,
}

impl ZoneSigningKey {
    /// Loads a private key from `path`.
    ///
    /// The file is expected to hold the raw 32-byte big-endian P-256 private scalar, with no
    /// header or encoding. `owner` is the name the corresponding [`DNSKEY`] is published under,
    /// i.e. the zone origin.
    pub fn load(path: impl AsRef<Path>, owner: Name) -> Result<Self, SigningError> {
        let bytes = std::fs::read(path)?;
        if bytes.len() != 32 {
            return Err(SigningError::MalformedKey(format!(
                "expected a 32-byte private key, got {} bytes",
                bytes.len()
            )));
        }

        let signing_key = SigningKey::from_bytes(&bytes)
            .map_err(|_| SigningError::MalformedKey("not a valid P-256 scalar".to_string()))?;

        let encoded_point = signing_key.verifying_key().to_encoded_point(false);
        // DNSKEY stores the raw X||Y coordinates, without the 0x04 uncompressed-point tag.
        let key = encoded_point.as_bytes()[1..].to_vec();

        let public_key = DNSKEY {
            zone: true,
            revoked: false,
            secure_entry_point: false,
            algorithm: Algorithm::ECDSAP256SHA256,
            key,
        };

        Ok(Self {
            signing_key,
            public_key,
            owner,
        })
    }

    /// The owner name the public key is published under.
    pub fn owner(&self) -> &Name {
        &self.owner
    }

    /// The public key matching this signing key, for publishing in a DNSKEY record.
    pub fn public_key(&self) -> &DNSKEY {
        &self.public_key
    }

    /// The key tag of [`Self::public_key`], as would appear in an RRSIG's key-tag field.
    pub fn key_tag(&self) -> u16 {
        self.public_key.key_tag()
    }

    /// Produces a raw signature (64 bytes: the concatenation of the `r` and `s` scalars) over
    /// `data`.
    pub(crate) fn sign_bytes(&self, data: &[u8]) -> Result<Vec<u8>, SigningError> {
        let signature: Signature = self
            .signing_key
            .try_sign(data)
            .map_err(|_| SigningError::SignatureFailed)?;
        Ok(signature.as_ref().to_vec())
    }
}
