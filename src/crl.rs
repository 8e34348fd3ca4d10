//! Certificate revocation lists.
//!
//! This module implements the CRLs of [RFC 5280] via the type [`Crl`].
//! A parsed CRL provides what revocation checking during chain
//! verification needs: its issuer, its update window, its signature, and
//! a lazily walked list of revoked serial numbers.
//!
//! [RFC 5280]: https://tools.ietf.org/html/rfc5280

use std::convert::Infallible;
use std::ops;
use bcder::{decode, Captured, Mode, Tag};
use bcder::decode::{DecodeError, Source};
use bytes::Bytes;
use crate::x509::{Name, Serial, SignedData, Time};


//------------ Crl -----------------------------------------------------------

/// A certificate revocation list.
#[derive(Clone, Debug)]
pub struct Crl {
    /// The DER encoding of the CRL.
    raw: Bytes,

    /// The outer structure of the CRL.
    signed_data: SignedData,

    /// The payload of the CRL.
    tbs: TbsCertList,
}

/// # Decoding
///
impl Crl {
    /// Parses a CRL from its DER encoding.
    pub fn decode(
        der: impl Into<Bytes>
    ) -> Result<Self, DecodeError<Infallible>> {
        let raw: Bytes = der.into();
        let signed_data = Mode::Der.decode(
            raw.clone(), SignedData::take_from
        )?;
        let tbs = signed_data.data().clone().decode(|cons| {
            TbsCertList::take_from(cons, &signed_data)
        })?;
        Ok(Self { raw, signed_data, tbs })
    }

    /// Takes an encoded CRL from the beginning of a constructed value.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let captured = cons.capture_one()?;
        Self::decode(captured.into_bytes()).map_err(DecodeError::convert)
    }
}

/// # Data Access
///
impl Crl {
    /// Returns the raw DER encoding of the CRL.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Returns a reference to the signed data wrapper.
    pub fn signed_data(&self) -> &SignedData {
        &self.signed_data
    }

    /// Returns a reference to the payload.
    pub fn as_cert_list(&self) -> &TbsCertList {
        &self.tbs
    }

    /// Returns the signature over the CRL.
    pub fn signature(&self) -> &crate::crypto::Signature {
        self.signed_data.signature()
    }

    /// Returns the revocation entry for a serial number if there is one.
    pub fn find_serial(&self, serial: Serial) -> Option<CrlEntry> {
        self.tbs.revoked_certs.find(serial)
    }

    /// Returns whether the CRL's next update was due at the given time.
    ///
    /// A CRL without a nextUpdate field is considered permanently stale;
    /// a conforming issuer always includes the field.
    pub fn is_stale_at(&self, now: Time) -> bool {
        match self.tbs.next_update {
            Some(next_update) => next_update < now,
            None => true,
        }
    }

    /// Verifies the CRL's signature with the given public key.
    pub fn verify_signature(
        &self,
        public_key: &crate::crypto::PublicKey,
    ) -> Result<(), crate::crypto::SignatureVerificationError> {
        self.signed_data.verify_signature(public_key)
    }
}


//--- Deref and AsRef

impl ops::Deref for Crl {
    type Target = TbsCertList;

    fn deref(&self) -> &Self::Target {
        &self.tbs
    }
}

impl AsRef<TbsCertList> for Crl {
    fn as_ref(&self) -> &TbsCertList {
        &self.tbs
    }
}


//--- Deserialize and Serialize

#[cfg(feature = "serde")]
impl serde::Serialize for Crl {
    fn serialize<S: serde::Serializer>(
        &self, serializer: S
    ) -> Result<S::Ok, S::Error> {
        use base64::Engine;

        base64::engine::general_purpose::STANDARD
            .encode(self.raw.as_ref())
            .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Crl {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D
    ) -> Result<Self, D::Error> {
        use base64::Engine;
        use serde::de;

        let string = String::deserialize(deserializer)?;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&string).map_err(de::Error::custom)?;
        Crl::decode(decoded).map_err(de::Error::custom)
    }
}


//------------ TbsCertList ---------------------------------------------------

/// The payload of a certificate revocation list.
#[derive(Clone, Debug)]
pub struct TbsCertList {
    /// The CRL version, 1 or 2.
    version: u8,

    /// The name of the issuer.
    issuer: Name,

    /// The time this version of the CRL was created.
    this_update: Time,

    /// The time the next version of the CRL is due.
    next_update: Option<Time>,

    /// The list of revoked certificates.
    revoked_certs: RevokedCertificates,
}

/// # Decoding
///
impl TbsCertList {
    /// Takes a value from the beginning of an encoded constructed value.
    ///
    /// ```text
    /// TBSCertList ::= SEQUENCE {
    ///     version              Version OPTIONAL,  -- if present, MUST be v2
    ///     signature            AlgorithmIdentifier,
    ///     issuer               Name,
    ///     thisUpdate           Time,
    ///     nextUpdate           Time OPTIONAL,
    ///     revokedCertificates  SEQUENCE OF SEQUENCE { ... } OPTIONAL,
    ///     crlExtensions        [0] EXPLICIT Extensions OPTIONAL }
    /// ```
    ///
    /// Version 1 lists, which leave the version out, are still accepted.
    /// CRL extensions and per-entry extensions carry nothing revocation
    /// checking needs and are skipped.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        signed_data: &SignedData,
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let version = match cons.take_opt_primitive_if(
                Tag::INTEGER, |prim| prim.take_u8()
            )? {
                Some(1) => 2,
                Some(_) => {
                    return Err(cons.content_err("unknown CRL version"))
                }
                None => 1,
            };
            let sig_alg_raw = cons.capture_one()?;
            if sig_alg_raw.as_slice() != signed_data.alg_raw().as_slice() {
                return Err(cons.content_err(
                    "signature algorithm mismatch between CertificateList \
                     and TBSCertList"
                ))
            }
            let issuer = Name::take_from(cons)?;
            let this_update = Time::take_from(cons)?;
            let next_update = Time::take_opt_from(cons)?;
            let revoked_certs = RevokedCertificates::take_from(cons)?;
            cons.take_opt_constructed_if(Tag::CTX_0, |cons| {
                cons.skip_all()
            })?;
            Ok(Self {
                version,
                issuer,
                this_update,
                next_update,
                revoked_certs,
            })
        })
    }
}

/// # Data Access
///
impl TbsCertList {
    /// Returns the CRL version, 1 or 2.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns a reference to the issuer name of the CRL.
    pub fn issuer(&self) -> &Name {
        &self.issuer
    }

    /// Returns the update time of this CRL.
    pub fn this_update(&self) -> Time {
        self.this_update
    }

    /// Returns the time of the next update if present.
    pub fn next_update(&self) -> Option<Time> {
        self.next_update
    }

    /// Returns a reference to the list of revoked certificates.
    pub fn revoked_certs(&self) -> &RevokedCertificates {
        &self.revoked_certs
    }
}


//------------ RevokedCertificates ------------------------------------------

/// The list of revoked certificates.
///
/// A value of this type wraps the bytes of the DER encoded list. Whether
/// a certain serial number is on the list can be checked via the
/// [`find`][Self::find] method without materializing the whole list.
#[derive(Clone, Debug)]
pub struct RevokedCertificates(Captured);

impl RevokedCertificates {
    /// Takes a revoked certificates list from the beginning of a value.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let res = cons.take_opt_sequence(|cons| {
            cons.capture(|cons| {
                while CrlEntry::take_opt_from(cons)?.is_some() { }
                Ok(())
            })
        })?;
        Ok(RevokedCertificates(match res {
            Some(res) => res,
            None => Captured::empty(Mode::Der)
        }))
    }

    /// Returns the entry for the given serial number if there is one.
    ///
    /// The method walks over the list, decoding it on the fly.
    pub fn find(&self, serial: Serial) -> Option<CrlEntry> {
        self.iter().find(|entry| entry.user_certificate == serial)
    }

    /// Returns an iterator over the entries in the list.
    pub fn iter(&self) -> RevokedCertificatesIter {
        RevokedCertificatesIter(self.0.clone())
    }
}


//------------ RevokedCertificatesIter ---------------------------------------

/// An iterator over the entries in the list of revoked certificates.
#[derive(Clone, Debug)]
pub struct RevokedCertificatesIter(Captured);

impl Iterator for RevokedCertificatesIter {
    type Item = CrlEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None
        }
        self.0.decode_partial(|cons| CrlEntry::take_opt_from(cons)).unwrap()
    }
}


//------------ CrlEntry ------------------------------------------------------

/// An entry in the revoked certificates list.
#[derive(Clone, Copy, Debug)]
pub struct CrlEntry {
    /// The serial number of the revoked certificate.
    user_certificate: Serial,

    /// The time of revocation.
    revocation_date: Time,
}

impl CrlEntry {
    /// Takes an optional CRL entry from the beginning of a value.
    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(Self::from_constructed)
    }

    /// Parses the content of a CRL entry.
    fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let res = CrlEntry {
            user_certificate: Serial::take_from(cons)?,
            revocation_date: Time::take_from(cons)?,
        };
        // crlEntryExtensions. Nothing we need.
        cons.skip_all()?;
        Ok(res)
    }

    /// Returns the serial number of the revoked certificate.
    pub fn serial(self) -> Serial {
        self.user_certificate
    }

    /// Returns the time of revocation.
    pub fn revocation_date(self) -> Time {
        self.revocation_date
    }
}


//============ Tests =========================================================
