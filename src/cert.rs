//! X.509 public key certificates.
//!
//! This module implements certificates in the type [`Cert`]. A certificate
//! keeps its raw DER bytes and lazily materializes two derived views: the
//! [`Frame`], a flat record of references into the raw data together with
//! the interpreted version 3 extensions, and the subject public key. Both
//! are cached behind per-certificate locks so independent verifications
//! can share certificates across threads.
//!
//! Sequences of certificates, both peer-presented chains and trust
//! stores, are kept in a [`CertList`].

use std::{error, fmt};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use bcder::{decode, BitString, Captured, ConstOid, Mode, OctetString, Oid, Tag};
use bcder::decode::{ContentError, DecodeError, Source};
use bytes::Bytes;
use crate::oid;
use crate::crypto::PublicKey;
use crate::x509::{
    walk_sequence_of, Name, Serial, SignedData, Validity
};


//------------ ParseOptions --------------------------------------------------

/// Configuration for certificate parsing.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Fail on unrecognized extensions marked critical.
    ///
    /// RFC 5280 requires a relying party to reject certificates with
    /// critical extensions it cannot process. Disabling this accepts and
    /// skips them.
    pub strict_unknown_critical: bool,

    /// Accept an extensions section in version 1 and 2 certificates.
    pub allow_non_v3_extensions: bool,

    /// Keep the frame and public key materialized after decoding.
    ///
    /// When disabled, both are dropped after the initial validation and
    /// rebuilt on first use, trading parse work for a smaller resident
    /// footprint.
    pub eager: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            strict_unknown_critical: true,
            allow_non_v3_extensions: false,
            eager: false,
        }
    }
}


//------------ Cert ----------------------------------------------------------

/// An X.509 public key certificate.
///
/// A value of this type owns the DER encoding of a certificate that has
/// been checked to be structurally well-formed. The decoded form is
/// available via [`frame`][Self::frame] and the subject public key via
/// [`public_key`][Self::public_key]; both are created on first use and
/// kept in a per-certificate cache that can be emptied again with
/// [`flush_cache`][Self::flush_cache] to bound memory use.
#[derive(Debug)]
pub struct Cert {
    /// The DER encoding of the certificate.
    raw: Bytes,

    /// The options the certificate was decoded with.
    opts: ParseOptions,

    /// The cached frame.
    frame: Mutex<Option<Arc<Frame>>>,

    /// The cached subject public key.
    key: Mutex<Option<Arc<PublicKey>>>,
}

impl Cert {
    /// Decodes a certificate from its DER encoding.
    ///
    /// The input must contain exactly one certificate. The certificate is
    /// fully parsed once to check that it is well-formed, whether or not
    /// the parsed form is retained per the options.
    pub fn decode_with_options(
        der: impl Into<Bytes>,
        opts: ParseOptions,
    ) -> Result<Self, DecodeError<Infallible>> {
        let raw = der.into();
        let frame = Frame::decode(raw.clone(), &opts)?;
        let (frame, key) = if opts.eager {
            let key = Arc::new(
                frame.pubkey_raw().clone().decode(PublicKey::take_from)?
            );
            (Some(Arc::new(frame)), Some(key))
        }
        else {
            (None, None)
        };
        Ok(Cert {
            raw,
            opts,
            frame: Mutex::new(frame),
            key: Mutex::new(key),
        })
    }

    /// Decodes a certificate using the default options.
    pub fn decode(
        der: impl Into<Bytes>
    ) -> Result<Self, DecodeError<Infallible>> {
        Self::decode_with_options(der, ParseOptions::default())
    }

    /// Returns the raw DER encoding of the certificate.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Returns the frame of the certificate.
    ///
    /// If the frame is not currently materialized, it is parsed from the
    /// raw data and kept in the cache. The per-certificate lock is held
    /// for the duration of that parse only.
    pub fn frame(&self) -> Result<Arc<Frame>, DecodeError<Infallible>> {
        let mut slot = self.frame.lock().unwrap_or_else(|err| {
            err.into_inner()
        });
        if let Some(frame) = slot.as_ref() {
            return Ok(frame.clone())
        }
        let frame = Arc::new(Frame::decode(self.raw.clone(), &self.opts)?);
        *slot = Some(frame.clone());
        Ok(frame)
    }

    /// Returns the subject public key of the certificate.
    ///
    /// The key is decoded from the frame's key span on first use and
    /// cached.
    pub fn public_key(&self) -> Result<Arc<PublicKey>, DecodeError<Infallible>> {
        let mut slot = self.key.lock().unwrap_or_else(|err| {
            err.into_inner()
        });
        if let Some(key) = slot.as_ref() {
            return Ok(key.clone())
        }
        let frame = self.frame()?;
        let key = Arc::new(
            frame.pubkey_raw().clone().decode(PublicKey::take_from)?
        );
        *slot = Some(key.clone());
        Ok(key)
    }

    /// Drops the cached frame and public key.
    pub fn flush_cache(&self) {
        *self.frame.lock().unwrap_or_else(|err| err.into_inner()) = None;
        *self.key.lock().unwrap_or_else(|err| err.into_inner()) = None;
    }
}


//--- Clone

impl Clone for Cert {
    fn clone(&self) -> Self {
        Cert {
            raw: self.raw.clone(),
            opts: self.opts,
            frame: Mutex::new(
                self.frame.lock().unwrap_or_else(|err| {
                    err.into_inner()
                }).clone()
            ),
            key: Mutex::new(
                self.key.lock().unwrap_or_else(|err| {
                    err.into_inner()
                }).clone()
            ),
        }
    }
}


//--- Deserialize and Serialize

#[cfg(feature = "serde")]
impl serde::Serialize for Cert {
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
impl<'de> serde::Deserialize<'de> for Cert {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D
    ) -> Result<Self, D::Error> {
        use base64::Engine;
        use serde::de;

        let string = String::deserialize(deserializer)?;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&string).map_err(de::Error::custom)?;
        Cert::decode(decoded).map_err(de::Error::custom)
    }
}


//------------ CertList ------------------------------------------------------

/// A sequence of certificates.
///
/// Peer-presented chains keep the end entity first, followed by any
/// intermediate certificates. Trust stores are unordered.
#[derive(Clone, Debug, Default)]
pub struct CertList {
    certs: Vec<Cert>,
}

impl CertList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a list from the concatenated DER of its certificates.
    pub fn decode_with_options(
        der: impl Into<Bytes>,
        opts: ParseOptions,
    ) -> Result<Self, DecodeError<Infallible>> {
        let mut source = Mode::Der.decode(der.into(), |cons| {
            cons.capture_all()
        })?;
        let mut certs = Vec::new();
        while !source.is_empty() {
            let one = source.decode_partial(|cons| cons.capture_one())?;
            certs.push(
                Cert::decode_with_options(one.into_bytes(), opts)?
            );
        }
        Ok(CertList { certs })
    }

    /// Decodes a list using the default options.
    pub fn decode(
        der: impl Into<Bytes>
    ) -> Result<Self, DecodeError<Infallible>> {
        Self::decode_with_options(der, ParseOptions::default())
    }

    /// Appends a certificate to the list.
    pub fn push(&mut self, cert: Cert) {
        self.certs.push(cert)
    }

    /// Returns the number of certificates in the list.
    pub fn len(&self) -> usize {
        self.certs.len()
    }

    /// Returns whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }

    /// Returns the certificate at the given position.
    pub fn get(&self, index: usize) -> Option<&Cert> {
        self.certs.get(index)
    }

    /// Returns an iterator over the certificates.
    pub fn iter(&self) -> std::slice::Iter<'_, Cert> {
        self.certs.iter()
    }
}

impl From<Vec<Cert>> for CertList {
    fn from(certs: Vec<Cert>) -> Self {
        CertList { certs }
    }
}

impl FromIterator<Cert> for CertList {
    fn from_iter<T: IntoIterator<Item = Cert>>(iter: T) -> Self {
        CertList { certs: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a CertList {
    type Item = &'a Cert;
    type IntoIter = std::slice::Iter<'a, Cert>;

    fn into_iter(self) -> Self::IntoIter {
        self.certs.iter()
    }
}


//------------ Frame ---------------------------------------------------------

/// The decoded form of a certificate.
///
/// A frame keeps references into the certificate's raw data for the
/// larger components and interprets the scalar fields and the recognized
/// version 3 extensions. It is produced in a single pass over the DER
/// without descending into substructures that are only needed on demand:
/// names, alternative names and key purposes are walked lazily by the
/// accessors returning iterators.
#[derive(Clone, Debug)]
pub struct Frame {
    /// The raw bytes of the whole certificate.
    raw: Bytes,

    /// The to-be-signed part, outer signature algorithm, and signature.
    signed: SignedData,

    /// The certificate version, 1 to 3.
    version: u8,

    /// The span of the serial number.
    serial_raw: Captured,

    /// The serial number.
    serial: Serial,

    /// The span of the signature algorithm repeated inside the TBS.
    sig_alg_raw: Captured,

    /// The issuer name.
    issuer: Name,

    /// The validity period.
    validity: Validity,

    /// The subject name.
    subject: Name,

    /// The span of the subject public key info.
    pubkey_raw: Captured,

    /// The content of the issuer unique ID if present.
    issuer_id: Option<Bytes>,

    /// The content of the subject unique ID if present.
    subject_id: Option<Bytes>,

    /// The span of the extensions sequence if present.
    v3_ext: Option<Captured>,

    /// The recognized extensions present, as [`ExtensionKind`] flags.
    ext_types: u32,

    /// The cA flag of the basic constraints extension.
    basic_ca: bool,

    /// The path length constraint of the basic constraints extension.
    path_len: Option<u64>,

    /// The key usage bits if the extension is present.
    key_usage: Option<KeyUsages>,

    /// The content of the subject alternative name sequence.
    subject_alt: Option<Captured>,

    /// The content of the extended key usage sequence.
    ext_key_usage: Option<Captured>,

    /// The content of the certificate policies sequence.
    policies: Option<Captured>,

    /// The value of the Netscape certificate type extension.
    ns_cert_type: Option<u8>,
}

/// # Decoding
///
impl Frame {
    /// Decodes a frame from the raw bytes of a certificate.
    pub fn decode(
        raw: Bytes,
        opts: &ParseOptions,
    ) -> Result<Self, DecodeError<Infallible>> {
        let signed = Mode::Der.decode(raw.clone(), SignedData::take_from)?;
        let res = signed.data().clone().decode(|cons| {
            Self::from_tbs(cons, &signed, opts)
        })?;
        Ok(Frame { raw, signed, ..res })
    }

    /// Parses the contents of the TBSCertificate sequence.
    ///
    /// Returns a frame with placeholder values for `raw` and `signed`
    /// which the caller fills in.
    fn from_tbs<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        signed: &SignedData,
        opts: &ParseOptions,
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            // version [0] EXPLICIT Version DEFAULT v1
            let version = match cons.take_opt_constructed_if(
                Tag::CTX_0,
                |cons| cons.take_primitive_if(
                    Tag::INTEGER, |prim| prim.take_u8()
                )
            )? {
                Some(version) if version < 3 => version + 1,
                Some(version) => {
                    return Err(cons.content_err(
                        UnknownVersion::new(version)
                    ))
                }
                None => 1,
            };

            let serial_raw = cons.capture_one()?;
            let serial = serial_raw.clone().decode(
                Serial::take_from
            ).map_err(DecodeError::convert)?;

            // The signature algorithm appears both here and in the outer
            // structure. RFC 5280 demands the two to be identical; we
            // compare the raw bytes so differently encoded parameters do
            // not slip through either.
            let sig_alg_raw = cons.capture_one()?;
            if sig_alg_raw.as_slice() != signed.alg_raw().as_slice() {
                return Err(cons.content_err(
                    SignatureAlgorithmMismatch(())
                ))
            }

            let issuer = Name::take_from(cons)?;
            let validity = Validity::take_from(cons)?;
            let subject = Name::take_from(cons)?;
            let pubkey_raw = cons.capture_one()?;

            let (mut issuer_id, mut subject_id) = (None, None);
            if version >= 2 {
                issuer_id = cons.take_opt_value_if(
                    Tag::CTX_1,
                    |content| {
                        OctetString::from_content(content)
                            .map(|os| os.to_bytes())
                    }
                )?;
                subject_id = cons.take_opt_value_if(
                    Tag::CTX_2,
                    |content| {
                        OctetString::from_content(content)
                            .map(|os| os.to_bytes())
                    }
                )?;
            }

            let v3_ext = if version == 3 || opts.allow_non_v3_extensions {
                cons.take_opt_constructed_if(
                    Tag::CTX_3, |cons| cons.capture_one()
                )?
            }
            else {
                None
            };

            let ext = match v3_ext.as_ref() {
                Some(captured) => {
                    Extensions::decode(
                        captured.clone(), opts
                    ).map_err(DecodeError::convert)?
                }
                None => Extensions::default(),
            };

            Ok(Frame {
                // Placeholders, filled in by `decode`.
                raw: Bytes::new(),
                signed: signed.clone(),

                version,
                serial_raw,
                serial,
                sig_alg_raw,
                issuer,
                validity,
                subject,
                pubkey_raw,
                issuer_id,
                subject_id,
                v3_ext,
                ext_types: ext.ext_types,
                basic_ca: ext.basic_ca,
                path_len: ext.path_len,
                key_usage: ext.key_usage,
                subject_alt: ext.subject_alt,
                ext_key_usage: ext.ext_key_usage,
                policies: ext.policies,
                ns_cert_type: ext.ns_cert_type,
            })
        })
    }
}

/// # Data Access
///
impl Frame {
    /// Returns the raw bytes of the whole certificate.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Returns the to-be-signed part of the certificate.
    pub fn tbs(&self) -> &Captured {
        self.signed.data()
    }

    /// Returns the signature over the to-be-signed part.
    pub fn signature(&self) -> &crate::crypto::Signature {
        self.signed.signature()
    }

    /// Returns the certificate version, 1 to 3.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the span of the serial number.
    pub fn serial_raw(&self) -> &Captured {
        &self.serial_raw
    }

    /// Returns the serial number.
    pub fn serial(&self) -> Serial {
        self.serial
    }

    /// Returns the span of the signature algorithm inside the TBS.
    pub fn sig_alg_raw(&self) -> &Captured {
        &self.sig_alg_raw
    }

    /// Returns the issuer name.
    pub fn issuer(&self) -> &Name {
        &self.issuer
    }

    /// Returns the validity period.
    pub fn validity(&self) -> Validity {
        self.validity
    }

    /// Returns the subject name.
    pub fn subject(&self) -> &Name {
        &self.subject
    }

    /// Returns the span of the subject public key info.
    pub fn pubkey_raw(&self) -> &Captured {
        &self.pubkey_raw
    }

    /// Returns the content of the issuer unique ID if present.
    pub fn issuer_id(&self) -> Option<&Bytes> {
        self.issuer_id.as_ref()
    }

    /// Returns the content of the subject unique ID if present.
    pub fn subject_id(&self) -> Option<&Bytes> {
        self.subject_id.as_ref()
    }

    /// Returns the span of the extensions sequence if present.
    pub fn v3_ext(&self) -> Option<&Captured> {
        self.v3_ext.as_ref()
    }

    /// Returns whether the certificate is self-issued.
    ///
    /// A certificate is self-issued if its issuer and subject names
    /// match. This says nothing about who signed it.
    pub fn is_self_issued(&self) -> bool {
        self.issuer.matches(&self.subject)
    }

    /// Returns whether a recognized extension is present.
    pub fn has_extension(&self, kind: ExtensionKind) -> bool {
        self.ext_types & kind.flag() != 0
    }

    /// Returns the cA flag of the basic constraints extension.
    ///
    /// This is `false` if the extension is absent.
    pub fn is_ca(&self) -> bool {
        self.basic_ca
    }

    /// Returns the path length constraint if one is imposed.
    ///
    /// The value bounds the number of non-self-issued intermediate
    /// certificates that may follow below this one in a valid path.
    pub fn path_len_constraint(&self) -> Option<u64> {
        self.path_len
    }

    /// Returns the key usage bits if the extension is present.
    pub fn key_usage(&self) -> Option<KeyUsages> {
        self.key_usage
    }

    /// Returns whether the certified key may be used for all given usages.
    ///
    /// Follows the RFC 5280 rule that an absent key usage extension
    /// places no restrictions on the key.
    pub fn supports_key_usage(&self, usage: KeyUsages) -> bool {
        match self.key_usage {
            Some(present) => present.contains(usage),
            None => true,
        }
    }

    /// Returns an iterator over the subject alternative names.
    ///
    /// The iterator is empty if the extension is absent.
    pub fn subject_alt_names(&self) -> SubjectAltNames {
        SubjectAltNames(
            self.subject_alt.clone().unwrap_or_else(|| {
                Captured::empty(Mode::Der)
            })
        )
    }

    /// Returns the raw content of the subject alternative name sequence.
    pub fn subject_alt_raw(&self) -> Option<&Captured> {
        self.subject_alt.as_ref()
    }

    /// Returns an iterator over the extended key usage purposes.
    ///
    /// The iterator is empty if the extension is absent.
    pub fn extended_key_usage(&self) -> KeyPurposes {
        KeyPurposes(
            self.ext_key_usage.clone().unwrap_or_else(|| {
                Captured::empty(Mode::Der)
            })
        )
    }

    /// Returns whether the certified key may be used for a purpose.
    ///
    /// An absent extended key usage extension permits every purpose, as
    /// does the `anyExtendedKeyUsage` purpose being listed.
    pub fn supports_key_purpose(&self, purpose: &ConstOid) -> bool {
        if self.ext_key_usage.is_none() {
            return true
        }
        self.extended_key_usage().any(|item| {
            item == *purpose || item == oid::ANY_EXTENDED_KEY_USAGE
        })
    }

    /// Returns an iterator over the certificate policy identifiers.
    ///
    /// The iterator is empty if the extension is absent.
    pub fn policies(&self) -> Policies {
        Policies(
            self.policies.clone().unwrap_or_else(|| {
                Captured::empty(Mode::Der)
            })
        )
    }

    /// Returns the raw content of the certificate policies sequence.
    pub fn policies_raw(&self) -> Option<&Captured> {
        self.policies.as_ref()
    }

    /// Returns the Netscape certificate type bits if present.
    pub fn ns_cert_type(&self) -> Option<u8> {
        self.ns_cert_type
    }

    /// Returns whether the certificate allows the given Netscape types.
    ///
    /// An absent extension allows everything.
    pub fn supports_ns_cert_type(&self, usage: u8) -> bool {
        match self.ns_cert_type {
            Some(present) => present & usage == usage,
            None => true,
        }
    }
}


//------------ Extensions ----------------------------------------------------

/// The interpreted extensions of a certificate.
#[derive(Clone, Debug, Default)]
struct Extensions {
    ext_types: u32,
    basic_ca: bool,
    path_len: Option<u64>,
    key_usage: Option<KeyUsages>,
    subject_alt: Option<Captured>,
    ext_key_usage: Option<Captured>,
    policies: Option<Captured>,
    ns_cert_type: Option<u8>,
}

impl Extensions {
    /// Decodes the captured extensions sequence.
    fn decode(
        captured: Captured,
        opts: &ParseOptions,
    ) -> Result<Self, DecodeError<Infallible>> {
        captured.decode(|cons| {
            let mut res = Extensions::default();
            cons.take_sequence(|cons| {
                while let Some(()) = cons.take_opt_sequence(|cons| {
                    res.take_extension(cons, opts)
                })? { }
                Ok(())
            })?;
            Ok(res)
        })
    }

    /// Parses a single `Extension` sequence.
    fn take_extension<S: decode::Source>(
        &mut self,
        cons: &mut decode::Constructed<S>,
        opts: &ParseOptions,
    ) -> Result<(), DecodeError<S::Error>> {
        let extn_id = Oid::take_from(cons)?;
        let critical = cons.take_opt_bool()?.unwrap_or(false);
        let value = OctetString::take_from(cons)?;

        let kind = match ExtensionKind::from_oid(&extn_id) {
            Some(kind) => kind,
            None => {
                if critical && opts.strict_unknown_critical {
                    return Err(cons.content_err(
                        UnexpectedCriticalExtension::new(extn_id)
                    ))
                }
                return Ok(())
            }
        };
        if self.ext_types & kind.flag() != 0 {
            return Err(cons.content_err(
                DuplicateExtension::new(extn_id)
            ))
        }
        self.ext_types |= kind.flag();

        Mode::Der.decode(value, |cons| {
            match kind {
                ExtensionKind::BasicConstraints => {
                    self.take_basic_constraints(cons)
                }
                ExtensionKind::KeyUsage => {
                    self.take_key_usage(cons)
                }
                ExtensionKind::SubjectAltName => {
                    self.take_subject_alt_name(cons)
                }
                ExtensionKind::ExtendedKeyUsage => {
                    self.take_extended_key_usage(cons)
                }
                ExtensionKind::CertificatePolicies => {
                    self.take_certificate_policies(cons)
                }
                ExtensionKind::NsCertType => {
                    self.take_ns_cert_type(cons)
                }
            }
        }).map_err(DecodeError::convert)?;
        Ok(())
    }

    /// Parses the Basic Constraints extension.
    ///
    /// ```text
    /// BasicConstraints ::= SEQUENCE {
    ///     cA                      BOOLEAN DEFAULT FALSE,
    ///     pathLenConstraint       INTEGER (0..MAX) OPTIONAL }
    /// ```
    fn take_basic_constraints<S: decode::Source>(
        &mut self,
        cons: &mut decode::Constructed<S>,
    ) -> Result<(), DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            self.basic_ca = cons.take_opt_bool()?.unwrap_or(false);
            self.path_len = cons.take_opt_u64()?;
            Ok(())
        })
    }

    /// Parses the Key Usage extension.
    ///
    /// ```text
    /// KeyUsage ::= BIT STRING {
    ///      digitalSignature        (0),
    ///      nonRepudiation          (1),
    ///      keyEncipherment         (2),
    ///      dataEncipherment        (3),
    ///      keyAgreement            (4),
    ///      keyCertSign             (5),
    ///      cRLSign                 (6),
    ///      encipherOnly            (7),
    ///      decipherOnly            (8) }
    /// ```
    fn take_key_usage<S: decode::Source>(
        &mut self,
        cons: &mut decode::Constructed<S>,
    ) -> Result<(), DecodeError<S::Error>> {
        let bits = BitString::take_from(cons)?;
        if bits.octet_len() == 0 {
            return Err(cons.content_err("empty Key Usage extension"))
        }
        self.key_usage = Some(KeyUsages::from_bit_string(&bits));
        Ok(())
    }

    /// Parses the Subject Alternative Name extension.
    ///
    /// The entries are kept as a raw span walked on demand; here the
    /// sequence is only checked to consist of well-formed `GeneralName`
    /// alternatives.
    fn take_subject_alt_name<S: decode::Source>(
        &mut self,
        cons: &mut decode::Constructed<S>,
    ) -> Result<(), DecodeError<S::Error>> {
        self.subject_alt = Some(cons.take_sequence(|cons| {
            cons.capture(|cons| {
                walk_sequence_of(cons, |_tag, content| {
                    match content {
                        decode::Content::Primitive(ref mut inner) => {
                            inner.skip_all()
                        }
                        decode::Content::Constructed(ref mut inner) => {
                            inner.skip_all()
                        }
                    }
                })?;
                Ok(())
            })
        })?);
        Ok(())
    }

    /// Parses the Extended Key Usage extension.
    ///
    /// ```text
    /// ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId
    /// KeyPurposeId ::= OBJECT IDENTIFIER
    /// ```
    fn take_extended_key_usage<S: decode::Source>(
        &mut self,
        cons: &mut decode::Constructed<S>,
    ) -> Result<(), DecodeError<S::Error>> {
        self.ext_key_usage = Some(cons.take_sequence(|cons| {
            cons.capture(|cons| {
                Oid::skip_in(cons)?;
                while Oid::skip_opt_in(cons)?.is_some() { }
                Ok(())
            })
        })?);
        Ok(())
    }

    /// Parses the Certificate Policies extension.
    ///
    /// ```text
    /// certificatePolicies ::= SEQUENCE SIZE (1..MAX) OF PolicyInformation
    ///
    /// PolicyInformation ::= SEQUENCE {
    ///     policyIdentifier   CertPolicyId,
    ///     policyQualifiers   SEQUENCE SIZE (1..MAX) OF
    ///                             PolicyQualifierInfo OPTIONAL }
    /// ```
    fn take_certificate_policies<S: decode::Source>(
        &mut self,
        cons: &mut decode::Constructed<S>,
    ) -> Result<(), DecodeError<S::Error>> {
        self.policies = Some(cons.take_sequence(|cons| {
            cons.capture(|cons| {
                let mut empty = true;
                while let Some(()) = cons.take_opt_sequence(|cons| {
                    empty = false;
                    Oid::skip_in(cons)?;
                    cons.skip_all()
                })? { }
                if empty {
                    Err(cons.content_err(
                        "empty Certificate Policies extension"
                    ))
                }
                else {
                    Ok(())
                }
            })
        })?);
        Ok(())
    }

    /// Parses the Netscape certificate type extension.
    fn take_ns_cert_type<S: decode::Source>(
        &mut self,
        cons: &mut decode::Constructed<S>,
    ) -> Result<(), DecodeError<S::Error>> {
        let bits = BitString::take_from(cons)?;
        if bits.octet_len() > 1 {
            return Err(cons.content_err(
                "invalid Netscape certificate type"
            ))
        }
        self.ns_cert_type = Some(
            bits.octet_bytes().first().copied().unwrap_or(0)
        );
        Ok(())
    }
}


//------------ ExtensionKind -------------------------------------------------

/// The certificate extensions interpreted by the frame parser.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ExtensionKind {
    BasicConstraints,
    KeyUsage,
    ExtendedKeyUsage,
    SubjectAltName,
    CertificatePolicies,
    NsCertType,
}

impl ExtensionKind {
    /// The dispatch table from extension OID to kind.
    const TABLE: &'static [(&'static ConstOid, ExtensionKind)] = &[
        (&oid::CE_BASIC_CONSTRAINTS, ExtensionKind::BasicConstraints),
        (&oid::CE_KEY_USAGE, ExtensionKind::KeyUsage),
        (&oid::CE_EXTENDED_KEY_USAGE, ExtensionKind::ExtendedKeyUsage),
        (&oid::CE_SUBJECT_ALT_NAME, ExtensionKind::SubjectAltName),
        (&oid::CE_CERTIFICATE_POLICIES, ExtensionKind::CertificatePolicies),
        (&oid::NETSCAPE_CERT_TYPE, ExtensionKind::NsCertType),
    ];

    /// Returns the kind for an extension OID.
    pub fn from_oid(extn_id: &Oid<Bytes>) -> Option<Self> {
        Self::TABLE.iter().find_map(|&(oid, kind)| {
            if *extn_id == *oid {
                Some(kind)
            }
            else {
                None
            }
        })
    }

    /// Returns the bit of this kind in the present-extensions set.
    pub const fn flag(self) -> u32 {
        1 << self as u32
    }
}


//------------ KeyUsages -----------------------------------------------------

/// The usages of a certified key.
///
/// This is the decoded bit string of the key usage extension with the
/// bits counted in their ASN.1 positions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct KeyUsages(u16);

impl KeyUsages {
    pub const DIGITAL_SIGNATURE: Self = KeyUsages(1 << 0);
    pub const NON_REPUDIATION: Self = KeyUsages(1 << 1);
    pub const KEY_ENCIPHERMENT: Self = KeyUsages(1 << 2);
    pub const DATA_ENCIPHERMENT: Self = KeyUsages(1 << 3);
    pub const KEY_AGREEMENT: Self = KeyUsages(1 << 4);
    pub const KEY_CERT_SIGN: Self = KeyUsages(1 << 5);
    pub const CRL_SIGN: Self = KeyUsages(1 << 6);
    pub const ENCIPHER_ONLY: Self = KeyUsages(1 << 7);
    pub const DECIPHER_ONLY: Self = KeyUsages(1 << 8);

    /// Creates the set from the extension's bit string.
    pub fn from_bit_string(bits: &BitString) -> Self {
        let mut res = 0;
        for pos in 0..9 {
            if bits.bit(pos) {
                res |= 1 << pos;
            }
        }
        KeyUsages(res)
    }

    /// Returns whether all usages of `other` are included in `self`.
    pub fn contains(self, other: KeyUsages) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns whether no usage is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for KeyUsages {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        KeyUsages(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for KeyUsages {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}


//------------ SubjectAltNames -----------------------------------------------

/// An iterator over the entries of the subject alternative names.
#[derive(Clone, Debug)]
pub struct SubjectAltNames(Captured);

impl Iterator for SubjectAltNames {
    type Item = GeneralName;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None
        }
        self.0.decode_partial(|cons| {
            cons.take_opt_value(|tag, content| {
                if tag == Tag::CTX_2 {
                    OctetString::from_content(content).map(|os| {
                        GeneralName::Dns(os.to_bytes())
                    })
                }
                else {
                    match content {
                        decode::Content::Primitive(ref mut inner) => {
                            inner.skip_all()?;
                        }
                        decode::Content::Constructed(ref mut inner) => {
                            inner.skip_all()?;
                        }
                    }
                    Ok(GeneralName::Other(tag))
                }
            })
        }).unwrap()
    }
}


//------------ GeneralName ---------------------------------------------------

/// An entry of the subject alternative names.
///
/// Only DNS names are interpreted; all other alternatives are reported
/// with their tag only.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GeneralName {
    /// A `dNSName` entry with the raw bytes of its IA5 string.
    Dns(Bytes),

    /// Any other entry.
    Other(Tag),
}

impl GeneralName {
    /// Returns the DNS name if this is such an entry.
    pub fn as_dns(&self) -> Option<&[u8]> {
        match self {
            GeneralName::Dns(name) => Some(name.as_ref()),
            GeneralName::Other(_) => None,
        }
    }
}


//------------ KeyPurposes ---------------------------------------------------

/// An iterator over the purposes of the extended key usage extension.
#[derive(Clone, Debug)]
pub struct KeyPurposes(Captured);

impl Iterator for KeyPurposes {
    type Item = Oid<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None
        }
        self.0.decode_partial(|cons| Oid::take_opt_from(cons)).unwrap()
    }
}


//------------ Policies ------------------------------------------------------

/// An iterator over the policy identifiers of a certificate.
#[derive(Clone, Debug)]
pub struct Policies(Captured);

impl Iterator for Policies {
    type Item = Oid<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None
        }
        self.0.decode_partial(|cons| {
            cons.take_opt_sequence(|cons| {
                let policy = Oid::take_from(cons)?;
                cons.skip_all()?;
                Ok(policy)
            })
        }).unwrap()
    }
}


//============ Error Types ===================================================

//------------ UnknownVersion ------------------------------------------------

/// A certificate's version is not one we know.
#[derive(Clone, Debug)]
struct UnknownVersion {
    version: u8,
}

impl UnknownVersion {
    fn new(version: u8) -> Self {
        UnknownVersion { version }
    }
}

impl From<UnknownVersion> for ContentError {
    fn from(err: UnknownVersion) -> Self {
        ContentError::from_boxed(Box::new(err))
    }
}

impl fmt::Display for UnknownVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown certificate version {}", self.version + 1)
    }
}

impl error::Error for UnknownVersion { }


//------------ SignatureAlgorithmMismatch ------------------------------------

/// The two occurrences of the signature algorithm differ.
#[derive(Clone, Debug)]
struct SignatureAlgorithmMismatch(());

impl From<SignatureAlgorithmMismatch> for ContentError {
    fn from(_: SignatureAlgorithmMismatch) -> Self {
        ContentError::from_static(
            "signature algorithm mismatch between certificate \
             and TBSCertificate"
        )
    }
}

impl fmt::Display for SignatureAlgorithmMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("signature algorithm mismatch")
    }
}

impl error::Error for SignatureAlgorithmMismatch { }


//------------ DuplicateExtension --------------------------------------------

/// An extension appeared a second time.
#[derive(Clone, Debug)]
struct DuplicateExtension {
    extn_id: Oid<Bytes>,
}

impl DuplicateExtension {
    fn new(extn_id: Oid<Bytes>) -> Self {
        DuplicateExtension { extn_id }
    }
}

impl From<DuplicateExtension> for ContentError {
    fn from(err: DuplicateExtension) -> Self {
        ContentError::from_boxed(Box::new(err))
    }
}

impl fmt::Display for DuplicateExtension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "duplicate extension {}", self.extn_id)
    }
}

impl error::Error for DuplicateExtension { }


//------------ UnexpectedCriticalExtension -----------------------------------

/// A critical extension we do not recognize was encountered.
#[derive(Clone, Debug)]
struct UnexpectedCriticalExtension {
    extn_id: Oid<Bytes>,
}

impl UnexpectedCriticalExtension {
    fn new(extn_id: Oid<Bytes>) -> Self {
        UnexpectedCriticalExtension { extn_id }
    }
}

impl From<UnexpectedCriticalExtension> for ContentError {
    fn from(err: UnexpectedCriticalExtension) -> Self {
        ContentError::from_boxed(Box::new(err))
    }
}

impl fmt::Display for UnexpectedCriticalExtension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unexpected critical extension {}", self.extn_id)
    }
}

impl error::Error for UnexpectedCriticalExtension { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::x509::Time;

    //--- A tiny DER builder for hand-made certificates.

    fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
        let len = content.len();
        let mut res = vec![tag];
        if len < 0x80 {
            res.push(len as u8);
        }
        else if len < 0x100 {
            res.push(0x81);
            res.push(len as u8);
        }
        else {
            res.push(0x82);
            res.push((len >> 8) as u8);
            res.push(len as u8);
        }
        res.extend_from_slice(content);
        res
    }

    fn concat(parts: &[&[u8]]) -> Vec<u8> {
        let mut res = Vec::new();
        for part in parts {
            res.extend_from_slice(part);
        }
        res
    }

    /// An Ed25519 algorithm identifier. Doubles as key and signature
    /// algorithm so hand-made certificates stay small.
    fn ed25519_alg() -> Vec<u8> {
        tlv(0x30, &tlv(0x06, &[43, 101, 112]))
    }

    fn sha256_rsa_alg() -> Vec<u8> {
        tlv(0x30, &concat(&[
            &tlv(0x06, &[42, 134, 72, 134, 247, 13, 1, 1, 11]),
            &tlv(0x05, b""),
        ]))
    }

    fn ext(extn_id: &[u8], critical: bool, value: &[u8]) -> Vec<u8> {
        let mut content = tlv(0x06, extn_id);
        if critical {
            content.extend_from_slice(&tlv(0x01, &[0xff]));
        }
        content.extend_from_slice(&tlv(0x04, value));
        tlv(0x30, &content)
    }

    fn basic_constraints_ca() -> Vec<u8> {
        ext(&[85, 29, 19], true, &tlv(0x30, &tlv(0x01, &[0xff])))
    }

    /// Builds a syntactically complete certificate. The signature is
    /// garbage; these certificates only ever meet the parser.
    fn make_cert(
        version: Option<u8>,
        outer_alg: &[u8],
        inner_alg: &[u8],
        extensions: Option<&[Vec<u8>]>,
    ) -> Vec<u8> {
        let name = tlv(0x30, &tlv(0x31, &tlv(0x30, &concat(&[
            &tlv(0x06, &[85, 4, 3]),
            &tlv(0x13, b"Handmade"),
        ]))));
        let validity = tlv(0x30, &concat(&[
            &tlv(0x17, b"240101000000Z"),
            &tlv(0x18, b"20350101000000Z"),
        ]));
        let spki = tlv(0x30, &concat(&[
            &ed25519_alg(),
            &tlv(0x03, &concat(&[&[0u8], &[0xab; 32]])),
        ]));
        let mut tbs = Vec::new();
        if let Some(version) = version {
            tbs.extend_from_slice(
                &tlv(0xa0, &tlv(0x02, &[version]))
            );
        }
        tbs.extend_from_slice(&tlv(0x02, &[0x2a]));
        tbs.extend_from_slice(inner_alg);
        tbs.extend_from_slice(&name);
        tbs.extend_from_slice(&validity);
        tbs.extend_from_slice(&name);
        tbs.extend_from_slice(&spki);
        if let Some(extensions) = extensions {
            let mut content = Vec::new();
            for one in extensions {
                content.extend_from_slice(one);
            }
            tbs.extend_from_slice(&tlv(0xa3, &tlv(0x30, &content)));
        }
        let tbs = tlv(0x30, &tbs);
        let signature = tlv(0x03, &[0x00, 0xde, 0xad]);
        tlv(0x30, &concat(&[&tbs, outer_alg, &signature]))
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        !needle.is_empty()
            && haystack.windows(needle.len()).any(|win| win == needle)
    }

    //--- Hand-made certificates.

    #[test]
    fn versions() {
        let cert = Cert::decode(make_cert(
            Some(2), &ed25519_alg(), &ed25519_alg(),
            Some(&[basic_constraints_ca()]),
        )).unwrap();
        assert_eq!(cert.frame().unwrap().version(), 3);

        let cert = Cert::decode(make_cert(
            None, &ed25519_alg(), &ed25519_alg(), None,
        )).unwrap();
        assert_eq!(cert.frame().unwrap().version(), 1);

        assert!(Cert::decode(make_cert(
            Some(3), &ed25519_alg(), &ed25519_alg(), None,
        )).is_err());
    }

    #[test]
    fn signature_algorithm_mismatch() {
        assert!(Cert::decode(make_cert(
            Some(2), &sha256_rsa_alg(), &ed25519_alg(), None,
        )).is_err());
    }

    #[test]
    fn duplicate_extension() {
        assert!(Cert::decode(make_cert(
            Some(2), &ed25519_alg(), &ed25519_alg(),
            Some(&[basic_constraints_ca(), basic_constraints_ca()]),
        )).is_err());

        let cert = Cert::decode(make_cert(
            Some(2), &ed25519_alg(), &ed25519_alg(),
            Some(&[basic_constraints_ca()]),
        )).unwrap();
        let frame = cert.frame().unwrap();
        assert!(frame.is_ca());
        assert_eq!(frame.path_len_constraint(), None);
    }

    #[test]
    fn unknown_critical_extension() {
        // id-ce-policyConstraints, which we do not interpret.
        let unknown = ext(&[85, 29, 36], true, &tlv(0x30, b""));
        let der = make_cert(
            Some(2), &ed25519_alg(), &ed25519_alg(),
            Some(&[unknown]),
        );
        assert!(Cert::decode(der.clone()).is_err());

        let opts = ParseOptions {
            strict_unknown_critical: false,
            ..Default::default()
        };
        let cert = Cert::decode_with_options(der, opts).unwrap();
        assert!(!cert.frame().unwrap().is_ca());
    }

    #[test]
    fn extensions_in_old_versions() {
        let der = make_cert(
            None, &ed25519_alg(), &ed25519_alg(),
            Some(&[basic_constraints_ca()]),
        );
        assert!(Cert::decode(der.clone()).is_err());

        let opts = ParseOptions {
            allow_non_v3_extensions: true,
            ..Default::default()
        };
        let cert = Cert::decode_with_options(der, opts).unwrap();
        let frame = cert.frame().unwrap();
        assert_eq!(frame.version(), 1);
        assert!(frame.is_ca());
    }

    #[test]
    fn policies_iterator() {
        let policies = ext(
            &[85, 29, 32], false,
            &tlv(0x30, &tlv(0x30, &tlv(0x06, &[42, 3, 4]))),
        );
        let cert = Cert::decode(make_cert(
            Some(2), &ed25519_alg(), &ed25519_alg(), Some(&[policies]),
        )).unwrap();
        let frame = cert.frame().unwrap();
        assert!(frame.has_extension(ExtensionKind::CertificatePolicies));
        let ids: Vec<_> = frame.policies().collect();
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0], Oid(&[42u8, 3, 4][..]));
    }

    #[test]
    fn ns_cert_type() {
        let nst = ext(
            &[96, 134, 72, 1, 134, 248, 66, 1, 1], false,
            &tlv(0x03, &[0x00, 0x80]),
        );
        let cert = Cert::decode(make_cert(
            Some(2), &ed25519_alg(), &ed25519_alg(), Some(&[nst]),
        )).unwrap();
        let frame = cert.frame().unwrap();
        assert_eq!(frame.ns_cert_type(), Some(0x80));
        assert!(frame.supports_ns_cert_type(0x80));
        assert!(!frame.supports_ns_cert_type(0xc0));
    }

    #[test]
    fn subject_alt_name_entries() {
        let san = ext(
            &[85, 29, 17], false,
            &tlv(0x30, &concat(&[
                &tlv(0x82, b"example.org"),
                &tlv(0x87, &[192, 0, 2, 1]),
            ])),
        );
        let cert = Cert::decode(make_cert(
            Some(2), &ed25519_alg(), &ed25519_alg(), Some(&[san]),
        )).unwrap();
        let frame = cert.frame().unwrap();
        let names: Vec<_> = frame.subject_alt_names().collect();
        assert_eq!(names.len(), 2);
        assert_eq!(names[0].as_dns(), Some(b"example.org".as_ref()));
        assert!(names[1].as_dns().is_none());
    }

    #[test]
    fn key_usage_bits() {
        let bits = Mode::Der.decode(
            b"\x03\x02\x07\x80".as_ref(), BitString::take_from
        ).unwrap();
        assert_eq!(
            KeyUsages::from_bit_string(&bits),
            KeyUsages::DIGITAL_SIGNATURE
        );

        let bits = Mode::Der.decode(
            b"\x03\x02\x01\x06".as_ref(), BitString::take_from
        ).unwrap();
        assert_eq!(
            KeyUsages::from_bit_string(&bits),
            KeyUsages::KEY_CERT_SIGN | KeyUsages::CRL_SIGN
        );
    }

    //--- Real certificates.

    #[test]
    fn parse_real_certs() {
        let root = Cert::decode(
            include_bytes!("../test-data/root.crt").as_ref()
        ).unwrap();
        let ca1 = Cert::decode(
            include_bytes!("../test-data/ca1.crt").as_ref()
        ).unwrap();
        let ee = Cert::decode(
            include_bytes!("../test-data/ee.crt").as_ref()
        ).unwrap();

        let frame = root.frame().unwrap();
        assert_eq!(frame.version(), 3);
        assert!(frame.is_ca());
        assert!(frame.is_self_issued());
        assert!(frame.supports_key_usage(
            KeyUsages::KEY_CERT_SIGN | KeyUsages::CRL_SIGN
        ));
        assert_eq!(
            frame.validity().not_before(),
            Time::utc(2024, 1, 1, 0, 0, 0)
        );
        assert_eq!(
            frame.validity().not_after(),
            Time::utc(2035, 1, 1, 0, 0, 0)
        );

        let frame = ca1.frame().unwrap();
        assert!(frame.is_ca());
        assert_eq!(frame.path_len_constraint(), Some(0));
        assert!(frame.issuer().matches(
            root.frame().unwrap().subject()
        ));

        let frame = ee.frame().unwrap();
        assert!(!frame.is_ca());
        assert!(!frame.is_self_issued());
        assert!(frame.issuer().matches(
            ca1.frame().unwrap().subject()
        ));
        assert!(frame.has_extension(ExtensionKind::SubjectAltName));
        let names: Vec<_> = frame.subject_alt_names()
            .filter_map(|name| {
                name.as_dns().map(|dns| dns.to_vec())
            })
            .collect();
        assert_eq!(names, vec![
            b"www.example.com".to_vec(),
            b"example.com".to_vec(),
        ]);
        assert!(frame.supports_key_purpose(&crate::oid::KP_SERVER_AUTH));
        assert!(!frame.supports_key_purpose(&crate::oid::KP_CODE_SIGNING));
        assert_ne!(frame.serial(), Serial::default());
    }

    #[test]
    fn frame_reparse_identity() {
        let cert = Cert::decode(
            include_bytes!("../test-data/ee.crt").as_ref()
        ).unwrap();
        let first = cert.frame().unwrap();
        cert.flush_cache();
        let second = cert.frame().unwrap();

        assert_eq!(first.version(), second.version());
        assert_eq!(first.serial(), second.serial());
        assert_eq!(
            first.serial_raw().as_slice(), second.serial_raw().as_slice()
        );
        assert_eq!(
            first.sig_alg_raw().as_slice(), second.sig_alg_raw().as_slice()
        );
        assert_eq!(first.tbs().as_slice(), second.tbs().as_slice());
        assert_eq!(
            first.pubkey_raw().as_slice(), second.pubkey_raw().as_slice()
        );
        assert_eq!(first.validity(), second.validity());
        assert_eq!(first.key_usage(), second.key_usage());
        assert_eq!(first.is_ca(), second.is_ca());
        assert_eq!(
            first.path_len_constraint(), second.path_len_constraint()
        );
        assert_eq!(first.ns_cert_type(), second.ns_cert_type());
        assert_eq!(first.issuer(), second.issuer());
        assert_eq!(first.subject(), second.subject());
    }

    #[test]
    fn frame_spans() {
        let cert = Cert::decode(
            include_bytes!("../test-data/ee.crt").as_ref()
        ).unwrap();
        let frame = cert.frame().unwrap();

        // Every span lies within the raw data, the TBS ones within the
        // TBS span.
        assert!(contains(cert.raw(), frame.tbs().as_slice()));
        assert!(contains(frame.tbs().as_slice(), frame.serial_raw().as_slice()));
        assert!(contains(frame.tbs().as_slice(), frame.pubkey_raw().as_slice()));

        // Serial, signature algorithm, and issuer are adjacent, as are
        // subject and public key info.
        let head = concat(&[
            frame.serial_raw().as_slice(),
            frame.sig_alg_raw().as_slice(),
            frame.issuer().as_slice(),
        ]);
        assert!(contains(frame.tbs().as_slice(), &head));
        let tail = concat(&[
            frame.subject().as_slice(),
            frame.pubkey_raw().as_slice(),
        ]);
        assert!(contains(frame.tbs().as_slice(), &tail));
    }

    #[test]
    fn eager_parsing() {
        let opts = ParseOptions { eager: true, ..Default::default() };
        let cert = Cert::decode_with_options(
            include_bytes!("../test-data/root.crt").as_ref(), opts
        ).unwrap();
        cert.frame().unwrap();
        cert.public_key().unwrap();
    }

    #[test]
    fn cert_list_decoding() {
        let der = concat(&[
            include_bytes!("../test-data/root.crt").as_ref(),
            include_bytes!("../test-data/ca1.crt").as_ref(),
        ]);
        let certs = CertList::decode(der.clone()).unwrap();
        assert_eq!(certs.len(), 2);
        assert!(
            certs.get(1).unwrap().frame().unwrap().issuer().matches(
                certs.get(0).unwrap().frame().unwrap().subject()
            )
        );

        // Trailing garbage is an error.
        let mut bad = der;
        bad.push(0x00);
        assert!(CertList::decode(bad).is_err());
    }

    #[test]
    fn public_key_parsing() {
        let cert = Cert::decode(
            include_bytes!("../test-data/root.crt").as_ref()
        ).unwrap();
        let key = cert.public_key().unwrap();
        assert_eq!(key.bit_len(), 2048);

        let cert = Cert::decode(
            include_bytes!("../test-data/ec-root.crt").as_ref()
        ).unwrap();
        let key = cert.public_key().unwrap();
        assert_eq!(key.bit_len(), 256);
        assert_eq!(key.curve(), Some(crate::crypto::Curve::P256));
    }

    #[test]
    fn shared_cache() {
        // Frames handed out stay usable after the cache is flushed and
        // refilled by another thread.
        let cert = std::sync::Arc::new(Cert::decode(
            include_bytes!("../test-data/root.crt").as_ref()
        ).unwrap());
        let frame = cert.frame().unwrap();
        let other = cert.clone();
        let handle = std::thread::spawn(move || {
            other.flush_cache();
            other.frame().unwrap().version()
        });
        assert_eq!(handle.join().unwrap(), frame.version());
    }
}
