//! Chain building and verification.
//!
//! Given an end-entity certificate and the intermediates presented with
//! it, a [`Verifier`] tries to build a path to one of a set of locally
//! trusted root certificates, checking names, signatures, validity
//! windows, basic-constraints budgets, key usage, revocation and a
//! cryptographic acceptability profile along the way.
//!
//! Verification does not stop at the first problem. Every link of the
//! built chain collects a set of [`VerifyFlags`] describing its defects,
//! and the folded set decides the overall verdict: an empty set is
//! success, anything else is reported via [`VerifyError::Defects`] so
//! the caller can decide which defects to tolerate. Only conditions that
//! prevent the search from completing at all, such as an over-long
//! chain, surface as [`VerifyError::Fatal`].

use std::{error, fmt, mem};
use std::convert::Infallible;
use bcder::ConstOid;
use bcder::decode::DecodeError;
use log::debug;
use crate::oid;
use crate::cert::{
    Cert, CertList, ExtensionKind, Frame, KeyUsages
};
use crate::crl::Crl;
use crate::crypto::{
    DigestAlgorithm, PublicKey, PublicKeyAlgorithm, PublicKeyFormat,
    Signature,
};
use crate::x509::{Name, Serial, Time};


//------------ VerifyFlags ---------------------------------------------------

/// The defects found for one certificate during verification.
///
/// The bit positions are fixed and part of the interface; every
/// position keeps its meaning across releases.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct VerifyFlags(u32);

impl VerifyFlags {
    /// The certificate validity has expired.
    pub const EXPIRED: Self = VerifyFlags(0x01);

    /// The certificate has been revoked by a CRL.
    pub const REVOKED: Self = VerifyFlags(0x02);

    /// No name of the certificate matched the expected host name.
    pub const CN_MISMATCH: Self = VerifyFlags(0x04);

    /// The chain does not end in a trusted root, or a signature on the
    /// way there was invalid.
    pub const NOT_TRUSTED: Self = VerifyFlags(0x08);

    /// The CRL is not correctly signed by the trusted CA.
    pub const CRL_NOT_TRUSTED: Self = VerifyFlags(0x10);

    /// The CRL is past its next update time.
    pub const CRL_EXPIRED: Self = VerifyFlags(0x20);

    /// The certificate was missing.
    pub const MISSING: Self = VerifyFlags(0x40);

    /// Verification was deliberately skipped.
    pub const SKIP_VERIFY: Self = VerifyFlags(0x80);

    /// Other reason, available to the verdict callback.
    pub const OTHER: Self = VerifyFlags(0x0100);

    /// The certificate validity starts in the future.
    pub const FUTURE: Self = VerifyFlags(0x0200);

    /// The CRL's this update time is in the future.
    pub const CRL_FUTURE: Self = VerifyFlags(0x0400);

    /// The key usage extension does not permit the intended use.
    pub const KEY_USAGE: Self = VerifyFlags(0x0800);

    /// The extended key usage extension does not include the purpose.
    pub const EXT_KEY_USAGE: Self = VerifyFlags(0x1000);

    /// The Netscape certificate type forbids the intended use.
    pub const NS_CERT_TYPE: Self = VerifyFlags(0x2000);

    /// The certificate is signed with a disallowed digest algorithm.
    pub const BAD_MD: Self = VerifyFlags(0x4000);

    /// The certificate is signed with a disallowed public key algorithm.
    pub const BAD_PK: Self = VerifyFlags(0x8000);

    /// The certificate's key fails the profile's strength requirements.
    pub const BAD_KEY: Self = VerifyFlags(0x0001_0000);

    /// The CRL is signed with a disallowed digest algorithm.
    pub const CRL_BAD_MD: Self = VerifyFlags(0x0002_0000);

    /// The CRL is signed with a disallowed public key algorithm.
    pub const CRL_BAD_PK: Self = VerifyFlags(0x0004_0000);

    /// The CRL signer's key fails the strength requirements.
    pub const CRL_BAD_KEY: Self = VerifyFlags(0x0008_0000);

    /// Every flag set. Reported when verification fails fatally.
    pub const ALL: Self = VerifyFlags(u32::MAX);

    const NAMES: &'static [(VerifyFlags, &'static str)] = &[
        (Self::EXPIRED, "expired"),
        (Self::REVOKED, "revoked"),
        (Self::CN_MISMATCH, "cn-mismatch"),
        (Self::NOT_TRUSTED, "not-trusted"),
        (Self::CRL_NOT_TRUSTED, "crl-not-trusted"),
        (Self::CRL_EXPIRED, "crl-expired"),
        (Self::MISSING, "missing"),
        (Self::SKIP_VERIFY, "skip-verify"),
        (Self::OTHER, "other"),
        (Self::FUTURE, "future"),
        (Self::CRL_FUTURE, "crl-future"),
        (Self::KEY_USAGE, "key-usage"),
        (Self::EXT_KEY_USAGE, "ext-key-usage"),
        (Self::NS_CERT_TYPE, "ns-cert-type"),
        (Self::BAD_MD, "bad-md"),
        (Self::BAD_PK, "bad-pk"),
        (Self::BAD_KEY, "bad-key"),
        (Self::CRL_BAD_MD, "crl-bad-md"),
        (Self::CRL_BAD_PK, "crl-bad-pk"),
        (Self::CRL_BAD_KEY, "crl-bad-key"),
    ];

    /// Returns the raw bit representation.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns whether no flag is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns whether all flags in `other` are set in `self`.
    pub fn contains(self, other: VerifyFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Removes the flags of `other` from `self`.
    pub fn remove(&mut self, other: VerifyFlags) {
        self.0 &= !other.0
    }
}

impl std::ops::BitOr for VerifyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        VerifyFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for VerifyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl fmt::Display for VerifyFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("ok")
        }
        let mut first = true;
        for &(flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}


//------------ CertProfile ---------------------------------------------------

/// The cryptographic acceptability profile for verification.
///
/// A profile states which digest and public key algorithms and which
/// curves are acceptable in signatures and keys along a chain, and how
/// large RSA moduli have to be. Certificates falling outside the profile
/// are not rejected outright; the relevant `BAD_*` flags are raised.
#[derive(Clone, Copy, Debug)]
pub struct CertProfile {
    /// Allowed digest algorithms as [`DigestAlgorithm::flag`] bits.
    pub allowed_digests: u32,

    /// Allowed public key algorithms as [`PublicKeyAlgorithm::flag`] bits.
    pub allowed_public_keys: u32,

    /// Allowed curves as [`Curve::flag`][crate::crypto::Curve::flag] bits.
    pub allowed_curves: u32,

    /// The minimal acceptable size of RSA moduli in bits.
    pub rsa_min_bit_len: usize,
}

impl CertProfile {
    /// The recommended profile: SHA-2 digests and RSA of 2048 bits up.
    pub const DEFAULT: Self = CertProfile {
        allowed_digests: DigestAlgorithm::Sha224.flag()
            | DigestAlgorithm::Sha256.flag()
            | DigestAlgorithm::Sha384.flag()
            | DigestAlgorithm::Sha512.flag(),
        allowed_public_keys: u32::MAX,
        allowed_curves: u32::MAX,
        rsa_min_bit_len: 2048,
    };

    /// A conservative profile expected to stay acceptable.
    pub const NEXT: Self = CertProfile {
        allowed_digests: DigestAlgorithm::Sha256.flag()
            | DigestAlgorithm::Sha384.flag()
            | DigestAlgorithm::Sha512.flag(),
        allowed_public_keys: u32::MAX,
        allowed_curves: crate::crypto::Curve::P256.flag()
            | crate::crypto::Curve::P384.flag()
            | crate::crypto::Curve::P521.flag(),
        rsa_min_bit_len: 2048,
    };

    /// The NSA Suite B profile: ECDSA over P-256 and P-384 only.
    pub const SUITE_B: Self = CertProfile {
        allowed_digests: DigestAlgorithm::Sha256.flag()
            | DigestAlgorithm::Sha384.flag(),
        allowed_public_keys: PublicKeyAlgorithm::Ecdsa.flag(),
        allowed_curves: crate::crypto::Curve::P256.flag()
            | crate::crypto::Curve::P384.flag(),
        rsa_min_bit_len: 0,
    };

    /// Returns whether the digest algorithm is acceptable.
    pub fn allows_digest(&self, digest: DigestAlgorithm) -> bool {
        self.allowed_digests & digest.flag() != 0
    }

    /// Returns whether the public key algorithm is acceptable.
    pub fn allows_public_key(&self, alg: PublicKeyAlgorithm) -> bool {
        self.allowed_public_keys & alg.flag() != 0
    }

    /// Returns whether a key satisfies the strength requirements.
    pub fn allows_key(&self, key: &PublicKey) -> bool {
        match key.algorithm() {
            PublicKeyFormat::Rsa => {
                key.bit_len() >= self.rsa_min_bit_len
            }
            PublicKeyFormat::Ecdsa(curve) => {
                self.allowed_curves & curve.flag() != 0
            }
            PublicKeyFormat::Ed25519 => true,
        }
    }
}

impl Default for CertProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}


//------------ VerifyOptions -------------------------------------------------

/// Configuration for chain verification.
#[derive(Clone, Copy, Debug)]
pub struct VerifyOptions {
    /// The cryptographic acceptability profile.
    pub profile: CertProfile,

    /// The maximum number of non-trusted intermediate certificates.
    pub max_intermediate_ca: usize,

    /// Check the key usage extension of signing certificates.
    pub check_key_usage: bool,

    /// Check the extended key usage extension of the end entity.
    pub check_extended_key_usage: bool,

    /// Key usages the end entity must permit, if any.
    pub required_key_usage: Option<KeyUsages>,

    /// A key purpose the end entity must permit, if any.
    pub required_key_purpose: Option<&'static ConstOid>,

    /// Netscape certificate type bits the end entity must carry, if any.
    pub required_ns_cert_type: Option<u8>,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        VerifyOptions {
            profile: CertProfile::DEFAULT,
            max_intermediate_ca: 8,
            check_key_usage: true,
            check_extended_key_usage: true,
            required_key_usage: None,
            required_key_purpose: None,
            required_ns_cert_type: None,
        }
    }
}


//------------ TrustAnchors --------------------------------------------------

/// The source of trusted root certificates.
pub enum TrustAnchors<'a> {
    /// A static list of trust anchors.
    List(&'a CertList),

    /// A callback queried for candidate anchors at every hop.
    ///
    /// CRL checking is disabled when anchors come from a callback.
    Lookup(&'a dyn Fn(&Cert) -> Result<CertList, VerifyFatal>),
}


//------------ VerifiedChain -------------------------------------------------

/// The chain built during verification.
///
/// The chain starts at the end entity and continues issuer by issuer.
/// If a trusted root was reached, it forms the last element.
#[derive(Clone, Debug, Default)]
pub struct VerifiedChain {
    items: Vec<ChainItem>,
}

impl VerifiedChain {
    /// Returns the number of certificates in the chain.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item at the given depth, end entity first.
    pub fn get(&self, depth: usize) -> Option<&ChainItem> {
        self.items.get(depth)
    }

    /// Returns an iterator over the chain, end entity first.
    pub fn iter(&self) -> std::slice::Iter<'_, ChainItem> {
        self.items.iter()
    }

    /// Returns the defect flags of all items folded together.
    pub fn flags(&self) -> VerifyFlags {
        self.items.iter().fold(
            VerifyFlags::default(), |res, item| res | item.flags
        )
    }
}


//------------ ChainItem -----------------------------------------------------

/// One link of a verified chain.
#[derive(Clone, Debug)]
pub struct ChainItem {
    /// The certificate of this link.
    cert: Cert,

    /// The defects found for this link.
    flags: VerifyFlags,
}

impl ChainItem {
    /// Returns the certificate of this link.
    pub fn cert(&self) -> &Cert {
        &self.cert
    }

    /// Returns the defects found for this link.
    pub fn flags(&self) -> VerifyFlags {
        self.flags
    }
}


//------------ RestartContext ------------------------------------------------

/// Caller-owned state for restartable verification.
///
/// The context bounds how many signature verifications a single call may
/// perform. When the budget runs out mid-search, the verifier captures
/// its position here and returns [`VerifyError::InProgress`]; calling
/// again with the same context resumes where it left off. Dropping the
/// context abandons the suspended verification.
#[derive(Debug, Default)]
pub struct RestartContext {
    /// Maximum signature operations per call. Zero means unbounded.
    max_ops: usize,

    /// Operations spent in the current call.
    ops: usize,

    /// The suspended state, if any.
    state: RestartState,
}

impl RestartContext {
    /// Creates a context allowing `max_ops` signature checks per call.
    pub fn new(max_ops: usize) -> Self {
        RestartContext {
            max_ops,
            ops: 0,
            state: RestartState::Idle,
        }
    }

    /// Returns whether a verification is currently suspended.
    pub fn in_progress(&self) -> bool {
        !matches!(self.state, RestartState::Idle)
    }

    /// Accounts for one signature operation.
    ///
    /// Returns `false` if the operation must not be performed in this
    /// call anymore.
    fn charge(&mut self) -> bool {
        if self.max_ops == 0 {
            return true
        }
        if self.ops < self.max_ops {
            self.ops += 1;
            true
        }
        else {
            false
        }
    }
}


//------------ RestartState --------------------------------------------------

/// Where a suspended verification stopped.
#[derive(Debug, Default)]
enum RestartState {
    /// Nothing is suspended.
    #[default]
    Idle,

    /// Suspended inside the parent search of a chain link.
    FindParent(FindParentState),
}

/// The saved state of a suspended parent search.
#[derive(Debug)]
struct FindParentState {
    /// The chain built so far; its last item is the current child.
    chain: VerifiedChain,

    /// Self-issued intermediates seen so far.
    self_cnt: usize,

    /// Start of the untrusted candidates in the presented list.
    rest_start: usize,

    /// The position of the suspended candidate scan.
    scan: ScanState,
}

/// The position within the two candidate lists.
#[derive(Debug)]
struct ScanState {
    /// Scanning the trusted list (or the presented rest)?
    in_trusted: bool,

    /// Index of the next candidate in the current list.
    idx: usize,

    /// The best expired candidate seen so far.
    fallback: Option<Found>,
}


//------------ Found ---------------------------------------------------------

/// A parent candidate accepted by the search.
#[derive(Clone, Debug)]
struct Found {
    /// The parent certificate.
    cert: Cert,

    /// Where the parent came from.
    source: ParentSource,

    /// Whether the child's signature verified under the parent's key.
    sig_good: bool,
}

/// Where a parent candidate came from.
#[derive(Clone, Copy, Debug)]
enum ParentSource {
    /// One of the trust anchors.
    Trusted,

    /// The presented chain, at the given index.
    Chain(usize),
}

impl Found {
    fn is_trusted(&self) -> bool {
        matches!(self.source, ParentSource::Trusted)
    }
}

/// The outcome of scanning one candidate list.
enum InOutcome {
    Found(Found),
    None,
    Suspended,
}

/// The outcome of the full parent search.
enum FindOutcome {
    Found(Found),
    None,
    Suspended(ScanState),
}


//------------ SigInfo -------------------------------------------------------

/// What is needed of a child certificate to find and check its parent.
///
/// Keeping this separate allows releasing the child's frame before
/// candidate parents are examined.
struct SigInfo {
    /// The signed bytes.
    tbs: bcder::Captured,

    /// The signature over them.
    signature: Signature,

    /// The child's issuer name which the parent's subject must match.
    issuer: Name,
}


//------------ Verifier ------------------------------------------------------

/// A configured certificate chain verifier.
pub struct Verifier<'a> {
    /// The trusted root certificates.
    trust: TrustAnchors<'a>,

    /// The certificate revocation lists to consult.
    crls: &'a [Crl],

    /// The verification options.
    options: VerifyOptions,
}

/// The verdict adjustment callback.
///
/// It receives each certificate of the built chain together with its
/// depth, the end entity being depth zero, and may clear or add flags.
/// An error aborts verification fatally.
pub type VerifyCallback<'c> = dyn FnMut(
    &Cert, usize, &mut VerifyFlags
) -> Result<(), VerifyFatal> + 'c;

impl<'a> Verifier<'a> {
    /// Creates a new verifier trusting the given anchors.
    pub fn new(trust: TrustAnchors<'a>) -> Self {
        Verifier {
            trust,
            crls: &[],
            options: VerifyOptions::default(),
        }
    }

    /// Sets the certificate revocation lists to consult.
    ///
    /// CRLs are only used when the trust anchors are a static list.
    pub fn with_crls(mut self, crls: &'a [Crl]) -> Self {
        self.crls = crls;
        self
    }

    /// Replaces the verification options.
    pub fn with_options(mut self, options: VerifyOptions) -> Self {
        self.options = options;
        self
    }

    /// Verifies a presented certificate chain at the current time.
    ///
    /// The first certificate of `chain` is the end entity, any further
    /// ones are available as untrusted intermediates. If `host_name` is
    /// given, the end entity must have a matching DNS subject
    /// alternative name or, lacking the extension, common name.
    pub fn verify(
        &self,
        chain: &CertList,
        host_name: Option<&str>,
    ) -> Result<VerifiedChain, VerifyError> {
        self.verify_at(chain, host_name, Time::now())
    }

    /// Verifies a presented certificate chain at the given time.
    pub fn verify_at(
        &self,
        chain: &CertList,
        host_name: Option<&str>,
        now: Time,
    ) -> Result<VerifiedChain, VerifyError> {
        self.verify_inner(chain, host_name, now, None, None)
    }

    /// Verifies a chain, adjusting verdicts through a callback.
    pub fn verify_with_callback_at(
        &self,
        chain: &CertList,
        host_name: Option<&str>,
        now: Time,
        callback: &mut VerifyCallback<'_>,
    ) -> Result<VerifiedChain, VerifyError> {
        self.verify_inner(chain, host_name, now, None, Some(callback))
    }

    /// Verifies a chain in bounded steps.
    ///
    /// If the operation budget of `ctx` runs out, the method returns
    /// [`VerifyError::InProgress`] and must be called again with the
    /// same arguments and context to continue.
    pub fn verify_restartable_at(
        &self,
        chain: &CertList,
        host_name: Option<&str>,
        now: Time,
        ctx: &mut RestartContext,
    ) -> Result<VerifiedChain, VerifyError> {
        self.verify_inner(chain, host_name, now, Some(ctx), None)
    }

    fn verify_inner(
        &self,
        chain: &CertList,
        host_name: Option<&str>,
        now: Time,
        mut rs: Option<&mut RestartContext>,
        mut callback: Option<&mut VerifyCallback<'_>>,
    ) -> Result<VerifiedChain, VerifyError> {
        let ee = match chain.get(0) {
            Some(ee) => ee,
            None => {
                return Err(VerifyError::Fatal(VerifyFatal::empty_chain()))
            }
        };

        // The end-entity checks are cheap and deterministic, so they are
        // simply re-done when a suspended verification is resumed.
        let mut ee_flags = VerifyFlags::default();
        if let Some(host_name) = host_name {
            self.verify_host_name(ee, host_name, &mut ee_flags)
                .map_err(VerifyError::Fatal)?;
        }
        {
            let key = ee.public_key().map_err(|err| {
                VerifyError::Fatal(VerifyFatal::decode(err))
            })?;
            if !self.options.profile.allows_public_key(
                key.algorithm().algorithm()
            ) {
                ee_flags |= VerifyFlags::BAD_PK;
            }
            if !self.options.profile.allows_key(&key) {
                ee_flags |= VerifyFlags::BAD_KEY;
            }
        }
        {
            let frame = ee.frame().map_err(|err| {
                VerifyError::Fatal(VerifyFatal::decode(err))
            })?;
            if self.options.check_key_usage {
                if let Some(usage) = self.options.required_key_usage {
                    if !frame.supports_key_usage(usage) {
                        ee_flags |= VerifyFlags::KEY_USAGE;
                    }
                }
            }
            if self.options.check_extended_key_usage {
                if let Some(purpose) = self.options.required_key_purpose {
                    if !frame.supports_key_purpose(purpose) {
                        ee_flags |= VerifyFlags::EXT_KEY_USAGE;
                    }
                }
            }
            if let Some(usage) = self.options.required_ns_cert_type {
                if !frame.supports_ns_cert_type(usage) {
                    ee_flags |= VerifyFlags::NS_CERT_TYPE;
                }
            }
        }

        let mut ver_chain = self.verify_chain(
            chain, now, rs.as_deref_mut()
        )?;
        ver_chain.items[0].flags |= ee_flags;

        // Fold the flags top to bottom, giving the callback a chance to
        // adjust each level.
        let mut flags = VerifyFlags::default();
        for depth in (0..ver_chain.items.len()).rev() {
            let mut cur = ver_chain.items[depth].flags;
            if let Some(callback) = callback.as_deref_mut() {
                callback(
                    &ver_chain.items[depth].cert, depth, &mut cur
                ).map_err(VerifyError::Fatal)?;
                ver_chain.items[depth].flags = cur;
            }
            flags |= cur;
        }

        if flags.is_empty() {
            Ok(ver_chain)
        }
        else {
            Err(VerifyError::Defects { flags, chain: ver_chain })
        }
    }

    /// Builds and verifies the chain.
    ///
    /// Walks from the end entity upwards, looking for a suitable parent
    /// for each link among the trust anchors first and the presented
    /// intermediates second, and collecting defect flags per link.
    fn verify_chain(
        &self,
        chain: &CertList,
        now: Time,
        mut rs: Option<&mut RestartContext>,
    ) -> Result<VerifiedChain, VerifyError> {
        let mut ver_chain = VerifiedChain::default();
        let mut self_cnt = 0;
        let mut child = match chain.get(0) {
            Some(child) => child.clone(),
            None => {
                return Err(VerifyError::Fatal(VerifyFatal::empty_chain()))
            }
        };
        let mut rest_start = 1;
        let mut child_is_trusted = false;
        let mut skip_push = false;
        let mut resume_scan = None;

        // Resume a suspended walk at its parent search.
        if let Some(ctx) = rs.as_deref_mut() {
            ctx.ops = 0;
            if let RestartState::FindParent(state) = mem::take(
                &mut ctx.state
            ) {
                child = match state.chain.items.last() {
                    Some(item) => item.cert.clone(),
                    None => {
                        return Err(VerifyError::Fatal(
                            VerifyFatal::empty_chain()
                        ))
                    }
                };
                ver_chain = state.chain;
                self_cnt = state.self_cnt;
                rest_start = state.rest_start;
                resume_scan = Some(state.scan);
                skip_push = true;
            }
        }

        debug!(
            "verifying chain of {} presented certificates", chain.len()
        );

        loop {
            if !skip_push {
                ver_chain.items.push(ChainItem {
                    cert: child.clone(),
                    flags: VerifyFlags::default(),
                });
            }
            skip_push = false;
            let depth = ver_chain.items.len() - 1;
            let mut cur_flags = ver_chain.items[depth].flags;

            let frame = child.frame().map_err(|err| {
                VerifyError::Fatal(VerifyFatal::decode(err))
            })?;

            if frame.validity().ended_at(now) {
                cur_flags |= VerifyFlags::EXPIRED;
            }
            if !frame.validity().started_at(now) {
                cur_flags |= VerifyFlags::FUTURE;
            }

            // A trusted root terminates the walk. Its time validity was
            // just checked; nobody vouches for anything else about it.
            if child_is_trusted {
                ver_chain.items[depth].flags = cur_flags;
                return Ok(ver_chain)
            }

            let self_issued = frame.is_self_issued();

            let alg = frame.signature().algorithm();
            if !self.options.profile.allows_digest(alg.digest()) {
                cur_flags |= VerifyFlags::BAD_MD;
            }
            if !self.options.profile.allows_public_key(alg.public_key()) {
                cur_flags |= VerifyFlags::BAD_PK;
            }

            // A self-issued end entity that is itself on the trust list
            // is accepted as is.
            if depth == 0 && self_issued {
                if let TrustAnchors::List(trust) = self.trust {
                    if trust.iter().any(|anchor| {
                        anchor.raw() == child.raw()
                    }) {
                        debug!("end entity is locally trusted");
                        ver_chain.items[depth].flags = cur_flags;
                        return Ok(ver_chain)
                    }
                }
            }

            let child_serial = frame.serial();
            let sig_info = SigInfo {
                tbs: frame.tbs().clone(),
                signature: frame.signature().clone(),
                issuer: frame.issuer().clone(),
            };
            drop(frame);

            let anchors_owned;
            let anchors = match self.trust {
                TrustAnchors::List(list) => list,
                TrustAnchors::Lookup(lookup) => {
                    anchors_owned = lookup(&child)
                        .map_err(VerifyError::Fatal)?;
                    &anchors_owned
                }
            };

            let found = match self.find_parent(
                &sig_info, chain, rest_start, anchors,
                depth, self_cnt, now,
                rs.as_deref_mut(), resume_scan.take(),
            ).map_err(VerifyError::Fatal)? {
                FindOutcome::Found(found) => found,
                FindOutcome::None => {
                    debug!("no parent found at depth {depth}");
                    cur_flags |= VerifyFlags::NOT_TRUSTED;
                    ver_chain.items[depth].flags = cur_flags;
                    return Ok(ver_chain)
                }
                FindOutcome::Suspended(scan) => {
                    ver_chain.items[depth].flags = cur_flags;
                    if let Some(ctx) = rs.as_deref_mut() {
                        ctx.state = RestartState::FindParent(
                            FindParentState {
                                chain: ver_chain,
                                self_cnt,
                                rest_start,
                                scan,
                            }
                        );
                    }
                    return Err(VerifyError::InProgress)
                }
            };

            // Self-issued intermediates can occur with key rollover and
            // are excluded from path length accounting.
            if depth != 0 && self_issued {
                self_cnt += 1;
            }

            if !found.is_trusted()
                && ver_chain.items.len() > self.options.max_intermediate_ca
            {
                return Err(VerifyError::Fatal(VerifyFatal::too_deep()))
            }

            if !found.sig_good {
                cur_flags |= VerifyFlags::NOT_TRUSTED;
            }

            {
                let parent_key = found.cert.public_key().map_err(|err| {
                    VerifyError::Fatal(VerifyFatal::decode(err))
                })?;
                if !self.options.profile.allows_key(&parent_key) {
                    cur_flags |= VerifyFlags::BAD_KEY;
                }
            }

            // CRLs only apply with a static trust list.
            if matches!(self.trust, TrustAnchors::List(_)) {
                cur_flags |= self.check_crls(
                    child_serial, &found.cert, now
                );
            }

            ver_chain.items[depth].flags = cur_flags;

            if let ParentSource::Chain(idx) = found.source {
                rest_start = idx + 1;
            }
            child_is_trusted = found.is_trusted();
            child = found.cert;
        }
    }

    /// Looks for a suitable parent among trusted roots, then the rest of
    /// the presented chain.
    #[allow(clippy::too_many_arguments)]
    fn find_parent(
        &self,
        sig_info: &SigInfo,
        chain: &CertList,
        rest_start: usize,
        anchors: &CertList,
        path_cnt: usize,
        self_cnt: usize,
        now: Time,
        mut rs: Option<&mut RestartContext>,
        scan: Option<ScanState>,
    ) -> Result<FindOutcome, VerifyFatal> {
        let (mut in_trusted, mut idx, mut fallback) = match scan {
            Some(scan) => (scan.in_trusted, scan.idx, scan.fallback),
            None => (true, 0, None),
        };
        loop {
            let outcome = self.find_parent_in(
                sig_info, chain, rest_start, anchors, in_trusted,
                path_cnt, self_cnt, now,
                rs.as_deref_mut(), &mut idx, &mut fallback,
            )?;
            match outcome {
                InOutcome::Found(found) => {
                    return Ok(FindOutcome::Found(found))
                }
                InOutcome::Suspended => {
                    return Ok(FindOutcome::Suspended(ScanState {
                        in_trusted, idx, fallback,
                    }))
                }
                InOutcome::None => {
                    if !in_trusted {
                        return Ok(FindOutcome::None)
                    }
                    // Second round: the presented intermediates.
                    in_trusted = false;
                    idx = 0;
                    fallback = None;
                }
            }
        }
    }

    /// Scans one candidate list for a suitable parent.
    ///
    /// A candidate is suitable if its subject matches the child's
    /// issuer, it may sign certificates, and its path length budget
    /// covers the chain below it. The first suitable and time-valid
    /// candidate wins; failing that, the first suitable one outside its
    /// validity window is used so an expired root yields an `EXPIRED`
    /// verdict rather than `NOT_TRUSTED`. For trusted candidates the
    /// signature must verify, so that coexisting roots sharing a name
    /// are told apart by their keys.
    #[allow(clippy::too_many_arguments)]
    fn find_parent_in(
        &self,
        sig_info: &SigInfo,
        chain: &CertList,
        rest_start: usize,
        anchors: &CertList,
        top: bool,
        path_cnt: usize,
        self_cnt: usize,
        now: Time,
        mut rs: Option<&mut RestartContext>,
        idx: &mut usize,
        fallback: &mut Option<Found>,
    ) -> Result<InOutcome, VerifyFatal> {
        loop {
            let (candidate, source) = if top {
                match anchors.get(*idx) {
                    Some(cert) => (cert, ParentSource::Trusted),
                    None => break,
                }
            }
            else {
                match chain.get(rest_start + *idx) {
                    Some(cert) => {
                        (cert, ParentSource::Chain(rest_start + *idx))
                    }
                    None => break,
                }
            };

            let (parent_valid, parent_match, path_len_ok) = {
                let parent = candidate.frame().map_err(
                    VerifyFatal::decode
                )?;
                (
                    parent.validity().covers(now),
                    self.check_parent(sig_info, &parent, top),
                    match parent.path_len_constraint() {
                        Some(limit) => {
                            limit as usize >= path_cnt - self_cnt
                        }
                        None => true,
                    }
                )
            };

            if !parent_match || !path_len_ok {
                *idx += 1;
                continue
            }

            if let Some(ctx) = rs.as_deref_mut() {
                if !ctx.charge() {
                    return Ok(InOutcome::Suspended)
                }
            }
            let sig_good = Self::check_signature(sig_info, candidate);

            if top && !sig_good {
                *idx += 1;
                continue
            }

            if !parent_valid {
                if fallback.is_none() {
                    *fallback = Some(Found {
                        cert: candidate.clone(),
                        source,
                        sig_good,
                    });
                }
                *idx += 1;
                continue
            }

            return Ok(InOutcome::Found(Found {
                cert: candidate.clone(),
                source,
                sig_good,
            }))
        }

        Ok(match fallback.take() {
            Some(found) => InOutcome::Found(found),
            None => InOutcome::None,
        })
    }

    /// Returns whether `parent` is a plausible signer for the child.
    fn check_parent(
        &self,
        sig_info: &SigInfo,
        parent: &Frame,
        top: bool,
    ) -> bool {
        if !sig_info.issuer.matches(parent.subject()) {
            return false
        }
        // The CA bit is required as a general rule; locally trusted
        // version 1 and 2 certificates cannot carry it.
        let need_ca_bit = !(top && parent.version() < 3);
        if need_ca_bit && !parent.is_ca() {
            return false
        }
        if need_ca_bit
            && self.options.check_key_usage
            && !parent.supports_key_usage(KeyUsages::KEY_CERT_SIGN)
        {
            return false
        }
        true
    }

    /// Checks the child's signature under a candidate's key.
    ///
    /// Any failure to obtain or use the candidate's key simply makes the
    /// signature count as bad; the candidate may still be reported, with
    /// `NOT_TRUSTED` raised on the link.
    fn check_signature(sig_info: &SigInfo, candidate: &Cert) -> bool {
        let key = match candidate.public_key() {
            Ok(key) => key,
            Err(_) => return false,
        };
        key.verify(
            sig_info.tbs.as_slice(), &sig_info.signature
        ).is_ok()
    }

    /// Checks the CRLs issued by `ca` for the child's serial number.
    fn check_crls(
        &self,
        serial: Serial,
        ca: &Cert,
        now: Time,
    ) -> VerifyFlags {
        let mut flags = VerifyFlags::default();
        if self.crls.is_empty() {
            return flags
        }

        let (ca_subject, can_sign) = match ca.frame() {
            Ok(frame) => (
                frame.subject().clone(),
                frame.supports_key_usage(KeyUsages::CRL_SIGN),
            ),
            Err(_) => return VerifyFlags::CRL_NOT_TRUSTED,
        };
        let ca_key = match ca.public_key() {
            Ok(key) => key,
            Err(_) => return VerifyFlags::CRL_NOT_TRUSTED,
        };

        for crl in self.crls {
            if !crl.issuer().matches(&ca_subject) {
                continue
            }
            debug!("checking CRL issued by chain parent");

            if self.options.check_key_usage && !can_sign {
                flags |= VerifyFlags::CRL_NOT_TRUSTED;
                break
            }

            let alg = crl.signature().algorithm();
            if !self.options.profile.allows_digest(alg.digest()) {
                flags |= VerifyFlags::CRL_BAD_MD;
            }
            if !self.options.profile.allows_public_key(alg.public_key()) {
                flags |= VerifyFlags::CRL_BAD_PK;
            }
            if !self.options.profile.allows_key(&ca_key) {
                flags |= VerifyFlags::BAD_KEY;
            }

            if crl.verify_signature(&ca_key).is_err() {
                flags |= VerifyFlags::CRL_NOT_TRUSTED;
                break
            }

            if crl.is_stale_at(now) {
                flags |= VerifyFlags::CRL_EXPIRED;
            }
            if crl.this_update() > now {
                flags |= VerifyFlags::CRL_FUTURE;
            }

            if let Some(entry) = crl.find_serial(serial) {
                if entry.revocation_date() <= now {
                    debug!("certificate is revoked");
                    flags |= VerifyFlags::REVOKED;
                    break
                }
            }
        }
        flags
    }

    /// Checks the expected host name against the end entity.
    ///
    /// DNS entries of the subject alternative names are preferred; the
    /// common name attributes of the subject are consulted only if the
    /// extension is absent.
    fn verify_host_name(
        &self,
        ee: &Cert,
        host_name: &str,
        flags: &mut VerifyFlags,
    ) -> Result<(), VerifyFatal> {
        let frame = ee.frame().map_err(VerifyFatal::decode)?;
        let matched = if frame.has_extension(
            ExtensionKind::SubjectAltName
        ) {
            frame.subject_alt_names().any(|name| {
                name.as_dns().map_or(false, |dns| {
                    dns_name_matches(dns, host_name.as_bytes())
                })
            })
        }
        else {
            frame.subject().attributes().any(|attr| {
                attr.oid() == &oid::AT_COMMON_NAME
                    && dns_name_matches(
                        attr.value(), host_name.as_bytes()
                    )
            })
        };
        if !matched {
            *flags |= VerifyFlags::CN_MISMATCH;
        }
        Ok(())
    }
}


//------------ DNS name matching ---------------------------------------------

/// Returns whether a host name matches a certificate name.
///
/// A single trailing dot on either side does not count. Apart from a
/// case-insensitive byte-wise match, the certificate name may be a
/// wildcard covering exactly one leading label of the host name.
fn dns_name_matches(pattern: &[u8], host: &[u8]) -> bool {
    let pattern = strip_trailing_dot(pattern);
    let host = strip_trailing_dot(host);
    if pattern.eq_ignore_ascii_case(host) {
        return true
    }
    wildcard_matches(pattern, host)
}

/// Returns whether a wildcard pattern covers a host name.
///
/// The pattern must start with `*.` and its remainder must match
/// everything from the host name's first dot on. The host name needs at
/// least one character before that dot.
fn wildcard_matches(pattern: &[u8], host: &[u8]) -> bool {
    if pattern.len() < 3 || pattern[0] != b'*' || pattern[1] != b'.' {
        return false
    }
    let dot = match host.iter().position(|&item| item == b'.') {
        Some(dot) => dot,
        None => return false,
    };
    if dot == 0 {
        return false
    }
    pattern[1..].eq_ignore_ascii_case(&host[dot..])
}

fn strip_trailing_dot(name: &[u8]) -> &[u8] {
    match name.split_last() {
        Some((&b'.', rest)) => rest,
        _ => name,
    }
}


//------------ VerifyError ---------------------------------------------------

/// The ways verification can conclude other than fully successful.
#[derive(Debug)]
pub enum VerifyError {
    /// The chain was examined and defects were found.
    Defects {
        /// All defect flags folded together.
        flags: VerifyFlags,

        /// The chain with the defects of each link.
        chain: VerifiedChain,
    },

    /// A restartable verification ran out of operation budget.
    InProgress,

    /// The search could not be completed.
    Fatal(VerifyFatal),
}

impl VerifyError {
    /// Returns the defect flags implied by this error.
    ///
    /// A fatal error reports every flag set.
    pub fn flags(&self) -> VerifyFlags {
        match self {
            VerifyError::Defects { flags, .. } => *flags,
            VerifyError::InProgress => VerifyFlags::default(),
            VerifyError::Fatal(_) => VerifyFlags::ALL,
        }
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VerifyError::Defects { flags, .. } => {
                write!(f, "certificate verify failed: {flags}")
            }
            VerifyError::InProgress => {
                f.write_str("verification in progress")
            }
            VerifyError::Fatal(inner) => inner.fmt(f),
        }
    }
}

impl error::Error for VerifyError { }


//------------ VerifyFatal ---------------------------------------------------

/// Verification could not even complete its search.
#[derive(Debug)]
pub struct VerifyFatal {
    inner: VerifyFatalKind,
}

#[derive(Debug)]
enum VerifyFatalKind {
    /// No certificate was given to verify.
    EmptyChain,

    /// The chain exceeds the intermediate certificate limit.
    TooDeep,

    /// A certificate could not be re-parsed or its key not be read.
    Decode(DecodeError<Infallible>),

    /// A user callback reported failure.
    Callback,
}

impl VerifyFatal {
    fn empty_chain() -> Self {
        VerifyFatal { inner: VerifyFatalKind::EmptyChain }
    }

    fn too_deep() -> Self {
        VerifyFatal { inner: VerifyFatalKind::TooDeep }
    }

    fn decode(err: DecodeError<Infallible>) -> Self {
        VerifyFatal { inner: VerifyFatalKind::Decode(err) }
    }

    /// Creates the error a failing callback reports.
    pub fn callback() -> Self {
        VerifyFatal { inner: VerifyFatalKind::Callback }
    }
}

impl fmt::Display for VerifyFatal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner {
            VerifyFatalKind::EmptyChain => {
                f.write_str("no certificate to verify")
            }
            VerifyFatalKind::TooDeep => {
                f.write_str("maximum number of intermediate \
                             certificates exceeded")
            }
            VerifyFatalKind::Decode(ref inner) => inner.fmt(f),
            VerifyFatalKind::Callback => {
                f.write_str("verification callback failed")
            }
        }
    }
}

impl error::Error for VerifyFatal { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn now() -> Time {
        Time::utc(2025, 1, 1, 0, 0, 0)
    }

    /// The verification time for the CRL scenarios.
    ///
    /// The CRLs in the test data are regenerated with the current clock,
    /// so these scenarios run at a time after generation.
    fn crl_now() -> Time {
        Time::utc(2027, 1, 1, 0, 0, 0)
    }

    fn cert(der: &'static [u8]) -> Cert {
        Cert::decode(der).unwrap()
    }

    fn list(certs: &[&'static [u8]]) -> CertList {
        certs.iter().copied().map(cert).collect()
    }

    fn roots() -> CertList {
        list(&[include_bytes!("../test-data/root.crt").as_ref()])
    }

    fn defects(
        res: Result<VerifiedChain, VerifyError>
    ) -> VerifyFlags {
        match res {
            Err(VerifyError::Defects { flags, .. }) => flags,
            Ok(_) => panic!("verification unexpectedly succeeded"),
            Err(err) => panic!("expected defects, got {err:?}"),
        }
    }

    #[test]
    fn trusted_root_alone() {
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = roots();
        let res = verifier.verify_at(&chain, None, now()).unwrap();
        assert_eq!(res.len(), 1);
        assert!(res.flags().is_empty());
    }

    #[test]
    fn expired_ee() {
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/expired.crt").as_ref()
        ]);
        assert_eq!(
            defects(verifier.verify_at(&chain, None, now())),
            VerifyFlags::EXPIRED
        );
    }

    #[test]
    fn future_ee() {
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/future.crt").as_ref()
        ]);
        assert_eq!(
            defects(verifier.verify_at(&chain, None, now())),
            VerifyFlags::FUTURE
        );
    }

    #[test]
    fn wildcard_san() {
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/srv.crt").as_ref()
        ]);
        let res = verifier.verify_at(
            &chain, Some("a.example.com"), now()
        ).unwrap();
        assert!(res.flags().is_empty());
        assert_eq!(
            defects(verifier.verify_at(&chain, Some("example.com"), now())),
            VerifyFlags::CN_MISMATCH
        );
    }

    #[test]
    fn chain_with_intermediate() {
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/ee.crt").as_ref(),
            include_bytes!("../test-data/ca1.crt").as_ref(),
        ]);
        let res = verifier.verify_at(
            &chain, Some("www.example.com"), now()
        ).unwrap();
        assert_eq!(res.len(), 3);
        assert!(res.flags().is_empty());

        // The second SAN entry works, too.
        verifier.verify_at(&chain, Some("example.com"), now()).unwrap();
    }

    #[test]
    fn chain_order_is_free_above_the_end_entity() {
        // Adding the root itself to the presented list changes nothing:
        // the walk jumps to the trusted copy as early as possible.
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/ee.crt").as_ref(),
            include_bytes!("../test-data/ca1.crt").as_ref(),
            include_bytes!("../test-data/root.crt").as_ref(),
        ]);
        let res = verifier.verify_at(&chain, None, now()).unwrap();
        assert_eq!(res.len(), 3);
        assert!(res.flags().is_empty());
    }

    #[test]
    fn common_name_fallback() {
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/cn-only.crt").as_ref()
        ]);
        verifier.verify_at(&chain, Some("example.com"), now()).unwrap();
        assert_eq!(
            defects(verifier.verify_at(
                &chain, Some("foo.example.com"), now()
            )),
            VerifyFlags::CN_MISMATCH
        );
    }

    #[test]
    fn intermediate_without_ca_bit() {
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/nonca-ee.crt").as_ref(),
            include_bytes!("../test-data/nonca.crt").as_ref(),
        ]);
        let res = verifier.verify_at(&chain, None, now());
        assert_eq!(defects(res), VerifyFlags::NOT_TRUSTED);
    }

    #[test]
    fn chain_too_long() {
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/deep-ee.crt").as_ref(),
            include_bytes!("../test-data/inter10.crt").as_ref(),
            include_bytes!("../test-data/inter9.crt").as_ref(),
            include_bytes!("../test-data/inter8.crt").as_ref(),
            include_bytes!("../test-data/inter7.crt").as_ref(),
            include_bytes!("../test-data/inter6.crt").as_ref(),
            include_bytes!("../test-data/inter5.crt").as_ref(),
            include_bytes!("../test-data/inter4.crt").as_ref(),
            include_bytes!("../test-data/inter3.crt").as_ref(),
            include_bytes!("../test-data/inter2.crt").as_ref(),
            include_bytes!("../test-data/inter1.crt").as_ref(),
        ]);
        assert!(matches!(
            verifier.verify_at(&chain, None, now()),
            Err(VerifyError::Fatal(_))
        ));
    }

    #[test]
    fn tampered_signature() {
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let mut der = include_bytes!("../test-data/srv.crt").to_vec();
        let pos = der.len() - 5;
        der[pos] ^= 0xff;
        let chain: CertList = vec![Cert::decode(der).unwrap()].into();
        assert_eq!(
            defects(verifier.verify_at(&chain, None, now())),
            VerifyFlags::NOT_TRUSTED
        );
    }

    #[test]
    fn revoked_ee() {
        let trust = roots();
        let crls = vec![Crl::decode(
            include_bytes!("../test-data/root.crl").as_ref()
        ).unwrap()];
        let verifier = Verifier::new(TrustAnchors::List(&trust))
            .with_crls(&crls);
        let chain = list(&[
            include_bytes!("../test-data/revoked.crt").as_ref()
        ]);
        assert_eq!(
            defects(verifier.verify_at(&chain, None, crl_now())),
            VerifyFlags::REVOKED
        );

        // An unrevoked certificate passes against the same CRL.
        let chain = list(&[
            include_bytes!("../test-data/srv.crt").as_ref()
        ]);
        verifier.verify_at(&chain, None, crl_now()).unwrap();
    }

    #[test]
    fn stale_crl() {
        let trust = roots();
        let crls = vec![Crl::decode(
            include_bytes!("../test-data/stale.crl").as_ref()
        ).unwrap()];
        let verifier = Verifier::new(TrustAnchors::List(&trust))
            .with_crls(&crls);
        let chain = list(&[
            include_bytes!("../test-data/srv.crt").as_ref()
        ]);
        assert_eq!(
            defects(verifier.verify_at(&chain, None, crl_now())),
            VerifyFlags::CRL_EXPIRED
        );
    }

    #[test]
    fn expired_root_is_used_as_fallback() {
        let trust = list(&[
            include_bytes!("../test-data/root-expired.crt").as_ref()
        ]);
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/srv.crt").as_ref()
        ]);
        let res = verifier.verify_at(&chain, None, now());
        assert_eq!(defects(res), VerifyFlags::EXPIRED);
    }

    #[test]
    fn valid_root_beats_expired_root() {
        let trust = list(&[
            include_bytes!("../test-data/root-expired.crt").as_ref(),
            include_bytes!("../test-data/root.crt").as_ref(),
        ]);
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/srv.crt").as_ref()
        ]);
        let res = verifier.verify_at(&chain, None, now()).unwrap();
        assert!(res.flags().is_empty());
    }

    #[test]
    fn ec_chain() {
        let trust = list(&[
            include_bytes!("../test-data/ec-root.crt").as_ref()
        ]);
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/ec-ee.crt").as_ref()
        ]);
        let res = verifier.verify_at(
            &chain, Some("ec.example.com"), now()
        ).unwrap();
        assert!(res.flags().is_empty());
    }

    #[test]
    fn suite_b_profile() {
        let options = VerifyOptions {
            profile: CertProfile::SUITE_B,
            ..Default::default()
        };

        // The all-ECDSA chain conforms.
        let trust = list(&[
            include_bytes!("../test-data/ec-root.crt").as_ref()
        ]);
        let verifier = Verifier::new(TrustAnchors::List(&trust))
            .with_options(options);
        let chain = list(&[
            include_bytes!("../test-data/ec-ee.crt").as_ref()
        ]);
        verifier.verify_at(&chain, None, now()).unwrap();

        // The RSA chain is flagged.
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust))
            .with_options(options);
        let chain = list(&[
            include_bytes!("../test-data/srv.crt").as_ref()
        ]);
        assert_eq!(
            defects(verifier.verify_at(&chain, None, now())),
            VerifyFlags::BAD_PK
        );
    }

    #[test]
    fn required_key_usage() {
        let trust = roots();
        let chain = list(&[
            include_bytes!("../test-data/srv.crt").as_ref()
        ]);

        let options = VerifyOptions {
            required_key_usage: Some(KeyUsages::DIGITAL_SIGNATURE),
            ..Default::default()
        };
        Verifier::new(TrustAnchors::List(&trust))
            .with_options(options)
            .verify_at(&chain, None, now()).unwrap();

        let options = VerifyOptions {
            required_key_usage: Some(KeyUsages::KEY_CERT_SIGN),
            ..Default::default()
        };
        assert_eq!(
            defects(
                Verifier::new(TrustAnchors::List(&trust))
                    .with_options(options)
                    .verify_at(&chain, None, now())
            ),
            VerifyFlags::KEY_USAGE
        );
    }

    #[test]
    fn required_key_purpose() {
        let trust = roots();
        let chain = list(&[
            include_bytes!("../test-data/ee.crt").as_ref(),
            include_bytes!("../test-data/ca1.crt").as_ref(),
        ]);

        let options = VerifyOptions {
            required_key_purpose: Some(&oid::KP_SERVER_AUTH),
            ..Default::default()
        };
        Verifier::new(TrustAnchors::List(&trust))
            .with_options(options)
            .verify_at(&chain, None, now()).unwrap();

        let options = VerifyOptions {
            required_key_purpose: Some(&oid::KP_CODE_SIGNING),
            ..Default::default()
        };
        assert_eq!(
            defects(
                Verifier::new(TrustAnchors::List(&trust))
                    .with_options(options)
                    .verify_at(&chain, None, now())
            ),
            VerifyFlags::EXT_KEY_USAGE
        );

        // No extended key usage extension permits everything.
        let chain = list(&[
            include_bytes!("../test-data/srv.crt").as_ref()
        ]);
        Verifier::new(TrustAnchors::List(&trust))
            .with_options(options)
            .verify_at(&chain, None, now()).unwrap();
    }

    #[test]
    fn verdict_callback() {
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/expired.crt").as_ref()
        ]);

        // Clearing the only defect turns the verdict around.
        let mut clear = |_: &Cert, _: usize, flags: &mut VerifyFlags| {
            flags.remove(VerifyFlags::EXPIRED);
            Ok(())
        };
        verifier.verify_with_callback_at(
            &chain, None, now(), &mut clear
        ).unwrap();

        // Adding a defect fails an otherwise good chain.
        let good = list(&[
            include_bytes!("../test-data/srv.crt").as_ref()
        ]);
        let mut add = |_: &Cert, depth: usize, f: &mut VerifyFlags| {
            if depth == 0 {
                *f |= VerifyFlags::OTHER;
            }
            Ok(())
        };
        let flags = defects(verifier.verify_with_callback_at(
            &good, None, now(), &mut add
        ));
        assert_eq!(flags, VerifyFlags::OTHER);

        // A failing callback is fatal.
        let mut fail = |_: &Cert, _: usize, _: &mut VerifyFlags| {
            Err(VerifyFatal::callback())
        };
        assert!(matches!(
            verifier.verify_with_callback_at(
                &good, None, now(), &mut fail
            ),
            Err(VerifyError::Fatal(_))
        ));
    }

    #[test]
    fn lookup_callback() {
        let anchors = roots();
        let lookup = |_child: &Cert| Ok(anchors.clone());
        let verifier = Verifier::new(TrustAnchors::Lookup(&lookup));
        let chain = list(&[
            include_bytes!("../test-data/srv.crt").as_ref()
        ]);
        let res = verifier.verify_at(&chain, None, now()).unwrap();
        assert_eq!(res.len(), 2);
    }

    #[test]
    fn lookup_callback_disables_crls() {
        let anchors = roots();
        let lookup = |_child: &Cert| Ok(anchors.clone());
        let crls = vec![Crl::decode(
            include_bytes!("../test-data/root.crl").as_ref()
        ).unwrap()];
        let verifier = Verifier::new(TrustAnchors::Lookup(&lookup))
            .with_crls(&crls);
        let chain = list(&[
            include_bytes!("../test-data/revoked.crt").as_ref()
        ]);
        verifier.verify_at(&chain, None, crl_now()).unwrap();
    }

    #[test]
    fn restartable_matches_direct() {
        let trust = roots();
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/ee.crt").as_ref(),
            include_bytes!("../test-data/ca1.crt").as_ref(),
        ]);

        let direct = verifier.verify_at(
            &chain, Some("www.example.com"), now()
        ).unwrap();

        let mut ctx = RestartContext::new(1);
        let mut rounds = 0;
        let stepped = loop {
            rounds += 1;
            match verifier.verify_restartable_at(
                &chain, Some("www.example.com"), now(), &mut ctx
            ) {
                Err(VerifyError::InProgress) => {
                    assert!(ctx.in_progress());
                    continue
                }
                other => break other.unwrap(),
            }
        };
        assert!(rounds >= 2);
        assert!(!ctx.in_progress());
        assert_eq!(stepped.len(), direct.len());
        assert_eq!(stepped.flags(), direct.flags());
    }

    #[test]
    fn restartable_collects_same_defects() {
        let trust = list(&[
            include_bytes!("../test-data/root-expired.crt").as_ref()
        ]);
        let verifier = Verifier::new(TrustAnchors::List(&trust));
        let chain = list(&[
            include_bytes!("../test-data/srv.crt").as_ref()
        ]);

        let mut ctx = RestartContext::new(1);
        let flags = loop {
            match verifier.verify_restartable_at(
                &chain, None, now(), &mut ctx
            ) {
                Err(VerifyError::InProgress) => continue,
                other => break defects(other),
            }
        };
        assert_eq!(flags, VerifyFlags::EXPIRED);
    }

    #[test]
    fn pss_signature() {
        let pss = cert(include_bytes!("../test-data/pss-root.crt").as_ref());
        let frame = pss.frame().unwrap();
        let alg = frame.signature().algorithm();
        assert_eq!(alg.public_key(), PublicKeyAlgorithm::RsaSsaPss);
        assert_eq!(alg.pss().unwrap().salt_len, 32);
        assert_eq!(alg.digest(), DigestAlgorithm::Sha256);
        pss.public_key().unwrap().verify(
            frame.tbs().as_slice(), frame.signature()
        ).unwrap();
    }

    #[test]
    fn dns_matching() {
        assert!(dns_name_matches(b"example.com", b"example.com"));
        assert!(dns_name_matches(b"example.com", b"EXAMPLE.COM"));
        assert!(dns_name_matches(b"example.com", b"example.com."));
        assert!(!dns_name_matches(b"example.com", b"xexample.com"));
        assert!(dns_name_matches(b"*.example.com", b"foo.example.com"));
        assert!(!dns_name_matches(b"*.example.com", b"example.com"));
        assert!(!dns_name_matches(b"*.example.com", b"a.b.example.com"));
        assert!(!dns_name_matches(b"*.example.com", b".example.com"));
        assert!(!dns_name_matches(b"*.example.com", b"fooexample.com"));
        assert!(!dns_name_matches(b"*.", b"foo."));
    }

    #[test]
    fn flags_display() {
        assert_eq!(
            format!("{}", VerifyFlags::default()),
            "ok"
        );
        assert_eq!(
            format!(
                "{}", VerifyFlags::EXPIRED | VerifyFlags::NOT_TRUSTED
            ),
            "expired not-trusted"
        );
    }
}
