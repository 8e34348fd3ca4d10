//! Parsing and trust-path verification of X.509 certificates.
//!
//! This crate implements the certificate side of a public key
//! infrastructure as defined in [RFC 5280]: decoding DER-encoded version
//! 1 to 3 certificates into a _frame_ of references into the raw data,
//! interpreting the version 3 extensions relevant for path building, and
//! answering whether an end-entity certificate presented by a peer is
//! endorsed by one of a set of locally trusted root certificates.
//!
//! Parsing lives in the [`cert`] module, certificate revocation lists in
//! [`crl`], and chain building and verification in [`verify`]. The
//! [`x509`] module collects types shared between certificates and CRLs
//! such as names, times and serial numbers, while [`crypto`] wraps the
//! algorithm identifiers and public keys together with the signature
//! verification backend.
//!
//! Verification reports its findings as a set of defect flags rather than
//! failing on the first problem, so a caller can distinguish an expired
//! certificate from an untrusted one, or accept specific defects via a
//! callback. See [`verify::Verifier`] for the entry points.
//!
//! [RFC 5280]: https://tools.ietf.org/html/rfc5280

pub mod cert;
pub mod crl;
pub mod crypto;
pub mod oid;
pub mod verify;
pub mod x509;
