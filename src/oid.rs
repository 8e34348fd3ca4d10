//! The object identifiers used in this crate.
//!
//! Everything the parsers and the verifier need to recognize is gathered
//! here: signature and digest algorithms, public key algorithms and named
//! curves, the name attributes consulted for host name checks, the
//! certificate extensions the frame parser interprets, and the key purpose
//! identifiers of the extended key usage extension. The constants are
//! public so callers can pass them to interfaces taking an OID, such as
//! the required key purpose of the verification options.

use bcder::{ConstOid, Oid};


//------------ Public key algorithms -----------------------------------------

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `rsaEncryption`
///
/// Identifies an RSA public key with no limitation to either RSASSA-PSS or
/// RSAES-OAEP.
pub const RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 1]);

/// [RFC 5480](https://tools.ietf.org/html/rfc5480) `id-ecPublicKey`
///
/// Identifies an elliptic curve public key; the curve is named by the
/// algorithm parameters.
pub const EC_PUBLIC_KEY: ConstOid
    = Oid(&[42, 134, 72, 206, 61, 2, 1]);

/// [RFC 8410](https://tools.ietf.org/html/rfc8410) `id-Ed25519`
pub const ED25519: ConstOid = Oid(&[43, 101, 112]);


//------------ Named curves --------------------------------------------------

/// [RFC 5480](https://tools.ietf.org/html/rfc5480) `secp256r1`
pub const SECP256R1: ConstOid = Oid(&[42, 134, 72, 206, 61, 3, 1, 7]);

/// [RFC 5480](https://tools.ietf.org/html/rfc5480) `secp384r1`
pub const SECP384R1: ConstOid = Oid(&[43, 129, 4, 0, 34]);

/// [RFC 5480](https://tools.ietf.org/html/rfc5480) `secp521r1`
pub const SECP521R1: ConstOid = Oid(&[43, 129, 4, 0, 35]);


//------------ Signature algorithms ------------------------------------------

/// [RFC 3279](https://tools.ietf.org/html/rfc3279) `md5WithRSAEncryption`
pub const MD5_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 4]);

/// [RFC 3279](https://tools.ietf.org/html/rfc3279) `sha1WithRSAEncryption`
pub const SHA1_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 5]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `sha224WithRSAEncryption`
pub const SHA224_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 14]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `sha256WithRSAEncryption`
pub const SHA256_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 11]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `sha384WithRSAEncryption`
pub const SHA384_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 12]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `sha512WithRSAEncryption`
pub const SHA512_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 13]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-RSASSA-PSS`
pub const RSASSA_PSS: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 10]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-mgf1`
pub const MGF1: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 8]);

/// [RFC 5758](https://tools.ietf.org/html/rfc5758) `ecdsa-with-SHA1`
pub const ECDSA_WITH_SHA1: ConstOid = Oid(&[42, 134, 72, 206, 61, 4, 1]);

/// [RFC 5758](https://tools.ietf.org/html/rfc5758) `ecdsa-with-SHA224`
pub const ECDSA_WITH_SHA224: ConstOid
    = Oid(&[42, 134, 72, 206, 61, 4, 3, 1]);

/// [RFC 5758](https://tools.ietf.org/html/rfc5758) `ecdsa-with-SHA256`
pub const ECDSA_WITH_SHA256: ConstOid
    = Oid(&[42, 134, 72, 206, 61, 4, 3, 2]);

/// [RFC 5758](https://tools.ietf.org/html/rfc5758) `ecdsa-with-SHA384`
pub const ECDSA_WITH_SHA384: ConstOid
    = Oid(&[42, 134, 72, 206, 61, 4, 3, 3]);

/// [RFC 5758](https://tools.ietf.org/html/rfc5758) `ecdsa-with-SHA512`
pub const ECDSA_WITH_SHA512: ConstOid
    = Oid(&[42, 134, 72, 206, 61, 4, 3, 4]);


//------------ Digest algorithms ---------------------------------------------

/// [RFC 3370](https://tools.ietf.org/html/rfc3370) `sha-1`
pub const SHA1: ConstOid = Oid(&[43, 14, 3, 2, 26]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-sha224`
pub const SHA224: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 4]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-sha256`
pub const SHA256: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 1]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-sha384`
pub const SHA384: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 2]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-sha512`
pub const SHA512: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 3]);


//------------ Name attributes -----------------------------------------------

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `id-at-commonName`
pub const AT_COMMON_NAME: ConstOid = Oid(&[85, 4, 3]);


//------------ Certificate extensions ----------------------------------------

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `id-ce-keyUsage`
pub const CE_KEY_USAGE: ConstOid = Oid(&[85, 29, 15]);

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `id-ce-subjectAltName`
pub const CE_SUBJECT_ALT_NAME: ConstOid = Oid(&[85, 29, 17]);

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `id-ce-basicConstraints`
pub const CE_BASIC_CONSTRAINTS: ConstOid = Oid(&[85, 29, 19]);

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `id-ce-certificatePolicies`
pub const CE_CERTIFICATE_POLICIES: ConstOid = Oid(&[85, 29, 32]);

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `id-ce-extKeyUsage`
pub const CE_EXTENDED_KEY_USAGE: ConstOid = Oid(&[85, 29, 37]);

/// The Netscape certificate type extension.
///
/// A pre-standard extension still emitted by some issuers. Its value is a
/// bit string describing what the certified key may be used for.
pub const NETSCAPE_CERT_TYPE: ConstOid
    = Oid(&[96, 134, 72, 1, 134, 248, 66, 1, 1]);


//------------ Extended key usage purposes -----------------------------------

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `anyExtendedKeyUsage`
pub const ANY_EXTENDED_KEY_USAGE: ConstOid = Oid(&[85, 29, 37, 0]);

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `id-kp-serverAuth`
pub const KP_SERVER_AUTH: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 1]);

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `id-kp-clientAuth`
pub const KP_CLIENT_AUTH: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 2]);

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `id-kp-codeSigning`
pub const KP_CODE_SIGNING: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 3]);

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `id-kp-emailProtection`
pub const KP_EMAIL_PROTECTION: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 4]);

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `id-kp-timeStamping`
pub const KP_TIME_STAMPING: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 8]);

/// [RFC 5280](https://tools.ietf.org/html/rfc5280) `id-kp-OCSPSigning`
pub const KP_OCSP_SIGNING: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 9]);
