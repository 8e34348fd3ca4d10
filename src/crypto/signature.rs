//! Signature algorithms and signatures.

use bcder::decode;
use bcder::decode::DecodeError;
use bcder::{Oid, Tag};
use bytes::Bytes;
use crate::oid;
use super::digest::DigestAlgorithm;


//------------ PublicKeyAlgorithm --------------------------------------------

/// The public key algorithm of a signature algorithm.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PublicKeyAlgorithm {
    /// RSA with PKCS #1 v1.5 padding.
    Rsa,

    /// RSA with PSS padding.
    RsaSsaPss,

    /// ECDSA over a named curve.
    Ecdsa,

    /// The EdDSA signature scheme with edwards25519.
    Ed25519,
}

impl PublicKeyAlgorithm {
    /// Returns the bit of this algorithm in an allowed-algorithms set.
    pub const fn flag(self) -> u32 {
        1 << self as u32
    }
}


//------------ SignatureAlgorithm --------------------------------------------

/// A signature algorithm as used in certificates and CRLs.
///
/// A value of this type classifies the `AlgorithmIdentifier` of a signed
/// object into the digest used over the signed data, the public key
/// algorithm, and, for RSASSA-PSS, the algorithm parameters.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SignatureAlgorithm {
    digest: DigestAlgorithm,
    public_key: PublicKeyAlgorithm,
    pss: Option<RsaPssParams>,
}

impl SignatureAlgorithm {
    /// Returns the digest algorithm used over the signed data.
    pub fn digest(&self) -> DigestAlgorithm {
        self.digest
    }

    /// Returns the public key algorithm.
    pub fn public_key(&self) -> PublicKeyAlgorithm {
        self.public_key
    }

    /// Returns the RSASSA-PSS parameters if this is such an algorithm.
    pub fn pss(&self) -> Option<&RsaPssParams> {
        self.pss.as_ref()
    }

    /// Takes a signature `AlgorithmIdentifier` from a constructed value.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(Self::from_constructed)
    }

    /// Parses the algorithm identifier from the contents of its sequence.
    fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let alg = Oid::take_from(cons)?;
        let (digest, public_key) = if alg == oid::MD5_WITH_RSA_ENCRYPTION {
            (DigestAlgorithm::Md5, PublicKeyAlgorithm::Rsa)
        }
        else if alg == oid::SHA1_WITH_RSA_ENCRYPTION {
            (DigestAlgorithm::Sha1, PublicKeyAlgorithm::Rsa)
        }
        else if alg == oid::SHA224_WITH_RSA_ENCRYPTION {
            (DigestAlgorithm::Sha224, PublicKeyAlgorithm::Rsa)
        }
        else if alg == oid::SHA256_WITH_RSA_ENCRYPTION {
            (DigestAlgorithm::Sha256, PublicKeyAlgorithm::Rsa)
        }
        else if alg == oid::SHA384_WITH_RSA_ENCRYPTION {
            (DigestAlgorithm::Sha384, PublicKeyAlgorithm::Rsa)
        }
        else if alg == oid::SHA512_WITH_RSA_ENCRYPTION {
            (DigestAlgorithm::Sha512, PublicKeyAlgorithm::Rsa)
        }
        else if alg == oid::ECDSA_WITH_SHA1 {
            (DigestAlgorithm::Sha1, PublicKeyAlgorithm::Ecdsa)
        }
        else if alg == oid::ECDSA_WITH_SHA224 {
            (DigestAlgorithm::Sha224, PublicKeyAlgorithm::Ecdsa)
        }
        else if alg == oid::ECDSA_WITH_SHA256 {
            (DigestAlgorithm::Sha256, PublicKeyAlgorithm::Ecdsa)
        }
        else if alg == oid::ECDSA_WITH_SHA384 {
            (DigestAlgorithm::Sha384, PublicKeyAlgorithm::Ecdsa)
        }
        else if alg == oid::ECDSA_WITH_SHA512 {
            (DigestAlgorithm::Sha512, PublicKeyAlgorithm::Ecdsa)
        }
        else if alg == oid::ED25519 {
            // RFC 8410: parameters must be absent.
            return Ok(SignatureAlgorithm {
                digest: DigestAlgorithm::Sha512,
                public_key: PublicKeyAlgorithm::Ed25519,
                pss: None,
            })
        }
        else if alg == oid::RSASSA_PSS {
            let params = RsaPssParams::take_opt_from(cons)?
                .unwrap_or_default();
            return Ok(SignatureAlgorithm {
                digest: params.digest,
                public_key: PublicKeyAlgorithm::RsaSsaPss,
                pss: Some(params),
            })
        }
        else {
            return Err(cons.content_err("unsupported signature algorithm"))
        };

        // The parameters field of the remaining algorithms must be NULL
        // for the RSA family and absent for ECDSA. We generously accept
        // both encodings everywhere.
        cons.take_opt_null()?;
        Ok(SignatureAlgorithm { digest, public_key, pss: None })
    }
}


//------------ RsaPssParams --------------------------------------------------

/// The algorithm parameters of an RSASSA-PSS signature.
///
/// ```text
/// RSASSA-PSS-params ::= SEQUENCE {
///     hashAlgorithm      [0] HashAlgorithm      DEFAULT sha1,
///     maskGenAlgorithm   [1] MaskGenAlgorithm   DEFAULT mgf1SHA1,
///     saltLength         [2] INTEGER            DEFAULT 20,
///     trailerField       [3] TrailerField       DEFAULT trailerFieldBC }
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RsaPssParams {
    /// The digest over the signed data.
    pub digest: DigestAlgorithm,

    /// The digest used by the MGF1 mask generation function.
    pub mgf1_digest: DigestAlgorithm,

    /// The length of the salt in octets.
    pub salt_len: u64,
}

impl Default for RsaPssParams {
    fn default() -> Self {
        RsaPssParams {
            digest: DigestAlgorithm::Sha1,
            mgf1_digest: DigestAlgorithm::Sha1,
            salt_len: 20,
        }
    }
}

impl RsaPssParams {
    fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| {
            let mut res = RsaPssParams::default();
            if let Some(digest) = cons.take_opt_constructed_if(
                Tag::CTX_0, DigestAlgorithm::take_from
            )? {
                res.digest = digest;
            }
            if let Some(digest) = cons.take_opt_constructed_if(
                Tag::CTX_1, Self::take_mask_gen
            )? {
                res.mgf1_digest = digest;
            }
            if let Some(salt_len) = cons.take_opt_constructed_if(
                Tag::CTX_2, |cons| {
                    cons.take_opt_u64()?.ok_or_else(|| {
                        cons.content_err("invalid saltLength")
                    })
                }
            )? {
                res.salt_len = salt_len;
            }
            if let Some(trailer) = cons.take_opt_constructed_if(
                Tag::CTX_3, |cons| {
                    cons.take_opt_u64()?.ok_or_else(|| {
                        cons.content_err("invalid trailerField")
                    })
                }
            )? {
                if trailer != 1 {
                    return Err(cons.content_err(
                        "unsupported RSASSA-PSS trailer field"
                    ))
                }
            }
            Ok(res)
        })
    }

    /// Parses a MGF1 mask generation algorithm identifier.
    fn take_mask_gen<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<DigestAlgorithm, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let alg = Oid::take_from(cons)?;
            if alg != oid::MGF1 {
                return Err(cons.content_err(
                    "unsupported mask generation function"
                ))
            }
            DigestAlgorithm::take_from(cons)
        })
    }
}


//------------ Signature -----------------------------------------------------

/// A signature together with its algorithm.
#[derive(Clone, Debug)]
pub struct Signature {
    algorithm: SignatureAlgorithm,
    value: Bytes,
}

impl Signature {
    pub fn new(algorithm: SignatureAlgorithm, value: Bytes) -> Self {
        Signature { algorithm, value }
    }

    pub fn algorithm(&self) -> &SignatureAlgorithm {
        &self.algorithm
    }

    pub fn value(&self) -> &Bytes {
        &self.value
    }
}


//============ Tests =========================================================
