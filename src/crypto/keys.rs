//! Public keys and signature verification.

use std::{error, fmt};
use bcder::{decode, BitString, Oid, Unsigned};
use bcder::decode::DecodeError;
use bytes::Bytes;
use ring::signature;
use ring::signature::VerificationAlgorithm;
use untrusted::Input;
use crate::oid;
use super::digest::DigestAlgorithm;
use super::signature::{PublicKeyAlgorithm, Signature};


//------------ Curve ---------------------------------------------------------

/// The named elliptic curves supported for certificate keys.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Curve {
    P256,
    P384,
    P521,
}

impl Curve {
    /// Returns the curve for a curve object identifier.
    pub fn from_oid(alg: &Oid<Bytes>) -> Option<Self> {
        if *alg == oid::SECP256R1 {
            Some(Curve::P256)
        }
        else if *alg == oid::SECP384R1 {
            Some(Curve::P384)
        }
        else if *alg == oid::SECP521R1 {
            Some(Curve::P521)
        }
        else {
            None
        }
    }

    /// Returns the size of the underlying field in bits.
    pub fn bits(self) -> usize {
        match self {
            Curve::P256 => 256,
            Curve::P384 => 384,
            Curve::P521 => 521,
        }
    }

    /// Returns the bit of this curve in an allowed-curves set.
    pub const fn flag(self) -> u32 {
        1 << self as u32
    }
}


//------------ PublicKeyFormat -----------------------------------------------

/// The format of a subject public key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PublicKeyFormat {
    /// An RSA public key.
    Rsa,

    /// An ECDSA public key for a named curve.
    Ecdsa(Curve),

    /// An Ed25519 public key.
    Ed25519,
}

impl PublicKeyFormat {
    /// Parses the algorithm identifier of a `SubjectPublicKeyInfo`.
    ///
    /// ```text
    /// AlgorithmIdentifier ::= SEQUENCE {
    ///      algorithm          OBJECT IDENTIFIER,
    ///      parameters         ANY DEFINED BY algorithm OPTIONAL }
    /// ```
    ///
    /// For RSA keys, the parameters must be present and NULL; we
    /// generously also allow them to be absent. For ECDSA keys, the
    /// parameters are the object identifier of a named curve. For
    /// Ed25519 keys they must be absent.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(Self::from_constructed)
    }

    fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let alg = Oid::take_from(cons)?;
        if alg == oid::RSA_ENCRYPTION {
            cons.take_opt_null()?;
            Ok(PublicKeyFormat::Rsa)
        }
        else if alg == oid::EC_PUBLIC_KEY {
            let curve = Oid::take_from(cons)?;
            match Curve::from_oid(&curve) {
                Some(curve) => Ok(PublicKeyFormat::Ecdsa(curve)),
                None => Err(cons.content_err("unsupported curve")),
            }
        }
        else if alg == oid::ED25519 {
            Ok(PublicKeyFormat::Ed25519)
        }
        else {
            Err(cons.content_err("unsupported public key algorithm"))
        }
    }

    /// Returns the matching public key algorithm of signature algorithms.
    pub fn algorithm(self) -> PublicKeyAlgorithm {
        match self {
            PublicKeyFormat::Rsa => PublicKeyAlgorithm::Rsa,
            PublicKeyFormat::Ecdsa(_) => PublicKeyAlgorithm::Ecdsa,
            PublicKeyFormat::Ed25519 => PublicKeyAlgorithm::Ed25519,
        }
    }
}


//------------ PublicKey -----------------------------------------------------

/// A public key extracted from a `SubjectPublicKeyInfo`.
#[derive(Clone, Debug)]
pub struct PublicKey {
    algorithm: PublicKeyFormat,
    bits: Bytes,
    bit_len: usize,
}

impl PublicKey {
    /// Returns the format of this public key.
    pub fn algorithm(&self) -> PublicKeyFormat {
        self.algorithm
    }

    /// Returns the raw bits of this public key.
    ///
    /// For RSA keys this is the DER-encoded `RSAPublicKey` structure, for
    /// ECDSA keys the uncompressed curve point, and for Ed25519 keys the
    /// raw 32 octets.
    pub fn bits(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns the size of the key.
    ///
    /// For RSA keys this is the size of the modulus, for ECDSA keys the
    /// size of the underlying field, both in bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Returns the curve of an ECDSA key.
    pub fn curve(&self) -> Option<Curve> {
        match self.algorithm {
            PublicKeyFormat::Ecdsa(curve) => Some(curve),
            _ => None,
        }
    }
}


/// # As `SubjectPublicKeyInfo`
///
impl PublicKey {
    pub fn decode<S: decode::IntoSource>(
        source: S
    ) -> Result<Self, DecodeError<<S::Source as decode::Source>::Error>> {
        bcder::Mode::Der.decode(source, Self::take_from)
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let algorithm = PublicKeyFormat::take_from(cons)?;
            let bits = BitString::take_from(cons)?;
            if bits.unused() != 0 {
                return Err(cons.content_err(
                    "invalid subject public key"
                ))
            }
            let bits = bits.octet_bytes();
            let bit_len = match algorithm {
                PublicKeyFormat::Rsa => {
                    rsa_modulus_bits(&bits).map_err(|_| {
                        cons.content_err("invalid RSA public key")
                    })?
                }
                PublicKeyFormat::Ecdsa(curve) => curve.bits(),
                PublicKeyFormat::Ed25519 => {
                    if bits.len() != 32 {
                        return Err(cons.content_err(
                            "invalid Ed25519 public key"
                        ))
                    }
                    256
                }
            };
            Ok(PublicKey { algorithm, bits, bit_len })
        })
    }
}


/// # Signature Verification
///
impl PublicKey {
    /// Verifies a signature over a message using this public key.
    ///
    /// Fails if the signature is invalid, if the key does not fit the
    /// signature algorithm, or if the verification backend does not
    /// implement the combination of algorithms.
    pub fn verify(
        &self, message: &[u8], signature: &Signature,
    ) -> Result<(), SignatureVerificationError> {
        let alg = signature.algorithm();
        let verifier: &dyn VerificationAlgorithm = match (
            alg.public_key(), self.algorithm
        ) {
            (PublicKeyAlgorithm::Rsa, PublicKeyFormat::Rsa) => {
                match alg.digest() {
                    DigestAlgorithm::Sha1 => {
                        &signature::RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY
                    }
                    DigestAlgorithm::Sha256 => {
                        &signature::RSA_PKCS1_2048_8192_SHA256
                    }
                    DigestAlgorithm::Sha384 => {
                        &signature::RSA_PKCS1_2048_8192_SHA384
                    }
                    DigestAlgorithm::Sha512 => {
                        &signature::RSA_PKCS1_2048_8192_SHA512
                    }
                    _ => return Err(SignatureVerificationError),
                }
            }
            (PublicKeyAlgorithm::RsaSsaPss, PublicKeyFormat::Rsa) => {
                // The backend fixes the salt length to the digest length
                // and MGF1 to the signing digest.
                let params = match alg.pss() {
                    Some(params) => params,
                    None => return Err(SignatureVerificationError),
                };
                if params.mgf1_digest != params.digest
                    || params.salt_len as usize
                        != params.digest.digest_len()
                {
                    return Err(SignatureVerificationError)
                }
                match params.digest {
                    DigestAlgorithm::Sha256 => {
                        &signature::RSA_PSS_2048_8192_SHA256
                    }
                    DigestAlgorithm::Sha384 => {
                        &signature::RSA_PSS_2048_8192_SHA384
                    }
                    DigestAlgorithm::Sha512 => {
                        &signature::RSA_PSS_2048_8192_SHA512
                    }
                    _ => return Err(SignatureVerificationError),
                }
            }
            (
                PublicKeyAlgorithm::Ecdsa,
                PublicKeyFormat::Ecdsa(curve)
            ) => {
                match (curve, alg.digest()) {
                    (Curve::P256, DigestAlgorithm::Sha256) => {
                        &signature::ECDSA_P256_SHA256_ASN1
                    }
                    (Curve::P256, DigestAlgorithm::Sha384) => {
                        &signature::ECDSA_P256_SHA384_ASN1
                    }
                    (Curve::P384, DigestAlgorithm::Sha256) => {
                        &signature::ECDSA_P384_SHA256_ASN1
                    }
                    (Curve::P384, DigestAlgorithm::Sha384) => {
                        &signature::ECDSA_P384_SHA384_ASN1
                    }
                    _ => return Err(SignatureVerificationError),
                }
            }
            (PublicKeyAlgorithm::Ed25519, PublicKeyFormat::Ed25519) => {
                &signature::ED25519
            }
            _ => return Err(SignatureVerificationError),
        };
        verifier.verify(
            Input::from(self.bits()),
            Input::from(message),
            Input::from(signature.value().as_ref()),
        ).map_err(Into::into)
    }
}


/// Returns the modulus size of a DER-encoded `RSAPublicKey`.
///
/// ```text
/// RSAPublicKey ::= SEQUENCE {
///     modulus            INTEGER,    -- n
///     publicExponent     INTEGER  }  -- e
/// ```
fn rsa_modulus_bits(
    bits: &Bytes
) -> Result<usize, DecodeError<std::convert::Infallible>> {
    bcder::Mode::Der.decode(bits.clone(), |cons| {
        cons.take_sequence(|cons| {
            let modulus = Unsigned::take_from(cons)?;
            let _exponent = Unsigned::take_from(cons)?;
            let slice: &[u8] = modulus.as_ref();
            let slice = match slice.iter().position(|&val| val != 0) {
                Some(pos) => &slice[pos..],
                None => return Ok(0),
            };
            Ok(
                slice.len() * 8
                    - slice[0].leading_zeros() as usize
            )
        })
    })
}


//------------ SignatureVerificationError ------------------------------------

/// An error happened while verifying a signature.
///
/// No further information is provided. This is on purpose.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SignatureVerificationError;

impl From<ring::error::Unspecified> for SignatureVerificationError {
    fn from(_: ring::error::Unspecified) -> Self {
        SignatureVerificationError
    }
}

impl fmt::Display for SignatureVerificationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("signature verification failed")
    }
}

impl error::Error for SignatureVerificationError { }


//============ Tests =========================================================
