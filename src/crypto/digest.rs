//! Digest algorithm identifiers.

use bcder::decode;
use bcder::decode::DecodeError;
use bcder::Oid;
use bytes::Bytes;
use crate::oid;


//------------ DigestAlgorithm -----------------------------------------------

/// The digest algorithms that can appear in signature algorithms.
///
/// This type only identifies an algorithm. Message digests themselves are
/// computed by the signature verification backend which receives the full
/// signed data.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Returns the algorithm for a digest algorithm identifier.
    pub fn from_oid(alg: &Oid<Bytes>) -> Option<Self> {
        if *alg == oid::SHA1 {
            Some(DigestAlgorithm::Sha1)
        }
        else if *alg == oid::SHA224 {
            Some(DigestAlgorithm::Sha224)
        }
        else if *alg == oid::SHA256 {
            Some(DigestAlgorithm::Sha256)
        }
        else if *alg == oid::SHA384 {
            Some(DigestAlgorithm::Sha384)
        }
        else if *alg == oid::SHA512 {
            Some(DigestAlgorithm::Sha512)
        }
        else {
            None
        }
    }

    /// Takes a digest `AlgorithmIdentifier` from a constructed value.
    ///
    /// Accepts the parameters field to be NULL or absent.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let alg = Oid::take_from(cons)?;
            cons.take_opt_null()?;
            Self::from_oid(&alg).ok_or_else(|| {
                cons.content_err("unsupported digest algorithm")
            })
        })
    }

    /// Returns the length of a digest produced by this algorithm.
    pub fn digest_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha224 => 28,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    /// Returns the bit of this algorithm in an allowed-algorithms set.
    pub const fn flag(self) -> u32 {
        1 << self as u32
    }
}
