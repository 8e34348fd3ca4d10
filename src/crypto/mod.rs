//! Algorithm identifiers, public keys, and signature verification.

pub mod digest;
pub mod keys;
pub mod signature;

pub use self::digest::DigestAlgorithm;
pub use self::keys::{
    Curve, PublicKey, PublicKeyFormat, SignatureVerificationError
};
pub use self::signature::{
    PublicKeyAlgorithm, RsaPssParams, Signature, SignatureAlgorithm
};
