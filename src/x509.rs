//! Types shared between certificates and revocation lists.
//!
//! Names, times, validity periods, serial numbers, and the signed-data
//! envelope appear in both object kinds, so they live here.

use std::{error, fmt, str};
use std::str::FromStr;
use bcder::{decode, Captured, OctetString, Oid, Tag, Unsigned};
use bcder::decode::{ContentError, DecodeError, Source};
use bytes::Bytes;
use chrono::{DateTime, LocalResult, TimeZone, Utc};


//------------ Functions -----------------------------------------------------

/// Walks over the elements of a `SEQUENCE OF` value.
///
/// Calls `op` for every element with its tag and content until the
/// constructed value is exhausted. The closure decides whether the tag is
/// acceptable and must consume the content. Returns the number of elements
/// visited.
pub fn walk_sequence_of<S: decode::Source, F>(
    cons: &mut decode::Constructed<S>,
    mut op: F,
) -> Result<usize, DecodeError<S::Error>>
where
    F: FnMut(
        Tag, &mut decode::Content<S>
    ) -> Result<(), DecodeError<S::Error>>,
{
    let mut count = 0;
    while cons.take_opt_value(|tag, content| op(tag, content))?.is_some() {
        count += 1;
    }
    Ok(count)
}


//------------ Name ----------------------------------------------------------

/// A distinguished name.
///
/// A value of this type keeps the raw bytes of an encoded `RDNSequence`
/// whose structure has been checked during parsing. The relative
/// distinguished names and their attributes are walked lazily via
/// [`rdns`][Self::rdns] and [`attributes`][Self::attributes].
#[derive(Clone, Debug)]
pub struct Name(Captured);

impl Name {
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.capture(|cons| {
            cons.take_sequence(|cons| { // RDNSequence
                while let Some(()) = cons.take_opt_set(|cons| {
                    let mut empty_set = true;
                    while let Some(()) = cons.take_opt_sequence(|cons| {
                        empty_set = false;
                        Oid::skip_in(cons)?;
                        if cons.skip_one()?.is_none() {
                            return Err(cons.content_err(
                                "invalid name attribute"
                            ))
                        }
                        Ok(())
                    })? { }
                    if empty_set {
                        return Err(cons.content_err(
                            "empty relative distinguished name"
                        ));
                    }
                    Ok(())
                })? { }
                Ok(())
            })
        }).map(Name)
    }

    /// Returns the encoded bytes of the name.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Returns an iterator over the relative distinguished names.
    pub fn rdns(&self) -> RdnIter {
        let content = self.0.clone().decode(|cons| {
            cons.take_sequence(|cons| cons.capture_all())
        }).unwrap();
        RdnIter(content)
    }

    /// Returns an iterator over all attributes in order.
    ///
    /// The iterator flattens the grouping into relative distinguished
    /// names. Use [`rdns`][Self::rdns] if the grouping matters.
    pub fn attributes(&self) -> NameAttributes {
        NameAttributes {
            rdns: self.rdns(),
            current: None,
        }
    }

    /// Returns whether two names match.
    ///
    /// The names match if they consist of the same sequence of relative
    /// distinguished names, each holding the same number of attributes,
    /// with attribute types equal and attribute values comparing equal
    /// under the comparison rules of their string type: case-insensitive
    /// with runs of whitespace folded for the character string types and
    /// byte-for-byte otherwise.
    pub fn matches(&self, other: &Name) -> bool {
        let mut left = self.rdns();
        let mut right = other.rdns();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(l), Some(r)) => {
                    if !l.matches(&r) {
                        return false
                    }
                }
                _ => return false,
            }
        }
    }
}


//--- PartialEq and Eq

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice() == other.0.as_slice()
    }
}

impl Eq for Name {}


//------------ RdnIter -------------------------------------------------------

/// An iterator over the relative distinguished names of a [`Name`].
#[derive(Clone, Debug)]
pub struct RdnIter(Captured);

impl Iterator for RdnIter {
    type Item = Rdn;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.decode_partial(|cons| {
            cons.take_opt_set(|cons| cons.capture_all())
        }).unwrap().map(Rdn)
    }
}


//------------ Rdn -----------------------------------------------------------

/// A single relative distinguished name.
///
/// Most RDNs hold exactly one attribute but multi-valued RDNs are legal
/// and appear in the wild.
#[derive(Clone, Debug)]
pub struct Rdn(Captured);

impl Rdn {
    /// Returns an iterator over the attributes of this RDN.
    pub fn attributes(&self) -> AttributeIter {
        AttributeIter(self.0.clone())
    }

    /// Returns whether two RDNs match attribute by attribute.
    pub fn matches(&self, other: &Rdn) -> bool {
        let mut left = self.attributes();
        let mut right = other.attributes();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(l), Some(r)) => {
                    if !l.matches(&r) {
                        return false
                    }
                }
                _ => return false,
            }
        }
    }
}


//------------ AttributeIter -------------------------------------------------

/// An iterator over the attributes of an [`Rdn`].
#[derive(Clone, Debug)]
pub struct AttributeIter(Captured);

impl Iterator for AttributeIter {
    type Item = NameAttribute;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.decode_partial(|cons| {
            cons.take_opt_sequence(|cons| {
                let oid = Oid::take_from(cons)?;
                cons.take_value(|tag, content| {
                    let value = OctetString::from_content(content)?;
                    Ok(NameAttribute {
                        oid, tag, value: value.to_bytes()
                    })
                })
            })
        }).unwrap()
    }
}


//------------ NameAttributes ------------------------------------------------

/// An iterator over all attributes of a [`Name`].
#[derive(Clone, Debug)]
pub struct NameAttributes {
    rdns: RdnIter,
    current: Option<AttributeIter>,
}

impl Iterator for NameAttributes {
    type Item = NameAttribute;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(iter) = self.current.as_mut() {
                if let Some(attr) = iter.next() {
                    return Some(attr)
                }
            }
            self.current = Some(self.rdns.next()?.attributes());
        }
    }
}


//------------ NameAttribute -------------------------------------------------

/// A single attribute of a distinguished name.
#[derive(Clone, Debug)]
pub struct NameAttribute {
    /// The attribute type.
    oid: Oid<Bytes>,

    /// The tag of the attribute value.
    tag: Tag,

    /// The raw content of the attribute value.
    value: Bytes,
}

impl NameAttribute {
    /// Returns the attribute type.
    pub fn oid(&self) -> &Oid<Bytes> {
        &self.oid
    }

    /// Returns the tag of the attribute value.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the raw content of the attribute value.
    pub fn value(&self) -> &[u8] {
        self.value.as_ref()
    }

    /// Returns whether the attribute value is a character string.
    fn is_string(&self) -> bool {
        self.tag == Tag::PRINTABLE_STRING
            || self.tag == Tag::UTF8_STRING
            || self.tag == Tag::IA5_STRING
    }

    /// Returns whether two attributes match.
    pub fn matches(&self, other: &NameAttribute) -> bool {
        if self.oid != other.oid {
            return false
        }
        if self.is_string() && other.is_string() {
            folded_eq(self.value(), other.value())
        }
        else {
            self.tag == other.tag && self.value == other.value
        }
    }
}


/// Compares two byte strings after folding.
///
/// Leading and trailing whitespace is ignored, inner runs of whitespace
/// compare equal to a single space, and ASCII letters compare without
/// case.
fn folded_eq(left: &[u8], right: &[u8]) -> bool {
    let mut left = Folded::new(left);
    let mut right = Folded::new(right);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(l), Some(r)) if l == r => { }
            _ => return false,
        }
    }
}

/// An iterator over bytes with whitespace and case folded away.
struct Folded<'a> {
    rest: &'a [u8],
}

impl<'a> Folded<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        let mut res = Folded { rest: bytes };
        res.skip_space();
        res
    }

    fn skip_space(&mut self) {
        while let Some((&first, rest)) = self.rest.split_first() {
            if !first.is_ascii_whitespace() {
                break
            }
            self.rest = rest;
        }
    }
}

impl Iterator for Folded<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let (&first, rest) = self.rest.split_first()?;
        self.rest = rest;
        if first.is_ascii_whitespace() {
            self.skip_space();
            if self.rest.is_empty() {
                None
            }
            else {
                Some(b' ')
            }
        }
        else {
            Some(first.to_ascii_lowercase())
        }
    }
}


//------------ Serial --------------------------------------------------------

/// A certificate serial number.
//
//  We keep the serial number in 20 octets left padded.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Serial([u8; 20]);

impl Serial {
    /// Creates a serial number from an octet slice.
    pub fn from_slice(s: &[u8]) -> Result<Self, SerialSliceError> {
        // Empty slice is malformed.
        if s.is_empty() {
            return Err(SerialSliceError::empty())
        }
        // We do not support more than 20 octets.
        if s.len() > 20 {
            return Err(SerialSliceError::long())
        }
        let mut res = <[u8; 20]>::default();
        res[20 - s.len()..].copy_from_slice(s);
        Ok(Self(res))
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        Unsigned::take_from(cons).and_then(|s| {
            Self::from_slice(s.as_ref()).map_err(|err| cons.content_err(err))
        })
    }
}


//--- Default

impl Default for Serial {
    fn default() -> Self {
        Serial([0; 20])
    }
}


//--- From

impl From<u64> for Serial {
    fn from(value: u64) -> Self {
        Self::from_slice(value.to_be_bytes().as_ref()).unwrap()
    }
}


//--- Display and Debug

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let start = self.0.iter().position(|&val| val != 0).unwrap_or(19);
        for (pos, val) in self.0[start..].iter().enumerate() {
            if pos > 0 {
                write!(f, ":")?;
            }
            write!(f, "{val:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Serial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Serial({self})")
    }
}


//------------ SignedData ----------------------------------------------------

/// The outer structure shared by certificates and CRLs.
///
/// Both object kinds consist of a to-be-signed part kept here as raw
/// captured bytes, the signature algorithm, and the signature itself.
#[derive(Clone, Debug)]
pub struct SignedData {
    /// The to-be-signed part as it appeared on the wire.
    data: Captured,

    /// The raw bytes of the outer signature algorithm.
    ///
    /// Kept around so it can be compared against the algorithm repeated
    /// inside the to-be-signed data.
    alg_raw: Captured,

    /// The signature.
    signature: crate::crypto::Signature,
}

impl SignedData {
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(Self::from_constructed)
    }

    pub fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let data = cons.capture_one()?;
        let alg_raw = cons.capture_one()?;
        let algorithm = alg_raw.clone().decode(
            crate::crypto::SignatureAlgorithm::take_from
        ).map_err(DecodeError::convert)?;
        let value = bcder::BitString::take_from(cons)?.octet_bytes();
        Ok(SignedData {
            data, alg_raw,
            signature: crate::crypto::Signature::new(algorithm, value),
        })
    }

    /// Returns the to-be-signed data.
    pub fn data(&self) -> &Captured {
        &self.data
    }

    /// Returns the raw bytes of the outer signature algorithm.
    pub fn alg_raw(&self) -> &Captured {
        &self.alg_raw
    }

    /// Returns the signature.
    pub fn signature(&self) -> &crate::crypto::Signature {
        &self.signature
    }

    /// Verifies the signature using the given public key.
    pub fn verify_signature(
        &self,
        public_key: &crate::crypto::PublicKey,
    ) -> Result<(), crate::crypto::SignatureVerificationError> {
        public_key.verify(self.data.as_slice(), &self.signature)
    }
}


//------------ Time ----------------------------------------------------------

/// A point in calendar time.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Time(DateTime<Utc>);

impl Time {
    pub fn new(dt: DateTime<Utc>) -> Self {
        Time(dt)
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    #[allow(deprecated)]
    pub fn utc(
        year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32
    ) -> Self {
        Time(Utc.ymd(year, month, day).and_hms(hour, min, sec))
    }

    /// Takes a time value from the beginning of a constructed value.
    ///
    /// RFC 5280 restricts the two ASN.1 time types to the formats
    /// `YYMMDDHHMMSSZ` for UTCTime and `YYYYMMDDHHMMSSZ` for
    /// GeneralizedTime. Everything else is rejected.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_primitive(|tag, prim| {
            match tag {
                Tag::UTC_TIME => {
                    let year = read_two_char(prim)? as i32;
                    let year = if year >= 50 { year + 1900 }
                               else { year + 2000 };
                    Self::read_rest(prim, year)
                }
                Tag::GENERALIZED_TIME => {
                    let year = read_four_char(prim)? as i32;
                    Self::read_rest(prim, year)
                }
                _ => {
                    Err(prim.content_err("malformed time value"))
                }
            }
        })
    }

    /// Takes an optional time value from a constructed value.
    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        let res = cons.take_opt_primitive_if(Tag::UTC_TIME, |prim| {
            let year = read_two_char(prim)? as i32;
            let year = if year >= 50 { year + 1900 }
                       else { year + 2000 };
            Self::read_rest(prim, year)
        })?;
        if let Some(res) = res {
            return Ok(Some(res))
        }
        cons.take_opt_primitive_if(Tag::GENERALIZED_TIME, |prim| {
            let year = read_four_char(prim)? as i32;
            Self::read_rest(prim, year)
        })
    }

    /// Reads everything of a time value after the year.
    fn read_rest<S: decode::Source>(
        prim: &mut decode::Primitive<S>,
        year: i32,
    ) -> Result<Self, DecodeError<S::Error>> {
        let res = (
            year,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
        );
        if prim.take_u8()? != b'Z' {
            return Err(prim.content_err("malformed time value"))
        }
        Self::from_parts(res).map_err(|err| prim.content_err(err))
    }

    #[allow(deprecated)]
    fn from_parts(
        parts: (i32, u32, u32, u32, u32, u32)
    ) -> Result<Self, ContentError> {
        Ok(Time(match Utc.ymd_opt(parts.0, parts.1, parts.2) {
            LocalResult::Single(dt) => {
                match dt.and_hms_opt(parts.3, parts.4, parts.5) {
                    Some(dt) => dt,
                    None => {
                        return Err(ContentError::from_static(
                            "malformed time value"
                        ))
                    }
                }
            }
            _ => return Err(ContentError::from_static("malformed time value"))
        }))
    }
}


//--- Deref and AsRef

impl std::ops::Deref for Time {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<DateTime<Utc>> for Time {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.0
    }
}


//--- From and FromStr

impl From<DateTime<Utc>> for Time {
    fn from(time: DateTime<Utc>) -> Self {
        Time(time)
    }
}

impl From<Time> for DateTime<Utc> {
    fn from(time: Time) -> Self {
        time.0
    }
}

impl FromStr for Time {
    type Err = chrono::format::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FromStr::from_str(s).map(Time)
    }
}


fn read_two_char<S: decode::Source>(
    source: &mut S
) -> Result<u32, DecodeError<S::Error>> {
    let mut s = [0u8; 2];
    s[0] = source.take_u8()?;
    s[1] = source.take_u8()?;
    let s = match str::from_utf8(&s[..]) {
        Ok(s) => s,
        Err(_err) => {
            return Err(source.content_err("malformed time value"))
        }
    };
    u32::from_str(s).map_err(|_err| {
        source.content_err("malformed time value")
    })
}


fn read_four_char<S: decode::Source>(
    source: &mut S
) -> Result<u32, DecodeError<S::Error>> {
    let mut s = [0u8; 4];
    s[0] = source.take_u8()?;
    s[1] = source.take_u8()?;
    s[2] = source.take_u8()?;
    s[3] = source.take_u8()?;
    let s = match str::from_utf8(&s[..]) {
        Ok(s) => s,
        Err(_err) => {
            return Err(source.content_err("malformed time value"))
        }
    };
    u32::from_str(s).map_err(|_err| {
        source.content_err("malformed time value")
    })
}


//------------ Validity ------------------------------------------------------

/// The validity period of a certificate or similar object.
#[derive(Clone, Debug, Copy, Eq, Hash, PartialEq)]
pub struct Validity {
    not_before: Time,
    not_after: Time,
}

impl Validity {
    pub fn new(not_before: Time, not_after: Time) -> Self {
        Validity { not_before, not_after }
    }

    pub fn not_before(self) -> Time {
        self.not_before
    }

    pub fn not_after(self) -> Time {
        self.not_after
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            Ok(Validity::new(
                Time::take_from(cons)?,
                Time::take_from(cons)?,
            ))
        })
    }

    /// Returns whether the period has started at the given time.
    pub fn started_at(self, now: Time) -> bool {
        self.not_before <= now
    }

    /// Returns whether the period has ended at the given time.
    pub fn ended_at(self, now: Time) -> bool {
        self.not_after < now
    }

    /// Returns whether the given time falls into the period.
    pub fn covers(self, now: Time) -> bool {
        self.started_at(now) && !self.ended_at(now)
    }
}


//------------ SerialSliceError ----------------------------------------------

/// A serial number could not be created from a slice.
#[derive(Clone, Copy, Debug)]
pub struct SerialSliceError(SerialSliceErrorKind);

#[derive(Clone, Copy, Debug)]
enum SerialSliceErrorKind {
    Empty,
    Long,
}

impl SerialSliceError {
    fn empty() -> Self {
        SerialSliceError(SerialSliceErrorKind::Empty)
    }

    fn long() -> Self {
        SerialSliceError(SerialSliceErrorKind::Long)
    }
}

impl From<SerialSliceError> for ContentError {
    fn from(err: SerialSliceError) -> Self {
        ContentError::from_static(match err.0 {
            SerialSliceErrorKind::Empty => "empty serial number",
            SerialSliceErrorKind::Long => "serial number longer than 20 bytes"
        })
    }
}

impl fmt::Display for SerialSliceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(
            match self.0 {
                SerialSliceErrorKind::Empty => "empty serial number",
                SerialSliceErrorKind::Long => {
                    "serial number longer than 20 bytes"
                }
            }
        )
    }
}

impl error::Error for SerialSliceError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use bcder::Mode;
    use bcder::decode::Constructed;

    fn name_from(der: &[u8]) -> Name {
        Mode::Der.decode(der, Name::take_from).unwrap()
    }

    /// Builds a one-attribute name with the given value tag and content.
    fn cn_name(tag: u8, value: &[u8]) -> Vec<u8> {
        let atv_len = 5 + 2 + value.len();
        let set_len = 2 + atv_len;
        let seq_len = 2 + set_len;
        let mut res = vec![0x30, seq_len as u8, 0x31, set_len as u8];
        res.extend_from_slice(&[0x30, atv_len as u8]);
        res.extend_from_slice(&[0x06, 0x03, 0x55, 0x04, 0x03]);
        res.push(tag);
        res.push(value.len() as u8);
        res.extend_from_slice(value);
        res
    }

    #[test]
    fn serial_from_slice() {
        assert_eq!(
            Serial::from_slice(b"\x01\x02\x03").unwrap(),
            Serial([0,0,0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,1,2,3])
        );
        assert_eq!(
            Serial::from(0x10203u64),
            Serial([0,0,0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,1,2,3])
        );
        assert!(Serial::from_slice(b"").is_err());
        assert!(Serial::from_slice(&[0u8; 21]).is_err());
    }

    #[test]
    fn serial_take_from() {
        assert_eq!(
            Constructed::decode(
                b"\x02\x03\x01\x02\x03".as_ref(),
                Mode::Der,
                Serial::take_from
            ).unwrap(),
            Serial::from(0x10203u64)
        );
    }

    #[test]
    fn utc_time() {
        let time = Constructed::decode(
            b"\x17\x0d250102030405Z".as_ref(), Mode::Der, Time::take_from
        ).unwrap();
        assert_eq!(time, Time::utc(2025, 1, 2, 3, 4, 5));

        // Two-digit years below 50 are 20xx, others 19xx.
        let time = Constructed::decode(
            b"\x17\x0d991231235959Z".as_ref(), Mode::Der, Time::take_from
        ).unwrap();
        assert_eq!(time, Time::utc(1999, 12, 31, 23, 59, 59));
    }

    #[test]
    fn generalized_time() {
        let time = Constructed::decode(
            b"\x18\x0f20350101000000Z".as_ref(), Mode::Der, Time::take_from
        ).unwrap();
        assert_eq!(time, Time::utc(2035, 1, 1, 0, 0, 0));
    }

    #[test]
    fn bad_time() {
        // Missing trailing Z.
        assert!(
            Constructed::decode(
                b"\x17\x0d2501020304055".as_ref(), Mode::Der, Time::take_from
            ).is_err()
        );
        // Month out of range.
        assert!(
            Constructed::decode(
                b"\x17\x0d251302030405Z".as_ref(), Mode::Der, Time::take_from
            ).is_err()
        );
    }

    #[test]
    fn validity_covers() {
        let validity = Validity::new(
            Time::utc(2024, 1, 1, 0, 0, 0),
            Time::utc(2035, 1, 1, 0, 0, 0),
        );
        assert!(validity.covers(Time::utc(2025, 1, 1, 0, 0, 0)));
        assert!(!validity.covers(Time::utc(2023, 12, 31, 23, 59, 59)));
        assert!(!validity.covers(Time::utc(2035, 1, 1, 0, 0, 1)));
        assert!(validity.covers(Time::utc(2035, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn name_matching() {
        let printable = name_from(&cn_name(0x13, b"Example Corp"));
        let utf8 = name_from(&cn_name(0x0c, b"example CORP"));
        let spaced = name_from(&cn_name(0x13, b"  Example   Corp "));
        let other = name_from(&cn_name(0x13, b"Example Corpse"));

        assert!(printable.matches(&printable));
        assert!(printable.matches(&utf8));
        assert!(printable.matches(&spaced));
        assert!(!printable.matches(&other));

        // Equality stays strictly byte-for-byte.
        assert_eq!(printable, printable.clone());
        assert_ne!(printable, utf8);
    }

    #[test]
    fn name_structure_mismatch() {
        // Two single-attribute RDNs do not equal one two-attribute RDN.
        let a = name_from(&cn_name(0x13, b"one"));
        let mut two_rdns = cn_name(0x13, b"one");
        let set = two_rdns[2..].to_vec();
        two_rdns.extend_from_slice(&set);
        two_rdns[1] += set.len() as u8;
        let b = name_from(&two_rdns);
        assert!(!a.matches(&b));
        assert!(b.matches(&b));
    }

    #[test]
    fn name_attributes() {
        let name = name_from(&cn_name(0x13, b"attr"));
        let attrs: Vec<_> = name.attributes().collect();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].oid(), &crate::oid::AT_COMMON_NAME);
        assert_eq!(attrs[0].value(), b"attr");
        assert_eq!(attrs[0].tag(), Tag::PRINTABLE_STRING);
    }

    #[test]
    fn empty_name_allowed() {
        let name = name_from(&[0x30, 0x00]);
        assert_eq!(name.rdns().count(), 0);
        assert!(name.matches(&name.clone()));
    }

    #[test]
    fn empty_rdn_rejected() {
        // SEQUENCE { SET { } }
        assert!(
            Mode::Der.decode(
                [0x30, 0x02, 0x31, 0x00].as_ref(), Name::take_from
            ).is_err()
        );
    }

    #[test]
    fn folding() {
        assert!(folded_eq(b"abc", b"ABC"));
        assert!(folded_eq(b" a  b ", b"A B"));
        assert!(folded_eq(b"", b"   "));
        assert!(!folded_eq(b"ab", b"a b"));
        assert!(!folded_eq(b"a", b""));
    }
}
