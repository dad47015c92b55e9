//! Binary decoding: the `load` and `skip` operations for each tag, and the
//! root-level entry points.
//!
//! All charging happens before the corresponding bytes are materialised. In
//! particular an array's claimed length is charged against the quota before
//! the backing buffer is allocated, so a stream claiming an absurd length
//! fails with `QuotaExceeded` while still holding only its header.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::GzDecoder;

use crate::accounter::Accounter;
use crate::error::{Error, Result};
use crate::value::{Compound, List, Value};
use crate::Tag;

/// Decode a root value from a byte slice.
pub fn from_bytes(input: &[u8], acct: &mut Accounter) -> Result<Value> {
    from_reader(input, acct)
}

/// Decode a root value from a reader, discarding the root name.
///
/// The root is always a named entry on the wire, even when the name is
/// empty. Any tag other than `End` is accepted as the root.
pub fn from_reader<R: Read>(reader: R, acct: &mut Accounter) -> Result<Value> {
    named_from_reader(reader, acct).map(|(_, value)| value)
}

/// Decode a root value and its name from a reader.
pub fn named_from_reader<R: Read>(mut reader: R, acct: &mut Accounter) -> Result<(String, Value)> {
    acct.account_bytes(1)?;
    let tag = read_tag(&mut reader)?;
    if tag == Tag::End {
        return Err(Error::no_root_value());
    }
    let name = read_string(&mut reader, acct)?;
    let value = tag.load(&mut reader, acct)?;
    Ok((name, value))
}

/// Decode a gzip compressed root value from a reader.
///
/// Decompression is streamed, so the accounter's quota bounds the
/// decompressed size of the data, not the compressed size.
pub fn from_gzip_reader<R: Read>(reader: R, acct: &mut Accounter) -> Result<Value> {
    from_reader(GzDecoder::new(reader), acct)
}

impl Tag {
    /// Fully materialise one payload of this tag.
    pub(crate) fn load<R: Read>(self, reader: &mut R, acct: &mut Accounter) -> Result<Value> {
        if let Some(size) = self.fixed_payload_size() {
            acct.account_bytes(size)?;
        }
        match self {
            Tag::End => Err(Error::bespoke("End tag has no payload")),
            Tag::Byte => Ok(Value::Byte(reader.read_i8()?)),
            Tag::Short => Ok(Value::Short(reader.read_i16::<BigEndian>()?)),
            Tag::Int => Ok(Value::Int(reader.read_i32::<BigEndian>()?)),
            Tag::Long => Ok(Value::Long(reader.read_i64::<BigEndian>()?)),
            Tag::Float => Ok(Value::Float(reader.read_f32::<BigEndian>()?)),
            Tag::Double => Ok(Value::Double(reader.read_f64::<BigEndian>()?)),
            Tag::ByteArray => Ok(Value::ByteArray(read_byte_array(reader, acct)?)),
            Tag::String => Ok(Value::String(read_string(reader, acct)?)),
            Tag::List => {
                let mut scope = acct.enter()?;
                let (element, len) = read_list_header(reader, &mut scope)?;
                // No pre-allocation from the claimed length: each element is
                // charged as it is read.
                let mut values = Vec::new();
                for _ in 0..len {
                    values.push(element.load(reader, &mut scope)?);
                }
                Ok(Value::List(List::from_parts(element, values)))
            }
            Tag::Compound => {
                let mut scope = acct.enter()?;
                let mut compound = Compound::new();
                loop {
                    scope.account_bytes(1)?;
                    let tag = read_tag(reader)?;
                    if tag == Tag::End {
                        break;
                    }
                    let name = read_string(reader, &mut scope)?;
                    let value = tag.load(reader, &mut scope)?;
                    compound.insert(name, value);
                }
                Ok(Value::Compound(compound))
            }
            Tag::IntArray => Ok(Value::IntArray(read_int_array(reader, acct)?)),
            Tag::LongArray => Ok(Value::LongArray(read_long_array(reader, acct)?)),
        }
    }

    /// Consume and discard one payload of this tag without allocating it.
    /// Charges the accounter exactly as `load` would: skipping is not a way
    /// around the quota.
    pub(crate) fn skip<R: Read>(self, reader: &mut R, acct: &mut Accounter) -> Result<()> {
        if let Some(size) = self.fixed_payload_size() {
            acct.account_bytes(size)?;
            return discard(reader, size);
        }
        match self {
            Tag::End => Err(Error::bespoke("End tag has no payload")),
            Tag::String => skip_string(reader, acct),
            Tag::ByteArray => {
                let mut scope = acct.enter()?;
                let len = read_array_header(reader, &mut scope, 1)?;
                discard(reader, len as u64)
            }
            Tag::IntArray => {
                let mut scope = acct.enter()?;
                let len = read_array_header(reader, &mut scope, 4)?;
                discard(reader, len as u64 * 4)
            }
            Tag::LongArray => {
                let mut scope = acct.enter()?;
                let len = read_array_header(reader, &mut scope, 8)?;
                discard(reader, len as u64 * 8)
            }
            Tag::List => {
                let mut scope = acct.enter()?;
                let (element, len) = read_list_header(reader, &mut scope)?;
                for _ in 0..len {
                    element.skip(reader, &mut scope)?;
                }
                Ok(())
            }
            Tag::Compound => {
                let mut scope = acct.enter()?;
                loop {
                    scope.account_bytes(1)?;
                    let tag = read_tag(reader)?;
                    if tag == Tag::End {
                        return Ok(());
                    }
                    skip_string(reader, &mut scope)?;
                    tag.skip(reader, &mut scope)?;
                }
            }
            _ => unreachable!("fixed size tags handled above"),
        }
    }
}

pub(crate) fn read_tag<R: Read>(reader: &mut R) -> Result<Tag> {
    let tag = reader.read_u8()?;
    Tag::try_from(tag).map_err(|_| Error::invalid_tag(tag))
}

/// Read a length-prefixed modified-UTF-8 string, charging its wire size.
pub(crate) fn read_string<R: Read>(reader: &mut R, acct: &mut Accounter) -> Result<String> {
    let len = reader.read_u16::<BigEndian>()? as usize;
    acct.account_bytes(2 + len as u64)?;
    let mut buf = vec![0; len];
    reader.read_exact(&mut buf)?;
    let str = cesu8::from_java_cesu8(&buf).map_err(|_| Error::nonunicode(&buf))?;
    Ok(str.into_owned())
}

pub(crate) fn skip_string<R: Read>(reader: &mut R, acct: &mut Accounter) -> Result<()> {
    let len = reader.read_u16::<BigEndian>()? as u64;
    acct.account_bytes(2 + len)?;
    discard(reader, len)
}

/// Read a list's element tag and length, charging the header and validating
/// that the length is non-negative and that only an empty list may claim an
/// `End` element tag.
pub(crate) fn read_list_header<R: Read>(
    reader: &mut R,
    acct: &mut Accounter,
) -> Result<(Tag, usize)> {
    acct.account_bytes(5)?;
    let element = read_tag(reader)?;
    let len = reader.read_i32::<BigEndian>()?;
    if len < 0 {
        return Err(Error::negative_length(len));
    }
    if element == Tag::End && len != 0 {
        return Err(Error::list_of_end(len));
    }
    Ok((element, len as usize))
}

/// Read an array's length and charge the header plus the whole payload, so
/// the caller can allocate `len` elements afterwards knowing the quota
/// already covers them.
fn read_array_header<R: Read>(
    reader: &mut R,
    acct: &mut Accounter,
    element_size: usize,
) -> Result<usize> {
    acct.account_bytes(4)?;
    let len = reader.read_i32::<BigEndian>()?;
    if len < 0 {
        return Err(Error::negative_length(len));
    }
    let len = len as usize;
    let payload = len
        .checked_mul(element_size)
        .ok_or_else(Error::length_overflow)?;
    acct.account_bytes(payload as u64)?;
    Ok(len)
}

pub(crate) fn read_byte_array<R: Read>(reader: &mut R, acct: &mut Accounter) -> Result<Vec<i8>> {
    let mut scope = acct.enter()?;
    let len = read_array_header(reader, &mut scope, 1)?;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(vec_u8_into_i8(buf))
}

pub(crate) fn read_int_array<R: Read>(reader: &mut R, acct: &mut Accounter) -> Result<Vec<i32>> {
    let mut scope = acct.enter()?;
    let len = read_array_header(reader, &mut scope, 4)?;
    let mut buf = Vec::with_capacity(len);
    for _ in 0..len {
        buf.push(reader.read_i32::<BigEndian>()?);
    }
    Ok(buf)
}

pub(crate) fn read_long_array<R: Read>(reader: &mut R, acct: &mut Accounter) -> Result<Vec<i64>> {
    let mut scope = acct.enter()?;
    let len = read_array_header(reader, &mut scope, 8)?;
    let mut buf = Vec::with_capacity(len);
    for _ in 0..len {
        buf.push(reader.read_i64::<BigEndian>()?);
    }
    Ok(buf)
}

/// Throw away exactly `n` bytes without allocating for them.
pub(crate) fn discard<R: Read>(reader: &mut R, n: u64) -> Result<()> {
    let copied = std::io::copy(&mut reader.by_ref().take(n), &mut std::io::sink())?;
    if copied < n {
        return Err(Error::unexpected_eof());
    }
    Ok(())
}

// Reinterpret the buffer in place rather than copying element by element.
fn vec_u8_into_i8(v: Vec<u8>) -> Vec<i8> {
    let mut v = std::mem::ManuallyDrop::new(v);
    let p = v.as_mut_ptr();
    let len = v.len();
    let cap = v.capacity();
    unsafe { Vec::from_raw_parts(p as *mut i8, len, cap) }
}
