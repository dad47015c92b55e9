//! Binary encoding of a [`Value`] tree.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{Error, Result};
use crate::value::Value;
use crate::Tag;

pub(crate) trait WriteNbt: Write {
    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.write_u8(tag.into())?;
        Ok(())
    }

    fn write_nbt_string(&mut self, s: &str) -> Result<()> {
        let encoded = cesu8::to_java_cesu8(s);
        let len: u16 = encoded
            .len()
            .try_into()
            .map_err(|_| Error::bespoke("string too long for nbt"))?;
        self.write_u16::<BigEndian>(len)?;
        self.write_all(&encoded)?;
        Ok(())
    }

    fn write_nbt_len(&mut self, len: usize) -> Result<()> {
        let len: i32 = len.try_into().map_err(|_| Error::length_overflow())?;
        self.write_i32::<BigEndian>(len)?;
        Ok(())
    }
}

impl<W: Write + ?Sized> WriteNbt for W {}

/// Encode a root value with an empty name.
pub fn to_writer<W: Write>(writer: W, value: &Value) -> Result<()> {
    named_to_writer(writer, "", value)
}

/// Encode a root value under the given name. The root entry is always
/// name-prefixed on the wire, matching what existing readers expect.
pub fn named_to_writer<W: Write>(mut writer: W, name: &str, value: &Value) -> Result<()> {
    writer.write_tag(value.tag())?;
    writer.write_nbt_string(name)?;
    write_payload(&mut writer, value)
}

/// Encode a root value to a fresh byte vector.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    to_writer(&mut out, value)?;
    Ok(out)
}

/// Encode a root value with gzip framing, for files at rest.
pub fn to_gzip_writer<W: Write>(writer: W, value: &Value) -> Result<()> {
    let mut encoder = GzEncoder::new(writer, Compression::default());
    to_writer(&mut encoder, value)?;
    encoder.finish()?;
    Ok(())
}

fn write_payload<W: Write>(writer: &mut W, value: &Value) -> Result<()> {
    match value {
        Value::Byte(v) => writer.write_i8(*v)?,
        Value::Short(v) => writer.write_i16::<BigEndian>(*v)?,
        Value::Int(v) => writer.write_i32::<BigEndian>(*v)?,
        Value::Long(v) => writer.write_i64::<BigEndian>(*v)?,
        Value::Float(v) => writer.write_f32::<BigEndian>(*v)?,
        Value::Double(v) => writer.write_f64::<BigEndian>(*v)?,
        Value::ByteArray(v) => {
            writer.write_nbt_len(v.len())?;
            for b in v {
                writer.write_i8(*b)?;
            }
        }
        Value::String(s) => writer.write_nbt_string(s)?,
        Value::List(list) => {
            // An empty list encodes with element tag End and length 0.
            writer.write_tag(list.element_tag())?;
            writer.write_nbt_len(list.len())?;
            for element in list {
                write_payload(writer, element)?;
            }
        }
        Value::Compound(compound) => {
            for (key, child) in compound {
                writer.write_tag(child.tag())?;
                writer.write_nbt_string(key)?;
                write_payload(writer, child)?;
            }
            writer.write_tag(Tag::End)?;
        }
        Value::IntArray(v) => {
            writer.write_nbt_len(v.len())?;
            for i in v {
                writer.write_i32::<BigEndian>(*i)?;
            }
        }
        Value::LongArray(v) => {
            writer.write_nbt_len(v.len())?;
            for i in v {
                writer.write_i64::<BigEndian>(*i)?;
            }
        }
    }
    Ok(())
}
