//! Push-based streaming of NBT data without building a tree.
//!
//! The decoder announces each entry to a caller-supplied [`Visitor`] before
//! consuming the entry's payload, and the visitor decides what happens next:
//! descend into it, skip its bytes, break out of the surrounding container,
//! or halt the whole decode. Scalar payloads arrive as native values, so a
//! caller digging one field out of a large file never materialises the rest.
//!
//! Skipped and broken-past values are still charged against the accounter's
//! quota exactly as if they had been loaded. A [`Halt`][`EntryFlow::Halt`]
//! stops everything immediately: no further visitor calls, no further
//! charges, every open container abandoned.
//!
//! # Example
//!
//! Count the entries of a root compound without decoding any of them:
//!
//! ```
//! use strictnbt::stream::{visit_from_reader, EntryFlow, Visitor};
//! use strictnbt::{Accounter, Tag};
//!
//! #[derive(Default)]
//! struct EntryCounter {
//!     entries: usize,
//! }
//!
//! impl Visitor for EntryCounter {
//!     fn visit_entry(&mut self, _tag: Tag) -> EntryFlow {
//!         // Skipping means nested compounds are never entered, so every
//!         // call here is a root-level entry.
//!         self.entries += 1;
//!         EntryFlow::Skip
//!     }
//! }
//!
//! # fn main() -> strictnbt::error::Result<()> {
//! # let mut compound = strictnbt::Compound::new();
//! # compound.insert("a", 1);
//! # compound.insert("b", 2);
//! # let data = strictnbt::to_bytes(&strictnbt::Value::Compound(compound))?;
//! let mut counter = EntryCounter::default();
//! visit_from_reader(data.as_slice(), &mut Accounter::bounded(1 << 20), &mut counter)?;
//! assert_eq!(counter.entries, 2);
//! # Ok(())
//! # }
//! ```

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::GzDecoder;

use crate::accounter::Accounter;
use crate::de::{
    read_byte_array, read_int_array, read_list_header, read_long_array, read_string, read_tag,
    skip_string,
};
use crate::error::{Error, Result};
use crate::Tag;

/// Visitor verdict for an entry, given before any of the entry's payload
/// bytes are consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFlow {
    /// Proceed into the value: payload callbacks (and for containers,
    /// nested entries) follow.
    Enter,
    /// Discard this value's bytes without visiting it.
    Skip,
    /// Stop the surrounding container: remaining sibling bytes are consumed
    /// unvisited and a single container-end is emitted.
    Break,
    /// Abort the entire decode immediately.
    Halt,
}

/// Visitor verdict after receiving a value or a container end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFlow {
    Continue,
    /// Stop the surrounding container, as [`EntryFlow::Break`].
    Break,
    /// Abort the entire decode immediately.
    Halt,
}

/// A push-based consumer of an NBT stream. Every method has a default that
/// enters and continues, so an implementation only overrides what it needs.
#[allow(unused_variables)]
pub trait Visitor {
    /// The root entry's tag, before its name is consumed.
    fn visit_root_entry(&mut self, tag: Tag) -> EntryFlow {
        EntryFlow::Enter
    }

    /// A compound entry's tag, before the entry's name is consumed.
    fn visit_entry(&mut self, tag: Tag) -> EntryFlow {
        EntryFlow::Enter
    }

    /// A compound entry's tag and name, after [`visit_entry`][`Visitor::visit_entry`]
    /// returned `Enter`.
    fn visit_entry_named(&mut self, tag: Tag, name: &str) -> EntryFlow {
        EntryFlow::Enter
    }

    /// A list element, before its payload is consumed.
    fn visit_element(&mut self, tag: Tag, index: usize) -> EntryFlow {
        EntryFlow::Enter
    }

    /// A list header: the element tag and claimed length. `Break` consumes
    /// the whole list unvisited and emits the container end.
    fn visit_list(&mut self, element: Tag, len: usize) -> ValueFlow {
        ValueFlow::Continue
    }

    fn visit_byte(&mut self, value: i8) -> ValueFlow {
        ValueFlow::Continue
    }

    fn visit_short(&mut self, value: i16) -> ValueFlow {
        ValueFlow::Continue
    }

    fn visit_int(&mut self, value: i32) -> ValueFlow {
        ValueFlow::Continue
    }

    fn visit_long(&mut self, value: i64) -> ValueFlow {
        ValueFlow::Continue
    }

    fn visit_float(&mut self, value: f32) -> ValueFlow {
        ValueFlow::Continue
    }

    fn visit_double(&mut self, value: f64) -> ValueFlow {
        ValueFlow::Continue
    }

    fn visit_string(&mut self, value: &str) -> ValueFlow {
        ValueFlow::Continue
    }

    fn visit_byte_array(&mut self, value: Vec<i8>) -> ValueFlow {
        ValueFlow::Continue
    }

    fn visit_int_array(&mut self, value: Vec<i32>) -> ValueFlow {
        ValueFlow::Continue
    }

    fn visit_long_array(&mut self, value: Vec<i64>) -> ValueFlow {
        ValueFlow::Continue
    }

    /// The end of the list or compound most recently entered.
    fn visit_container_end(&mut self) -> ValueFlow {
        ValueFlow::Continue
    }
}

/// Drive a visitor over a root entry read from `reader`.
///
/// Returns the flow the traversal finished with: `Continue` for a fully
/// visited or skipped root, `Break` or `Halt` if the visitor cut the decode
/// short.
pub fn visit_from_reader<R, V>(mut reader: R, acct: &mut Accounter, visitor: &mut V) -> Result<ValueFlow>
where
    R: Read,
    V: Visitor + ?Sized,
{
    acct.account_bytes(1)?;
    let tag = read_tag(&mut reader)?;
    if tag == Tag::End {
        return Err(Error::no_root_value());
    }
    match visitor.visit_root_entry(tag) {
        EntryFlow::Halt => Ok(ValueFlow::Halt),
        EntryFlow::Break => Ok(ValueFlow::Break),
        EntryFlow::Skip => {
            skip_string(&mut reader, acct)?;
            tag.skip(&mut reader, acct)?;
            Ok(ValueFlow::Continue)
        }
        EntryFlow::Enter => {
            // The root name is consumed but not delivered; it is empty in
            // every format this crate targets.
            skip_string(&mut reader, acct)?;
            tag.parse(&mut reader, acct, visitor)
        }
    }
}

/// As [`visit_from_reader`], decompressing a gzip stream on the fly.
pub fn visit_from_gzip_reader<R, V>(
    reader: R,
    acct: &mut Accounter,
    visitor: &mut V,
) -> Result<ValueFlow>
where
    R: Read,
    V: Visitor + ?Sized,
{
    visit_from_reader(GzDecoder::new(reader), acct, visitor)
}

impl Tag {
    /// Drive a visitor over one payload of this tag instead of loading it.
    pub(crate) fn parse<R, V>(
        self,
        reader: &mut R,
        acct: &mut Accounter,
        visitor: &mut V,
    ) -> Result<ValueFlow>
    where
        R: Read,
        V: Visitor + ?Sized,
    {
        if let Some(size) = self.fixed_payload_size() {
            acct.account_bytes(size)?;
        }
        match self {
            Tag::End => Err(Error::bespoke("End tag has no payload")),
            Tag::Byte => Ok(visitor.visit_byte(reader.read_i8()?)),
            Tag::Short => Ok(visitor.visit_short(reader.read_i16::<BigEndian>()?)),
            Tag::Int => Ok(visitor.visit_int(reader.read_i32::<BigEndian>()?)),
            Tag::Long => Ok(visitor.visit_long(reader.read_i64::<BigEndian>()?)),
            Tag::Float => Ok(visitor.visit_float(reader.read_f32::<BigEndian>()?)),
            Tag::Double => Ok(visitor.visit_double(reader.read_f64::<BigEndian>()?)),
            Tag::String => {
                let s = read_string(reader, acct)?;
                Ok(visitor.visit_string(&s))
            }
            Tag::ByteArray => Ok(visitor.visit_byte_array(read_byte_array(reader, acct)?)),
            Tag::IntArray => Ok(visitor.visit_int_array(read_int_array(reader, acct)?)),
            Tag::LongArray => Ok(visitor.visit_long_array(read_long_array(reader, acct)?)),
            Tag::List => parse_list(reader, acct, visitor),
            Tag::Compound => parse_compound(reader, acct, visitor),
        }
    }
}

fn parse_list<R, V>(reader: &mut R, acct: &mut Accounter, visitor: &mut V) -> Result<ValueFlow>
where
    R: Read,
    V: Visitor + ?Sized,
{
    let mut scope = acct.enter()?;
    let (element, len) = read_list_header(reader, &mut scope)?;

    match visitor.visit_list(element, len) {
        ValueFlow::Halt => return Ok(ValueFlow::Halt),
        ValueFlow::Break => {
            for _ in 0..len {
                element.skip(reader, &mut scope)?;
            }
            return Ok(visitor.visit_container_end());
        }
        ValueFlow::Continue => {}
    }

    for index in 0..len {
        match visitor.visit_element(element, index) {
            EntryFlow::Halt => return Ok(ValueFlow::Halt),
            EntryFlow::Skip => element.skip(reader, &mut scope)?,
            EntryFlow::Break => {
                for _ in index..len {
                    element.skip(reader, &mut scope)?;
                }
                return Ok(visitor.visit_container_end());
            }
            EntryFlow::Enter => match element.parse(reader, &mut scope, visitor)? {
                ValueFlow::Continue => {}
                ValueFlow::Break => {
                    for _ in index + 1..len {
                        element.skip(reader, &mut scope)?;
                    }
                    return Ok(visitor.visit_container_end());
                }
                ValueFlow::Halt => return Ok(ValueFlow::Halt),
            },
        }
    }
    Ok(visitor.visit_container_end())
}

fn parse_compound<R, V>(reader: &mut R, acct: &mut Accounter, visitor: &mut V) -> Result<ValueFlow>
where
    R: Read,
    V: Visitor + ?Sized,
{
    let mut scope = acct.enter()?;
    loop {
        scope.account_bytes(1)?;
        let tag = read_tag(reader)?;
        if tag == Tag::End {
            return Ok(visitor.visit_container_end());
        }
        match visitor.visit_entry(tag) {
            EntryFlow::Halt => return Ok(ValueFlow::Halt),
            EntryFlow::Skip => {
                skip_string(reader, &mut scope)?;
                tag.skip(reader, &mut scope)?;
            }
            EntryFlow::Break => {
                skip_string(reader, &mut scope)?;
                tag.skip(reader, &mut scope)?;
                skip_remaining_entries(reader, &mut scope)?;
                return Ok(visitor.visit_container_end());
            }
            EntryFlow::Enter => {
                let name = read_string(reader, &mut scope)?;
                match visitor.visit_entry_named(tag, &name) {
                    EntryFlow::Halt => return Ok(ValueFlow::Halt),
                    EntryFlow::Skip => tag.skip(reader, &mut scope)?,
                    EntryFlow::Break => {
                        tag.skip(reader, &mut scope)?;
                        skip_remaining_entries(reader, &mut scope)?;
                        return Ok(visitor.visit_container_end());
                    }
                    EntryFlow::Enter => match tag.parse(reader, &mut scope, visitor)? {
                        ValueFlow::Continue => {}
                        ValueFlow::Break => {
                            skip_remaining_entries(reader, &mut scope)?;
                            return Ok(visitor.visit_container_end());
                        }
                        ValueFlow::Halt => return Ok(ValueFlow::Halt),
                    },
                }
            }
        }
    }
}

/// Consume the rest of the current compound's entries, charging them, until
/// its End terminator.
fn skip_remaining_entries<R: Read>(reader: &mut R, acct: &mut Accounter) -> Result<()> {
    loop {
        acct.account_bytes(1)?;
        let tag = read_tag(reader)?;
        if tag == Tag::End {
            return Ok(());
        }
        skip_string(reader, acct)?;
        tag.skip(reader, acct)?;
    }
}
