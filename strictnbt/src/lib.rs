//! strictnbt reads and writes Minecraft's NBT format while defending against
//! hostile or corrupt input.
//!
//! Every decode is driven through an [`Accounter`], which bounds the
//! cumulative decoded size and the nesting depth before anything is
//! allocated. This makes it safe to hand the decoder bytes from the network
//! or from files you did not produce: a stream claiming a two-gigabyte array,
//! or a compound nested ten thousand levels deep, fails fast with
//! `QuotaExceeded` or `DepthExceeded` instead of exhausting memory or stack.
//!
//! * For a tree model of NBT data see [`Value`], [`Compound`] and [`List`].
//! * For decoding and encoding see [`from_reader`], [`to_writer`] and the
//!   gzip variants used for files at rest.
//! * For pulling single fields out of large files without building a tree,
//!   see the push-based [`stream`] module.
//!
//! # Quick example
//!
//! ```
//! use strictnbt::{from_bytes, to_bytes, Accounter, Compound, Value};
//!
//! # fn main() -> strictnbt::error::Result<()> {
//! let mut root = Compound::new();
//! root.insert("Name", "flat");
//! root.insert("DataVersion", 2230);
//!
//! let bytes = to_bytes(&Value::Compound(root))?;
//!
//! // Quota of 1 KiB: plenty for this value, fatal for a hostile stream.
//! let mut acct = Accounter::bounded(1024);
//! let back = from_bytes(&bytes, &mut acct)?;
//! assert_eq!(back.as_compound().unwrap().get_int("DataVersion"), 2230);
//! # Ok(())
//! # }
//! ```
//!
//! # Compressed files
//!
//! NBT files at rest are usually gzip compressed. [`from_gzip_reader`]
//! decompresses as a stream, so the quota applies to the *decompressed*
//! size and a decompression bomb fails regardless of its compressed size.

pub mod error;
pub mod stream;

mod accounter;
mod de;
mod ser;
mod value;

#[cfg(feature = "serde")]
mod serde;

pub use accounter::{string_cost, Accounter, DepthScope, DEFAULT_DEPTH_LIMIT};
pub use de::{from_bytes, from_gzip_reader, from_reader, named_from_reader};
pub use ser::{named_to_writer, to_bytes, to_gzip_writer, to_writer};
pub use value::{Compound, CompoundMap, List, Value};

#[cfg(test)]
mod test;

/// An NBT tag. This identifies the type of a value on the wire but carries no
/// payload or name itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// Terminates a Compound's entries. Also the element tag of an empty
    /// List. Never a value of its own.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64.
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// An array of Byte (i8).
    ByteArray = 7,
    /// A Unicode string, modified UTF-8 on the wire.
    String = 8,
    /// An ordered sequence of values sharing a single element tag.
    List = 9,
    /// A struct-like mapping from string keys to values.
    Compound = 10,
    /// An array of Int (i32).
    IntArray = 11,
    /// An array of Long (i64).
    LongArray = 12,
}

impl Tag {
    /// Display name for diagnostics, e.g. `"ByteArray"`.
    pub fn name(self) -> &'static str {
        match self {
            Tag::End => "End",
            Tag::Byte => "Byte",
            Tag::Short => "Short",
            Tag::Int => "Int",
            Tag::Long => "Long",
            Tag::Float => "Float",
            Tag::Double => "Double",
            Tag::ByteArray => "ByteArray",
            Tag::String => "String",
            Tag::List => "List",
            Tag::Compound => "Compound",
            Tag::IntArray => "IntArray",
            Tag::LongArray => "LongArray",
        }
    }

    /// Whether decoding a value of this tag recurses, and so pushes a level
    /// on the accounter's depth tracking. The array tags count: their
    /// payload size is attacker controlled even though they do not nest.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Tag::ByteArray | Tag::List | Tag::Compound | Tag::IntArray | Tag::LongArray
        )
    }

    /// The fixed payload size of this tag in bytes, or `None` for the
    /// variable-size tags.
    pub fn fixed_payload_size(self) -> Option<u64> {
        match self {
            Tag::Byte => Some(1),
            Tag::Short => Some(2),
            Tag::Int => Some(4),
            Tag::Long => Some(8),
            Tag::Float => Some(4),
            Tag::Double => Some(8),
            _ => None,
        }
    }
}

// Conversion crates could generate these for us, but the tag values are
// stable, and writing the match out keeps compile times down.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
