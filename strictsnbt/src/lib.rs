//! strictsnbt parses and prints Minecraft's stringified NBT ("SNBT"), the
//! human readable text form of the tag trees that [`strictnbt`] reads and
//! writes in binary.
//!
//! ```
//! use strictsnbt::{from_str, to_string};
//!
//! # fn main() -> strictsnbt::error::Result<()> {
//! let compound = from_str(r#"{x: 1b, y: "hi", z: [1, 2, 3]}"#)?;
//! assert_eq!(compound.get_byte("x"), 1);
//! assert_eq!(compound.get_str("y"), "hi");
//! assert_eq!(compound.list("z").unwrap().len(), 3);
//!
//! // The compact form round-trips.
//! let printed = to_string(&strictnbt::Value::Compound(compound.clone()));
//! assert_eq!(from_str(&printed)?, compound);
//! # Ok(())
//! # }
//! ```
//!
//! Numeric literals carry an optional case-insensitive suffix (`1b`, `2s`,
//! `3L`, `4.5f`, `6d`); an unsuffixed literal is an int, or a double if it
//! has a decimal point. `true` and `false` are bytes 1 and 0. Anything that
//! fails to parse as a number is a string, and strings can always be quoted
//! with `"` or `'` instead, escaping the quote and backslashes.

use strictnbt::{Compound, Value};

use error::{Error, Result};
use parser::{Failure, PResult};

pub mod error;

mod parser;
mod print;

pub use print::{to_string, to_string_pretty};

#[cfg(test)]
mod test;

/// Parse a root compound, the canonical form of persisted SNBT. The whole
/// input must be consumed, up to trailing whitespace.
pub fn from_str(input: &str) -> Result<Compound> {
    finish(input, parser::root_compound(input))
}

/// Parse any single value, not just a compound.
pub fn value_from_str(input: &str) -> Result<Value> {
    finish(input, parser::root_value(input))
}

fn finish<T>(input: &str, parsed: PResult<'_, T>) -> Result<T> {
    match parsed {
        Ok((rest, value)) if rest.is_empty() => Ok(value),
        Ok((rest, _)) => Err(Error::trailing_data(input.len() - rest.len())),
        Err(nom::Err::Error(failure)) | Err(nom::Err::Failure(failure)) => {
            Err(from_failure(input, failure))
        }
        Err(nom::Err::Incomplete(_)) => Err(Error::unexpected_eof()),
    }
}

fn from_failure(input: &str, failure: Failure) -> Error {
    let pos = input.len() - failure.remaining.min(input.len());
    let msg = failure
        .msg
        .unwrap_or_else(|| "invalid snbt".to_owned());
    Error::new(failure.kind, format!("{msg}, at {pos}"))
}
