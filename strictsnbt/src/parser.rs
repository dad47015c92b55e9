//! nom based parsing of SNBT text into the strictnbt value model.
//!
//! Unquoted tokens are read whole and then classified, because the type of a
//! token depends on its entire text: `1b` is a byte but `1before` is a
//! string, and `128b` overflows a byte so it falls back to a string too.

use nom::branch::alt;
use nom::bytes::complete::{is_a, tag, tag_no_case};
use nom::character::complete::{char, digit0, digit1, multispace0, one_of};
use nom::combinator::{all_consuming, map, map_res, opt, recognize};
use nom::error::ParseError;
use nom::sequence::{pair, preceded, terminated, tuple};
use nom::IResult;

use strictnbt::{Compound, List, Tag, Value};

use crate::error::ErrorKind;

/// Error type threaded through the nom parsers: the kind the failure maps
/// to, an optional message, and how much input was left when it happened.
#[derive(Debug)]
pub(crate) struct Failure {
    pub(crate) kind: ErrorKind,
    pub(crate) msg: Option<String>,
    pub(crate) remaining: usize,
}

impl Failure {
    /// An unrecoverable failure at `input`, in the nom sense: alternatives
    /// are not tried once one of these is returned.
    fn fail<'a, T>(kind: ErrorKind, input: &'a str, msg: impl Into<String>) -> PResult<'a, T> {
        Err(nom::Err::Failure(Failure {
            kind,
            msg: Some(msg.into()),
            remaining: input.len(),
        }))
    }
}

impl<'a> ParseError<&'a str> for Failure {
    fn from_error_kind(input: &'a str, _kind: nom::error::ErrorKind) -> Self {
        Failure {
            kind: ErrorKind::Other,
            msg: None,
            remaining: input.len(),
        }
    }

    fn append(_input: &'a str, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

// map_res needs this to discard the ParseIntError/ParseFloatError when a
// numeric literal overflows; the token then classifies as a string instead.
impl<'a, E> nom::error::FromExternalError<&'a str, E> for Failure {
    fn from_external_error(input: &'a str, _kind: nom::error::ErrorKind, _e: E) -> Self {
        Failure {
            kind: ErrorKind::Other,
            msg: None,
            remaining: input.len(),
        }
    }
}

pub(crate) type PResult<'a, T> = IResult<&'a str, T, Failure>;

/// Parse one value, requiring only surrounding whitespace to remain.
pub(crate) fn root_value(input: &str) -> PResult<'_, Value> {
    terminated(preceded(multispace0, value), multispace0)(input)
}

/// Parse a root compound, the canonical persisted form.
pub(crate) fn root_compound(input: &str) -> PResult<'_, Compound> {
    let (input, _) = multispace0(input)?;
    if !input.starts_with('{') {
        return Failure::fail(
            ErrorKind::ExpectedValue,
            input,
            "expected '{' to open the root compound",
        );
    }
    terminated(compound, multispace0)(input)
}

fn value(input: &str) -> PResult<'_, Value> {
    match input.chars().next() {
        Some('{') => map(compound, Value::Compound)(input),
        Some('[') => bracketed(input),
        Some('"') | Some('\'') => map(quoted_string, Value::String)(input),
        Some(c) if is_token_char(c) => {
            let (rest, token) = token(input)?;
            Ok((rest, classify_token(token)))
        }
        _ => Failure::fail(ErrorKind::ExpectedValue, input, "expected a value"),
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-')
}

fn token(input: &str) -> PResult<'_, &str> {
    is_a("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789._+-")(input)
}

/// Decide what an unquoted token is, in the same order the game does:
/// float, byte, long, short, double, dotted double, int, boolean, and
/// failing all of those, a bare string.
pub(crate) fn classify_token(token: &str) -> Value {
    fn whole<'a, T>(
        parser: impl FnMut(&'a str) -> PResult<'a, T>,
        token: &'a str,
    ) -> Option<T> {
        all_consuming(parser)(token).ok().map(|(_, v)| v)
    }

    if let Some(v) = whole(parse_f32, token) {
        Value::Float(v)
    } else if let Some(v) = whole(parse_i8, token) {
        Value::Byte(v)
    } else if let Some(v) = whole(parse_i64, token) {
        Value::Long(v)
    } else if let Some(v) = whole(parse_i16, token) {
        Value::Short(v)
    } else if let Some(v) = whole(parse_f64_suffixed, token) {
        Value::Double(v)
    } else if let Some(v) = whole(parse_f64_dotted, token) {
        Value::Double(v)
    } else if let Some(v) = whole(parse_i32, token) {
        Value::Int(v)
    } else if let Some(v) = whole(parse_bool, token) {
        Value::Byte(v as i8)
    } else {
        Value::String(token.to_owned())
    }
}

fn parse_bool(input: &str) -> PResult<'_, bool> {
    alt((map(tag("true"), |_| true), map(tag("false"), |_| false)))(input)
}

fn parse_i8(input: &str) -> PResult<'_, i8> {
    map_res(terminated(decimal, one_of("bB")), |s: &str| s.parse())(input)
}

fn parse_i16(input: &str) -> PResult<'_, i16> {
    map_res(terminated(decimal, one_of("sS")), |s: &str| s.parse())(input)
}

fn parse_i32(input: &str) -> PResult<'_, i32> {
    map_res(decimal, |s: &str| s.parse())(input)
}

fn parse_i64(input: &str) -> PResult<'_, i64> {
    map_res(terminated(decimal, one_of("lL")), |s: &str| s.parse())(input)
}

fn parse_f32(input: &str) -> PResult<'_, f32> {
    map_res(terminated(float_lit, one_of("fF")), |s: &str| s.parse())(input)
}

fn parse_f64_suffixed(input: &str) -> PResult<'_, f64> {
    map_res(terminated(float_lit, one_of("dD")), |s: &str| s.parse())(input)
}

fn parse_f64_dotted(input: &str) -> PResult<'_, f64> {
    map_res(dotted_float_lit, |s: &str| s.parse())(input)
}

/// A float body for the suffixed forms. A decimal point is optional here:
/// `1f` and `1e30d` are floats once the suffix says so.
fn float_lit(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        opt(one_of("+-")),
        alt((
            tag_no_case("infinity"),
            tag_no_case("inf"),
            tag_no_case("nan"),
            recognize(pair(
                alt((
                    recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                    recognize(pair(char('.'), digit1)),
                )),
                exponent,
            )),
        )),
    ))(input)
}

/// A float body for the unsuffixed form, which must contain a decimal point
/// to be a double at all: `1.5` and `1.5e3` qualify, `1e3` is a string.
fn dotted_float_lit(input: &str) -> PResult<'_, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(tuple((digit1, char('.'), digit0))),
            recognize(pair(char('.'), digit1)),
        )),
        exponent,
    )))(input)
}

fn exponent(input: &str) -> PResult<'_, &str> {
    recognize(opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))))(input)
}

// Parse a single 0 or a signed run of digits. Leading zeros are accepted,
// matching the game's integer patterns.
fn decimal(input: &str) -> PResult<'_, &str> {
    recognize(pair(opt(one_of("+-")), digit1))(input)
}

fn quoted_string(input: &str) -> PResult<'_, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c @ ('"' | '\''))) => c,
        _ => return Failure::fail(ErrorKind::ExpectedValue, input, "expected a quoted string"),
    };

    let mut out = String::new();
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            if c == quote || c == '\\' {
                out.push(c);
                escaped = false;
            } else {
                return Failure::fail(
                    ErrorKind::Other,
                    &input[i..],
                    format!("invalid escape sequence '\\{c}'"),
                );
            }
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok((&input[i + c.len_utf8()..], out));
        } else {
            out.push(c);
        }
    }
    Failure::fail(ErrorKind::UnexpectedEof, "", "unterminated quoted string")
}

fn key(input: &str) -> PResult<'_, String> {
    match input.chars().next() {
        Some('"') | Some('\'') => quoted_string(input),
        Some(c) if is_token_char(c) => map(token, str::to_owned)(input),
        _ => Failure::fail(ErrorKind::ExpectedKey, input, "expected a key"),
    }
}

fn compound(input: &str) -> PResult<'_, Compound> {
    let (input, _) = char('{')(input)?;
    let (mut input, _) = multispace0(input)?;

    let mut out = Compound::new();
    if let Some(rest) = input.strip_prefix('}') {
        return Ok((rest, out));
    }

    loop {
        let (rest, entry_key) = key(input)?;
        let (rest, _) = multispace0(rest)?;
        let rest = match rest.strip_prefix(':') {
            Some(rest) => rest,
            None => {
                return Failure::fail(ErrorKind::ExpectedColon, rest, "expected ':' after a key")
            }
        };
        let (rest, entry_value) = preceded(multispace0, value)(rest)?;
        out.insert(entry_key, entry_value);

        let (rest, _) = multispace0(rest)?;
        if let Some(rest) = rest.strip_prefix(',') {
            let (rest, _) = multispace0(rest)?;
            input = rest;
        } else if let Some(rest) = rest.strip_prefix('}') {
            return Ok((rest, out));
        } else {
            return Failure::fail(ErrorKind::Other, rest, "expected ',' or '}' in a compound");
        }
    }
}

fn bracketed(input: &str) -> PResult<'_, Value> {
    let (after_open, _) = char('[')(input)?;

    // An array is told apart from a list by a single character directly
    // followed by ';', as in `[B;`. No whitespace before the semicolon.
    let bytes = after_open.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b';' && bytes[0].is_ascii_alphanumeric() {
        let element = match bytes[0] {
            b'B' => Tag::Byte,
            b'I' => Tag::Int,
            b'L' => Tag::Long,
            prefix => {
                return Failure::fail(
                    ErrorKind::InvalidArrayPrefix,
                    after_open,
                    format!("invalid array prefix '{}'", prefix as char),
                )
            }
        };
        return array_elements(&after_open[2..], element);
    }

    list_elements(after_open)
}

fn array_elements(input: &str, element: Tag) -> PResult<'_, Value> {
    let (mut input, _) = multispace0(input)?;
    let mut values = Vec::new();

    if !input.starts_with(']') {
        loop {
            let (rest, element_token) = match token(input) {
                Ok(parsed) => parsed,
                Err(_) => {
                    return Failure::fail(
                        ErrorKind::ExpectedValue,
                        input,
                        "expected a number in an array",
                    )
                }
            };
            let parsed = classify_token(element_token);
            if parsed.tag() != element {
                return Failure::fail(
                    ErrorKind::MixedArrayTypes,
                    input,
                    format!(
                        "array of {} cannot hold {}",
                        element.name(),
                        parsed.tag().name()
                    ),
                );
            }
            values.push(parsed);

            let (rest, _) = multispace0(rest)?;
            if let Some(rest) = rest.strip_prefix(',') {
                let (rest, _) = multispace0(rest)?;
                input = rest;
            } else if rest.starts_with(']') {
                input = rest;
                break;
            } else {
                return Failure::fail(ErrorKind::Other, rest, "expected ',' or ']' in an array");
            }
        }
    }
    let input = &input[1..]; // the ']'

    let value = match element {
        Tag::Byte => Value::ByteArray(values.iter().filter_map(Value::as_byte).collect()),
        Tag::Int => Value::IntArray(values.iter().filter_map(Value::as_int).collect()),
        Tag::Long => Value::LongArray(values.iter().filter_map(Value::as_long).collect()),
        _ => unreachable!("array prefixes map to Byte, Int or Long"),
    };
    Ok((input, value))
}

fn list_elements(input: &str) -> PResult<'_, Value> {
    let (mut input, _) = multispace0(input)?;
    let mut list = List::new();

    if let Some(rest) = input.strip_prefix(']') {
        return Ok((rest, Value::List(list)));
    }

    loop {
        let (rest, element) = value(input)?;
        if !list.is_empty() && list.element_tag() != element.tag() {
            return Failure::fail(
                ErrorKind::MixedListTypes,
                input,
                format!(
                    "list of {} cannot hold {}",
                    list.element_tag().name(),
                    element.tag().name()
                ),
            );
        }
        // Cannot mismatch: the tag was just checked against the lock.
        list.push_any(element);

        let (rest, _) = multispace0(rest)?;
        if let Some(rest) = rest.strip_prefix(',') {
            let (rest, _) = multispace0(rest)?;
            input = rest;
        } else if let Some(rest) = rest.strip_prefix(']') {
            return Ok((rest, Value::List(list)));
        } else {
            return Failure::fail(ErrorKind::Other, rest, "expected ',' or ']' in a list");
        }
    }
}
