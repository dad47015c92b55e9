use strictnbt::{Tag, Value};

use crate::error::{ErrorKind, Result};
use crate::{from_str, value_from_str};

#[test]
fn compound_with_mixed_entries() -> Result<()> {
    let compound = from_str(r#"{x: 1b, y: "hi", z: [1,2,3]}"#)?;

    assert_eq!(compound.get("x"), Some(&Value::Byte(1)));
    assert_eq!(compound.get("y"), Some(&Value::String("hi".to_owned())));

    let z = compound.list("z").unwrap();
    assert_eq!(z.element_tag(), Tag::Int);
    assert_eq!(z.len(), 3);
    assert_eq!(z.get(2), Some(&Value::Int(3)));
    Ok(())
}

#[test]
fn root_must_be_a_compound() {
    let err = from_str("[1, 2]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExpectedValue);

    // The general entry point takes any value.
    assert!(value_from_str("[1, 2]").is_ok());
}

#[test]
fn numeric_suffixes() -> Result<()> {
    let compound = from_str("{a: 1b, b: 2S, c: 3L, d: 4, e: 1.5f, f: 2.5d, g: 6d}")?;
    assert_eq!(compound.get("a"), Some(&Value::Byte(1)));
    assert_eq!(compound.get("b"), Some(&Value::Short(2)));
    assert_eq!(compound.get("c"), Some(&Value::Long(3)));
    assert_eq!(compound.get("d"), Some(&Value::Int(4)));
    assert_eq!(compound.get("e"), Some(&Value::Float(1.5)));
    assert_eq!(compound.get("f"), Some(&Value::Double(2.5)));
    // The d suffix makes a double even without a decimal point.
    assert_eq!(compound.get("g"), Some(&Value::Double(6.0)));
    Ok(())
}

#[test]
fn unsuffixed_literals() -> Result<()> {
    let compound = from_str("{int: -17, double: -0.5, exp: 1.5e3, trailing: 2.}")?;
    assert_eq!(compound.get("int"), Some(&Value::Int(-17)));
    assert_eq!(compound.get("double"), Some(&Value::Double(-0.5)));
    assert_eq!(compound.get("exp"), Some(&Value::Double(1500.0)));
    assert_eq!(compound.get("trailing"), Some(&Value::Double(2.0)));
    Ok(())
}

#[test]
fn booleans_are_bytes() -> Result<()> {
    let compound = from_str("{yes: true, no: false}")?;
    assert_eq!(compound.get("yes"), Some(&Value::Byte(1)));
    assert_eq!(compound.get("no"), Some(&Value::Byte(0)));
    Ok(())
}

#[test]
fn barewords_that_only_look_numeric_are_strings() -> Result<()> {
    let compound = from_str("{a: 1before, b: 1e5, c: 1.2.3, d: 128b, e: truest}")?;
    // A numeric prefix must not be split off a longer bareword.
    assert_eq!(compound.get_str("a"), "1before");
    // No decimal point and no suffix: not a double.
    assert_eq!(compound.get_str("b"), "1e5");
    assert_eq!(compound.get_str("c"), "1.2.3");
    // Overflows i8, falls back to a string like the game does.
    assert_eq!(compound.get_str("d"), "128b");
    assert_eq!(compound.get_str("e"), "truest");
    Ok(())
}

#[test]
fn nonfinite_floats_need_a_suffix() -> Result<()> {
    let compound = from_str("{a: Infinityd, b: -infd, c: NaNf, d: nan}")?;
    assert_eq!(compound.get_double("a"), f64::INFINITY);
    assert_eq!(compound.get_double("b"), f64::NEG_INFINITY);
    assert!(compound.get_float("c").is_nan());
    // Without a suffix it is just a word.
    assert_eq!(compound.get_str("d"), "nan");
    Ok(())
}

#[test]
fn quoted_strings_and_escapes() -> Result<()> {
    let compound = from_str(
        r#"{plain: "text", single: 'sq', escaped: "a \"quote\" and \\ slash", nested: 'it"s'}"#,
    )?;
    assert_eq!(compound.get_str("plain"), "text");
    assert_eq!(compound.get_str("single"), "sq");
    assert_eq!(compound.get_str("escaped"), r#"a "quote" and \ slash"#);
    // A double quote inside single quotes needs no escape.
    assert_eq!(compound.get_str("nested"), "it\"s");
    Ok(())
}

#[test]
fn quoted_numbers_stay_strings() -> Result<()> {
    let compound = from_str(r#"{n: "1b", t: "true"}"#)?;
    assert_eq!(compound.get_str("n"), "1b");
    assert_eq!(compound.get_str("t"), "true");
    Ok(())
}

#[test]
fn quoted_keys() -> Result<()> {
    let compound = from_str(r#"{"key with spaces": 1, 'and:colon': 2}"#)?;
    assert_eq!(compound.get_int("key with spaces"), 1);
    assert_eq!(compound.get_int("and:colon"), 2);
    Ok(())
}

#[test]
fn invalid_escape_is_an_error() {
    assert!(from_str(r#"{bad: "\n"}"#).is_err());
}

#[test]
fn arrays() -> Result<()> {
    let compound = from_str("{b: [B;1b,2b], i: [I; 1, -2, 3], l: [L; 1L], empty: [I;]}")?;
    assert_eq!(compound.get_byte_array("b"), &[1, 2]);
    assert_eq!(compound.get_int_array("i"), &[1, -2, 3]);
    assert_eq!(compound.get_long_array("l"), &[1]);
    assert_eq!(compound.get_int_array("empty"), &[] as &[i32]);
    Ok(())
}

#[test]
fn array_element_of_wrong_type_is_mixed_array_error() {
    let err = from_str("{b: [B; 1b, 2s]}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MixedArrayTypes);
    let msg = err.to_string();
    assert!(msg.contains("Byte"), "message was: {msg}");
    assert!(msg.contains("Short"), "message was: {msg}");

    // An unsuffixed int is not a byte either.
    let err = from_str("{b: [B; 1]}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MixedArrayTypes);
}

#[test]
fn unknown_array_prefix_is_an_error() {
    let err = from_str("{x: [X; 1]}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArrayPrefix);
}

#[test]
fn mixed_list_types_is_an_error() {
    let err = from_str(r#"{l: [1, 2, "three"]}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MixedListTypes);
    let msg = err.to_string();
    assert!(msg.contains("Int"), "message was: {msg}");
    assert!(msg.contains("String"), "message was: {msg}");
}

#[test]
fn lists_of_lists_and_compounds() -> Result<()> {
    let compound = from_str("{ll: [[1, 2], []], lc: [{a: 1}, {}]}")?;

    let ll = compound.list("ll").unwrap();
    assert_eq!(ll.element_tag(), Tag::List);
    assert_eq!(ll.get(0).unwrap().as_list().unwrap().len(), 2);
    assert!(ll.get(1).unwrap().as_list().unwrap().is_empty());

    let lc = compound.list("lc").unwrap();
    assert_eq!(lc.element_tag(), Tag::Compound);
    assert_eq!(lc.get(0).unwrap().as_compound().unwrap().get_int("a"), 1);
    Ok(())
}

#[test]
fn trailing_data_is_an_error() {
    let err = from_str("{a: 1} extra").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TrailingData);

    // Trailing whitespace is fine.
    assert!(from_str("  {a: 1}  \n").is_ok());
}

#[test]
fn missing_pieces_have_precise_kinds() {
    assert_eq!(
        from_str("{a 1}").unwrap_err().kind(),
        ErrorKind::ExpectedColon
    );
    assert_eq!(
        from_str("{a: }").unwrap_err().kind(),
        ErrorKind::ExpectedValue
    );
    assert_eq!(
        from_str("{a: 1, }").unwrap_err().kind(),
        ErrorKind::ExpectedKey
    );
    assert_eq!(from_str("").unwrap_err().kind(), ErrorKind::ExpectedValue);
}

#[test]
fn whitespace_everywhere() -> Result<()> {
    let compound = from_str("  {  a  :  1  ,  b  :  [  1b  ,  2b  ]  }  ")?;
    assert_eq!(compound.get_int("a"), 1);
    assert_eq!(compound.list("b").unwrap().len(), 2);
    Ok(())
}

#[test]
fn empty_containers() -> Result<()> {
    let compound = from_str("{c: {}, l: []}")?;
    assert!(compound.compound("c").unwrap().is_empty());
    let l = compound.list("l").unwrap();
    assert!(l.is_empty());
    assert_eq!(l.element_tag(), Tag::End);
    Ok(())
}

#[test]
fn value_from_str_accepts_scalars() -> Result<()> {
    assert_eq!(value_from_str("5s")?, Value::Short(5));
    assert_eq!(value_from_str(" bare_word ")?, Value::String("bare_word".to_owned()));
    assert_eq!(value_from_str("'quoted'")?, Value::String("quoted".to_owned()));
    Ok(())
}

#[test]
fn unterminated_string_is_eof() {
    let err = from_str(r#"{a: "never ends}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}
