use super::builder::Builder;
use crate::error::{ErrorKind, Result};
use crate::{from_bytes, from_gzip_reader, named_from_reader, Accounter, Tag, Value};

#[test]
fn scalars_in_a_compound() -> Result<()> {
    let payload = Builder::new()
        .start_compound("")
        .byte("a byte", -5)
        .short("a short", 1234)
        .int("an int", 50345)
        .long("a long", i32::MAX as i64 + 1)
        .float("a float", 1.25)
        .double("a double", 1.23456)
        .string("a string", "something")
        .end_compound()
        .build();

    let value = from_bytes(&payload, &mut Accounter::bounded(1024))?;
    let compound = value.as_compound().unwrap();

    assert_eq!(compound.get_byte("a byte"), -5);
    assert_eq!(compound.get_short("a short"), 1234);
    assert_eq!(compound.get_int("an int"), 50345);
    assert_eq!(compound.get_long("a long"), i32::MAX as i64 + 1);
    assert_eq!(compound.get_float("a float"), 1.25);
    assert_eq!(compound.get_double("a double"), 1.23456);
    assert_eq!(compound.get_str("a string"), "something");
    Ok(())
}

#[test]
fn root_can_be_any_non_end_tag() -> Result<()> {
    let payload = Builder::new()
        .tag(Tag::Int)
        .name("lonely")
        .int_payload(42)
        .build();

    let (name, value) = named_from_reader(payload.as_slice(), &mut Accounter::bounded(64))?;
    assert_eq!(name, "lonely");
    assert_eq!(value, Value::Int(42));
    Ok(())
}

#[test]
fn root_end_tag_is_a_format_error() {
    let payload = Builder::new().tag(Tag::End).build();
    let err = from_bytes(&payload, &mut Accounter::bounded(64)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn unknown_tag_byte_is_a_format_error() {
    let payload = Builder::new()
        .start_compound("")
        .raw_bytes(&[13])
        .build();
    let err = from_bytes(&payload, &mut Accounter::bounded(64)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn truncated_input_is_eof() {
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::Long)
        .name("cut off")
        .build();
    let err = from_bytes(&payload, &mut Accounter::bounded(64)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn nested_compounds() -> Result<()> {
    let payload = Builder::new()
        .start_compound("outer")
        .start_compound("inner")
        .byte("somebyte", 123)
        .end_compound()
        .byte("extra", 3)
        .end_compound()
        .build();

    let (name, value) = named_from_reader(payload.as_slice(), &mut Accounter::bounded(1024))?;
    assert_eq!(name, "outer");

    let outer = value.as_compound().unwrap();
    assert_eq!(outer.get_byte("extra"), 3);
    assert_eq!(outer.compound("inner")?.get_byte("somebyte"), 123);
    Ok(())
}

#[test]
fn arrays_round_home() -> Result<()> {
    let payload = Builder::new()
        .start_compound("")
        .byte_array("bytes", &[-1, 2, 3])
        .int_array("ints", &[1, i32::MIN, i32::MAX])
        .long_array("longs", &[1, i64::MIN, i64::MAX])
        .end_compound()
        .build();

    let value = from_bytes(&payload, &mut Accounter::bounded(1024))?;
    let compound = value.as_compound().unwrap();

    assert_eq!(compound.get_byte_array("bytes"), &[-1, 2, 3]);
    assert_eq!(compound.get_int_array("ints"), &[1, i32::MIN, i32::MAX]);
    assert_eq!(compound.get_long_array("longs"), &[1, i64::MIN, i64::MAX]);
    Ok(())
}

#[test]
fn list_of_bytes_locks_element_tag() -> Result<()> {
    let payload = Builder::new()
        .start_compound("")
        .start_list("list", Tag::Byte, 3)
        .byte_payload(1)
        .byte_payload(2)
        .byte_payload(3)
        .end_compound()
        .build();

    let value = from_bytes(&payload, &mut Accounter::bounded(1024))?;
    let list = value.as_compound().unwrap().list("list")?;

    assert_eq!(list.element_tag(), Tag::Byte);
    assert_eq!(list.len(), 3);
    assert_eq!(list.get(2), Some(&Value::Byte(3)));
    Ok(())
}

#[test]
fn empty_list_decodes_with_unset_element_tag() -> Result<()> {
    // Writers vary in what element tag they put on an empty list; either
    // way the decoded list is unlocked.
    for element in [Tag::End, Tag::Byte] {
        let payload = Builder::new()
            .start_compound("")
            .start_list("empty", element, 0)
            .end_compound()
            .build();

        let value = from_bytes(&payload, &mut Accounter::bounded(1024))?;
        let list = value.as_compound().unwrap().list("empty")?;
        assert_eq!(list.element_tag(), Tag::End);
        assert!(list.is_empty());
    }
    Ok(())
}

#[test]
fn nonempty_list_of_end_is_a_format_error() {
    let payload = Builder::new()
        .start_compound("")
        .start_list("bad", Tag::End, 3)
        .end_compound()
        .build();
    let err = from_bytes(&payload, &mut Accounter::bounded(1024)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn negative_array_length_is_a_format_error() {
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::ByteArray)
        .name("bad")
        .int_payload(-1)
        .end_compound()
        .build();
    let err = from_bytes(&payload, &mut Accounter::bounded(1024)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn usage_equals_wire_size() -> Result<()> {
    let payload = Builder::new()
        .start_compound("root")
        .int("x", 1)
        .string("s", "naïve")
        .byte_array("arr", &[1, 2, 3, 4])
        .end_compound()
        .build();

    let mut acct = Accounter::bounded(1 << 16);
    from_bytes(&payload, &mut acct)?;
    assert_eq!(acct.usage(), payload.len() as u64);
    Ok(())
}

// A crafted stream claims an enormous array against a small quota. The
// decode must die on the quota check before trying to allocate the claim.
#[test]
fn huge_claimed_array_fails_before_allocation() {
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::ByteArray)
        .name("bomb")
        .int_payload(i32::MAX)
        .end_compound()
        .build();

    let err = from_bytes(&payload, &mut Accounter::bounded(1024)).unwrap_err();
    assert!(err.is_quota_exceeded());
}

#[test]
fn huge_claimed_long_array_fails_before_allocation() {
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::LongArray)
        .name("bomb")
        .int_payload(i32::MAX)
        .end_compound()
        .build();

    let err = from_bytes(&payload, &mut Accounter::bounded(1024)).unwrap_err();
    assert!(err.is_quota_exceeded());
}

#[test]
fn quota_bounds_total_size_not_single_values() {
    // Many small strings: each is fine alone, together they pass the quota.
    let mut builder = Builder::new().start_compound("");
    for i in 0..100 {
        builder = builder.string(&format!("key{i}"), "0123456789");
    }
    let payload = builder.end_compound().build();

    let err = from_bytes(&payload, &mut Accounter::bounded(256)).unwrap_err();
    assert!(err.is_quota_exceeded());

    assert!(from_bytes(&payload, &mut Accounter::bounded(1 << 16)).is_ok());
}

fn nested_compounds_payload(depth: usize) -> Vec<u8> {
    let mut builder = Builder::new().start_compound("");
    for _ in 1..depth {
        builder = builder.start_compound("deeper");
    }
    for _ in 0..depth {
        builder = builder.end_compound();
    }
    builder.build()
}

#[test]
fn depth_cap_enforced_exactly() {
    let payload = nested_compounds_payload(6);

    // Cap below the nesting fails, cap at the nesting succeeds.
    let err = from_bytes(&payload, &mut Accounter::with_depth(1 << 16, 5)).unwrap_err();
    assert!(err.is_depth_exceeded());

    assert!(from_bytes(&payload, &mut Accounter::with_depth(1 << 16, 6)).is_ok());
}

#[test]
fn default_depth_cap_stops_a_deep_bomb() {
    let payload = nested_compounds_payload(600);
    let err = from_bytes(&payload, &mut Accounter::unbounded()).unwrap_err();
    assert!(err.is_depth_exceeded());
}

#[test]
fn gzip_decode_applies_quota_to_decompressed_bytes() {
    // A megabyte of zeros compresses to almost nothing; the quota must
    // still see the decompressed size.
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::ByteArray)
        .name("zeros")
        .int_payload(1 << 20)
        .raw_bytes(&vec![0u8; 1 << 20])
        .end_compound()
        .build_gzip();
    assert!(payload.len() < 8 * 1024, "gzip should crush zeros");

    let err = from_gzip_reader(payload.as_slice(), &mut Accounter::bounded(1024)).unwrap_err();
    assert!(err.is_quota_exceeded());

    // The same data is fine when the caller allows its true size.
    let value = from_gzip_reader(payload.as_slice(), &mut Accounter::bounded(2 << 20)).unwrap();
    let compound = value.as_compound().unwrap();
    assert_eq!(compound.get_byte_array("zeros").len(), 1 << 20);
}

#[test]
fn cesu8_string_decodes() -> Result<()> {
    // Unicode outside the basic plane has a different wire form than UTF-8.
    let encoded = cesu8::to_java_cesu8("😈");
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::String)
        .name("emoji")
        .raw_bytes(&(encoded.len() as u16).to_be_bytes())
        .raw_bytes(&encoded)
        .end_compound()
        .build();

    let value = from_bytes(&payload, &mut Accounter::bounded(1024))?;
    assert_eq!(value.as_compound().unwrap().get_str("emoji"), "😈");
    Ok(())
}

#[test]
fn invalid_unicode_in_string_is_a_format_error() {
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::String)
        .name("bad")
        .raw_bytes(&3u16.to_be_bytes())
        .raw_bytes(&[0xff, 0xff, 0xff])
        .end_compound()
        .build();

    let err = from_bytes(&payload, &mut Accounter::bounded(1024)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}
