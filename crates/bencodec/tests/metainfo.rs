//! End-to-end walk over a realistic metainfo-style document.

use bencodec::{decode_value, decode_view, encode, Pointer, Value};

const METAINFO: &[u8] = b"d8:announce30:http://tracker.example.com/ann7:comment8:for test4:infod6:lengthi170917e4:name8:spam.txt12:piece lengthi65536eee";

#[test]
fn views_navigate_the_document() {
    let table = decode_view(METAINFO).unwrap();
    let root = table.root().as_dict().unwrap();

    let announce = root.get(b"announce").unwrap().as_string().unwrap();
    assert_eq!(announce, "http://tracker.example.com/ann");

    let info = root.get(b"info").unwrap().as_dict().unwrap();
    assert_eq!(info.len(), 3);
    assert_eq!(
        info.get(b"length").unwrap().as_integer().unwrap().value(),
        170_917
    );
    assert_eq!(
        info.get(b"piece length").unwrap().as_integer().unwrap().to::<u32>(),
        Some(65_536)
    );

    // The exact encoded sub-span is addressable without re-encoding.
    assert_eq!(
        root.get(b"info").unwrap().bencoded_view(),
        &b"d6:lengthi170917e4:name8:spam.txt12:piece lengthi65536ee"[..]
    );
}

#[test]
fn pointers_resolve_in_both_representations() {
    let pointer = Pointer::parse("/info/name").unwrap();

    let table = decode_view(METAINFO).unwrap();
    let from_view = pointer.evaluate(table.root()).unwrap();
    assert_eq!(from_view.as_string().unwrap(), "spam.txt");

    let value = decode_value(METAINFO).unwrap();
    let from_value = pointer.evaluate(&value).unwrap();
    assert_eq!(from_value, &Value::string("spam.txt"));

    assert!(pointer.contains(table.root()));
    assert!(!Pointer::parse("/info/missing").unwrap().contains(&value));
}

#[test]
fn reencoding_preserves_canonical_input() {
    let table = decode_view(METAINFO).unwrap();
    assert_eq!(encode(&table.root()), METAINFO);

    let value = decode_value(METAINFO).unwrap();
    assert_eq!(encode(&value), METAINFO);
}
