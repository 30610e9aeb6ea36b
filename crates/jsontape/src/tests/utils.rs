use alloc::vec;

use crate::{parse, Allocation, Document, ParseError, Value, ValueType};

/// Words enough for any document whose text is `len` bytes. The tape never
/// needs more than two words per input byte plus a small constant.
pub(crate) fn word_budget(len: usize) -> usize {
    len * 2 + 16
}

/// Parses `text` with both allocation strategies and hands each document to
/// `check`, the way the reference scenarios are specified.
pub(crate) fn parse_both<F>(text: &str, check: F)
where
    F: for<'i, 'w> Fn(&Document<'i, 'w>),
{
    let mut dynamic_input = text.as_bytes().to_vec();
    let document = parse(Allocation::Dynamic, &mut dynamic_input)
        .unwrap_or_else(|err| panic!("dynamic parse of {text:?} failed: {err}"));
    check(&document);
    drop(document);

    let mut words = vec![0u32; word_budget(text.len())];
    let mut single_input = text.as_bytes().to_vec();
    let document = parse(Allocation::Single(&mut words), &mut single_input)
        .unwrap_or_else(|err| panic!("single-allocation parse of {text:?} failed: {err}"));
    check(&document);
}

/// Parses `text` with both strategies, asserts they fail identically, and
/// returns the error.
pub(crate) fn error_both(text: &[u8]) -> ParseError {
    let mut dynamic_input = text.to_vec();
    let dynamic_error = parse(Allocation::Dynamic, &mut dynamic_input)
        .map(|_| ())
        .expect_err("dynamic parse unexpectedly succeeded");

    let mut words = vec![0u32; word_budget(text.len())];
    let mut single_input = text.to_vec();
    let single_error = parse(Allocation::Single(&mut words), &mut single_input)
        .map(|_| ())
        .expect_err("single-allocation parse unexpectedly succeeded");

    assert_eq!(dynamic_error, single_error);
    dynamic_error
}

/// Recursively asserts two values are the same tree, bit-exact for doubles.
pub(crate) fn assert_same_shape(a: &Value, b: &Value) {
    assert_eq!(a.value_type(), b.value_type());
    match a.value_type() {
        ValueType::Integer => assert_eq!(a.integer_value(), b.integer_value()),
        ValueType::Double => assert_eq!(a.double_value().to_bits(), b.double_value().to_bits()),
        ValueType::String => assert_eq!(a.as_bytes(), b.as_bytes()),
        ValueType::Array => {
            assert_eq!(a.length(), b.length());
            for index in 0..a.length() {
                assert_same_shape(&a.array_element(index), &b.array_element(index));
            }
        }
        ValueType::Object => {
            assert_eq!(a.length(), b.length());
            for index in 0..a.length() {
                assert_eq!(a.object_key(index), b.object_key(index));
                assert_same_shape(&a.object_value(index), &b.object_value(index));
            }
        }
        ValueType::Null | ValueType::False | ValueType::True => {}
    }
}
