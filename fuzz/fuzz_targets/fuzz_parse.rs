//! Differential target: both allocation strategies must agree on every
//! input — same tree on success, same error code and position on failure.
#![no_main]

use jsontape::{parse, Allocation, Value, ValueType};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut dynamic_input = data.to_vec();
    let dynamic = parse(Allocation::Dynamic, &mut dynamic_input);

    let mut words = vec![0u32; data.len() * 2 + 16];
    let mut single_input = data.to_vec();
    let single = parse(Allocation::Single(&mut words), &mut single_input);

    match (&dynamic, &single) {
        (Ok(a), Ok(b)) => assert_same_shape(&a.root(), &b.root()),
        (Err(a), Err(b)) => assert_eq!(a, b),
        (Ok(_), Err(e)) | (Err(e), Ok(_)) => {
            panic!("allocation strategies disagree: one failed with {e}")
        }
    }
});

fn assert_same_shape(a: &Value, b: &Value) {
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
