use crate::{tests::utils::parse_both, ValueType};

#[test]
fn empty_array() {
    parse_both("[]", |doc| {
        let root = doc.root();
        assert_eq!(root.value_type(), ValueType::Array);
        assert_eq!(root.length(), 0);
    });
}

#[test]
fn array_whitespace() {
    parse_both(" [ ] ", |doc| {
        let root = doc.root();
        assert_eq!(root.value_type(), ValueType::Array);
        assert_eq!(root.length(), 0);
    });
}

#[test]
fn array_zero() {
    parse_both("[0]", |doc| {
        let root = doc.root();
        assert_eq!(root.length(), 1);
        let element = root.array_element(0);
        assert_eq!(element.value_type(), ValueType::Integer);
        assert_eq!(element.integer_value(), 0);
        assert_eq!(element.number_value(), 0.0);
    });
}

#[test]
fn nested_array() {
    parse_both("[[]]", |doc| {
        let root = doc.root();
        assert_eq!(root.length(), 1);
        let inner = root.array_element(0);
        assert_eq!(inner.value_type(), ValueType::Array);
        assert_eq!(inner.length(), 0);
    });
}

#[test]
fn packed_arrays() {
    parse_both("[0,[0,[0],0],0]", |doc| {
        let root = doc.root();
        assert_eq!(root.value_type(), ValueType::Array);
        assert_eq!(root.length(), 3);
        assert_eq!(root.array_element(0).integer_value(), 0);
        assert_eq!(root.array_element(2).integer_value(), 0);

        let middle = root.array_element(1);
        assert_eq!(middle.value_type(), ValueType::Array);
        assert_eq!(middle.length(), 3);
        assert_eq!(middle.array_element(0).integer_value(), 0);
        assert_eq!(middle.array_element(2).integer_value(), 0);

        let inner = middle.array_element(1);
        assert_eq!(inner.value_type(), ValueType::Array);
        assert_eq!(inner.length(), 1);
        assert_eq!(inner.array_element(0).integer_value(), 0);
    });
}

#[test]
fn deep_nesting() {
    parse_both("[[[[]]]]", |doc| {
        let mut value = doc.root();
        for _ in 0..3 {
            assert_eq!(value.value_type(), ValueType::Array);
            assert_eq!(value.length(), 1);
            value = value.array_element(0);
        }
        assert_eq!(value.value_type(), ValueType::Array);
        assert_eq!(value.length(), 0);
    });
}

#[test]
fn deeply_nested_integer() {
    parse_both("[[[[0]]]]", |doc| {
        let mut value = doc.root();
        for _ in 0..4 {
            assert_eq!(value.value_type(), ValueType::Array);
            assert_eq!(value.length(), 1);
            value = value.array_element(0);
        }
        assert_eq!(value.value_type(), ValueType::Integer);
        assert_eq!(value.integer_value(), 0);
    });
}

#[test]
fn very_deep_nesting_does_not_recurse() {
    let mut text = alloc::string::String::new();
    for _ in 0..10_000 {
        text.push('[');
    }
    for _ in 0..10_000 {
        text.push(']');
    }
    parse_both(&text, |doc| {
        let mut value = doc.root();
        while value.length() == 1 {
            value = value.array_element(0);
        }
        assert_eq!(value.length(), 0);
    });
}

#[test]
fn negative_and_positive_integers() {
    parse_both(" [ 0, -1, 22] ", |doc| {
        let root = doc.root();
        assert_eq!(root.length(), 3);
        for (index, expected) in [0, -1, 22].into_iter().enumerate() {
            let element = root.array_element(index);
            assert_eq!(element.value_type(), ValueType::Integer);
            assert_eq!(element.integer_value(), expected);
            assert_eq!(element.number_value(), f64::from(expected));
        }
    });
}

#[test]
fn integers() {
    parse_both("[0,1,2,3,4,5,6,7,8,9,10]", |doc| {
        let root = doc.root();
        assert_eq!(root.length(), 11);
        for index in 0..11 {
            let element = root.array_element(index);
            assert_eq!(element.value_type(), ValueType::Integer);
            assert_eq!(element.integer_value(), index as i32);
        }
    });
}

#[test]
fn integer_whitespace() {
    parse_both(" [ 0 , 0 ] ", |doc| {
        let root = doc.root();
        assert_eq!(root.length(), 2);
        assert_eq!(root.array_element(1).integer_value(), 0);
    });
}

#[test]
fn unit_types() {
    parse_both("[ true , false , null ]", |doc| {
        let root = doc.root();
        assert_eq!(root.length(), 3);
        assert_eq!(root.array_element(0).value_type(), ValueType::True);
        assert_eq!(root.array_element(1).value_type(), ValueType::False);
        assert_eq!(root.array_element(2).value_type(), ValueType::Null);
    });
}

#[test]
fn negative_numbers() {
    parse_both("[-0,-1,-34.25]", |doc| {
        let root = doc.root();
        assert_eq!(root.length(), 3);
        assert_eq!(root.array_element(0).value_type(), ValueType::Integer);
        assert_eq!(root.array_element(0).integer_value(), 0);
        assert_eq!(root.array_element(1).integer_value(), -1);
        let fractional = root.array_element(2);
        assert_eq!(fractional.value_type(), ValueType::Double);
        assert_eq!(fractional.double_value(), -34.25);
    });
}

#[test]
fn exponents() {
    parse_both("[2e+3,0.5E-5,10E+22]", |doc| {
        let root = doc.root();
        assert_eq!(root.length(), 3);

        let first = root.array_element(0);
        assert_eq!(first.value_type(), ValueType::Double);
        assert_eq!(first.double_value(), 2000.0);

        let second = root.array_element(1);
        assert_eq!(second.value_type(), ValueType::Double);
        assert!((second.double_value() - 5e-6).abs() < 1e-20);

        let third = root.array_element(2);
        assert_eq!(third.value_type(), ValueType::Double);
        assert_eq!(third.double_value(), 10e22);
    });
}

#[test]
fn long_integers_become_doubles() {
    parse_both("[9999999999,99999999999]", |doc| {
        let root = doc.root();
        let first = root.array_element(0);
        assert_eq!(first.value_type(), ValueType::Double);
        assert_eq!(first.double_value(), 9999999999.0);
        let second = root.array_element(1);
        assert_eq!(second.value_type(), ValueType::Double);
        assert_eq!(second.double_value(), 99999999999.0);
    });
}

#[test]
fn inline_integer_boundary() {
    parse_both("[268435455,268435456,-268435456,-268435457]", |doc| {
        let root = doc.root();

        let max_inline = root.array_element(0);
        assert_eq!(max_inline.value_type(), ValueType::Integer);
        assert_eq!(max_inline.integer_value(), 268_435_455);

        let past_max = root.array_element(1);
        assert_eq!(past_max.value_type(), ValueType::Double);
        assert_eq!(past_max.double_value(), 268_435_456.0);

        let min_inline = root.array_element(2);
        assert_eq!(min_inline.value_type(), ValueType::Integer);
        assert_eq!(min_inline.integer_value(), -268_435_456);

        let past_min = root.array_element(3);
        assert_eq!(past_min.value_type(), ValueType::Double);
        assert_eq!(past_min.double_value(), -268_435_457.0);
    });
}

#[test]
fn exponent_offset() {
    parse_both("[0.005e3]", |doc| {
        let element = doc.root().array_element(0);
        assert_eq!(element.value_type(), ValueType::Double);
        assert_eq!(element.double_value(), 5.0);
    });
}

#[test]
fn fraction_without_digits() {
    parse_both("[0.]", |doc| {
        let element = doc.root().array_element(0);
        assert_eq!(element.value_type(), ValueType::Double);
        assert_eq!(element.double_value(), 0.0);
    });
    parse_both("[1.]", |doc| {
        assert_eq!(doc.root().array_element(0).double_value(), 1.0);
    });
}

#[test]
fn numbers_across_lines() {
    parse_both("[\n 1,\r\n 2\n]", |doc| {
        let root = doc.root();
        assert_eq!(root.length(), 2);
        assert_eq!(root.array_element(0).integer_value(), 1);
        assert_eq!(root.array_element(1).integer_value(), 2);
    });
}

#[test]
fn strings() {
    parse_both(r#"["", "foobar"]"#, |doc| {
        let root = doc.root();
        assert_eq!(root.length(), 2);

        let empty = root.array_element(0);
        assert_eq!(empty.value_type(), ValueType::String);
        assert_eq!(empty.string_length(), 0);
        assert_eq!(empty.as_str(), "");

        let word = root.array_element(1);
        assert_eq!(word.value_type(), ValueType::String);
        assert_eq!(word.string_length(), 6);
        assert_eq!(word.as_str(), "foobar");
    });
}

#[test]
fn common_escapes() {
    parse_both(r#"["\"\\\/\b\f\n\r\t"]"#, |doc| {
        let element = doc.root().array_element(0);
        assert_eq!(element.value_type(), ValueType::String);
        assert_eq!(element.string_length(), 8);
        assert_eq!(element.as_str(), "\"\\/\u{8}\u{c}\n\r\t");
    });
}

#[test]
fn escape_midstring() {
    parse_both(r#"["foo\tbar"]"#, |doc| {
        let element = doc.root().array_element(0);
        assert_eq!(element.string_length(), 7);
        assert_eq!(element.as_str(), "foo\tbar");
    });
}

#[test]
fn unicode_escapes() {
    parse_both(r#"["\u0041\u00e9\u20AC"]"#, |doc| {
        let element = doc.root().array_element(0);
        assert_eq!(element.as_str(), "A\u{e9}\u{20ac}");
        assert_eq!(element.string_length(), 6);
    });
}

#[test]
fn escaped_nul_byte() {
    parse_both(r#"["\u0000"]"#, |doc| {
        let element = doc.root().array_element(0);
        assert_eq!(element.as_bytes(), [0]);
        assert_eq!(element.string_length(), 1);
    });
}

#[test]
fn utf16_surrogate_pair() {
    parse_both(r#"["\ud950\uDf21"]"#, |doc| {
        let element = doc.root().array_element(0);
        assert_eq!(element.value_type(), ValueType::String);
        assert_eq!(element.string_length(), 4);
        assert_eq!(element.as_bytes(), [0xF1, 0xA4, 0x8C, 0xA1]);
        assert_eq!(element.as_str(), "\u{64321}");
    });
}

#[test]
fn multibyte_after_escape_shifts_in_place() {
    // An escape shrinks by one byte, so every following multi-byte sequence
    // is copied one position back in the buffer.
    parse_both("[\"\\n\u{80}\u{800}\u{10000}\"]", |doc| {
        let element = doc.root().array_element(0);
        assert_eq!(element.string_length(), 10);
        assert_eq!(element.as_str(), "\n\u{80}\u{800}\u{10000}");
    });
}

#[test]
fn object_array_with_integers() {
    parse_both(r#"[{ "a": 123456 }, { "a": 7890 }]"#, |doc| {
        let root = doc.root();
        assert_eq!(root.length(), 2);

        let first = root.array_element(0);
        assert_eq!(first.value_type(), ValueType::Object);
        let index = first.find_object_key("a");
        let value = first.object_value(index);
        assert_eq!(value.value_type(), ValueType::Integer);
        assert_eq!(value.number_value(), 123456.0);

        let second = root.array_element(1);
        let index = second.find_object_key("a");
        assert_eq!(second.object_value(index).number_value(), 7890.0);
    });
}
