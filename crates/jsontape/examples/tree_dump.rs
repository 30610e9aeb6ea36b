//! Parse a small document and print the shape of its tape.

use jsontape::{parse, Allocation, Value, ValueType};

fn main() {
    let mut text =
        br#"{"pkg":"jsontape","deps":[{"name":"thiserror"}],"mix":[1,2.5,"three",true,null]}"#
            .to_vec();
    let doc = parse(Allocation::Dynamic, &mut text).expect("example document is valid");
    dump(&doc.root(), 0);
}

fn dump(value: &Value, depth: usize) {
    let pad = "  ".repeat(depth);
    match value.value_type() {
        ValueType::Integer => println!("{pad}integer {}", value.integer_value()),
        ValueType::Double => println!("{pad}double {}", value.double_value()),
        ValueType::Null => println!("{pad}null"),
        ValueType::False => println!("{pad}false"),
        ValueType::True => println!("{pad}true"),
        ValueType::String => println!("{pad}string {:?}", value.as_str()),
        ValueType::Array => {
            println!("{pad}array of {}", value.length());
            for index in 0..value.length() {
                dump(&value.array_element(index), depth + 1);
            }
        }
        ValueType::Object => {
            println!("{pad}object of {}", value.length());
            for index in 0..value.length() {
                println!("{pad}  {:?}:", value.object_key(index));
                dump(&value.object_value(index), depth + 2);
            }
        }
    }
}
