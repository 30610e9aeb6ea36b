//! The read-side view of one tagged word.

use core::cmp::Ordering;

use crate::tape::{self, ValueType};

/// One JSON value inside a parsed document.
///
/// A `Value` is a copyable view: a tagged word plus the tape and input it
/// indexes into. Accessors for the wrong type panic, as do out-of-range
/// indices; a caller inspects [`Value::value_type`] first.
///
/// # Examples
///
/// ```
/// use jsontape::{parse, Allocation, ValueType};
///
/// let mut text = *b"[1, 2, 3]";
/// let doc = parse(Allocation::Dynamic, &mut text).unwrap();
/// let root = doc.root();
/// assert_eq!(root.value_type(), ValueType::Array);
/// assert_eq!(root.array_element(1).integer_value(), 2);
/// ```
#[derive(Clone, Copy)]
pub struct Value<'doc> {
    word: u32,
    tape: &'doc [u32],
    input: &'doc [u8],
}

impl<'doc> Value<'doc> {
    pub(crate) fn new(word: u32, tape: &'doc [u32], input: &'doc [u8]) -> Self {
        Self { word, tape, input }
    }

    /// The type tag of this value.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        tape::tag_of(self.word)
    }

    /// Element count of an array, entry count of an object.
    ///
    /// # Panics
    ///
    /// Panics when the value is not an array or object.
    #[must_use]
    pub fn length(&self) -> usize {
        assert!(matches!(
            self.value_type(),
            ValueType::Array | ValueType::Object
        ));
        self.tape[tape::index_of(self.word)] as usize
    }

    /// The `index`-th array element.
    ///
    /// # Panics
    ///
    /// Panics when the value is not an array or `index` is out of range.
    #[must_use]
    pub fn array_element(&self, index: usize) -> Value<'doc> {
        assert_eq!(self.value_type(), ValueType::Array);
        assert!(index < self.length());
        let base = tape::index_of(self.word) + 1;
        Value::new(self.tape[base + index], self.tape, self.input)
    }

    /// The `index`-th object key, in sorted order.
    ///
    /// # Panics
    ///
    /// Panics when the value is not an object or `index` is out of range.
    #[must_use]
    pub fn object_key(&self, index: usize) -> &'doc str {
        // SAFETY: the parser validated and, where escaped, re-encoded every
        // string byte range as UTF-8 before emitting it.
        unsafe { core::str::from_utf8_unchecked(self.key_bytes(index)) }
    }

    /// The value paired with the `index`-th object key.
    ///
    /// # Panics
    ///
    /// Panics when the value is not an object or `index` is out of range.
    #[must_use]
    pub fn object_value(&self, index: usize) -> Value<'doc> {
        assert_eq!(self.value_type(), ValueType::Object);
        assert!(index < self.length());
        let base = tape::index_of(self.word) + 1 + 3 * index;
        Value::new(self.tape[base + 2], self.tape, self.input)
    }

    /// Binary-searches the sorted entries for `key`.
    ///
    /// Returns the entry index, or [`Value::length`] when the key is
    /// absent. With duplicate keys the leftmost match wins; duplicates sit
    /// adjacent in input order.
    ///
    /// # Panics
    ///
    /// Panics when the value is not an object.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsontape::{parse, Allocation};
    ///
    /// let mut text = br#"{ "b": 1, "aa": 0 }"#.to_vec();
    /// let doc = parse(Allocation::Dynamic, &mut text).unwrap();
    /// let root = doc.root();
    /// // Shorter keys sort first.
    /// assert_eq!(root.find_object_key("b"), 0);
    /// assert_eq!(root.find_object_key("aa"), 1);
    /// assert_eq!(root.find_object_key("missing"), root.length());
    /// ```
    #[must_use]
    pub fn find_object_key(&self, key: &str) -> usize {
        assert_eq!(self.value_type(), ValueType::Object);
        let needle = key.as_bytes();
        let length = self.length();
        let mut low = 0;
        let mut high = length;
        while low < high {
            let middle = (low + high) / 2;
            if tape::compare_keys(self.key_bytes(middle), needle) == Ordering::Less {
                low = middle + 1;
            } else {
                high = middle;
            }
        }
        if low < length && self.key_bytes(low) == needle {
            low
        } else {
            length
        }
    }

    /// Looks `key` up and returns its value, or `None` when absent.
    ///
    /// # Panics
    ///
    /// Panics when the value is not an object.
    #[must_use]
    pub fn value_of_key(&self, key: &str) -> Option<Value<'doc>> {
        let index = self.find_object_key(key);
        (index < self.length()).then(|| self.object_value(index))
    }

    /// The inline integer.
    ///
    /// # Panics
    ///
    /// Panics when the value is not an integer.
    #[must_use]
    pub fn integer_value(&self) -> i32 {
        assert_eq!(self.value_type(), ValueType::Integer);
        tape::integer_of(self.word)
    }

    /// The stored double.
    ///
    /// # Panics
    ///
    /// Panics when the value is not a double.
    #[must_use]
    pub fn double_value(&self) -> f64 {
        assert_eq!(self.value_type(), ValueType::Double);
        let index = tape::index_of(self.word);
        tape::join_double(self.tape[index], self.tape[index + 1])
    }

    /// The numeric value, whether stored inline or as a double.
    ///
    /// # Panics
    ///
    /// Panics when the value is not a number.
    #[must_use]
    pub fn number_value(&self) -> f64 {
        match self.value_type() {
            ValueType::Integer => f64::from(self.integer_value()),
            _ => self.double_value(),
        }
    }

    /// The decoded string.
    ///
    /// # Panics
    ///
    /// Panics when the value is not a string.
    #[must_use]
    pub fn as_str(&self) -> &'doc str {
        // SAFETY: the parser validated and, where escaped, re-encoded every
        // string byte range as UTF-8 before emitting it.
        unsafe { core::str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// The decoded string's raw bytes, a slice of the input buffer.
    ///
    /// # Panics
    ///
    /// Panics when the value is not a string.
    #[must_use]
    pub fn as_bytes(&self) -> &'doc [u8] {
        assert_eq!(self.value_type(), ValueType::String);
        let index = tape::index_of(self.word);
        let begin = self.tape[index] as usize;
        let end = self.tape[index + 1] as usize;
        &self.input[begin..end]
    }

    /// Decoded byte length of a string.
    ///
    /// # Panics
    ///
    /// Panics when the value is not a string.
    #[must_use]
    pub fn string_length(&self) -> usize {
        self.as_bytes().len()
    }

    fn key_bytes(&self, index: usize) -> &'doc [u8] {
        assert_eq!(self.value_type(), ValueType::Object);
        assert!(index < self.tape[tape::index_of(self.word)] as usize);
        let base = tape::index_of(self.word) + 1 + 3 * index;
        let begin = self.tape[base] as usize;
        let end = self.tape[base + 1] as usize;
        &self.input[begin..end]
    }
}

impl core::fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.value_type() {
            ValueType::Integer => write!(f, "Integer({})", self.integer_value()),
            ValueType::Double => write!(f, "Double({})", self.double_value()),
            ValueType::Null => f.write_str("Null"),
            ValueType::False => f.write_str("False"),
            ValueType::True => f.write_str("True"),
            ValueType::String => write!(f, "String({:?})", self.as_str()),
            ValueType::Array => write!(f, "Array(len {})", self.length()),
            ValueType::Object => write!(f, "Object(len {})", self.length()),
        }
    }
}
