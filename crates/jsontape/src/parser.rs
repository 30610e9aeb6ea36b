//! The single-pass parser.
//!
//! One linear scan over the input drives everything at once: grammar
//! checking, in-place string unescaping, number classification, and tape
//! construction. Open containers live on an explicit frame stack, so
//! nesting depth is bounded by memory rather than by the host call stack.
//!
//! A container's element words accumulate on the allocator's temp stack
//! while it is open. Closing it commits those words, behind a length
//! prefix, into the structured region; the container's own tagged word then
//! becomes an element of the enclosing frame.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::{
    allocator::{
        Allocation, DynamicAllocator, OutOfMemory, SingleAllocator, TapeAllocator,
    },
    document::{Document, Tape},
    error::{ErrorCode, ParseError},
    input::Input,
    tape,
    tape::ValueType,
};

/// Parses one JSON document from a writable UTF-8 buffer.
///
/// The root must be an array or an object. String escapes are decoded into
/// `input` as the scan passes over them, so the finished [`Document`]
/// borrows `input` for its string contents; the buffer must stay alive as
/// long as the document does.
///
/// # Errors
///
/// Returns the first fault with its exact 1-based line and column. There is
/// no partial document on failure.
///
/// # Examples
///
/// ```
/// use jsontape::{parse, Allocation, ValueType};
///
/// let mut text = br#"{"b": 1, "aa": [true, null]}"#.to_vec();
/// let doc = parse(Allocation::Dynamic, &mut text).unwrap();
/// let root = doc.root();
/// assert_eq!(root.value_type(), ValueType::Object);
/// assert_eq!(root.object_key(0), "b");
/// assert_eq!(root.value_of_key("aa").unwrap().length(), 2);
/// ```
pub fn parse<'input, 'words>(
    allocation: Allocation<'words>,
    input: &'input mut [u8],
) -> Result<Document<'input, 'words>, ParseError> {
    match allocation {
        Allocation::Single(words) => {
            let mut alloc = SingleAllocator::new(words);
            let root = Parser::new(&mut *input, &mut alloc).parse_document()?;
            let input: &'input [u8] = input;
            Ok(Document::new(input, Tape::Borrowed(alloc.finish()), root))
        }
        Allocation::Dynamic => {
            let mut alloc = DynamicAllocator::new();
            let root = Parser::new(&mut *input, &mut alloc).parse_document()?;
            let input: &'input [u8] = input;
            Ok(Document::new(input, Tape::Owned(alloc.finish()), root))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Array,
    Object,
}

/// One open container: its kind and the temp stack height at open.
#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: ContainerKind,
    mark: usize,
}

/// Outcome of parsing at a value position.
enum Step {
    /// A complete value: a scalar, or a container that closed immediately.
    Word(u32),
    /// A new frame was pushed; the frame loop takes over.
    Opened,
}

struct Parser<'i, 'a, A> {
    input: Input<'i>,
    alloc: &'a mut A,
    frames: Vec<Frame>,
}

impl<'i, 'a, A: TapeAllocator> Parser<'i, 'a, A> {
    fn new(bytes: &'i mut [u8], alloc: &'a mut A) -> Self {
        Self {
            input: Input::new(bytes),
            alloc,
            frames: Vec::new(),
        }
    }

    fn parse_document(mut self) -> Result<u32, ParseError> {
        self.input.skip_whitespace();
        let root_kind = match self.input.peek() {
            None => return Err(self.error(ErrorCode::MissingRootElement)),
            Some(b'[') => ContainerKind::Array,
            Some(b'{') => ContainerKind::Object,
            Some(_) => return Err(self.error(ErrorCode::BadRoot)),
        };
        self.input.bump();
        let root = match self.open_container(root_kind)? {
            Step::Word(word) => word,
            Step::Opened => self.run()?,
        };
        self.input.skip_whitespace();
        if !self.input.at_end() {
            return Err(self.error(ErrorCode::ExpectedEndOfInput));
        }
        Ok(root)
    }

    /// Drives the frame stack until the root container closes.
    ///
    /// At the top of each pass either `finished` carries the word of a
    /// container that just closed, waiting to be recorded in its parent, or
    /// the cursor sits at a fresh value position of the innermost frame.
    fn run(&mut self) -> Result<u32, ParseError> {
        let mut finished: Option<u32> = None;
        while let Some(&frame) = self.frames.last() {
            match frame.kind {
                ContainerKind::Array => loop {
                    let word = match finished.take() {
                        Some(word) => word,
                        None => match self.parse_value()? {
                            Step::Word(word) => word,
                            Step::Opened => break,
                        },
                    };
                    self.reserve_temp(word)?;
                    self.input.skip_whitespace();
                    match self.input.peek() {
                        None => return Err(self.error(ErrorCode::UnexpectedEnd)),
                        Some(b',') => {
                            self.input.bump();
                            self.input.skip_whitespace();
                            match self.input.peek() {
                                Some(b']') => return Err(self.error(ErrorCode::ExpectedValue)),
                                Some(b',') => return Err(self.error(ErrorCode::UnexpectedComma)),
                                _ => {}
                            }
                        }
                        Some(b']') => {
                            self.input.bump();
                            let word = self.close_array(frame)?;
                            self.frames.pop();
                            if self.frames.is_empty() {
                                return Ok(word);
                            }
                            finished = Some(word);
                            break;
                        }
                        Some(_) => return Err(self.error(ErrorCode::ExpectedComma)),
                    }
                },
                ContainerKind::Object => loop {
                    let word = match finished.take() {
                        Some(word) => word,
                        None => {
                            self.parse_object_key()?;
                            match self.parse_value()? {
                                Step::Word(word) => word,
                                Step::Opened => break,
                            }
                        }
                    };
                    self.reserve_temp(word)?;
                    self.input.skip_whitespace();
                    match self.input.peek() {
                        None => return Err(self.error(ErrorCode::UnexpectedEnd)),
                        Some(b',') => {
                            self.input.bump();
                        }
                        Some(b'}') => {
                            self.input.bump();
                            let word = self.close_object(frame)?;
                            self.frames.pop();
                            if self.frames.is_empty() {
                                return Ok(word);
                            }
                            finished = Some(word);
                            break;
                        }
                        Some(_) => return Err(self.error(ErrorCode::ExpectedComma)),
                    }
                },
            }
        }
        unreachable!("the root container returns before the frame stack drains")
    }

    /// Parses the value at the cursor, after any whitespace.
    fn parse_value(&mut self) -> Result<Step, ParseError> {
        self.input.skip_whitespace();
        let Some(byte) = self.input.peek() else {
            return Err(self.error(ErrorCode::UnexpectedEnd));
        };
        match byte {
            b'[' => {
                self.input.bump();
                self.open_container(ContainerKind::Array)
            }
            b'{' => {
                self.input.bump();
                self.open_container(ContainerKind::Object)
            }
            b'"' => {
                self.input.bump();
                let (begin, end) = self.parse_string()?;
                let index = self.reserve_payload(&[begin, end])?;
                Ok(Step::Word(tape::pack_index(ValueType::String, index)))
            }
            b'-' | b'0'..=b'9' => self.parse_number().map(Step::Word),
            b't' => {
                self.parse_literal(b"true", ErrorCode::ExpectedTrue)?;
                Ok(Step::Word(tape::pack_unit(ValueType::True)))
            }
            b'f' => {
                self.parse_literal(b"false", ErrorCode::ExpectedFalse)?;
                Ok(Step::Word(tape::pack_unit(ValueType::False)))
            }
            b'n' => {
                self.parse_literal(b"null", ErrorCode::ExpectedNull)?;
                Ok(Step::Word(tape::pack_unit(ValueType::Null)))
            }
            _ => Err(self.error(ErrorCode::ExpectedValue)),
        }
    }

    /// The opening bracket or brace has been consumed. An immediately
    /// closed container commits here; anything else becomes a new frame.
    fn open_container(&mut self, kind: ContainerKind) -> Result<Step, ParseError> {
        self.input.skip_whitespace();
        match (kind, self.input.peek()) {
            (_, None) => Err(self.error(ErrorCode::UnexpectedEnd)),
            (ContainerKind::Array, Some(b']')) => {
                self.input.bump();
                let frame = Frame {
                    kind,
                    mark: self.alloc.temp_len(),
                };
                Ok(Step::Word(self.close_array(frame)?))
            }
            (ContainerKind::Array, Some(b',')) => Err(self.error(ErrorCode::UnexpectedComma)),
            (ContainerKind::Object, Some(b'}')) => {
                self.input.bump();
                let frame = Frame {
                    kind,
                    mark: self.alloc.temp_len(),
                };
                Ok(Step::Word(self.close_object(frame)?))
            }
            _ => {
                self.frames.push(Frame {
                    kind,
                    mark: self.alloc.temp_len(),
                });
                Ok(Step::Opened)
            }
        }
    }

    fn close_array(&mut self, frame: Frame) -> Result<u32, ParseError> {
        let length = (self.alloc.temp_len() - frame.mark) as u32;
        let index = self.commit(frame.mark, length)?;
        Ok(tape::pack_index(ValueType::Array, index))
    }

    fn close_object(&mut self, frame: Frame) -> Result<u32, ParseError> {
        let length = ((self.alloc.temp_len() - frame.mark) / 3) as u32;
        sort_object_entries(self.alloc.temp_mut(frame.mark), self.input.as_bytes());
        let index = self.commit(frame.mark, length)?;
        Ok(tape::pack_index(ValueType::Object, index))
    }

    /// Parses `"key" :`, pushing the key's byte bounds onto the temp stack.
    fn parse_object_key(&mut self) -> Result<(), ParseError> {
        self.input.skip_whitespace();
        match self.input.peek() {
            None => return Err(self.error(ErrorCode::UnexpectedEnd)),
            Some(b'"') => {}
            Some(_) => return Err(self.error(ErrorCode::MissingObjectKey)),
        }
        self.input.bump();
        let (begin, end) = self.parse_string()?;
        self.reserve_temp(begin)?;
        self.reserve_temp(end)?;
        self.input.skip_whitespace();
        match self.input.peek() {
            None => Err(self.error(ErrorCode::UnexpectedEnd)),
            Some(b':') => {
                self.input.bump();
                Ok(())
            }
            Some(_) => Err(self.error(ErrorCode::ExpectedColon)),
        }
    }

    fn parse_literal(
        &mut self,
        literal: &'static [u8],
        mismatch: ErrorCode,
    ) -> Result<(), ParseError> {
        for &expected in literal {
            match self.input.peek() {
                None => return Err(self.error(ErrorCode::UnexpectedEnd)),
                Some(byte) if byte == expected => self.input.bump(),
                Some(_) => return Err(self.error(mismatch)),
            }
        }
        Ok(())
    }

    /// Scans a number and classifies it: a value without fraction or
    /// exponent that fits the inline range becomes an integer word,
    /// everything else a double.
    fn parse_number(&mut self) -> Result<u32, ParseError> {
        let negative = self.input.peek() == Some(b'-');
        if negative {
            self.input.bump();
        }

        // Mantissa digits accumulate in a u64 until they no longer fit,
        // then in a double.
        let mut magnitude: u64 = 0;
        let mut wide = 0.0_f64;
        let mut overflowed = false;
        let mut push_digit = |byte: u8| {
            let digit = u64::from(byte - b'0');
            if overflowed {
                wide = wide * 10.0 + digit as f64;
            } else if let Some(next) = magnitude
                .checked_mul(10)
                .and_then(|grown| grown.checked_add(digit))
            {
                magnitude = next;
            } else {
                overflowed = true;
                wide = magnitude as f64 * 10.0 + digit as f64;
            }
        };

        match self.input.peek() {
            None => return Err(self.error(ErrorCode::UnexpectedEnd)),
            // A leading zero terminates the integer part: a digit after it
            // belongs to whatever follows the number.
            Some(b'0') => self.input.bump(),
            Some(byte @ b'1'..=b'9') => {
                push_digit(byte);
                self.input.bump();
                while let Some(byte @ b'0'..=b'9') = self.input.peek() {
                    push_digit(byte);
                    self.input.bump();
                }
            }
            Some(_) => return Err(self.error(ErrorCode::ExpectedValue)),
        }
        if self.input.at_end() {
            return Err(self.error(ErrorCode::UnexpectedEnd));
        }

        // Fractional digits keep accumulating into the mantissa while
        // `shift` counts how far the decimal point moved.
        let mut shift: i64 = 0;
        let mut is_double = false;
        if self.input.peek() == Some(b'.') {
            is_double = true;
            self.input.bump();
            while let Some(byte @ b'0'..=b'9') = self.input.peek() {
                push_digit(byte);
                shift -= 1;
                self.input.bump();
            }
            if self.input.at_end() {
                return Err(self.error(ErrorCode::UnexpectedEnd));
            }
        }

        if matches!(self.input.peek(), Some(b'e' | b'E')) {
            is_double = true;
            self.input.bump();
            let exponent_negative = match self.input.peek() {
                None => return Err(self.error(ErrorCode::UnexpectedEnd)),
                Some(b'-') => {
                    self.input.bump();
                    true
                }
                Some(b'+') => {
                    self.input.bump();
                    false
                }
                Some(_) => false,
            };
            match self.input.peek() {
                None => return Err(self.error(ErrorCode::UnexpectedEnd)),
                Some(b'0'..=b'9') => {}
                Some(_) => return Err(self.error(ErrorCode::MssingExponent)),
            }
            let mut exponent: i64 = 0;
            while let Some(byte @ b'0'..=b'9') = self.input.peek() {
                exponent = (exponent * 10 + i64::from(byte - b'0')).min(0x7FFF);
                self.input.bump();
            }
            if self.input.at_end() {
                return Err(self.error(ErrorCode::UnexpectedEnd));
            }
            shift += if exponent_negative { -exponent } else { exponent };
        }

        if !is_double && !overflowed && magnitude <= 1 << 28 {
            let signed = if negative {
                -(magnitude as i64)
            } else {
                magnitude as i64
            };
            if (i64::from(tape::INLINE_INTEGER_MIN)..=i64::from(tape::INLINE_INTEGER_MAX))
                .contains(&signed)
            {
                return Ok(tape::pack_integer(signed as i32));
            }
        }

        let mut value = if overflowed { wide } else { magnitude as f64 };
        if shift != 0 {
            value *= pow10(shift);
        }
        if negative {
            value = -value;
        }
        let index = self.reserve_payload(&tape::split_double(value))?;
        Ok(tape::pack_index(ValueType::Double, index))
    }

    /// The opening quote has been consumed. Escapes decode into the source
    /// buffer behind the read cursor — every escape is at least two source
    /// bytes and at most four decoded bytes, so the write cursor can never
    /// pass the read cursor. Returns the decoded slice as byte offsets.
    fn parse_string(&mut self) -> Result<(u32, u32), ParseError> {
        let begin = self.input.index();
        let mut write = begin;
        loop {
            let Some(byte) = self.input.peek() else {
                return Err(self.error(ErrorCode::UnexpectedEnd));
            };
            match byte {
                b'"' => {
                    self.input.bump();
                    return Ok((begin as u32, write as u32));
                }
                b'\\' => {
                    self.input.bump();
                    write = self.parse_escape(write)?;
                }
                0x00..=0x1F => {
                    return Err(self.error(ErrorCode::IllegalCodepoint(u32::from(byte))))
                }
                0x20..=0x7F => {
                    self.input.put(write, byte);
                    write += 1;
                    self.input.bump();
                }
                _ => write = self.copy_multibyte(write, byte)?,
            }
        }
    }

    /// The backslash has been consumed.
    fn parse_escape(&mut self, write: usize) -> Result<usize, ParseError> {
        let Some(byte) = self.input.peek() else {
            return Err(self.error(ErrorCode::UnexpectedEnd));
        };
        let decoded = match byte {
            b'"' | b'\\' | b'/' => byte,
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                self.input.bump();
                return self.parse_unicode_escape(write);
            }
            _ => return Err(self.error(ErrorCode::UnknownEscape)),
        };
        self.input.bump();
        self.input.put(write, decoded);
        Ok(write + 1)
    }

    /// `\u` has been consumed. A high surrogate must be followed by a
    /// `\uXXXX` trail surrogate; the pair combines into one scalar.
    fn parse_unicode_escape(&mut self, write: usize) -> Result<usize, ParseError> {
        let unit = self.read_hex4(ErrorCode::UnexpectedEnd)?;
        let scalar = match unit {
            0xD800..=0xDBFF => {
                match self.input.peek() {
                    None => return Err(self.error(ErrorCode::UnexpectedEndOfUtf16)),
                    Some(b'\\') => self.input.bump(),
                    Some(_) => return Err(self.error(ErrorCode::ExpectedU)),
                }
                match self.input.peek() {
                    None => return Err(self.error(ErrorCode::UnexpectedEndOfUtf16)),
                    Some(b'u') => self.input.bump(),
                    Some(_) => return Err(self.error(ErrorCode::ExpectedU)),
                }
                let trail = self.read_hex4(ErrorCode::UnexpectedEndOfUtf16)?;
                if !(0xDC00..=0xDFFF).contains(&trail) {
                    return Err(self.error(ErrorCode::InvalidUtf16TrailSurrogate));
                }
                0x10000 + ((unit - 0xD800) << 10) + (trail - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(self.error(ErrorCode::InvalidUtf16TrailSurrogate)),
            _ => unit,
        };
        Ok(self.encode_scalar(write, scalar))
    }

    fn read_hex4(&mut self, truncation: ErrorCode) -> Result<u32, ParseError> {
        let mut value = 0_u32;
        for _ in 0..4 {
            let Some(byte) = self.input.peek() else {
                return Err(self.error(truncation));
            };
            let digit = match byte {
                b'0'..=b'9' => u32::from(byte - b'0'),
                b'a'..=b'f' => u32::from(byte - b'a') + 10,
                b'A'..=b'F' => u32::from(byte - b'A') + 10,
                _ => return Err(self.error(ErrorCode::InvalidUnicodeEscape)),
            };
            value = value << 4 | digit;
            self.input.bump();
        }
        Ok(value)
    }

    /// Writes `scalar` as UTF-8 at `write`, returning the new write cursor.
    fn encode_scalar(&mut self, mut write: usize, scalar: u32) -> usize {
        if scalar < 0x80 {
            self.input.put(write, scalar as u8);
            write += 1;
        } else if scalar < 0x800 {
            self.input.put(write, 0xC0 | (scalar >> 6) as u8);
            self.input.put(write + 1, 0x80 | (scalar & 0x3F) as u8);
            write += 2;
        } else if scalar < 0x10000 {
            self.input.put(write, 0xE0 | (scalar >> 12) as u8);
            self.input.put(write + 1, 0x80 | ((scalar >> 6) & 0x3F) as u8);
            self.input.put(write + 2, 0x80 | (scalar & 0x3F) as u8);
            write += 3;
        } else {
            self.input.put(write, 0xF0 | (scalar >> 18) as u8);
            self.input.put(write + 1, 0x80 | ((scalar >> 12) & 0x3F) as u8);
            self.input.put(write + 2, 0x80 | ((scalar >> 6) & 0x3F) as u8);
            self.input.put(write + 3, 0x80 | (scalar & 0x3F) as u8);
            write += 4;
        }
        write
    }

    /// Copies a multi-byte UTF-8 sequence, byte by byte. The first
    /// continuation byte's range also rules out overlong encodings,
    /// surrogates, and scalars past U+10FFFF, so every string slice the
    /// parser emits is well-formed UTF-8.
    fn copy_multibyte(&mut self, mut write: usize, lead: u8) -> Result<usize, ParseError> {
        let (trailing, first_low, first_high) = match lead {
            0xC2..=0xDF => (1, 0x80, 0xBF),
            0xE0 => (2, 0xA0, 0xBF),
            0xE1..=0xEC | 0xEE | 0xEF => (2, 0x80, 0xBF),
            0xED => (2, 0x80, 0x9F),
            0xF0 => (3, 0x90, 0xBF),
            0xF1..=0xF3 => (3, 0x80, 0xBF),
            0xF4 => (3, 0x80, 0x8F),
            _ => return Err(self.error(ErrorCode::InvalidUtf8)),
        };
        self.input.put(write, lead);
        write += 1;
        self.input.bump();
        for position in 0..trailing {
            let Some(byte) = self.input.peek() else {
                return Err(self.error(ErrorCode::UnexpectedEnd));
            };
            let (low, high) = if position == 0 {
                (first_low, first_high)
            } else {
                (0x80, 0xBF)
            };
            if !(low..=high).contains(&byte) {
                return Err(self.error(ErrorCode::InvalidUtf8));
            }
            self.input.put(write, byte);
            write += 1;
            self.input.bump();
        }
        Ok(write)
    }

    fn error(&self, code: ErrorCode) -> ParseError {
        let (line, column) = self.input.position();
        ParseError { code, line, column }
    }

    fn reserve_temp(&mut self, word: u32) -> Result<(), ParseError> {
        self.alloc
            .reserve_temp(word)
            .map_err(|OutOfMemory| self.error(ErrorCode::OutOfMemory))
    }

    fn reserve_payload(&mut self, words: &[u32]) -> Result<u32, ParseError> {
        self.alloc
            .reserve_payload(words)
            .map_err(|OutOfMemory| self.error(ErrorCode::OutOfMemory))
    }

    fn commit(&mut self, mark: usize, length: u32) -> Result<u32, ParseError> {
        self.alloc
            .commit_container(mark, length)
            .map_err(|OutOfMemory| self.error(ErrorCode::OutOfMemory))
    }
}

/// Sorts an object's `(key_begin, key_end, value)` triples by key.
///
/// Insertion sort keeps equal keys in input order and needs no scratch
/// space, so it runs inside the caller-supplied buffer strategy.
fn sort_object_entries(entries: &mut [u32], bytes: &[u8]) {
    let count = entries.len() / 3;
    for sorted in 1..count {
        let entry = [
            entries[3 * sorted],
            entries[3 * sorted + 1],
            entries[3 * sorted + 2],
        ];
        let key = key_slice(bytes, entry[0], entry[1]);
        let mut slot = sorted;
        while slot > 0 {
            let prev = 3 * (slot - 1);
            let prev_key = key_slice(bytes, entries[prev], entries[prev + 1]);
            if tape::compare_keys(prev_key, key) != Ordering::Greater {
                break;
            }
            entries.copy_within(prev..prev + 3, 3 * slot);
            slot -= 1;
        }
        entries[3 * slot] = entry[0];
        entries[3 * slot + 1] = entry[1];
        entries[3 * slot + 2] = entry[2];
    }
}

fn key_slice(bytes: &[u8], begin: u32, end: u32) -> &[u8] {
    &bytes[begin as usize..end as usize]
}

/// Ten to the `exponent`, by iterated multiplication. Saturates to
/// infinity or zero well past the f64 range; repeated division reaches the
/// subnormals.
fn pow10(exponent: i64) -> f64 {
    let steps = exponent.unsigned_abs().min(352);
    let mut result = 1.0_f64;
    if exponent >= 0 {
        for _ in 0..steps {
            result *= 10.0;
        }
    } else {
        for _ in 0..steps {
            result /= 10.0;
        }
    }
    result
}
