//! The parse result: a read-only document over the tape and input buffer.

use alloc::vec::Vec;

use crate::value::Value;

/// Final tape storage. The single-allocation strategy leaves the tape in
/// the caller's buffer; the dynamic strategy hands over its vector.
#[derive(Debug)]
pub(crate) enum Tape<'words> {
    Borrowed(&'words [u32]),
    Owned(Vec<u32>),
}

impl Tape<'_> {
    fn words(&self) -> &[u32] {
        match self {
            Tape::Borrowed(words) => words,
            Tape::Owned(words) => words,
        }
    }
}

/// A successfully parsed, immutable JSON document.
///
/// The document borrows the input buffer: string values are slices of it,
/// decoded in place during the parse. Dropping the document releases the
/// tape (when owned) and nothing else.
///
/// Reading is free of interior mutation, so shared references to a
/// document may be used from any number of threads.
///
/// # Examples
///
/// ```
/// use jsontape::{parse, Allocation, ValueType};
///
/// let mut text = br#"[0, [0, [0], 0], 0]"#.to_vec();
/// let doc = parse(Allocation::Dynamic, &mut text).unwrap();
/// let root = doc.root();
/// assert_eq!(root.length(), 3);
/// assert_eq!(root.array_element(1).array_element(1).length(), 1);
/// ```
#[derive(Debug)]
pub struct Document<'input, 'words> {
    input: &'input [u8],
    tape: Tape<'words>,
    root: u32,
}

impl<'input, 'words> Document<'input, 'words> {
    pub(crate) fn new(input: &'input [u8], tape: Tape<'words>, root: u32) -> Self {
        Self { input, tape, root }
    }

    /// The root value; always an array or an object.
    #[must_use]
    pub fn root(&self) -> Value<'_> {
        Value::new(self.root, self.tape.words(), self.input)
    }
}
