//! The two storage strategies behind a parse.
//!
//! During a parse the tape is managed as two stacks: a *temp* stack holding
//! the element words of still-open containers, and a *structured* region
//! holding finalized payloads. Closing a container moves its temp words,
//! prefixed by a length, into the structured region. After a successful
//! parse the temp stack is empty.
//!
//! [`SingleAllocator`] folds both stacks into one caller-provided buffer:
//! temp grows up from the bottom, structured grows down from the top, and
//! the parse fails with out-of-memory when the cursors would cross. It
//! writes only the words it needs and performs no allocation of its own.
//!
//! [`DynamicAllocator`] owns a growable structured vector and keeps the
//! temp stack in a separate auxiliary vector.

use alloc::vec::Vec;

/// Marker error: the strategy could not hold another word.
#[derive(Debug)]
pub(crate) struct OutOfMemory;

/// Word storage contract the parser drives.
///
/// Indices returned by `commit_container` and `reserve_payload` are final:
/// they stay valid in the finished tape, whichever strategy produced them.
pub(crate) trait TapeAllocator {
    /// Pushes one word onto the temp stack.
    fn reserve_temp(&mut self, word: u32) -> Result<(), OutOfMemory>;

    /// Current temp stack height, used as a container's open mark.
    fn temp_len(&self) -> usize;

    /// The temp words pushed since `mark`, for in-place key sorting.
    fn temp_mut(&mut self, mark: usize) -> &mut [u32];

    /// Moves the temp words above `mark` into the structured region behind
    /// a `length` prefix and returns the prefix's tape index.
    fn commit_container(&mut self, mark: usize, length: u32) -> Result<u32, OutOfMemory>;

    /// Stores `words` in the structured region, returning their tape index.
    fn reserve_payload(&mut self, words: &[u32]) -> Result<u32, OutOfMemory>;
}

/// Chooses where a parse stores its tape.
///
/// Both strategies produce structurally identical documents and identical
/// errors for identical input.
///
/// # Examples
///
/// ```
/// use jsontape::{parse, Allocation};
///
/// // A fixed word buffer: parsing fails with `OutOfMemory` rather than
/// // allocating.
/// let mut words = [0u32; 16];
/// let mut text = *b"[1, 2, 3]";
/// let doc = parse(Allocation::Single(&mut words), &mut text).unwrap();
/// assert_eq!(doc.root().length(), 3);
/// ```
pub enum Allocation<'words> {
    /// Parse into the given buffer; temp and structured data share it.
    Single(&'words mut [u32]),
    /// Let the parser own and grow the tape.
    Dynamic,
}

pub(crate) struct SingleAllocator<'words> {
    words: &'words mut [u32],
    /// One past the top of the temp stack.
    temp_top: usize,
    /// First word of the structured region.
    structured_bottom: usize,
}

impl<'words> SingleAllocator<'words> {
    pub fn new(words: &'words mut [u32]) -> Self {
        let capacity = words.len();
        Self {
            words,
            temp_top: 0,
            structured_bottom: capacity,
        }
    }

    pub fn finish(self) -> &'words [u32] {
        self.words
    }
}

impl TapeAllocator for SingleAllocator<'_> {
    fn reserve_temp(&mut self, word: u32) -> Result<(), OutOfMemory> {
        if self.temp_top == self.structured_bottom {
            return Err(OutOfMemory);
        }
        self.words[self.temp_top] = word;
        self.temp_top += 1;
        Ok(())
    }

    fn temp_len(&self) -> usize {
        self.temp_top
    }

    fn temp_mut(&mut self, mark: usize) -> &mut [u32] {
        &mut self.words[mark..self.temp_top]
    }

    fn commit_container(&mut self, mark: usize, length: u32) -> Result<u32, OutOfMemory> {
        let count = self.temp_top - mark;
        // The committed words plus the length prefix must fit between the
        // popped temp stack and the structured region.
        if self.structured_bottom - mark < count + 1 {
            return Err(OutOfMemory);
        }
        let destination = self.structured_bottom - count;
        self.words.copy_within(mark..self.temp_top, destination);
        self.words[destination - 1] = length;
        self.structured_bottom = destination - 1;
        self.temp_top = mark;
        Ok(self.structured_bottom as u32)
    }

    fn reserve_payload(&mut self, words: &[u32]) -> Result<u32, OutOfMemory> {
        if self.structured_bottom - self.temp_top < words.len() {
            return Err(OutOfMemory);
        }
        let destination = self.structured_bottom - words.len();
        self.words[destination..self.structured_bottom].copy_from_slice(words);
        self.structured_bottom = destination;
        Ok(destination as u32)
    }
}

pub(crate) struct DynamicAllocator {
    tape: Vec<u32>,
    temp: Vec<u32>,
}

impl DynamicAllocator {
    pub fn new() -> Self {
        Self {
            tape: Vec::new(),
            temp: Vec::new(),
        }
    }

    pub fn finish(self) -> Vec<u32> {
        self.tape
    }
}

impl TapeAllocator for DynamicAllocator {
    fn reserve_temp(&mut self, word: u32) -> Result<(), OutOfMemory> {
        self.temp.try_reserve(1).map_err(|_| OutOfMemory)?;
        self.temp.push(word);
        Ok(())
    }

    fn temp_len(&self) -> usize {
        self.temp.len()
    }

    fn temp_mut(&mut self, mark: usize) -> &mut [u32] {
        &mut self.temp[mark..]
    }

    fn commit_container(&mut self, mark: usize, length: u32) -> Result<u32, OutOfMemory> {
        let count = self.temp.len() - mark;
        self.tape.try_reserve(count + 1).map_err(|_| OutOfMemory)?;
        let index = self.tape.len() as u32;
        self.tape.push(length);
        self.tape.extend_from_slice(&self.temp[mark..]);
        self.temp.truncate(mark);
        Ok(index)
    }

    fn reserve_payload(&mut self, words: &[u32]) -> Result<u32, OutOfMemory> {
        self.tape.try_reserve(words.len()).map_err(|_| OutOfMemory)?;
        let index = self.tape.len() as u32;
        self.tape.extend_from_slice(words);
        Ok(index)
    }
}
