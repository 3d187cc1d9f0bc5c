//! Low-level byte stream parser for class file decoding.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor-based
//! binary data parser for walking class file structures. It offers bounds-checked
//! sequential access to binary data in the format's big-endian byte order.
//!
//! The parser maintains a position within a byte slice; every operation validates
//! data availability before reading, so truncated inputs surface as
//! [`crate::Error::OutOfBounds`] instead of panics.
//!
//! Beyond plain reads, [`crate::file::parser::Parser::span`] recovers the exact
//! byte range consumed since an earlier position. The rewriting engine leans on
//! this to copy untouched structures into its output verbatim after having parsed
//! them for validation.
//!
//! # Usage Examples
//!
//! ```rust
//! use classpurge::Parser;
//!
//! let data = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00];
//! let mut parser = Parser::new(&data);
//!
//! let magic = parser.read::<u32>()?;
//! assert_eq!(magic, 0xCAFE_BABE);
//!
//! let start = parser.pos();
//! let minor = parser.read::<u16>()?;
//! assert_eq!(minor, 0);
//! assert_eq!(parser.span(start), &[0x00, 0x00]);
//! # Ok::<(), classpurge::Error>(())
//! ```

use crate::{file::io::read_be_at, file::io::ClassIO, Error::OutOfBounds, Result};

/// A cursor-based binary data parser for reading class file structures.
///
/// `Parser` provides bounds-checked sequential reading of big-endian values and
/// raw byte runs from a borrowed slice, plus position tracking so callers can
/// recover the exact input bytes a structure occupied.
///
/// # Examples
///
/// ```rust
/// use classpurge::Parser;
///
/// let data = [0x00, 0x10, 0x41, 0x42];
/// let mut parser = Parser::new(&data);
///
/// let count = parser.read::<u16>()?;
/// assert_eq!(count, 16);
///
/// let raw = parser.bytes(2)?;
/// assert_eq!(raw, b"AB");
/// assert!(!parser.has_more_data());
/// # Ok::<(), classpurge::Error>(())
/// ```
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Get the current position of the cursor.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Move the cursor to the provided position.
    ///
    /// # Arguments
    /// * `position` - The new cursor position; one past the end is allowed (end-of-data)
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the position lies beyond the data.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = position;
        Ok(())
    }

    /// Read a value of type `T` in big-endian byte order, advancing the cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
    pub fn read<T: ClassIO>(&mut self) -> Result<T> {
        read_be_at(self.data, &mut self.position)
    }

    /// Read `len` raw bytes, advancing the cursor.
    ///
    /// # Arguments
    /// * `len` - The number of bytes to consume
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `len` bytes remain.
    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let Some(end) = self.position.checked_add(len) else {
            return Err(OutOfBounds);
        };
        if end > self.data.len() {
            return Err(OutOfBounds);
        }

        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Return the bytes consumed since `start`.
    ///
    /// `start` must be a position previously obtained from [`Parser::pos`]; the
    /// returned slice covers `start..pos()`.
    #[must_use]
    pub fn span(&self, start: usize) -> &'a [u8] {
        &self.data[start..self.position]
    }
}
