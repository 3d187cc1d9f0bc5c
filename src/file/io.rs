//! Low-level byte order and safe reading/writing utilities for class file parsing.
//!
//! This module provides endian-aware binary data reading and writing for the class
//! file format. It implements safe, bounds-checked operations for reading and writing
//! primitive types from/to byte buffers, preventing buffer overruns on truncated or
//! malformed inputs.
//!
//! The class file format is big-endian throughout, so only the big-endian family
//! of functions exists here.
//!
//! # Key Components
//!
//! ## Core Trait
//! - [`crate::file::io::ClassIO`] - Trait defining endian-aware conversions for primitive types
//!
//! ## Reading Functions
//! - [`crate::file::io::read_be`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_be_at`] - Read a value at a specific offset with auto-advance
//!
//! ## Writing Functions
//! - [`crate::file::io::write_be`] - Write a value to the start of a buffer
//! - [`crate::file::io::write_be_at`] - Write a value at a specific offset with auto-advance
//! - [`crate::file::io::push_be`] - Append a value to a growing output vector
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use classpurge::file::io::{read_be_at, push_be};
//!
//! let data = [0xCA, 0xFE, 0xBA, 0xBE];
//! let mut offset = 0;
//! let magic: u32 = read_be_at(&data, &mut offset)?;
//! assert_eq!(magic, 0xCAFE_BABE);
//!
//! let mut out = Vec::new();
//! push_be(&mut out, 0xCAFE_BABEu32);
//! assert_eq!(out, data);
//! # Ok::<(), classpurge::Error>(())
//! ```
//!
//! # Error Handling
//!
//! All reading and writing functions return [`crate::Result<T>`] and will return
//! [`crate::Error::OutOfBounds`] if there are insufficient bytes in the buffer to
//! complete the operation.

use crate::{Error::OutOfBounds, Result};

/// Trait for implementing type-specific safe binary data conversions.
///
/// This trait provides a unified interface for reading and writing primitive types
/// from byte slices in a safe and endian-aware manner. It abstracts over the
/// conversion between byte arrays and typed values for the integer widths the class
/// file format uses (`u1`, `u2`, `u4` fields plus 8-byte constant payloads).
///
/// Each implementation defines a `Bytes` associated type that represents the
/// fixed-size byte array required for that particular type (e.g. `[u8; 4]` for
/// `u32`). The trait methods then convert these byte arrays to and from the target
/// type using the appropriate endianness.
pub trait ClassIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    ///
    /// This type must be convertible from a byte slice and viewable as one, and is
    /// used for moving binary data in both directions.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in big-endian
    fn from_be_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in big-endian
    fn to_be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_class_io {
    ($($ty:ty => $len:expr),+ $(,)?) => {
        $(
            impl ClassIO for $ty {
                type Bytes = [u8; $len];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$ty>::to_be_bytes(self)
                }
            }
        )+
    };
}

impl_class_io! {
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
}

/// Safely reads a value of type `T` in big-endian byte order from a data buffer.
///
/// This function reads from the beginning of the buffer and supports all types that
/// implement the [`crate::file::io::ClassIO`] trait.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
///
/// # Returns
///
/// Returns the decoded value or [`crate::Error::OutOfBounds`] if there are
/// insufficient bytes.
pub fn read_be<T: ClassIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_be_at(data, &mut offset)
}

/// Safely reads a value of type `T` in big-endian byte order at a specific offset.
///
/// The offset is advanced by the number of bytes read, enabling sequential parsing
/// of fixed-layout structures.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
/// * `offset` - Mutable reference to the offset position (advanced after reading)
///
/// # Returns
///
/// Returns the decoded value or [`crate::Error::OutOfBounds`] if there are
/// insufficient bytes.
pub fn read_be_at<T: ClassIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..*offset + type_len].try_into() else {
        return Err(OutOfBounds);
    };

    *offset += type_len;

    Ok(T::from_be_bytes(read))
}

/// Safely writes a value of type `T` in big-endian byte order to a data buffer.
///
/// This function writes to the beginning of the buffer and supports all types that
/// implement the [`crate::file::io::ClassIO`] trait.
///
/// # Arguments
///
/// * `data` - The mutable byte buffer to write to
/// * `value` - The value to write
///
/// # Returns
///
/// Returns `Ok(())` on success or [`crate::Error::OutOfBounds`] if there are
/// insufficient bytes.
pub fn write_be<T: ClassIO>(data: &mut [u8], value: T) -> Result<()> {
    let mut offset = 0_usize;
    write_be_at(data, &mut offset, value)
}

/// Safely writes a value of type `T` in big-endian byte order at a specific offset.
///
/// The offset is advanced by the number of bytes written. Used for patching counts
/// back into already-emitted output, where the final value is only known after the
/// surrounded region was produced.
///
/// # Arguments
///
/// * `data` - The mutable byte buffer to write to
/// * `offset` - Mutable reference to the offset position (advanced after writing)
/// * `value` - The value to write
///
/// # Returns
///
/// Returns `Ok(())` on success or [`crate::Error::OutOfBounds`] if there are
/// insufficient bytes.
pub fn write_be_at<T: ClassIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    data[*offset..*offset + type_len].copy_from_slice(value.to_be_bytes().as_ref());
    *offset += type_len;

    Ok(())
}

/// Appends a value of type `T` in big-endian byte order to a growing output vector.
///
/// Infallible counterpart of [`write_be_at`] for serialization paths that build
/// their output incrementally.
///
/// # Arguments
///
/// * `data` - The output vector to append to
/// * `value` - The value to append
pub fn push_be<T: ClassIO>(data: &mut Vec<u8>, value: T) {
    data.extend_from_slice(value.to_be_bytes().as_ref());
}
