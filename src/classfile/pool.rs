//! Constant pool (`constant_pool`) parsing for class files.
//!
//! The constant pool is a 1-indexed table of heterogeneous entries that the rest
//! of the class file references by numeric index. This module parses the pool far
//! enough to validate its structure and to resolve the `Utf8` entries the removal
//! engine needs (attribute names, member names, annotation type descriptors).
//!
//! Entries the engine never inspects are retained opaquely. The pool is never
//! edited or renumbered by the rewriter - entries left unreferenced by a removed
//! annotation simply stay in place, keeping every surviving index stable.
//!
//! # Reference
//! - [JVMS §4.4](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.4)

use crate::{file::parser::Parser, Result};

/// `CONSTANT_Utf8` tag value.
const TAG_UTF8: u8 = 1;
/// `CONSTANT_Long` tag value.
const TAG_LONG: u8 = 5;
/// `CONSTANT_Double` tag value.
const TAG_DOUBLE: u8 = 6;

/// One slot of the constant pool.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    /// A `CONSTANT_Utf8` entry that decoded as valid UTF-8.
    Utf8(String),
    /// Any entry the rewriter never needs to inspect. This includes `Utf8`
    /// entries using Modified-UTF-8 sequences outside plain UTF-8 (surrogate
    /// pairs, embedded `C0 80` nulls) - legal for string literals, but such
    /// constants can never name an attribute or an annotation type.
    Opaque,
    /// Index 0 and the phantom second slot behind `Long`/`Double` entries.
    Unusable,
}

/// The parsed constant pool of one class file.
///
/// Provides index-checked `Utf8` resolution; every other entry kind is carried
/// opaquely because the rewrite never touches it.
///
/// # Examples
///
/// ```rust
/// use classpurge::{ConstantPool, Parser};
///
/// // count = 2: one Utf8 entry "Hi" at index 1
/// let data = [0x00, 0x02, 0x01, 0x00, 0x02, b'H', b'i'];
/// let mut parser = Parser::new(&data);
/// let pool = ConstantPool::parse(&mut parser)?;
/// assert_eq!(pool.utf8(1)?, "Hi");
/// # Ok::<(), classpurge::Error>(())
/// ```
pub struct ConstantPool {
    slots: Vec<Slot>,
}

impl ConstantPool {
    /// Parse the constant pool, leaving the cursor on the byte after its last entry.
    ///
    /// # Arguments
    /// * `parser` - Cursor positioned on the `constant_pool_count` field
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on a zero count, an unknown entry tag
    /// or a `Long`/`Double` in the last slot, and [`crate::Error::OutOfBounds`]
    /// on truncated data.
    pub fn parse(parser: &mut Parser) -> Result<Self> {
        let count = parser.read::<u16>()?;
        if count == 0 {
            return Err(malformed_error!("Constant pool count must be at least 1"));
        }

        let mut slots = Vec::with_capacity(count as usize);
        slots.push(Slot::Unusable);

        while slots.len() < count as usize {
            let index = slots.len();
            let tag = parser.read::<u8>()?;
            match tag {
                TAG_UTF8 => {
                    let length = parser.read::<u16>()?;
                    let bytes = parser.bytes(length as usize)?;
                    slots.push(match std::str::from_utf8(bytes) {
                        Ok(text) => Slot::Utf8(text.to_string()),
                        Err(_) => Slot::Opaque,
                    });
                }
                // Integer, Float
                3 | 4 => {
                    parser.bytes(4)?;
                    slots.push(Slot::Opaque);
                }
                TAG_LONG | TAG_DOUBLE => {
                    parser.bytes(8)?;
                    if index + 1 == count as usize {
                        return Err(malformed_error!(
                            "8-byte constant at index {index} overflows pool of count {count}"
                        ));
                    }
                    slots.push(Slot::Opaque);
                    slots.push(Slot::Unusable);
                }
                // Class, String, MethodType, Module, Package
                7 | 8 | 16 | 19 | 20 => {
                    parser.bytes(2)?;
                    slots.push(Slot::Opaque);
                }
                // Fieldref, Methodref, InterfaceMethodref, NameAndType, Dynamic, InvokeDynamic
                9 | 10 | 11 | 12 | 17 | 18 => {
                    parser.bytes(4)?;
                    slots.push(Slot::Opaque);
                }
                // MethodHandle
                15 => {
                    parser.bytes(3)?;
                    slots.push(Slot::Opaque);
                }
                _ => {
                    return Err(malformed_error!(
                        "Unknown constant pool tag {tag} at index {index}"
                    ))
                }
            }
        }

        Ok(ConstantPool { slots })
    }

    /// Number of constant pool slots, including the unusable slot 0.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the pool holds no real entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.len() <= 1
    }

    /// Resolve a `CONSTANT_Utf8` entry by index.
    ///
    /// # Arguments
    /// * `index` - 1-based constant pool index
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index is 0, out of range, or
    /// does not resolve to a usable `Utf8` entry.
    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.slots.get(index as usize) {
            Some(Slot::Utf8(text)) => Ok(text),
            Some(_) => Err(malformed_error!(
                "Constant pool index {index} is not a Utf8 entry"
            )),
            None => Err(malformed_error!(
                "Constant pool index {index} out of range (count {})",
                self.slots.len()
            )),
        }
    }
}
