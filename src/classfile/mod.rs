//! Class file format model.
//!
//! Only the structures the rewriter needs to understand are modelled:
//!
//! - [`crate::classfile::pool`] - the 1-indexed constant pool, parsed for
//!   validation and `Utf8` resolution, never renumbered
//! - [`crate::classfile::annotations`] - the annotation attribute encodings
//!   (names, `element_value` skipping, descriptor translation)
//!
//! Everything else in a class file - bytecode, stack maps, inner class tables -
//! is treated as opaque byte runs and copied through verbatim.

pub mod annotations;
pub mod pool;

/// The four magic bytes opening every class file.
pub const MAGIC: u32 = 0xCAFE_BABE;

/// The oldest major version marker this library accepts (JDK 1.0.2).
pub const MIN_MAJOR_VERSION: u16 = 45;
