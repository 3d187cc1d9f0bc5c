//! Binary I/O substrate shared by the class file reader/rewriter.
//!
//! Two layers live here:
//!
//! - [`crate::file::io`] - bounds-checked big-endian primitive reads/writes over
//!   byte buffers
//! - [`crate::file::parser`] - the cursor-based [`Parser`](crate::file::parser::Parser)
//!   built on top of them

pub mod io;
pub mod parser;
