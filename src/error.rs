use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Variants fall into three groups, matching how failures surface to callers:
///
/// ## Format errors
/// - [`Error::Malformed`] - Corrupted or structurally inconsistent class file
/// - [`Error::OutOfBounds`] - Attempted to read beyond the input boundaries
/// - [`Error::NotSupported`] - Class file version this library does not understand
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::RecursionLimit`] - Nested annotation values exceeded the depth limit
///
/// ## I/O and container errors
/// - [`Error::FileError`] - Filesystem and stream I/O errors
/// - [`Error::ArchiveError`] - Zip container errors from the zip crate
/// - [`Error::Entry`] - A failure inside an archive, tagged with the entry name
///
/// ## Configuration errors
/// - [`Error::InvalidPattern`] - A removal rule carried an invalid regular expression
///
/// # Examples
///
/// ```rust
/// use classpurge::{AnnotationRemover, Error, RuleSet};
///
/// let remover = AnnotationRemover::new(RuleSet::builder().build());
/// match remover.process(&[0xDE, 0xAD, 0xBE, 0xEF]) {
///     Ok(_) => println!("rewritten"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("malformed class: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The class file is damaged and could not be parsed.
    ///
    /// This error indicates that the input does not conform to the class file
    /// format - a bad magic number, a dangling constant pool index, an unknown
    /// attribute encoding or trailing bytes after the class structure. The
    /// error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the input.
    ///
    /// This error occurs when trying to read data beyond the end of the byte
    /// stream. It's a safety check to prevent buffer overruns on truncated
    /// class files.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This class file version is not supported.
    ///
    /// Returned for major version markers older than the first released
    /// class file format.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while reading inputs or
    /// writing transformed outputs.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error from the zip crate while reading or writing an archive container.
    #[error("{0}")]
    ArchiveError(#[from] zip::result::ZipError),

    /// A failure while transforming one archive entry.
    ///
    /// The whole archive transformation is aborted; `name` identifies the
    /// offending entry for diagnostics.
    #[error("{name}: {source}")]
    Entry {
        /// Name of the archive entry that failed
        name: String,
        /// The underlying failure
        source: Box<Error>,
    },

    /// A removal rule was configured with an invalid regular expression.
    ///
    /// Raised at rule construction time, before any class file is touched.
    #[error("Invalid removal pattern - {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Recursion limit reached.
    ///
    /// Annotation element values nest (arrays of annotations of arrays, ...);
    /// a maximum depth is enforced to prevent stack overflow on crafted
    /// inputs. The associated value shows the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}
