//! Predicates over annotation type names.
//!
//! A [`crate::matcher::AnnotationMatcher`] decides whether one annotation, named
//! by its fully-qualified class name (`com.example.Marker`), should be removed.
//! Two built-in implementations cover the common cases - exact name comparison
//! and regular expression matching - and a blanket implementation over closures
//! leaves the door open for custom predicates.
//!
//! Matchers are constructed once from configuration, queried once per annotation
//! encountered during a traversal, and are immutable and side-effect-free. An
//! invalid pattern fails at construction time with
//! [`crate::Error::InvalidPattern`], never during a traversal.
//!
//! # Usage Examples
//!
//! ```rust
//! use classpurge::matcher::{AnnotationMatcher, NameMatcher, PatternMatcher};
//!
//! let exact = NameMatcher::new("com.example.Marker");
//! assert!(exact.matches("com.example.Marker"));
//! assert!(!exact.matches("com.example.Marked"));
//!
//! let pattern = PatternMatcher::new(r"com\.example\..*")?;
//! assert!(pattern.matches("com.example.v2.Marker"));
//!
//! let custom = |name: &str| name.ends_with("Generated");
//! assert!(custom.matches("com.example.Generated"));
//! # Ok::<(), classpurge::Error>(())
//! ```

use regex::Regex;

use crate::Result;

/// A predicate over fully-qualified annotation type names.
///
/// Implementations must be pure: the same input always yields the same answer,
/// and no state is mutated by a query. `Send + Sync` is required so one rule set
/// can serve concurrent `process` invocations.
pub trait AnnotationMatcher: Send + Sync {
    /// Returns `true` if the annotation named `class_name` should be removed.
    ///
    /// # Arguments
    /// * `class_name` - Fully-qualified class name, e.g. `com.example.Marker`
    fn matches(&self, class_name: &str) -> bool;
}

/// Matches annotations whose fully-qualified name equals a fixed string.
///
/// # Examples
///
/// ```rust
/// use classpurge::matcher::{AnnotationMatcher, NameMatcher};
///
/// let matcher = NameMatcher::new("java.lang.Deprecated");
/// assert!(matcher.matches("java.lang.Deprecated"));
/// assert!(!matcher.matches("java.lang.Override"));
/// ```
pub struct NameMatcher {
    name: String,
}

impl NameMatcher {
    /// Create a matcher for the exact fully-qualified `name`.
    pub fn new(name: impl Into<String>) -> Self {
        NameMatcher { name: name.into() }
    }
}

impl AnnotationMatcher for NameMatcher {
    fn matches(&self, class_name: &str) -> bool {
        self.name == class_name
    }
}

/// Matches annotations whose fully-qualified name matches a regular expression.
///
/// The pattern is compiled once at construction and tested against the full
/// type name on every query. Matching is full-string: `Deprecated` matches only
/// a class literally named `Deprecated`, not `com.example.Deprecated`.
///
/// # Examples
///
/// ```rust
/// use classpurge::matcher::{AnnotationMatcher, PatternMatcher};
///
/// let matcher = PatternMatcher::new(r"^com\.example\..*Deprecated$")?;
/// assert!(matcher.matches("com.example.v2.Deprecated"));
/// assert!(!matcher.matches("org.other.Deprecated"));
/// # Ok::<(), classpurge::Error>(())
/// ```
pub struct PatternMatcher {
    pattern: Regex,
}

impl PatternMatcher {
    /// Compile `pattern` into a full-string matcher.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidPattern`] if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(PatternMatcher { pattern })
    }
}

impl AnnotationMatcher for PatternMatcher {
    fn matches(&self, class_name: &str) -> bool {
        self.pattern.is_match(class_name)
    }
}

impl<F> AnnotationMatcher for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, class_name: &str) -> bool {
        self(class_name)
    }
}
