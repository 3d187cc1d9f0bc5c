//! # classpurge Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! and traits from the classpurge library. Import this module to get quick
//! access to the essential types for annotation removal.
//!
//! # Example
//!
//! ```rust,no_run
//! use classpurge::prelude::*;
//!
//! let rules = RuleSet::builder()
//!     .remove(NameMatcher::new("com.example.Generated"))
//!     .build();
//! Dispatcher::new(rules).process_file("target/app.jar")?;
//! # Ok::<(), classpurge::Error>(())
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all classpurge operations
pub use crate::Error;

/// The result type used throughout classpurge
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Path-driven processing of class files and archives
pub use crate::dispatch::{classify, Dispatcher, ItemKind};

/// The class file rewriter
pub use crate::engine::AnnotationRemover;

/// Entry-by-entry archive rewriting
pub use crate::archive::ArchiveOptimizer;

// ================================================================================================
// Rule Configuration
// ================================================================================================

/// Annotation name predicates
pub use crate::matcher::{AnnotationMatcher, NameMatcher, PatternMatcher};

/// Rule scoping and assembly
pub use crate::rules::{ElementKind, RemovalRule, RuleSet, RuleSetBuilder, TargetKind};

// ================================================================================================
// Low-Level Parsing
// ================================================================================================

/// The parsed constant pool
pub use crate::classfile::pool::ConstantPool;

/// Bounds-checked cursor over class file bytes
pub use crate::file::parser::Parser;
