// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'dispatch.rs' uses mmap to map input files into memory

//! # classpurge
//!
//! A library for removing annotation references from compiled JVM class files
//! and the archives that carry them. Built in pure Rust, `classpurge` parses
//! the class file format directly - no JVM, no bytecode framework - and
//! rewrites files with the selected annotations elided while leaving every
//! other byte exactly where it was.
//!
//! Annotations accumulate in shipped artifacts: compile-time markers from code
//! generators, framework metadata that is meaningless outside the build, and
//! references to annotation interfaces that are not even on the runtime
//! classpath. Stripping them shrinks artifacts and removes dangling type
//! references without touching program behavior.
//!
//! ## Features
//!
//! - **Targeted removal** - Scope rules to classes, fields, methods,
//!   constructors, parameters or record components, matched by exact name,
//!   regular expression or custom predicate
//! - **Byte-precise rewriting** - Untouched structures are copied verbatim;
//!   the constant pool is never renumbered, so rewriting is idempotent
//! - **Archive support** - `.jar`, `.war`, `.ear` and `.zip` containers are
//!   rewritten entry by entry, preserving compression and metadata
//! - **Safe on hostile input** - Bounds-checked parsing everywhere; malformed
//!   inputs surface as errors, never as panics, and failed rewrites never
//!   clobber the original file
//! - **Parallel batches** - Process many files at once over a thread pool
//!
//! ## Quick Start
//!
//! Add `classpurge` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! classpurge = "0.2"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust,no_run
//! use classpurge::prelude::*;
//!
//! let rules = RuleSet::builder()
//!     .remove(NameMatcher::new("com.example.Generated"))
//!     .remove_from(TargetKind::Parameter, PatternMatcher::new(r"lombok\..*")?)
//!     .build();
//!
//! let dispatcher = Dispatcher::new(rules);
//! dispatcher.process_file("target/app.jar")?;
//! # Ok::<(), classpurge::Error>(())
//! ```
//!
//! ### In-Memory Rewriting
//!
//! ```rust,no_run
//! use classpurge::{AnnotationRemover, NameMatcher, RuleSet};
//!
//! let remover = AnnotationRemover::new(
//!     RuleSet::builder()
//!         .remove(NameMatcher::new("com.example.Generated"))
//!         .build(),
//! );
//!
//! let input = std::fs::read("Sample.class")?;
//! let output = remover.process(&input)?;
//! assert!(output.len() <= input.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! `classpurge` is organized into focused modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`matcher`] - Predicates deciding which annotations to remove
//! - [`rules`] - Rule scoping and the immutable [`RuleSet`]
//! - [`engine`] - The class file rewriter, [`AnnotationRemover`]
//! - [`archive`] - Entry-by-entry archive rewriting
//! - [`dispatch`] - Path classification, atomic file rewrites, batches
//! - [`classfile`] / [`file`] - Format model and bounds-checked parsing
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result) with detailed error
//! information:
//!
//! ```rust,no_run
//! use classpurge::{AnnotationRemover, Error, RuleSet};
//!
//! let remover = AnnotationRemover::new(RuleSet::builder().build());
//! match remover.process(&std::fs::read("Sample.class")?) {
//!     Ok(_) => println!("rewritten"),
//!     Err(Error::NotSupported) => println!("class file version not supported"),
//!     Err(Error::Malformed { message, .. }) => println!("malformed file: {}", message),
//!     Err(e) => println!("other error: {}", e),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[macro_use]
mod error;

pub mod archive;
pub mod classfile;
pub mod dispatch;
pub mod engine;
pub mod file;
pub mod matcher;
pub mod prelude;
pub mod rules;

/// Result type used throughout this crate, wrapping [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all operations in this crate. Provides detailed
/// error information for rule configuration, class file parsing and archive
/// handling.
///
/// # Examples
///
/// ```rust,no_run
/// use classpurge::{AnnotationRemover, Error, RuleSet};
///
/// let remover = AnnotationRemover::new(RuleSet::builder().build());
/// match remover.process(&std::fs::read("Sample.class")?) {
///     Ok(_) => println!("rewritten"),
///     Err(Error::NotSupported) => println!("version not supported"),
///     Err(e) => println!("error: {}", e),
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub use error::Error;

/// The class file rewriter.
///
/// See [`engine::AnnotationRemover`] for the rewrite guarantees.
pub use engine::AnnotationRemover;

/// Entry-by-entry archive rewriting for `.jar`, `.war`, `.ear` and `.zip`.
pub use archive::ArchiveOptimizer;

/// Path-driven processing: classification, atomic in-place rewrites, batches.
pub use dispatch::{classify, Dispatcher, ItemKind};

/// Annotation name predicates: exact, regular expression, or any closure.
pub use matcher::{AnnotationMatcher, NameMatcher, PatternMatcher};

/// Removal rule scoping and the immutable rule set the engine consumes.
pub use rules::{ElementKind, RemovalRule, RuleSet, RuleSetBuilder, TargetKind};

/// The parsed constant pool, used for `Utf8` resolution during rewriting.
pub use classfile::pool::ConstantPool;

/// Low-level bounds-checked cursor over class file bytes.
///
/// # Example
///
/// ```rust
/// use classpurge::Parser;
///
/// let data = [0xCA, 0xFE, 0xBA, 0xBE];
/// let mut parser = Parser::new(&data);
/// assert_eq!(parser.read::<u32>()?, 0xCAFE_BABE);
/// # Ok::<(), classpurge::Error>(())
/// ```
pub use file::parser::Parser;
