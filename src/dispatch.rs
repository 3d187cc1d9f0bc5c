//! Routing inputs to the right processor by file type.
//!
//! The [`crate::dispatch::Dispatcher`] is the top-level entry point for
//! path-driven processing: it classifies each input by extension, sends class
//! files to the [`AnnotationRemover`], sends archives to the
//! [`ArchiveOptimizer`] and leaves everything else untouched. Classification is
//! case-insensitive, so `Sample.CLASS` and `library.JAR` route the same as
//! their lowercase forms.
//!
//! File rewrites are atomic: output lands in a temporary file next to the
//! target and replaces it only after the rewrite succeeded, so a malformed
//! input never clobbers the original. Batch processing fans out over a thread
//! pool, and one failing file never stops its siblings.

use std::{
    ffi::OsStr,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use memmap2::Mmap;
use rayon::prelude::*;
use tracing::debug;

use crate::{archive::ArchiveOptimizer, engine::AnnotationRemover, rules::RuleSet, Result};

/// Extension marking compiled class files.
const CLASS_EXTENSION: &str = "class";
/// Extensions marking zip-based archives.
const ARCHIVE_EXTENSIONS: [&str; 4] = ["jar", "war", "ear", "zip"];

/// How a given input will be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A compiled class file, rewritten directly.
    ClassFile,
    /// A zip-based archive, rewritten entry by entry.
    Archive,
    /// Anything else; passed through untouched.
    Other,
}

/// Classify a path by its extension, case-insensitively.
#[must_use]
pub fn classify(path: &Path) -> ItemKind {
    let Some(extension) = path.extension().and_then(OsStr::to_str) else {
        return ItemKind::Other;
    };

    if extension.eq_ignore_ascii_case(CLASS_EXTENSION) {
        ItemKind::ClassFile
    } else if ARCHIVE_EXTENSIONS
        .iter()
        .any(|archive| extension.eq_ignore_ascii_case(archive))
    {
        ItemKind::Archive
    } else {
        ItemKind::Other
    }
}

/// Returns `true` if `name` has a class file extension.
///
/// Also used for archive entry names, which are always `/`-separated.
#[must_use]
pub fn is_class(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, extension)| extension.eq_ignore_ascii_case(CLASS_EXTENSION))
}

/// Returns `true` if `name` has a zip-based archive extension.
#[must_use]
pub fn is_archive(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, extension)| {
        ARCHIVE_EXTENSIONS
            .iter()
            .any(|archive| extension.eq_ignore_ascii_case(archive))
    })
}

/// Routes class files and archives through one shared rule set.
pub struct Dispatcher {
    remover: AnnotationRemover,
}

impl Dispatcher {
    /// Create a dispatcher applying `rules` to every processed input.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Dispatcher {
            remover: AnnotationRemover::new(rules),
        }
    }

    /// The removal engine this dispatcher routes class files through.
    #[must_use]
    pub fn remover(&self) -> &AnnotationRemover {
        &self.remover
    }

    /// Process one in-memory input, classified by `path`.
    ///
    /// Returns `Ok(None)` for inputs that are neither class files nor archives;
    /// those pass through untouched.
    ///
    /// # Errors
    /// Everything [`AnnotationRemover::process`] and
    /// [`ArchiveOptimizer::process`] can return.
    pub fn process_bytes(&self, path: impl AsRef<Path>, input: &[u8]) -> Result<Option<Vec<u8>>> {
        match classify(path.as_ref()) {
            ItemKind::ClassFile => self.remover.process(input).map(Some),
            ItemKind::Archive => ArchiveOptimizer::new(&self.remover).process(input).map(Some),
            ItemKind::Other => Ok(None),
        }
    }

    /// Rewrite one file in place; returns whether the file was processed.
    ///
    /// Shorthand for [`Dispatcher::process_file_to`] with `source == target`.
    ///
    /// # Errors
    /// Same conditions as [`Dispatcher::process_file_to`].
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<bool> {
        self.process_file_to(path.as_ref(), path.as_ref())
    }

    /// Rewrite `source` into `target`; returns whether the file was processed.
    ///
    /// The input is memory-mapped, rewritten, and atomically swapped in via a
    /// temporary file next to `target`, so overwriting in place is safe and a
    /// failure never leaves a partial or clobbered target. Unrecognized
    /// sources are copied to a distinct `target` unchanged.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] on filesystem failures plus
    /// everything the underlying processor can return.
    pub fn process_file_to(&self, source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<bool> {
        let (path, target) = (source.as_ref(), target.as_ref());
        let kind = classify(path);
        if kind == ItemKind::Other {
            if path != target {
                fs::copy(path, target)?;
            }
            debug!(path = %path.display(), "skipping unrecognized file");
            return Ok(false);
        }

        let file = fs::File::open(path)?;
        // Mapping an empty file is an error on some platforms
        let mapped = if file.metadata()?.len() == 0 {
            None
        } else {
            // Safety: the mapping is read-only and dropped before the swap
            Some(unsafe { Mmap::map(&file)? })
        };
        let data = mapped.as_deref().unwrap_or(&[]);

        let output = match kind {
            ItemKind::ClassFile => self.remover.process(data)?,
            ItemKind::Archive => ArchiveOptimizer::new(&self.remover).process(data)?,
            ItemKind::Other => return Ok(false),
        };
        drop(mapped);
        drop(file);

        let directory = target.parent().filter(|p| !p.as_os_str().is_empty());
        let mut staged =
            tempfile::NamedTempFile::new_in(directory.unwrap_or_else(|| Path::new(".")))?;
        staged.write_all(&output)?;
        staged
            .persist(target)
            .map_err(|persist| crate::Error::FileError(persist.error))?;

        debug!(path = %path.display(), target = %target.display(), bytes = output.len(), "file rewritten");
        Ok(true)
    }

    /// Rewrite a batch of files in parallel.
    ///
    /// Each file is processed independently; a failure is reported alongside
    /// its path and never stops the rest of the batch.
    pub fn process_files<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<(PathBuf, Result<bool>)> {
        paths
            .par_iter()
            .map(|path| (path.as_ref().to_path_buf(), self.process_file(path)))
            .collect()
    }
}
