//! Annotation removal across zip-based archives (`.jar`, `.war`, `.ear`, `.zip`).
//!
//! [`crate::archive::ArchiveOptimizer`] walks an archive entry by entry, in the
//! order the central directory lists them, and produces a new archive:
//!
//! - Class file entries (by extension) are rewritten through the wrapped
//!   [`AnnotationRemover`]; each keeps its original compression method,
//!   timestamp and permission bits.
//! - Every other entry - resources, manifests, directories and nested archives
//!   alike - is copied through raw, compressed payload and all. Nested archives
//!   are deliberately opaque; recursive processing belongs to the caller.
//! - A duplicate entry name keeps its first occurrence and drops the rest.
//!
//! A class entry that fails to rewrite aborts the whole archive with an
//! [`Error::Entry`] naming the offending entry; no partially-processed archive
//! is ever returned from [`ArchiveOptimizer::process`].

use std::{
    collections::HashSet,
    io::{Cursor, Read, Seek, Write},
};

use tracing::{debug, trace};
use zip::{write::SimpleFileOptions, ZipArchive, ZipWriter};

use crate::{dispatch::is_class, engine::AnnotationRemover, Error, Result};

/// Rewrites every class file inside a zip-based archive.
///
/// Borrows an [`AnnotationRemover`] so one rule set can serve plain class files
/// and archives alike.
pub struct ArchiveOptimizer<'a> {
    remover: &'a AnnotationRemover,
}

impl<'a> ArchiveOptimizer<'a> {
    /// Create an optimizer applying `remover` to each class entry.
    #[must_use]
    pub fn new(remover: &'a AnnotationRemover) -> Self {
        ArchiveOptimizer { remover }
    }

    /// Rewrite one archive held in memory.
    ///
    /// Either the complete rewritten archive is returned or an error is; a
    /// failing entry never yields partial output.
    ///
    /// # Errors
    /// Returns [`Error::ArchiveError`] if the input is not a readable zip
    /// archive and [`Error::Entry`] if a class entry fails to rewrite.
    pub fn process(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Cursor::new(Vec::with_capacity(input.len()));
        self.optimize(Cursor::new(input), &mut output)?;
        Ok(output.into_inner())
    }

    /// Stream variant of [`ArchiveOptimizer::process`].
    ///
    /// On error the bytes already written to `output` stay written; callers
    /// that need all-or-nothing semantics should write to a temporary location
    /// first, as [`crate::dispatch::Dispatcher::process_file`] does.
    ///
    /// # Errors
    /// Same conditions as [`ArchiveOptimizer::process`], plus
    /// [`Error::FileError`] on stream failures.
    pub fn optimize<R: Read + Seek, W: Write + Seek>(
        &self,
        input: R,
        output: &mut W,
    ) -> Result<()> {
        let mut archive = ZipArchive::new(input)?;
        let mut writer = ZipWriter::new(output);
        let mut seen: HashSet<String> = HashSet::new();

        let entries = archive.len();
        let mut rewritten = 0_usize;
        for index in 0..entries {
            let mut entry = archive.by_index(index)?;
            let name = entry.name().to_owned();

            // First occurrence wins
            if !seen.insert(name.clone()) {
                trace!(entry = %name, "skipping duplicate archive entry");
                continue;
            }

            if entry.is_dir() || !is_class(&name) {
                writer.raw_copy_file(entry)?;
                continue;
            }

            let mut options = SimpleFileOptions::default().compression_method(entry.compression());
            if let Some(modified) = entry.last_modified() {
                options = options.last_modified_time(modified);
            }
            if let Some(mode) = entry.unix_mode() {
                options = options.unix_permissions(mode);
            }

            let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
            entry.read_to_end(&mut bytes)?;

            let class = self.remover.process(&bytes).map_err(|source| Error::Entry {
                name: name.clone(),
                source: Box::new(source),
            })?;

            writer.start_file(name, options)?;
            writer.write_all(&class)?;
            rewritten += 1;
        }

        writer.finish()?;
        debug!(entries, rewritten, "archive rewritten");
        Ok(())
    }
}
