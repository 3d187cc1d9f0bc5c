//! The bytecode annotation-removal engine.
//!
//! [`crate::engine::AnnotationRemover`] consumes a class file byte stream and a
//! frozen [`RuleSet`], and emits a rewritten class file with every matching
//! annotation elided from the scoped locations - the class itself, fields,
//! methods, constructors, formal parameters and record components.
//!
//! # Rewrite strategy
//!
//! The engine parses the header, constant pool and member declarations far
//! enough to validate structural consistency, then re-serializes the file while
//! walking it: unchanged bytes (the constant pool, bytecode, every
//! non-annotation attribute) are copied verbatim via [`Parser::span`], and only
//! the affected annotation tables are re-encoded with updated counts.
//!
//! Two deliberate format decisions:
//!
//! - An annotation table left empty by removal is omitted from the output
//!   rather than emitted with a zero count, for both retention variants. A
//!   parameter-annotation attribute is omitted only when every per-parameter
//!   table is empty, since `num_parameters` itself is structural.
//! - The constant pool is never garbage-collected. Entries orphaned by a
//!   removed annotation stay in place, so no index anywhere else in the file
//!   shifts. This keeps the rewrite local and makes the engine idempotent:
//!   a second run over its own output is byte-identical.
//!
//! # Thread Safety
//!
//! The engine holds no mutable state; each `process` call is a pure function of
//! (input bytes, rule set). Concurrent invocations sharing one remover are safe.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use classpurge::{AnnotationRemover, NameMatcher, RuleSet, TargetKind};
//!
//! let remover = AnnotationRemover::new(
//!     RuleSet::builder()
//!         .remove_from(TargetKind::Method, NameMatcher::new("com.example.Traced"))
//!         .build(),
//! );
//!
//! let input = std::fs::read("Sample.class")?;
//! let output = remover.process(&input)?;
//! std::fs::write("Sample.class", output)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::{Read, Write};

use tracing::{debug, trace};

use crate::{
    classfile::{
        annotations::{
            descriptor_to_class_name, skip_element_value_pairs, RECORD,
            RUNTIME_INVISIBLE_ANNOTATIONS, RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS,
            RUNTIME_VISIBLE_ANNOTATIONS, RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS,
        },
        pool::ConstantPool,
        MAGIC, MIN_MAJOR_VERSION,
    },
    file::io::{push_be, write_be_at},
    file::parser::Parser,
    rules::{ElementKind, RuleSet},
    Error, Result,
};

/// Name of instance initializer methods.
const CONSTRUCTOR_NAME: &str = "<init>";
/// Name of the class initializer method; carries no annotations.
const CLASS_INITIALIZER_NAME: &str = "<clinit>";

/// Removes annotation references from class files.
///
/// Construct one with a frozen [`RuleSet`] and reuse it for any number of
/// class files; see the [module documentation](crate::engine) for the rewrite
/// guarantees.
pub struct AnnotationRemover {
    rules: RuleSet,
}

impl AnnotationRemover {
    /// Create a remover applying `rules`.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        AnnotationRemover { rules }
    }

    /// The rule set this remover applies.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Rewrite one class file, removing every annotation matched by the rules.
    ///
    /// # Arguments
    /// * `input` - The complete class file bytes
    ///
    /// # Errors
    /// Returns [`Error::Empty`] for empty input, [`Error::NotSupported`] for a
    /// pre-1.0 version marker, and [`Error::Malformed`] /
    /// [`Error::OutOfBounds`] if the input is not a well-formed class file.
    pub fn process(&self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Err(Error::Empty);
        }

        let mut parser = Parser::new(input);

        let magic = parser.read::<u32>()?;
        if magic != MAGIC {
            return Err(malformed_error!("Invalid magic number 0x{magic:08X}"));
        }
        let _minor = parser.read::<u16>()?;
        let major = parser.read::<u16>()?;
        if major < MIN_MAJOR_VERSION {
            return Err(Error::NotSupported);
        }

        let pool = ConstantPool::parse(&mut parser)?;

        let mut out = Vec::with_capacity(input.len());
        // Header and constant pool are index-stable, copied as one verbatim run
        out.extend_from_slice(parser.span(0));

        // access_flags, this_class, super_class
        out.extend_from_slice(parser.bytes(6)?);

        let interfaces = parser.read::<u16>()?;
        push_be(&mut out, interfaces);
        out.extend_from_slice(parser.bytes(interfaces as usize * 2)?);

        let fields = parser.read::<u16>()?;
        push_be(&mut out, fields);
        for _ in 0..fields {
            // access_flags, name_index, descriptor_index
            out.extend_from_slice(parser.bytes(6)?);
            self.rewrite_attributes(&mut parser, &mut out, &pool, Some(ElementKind::Field), false)?;
        }

        let methods = parser.read::<u16>()?;
        push_be(&mut out, methods);
        for _ in 0..methods {
            let start = parser.pos();
            let _access_flags = parser.read::<u16>()?;
            let name_index = parser.read::<u16>()?;
            let _descriptor_index = parser.read::<u16>()?;
            out.extend_from_slice(parser.span(start));

            let kind = match pool.utf8(name_index)? {
                CONSTRUCTOR_NAME => Some(ElementKind::Constructor),
                CLASS_INITIALIZER_NAME => None,
                _ => Some(ElementKind::Method),
            };
            self.rewrite_attributes(&mut parser, &mut out, &pool, kind, true)?;
        }

        self.rewrite_attributes(&mut parser, &mut out, &pool, Some(ElementKind::Class), false)?;

        if parser.has_more_data() {
            return Err(malformed_error!(
                "{} trailing bytes after class attributes",
                parser.len() - parser.pos()
            ));
        }

        debug!(
            input_bytes = input.len(),
            output_bytes = out.len(),
            "class file rewritten"
        );
        Ok(out)
    }

    /// Stream adapter around [`AnnotationRemover::process`].
    ///
    /// Reads one complete class file from `input`, rewrites it and writes the
    /// result to `output`. Neither stream is closed; the caller-visible scope
    /// that opened them stays responsible for them.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] on stream failures plus everything
    /// [`AnnotationRemover::process`] can return.
    pub fn optimize<R: Read, W: Write>(&self, input: &mut R, output: &mut W) -> Result<()> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        output.write_all(&self.process(&bytes)?)?;
        Ok(())
    }

    /// Rewrite one attribute table (`attributes_count` plus entries) into `out`.
    ///
    /// `kind` scopes element annotations; `None` means no element rules apply
    /// (class initializers). `with_parameters` enables parameter-annotation
    /// rewriting for method attribute tables.
    fn rewrite_attributes(
        &self,
        parser: &mut Parser,
        out: &mut Vec<u8>,
        pool: &ConstantPool,
        kind: Option<ElementKind>,
        with_parameters: bool,
    ) -> Result<()> {
        let count = parser.read::<u16>()?;
        let count_at = out.len();
        push_be(out, 0u16);

        let mut kept: u16 = 0;
        for _ in 0..count {
            if self.rewrite_attribute(parser, out, pool, kind, with_parameters)? {
                kept += 1;
            }
        }

        let mut patch_at = count_at;
        write_be_at(out, &mut patch_at, kept)?;
        Ok(())
    }

    /// Rewrite one attribute into `out`; returns whether the attribute was kept.
    fn rewrite_attribute(
        &self,
        parser: &mut Parser,
        out: &mut Vec<u8>,
        pool: &ConstantPool,
        kind: Option<ElementKind>,
        with_parameters: bool,
    ) -> Result<bool> {
        let start = parser.pos();
        let name_index = parser.read::<u16>()?;
        let length = parser.read::<u32>()?;
        let info = parser.bytes(length as usize)?;

        match pool.utf8(name_index)? {
            RUNTIME_VISIBLE_ANNOTATIONS | RUNTIME_INVISIBLE_ANNOTATIONS => {
                if let Some(kind) = kind {
                    if self.rules.applies_to(kind) {
                        return self.rewrite_annotation_attribute(out, pool, name_index, info, kind);
                    }
                }
            }
            RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS | RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS => {
                if with_parameters && self.rules.applies_to(ElementKind::Parameter) {
                    return self.rewrite_parameter_attribute(out, pool, name_index, info);
                }
            }
            RECORD => {
                if kind == Some(ElementKind::Class)
                    && self.rules.applies_to(ElementKind::RecordComponent)
                {
                    return self.rewrite_record_attribute(out, pool, name_index, info);
                }
            }
            _ => {}
        }

        out.extend_from_slice(parser.span(start));
        Ok(true)
    }

    /// Filter a `Runtime(In)VisibleAnnotations` payload; returns whether the
    /// attribute was kept.
    fn rewrite_annotation_attribute(
        &self,
        out: &mut Vec<u8>,
        pool: &ConstantPool,
        name_index: u16,
        info: &[u8],
        kind: ElementKind,
    ) -> Result<bool> {
        let mut parser = Parser::new(info);
        let total = parser.read::<u16>()?;

        let mut kept: u16 = 0;
        let mut body = Vec::with_capacity(info.len());
        for _ in 0..total {
            let start = parser.pos();
            let type_index = parser.read::<u16>()?;
            skip_element_value_pairs(&mut parser, 0)?;

            let class_name = descriptor_to_class_name(pool.utf8(type_index)?)?;
            if self.rules.matches(kind, &class_name) {
                trace!(annotation = %class_name, kind = %kind, "removing annotation reference");
            } else {
                body.extend_from_slice(parser.span(start));
                kept += 1;
            }
        }
        if parser.has_more_data() {
            return Err(malformed_error!(
                "Annotation table has {} trailing bytes",
                parser.len() - parser.pos()
            ));
        }

        // A table emptied by removal is omitted, not emitted with a zero count
        if kept == 0 && total > 0 {
            return Ok(false);
        }

        push_be(out, name_index);
        push_be(out, 2 + body.len() as u32);
        push_be(out, kept);
        out.extend_from_slice(&body);
        Ok(true)
    }

    /// Filter a `Runtime(In)VisibleParameterAnnotations` payload; returns
    /// whether the attribute was kept.
    fn rewrite_parameter_attribute(
        &self,
        out: &mut Vec<u8>,
        pool: &ConstantPool,
        name_index: u16,
        info: &[u8],
    ) -> Result<bool> {
        let mut parser = Parser::new(info);
        let num_parameters = parser.read::<u8>()?;

        let mut total: u32 = 0;
        let mut kept_total: u32 = 0;
        let mut body = Vec::with_capacity(info.len());
        for _ in 0..num_parameters {
            let annotations = parser.read::<u16>()?;
            total += u32::from(annotations);

            let mut kept: u16 = 0;
            let mut entries = Vec::new();
            for _ in 0..annotations {
                let start = parser.pos();
                let type_index = parser.read::<u16>()?;
                skip_element_value_pairs(&mut parser, 0)?;

                let class_name = descriptor_to_class_name(pool.utf8(type_index)?)?;
                if self.rules.matches(ElementKind::Parameter, &class_name) {
                    trace!(annotation = %class_name, kind = %ElementKind::Parameter, "removing annotation reference");
                } else {
                    entries.extend_from_slice(parser.span(start));
                    kept += 1;
                }
            }
            kept_total += u32::from(kept);
            push_be(&mut body, kept);
            body.extend_from_slice(&entries);
        }
        if parser.has_more_data() {
            return Err(malformed_error!(
                "Parameter annotation table has {} trailing bytes",
                parser.len() - parser.pos()
            ));
        }

        // num_parameters is structural; only a fully emptied attribute is omitted
        if kept_total == 0 && total > 0 {
            return Ok(false);
        }

        push_be(out, name_index);
        push_be(out, 1 + body.len() as u32);
        out.push(num_parameters);
        out.extend_from_slice(&body);
        Ok(true)
    }

    /// Rewrite a `Record` attribute, filtering each component's attribute table
    /// under the record-component scope. The attribute itself is always kept.
    fn rewrite_record_attribute(
        &self,
        out: &mut Vec<u8>,
        pool: &ConstantPool,
        name_index: u16,
        info: &[u8],
    ) -> Result<bool> {
        let mut parser = Parser::new(info);
        let components = parser.read::<u16>()?;

        let mut body = Vec::with_capacity(info.len());
        push_be(&mut body, components);
        for _ in 0..components {
            let start = parser.pos();
            let _name_index = parser.read::<u16>()?;
            let _descriptor_index = parser.read::<u16>()?;
            body.extend_from_slice(parser.span(start));

            self.rewrite_attributes(
                &mut parser,
                &mut body,
                pool,
                Some(ElementKind::RecordComponent),
                false,
            )?;
        }
        if parser.has_more_data() {
            return Err(malformed_error!(
                "Record attribute has {} trailing bytes",
                parser.len() - parser.pos()
            ));
        }

        push_be(out, name_index);
        push_be(out, body.len() as u32);
        out.extend_from_slice(&body);
        Ok(true)
    }
}
