//! Binary encoding helpers for annotation attributes.
//!
//! Annotation metadata lives in attribute tables attached to the class, to each
//! field, to each method, to each method's formal parameters, and to each record
//! component. Four attribute names carry removable annotations - the two
//! retention variants for element annotations and the two for parameter
//! annotations - plus the `Record` attribute whose components nest their own
//! attribute tables.
//!
//! The removal engine never interprets element values; it only needs to know how
//! long each `annotation` structure is so that a matching entry can be dropped
//! and a retained one copied byte-for-byte. The skippers here walk the nested
//! `element_value` encoding (JVMS §4.7.16.1) for exactly that purpose, with a
//! depth cap against maliciously deep nesting.

use crate::{file::parser::Parser, Result};

/// Class-, field-, method- and record-component-level annotations retained for
/// runtime reflection.
pub const RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";
/// Annotations retained in the class file but invisible to reflection.
pub const RUNTIME_INVISIBLE_ANNOTATIONS: &str = "RuntimeInvisibleAnnotations";
/// Per-parameter annotations retained for runtime reflection.
pub const RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS: &str = "RuntimeVisibleParameterAnnotations";
/// Per-parameter annotations invisible to reflection.
pub const RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS: &str = "RuntimeInvisibleParameterAnnotations";
/// The record components attribute; each component nests its own attribute table.
pub const RECORD: &str = "Record";

/// Maximum `element_value` nesting depth accepted before the walk is aborted.
pub const MAX_NESTING: usize = 64;

/// Translate an object type descriptor into the language-native class name.
///
/// `Lcom/example/Foo;` becomes `com.example.Foo` - the form matchers are queried
/// with, mirroring how the reflection API reports annotation types.
///
/// # Arguments
/// * `descriptor` - The field descriptor naming the annotation interface
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the descriptor is not an object type.
pub fn descriptor_to_class_name(descriptor: &str) -> Result<String> {
    let Some(internal) = descriptor
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
    else {
        return Err(malformed_error!(
            "Annotation type descriptor '{descriptor}' is not an object type"
        ));
    };

    Ok(internal.replace('/', "."))
}

/// Skip one `annotation` structure (type index plus element-value pairs).
///
/// # Errors
/// Returns [`crate::Error::Malformed`] on an unknown value tag,
/// [`crate::Error::RecursionLimit`] on excessive nesting and
/// [`crate::Error::OutOfBounds`] on truncation.
pub fn skip_annotation(parser: &mut Parser) -> Result<()> {
    skip_annotation_at_depth(parser, 0)
}

fn skip_annotation_at_depth(parser: &mut Parser, depth: usize) -> Result<()> {
    let _type_index = parser.read::<u16>()?;
    skip_element_value_pairs(parser, depth)
}

/// Skip the `num_element_value_pairs` table of one annotation.
pub(crate) fn skip_element_value_pairs(parser: &mut Parser, depth: usize) -> Result<()> {
    let pairs = parser.read::<u16>()?;
    for _ in 0..pairs {
        let _element_name_index = parser.read::<u16>()?;
        skip_element_value(parser, depth)?;
    }
    Ok(())
}

/// Skip one `element_value`, dispatching on its tag byte.
fn skip_element_value(parser: &mut Parser, depth: usize) -> Result<()> {
    if depth >= MAX_NESTING {
        return Err(crate::Error::RecursionLimit(MAX_NESTING));
    }

    let tag = parser.read::<u8>()?;
    match tag {
        // Primitive constants, String constants and Class literals: one pool index
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' | b'c' => {
            parser.read::<u16>()?;
        }
        // Enum constant: type name index + const name index
        b'e' => {
            parser.read::<u16>()?;
            parser.read::<u16>()?;
        }
        // Nested annotation
        b'@' => skip_annotation_at_depth(parser, depth + 1)?,
        // Array of element values
        b'[' => {
            let values = parser.read::<u16>()?;
            for _ in 0..values {
                skip_element_value(parser, depth + 1)?;
            }
        }
        _ => {
            return Err(malformed_error!(
                "Unknown element value tag 0x{tag:02X} at offset {}",
                parser.pos() - 1
            ))
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn descriptor_translation() {
        assert_eq!(
            descriptor_to_class_name("Lcom/example/Marker;").unwrap(),
            "com.example.Marker"
        );
        assert_eq!(descriptor_to_class_name("LMarker;").unwrap(), "Marker");
        assert_eq!(
            descriptor_to_class_name("Lcom/example/Outer$Inner;").unwrap(),
            "com.example.Outer$Inner"
        );
    }

    #[test]
    fn descriptor_must_be_object_type() {
        assert!(matches!(
            descriptor_to_class_name("I"),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            descriptor_to_class_name("[Lcom/example/Marker;"),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn skips_annotation_without_pairs() {
        let data = [0x00, 0x01, 0x00, 0x00];
        let mut parser = Parser::new(&data);
        skip_annotation(&mut parser).unwrap();
        assert!(!parser.has_more_data());
    }

    #[test]
    fn skips_scalar_and_enum_values() {
        // type 1, two pairs: name 2 / int const 3, name 4 / enum (5, 6)
        let data = [
            0x00, 0x01, 0x00, 0x02, 0x00, 0x02, b'I', 0x00, 0x03, 0x00, 0x04, b'e', 0x00, 0x05,
            0x00, 0x06,
        ];
        let mut parser = Parser::new(&data);
        skip_annotation(&mut parser).unwrap();
        assert!(!parser.has_more_data());
    }

    #[test]
    fn skips_nested_array_of_annotations() {
        // type 1, one pair: name 2 / array of one nested annotation (type 3, no pairs)
        let data = [
            0x00, 0x01, 0x00, 0x01, 0x00, 0x02, b'[', 0x00, 0x01, b'@', 0x00, 0x03, 0x00, 0x00,
        ];
        let mut parser = Parser::new(&data);
        skip_annotation(&mut parser).unwrap();
        assert!(!parser.has_more_data());
    }

    #[test]
    fn unknown_tag_is_malformed() {
        let data = [0x00, 0x01, 0x00, 0x01, 0x00, 0x02, b'?', 0x00, 0x03];
        let mut parser = Parser::new(&data);
        assert!(matches!(
            skip_annotation(&mut parser),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn nesting_depth_is_capped() {
        // type 1, one pair whose value is an endless chain of nested annotations
        let mut data = vec![0x00, 0x01, 0x00, 0x01, 0x00, 0x02];
        for _ in 0..=MAX_NESTING {
            // tag '@', nested type index, one pair, pair name
            data.extend_from_slice(&[b'@', 0x00, 0x03, 0x00, 0x01, 0x00, 0x04]);
        }
        let mut parser = Parser::new(&data);
        assert!(matches!(
            skip_annotation(&mut parser),
            Err(Error::RecursionLimit(MAX_NESTING))
        ));
    }

    #[test]
    fn truncated_value_is_out_of_bounds() {
        let data = [0x00, 0x01, 0x00, 0x01, 0x00, 0x02, b'I'];
        let mut parser = Parser::new(&data);
        assert!(matches!(
            skip_annotation(&mut parser),
            Err(Error::OutOfBounds)
        ));
    }
}
