//! Shared functionality for integration tests: a byte-level class file builder
//! and a read-back inspector.
//!
//! The builder assembles structurally valid class files with annotation
//! attributes in chosen locations; the inspector parses rewritten output back
//! into a comparable summary. Both work on raw bytes so the tests exercise the
//! real wire format rather than the library's own writer.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use classpurge::{file::io::push_be, ConstantPool, Parser};

/// Attribute name for visible element annotations.
pub const VISIBLE: &str = "RuntimeVisibleAnnotations";
/// Attribute name for invisible element annotations.
pub const INVISIBLE: &str = "RuntimeInvisibleAnnotations";
/// Attribute name for visible parameter annotations.
pub const VISIBLE_PARAMS: &str = "RuntimeVisibleParameterAnnotations";
/// Attribute name for invisible parameter annotations.
pub const INVISIBLE_PARAMS: &str = "RuntimeInvisibleParameterAnnotations";

/// Turn a dotted class name into its annotation type descriptor.
pub fn descriptor(class_name: &str) -> String {
    format!("L{};", class_name.replace('.', "/"))
}

/// Builds minimal but structurally valid class files.
pub struct ClassBuilder {
    pool: Vec<Vec<u8>>,
    utf8_cache: HashMap<String, u16>,
    fields: Vec<Vec<u8>>,
    methods: Vec<Vec<u8>>,
    class_attributes: Vec<Vec<u8>>,
}

impl ClassBuilder {
    pub fn new() -> Self {
        ClassBuilder {
            pool: Vec::new(),
            utf8_cache: HashMap::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            class_attributes: Vec::new(),
        }
    }

    /// Intern a `CONSTANT_Utf8` entry, returning its 1-based pool index.
    fn utf8(&mut self, text: &str) -> u16 {
        if let Some(&index) = self.utf8_cache.get(text) {
            return index;
        }

        let mut entry = vec![1u8];
        push_be(&mut entry, u16::try_from(text.len()).unwrap());
        entry.extend_from_slice(text.as_bytes());
        self.pool.push(entry);

        let index = u16::try_from(self.pool.len()).unwrap();
        self.utf8_cache.insert(text.to_string(), index);
        index
    }

    /// Add a `CONSTANT_Class` entry for an internal (slash-separated) name.
    fn class_ref(&mut self, internal: &str) -> u16 {
        let name_index = self.utf8(internal);
        let mut entry = vec![7u8];
        push_be(&mut entry, name_index);
        self.pool.push(entry);
        u16::try_from(self.pool.len()).unwrap()
    }

    /// Encode one zero-pair `annotation` structure for a dotted class name.
    fn annotation(&mut self, class_name: &str) -> Vec<u8> {
        let type_index = self.utf8(&descriptor(class_name));
        let mut bytes = Vec::new();
        push_be(&mut bytes, type_index);
        push_be(&mut bytes, 0u16); // num_element_value_pairs
        bytes
    }

    /// Encode an element annotation attribute holding the named annotations.
    fn annotations_attribute(&mut self, attribute: &str, class_names: &[&str]) -> Vec<u8> {
        let name_index = self.utf8(attribute);
        let mut info = Vec::new();
        push_be(&mut info, u16::try_from(class_names.len()).unwrap());
        for class_name in class_names {
            let annotation = self.annotation(class_name);
            info.extend_from_slice(&annotation);
        }

        let mut bytes = Vec::new();
        push_be(&mut bytes, name_index);
        push_be(&mut bytes, u32::try_from(info.len()).unwrap());
        bytes.extend_from_slice(&info);
        bytes
    }

    /// Encode a parameter annotation attribute with one table per parameter.
    fn parameter_attribute(&mut self, attribute: &str, parameters: &[&[&str]]) -> Vec<u8> {
        let name_index = self.utf8(attribute);
        let mut info = vec![u8::try_from(parameters.len()).unwrap()];
        for class_names in parameters {
            push_be(&mut info, u16::try_from(class_names.len()).unwrap());
            for class_name in *class_names {
                let annotation = self.annotation(class_name);
                info.extend_from_slice(&annotation);
            }
        }

        let mut bytes = Vec::new();
        push_be(&mut bytes, name_index);
        push_be(&mut bytes, u32::try_from(info.len()).unwrap());
        bytes.extend_from_slice(&info);
        bytes
    }

    /// Attach a class-level annotation attribute.
    pub fn annotate_class(&mut self, attribute: &str, class_names: &[&str]) -> &mut Self {
        let bytes = self.annotations_attribute(attribute, class_names);
        self.class_attributes.push(bytes);
        self
    }

    /// Add a field carrying the given visible annotations (if any).
    pub fn add_field(&mut self, name: &str, annotations: &[&str]) -> &mut Self {
        self.add_field_as(name, VISIBLE, annotations)
    }

    /// Add a field with one annotation attribute of a chosen retention.
    pub fn add_field_as(&mut self, name: &str, attribute: &str, annotations: &[&str]) -> &mut Self {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8("I");

        let mut bytes = Vec::new();
        push_be(&mut bytes, 0x0002u16); // private
        push_be(&mut bytes, name_index);
        push_be(&mut bytes, descriptor_index);
        if annotations.is_empty() {
            push_be(&mut bytes, 0u16);
        } else {
            push_be(&mut bytes, 1u16);
            let attribute = self.annotations_attribute(attribute, annotations);
            bytes.extend_from_slice(&attribute);
        }
        self.fields.push(bytes);
        self
    }

    /// Add a method carrying the given visible annotations (if any).
    pub fn add_method(&mut self, name: &str, annotations: &[&str]) -> &mut Self {
        self.add_method_full(name, VISIBLE, annotations, VISIBLE_PARAMS, &[])
    }

    /// Add a method with visible parameter annotation tables.
    pub fn add_method_with_params(
        &mut self,
        name: &str,
        annotations: &[&str],
        parameters: &[&[&str]],
    ) -> &mut Self {
        self.add_method_full(name, VISIBLE, annotations, VISIBLE_PARAMS, parameters)
    }

    /// Add a method with full control over both attribute retentions.
    pub fn add_method_full(
        &mut self,
        name: &str,
        attribute: &str,
        annotations: &[&str],
        parameter_attribute: &str,
        parameters: &[&[&str]],
    ) -> &mut Self {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8("()V");

        let mut attributes = Vec::new();
        if !annotations.is_empty() {
            attributes.push(self.annotations_attribute(attribute, annotations));
        }
        if !parameters.is_empty() {
            attributes.push(self.parameter_attribute(parameter_attribute, parameters));
        }

        let mut bytes = Vec::new();
        push_be(&mut bytes, 0x0001u16); // public
        push_be(&mut bytes, name_index);
        push_be(&mut bytes, descriptor_index);
        push_be(&mut bytes, u16::try_from(attributes.len()).unwrap());
        for attribute in &attributes {
            bytes.extend_from_slice(attribute);
        }
        self.methods.push(bytes);
        self
    }

    /// Attach a `Record` attribute; each component carries visible annotations.
    pub fn add_record(&mut self, components: &[(&str, &[&str])]) -> &mut Self {
        let attribute_name = self.utf8("Record");

        let mut info = Vec::new();
        push_be(&mut info, u16::try_from(components.len()).unwrap());
        for (component, annotations) in components {
            let name_index = self.utf8(component);
            let descriptor_index = self.utf8("I");
            push_be(&mut info, name_index);
            push_be(&mut info, descriptor_index);
            if annotations.is_empty() {
                push_be(&mut info, 0u16);
            } else {
                push_be(&mut info, 1u16);
                let attribute = self.annotations_attribute(VISIBLE, annotations);
                info.extend_from_slice(&attribute);
            }
        }

        let mut bytes = Vec::new();
        push_be(&mut bytes, attribute_name);
        push_be(&mut bytes, u32::try_from(info.len()).unwrap());
        bytes.extend_from_slice(&info);
        self.class_attributes.push(bytes);
        self
    }

    /// Serialize the complete class file.
    pub fn build(&mut self) -> Vec<u8> {
        let this_class = self.class_ref("com/example/Sample");
        let super_class = self.class_ref("java/lang/Object");

        let mut out = Vec::new();
        push_be(&mut out, 0xCAFE_BABEu32);
        push_be(&mut out, 0u16); // minor
        push_be(&mut out, 61u16); // major, Java 17

        push_be(&mut out, u16::try_from(self.pool.len() + 1).unwrap());
        for entry in &self.pool {
            out.extend_from_slice(entry);
        }

        push_be(&mut out, 0x0021u16); // public super
        push_be(&mut out, this_class);
        push_be(&mut out, super_class);
        push_be(&mut out, 0u16); // interfaces

        push_be(&mut out, u16::try_from(self.fields.len()).unwrap());
        for field in &self.fields {
            out.extend_from_slice(field);
        }

        push_be(&mut out, u16::try_from(self.methods.len()).unwrap());
        for method in &self.methods {
            out.extend_from_slice(method);
        }

        push_be(&mut out, u16::try_from(self.class_attributes.len()).unwrap());
        for attribute in &self.class_attributes {
            out.extend_from_slice(attribute);
        }

        out
    }
}

/// Everything the inspector recovers from one class file.
#[derive(Debug, Default)]
pub struct ClassSummary {
    /// Dotted annotation names per class-level attribute name.
    pub class_annotations: BTreeMap<String, Vec<String>>,
    /// Visible annotation names per field.
    pub field_annotations: BTreeMap<String, Vec<String>>,
    /// Annotation names per method (both retentions merged).
    pub method_annotations: BTreeMap<String, Vec<String>>,
    /// Per-parameter annotation names per method.
    pub parameter_annotations: BTreeMap<String, Vec<Vec<String>>>,
    /// Visible annotation names per record component.
    pub record_annotations: BTreeMap<String, Vec<String>>,
    /// Attribute names present per method, for omission checks.
    pub method_attributes: BTreeMap<String, Vec<String>>,
    /// Attribute names present at class level, for omission checks.
    pub class_attributes: Vec<String>,
}

fn dotted(descriptor: &str) -> String {
    descriptor
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
        .expect("object type descriptor")
        .replace('/', ".")
}

/// Decode a zero-pair annotation table into dotted type names.
fn read_annotations(parser: &mut Parser, pool: &ConstantPool) -> Vec<String> {
    let count = parser.read::<u16>().unwrap();
    let mut names = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let type_index = parser.read::<u16>().unwrap();
        let pairs = parser.read::<u16>().unwrap();
        assert_eq!(pairs, 0, "fixtures only build zero-pair annotations");
        names.push(dotted(pool.utf8(type_index).unwrap()));
    }
    names
}

/// Parse a class file produced by [`ClassBuilder`] (or its rewritten form)
/// back into a [`ClassSummary`].
pub fn inspect(bytes: &[u8]) -> ClassSummary {
    let mut parser = Parser::new(bytes);
    assert_eq!(parser.read::<u32>().unwrap(), 0xCAFE_BABE);
    parser.read::<u32>().unwrap(); // minor + major
    let pool = ConstantPool::parse(&mut parser).unwrap();

    parser.bytes(6).unwrap(); // access, this, super
    let interfaces = parser.read::<u16>().unwrap();
    parser.bytes(interfaces as usize * 2).unwrap();

    let mut summary = ClassSummary::default();

    let fields = parser.read::<u16>().unwrap();
    for _ in 0..fields {
        parser.read::<u16>().unwrap();
        let name = pool.utf8(parser.read::<u16>().unwrap()).unwrap().to_string();
        parser.read::<u16>().unwrap();

        let attributes = parser.read::<u16>().unwrap();
        let mut annotations = Vec::new();
        for _ in 0..attributes {
            let attribute = pool.utf8(parser.read::<u16>().unwrap()).unwrap().to_string();
            let length = parser.read::<u32>().unwrap();
            let info = parser.bytes(length as usize).unwrap();
            if attribute == VISIBLE || attribute == INVISIBLE {
                annotations.extend(read_annotations(&mut Parser::new(info), &pool));
            }
        }
        summary.field_annotations.insert(name, annotations);
    }

    let methods = parser.read::<u16>().unwrap();
    for _ in 0..methods {
        parser.read::<u16>().unwrap();
        let name = pool.utf8(parser.read::<u16>().unwrap()).unwrap().to_string();
        parser.read::<u16>().unwrap();

        let attributes = parser.read::<u16>().unwrap();
        let mut annotations = Vec::new();
        let mut names = Vec::new();
        for _ in 0..attributes {
            let attribute = pool.utf8(parser.read::<u16>().unwrap()).unwrap().to_string();
            let length = parser.read::<u32>().unwrap();
            let info = parser.bytes(length as usize).unwrap();
            match attribute.as_str() {
                VISIBLE | INVISIBLE => {
                    annotations.extend(read_annotations(&mut Parser::new(info), &pool));
                }
                VISIBLE_PARAMS | INVISIBLE_PARAMS => {
                    let mut inner = Parser::new(info);
                    let parameters = inner.read::<u8>().unwrap();
                    let tables = (0..parameters)
                        .map(|_| read_annotations(&mut inner, &pool))
                        .collect();
                    summary.parameter_annotations.insert(name.clone(), tables);
                }
                _ => {}
            }
            names.push(attribute);
        }
        summary.method_annotations.insert(name.clone(), annotations);
        summary.method_attributes.insert(name, names);
    }

    let attributes = parser.read::<u16>().unwrap();
    for _ in 0..attributes {
        let attribute = pool.utf8(parser.read::<u16>().unwrap()).unwrap().to_string();
        let length = parser.read::<u32>().unwrap();
        let info = parser.bytes(length as usize).unwrap();
        match attribute.as_str() {
            VISIBLE | INVISIBLE => {
                summary.class_annotations.insert(
                    attribute.clone(),
                    read_annotations(&mut Parser::new(info), &pool),
                );
            }
            "Record" => {
                let mut inner = Parser::new(info);
                let components = inner.read::<u16>().unwrap();
                for _ in 0..components {
                    let component = pool.utf8(inner.read::<u16>().unwrap()).unwrap().to_string();
                    inner.read::<u16>().unwrap();
                    let nested = inner.read::<u16>().unwrap();
                    let mut annotations = Vec::new();
                    for _ in 0..nested {
                        let name = pool.utf8(inner.read::<u16>().unwrap()).unwrap().to_string();
                        let length = inner.read::<u32>().unwrap();
                        let data = inner.bytes(length as usize).unwrap();
                        if name == VISIBLE || name == INVISIBLE {
                            annotations.extend(read_annotations(&mut Parser::new(data), &pool));
                        }
                    }
                    summary.record_annotations.insert(component, annotations);
                }
            }
            _ => {}
        }
        summary.class_attributes.push(attribute);
    }

    assert!(!parser.has_more_data(), "trailing bytes after class");
    summary
}
