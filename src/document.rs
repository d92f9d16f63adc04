// Copyright 2026 the svgcurve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading SVG documents.

use std::path::Path;

use anyhow::Context;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use smallvec::SmallVec;

use crate::{
    interpret_path, Diagnostic, DocumentError, Drawing, DrawingAssembler, ImportError,
    TransformStack, DEFAULT_SCALE,
};

/// The attributes of an element, in document order, with entities resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    pairs: SmallVec<[(String, String); 4]>,
}

impl Attributes {
    /// Create an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// The value of the first attribute called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attributes {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Receives element notifications in document order.
///
/// Every `start_element` is matched by one `end_element` for the same element,
/// properly nested.
pub trait ElementHandler {
    /// An element opens.
    fn start_element(&mut self, name: &str, attributes: &Attributes);
    /// The most recently opened element closes.
    fn end_element(&mut self, name: &str);
}

/// Drive `handler` with the elements of the XML document `source`.
///
/// Element names are passed without their namespace prefix. A self-closing
/// element produces both notifications. Attribute values have the predefined
/// entities, character references and any general entities declared in the
/// document type's internal subset resolved.
///
/// # Errors
///
/// [`DocumentError::Xml`] if the document is not well-formed, and
/// [`DocumentError::Attribute`] if an attribute cannot be read.
pub fn dispatch<H: ElementHandler + ?Sized>(
    source: &str,
    handler: &mut H,
) -> Result<(), DocumentError> {
    let mut reader = Reader::from_str(source);
    reader.trim_text(true);
    let mut entities = Entities::default();
    loop {
        match reader.read_event()? {
            Event::DocType(e) => {
                entities = Entities::parse(&String::from_utf8_lossy(&e));
                log::debug!("{} entities declared", entities.declared.len());
            }
            Event::Start(e) => {
                let (name, attributes) = element(&e, &entities)?;
                handler.start_element(&name, &attributes);
            }
            Event::Empty(e) => {
                let (name, attributes) = element(&e, &entities)?;
                handler.start_element(&name, &attributes);
                handler.end_element(&name);
            }
            Event::End(e) => {
                handler.end_element(&String::from_utf8_lossy(e.local_name().as_ref()));
            }
            Event::Eof => break,
            _ => (),
        }
    }
    Ok(())
}

fn element(e: &BytesStart<'_>, entities: &Entities) -> Result<(String, Attributes), DocumentError> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut attributes = Attributes::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| DocumentError::Attribute(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value_with(|name| entities.resolve(name))?;
        attributes.push(key, value);
    }
    Ok((name, attributes))
}

/// General entities from `<!ENTITY name "value">` declarations.
///
/// Illustrator writes its namespace URIs this way. Parameter and external
/// entities are ignored.
#[derive(Clone, Debug, Default)]
struct Entities {
    declared: Vec<(String, String)>,
}

impl Entities {
    fn parse(doctype: &str) -> Self {
        let mut declared = Vec::new();
        let mut rest = doctype;
        while let Some(start) = rest.find("<!ENTITY") {
            rest = &rest[start..];
            match parser::entity_declaration(rest) {
                Ok((tail, (name, value))) => {
                    declared.push((name.to_string(), value.to_string()));
                    rest = tail;
                }
                Err(_) => rest = &rest["<!ENTITY".len()..],
            }
        }
        Entities { declared }
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        match name {
            "lt" => Some("<"),
            "gt" => Some(">"),
            "amp" => Some("&"),
            "apos" => Some("'"),
            "quot" => Some("\""),
            _ => self
                .declared
                .iter()
                .find(|(declared, _)| declared == name)
                .map(|(_, value)| value.as_str()),
        }
    }
}

/// Settings for an import.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportOptions {
    /// Give every path element its own curve container.
    pub separate_paths: bool,
    /// Factor from source units to scene units. The y axis is also flipped.
    pub scale: f64,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            separate_paths: true,
            scale: DEFAULT_SCALE,
        }
    }
}

impl ImportOptions {
    /// Set whether each path element gets its own container.
    #[must_use]
    pub fn with_separate_paths(mut self, separate_paths: bool) -> Self {
        self.separate_paths = separate_paths;
        self
    }

    /// Set the source-to-scene scale factor.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// The result of a successful import.
#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    /// All geometry that could be built.
    pub drawing: Drawing,
    /// What was skipped or discarded along the way, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

/// The [`ElementHandler`] that builds a [`Drawing`] from SVG elements.
#[derive(Clone, Debug)]
pub struct SvgImporter {
    options: ImportOptions,
    transforms: TransformStack,
    assembler: DrawingAssembler,
    diagnostics: Vec<Diagnostic>,
}

impl SvgImporter {
    /// Create an importer.
    pub fn new(options: ImportOptions) -> Self {
        SvgImporter {
            options,
            transforms: TransformStack::new(),
            assembler: DrawingAssembler::new(options.separate_paths),
            diagnostics: Vec::new(),
        }
    }

    /// Finish the drawing.
    pub fn finish(self) -> Import {
        if self.transforms.depth() != 0 {
            log::warn!("document ended with {} open elements", self.transforms.depth());
        }
        Import {
            drawing: self.assembler.finish(),
            diagnostics: self.diagnostics,
        }
    }

    fn diagnose(&mut self, element_id: Option<&str>, error: ImportError) {
        let diagnostic = Diagnostic {
            element_id: element_id.map(str::to_string),
            error,
        };
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

impl ElementHandler for SvgImporter {
    fn start_element(&mut self, name: &str, attributes: &Attributes) {
        let id = attributes.get("id");
        if let Err(e) = self.transforms.push(attributes.get("transform")) {
            self.diagnose(id, e);
        }
        if name != "path" {
            return;
        }
        let Some(data) = attributes.get("d") else {
            log::debug!("path {id:?} has no data");
            return;
        };
        log::debug!("path {id:?} at depth {}", self.transforms.depth());
        let output = interpret_path(data, &self.transforms, self.options.scale);
        self.assembler.begin_path(id);
        for subpath in output.subpaths {
            self.assembler.push_subpath(subpath);
        }
        for error in output.errors {
            self.diagnose(id, error);
        }
    }

    fn end_element(&mut self, _name: &str) {
        self.transforms.pop();
    }
}

/// Import the SVG document `svg`.
///
/// # Errors
///
/// Fails only if the document itself cannot be read; problems in path data and
/// transforms are collected in [`Import::diagnostics`] instead.
pub fn import_str(svg: &str, options: &ImportOptions) -> Result<Import, DocumentError> {
    let mut importer = SvgImporter::new(*options);
    dispatch(svg, &mut importer)?;
    Ok(importer.finish())
}

/// Import the SVG file at `path`.
///
/// # Errors
///
/// Fails if the file cannot be read or is not well-formed XML.
pub fn import_file(path: impl AsRef<Path>, options: &ImportOptions) -> anyhow::Result<Import> {
    let path = path.as_ref();
    let svg = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let import =
        import_str(&svg, options).with_context(|| format!("importing {}", path.display()))?;
    log::debug!(
        "{}: {} containers, {} subpaths, {} diagnostics",
        path.display(),
        import.drawing.containers.len(),
        import.drawing.subpath_count(),
        import.diagnostics.len()
    );
    Ok(import)
}

mod parser {
    use nom::{
        branch::alt,
        bytes::complete::{tag, take_till, take_while1},
        character::complete::{multispace0, multispace1},
        sequence::{delimited, tuple},
        IResult,
    };

    fn is_name_char(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
    }

    /// `<!ENTITY name "value">` or with single quotes.
    pub(super) fn entity_declaration(input: &str) -> IResult<&str, (&str, &str)> {
        let (input, (_, _, name, _, value, _, _)) = tuple((
            tag("<!ENTITY"),
            multispace1,
            take_while1(is_name_char),
            multispace1,
            alt((
                delimited(tag("\""), take_till(|c| c == '"'), tag("\"")),
                delimited(tag("'"), take_till(|c| c == '\''), tag("'")),
            )),
            multispace0,
            tag(">"),
        ))(input)?;
        Ok((input, (name, value)))
    }
}
