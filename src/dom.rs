//! Arena markup tree and its whitespace-preserving builder.
//!
//! The builder drives a lenient `quick-xml` reader so HTML-ish fragments parse:
//! void elements never take children, stray end tags are ignored, and an end
//! tag closes every element opened after its match. A `<` that cannot open
//! markup is kept as text, and `script`/`style` bodies are raw text. Text is
//! stored raw (with character references still escaped); decoding happens at
//! render time.

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use smallvec::SmallVec;

use crate::entities::decode_entities;
use crate::error::{ErrorPhase, MarkupError};
use crate::options::MarkupLimits;

/// Index of a node inside its [`Document`].
///
/// Ids are only meaningful for the document that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in document order of creation.
    pub fn index(self) -> usize {
        self.0
    }
}

/// An element's name and attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: SmallVec<[(String, String); 4]>,
}

impl Element {
    /// Create an element; the tag name is lower-cased.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: SmallVec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set an attribute, replacing an earlier value of the same name.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Lower-cased tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Decoded attribute value by lower-cased name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in source order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Node payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic root holding the top-level nodes.
    Document,
    /// Element node.
    Element(Element),
    /// Text with character references still escaped.
    Text(String),
    /// Comment body; never rendered.
    Comment(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Immutable parsed markup tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only its root.
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(16);
        nodes.push(NodeData {
            kind: NodeKind::Document,
            parent: None,
            children: Vec::new(),
        });
        Self { nodes }
    }

    /// The synthetic root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document has no nodes besides its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Payload of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Parent of a node (`None` for the root).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children of a node in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Element payload, if the node is an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Tag name, if the node is an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::tag)
    }

    /// Append a child node and return its id.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append raw text, extending a trailing text child instead of creating a
    /// sibling so entity references and CDATA stay in one text run.
    pub fn append_text(&mut self, parent: NodeId, raw: &str) {
        if raw.is_empty() {
            return;
        }
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last.0].kind {
                existing.push_str(raw);
                return;
            }
        }
        self.append(parent, NodeKind::Text(raw.into()));
    }
}

/// Parse a markup fragment into a [`Document`], preserving all whitespace.
pub fn parse_markup(input: &str, limits: &MarkupLimits) -> Result<Document, MarkupError> {
    if input.len() > limits.max_input_bytes {
        return Err(MarkupError::new(
            ErrorPhase::Input,
            "MARKUP_INPUT_TOO_LARGE",
            format!(
                "Markup exceeds max_input_bytes ({} > {})",
                input.len(),
                limits.max_input_bytes
            ),
        )
        .with_limit("max_input_bytes", input.len(), limits.max_input_bytes));
    }

    let prepared = escape_stray_angles(input);
    let mut reader = Reader::from_reader(prepared.as_bytes());
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;

    let mut doc = Document::new();
    let mut open: Vec<(NodeId, String)> = Vec::with_capacity(16);
    let mut buf = Vec::with_capacity(64);

    loop {
        let parent = open.last().map(|(id, _)| *id).unwrap_or(doc.root());
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let element = element_from_start(&reader, &e)?;
                let is_void = is_void_element(element.tag());
                if !is_void && open.len() >= limits.max_depth {
                    return Err(MarkupError::new(
                        ErrorPhase::Parse,
                        "MARKUP_DEPTH_LIMIT",
                        format!(
                            "Element nesting exceeds max_depth ({} > {})",
                            open.len() + 1,
                            limits.max_depth
                        ),
                    )
                    .with_source(format!("<{}>", element.tag()))
                    .with_token_offset(reader_token_offset(&reader))
                    .with_limit("max_depth", open.len() + 1, limits.max_depth));
                }
                let tag = element.tag().to_string();
                let id = doc.append(parent, NodeKind::Element(element));
                if !is_void {
                    open.push((id, tag));
                }
            }
            Ok(Event::Empty(e)) => {
                let element = element_from_start(&reader, &e)?;
                doc.append(parent, NodeKind::Element(element));
            }
            Ok(Event::End(e)) => {
                let tag = decode_tag_name(&reader, e.name().as_ref())?;
                match open.iter().rposition(|(_, open_tag)| *open_tag == tag) {
                    Some(idx) => open.truncate(idx),
                    None => log::trace!("Ignoring unmatched end tag </{}>", tag),
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.decode().map_err(|err| {
                    decode_error(&reader, "text node decode", format!("{:?}", err))
                })?;
                doc.append_text(parent, &text);
            }
            Ok(Event::GeneralRef(e)) => {
                let name = e.decode().map_err(|err| {
                    decode_error(&reader, "entity decode", format!("{:?}", err))
                })?;
                let mut raw = String::with_capacity(name.len() + 2);
                raw.push('&');
                raw.push_str(&name);
                raw.push(';');
                doc.append_text(parent, &raw);
            }
            Ok(Event::CData(e)) => {
                let text = reader
                    .decoder()
                    .decode(&e)
                    .map_err(|err| decode_error(&reader, "cdata decode", format!("{:?}", err)))?;
                doc.append_text(parent, &quick_xml::escape::escape(text.as_ref()));
            }
            Ok(Event::Comment(e)) => {
                let text = reader.decoder().decode(&e).map_err(|err| {
                    decode_error(&reader, "comment decode", format!("{:?}", err))
                })?;
                doc.append(parent, NodeKind::Comment(text.into_owned()));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(MarkupError::new(
                    ErrorPhase::Parse,
                    "MARKUP_TOKENIZE_ERROR",
                    format!("XML error: {:?}", err),
                )
                .with_source("xml tokenizer")
                .with_token_offset(reader_token_offset(&reader)));
            }
        }
        buf.clear();
    }

    Ok(doc)
}

/// Elements whose body is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Escape every `<` that cannot start markup to `&lt;`.
///
/// Outside raw text, `<` opens markup only before an ASCII letter, `/`, `!` or
/// `?`. Inside a raw text element only its own end tag does.
fn escape_stray_angles(input: &str) -> Cow<'_, str> {
    let mut out: Option<String> = None;
    let mut copied = 0usize;
    let mut cursor = 0usize;
    let mut raw_text: Option<&'static str> = None;

    while let Some(offset) = input[cursor..].find('<') {
        let at = cursor + offset;
        let rest = &input[at + 1..];
        let opens_markup = match raw_text {
            Some(name) => closes_raw_text(rest, name),
            None => rest
                .bytes()
                .next()
                .is_some_and(|b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?')),
        };
        if opens_markup {
            raw_text = match raw_text {
                Some(_) => None,
                None => raw_text_start(rest),
            };
        } else {
            let buf = out.get_or_insert_with(|| String::with_capacity(input.len() + 16));
            buf.push_str(&input[copied..at]);
            buf.push_str("&lt;");
            copied = at + 1;
        }
        cursor = at + 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&input[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(input),
    }
}

/// `rest` follows a `<`; returns the raw text element it opens, if any.
fn raw_text_start(rest: &str) -> Option<&'static str> {
    let name = RAW_TEXT_ELEMENTS
        .iter()
        .copied()
        .find(|name| starts_with_tag_name(rest, name))?;
    let tag_end = rest.find('>')?;
    if rest[..tag_end].ends_with('/') {
        return None;
    }
    Some(name)
}

fn closes_raw_text(rest: &str, name: &str) -> bool {
    rest.strip_prefix('/')
        .is_some_and(|rest| starts_with_tag_name(rest, name))
}

/// Case-insensitive `name` followed by a tag-name boundary.
fn starts_with_tag_name(rest: &str, name: &str) -> bool {
    let Some(head) = rest.get(..name.len()) else {
        return false;
    };
    head.eq_ignore_ascii_case(name)
        && rest[name.len()..]
            .bytes()
            .next()
            .is_none_or(|b| b.is_ascii_whitespace() || b == b'>' || b == b'/')
}

fn reader_token_offset(reader: &Reader<&[u8]>) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX)
}

fn decode_error(reader: &Reader<&[u8]>, source: &str, detail: String) -> MarkupError {
    MarkupError::new(
        ErrorPhase::Parse,
        "MARKUP_DECODE_ERROR",
        format!("Decode error: {}", detail),
    )
    .with_source(source)
    .with_token_offset(reader_token_offset(reader))
}

fn decode_tag_name(reader: &Reader<&[u8]>, raw: &[u8]) -> Result<String, MarkupError> {
    let decoded = reader
        .decoder()
        .decode(raw)
        .map_err(|err| decode_error(reader, "tag name decode", format!("{:?}", err)))?;
    let local_name = decoded.rsplit(':').next().unwrap_or(decoded.as_ref());
    Ok(local_name.to_ascii_lowercase())
}

fn element_from_start(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<Element, MarkupError> {
    let tag = decode_tag_name(reader, e.name().as_ref())?;
    let mut element = Element::new(&tag);
    for attr in e.html_attributes().flatten() {
        let key = match reader.decoder().decode(attr.key.as_ref()) {
            Ok(v) => v,
            Err(_) => continue,
        };
        let value = match reader.decoder().decode(&attr.value) {
            Ok(v) => v,
            Err(_) => continue,
        };
        element.set_attribute(&key, decode_entities(&value).into_owned());
    }
    Ok(element)
}

fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
