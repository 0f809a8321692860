/*!
 * Owned HTML document model.
 *
 * Documents are stored as a node arena indexed by `NodeId`, with explicit
 * parent/child links. Parsing is lossless: text and attribute values keep
 * their source bytes (entities undecoded, quoting preserved), so
 * serializing an untouched tree reproduces the input byte for byte.
 */

mod parser;

/// Index of a node inside a document arena
pub type NodeId = usize;

/// Elements whose content model forbids children
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Elements whose content is opaque raw text
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub(crate) fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

pub(crate) fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}

/// A single attribute as written in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name as written
    pub name: String,

    /// Raw value (entities undecoded); None for bare attributes
    pub value: Option<String>,

    /// Quote character used in the source; None for unquoted values
    pub quote: Option<char>,
}

/// Payload of one arena node
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The document root; never has a markup representation of its own
    Document,

    /// Doctype declaration, raw text between `<!` and `>`
    Doctype(String),

    /// An element with ordered attributes
    Element {
        /// Lowercased tag name
        name: String,
        /// Attributes in source order
        attrs: Vec<Attribute>,
        /// Whether the source tag ended with `/>`
        self_closing: bool,
    },

    /// Raw text, entities undecoded
    Text(String),

    /// Comment, raw text between `<!--` and `-->`
    Comment(String),
}

/// One arena node with its tree links
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node, None for the root and detached nodes
    pub parent: Option<NodeId>,

    /// Children in document order
    pub children: Vec<NodeId>,

    /// Node payload
    pub data: NodeData,
}

/// An owned, mutable HTML tree
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) nodes: Vec<Node>,
}

impl Document {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
        }
    }

    /// Parse an HTML document or fragment
    pub fn parse(html: &str) -> Self {
        parser::parse_document(html)
    }

    /// The arena root
    pub fn root(&self) -> NodeId {
        0
    }

    /// Node payload accessor
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id].data
    }

    /// Children of a node in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Lowercased tag name, None for non-elements
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].data {
            NodeData::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// All descendants of a node in document order, the node excluded
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[scope].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.nodes[id].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// First descendant element with the given tag name
    pub fn find_by_tag(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&id| self.tag_name(id) == Some(name))
    }

    /// All descendant elements with the given tag name, in document order
    pub fn find_all_by_tag(&self, scope: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.tag_name(id) == Some(name))
            .collect()
    }

    /// First descendant element with a matching id attribute
    pub fn find_by_id(&self, scope: NodeId, id_value: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&id| self.tag_name(id).is_some() && self.attr(id, "id") == Some(id_value))
    }

    /// First descendant element with the given tag and attribute value
    pub fn find_by_attr(&self, scope: NodeId, tag: &str, attr: &str, value: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&id| self.tag_name(id) == Some(tag) && self.attr(id, attr) == Some(value))
    }

    /// All text nodes under a scope, in document order
    pub fn text_nodes(&self, scope: NodeId) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| matches!(self.nodes[id].data, NodeData::Text(_)))
            .collect()
    }

    /// Raw attribute value (entities undecoded), case-insensitive name match
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(name))
                .and_then(|a| a.value.as_deref()),
            _ => None,
        }
    }

    /// Set an attribute, escaping the value; keeps source position when the
    /// attribute already exists, appends otherwise
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let escaped = escape_attr(value);
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id].data {
            if let Some(existing) = attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
                existing.value = Some(escaped);
                existing.quote = Some('"');
            } else {
                attrs.push(Attribute {
                    name: name.to_string(),
                    value: Some(escaped),
                    quote: Some('"'),
                });
            }
        }
    }

    /// Remove an attribute if present
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id].data {
            attrs.retain(|a| !a.name.eq_ignore_ascii_case(name));
        }
    }

    /// Concatenated raw text of a subtree (the node included if it is text)
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let NodeData::Text(raw) = &self.nodes[id].data {
            out.push_str(raw);
        }
        for desc in self.descendants(id) {
            if let NodeData::Text(raw) = &self.nodes[desc].data {
                out.push_str(raw);
            }
        }
        out
    }

    /// Replace the raw content of a text node
    pub fn set_text(&mut self, id: NodeId, raw: &str) {
        if let NodeData::Text(content) = &mut self.nodes[id].data {
            *content = raw.to_string();
        }
    }

    /// Replace an element's children with a single text node
    pub fn set_text_content(&mut self, id: NodeId, raw: &str) {
        self.clear_children(id);
        let text = self.create_text(raw);
        self.append_child(id, text);
    }

    /// Create a detached element with double-quoted, escaped attributes
    pub fn create_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(n, v)| Attribute {
                name: (*n).to_string(),
                value: Some(escape_attr(v)),
                quote: Some('"'),
            })
            .collect();
        self.push_node(Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element {
                name: name.to_ascii_lowercase(),
                attrs,
                self_closing: false,
            },
        })
    }

    /// Create a detached raw text node
    pub fn create_text(&mut self, raw: &str) -> NodeId {
        self.push_node(Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Text(raw.to_string()),
        })
    }

    /// Append a detached node as the last child of a parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Insert a detached node as the next sibling of an anchor
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) {
        let parent = match self.nodes[anchor].parent {
            Some(p) => p,
            None => return,
        };
        self.detach(node);
        let position = self.nodes[parent]
            .children
            .iter()
            .position(|&c| c == anchor)
            .map(|p| p + 1)
            .unwrap_or(self.nodes[parent].children.len());
        self.nodes[parent].children.insert(position, node);
        self.nodes[node].parent = Some(parent);
    }

    /// Detach a node from its parent; the node stays in the arena
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&c| c != id);
        }
    }

    /// Detach all children of a node
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id].children);
        for child in children {
            self.nodes[child].parent = None;
        }
    }

    /// Replace a node with the nodes of a parsed HTML fragment
    pub fn replace_with_fragment(&mut self, id: NodeId, html: &str) {
        let fragment = Document::parse(html);
        let mut anchor = id;
        let roots: Vec<NodeId> = fragment.children(fragment.root()).to_vec();
        for root in roots {
            let imported = self.import_node(&fragment, root);
            self.insert_after(anchor, imported);
            anchor = imported;
        }
        self.detach(id);
    }

    /// Serialize the whole document
    pub fn serialize(&self) -> String {
        self.serialize_node(self.root())
    }

    /// Serialize one subtree
    pub fn serialize_node(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].data {
            NodeData::Document => {
                for &child in &self.nodes[id].children {
                    self.write_node(child, out);
                }
            }
            NodeData::Doctype(raw) => {
                out.push_str("<!");
                out.push_str(raw);
                out.push('>');
            }
            NodeData::Comment(raw) => {
                out.push_str("<!--");
                out.push_str(raw);
                out.push_str("-->");
            }
            NodeData::Text(raw) => out.push_str(raw),
            NodeData::Element {
                name,
                attrs,
                self_closing,
            } => {
                out.push('<');
                out.push_str(name);
                for attr in attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    if let Some(value) = &attr.value {
                        out.push('=');
                        match attr.quote {
                            Some(q) => {
                                out.push(q);
                                out.push_str(value);
                                out.push(q);
                            }
                            None => out.push_str(value),
                        }
                    }
                }
                if *self_closing {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                if is_void(name) {
                    return;
                }
                for &child in &self.nodes[id].children {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }

    pub(crate) fn push_node(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }

    fn import_node(&mut self, source: &Document, id: NodeId) -> NodeId {
        let imported = self.push_node(Node {
            parent: None,
            children: Vec::new(),
            data: source.nodes[id].data.clone(),
        });
        for &child in &source.nodes[id].children {
            let imported_child = self.import_node(source, child);
            self.nodes[imported_child].parent = Some(imported);
            self.nodes[imported].children.push(imported_child);
        }
        imported
    }
}

/// Escape text for element content
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text for a double-quoted attribute value
pub fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Decode the entity references that appear in the corpus
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let semi = tail.find(';').filter(|&s| s <= 10);
        match semi {
            Some(semi) => {
                let entity = &tail[1..semi];
                let decoded = match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => decode_numeric_entity(entity),
                };
                match decoded {
                    Some(ch) => {
                        out.push(ch);
                        rest = &tail[semi + 1..];
                    }
                    None => {
                        out.push('&');
                        rest = &tail[1..];
                    }
                }
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };
    char::from_u32(code)
}
