use super::{is_raw_text, is_void, Attribute, Document, Node, NodeData};

// @module: Lossless HTML tokenizer/parser feeding the node arena

/// Parse an HTML document or fragment into an owned tree.
///
/// The parser is lenient: unmatched close tags are dropped, stray `<`
/// characters and unterminated constructs degrade to text. It expects the
/// well-formed nesting that a generated corpus has; it does not perform
/// the implicit tag closing of a full HTML5 tree builder.
pub(crate) fn parse_document(input: &str) -> Document {
    let mut doc = Document::new();
    let mut stack: Vec<usize> = Vec::new();
    let len = input.len();
    let mut pos = 0;

    while pos < len {
        let Some(offset) = input[pos..].find('<') else {
            append_text(&mut doc, &stack, &input[pos..]);
            break;
        };
        if offset > 0 {
            append_text(&mut doc, &stack, &input[pos..pos + offset]);
        }
        let lt = pos + offset;
        let rest = &input[lt..];

        if rest.starts_with("<!--") {
            pos = match input[lt + 4..].find("-->") {
                Some(end) => {
                    append_node(&mut doc, &stack, NodeData::Comment(input[lt + 4..lt + 4 + end].to_string()));
                    lt + 4 + end + 3
                }
                None => {
                    append_node(&mut doc, &stack, NodeData::Comment(input[lt + 4..].to_string()));
                    len
                }
            };
        } else if rest.starts_with("<!") {
            pos = match rest.find('>') {
                Some(gt) => {
                    append_node(&mut doc, &stack, NodeData::Doctype(input[lt + 2..lt + gt].to_string()));
                    lt + gt + 1
                }
                None => {
                    append_text(&mut doc, &stack, rest);
                    len
                }
            };
        } else if rest.starts_with("</") {
            pos = match rest.find('>') {
                Some(gt) => {
                    let name = input[lt + 2..lt + gt].trim().to_ascii_lowercase();
                    close_element(&doc, &mut stack, &name);
                    lt + gt + 1
                }
                None => {
                    append_text(&mut doc, &stack, rest);
                    len
                }
            };
        } else if rest.len() > 1 && rest.as_bytes()[1].is_ascii_alphabetic() {
            pos = parse_open_tag(input, lt, &mut doc, &mut stack);
        } else {
            append_text(&mut doc, &stack, "<");
            pos = lt + 1;
        }
    }

    doc
}

fn current_parent(stack: &[usize]) -> usize {
    stack.last().copied().unwrap_or(0)
}

fn append_text(doc: &mut Document, stack: &[usize], text: &str) {
    if text.is_empty() {
        return;
    }
    append_node(doc, stack, NodeData::Text(text.to_string()));
}

fn append_node(doc: &mut Document, stack: &[usize], data: NodeData) -> usize {
    let parent = current_parent(stack);
    let id = doc.push_node(Node {
        parent: Some(parent),
        children: Vec::new(),
        data,
    });
    doc.nodes[parent].children.push(id);
    id
}

fn close_element(doc: &Document, stack: &mut Vec<usize>, name: &str) {
    let position = stack.iter().rposition(|&id| match &doc.nodes[id].data {
        NodeData::Element { name: open, .. } => open == name,
        _ => false,
    });
    if let Some(position) = position {
        stack.truncate(position);
    }
}

fn parse_open_tag(input: &str, lt: usize, doc: &mut Document, stack: &mut Vec<usize>) -> usize {
    let bytes = input.as_bytes();
    let len = input.len();

    let mut i = lt + 1;
    let name_start = i;
    while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-' || bytes[i] == b':') {
        i += 1;
    }
    let name = input[name_start..i].to_ascii_lowercase();

    let mut attrs: Vec<Attribute> = Vec::new();
    let mut self_closing = false;
    loop {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            break;
        }
        if bytes[i] == b'>' {
            i += 1;
            break;
        }
        if bytes[i] == b'/' {
            if i + 1 < len && bytes[i + 1] == b'>' {
                self_closing = true;
                i += 2;
                break;
            }
            i += 1;
            continue;
        }

        let attr_start = i;
        while i < len
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'>'
            && bytes[i] != b'/'
        {
            i += 1;
        }
        let attr_name = input[attr_start..i].to_string();
        if attr_name.is_empty() {
            i += 1;
            continue;
        }

        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < len && bytes[i] == b'=' {
            i += 1;
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < len && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i] as char;
                i += 1;
                let value_start = i;
                while i < len && bytes[i] != quote as u8 {
                    i += 1;
                }
                attrs.push(Attribute {
                    name: attr_name,
                    value: Some(input[value_start..i].to_string()),
                    quote: Some(quote),
                });
                if i < len {
                    i += 1;
                }
            } else {
                let value_start = i;
                while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                attrs.push(Attribute {
                    name: attr_name,
                    value: Some(input[value_start..i].to_string()),
                    quote: None,
                });
            }
        } else {
            attrs.push(Attribute {
                name: attr_name,
                value: None,
                quote: None,
            });
        }
    }

    let element = append_node(
        doc,
        stack,
        NodeData::Element {
            name: name.clone(),
            attrs,
            self_closing,
        },
    );

    if !self_closing && is_raw_text(&name) {
        let close_pattern = format!("</{}", name);
        return match find_ascii_ci(input, i, &close_pattern) {
            Some(close_start) => {
                if close_start > i {
                    let raw = input[i..close_start].to_string();
                    let text = doc.push_node(Node {
                        parent: Some(element),
                        children: Vec::new(),
                        data: NodeData::Text(raw),
                    });
                    doc.nodes[element].children.push(text);
                }
                match input[close_start..].find('>') {
                    Some(gt) => close_start + gt + 1,
                    None => len,
                }
            }
            None => {
                if i < len {
                    let text = doc.push_node(Node {
                        parent: Some(element),
                        children: Vec::new(),
                        data: NodeData::Text(input[i..].to_string()),
                    });
                    doc.nodes[element].children.push(text);
                }
                len
            }
        };
    }

    if !self_closing && !is_void(&name) {
        stack.push(element);
    }
    i
}

/// ASCII-case-insensitive substring search starting at `from`
fn find_ascii_ci(haystack: &str, from: usize, needle: &str) -> Option<usize> {
    let haystack_bytes = haystack.as_bytes();
    let needle_bytes = needle.as_bytes();
    if needle_bytes.is_empty() || from >= haystack_bytes.len() {
        return None;
    }
    let end = haystack_bytes.len().checked_sub(needle_bytes.len())?;
    (from..=end).find(|&start| {
        haystack_bytes[start..start + needle_bytes.len()]
            .iter()
            .zip(needle_bytes)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    })
}
