use crate::{ContentType, Document, Node, NodeId, NodeKind, RawAttr, Tag};

/// HTML tags with no closing counterpart even when written without `/>`.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Hand-rolled byte-cursor parser over HTML- or XML-flavored markup.
/// Best effort: stray close tags are dropped, unclosed elements stay open
/// until end of input. Never fails on real-world templates.
pub fn parse(source: &str, content_type: ContentType) -> Result<Document, String> {
    let bytes = source.as_bytes();
    let mut doc = Document::default();
    let mut open_stack: Vec<NodeId> = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            // closing tag?
            if i + 1 < bytes.len() && bytes[i + 1] == b'/' {
                i += 2;
                let tag = read_ident(bytes, &mut i);
                skip_ws(bytes, &mut i);
                if i < bytes.len() && bytes[i] == b'>' {
                    i += 1;
                }
                // unwind to the matching open element; drop stray closes
                if let Some(pos) = open_stack.iter().rposition(|&id| {
                    matches!(&doc.nodes[id].kind, NodeKind::Element { tag: t, .. } if t.name == tag)
                }) {
                    open_stack.truncate(pos);
                }
                continue;
            }

            // comment
            if source[i..].starts_with("<!--") {
                let end = source[i..].find("-->").map(|p| i + p + 3).unwrap_or(bytes.len());
                let raw = source[i..end].to_string();
                push_node(&mut doc, &open_stack, NodeKind::Comment(raw));
                i = end;
                continue;
            }

            // processing instruction or declaration: <?xml …?>, <!DOCTYPE …>
            if i + 1 < bytes.len() && (bytes[i + 1] == b'?' || bytes[i + 1] == b'!') {
                let start = i;
                i += 2;
                let name = read_ident(bytes, &mut i);
                while i < bytes.len() && bytes[i] != b'>' {
                    i += 1;
                }
                if i < bytes.len() {
                    i += 1;
                }
                let raw = source[start..i].to_string();
                push_node(
                    &mut doc,
                    &open_stack,
                    NodeKind::Element {
                        tag: Tag {
                            name,
                            self_closing: false,
                            processing_instruction: true,
                            needs_closing_tag: false,
                        },
                        attrs: Vec::new(),
                        raw_open: raw,
                        children: Vec::new(),
                    },
                );
                continue;
            }

            // opening or self-closing tag
            let start = i;
            i += 1;
            let name = read_ident(bytes, &mut i);
            if name.is_empty() {
                // a bare '<' in text
                push_node(&mut doc, &open_stack, NodeKind::Text("<".to_string()));
                continue;
            }
            let mut attrs: Vec<RawAttr> = Vec::new();
            let mut self_closing = false;

            loop {
                skip_ws(bytes, &mut i);
                if i >= bytes.len() {
                    break;
                }
                match bytes[i] {
                    b'/' => {
                        self_closing = true;
                        i += 1;
                        skip_ws(bytes, &mut i);
                        if i < bytes.len() && bytes[i] == b'>' {
                            i += 1;
                        }
                        break;
                    }
                    b'>' => {
                        i += 1;
                        break;
                    }
                    _ => {
                        if let Some(attr) = read_attribute(source, bytes, &mut i) {
                            attrs.push(attr);
                        } else {
                            i += 1;
                        }
                    }
                }
            }

            let raw_open = source[start..i].to_string();
            let void = content_type == ContentType::Html && VOID_TAGS.contains(&name.as_str());
            let needs_closing_tag = !self_closing && !void;
            let id = push_node(
                &mut doc,
                &open_stack,
                NodeKind::Element {
                    tag: Tag {
                        name,
                        self_closing,
                        processing_instruction: false,
                        needs_closing_tag,
                    },
                    attrs,
                    raw_open,
                    children: Vec::new(),
                },
            );
            if needs_closing_tag {
                open_stack.push(id);
            }
        } else {
            // text until next '<'
            let start = i;
            while i < bytes.len() && bytes[i] != b'<' {
                i += 1;
            }
            push_node(
                &mut doc,
                &open_stack,
                NodeKind::Text(source[start..i].to_string()),
            );
        }
    }

    Ok(doc)
}

/// Allocate a node under the innermost open element (or as a root) and wire
/// the parent and previous-sibling back-edges.
fn push_node(doc: &mut Document, open_stack: &[NodeId], kind: NodeKind) -> NodeId {
    let id = doc.nodes.len();
    let parent = open_stack.last().copied();
    doc.nodes.push(Node {
        kind,
        parent,
        next_sibling: None,
    });
    let prev = match parent {
        Some(p) => match &mut doc.nodes[p].kind {
            NodeKind::Element { children, .. } => {
                let prev = children.last().copied();
                children.push(id);
                prev
            }
            _ => unreachable!("open stack holds elements only"),
        },
        None => {
            let prev = doc.roots.last().copied();
            doc.roots.push(id);
            prev
        }
    };
    if let Some(prev) = prev {
        doc.nodes[prev].next_sibling = Some(id);
    }
    id
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn read_ident(bytes: &[u8], i: &mut usize) -> String {
    let start = *i;
    while *i < bytes.len() {
        let c = bytes[*i];
        if c.is_ascii_alphanumeric() || c == b'_' || c == b'-' {
            *i += 1;
        } else {
            break;
        }
    }
    String::from_utf8_lossy(&bytes[start..*i]).into_owned()
}

fn read_attribute(source: &str, bytes: &[u8], i: &mut usize) -> Option<RawAttr> {
    let name_start = *i;
    while *i < bytes.len() {
        let c = bytes[*i];
        if c.is_ascii_alphanumeric() || c == b'_' || c == b'-' || c == b':' || c == b'.' {
            *i += 1;
        } else {
            break;
        }
    }
    if *i == name_start {
        return None;
    }
    let name = source[name_start..*i].to_string();

    skip_ws(bytes, i);
    let mut value = None;
    let mut enclosure = '"';
    if *i < bytes.len() && bytes[*i] == b'=' {
        *i += 1;
        skip_ws(bytes, i);
        if *i < bytes.len() && (bytes[*i] == b'"' || bytes[*i] == b'\'') {
            let quote = bytes[*i];
            enclosure = quote as char;
            *i += 1;
            let start = *i;
            while *i < bytes.len() && bytes[*i] != quote {
                *i += 1;
            }
            value = Some(source[start..*i].to_string());
            if *i < bytes.len() {
                *i += 1;
            }
        } else {
            // unquoted value: up to whitespace or tag end
            let start = *i;
            while *i < bytes.len()
                && !bytes[*i].is_ascii_whitespace()
                && bytes[*i] != b'>'
                && bytes[*i] != b'/'
            {
                *i += 1;
            }
            value = Some(source[start..*i].to_string());
        }
    }

    let (key, ty) = match name.find(':') {
        Some(pos) => (name[..pos].to_string(), Some(name[pos + 1..].to_string())),
        None => (name.clone(), None),
    };

    Some(RawAttr {
        key,
        ty,
        name,
        value,
        enclosure,
    })
}
