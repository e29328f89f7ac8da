use sable_dom::{Document, NodeId, RawAttr};

use crate::emit;
use crate::error::CompileError;
use crate::expr::rewrite_calls;
use crate::forloop::{self, ForLoop};

/// Boolean attributes with a single canonical presence form.
const BOOL_ATTRS: &[&str] = &[
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "compact",
    "controls",
    "default",
    "defer",
    "disabled",
    "formnovalidate",
    "hidden",
    "indeterminate",
    "ismap",
    "loop",
    "multiple",
    "muted",
    "nohref",
    "noresize",
    "noshade",
    "novalidate",
    "nowrap",
    "open",
    "readonly",
    "required",
    "reversed",
    "scoped",
    "seamless",
    "selected",
    "sortable",
];

/// Boolean attributes with distinct enabled/disabled value forms.
const TWO_FORM_ATTRS: &[(&str, &str, &str)] = &[
    ("autocomplete", "on", "off"),
    ("border", "1", "0"),
    ("contenteditable", "true", "false"),
    ("frameborder", "1", "0"),
    ("spellcheck", "true", "false"),
    ("translate", "yes", "no"),
];

/// A control-flow wrapper staged by a directive attribute; opened before the
/// element and closed after it in LIFO order.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOpen {
    If(String),
    ElseIf(String),
    Else,
    For(ForLoop),
}

/// One emitted attribute fragment: the final (or pseudo) name, the source
/// quote style, and the parsed text mixing literal markup with directive
/// escapes.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledAttr {
    pub name: String,
    pub enclosure: char,
    pub parsed: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOpen {
    pub key: Option<String>,
    pub params: String,
}

/// Result of classifying a node's raw attribute list.
#[derive(Debug, Default)]
pub struct CompiledAttrs {
    pub control: Vec<ControlOpen>,
    pub attrs: Vec<CompiledAttr>,
    pub translation: Option<TranslationOpen>,
    pub skip: bool,
    pub partial: Option<String>,
    pub bind_partial: Option<String>,
}

impl CompiledAttrs {
    /// The in-tag markup: every per-attribute fragment concatenated.
    pub fn markup(&self) -> String {
        self.attrs.iter().map(|a| a.parsed.as_str()).collect()
    }
}

/// Directives fire in a fixed order regardless of where they sit in the
/// tag, so conditional wrappers land outside loop wrappers.
fn directive_rank(attr: &RawAttr) -> u8 {
    match attr.key.as_str() {
        "s-if" => 0,
        "s-elseif" => 1,
        "s-else" => 2,
        "s-for" => 3,
        _ => 4,
    }
}

pub fn compile_attrs(
    doc: &Document,
    node: NodeId,
    template: &str,
) -> Result<CompiledAttrs, CompileError> {
    let raw = doc.attrs(node);
    let tag = doc.tag_name(node).unwrap_or_default().to_string();

    // bind targets suppress their plain counterparts; class and style are
    // the only attributes allowed to appear both plain and bound
    let mut suppressed: Vec<&str> = Vec::new();
    let mut has_bind_class = false;
    let mut has_bind_style = false;
    let mut has_bind_partial = false;
    for a in raw.iter().filter(|a| a.key == "s-bind") {
        match a.ty.as_deref() {
            Some("class") => has_bind_class = true,
            Some("style") => has_bind_style = true,
            Some("s-partial") => has_bind_partial = true,
            Some(t) => suppressed.push(t),
            None => {
                return Err(CompileError::MissingBindType {
                    template: template.to_string(),
                    tag,
                })
            }
        }
    }

    let mut order: Vec<usize> = (0..raw.len()).collect();
    order.sort_by_key(|&i| directive_rank(&raw[i]));

    let mut out = CompiledAttrs::default();
    for &i in &order {
        let a = &raw[i];
        match (a.key.as_str(), a.ty.as_deref()) {
            ("s-translate", ty) => {
                out.translation = Some(TranslationOpen {
                    key: ty.map(str::to_string),
                    params: rewrite_calls(a.value_str()),
                });
            }
            // reserved pseudo-attribute, never emitted
            ("s-partial-var", _) => {}
            ("s-skip", _) => out.skip = true,
            ("s-partial", _) => {
                if !has_bind_partial {
                    out.partial = Some(a.value_str().to_string());
                }
            }
            ("s-for", _) => {
                let mut f = forloop::parse_for_value(a.value_str()).map_err(|_| {
                    CompileError::MalformedFor {
                        template: template.to_string(),
                        tag: tag.clone(),
                        value: a.value_str().to_string(),
                    }
                })?;
                f.items = rewrite_calls(&f.items);
                out.control.push(ControlOpen::For(f));
            }
            ("s-if", _) => out.control.push(ControlOpen::If(rewrite_calls(a.value_str()))),
            ("s-elseif", _) => out
                .control
                .push(ControlOpen::ElseIf(rewrite_calls(a.value_str()))),
            ("s-else", _) => out.control.push(ControlOpen::Else),
            ("s-bind", Some("class")) => {
                out.attrs.push(merged_attr("class", " ", plain_value(raw, "class"), a))
            }
            ("s-bind", Some("style")) => {
                out.attrs
                    .push(merged_attr("style", "; ", plain_value(raw, "style"), a))
            }
            ("s-bind", Some("s-partial")) => {
                out.bind_partial = Some(rewrite_calls(a.value_str()))
            }
            ("s-bind", Some(t)) => out.attrs.push(bound_attr(t, a)),
            ("s-bind", None) => unreachable!("rejected above"),
            _ => {
                if (a.key == "class" && has_bind_class) || (a.key == "style" && has_bind_style) {
                    continue; // folded into the merged emission
                }
                if suppressed.contains(&a.name.as_str()) {
                    continue;
                }
                out.attrs.push(passthrough(a));
            }
        }
    }
    Ok(out)
}

/// Pass-through: name and text copied verbatim, prefixed with one space.
fn passthrough(a: &RawAttr) -> CompiledAttr {
    let parsed = match &a.value {
        Some(v) => format!(" {}={}{}{}", a.name, a.enclosure, v, a.enclosure),
        None => format!(" {}", a.name),
    };
    CompiledAttr {
        name: a.name.clone(),
        enclosure: a.enclosure,
        parsed,
    }
}

fn bound_attr(target: &str, a: &RawAttr) -> CompiledAttr {
    let expr = rewrite_calls(a.value_str());
    let parsed = if BOOL_ATTRS.contains(&target) {
        emit::php_bool_attr(target, &expr)
    } else if let Some((_, on, off)) = TWO_FORM_ATTRS.iter().find(|(n, _, _)| *n == target) {
        emit::php_two_form_attr(target, &expr, on, off)
    } else {
        format!(
            " {}={}{}{}",
            target,
            a.enclosure,
            emit::php_echo_escaped(&expr),
            a.enclosure
        )
    };
    CompiledAttr {
        name: target.to_string(),
        enclosure: a.enclosure,
        parsed,
    }
}

/// Merged `class`/`style` emission: plain tokens first, then bound truthy
/// entries; empties filtered, duplicates removed, joined on `delim`.
fn merged_attr(attr: &str, delim: &str, plain: Option<&str>, a: &RawAttr) -> CompiledAttr {
    let expr = rewrite_calls(a.value_str());
    let inner = match plain {
        Some(p) => format!(
            "implode('{d}', array_unique(array_filter(array_merge(explode('{d}', '{p}'), array_keys(array_filter({e}))))))",
            d = delim,
            p = emit::escape_quotes(p, '\''),
            e = expr
        ),
        None => format!(
            "implode('{d}', array_unique(array_filter(array_keys(array_filter({e})))))",
            d = delim,
            e = expr
        ),
    };
    let q = a.enclosure;
    CompiledAttr {
        name: attr.to_string(),
        enclosure: q,
        parsed: format!(" {attr}={q}<?php echo {inner}; ?>{q}"),
    }
}

fn plain_value<'a>(raw: &'a [RawAttr], name: &str) -> Option<&'a str> {
    raw.iter().find(|a| a.key == name).map(|a| a.value_str())
}
