use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::error::RuntimeError;

/// Keyed localized strings. Entries may carry `|`-separated plural variants,
/// each optionally prefixed with a `{selector}`.
#[derive(Debug, Default, Clone)]
pub struct TranslationTable {
    entries: FxHashMap<String, String>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Resolve a blueprint at render time. Lookup uses the explicit key when
    /// one was compiled in, otherwise the blueprint itself; a missing entry
    /// returns the blueprint unchanged. A found entry is plural-selected by
    /// `count`, then merged against the blueprint.
    pub fn translate(
        &self,
        blueprint: &str,
        key: Option<&str>,
        count: Option<i64>,
    ) -> Result<String, RuntimeError> {
        let lookup = key.unwrap_or(blueprint);
        let raw = match self.entries.get(lookup) {
            Some(raw) => raw,
            None => return Ok(blueprint.to_string()),
        };
        merge_blueprint(blueprint, select_variant(raw, count))
    }
}

/// Pick a plural variant. Selectors: `{n}` exact, `{a,b}` inclusive range,
/// `{a,}` at least, `{,b}` at most. Without a count the first variant wins;
/// a selector-less variant serves as the fallback.
fn select_variant(raw: &str, count: Option<i64>) -> &str {
    if !raw.contains('|') && !raw.trim_start().starts_with('{') {
        return raw;
    }
    let variants: Vec<&str> = raw.split('|').collect();
    let n = match count {
        Some(n) => n,
        None => return strip_selector(variants[0]).1,
    };
    let mut fallback = None;
    for variant in &variants {
        let (selector, text) = strip_selector(variant);
        match selector {
            Some(selector) if selector_matches(selector, n) => return text,
            None if fallback.is_none() => fallback = Some(text),
            _ => {}
        }
    }
    fallback.unwrap_or_else(|| strip_selector(variants[0]).1)
}

fn strip_selector(variant: &str) -> (Option<&str>, &str) {
    let trimmed = variant.trim();
    if let Some(rest) = trimmed.strip_prefix('{') {
        if let Some(end) = rest.find('}') {
            return (Some(&rest[..end]), rest[end + 1..].trim_start());
        }
    }
    (None, trimmed)
}

fn selector_matches(selector: &str, n: i64) -> bool {
    let selector = selector.trim();
    match selector.split_once(',') {
        None => selector.parse::<i64>().map(|v| v == n).unwrap_or(false),
        Some((from, to)) => {
            let from = from.trim();
            let to = to.trim();
            match (from.parse::<i64>().ok(), to.parse::<i64>().ok()) {
                (Some(from), Some(to)) => from <= n && n <= to,
                (Some(from), None) if to.is_empty() => n >= from,
                (None, Some(to)) if from.is_empty() => n <= to,
                _ => false,
            }
        }
    }
}

struct TagEvent {
    name: String,
    start: usize,
    end: usize,
    open: bool,
}

/// Scan element tags in a fragment, treating `<?php … ?>` spans as opaque —
/// including inside attribute values.
fn scan_tags(s: &str) -> Vec<TagEvent> {
    let bytes = s.as_bytes();
    let mut events = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        if s[i..].starts_with("<?") {
            i = s[i..].find("?>").map(|p| i + p + 2).unwrap_or(bytes.len());
            continue;
        }
        if bytes[i] == b'<' {
            let close = i + 1 < bytes.len() && bytes[i + 1] == b'/';
            let name_start = i + if close { 2 } else { 1 };
            let mut j = name_start;
            while j < bytes.len()
                && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'-' || bytes[j] == b'_')
            {
                j += 1;
            }
            if j == name_start {
                i += 1;
                continue;
            }
            let name = s[name_start..j].to_string();
            let mut k = j;
            loop {
                if k >= bytes.len() {
                    break;
                }
                if s[k..].starts_with("<?") {
                    k = s[k..].find("?>").map(|p| k + p + 2).unwrap_or(bytes.len());
                    continue;
                }
                if bytes[k] == b'>' {
                    k += 1;
                    break;
                }
                k += 1;
            }
            events.push(TagEvent {
                name,
                start: i,
                end: k,
                open: !close,
            });
            i = k;
        } else {
            i += 1;
        }
    }
    events
}

/// Merge a selected translation against the blueprint: the blueprint's full
/// open tags (attributes and embedded code intact) replace the translation's
/// bare tags in order of occurrence, and an empty translation element pulls
/// the blueprint's inner content. A translation tag the blueprint lacks is a
/// mismatch.
fn merge_blueprint(blueprint: &str, translation: &str) -> Result<String, RuntimeError> {
    let bp_events = scan_tags(blueprint);

    // per-name queues of (full open tag, inner content), in blueprint order
    let mut occurrences: FxHashMap<String, VecDeque<(String, String)>> = FxHashMap::default();
    for (idx, ev) in bp_events.iter().enumerate() {
        if !ev.open {
            continue;
        }
        let full = blueprint[ev.start..ev.end].to_string();
        let mut depth = 1i32;
        let mut inner_end = None;
        for later in &bp_events[idx + 1..] {
            if later.name == ev.name {
                if later.open {
                    depth += 1;
                } else {
                    depth -= 1;
                    if depth == 0 {
                        inner_end = Some(later.start);
                        break;
                    }
                }
            }
        }
        let inner = inner_end
            .map(|e| blueprint[ev.end..e].to_string())
            .unwrap_or_default();
        occurrences
            .entry(ev.name.clone())
            .or_default()
            .push_back((full, inner));
    }

    let tr_events = scan_tags(translation);
    let mut out = String::with_capacity(translation.len());
    let mut cursor = 0usize;
    let mut idx = 0usize;
    while idx < tr_events.len() {
        let ev = &tr_events[idx];
        out.push_str(&translation[cursor..ev.start]);
        if !ev.open {
            if !occurrences.contains_key(&ev.name) {
                return Err(RuntimeError::BlueprintMismatch {
                    tag: ev.name.clone(),
                });
            }
            out.push_str(&translation[ev.start..ev.end]);
            cursor = ev.end;
            idx += 1;
            continue;
        }
        let (full, bp_inner) = occurrences
            .get_mut(&ev.name)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| RuntimeError::BlueprintMismatch {
                tag: ev.name.clone(),
            })?;

        // find the matching close within the translation
        let mut depth = 1i32;
        let mut close_idx = None;
        for (cj, later) in tr_events.iter().enumerate().skip(idx + 1) {
            if later.name == ev.name {
                if later.open {
                    depth += 1;
                } else {
                    depth -= 1;
                    if depth == 0 {
                        close_idx = Some(cj);
                        break;
                    }
                }
            }
        }
        match close_idx {
            Some(cj) if translation[ev.end..tr_events[cj].start].trim().is_empty() => {
                out.push_str(&full);
                out.push_str(&bp_inner);
                out.push_str("</");
                out.push_str(&ev.name);
                out.push('>');
                cursor = tr_events[cj].end;
                idx = cj + 1;
            }
            _ => {
                out.push_str(&full);
                cursor = ev.end;
                idx += 1;
            }
        }
    }
    out.push_str(&translation[cursor..]);
    Ok(out)
}
