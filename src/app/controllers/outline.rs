//! Derives the navigable outline from the document's h1–h4 headings and
//! tracks which heading is currently in view.
//!
//! Heading ids live in the markup itself: extraction injects an id into any
//! heading that lacks one and never touches ids already present, so running
//! the pass again over unchanged content is a no-op. Generated ids come from
//! a session-scoped monotonic counter and are never reassigned to a
//! different heading.

use std::collections::{HashMap, HashSet};

/// One heading in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub id: String,
    pub text: String,
    /// Heading level, 1 through 4.
    pub level: u8,
}

/// Outward row for navigation UI: entry plus the active flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    pub id: String,
    pub text: String,
    pub level: u8,
    pub active: bool,
}

/// Per-heading viewport visibility signal. The extractor subscribes once per
/// heading after each extraction and tears every subscription down before
/// the next one, so observers never accumulate across edits.
pub trait ViewportSignal {
    fn subscribe(&mut self, heading_id: &str) -> u64;
    fn unsubscribe(&mut self, subscription: u64);
}

/// Signal for headless use; subscriptions go nowhere.
#[derive(Debug, Default)]
pub struct NullViewport;

impl ViewportSignal for NullViewport {
    fn subscribe(&mut self, _heading_id: &str) -> u64 {
        0
    }

    fn unsubscribe(&mut self, _subscription: u64) {}
}

#[derive(Debug, Default)]
pub struct OutlineExtractor {
    /// Monotonic id counter, session-scoped. Never reset, never reused.
    next_id: u64,
    entries: Vec<OutlineEntry>,
    subscriptions: Vec<u64>,
    /// Vertical offset per currently visible heading.
    visible: HashMap<String, f64>,
    active: Option<String>,
}

impl OutlineExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive the outline from `content`. Returns the content with ids
    /// injected into headings that lacked one; the result is stable under
    /// repeated extraction.
    pub fn extract(&mut self, content: &str, viewport: &mut dyn ViewportSignal) -> String {
        for subscription in self.subscriptions.drain(..) {
            viewport.unsubscribe(subscription);
        }
        self.visible.clear();
        self.entries.clear();

        let mut used = existing_heading_ids(content);
        let mut out = String::with_capacity(content.len() + 64);
        let mut rest = content;
        let mut heading_index = 0usize;

        while let Some((tag_start, level)) = find_heading_open(rest) {
            out.push_str(&rest[..tag_start]);
            let tag_rest = &rest[tag_start..];
            let Some(open_end) = tag_rest.find('>') else {
                // Unterminated tag at the end of the content.
                out.push_str(tag_rest);
                rest = "";
                break;
            };
            let open_tag = &tag_rest[..open_end + 1];

            let id = match extract_attr(open_tag, "id") {
                Some(id) => {
                    out.push_str(open_tag);
                    id
                }
                None => {
                    let id = self.generate_id(&mut used);
                    out.push_str(&inject_id(open_tag, level, &id));
                    id
                }
            };

            let after_open = &tag_rest[open_end + 1..];
            let close = format!("</h{}>", level);
            let (inner, consumed) = match after_open.find(&close) {
                Some(pos) => (&after_open[..pos], pos + close.len()),
                None => ("", 0),
            };

            heading_index += 1;
            let text = strip_tags(inner).trim().to_string();
            let text = if text.is_empty() {
                format!("Seção {}", heading_index)
            } else {
                text
            };
            self.entries.push(OutlineEntry { id, text, level });

            out.push_str(&after_open[..consumed]);
            rest = &after_open[consumed..];
        }
        out.push_str(rest);

        // An active heading that no longer exists is forgotten.
        if let Some(active) = &self.active {
            if !self.entries.iter().any(|e| &e.id == active) {
                self.active = None;
            }
        }

        for entry in &self.entries {
            self.subscriptions.push(viewport.subscribe(&entry.id));
        }

        out
    }

    /// Record a visibility report for one heading and recompute the active
    /// entry: the visible heading with the smallest vertical offset, ties
    /// broken by document order. With nothing visible the previous active
    /// entry stands.
    pub fn on_visibility(&mut self, heading_id: &str, visible: bool, offset: f64) {
        if !self.entries.iter().any(|e| e.id == heading_id) {
            return;
        }
        if visible {
            self.visible.insert(heading_id.to_string(), offset);
        } else {
            self.visible.remove(heading_id);
        }

        let mut best: Option<(&str, f64)> = None;
        for entry in &self.entries {
            if let Some(&offset) = self.visible.get(&entry.id) {
                let better = match best {
                    Some((_, best_offset)) => offset < best_offset,
                    None => true,
                };
                if better {
                    best = Some((&entry.id, offset));
                }
            }
        }
        if let Some((id, _)) = best {
            self.active = Some(id.to_string());
        }
    }

    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn rows(&self) -> Vec<OutlineRow> {
        self.entries
            .iter()
            .map(|entry| OutlineRow {
                id: entry.id.clone(),
                text: entry.text.clone(),
                level: entry.level,
                active: self.active.as_deref() == Some(entry.id.as_str()),
            })
            .collect()
    }

    fn generate_id(&mut self, used: &mut HashSet<String>) -> String {
        loop {
            self.next_id += 1;
            let candidate = format!("h-{}", self.next_id);
            if used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Find the next h1–h4 opening tag. Returns its byte offset and level.
fn find_heading_open(content: &str) -> Option<(usize, u8)> {
    let bytes = content.as_bytes();
    let mut search_from = 0;
    while let Some(found) = content[search_from..].find("<h") {
        let pos = search_from + found;
        if pos + 2 < bytes.len() {
            let level = bytes[pos + 2];
            let next = bytes.get(pos + 3).copied();
            if (b'1'..=b'4').contains(&level) && matches!(next, Some(b'>') | Some(b' ')) {
                return Some((pos, level - b'0'));
            }
        }
        search_from = pos + 2;
    }
    None
}

/// Collect the id attributes already carried by headings in the content.
fn existing_heading_ids(content: &str) -> HashSet<String> {
    let mut ids = HashSet::new();
    let mut rest = content;
    while let Some((tag_start, _)) = find_heading_open(rest) {
        let tag_rest = &rest[tag_start..];
        let Some(open_end) = tag_rest.find('>') else {
            break;
        };
        if let Some(id) = extract_attr(&tag_rest[..open_end + 1], "id") {
            ids.insert(id);
        }
        rest = &tag_rest[open_end + 1..];
    }
    ids
}

/// Extract an attribute value from an HTML tag string. Both quote styles
/// are recognized.
fn extract_attr(tag: &str, attr_name: &str) -> Option<String> {
    for quote in ['"', '\''] {
        let pattern = format!(" {}={}", attr_name, quote);
        if let Some(pos) = tag.find(&pattern) {
            let value_start = pos + pattern.len();
            let value_end = tag[value_start..].find(quote)? + value_start;
            return Some(tag[value_start..value_end].to_string());
        }
    }
    None
}

/// Insert an id attribute right after the tag name of a heading open tag.
fn inject_id(open_tag: &str, level: u8, id: &str) -> String {
    // open_tag always starts with "<h{level}".
    format!("<h{} id=\"{}\"{}", level, id, &open_tag[3..])
}

/// Visible text of a markup fragment with tags removed.
fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut rest = fragment;
    while let Some(tag_start) = rest.find('<') {
        out.push_str(&rest[..tag_start]);
        match rest[tag_start..].find('>') {
            Some(tag_end) => rest = &rest[tag_start + tag_end + 1..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}
