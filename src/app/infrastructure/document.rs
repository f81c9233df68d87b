//! Adapter over the rich-text surface. Everything else in the crate reads and
//! writes markup exclusively through the [`DocumentModel`] trait; no component
//! reaches into the markup string through a second path.

/// Cursor state: byte index into the markup plus selected length.
/// A `length` of zero is a plain (non-ranging) cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub length: usize,
}

/// Background-highlight presets used to mark passages of the edital text,
/// plus `Clear` which removes any such marking from the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Changed passages relative to the base text.
    Alteracao,
    /// Margem de preferência clauses.
    MargemPreferencia,
    /// Sistema de Registro de Preços clauses.
    Srp,
    /// Reviewer observations.
    Observacao,
    Clear,
}

impl Highlight {
    /// CSS background color for the preset, or None for `Clear`.
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Self::Alteracao => Some("#dbeafe"),
            Self::MargemPreferencia => Some("#dcfce7"),
            Self::Srp => Some("#fef3c7"),
            Self::Observacao => Some("#fee2e2"),
            Self::Clear => None,
        }
    }
}

/// Contract exposed to the rest of the engine. Positions are byte offsets
/// into the markup; `None` means append at end-of-content.
pub trait DocumentModel {
    fn content(&self) -> &str;
    fn set_content(&mut self, markup: &str);
    fn insert_text(&mut self, position: Option<usize>, text: &str);
    /// Insert pre-built markup (converted imports, note snippets).
    fn paste_markup(&mut self, position: Option<usize>, markup: &str);
    /// Set or clear a background highlight over the active selection.
    fn apply_highlight(&mut self, kind: Highlight);
    fn selection(&self) -> Option<Selection>;
    fn set_selection(&mut self, index: usize, length: usize);
}

/// In-memory markup document backing the engine.
#[derive(Debug, Default)]
pub struct MarkupDocument {
    content: String,
    selection: Option<Selection>,
}

impl MarkupDocument {
    pub fn new(markup: &str) -> Self {
        Self {
            content: markup.to_string(),
            selection: None,
        }
    }

    fn insert_at(&mut self, position: Option<usize>, payload: &str) {
        let pos = match position {
            Some(p) => clamp_position(&self.content, p),
            None => self.content.len(),
        };
        self.content.insert_str(pos, payload);
    }
}

impl DocumentModel for MarkupDocument {
    fn content(&self) -> &str {
        &self.content
    }

    fn set_content(&mut self, markup: &str) {
        self.content = markup.to_string();
        self.selection = None;
    }

    fn insert_text(&mut self, position: Option<usize>, text: &str) {
        self.insert_at(position, text);
    }

    fn paste_markup(&mut self, position: Option<usize>, markup: &str) {
        self.insert_at(position, markup);
    }

    fn apply_highlight(&mut self, kind: Highlight) {
        let Some(sel) = self.selection else { return };
        if sel.length == 0 {
            return;
        }
        let start = clamp_position(&self.content, sel.index);
        let end = clamp_position(&self.content, sel.index.saturating_add(sel.length));
        if start >= end {
            return;
        }

        let fragment = &self.content[start..end];
        let replacement = match kind.color() {
            Some(color) => format!(
                "<span style=\"background-color: {}\">{}</span>",
                color, fragment
            ),
            None => strip_highlight_spans(fragment),
        };
        let new_len = replacement.len();
        self.content.replace_range(start..end, &replacement);
        self.selection = Some(Selection {
            index: start,
            length: new_len,
        });
    }

    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn set_selection(&mut self, index: usize, length: usize) {
        let index = clamp_position(&self.content, index);
        let end = clamp_position(&self.content, index.saturating_add(length));
        self.selection = Some(Selection {
            index,
            length: end - index,
        });
    }
}

/// Clamp a byte position to the content length and back to a char boundary.
fn clamp_position(content: &str, position: usize) -> usize {
    let mut pos = position.min(content.len());
    while pos > 0 && !content.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Remove background-highlight spans from a markup fragment, keeping their
/// inner content. Other tags, including spans without a background color,
/// pass through untouched.
fn strip_highlight_spans(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    // One entry per open <span>: true if it carries a background color.
    let mut span_stack: Vec<bool> = Vec::new();
    let mut rest = fragment;

    while let Some(tag_start) = rest.find('<') {
        out.push_str(&rest[..tag_start]);
        let tag_rest = &rest[tag_start..];
        let tag_end = match tag_rest.find('>') {
            Some(e) => e + 1,
            None => {
                // Unterminated tag at the fragment edge; keep it verbatim.
                out.push_str(tag_rest);
                return out;
            }
        };
        let tag = &tag_rest[..tag_end];

        if tag.starts_with("</span") {
            match span_stack.pop() {
                Some(true) => {} // closer of a dropped highlight span
                _ => out.push_str(tag),
            }
        } else if tag.starts_with("<span") {
            let is_highlight = tag.contains("background-color");
            span_stack.push(is_highlight);
            if !is_highlight {
                out.push_str(tag);
            }
        } else {
            out.push_str(tag);
        }

        rest = &tag_rest[tag_end..];
    }

    out.push_str(rest);
    out
}
