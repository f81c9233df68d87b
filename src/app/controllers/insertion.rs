//! Turns a selected catalog field plus the current insertion mode into
//! literal text delivered to the document at the cursor, and models the
//! drag-and-drop path as an explicit state machine.

use regex_lite::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::app::domain::catalog::{Field, FieldCatalog, FieldType};
use crate::app::domain::form::{FormState, InsertionMode};
use crate::app::infrastructure::document::DocumentModel;

/// The single named drop-zone; drops anywhere else are cancellations.
pub const EDITOR_DROP_ZONE: &str = "edital-editor";

/// Placeholder shown for missing or empty values.
pub const EMPTY_PLACEHOLDER: &str = "—";

static DATE_SHAPE: OnceLock<Regex> = OnceLock::new();

fn date_shape() -> &'static Regex {
    DATE_SHAPE.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("date pattern is a valid literal")
    })
}

/// Pure, total display formatting for a field value. Never fails: missing
/// values become a placeholder, non-numeric money/percent sources become 0.
pub fn format_value(field: &Field, value: &Value) -> String {
    if value.is_null() || matches!(value, Value::String(s) if s.is_empty()) {
        return EMPTY_PLACEHOLDER.to_string();
    }

    match field.tipo {
        FieldType::Money => return format_brl(coerce_number(value)),
        FieldType::Percent => return format!("{}%", format_number(coerce_number(value))),
        _ => {}
    }

    if let Value::Bool(b) = value {
        return if *b { "Sim" } else { "Não" }.to_string();
    }

    if field.tipo == FieldType::Date {
        if let Value::String(s) = value {
            if let Some(caps) = date_shape().captures(s) {
                return format!("{}/{}/{}", &caps[3], &caps[2], &caps[1]);
            }
        }
    }

    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Coerce a JSON value to a number the way the form layer does: numeric
/// strings parse, booleans map to 1/0, anything else is 0.
fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Plain number rendering: integral values print without a decimal part,
/// fractional values keep the stored precision.
fn format_number(value: f64) -> String {
    format!("{}", value)
}

/// Brazilian currency: R$ symbol, dot thousands grouping, comma decimal
/// separator, exactly two fraction digits.
fn format_brl(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;
    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, group_thousands(whole), frac)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Drag lifecycle: chips move from `Idle` to `Dragging` on pick-up; a drop on
/// the editor drop-zone inserts, any other outcome returns to `Idle` with no
/// document mutation.
#[derive(Debug, Clone, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Field),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionResult {
    pub inserted: String,
    pub position: usize,
}

#[derive(Debug, Default)]
pub struct InsertionController {
    drag: DragState,
}

impl InsertionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The literal text a field produces under the given mode. ValueMode
    /// formats the live value, falling back to the field's mock value;
    /// TokenMode emits the bracketed primary token.
    pub fn payload(&self, field: &Field, mode: InsertionMode, form: &FormState) -> String {
        match mode {
            InsertionMode::Value => {
                let value = form
                    .live_value(&field.id)
                    .unwrap_or(&field.mock_value)
                    .clone();
                format_value(field, &value)
            }
            InsertionMode::Token => format!("[{}]", field.primary_token()),
        }
    }

    /// Insert the field's payload at the cursor (end-of-content when there is
    /// no active selection) and move the cursor to just past the insertion
    /// with an empty selection. FormState is read before the document write
    /// and never mutated.
    pub fn insert(
        &self,
        field: &Field,
        mode: InsertionMode,
        form: &FormState,
        doc: &mut dyn DocumentModel,
    ) -> InsertionResult {
        let payload = self.payload(field, mode, form);
        let position = doc
            .selection()
            .map(|s| s.index)
            .unwrap_or_else(|| doc.content().len())
            .min(doc.content().len());
        doc.insert_text(Some(position), &payload);
        doc.set_selection(position + payload.len(), 0);
        InsertionResult {
            inserted: payload,
            position,
        }
    }

    pub fn drag_start(&mut self, field: &Field) {
        self.drag = DragState::Dragging(field.clone());
    }

    pub fn drag_cancel(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging(_))
    }

    /// Resolve a drop. Only a drop over the editor drop-zone inserts; any
    /// other target is equivalent to a cancellation. Either way the machine
    /// returns to `Idle`.
    pub fn drag_drop(
        &mut self,
        target: &str,
        mode: InsertionMode,
        form: &FormState,
        doc: &mut dyn DocumentModel,
    ) -> Option<InsertionResult> {
        match std::mem::take(&mut self.drag) {
            DragState::Dragging(field) if target == EDITOR_DROP_ZONE => {
                Some(self.insert(&field, mode, form, doc))
            }
            _ => None,
        }
    }
}

/// One row of the outward chip-listing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipView {
    pub id: String,
    pub label: String,
    pub value: String,
    pub origin: String,
    pub token: String,
}

/// Catalog listing for chip rendering: formatted live value, upper-cased
/// origin tag, primary token.
pub fn chip_views(catalog: &FieldCatalog, form: &FormState) -> Vec<ChipView> {
    catalog
        .fields_in_display_order()
        .into_iter()
        .map(|field| {
            let value = form.value(&field.id).cloned().unwrap_or(Value::Null);
            ChipView {
                id: field.id.clone(),
                label: field.label.clone(),
                value: format_value(field, &value),
                origin: field.origin.to_uppercase(),
                token: field.primary_token().to_string(),
            }
        })
        .collect()
}
