use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::form::InsertionMode;
use super::layout::{Margins, Orientation};
use crate::app::infrastructure::document::Highlight;

/// All events the session reacts to. UI callbacks send one of these; the
/// dispatch loop hands them to `AppState::handle_message`.
#[derive(Debug, Clone)]
pub enum Message {
    // Form
    SectionChanged(BTreeMap<String, Value>),
    SetInsertionMode(InsertionMode),

    // Chips
    ChipClicked(String),
    DragStarted(String),
    DragDropped { target: String },
    DragCancelled,

    // Editor
    ContentEdited,
    ApplyHighlight(Highlight),
    InsertNote(String),

    // Import
    ImportDocxUrl(String),
    ImportDocxFile(PathBuf),
    DocxImported(Result<String, String>),

    // Outline
    HeadingVisibility {
        id: String,
        visible: bool,
        offset: f64,
    },

    // Pagination preview
    SetOrientation(Orientation),
    SetMargins(Margins),
    OpenPreview { auto_print: bool },
    RunPagination,
    ClosePreview,
}
