//! Main session coordinator. Owns the catalog, form state, live document
//! and the three controllers; every UI event arrives here as a [`Message`].
//!
//! The document is the single shared mutable resource. Only insertion,
//! import and highlight handling write to it, always through the
//! [`DocumentModel`] contract.

use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::app::controllers::insertion::{ChipView, InsertionController, chip_views};
use crate::app::controllers::outline::{OutlineExtractor, OutlineRow, ViewportSignal};
use crate::app::controllers::pagination::{
    PaginationCoordinator, PaginationRenderer, PrintAction, RenderSurface,
};
use crate::app::domain::catalog::FieldCatalog;
use crate::app::domain::form::FormState;
use crate::app::domain::messages::Message;
use crate::app::domain::settings::AppSettings;
use crate::app::services::importer::{self, DocxConverter};
use crate::app::services::notes::note_by_id;
use crate::app::infrastructure::document::{DocumentModel, MarkupDocument};

/// Placeholder draft shown before any base text is loaded.
pub const INITIAL_CONTENT: &str = "<p>Monte o texto base do edital aqui…</p>";

/// Borrowed preview collaborators needed while dispatching messages.
pub struct PreviewWidgets<'a> {
    pub renderer: &'a mut dyn PaginationRenderer,
    pub surface: &'a mut RenderSurface,
    pub printer: &'a mut dyn PrintAction,
}

pub struct AppState {
    pub catalog: FieldCatalog,
    pub form: FormState,
    pub settings: AppSettings,
    pub document: MarkupDocument,
    pub insertion: InsertionController,
    pub outline: OutlineExtractor,
    pub pagination: PaginationCoordinator,
    viewport: Box<dyn ViewportSignal>,
    converter: Arc<dyn DocxConverter>,
    sender: Sender<Message>,
    preview_open: bool,
    /// Last recoverable fault (import or render), for the status surface.
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new(
        catalog: FieldCatalog,
        settings: AppSettings,
        converter: Arc<dyn DocxConverter>,
        viewport: Box<dyn ViewportSignal>,
        sender: Sender<Message>,
    ) -> Self {
        let form = FormState::seeded_from(&catalog);
        let mut state = Self {
            catalog,
            form,
            settings,
            document: MarkupDocument::new(INITIAL_CONTENT),
            insertion: InsertionController::new(),
            outline: OutlineExtractor::new(),
            pagination: PaginationCoordinator::new(),
            viewport,
            converter,
            sender,
            preview_open: false,
            last_error: None,
        };
        state.refresh_outline();
        state
    }

    /// Replace the whole draft (imported base text) and rebuild the outline.
    pub fn set_base_content(&mut self, markup: &str) {
        self.document.set_content(markup);
        self.refresh_outline();
    }

    pub fn handle_message(&mut self, message: Message, preview: &mut PreviewWidgets) {
        match message {
            Message::SectionChanged(partial) => {
                self.form.merge_partial(&self.catalog, partial);
            }
            Message::SetInsertionMode(mode) => {
                self.settings.insertion_mode = mode;
            }

            Message::ChipClicked(field_id) => {
                let Some(field) = self.catalog.field(&field_id).cloned() else {
                    return;
                };
                self.insertion.insert(
                    &field,
                    self.settings.insertion_mode,
                    &self.form,
                    &mut self.document,
                );
                self.refresh_outline();
            }
            Message::DragStarted(field_id) => {
                if let Some(field) = self.catalog.field(&field_id) {
                    let field = field.clone();
                    self.insertion.drag_start(&field);
                }
            }
            Message::DragDropped { target } => {
                let inserted = self.insertion.drag_drop(
                    &target,
                    self.settings.insertion_mode,
                    &self.form,
                    &mut self.document,
                );
                if inserted.is_some() {
                    self.refresh_outline();
                }
            }
            Message::DragCancelled => {
                self.insertion.drag_cancel();
            }

            Message::ContentEdited => {
                self.refresh_outline();
            }
            Message::ApplyHighlight(kind) => {
                self.document.apply_highlight(kind);
            }
            Message::InsertNote(note_id) => {
                if let Some(note) = note_by_id(&note_id) {
                    let position = self.document.selection().map(|s| s.index);
                    self.document.paste_markup(position, note.html);
                    self.refresh_outline();
                }
            }

            Message::ImportDocxUrl(url) => {
                importer::import_from_url(url, self.converter.clone(), self.sender.clone());
            }
            Message::ImportDocxFile(path) => {
                importer::import_from_file(path, self.converter.clone(), self.sender.clone());
            }
            Message::DocxImported(Ok(markup)) => {
                // The cursor context is the one current now, not the one
                // from when the import was requested.
                let position = self.document.selection().map(|s| s.index);
                self.document.paste_markup(position, &markup);
                self.refresh_outline();
            }
            Message::DocxImported(Err(cause)) => {
                eprintln!("Import failed: {}", cause);
                self.last_error = Some(cause);
            }

            Message::HeadingVisibility {
                id,
                visible,
                offset,
            } => {
                self.outline.on_visibility(&id, visible, offset);
            }

            Message::SetOrientation(orientation) => {
                self.settings.orientation = orientation;
            }
            Message::SetMargins(margins) => {
                self.settings.margins = margins.clamped();
            }
            Message::OpenPreview { auto_print } => {
                self.preview_open = true;
                self.pagination
                    .schedule(self.document.content(), self.settings.layout(), auto_print);
                let _ = self.sender.send(Message::RunPagination);
            }
            Message::RunPagination => {
                if !self.preview_open {
                    return;
                }
                if let Err(e) =
                    self.pagination
                        .run_pending(preview.renderer, preview.surface, preview.printer)
                {
                    eprintln!("Pagination failed: {}", e);
                    self.last_error = Some(e.to_string());
                }
            }
            Message::ClosePreview => {
                self.preview_open = false;
                self.pagination.cancel();
                preview.surface.clear();
            }
        }
    }

    /// Re-derive the outline from the current content, writing back any
    /// heading ids the extraction injected. The cursor survives the rewrite,
    /// shifted past whatever id text was injected before it.
    fn refresh_outline(&mut self) {
        let updated = self
            .outline
            .extract(self.document.content(), self.viewport.as_mut());
        if updated != self.document.content() {
            let selection = self.document.selection();
            let remapped =
                selection.map(|sel| remap_index(self.document.content(), &updated, sel.index));
            self.document.set_content(&updated);
            if let (Some(sel), Some(index)) = (selection, remapped) {
                self.document.set_selection(index, sel.length);
            }
        }
    }

    /// Catalog listing for chip rendering.
    pub fn chips(&self) -> Vec<ChipView> {
        chip_views(&self.catalog, &self.form)
    }

    /// Outline rows for navigation UI.
    pub fn outline_rows(&self) -> Vec<OutlineRow> {
        self.outline.rows()
    }

    pub fn preview_open(&self) -> bool {
        self.preview_open
    }
}

/// Map a byte index in `old` onto `new`, where `new` is `old` with attribute
/// text inserted at arbitrary points. Walks both strings skipping the
/// inserted bytes, so a cursor keeps pointing at the same character.
fn remap_index(old: &str, new: &str, index: usize) -> usize {
    let old_bytes = old.as_bytes();
    let new_bytes = new.as_bytes();
    let mut o = 0;
    let mut n = 0;
    while o < index.min(old_bytes.len()) && n < new_bytes.len() {
        if old_bytes[o] == new_bytes[n] {
            o += 1;
        }
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::controllers::outline::NullViewport;
    use crate::app::controllers::pagination::{BlockRenderer, NoPrint};
    use crate::app::domain::form::InsertionMode;
    use crate::app::infrastructure::error::Result;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::mpsc::{self, Receiver};

    struct EchoConverter;

    impl DocxConverter for EchoConverter {
        fn convert(&self, bytes: &[u8]) -> Result<String> {
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    fn catalog() -> FieldCatalog {
        FieldCatalog::from_json(
            &json!({
                "sections": [
                    {"id": "imovel", "title": "Imóvel", "field_ids": ["valor", "prazo"]}
                ],
                "fields": [
                    {"id": "valor", "label": "Valor", "tipo": "money",
                     "tokens": ["VALOR"], "mock_value": 1000},
                    {"id": "prazo", "label": "Prazo", "tokens": ["PRAZO"], "mock_value": 60}
                ],
                "initial_data": {"valor": 1234.5}
            })
            .to_string(),
        )
        .unwrap()
    }

    fn state() -> (AppState, Receiver<Message>) {
        let (sender, receiver) = mpsc::channel();
        let state = AppState::new(
            catalog(),
            AppSettings::default(),
            Arc::new(EchoConverter),
            Box::new(NullViewport),
            sender,
        );
        (state, receiver)
    }

    fn dispatch(state: &mut AppState, surface: &mut RenderSurface, message: Message) {
        let mut renderer = BlockRenderer::default();
        let mut printer = NoPrint;
        let mut preview = PreviewWidgets {
            renderer: &mut renderer,
            surface,
            printer: &mut printer,
        };
        state.handle_message(message, &mut preview);
    }

    #[test]
    fn test_initial_state() {
        let (state, _rx) = state();
        assert_eq!(state.document.content(), INITIAL_CONTENT);
        assert!(state.outline_rows().is_empty());
        assert_eq!(state.chips().len(), 2);
        assert_eq!(state.chips()[0].value, "R$ 1.234,50");
    }

    #[test]
    fn test_chip_click_inserts_token() {
        let (mut state, _rx) = state();
        let mut surface = RenderSurface::new();
        dispatch(&mut state, &mut surface, Message::ChipClicked("prazo".to_string()));
        assert!(state.document.content().ends_with("[PRAZO]"));
    }

    #[test]
    fn test_section_change_feeds_value_mode_insert() {
        let (mut state, _rx) = state();
        let mut surface = RenderSurface::new();
        state.set_base_content("");

        let mut partial = BTreeMap::new();
        partial.insert("prazo".to_string(), json!("15"));
        dispatch(&mut state, &mut surface, Message::SectionChanged(partial));
        dispatch(
            &mut state,
            &mut surface,
            Message::SetInsertionMode(InsertionMode::Value),
        );
        dispatch(&mut state, &mut surface, Message::ChipClicked("prazo".to_string()));

        assert_eq!(state.document.content(), "15");
    }

    #[test]
    fn test_drag_outside_drop_zone_is_noop() {
        let (mut state, _rx) = state();
        let mut surface = RenderSurface::new();
        let before = state.document.content().to_string();

        dispatch(&mut state, &mut surface, Message::DragStarted("valor".to_string()));
        dispatch(
            &mut state,
            &mut surface,
            Message::DragDropped {
                target: "coluna-a".to_string(),
            },
        );
        assert_eq!(state.document.content(), before);
    }

    #[test]
    fn test_content_edit_rebuilds_outline_with_stable_ids() {
        let (mut state, _rx) = state();
        let mut surface = RenderSurface::new();

        state.set_base_content("<h1>Objeto</h1><p>x</p>");
        let first_id = state.outline_rows()[0].id.clone();

        // Simulate an edit appending a heading; the first id must survive.
        let edited = format!("{}<h2>Prazo</h2>", state.document.content());
        state.document.set_content(&edited);
        dispatch(&mut state, &mut surface, Message::ContentEdited);

        let rows = state.outline_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, first_id);
        assert_ne!(rows[1].id, first_id);
    }

    #[test]
    fn test_cursor_keeps_place_across_id_injection() {
        let (mut state, _rx) = state();
        let mut surface = RenderSurface::new();

        state.document.set_content("<h1>Objeto</h1><p>abc</p>");
        // Cursor just before the 'b'; the heading ahead of it is about to
        // gain an injected id attribute.
        let index = state.document.content().find('b').unwrap();
        state.document.set_selection(index, 0);
        dispatch(&mut state, &mut surface, Message::ContentEdited);

        assert!(state.document.content().starts_with("<h1 id=\""));
        let sel = state.document.selection().unwrap();
        assert!(state.document.content()[sel.index..].starts_with('b'));
    }

    #[test]
    fn test_remap_index_before_and_after_insertion() {
        let old = "<h1>T</h1>x";
        let new = "<h1 id=\"h-1\">T</h1>x";
        // Before the insertion point nothing moves.
        assert_eq!(remap_index(old, new, 2), 2);
        // Past it, the index shifts by the inserted length.
        assert_eq!(remap_index(old, new, old.len()), new.len());
    }

    #[test]
    fn test_heading_visibility_marks_active_row() {
        let (mut state, _rx) = state();
        let mut surface = RenderSurface::new();
        state.set_base_content("<h1>A</h1><h2>B</h2>");
        let rows = state.outline_rows();

        dispatch(
            &mut state,
            &mut surface,
            Message::HeadingVisibility {
                id: rows[1].id.clone(),
                visible: true,
                offset: 10.0,
            },
        );
        let rows = state.outline_rows();
        assert!(!rows[0].active);
        assert!(rows[1].active);
    }

    #[test]
    fn test_preview_roundtrip() {
        let (mut state, rx) = state();
        let mut surface = RenderSurface::new();
        state.set_base_content("<p>conteúdo</p>");

        dispatch(
            &mut state,
            &mut surface,
            Message::OpenPreview { auto_print: false },
        );
        assert!(state.preview_open());
        // The coordinator queued the actual render behind a message.
        let follow_up = rx.try_recv().unwrap();
        assert!(matches!(follow_up, Message::RunPagination));
        dispatch(&mut state, &mut surface, follow_up);

        assert!(!surface.is_empty());
        assert!(surface.html().contains("<p>conteúdo</p>"));

        dispatch(&mut state, &mut surface, Message::ClosePreview);
        assert!(!state.preview_open());
        assert!(surface.is_empty());
    }

    #[test]
    fn test_run_pagination_after_close_is_discarded() {
        let (mut state, rx) = state();
        let mut surface = RenderSurface::new();

        dispatch(
            &mut state,
            &mut surface,
            Message::OpenPreview { auto_print: false },
        );
        dispatch(&mut state, &mut surface, Message::ClosePreview);
        let queued = rx.try_recv().unwrap();
        dispatch(&mut state, &mut surface, queued);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_margins_clamped_on_set() {
        let (mut state, _rx) = state();
        let mut surface = RenderSurface::new();
        dispatch(
            &mut state,
            &mut surface,
            Message::SetMargins(crate::app::domain::layout::Margins::uniform(99)),
        );
        assert_eq!(
            state.settings.margins,
            crate::app::domain::layout::Margins::uniform(50)
        );
    }

    #[test]
    fn test_docx_import_applies_at_current_cursor() {
        let (mut state, _rx) = state();
        let mut surface = RenderSurface::new();
        state.set_base_content("<p>AB</p>");
        // Cursor moved after the import was requested; the paste must use
        // the position current at delivery time.
        state.document.set_selection(5, 0);

        dispatch(
            &mut state,
            &mut surface,
            Message::DocxImported(Ok("<em>X</em>".to_string())),
        );
        assert_eq!(state.document.content(), "<p>AB<em>X</em></p>");
    }

    #[test]
    fn test_docx_import_failure_keeps_content() {
        let (mut state, _rx) = state();
        let mut surface = RenderSurface::new();
        let before = state.document.content().to_string();

        dispatch(
            &mut state,
            &mut surface,
            Message::DocxImported(Err("Falha ao carregar DOCX (404)".to_string())),
        );
        assert_eq!(state.document.content(), before);
        assert_eq!(
            state.last_error.as_deref(),
            Some("Falha ao carregar DOCX (404)")
        );
    }

    #[test]
    fn test_insert_note_pastes_snippet() {
        let (mut state, _rx) = state();
        let mut surface = RenderSurface::new();
        state.set_base_content("");

        dispatch(
            &mut state,
            &mut surface,
            Message::InsertNote("nota-sobrepreco".to_string()),
        );
        assert!(state.document.content().contains("sobrepreço"));

        let before = state.document.content().to_string();
        dispatch(
            &mut state,
            &mut surface,
            Message::InsertNote("nota-inexistente".to_string()),
        );
        assert_eq!(state.document.content(), before);
    }
}
