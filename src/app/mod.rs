//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (FieldCatalog, FormState, Settings, Messages)
//! - `controllers/` - Orchestration (InsertionController, OutlineExtractor, PaginationCoordinator)
//! - `services/` - Business operations (importer, quick notes)
//! - `infrastructure/` - External integrations (document surface, error)
//! - `state.rs` - Main application coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::insertion::{ChipView, InsertionController, EDITOR_DROP_ZONE, format_value};
pub use controllers::outline::{NullViewport, OutlineExtractor, OutlineRow, ViewportSignal};
pub use controllers::pagination::{
    BlockRenderer, NoPrint, PaginationCoordinator, PaginationRenderer, PrintAction, RenderSurface,
};
pub use domain::{
    AppSettings, Field, FieldCatalog, FieldType, FormState, InsertionMode, Margins, Message,
    Orientation, PageLayoutConfig,
};
pub use infrastructure::document::{DocumentModel, Highlight, MarkupDocument, Selection};
pub use infrastructure::error::{AppError, Result};
pub use services::importer::DocxConverter;
pub use state::{AppState, PreviewWidgets};
