//! Assembly engine for editais de licitação: merges registry field data
//! into a rich-text base document, keeps the heading outline in sync with
//! edits, and orchestrates the paginated A4 preview.

pub mod app;

pub use app::domain::{AppSettings, FieldCatalog, FormState, InsertionMode, Message};
pub use app::infrastructure::error::{AppError, Result};
pub use app::state::AppState;
