//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Field catalog (sections, fields, seed values)
//! - Form state and insertion mode
//! - Page layout configuration
//! - Application settings
//! - Message types for the event system

pub mod catalog;
pub mod form;
pub mod layout;
pub mod messages;
pub mod settings;

pub use catalog::{Field, FieldCatalog, FieldType, Section};
pub use form::{FormState, InsertionMode};
pub use layout::{Margins, Orientation, PageLayoutConfig};
pub use messages::Message;
pub use settings::AppSettings;
