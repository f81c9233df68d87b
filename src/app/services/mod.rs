//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - DOCX and markdown import
//! - Quick-note snippets

pub mod importer;
pub mod notes;
