//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - The rich-text document surface
//! - Error types

pub mod document;
pub mod error;
