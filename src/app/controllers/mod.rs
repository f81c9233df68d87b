//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and the UI:
//! - Field insertion (chips, drag and drop, value formatting)
//! - Outline extraction and active-heading tracking
//! - Paginated preview and print orchestration

pub mod insertion;
pub mod outline;
pub mod pagination;
