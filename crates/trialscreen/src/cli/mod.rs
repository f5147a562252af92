//! CLI functionality for the screening tool
//!
//! This module contains all CLI-related functionality including:
//! - Catalog and patient loading shared by every command
//! - Trial listing
//! - Batch screening, patient matching and recruitment reports
//! - The bundled demonstration
//! - Output formatting

pub mod demo;
pub mod matching;
pub mod output;
pub mod report;
pub mod screen;
pub mod session;
pub mod trials;
