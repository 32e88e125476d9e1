//! # Prompt Template Modules
//!
//! This module organizes all prompt templates used by the `nl2sql` pipeline.
//! `tasks` holds the role descriptions and task templates for each stage, and
//! `core` holds the helpers that fill them in.

pub mod core;
pub mod tasks;
