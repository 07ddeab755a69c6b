//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into use-case APIs.
//! - Classify every failure into the caller-facing error taxonomy.

pub mod course_service;
