//! Cross-cutting domain utilities

pub mod string;
