//! Run logging

pub mod jsonl;

pub use jsonl::JsonlRunLogger;
