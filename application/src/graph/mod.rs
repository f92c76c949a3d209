//! The plan/act/verify step graph

pub mod engine;
pub mod nodes;
pub mod routing;

pub use engine::{CompiledGraph, END, GraphBuilder, Node};
