pub mod extract;
pub mod graph;
pub mod relation;

pub use extract::extract_subtree;
pub use graph::{GraphError, GraphStatistics, PersonGraph, PersonId};
pub use relation::{is_ancestor, is_relative};
