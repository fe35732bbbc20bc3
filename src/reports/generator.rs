use crate::kinship::{PersonGraph, PersonId};
use crate::types::{TreeNode, TreeReport};
use chrono::Utc;
use uuid::Uuid;

/// Builds serializable reports from a detached tree
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Walk the tree rooted at `root` into a nested report.
    ///
    /// `root` must be the handle returned by the extractor: the walk follows
    /// every surviving link and relies on extraction having already broken
    /// any loops.
    pub fn tree_report(&self, graph: &PersonGraph, root: PersonId, depth: usize) -> TreeReport {
        let tree = self.build_node(graph, root);
        TreeReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            root_id: graph.person(root).id.clone(),
            depth,
            person_count: tree.person_count(),
            tree,
        }
    }

    fn build_node(&self, graph: &PersonGraph, id: PersonId) -> TreeNode {
        // sorted handles keep the report stable across runs
        let mut parents: Vec<PersonId> = graph.parents(id).iter().copied().collect();
        parents.sort();
        let mut children: Vec<PersonId> = graph.children(id).iter().copied().collect();
        children.sort();

        TreeNode {
            person: graph.person(id).clone(),
            parents: parents
                .into_iter()
                .map(|p| self.build_node(graph, p))
                .collect(),
            children: children
                .into_iter()
                .map(|c| self.build_node(graph, c))
                .collect(),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
