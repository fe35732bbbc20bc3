use crate::types::Person;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Stable handle into the person arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonId(usize);

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("duplicate person id: {0}")]
    DuplicatePerson(String),
    #[error("unknown person id: {0}")]
    UnknownPerson(String),
}

#[derive(Debug)]
struct Node {
    person: Person,
    parents: HashSet<PersonId>,
    children: HashSet<PersonId>,
    cut: bool,
}

/// In-memory genealogy graph: arena of person records addressed by stable
/// handles, with symmetric parent/child back-references.
///
/// Handles are never invalidated; persons are never removed, only their
/// links are. Passing a handle from another graph is a caller bug and
/// panics on the arena bounds check.
#[derive(Debug, Default)]
pub struct PersonGraph {
    nodes: Vec<Node>,
    id_index: HashMap<String, PersonId>,
}

impl PersonGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a person to the graph. The external record id must be unique.
    pub fn add_person(&mut self, person: Person) -> Result<PersonId, GraphError> {
        if self.id_index.contains_key(&person.id) {
            return Err(GraphError::DuplicatePerson(person.id));
        }

        let id = PersonId(self.nodes.len());
        self.id_index.insert(person.id.clone(), id);
        self.nodes.push(Node {
            person,
            parents: HashSet::new(),
            children: HashSet::new(),
            cut: false,
        });

        Ok(id)
    }

    /// Record a parent -> child link. Both back-references are inserted
    /// here so the edge-symmetry invariant cannot be half-applied.
    pub fn link(&mut self, parent: PersonId, child: PersonId) {
        assert!(parent != child, "person cannot be their own parent");

        self.nodes[child.0].parents.insert(parent);
        self.nodes[parent.0].children.insert(child);
        debug!("linked {} as parent of {}", parent, child);
    }

    /// Resolve an external record id to a handle, if present
    pub fn lookup(&self, external_id: &str) -> Option<PersonId> {
        self.id_index.get(external_id).copied()
    }

    /// Resolve an external record id or fail with the id in the error
    pub fn resolve(&self, external_id: &str) -> Result<PersonId, GraphError> {
        self.lookup(external_id)
            .ok_or_else(|| GraphError::UnknownPerson(external_id.to_string()))
    }

    pub fn person(&self, id: PersonId) -> &Person {
        &self.nodes[id.0].person
    }

    pub fn person_mut(&mut self, id: PersonId) -> &mut Person {
        &mut self.nodes[id.0].person
    }

    pub fn parents(&self, id: PersonId) -> &HashSet<PersonId> {
        &self.nodes[id.0].parents
    }

    pub fn children(&self, id: PersonId) -> &HashSet<PersonId> {
        &self.nodes[id.0].children
    }

    pub fn is_cut(&self, id: PersonId) -> bool {
        self.nodes[id.0].cut
    }

    pub(crate) fn set_cut(&mut self, id: PersonId, cut: bool) {
        self.nodes[id.0].cut = cut;
    }

    pub(crate) fn remove_parent(&mut self, of: PersonId, parent: PersonId) {
        self.nodes[of.0].parents.remove(&parent);
    }

    pub(crate) fn remove_child(&mut self, of: PersonId, child: PersonId) {
        self.nodes[of.0].children.remove(&child);
    }

    pub(crate) fn clear_links(&mut self, id: PersonId) {
        let node = &mut self.nodes[id.0];
        node.parents.clear();
        node.children.clear();
    }

    /// Get the number of persons in the graph
    pub fn person_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of parent -> child links in the graph
    pub fn link_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }

    /// Iterate all handles in insertion order
    pub fn person_ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        (0..self.nodes.len()).map(PersonId)
    }

    /// Get graph statistics
    pub fn statistics(&self) -> GraphStatistics {
        let total_persons = self.person_count();
        let total_links = self.link_count();

        let founders = self.nodes.iter().filter(|n| n.parents.is_empty()).count();
        let childless = self.nodes.iter().filter(|n| n.children.is_empty()).count();

        let total_degree: usize = self
            .nodes
            .iter()
            .map(|n| n.parents.len() + n.children.len())
            .sum();
        let average_degree = if total_persons > 0 {
            total_degree as f64 / total_persons as f64
        } else {
            0.0
        };

        GraphStatistics {
            total_persons,
            total_links,
            founders,
            childless,
            average_degree,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphStatistics {
    pub total_persons: usize,
    pub total_links: usize,
    /// Persons with no recorded parents
    pub founders: usize,
    /// Persons with no recorded children
    pub childless: usize,
    pub average_degree: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_graph() -> (PersonGraph, PersonId, PersonId, PersonId) {
        let mut graph = PersonGraph::new();

        let grandmother = graph.add_person(Person::new("gm", "Grandmother")).unwrap();
        let mother = graph.add_person(Person::new("m", "Mother")).unwrap();
        let child = graph.add_person(Person::new("c", "Child")).unwrap();

        graph.link(grandmother, mother);
        graph.link(mother, child);

        (graph, grandmother, mother, child)
    }

    #[test]
    fn test_link_is_symmetric() {
        let (graph, grandmother, mother, child) = create_test_graph();

        assert!(graph.children(grandmother).contains(&mother));
        assert!(graph.parents(mother).contains(&grandmother));
        assert!(graph.children(mother).contains(&child));
        assert!(graph.parents(child).contains(&mother));
    }

    #[test]
    fn test_duplicate_person_id_rejected() {
        let mut graph = PersonGraph::new();
        graph.add_person(Person::new("a", "First")).unwrap();

        let err = graph.add_person(Person::new("a", "Second")).unwrap_err();
        assert!(matches!(err, GraphError::DuplicatePerson(id) if id == "a"));
    }

    #[test]
    fn test_lookup_and_resolve() {
        let (graph, _, mother, _) = create_test_graph();

        assert_eq!(graph.lookup("m"), Some(mother));
        assert_eq!(graph.lookup("nobody"), None);
        assert!(matches!(
            graph.resolve("nobody"),
            Err(GraphError::UnknownPerson(_))
        ));
        assert_eq!(graph.person(mother).name, "Mother");
    }

    #[test]
    fn test_statistics() {
        let (graph, _, _, _) = create_test_graph();
        let stats = graph.statistics();

        assert_eq!(stats.total_persons, 3);
        assert_eq!(stats.total_links, 2);
        assert_eq!(stats.founders, 1);
        assert_eq!(stats.childless, 1);
        // 4 link endpoints over 3 persons
        assert!((stats.average_degree - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "their own parent")]
    fn test_self_link_panics() {
        let mut graph = PersonGraph::new();
        let a = graph.add_person(Person::new("a", "A")).unwrap();
        graph.link(a, a);
    }
}
