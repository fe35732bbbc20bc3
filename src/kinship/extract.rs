use crate::kinship::graph::{PersonGraph, PersonId};
use crate::types::Person;
use std::collections::VecDeque;
use tracing::debug;

/// One pending expansion of the breadth-first extraction
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    person: PersonId,
    remaining: usize,
    origin: Option<PersonId>,
}

/// Extract the depth-bounded sub-tree rooted at `root`, severing it from the
/// rest of the graph, and return the root of the now detached tree.
///
/// Breadth-first over both parents and children. Every person is detached the
/// moment it is first discovered, which is what keeps the traversal linear
/// and terminating on cyclic graphs: an already-cut person is never enqueued
/// again. Persons popped with no remaining depth become leaves of the output
/// tree and keep no links at all.
///
/// This mutates the graph irreversibly. Persons outside the extracted region
/// lose their references to persons that were pulled in; callers that need
/// the original graph afterwards must extract from a copy. The `on_cut` hook
/// runs exactly once per extracted person, at the moment it is detached.
pub fn extract_subtree<F>(
    graph: &mut PersonGraph,
    root: PersonId,
    depth: usize,
    mut on_cut: F,
) -> PersonId
where
    F: FnMut(&mut Person),
{
    let mut queue: VecDeque<QueueEntry> = VecDeque::new();
    queue.push_back(QueueEntry {
        person: root,
        remaining: depth,
        origin: None,
    });
    cut_person(graph, root, &mut on_cut);

    while let Some(entry) = queue.pop_front() {
        if entry.remaining == 0 {
            // depth reached; this person ends the tree here
            graph.clear_links(entry.person);
            continue;
        }

        let children: Vec<PersonId> = graph.children(entry.person).iter().copied().collect();
        for child in children {
            if !graph.is_cut(child) {
                cut_person(graph, child, &mut on_cut);
                queue.push_back(QueueEntry {
                    person: child,
                    remaining: entry.remaining - 1,
                    origin: Some(entry.person),
                });
            }
        }

        let parents: Vec<PersonId> = graph.parents(entry.person).iter().copied().collect();
        for parent in parents {
            if !graph.is_cut(parent) {
                cut_person(graph, parent, &mut on_cut);
                queue.push_back(QueueEntry {
                    person: parent,
                    remaining: entry.remaining - 1,
                    origin: Some(entry.person),
                });
            }
        }

        debug!(
            "expanded {} (remaining depth {}, reached via {})",
            entry.person,
            entry.remaining,
            entry
                .origin
                .map(|o| o.to_string())
                .unwrap_or_else(|| "root".to_string())
        );
    }

    root
}

/// Detach one person: mark it cut, run the post-processing hook, then scrub
/// it out of every neighbor's opposite set. Its own sets are left in place;
/// the traversal still expands through them.
///
/// Removing only the back-references is what shapes the output: a link to a
/// person cut earlier was already scrubbed from this person's sets, so the
/// surviving references always point from discoverer to discovered.
fn cut_person<F>(graph: &mut PersonGraph, id: PersonId, on_cut: &mut F)
where
    F: FnMut(&mut Person),
{
    graph.set_cut(id, true);
    on_cut(graph.person_mut(id));

    let parents: Vec<PersonId> = graph.parents(id).iter().copied().collect();
    for parent in parents {
        graph.remove_child(parent, id);
    }

    let children: Vec<PersonId> = graph.children(id).iter().copied().collect();
    for child in children {
        graph.remove_parent(child, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn add(graph: &mut PersonGraph, id: &str) -> PersonId {
        graph.add_person(Person::new(id, id.to_uppercase())).unwrap()
    }

    /// gm -> m -> c -> gc, plus f as c's second parent
    fn create_family() -> (PersonGraph, Vec<PersonId>) {
        let mut graph = PersonGraph::new();
        let gm = add(&mut graph, "gm");
        let m = add(&mut graph, "m");
        let f = add(&mut graph, "f");
        let c = add(&mut graph, "c");
        let gc = add(&mut graph, "gc");

        graph.link(gm, m);
        graph.link(m, c);
        graph.link(f, c);
        graph.link(c, gc);

        (graph, vec![gm, m, f, c, gc])
    }

    /// Walk the detached tree from `root`, asserting no person repeats.
    fn collect_tree(graph: &PersonGraph, root: PersonId) -> HashSet<PersonId> {
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            assert!(seen.insert(id), "person {} reached twice", id);
            stack.extend(graph.parents(id).iter().copied());
            stack.extend(graph.children(id).iter().copied());
        }
        seen
    }

    #[test]
    fn test_depth_zero_isolates_root() {
        let (mut graph, ids) = create_family();
        let (m, c) = (ids[1], ids[3]);

        extract_subtree(&mut graph, c, 0, |_| {});

        assert!(graph.parents(c).is_empty());
        assert!(graph.children(c).is_empty());
        assert!(graph.is_cut(c));
        // the rest of the graph no longer references c
        assert!(!graph.children(m).contains(&c));
    }

    #[test]
    fn test_extracts_both_directions() {
        let (mut graph, ids) = create_family();
        let (gm, m, f, c, gc) = (ids[0], ids[1], ids[2], ids[3], ids[4]);

        let root = extract_subtree(&mut graph, c, 1, |_| {});
        assert_eq!(root, c);

        // immediate family pulled in, all cut
        for id in [m, f, c, gc] {
            assert!(graph.is_cut(id));
        }
        assert_eq!(
            graph.parents(c).clone(),
            HashSet::from([m, f]),
            "root keeps links to extracted parents"
        );
        assert_eq!(graph.children(c).clone(), HashSet::from([gc]));

        // depth boundary persons become bare leaves
        for id in [m, f, gc] {
            assert!(graph.parents(id).is_empty());
            assert!(graph.children(id).is_empty());
        }

        // gm stayed outside and lost its link into the region
        assert!(!graph.is_cut(gm));
        assert!(graph.children(gm).is_empty());
    }

    #[test]
    fn test_boundary_neighbors_lose_references() {
        let mut graph = PersonGraph::new();
        let a = add(&mut graph, "a");
        let b = add(&mut graph, "b");
        let c = add(&mut graph, "c");
        let d = add(&mut graph, "d");
        graph.link(a, b);
        graph.link(b, c);
        graph.link(c, d);

        extract_subtree(&mut graph, b, 1, |_| {});

        // d was never extracted but its parent c was; the link is gone
        assert!(!graph.is_cut(d));
        assert!(graph.parents(d).is_empty());
    }

    #[test]
    fn test_terminates_on_cycle() {
        let mut graph = PersonGraph::new();
        let a = add(&mut graph, "a");
        let b = add(&mut graph, "b");
        let c = add(&mut graph, "c");
        // data-error loop: a -> b -> c -> a
        graph.link(a, b);
        graph.link(b, c);
        graph.link(c, a);

        let mut cuts = 0;
        extract_subtree(&mut graph, a, 10, |_| cuts += 1);

        assert_eq!(cuts, 3, "each person in the loop cut exactly once");

        // the loop is broken open: surviving links all point away from the
        // discoverer, so nothing leads back around
        assert_eq!(graph.children(a).clone(), HashSet::from([b]));
        assert_eq!(graph.parents(a).clone(), HashSet::from([c]));
        assert_eq!(graph.children(b).clone(), HashSet::from([c]));
        assert!(graph.parents(b).is_empty());
        assert!(graph.parents(c).is_empty() && graph.children(c).is_empty());
    }

    #[test]
    fn test_output_is_a_tree() {
        let (mut graph, ids) = create_family();
        let c = ids[3];

        extract_subtree(&mut graph, c, 3, |_| {});

        let reached = collect_tree(&graph, c);
        assert_eq!(reached.len(), 5, "whole family fits within depth 3");
        // no link leaves the extracted set
        for id in &reached {
            for n in graph.parents(*id).iter().chain(graph.children(*id)) {
                assert!(reached.contains(n));
            }
        }
    }

    #[test]
    fn test_hook_runs_once_per_person_and_fills_labels() {
        let (mut graph, ids) = create_family();
        let c = ids[3];

        let mut labeled = Vec::new();
        extract_subtree(&mut graph, c, 1, |person| {
            person.label = Some(person.name.clone());
            labeled.push(person.id.clone());
        });

        labeled.sort();
        assert_eq!(labeled, vec!["c", "f", "gc", "m"]);
        assert_eq!(graph.person(c).label.as_deref(), Some("C"));
    }
}
