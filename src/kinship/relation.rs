use crate::kinship::graph::{PersonGraph, PersonId};
use std::ops::{Deref, DerefMut};

/// Depth-bounded upward reachability: is `target` an ancestor of `root`?
///
/// `target == root` counts as an ancestor at any depth, including 0. The
/// search is pure recursion over parent links with no cycle marking; the
/// depth bound is the only termination guarantee. On a graph whose ancestor
/// chain loops in fewer steps than `depth`, the same persons are visited
/// repeatedly, so callers that care pick a bound below the expected loop
/// length.
pub fn is_ancestor(graph: &PersonGraph, target: PersonId, root: PersonId, depth: usize) -> bool {
    if target == root {
        return true;
    }

    if depth == 0 {
        return false;
    }

    graph
        .parents(root)
        .iter()
        .any(|&parent| is_ancestor(graph, target, parent, depth - 1))
}

/// Are `root` and `person` blood relatives within `depth` steps?
///
/// Two persons are blood relatives when a path connects them consisting of
/// upward steps followed by downward steps: a path through a common
/// ancestor. At most one direction change is allowed, which is exactly what
/// keeps marriage-only connections out; a spouse pair connects only
/// down-up-down through a shared child, and that second turn is refused.
///
/// A person is not their own relative: `root` is marked before any candidate
/// comparison, so the search can never match it. This is deliberate policy,
/// not an artifact of the cycle guard.
///
/// The graph is restored before returning: every mark set during the search
/// is released on every exit path, and no link is touched.
pub fn is_relative(
    graph: &mut PersonGraph,
    root: PersonId,
    person: PersonId,
    depth: usize,
) -> bool {
    let mut graph = CutMark::new(graph, root);

    let parents: Vec<PersonId> = graph.parents(root).iter().copied().collect();
    for parent in parents {
        if in_tree(&mut graph, parent, person, false, depth) {
            return true;
        }
    }

    let children: Vec<PersonId> = graph.children(root).iter().copied().collect();
    for child in children {
        if in_tree(&mut graph, child, person, true, depth) {
            return true;
        }
    }

    false
}

/// Recursive worker for [`is_relative`].
///
/// `turned` is the one-bit state machine of the traversal: `false` while
/// still climbing toward a common ancestor, `true` once a downward step has
/// been taken. Parents are only expanded while not turned; children always
/// are, and flip the state.
fn in_tree(
    graph: &mut PersonGraph,
    root: PersonId,
    target: PersonId,
    turned: bool,
    depth: usize,
) -> bool {
    if root == target {
        return true;
    }

    if depth == 0 {
        return false;
    }

    // guards this frame against the loops a genealogy graph may carry;
    // released on every return below
    let mut graph = CutMark::new(graph, root);

    if !turned {
        let parents: Vec<PersonId> = graph.parents(root).iter().copied().collect();
        for parent in parents {
            if !graph.is_cut(parent) && in_tree(&mut graph, parent, target, false, depth - 1) {
                return true;
            }
        }
    }

    let children: Vec<PersonId> = graph.children(root).iter().copied().collect();
    for child in children {
        if !graph.is_cut(child) && in_tree(&mut graph, child, target, true, depth - 1) {
            return true;
        }
    }

    false
}

/// Scoped cut mark: set on acquisition, released when the frame exits,
/// whichever way it exits.
struct CutMark<'g> {
    graph: &'g mut PersonGraph,
    person: PersonId,
}

impl<'g> CutMark<'g> {
    fn new(graph: &'g mut PersonGraph, person: PersonId) -> Self {
        graph.set_cut(person, true);
        Self { graph, person }
    }
}

impl Drop for CutMark<'_> {
    fn drop(&mut self) {
        self.graph.set_cut(self.person, false);
    }
}

impl Deref for CutMark<'_> {
    type Target = PersonGraph;

    fn deref(&self) -> &PersonGraph {
        self.graph
    }
}

impl DerefMut for CutMark<'_> {
    fn deref_mut(&mut self) -> &mut PersonGraph {
        self.graph
    }
}
