use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::rc::Rc;

use super::{reconstruct, Node, Plan};
use crate::heuristic::HeuristicFn;
use crate::problem::Problem;
use crate::stat::Stats;
use crate::state::State;

// Open-list entry. Ordering is inverted so the BinaryHeap pops the
// lowest f first, ties broken on the lower g.
struct OpenEntry {
    f: usize,
    node: Rc<Node>,
}

impl Eq for OpenEntry {}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.node.g == other.node.g
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.node.g.cmp(&self.node.g))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shared best-first core: pops the open node minimizing `eval(g, state)`
/// and goal-tests at expansion time. Re-discovered states are re-opened
/// only on a strictly better g; stale heap entries are skipped on pop.
fn best_first_search(
    problem: &Problem,
    eval: impl Fn(usize, &State) -> usize,
    stats: &mut Stats,
) -> Option<Plan> {
    let root = Node::root(problem.initial().clone());

    let mut best_g: HashMap<State, usize> = HashMap::new();
    best_g.insert(root.state.clone(), 0);

    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        f: eval(0, &root.state),
        node: root,
    });

    while let Some(OpenEntry { node, .. }) = open.pop() {
        if best_g.get(&node.state).is_some_and(|&g| g < node.g) {
            continue; // stale entry
        }

        stats.goal_tests += 1;
        if problem.goal_test(&node.state) {
            return Some(reconstruct(&node));
        }

        stats.expansions += 1;
        for action in problem.actions(&node.state) {
            let state = problem.result(&node.state, action);
            let g = node.g + 1;
            if best_g.get(&state).is_none_or(|&old| g < old) {
                best_g.insert(state.clone(), g);
                stats.generated += 1;
                let f = eval(g, &state);
                open.push(OpenEntry {
                    f,
                    node: Node::child(&node, state, action.to_string()),
                });
            }
        }
    }

    None
}

/// Best-first on the path cost alone; optimal for unit action costs.
pub fn uniform_cost_search(problem: &Problem, stats: &mut Stats) -> Option<Plan> {
    best_first_search(problem, |g, _| g, stats)
}

/// Best-first on the heuristic alone; fast, no optimality guarantee.
pub fn greedy_best_first_search(
    problem: &Problem,
    heuristic: HeuristicFn,
    stats: &mut Stats,
) -> Option<Plan> {
    best_first_search(problem, |_, state| heuristic(problem, state), stats)
}

/// A*: best-first on g + h.
pub fn astar_search(problem: &Problem, heuristic: HeuristicFn, stats: &mut Stats) -> Option<Plan> {
    best_first_search(problem, |g, state| g + heuristic(problem, state), stats)
}
