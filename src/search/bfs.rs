use std::collections::{HashSet, VecDeque};

use super::{reconstruct, Node, Plan};
use crate::problem::Problem;
use crate::stat::Stats;
use crate::state::State;

/// Breadth-first graph search. Goal-tests nodes at generation time, so
/// the first hit is a shortest plan in action count.
pub fn breadth_first_search(problem: &Problem, stats: &mut Stats) -> Option<Plan> {
    let root = Node::root(problem.initial().clone());
    stats.goal_tests += 1;
    if problem.goal_test(&root.state) {
        return Some(reconstruct(&root));
    }

    let mut frontier = VecDeque::new();
    let mut explored: HashSet<State> = HashSet::new();
    explored.insert(root.state.clone());
    frontier.push_back(root);

    while let Some(node) = frontier.pop_front() {
        stats.expansions += 1;
        for action in problem.actions(&node.state) {
            let state = problem.result(&node.state, action);
            if !explored.insert(state.clone()) {
                continue;
            }
            stats.generated += 1;
            let child = Node::child(&node, state, action.to_string());
            stats.goal_tests += 1;
            if problem.goal_test(&child.state) {
                return Some(reconstruct(&child));
            }
            frontier.push_back(child);
        }
    }

    None
}
