mod best_first;
mod bfs;

pub use best_first::{astar_search, greedy_best_first_search, uniform_cost_search};
pub use bfs::breadth_first_search;

use std::rc::Rc;

use crate::state::State;

/// A solution: the action names from the initial state to a goal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub steps: Vec<String>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Search-tree node. Parent links are reference-counted so reconstructing
/// the plan never clones intermediate states.
pub(crate) struct Node {
    pub(crate) state: State,
    pub(crate) parent: Option<Rc<Node>>,
    pub(crate) action: Option<String>,
    pub(crate) g: usize,
}

impl Node {
    pub(crate) fn root(state: State) -> Rc<Self> {
        Rc::new(Node {
            state,
            parent: None,
            action: None,
            g: 0,
        })
    }

    pub(crate) fn child(parent: &Rc<Node>, state: State, action: String) -> Rc<Self> {
        Rc::new(Node {
            state,
            parent: Some(parent.clone()),
            action: Some(action),
            g: parent.g + 1,
        })
    }
}

pub(crate) fn reconstruct(node: &Rc<Node>) -> Plan {
    let mut steps = Vec::with_capacity(node.g);
    let mut current = node;
    while let Some(parent) = &current.parent {
        if let Some(action) = &current.action {
            steps.push(action.clone());
        }
        current = parent;
    }
    steps.reverse();
    Plan { steps }
}
