use anyhow::Result;

use crate::problem::Problem;
use crate::state::State;

/// Signature shared by the in-repo heuristics, so search algorithms can
/// take any of them as a plain function.
pub type HeuristicFn = fn(&Problem, &State) -> usize;

/// Constant estimator. Not admissible; only a baseline that turns an
/// informed search into its uninformed counterpart for comparisons.
pub fn h_unit(_problem: &Problem, _state: &State) -> usize {
    1
}

/// Number of goal fluents not currently true.
///
/// If preconditions are ignored, each unsatisfied goal fluent can be
/// achieved by one action, so this is a lower bound on the remaining
/// plan length under that relaxation.
pub fn h_ignore_preconditions(problem: &Problem, state: &State) -> usize {
    state.count_missing(problem.goal_mask())
}

/// Contract of the external relaxed-planning-graph oracle: given a
/// problem and a state, the sum over the goal fluents of the first graph
/// level at which each becomes reachable when delete effects are ignored.
/// Implementations must behave as pure functions over their inputs.
pub trait LevelCostEstimator {
    fn level_sum(&self, problem: &Problem, state: &State) -> Result<usize>;
}

/// Level-sum heuristic: delegates to the oracle. Oracle errors propagate
/// to the caller unmodified.
pub fn h_level_sum<E: LevelCostEstimator>(
    estimator: &E,
    problem: &Problem,
    state: &State,
) -> Result<usize> {
    estimator.level_sum(problem, state)
}
