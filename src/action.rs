use std::collections::HashMap;
use std::fmt;

use anyhow::{Context, Result};

use crate::fluent::Fluent;
use crate::state::{Mask, State};

/// A ground (variable-free) action: a named operator with positive and
/// negative precondition sets and add/delete effect sets.
///
/// Alongside the literal sets, each action carries bit-masks over the
/// fluent universe compiled at construction time, so applicability and
/// application are word-wise bit operations instead of list scans.
#[derive(Debug, Clone)]
pub struct Action {
    name: String,
    args: Vec<String>,
    pub precond_pos: Vec<Fluent>,
    pub precond_neg: Vec<Fluent>,
    pub effect_add: Vec<Fluent>,
    pub effect_rem: Vec<Fluent>,
    pre_pos_mask: Mask,
    pre_neg_mask: Mask,
    add_mask: Mask,
    del_mask: Mask,
}

impl Action {
    /// Builds an action bound to the universe described by `index`.
    /// Fails if any referenced fluent is missing from the universe; a
    /// partial binding would silently break applicability checks, so the
    /// whole construction is rejected instead.
    pub(crate) fn new(
        name: impl Into<String>,
        args: Vec<String>,
        precond: (Vec<Fluent>, Vec<Fluent>),
        effect: (Vec<Fluent>, Vec<Fluent>),
        index: &HashMap<Fluent, usize>,
        universe_len: usize,
    ) -> Result<Self> {
        let name = name.into();
        let (precond_pos, precond_neg) = precond;
        let (effect_add, effect_rem) = effect;
        let action = Action {
            pre_pos_mask: compile_mask(&name, &precond_pos, index, universe_len)?,
            pre_neg_mask: compile_mask(&name, &precond_neg, index, universe_len)?,
            add_mask: compile_mask(&name, &effect_add, index, universe_len)?,
            del_mask: compile_mask(&name, &effect_rem, index, universe_len)?,
            name,
            args,
            precond_pos,
            precond_neg,
            effect_add,
            effect_rem,
        };
        Ok(action)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Applicability check. Positive preconditions must all be present in
    /// the positive bits; negative preconditions must all be present in
    /// the explicit negative view (not merely absent from the positive
    /// bits, so the check stays correct if the closed-world invariant is
    /// ever relaxed).
    pub(crate) fn applicable_in(&self, state: &State, negatives: &State) -> bool {
        state.contains_all(&self.pre_pos_mask) && negatives.contains_all(&self.pre_neg_mask)
    }

    /// Successor state under this action's effects. Preconditions are not
    /// re-validated here; callers must only apply actions returned by the
    /// applicability filter.
    pub(crate) fn apply_to(&self, state: &State) -> State {
        state.apply(&self.add_mask, &self.del_mask)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(", "))
    }
}

fn compile_mask(
    name: &str,
    fluents: &[Fluent],
    index: &HashMap<Fluent, usize>,
    universe_len: usize,
) -> Result<Mask> {
    let mut mask = Mask::empty(universe_len);
    for fluent in fluents {
        let idx = index
            .get(fluent)
            .with_context(|| format!("action {name}: fluent {fluent} is not in the state map"))?;
        mask.set(*idx);
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe_index() -> (HashMap<Fluent, usize>, usize) {
        let fluents: Vec<Fluent> = ["At(C1, SFO)", "At(P1, SFO)", "In(C1, P1)"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let len = fluents.len();
        let index = fluents
            .into_iter()
            .enumerate()
            .map(|(i, f)| (f, i))
            .collect();
        (index, len)
    }

    #[test]
    fn test_applicability_and_application() {
        let (index, len) = universe_index();
        let load = Action::new(
            "Load",
            vec!["C1".into(), "P1".into(), "SFO".into()],
            (
                vec!["At(C1, SFO)".parse().unwrap(), "At(P1, SFO)".parse().unwrap()],
                vec![],
            ),
            (
                vec!["In(C1, P1)".parse().unwrap()],
                vec!["At(C1, SFO)".parse().unwrap()],
            ),
            &index,
            len,
        )
        .unwrap();
        assert_eq!(load.to_string(), "Load(C1, P1, SFO)");

        let mut state = State::all_false(len);
        state.set(0, true);
        state.set(1, true);
        assert!(load.applicable_in(&state, &state.negated()));

        let next = load.apply_to(&state);
        assert_eq!(next.to_string(), "FTT");
        assert!(!load.applicable_in(&next, &next.negated()));
    }

    #[test]
    fn test_unknown_fluent_is_rejected() {
        let (index, len) = universe_index();
        let result = Action::new(
            "Fly",
            vec!["P1".into(), "SFO".into(), "JFK".into()],
            (vec!["At(P1, SFO)".parse().unwrap()], vec![]),
            (
                vec!["At(P1, JFK)".parse().unwrap()],
                vec!["At(P1, SFO)".parse().unwrap()],
            ),
            &index,
            len,
        );
        assert!(result.is_err());
    }
}
