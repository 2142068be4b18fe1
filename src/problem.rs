use std::collections::HashMap;

use anyhow::{bail, Result};
use tracing::debug;

use crate::action::Action;
use crate::fluent::{Fluent, FluentState};
use crate::state::{encode_state, Mask, State};

/// A grounded air-cargo planning problem.
///
/// Built once from the domain objects, the initial fluent partition, and
/// the goal; the fluent universe (`state_map`), the ground action list,
/// and the goal mask are cached at construction and read-only afterwards,
/// so a `Problem` can be shared freely across search runs.
#[derive(Debug, Clone)]
pub struct Problem {
    cargos: Vec<String>,
    planes: Vec<String>,
    airports: Vec<String>,
    state_map: Vec<Fluent>,
    actions_list: Vec<Action>,
    goal: Vec<Fluent>,
    goal_mask: Mask,
    initial: State,
}

impl Problem {
    /// Constructs the problem and eagerly grounds the action schemas.
    ///
    /// The fluent universe is the concatenation of the initial positive
    /// and negative sets, in that order. Construction fails if the
    /// universe contains a fluent twice, if the initial partition
    /// violates the closed-world assumption, or if the goal or any
    /// ground action references a fluent outside the universe.
    pub fn new(
        cargos: Vec<String>,
        planes: Vec<String>,
        airports: Vec<String>,
        initial: FluentState,
        goal: Vec<Fluent>,
    ) -> Result<Self> {
        let state_map: Vec<Fluent> = initial
            .pos
            .iter()
            .chain(initial.neg.iter())
            .cloned()
            .collect();

        let mut index = HashMap::with_capacity(state_map.len());
        for (idx, fluent) in state_map.iter().enumerate() {
            if index.insert(fluent.clone(), idx).is_some() {
                bail!("fluent {fluent} appears more than once in the initial state");
            }
        }

        let initial = encode_state(&initial, &state_map)?;

        let mut goal_mask = Mask::empty(state_map.len());
        for fluent in &goal {
            match index.get(fluent) {
                Some(idx) => goal_mask.set(*idx),
                None => bail!("goal fluent {fluent} is not in the state map"),
            }
        }

        let actions_list = ground_actions(&cargos, &planes, &airports, &index, state_map.len())?;
        debug!(
            "Grounded {} actions over {} fluents",
            actions_list.len(),
            state_map.len()
        );

        Ok(Problem {
            cargos,
            planes,
            airports,
            state_map,
            actions_list,
            goal,
            goal_mask,
            initial,
        })
    }

    pub fn cargos(&self) -> &[String] {
        &self.cargos
    }

    pub fn planes(&self) -> &[String] {
        &self.planes
    }

    pub fn airports(&self) -> &[String] {
        &self.airports
    }

    /// The fluent universe, fixed at construction. Position `i` of every
    /// state vector holds the truth value of `state_map()[i]`.
    pub fn state_map(&self) -> &[Fluent] {
        &self.state_map
    }

    pub fn goal(&self) -> &[Fluent] {
        &self.goal
    }

    pub(crate) fn goal_mask(&self) -> &Mask {
        &self.goal_mask
    }

    pub fn initial(&self) -> &State {
        &self.initial
    }

    /// The complete cached ground action list, in generation order.
    pub fn actions_list(&self) -> &[Action] {
        &self.actions_list
    }

    /// The actions applicable in `state`, in the deterministic order of
    /// the cached action list.
    pub fn actions(&self, state: &State) -> Vec<&Action> {
        let negatives = state.negated();
        self.actions_list
            .iter()
            .filter(|action| action.applicable_in(state, &negatives))
            .collect()
    }

    /// The state resulting from executing `action` in `state`. The action
    /// must be one of `self.actions(state)`; applying an inapplicable
    /// action is caller error and is not validated here.
    pub fn result(&self, state: &State, action: &Action) -> State {
        action.apply_to(state)
    }

    /// True iff every goal fluent is true in `state`.
    pub fn goal_test(&self, state: &State) -> bool {
        state.contains_all(&self.goal_mask)
    }
}

fn at(object: &str, place: &str) -> Fluent {
    Fluent::new("At", vec![object.to_string(), place.to_string()])
}

fn loaded(cargo: &str, plane: &str) -> Fluent {
    Fluent::new("In", vec![cargo.to_string(), plane.to_string()])
}

/// Expands the Load, Unload, and Fly schemas into every concrete action
/// for the given objects. The nesting order is fixed (Load and Unload
/// over airport, plane, cargo; Fly over from, to, plane) so two runs over
/// the same domain produce identical action lists.
fn ground_actions(
    cargos: &[String],
    planes: &[String],
    airports: &[String],
    index: &HashMap<Fluent, usize>,
    universe_len: usize,
) -> Result<Vec<Action>> {
    let expected = 2 * airports.len() * planes.len() * cargos.len()
        + planes.len() * airports.len() * airports.len().saturating_sub(1);
    let mut actions = Vec::with_capacity(expected);

    for airport in airports {
        for plane in planes {
            for cargo in cargos {
                actions.push(Action::new(
                    "Load",
                    vec![cargo.clone(), plane.clone(), airport.clone()],
                    (vec![at(cargo, airport), at(plane, airport)], vec![]),
                    (vec![loaded(cargo, plane)], vec![at(cargo, airport)]),
                    index,
                    universe_len,
                )?);
            }
        }
    }

    for airport in airports {
        for plane in planes {
            for cargo in cargos {
                actions.push(Action::new(
                    "Unload",
                    vec![cargo.clone(), plane.clone(), airport.clone()],
                    (vec![loaded(cargo, plane), at(plane, airport)], vec![]),
                    (vec![at(cargo, airport)], vec![loaded(cargo, plane)]),
                    index,
                    universe_len,
                )?);
            }
        }
    }

    for from in airports {
        for to in airports {
            if from == to {
                continue;
            }
            for plane in planes {
                actions.push(Action::new(
                    "Fly",
                    vec![plane.clone(), from.clone(), to.clone()],
                    (vec![at(plane, from)], vec![]),
                    (vec![at(plane, to)], vec![at(plane, from)]),
                    index,
                    universe_len,
                )?);
            }
        }
    }

    Ok(actions)
}
