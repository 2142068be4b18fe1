use std::collections::HashSet;
use std::fmt;

use anyhow::bail;

use crate::fluent::{Fluent, FluentState};

const WORD_BITS: usize = 64;

fn word_count(len: usize) -> usize {
    len.div_ceil(WORD_BITS)
}

/// A state: a fixed-length boolean vector over the fluent universe.
///
/// Position `i` holds the truth value of `state_map[i]`. The bits are
/// packed into words so that applicability checks and effect application
/// are word-wise AND/OR/AND-NOT operations. `Display` renders the compact
/// `T`/`F` marker string used for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    words: Vec<u64>,
    len: usize,
}

impl State {
    pub fn all_false(len: usize) -> Self {
        State {
            words: vec![0; word_count(len)],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len);
        self.words[idx / WORD_BITS] >> (idx % WORD_BITS) & 1 == 1
    }

    pub fn set(&mut self, idx: usize, value: bool) {
        debug_assert!(idx < self.len);
        if value {
            self.words[idx / WORD_BITS] |= 1 << (idx % WORD_BITS);
        } else {
            self.words[idx / WORD_BITS] &= !(1 << (idx % WORD_BITS));
        }
    }

    /// The explicit negative view of this state: the complement of the
    /// positive bits within the universe. Under the closed-world
    /// invariant a fluent is in the negative set iff its bit is set here.
    pub(crate) fn negated(&self) -> State {
        let mut words: Vec<u64> = self.words.iter().map(|w| !w).collect();
        let spare = self.words.len() * WORD_BITS - self.len;
        if spare > 0 {
            if let Some(last) = words.last_mut() {
                *last &= u64::MAX >> spare;
            }
        }
        State {
            words,
            len: self.len,
        }
    }

    /// True iff every bit of `mask` is set in `self`.
    pub(crate) fn contains_all(&self, mask: &Mask) -> bool {
        mask.words
            .iter()
            .zip(&self.words)
            .all(|(m, w)| m & !w == 0)
    }

    /// Number of bits in `mask` that are not set in `self`.
    pub(crate) fn count_missing(&self, mask: &Mask) -> usize {
        mask.words
            .iter()
            .zip(&self.words)
            .map(|(m, w)| (m & !w).count_ones() as usize)
            .sum()
    }

    /// Successor bits: set everything in `add`, then clear everything in
    /// `del`. The complement view changes in lockstep, so the closed-world
    /// invariant holds structurally.
    pub(crate) fn apply(&self, add: &Mask, del: &Mask) -> State {
        let words = self
            .words
            .iter()
            .zip(add.words.iter().zip(&del.words))
            .map(|(w, (a, d))| (w | a) & !d)
            .collect();
        State {
            words,
            len: self.len,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for idx in 0..self.len {
            f.write_str(if self.get(idx) { "T" } else { "F" })?;
        }
        Ok(())
    }
}

/// A set of fluent positions over the same universe as `State`, used for
/// precompiled preconditions, effects, and the goal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask {
    words: Vec<u64>,
}

impl Mask {
    pub fn empty(len: usize) -> Self {
        Mask {
            words: vec![0; word_count(len)],
        }
    }

    pub fn set(&mut self, idx: usize) {
        self.words[idx / WORD_BITS] |= 1 << (idx % WORD_BITS);
    }
}

/// Encodes a positive/negative fluent partition into a state vector over
/// `state_map`. Fails if any universe fluent is in both sets or in
/// neither (closed-world violation).
pub fn encode_state(fluents: &FluentState, state_map: &[Fluent]) -> anyhow::Result<State> {
    let pos: HashSet<&Fluent> = fluents.pos.iter().collect();
    let neg: HashSet<&Fluent> = fluents.neg.iter().collect();

    let mut state = State::all_false(state_map.len());
    for (idx, fluent) in state_map.iter().enumerate() {
        match (pos.contains(fluent), neg.contains(fluent)) {
            (true, false) => state.set(idx, true),
            (false, true) => {}
            (true, true) => bail!("fluent {fluent} is both positive and negative"),
            (false, false) => bail!("fluent {fluent} is in neither the positive nor the negative set"),
        }
    }
    Ok(state)
}

/// Inverse of [`encode_state`]: splits a state vector back into the
/// positive/negative partition, in `state_map` order.
pub fn decode_state(state: &State, state_map: &[Fluent]) -> FluentState {
    let mut pos = Vec::new();
    let mut neg = Vec::new();
    for (idx, fluent) in state_map.iter().enumerate() {
        if state.get(idx) {
            pos.push(fluent.clone());
        } else {
            neg.push(fluent.clone());
        }
    }
    FluentState::new(pos, neg)
}
