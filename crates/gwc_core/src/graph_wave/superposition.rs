//! Weighted superposition resolution.
//!
//! A superposition is the ordered list of candidate producers attached to a
//! node. Resolving it evaluates every candidate, then walks the weights in
//! input order against one uniform draw:
//!
//! 1. No candidates: nil, and no randomness is consumed.
//! 2. Draw `compare` in [0, 1) and a permutation of the candidates, both
//!    before any candidate runs, so a candidate that draws from the random
//!    source cannot shift these two values.
//! 3. Evaluate candidates in permuted order, storing results by input index.
//! 4. Scale `compare` by `max(1, sum)`. A weight sum at or below 1 is taken
//!    as already normalised; the leftover mass maps to no candidate.
//! 5. The first candidate in input order whose running subtraction brings
//!    `compare` to `<= 0` wins.
//! 6. Otherwise the `FallbackPolicy` decides.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::environment::Environment;
use super::node::{NodeProbability, NodeState};
use super::rng::GwcRng;

/// What a superposition collapses into when no candidate reaches the drawn
/// threshold (for example when every weight is 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Pick uniformly among all candidate states, nil included.
    #[default]
    ForcedPick,
    /// Collapse into nil if any candidate produced nil; otherwise pick
    /// uniformly among all candidate states.
    NilAware,
}

type CandidateFn<S> = dyn Fn(&mut dyn GwcRng, &Environment<S>) -> (NodeProbability, NodeState<S>);

/// One weighted candidate producer.
pub struct Candidate<S> {
    producer: Rc<CandidateFn<S>>,
}

impl<S> Clone for Candidate<S> {
    fn clone(&self) -> Self {
        Self {
            producer: Rc::clone(&self.producer),
        }
    }
}

impl<S> fmt::Debug for Candidate<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Candidate(..)")
    }
}

/// The shared zero-weight nil producer.
fn nil_producer<S>(_: &mut dyn GwcRng, _: &Environment<S>) -> (NodeProbability, NodeState<S>) {
    (0.0, None)
}

impl<S: 'static> Candidate<S> {
    /// Wrap an arbitrary producer of `(weight, state)`.
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn(&mut dyn GwcRng, &Environment<S>) -> (NodeProbability, NodeState<S>) + 'static,
    {
        Self {
            producer: Rc::new(producer),
        }
    }

    /// A candidate with a constant weight and state.
    pub fn weighted(weight: NodeProbability, state: S) -> Self
    where
        S: Clone,
    {
        Self::new(move |_, _| (weight, Some(state.clone())))
    }

    /// The zero-weight nil candidate.
    pub fn nil() -> Self {
        Self::new(nil_producer::<S>)
    }
}

impl<S> Candidate<S> {
    /// Run the producer.
    pub fn evaluate(
        &self,
        rng: &mut dyn GwcRng,
        env: &Environment<S>,
    ) -> (NodeProbability, NodeState<S>) {
        (self.producer)(rng, env)
    }
}

/// Ordered list of candidates plus an optional fallback override.
///
/// Without an override the run's policy (`Environment::fallback_policy`)
/// applies.
pub struct Superposition<S> {
    candidates: Vec<Candidate<S>>,
    policy: Option<FallbackPolicy>,
}

impl<S> Clone for Superposition<S> {
    fn clone(&self) -> Self {
        Self {
            candidates: self.candidates.clone(),
            policy: self.policy,
        }
    }
}

impl<S> fmt::Debug for Superposition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Superposition")
            .field("candidates", &self.candidates.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<S> Superposition<S> {
    /// A superposition inheriting the run's fallback policy.
    pub fn new(candidates: Vec<Candidate<S>>) -> Self {
        Self {
            candidates,
            policy: None,
        }
    }

    /// A superposition without candidates. Always resolves to nil.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Pin the fallback policy for this superposition regardless of the run.
    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True when there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The override set with `with_policy`, if any.
    pub fn policy(&self) -> Option<FallbackPolicy> {
        self.policy
    }

    /// Resolve into a single state.
    pub fn resolve(&self, rng: &mut dyn GwcRng, env: &Environment<S>) -> NodeState<S> {
        let num = self.candidates.len();
        if num == 0 {
            return None;
        }

        let mut compare = rng.next_double();
        let order = rng.perm(num);

        let mut sum: NodeProbability = 0.0;
        let mut weights: Vec<NodeProbability> = vec![0.0; num];
        let mut states: Vec<NodeState<S>> = (0..num).map(|_| None).collect();
        for i in order {
            let (weight, state) = self.candidates[i].evaluate(rng, env);
            sum += weight;
            weights[i] = weight;
            states[i] = state;
        }

        compare *= sum.max(1.0);

        for (i, weight) in weights.iter().enumerate() {
            compare -= weight;
            if compare <= 0.0 {
                return states.swap_remove(i);
            }
        }

        let policy = self.policy.unwrap_or_else(|| env.fallback_policy());
        match policy {
            FallbackPolicy::NilAware if states.iter().any(Option::is_none) => None,
            FallbackPolicy::NilAware | FallbackPolicy::ForcedPick => {
                let pick = rng.next_usize_max(num);
                states.swap_remove(pick)
            }
        }
    }
}

impl<S: 'static> Superposition<S> {
    /// A superposition holding only the zero-weight nil candidate.
    pub fn nil() -> Self {
        Self::new(vec![Candidate::nil()])
    }
}
