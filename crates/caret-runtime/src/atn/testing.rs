//! Test-only helpers, behind the `testing` feature.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::Atn;

impl Atn {
    /// Copy with every state's outgoing transitions reordered by a
    /// deterministic permutation derived from `seed`.
    ///
    /// The language is unchanged; anything order-dependent in a consumer
    /// shows up as a different result.
    pub fn shuffle_transitions(&self, seed: u64) -> Atn {
        let mut atn = self.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        for state in &mut atn.states {
            state.transitions.shuffle(&mut rng);
        }
        atn
    }

    /// Copy with every state's outgoing transitions reversed.
    pub fn reverse_transitions(&self) -> Atn {
        let mut atn = self.clone();
        for state in &mut atn.states {
            state.transitions.reverse();
        }
        atn
    }
}
