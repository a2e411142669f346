//! The per-step driver: the fixed six-stage pipeline, with a hard barrier
//! between each stage. Each stage fully consumes its inputs and produces
//! its outputs before the next begins — there is no pipelining across
//! stage boundaries.

use crate::accumulation::compute_accumulation;
use crate::donors::compute_donors;
use crate::erosion::apply_erosion;
use crate::grid::{ModelParams, SimState};
use crate::ordering::build_ordering;
use crate::receivers::compute_receivers;
use crate::uplift::apply_uplift;

/// Advance `state` by one time step: Receivers -> Donors -> Ordering ->
/// Accumulation -> Uplift -> Erosion.
pub fn step(state: &mut SimState, params: &ModelParams) {
    compute_receivers(state);
    compute_donors(state);
    build_ordering(state);
    compute_accumulation(state, params);
    apply_uplift(state, params);
    apply_erosion(state, params);
}

/// Advance `state` by `n` time steps, invoking `on_step(i)` after each
/// completed step (1-indexed) so a caller can report progress without the
/// core depending on any I/O.
pub fn run(state: &mut SimState, params: &ModelParams, n_steps: usize, mut on_step: impl FnMut(usize)) {
    for i in 1..=n_steps {
        step(state, params);
        on_step(i);
    }
}
