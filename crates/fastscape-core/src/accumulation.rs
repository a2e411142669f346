//! Accumulation: drainage area via a pull-form sum over the flow graph.
//!
//! `accum[c]` is the cell area times the number of cells whose flow
//! ultimately reaches `c`, `c` itself included. The natural formulation
//! pushes each cell's value into its receiver, but then multiple donors can
//! share a receiver and race on the same slot; the pull form — each cell
//! sums its own donors' already-finalised values — writes only its own
//! slot, which is what makes within-level parallelism race-free.

use crate::grid::{ModelParams, SimState};

/// Compute `accum` for every cell in `stack`, processing levels from the
/// headwaters (highest level index) down to the sinks (level 0) so that
/// every donor's value is finalised before it is pulled from.
pub fn compute_accumulation(state: &mut SimState, params: &ModelParams) {
    for v in state.accum.iter_mut() {
        *v = params.a_cell;
    }

    let n_levels = state.levels.len().saturating_sub(1);
    for level in (0..n_levels).rev() {
        let start = state.levels[level] as usize;
        let end = state.levels[level + 1] as usize;
        let cells = state.stack[start..end].to_vec();
        accumulate_level(state, &cells, params.a_cell);
    }
}

#[cfg(feature = "threading")]
fn accumulate_level(state: &mut SimState, cells: &[u32], a_cell: f64) {
    use rayon::prelude::*;
    let accum = &state.accum;
    let donor = &state.donor;
    let ndon = &state.ndon;
    let updates: Vec<f64> = cells
        .par_iter()
        .map(|&c| {
            let c = c as usize;
            let mut sum = a_cell;
            for k in 0..ndon[c] as usize {
                sum += accum[donor[8 * c + k] as usize];
            }
            sum
        })
        .collect();
    for (&c, &v) in cells.iter().zip(updates.iter()) {
        state.accum[c as usize] = v;
    }
}

#[cfg(not(feature = "threading"))]
fn accumulate_level(state: &mut SimState, cells: &[u32], a_cell: f64) {
    for &c in cells {
        let c = c as usize;
        let mut sum = a_cell;
        for k in 0..state.ndon[c] as usize {
            sum += state.accum[state.donor[8 * c + k] as usize];
        }
        state.accum[c] = sum;
    }
}
