//! Uplift: a constant increment to every interior cell's elevation.

use crate::grid::{ModelParams, SimState};

/// Add `U * dt` to every interior cell. Embarrassingly parallel: each cell
/// reads and writes only its own elevation — under `threading` this is a
/// `par_chunks_mut` over whole rows, each worker owning disjoint rows.
pub fn apply_uplift(state: &mut SimState, params: &ModelParams) {
    let dz = params.u * params.dt;
    let width = state.width;
    let y_lo = 2usize;
    let y_hi = state.height.saturating_sub(2).max(2);
    let x_lo = 2usize;
    let x_hi = state.width.saturating_sub(2).max(2);

    #[cfg(feature = "threading")]
    {
        use rayon::prelude::*;
        state.h.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            if y >= y_lo && y < y_hi {
                for x in x_lo..x_hi {
                    row[x] += dz;
                }
            }
        });
    }

    #[cfg(not(feature = "threading"))]
    {
        for y in y_lo..y_hi {
            for x in x_lo..x_hi {
                state.h[y * width + x] += dz;
            }
        }
    }
}
