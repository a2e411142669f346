//! Receivers: pick each frame cell's steepest-descent neighbour.

use crate::grid::{SimState, DIR_LEN, DIR_OFFSETS, SINK};

/// Fill `rec[c]` for every frame cell with the direction of strictly
/// steepest descent, or [`SINK`] if none is strictly downhill. Halo entries
/// are left at `SINK`. Embarrassingly parallel: each cell reads only `h`
/// and writes only its own `rec[c]` — under the `threading` feature this is
/// a plain `rayon` map-collect over every cell, which needs no locks because
/// the write set (one `rec[c]` slot per cell) is disjoint by construction.
pub fn compute_receivers(state: &mut SimState) {
    let width = state.width;
    let height = state.height;
    let h = &state.h;

    #[cfg(feature = "threading")]
    {
        use rayon::prelude::*;
        state.rec = (0..width * height)
            .into_par_iter()
            .map(|c| {
                if is_frame(c, width, height) {
                    steepest_descent(h, width, height, c)
                } else {
                    SINK
                }
            })
            .collect();
    }

    #[cfg(not(feature = "threading"))]
    {
        for y in state.frame_y_range() {
            for x in state.frame_x_range() {
                let c = y * width + x;
                state.rec[c] = steepest_descent(h, width, height, c);
            }
        }
    }
}

#[cfg(feature = "threading")]
#[inline]
fn is_frame(c: usize, width: usize, height: usize) -> bool {
    let x = c % width;
    let y = c / width;
    (1..height.saturating_sub(1)).contains(&y) && (1..width.saturating_sub(1)).contains(&x)
}

/// Scan the eight neighbours of `c` and return the direction maximising
/// `(h[c] - h[n]) / dr[n]`, first-encountered wins on ties, or [`SINK`] if
/// the best slope is not strictly positive.
fn steepest_descent(h: &[f64], width: usize, height: usize, c: usize) -> i8 {
    let x = c % width;
    let y = c / width;
    let h0 = h[c];

    let mut best_slope = 0.0f64;
    let mut best_dir = SINK;

    for d in 0..8usize {
        let (dy, dx) = DIR_OFFSETS[d];
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
            continue;
        }
        let n = ny as usize * width + nx as usize;
        let slope = (h0 - h[n]) / DIR_LEN[d];
        if slope > best_slope {
            best_slope = slope;
            best_dir = d as i8;
        }
    }

    best_dir
}
