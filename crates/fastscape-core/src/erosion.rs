//! Erosion: implicit stream-power update, solved per cell against its
//! (already-updated) receiver.
//!
//! Processing proceeds sink-to-headwater, level by level: a cell's receiver
//! always lies in an earlier level, so by the time a cell is updated its
//! receiver already holds this step's final elevation — which is exactly
//! the coupling the implicit scheme needs.

use crate::grid::{ModelParams, SimState, DIR_LEN, SINK};

/// Newton-Raphson iterations are capped defensively; the model is expected
/// to converge in O(5) iterations (spec leaves the cap unspecified).
const MAX_NEWTON_ITERS: u32 = 50;

/// Apply one erosion pass across every level of `state.stack`, in level
/// order (sinks first).
pub fn apply_erosion(state: &mut SimState, params: &ModelParams) {
    let n_levels = state.levels.len().saturating_sub(1);
    for level in 0..n_levels {
        let start = state.levels[level] as usize;
        let end = state.levels[level + 1] as usize;
        let cells = state.stack[start..end].to_vec();
        erode_level(state, &cells, params);
    }
}

/// Flat index of the cell that direction `d` points to from `c`. Assumes
/// `c` is a frame cell (so the neighbour is always in-bounds).
pub fn receiver_of(width: usize, c: usize, d: i8) -> usize {
    let (dy, dx) = crate::grid::DIR_OFFSETS[d as usize];
    let x = (c % width) as isize + dx;
    let y = (c / width) as isize + dy;
    y as usize * width + x as usize
}

#[cfg(feature = "threading")]
fn erode_level(state: &mut SimState, cells: &[u32], params: &ModelParams) {
    use rayon::prelude::*;
    let width = state.width;
    let h = &state.h;
    let rec = &state.rec;
    let accum = &state.accum;
    let updates: Vec<f64> = cells
        .par_iter()
        .map(|&c| {
            let c = c as usize;
            let d = rec[c];
            if d == SINK {
                return h[c];
            }
            let recv = receiver_of(width, c, d);
            newton_solve(h[c], h[recv], accum[c], DIR_LEN[d as usize], params)
        })
        .collect();
    for (&c, &v) in cells.iter().zip(updates.iter()) {
        state.h[c as usize] = v;
    }
}

#[cfg(not(feature = "threading"))]
fn erode_level(state: &mut SimState, cells: &[u32], params: &ModelParams) {
    let width = state.width;
    for &c in cells {
        let c = c as usize;
        let d = state.rec[c];
        if d == SINK {
            continue;
        }
        let recv = receiver_of(width, c, d);
        let h0 = state.h[c];
        let hn = state.h[recv];
        state.h[c] = newton_solve(h0, hn, state.accum[c], DIR_LEN[d as usize], params);
    }
}

/// Solve `F(h_new) = h_new - h0 + K*dt*A^m*(h_new - hn)^n / L^n = 0` for the
/// root `h_new >= hn`, starting from `h0` and iterating until the step size
/// drops to `tau` or the iteration cap is hit.
///
/// `(h_new - hn)` is clamped to `>= 0` before raising it to `n_exp`: the true
/// root never dips below `hn`, but an intermediate Newton iterate briefly
/// can, and a non-integer `n_exp` would otherwise hand `powf` a negative
/// base.
fn newton_solve(h0: f64, hn: f64, a: f64, l: f64, params: &ModelParams) -> f64 {
    let coef = params.k * params.dt * a.powf(params.m_exp) / l.powf(params.n_exp);

    let mut h_new = h0;
    let mut h_prev = h_new - 2.0 * params.tau;
    let mut iters = 0;

    while (h_new - h_prev).abs() > params.tau && iters < MAX_NEWTON_ITERS {
        h_prev = h_new;
        let diff = (h_new - hn).max(0.0);
        let f = h_new - h0 + coef * diff.powf(params.n_exp);
        let fp = 1.0 + coef * params.n_exp * diff.powf(params.n_exp - 1.0);
        h_new -= f / fp;
        iters += 1;
    }

    h_new.max(hn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulation::compute_accumulation;
    use crate::donors::compute_donors;
    use crate::grid::SimState;
    use crate::ordering::build_ordering;
    use crate::receivers::compute_receivers;
    use approx::assert_abs_diff_eq;

    fn run_pipeline(s: &mut SimState, params: &ModelParams) {
        compute_receivers(s);
        compute_donors(s);
        build_ordering(s);
        compute_accumulation(s, params);
        apply_erosion(s, params);
    }

    #[test]
    fn sinks_are_never_eroded() {
        let params = ModelParams::default();
        let mut s = SimState::new(5, 5);
        let centre = s.index(2, 2);
        let before = s.h[centre];
        run_pipeline(&mut s, &params);
        assert_abs_diff_eq!(s.h[centre], before, epsilon = 1e-9);
    }

    #[test]
    fn erosion_never_raises_elevation() {
        let params = ModelParams::default();
        let mut s = SimState::new(12, 12);
        for y in 0..12 {
            for x in 0..12 {
                s.h[s.index(x, y)] = x as f64 * 5.0;
            }
        }
        let before = s.h.clone();
        run_pipeline(&mut s, &params);
        for c in 0..s.h.len() {
            assert!(s.h[c] <= before[c] + 1e-9, "cell {c} rose from erosion alone");
        }
    }

    #[test]
    fn eroded_elevation_stays_at_or_above_receiver() {
        let params = ModelParams::default();
        let mut s = SimState::new(12, 12);
        for y in 0..12 {
            for x in 0..12 {
                s.h[s.index(x, y)] = x as f64 * 5.0;
            }
        }
        compute_receivers(&mut s);
        compute_donors(&mut s);
        build_ordering(&mut s);
        compute_accumulation(&mut s, &params);
        let h_before_erosion = s.h.clone();
        apply_erosion(&mut s, &params);

        for y in s.frame_y_range() {
            for x in s.frame_x_range() {
                let c = s.index(x, y);
                let d = s.rec[c];
                if d == SINK {
                    continue;
                }
                let recv = receiver_of(s.width, c, d);
                // Compare against the *new* receiver elevation, since the
                // receiver has already been finalised this step.
                assert!(
                    s.h[c] >= s.h[recv] - 1e-6,
                    "cell {c} ({}) ended below its receiver {recv} ({})",
                    s.h[c],
                    s.h[recv]
                );
                let _ = h_before_erosion[c];
            }
        }
    }
}
