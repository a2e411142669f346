//! Ordering: level-synchronous BFS over the inverted flow graph.
//!
//! Produces `stack`, a topological order of the flow forest from sinks
//! toward headwaters, partitioned into contiguous `levels` such that cells
//! within a level are mutually independent (neither an ancestor nor a
//! descendant of another) and therefore safe to process concurrently in
//! Accumulation and Erosion.
//!
//! Level construction is inherently sequential — level `k+1` can only be
//! built once level `k` is known — but gathering the donors of one level is
//! embarrassingly parallel, so the `threading` feature parallelizes that
//! inner gather with `rayon` while keeping the level-by-level barrier. A
//! sharded variant, building independent stacks over disjoint seed sets,
//! would let levels build concurrently too, but at the cost of a new
//! capacity-overflow failure mode per shard for no correctness benefit over
//! this single, always-correct traversal.

use crate::grid::SimState;

/// Build `state.stack` and `state.levels` from the current `rec`/`ndon`/
/// `donor` arrays.
///
/// Edge case: if no frame cell is a sink (impossible under the halo
/// convention, since halo cells are always `SINK` and every downhill chain
/// must terminate there or at an interior sink), `levels` is left as the
/// single-element `[0]` and `stack` is empty.
pub fn build_ordering(state: &mut SimState) {
    let width = state.width;
    state.stack.clear();
    state.levels.clear();
    state.levels.push(0);

    for y in state.frame_y_range() {
        for x in state.frame_x_range() {
            let c = y * width + x;
            if state.rec[c] == crate::grid::SINK {
                state.stack.push(c as u32);
            }
        }
    }

    if state.stack.is_empty() {
        return;
    }
    state.levels.push(state.stack.len() as u32);

    loop {
        let prev_start = state.levels[state.levels.len() - 2] as usize;
        let prev_end = *state.levels.last().unwrap() as usize;
        let prev_level = &state.stack[prev_start..prev_end];

        let next = gather_next_level(state, prev_level);
        if next.is_empty() {
            break;
        }
        state.stack.extend_from_slice(&next);
        state.levels.push(state.stack.len() as u32);
    }

    debug_assert_eq!(*state.levels.last().unwrap() as usize, state.stack.len());
    debug_assert!(state.levels.windows(2).all(|w| w[0] < w[1]));
    debug_assert!(state.stack.len() <= state.width * state.height);
}

#[cfg(feature = "threading")]
fn gather_next_level(state: &SimState, prev_level: &[u32]) -> Vec<u32> {
    use rayon::prelude::*;
    let ndon = &state.ndon;
    let donor = &state.donor;
    prev_level
        .par_iter()
        .flat_map_iter(|&c| {
            let c = c as usize;
            donor[8 * c..8 * c + ndon[c] as usize].iter().copied()
        })
        .collect()
}

#[cfg(not(feature = "threading"))]
fn gather_next_level(state: &SimState, prev_level: &[u32]) -> Vec<u32> {
    let mut next = Vec::new();
    for &c in prev_level {
        let c = c as usize;
        next.extend_from_slice(&state.donor[8 * c..8 * c + state.ndon[c] as usize]);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donors::compute_donors;
    use crate::grid::SimState;
    use crate::receivers::compute_receivers;

    fn run_pipeline(s: &mut SimState) {
        compute_receivers(s);
        compute_donors(s);
        build_ordering(s);
    }

    #[test]
    fn flat_grid_has_one_level_of_all_frame_cells() {
        let mut s = SimState::new(5, 5);
        run_pipeline(&mut s);
        // Every frame cell is flat, so every frame cell is its own sink and
        // all of them land in the single root level.
        assert_eq!(s.levels, vec![0, 9]);
        assert_eq!(s.stack.len(), 9);
    }

    #[test]
    fn ramp_levels_grow_from_west_column_eastward() {
        let mut s = SimState::new(10, 10);
        for y in 0..10 {
            for x in 0..10 {
                s.h[s.index(x, y)] = x as f64;
            }
        }
        run_pipeline(&mut s);
        // 8 frame columns (1..=8), each column forms its own level, in
        // increasing x order, since every frame cell drains one column west.
        assert_eq!(s.levels.len() - 1, 8);
        for (level_idx, level_bounds) in s.levels.windows(2).enumerate() {
            let expected_x = level_idx + 1;
            for &c in &s.stack[level_bounds[0] as usize..level_bounds[1] as usize] {
                let x = c as usize % s.width;
                assert_eq!(x, expected_x);
            }
        }
    }

    #[test]
    fn every_cell_appears_exactly_once_and_after_its_donors() {
        let mut s = SimState::new(14, 14);
        for y in 0..14 {
            for x in 0..14 {
                s.h[s.index(x, y)] = ((x as f64) * 0.9 + (y as f64) * 1.7).cos().abs() * 15.0;
            }
        }
        run_pipeline(&mut s);

        let mut position = vec![None; s.width * s.height];
        for (i, &c) in s.stack.iter().enumerate() {
            assert!(position[c as usize].is_none(), "cell {c} appears twice in stack");
            position[c as usize] = Some(i);
        }

        for &c in &s.stack {
            let c = c as usize;
            let ci = position[c].unwrap();
            for k in 0..s.ndon[c] as usize {
                let donor = s.donor[8 * c + k] as usize;
                let di = position[donor].expect("donor must itself be in the stack");
                assert!(di > ci, "donor {donor} must appear after receiver {c}");
            }
        }
    }
}
