//! Donors: invert Receivers by pulling, not pushing.
//!
//! The natural formulation walks every cell and pushes itself onto its
//! receiver's donor list — but then multiple cells can share a receiver and
//! need to append to the same slot. Instead each cell `c` scans its own
//! eight neighbours and keeps those that point back at it; `c` alone ever
//! writes `donor[8c..]`, so no atomics are needed.

use crate::grid::{SimState, DIR_OFFSETS, SINK};

/// Fill `ndon[c]` and the `donor[8c..]` prefix for every cell in the same
/// domain Receivers operates on (`1 ≤ y ≤ H-2`, `1 ≤ x ≤ W-2`) so they
/// enumerate exactly the neighbours whose receiver is `c`.
pub fn compute_donors(state: &mut SimState) {
    let width = state.width;
    let height = state.height;
    let rec = &state.rec;

    #[cfg(feature = "threading")]
    {
        use rayon::prelude::*;
        let results: Vec<(u8, [u32; 8])> = (0..width * height)
            .into_par_iter()
            .map(|c| gather_donors(rec, width, height, c))
            .collect();
        for (c, (count, slots)) in results.into_iter().enumerate() {
            state.ndon[c] = count;
            state.donor[8 * c..8 * c + 8].copy_from_slice(&slots);
        }
    }

    #[cfg(not(feature = "threading"))]
    {
        for c in 0..width * height {
            let (count, slots) = gather_donors(rec, width, height, c);
            state.ndon[c] = count;
            state.donor[8 * c..8 * c + 8].copy_from_slice(&slots);
        }
    }
}

/// For cell `c`, examine its eight neighbours and keep those `n` with
/// `rec[n] != SINK` and `n`'s receiver pointing back at `c`.
fn gather_donors(rec: &[i8], width: usize, height: usize, c: usize) -> (u8, [u32; 8]) {
    let mut slots = [0u32; 8];
    let mut count = 0u8;

    let x = c % width;
    let y = c / width;
    if !((1..height.saturating_sub(1)).contains(&y) && (1..width.saturating_sub(1)).contains(&x)) {
        return (count, slots);
    }

    for d in 0..8usize {
        let (dy, dx) = DIR_OFFSETS[d];
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
            continue;
        }
        let n = ny as usize * width + nx as usize;
        let rd = rec[n];
        if rd == SINK {
            continue;
        }
        let (rdy, rdx) = DIR_OFFSETS[rd as usize];
        let rx = nx + rdx;
        let ry = ny + rdy;
        if rx >= 0 && ry >= 0 && rx as usize == x && ry as usize == y {
            slots[count as usize] = n as u32;
            count += 1;
        }
    }

    (count, slots)
}
