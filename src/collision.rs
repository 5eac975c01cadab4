//! Collision resolution for laid-out stations
//!
//! Runs after the force simulation. Pairs closer than the minimum spacing
//! are pushed apart along the line joining them, pass after pass, until a
//! pass finds nothing to fix or the pass cap is hit. If overlaps survive
//! the cap, each row of stations (same y) is swept left to right so the
//! spacing holds within every row.
//!
//! Exactly coincident stations have no joining line. They are split
//! horizontally, in an order derived from their ids, so repeated runs
//! produce the same result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Point;

/// Below this distance two stations are treated as coincident
const COINCIDENT: f32 = 1e-3;

/// Extra room added to each push so floating point noise cannot leave a
/// pair a hair short of the minimum
const SLACK: f32 = 0.5;

/// Collision pass settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Minimum centre-to-centre distance between two stations
    pub min_distance: f32,
    /// Cap on pairwise relaxation passes
    pub max_iterations: usize,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            min_distance: 80.0,
            max_iterations: 100,
        }
    }
}

/// What a collision pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionReport {
    /// Pairwise passes run
    pub iterations: usize,
    /// Whether the row sweep had to run after the pass cap
    pub swept: bool,
    /// Pairs still closer than the minimum distance
    pub residual_overlaps: usize,
}

/// Stable 64-bit key for a node id (FNV-1a)
pub fn identity_key(id: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    id.bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// Direction from station `a` to station `b` when they coincide
pub(crate) fn tie_break_direction(key_a: u64, key_b: u64) -> Point {
    if key_a <= key_b {
        Point::new(1.0, 0.0)
    } else {
        Point::new(-1.0, 0.0)
    }
}

/// Number of pairs closer than `min_distance`
pub fn count_overlaps(positions: &[Point], min_distance: f32) -> usize {
    let mut count = 0;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if positions[i].distance(positions[j]) < min_distance {
                count += 1;
            }
        }
    }
    count
}

/// Push overlapping stations apart in place
///
/// `keys` holds one [`identity_key`] per position and only matters for
/// coincident pairs.
pub fn resolve_collisions(
    positions: &mut [Point],
    keys: &[u64],
    config: &CollisionConfig,
) -> CollisionReport {
    debug_assert_eq!(positions.len(), keys.len());

    let min = config.min_distance;
    let n = positions.len();
    let mut report = CollisionReport::default();
    if n < 2 {
        return report;
    }

    let mut settled = false;
    for iteration in 0..config.max_iterations {
        report.iterations = iteration + 1;
        let mut moved = false;

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = positions[j] - positions[i];
                let dist = delta.length();
                if !dist.is_finite() || dist >= min {
                    continue;
                }

                let direction = if dist < COINCIDENT {
                    tie_break_direction(keys[i], keys[j])
                } else {
                    delta / dist
                };
                let push = (min - dist) / 2.0 + SLACK;
                positions[i] -= direction * push;
                positions[j] += direction * push;
                moved = true;
            }
        }

        if !moved {
            settled = true;
            break;
        }
    }

    if !settled && count_overlaps(positions, min) > 0 {
        sweep_rows(positions, keys, min);
        report.swept = true;
    }

    report.residual_overlaps = if report.swept || !settled {
        count_overlaps(positions, min)
    } else {
        0
    };

    debug!(
        iterations = report.iterations,
        swept = report.swept,
        residual = report.residual_overlaps,
        "collision pass finished"
    );
    report
}

/// Enforce spacing inside each row of equal y, keeping each row's mean x
fn sweep_rows(positions: &mut [Point], keys: &[u64], min: f32) {
    let mut rows: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (index, p) in positions.iter().enumerate() {
        rows.entry((p.y + 0.0).to_bits()).or_default().push(index);
    }

    for row in rows.values_mut() {
        if row.len() < 2 {
            continue;
        }
        row.sort_by(|&a, &b| {
            positions[a]
                .x
                .total_cmp(&positions[b].x)
                .then(keys[a].cmp(&keys[b]))
                .then(a.cmp(&b))
        });

        let mean_before = row.iter().map(|&i| positions[i].x).sum::<f32>() / row.len() as f32;
        for k in 1..row.len() {
            let floor = positions[row[k - 1]].x + min + SLACK;
            if positions[row[k]].x < floor {
                positions[row[k]].x = floor;
            }
        }
        let mean_after = row.iter().map(|&i| positions[i].x).sum::<f32>() / row.len() as f32;
        let shift = mean_before - mean_after;
        for &i in row.iter() {
            positions[i].x += shift;
        }
    }
}
