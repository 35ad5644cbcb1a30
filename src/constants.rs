//! Constants for board geometry and search parameters.
//!
//! The board is a fixed 8x8 grid packed into one `u64` per color, with cell
//! `(x, y)` stored at bit `x + WIDTH * y`.

use std::time::Duration;

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of columns.
pub const WIDTH: usize = 8;

/// Number of rows.
pub const HEIGHT: usize = 8;

/// Total number of cells on the board.
pub const CAPACITY: usize = WIDTH * HEIGHT;

/// Scan directions as `(dx, dy)` pairs, used by the capture rule.
/// Order: NW, W, SW, S, SE, E, NE, N
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

// =============================================================================
// MCTS Parameters
// =============================================================================

/// UCB1 exploration constant, `2 * sqrt(2)`.
pub const EXPLORATION: f64 = 2.0 * std::f64::consts::SQRT_2;

/// Confidence reported when the best child has never been played.
pub const UNPLAYED_CONFIDENCE: f64 = 100.0;

// =============================================================================
// Driving Loop
// =============================================================================

/// Default wall-clock budget for one AI move.
pub const DEFAULT_THINK_TIME: Duration = Duration::from_secs(2);

/// Minimum wall time between two progress snapshots.
pub const REPORT_INTERVAL: Duration = Duration::from_millis(100);
