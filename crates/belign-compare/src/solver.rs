//! Assignment strategies for the bipartite matcher.
//!
//! One interface, two implementations: the exact Kuhn–Munkres solver and a
//! greedy approximation. Cells below the threshold (or failing the entity
//! gate) are forbidden, never merely low-weight, so below-threshold
//! statements can never be forced into a match.

use belign_common::config::SolverKind;

/// Pairwise weights for one evidence group. `None` marks an incomparable
/// pair (entity gate failed) — excluded from matching entirely.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    pub n_rows: usize,
    pub n_cols: usize,
    weights: Vec<Option<f64>>,
}

impl ScoreMatrix {
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            weights: vec![None; n_rows * n_cols],
        }
    }

    pub fn set(&mut self, row: usize, col: usize, weight: Option<f64>) {
        self.weights[row * self.n_cols + col] = weight;
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.weights[row * self.n_cols + col]
    }

    /// Weight of a cell that is comparable and at or above the threshold.
    pub fn admissible(&self, row: usize, col: usize, threshold: f64) -> Option<f64> {
        self.get(row, col).filter(|&w| w >= threshold)
    }
}

/// Committed (row, col) pairs. One-to-one by construction.
pub type Assignment = Vec<(usize, usize)>;

/// Pluggable assignment strategy, selected once at startup.
pub trait AssignmentSolver: Send + Sync {
    fn name(&self) -> &'static str;
    fn is_optimal(&self) -> bool;
    fn solve(&self, matrix: &ScoreMatrix, threshold: f64) -> Assignment;
}

pub fn select_solver(kind: SolverKind) -> Box<dyn AssignmentSolver> {
    match kind {
        SolverKind::Exact => Box::new(ExactSolver),
        SolverKind::Greedy => Box::new(GreedySolver),
    }
}

// ---------------------------------------------------------------------------
// Exact solver (Kuhn–Munkres)
// ---------------------------------------------------------------------------

/// Maximum-weight one-to-one assignment via the Hungarian algorithm with
/// potentials, O(n³). The matrix is padded square with zero-weight cells;
/// padding and inadmissible cells are filtered from the returned assignment,
/// which cannot lower the total. Iteration order is fixed by input order, so
/// score ties resolve reproducibly.
pub struct ExactSolver;

impl AssignmentSolver for ExactSolver {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn is_optimal(&self) -> bool {
        true
    }

    fn solve(&self, matrix: &ScoreMatrix, threshold: f64) -> Assignment {
        let n = matrix.n_rows.max(matrix.n_cols);
        if n == 0 {
            return Vec::new();
        }

        // Minimisation form: cost = 1 - weight (weights are bounded by 1).
        let mut cost = vec![vec![1.0f64; n]; n];
        for i in 0..matrix.n_rows {
            for j in 0..matrix.n_cols {
                if let Some(w) = matrix.admissible(i, j, threshold) {
                    cost[i][j] = 1.0 - w;
                }
            }
        }

        let assignment = hungarian(&cost);

        let mut committed: Assignment = assignment
            .into_iter()
            .filter(|&(i, j)| {
                i < matrix.n_rows
                    && j < matrix.n_cols
                    && matrix.admissible(i, j, threshold).is_some()
            })
            .collect();
        committed.sort_unstable();
        committed
    }
}

/// Classic assignment-problem algorithm with row/column potentials.
/// `cost` must be square. Returns (row, col) pairs covering every row.
fn hungarian(cost: &[Vec<f64>]) -> Vec<(usize, usize)> {
    let n = cost.len();
    const INF: f64 = f64::INFINITY;

    // 1-indexed working arrays; p[j] is the row matched to column j.
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; n + 1];
    let mut p = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![INF; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = INF;
            let mut j1 = 0usize;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = cost[i0 - 1][j - 1] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // Augment along the alternating path back to the free column.
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    (1..=n).map(|j| (p[j] - 1, j - 1)).collect()
}

// ---------------------------------------------------------------------------
// Greedy fallback
// ---------------------------------------------------------------------------

/// Documented non-optimal fallback: repeatedly commit the highest remaining
/// admissible cell, remove its row and column, continue. Ties break by row
/// then column index so output is reproducible.
pub struct GreedySolver;

impl AssignmentSolver for GreedySolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn is_optimal(&self) -> bool {
        false
    }

    fn solve(&self, matrix: &ScoreMatrix, threshold: f64) -> Assignment {
        let mut candidates: Vec<(usize, usize, f64)> = Vec::new();
        for i in 0..matrix.n_rows {
            for j in 0..matrix.n_cols {
                if let Some(w) = matrix.admissible(i, j, threshold) {
                    candidates.push((i, j, w));
                }
            }
        }
        candidates.sort_by(|a, b| {
            b.2.total_cmp(&a.2)
                .then_with(|| a.0.cmp(&b.0))
                .then_with(|| a.1.cmp(&b.1))
        });

        let mut used_rows = vec![false; matrix.n_rows];
        let mut used_cols = vec![false; matrix.n_cols];
        let mut committed = Vec::new();
        for (i, j, _) in candidates {
            if !used_rows[i] && !used_cols[j] {
                used_rows[i] = true;
                used_cols[j] = true;
                committed.push((i, j));
            }
        }
        committed.sort_unstable();
        committed
    }
}
