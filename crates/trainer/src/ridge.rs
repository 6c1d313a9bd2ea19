use common::{ForecastError, Result};
use models::LinearRegressor;
use tracing::debug;

/// Pivots smaller than this make the normal equations singular.
const PIVOT_EPSILON: f64 = 1e-12;

/// Fit a multi-output ridge regression.
///
/// Features and targets are centred first so the intercept is not penalised.
/// `rows[i]` is one observation and `targets[i]` its outputs.
pub fn fit_ridge(rows: &[Vec<f64>], targets: &[Vec<f64>], lambda: f64) -> Result<LinearRegressor> {
    if rows.is_empty() || rows.len() != targets.len() {
        return Err(ForecastError::Training(format!(
            "{} feature rows against {} target rows",
            rows.len(),
            targets.len()
        )));
    }
    if !lambda.is_finite() || lambda < 0.0 {
        return Err(ForecastError::Training(format!(
            "ridge penalty must be non-negative, got {lambda}"
        )));
    }

    let n = rows.len();
    let p = rows[0].len();
    let k = targets[0].len();
    if rows.iter().any(|r| r.len() != p) || targets.iter().any(|t| t.len() != k) {
        return Err(ForecastError::Training("ragged training matrix".into()));
    }

    let x_mean = column_means(rows, p);
    let y_mean = column_means(targets, k);

    // Normal equations on centred data: (XᵀX + λI) B = XᵀY
    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![vec![0.0; k]; p];
    for (row, target) in rows.iter().zip(targets) {
        let xc: Vec<f64> = row.iter().zip(&x_mean).map(|(x, m)| x - m).collect();
        let yc: Vec<f64> = target.iter().zip(&y_mean).map(|(y, m)| y - m).collect();
        for a in 0..p {
            for b in 0..p {
                xtx[a][b] += xc[a] * xc[b];
            }
            for o in 0..k {
                xty[a][o] += xc[a] * yc[o];
            }
        }
    }
    for (a, row) in xtx.iter_mut().enumerate() {
        row[a] += lambda;
    }

    let beta = solve(xtx, xty)?;

    // beta is p × k; the regressor stores one coefficient row per output.
    let coefficients: Vec<Vec<f64>> = (0..k)
        .map(|o| (0..p).map(|f| beta[f][o]).collect())
        .collect();
    let intercepts: Vec<f64> = (0..k)
        .map(|o| y_mean[o] - (0..p).map(|f| x_mean[f] * beta[f][o]).sum::<f64>())
        .collect();

    debug!(rows = n, features = p, outputs = k, lambda = lambda, "Fitted ridge regression");
    LinearRegressor::new(coefficients, intercepts)
}

fn column_means(matrix: &[Vec<f64>], width: usize) -> Vec<f64> {
    let n = matrix.len() as f64;
    (0..width)
        .map(|c| matrix.iter().map(|r| r[c]).sum::<f64>() / n)
        .collect()
}

/// Solve `a · x = b` for every column of `b` by Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<Vec<f64>>) -> Result<Vec<Vec<f64>>> {
    let n = a.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < PIVOT_EPSILON {
            return Err(ForecastError::Training(format!(
                "normal equations are singular at column {col}; increase the ridge penalty"
            )));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for c in col..n {
                a[row][c] -= factor * a[col][c];
            }
            for c in 0..b[row].len() {
                b[row][c] -= factor * b[col][c];
            }
        }
    }

    let k = b.first().map_or(0, Vec::len);
    let mut x = vec![vec![0.0; k]; n];
    for row in (0..n).rev() {
        for o in 0..k {
            let tail: f64 = (row + 1..n).map(|c| a[row][c] * x[c][o]).sum();
            x[row][o] = (b[row][o] - tail) / a[row][row];
        }
    }
    Ok(x)
}
