use std::fmt::Write;

use crate::TrainingOutcome;

const RULE_WIDTH: usize = 66;

/// Print the hold-out evaluation table to stdout.
pub fn print_report(outcome: &TrainingOutcome) {
    print!("{}", render_report(outcome));
}

/// Per-item hold-out metrics, an average row and the stored uncertainties.
pub fn render_report(outcome: &TrainingOutcome) -> String {
    let mut out = String::new();
    if outcome.evaluation.is_empty() {
        out.push_str("No items to report.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "Model {} fitted on {} days, evaluated on {} days",
        outcome.artifact.schema_version, outcome.train_days, outcome.test_days
    );
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "{:<10} {:>8} {:>8} {:>8} {:>8} {:>10} {:>9}",
        "Item", "MAE", "RMSE", "R²", "MAPE", "AvgSales", "Unc(σ)"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for e in &outcome.evaluation {
        let _ = writeln!(
            out,
            "{:<10} {:>8.2} {:>8.2} {:>8.3} {:>7.1}% {:>10.1} {:>9.2}",
            e.item, e.mae, e.rmse, e.r2, e.mape, e.avg_sales, e.uncertainty
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "{:<10} {:>8} {:>8} {:>8.3}",
        "AVERAGE",
        "",
        "",
        outcome.avg_r2()
    );
    out
}
