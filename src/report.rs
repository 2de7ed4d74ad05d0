//! Presentation of engine results: a console report in the shape analysts
//! read, and NDJSON records for downstream tooling.

use std::io::{self, Write};

use serde::Serialize;

use crate::engine::ScenarioReport;
use crate::metrics::RiskMetrics;
use crate::types::Retention;

/// One NDJSON line: a (scenario, retention) pair with either its metrics or
/// the reason it could not be evaluated.
#[derive(Debug, Serialize)]
pub struct MetricsRecord<'a> {
    pub scenario: &'a str,
    pub retention: Retention,
    pub mu: f64,
    pub sigma: f64,
    #[serde(flatten)]
    pub metrics: Option<RiskMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn records(report: &ScenarioReport) -> Vec<MetricsRecord<'_>> {
    report
        .retentions
        .iter()
        .map(|r| MetricsRecord {
            scenario: &report.scenario,
            retention: r.retention,
            mu: report.params.mu,
            sigma: report.params.sigma,
            metrics: r.outcome.as_ref().ok().copied(),
            error: r.outcome.as_ref().err().map(|e| e.to_string()),
        })
        .collect()
}

pub fn write_ndjson(w: &mut impl Write, reports: &[ScenarioReport]) -> io::Result<()> {
    for report in reports {
        for record in records(report) {
            serde_json::to_writer(&mut *w, &record)?;
            writeln!(w)?;
        }
    }
    Ok(())
}

pub fn write_text(w: &mut impl Write, report: &ScenarioReport) -> io::Result<()> {
    let rule = "=".repeat(26);
    writeln!(w, "\n{rule}")?;
    writeln!(w, "{}", report.scenario)?;
    writeln!(w, "{rule}")?;
    writeln!(
        w,
        "Severity: mean={:.4} std={:.4} (lognormal mu={:.4} sigma={:.4})",
        report.severity.mean, report.severity.std, report.params.mu, report.params.sigma
    )?;

    for r in &report.retentions {
        writeln!(w, "\nRetention {}", r.retention)?;
        match &r.outcome {
            Ok(m) => {
                writeln!(w, "Expected Ceded Loss:     {:.6}", m.expected_ceded_loss)?;
                writeln!(w, "Risk (Std Dev):          {:.6}", m.risk_std_dev)?;
                writeln!(w, "VaR 99% (Extreme Loss):  {:.6}", m.var_99)?;
                writeln!(w, "TVaR 99% (Tail Risk):    {:.6}", m.tvar_99)?;
                writeln!(w, "P(Reinsurer Pays):       {:.6}", m.prob_reinsurer_pays)?;
                writeln!(w, "Value for Money:         {:.6}", m.value_for_money)?;
            }
            Err(e) => writeln!(w, "Not evaluated: {e}")?,
        }
    }
    Ok(())
}
