//! Revision feedback for writers.

use contentgate_core::SafetyReport;

/// Turn a safety report into instructions for the next revision.
///
/// Guardian violations come first since they block shipping outright.
pub fn render_feedback(report: &SafetyReport) -> String {
    let mut out = format!("Verdict: {}\n", report.verdict);

    if !report.guardian.violations.is_empty() {
        out.push_str("\nSafety issues (must be fixed):\n");
        for violation in &report.guardian.violations {
            out.push_str(&format!("- [{:?}] {}", violation.severity, violation.message));
            if !violation.matched.is_empty() {
                out.push_str(&format!(": \"{}\"", violation.matched));
            }
            if let Some(suggestion) = &violation.suggestion {
                out.push_str(&format!(" ({})", suggestion));
            }
            out.push('\n');
        }
    }

    match &report.critic {
        Some(critic) => {
            out.push_str("\nQuality review:\n");
            out.push_str(&critic.feedback());
        }
        None => out.push_str("\nQuality review skipped; fix the safety issues first.\n"),
    }

    out
}
