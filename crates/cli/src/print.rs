//! Text and JSON output.

use anyhow::Result;
use contentgate_core::{
    CriticReview, GuardianReport, ImprovementOutcome, SafetyReport,
};
use contentgate_guardian::Rule;
use contentgate_review::render_feedback;

pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn guardian(report: &GuardianReport) {
    println!("Guardian ({:?} stage)", report.stage);
    println!("  Risk: {:?}", report.risk_level);
    println!("  Compliance: {:.0}/100", report.compliance_score);
    println!("  Recommendation: {:?}", report.recommendation);

    if report.violations.is_empty() {
        println!("  No violations");
        return;
    }
    println!("  Violations ({})", report.violations.len());
    for v in &report.violations {
        println!(
            "    {:<8} | {} | @{} | {}{}",
            format!("{:?}", v.severity).to_uppercase(),
            v.rule,
            v.offset,
            v.message,
            if v.matched.is_empty() { String::new() } else { format!(": \"{}\"", v.matched) },
        );
    }
}

pub fn critic(review: &CriticReview) {
    println!("Critic: {:.1}/100 ({:?})", review.overall_score, review.recommendation);
    println!("  Scorers: {}", review.scorers.join(", "));
    for d in &review.dimensions {
        let flag = if review.critical_failures.contains(&d.dimension) {
            " CRITICAL"
        } else if review.high_disagreement.contains(&d.dimension) {
            " DISAGREE"
        } else {
            ""
        };
        println!("    {:<20} {:>4.1}{}", d.dimension.key(), d.score, flag);
    }
    if !review.missing_dimensions.is_empty() {
        let missing: Vec<_> = review.missing_dimensions.iter().map(|d| d.key()).collect();
        println!("  Unscored: {}", missing.join(", "));
    }
    for summary in &review.summaries {
        println!("  > {}", summary);
    }
}

pub fn safety(report: &SafetyReport) {
    println!("Review {}", report.id);
    println!("  Verdict: {}", report.verdict);
    println!("  Score: {:.1}/100", report.score);
    println!("  Created: {}", report.created_at);
    println!();
    guardian(&report.guardian);
    if let Some(review) = &report.critic {
        println!();
        critic(review);
    }
    if !report.approved() {
        println!();
        println!("{}", render_feedback(report));
    }
}

pub fn outcome(outcome: &ImprovementOutcome) {
    println!("Run {}", outcome.id);
    println!("  Topic: {} ({})", outcome.brief.topic, outcome.brief.content_type);
    println!("  Stopped: {:?} after {} iteration(s)", outcome.stop_reason, outcome.iterations);
    println!("  Final: {:.1}/100, {}", outcome.final_score, outcome.final_verdict);
    for it in &outcome.history {
        println!("    #{} {:>5.1} {}", it.iteration, it.score, it.verdict);
    }
    if let Some(best) = outcome.best_iteration() {
        if best.iteration != outcome.iterations {
            println!("  Best pass: #{} ({:.1})", best.iteration, best.score);
        }
    }
    println!();
    println!("{}", outcome.final_content);
}

pub fn rules(rules: &[&Rule]) {
    println!("Rules ({})", rules.len());
    for r in rules {
        println!(
            "  {:<36} {:<18} {:<8}{}",
            r.id,
            r.violation_type.key(),
            format!("{:?}", r.severity).to_uppercase(),
            if r.check_input { " input" } else { "" },
        );
    }
}

pub fn reports(reports: &[SafetyReport]) {
    println!("Reviews ({})", reports.len());
    for r in reports {
        println!(
            "  {} | {} | {:>5.1} | {}",
            r.id,
            r.created_at.format("%Y-%m-%d %H:%M"),
            r.score,
            r.verdict,
        );
    }
}

pub fn runs(runs: &[ImprovementOutcome]) {
    println!("Runs ({})", runs.len());
    for r in runs {
        println!(
            "  {} | {} | {:>5.1} | {} | {} iteration(s) | {}",
            r.id,
            r.started_at.format("%Y-%m-%d %H:%M"),
            r.final_score,
            r.final_verdict,
            r.iterations,
            r.brief.topic,
        );
    }
}
