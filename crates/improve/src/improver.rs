//! Generate, review, revise loop.

use contentgate_core::{
    ContentBrief, GuardianRecommendation, ImproveConfig, ImprovementIteration, ImprovementOutcome,
    RunId, StopReason, Time,
};
use contentgate_guardian::Guardian;
use contentgate_review::{render_feedback, ContentReviewer};
use std::sync::Arc;
use tracing::{info, warn};

use crate::writer::ContentWriter;
use crate::ImproveError;

/// Bounded improvement loop.
pub struct IterativeImprover {
    writer: Arc<dyn ContentWriter>,
    reviewer: Arc<dyn ContentReviewer>,
    config: ImproveConfig,
    input_guard: Option<Arc<Guardian>>,
}

impl IterativeImprover {
    /// Create a new improver.
    pub fn new(
        writer: Arc<dyn ContentWriter>,
        reviewer: Arc<dyn ContentReviewer>,
        config: ImproveConfig,
    ) -> Self {
        Self {
            writer,
            reviewer,
            config,
            input_guard: None,
        }
    }

    /// Screen every brief with this Guardian before writing.
    pub fn with_input_guard(mut self, guardian: Arc<Guardian>) -> Self {
        self.input_guard = Some(guardian);
        self
    }

    /// Loop settings.
    pub fn config(&self) -> &ImproveConfig {
        &self.config
    }

    /// Write a draft for `brief`, then improve it.
    pub async fn improve(&self, brief: &ContentBrief) -> Result<ImprovementOutcome, ImproveError> {
        self.validate()?;
        self.guard(brief)?;
        let started_at = chrono::Utc::now();

        let draft = self.writer.draft(brief).await?;
        self.run(brief, draft, started_at).await
    }

    /// Improve existing content instead of drafting from scratch.
    pub async fn improve_from(
        &self,
        brief: &ContentBrief,
        content: &str,
    ) -> Result<ImprovementOutcome, ImproveError> {
        self.validate()?;
        self.guard(brief)?;
        self.run(brief, content.to_string(), chrono::Utc::now()).await
    }

    fn validate(&self) -> Result<(), ImproveError> {
        if self.config.max_iterations == 0 {
            return Err(ImproveError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.config.target_score) {
            return Err(ImproveError::InvalidConfig(format!(
                "target_score must be within 0-100, got {}",
                self.config.target_score
            )));
        }
        Ok(())
    }

    fn guard(&self, brief: &ContentBrief) -> Result<(), ImproveError> {
        let Some(guardian) = &self.input_guard else {
            return Ok(());
        };
        let report = guardian.scan_input(&brief.requester_text());
        if report.recommendation == GuardianRecommendation::Reject {
            warn!("Brief rejected by input guard: {} violation(s)", report.violations.len());
            return Err(ImproveError::BriefRejected(Box::new(report)));
        }
        Ok(())
    }

    async fn run(
        &self,
        brief: &ContentBrief,
        mut content: String,
        started_at: Time,
    ) -> Result<ImprovementOutcome, ImproveError> {
        let max = self.config.max_iterations;
        let mut history: Vec<ImprovementIteration> = Vec::new();
        let mut iteration = 0;

        let stop_reason = loop {
            iteration += 1;

            let report = self.reviewer.review(&content, brief).await?;
            let feedback = render_feedback(&report);
            let score = report.score;
            let verdict = report.verdict;
            let approved = report.approved();

            info!("Iteration {}/{}: {:.1}/100, {}", iteration, max, score, verdict);

            history.push(ImprovementIteration {
                iteration,
                content: content.clone(),
                score,
                verdict,
                feedback: feedback.clone(),
                report,
            });

            if score >= self.config.target_score {
                break StopReason::TargetReached;
            }
            if approved {
                break StopReason::Approved;
            }
            if iteration >= max {
                break StopReason::MaxIterations;
            }

            content = self.writer.revise(brief, &content, &feedback).await?;
        };

        let (final_content, final_score, final_verdict) = history
            .last()
            .map(|last| (last.content.clone(), last.score, last.verdict))
            .ok_or_else(|| ImproveError::InvalidConfig("no iteration ran".to_string()))?;

        info!(
            "Improvement finished after {} iteration(s): {:?}, {:.1}/100",
            iteration, stop_reason, final_score
        );

        Ok(ImprovementOutcome {
            id: RunId::new(),
            brief: brief.clone(),
            final_content,
            final_score,
            final_verdict,
            iterations: iteration,
            stop_reason,
            history,
            started_at,
            finished_at: chrono::Utc::now(),
        })
    }
}
