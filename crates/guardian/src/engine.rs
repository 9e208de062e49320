//! Guardian scan engine.

use contentgate_core::{
    ContentBrief, GuardianConfig, GuardianReport, RiskLevel, ScanStage, Severity, Violation,
    ViolationType,
};
use tracing::{debug, warn};

use crate::registry::RuleRegistry;
use crate::rules::{builtin_rules, Rule, PERSONAL_DATA_RULES};
use crate::scoring::{compliance_score, recommend};
use crate::GuardianError;

const REDACTED: &str = "[REDACTED]";

/// Deterministic safety checker.
pub struct Guardian {
    registry: RuleRegistry,
    config: GuardianConfig,
}

impl Guardian {
    /// Build a Guardian from the built-in rules plus everything in `config`.
    pub fn new(config: GuardianConfig) -> Result<Self, GuardianError> {
        let mut registry = RuleRegistry::with_rules(builtin_rules()?)?;

        for spec in &config.custom_rules {
            let mut rule = Rule::pattern(
                spec.id.clone(),
                spec.violation_type,
                spec.severity,
                &spec.pattern,
                spec.message.clone(),
            )?;
            if let Some(suggestion) = &spec.suggestion {
                rule = rule.with_suggestion(suggestion.clone());
            }
            if spec.check_input {
                rule = rule.on_input();
            }
            registry.register(rule)?;
        }

        if !config.blocked_terms.is_empty() {
            registry.register(
                Rule::keywords(
                    "config.blocked_terms",
                    ViolationType::BlockedTerm,
                    Severity::Medium,
                    &config.blocked_terms,
                    "Blocked term",
                )?
                .with_suggestion("Remove or replace the blocked term"),
            )?;
        }

        debug!("Guardian ready with {} rules", registry.len());
        Ok(Self { registry, config })
    }

    /// Guardian with default configuration.
    pub fn with_defaults() -> Result<Self, GuardianError> {
        Self::new(GuardianConfig::default())
    }

    /// Rule registry.
    pub fn rules(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Mutable rule registry, for registering rules at runtime.
    pub fn rules_mut(&mut self) -> &mut RuleRegistry {
        &mut self.registry
    }

    /// Screen requester-supplied text before it reaches a model.
    pub fn scan_input(&self, text: &str) -> GuardianReport {
        let mut violations = Vec::new();

        let chars = text.chars().count();
        if chars > self.config.max_input_chars {
            violations.push(Violation {
                rule: "input.max_length".to_string(),
                violation_type: ViolationType::ExcessiveLength,
                severity: Severity::High,
                matched: String::new(),
                offset: 0,
                message: format!(
                    "Input is {} characters; the limit is {}",
                    chars, self.config.max_input_chars
                ),
                suggestion: Some("Shorten the brief".to_string()),
            });
        }

        for rule in self.registry.for_stage(ScanStage::Input) {
            violations.extend(apply(rule, text));
        }

        self.report(ScanStage::Input, violations)
    }

    /// Screen generated content.
    ///
    /// With a brief, the brand's words to avoid and the business context's
    /// competitor names are checked too.
    pub fn scan_output(&self, text: &str, brief: Option<&ContentBrief>) -> GuardianReport {
        let mut violations = Vec::new();

        for rule in self.registry.for_stage(ScanStage::Output) {
            violations.extend(apply(rule, text));
        }

        for rule in brief.map(context_rules).unwrap_or_default() {
            violations.extend(apply(&rule, text));
        }

        self.report(ScanStage::Output, violations)
    }

    /// Mask personal data (emails, phone numbers, SSNs, card numbers).
    pub fn redact_personal_data(&self, text: &str) -> String {
        let mut out = text.to_string();
        for id in PERSONAL_DATA_RULES {
            if let Some(rule) = self.registry.get(id) {
                out = rule.replace_all(&out, REDACTED).into_owned();
            }
        }
        out
    }

    fn report(&self, stage: ScanStage, mut violations: Vec<Violation>) -> GuardianReport {
        violations.sort_by(|a, b| a.offset.cmp(&b.offset).then(b.severity.cmp(&a.severity)));

        let risk_level = RiskLevel::from_violations(&violations);
        let compliance = compliance_score(&violations);
        let recommendation = recommend(risk_level, compliance, self.config.review_threshold);

        if risk_level >= RiskLevel::High {
            warn!(
                "Guardian {:?} scan: {:?} risk, {} violation(s), recommending {:?}",
                stage,
                risk_level,
                violations.len(),
                recommendation
            );
        } else {
            debug!(
                "Guardian {:?} scan: {:?} risk, compliance {:.0}",
                stage, risk_level, compliance
            );
        }

        GuardianReport {
            stage,
            risk_level,
            compliance_score: compliance,
            recommendation,
            violations,
            checked_at: chrono::Utc::now(),
        }
    }
}

fn apply(rule: &Rule, text: &str) -> Vec<Violation> {
    rule.find_all(text)
        .into_iter()
        .map(|(matched, offset)| Violation {
            rule: rule.id.clone(),
            violation_type: rule.violation_type,
            severity: rule.severity,
            matched,
            offset,
            message: rule.message.clone(),
            suggestion: rule.suggestion.clone(),
        })
        .collect()
}

/// Rules derived from the brief's brand voice and business context.
fn context_rules(brief: &ContentBrief) -> Vec<Rule> {
    let mut rules = Vec::new();

    if let Some(brand) = brief.brand.as_ref().filter(|b| !b.words_to_avoid.is_empty()) {
        match Rule::keywords(
            "brand.words_to_avoid",
            ViolationType::BlockedTerm,
            Severity::Medium,
            &brand.words_to_avoid,
            "Word the brand avoids",
        ) {
            Ok(rule) => rules.push(rule.with_suggestion("Use the brand's preferred vocabulary")),
            Err(e) => warn!("Skipping brand vocabulary rule: {}", e),
        }
    }

    if let Some(business) = brief.business.as_ref().filter(|b| !b.competitors.is_empty()) {
        match Rule::keywords(
            "business.competitor_mention",
            ViolationType::CompetitorMention,
            Severity::Low,
            &business.competitors,
            "Competitor named in content",
        ) {
            Ok(rule) => rules.push(rule.with_suggestion(format!(
                "Focus on {} rather than competitors",
                business.company_name
            ))),
            Err(e) => warn!("Skipping competitor rule: {}", e),
        }
    }

    rules
}
