//! Rule registry.

use contentgate_core::{ScanStage, ViolationType};
use std::collections::HashMap;

use crate::rules::Rule;
use crate::GuardianError;

/// Registry for Guardian rules.
///
/// Rules keep their registration order so scans are deterministic.
pub struct RuleRegistry {
    rules: HashMap<String, Rule>,
    order: Vec<String>,
    by_type: HashMap<ViolationType, Vec<String>>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            order: Vec::new(),
            by_type: HashMap::new(),
        }
    }

    /// Create a registry holding the given rules.
    pub fn with_rules(rules: impl IntoIterator<Item = Rule>) -> Result<Self, GuardianError> {
        let mut registry = Self::new();
        for rule in rules {
            registry.register(rule)?;
        }
        Ok(registry)
    }

    /// Register a rule.
    pub fn register(&mut self, rule: Rule) -> Result<(), GuardianError> {
        if self.rules.contains_key(&rule.id) {
            return Err(GuardianError::DuplicateRule(rule.id));
        }

        let id = rule.id.clone();
        self.by_type
            .entry(rule.violation_type)
            .or_default()
            .push(id.clone());
        self.order.push(id.clone());
        self.rules.insert(id, rule);
        Ok(())
    }

    /// Unregister a rule.
    pub fn unregister(&mut self, id: &str) -> Option<Rule> {
        let rule = self.rules.remove(id)?;
        self.order.retain(|x| x != id);
        if let Some(ids) = self.by_type.get_mut(&rule.violation_type) {
            ids.retain(|x| x != id);
        }
        Some(rule)
    }

    /// Get a rule by ID.
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    /// List all rules in registration order.
    pub fn list(&self) -> Vec<&Rule> {
        self.order
            .iter()
            .filter_map(|id| self.rules.get(id))
            .collect()
    }

    /// Rules that run at `stage`.
    pub fn for_stage(&self, stage: ScanStage) -> Vec<&Rule> {
        self.list()
            .into_iter()
            .filter(|r| r.applies_to(stage))
            .collect()
    }

    /// Find rules by violation type.
    pub fn find_by_type(&self, violation_type: ViolationType) -> Vec<&Rule> {
        self.by_type
            .get(&violation_type)
            .into_iter()
            .flat_map(|ids| ids.iter().filter_map(|id| self.rules.get(id)))
            .collect()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
