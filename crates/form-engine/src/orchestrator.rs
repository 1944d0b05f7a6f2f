use form_spec::{Answer, AnswerStore, QuestionConfig, QuestionId, QuestionRegistry};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::report::{QuestionReport, ValidationVerdict};
use crate::submission::AnswerSnapshot;
use crate::validators::{
    DistributionValidator, MultiSelectValidator, RankingValidator, RecipientRequiredValidator,
    TypeValidator,
};

/// Outcome of validating the whole form.
#[derive(Debug, Clone, Serialize)]
pub struct FormValidation {
    pub verdict: ValidationVerdict,
    /// Every report produced, in validator order, so derived display state can be refreshed.
    pub reports: Vec<QuestionReport>,
    /// Present only when the verdict passed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<AnswerSnapshot>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.verdict.valid
    }
}

/// Runs the type validators in a fixed order over a form.
pub struct ValidationOrchestrator {
    validators: Vec<Box<dyn TypeValidator>>,
}

impl Default for ValidationOrchestrator {
    /// Distribution first, since its zero-fill must be visible to everything after it.
    fn default() -> Self {
        Self::new(vec![
            Box::new(DistributionValidator),
            Box::new(RankingValidator),
            Box::new(RecipientRequiredValidator),
            Box::new(MultiSelectValidator),
        ])
    }
}

impl ValidationOrchestrator {
    pub fn new(validators: Vec<Box<dyn TypeValidator>>) -> Self {
        Self { validators }
    }

    pub fn validators(&self) -> impl Iterator<Item = &dyn TypeValidator> {
        self.validators.iter().map(Box::as_ref)
    }

    /// Re-runs only the validators of `question`, as done after every change of one of its slots.
    pub fn validate_question(
        &self,
        registry: &QuestionRegistry,
        store: &mut AnswerStore,
        question: QuestionId,
    ) -> Vec<QuestionReport> {
        let Some(config) = registry.get(question) else {
            return Vec::new();
        };
        self.validators
            .iter()
            .filter(|validator| validator.applies_to(config))
            .map(|validator| run(validator.as_ref(), config, store))
            .collect()
    }

    /// Validates every question. Each validator runs over the whole form even when an earlier one
    /// already failed; the form passes only if nothing blocks.
    pub fn validate_all(
        &self,
        registry: &QuestionRegistry,
        store: &mut AnswerStore,
    ) -> FormValidation {
        let mut reports = Vec::new();
        let mut messages = Vec::new();

        for validator in &self.validators {
            let start = reports.len();
            for config in registry.iter().filter(|config| validator.applies_to(config)) {
                reports.push(run(validator.as_ref(), config, store));
            }
            let blocked = reports[start..]
                .iter()
                .filter(|report| report.blocks())
                .collect::<Vec<_>>();
            if !blocked.is_empty() {
                debug!(validator = %validator.kind(), blocked = blocked.len(), "validator blocked");
            }
            messages.extend(validator.summarize(&blocked));
        }

        let valid = !reports.iter().any(QuestionReport::blocks);
        let snapshot = valid.then(|| AnswerSnapshot::capture(registry, store));
        info!(valid, messages = messages.len(), "form validated");

        FormValidation {
            verdict: ValidationVerdict { valid, messages },
            reports,
            snapshot,
        }
    }
}

fn run(
    validator: &dyn TypeValidator,
    config: &QuestionConfig,
    store: &mut AnswerStore,
) -> QuestionReport {
    let report = validator.check(config, store);
    apply_fills(&report, store);
    report
}

fn apply_fills(report: &QuestionReport, store: &mut AnswerStore) {
    for slot in report.groups.iter().flat_map(|group| group.fills.iter()) {
        if let Err(err) = store.set(*slot, Answer::number(0)) {
            warn!(%slot, error = %err, "could not zero-fill slot");
        }
    }
}
