use std::path::Path;

use anyhow::{Context, Result};
use form_spec::{AnswerDocument, AnswerStore, FormDefinition, QuestionRegistry};
use tracing::debug;

pub mod check;
pub mod payload;
pub mod schema;
pub mod validate;

pub(crate) struct LoadedForm {
    pub definition: FormDefinition,
    pub registry: QuestionRegistry,
    pub store: AnswerStore,
}

/// Loads a definition and, when given, seeds the store from an answer file.
pub(crate) fn load_form(form: &Path, answers: Option<&Path>) -> Result<LoadedForm> {
    let definition = FormDefinition::load(form)
        .with_context(|| format!("failed to load form definition {}", form.display()))?;
    let registry = definition
        .registry()
        .with_context(|| format!("invalid form definition {}", form.display()))?;
    let mut store = AnswerStore::new(&registry);
    if let Some(path) = answers {
        let document = AnswerDocument::load(path)
            .with_context(|| format!("failed to load answers {}", path.display()))?;
        document
            .apply_to(&registry, &mut store)
            .with_context(|| format!("answers in {} do not fit the form", path.display()))?;
        debug!(
            answers = document.answers.len(),
            recipients = document.recipients.len(),
            "answers applied"
        );
    }
    Ok(LoadedForm {
        definition,
        registry,
        store,
    })
}
