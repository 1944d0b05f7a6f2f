use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answer::Answer;
use crate::error::{DefinitionError, StoreError};
use crate::ids::{RecipientKey, RespondentSlot};
use crate::question::QuestionConfig;
use crate::registry::QuestionRegistry;
use crate::store::AnswerStore;

/// Top-level feedback submission form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormDefinition {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<QuestionConfig>,
}

impl FormDefinition {
    pub fn from_json_str(raw: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, DefinitionError> {
        Ok(toml::from_str(raw)?)
    }

    /// Loads a definition, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let raw = read(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&raw),
            Some("toml") => Self::from_toml_str(&raw),
            other => Err(DefinitionError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    pub fn registry(&self) -> Result<QuestionRegistry, DefinitionError> {
        Ok(QuestionRegistry::new(self.questions.iter().cloned())?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEntry {
    #[serde(flatten)]
    pub slot: RespondentSlot,
    pub value: Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientEntry {
    #[serde(flatten)]
    pub key: RecipientKey,
    #[serde(default)]
    pub value: Option<String>,
}

/// Persisted or captured answers used to seed an [`AnswerStore`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnswerDocument {
    #[serde(default)]
    pub answers: Vec<AnswerEntry>,
    #[serde(default)]
    pub recipients: Vec<RecipientEntry>,
    #[serde(default)]
    pub other_texts: Vec<RecipientEntry>,
    #[serde(default)]
    pub response_ids: Vec<RecipientEntry>,
}

impl AnswerDocument {
    pub fn from_json_str(raw: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        Self::from_json_str(&read(path)?)
    }

    /// Writes every entry into `store`, rejecting answers whose shape does not fit their question.
    pub fn apply_to(
        &self,
        registry: &QuestionRegistry,
        store: &mut AnswerStore,
    ) -> Result<(), StoreError> {
        for entry in &self.answers {
            registry.check_answer(&entry.slot, &entry.value)?;
            store.set(entry.slot, entry.value.clone())?;
        }
        for entry in &self.recipients {
            store.set_recipient(entry.key, entry.value.clone())?;
        }
        for entry in &self.other_texts {
            store.set_other_text(entry.key, entry.value.clone().unwrap_or_default())?;
        }
        for entry in &self.response_ids {
            store.set_response_id(entry.key, entry.value.clone())?;
        }
        Ok(())
    }
}

fn read(path: &Path) -> Result<String, DefinitionError> {
    fs::read_to_string(path).map_err(|source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    })
}
