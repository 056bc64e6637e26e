//! Wiring from configuration to a ready generator, and command dispatch.

use crate::args::Command;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::worksheet::{default_title, Worksheet};
use serde::Serialize;
use spellkit_core::{CategoryId, GradeLevel, SpellError};
use spellkit_engine::{Dictionary, HttpCorpusSource, WorksheetGenerator};
use spellkit_guard::{Availability, FileStore, GuardStatus, Guardrail, SystemClock};
use spellkit_llm::{GeminiClient, GeminiProvider, GenerationProvider};
use std::sync::Arc;

pub struct App {
    generator: WorksheetGenerator,
}

/// Guardrail state as printed by `spellkit status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub availability: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<u64>,
    pub count_today: u32,
    pub limit: u32,
}

impl From<GuardStatus> for StatusReport {
    fn from(status: GuardStatus) -> Self {
        let (availability, remaining_secs) = match status.availability {
            Availability::Available => ("available", None),
            Availability::CoolingDown { remaining } => {
                ("cooling_down", Some(remaining.as_secs().max(1)))
            }
            Availability::Blocked => ("blocked", None),
        };
        Self {
            availability,
            remaining_secs,
            count_today: status.count_today,
            limit: status.limit,
        }
    }
}

impl App {
    pub fn new(generator: WorksheetGenerator) -> Self {
        Self { generator }
    }

    /// Build the production stack: Gemini provider, file-backed guardrail
    /// under `state_dir`, HTTP dictionary corpus.
    pub fn from_config(config: &CliConfig) -> Result<Self, CliError> {
        let api_key = config.api_key()?;
        let mut client = GeminiClient::new(api_key, config.provider_timeout())
            .map_err(SpellError::from)?;
        if let Some(base_url) = &config.provider.base_url {
            client = client.with_base_url(base_url.clone());
        }
        let provider: Arc<dyn GenerationProvider> =
            Arc::new(GeminiProvider::new(client, config.provider.model.clone()));

        std::fs::create_dir_all(&config.state_dir)?;
        let guardrail = Guardrail::new(
            config.guardrail.clone(),
            Arc::new(FileStore::new(config.state_dir.clone())),
            Arc::new(SystemClock),
        )?;

        let corpus = HttpCorpusSource::new(config.dictionary.url.clone(), config.dictionary_timeout())
            .map_err(SpellError::from)?;

        let generator = WorksheetGenerator::new(
            provider,
            Arc::new(guardrail),
            Arc::new(Dictionary::new(Arc::new(corpus))),
        )
        .with_config(config.engine.clone());

        tracing::info!(
            model = %config.provider.model,
            state_dir = %config.state_dir.display(),
            "Generator ready"
        );
        Ok(Self::new(generator))
    }

    pub fn generator(&self) -> &WorksheetGenerator {
        &self.generator
    }

    /// Run one command and return what should be printed on stdout.
    pub async fn run(&self, command: Command) -> Result<String, CliError> {
        match command {
            Command::Worksheet {
                grade,
                categories,
                title,
                size,
                story,
            } => {
                let sheet = self.worksheet(grade, &categories, title, size, story).await?;
                Ok(sheet.to_json()?)
            }
            Command::Hint {
                target,
                attempt,
                category,
                grade,
            } => Ok(self
                .generator
                .spelling_hint(&target, &attempt, category, grade)
                .await),
            Command::Status => {
                let report = StatusReport::from(self.generator.guardrail().status().await);
                Ok(serde_json::to_string_pretty(&report)?)
            }
            Command::Reset => {
                self.generator.guardrail().reset().await?;
                Ok("Usage counters and cached responses cleared.".to_string())
            }
        }
    }

    pub async fn worksheet(
        &self,
        grade: GradeLevel,
        categories: &[CategoryId],
        title: Option<String>,
        size: Option<usize>,
        with_story: bool,
    ) -> Result<Worksheet, CliError> {
        let target = size.unwrap_or(self.generator.config().target_size);
        let words = self
            .generator
            .generate_word_set_sized(categories, grade, target)
            .await?;
        let exercises = self.generator.generate_exercises(&words, grade).await;
        let story = if with_story {
            Some(self.generator.generate_story(&words, grade).await)
        } else {
            None
        };

        let title =
            title.unwrap_or_else(|| default_title(grade, categories, self.generator.catalog()));
        let mut sheet = Worksheet::new(title, grade, categories.to_vec(), words, exercises)
            .with_rules(self.generator.catalog());
        if let Some(story) = story {
            sheet = sheet.with_story(story);
        }

        tracing::info!(
            worksheet_id = %sheet.id,
            grade = %grade,
            words = sheet.words.len(),
            analysis = sheet.exercises.analysis.len(),
            transfer = sheet.exercises.transfer.len(),
            model_calls = self.generator.usage().calls(),
            "Worksheet assembled"
        );
        Ok(sheet)
    }
}
