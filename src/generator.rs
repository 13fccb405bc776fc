//! Name-generation orchestration
//!
//! Decides which tier produces the identifier: the model tier is tried
//! first whenever a provider can be constructed, and the deterministic
//! engine takes over on any model failure when the config allows it.
//! PR titles are model-only.

use crate::fallback::FallbackGenerator;
use crate::provider::{create_provider, ChatRequest};
use crate::{
    prompts, slug, Error, GeneratedIdentifier, GenerationConfig, Result, TicketAnalysis,
    TicketContext,
};
use log::{debug, warn};

/// Character budget for the joined commit log fed to the PR-title call.
const MAX_COMMIT_CONTEXT_CHARS: usize = 2000;

/// Two-tier branch name and PR title generator.
pub struct NameGenerator {
    config: GenerationConfig,
    fallback: FallbackGenerator,
}

impl NameGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self> {
        for temp in [config.temperature, config.summary_temperature] {
            if !(0.0..=1.0).contains(&temp) {
                return Err(Error::InvalidTemperature { temp });
            }
        }

        Ok(Self {
            fallback: FallbackGenerator::new()?,
            config,
        })
    }

    /// Generate a branch name for the ticket.
    ///
    /// Tries the model tier, then the deterministic engine when
    /// `allow_fallback` is set. Output satisfies the 50-character and
    /// git-ref character-set invariants.
    pub async fn generate(&self, ticket: &TicketContext, prefix: Option<&str>) -> Result<String> {
        if ticket.summary.trim().is_empty() {
            return Err(Error::EmptySummary);
        }

        match self.model_suffix(ticket).await {
            Ok(suffix) => {
                debug!("model tier produced suffix '{}'", suffix);
                let composed = compose(&ticket.id, &suffix, prefix);
                Ok(finalize(&composed, &ticket.id))
            }
            Err(err) if self.config.allow_fallback && err.is_provider_failure() => {
                warn!("model tier failed ({}), using deterministic fallback", err);
                Ok(self.fallback.generate(
                    &ticket.id,
                    &ticket.summary,
                    ticket.description.as_deref(),
                    prefix,
                ))
            }
            Err(err) if err.is_provider_failure() => Err(Error::BranchGeneration {
                message: err.to_string(),
            }),
            // Configuration and validation errors surface unwrapped
            Err(err) => Err(err),
        }
    }

    /// Generate a branch name along with the model's structured analysis.
    ///
    /// The model's suggested name is used verbatim rather than recomposed.
    /// The fallback path carries no analysis.
    pub async fn generate_with_analysis(
        &self,
        ticket: &TicketContext,
        prefix: Option<&str>,
    ) -> Result<GeneratedIdentifier> {
        if ticket.summary.trim().is_empty() {
            return Err(Error::EmptySummary);
        }

        match self.model_analysis(ticket).await {
            Ok((suggested, analysis)) => {
                let composed = apply_prefix(&suggested, prefix);
                Ok(GeneratedIdentifier {
                    slug: finalize(&composed, &ticket.id),
                    analysis: Some(analysis),
                })
            }
            Err(err) if self.config.allow_fallback && err.is_provider_failure() => {
                warn!("analysis call failed ({}), using deterministic fallback", err);
                let slug = self.fallback.generate(
                    &ticket.id,
                    &ticket.summary,
                    ticket.description.as_deref(),
                    prefix,
                );
                Ok(GeneratedIdentifier {
                    slug,
                    analysis: None,
                })
            }
            Err(err) if err.is_provider_failure() => Err(Error::BranchGeneration {
                message: err.to_string(),
            }),
            Err(err) => Err(err),
        }
    }

    /// Generate a PR title from commit subject lines, oldest first.
    ///
    /// Model-only: there is no deterministic tier for titles, so any
    /// provider failure is fatal to the caller.
    pub async fn generate_pr_title(&self, commit_messages: &[String]) -> Result<String> {
        if commit_messages.iter().all(|m| m.trim().is_empty()) {
            return Err(Error::NoCommitMessages);
        }

        let joined = truncate_commit_context(&commit_messages.join("\n"));

        let provider =
            create_provider(&self.config).map_err(|err| Error::PrTitleGeneration {
                message: err.to_string(),
            })?;
        let request = ChatRequest {
            messages: prompts::pr_title_messages(&joined),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        match provider.create_chat_completion(&request).await {
            Ok(completion) => Ok(completion.content.trim().to_string()),
            Err(err) => Err(Error::PrTitleGeneration {
                message: err.to_string(),
            }),
        }
    }

    /// Ask the model tier for a short hyphenated suffix.
    async fn model_suffix(&self, ticket: &TicketContext) -> Result<String> {
        let provider = create_provider(&self.config)?;
        let request = ChatRequest {
            messages: prompts::summary_messages(ticket),
            temperature: self.config.summary_temperature,
            max_tokens: self.config.summary_max_tokens,
        };

        let completion = provider.create_chat_completion(&request).await?;
        Ok(completion.content.trim().to_string())
    }

    /// Ask the model tier for the structured analysis and suggested name.
    async fn model_analysis(&self, ticket: &TicketContext) -> Result<(String, TicketAnalysis)> {
        let provider = create_provider(&self.config)?;
        let request = ChatRequest {
            messages: prompts::analysis_messages(ticket),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let completion = provider.create_chat_completion(&request).await?;
        let response: prompts::AnalysisResponse =
            serde_json::from_str(completion.content.trim())?;

        let analysis = TicketAnalysis {
            primary_action: response.primary_action,
            technical_context: response.technical_context,
            business_context: response.business_context,
            reasoning: response.reasoning,
        };
        Ok((response.suggested_branch_name, analysis))
    }
}

fn compose(ticket_id: &str, suffix: &str, prefix: Option<&str>) -> String {
    apply_prefix(&format!("{}-{}", ticket_id, suffix), prefix)
}

fn apply_prefix(slug: &str, prefix: Option<&str>) -> String {
    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}/{}", prefix, slug),
        None => slug.to_string(),
    }
}

fn finalize(slug: &str, ticket_id: &str) -> String {
    slug::sanitize(&slug::enforce_length(slug, ticket_id))
}

/// Bound the joined commit log, marking the cut with an ellipsis.
fn truncate_commit_context(joined: &str) -> String {
    if joined.chars().count() <= MAX_COMMIT_CONTEXT_CHARS {
        return joined.to_string();
    }
    let truncated: String = joined.chars().take(MAX_COMMIT_CONTEXT_CHARS).collect();
    format!("{}...", truncated)
}
