//! Prompt construction for the three model calls

use crate::provider::ChatMessage;
use crate::TicketContext;
use serde::Deserialize;

const ANALYSIS_SYSTEM_PROMPT: &str = "You are an expert software engineer who creates concise, \
meaningful git branch names from issue-tracker tickets. Analyze the ticket and respond with ONLY \
a JSON object of this exact shape, no markdown fences and no commentary:\n\
{\"primaryAction\": \"...\", \"technicalContext\": [\"...\"], \"businessContext\": [\"...\"], \
\"suggestedBranchName\": \"...\", \"reasoning\": \"...\"}";

const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert software engineer who summarizes tickets \
into git branch name suffixes. Respond with ONLY a 2-4 word, lowercase, hyphen-separated suffix. \
No ticket id, no quotes, no explanation.";

const PR_TITLE_SYSTEM_PROMPT: &str = "You are an expert software engineer who writes pull request \
titles. Given the commit messages of a branch, respond with ONLY a short plain-English title \
summarizing the overall change. Use only letters, digits, and spaces: no backticks, quotes, \
colons, hashes, brackets, or any other punctuation or special characters.";

/// The fixed JSON shape the analysis call must return.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub primary_action: String,
    #[serde(default)]
    pub technical_context: Vec<String>,
    #[serde(default)]
    pub business_context: Vec<String>,
    pub suggested_branch_name: String,
    #[serde(default)]
    pub reasoning: String,
}

/// Messages for the structured analysis call.
pub fn analysis_messages(ticket: &TicketContext) -> Vec<ChatMessage> {
    let user = format!(
        "Ticket ID: {}\nSummary: {}\nDescription: {}\n\n\
         Constraints for suggestedBranchName:\n\
         - at most 40 characters\n\
         - lowercase words joined by hyphens\n\
         - starts with the ticket id exactly as given: {}\n\
         - no spaces or special characters",
        ticket.id,
        ticket.summary,
        ticket.description.as_deref().unwrap_or("(none)"),
        ticket.id,
    );

    vec![
        ChatMessage::system(ANALYSIS_SYSTEM_PROMPT),
        ChatMessage::user(user),
    ]
}

/// Messages for the short branch-suffix call.
pub fn summary_messages(ticket: &TicketContext) -> Vec<ChatMessage> {
    let user = match ticket.description.as_deref() {
        Some(description) => format!(
            "Summary: {}\nDescription: {}",
            ticket.summary, description
        ),
        None => format!("Summary: {}", ticket.summary),
    };

    vec![
        ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
        ChatMessage::user(user),
    ]
}

/// Messages for the PR-title call over a joined commit log.
pub fn pr_title_messages(commit_messages: &str) -> Vec<ChatMessage> {
    let user = format!("Commit messages, oldest first:\n{}", commit_messages);

    vec![
        ChatMessage::system(PR_TITLE_SYSTEM_PROMPT),
        ChatMessage::user(user),
    ]
}
