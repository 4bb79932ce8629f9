//! AI suggestions — section rewrites, skill extraction, summaries and the
//! best-version recommendation.
//!
//! The model is an opaque collaborator reached through `LlmClient`. Local
//! logic is prompt assembly, cleanup of what comes back, and the
//! recommendation heuristic in [`recommend`].

pub mod categories;
pub mod handlers;
pub mod prompts;
pub mod recommend;

use std::collections::HashSet;

use serde_json::Value;

use crate::ai::prompts::{IMPROVE_SECTION_PROMPT, SUGGEST_SKILLS_PROMPT, SUMMARY_PROMPT};
use crate::errors::AppError;
use crate::history::flatten::flatten_resume_fields;
use crate::history::normalize::normalize_text;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, RESUME_WRITER_SYSTEM};
use crate::llm_client::LlmClient;

pub const MAX_SKILLS: usize = 10;
/// Upper bound on resume text sent with a summary prompt.
pub const MAX_SUMMARY_INPUT_CHARS: usize = 4000;

pub async fn improve_section(
    llm: &LlmClient,
    text: &str,
    section_type: &str,
) -> Result<String, AppError> {
    let prompt = IMPROVE_SECTION_PROMPT
        .replace("{section_type}", section_type)
        .replace("{text}", &normalize_text(text));
    let improved = llm
        .complete(&prompt, RESUME_WRITER_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Section rewrite failed: {e}")))?;
    Ok(improved.trim().to_string())
}

pub async fn suggest_skills(llm: &LlmClient, job_description: &str) -> Result<Vec<String>, AppError> {
    let prompt = SUGGEST_SKILLS_PROMPT
        .replace("{max_skills}", &MAX_SKILLS.to_string())
        .replace("{job_description}", job_description);
    let raw: Vec<String> = llm
        .complete_json(&prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Skill suggestion failed: {e}")))?;
    Ok(clean_skill_list(raw))
}

pub async fn generate_summary(llm: &LlmClient, content: &Value) -> Result<String, AppError> {
    let fields = render_field_lines(content, MAX_SUMMARY_INPUT_CHARS);
    if fields.is_empty() {
        return Err(AppError::Validation(
            "resume content has no fields to summarize".to_string(),
        ));
    }
    let prompt = SUMMARY_PROMPT.replace("{fields}", &fields);
    let summary = llm
        .complete(&prompt, RESUME_WRITER_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Summary generation failed: {e}")))?;
    Ok(summary.trim().to_string())
}

/// Trims, drops blanks and case-insensitive duplicates, caps at [`MAX_SKILLS`].
pub fn clean_skill_list(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .take(MAX_SKILLS)
        .collect()
}

/// Flattens a snapshot into `field: value` lines, stopping before the
/// output would exceed `max_chars`.
pub fn render_field_lines(content: &Value, max_chars: usize) -> String {
    let mut out = String::new();
    for (field, value) in flatten_resume_fields(content) {
        let line = format!("{field}: {value}\n");
        if out.len() + line.len() > max_chars {
            break;
        }
        out.push_str(&line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_skill_list_dedupes_and_caps() {
        let raw = vec![" Rust ", "rust", "", "Go", "SQL"]
            .into_iter()
            .map(String::from)
            .chain((0..20).map(|i| format!("skill-{i}")))
            .collect();
        let cleaned = clean_skill_list(raw);
        assert_eq!(&cleaned[..3], &["Rust", "Go", "SQL"]);
        assert_eq!(cleaned.len(), MAX_SKILLS);
    }

    #[test]
    fn test_render_field_lines_uses_flattened_paths() {
        let content = json!({
            "sections": [
                {"id": "personal", "type": "personal", "content": {"name": "Alex"}},
                {"id": "summary", "type": "text", "content": "<p>Builds <b>APIs</b></p>"}
            ]
        });
        assert_eq!(
            render_field_lines(&content, 1000),
            "personal.name: Alex\nsummary: Builds APIs\n"
        );
    }

    #[test]
    fn test_render_field_lines_respects_budget() {
        let content = json!({"a": "x".repeat(50), "b": "y"});
        let rendered = render_field_lines(&content, 20);
        assert!(rendered.is_empty());
        assert_eq!(render_field_lines(&json!({"b": "y"}), 20), "b: y\n");
    }
}
