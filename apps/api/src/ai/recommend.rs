//! Best-version recommendation for a target company and category.
//!
//! Every stored version of the caller's resumes is a candidate. A local
//! keyword + recency heuristic always produces an answer; when an LLM is
//! configured its pick overrides the heuristic, provided it names one of
//! the candidates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::ai::categories::{resolve_category, CategoryProfile, DEFAULT_CATEGORY};
use crate::ai::prompts::RECOMMEND_VERSION_PROMPT;
use crate::errors::AppError;
use crate::history::flatten::flatten_resume_fields;
use crate::history::normalize::normalize_text;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::models::resume::{ResumeSummaryRow, ResumeVersionRow};

pub const MAX_EXCERPT_CHARS: usize = 1800;
/// Candidates forwarded to the model, best heuristic scores first.
pub const MAX_PROMPT_CANDIDATES: usize = 12;
pub const MIN_FIT_SCORE: u8 = 45;
pub const MAX_FIT_SCORE: u8 = 96;

const EXCERPT_JOINER: &str = " • ";
const COMPANY_TOKEN_WEIGHT: f64 = 3.0;
const CATEGORY_MATCH_WEIGHT: f64 = 4.0;
const KEYWORD_WEIGHT: f64 = 1.25;
/// Recency boost for the newest candidate, fading to zero over 60 days.
const MAX_RECENCY_BOOST: f64 = 2.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(skip)]
    pub key: String,
    pub resume_id: Uuid,
    pub resume_title: String,
    pub resume_category: String,
    pub version_id: Option<Uuid>,
    pub version_label: String,
    pub created_at: DateTime<Utc>,
    pub excerpt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub target_company: String,
    pub target_category: String,
    pub recommended: Candidate,
    pub fit_score: u8,
    pub reasoning: String,
    pub category_recommendations: Vec<String>,
    pub company_specific_recommendations: Vec<String>,
    pub missing_resume_content: Vec<String>,
    pub considered_candidates: usize,
    pub used_model: bool,
}

/// What the model is asked to return. Every field is optional; gaps are
/// filled from the heuristic.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelRecommendation {
    pub recommended_candidate_key: Option<String>,
    pub fit_score: Option<f64>,
    pub reasoning: Option<String>,
    pub category_recommendations: Vec<String>,
    pub company_specific_recommendations: Vec<String>,
    pub missing_resume_content: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicPick {
    pub index: usize,
    pub score: f64,
    pub fit_score: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptCandidate<'a> {
    key: &'a str,
    resume_title: &'a str,
    resume_category: &'a str,
    version_label: &'a str,
    excerpt: &'a str,
}

/// Plain-text preview of a snapshot: flattened field values joined with
/// `" • "`, cut at [`MAX_EXCERPT_CHARS`]. Content that is not JSON is
/// treated as one text fragment.
pub fn build_content_preview(content: &str) -> String {
    let merged = match serde_json::from_str::<Value>(content) {
        Ok(tree @ (Value::Object(_) | Value::Array(_))) => flatten_resume_fields(&tree)
            .into_values()
            .collect::<Vec<_>>()
            .join(EXCERPT_JOINER),
        _ => normalize_text(content),
    };
    let merged = merged.trim();

    if merged.chars().count() <= MAX_EXCERPT_CHARS {
        return merged.to_string();
    }
    let mut cut: String = merged.chars().take(MAX_EXCERPT_CHARS).collect();
    cut.push_str("...");
    cut
}

/// One candidate per stored version of `resume`.
pub fn build_candidates(resume: &ResumeSummaryRow, versions: &[ResumeVersionRow]) -> Vec<Candidate> {
    let category = resume
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_CATEGORY);

    versions
        .iter()
        .map(|v| Candidate {
            key: v.id.to_string(),
            resume_id: resume.id,
            resume_title: resume.title.clone(),
            resume_category: category.to_string(),
            version_id: Some(v.id),
            version_label: format!("Version {}", v.version),
            created_at: v.created_at,
            excerpt: build_content_preview(&v.content),
        })
        .collect()
}

/// Lower-cased tokens of at least three characters, split on anything
/// outside `[a-z0-9+.#]`.
fn company_tokens(company: &str) -> Vec<String> {
    company
        .trim()
        .to_lowercase()
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit() || "+.#".contains(c)))
        .filter(|t| t.chars().count() >= 3)
        .map(str::to_string)
        .collect()
}

pub fn candidate_score(
    candidate: &Candidate,
    company: &str,
    category: &CategoryProfile,
    newest: DateTime<Utc>,
) -> f64 {
    let haystack = format!(
        "{} {} {}",
        candidate.resume_title, candidate.resume_category, candidate.excerpt
    )
    .trim()
    .to_lowercase();

    let mut score = 0.0;
    for token in company_tokens(company) {
        if haystack.contains(&token) {
            score += COMPANY_TOKEN_WEIGHT;
        }
    }
    if candidate.resume_category.trim().to_lowercase() == category.name.to_lowercase() {
        score += CATEGORY_MATCH_WEIGHT;
    }
    for keyword in category.keywords {
        if haystack.contains(keyword) {
            score += KEYWORD_WEIGHT;
        }
    }

    let age_days = ((newest - candidate.created_at).num_seconds() as f64 / 86_400.0).max(0.0);
    score + (MAX_RECENCY_BOOST - age_days / 30.0).max(0.0)
}

/// Candidate indices with their scores, best first. Equal scores keep
/// input order.
pub fn rank_candidates(
    candidates: &[Candidate],
    company: &str,
    category: &CategoryProfile,
) -> Vec<(usize, f64)> {
    let Some(newest) = candidates.iter().map(|c| c.created_at).max() else {
        return Vec::new();
    };

    let mut ranked: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (i, candidate_score(c, company, category, newest)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Maps a heuristic score to a percentage in `MIN_FIT_SCORE..=MAX_FIT_SCORE`.
/// A zero score counts as one.
pub fn fit_score(score: f64) -> u8 {
    let score = if score == 0.0 { 1.0 } else { score };
    (58.0 + score * 4.0)
        .round()
        .clamp(f64::from(MIN_FIT_SCORE), f64::from(MAX_FIT_SCORE)) as u8
}

pub fn heuristic_pick(
    candidates: &[Candidate],
    company: &str,
    category: &CategoryProfile,
) -> Option<HeuristicPick> {
    let &(index, score) = rank_candidates(candidates, company, category).first()?;
    Some(HeuristicPick {
        index,
        score,
        fit_score: fit_score(score),
    })
}

fn default_company_recommendations(company: &str) -> Vec<String> {
    vec![
        format!("Mirror {company}'s job description keywords in your top experience bullets."),
        "Move the most relevant project closer to the top of your resume.".to_string(),
        "Add one outcome metric per key bullet to improve recruiter confidence.".to_string(),
    ]
}

fn default_missing_content() -> Vec<String> {
    vec![
        "Quantified impact metrics (latency, conversion, cost, uptime).".to_string(),
        "Tech stack depth for each major project or role.".to_string(),
        "Clear ownership statements for high-impact initiatives.".to_string(),
    ]
}

fn non_empty_or(items: Vec<String>, fallback: impl FnOnce() -> Vec<String>) -> Vec<String> {
    let items: Vec<String> = items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        fallback()
    } else {
        items
    }
}

/// Combines the heuristic pick with an optional model answer. A model
/// answer naming an unknown candidate is ignored as a whole.
pub fn merge_recommendation(
    candidates: &[Candidate],
    company: &str,
    category: &CategoryProfile,
    heuristic: &HeuristicPick,
    model: Option<ModelRecommendation>,
) -> Recommendation {
    let model = model.and_then(|m| {
        let index = candidates
            .iter()
            .position(|c| Some(c.key.as_str()) == m.recommended_candidate_key.as_deref())?;
        Some((index, m))
    });

    let guidance = || -> Vec<String> { category.guidance.iter().map(|g| g.to_string()).collect() };
    let used_model = model.is_some();

    let (index, fit, reasoning, category_recs, company_recs, missing) = match model {
        Some((index, m)) => {
            let fit = m
                .fit_score
                .filter(|s| s.is_finite() && *s > 0.0)
                .map(|s| s.round().clamp(1.0, 100.0) as u8)
                .unwrap_or(heuristic.fit_score);
            (
                index,
                fit,
                m.reasoning.filter(|r| !r.trim().is_empty()),
                m.category_recommendations,
                m.company_specific_recommendations,
                m.missing_resume_content,
            )
        }
        None => (
            heuristic.index,
            heuristic.fit_score,
            None,
            Vec::new(),
            Vec::new(),
            Vec::new(),
        ),
    };

    let chosen = &candidates[index];
    let reasoning = reasoning.unwrap_or_else(|| {
        format!(
            "Selected {} from {} because it aligns best with {company} and the {} category signals in your existing content.",
            chosen.version_label, chosen.resume_title, category.name
        )
    });

    Recommendation {
        target_company: company.to_string(),
        target_category: category.name.to_string(),
        recommended: chosen.clone(),
        fit_score: fit,
        reasoning,
        category_recommendations: non_empty_or(category_recs, guidance),
        company_specific_recommendations: non_empty_or(company_recs, || {
            default_company_recommendations(company)
        }),
        missing_resume_content: non_empty_or(missing, default_missing_content),
        considered_candidates: candidates.len(),
        used_model,
    }
}

async fn ask_model(
    llm: &LlmClient,
    candidates: &[Candidate],
    ranked: &[(usize, f64)],
    company: &str,
    category: &CategoryProfile,
    fallback_key: &str,
) -> Option<ModelRecommendation> {
    let shortlist: Vec<PromptCandidate<'_>> = ranked
        .iter()
        .take(MAX_PROMPT_CANDIDATES)
        .map(|&(i, _)| {
            let c = &candidates[i];
            PromptCandidate {
                key: &c.key,
                resume_title: &c.resume_title,
                resume_category: &c.resume_category,
                version_label: &c.version_label,
                excerpt: &c.excerpt,
            }
        })
        .collect();

    let candidates_json = serde_json::to_string_pretty(&shortlist).ok()?;
    let prompt = RECOMMEND_VERSION_PROMPT
        .replace("{target_company}", company)
        .replace("{target_category}", category.name)
        .replace("{guidance}", &category.guidance.join("\n- "))
        .replace("{fallback_key}", fallback_key)
        .replace("{candidates}", &candidates_json);

    match llm.complete_json::<ModelRecommendation>(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(answer) => Some(answer),
        Err(e) => {
            warn!("Recommendation model call failed, using heuristic: {e}");
            None
        }
    }
}

/// Picks the best version among `candidates`. Model failures fall back to
/// the heuristic; only an empty candidate list is an error.
pub async fn recommend_best_version(
    llm: Option<&LlmClient>,
    candidates: &[Candidate],
    company: &str,
    category: Option<&str>,
) -> Result<Recommendation, AppError> {
    let category = resolve_category(category);
    let ranked = rank_candidates(candidates, company, category);
    let &(index, score) = ranked.first().ok_or_else(|| {
        AppError::Validation("No resume versions available to recommend from".to_string())
    })?;
    let heuristic = HeuristicPick {
        index,
        score,
        fit_score: fit_score(score),
    };
    debug!(
        "Heuristic pick for {company}: candidate {} of {} (score {score:.2})",
        index + 1,
        candidates.len()
    );

    let model = match llm {
        Some(llm) => {
            ask_model(llm, candidates, &ranked, company, category, &candidates[index].key).await
        }
        None => None,
    };

    Ok(merge_recommendation(candidates, company, category, &heuristic, model))
}
