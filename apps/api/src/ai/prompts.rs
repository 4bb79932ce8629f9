pub const IMPROVE_SECTION_PROMPT: &str = "\
Rewrite the following resume {section_type} section so it is concise, \
uses strong action verbs and keeps every fact unchanged.

SECTION:
{text}";

pub const SUGGEST_SKILLS_PROMPT: &str = "\
Read the job description below and list the skills a candidate should \
highlight on their resume. Return a JSON array of at most {max_skills} short \
skill names, most important first.

JOB DESCRIPTION:
{job_description}";

pub const SUMMARY_PROMPT: &str = "\
Write a three-sentence professional summary for the candidate whose resume \
fields are listed below as `field: value` lines.

RESUME FIELDS:
{fields}";

pub const RECOMMEND_VERSION_PROMPT: &str = "\
A candidate is applying to {target_company} for a {target_category} role. \
Choose which of their resume versions below is the best fit.

Category guidance:
- {guidance}

CANDIDATE VERSIONS (JSON):
{candidates}

Return a JSON object with these fields:
- recommendedCandidateKey: the `key` of the chosen version. If unsure, use \"{fallback_key}\".
- fitScore: integer 0-100.
- reasoning: two sentences on why this version fits.
- categoryRecommendations: up to 5 improvements for the {target_category} category.
- companySpecificRecommendations: up to 3 tailoring tips for {target_company}.
- missingResumeContent: up to 3 things the resume lacks.";
