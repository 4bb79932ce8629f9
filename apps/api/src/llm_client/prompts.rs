// Cross-cutting prompt fragments. Feature prompts live next to their feature.

/// System prompt for endpoints that must answer with JSON only.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences.";

/// System prompt for endpoints that return resume prose.
pub const RESUME_WRITER_SYSTEM: &str = "You are an experienced resume editor. \
    Reply with the rewritten text only: no preamble, no quotes, no markdown headings. \
    Never invent employers, dates, degrees or metrics that are not in the input.";
