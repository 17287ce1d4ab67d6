#![allow(dead_code)]

// Cross-cutting prompt fragments. Each module that calls the LLM defines its
// own prompts.rs alongside it and composes these where needed.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies. \
    Do NOT add comments or trailing commas.";
