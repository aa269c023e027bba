// Shared prompt fragments. Feature modules keep their own prompts.rs
// and pull these in where needed.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps the model from inventing resume content.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Use only facts present in the candidate profile. \
    Do NOT invent employers, degrees, dates, skills or metrics. \
    You may reword, reorder and omit content to fit the job description.";
