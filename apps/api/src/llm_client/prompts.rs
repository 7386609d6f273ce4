// Shared prompt fragments. Each report defines its own templates in
// reports/prompts.rs; this file holds the cross-cutting pieces.

/// Instruction that forces JSON-only output. The completion API takes a
/// single user-role message, so this rides at the top of every prompt.
pub const STRICT_JSON_INSTRUCTION: &str = "You are a precise recruiting analytics assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
