// Shared prompt fragments.
// Each feature that builds prompts keeps its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// Instruction that enforces a bare JSON reply.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON. \
    Do NOT use markdown, code fences or backticks. \
    Do NOT include any explanation before or after the JSON object.";
