// Cross-cutting prompt fragments shared by every LLM-backed feature.
// Feature-specific prompts live in a prompts.rs next to the feature.

/// Instruction appended to system prompts that expect a JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
