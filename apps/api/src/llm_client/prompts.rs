#![allow(dead_code)]

// Shared prompt constants and prompt-building utilities.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt fragment for artifact features that render markdown.
pub const MARKDOWN_ONLY_SYSTEM: &str = "Respond in clean GitHub-flavored markdown. \
    Do NOT wrap the document in code fences. \
    Do NOT include preamble like 'Here is your document' — start with the content itself.";
