// Shared prompt fragments.
// Each agent node that needs an LLM call takes its own templates from agent::prompts.
// This file contains cross-cutting fragments reused by several nodes.

/// Appended to prompts whose reply is parsed as a bare token (classifier, validator).
pub const TOKEN_ONLY_INSTRUCTION: &str = "\
    Reply with the requested token only. \
    Do NOT add explanations, punctuation, quotes or markdown.";

/// The five fixed guidelines every generated answer must follow.
pub const RESPONSE_GUIDELINES: &str = "\
Response guidelines:
1. Be precise and objective
2. Use specific information from the CV whenever it is available
3. If there is not enough information, say so clearly
4. Keep a professional but approachable tone
5. Structure the answer clearly";

/// Instruction shared by the extraction tools: structured output from the CV text only.
pub const EXTRACTION_GROUNDING: &str = "\
    Use ONLY information present in the CV text. \
    Do NOT infer or invent details. \
    If a field is not present, leave it empty.";
