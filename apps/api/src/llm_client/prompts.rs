// Cross-cutting prompt fragments. Feature prompts live next to their callers.

/// System prompt for every narrative call.
pub const NARRATIVE_SYSTEM: &str = "You are an experienced career counsellor writing \
    short passages for a student's career assessment report. \
    Write in plain text addressed to the student as \"you\". \
    Do NOT use markdown headings, tables or code fences. \
    Do NOT mention that you are an AI or refer to the data format.";

/// Appended to every prompt, followed by the serialized respondent profile.
pub const CONTEXT_PREAMBLE: &str = "Here is the relevant data for context:";
