// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting pieces.

/// Appended to every user prompt: the audience reads Indonesian.
pub const REPLY_IN_INDONESIAN: &str = "Jawab dalam Bahasa Indonesia.";

/// Appended to prompts whose output is machine-parsed.
pub const NO_EXTRA_TEXT: &str = "\
    Tuliskan HANYA hasil yang diminta. \
    Jangan menambahkan pembuka, penutup, penjelasan, atau penomoran.";
