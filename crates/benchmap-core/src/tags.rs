//! Capability tags.
//!
//! Tags form a closed set: every benchmark advertises the capabilities it
//! exercises, and requirement analysis produces tags from the same set.

use serde::{Deserialize, Serialize};

/// A capability a benchmark exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tag {
    Reasoning,
    Coding,
    Qa,
    FunctionCalling,
    Knowledge,
    Hallucination,
    LongContext,
    Retrieval,
    YesNo,
}

impl Tag {
    /// All tags, in declaration order.
    pub const ALL: [Tag; 9] = [
        Tag::Reasoning,
        Tag::Coding,
        Tag::Qa,
        Tag::FunctionCalling,
        Tag::Knowledge,
        Tag::Hallucination,
        Tag::LongContext,
        Tag::Retrieval,
        Tag::YesNo,
    ];

    /// Human-readable capability label used in recommendation reasons and
    /// agent prompts.
    pub fn human_label(&self) -> &'static str {
        match self {
            Tag::Reasoning => "reasoning",
            Tag::Coding => "code generation",
            Tag::Qa => "question answering",
            Tag::FunctionCalling => "function calling",
            Tag::Knowledge => "knowledge understanding",
            Tag::Hallucination => "hallucination detection",
            Tag::LongContext => "long-context handling",
            Tag::Retrieval => "retrieval",
            Tag::YesNo => "yes/no judgement",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tag::Reasoning => "REASONING",
            Tag::Coding => "CODING",
            Tag::Qa => "QA",
            Tag::FunctionCalling => "FUNCTION_CALLING",
            Tag::Knowledge => "KNOWLEDGE",
            Tag::Hallucination => "HALLUCINATION",
            Tag::LongContext => "LONG_CONTEXT",
            Tag::Retrieval => "RETRIEVAL",
            Tag::YesNo => "YES_NO",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REASONING" => Ok(Tag::Reasoning),
            "CODING" => Ok(Tag::Coding),
            "QA" => Ok(Tag::Qa),
            "FUNCTION_CALLING" => Ok(Tag::FunctionCalling),
            "KNOWLEDGE" => Ok(Tag::Knowledge),
            "HALLUCINATION" => Ok(Tag::Hallucination),
            "LONG_CONTEXT" => Ok(Tag::LongContext),
            "RETRIEVAL" => Ok(Tag::Retrieval),
            "YES_NO" => Ok(Tag::YesNo),
            _ => Err(format!("Invalid capability tag: {}", s)),
        }
    }
}
