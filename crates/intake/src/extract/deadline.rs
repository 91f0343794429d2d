use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::Document;

const DEADLINE_WORD: &str = "deadline";
const DATE_LABEL: &str = "DATE";

// D/M/YYYY or D-M-YYYY, day and month optionally zero padded
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:0?[1-9]|[12][0-9]|3[01])[/-](?:0?[1-9]|1[0-2])[/-][0-9]{4}\b")
        .expect("date pattern is valid")
});

/// How dates following the word "deadline" are recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadlinePolicy {
    /// Numeric dates in the raw text after the keyword
    #[default]
    Pattern,
    /// `DATE` entities that start after the keyword
    Entity,
}

impl fmt::Display for DeadlinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlinePolicy::Pattern => write!(f, "pattern"),
            DeadlinePolicy::Entity => write!(f, "entity"),
        }
    }
}

impl FromStr for DeadlinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pattern" | "regex" => Ok(DeadlinePolicy::Pattern),
            "entity" | "ner" => Ok(DeadlinePolicy::Entity),
            _ => Err(format!("Invalid deadline policy: {}", s)),
        }
    }
}

pub fn extract_deadline(doc: &Document, policy: DeadlinePolicy) -> Vec<String> {
    let Some((trigger, _)) = doc
        .iter()
        .find(|(_, token)| token.text.to_lowercase() == DEADLINE_WORD)
    else {
        return Vec::new();
    };

    match policy {
        DeadlinePolicy::Pattern => DATE_PATTERN
            .find_iter(doc.text_after(trigger))
            .map(|m| m.as_str().to_string())
            .collect(),
        DeadlinePolicy::Entity => doc
            .entities()
            .iter()
            .filter(|entity| entity.label == DATE_LABEL && entity.start > trigger)
            .map(|entity| doc.entity_text(entity).to_string())
            .collect(),
    }
}
