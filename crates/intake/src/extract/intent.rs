use std::collections::HashSet;

use crate::{
    document::{DepLabel, Document, PartOfSpeech},
    record::Intent,
};

/// Lemmas that signal each intent, checked in table order
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymTable {
    entries: Vec<(Intent, HashSet<String>)>,
}

impl SynonymTable {
    pub fn new(entries: impl IntoIterator<Item = (Intent, Vec<&'static str>)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(intent, lemmas)| {
                    (intent, lemmas.into_iter().map(str::to_string).collect())
                })
                .collect(),
        }
    }

    pub fn lookup(&self, lemma: &str) -> Option<Intent> {
        let lemma = lemma.to_lowercase();
        self.entries
            .iter()
            .find(|(_, lemmas)| lemmas.contains(&lemma))
            .map(|(intent, _)| *intent)
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::new([
            (Intent::Create, vec!["create", "start", "initiate", "add", "append", "make"]),
            (Intent::Update, vec!["update", "modify", "edit", "set"]),
            (Intent::Delete, vec!["delete", "remove", "discard"]),
            (Intent::Assign, vec!["assign", "attach", "assignment", "attachment"]),
            (Intent::Show, vec!["give", "list", "show", "display", "view"]),
            (Intent::Describe, vec!["description", "describe"]),
        ])
    }
}

/// Intent of the first root or adverbial-clause verb whose lemma is in the
/// table. Exact lemma membership only.
pub fn classify(doc: &Document, synonyms: &SynonymTable) -> Intent {
    doc.tokens()
        .iter()
        .filter(|token| {
            token.pos == PartOfSpeech::Verb && matches!(token.dep, DepLabel::Root | DepLabel::Advcl)
        })
        .find_map(|token| synonyms.lookup(&token.lemma))
        .unwrap_or_default()
}
