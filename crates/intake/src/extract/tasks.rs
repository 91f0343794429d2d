use std::collections::HashSet;

use super::{compound_governor, surface_texts};
use crate::document::{DepLabel, Document, TokenId};

const TASK_LEMMA: &str = "task";

/// Tokens naming tasks, in discovery order.
///
/// "task Foo and Bar": `task` is a compound of `Foo`, which names the first
/// task; conjuncts hanging to the right of `Foo` follow, then any later
/// nominal token whose governor is itself a conjunct ("Foo, Bar and Baz").
pub fn task_tokens(doc: &Document) -> Vec<TokenId> {
    let Some(governor) = compound_governor(doc, TASK_LEMMA) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut found = Vec::new();
    let mut emit = |id: TokenId| {
        if seen.insert(id) {
            found.push(id);
        }
    };

    emit(governor);
    for child in doc.rights(governor) {
        if doc.token(child).dep == DepLabel::Conj {
            emit(child);
        }
    }
    for (id, token) in doc.iter().skip(governor.index() + 1) {
        if token.pos.is_nominal()
            && !doc.is_root(id)
            && doc.token(token.head).dep == DepLabel::Conj
            && token.dep == DepLabel::Conj
        {
            emit(id);
        }
    }

    found
}

pub fn extract_tasks(doc: &Document) -> Vec<String> {
    surface_texts(doc, &task_tokens(doc))
}
