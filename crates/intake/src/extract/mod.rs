//! Independent rule passes over a parsed message.
//!
//! Each pass only reads the [`Document`](crate::document::Document); none of
//! them looks at the result of another, except that the user pass is told
//! which tokens were already claimed as task or project names.

pub mod deadline;
pub mod intent;
pub mod projects;
pub mod quoted;
pub mod tasks;
pub mod users;

use crate::document::{DepLabel, Document, TokenId};

pub use deadline::{DeadlinePolicy, extract_deadline};
pub use intent::{SynonymTable, classify};
pub use projects::{extract_projects, project_tokens};
pub use quoted::{COMMENT_LEMMA, DESCRIPTION_LEMMA, extract_quoted};
pub use tasks::{extract_tasks, task_tokens};
pub use users::{UserMentions, extract_users, extract_users_excluding};

/// The governor of the first `compound` token whose lemma is `trigger`
pub(crate) fn compound_governor(doc: &Document, trigger: &str) -> Option<TokenId> {
    doc.iter()
        .find(|(id, token)| {
            token.lemma_is(trigger) && token.dep == DepLabel::Compound && !doc.is_root(*id)
        })
        .map(|(_, token)| token.head)
}

pub(crate) fn surface_texts(doc: &Document, ids: &[TokenId]) -> Vec<String> {
    ids.iter().map(|id| doc.token(*id).text.clone()).collect()
}
