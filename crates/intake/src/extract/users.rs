use crate::{
    document::{Document, PartOfSpeech, TokenId},
    registry::RegistrySnapshot,
};

/// Proper nouns split by whether the registry knows them. Every mention is
/// kept, repeats included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserMentions {
    pub resolved: Vec<i64>,
    pub unresolved: Vec<String>,
}

pub fn extract_users(doc: &Document, registry: &RegistrySnapshot) -> UserMentions {
    extract_users_excluding(doc, registry, &[])
}

/// Like [`extract_users`], skipping tokens already used as task or project
/// names.
pub fn extract_users_excluding(
    doc: &Document,
    registry: &RegistrySnapshot,
    claimed: &[TokenId],
) -> UserMentions {
    let mut mentions = UserMentions::default();

    for (id, token) in doc.iter() {
        if token.pos != PartOfSpeech::Propn || claimed.contains(&id) {
            continue;
        }
        match registry.user_id(&token.text) {
            Some(user_id) => mentions.resolved.push(user_id),
            None => mentions.unresolved.push(token.text.clone()),
        }
    }

    mentions
}
