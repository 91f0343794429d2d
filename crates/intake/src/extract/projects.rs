use super::{compound_governor, surface_texts};
use crate::document::{DepLabel, Document, TokenId};

const PROJECT_LEMMA: &str = "project";

/// Tokens naming projects: the governor of the `project` compound, then every
/// later nominal conjunct.
pub fn project_tokens(doc: &Document) -> Vec<TokenId> {
    let Some(governor) = compound_governor(doc, PROJECT_LEMMA) else {
        return Vec::new();
    };

    std::iter::once(governor)
        .chain(
            doc.iter()
                .skip(governor.index() + 1)
                .filter(|(_, token)| token.dep == DepLabel::Conj && token.pos.is_nominal())
                .map(|(id, _)| id),
        )
        .collect()
}

pub fn extract_projects(doc: &Document) -> Vec<String> {
    surface_texts(doc, &project_tokens(doc))
}
