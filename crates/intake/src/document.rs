//! Parsed representation of one chat message.
//!
//! Tokens live in a flat arena and refer to their governor by index, so the
//! dependency tree is walked with index lookups instead of shared pointers.
//! A sentence root is its own head. The same structure is the wire format
//! returned by the parser sidecar.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub usize);

impl TokenId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Universal part-of-speech tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartOfSpeech {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
    #[serde(other)]
    Other,
}

impl PartOfSpeech {
    pub fn is_nominal(self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::Propn)
    }
}

/// Dependency labels (ClearNLP style, as emitted by the parser)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepLabel {
    #[serde(rename = "ROOT")]
    Root,
    Acl,
    Advcl,
    Advmod,
    Amod,
    Appos,
    Attr,
    Aux,
    Cc,
    Ccomp,
    Compound,
    Conj,
    Dative,
    Det,
    Dobj,
    Npadvmod,
    Nsubj,
    Nummod,
    Pobj,
    Poss,
    Prep,
    Punct,
    Relcl,
    Xcomp,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub dep: DepLabel,
    pub head: TokenId,
    /// Byte offset of the token in the document text
    pub offset: usize,
}

impl Token {
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.text.len())
    }

    pub fn lemma_is(&self, lemma: &str) -> bool {
        self.lemma.eq_ignore_ascii_case(lemma)
    }
}

/// Named-entity span over tokens `[start, end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub label: String,
    pub start: TokenId,
    pub end: TokenId,
}

/// A sentence of some text, addressed by byte range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    #[error("token {token} points at head {head}, but the document has {len} tokens")]
    HeadOutOfRange { token: usize, head: usize, len: usize },
    #[error("token {token} ({text:?}) does not match the text at byte {offset}")]
    TokenMismatch {
        token: usize,
        text: String,
        offset: usize,
    },
    #[error("entity {label} covers tokens {start}..{end}, but the document has {len} tokens")]
    EntityOutOfRange {
        label: String,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("token {0:?} was not found in the remaining text")]
    TokenNotInText(String),
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    text: String,
    tokens: Vec<Token>,
    #[serde(default)]
    entities: Vec<EntitySpan>,
}

impl TryFrom<RawDocument> for Document {
    type Error = DocumentError;

    fn try_from(raw: RawDocument) -> Result<Self, Self::Error> {
        Document::new(raw.text, raw.tokens, raw.entities)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDocument")]
pub struct Document {
    text: String,
    tokens: Vec<Token>,
    entities: Vec<EntitySpan>,
}

impl Document {
    /// Validates that every head, token offset and entity span is in range.
    pub fn new(
        text: String,
        tokens: Vec<Token>,
        entities: Vec<EntitySpan>,
    ) -> Result<Self, DocumentError> {
        let len = tokens.len();
        for (i, token) in tokens.iter().enumerate() {
            if token.head.index() >= len {
                return Err(DocumentError::HeadOutOfRange {
                    token: i,
                    head: token.head.index(),
                    len,
                });
            }
            let span = token
                .offset
                .checked_add(token.text.len())
                .and_then(|end| text.get(token.offset..end));
            if span != Some(token.text.as_str()) {
                return Err(DocumentError::TokenMismatch {
                    token: i,
                    text: token.text.clone(),
                    offset: token.offset,
                });
            }
        }
        for entity in &entities {
            if entity.start >= entity.end || entity.end.index() > len {
                return Err(DocumentError::EntityOutOfRange {
                    label: entity.label.clone(),
                    start: entity.start.index(),
                    end: entity.end.index(),
                    len,
                });
            }
        }

        Ok(Self {
            text,
            tokens,
            entities,
        })
    }

    /// A document without tokens
    pub fn empty(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens: Vec::new(),
            entities: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn entities(&self) -> &[EntitySpan] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &Token)> {
        self.tokens.iter().enumerate().map(|(i, t)| (TokenId(i), t))
    }

    pub fn head(&self, id: TokenId) -> TokenId {
        self.token(id).head
    }

    pub fn is_root(&self, id: TokenId) -> bool {
        self.head(id) == id
    }

    pub fn children(&self, id: TokenId) -> impl Iterator<Item = TokenId> + '_ {
        self.iter()
            .filter(move |(child, token)| token.head == id && *child != id)
            .map(|(child, _)| child)
    }

    pub fn lefts(&self, id: TokenId) -> impl Iterator<Item = TokenId> + '_ {
        self.children(id).filter(move |child| *child < id)
    }

    pub fn rights(&self, id: TokenId) -> impl Iterator<Item = TokenId> + '_ {
        self.children(id).filter(move |child| *child > id)
    }

    /// Raw text strictly after the given token
    pub fn text_after(&self, id: TokenId) -> &str {
        self.text.get(self.token(id).end()..).unwrap_or("")
    }

    /// Surface text covered by an entity span
    pub fn entity_text(&self, entity: &EntitySpan) -> &str {
        let start = self.tokens[entity.start.index()].offset;
        let end = self.tokens[entity.end.index() - 1].end();
        self.text.get(start..end).unwrap_or("")
    }
}

/// Assembles a [`Document`] token by token, locating each token in the text
/// so callers never compute offsets by hand.
#[derive(Debug)]
pub struct DocumentBuilder {
    text: String,
    cursor: usize,
    tokens: Vec<Token>,
    entities: Vec<EntitySpan>,
    error: Option<DocumentError>,
}

impl DocumentBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
            tokens: Vec::new(),
            entities: Vec::new(),
            error: None,
        }
    }

    pub fn token(
        mut self,
        text: &str,
        lemma: &str,
        pos: PartOfSpeech,
        dep: DepLabel,
        head: usize,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        let found = self
            .text
            .get(self.cursor..)
            .and_then(|rest| rest.find(text));
        match found {
            Some(relative) => {
                let offset = self.cursor + relative;
                self.cursor = offset + text.len();
                self.tokens.push(Token {
                    text: text.to_string(),
                    lemma: lemma.to_string(),
                    pos,
                    dep,
                    head: TokenId(head),
                    offset,
                });
            }
            None => self.error = Some(DocumentError::TokenNotInText(text.to_string())),
        }
        self
    }

    pub fn entity(mut self, label: &str, start: usize, end: usize) -> Self {
        self.entities.push(EntitySpan {
            label: label.to_string(),
            start: TokenId(start),
            end: TokenId(end),
        });
        self
    }

    pub fn build(self) -> Result<Document, DocumentError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Document::new(self.text, self.tokens, self.entities)
    }
}
