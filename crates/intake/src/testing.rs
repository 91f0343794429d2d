//! In-memory collaborators and hand-written parses for tests.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;

use crate::{
    analyzer::{AnalyzerError, LinguisticAnalyzer},
    document::{Document, SentenceSpan},
    record::StructuredRecord,
    store::{PersistenceStore, StoreError},
};

/// Analyzer that serves canned parses and scores similarity by word overlap
#[derive(Debug, Default)]
pub struct FakeAnalyzer {
    documents: HashMap<String, Document>,
    unavailable: bool,
}

impl FakeAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzer that knows every parse in [`fixtures::all`]
    pub fn with_fixtures() -> Self {
        fixtures::all()
            .into_iter()
            .fold(Self::new(), |analyzer, doc| analyzer.with_document(doc))
    }

    pub fn with_document(mut self, doc: Document) -> Self {
        self.documents.insert(doc.text().to_string(), doc);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn check(&self) -> Result<(), AnalyzerError> {
        if self.unavailable {
            return Err(AnalyzerError::Unavailable("fake analyzer is down".to_string()));
        }
        Ok(())
    }
}

fn words(text: &str) -> HashMap<String, f32> {
    let mut counts = HashMap::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        *counts.entry(word.to_lowercase()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Cosine similarity of word-count vectors
pub fn bag_of_words_similarity(a: &str, b: &str) -> f32 {
    let (a, b) = (words(a), words(b));
    let dot: f32 = a
        .iter()
        .filter_map(|(word, count)| b.get(word).map(|other| count * other))
        .sum();
    let norm = |v: &HashMap<String, f32>| v.values().map(|c| c * c).sum::<f32>().sqrt();
    let denominator = norm(&a) * norm(&b);
    if denominator == 0.0 {
        0.0
    } else {
        dot / denominator
    }
}

/// Sentences end at a newline, or at `.`, `!` or `?` followed by whitespace
pub fn split_sentences(text: &str) -> Vec<SentenceSpan> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut push = |start: usize, end: usize| {
        let piece = &text[start..end];
        if !piece.trim().is_empty() {
            spans.push(SentenceSpan {
                start,
                end,
                text: piece.trim().to_string(),
            });
        }
    };

    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let boundary = match c {
            '\n' => Some(i),
            '.' | '!' | '?' => match chars.peek() {
                None => Some(i + c.len_utf8()),
                Some((_, next)) if next.is_whitespace() => Some(i + c.len_utf8()),
                _ => None,
            },
            _ => None,
        };
        if let Some(end) = boundary {
            push(start, end);
            start = end;
        }
    }
    if start < text.len() {
        push(start, text.len());
    }

    spans
}

#[async_trait]
impl LinguisticAnalyzer for FakeAnalyzer {
    async fn parse(&self, text: &str) -> Result<Document, AnalyzerError> {
        self.check()?;
        Ok(self
            .documents
            .get(text)
            .cloned()
            .unwrap_or_else(|| Document::empty(text)))
    }

    async fn similarity(&self, a: &str, b: &str) -> Result<f32, AnalyzerError> {
        self.check()?;
        Ok(bag_of_words_similarity(a, b))
    }

    async fn sentences(&self, text: &str) -> Result<Vec<SentenceSpan>, AnalyzerError> {
        self.check()?;
        Ok(split_sentences(text))
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<String, i64>,
    projects: HashSet<String>,
    corpus: String,
    records: Vec<StructuredRecord>,
    chat_messages: Vec<serde_json::Value>,
    next_id: i64,
    fail_reads: bool,
    fail_writes: bool,
}

/// Store keeping everything in memory; row ids start at 1
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, name: &str, id: i64) -> Self {
        self.add_user(name, id);
        self
    }

    pub fn with_project(self, name: &str) -> Self {
        self.add_project(name);
        self
    }

    pub fn with_corpus(self, corpus: &str) -> Self {
        self.state.lock().unwrap().corpus = corpus.to_string();
        self
    }

    pub fn add_user(&self, name: &str, id: i64) {
        self.state
            .lock()
            .unwrap()
            .users
            .insert(name.to_lowercase(), id);
    }

    pub fn add_project(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .projects
            .insert(name.to_lowercase());
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn records(&self) -> Vec<StructuredRecord> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn chat_messages(&self) -> Vec<serde_json::Value> {
        self.state.lock().unwrap().chat_messages.clone()
    }

    fn read_guard(state: &MemoryState) -> Result<(), StoreError> {
        if state.fail_reads {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn write_guard(state: &MemoryState) -> Result<(), StoreError> {
        if state.fail_writes {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceStore for MemoryStore {
    async fn fetch_usernames(&self) -> Result<HashMap<String, i64>, StoreError> {
        let state = self.state.lock().unwrap();
        Self::read_guard(&state)?;
        Ok(state.users.clone())
    }

    async fn fetch_projects(&self) -> Result<HashSet<String>, StoreError> {
        let state = self.state.lock().unwrap();
        Self::read_guard(&state)?;
        Ok(state.projects.clone())
    }

    async fn insert_structured_record(
        &self,
        record: &StructuredRecord,
    ) -> Result<i64, StoreError> {
        let mut state = self.state.lock().unwrap();
        Self::write_guard(&state)?;
        state.next_id += 1;
        state.records.push(record.clone());
        Ok(state.next_id)
    }

    async fn fetch_corpus(&self) -> Result<String, StoreError> {
        let state = self.state.lock().unwrap();
        Self::read_guard(&state)?;
        Ok(state.corpus.clone())
    }

    async fn insert_chat_message(&self, payload: &serde_json::Value) -> Result<i64, StoreError> {
        let mut state = self.state.lock().unwrap();
        Self::write_guard(&state)?;
        state.next_id += 1;
        state.chat_messages.push(payload.clone());
        Ok(state.next_id)
    }
}

/// Parses shaped like the ones the parser sidecar produces
pub mod fixtures {
    use crate::document::{DepLabel as D, Document, DocumentBuilder, PartOfSpeech as P};

    pub const CREATE_TWO_TASKS: &str = "create task Foo and Bar";
    pub const CREATE_TASK_CHAIN: &str = "create task Foo, Bar and Baz";
    pub const CREATE_AND_ASSIGN: &str = "create task Design and assign it to Alice";
    pub const SHOW_USER_TASKS: &str = "show tasks of Alice and Bob";
    pub const ADD_COMMENT: &str = "add a comment 'looks good' to task Design";
    pub const DESCRIBE_WITH_QUOTES: &str =
        "describe task Design with description 'first draft' and comment 'ok'";
    pub const SET_DEADLINE: &str = "set the deadline of task Launch to 15/03/2024";
    pub const DEADLINE_ENTITY: &str = "add task Report with deadline next Friday";
    pub const CREATE_PROJECTS: &str = "create project Apollo and Gemini";
    pub const ADVCL_FIRST: &str = "before you start, delete task Draft";
    pub const NESTED_VERB: &str = "I want to remove task Old";
    pub const QUESTION: &str = "who is working on the design task";

    pub fn create_two_tasks() -> Document {
        DocumentBuilder::new(CREATE_TWO_TASKS)
            .token("create", "create", P::Verb, D::Root, 0)
            .token("task", "task", P::Noun, D::Compound, 2)
            .token("Foo", "Foo", P::Propn, D::Dobj, 0)
            .token("and", "and", P::Cconj, D::Cc, 2)
            .token("Bar", "Bar", P::Propn, D::Conj, 2)
            .build()
            .expect("valid fixture")
    }

    pub fn create_task_chain() -> Document {
        DocumentBuilder::new(CREATE_TASK_CHAIN)
            .token("create", "create", P::Verb, D::Root, 0)
            .token("task", "task", P::Noun, D::Compound, 2)
            .token("Foo", "Foo", P::Propn, D::Dobj, 0)
            .token(",", ",", P::Punct, D::Punct, 2)
            .token("Bar", "Bar", P::Propn, D::Conj, 2)
            .token("and", "and", P::Cconj, D::Cc, 4)
            .token("Baz", "Baz", P::Propn, D::Conj, 4)
            .build()
            .expect("valid fixture")
    }

    pub fn create_and_assign() -> Document {
        DocumentBuilder::new(CREATE_AND_ASSIGN)
            .token("create", "create", P::Verb, D::Root, 0)
            .token("task", "task", P::Noun, D::Compound, 2)
            .token("Design", "Design", P::Propn, D::Dobj, 0)
            .token("and", "and", P::Cconj, D::Cc, 0)
            .token("assign", "assign", P::Verb, D::Conj, 0)
            .token("it", "it", P::Pron, D::Dobj, 4)
            .token("to", "to", P::Adp, D::Prep, 4)
            .token("Alice", "Alice", P::Propn, D::Pobj, 6)
            .build()
            .expect("valid fixture")
    }

    pub fn show_user_tasks() -> Document {
        DocumentBuilder::new(SHOW_USER_TASKS)
            .token("show", "show", P::Verb, D::Root, 0)
            .token("tasks", "task", P::Noun, D::Dobj, 0)
            .token("of", "of", P::Adp, D::Prep, 1)
            .token("Alice", "Alice", P::Propn, D::Pobj, 2)
            .token("and", "and", P::Cconj, D::Cc, 3)
            .token("Bob", "Bob", P::Propn, D::Conj, 3)
            .build()
            .expect("valid fixture")
    }

    pub fn add_comment() -> Document {
        DocumentBuilder::new(ADD_COMMENT)
            .token("add", "add", P::Verb, D::Root, 0)
            .token("a", "a", P::Det, D::Det, 2)
            .token("comment", "comment", P::Noun, D::Dobj, 0)
            .token("'", "'", P::Punct, D::Punct, 2)
            .token("looks", "look", P::Verb, D::Relcl, 2)
            .token("good", "good", P::Adj, D::Other, 4)
            .token("'", "'", P::Punct, D::Punct, 2)
            .token("to", "to", P::Adp, D::Prep, 0)
            .token("task", "task", P::Noun, D::Compound, 9)
            .token("Design", "Design", P::Propn, D::Pobj, 7)
            .build()
            .expect("valid fixture")
    }

    pub fn describe_with_quotes() -> Document {
        DocumentBuilder::new(DESCRIBE_WITH_QUOTES)
            .token("describe", "describe", P::Verb, D::Root, 0)
            .token("task", "task", P::Noun, D::Compound, 2)
            .token("Design", "Design", P::Propn, D::Dobj, 0)
            .token("with", "with", P::Adp, D::Prep, 0)
            .token("description", "description", P::Noun, D::Pobj, 3)
            .token("'", "'", P::Punct, D::Punct, 7)
            .token("first", "first", P::Adj, D::Amod, 7)
            .token("draft", "draft", P::Noun, D::Appos, 4)
            .token("'", "'", P::Punct, D::Punct, 7)
            .token("and", "and", P::Cconj, D::Cc, 4)
            .token("comment", "comment", P::Noun, D::Conj, 4)
            .token("'", "'", P::Punct, D::Punct, 12)
            .token("ok", "ok", P::Intj, D::Appos, 10)
            .token("'", "'", P::Punct, D::Punct, 12)
            .build()
            .expect("valid fixture")
    }

    pub fn set_deadline() -> Document {
        DocumentBuilder::new(SET_DEADLINE)
            .token("set", "set", P::Verb, D::Root, 0)
            .token("the", "the", P::Det, D::Det, 2)
            .token("deadline", "deadline", P::Noun, D::Dobj, 0)
            .token("of", "of", P::Adp, D::Prep, 2)
            .token("task", "task", P::Noun, D::Compound, 5)
            .token("Launch", "Launch", P::Propn, D::Pobj, 3)
            .token("to", "to", P::Adp, D::Prep, 0)
            .token("15/03/2024", "15/03/2024", P::Num, D::Pobj, 6)
            .entity("DATE", 7, 8)
            .build()
            .expect("valid fixture")
    }

    pub fn deadline_entity() -> Document {
        DocumentBuilder::new(DEADLINE_ENTITY)
            .token("add", "add", P::Verb, D::Root, 0)
            .token("task", "task", P::Noun, D::Compound, 2)
            .token("Report", "Report", P::Propn, D::Dobj, 0)
            .token("with", "with", P::Adp, D::Prep, 0)
            .token("deadline", "deadline", P::Noun, D::Pobj, 3)
            .token("next", "next", P::Adj, D::Amod, 6)
            .token("Friday", "Friday", P::Propn, D::Npadvmod, 4)
            .entity("DATE", 5, 7)
            .build()
            .expect("valid fixture")
    }

    pub fn create_projects() -> Document {
        DocumentBuilder::new(CREATE_PROJECTS)
            .token("create", "create", P::Verb, D::Root, 0)
            .token("project", "project", P::Noun, D::Compound, 2)
            .token("Apollo", "Apollo", P::Propn, D::Dobj, 0)
            .token("and", "and", P::Cconj, D::Cc, 2)
            .token("Gemini", "Gemini", P::Propn, D::Conj, 2)
            .build()
            .expect("valid fixture")
    }

    pub fn advcl_first() -> Document {
        DocumentBuilder::new(ADVCL_FIRST)
            .token("before", "before", P::Sconj, D::Other, 2)
            .token("you", "you", P::Pron, D::Nsubj, 2)
            .token("start", "start", P::Verb, D::Advcl, 4)
            .token(",", ",", P::Punct, D::Punct, 4)
            .token("delete", "delete", P::Verb, D::Root, 4)
            .token("task", "task", P::Noun, D::Compound, 6)
            .token("Draft", "Draft", P::Propn, D::Dobj, 4)
            .build()
            .expect("valid fixture")
    }

    pub fn nested_verb() -> Document {
        DocumentBuilder::new(NESTED_VERB)
            .token("I", "I", P::Pron, D::Nsubj, 1)
            .token("want", "want", P::Verb, D::Root, 1)
            .token("to", "to", P::Part, D::Aux, 3)
            .token("remove", "remove", P::Verb, D::Xcomp, 1)
            .token("task", "task", P::Noun, D::Compound, 5)
            .token("Old", "Old", P::Propn, D::Dobj, 3)
            .build()
            .expect("valid fixture")
    }

    pub fn question() -> Document {
        DocumentBuilder::new(QUESTION)
            .token("who", "who", P::Pron, D::Nsubj, 2)
            .token("is", "be", P::Aux, D::Aux, 2)
            .token("working", "work", P::Verb, D::Root, 2)
            .token("on", "on", P::Adp, D::Prep, 2)
            .token("the", "the", P::Det, D::Det, 6)
            .token("design", "design", P::Noun, D::Compound, 6)
            .token("task", "task", P::Noun, D::Pobj, 3)
            .build()
            .expect("valid fixture")
    }

    pub fn all() -> Vec<Document> {
        vec![
            create_two_tasks(),
            create_task_chain(),
            create_and_assign(),
            show_user_tasks(),
            add_comment(),
            describe_with_quotes(),
            set_deadline(),
            deadline_entity(),
            create_projects(),
            advcl_first(),
            nested_verb(),
            question(),
        ]
    }
}
