pub mod chat_message;
pub mod comment;
pub mod corpus;
pub mod intake_record;
pub mod project;
pub mod task;
pub mod user;

#[cfg(test)]
mod corpus_tests;
