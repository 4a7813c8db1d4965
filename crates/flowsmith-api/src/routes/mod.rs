pub mod chat;
pub mod docs;
pub mod graph;
pub mod health;
pub mod llm;
