pub(crate) mod chat_completions;
mod adapter;

pub use adapter::OpenAIAdapter;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
