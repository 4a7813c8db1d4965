mod adapter;

pub use adapter::GeminiAdapter;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
