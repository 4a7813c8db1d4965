mod adapter;

pub use adapter::DeepseekAdapter;

pub const DEEPSEEK_API_BASE: &str = "https://api.deepseek.com/v1";

/// Upstream model every Deepseek request is sent to
pub const DEEPSEEK_CHAT_MODEL: &str = "deepseek-chat";
