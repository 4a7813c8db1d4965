pub mod config;
pub mod deepseek;
pub mod dispatcher;
pub mod error;
pub mod gemini;
pub mod openai;
pub mod registry;
pub mod traits;
pub mod transport;
pub mod types;

pub use config::{DispatchConfig, ProviderEndpoints};
pub use deepseek::DeepseekAdapter;
pub use dispatcher::Dispatcher;
pub use error::{GenerationError, GenerationErrorKind};
pub use gemini::GeminiAdapter;
pub use openai::OpenAIAdapter;
pub use registry::AdapterRegistry;
pub use traits::{ProviderAdapter, ProviderKind};
pub use transport::{HttpTransport, Transport, TransportError};
pub use types::{
    DeclaredRange, GenerationRequest, GenerationResult, ModelConfig, ResolvedRequest, WireRequest,
    WireResponse,
};
