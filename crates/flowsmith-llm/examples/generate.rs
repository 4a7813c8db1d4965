use anyhow::Result;
use flowsmith_llm::{DispatchConfig, Dispatcher, GenerationRequest, ProviderEndpoints};

#[tokio::main]
async fn main() -> Result<()> {
    let model = std::env::var("MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
    let api_key = std::env::var("API_KEY")?;

    let dispatcher = Dispatcher::from_config(&ProviderEndpoints::default(), DispatchConfig::default())?;

    let request = GenerationRequest::new(model, "What is the capital of France?", api_key)
        .max_tokens(200)
        .temperature(0.2);

    match dispatcher.generate(request).await {
        Ok(result) => println!("Response: {}", result.text),
        Err(e) => {
            println!("Failed ({}): {}", e.kind, e.message);
            if let Some(detail) = e.provider_detail {
                println!("Provider said: {}", detail);
            }
        }
    }

    Ok(())
}
