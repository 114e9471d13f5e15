//! `tandem ask` — single-shot completion through the proxy.

use tandem_core::ApiClient;

pub async fn run(api_url: &str, prompt: &str) -> Result<(), String> {
    let api = ApiClient::with_base_url(api_url);
    let reply = api.call_ai(prompt).await.map_err(|e| e.to_string())?;
    println!("{}", reply.response);
    Ok(())
}
