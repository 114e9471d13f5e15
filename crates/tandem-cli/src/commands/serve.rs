//! `tandem serve` — Start the tandem HTTP proxy server.

pub async fn run(host: String, port: u16) -> Result<(), String> {
    let config = tandem_server::ServerConfig {
        host: host.clone(),
        port,
    };

    println!("Starting tandem proxy on {}:{}...", host, port);

    let addr = tandem_server::start_server(config).await?;
    println!("Tandem proxy listening on http://{}", addr);

    // Keep the process running until interrupted
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for Ctrl+C: {}", e))?;

    println!("\nShutting down...");
    Ok(())
}
