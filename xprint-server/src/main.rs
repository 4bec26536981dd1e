use xprint_server::{Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env, config, logging)
    let config = setup_environment();

    print_banner();

    tracing::info!("xprint server starting...");

    // 2. Serve until Ctrl-C
    let server = Server::new(config);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
