use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use otmoic_reputation::complaint_store::create_complaint_store;
use otmoic_reputation::config::Config;
use otmoic_reputation::contract::{parity_probe, ReputationContract};
use otmoic_reputation::handlers;
use otmoic_reputation::registry::{DomainRegistry, MemoryDomainRegistry, TerminusDidRegistry};
use otmoic_reputation::{ComplaintVerifier, VerifierSettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        network = %config.network,
        chain_id = config.chain_id,
        reputation = %config.reputation,
        terminus_did = %config.terminus_did,
        "Loaded configuration"
    );

    let registry: Arc<dyn DomainRegistry> = match &config.rpc_url {
        Some(rpc_url) => Arc::new(TerminusDidRegistry::new(rpc_url.clone(), config.terminus_did)),
        None => {
            warn!("RPC_URL not set - using empty in-memory domain registry, every submission will be rejected");
            Arc::new(MemoryDomainRegistry::new())
        }
    };
    let store = create_complaint_store(config.complaint_store_table.as_deref()).await;
    let verifier = Arc::new(ComplaintVerifier::new(
        VerifierSettings::from(&config),
        registry,
        store,
    ));

    if let Err(e) = verifier.ensure_tag_ready().await {
        warn!(error = %e, "Complaint tag is not ready on TerminusDID");
    }
    if let Some(rpc_url) = &config.rpc_url {
        let contract = ReputationContract::new(rpc_url.clone(), config.reputation);
        if let Err(e) = contract.verify_bid_id_parity(&parity_probe()).await {
            warn!(error = %e, "Could not confirm bid id parity with the Reputation contract");
        }
    }

    let app = handlers::routes(verifier);
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Starting reputation service");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
