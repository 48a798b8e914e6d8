//! Seller Dashboard sync runner
//!
//! Loads the notifications feed (optionally filtered by a keyword given as
//! the first argument) and, when `KYC_EMAIL` and `KYC_FIRST_NAME` are set,
//! drives a KYC session until its document reaches a terminal status.

use anyhow::Context;
use std::sync::Arc;
use tokio::signal;

use seller_dashboard::api::ApiClient;
use seller_dashboard::config::Config;
use seller_dashboard::downloads::HttpFileDownloader;
use seller_dashboard::filters::FilterSyncCoordinator;
use seller_dashboard::kyc::{Identity, KycPhase, KycPoller, KycStatus, RestKycApi};
use seller_dashboard::lists::notifications;
use seller_dashboard::notify::ToastChannel;
use seller_dashboard::pagination::{PaginatedListController, ScrollTrigger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_line_number(true)
        .init();

    tracing::info!(
        environment = config.environment.as_str(),
        api = %config.api_base_url,
        token = ?config.api_token_masked(),
        "Starting seller dashboard sync"
    );

    let client = ApiClient::from_config(&config);

    // Notifications feed
    let controller = Arc::new(
        PaginatedListController::new(
            "notifications",
            Arc::new(notifications::source(client.clone())),
        )
        .with_trigger(ScrollTrigger::Fraction(config.scroll_threshold)),
    );
    let filters = FilterSyncCoordinator::with_search(
        Arc::clone(&controller),
        "keyword",
        config.search_debounce(),
    );
    if let Some(keyword) = std::env::args().nth(1) {
        filters.set_filter_value("keyword", keyword);
    }
    let outcome = filters.commit().await;
    tracing::info!(?outcome, view = ?controller.view(), "Notifications loaded");

    // Drain the feed the way a user scrolling to the bottom would
    while controller.state().has_more && controller.state().error.is_none() {
        let outcome = controller.load_more().await;
        if !outcome.issued_fetch() {
            break;
        }
        tracing::info!(?outcome, items = controller.state().len(), "Loaded next page");
    }

    // KYC session
    let email = std::env::var("KYC_EMAIL").unwrap_or_default();
    let first_name = std::env::var("KYC_FIRST_NAME").unwrap_or_default();
    let identity = Identity::new(email, first_name);
    if !identity.is_complete() {
        tracing::info!("KYC_EMAIL/KYC_FIRST_NAME not set, skipping KYC session");
        return Ok(());
    }

    let toasts = Arc::new(ToastChannel::default());
    let downloader = Arc::new(HttpFileDownloader::new(
        client.http().clone(),
        config.download_dir.clone(),
    ));
    let poller = KycPoller::new(Arc::new(RestKycApi::new(client)), toasts, downloader)
        .with_interval(config.kyc_poll_interval());

    poller
        .initialize(identity)
        .await
        .context("Failed to start KYC session")?;
    if let Some(url) = poller.session().signing_url {
        tracing::info!(signing_url = %url, "Open the signing link to continue");
    }

    let mut session = poller.subscribe();
    let finished = async {
        // Err means the poller is gone
        let _ = session.wait_for(|s| s.phase == KycPhase::Finished).await;
    };

    tokio::select! {
        _ = finished => {}
        _ = shutdown_signal() => {
            poller.teardown();
            return Ok(());
        }
    }

    let status = poller.session().status;
    tracing::info!(status = status.as_str(), "KYC session finished");
    if status == KycStatus::Completed {
        let path = poller
            .download_document()
            .await
            .context("Failed to download signed document")?;
        tracing::info!(path = %path.display(), "Signed document saved");
    }

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, stopping");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, stopping");
        }
    }
}
