//! DART Disclosure Monitor — Binary Entrypoint
//! Wires the HTTP clients, the monitor session, the periodic scheduler and
//! the Telegram command loop.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dart_disclosure_monitor::config::{MonitorConfig, Secrets};
use dart_disclosure_monitor::fetch::DartDocumentClient;
use dart_disclosure_monitor::listing::DartListingClient;
use dart_disclosure_monitor::notify::telegram::{TelegramApi, TelegramNotifier};
use dart_disclosure_monitor::scan::MonitorSession;
use dart_disclosure_monitor::scheduler::{spawn_monitor_scheduler, ScanDeps};
use dart_disclosure_monitor::bot::{run_command_loop, ControlHandle};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dart_disclosure_monitor=info,scan=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the vars come from the environment.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = MonitorConfig::load()?;
    let secrets = Secrets::from_env()?;
    tracing::info!(
        interval = cfg.scan_interval_secs,
        max_items = cfg.max_items_per_scan,
        "starting monitor"
    );

    let api = TelegramApi::new(&secrets.telegram_token);
    let notifier = Arc::new(TelegramNotifier::new(TelegramApi::new(
        &secrets.telegram_token,
    )));
    let deps = ScanDeps {
        listing: Arc::new(
            DartListingClient::new(secrets.dart_api_key.clone())
                .with_timeout(cfg.http_timeout_secs),
        ),
        docs: Arc::new(
            DartDocumentClient::new(secrets.dart_api_key.clone())
                .with_timeout(cfg.http_timeout_secs),
        ),
        notifier: notifier.clone(),
    };

    let session = Arc::new(Mutex::new(MonitorSession::new(cfg.clone())));
    let armed = Arc::new(AtomicBool::new(false));

    let _scheduler = spawn_monitor_scheduler(cfg.clone(), session.clone(), deps.clone(), armed.clone());

    let ctrl = ControlHandle {
        session,
        deps,
        notifier,
        armed,
    };
    run_command_loop(api, ctrl).await;
    Ok(())
}
