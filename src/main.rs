//! Application entry point: LingoFix.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the language service client ([`GeminiClient`]) from config.
//! 5. Load the session history from the local storage directory.
//! 6. Build the correction pipeline and the speech bridge.
//! 7. Run [`eframe::run_native`]: blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use lingofix::{
    app::LingoFixApp,
    audio::{AudioSink, CpalSink},
    config::{AppConfig, AppPaths},
    history::{FileStorage, HistoryStore, KeyValueStorage},
    llm::{GeminiClient, LanguageService},
    pipeline::{new_shared_state, CorrectionPipeline},
    speech::SpeechBridge,
};

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let vp = egui::ViewportBuilder::default()
        .with_title("LingoFix")
        .with_inner_size([width, height])
        .with_min_inner_size([560.0, 400.0]);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("LingoFix starting up");

    // 2. Configuration
    let config = AppConfig::load_or_default();
    if config.llm.api_key.is_none() {
        log::warn!("No API key configured; requests will fail until one is set");
    }

    // 3. Tokio runtime (2 worker threads: one request plus one speech clip)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Language service
    let service: Arc<dyn LanguageService> =
        Arc::new(GeminiClient::from_config(&config.llm, &config.speech));

    // 5. History
    let paths = AppPaths::new();
    let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::new(paths.storage_dir.clone()));
    let history = HistoryStore::load_on_startup(storage, &config.history);
    log::info!(
        "History loaded: {} item(s) from {}",
        history.len(),
        paths.storage_dir.display()
    );

    // 6. Pipeline + speech
    let state = new_shared_state(history);
    let pipeline = Arc::new(CorrectionPipeline::new(state, Arc::clone(&service)));
    let sink: Arc<dyn AudioSink> = Arc::new(CpalSink::new());
    let speech = Arc::new(SpeechBridge::new(service, sink, config.speech.clone()));

    // 7. Build the egui app and run it (blocks until the window is closed)
    let app = LingoFixApp::new(pipeline, speech, rt.handle().clone(), &config.ui);
    let options = native_options(&config);

    eframe::run_native("LingoFix", options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("window error: {e}"))?;

    log::info!("LingoFix shut down");
    Ok(())
}
