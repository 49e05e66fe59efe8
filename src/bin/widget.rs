//! Terminal chat widget for the Test Centre assistant

use chatbot_widget::client::HttpReplyClient;
use chatbot_widget::config::WidgetConfig;
use chatbot_widget::runtime::spawn_widget;
use chatbot_widget::tui;
use chatbot_widget::widget::WidgetState;
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The terminal belongs to the UI, so logs only go to a file when asked
    if let Ok(path) = std::env::var("CHATBOT_WIDGET_LOG") {
        let file = File::create(&path)?;
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "chatbot_widget=debug".into()),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    }

    let config = WidgetConfig::from_env();
    tracing::info!(
        endpoint = %config.endpoint,
        timeout_secs = config.reply_timeout.as_secs(),
        "Starting chat widget"
    );

    let client = HttpReplyClient::new(config.endpoint.clone(), config.reply_timeout)?;
    let initial = WidgetState::new(config.greeting);

    let handle = spawn_widget(initial.clone(), client, config.reply_timeout);
    let updates = handle.subscribe();

    tokio::task::spawn_blocking(move || tui::run(&handle, initial, updates)).await??;

    tracing::info!("Chat widget closed");
    Ok(())
}
