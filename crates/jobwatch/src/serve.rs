// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `jobwatch serve` command implementation.
//!
//! Opens the jobcard database, starts the WhatsApp webhook server, and runs
//! the conversation controller loop. Startup failures are relayed
//! best-effort to the configured admin identity before exiting.

use std::sync::Arc;

use jobwatch_bot::controller::{BotSettings, Controller};
use jobwatch_bot::session::InMemorySessionStore;
use jobwatch_config::model::JobwatchConfig;
use jobwatch_core::error::JobwatchError;
use jobwatch_core::traits::{ChannelAdapter, SessionStore};
use jobwatch_core::types::OutboundMessage;
use jobwatch_store::Database;
use jobwatch_whatsapp::WhatsAppChannel;
use tracing::{error, info};

/// Runs the `jobwatch serve` command.
pub async fn run_serve(config: JobwatchConfig) -> Result<(), JobwatchError> {
    init_tracing(&config.bot.log_level);
    info!(name = %config.bot.name, "starting jobwatch serve");

    let mut channel = WhatsAppChannel::new(config.whatsapp.clone()).map_err(|e| {
        error!(error = %e, "failed to initialize WhatsApp channel");
        eprintln!(
            "error: WhatsApp credentials required. Set whatsapp.access_token, \
             whatsapp.phone_number_id and whatsapp.verify_token in config or \
             via JOBWATCH_WHATSAPP_* environment variables."
        );
        e
    })?;

    // The channel can already send once constructed, so any later startup
    // failure can still be relayed to the admin.
    let db = match bootstrap(&mut channel, &config).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "jobwatch failed to start");
            notify_admin(&channel, config.bot.admin_identity.as_deref(), &e).await;
            return Err(e);
        }
    };

    let channel = Arc::new(channel);
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let controller = Controller::new(
        Arc::clone(&channel),
        db,
        sessions,
        BotSettings::from(&config.bot),
    );

    info!("jobwatch ready, entering receive loop");
    if let Err(e) = controller.run().await {
        error!(error = %e, "receive loop ended");
        notify_admin(
            channel.as_ref(),
            config.bot.admin_identity.as_deref(),
            &e,
        )
        .await;
        channel.shutdown().await?;
        return Err(e);
    }
    Ok(())
}

/// Start the webhook server and open the jobcard database.
async fn bootstrap(
    channel: &mut WhatsAppChannel,
    config: &JobwatchConfig,
) -> Result<Database, JobwatchError> {
    channel.connect().await?;
    let db = Database::open(&config.storage.database_path).await?;
    info!(path = %config.storage.database_path, "jobcard database opened");
    Ok(db)
}

/// Best-effort failure alert to the admin identity, if one is configured.
async fn notify_admin<C: ChannelAdapter>(
    channel: &C,
    admin: Option<&str>,
    error: &JobwatchError,
) {
    let Some(admin) = admin else {
        return;
    };
    let alert = OutboundMessage {
        to: admin.to_string(),
        body: format!("An error occurred in jobcard alert system: {error}"),
    };
    if let Err(e) = channel.send(alert).await {
        error!(error = %e, "error sending admin alert");
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jobwatch={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
