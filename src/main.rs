mod common;
mod compose;
mod config;
mod network;
mod storage;
mod ui;

use std::error::Error;
use std::time::Duration;

use clap::{Parser, Subcommand};
use common::{ClientEvent, Resource};
use compose::{DmForm, MessageList, SubmissionHandler};
use config::AppConfig;
use dotenvy::dotenv;
use network::{DmClient, DmTransport};
use storage::OutboxStatus;
use tokio::sync::mpsc;
use ui::DmApp;
use ui::app::DmAppOptions;

const CHANNEL_CAPACITY: usize = 100;

#[derive(Parser)]
#[command(
    name = "dm_composer",
    version,
    about = "Direct message client with optimistic sending"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE", global = true)]
    config: String,
    /// Conversation page URL; its last path segment is the target id
    #[arg(long, value_name = "URL", global = true)]
    page_url: Option<String>,
    /// Server base URL, overrides config and DM_BASE_URL
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,
    /// `conversations` or `threads`
    #[arg(long, global = true)]
    resource: Option<Resource>,
    /// Do not record submissions in the local outbox
    #[arg(long, global = true)]
    no_outbox: bool,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Submit one message without opening a window and print the response
    Send {
        /// Message text, sent as typed
        text: String,
    },
    /// Print the most recent entries of the local outbox
    Outbox {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = resolve_config(&cli);
    log::info!(
        "Posting to {} ({})",
        app_config.base_url,
        app_config.resource
    );

    match cli.mode {
        Some(Mode::Send { text }) => run_headless(&app_config, text).await,
        Some(Mode::Outbox { limit }) => print_outbox(&app_config, limit),
        None => run_window(app_config, cli.config).await,
    }
}

fn resolve_config(cli: &Cli) -> AppConfig {
    let mut app_config = config::load_config(&cli.config);
    app_config.apply_env();

    if let Some(base_url) = &cli.base_url {
        app_config.base_url = base_url.clone();
    }
    if let Some(resource) = cli.resource {
        app_config.resource = resource;
    }
    if let Some(page_url) = &cli.page_url {
        app_config.page_url = Some(page_url.clone());
    }
    if cli.no_outbox {
        app_config.outbox_path = None;
    }

    app_config
}

fn spawn_client(
    app_config: &AppConfig,
) -> Result<(SubmissionHandler, mpsc::Receiver<ClientEvent>, tokio::task::JoinHandle<()>), Box<dyn Error>> {
    let transport = DmTransport::new(
        &app_config.base_url,
        app_config.resource,
        Duration::from_secs(app_config.request_timeout_secs),
    )?;
    let outbox = storage::open_outbox(app_config.outbox_path.as_deref());

    // UI -> network
    let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_CAPACITY);
    // network -> UI
    let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let task = tokio::spawn(async move {
        let client = DmClient::new(transport, event_tx, cmd_rx, outbox);
        if let Err(err) = client.run().await {
            log::error!("DM client terminated: {err}");
        }
    });

    Ok((SubmissionHandler::new(cmd_tx), event_rx, task))
}

async fn run_window(app_config: AppConfig, config_path: String) -> Result<(), Box<dyn Error>> {
    let (handler, event_rx, _task) = spawn_client(&app_config)?;

    let options = eframe::NativeOptions::default();
    let app_options = DmAppOptions {
        page_url: app_config.page_url.clone().unwrap_or_default(),
        base_url: app_config.base_url.clone(),
        resource: app_config.resource,
        rollback_failed: app_config.rollback_failed,
        config_path,
    };

    eframe::run_native(
        "Direct Messages",
        options,
        Box::new(move |cc| {
            log::info!("Window opened on {:?}", app_options.page_url);
            Ok(Box::new(DmApp::new(cc, app_options, handler, event_rx)))
        }),
    )?;

    Ok(())
}

async fn run_headless(app_config: &AppConfig, text: String) -> Result<(), Box<dyn Error>> {
    let Some(page_url) = app_config.page_url.clone() else {
        return Err("`send` needs --page-url (or page_url in the config file)".into());
    };

    let (handler, mut event_rx, task) = spawn_client(app_config)?;
    let mut form = DmForm::new(page_url);
    form.input_text = text;
    let mut list = MessageList::new(app_config.rollback_failed);

    let submitted = handler.on_submit(&mut form, &mut list);
    drop(handler);

    let outcome = match submitted {
        Some(_) => event_rx.recv().await,
        None => {
            log::warn!("Message too short; nothing sent");
            None
        }
    };
    task.await?;

    match outcome {
        Some(ClientEvent::DmDelivered { response, .. }) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Some(ClientEvent::DmFailed { error, .. }) => Err(error.into()),
        None => Ok(()),
    }
}

fn print_outbox(app_config: &AppConfig, limit: usize) -> Result<(), Box<dyn Error>> {
    let Some(outbox) = storage::open_outbox(app_config.outbox_path.as_deref()) else {
        return Err("outbox is disabled or unavailable".into());
    };

    for entry in outbox.recent(limit)? {
        let created = format_timestamp(entry.created_at);
        let short_id = entry.local_id.get(..8).unwrap_or(&entry.local_id);
        let mut line = format!(
            "{created}  {short_id}  {:<9}  {}/{}  {}",
            entry.status, entry.resource, entry.target, entry.text
        );
        if entry.status != OutboxStatus::Pending {
            line.push_str(&format!("  [updated {}]", format_timestamp(entry.updated_at)));
        }
        if let Some(error) = &entry.error {
            line.push_str(&format!("  ({error})"));
        }
        println!("{line}");
    }

    Ok(())
}

fn format_timestamp(seconds: i64) -> String {
    chrono::DateTime::from_timestamp(seconds, 0)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
