use anyhow::Result;
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use knockknock::commands::{ScheduleCommand, ScheduleCommandHandler};
use knockknock::core::Config;
use knockknock::features::notifications::{Notifier, WebhookNotifier};
use knockknock::features::scheduling::{
    ScheduleStore, SchedulerEngine, TimerService, TokioTimerService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting knockknock scheduling bot...");

    let store = Arc::new(ScheduleStore::new());
    let timers: Arc<dyn TimerService> = Arc::new(TokioTimerService::new());
    let notifier: Arc<dyn Notifier> = Arc::new(WebhookNotifier::new(&config.webhook_url)?);

    let engine = Arc::new(
        SchedulerEngine::new(store, timers, notifier.clone())
            .with_reminder_lead(config.reminder_lead_minutes),
    );
    let handler = ScheduleCommandHandler::new(engine);

    info!(
        "Scheduler ready (pre-reminder lead: {} minutes)",
        config.reminder_lead_minutes
    );
    println!("Commands: add <date> <time> <content…> | remove <content…> | list | quit");

    // Line-oriented chat loop. Every response is relayed through the
    // notifier, mirroring the chat channel the bot answers into.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        let response = match ScheduleCommand::parse_line(line) {
            Ok(command) => handler.handle(command),
            Err(e) => e.user_message().to_string(),
        };

        println!("{response}");
        notifier.send(&response).await;
    }

    info!("Shutting down");
    Ok(())
}
