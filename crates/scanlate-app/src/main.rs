use std::sync::Arc;

use clap::Parser;
use scanlate_speech::{Announcer, CommandSpeechEngine, SilentSpeechEngine, SpeechEngine};
use scanlate_types::UiCommand;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::cli::Args;
use crate::context::Services;
use crate::controller::{AppController, CommandSender};
use crate::ui::{TerminalPresenter, parse_command};

mod cli;
mod context;
mod controller;
mod events;
mod logging;
mod profile;
mod session;
mod ui;


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    let mut config = profile::load_config(args.config.as_deref())?;
    if let Some(target) = args.target {
        config.translator.to_lang = target;
    }
    if args.no_speech {
        config.speech.enabled = false;
    }
    let config = Arc::new(config);

    let services = Services::from_config(&config, args.pages)?;

    let speech_cancel = CancellationToken::new();
    let (announcer, speech_worker) = if config.speech.enabled {
        let engine: Arc<dyn SpeechEngine> = if config.speech.command.is_empty() {
            Arc::new(SilentSpeechEngine)
        } else {
            Arc::new(CommandSpeechEngine::new(config.speech.command.clone()))
        };
        let (announcer, worker) =
            Announcer::spawn(engine, config.speech.policy, speech_cancel.clone());
        (announcer, Some(worker))
    } else {
        (Announcer::disabled(), None)
    };

    let controller = AppController::new(config.clone());
    let mut tasks = controller.spawn_tasks(services, announcer, Box::new(TerminalPresenter));
    let commands = controller.command_sender();
    let once = args.once;

    let driver = async move {
        if once {
            run_once(commands).await
        } else {
            run_interactive(commands).await
        }
    };

    tokio::select! {
        result = driver => {
            if let Err(e) = result {
                tracing::error!("Command input failed: {:#}", e);
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            speech_cancel.cancel();
        }
        Some(result) = tasks.join_next() => log_task_exit(result),
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        log_task_exit(result);
    }

    if let Some(worker) = speech_worker {
        if let Err(e) = worker.await {
            tracing::error!("Speech worker panicked: {}", e);
        }
    }

    tracing::info!("Bye");
    Ok(())
}

/// Scan the default pages, translate the result, quit
async fn run_once(mut commands: CommandSender) -> anyhow::Result<()> {
    for command in [UiCommand::Capture(vec![]), UiCommand::Translate, UiCommand::Quit] {
        commands.send_and_wait(command).await?;
    }
    Ok(())
}

/// Read commands from stdin until `quit` or end of input
async fn run_interactive(mut commands: CommandSender) -> anyhow::Result<()> {
    println!("Commands: scan [PATH...], translate, quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Some(UiCommand::Quit)) => break,
            Ok(Some(command)) => commands.send_and_wait(command).await?,
            Ok(None) => {}
            Err(e) => println!("{}", e),
        }
    }

    commands.send_and_wait(UiCommand::Quit).await
}

fn log_task_exit(result: Result<anyhow::Result<()>, JoinError>) {
    match result {
        Ok(Ok(())) => tracing::debug!("Task finished"),
        Ok(Err(e)) => tracing::error!("Task failed: {:#}", e),
        Err(e) => tracing::error!("Task panicked: {}", e),
    }
}
