use std::path::PathBuf;
use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use scanlate_config::Config;
use scanlate_speech::Announcer;
use scanlate_types::{AppEvent, ScanRequest, UiCommand};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::session::{Session, Update};

/// Renders the session after every change
pub trait Presenter: Send {
    fn render(&mut self, session: &Session, update: Update);
}

/// Prints displayed text to stdout
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn render(&mut self, session: &Session, update: Update) {
        match update {
            Update::RecognitionStarted => println!("Recognizing..."),
            Update::Recognized => {
                println!("--- Recognized text ---");
                if session.recognized_text.is_empty() {
                    println!("(no text found)");
                } else {
                    print!("{}", session.recognized_text);
                }
            }
            Update::Translated => {
                let to = session.translated_to.as_deref().unwrap_or("?");
                println!("--- Translation ({}) ---", to);
                println!("{}", session.translated_text.as_deref().unwrap_or_default());
            }
            Update::ScanCancelled => println!("Scan cancelled"),
            Update::NothingToTranslate => println!("Nothing to translate"),
            Update::Failure => {
                if let Some(failure) = &session.last_failure {
                    println!("Error: {}", failure);
                }
            }
            Update::Ignored => {}
        }
    }
}

/// UI side of the pipeline: owns the displayed state and the speech handle
pub struct UiLoop {
    pub session: Session,
    pub config: Arc<Config>,
    pub announcer: Announcer,
    pub presenter: Box<dyn Presenter>,
    pub ui_to_app_tx: AsyncSender<AppEvent>,
    /// Publishes `Session::finished` so command senders can wait on it
    pub finished_tx: watch::Sender<u64>,
}

impl UiLoop {
    pub async fn run(
        mut self,
        app_to_ui_rx: AsyncReceiver<AppEvent>,
        commands_rx: AsyncReceiver<UiCommand>,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        tracing::info!("[UI] Ready");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = app_to_ui_rx.recv() => match event {
                    Ok(event) => self.handle_event(event),
                    Err(_) => break,
                },
                command = commands_rx.recv() => match command {
                    Ok(UiCommand::Quit) | Err(_) => {
                        tracing::info!("[UI] Quit requested");
                        break;
                    }
                    Ok(command) => self.handle_command(command).await?,
                },
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) {
        let update = self.session.apply(event);
        if update == Update::Ignored {
            return;
        }

        self.presenter.render(&self.session, update);

        if update == Update::Recognized {
            self.announcer
                .announce(&self.session.recognized_text, &self.config.speech.language);
            self.session.settle();
        }

        self.finished_tx.send_replace(self.session.finished);
    }

    async fn handle_command(&mut self, command: UiCommand) -> anyhow::Result<()> {
        match command {
            UiCommand::Capture(pages) => {
                self.ui_to_app_tx
                    .send(AppEvent::Capture(ScanRequest::new(pages)))
                    .await?;
            }
            UiCommand::Translate => match self.session.translation_input() {
                Some(text) => {
                    let text = text.to_string();
                    self.ui_to_app_tx.send(AppEvent::Translate { text }).await?;
                }
                None => {
                    tracing::debug!("[UI] No recognized text, skipping translation");
                    let update = self.session.skip_translation();
                    self.presenter.render(&self.session, update);
                    self.finished_tx.send_replace(self.session.finished);
                }
            },
            UiCommand::Quit => {}
        }

        Ok(())
    }
}

/// Parse one line of interactive input; blank lines yield `None`
pub fn parse_command(line: &str) -> anyhow::Result<Option<UiCommand>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb.to_lowercase().as_str() {
        "scan" | "s" => UiCommand::Capture(words.map(PathBuf::from).collect()),
        "translate" | "t" => UiCommand::Translate,
        "quit" | "q" | "exit" => UiCommand::Quit,
        other => anyhow::bail!("Unknown command '{}' (try: scan [PATH...], translate, quit)", other),
    };

    Ok(Some(command))
}
