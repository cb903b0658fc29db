use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use scanlate_config::Config;
use scanlate_speech::Announcer;
use scanlate_types::{AppEvent, UiCommand};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::context::{PipelineContext, Services};
use crate::events::event_loop;
use crate::session::Session;
use crate::ui::{Presenter, UiLoop};

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub commands: (AsyncSender<UiCommand>, AsyncReceiver<UiCommand>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(64), // Pipeline results
            ui_to_app: kanal::bounded_async(16), // Stage requests
            commands: kanal::bounded_async(16),  // User actions
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    config: Arc<Config>,
    cancel_token: CancellationToken,
    finished: watch::Sender<u64>,
}

impl AppController {
    pub fn new(config: Arc<Config>) -> Self {
        let (finished, _) = watch::channel(0);
        Self {
            channels: ChannelSet::new(),
            config,
            cancel_token: CancellationToken::new(),
            finished,
        }
    }

    pub fn spawn_tasks(
        &self,
        services: Services,
        announcer: Announcer,
        presenter: Box<dyn Presenter>,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        let ctx = PipelineContext::new(
            self.config.clone(),
            services,
            self.channels.app_to_ui.0.clone(),
        );
        tasks.spawn(event_loop(
            ctx,
            self.channels.ui_to_app.1.clone(),
            self.cancel_token.child_token(),
        ));

        // UI loop
        let ui = UiLoop {
            session: Session::new(),
            config: self.config.clone(),
            announcer,
            presenter,
            ui_to_app_tx: self.channels.ui_to_app.0.clone(),
            finished_tx: self.finished.clone(),
        };
        tasks.spawn(ui.run(
            self.channels.app_to_ui.1.clone(),
            self.channels.commands.1.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn command_sender(&self) -> CommandSender {
        CommandSender {
            tx: self.channels.commands.0.clone(),
            finished: self.finished.subscribe(),
        }
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

/// Feeds user actions to the UI loop
#[derive(Clone)]
pub struct CommandSender {
    tx: AsyncSender<UiCommand>,
    finished: watch::Receiver<u64>,
}

impl CommandSender {
    /// Send a command and wait until its operation reached a terminal event
    pub async fn send_and_wait(&mut self, command: UiCommand) -> anyhow::Result<()> {
        let wait = command != UiCommand::Quit;
        let target = *self.finished.borrow_and_update() + 1;

        self.tx.send(command).await?;

        if wait {
            self.finished.wait_for(|finished| *finished >= target).await?;
        }

        Ok(())
    }
}
