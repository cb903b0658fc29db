use kanal::AsyncReceiver;
use scanlate_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::context::PipelineContext;

pub mod capture;
pub mod translate;

use capture::handle_capture;
use translate::handle_translate;

/// App side of the pipeline: runs the stages the UI asks for
pub async fn event_loop(
    ctx: PipelineContext,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => {
                    tracing::info!("[EVENT_LOOP] UI channel closed");
                    break;
                }
            },
        };

        tracing::debug!(
            "[EVENT_LOOP] EVENT RECEIVED: {:?}",
            std::mem::discriminant(&event)
        );
        handle_events(&ctx, event).await?;
    }

    tracing::info!("[EVENT_LOOP] Stopped");
    Ok(())
}

async fn handle_events(ctx: &PipelineContext, event: AppEvent) -> anyhow::Result<()> {
    match event {
        AppEvent::Capture(request) => {
            // Captures run one at a time, so one recognition is in flight at most
            handle_capture(ctx, request).await?;
        }
        AppEvent::Translate { text } => {
            handle_translate(ctx, text).await?;
        }
        AppEvent::RecognitionStarted
        | AppEvent::ShowRecognized { .. }
        | AppEvent::ShowTranslation { .. }
        | AppEvent::ScanCancelled
        | AppEvent::ShowFailure(_) => {
            // UI-only events, ignore in backend
        }
    }

    Ok(())
}
