use scanlate_types::{AppEvent, FailureKind, FailureNotice};
use uuid::Uuid;

use crate::context::PipelineContext;

/// Start a translation of `text` into the configured target language.
///
/// The request runs as its own task; it ends with exactly one
/// `ShowTranslation` or `ShowFailure(TranslationFailed)`.
pub async fn handle_translate(ctx: &PipelineContext, text: String) -> anyhow::Result<()> {
    let request_id = Uuid::new_v4();

    let Some(translator) = ctx.services.translator.clone() else {
        tracing::warn!("[TRANSLATE {}] No translator configured", request_id);
        let notice = FailureNotice::new(FailureKind::TranslationFailed, "translator not configured");
        ctx.event_tx.send(AppEvent::ShowFailure(notice)).await?;
        return Ok(());
    };

    let from = ctx.config.translator.from_lang.clone();
    let to = ctx.config.translator.to_lang.clone();
    let tx = ctx.event_tx.clone();
    tracing::info!(
        "[TRANSLATE {}] {} chars via {} into '{}'",
        request_id,
        text.chars().count(),
        translator.metadata().name,
        to
    );

    tokio::spawn(async move {
        let event = match translator.translate(&text, from, to).await {
            Ok(translation) => {
                tracing::info!(
                    "[TRANSLATE {}] Done ({} chars)",
                    request_id,
                    translation.text.chars().count()
                );
                AppEvent::ShowTranslation {
                    text: translation.text,
                    from_lang: translation.from,
                    to_lang: translation.to,
                }
            }
            Err(e) => {
                tracing::warn!("[TRANSLATE {}] Failed: {}", request_id, e);
                AppEvent::ShowFailure(FailureNotice::new(
                    FailureKind::TranslationFailed,
                    e.to_string(),
                ))
            }
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!("[TRANSLATE {}] UI gone before result: {}", request_id, e);
        }
    });

    Ok(())
}
