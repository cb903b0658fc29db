use scanlate_ocr::{Acquisition, acquire, normalize, recognize_page};
use scanlate_types::{AppEvent, FailureKind, FailureNotice, ScanRequest};
use uuid::Uuid;

use crate::context::PipelineContext;

/// Acquire one page, normalize it, recognize it and hand the text to the UI.
///
/// Emits `ScanCancelled`, a single `ShowFailure(AcquisitionFailed)`, or
/// `RecognitionStarted` followed by exactly one `ShowRecognized` (preceded by
/// `ShowFailure(RecognitionFailed)` when the engine stopped early).
pub async fn handle_capture(ctx: &PipelineContext, request: ScanRequest) -> anyhow::Result<()> {
    let request_id = Uuid::new_v4();
    let tx = &ctx.event_tx;
    tracing::info!("[CAPTURE {}] Scan requested", request_id);

    let scanner = ctx.services.scanner.clone();
    let acquired = tokio::task::spawn_blocking(move || {
        acquire(scanner.as_ref(), &request).map(|acquisition| match acquisition {
            Acquisition::Page(page) => Acquisition::Page(normalize(page)),
            Acquisition::Cancelled => Acquisition::Cancelled,
        })
    })
    .await;

    let page = match acquired {
        Ok(Ok(Acquisition::Page(page))) => page,
        Ok(Ok(Acquisition::Cancelled)) => {
            tracing::info!("[CAPTURE {}] Scan cancelled", request_id);
            tx.send(AppEvent::ScanCancelled).await?;
            return Ok(());
        }
        Ok(Err(e)) => {
            tracing::error!("[CAPTURE {}] Acquisition failed: {}", request_id, e);
            let notice = FailureNotice::new(FailureKind::AcquisitionFailed, e.to_string());
            tx.send(AppEvent::ShowFailure(notice)).await?;
            return Ok(());
        }
        Err(e) => {
            tracing::error!("[CAPTURE {}] Acquisition task error: {}", request_id, e);
            let notice = FailureNotice::new(FailureKind::AcquisitionFailed, e.to_string());
            tx.send(AppEvent::ShowFailure(notice)).await?;
            return Ok(());
        }
    };

    tx.send(AppEvent::RecognitionStarted).await?;

    let recognizer = ctx.services.recognizer.clone();
    let options = ctx.recognition_options();
    tracing::debug!(
        "[CAPTURE {}] Recognizing {}x{} page with {}",
        request_id,
        page.width(),
        page.height(),
        recognizer.name()
    );

    let report = tokio::task::spawn_blocking(move || {
        recognize_page(recognizer.as_ref(), &page, &options)
    })
    .await;

    let (lines, failure) = match report {
        Ok(report) => (report.lines, report.error.map(|e| e.to_string())),
        Err(e) => (Vec::new(), Some(format!("recognition task error: {}", e))),
    };

    if let Some(message) = failure {
        let notice = FailureNotice::new(FailureKind::RecognitionFailed, message);
        tx.send(AppEvent::ShowFailure(notice)).await?;
    }

    let text = scanlate_ocr::join_lines(&lines);
    tracing::info!(
        "[CAPTURE {}] Recognized {} lines ({} chars)",
        request_id,
        lines.len(),
        text.chars().count()
    );
    tx.send(AppEvent::ShowRecognized { text, lines }).await?;

    Ok(())
}
