//! process command - handle one SNS delivery or raw message

use super::CommandContext;
use anyhow::{Context, Result};
use s3events_core::config::InputFormat;
use s3events_handler::{BatchReport, EventHandler, EventSink, SnsEvent};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;

pub async fn execute(ctx: &CommandContext, file: Option<&Path>) -> Result<()> {
    let document = read_document(file).await?;
    let format = ctx.config.handler.input_format;

    debug!("Processing {} byte(s) as {:?} input", document.len(), format);

    let mut handler = ctx.handler();
    let report = handle_document(&mut handler, &document, format)?;
    ctx.summary(&report);

    Ok(())
}

async fn read_document(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut document = String::new();
            tokio::io::stdin()
                .read_to_string(&mut document)
                .await
                .context("Failed to read stdin")?;
            Ok(document)
        }
    }
}

/// Run a whole document through the handler
pub fn handle_document<S: EventSink>(
    handler: &mut EventHandler<S>,
    document: &str,
    format: InputFormat,
) -> Result<BatchReport> {
    let report = match format {
        InputFormat::Sns => {
            let event = SnsEvent::from_json(document)?;
            handler.handle_sns_event(&event)?
        }
        InputFormat::Raw => {
            handler.handle_message(document.trim_end_matches(&['\r', '\n'][..]))?
        }
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3events_handler::{FailurePolicy, MemorySink};
    use std::io::Write;

    const S3_MESSAGE: &str = r#"{"Records":[{"eventName":"ObjectCreated:Put","s3":{"bucket":{"name":"my-bucket"},"object":{"key":"uploads/foo.jpg"}}}]}"#;

    #[tokio::test]
    async fn test_process_sns_file() {
        let delivery = sns_delivery(&[S3_MESSAGE, "not-a-json"]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(delivery.as_bytes()).unwrap();

        let document = read_document(Some(file.path())).await.unwrap();
        let mut handler = EventHandler::new(MemorySink::new());
        let report = handle_document(&mut handler, &document, InputFormat::Sns).unwrap();

        assert_eq!(report.messages, 2);
        assert_eq!(report.emitted, 2);
        let payloads = handler.sink().payloads();
        assert!(payloads[0].contains(r#""aggregate_id":"my-bucket:uploads/foo.jpg""#));
        assert!(payloads[1].contains(r#""event_type":"Unknown""#));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = read_document(Some(Path::new("/nonexistent/delivery.json")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_raw_document_strips_trailing_newline() {
        let mut handler = EventHandler::new(MemorySink::new());
        handle_document(&mut handler, "not-a-json\n", InputFormat::Raw).unwrap();

        let payload = &handler.sink().payloads()[0];
        assert!(payload.contains(r#""raw":"not-a-json""#));
    }

    #[test]
    fn test_invalid_sns_document_is_an_error() {
        let mut handler = EventHandler::new(MemorySink::new());
        assert!(handle_document(&mut handler, "not-a-json", InputFormat::Sns).is_err());
        assert!(handler.sink().is_empty());
    }

    #[test]
    fn test_surface_policy_fails_command() {
        let mut handler =
            EventHandler::new(MemorySink::new()).with_failure_policy(FailurePolicy::Surface);
        let err = handle_document(&mut handler, "not-a-json", InputFormat::Raw).unwrap_err();
        assert!(err.to_string().contains("1 unparsable"));
        assert_eq!(handler.sink().len(), 1);
    }

    fn sns_delivery(messages: &[&str]) -> String {
        let event = SnsEvent::wrap(messages.iter().copied());
        serde_json::to_string(&event).unwrap()
    }
}
