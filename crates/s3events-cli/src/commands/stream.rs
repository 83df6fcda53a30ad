//! stream command - handle stdin line by line

use super::CommandContext;
use anyhow::{Context, Result};
use s3events_core::config::FailurePolicy;
use s3events_handler::{BatchReport, EventHandler, EventSink};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::error;

pub async fn execute(ctx: &CommandContext) -> Result<()> {
    let policy = ctx.config.handler.failure_policy;
    let mut handler = ctx.handler();
    let reader = BufReader::new(tokio::io::stdin());

    let (total, failed_lines) = stream_lines(&mut handler, policy, reader).await?;
    ctx.summary(&total);

    if !failed_lines.is_empty() {
        anyhow::bail!("{} message(s) failed", failed_lines.len());
    }
    Ok(())
}

/// Handle every line as its own invocation.
///
/// Returns the combined report and the 1-based numbers of the lines whose
/// report failed under `policy`.
async fn stream_lines<S, R>(
    handler: &mut EventHandler<S>,
    policy: FailurePolicy,
    reader: R,
) -> Result<(BatchReport, Vec<usize>)>
where
    S: EventSink,
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut total = BatchReport::default();
    let mut failed_lines = Vec::new();
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        line_number += 1;
        let Some(message) = message_from_line(&line) else {
            continue;
        };

        let report = handler.process_batch(std::iter::once(message));
        total.merge(report);
        if let Err(e) = report.into_result(policy) {
            error!("Line {}: {}", line_number, e);
            failed_lines.push(line_number);
        }
    }

    Ok((total, failed_lines))
}

/// Strip the line terminator; blank lines carry no message
fn message_from_line(line: &str) -> Option<&str> {
    let message = line.trim_end_matches('\r');
    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3events_handler::MemorySink;

    #[test]
    fn test_message_from_line() {
        assert_eq!(message_from_line("{\"Records\":[]}\r"), Some("{\"Records\":[]}"));
        assert_eq!(message_from_line("not-a-json"), Some("not-a-json"));
        assert_eq!(message_from_line(""), None);
        assert_eq!(message_from_line("   \r"), None);
    }

    #[tokio::test]
    async fn test_failed_lines_count_blank_lines() {
        let input = concat!(
            r#"{"Records":[{"eventName":"ObjectCreated:Put","s3":{"bucket":{"name":"b"},"object":{"key":"k"}}}]}"#,
            "\n\n\r\n",
            "not-a-json\n",
        );
        let mut handler = EventHandler::new(MemorySink::new());

        let (total, failed) = stream_lines(&mut handler, FailurePolicy::Surface, input.as_bytes())
            .await
            .unwrap();
        assert_eq!(failed, [4]);
        assert_eq!(total.messages, 2);
        assert_eq!(total.emitted, 2);
        assert_eq!(total.fallbacks, 1);
        assert_eq!(handler.sink().len(), 2);
    }

    #[tokio::test]
    async fn test_best_effort_reports_no_failed_lines() {
        let mut handler = EventHandler::new(MemorySink::new());
        let (total, failed) =
            stream_lines(&mut handler, FailurePolicy::BestEffort, "not-a-json\n".as_bytes())
                .await
                .unwrap();
        assert!(failed.is_empty());
        assert_eq!(total.fallbacks, 1);
    }
}
