use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use slack_command::{CommandPayload, Settings, Slack, EPHEMERAL, IN_CHANNEL};
use tracing::{error, info, warn};

#[derive(Debug, Deserialize)]
struct SqsMessage {
    command: CommandPayload,
    timestamp: String,
    enqueued_at: chrono::DateTime<chrono::Utc>,
}

/// Reply text and visibility for a command.
fn render_reply(command: &CommandPayload) -> (&'static str, String) {
    match command.command.as_str() {
        "/echo" if command.text.trim().is_empty() => {
            (EPHEMERAL, "Usage: /echo <text>".to_string())
        }
        "/echo" => (IN_CHANNEL, format!("<@{}> {}", command.user_id, command.text)),
        other => (EPHEMERAL, format!("Unknown command: {}", other)),
    }
}

async fn function_handler(slack: &Slack, event: LambdaEvent<SqsEvent>) -> Result<(), Error> {
    // Process each SQS message
    for record in event.payload.records {
        let Some(body) = record.body else {
            warn!(message_id = ?record.message_id, "sqs_record_without_body");
            continue;
        };

        let sqs_message: SqsMessage = serde_json::from_str(&body)?;
        let command = sqs_message.command;
        info!(
            command = %command.command,
            slack_timestamp = %sqs_message.timestamp,
            queued_ms = (chrono::Utc::now() - sqs_message.enqueued_at).num_milliseconds(),
            "slack_command_dequeued"
        );

        let (response_type, text) = render_reply(&command);

        // Send delayed response to Slack; failures are logged, never retried
        if let Err(e) = slack.reply_later(&command, response_type, &text).await {
            error!(error = %e, command = %command.command, "slack_deferred_reply_failed");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    let settings = Settings::from_env()?;
    let slack = Slack::from_settings(&settings)?;

    let slack = &slack;
    run(service_fn(move |event: LambdaEvent<SqsEvent>| async move {
        function_handler(slack, event).await
    }))
    .await
}
