use lambda_http::http::StatusCode;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::Serialize;
use slack_command::{
    build_reply, CommandPayload, RequestSnapshot, Settings, Slack, IN_CHANNEL, TIMESTAMP_HEADER,
};
use tracing::{error, info};

const ACK_TEXT: &str = "Command received, processing... ⏳";

#[derive(Debug, Serialize)]
struct SqsMessage {
    command: CommandPayload,
    timestamp: String,
    enqueued_at: chrono::DateTime<chrono::Utc>,
}

async fn function_handler(
    slack: &Slack,
    sqs_client: &aws_sdk_sqs::Client,
    queue_url: &str,
    event: Request,
) -> Result<Response<Body>, Error> {
    let request = RequestSnapshot::from_request(event);

    let command = match slack.parse_command(&request) {
        Ok(command) => command,
        Err(e) => return rejection(&e),
    };

    info!(
        command = %command.command,
        user_id = %command.user_id,
        team_id = %command.team_id,
        "slack_command_received"
    );

    let sqs_message = SqsMessage {
        command,
        timestamp: request.header_str(TIMESTAMP_HEADER).to_string(),
        enqueued_at: chrono::Utc::now(),
    };
    send_to_sqs(sqs_client, queue_url, &sqs_message).await?;

    // Immediate acknowledgement; the processor answers via response_url
    acknowledgement()
}

/// 401 for requests that fail verification, 500 for everything else.
fn rejection(err: &slack_command::Error) -> Result<Response<Body>, Error> {
    let (status, text) = if err.is_verification() {
        (StatusCode::UNAUTHORIZED, "Unauthorized")
    } else {
        error!(error = %err, "slack_command_rejected");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    };
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Body::from(text))?)
}

fn acknowledgement() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Body::from(build_reply(IN_CHANNEL, ACK_TEXT)?))?)
}

async fn send_to_sqs(
    sqs_client: &aws_sdk_sqs::Client,
    queue_url: &str,
    message: &SqsMessage,
) -> Result<(), Error> {
    let message_body = serde_json::to_string(message)?;

    sqs_client
        .send_message()
        .queue_url(queue_url)
        .message_body(message_body)
        .send()
        .await?;

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
    let queue_url = std::env::var("SQS_QUEUE_URL")?;

    let config = aws_config::load_from_env().await;
    let sqs_client = aws_sdk_sqs::Client::new(&config);

    let slack = &slack;
    let sqs_client = &sqs_client;
    let queue_url = queue_url.as_str();
    run(service_fn(move |event: Request| async move {
        function_handler(slack, sqs_client, queue_url, event).await
    }))
    .await
}
