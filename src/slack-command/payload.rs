use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fields Slack posts for a slash command. Absent fields are empty strings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandPayload {
    pub token: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
    pub user_id: String,
    pub user_name: String,
    pub team_id: String,
    pub team_domain: String,
    pub channel_name: String,
}

type Slot = fn(&mut CommandPayload) -> &mut String;

/// Form key to payload slot. New fields go here.
pub const FIELDS: [(&str, Slot); 10] = [
    ("token", |p| &mut p.token),
    ("command", |p| &mut p.command),
    ("text", |p| &mut p.text),
    ("response_url", |p| &mut p.response_url),
    ("trigger_id", |p| &mut p.trigger_id),
    ("user_id", |p| &mut p.user_id),
    ("user_name", |p| &mut p.user_name),
    ("team_id", |p| &mut p.team_id),
    ("team_domain", |p| &mut p.team_domain),
    ("channel_name", |p| &mut p.channel_name),
];

/// Parse a url-encoded form body into a [`CommandPayload`].
///
/// Unknown keys are ignored; for repeated keys the first value wins.
pub fn extract(body: &[u8]) -> CommandPayload {
    let pairs: Vec<(String, String)> = match serde_urlencoded::from_bytes(body) {
        Ok(pairs) => pairs,
        Err(e) => {
            debug!(error = %e, "slack_payload_unparsable");
            Vec::new()
        }
    };

    let mut payload = CommandPayload::default();
    for (key, slot) in FIELDS {
        if let Some((_, value)) = pairs.iter().find(|(k, _)| k == key) {
            *slot(&mut payload) = value.clone();
        }
    }
    payload
}
