use tokio::sync::mpsc;

use crate::common::{ChatMessage, MessageKind, Peer, SessionCommand, SessionEvent};
use crate::protocol::{BroadcastBus, ChatSession};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const ASSISTANT_NAME: &str = "Gemini";
/// Số tin gần nhất đưa vào prompt làm ngữ cảnh.
const CONTEXT_WINDOW: usize = 10;
const HISTORY_LIMIT: usize = 50;
const FALLBACK_REPLY: &str = "Sorry, I'm having trouble connecting to my brain right now.";

/// Chạy peer trợ lý như một phiên hoàn toàn bình thường trên cùng medium —
/// với giao thức, nó không khác gì một người dùng gửi CHAT.
pub fn spawn(bus: &BroadcastBus, model: String) {
    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            log::warn!("GEMINI_API_KEY not set; assistant peer disabled");
            return;
        }
    };

    let identity = Peer::new(ASSISTANT_NAME);
    let (command_sender, command_receiver) = mpsc::channel(100);
    let (event_sender, event_receiver) = mpsc::channel(100);

    let session = ChatSession::new(identity.clone(), bus, event_sender, command_receiver);
    tokio::spawn(async move {
        if let Err(err) = session.run().await {
            log::error!("Assistant session terminated: {err}");
        }
    });
    tokio::spawn(run_responder(identity, model, api_key, command_sender, event_receiver));
    log::info!("Assistant peer `{ASSISTANT_NAME}` joined");
}

async fn run_responder(
    identity: Peer,
    model: String,
    api_key: String,
    commands: mpsc::Sender<SessionCommand>,
    mut events: mpsc::Receiver<SessionEvent>,
) {
    let http = reqwest::Client::new();
    let mut history: Vec<ChatMessage> = Vec::new();

    while let Some(event) = events.recv().await {
        let SessionEvent::MessageAppended(message) = event else {
            continue;
        };
        if message.kind != MessageKind::Text {
            continue;
        }

        history.push(message.clone());
        if history.len() > HISTORY_LIMIT {
            history.remove(0);
        }

        if message.sender_id == identity.id || !mentions_assistant(&message.content) {
            continue;
        }

        let reply = match generate_reply(&http, &model, &api_key, &history, &message).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                log::warn!("Gemini returned an empty reply");
                FALLBACK_REPLY.to_string()
            }
            Err(err) => {
                log::warn!("Gemini API error: {err}");
                FALLBACK_REPLY.to_string()
            }
        };

        if commands.send(SessionCommand::SendChat(reply)).await.is_err() {
            break;
        }
    }
}

fn mentions_assistant(content: &str) -> bool {
    content
        .to_lowercase()
        .contains(&format!("@{}", ASSISTANT_NAME.to_lowercase()))
}

fn build_prompt(history: &[ChatMessage], message: &ChatMessage) -> String {
    let context = history
        .iter()
        .rev()
        .take(CONTEXT_WINDOW)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(|entry| format!("{}: {}", entry.sender_name, entry.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are participating in a group chat.\n\
         Context of the last few messages:\n{context}\n\n\
         User says: \"{}\"\n\n\
         Reply naturally, concisely, and helpfully as a chat participant. \
         Do not repeat the user's name excessively.",
        message.content
    )
}

async fn generate_reply(
    http: &reqwest::Client,
    model: &str,
    api_key: &str,
    history: &[ChatMessage],
    message: &ChatMessage,
) -> Result<String, reqwest::Error> {
    let url = format!("{GEMINI_ENDPOINT}/{model}:generateContent?key={api_key}");
    let body = serde_json::json!({
        "contents": [{ "parts": [{ "text": build_prompt(history, message) }] }]
    });

    let response = http.post(&url).json(&body).send().await?.error_for_status()?;
    let value: serde_json::Value = response.json().await?;
    let text = value["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .trim()
        .to_string();
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str, content: &str) -> ChatMessage {
        ChatMessage::text(&Peer::new(name), content)
    }

    #[test]
    fn only_explicit_mentions_trigger_a_reply() {
        assert!(mentions_assistant("hey @gemini, what time is it?"));
        assert!(mentions_assistant("@GEMINI hello"));
        assert!(!mentions_assistant("talking about gemini the constellation"));
        assert!(!mentions_assistant("hello everyone"));
    }

    #[test]
    fn prompt_keeps_only_the_most_recent_context_in_order() {
        let history: Vec<_> = (0..15)
            .map(|i| message("Alice", &format!("msg-{i}")))
            .collect();
        let prompt = build_prompt(&history, &message("Bob", "@gemini ping"));

        assert!(!prompt.contains("msg-4"));
        assert!(prompt.contains("msg-5"));
        assert!(prompt.contains("msg-14"));
        // Thứ tự thời gian được giữ nguyên
        let older = prompt.find("msg-5").unwrap();
        let newer = prompt.find("msg-14").unwrap();
        assert!(older < newer);
        assert!(prompt.contains("User says: \"@gemini ping\""));
    }
}
