//! WebSocket client session management.

use futures_util::{Sink, SinkExt, StreamExt};
use hiroba_server::infrastructure::dto::websocket::{ChatMessage, MessageType};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    command::InputCommand, domain::MembershipState, error::ClientError,
    formatter::MessageFormatter,
};

use super::ui::redisplay_prompt;

/// Participant identity used for every connection attempt
#[derive(Debug, Clone)]
pub struct Identity {
    pub participant_id: String,
    pub name: String,
}

/// Run one connection until the user quits or the connection is lost.
///
/// `input_rx` yields prompt lines; it outlives the connection so that a
/// reconnect keeps using the same prompt.
pub async fn run_client_session(
    url: &str,
    identity: &Identity,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    tracing::info!("Connected to {}", url);

    let (mut write, mut read) = ws_stream.split();
    let join = ChatMessage::from_client(
        MessageType::Join,
        &identity.participant_id,
        &identity.name,
        "",
    );
    send_frame(&mut write, &join).await?;
    print!("{}", MessageFormatter::format_welcome(&identity.name));
    redisplay_prompt(&identity.name);

    let mut membership = MembershipState::new(&identity.participant_id);

    loop {
        tokio::select! {
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ChatMessage>(text.as_str()) {
                        Ok(message) => {
                            membership.observe(&message);
                            print!(
                                "{}",
                                MessageFormatter::format_message(&message, &identity.participant_id)
                            );
                        }
                        Err(_) => print!("{}", MessageFormatter::format_raw_message(text.as_str())),
                    }
                    redisplay_prompt(&identity.name);
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(membership.close_error());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(membership.close_error());
                }
            },
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // The prompt is gone (Ctrl+C / Ctrl+D); leave like /quit.
                    return leave(&mut write, identity).await;
                };
                match InputCommand::parse(&line) {
                    Some(InputCommand::Say(content)) => {
                        let frame = ChatMessage::from_client(
                            MessageType::Text,
                            &identity.participant_id,
                            &identity.name,
                            &content,
                        );
                        send_frame(&mut write, &frame).await?;
                    }
                    Some(InputCommand::Quit) => return leave(&mut write, identity).await,
                    Some(InputCommand::Help) => {
                        print!("{}", MessageFormatter::format_help());
                        redisplay_prompt(&identity.name);
                    }
                    Some(InputCommand::Unknown(command)) => {
                        print!("{}", MessageFormatter::format_unknown_command(&command));
                        redisplay_prompt(&identity.name);
                    }
                    None => redisplay_prompt(&identity.name),
                }
            }
        }
    }
}

async fn send_frame<S>(write: &mut S, frame: &ChatMessage) -> Result<(), ClientError>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let json =
        serde_json::to_string(frame).map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}

/// Send an explicit Leave and close the socket
async fn leave<S>(write: &mut S, identity: &Identity) -> Result<(), ClientError>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let frame = ChatMessage::from_client(MessageType::Leave, &identity.participant_id, "", "");
    if let Err(e) = send_frame(write, &frame).await {
        tracing::debug!("Could not send leave: {}", e);
    }
    write.close().await.ok();
    println!();
    tracing::info!("Left the room");
    Ok(())
}
