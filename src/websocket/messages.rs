//! WebSocket Message Types
//!
//! Messages exchanged between a chat client and the server.

use crate::models::ChatMessage;
use serde::{Deserialize, Serialize};

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Send a chat message and stream the reply
    Send { text: String },
    /// Ask for the transcript
    History,
    /// Drop the session
    Reset,
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected {
        /// Chat session identifier
        session_id: String,
        /// Transcript so far, greeting first
        messages: Vec<ChatMessage>,
    },
    /// Fragment of the reply being streamed
    Chunk { text: String },
    /// Reply finished; this is what the transcript now holds
    Done { message: ChatMessage },
    Transcript { messages: Vec<ChatMessage> },
    /// Session dropped
    Cleared,
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize_send() {
        let json = r#"{"type": "send", "text": "Leg day ideas?"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Send { text } => assert_eq!(text, "Leg day ideas?"),
            _ => panic!("Expected Send"),
        }
    }

    #[test]
    fn test_client_message_deserialize_unit_variants() {
        let ping: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(ping, ClientMessage::Ping));
        let reset: ClientMessage = serde_json::from_str(r#"{"type": "reset"}"#).unwrap();
        assert!(matches!(reset, ClientMessage::Reset));
    }

    #[test]
    fn test_server_message_serialize_chunk() {
        let json = serde_json::to_string(&ServerMessage::Chunk {
            text: "Squats ".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"chunk","text":"Squats "}"#);
    }

    #[test]
    fn test_server_message_serialize_done() {
        let msg = ServerMessage::Done {
            message: ChatMessage::ai("All set"),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"done\""));
        assert!(json.contains("\"sender\":\"ai\""));
    }
}
