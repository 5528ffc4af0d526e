//! Streaming coach chat over WebSocket
//!
//! Clients connect to `/api/v1/chat/ws?token=<session token>` (or send the
//! usual `Authorization: Bearer` header) and exchange JSON messages tagged by
//! `type`:
//!
//! - `send { text }`: the reply arrives as `chunk` messages followed by one
//!   `done` carrying the finished transcript entry
//! - `history`: the current transcript
//! - `reset`: drop the session and start over
//! - `ping`: answered with `pong`
//!
//! ## Example
//!
//! ```javascript
//! // Browser
//! const ws = new WebSocket('ws://localhost:8090/api/v1/chat/ws?token=' + token);
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'send', text: 'Give me a 20 minute workout'}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'chunk') output.textContent += msg.text;
//! };
//! ```

mod handler;
mod messages;

pub use handler::chat_ws_handler;
pub use messages::{ClientMessage, ServerMessage};
