//! Inbound frame dispatch: parse, validate, classify.

use tracing::debug;

use parley_core::{replies, ClientFrame, ServerFrame};

/// What the session loop should do with one inbound text frame.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Send a frame back immediately, no provider involved.
    Reply(ServerFrame),
    /// Relay the validated question to the answer source.
    Relay {
        /// Trimmed, non-empty question text.
        question: String,
    },
    /// Nothing to do (malformed or unrecognized frame).
    Ignore,
}

/// Classify one inbound text payload.
///
/// Malformed JSON and unknown events are ignored rather than answered,
/// matching how unrecognized events fall through an event emitter.
/// Whitespace-only questions get the invalid-question warning as a
/// regular answer frame.
pub fn dispatch(client_id: &str, text: &str) -> Dispatch {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!(client_id = %client_id, error = %e, "ignoring unparseable frame");
            return Dispatch::Ignore;
        }
    };

    match frame {
        ClientFrame::AskQuestion(raw) => {
            let question = raw.trim();
            if question.is_empty() {
                Dispatch::Reply(ServerFrame::Answer(replies::INVALID_QUESTION.into()))
            } else {
                Dispatch::Relay {
                    question: question.to_string(),
                }
            }
        }
    }
}
