use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::frontend_buffer::FrontendEvent;

/// Response payload for POST /session.
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    /// Id to address the new session with.
    pub session_id: Uuid,
    /// Setup messages emitted during initialization.
    pub events: Vec<FrontendEvent>,
}

/// Request payload for POST /session/{id}/message.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// The user's message text.
    pub message: String,
}

/// Response payload for POST /session/{id}/message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Messages and surviving status indicators, in delivery order.
    pub events: Vec<FrontendEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_request_deserializes() {
        let req: MessageRequest =
            serde_json::from_str(r#"{"message":"Who is Paul Allen?"}"#).unwrap();
        assert_eq!(req.message, "Who is Paul Allen?");
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let resp = MessageResponse {
            events: vec![FrontendEvent::Message {
                content: "hi".into(),
            }],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["events"][0]["kind"], "message");
        assert_eq!(json["events"][0]["content"], "hi");
    }
}
