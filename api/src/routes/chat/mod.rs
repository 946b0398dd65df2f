pub mod chat_request;
pub mod send_message_route;
pub mod start_session_route;
