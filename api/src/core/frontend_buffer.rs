//! Buffering front-end: collects controller output into an ordered event
//! list returned in the HTTP response.
//!
//! Status updates mutate their entry in place; removed statuses disappear
//! from the final list, so a discarded "Thinking..." never reaches the
//! client.

use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::future::Future;

use chat_session::{ChatFrontend, StatusId};
use serde::Serialize;

/// One displayable event for the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrontendEvent {
    /// A regular chat message.
    Message {
        content: String,
    },
    /// A status indicator that was still visible at the end of the turn.
    Status {
        content: String,
    },
}

struct Entry {
    status_id: Option<StatusId>,
    content: String,
}

/// [`ChatFrontend`] implementation backed by an in-memory buffer.
#[derive(Default)]
pub struct BufferingFrontend {
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicU64,
}

impl BufferingFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains the buffer into client-facing events, in delivery order.
    pub fn into_events(self) -> Vec<FrontendEvent> {
        self.entries
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .into_iter()
            .map(|e| match e.status_id {
                None => FrontendEvent::Message { content: e.content },
                Some(_) => FrontendEvent::Status { content: e.content },
            })
            .collect()
    }
}

impl ChatFrontend for BufferingFrontend {
    fn send<'a>(&'a self, content: &'a str) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Entry {
                status_id: None,
                content: content.to_string(),
            });
        }
        Box::pin(async {})
    }

    fn send_status<'a>(
        &'a self,
        content: &'a str,
    ) -> Pin<Box<dyn Future<Output = StatusId> + Send + 'a>> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Entry {
                status_id: Some(id),
                content: content.to_string(),
            });
        }
        Box::pin(async move { id })
    }

    fn update_status<'a>(
        &'a self,
        id: StatusId,
        content: &'a str,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        if let Ok(mut entries) = self.entries.lock() {
            if let Some(e) = entries.iter_mut().find(|e| e.status_id == Some(id)) {
                e.content = content.to_string();
            }
        }
        Box::pin(async {})
    }

    fn remove_status<'a>(
        &'a self,
        id: StatusId,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|e| e.status_id != Some(id));
        }
        Box::pin(async {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn removed_status_never_reaches_the_client() {
        let frontend = BufferingFrontend::new();
        let id = frontend.send_status("Thinking...").await;
        frontend.send("the answer").await;
        frontend.remove_status(id).await;

        let events = frontend.into_events();
        assert_eq!(
            events,
            vec![FrontendEvent::Message {
                content: "the answer".into()
            }]
        );
    }

    #[tokio::test]
    async fn updated_status_keeps_its_position() {
        let frontend = BufferingFrontend::new();
        frontend.send("first").await;
        let id = frontend.send_status("Thinking...").await;
        frontend.update_status(id, "Error: restart the chat").await;

        let events = frontend.into_events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            FrontendEvent::Status {
                content: "Error: restart the chat".into()
            }
        );
    }

    #[tokio::test]
    async fn messages_keep_delivery_order() {
        let frontend = BufferingFrontend::new();
        frontend.send("a").await;
        frontend.send("b").await;

        let events = frontend.into_events();
        assert_eq!(
            events,
            vec![
                FrontendEvent::Message { content: "a".into() },
                FrontendEvent::Message { content: "b".into() },
            ]
        );
    }
}
