use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

/// Domain events emitted by the services. Consumed by an in-process logging
/// task; the channel keeps event handling off the request path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ItemCreated {
        item_id: String,
    },
    ItemUpdated {
        item_id: String,
    },
    ItemDeleted {
        item_id: String,
    },
    ItemCheckedOut {
        item_id: String,
        user_id: Option<String>,
    },
    ItemCheckedIn {
        item_id: String,
        user_id: Option<String>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ItemCreated { .. } => "item.created",
            Event::ItemUpdated { .. } => "item.updated",
            Event::ItemDeleted { .. } => "item.deleted",
            Event::ItemCheckedOut { .. } => "item.checked_out",
            Event::ItemCheckedIn { .. } => "item.checked_in",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Runs until every sender has
/// been dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(event = event.name(), payload = ?event, "domain event");
    }
    info!("Event channel closed; event processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sender_delivers_events() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        sender
            .send(Event::ItemCreated {
                item_id: "T-1".into(),
            })
            .await
            .expect("send");

        match rx.recv().await {
            Some(Event::ItemCreated { item_id }) => assert_eq!(item_id, "T-1"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn event_names() {
        let ev = Event::ItemCheckedOut {
            item_id: "T-1".into(),
            user_id: None,
        };
        assert_eq!(ev.name(), "item.checked_out");
    }
}
