/// Kind of an inbound pub/sub message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Acknowledgement of a (p)subscribe request, one per pattern
    Subscription,
    /// Payload published on a channel matching the pattern
    Data,
}

/// Raw message as delivered by the pub/sub transport. Consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub kind: MessageKind,
    /// Channel the payload was published on, or the confirmed pattern
    pub channel: String,
    pub payload: Vec<u8>,
}

impl NotificationMessage {
    pub fn data(
        channel: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            kind: MessageKind::Data,
            channel: channel.into(),
            payload: payload.into(),
        }
    }

    pub fn subscription(pattern: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Subscription,
            channel: pattern.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_data(&self) -> bool {
        self.kind == MessageKind::Data
    }
}
