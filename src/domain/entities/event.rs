use uuid::Uuid;

/// Where a message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Friend,
    Group,
}

/// A normalized inbound message event.
///
/// Produced by the transport adapter for every incoming message; read-only
/// to the command services. The id only exists for log correlation.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub id: Uuid,
    pub kind: EventKind,
    pub sender_id: i64,
    pub group_id: Option<i64>,
    pub text: String,
}

impl InboundEvent {
    pub fn friend(sender_id: i64, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: EventKind::Friend,
            sender_id,
            group_id: None,
            text: text.into(),
        }
    }

    pub fn group(sender_id: i64, group_id: i64, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: EventKind::Group,
            sender_id,
            group_id: Some(group_id),
            text: text.into(),
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind == EventKind::Group
    }
}
