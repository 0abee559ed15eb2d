//! Scheduled switch - `/setopen HH:MM-HH:MM` sets a daily service window

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::errors::{BotError, ServiceError};
use crate::domain::entities::{EventKind, InboundEvent, Message, ScheduleWindow};
use crate::domain::traits::Transport;
use crate::infrastructure::scheduler::{ScheduleSignal, Scheduler};

use super::registry::{Directive, ServiceState};

const USAGE: &str = "Invalid command. Usage: /setopen HH:MM-HH:MM";

static SETOPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/setopen\s+(\S+)").unwrap());

/// Registers one daily open trigger and one daily close trigger per window.
/// A new window replaces all previously registered triggers.
pub struct ScheduledSwitch {
    state: ServiceState,
    admins: Arc<HashSet<i64>>,
    scheduler: Scheduler,
}

impl ScheduledSwitch {
    pub fn new(admins: Arc<HashSet<i64>>, scheduler: Scheduler) -> Self {
        Self {
            state: ServiceState::Open,
            admins,
            scheduler,
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn open(&mut self) {
        self.state = ServiceState::Open;
    }

    pub fn close(&mut self) {
        self.state = ServiceState::Closed;
    }

    /// Number of currently registered triggers
    pub fn trigger_count(&self) -> usize {
        self.scheduler.active_triggers()
    }

    pub async fn handle<T: Transport>(
        &mut self,
        event: &InboundEvent,
        transport: &T,
    ) -> Result<Option<Directive>, BotError> {
        if event.kind != EventKind::Friend {
            return Ok(None);
        }
        if !self.admins.contains(&event.sender_id) {
            tracing::debug!(sender = event.sender_id, "ignoring /setopen from non-admin");
            return Ok(None);
        }

        let parsed = SETOPEN_RE
            .captures(event.text.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| {
                ServiceError::InvalidSyntax(
                    "no start/end time matched, expected HH:MM-HH:MM".to_string(),
                )
            })
            .and_then(|arg| arg.parse::<ScheduleWindow>());

        let window = match parsed {
            Ok(window) => window,
            Err(e) => {
                transport
                    .send_to_friend(
                        event.sender_id,
                        &Message::from_text(format!("{}\nerror: {}", USAGE, e)),
                    )
                    .await?;
                return Ok(None);
            }
        };

        self.scheduler.clear_all();
        self.scheduler
            .schedule_daily(window.start, ScheduleSignal::Open)?;
        self.scheduler
            .schedule_daily(window.end, ScheduleSignal::Close)?;
        tracing::info!(window = %window, "daily service window registered");

        transport
            .send_to_friend(
                event.sender_id,
                &Message::from_text(format!("Service window set: {}", window)),
            )
            .await?;
        Ok(None)
    }
}
