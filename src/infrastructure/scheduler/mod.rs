//! Daily trigger scheduler - thin facade over cron-style time-of-day triggers

use std::str::FromStr;

use chrono::Local;
use cron::Schedule;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::application::errors::BotError;
use crate::domain::entities::TimeOfDay;

/// Control signal emitted when a trigger fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSignal {
    Open,
    Close,
}

/// Registry of daily time-of-day triggers.
///
/// Each trigger is a task that sleeps until the next local-time occurrence
/// and sends its signal into the main event loop, where it is applied like
/// an ordinary event. Triggers live only as long as the process; nothing is
/// persisted.
pub struct Scheduler {
    tx: mpsc::Sender<ScheduleSignal>,
    jobs: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(tx: mpsc::Sender<ScheduleSignal>) -> Self {
        Self {
            tx,
            jobs: Vec::new(),
        }
    }

    /// Number of currently registered triggers
    pub fn active_triggers(&self) -> usize {
        self.jobs.len()
    }

    /// Cancel and discard every registered trigger
    pub fn clear_all(&mut self) {
        for job in self.jobs.drain(..) {
            job.abort();
        }
    }

    /// Register a trigger that fires once per day at the given time of day
    pub fn schedule_daily(
        &mut self,
        at: TimeOfDay,
        signal: ScheduleSignal,
    ) -> Result<(), BotError> {
        let expression = format!("0 {} {} * * *", at.minute, at.hour);
        let schedule = Schedule::from_str(&expression)
            .map_err(|e| BotError::Schedule(format!("invalid trigger time {}: {}", at, e)))?;

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            loop {
                let Some(next) = schedule.upcoming(Local).next() else {
                    break;
                };
                let until = (next - Local::now())
                    .to_std()
                    .unwrap_or(Duration::from_secs(1));
                tokio::time::sleep(until).await;
                if tx.send(signal).await.is_err() {
                    break;
                }
            }
        });
        self.jobs.push(handle);
        Ok(())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u8, minute: u8) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    #[tokio::test]
    async fn registers_one_trigger_per_call() {
        let (tx, _rx) = mpsc::channel(4);
        let mut scheduler = Scheduler::new(tx);

        scheduler
            .schedule_daily(at(9, 0), ScheduleSignal::Open)
            .unwrap();
        scheduler
            .schedule_daily(at(18, 30), ScheduleSignal::Close)
            .unwrap();

        assert_eq!(scheduler.active_triggers(), 2);
    }

    #[tokio::test]
    async fn clear_all_discards_every_trigger() {
        let (tx, _rx) = mpsc::channel(4);
        let mut scheduler = Scheduler::new(tx);

        scheduler
            .schedule_daily(at(9, 0), ScheduleSignal::Open)
            .unwrap();
        scheduler
            .schedule_daily(at(18, 0), ScheduleSignal::Close)
            .unwrap();
        scheduler.clear_all();

        assert_eq!(scheduler.active_triggers(), 0);
    }

    #[tokio::test]
    async fn reregistering_replaces_prior_triggers() {
        let (tx, _rx) = mpsc::channel(4);
        let mut scheduler = Scheduler::new(tx);

        scheduler
            .schedule_daily(at(9, 0), ScheduleSignal::Open)
            .unwrap();
        scheduler
            .schedule_daily(at(18, 0), ScheduleSignal::Close)
            .unwrap();

        scheduler.clear_all();
        scheduler
            .schedule_daily(at(10, 0), ScheduleSignal::Open)
            .unwrap();
        scheduler
            .schedule_daily(at(20, 0), ScheduleSignal::Close)
            .unwrap();

        assert_eq!(scheduler.active_triggers(), 2);
    }
}
