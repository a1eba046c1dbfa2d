use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use shared::domain::Command;
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::controller::GestureController;

/// Debounce bookkeeping for commands arriving through the poll loop.
#[derive(Debug, Clone)]
pub struct PollState {
    last_command_at: Option<Instant>,
    cooldown: Duration,
}

impl PollState {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_command_at: None,
            cooldown,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn last_command_at(&self) -> Option<Instant> {
        self.last_command_at
    }

    /// Picks the command to apply from one tick's queue.
    ///
    /// Only the most recent entry is ever applied; older entries are dropped so
    /// a backlog never replays. Inside the cooldown window the whole queue is
    /// discarded. A returned command is recorded as applied at `now`.
    pub fn take_latest(&mut self, mut commands: Vec<Command>, now: Instant) -> Option<Command> {
        if commands.is_empty() {
            return None;
        }

        if let Some(last) = self.last_command_at {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.cooldown {
                debug!(
                    discarded = commands.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "command queue discarded during cooldown"
                );
                return None;
            }
        }

        let latest = commands.pop()?;
        if !commands.is_empty() {
            debug!(dropped = commands.len(), latest = %latest, "dropping stale queued commands");
        }
        self.last_command_at = Some(now);
        Some(latest)
    }
}

/// Spawns the fixed-period poll loop. The first poll happens one `period` after
/// spawning. The task only holds a weak handle and ends once the controller is
/// dropped.
pub(crate) fn spawn_poll_loop(controller: &Arc<GestureController>, period: Duration) -> JoinHandle<()> {
    let controller: Weak<GestureController> = Arc::downgrade(controller);
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let Some(controller) = controller.upgrade() else {
                break;
            };
            controller.poll_once().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(tags: &[&str]) -> Vec<Command> {
        tags.iter().map(|tag| Command::parse(tag)).collect()
    }

    #[test]
    fn empty_queue_applies_nothing_and_keeps_timestamp() {
        let mut state = PollState::new(Duration::from_millis(1000));
        assert_eq!(state.take_latest(Vec::new(), Instant::now()), None);
        assert!(state.last_command_at().is_none());
    }

    #[test]
    fn only_the_last_queued_command_is_taken() {
        let mut state = PollState::new(Duration::from_millis(1000));
        let taken = state.take_latest(
            queue(&["play_pause", "volume_up", "next_video"]),
            Instant::now(),
        );
        assert_eq!(taken, Some(Command::NextVideo));
    }

    #[test]
    fn queue_inside_cooldown_is_discarded_entirely() {
        let mut state = PollState::new(Duration::from_millis(1000));
        let start = Instant::now();

        assert_eq!(
            state.take_latest(queue(&["play_pause"]), start),
            Some(Command::PlayPause)
        );
        assert_eq!(
            state.take_latest(
                queue(&["volume_up", "fullscreen"]),
                start + Duration::from_millis(600)
            ),
            None
        );
        assert_eq!(state.last_command_at(), Some(start));
    }

    #[test]
    fn cooldown_boundary_is_inclusive_of_the_full_window() {
        let mut state = PollState::new(Duration::from_millis(1000));
        let start = Instant::now();
        state.take_latest(queue(&["play_pause"]), start);

        assert_eq!(
            state.take_latest(queue(&["volume_up"]), start + Duration::from_millis(999)),
            None
        );
        assert_eq!(
            state.take_latest(queue(&["volume_up"]), start + Duration::from_millis(1000)),
            Some(Command::VolumeUp)
        );
    }

    #[test]
    fn unknown_tags_still_consume_the_cooldown() {
        let mut state = PollState::new(Duration::from_millis(1000));
        let start = Instant::now();

        assert_eq!(
            state.take_latest(queue(&["wave"]), start),
            Some(Command::Unknown("wave".into()))
        );
        assert_eq!(
            state.take_latest(queue(&["play_pause"]), start + Duration::from_millis(300)),
            None
        );
    }
}
