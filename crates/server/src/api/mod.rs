use std::{collections::VecDeque, sync::Arc};

use shared::{
    domain::{Command, CommandSource, Mode},
    error::{ApiException, ErrorCode},
    protocol::ServiceStatus,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Recognition session as seen by the browser: a running flag, the input mode
/// and the queue of recognised commands waiting to be collected.
#[derive(Debug)]
pub struct RecognitionState {
    running: bool,
    mode: Mode,
    queue: VecDeque<Command>,
    max_queue_len: usize,
}

impl RecognitionState {
    pub fn new(max_queue_len: usize) -> Self {
        Self {
            running: false,
            mode: Mode::default(),
            queue: VecDeque::new(),
            max_queue_len: max_queue_len.max(1),
        }
    }

    /// Returns false when already running. A fresh session always begins in
    /// gesture mode with an empty queue.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.mode = Mode::Gesture;
        self.queue.clear();
        info!("gesture control started");
        true
    }

    /// Returns false when not running.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        info!("gesture control stopped");
        true
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        info!(%mode, "mode changed");
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            running: self.running,
            mode: self.mode,
        }
    }

    /// Hands out every pending command and empties the queue.
    pub fn drain(&mut self) -> Vec<Command> {
        self.queue.drain(..).collect()
    }

    /// Queues a recognised command. Returns `Ok(false)` when the current mode
    /// ignores `source`. The oldest entry is dropped once the queue is full.
    pub fn enqueue(
        &mut self,
        command: Command,
        source: CommandSource,
    ) -> Result<bool, ApiException> {
        if !self.running {
            return Err(ApiException::new(
                ErrorCode::Conflict,
                "gesture control is not running",
            ));
        }
        if !command.is_known() {
            return Err(ApiException::new(
                ErrorCode::Validation,
                format!("unknown command '{command}'"),
            ));
        }
        if !self.mode.accepts(source) {
            info!(%command, ?source, mode = %self.mode, "command ignored in current mode");
            return Ok(false);
        }
        if self.queue.len() >= self.max_queue_len {
            if let Some(dropped) = self.queue.pop_front() {
                warn!(%dropped, "command queue full; dropping oldest");
            }
        }
        self.queue.push_back(command);
        Ok(true)
    }
}

#[derive(Clone)]
pub struct ApiContext {
    pub recognition: Arc<Mutex<RecognitionState>>,
}

impl ApiContext {
    pub fn new(max_queue_len: usize) -> Self {
        Self {
            recognition: Arc::new(Mutex::new(RecognitionState::new(max_queue_len))),
        }
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
