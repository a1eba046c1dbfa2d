use std::{sync::Arc, time::Duration};

use shared::{
    domain::{Command, Direction, Mode},
    protocol::{ServiceStatus, StatusResponse},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::Instant,
};
use tracing::{error, info, warn};

use crate::{
    error::ServiceError,
    executor::CommandExecutor,
    feedback::{ControllerEvent, FeedbackPresenter},
    media::MediaTarget,
    poller::{spawn_poll_loop, PollState},
    registry::TargetRegistry,
    service::RecognitionService,
    settings::ControllerSettings,
    shortcuts::{command_for_key, Key},
};

const START_FAILED: &str = "Failed to start gesture control";
const STOP_FAILED: &str = "Failed to stop gesture control";
const STARTED_FALLBACK: &str = "Gesture control started";
const STOPPED_FALLBACK: &str = "Gesture control stopped";

struct ControllerState {
    registry: TargetRegistry,
    poll: PollState,
    session_active: bool,
    mode: Mode,
}

/// Owns everything one page needs to be driven by the recognition service:
/// the video registry, the session flag, the mode marker and the poll task.
///
/// Service calls never hold the state lock, so a `stop` reply can land between
/// two poll ticks (or after a late tick) in either order.
pub struct GestureController {
    service: Arc<dyn RecognitionService>,
    executor: CommandExecutor,
    presenter: FeedbackPresenter,
    poll_interval: Duration,
    inner: Mutex<ControllerState>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl GestureController {
    /// Builds the controller and selects the first target, if any.
    pub fn new(
        service: Arc<dyn RecognitionService>,
        targets: Vec<Arc<dyn MediaTarget>>,
        settings: &ControllerSettings,
    ) -> Arc<Self> {
        let presenter = settings.presenter();
        let mut registry = TargetRegistry::new(targets);
        if !registry.is_empty() {
            registry.select(0, &presenter);
        }

        Arc::new(Self {
            service,
            executor: settings.executor(),
            presenter,
            poll_interval: settings.poll_interval,
            inner: Mutex::new(ControllerState {
                registry,
                poll: PollState::new(settings.command_cooldown),
                session_active: false,
                mode: Mode::default(),
            }),
            poll_task: Mutex::new(None),
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.presenter.subscribe()
    }

    pub async fn is_active(&self) -> bool {
        self.inner.lock().await.session_active
    }

    pub async fn mode(&self) -> Mode {
        self.inner.lock().await.mode
    }

    pub async fn active_index(&self) -> Option<usize> {
        self.inner.lock().await.registry.active_index()
    }

    pub async fn targets(&self) -> Vec<Arc<dyn MediaTarget>> {
        self.inner.lock().await.registry.targets().to_vec()
    }

    pub async fn is_polling(&self) -> bool {
        self.poll_task
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Asks the service to begin recognition and, on success, starts polling.
    ///
    /// Failure leaves the session inactive and raises an error notification.
    pub async fn start(self: &Arc<Self>) -> Result<(), ServiceError> {
        let response = match self.service.start().await {
            Ok(response) => response,
            Err(err) => {
                error!(%err, "error starting gesture control");
                self.presenter.notify(START_FAILED, true);
                return Err(err);
            }
        };

        info!(status = ?response.status, "gesture control started");
        self.inner.lock().await.session_active = true;
        self.presenter
            .emit(ControllerEvent::SessionStateChanged { active: true });
        self.presenter
            .notify(status_or(response, STARTED_FALLBACK), false);
        self.ensure_polling().await;
        Ok(())
    }

    /// Asks the service to end recognition and, on success, stops polling.
    ///
    /// On failure the session stays as it was and polling continues.
    pub async fn stop(&self) -> Result<(), ServiceError> {
        let response = match self.service.stop().await {
            Ok(response) => response,
            Err(err) => {
                error!(%err, "error stopping gesture control");
                self.presenter.notify(STOP_FAILED, true);
                return Err(err);
            }
        };

        info!(status = ?response.status, "gesture control stopped");
        self.inner.lock().await.session_active = false;
        self.presenter
            .emit(ControllerEvent::SessionStateChanged { active: false });
        self.presenter
            .notify(status_or(response, STOPPED_FALLBACK), false);
        if let Some(task) = self.poll_task.lock().await.take() {
            task.abort();
        }
        Ok(())
    }

    /// Pushes `mode` to the service. Failures are only logged.
    pub async fn set_mode(&self, mode: Mode) -> Result<(), ServiceError> {
        let response = match self.service.set_mode(mode).await {
            Ok(response) => response,
            Err(err) => {
                error!(%err, %mode, "error setting mode");
                return Err(err);
            }
        };

        info!(status = ?response.status, %mode, "mode set");
        self.inner.lock().await.mode = mode;
        self.presenter.emit(ControllerEvent::ModeChanged(mode));
        self.presenter
            .notify(format!("Switched to {mode} mode"), false);
        Ok(())
    }

    /// Reads the service status and adopts its mode as the local marker.
    pub async fn refresh_status(&self) -> Result<ServiceStatus, ServiceError> {
        let status = self.service.status().await.map_err(|err| {
            warn!(%err, "error reading service status");
            err
        })?;

        let changed = {
            let mut state = self.inner.lock().await;
            if status.running != state.session_active {
                info!(
                    service_running = status.running,
                    session_active = state.session_active,
                    "service and local session disagree"
                );
            }
            std::mem::replace(&mut state.mode, status.mode) != status.mode
        };
        if changed {
            self.presenter.emit(ControllerEvent::ModeChanged(status.mode));
        }
        Ok(status)
    }

    /// One poll tick: fetch the queue and apply at most its latest command.
    ///
    /// Errors are logged only; this runs every few hundred milliseconds.
    pub async fn poll_once(&self) -> Option<Command> {
        let commands = match self.service.fetch_commands().await {
            Ok(commands) => commands,
            Err(err) => {
                warn!(%err, "error polling commands");
                return None;
            }
        };
        if commands.is_empty() {
            return None;
        }

        let mut state = self.inner.lock().await;
        let command = state.poll.take_latest(commands, Instant::now())?;
        self.executor
            .apply(&command, &mut state.registry, &self.presenter);
        Some(command)
    }

    /// Applies a command directly, bypassing the poll cooldown.
    pub async fn execute(&self, command: &Command) -> Option<String> {
        let mut state = self.inner.lock().await;
        self.executor
            .apply(command, &mut state.registry, &self.presenter)
    }

    /// Keyboard shortcuts only act while the session is active.
    pub async fn handle_key(&self, key: Key) -> Option<String> {
        let command = command_for_key(key)?;
        let mut state = self.inner.lock().await;
        if !state.session_active {
            return None;
        }
        self.executor
            .apply(&command, &mut state.registry, &self.presenter)
    }

    pub async fn select_target(&self, index: usize) -> bool {
        let mut state = self.inner.lock().await;
        state.registry.select(index, &self.presenter)
    }

    pub async fn switch_active(&self, direction: Direction) -> Option<usize> {
        let mut state = self.inner.lock().await;
        state.registry.switch_active(direction, &self.presenter)
    }

    async fn ensure_polling(self: &Arc<Self>) {
        let mut task = self.poll_task.lock().await;
        if task.as_ref().is_some_and(|running| !running.is_finished()) {
            return;
        }
        info!(interval_ms = self.poll_interval.as_millis() as u64, "command polling started");
        *task = Some(spawn_poll_loop(self, self.poll_interval));
    }
}

impl Drop for GestureController {
    fn drop(&mut self) {
        if let Some(task) = self.poll_task.get_mut().take() {
            task.abort();
        }
    }
}

fn status_or(response: StatusResponse, fallback: &str) -> String {
    response
        .status
        .filter(|status| !status.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
