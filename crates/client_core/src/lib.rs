//! Drives a set of video players from commands queued by an external
//! gesture/voice recognition service.
//!
//! [`GestureController`] owns the session: it starts and stops the service,
//! polls for queued commands and applies the latest one to the active video
//! through [`CommandExecutor`]. Rendering is left to whoever subscribes to
//! [`ControllerEvent`]s.

pub mod controller;
pub mod error;
pub mod executor;
pub mod feedback;
pub mod media;
pub mod poller;
pub mod registry;
pub mod service;
pub mod settings;
pub mod shortcuts;

pub use controller::GestureController;
pub use error::ServiceError;
pub use executor::CommandExecutor;
pub use feedback::{ControllerEvent, FeedbackPresenter};
pub use media::{MediaTarget, SimulatedVideo};
pub use poller::PollState;
pub use registry::TargetRegistry;
pub use service::{HttpRecognitionService, RecognitionService};
pub use settings::{load_settings, ControllerSettings};
pub use shortcuts::Key;
