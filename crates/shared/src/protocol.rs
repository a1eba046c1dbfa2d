use serde::{Deserialize, Serialize};

use crate::domain::{Command, CommandSource, Mode};

pub const SET_MODE_ROUTE: &str = "/set_mode";
pub const START_ROUTE: &str = "/start_gesture";
pub const STOP_ROUTE: &str = "/stop_gesture";
pub const COMMANDS_ROUTE: &str = "/get_commands";
pub const STATUS_ROUTE: &str = "/get_status";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetModeRequest {
    pub mode: Mode,
}

/// Reply to start, stop and set-mode requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
        }
    }
}

/// Drained command queue. `commands` may be absent on a misbehaving service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<Command>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub mode: Mode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectCommandRequest {
    pub command: Command,
    pub source: CommandSource,
}
