//! Instance lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of lifecycle states an instance moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceState {
    Starting,
    Stopping,
    Stopped,
    Running,
    Terminating,
    Cloning,
}

impl InstanceState {
    pub const ALL: [InstanceState; 6] = [
        InstanceState::Starting,
        InstanceState::Stopping,
        InstanceState::Stopped,
        InstanceState::Running,
        InstanceState::Terminating,
        InstanceState::Cloning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceState::Starting => "starting",
            InstanceState::Stopping => "stopping",
            InstanceState::Stopped => "stopped",
            InstanceState::Running => "running",
            InstanceState::Terminating => "terminating",
            InstanceState::Cloning => "cloning",
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
