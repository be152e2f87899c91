//! Administrative commands for the robot server.
//!
//! Every command is a flat JSON object posted to the admin endpoint:
//! ```text
//! {"cmd": "updateFirmware"}
//! {"cmd": "setToken", "token": "<token>"}
//! {"cmd": "setRobot", "robot": "<robot>"}
//! ```
//!
//! The dispatcher only builds the payload and a description. Sending,
//! error reporting and timeouts belong to the [`Comm`] it was given.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::comm::{Comm, SuccessFn};

/// Server route accepting administrative commands.
pub const ADMIN_ENDPOINT: &str = "/admin";

/// Command payload sent to the admin endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum AdminCommand {
    UpdateFirmware,
    SetToken { token: String },
    SetRobot { robot: String },
}

impl AdminCommand {
    /// Value of the `cmd` field.
    pub fn name(&self) -> &'static str {
        match self {
            AdminCommand::UpdateFirmware => "updateFirmware",
            AdminCommand::SetToken { .. } => "setToken",
            AdminCommand::SetRobot { .. } => "setRobot",
        }
    }

    /// Human-readable label used when logging the request.
    pub fn description(&self) -> String {
        match self {
            AdminCommand::UpdateFirmware => "update firmware".to_string(),
            AdminCommand::SetToken { token } => format!("set token '{token}'"),
            AdminCommand::SetRobot { robot } => format!("set robot '{robot}'"),
        }
    }

    /// Flat key/value view of the payload.
    pub fn to_payload(&self) -> BTreeMap<String, String> {
        let mut payload = BTreeMap::new();
        payload.insert("cmd".to_string(), self.name().to_string());
        match self {
            AdminCommand::UpdateFirmware => {}
            AdminCommand::SetToken { token } => {
                payload.insert("token".to_string(), token.clone());
            }
            AdminCommand::SetRobot { robot } => {
                payload.insert("robot".to_string(), robot.clone());
            }
        }
        payload
    }
}

impl fmt::Display for AdminCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// Sends admin commands through a communication helper.
pub struct AdminDispatcher<C: Comm> {
    comm: Arc<C>,
}

impl<C: Comm> Clone for AdminDispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            comm: Arc::clone(&self.comm),
        }
    }
}

impl<C: Comm> AdminDispatcher<C> {
    pub fn new(comm: Arc<C>) -> Self {
        Self { comm }
    }

    pub fn comm(&self) -> &Arc<C> {
        &self.comm
    }

    /// Ask the server to update the robot firmware.
    pub async fn update_firmware(&self, on_success: SuccessFn) {
        self.dispatch(AdminCommand::UpdateFirmware, on_success).await
    }

    /// Set the token used to pair with a robot.
    pub async fn set_token(&self, token: &str, on_success: SuccessFn) {
        let cmd = AdminCommand::SetToken {
            token: token.to_string(),
        };
        self.dispatch(cmd, on_success).await
    }

    /// Set the robot type the server generates code for.
    pub async fn set_robot(&self, robot: &str, on_success: SuccessFn) {
        let cmd = AdminCommand::SetRobot {
            robot: robot.to_string(),
        };
        self.dispatch(cmd, on_success).await
    }

    async fn dispatch(&self, cmd: AdminCommand, on_success: SuccessFn) {
        let description = cmd.description();
        tracing::debug!("dispatching {}: {:?}", cmd.name(), cmd.to_payload());
        self.comm
            .json(ADMIN_ENDPOINT, &cmd, on_success, &description)
            .await
    }
}
