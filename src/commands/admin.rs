//! Admin commands

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::admin::{AdminCommand, AdminDispatcher};
use crate::comm::{AdminResponse, HttpComm, SuccessFn};
use crate::config::Config;

pub async fn cmd_update_firmware(config: &Config, json: bool) -> Result<()> {
    run_admin(config, AdminCommand::UpdateFirmware, json).await
}

pub async fn cmd_set_token(config: &Config, token: &str, json: bool) -> Result<()> {
    let cmd = AdminCommand::SetToken {
        token: token.to_string(),
    };
    run_admin(config, cmd, json).await
}

pub async fn cmd_set_robot(config: &Config, robot: &str, json: bool) -> Result<()> {
    let cmd = AdminCommand::SetRobot {
        robot: robot.to_string(),
    };
    run_admin(config, cmd, json).await
}

/// Send one admin command and fail unless the server confirmed it.
pub async fn run_admin(config: &Config, cmd: AdminCommand, json: bool) -> Result<()> {
    let comm = HttpComm::new(&config.server, config.timeout())
        .context("Failed to create HTTP client")?;
    let admin = AdminDispatcher::new(Arc::new(comm));

    let done = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&done);
    let on_success: SuccessFn = Arc::new(move |reply: &AdminResponse| {
        flag.store(true, Ordering::SeqCst);
        print_reply(reply, json);
    });

    tracing::info!("Sending '{}' to {}", cmd.name(), admin.comm().base_url());
    match &cmd {
        AdminCommand::UpdateFirmware => admin.update_firmware(on_success).await,
        AdminCommand::SetToken { token } => admin.set_token(token, on_success).await,
        AdminCommand::SetRobot { robot } => admin.set_robot(robot, on_success).await,
    }

    if !done.load(Ordering::SeqCst) || admin.comm().failures() > 0 {
        bail!("Command failed: {cmd}");
    }
    Ok(())
}

fn print_reply(reply: &AdminResponse, json: bool) {
    if json {
        let text = serde_json::to_string_pretty(reply).unwrap_or_else(|_| format!("{reply:?}"));
        println!("{text}");
        return;
    }

    match &reply.message {
        Some(m) => println!("✓ {m}"),
        None => println!("✓ OK"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config(server: &mockito::ServerGuard) -> Config {
        Config {
            server: server.url(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_set_robot_confirmed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/admin")
            .match_body(Matcher::Json(json!({"cmd": "setRobot", "robot": "nxt"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"rc":"ok","message":"ORA_ROBOT_SET_SUCCESS"}"#)
            .create_async()
            .await;

        cmd_set_robot(&config(&server), "nxt", false).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_firmware_confirmed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/admin")
            .match_body(Matcher::Json(json!({"cmd": "updateFirmware"})))
            .with_status(200)
            .with_body(r#"{"rc":"ok"}"#)
            .create_async()
            .await;

        cmd_update_firmware(&config(&server), true).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_token_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/admin")
            .with_status(200)
            .with_body(r#"{"rc":"error","message":"ORA_TOKEN_SET_ERROR_NO_ROBOT_WAITING"}"#)
            .create_async()
            .await;

        let err = cmd_set_token(&config(&server), "abc123", false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Command failed: set token 'abc123'");
    }
}
