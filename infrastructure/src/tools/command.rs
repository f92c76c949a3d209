//! Shell command execution tool

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use alfredo_domain::{ToolHandler, ToolParameter, ToolParams, ToolResult, ToolSpec};

pub const EXECUTE_COMMAND: &str = "execute_command";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub fn execute_command_spec() -> ToolSpec {
    ToolSpec::new(EXECUTE_COMMAND, "Execute Command")
        .with_instructions(
            "Run a shell command in the working directory and return its \
output. Use this for builds, tests, and any inspection the other tools \
cannot do. Long-running commands are killed when the timeout expires.",
        )
        .with_parameter(ToolParameter::new(
            "command",
            true,
            "The shell command to execute",
            "ls -la",
        ))
        .with_parameter(ToolParameter::new(
            "timeout",
            false,
            "Timeout in seconds (default 120)",
            "120",
        ))
}

pub struct ExecuteCommandHandler {
    cwd: PathBuf,
}

impl ExecuteCommandHandler {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

#[async_trait]
impl ToolHandler for ExecuteCommandHandler {
    fn tool_id(&self) -> &str {
        EXECUTE_COMMAND
    }

    async fn execute(&self, params: &ToolParams) -> ToolResult {
        let command = match params.require_str("command") {
            Ok(command) => command,
            Err(e) => return ToolResult::err(e),
        };
        let timeout_secs = params.get_u64("timeout").unwrap_or(DEFAULT_TIMEOUT_SECS);
        debug!(command = %command, timeout_secs, "Executing shell command");

        let child = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .current_dir(&self.cwd)
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(Duration::from_secs(timeout_secs), child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return ToolResult::err(format!("Failed to execute command: {}", e)),
            Err(_) => {
                return ToolResult::err(format!(
                    "Command timed out after {} seconds",
                    timeout_secs
                ));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let code = output.status.code().unwrap_or(-1);

        let mut parts: Vec<String> = Vec::new();
        if !stdout.trim().is_empty() {
            parts.push(format!("STDOUT:\n{}", stdout.trim_end()));
        }
        if !stderr.trim().is_empty() {
            parts.push(format!("STDERR:\n{}", stderr.trim_end()));
        }
        if parts.is_empty() && code == 0 {
            return ToolResult::ok("Command completed with no output");
        }
        parts.push(format!("Command exited with code {}", code));
        ToolResult::ok(parts.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_command_output_format() {
        let dir = TempDir::new().unwrap();
        let handler = ExecuteCommandHandler::new(dir.path());
        let result = handler
            .execute(&ToolParams::new().with("command", "echo hello"))
            .await;
        assert!(result.is_success());
        assert!(result.output.starts_with("STDOUT:\nhello"));
        assert!(result.output.contains("Command exited with code 0"));
    }

    #[tokio::test]
    async fn test_no_output() {
        let dir = TempDir::new().unwrap();
        let handler = ExecuteCommandHandler::new(dir.path());
        let result = handler
            .execute(&ToolParams::new().with("command", "true"))
            .await;
        assert_eq!(result.output, "Command completed with no output");
    }

    #[tokio::test]
    async fn test_nonzero_exit_reported_in_output() {
        let dir = TempDir::new().unwrap();
        let handler = ExecuteCommandHandler::new(dir.path());
        let result = handler
            .execute(&ToolParams::new().with("command", "exit 3"))
            .await;
        assert!(result.is_success());
        assert!(result.output.contains("Command exited with code 3"));
    }

    #[tokio::test]
    async fn test_timeout() {
        let dir = TempDir::new().unwrap();
        let handler = ExecuteCommandHandler::new(dir.path());
        let result = handler
            .execute(
                &ToolParams::new()
                    .with("command", "sleep 5")
                    .with("timeout", 1),
            )
            .await;
        assert!(!result.is_success());
        assert!(
            result
                .error
                .as_deref()
                .unwrap()
                .contains("timed out after 1 seconds")
        );
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("probe.txt"), "x").unwrap();
        let handler = ExecuteCommandHandler::new(dir.path());
        let result = handler
            .execute(&ToolParams::new().with("command", "ls"))
            .await;
        assert!(result.output.contains("probe.txt"));
    }
}
