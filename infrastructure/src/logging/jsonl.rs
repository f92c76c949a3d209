//! JSONL run logger
//!
//! Appends one JSON line per transcript message plus a run summary, so a
//! finished run can be inspected or replayed with standard line tools.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use serde_json::json;

use alfredo_domain::AgentState;

pub struct JsonlRunLogger {
    writer: Mutex<BufWriter<File>>,
}

impl JsonlRunLogger {
    /// Open (appending) the log file, creating parent directories
    pub fn create(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Write the whole run: every message, then a summary line
    pub fn log_run(&self, state: &AgentState) -> std::io::Result<()> {
        let ts = Utc::now().to_rfc3339();
        let mut writer = self.writer.lock().unwrap();
        for message in &state.messages {
            let record = json!({
                "ts": ts,
                "type": "message",
                "task": state.task,
                "message": message,
            });
            writeln!(writer, "{}", record)?;
        }
        let summary = json!({
            "ts": ts,
            "type": "run_summary",
            "task": state.task,
            "plan_iteration": state.plan_iteration,
            "is_verified": state.is_verified,
            "final_answer": state.final_answer,
            "message_count": state.messages.len(),
        });
        writeln!(writer, "{}", summary)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alfredo_domain::Message;
    use tempfile::TempDir;

    #[test]
    fn test_log_run_writes_messages_and_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs/run.jsonl");
        let logger = JsonlRunLogger::create(&path).unwrap();

        let mut state = AgentState::new("count files", 1000);
        state.push_message(Message::human("Task: count files"));
        state.is_verified = true;
        state.final_answer = Some("42".to_string());
        logger.log_run(&state).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let message: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(message["type"], "message");
        assert_eq!(message["message"]["role"], "human");

        let summary: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(summary["type"], "run_summary");
        assert_eq!(summary["is_verified"], true);
        assert_eq!(summary["final_answer"], "42");
    }
}
