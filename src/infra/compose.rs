use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::task::TaskError;

pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Up,
    Down,
}

/// Dependent services described by a compose file.
#[derive(Debug, Clone)]
pub struct ComposeServices {
    program: String,
    file: PathBuf,
}

impl ComposeServices {
    pub fn new(file: impl AsRef<Path>) -> Self {
        Self {
            program: "docker".into(),
            file: file.as_ref().to_path_buf(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub(crate) fn args(&self, lifecycle: Lifecycle) -> Vec<String> {
        let mut args = vec![
            "compose".to_string(),
            "-f".to_string(),
            self.file.display().to_string(),
        ];
        match lifecycle {
            Lifecycle::Up => args.extend(["up".to_string(), "-d".to_string()]),
            Lifecycle::Down => args.push("down".to_string()),
        }
        args
    }

    pub async fn run(&self, lifecycle: Lifecycle) -> Result<(), TaskError> {
        let args = self.args(lifecycle);
        let command = format!("{} {}", self.program, args.join(" "));
        tracing::info!("{command}");

        let status = Command::new(&self.program).args(&args).status().await?;
        if !status.success() {
            return Err(TaskError::Command { command, status });
        }

        Ok(())
    }
}
