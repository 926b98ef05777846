use std::process::{Child, Command, Stdio};

/// Environment variable carrying the reason a command was started.
pub const EVENT_VAR: &str = "CASSETTE_EVENT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    SongChange,
    Paused,
    Resumed,
    Stopped,
}

impl ChangeReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeReason::SongChange => "song_change",
            ChangeReason::Paused => "paused",
            ChangeReason::Resumed => "resumed",
            ChangeReason::Stopped => "stopped",
        }
    }
}

/// The user's `run_on_song_change` command and the processes it has spawned.
/// Children are never waited on while polling; they are reaped on the next
/// run and killed on shutdown.
pub struct UserCommand {
    program: Option<String>,
    args: Vec<String>,
    children: Vec<Child>,
}

impl UserCommand {
    pub fn new(command_line: &str) -> Self {
        let mut words = command_line.split_whitespace().map(str::to_string);
        Self {
            program: words.next(),
            args: words.collect(),
            children: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new("")
    }

    pub fn is_configured(&self) -> bool {
        self.program.is_some()
    }

    pub fn running(&self) -> usize {
        self.children.len()
    }

    /// Spawns the command. Failures are logged, never returned.
    pub fn run(&mut self, reason: ChangeReason) {
        self.reap();
        let Some(program) = self.program.as_deref() else {
            return;
        };

        let spawned = Command::new(program)
            .args(&self.args)
            .env(EVENT_VAR, reason.as_str())
            .stdin(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => {
                log::debug!("Started '{}' (pid {}) for {}", program, child.id(), reason.as_str());
                self.children.push(child);
            }
            Err(e) => log::warn!("An error occurred while running the custom command '{}': {}", program, e),
        }
    }

    /// Drops handles of finished children, reporting abnormal exits.
    pub fn reap(&mut self) {
        self.children.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    log::warn!("Custom command (pid {}) exited with {}", child.id(), status);
                }
                false
            }
            Ok(None) => true,
            Err(e) => {
                log::warn!("Could not query custom command (pid {}): {}", child.id(), e);
                false
            }
        });
    }

    /// Kills whatever is still running.
    pub fn terminate(&mut self) {
        for mut child in self.children.drain(..) {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Drop for UserCommand {
    fn drop(&mut self) {
        self.terminate();
    }
}
