use std::path::Path;

use runbake_platform::{Command, CommandRunner};
use tracing::info;

use crate::error::Result;
use crate::staging::Staging;

/// Runs the host `tar` utility with its output forwarded to ours.
#[derive(Debug, Clone)]
pub struct SystemTar {
    program: String,
}

impl SystemTar {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn command(&self, archive: &Path, target: &Path) -> Command {
        Command::new(&self.program)
            .arg("-xf")
            .arg(archive)
            .arg("-C")
            .arg(target)
    }

    pub async fn extract<R: CommandRunner>(
        &self,
        archive: &Path,
        destination: &Path,
        runner: &R,
    ) -> Result<usize> {
        let staging = Staging::new(destination)?;
        let cmd = self.command(archive, staging.path());
        info!(cmd = %cmd.display(), "extracting");
        runner.run(&cmd).await?;
        staging.commit()
    }
}

impl Default for SystemTar {
    fn default() -> Self {
        Self::new("tar")
    }
}
