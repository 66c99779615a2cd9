use std::path::{Path, PathBuf};

use runbake_archive::{ArchiveExtractor, SystemTar, TarGzExtractor};
use runbake_platform::os::{self, OS};
use runbake_platform::{Command, CommandRunner};
use tracing::info;

use crate::error::Result;

/// `./configure` followed by GNU make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosixDriver {
    make: String,
}

impl PosixDriver {
    pub fn new(make: impl Into<String>) -> Self {
        Self { make: make.into() }
    }

    pub fn make(&self) -> &str {
        &self.make
    }
}

/// `vcbuild.bat` with a fixed release configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowsDriver;

/// The native build of a runtime source tree, chosen once per host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolchainDriver {
    Posix(PosixDriver),
    Windows(WindowsDriver),
}

impl ToolchainDriver {
    pub fn host() -> Self {
        Self::for_os(os::detect())
    }

    pub fn for_os(os: OS) -> Self {
        if os.is_windows() {
            Self::Windows(WindowsDriver)
        } else if os.is_bsd() {
            Self::Posix(PosixDriver::new("gmake"))
        } else {
            Self::Posix(PosixDriver::new("make"))
        }
    }

    /// Where the build leaves the binary, relative to the source root.
    pub fn release_binary(&self) -> PathBuf {
        match self {
            Self::Posix(_) => Path::new("out").join("Release").join("node"),
            Self::Windows(_) => Path::new("Release").join("node.exe"),
        }
    }

    /// Windows hosts cannot count on a `tar` binary.
    pub fn extractor(&self) -> ArchiveExtractor {
        match self {
            Self::Posix(_) => ArchiveExtractor::System(SystemTar::default()),
            Self::Windows(_) => ArchiveExtractor::InProcess(TarGzExtractor),
        }
    }

    pub fn build_commands(&self, root: &Path) -> Vec<Command> {
        match self {
            Self::Posix(driver) => vec![
                Command::new(root.join("configure")).current_dir(root),
                Command::new(&driver.make).current_dir(root),
            ],
            Self::Windows(_) => vec![
                Command::new(root.join("vcbuild.bat"))
                    .args(["nosign", "release", "x64"])
                    .current_dir(root),
            ],
        }
    }

    /// Run the build in `root`, stopping at the first failing command.
    pub async fn build<R: CommandRunner>(&self, root: &Path, runner: &R) -> Result<()> {
        info!(root = %root.display(), "make");
        for cmd in self.build_commands(root) {
            runner.run(&cmd).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_selection() {
        assert_eq!(
            ToolchainDriver::for_os(OS::Linux),
            ToolchainDriver::Posix(PosixDriver::new("make"))
        );
        assert_eq!(
            ToolchainDriver::for_os(OS::OpenBsd),
            ToolchainDriver::Posix(PosixDriver::new("gmake"))
        );
        assert_eq!(
            ToolchainDriver::for_os(OS::Windows),
            ToolchainDriver::Windows(WindowsDriver)
        );
    }

    #[test]
    fn test_posix_commands() {
        let root = Path::new("/cache/4.2.1/node-v4.2.1");
        let cmds = ToolchainDriver::for_os(OS::FreeBsd).build_commands(root);
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].program(), root.join("configure").as_os_str());
        assert!(cmds[0].get_args().is_empty());
        assert_eq!(cmds[1].program(), "gmake");
        assert!(cmds.iter().all(|c| c.get_current_dir() == Some(root)));
    }

    #[test]
    fn test_windows_commands() {
        let root = Path::new(r"C:\cache\latest\node-v5.0.0");
        let cmds = ToolchainDriver::Windows(WindowsDriver).build_commands(root);
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].display(), format!("{} nosign release x64", root.join("vcbuild.bat").display()));
        assert_eq!(
            ToolchainDriver::Windows(WindowsDriver).release_binary(),
            Path::new("Release").join("node.exe")
        );
    }
}
