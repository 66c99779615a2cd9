use std::path::{Path, PathBuf};

use runbake_fetch::RuntimeVersion;
use runbake_platform::CommandRunner;

use crate::driver::ToolchainDriver;
use crate::error::Result;

/// An extracted runtime source tree and the means to build it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    root: PathBuf,
    version: RuntimeVersion,
    driver: ToolchainDriver,
}

impl Toolchain {
    pub fn new(root: impl Into<PathBuf>, version: RuntimeVersion, driver: ToolchainDriver) -> Self {
        Self {
            root: root.into(),
            version,
            driver,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn version(&self) -> &RuntimeVersion {
        &self.version
    }

    pub fn driver(&self) -> &ToolchainDriver {
        &self.driver
    }

    pub fn release_binary(&self) -> PathBuf {
        self.root.join(self.driver.release_binary())
    }

    pub async fn build<R: CommandRunner>(&self, runner: &R) -> Result<()> {
        self.driver.build(&self.root, runner).await
    }
}
