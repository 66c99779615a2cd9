use std::path::Path;

use runbake_platform::CommandRunner;

use crate::error::Result;

mod system;
mod tar;

pub use self::system::SystemTar;
pub use self::tar::TarGzExtractor;

/// Selects how an archive is unpacked.
#[derive(Debug, Clone)]
pub enum ArchiveExtractor {
    InProcess(TarGzExtractor),
    System(SystemTar),
}

impl ArchiveExtractor {
    /// Unpack `archive` into `destination`, returning the number of
    /// top-level entries that were moved into place.
    pub async fn extract<R: CommandRunner>(
        &self,
        archive: &Path,
        destination: &Path,
        runner: &R,
    ) -> Result<usize> {
        match self {
            Self::InProcess(extractor) => extractor.extract(archive, destination).await,
            Self::System(extractor) => extractor.extract(archive, destination, runner).await,
        }
    }
}
