//! SHA-256 digests of files and the `<file>.sha256` sidecar that records them.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, VerificationError};
use crate::hasher::{Hasher, Sha256Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest([u8; 32]);

impl Sha256Digest {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Fail unless `actual` equals `self`.
    pub fn verify(&self, actual: &Sha256Digest) -> Result<()> {
        if self == actual {
            Ok(())
        } else {
            Err(VerificationError::Mismatch {
                expected: self.to_hex(),
                actual: actual.to_hex(),
            })
        }
    }
}

impl TryFrom<Vec<u8>> for Sha256Digest {
    type Error = VerificationError;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| VerificationError::InvalidDigest(hex::encode(b)))?;
        Ok(Self(arr))
    }
}

impl FromStr for Sha256Digest {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != 64 {
            return Err(VerificationError::InvalidDigest(s.to_string()));
        }
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out)
            .map_err(|_| VerificationError::InvalidDigest(s.to_string()))?;
        Ok(Self(out))
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hash a file in fixed-size chunks.
pub fn digest_file(path: &Path) -> Result<Sha256Digest> {
    let read_err = |e| VerificationError::Read {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = File::open(path).map_err(read_err)?;
    let mut hasher = Sha256Hasher::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).map_err(read_err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Sha256Digest::try_from(hasher.finalize())
}

pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".sha256");
    path.with_file_name(name)
}

/// Read the digest recorded next to `path`, if any.
pub fn read_sidecar(path: &Path) -> Result<Option<Sha256Digest>> {
    let sidecar = sidecar_path(path);
    match std::fs::read_to_string(&sidecar) {
        Ok(content) => {
            let hex = content.split_whitespace().next().unwrap_or_default();
            hex.parse().map(Some)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(VerificationError::Read {
            path: sidecar,
            source: e,
        }),
    }
}

/// Record `digest` next to `path` in `sha256sum` format.
pub fn write_sidecar(path: &Path, digest: &Sha256Digest) -> Result<()> {
    let sidecar = sidecar_path(path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    std::fs::write(&sidecar, format!("{digest}  {name}\n")).map_err(|e| {
        VerificationError::Write {
            path: sidecar,
            source: e,
        }
    })
}
