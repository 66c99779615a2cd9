use std::fmt;

/// Phases of a download operation.
///
/// Downloads progress through these phases in order:
/// Connecting → Downloading → Verifying → Committing → Completed
///
/// Retries return to the Connecting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Request sent, waiting for response headers.
    #[default]
    Connecting,

    /// Streaming the body to the staging file.
    Downloading,

    /// Comparing the streamed digest with the expected one, if any.
    Verifying,

    /// Moving the staging file to its final path.
    Committing,

    Completed,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Connecting => write!(f, "Connecting"),
            FetchPhase::Downloading => write!(f, "Downloading"),
            FetchPhase::Verifying => write!(f, "Verifying"),
            FetchPhase::Committing => write!(f, "Committing"),
            FetchPhase::Completed => write!(f, "Completed"),
        }
    }
}

/// Snapshot passed to progress callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub phase: FetchPhase,

    /// Bytes written to the staging file so far.
    pub bytes_downloaded: u64,

    /// Declared Content-Length, when the server sent one.
    pub total_bytes: Option<u64>,

    /// 0 on the first attempt.
    pub retry_count: u32,
}

impl Progress {
    pub fn percentage(&self) -> Option<f32> {
        self.total_bytes.map(|total| {
            if total == 0 {
                0.0
            } else {
                (self.bytes_downloaded as f32 / total as f32) * 100.0
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let mut p = Progress {
            phase: FetchPhase::Downloading,
            bytes_downloaded: 25,
            total_bytes: Some(100),
            retry_count: 0,
        };
        assert_eq!(p.percentage(), Some(25.0));

        p.total_bytes = Some(0);
        assert_eq!(p.percentage(), Some(0.0));

        p.total_bytes = None;
        assert_eq!(p.percentage(), None);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(FetchPhase::default().to_string(), "Connecting");
        assert_eq!(FetchPhase::Committing.to_string(), "Committing");
    }
}
