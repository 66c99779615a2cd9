//! Operating system detection.

/// Operating system families that select a native toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OS {
    Windows,
    Macos,
    Linux,
    FreeBsd,
    OpenBsd,
    NetBsd,
    DragonFly,
    Unknown,
}

impl OS {
    /// Map a `std::env::consts::OS` style name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "windows" => OS::Windows,
            "macos" => OS::Macos,
            "linux" => OS::Linux,
            "freebsd" => OS::FreeBsd,
            "openbsd" => OS::OpenBsd,
            "netbsd" => OS::NetBsd,
            "dragonfly" => OS::DragonFly,
            _ => OS::Unknown,
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, OS::Windows)
    }

    /// BSD-derived hosts ship BSD make; GNU make is `gmake` there.
    pub fn is_bsd(self) -> bool {
        matches!(self, OS::FreeBsd | OS::OpenBsd | OS::NetBsd | OS::DragonFly)
    }
}

/// Detect current operating system.
pub fn detect() -> OS {
    OS::from_name(std::env::consts::OS)
}
