//! Platform detection and asset-name suffix generation.
//!
//! Release assets are conventionally named `<tool>_<os>_<arch><ext>` (or with
//! `-` as the separator). This module knows which endings are acceptable for
//! a given platform so the detector can recognize the right artifact.

const SEPARATORS: [char; 2] = ['_', '-'];
const EXTENSIONS: [&str; 8] = [
    ".zip", ".tar.gz", ".tgz", ".gzip", ".gz", ".tar.xz", ".xz", "",
];

/// Target platform for asset selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Detect the platform this process is running on.
    ///
    /// Names follow the vocabulary release assets are tagged with in the wild
    /// ("darwin", "amd64", "arm64"), not the Rust target triple.
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            arch: Self::detect_arch(),
        }
    }

    fn detect_os() -> String {
        match std::env::consts::OS {
            "macos" => "darwin".to_string(),
            os => os.to_string(),
        }
    }

    fn detect_arch() -> String {
        match std::env::consts::ARCH {
            "x86_64" => "amd64".to_string(),
            "aarch64" => "arm64".to_string(),
            "x86" => "386".to_string(),
            arch => arch.to_string(),
        }
    }

    /// Acceptable asset-name endings for this platform, in matching order.
    ///
    /// One entry per separator/extension combination; the empty extension
    /// accepts bare binaries. On Windows every combination also appears with
    /// `.exe` before the extension, e.g. `foo_windows_amd64.exe.zip`.
    pub fn asset_suffixes(&self) -> Vec<String> {
        let mut suffixes = Vec::with_capacity(SEPARATORS.len() * EXTENSIONS.len() * 2);
        for sep in SEPARATORS {
            for ext in EXTENSIONS {
                suffixes.push(format!("{}{}{}{}", self.os, sep, self.arch, ext));
                if self.os == "windows" {
                    suffixes.push(format!("{}{}{}.exe{}", self.os, sep, self.arch, ext));
                }
            }
        }
        suffixes
    }
}
