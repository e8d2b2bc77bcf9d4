use std::fmt;

/// Operating system family of the machine running the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    Macos,
    Linux,
    Unknown,
}

impl Os {
    pub fn label(self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Macos => "macos",
            Os::Linux => "linux",
            Os::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// CPU architecture, limited to the families Ollama ships builds for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Arm64,
    Unknown,
}

impl Arch {
    pub fn label(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Arm64 => "arm64",
            Arch::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Best-effort host detection from the compile-time platform constants.
/// Not a hardware probe, and no network is involved.
pub fn detect_system() -> (Os, Arch) {
    let os = match std::env::consts::OS {
        "windows" => Os::Windows,
        "macos" => Os::Macos,
        "linux" => Os::Linux,
        _ => Os::Unknown,
    };

    let arch = match std::env::consts::ARCH {
        "x86_64" => Arch::X86_64,
        "aarch64" => Arch::Arm64,
        _ => Arch::Unknown,
    };

    (os, arch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_the_build_platform() {
        let (os, arch) = detect_system();

        #[cfg(target_os = "linux")]
        assert_eq!(os, Os::Linux);
        #[cfg(target_os = "macos")]
        assert_eq!(os, Os::Macos);
        #[cfg(target_os = "windows")]
        assert_eq!(os, Os::Windows);

        #[cfg(target_arch = "x86_64")]
        assert_eq!(arch, Arch::X86_64);
        #[cfg(target_arch = "aarch64")]
        assert_eq!(arch, Arch::Arm64);
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(Os::Macos.to_string(), "macos");
        assert_eq!(Arch::Arm64.to_string(), "arm64");
        assert_eq!(Os::Unknown.to_string(), "unknown");
    }
}
