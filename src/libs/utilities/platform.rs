// Detects the operating system family and maps it to the package manager
// whose index `update-index` refreshes. Installer code asks this table for
// commands instead of branching on the OS itself.

use crate::libs::utilities::command_runner::CommandSpec;
use crate::{log_debug, log_warn};
use colored::Colorize;
use std::fmt;
use std::fs;

/// Broad operating system families, grouped by the package manager they ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    /// Debian, Ubuntu and derivatives (`apt`).
    Debian,
    /// CentOS, RHEL, Fedora and derivatives (`dnf` / `yum`).
    RedHat,
    MacOs,
    Windows,
    Unknown,
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OsFamily::Debian => write!(f, "debian"),
            OsFamily::RedHat => write!(f, "redhat"),
            OsFamily::MacOs => write!(f, "macos"),
            OsFamily::Windows => write!(f, "windows"),
            OsFamily::Unknown => write!(f, "unknown"),
        }
    }
}

/// Detects the OS family of the running machine.
///
/// On Linux the distribution is read from `/etc/os-release`; if that file is
/// missing or names an unfamiliar distribution the family is `Unknown`.
pub fn detect_os_family() -> OsFamily {
    match std::env::consts::OS {
        "macos" => OsFamily::MacOs,
        "windows" => OsFamily::Windows,
        "linux" => match fs::read_to_string("/etc/os-release") {
            Ok(contents) => family_from_os_release(&contents),
            Err(err) => {
                log_warn!("[Platform] Cannot read /etc/os-release: {}", err);
                OsFamily::Unknown
            }
        },
        other => {
            log_warn!("[Platform] Unsupported OS '{}'.", other.purple());
            OsFamily::Unknown
        }
    }
}

/// Classifies the contents of an `os-release` file by its `ID` and
/// `ID_LIKE` fields. `ID` wins over `ID_LIKE`.
pub fn family_from_os_release(contents: &str) -> OsFamily {
    let mut id = String::new();
    let mut id_like = String::new();
    for line in contents.lines() {
        if let Some(value) = line.strip_prefix("ID=") {
            id = value.trim().trim_matches('"').to_lowercase();
        } else if let Some(value) = line.strip_prefix("ID_LIKE=") {
            id_like = value.trim().trim_matches('"').to_lowercase();
        }
    }
    log_debug!("[Platform] os-release ID='{}' ID_LIKE='{}'", id, id_like);

    std::iter::once(id.as_str())
        .chain(id_like.split_whitespace())
        .find_map(distro_family)
        .unwrap_or(OsFamily::Unknown)
}

fn distro_family(distro: &str) -> Option<OsFamily> {
    match distro {
        "debian" | "ubuntu" | "linuxmint" | "pop" | "raspbian" => Some(OsFamily::Debian),
        "centos" | "rhel" | "redhat" | "fedora" | "rocky" | "almalinux" | "ol" => Some(OsFamily::RedHat),
        _ => None,
    }
}

/// Package managers whose index can be refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
    Brew,
    Choco,
}

/// Flags shared by the commands built from the capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    /// Prefix privileged commands with `sudo`.
    pub sudo: bool,
    /// Answer yes to prompts.
    pub assume_yes: bool,
}

impl PackageManager {
    /// Picks the package manager for `family`. On Red Hat systems `dnf` is
    /// preferred when `has_dnf` is `true`.
    pub fn for_family(family: OsFamily, has_dnf: bool) -> Option<Self> {
        match family {
            OsFamily::Debian => Some(PackageManager::Apt),
            OsFamily::RedHat if has_dnf => Some(PackageManager::Dnf),
            OsFamily::RedHat => Some(PackageManager::Yum),
            OsFamily::MacOs => Some(PackageManager::Brew),
            OsFamily::Windows => Some(PackageManager::Choco),
            OsFamily::Unknown => None,
        }
    }

    /// Detects the package manager of the running machine.
    pub fn detect() -> Option<Self> {
        let family = detect_os_family();
        let has_dnf = family == OsFamily::RedHat && program_on_path("dnf");
        let manager = Self::for_family(family, has_dnf);
        log_debug!("[Platform] OS family {} uses {:?}", family, manager);
        manager
    }

    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Brew => "brew",
            PackageManager::Choco => "choco",
        }
    }

    /// Settings key under which index refreshes of this manager are throttled.
    /// For apt this is `apt_source_update_time`, matching existing settings files.
    pub fn throttle_key(&self) -> String {
        format!("{}_source_update_time", self.name())
    }

    /// Command that refreshes the package index, or `None` when the manager
    /// has nothing to refresh.
    pub fn refresh_index_command(&self, opts: CommandOptions) -> Option<CommandSpec> {
        let (program, mut args): (&str, Vec<&str>) = match self {
            PackageManager::Apt => ("apt-get", vec!["update"]),
            PackageManager::Dnf => ("dnf", vec!["makecache"]),
            PackageManager::Yum => ("yum", vec!["makecache"]),
            // Homebrew refuses to run as root, so never sudo it.
            PackageManager::Brew => return Some(CommandSpec::new("brew", ["update"])),
            PackageManager::Choco => return None,
        };
        if opts.assume_yes {
            args.push(match self {
                PackageManager::Apt => "--yes",
                _ => "-y",
            });
        }
        let spec = CommandSpec::new(program, args);
        Some(if opts.sudo { spec.with_sudo() } else { spec })
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `true` if the current user is root. Uses `$USER`, falling back to the
/// name of the home directory.
pub fn running_as_root() -> bool {
    if let Ok(user) = std::env::var("USER") {
        return user == "root";
    }
    dirs::home_dir()
        .and_then(|home| home.file_name().map(|name| name == "root"))
        .unwrap_or(false)
}

/// `true` if `program` is an executable file in one of the `$PATH` directories.
pub fn program_on_path(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UBUNTU: &str = "NAME=\"Ubuntu\"\nID=ubuntu\nID_LIKE=debian\nVERSION_ID=\"22.04\"\n";
    const ROCKY: &str = "NAME=\"Rocky Linux\"\nID=\"rocky\"\nID_LIKE=\"rhel centos fedora\"\n";
    const ELEMENTARY: &str = "ID=elementary\nID_LIKE=\"ubuntu debian\"\n";

    #[test]
    fn os_release_families() {
        assert_eq!(family_from_os_release(UBUNTU), OsFamily::Debian);
        assert_eq!(family_from_os_release(ROCKY), OsFamily::RedHat);
        assert_eq!(family_from_os_release(ELEMENTARY), OsFamily::Debian);
        assert_eq!(family_from_os_release("ID=arch\n"), OsFamily::Unknown);
        assert_eq!(family_from_os_release(""), OsFamily::Unknown);
    }

    #[test]
    fn family_to_manager() {
        assert_eq!(PackageManager::for_family(OsFamily::Debian, false), Some(PackageManager::Apt));
        assert_eq!(PackageManager::for_family(OsFamily::RedHat, true), Some(PackageManager::Dnf));
        assert_eq!(PackageManager::for_family(OsFamily::RedHat, false), Some(PackageManager::Yum));
        assert_eq!(PackageManager::for_family(OsFamily::MacOs, false), Some(PackageManager::Brew));
        assert_eq!(PackageManager::for_family(OsFamily::Windows, false), Some(PackageManager::Choco));
        assert_eq!(PackageManager::for_family(OsFamily::Unknown, false), None);
    }

    #[test]
    fn apt_keeps_legacy_throttle_key() {
        assert_eq!(PackageManager::Apt.throttle_key(), "apt_source_update_time");
        assert_eq!(PackageManager::Brew.throttle_key(), "brew_source_update_time");
    }

    #[test]
    fn refresh_commands() {
        let root_yes = CommandOptions { sudo: false, assume_yes: true };
        let user_no = CommandOptions { sudo: true, assume_yes: false };

        let apt = PackageManager::Apt.refresh_index_command(root_yes).unwrap();
        assert_eq!(apt.display(), "apt-get update --yes");
        let apt = PackageManager::Apt.refresh_index_command(user_no).unwrap();
        assert_eq!(apt.display(), "sudo apt-get update");

        let dnf = PackageManager::Dnf
            .refresh_index_command(CommandOptions { sudo: true, assume_yes: true })
            .unwrap();
        assert_eq!(dnf.display(), "sudo dnf makecache -y");

        let brew = PackageManager::Brew.refresh_index_command(user_no).unwrap();
        assert_eq!(brew.display(), "brew update");

        assert!(PackageManager::Choco.refresh_index_command(root_yes).is_none());
    }
}
