use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{CleanError, ConfigError};

/// Which temp directories a cleanup run touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetGroup {
    /// Every configured directory.
    All,
    /// System-owned temp locations.
    System,
    /// The per-user temp location.
    User,
}

impl TargetGroup {
    pub const ALL: [TargetGroup; 3] = [TargetGroup::All, TargetGroup::System, TargetGroup::User];

    /// Single-letter selector accepted by `--trgt`.
    pub fn selector(self) -> &'static str {
        match self {
            TargetGroup::All => "a",
            TargetGroup::System => "w",
            TargetGroup::User => "r",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TargetGroup::All => "all",
            TargetGroup::System => "system",
            TargetGroup::User => "user",
        }
    }

    /// One-line explanation shown when an unknown selector is given.
    pub fn help(self) -> &'static str {
        match self {
            TargetGroup::All => "cleans all files from all temp directories and the recycle bin",
            TargetGroup::System => "cleans all files from system temp directories and the recycle bin",
            TargetGroup::User => "cleans all files from the user temp directory",
        }
    }

    /// The recycle bin is emptied alongside the system locations only.
    pub fn empties_recycle_bin(self) -> bool {
        matches!(self, TargetGroup::All | TargetGroup::System)
    }
}

impl FromStr for TargetGroup {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" | "all" => Ok(TargetGroup::All),
            "w" | "system" => Ok(TargetGroup::System),
            "r" | "user" => Ok(TargetGroup::User),
            other => Err(CleanError::InvalidSelector(other.to_string())),
        }
    }
}

impl fmt::Display for TargetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two disjoint directory partitions. `All` is `system` followed by `user`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    system: Vec<PathBuf>,
    user: Vec<PathBuf>,
}

impl TargetSet {
    /// Build a target set, rejecting empty groups and directories listed twice.
    pub fn new(system: Vec<PathBuf>, user: Vec<PathBuf>) -> Result<Self, ConfigError> {
        if system.is_empty() {
            return Err(ConfigError::EmptyGroup("system"));
        }
        if user.is_empty() {
            return Err(ConfigError::EmptyGroup("user"));
        }
        if let Some(dup) = system.iter().find(|p| user.contains(p)) {
            return Err(ConfigError::OverlappingTarget(dup.clone()));
        }
        Ok(Self { system, user })
    }

    pub fn system(&self) -> &[PathBuf] {
        &self.system
    }

    pub fn user(&self) -> &[PathBuf] {
        &self.user
    }

    /// Directories for `group`, in processing order.
    pub fn resolve(&self, group: TargetGroup) -> Vec<&Path> {
        match group {
            TargetGroup::All => self
                .system
                .iter()
                .chain(self.user.iter())
                .map(PathBuf::as_path)
                .collect(),
            TargetGroup::System => self.system.iter().map(PathBuf::as_path).collect(),
            TargetGroup::User => self.user.iter().map(PathBuf::as_path).collect(),
        }
    }
}

impl Default for TargetSet {
    fn default() -> Self {
        Self {
            system: default_system_dirs(),
            user: default_user_dirs(),
        }
    }
}

#[cfg(windows)]
pub fn default_system_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from(r"C:\Windows\Downloaded Program Files"),
        PathBuf::from(r"C:\Windows\Temp"),
    ]
}

#[cfg(not(windows))]
pub fn default_system_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("/var/tmp")]
}

#[cfg(windows)]
pub fn default_user_dirs() -> Vec<PathBuf> {
    let temp = dirs::data_local_dir()
        .map(|d| d.join("Temp"))
        .unwrap_or_else(std::env::temp_dir);
    vec![temp]
}

#[cfg(not(windows))]
pub fn default_user_dirs() -> Vec<PathBuf> {
    vec![std::env::temp_dir()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TargetSet {
        TargetSet::new(
            vec![PathBuf::from("/sys/a"), PathBuf::from("/sys/b")],
            vec![PathBuf::from("/home/me/tmp")],
        )
        .unwrap()
    }

    #[test]
    fn parses_selectors() {
        assert_eq!("a".parse::<TargetGroup>().unwrap(), TargetGroup::All);
        assert_eq!("w".parse::<TargetGroup>().unwrap(), TargetGroup::System);
        assert_eq!("r".parse::<TargetGroup>().unwrap(), TargetGroup::User);
        assert_eq!("user".parse::<TargetGroup>().unwrap(), TargetGroup::User);
    }

    #[test]
    fn rejects_unknown_selector() {
        let err = "x".parse::<TargetGroup>().unwrap_err();
        assert!(matches!(err, CleanError::InvalidSelector(s) if s == "x"));
        assert!("A".parse::<TargetGroup>().is_err());
        assert!("".parse::<TargetGroup>().is_err());
    }

    #[test]
    fn selector_round_trips() {
        for group in TargetGroup::ALL {
            assert_eq!(group.selector().parse::<TargetGroup>().unwrap(), group);
        }
    }

    #[test]
    fn all_is_union_of_partitions() {
        let set = sample();
        let all = set.resolve(TargetGroup::All);
        let system = set.resolve(TargetGroup::System);
        let user = set.resolve(TargetGroup::User);

        assert_eq!(all.len(), system.len() + user.len());
        assert_eq!(&all[..system.len()], &system[..]);
        assert_eq!(&all[system.len()..], &user[..]);
        assert!(system.iter().all(|p| !user.contains(p)));
    }

    #[test]
    fn recycle_bin_only_for_system_groups() {
        assert!(TargetGroup::All.empties_recycle_bin());
        assert!(TargetGroup::System.empties_recycle_bin());
        assert!(!TargetGroup::User.empties_recycle_bin());
    }

    #[test]
    fn rejects_empty_group() {
        let err = TargetSet::new(vec![], vec![PathBuf::from("/u")]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGroup("system")));
        let err = TargetSet::new(vec![PathBuf::from("/s")], vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGroup("user")));
    }

    #[test]
    fn rejects_overlap() {
        let err = TargetSet::new(
            vec![PathBuf::from("/shared")],
            vec![PathBuf::from("/shared")],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::OverlappingTarget(p) if p == Path::new("/shared")));
    }

    #[test]
    fn defaults_are_non_empty() {
        let set = TargetSet::default();
        assert!(!set.system().is_empty());
        assert!(!set.user().is_empty());
    }
}
