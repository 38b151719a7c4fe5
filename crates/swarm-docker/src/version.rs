use std::fmt;
use std::str::FromStr;

use crate::errors::DockerError;

/// Engine API version, `major.minor`. Ordered numerically, so `1.9 < 1.41`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    major: u16,
    minor: u16,
}

impl ApiVersion {
    /// Highest version this client is written against.
    pub const DEFAULT_MAX: ApiVersion = ApiVersion::new(1, 43);

    /// Assumed when a daemon reports no `ApiVersion` at all.
    pub const LEGACY: ApiVersion = ApiVersion::new(1, 24);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Path segment used in request URLs, e.g. `v1.43`.
    pub fn path_segment(&self) -> String {
        format!("v{self}")
    }
}

impl FromStr for ApiVersion {
    type Err = DockerError;

    /// Accepts `1.43` and `v1.43`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let digits = raw.strip_prefix('v').unwrap_or(raw);
        let invalid = || DockerError::InvalidConfig(format!("invalid api version '{s}'"));

        let (major, minor) = digits.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
