//! Host user identity used to map container processes back to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HarnessResult;

/// Numeric user and group id of the invoking host user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostIdentity {
    pub uid: u32,
    pub gid: u32,
}

impl HostIdentity {
    pub fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid }
    }

    /// Query the real uid/gid of the current process.
    #[cfg(unix)]
    pub fn resolve() -> HarnessResult<Self> {
        use nix::unistd::{getgid, getuid};

        Ok(Self {
            uid: getuid().as_raw(),
            gid: getgid().as_raw(),
        })
    }

    #[cfg(not(unix))]
    pub fn resolve() -> HarnessResult<Self> {
        Err(crate::error::HarnessError::IdentityUnavailable(
            "uid/gid lookup requires a unix host".to_string(),
        ))
    }

    /// Value for the container runtime's `--user` flag.
    pub fn user_opt(&self) -> String {
        format!("{}:{}", self.uid, self.gid)
    }
}

impl fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_opt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_opt_format() {
        assert_eq!(HostIdentity::new(1000, 1000).user_opt(), "1000:1000");
        assert_eq!(HostIdentity::new(0, 27).to_string(), "0:27");
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_is_stable() {
        let first = HostIdentity::resolve().expect("resolve identity");
        let second = HostIdentity::resolve().expect("resolve identity");
        assert_eq!(first, second);
    }
}
