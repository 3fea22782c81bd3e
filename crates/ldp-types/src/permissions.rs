use std::fmt;

use serde::{Deserialize, Serialize};

/// An access mode from the Web Access Control vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccessMode {
    Read,
    Append,
    Write,
    Control,
}

impl AccessMode {
    pub const ALL: [AccessMode; 4] = [Self::Read, Self::Append, Self::Write, Self::Control];

    /// Local name in the `acl:` namespace.
    pub fn local_name(self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Append => "Append",
            Self::Write => "Write",
            Self::Control => "Control",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

/// Which access modes an operation needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionSet {
    pub read: bool,
    pub append: bool,
    pub write: bool,
    pub control: bool,
}

impl PermissionSet {
    pub fn only(mode: AccessMode) -> Self {
        let mut set = Self::default();
        set.set(mode, true);
        set
    }

    pub fn get(&self, mode: AccessMode) -> bool {
        match mode {
            AccessMode::Read => self.read,
            AccessMode::Append => self.append,
            AccessMode::Write => self.write,
            AccessMode::Control => self.control,
        }
    }

    pub fn set(&mut self, mode: AccessMode, value: bool) {
        match mode {
            AccessMode::Read => self.read = value,
            AccessMode::Append => self.append = value,
            AccessMode::Write => self.write = value,
            AccessMode::Control => self.control = value,
        }
    }

    /// The requested modes, in vocabulary order.
    pub fn modes(&self) -> impl Iterator<Item = AccessMode> + '_ {
        AccessMode::ALL.into_iter().filter(|mode| self.get(*mode))
    }

    pub fn is_empty(&self) -> bool {
        self.modes().next().is_none()
    }

    /// Union of two sets.
    pub fn merge(self, other: Self) -> Self {
        Self {
            read: self.read || other.read,
            append: self.append || other.append,
            write: self.write || other.write,
            control: self.control || other.control,
        }
    }
}
