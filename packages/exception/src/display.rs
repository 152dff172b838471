//! Display and trait implementations for Exception

use super::types::{Context, Durability, Exception, Nature};
use std::fmt;

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PreconditionViolation => "requirement not met",
            Self::InternalBug => "bug in code",
            Self::OsError => "error from OS",
            Self::NetworkFailure => "network failure",
            Self::Unclassified => "error",
        })
    }
}

impl fmt::Display for Durability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Temporary => "temporary",
            Self::Permanent => "permanent",
        })
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: context: {}", self.file, self.line, self.description)
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.contexts() {
            writeln!(f, "{frame}")?;
        }

        write!(f, "{}:{}: {}", self.file, self.line, self.nature)?;

        if self.durability == Durability::Temporary {
            f.write_str(" (temporary)")?;
        }

        if !self.description.is_empty() {
            write!(f, ": {}", self.description)?;
        }

        f.write_str("\nstack: ")?;
        for (i, addr) in self.stack_trace().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{addr:#x}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Exception {}
