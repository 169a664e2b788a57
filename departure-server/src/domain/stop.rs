//! Stop identity types.

use std::fmt;

/// Error returned when parsing an invalid stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// An externally-defined stop identifier from the topology document.
///
/// NeTEx ids are free-form strings (e.g. `FR:05046:ZDE:10995:STAN`), so the
/// only guarantee this type makes is that the id is non-empty and carries no
/// surrounding whitespace.
///
/// # Examples
///
/// ```
/// use departure_server::domain::StopId;
///
/// let id = StopId::parse("FR:05046:ZDE:10995:STAN").unwrap();
/// assert_eq!(id.as_str(), "FR:05046:ZDE:10995:STAN");
///
/// assert!(StopId::parse("").is_err());
/// assert!(StopId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(String);

impl StopId {
    /// Parse a stop id from a string.
    ///
    /// Surrounding whitespace is trimmed; the remainder must be non-empty.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStopId {
                reason: "must not be empty",
            });
        }

        Ok(StopId(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A physical stopping point from the topology document.
///
/// Built once by the topology loader; immutable after registry build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    /// Externally-defined stop identifier.
    pub id: StopId,

    /// Human-readable stop name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_id() {
        let id = StopId::parse("FR:05046:ZDE:10995:STAN").unwrap();
        assert_eq!(id.as_str(), "FR:05046:ZDE:10995:STAN");
    }

    #[test]
    fn parse_trims_whitespace() {
        let id = StopId::parse("  STOP:1  ").unwrap();
        assert_eq!(id.as_str(), "STOP:1");
    }

    #[test]
    fn reject_empty() {
        assert!(StopId::parse("").is_err());
        assert!(StopId::parse("   ").is_err());
        assert!(StopId::parse("\t\n").is_err());
    }

    #[test]
    fn display() {
        let id = StopId::parse("STOP:1").unwrap();
        assert_eq!(format!("{}", id), "STOP:1");
    }

    #[test]
    fn debug() {
        let id = StopId::parse("STOP:1").unwrap();
        assert_eq!(format!("{:?}", id), "StopId(STOP:1)");
    }

    #[test]
    fn equality_and_hash() {
        use std::collections::HashSet;

        let a = StopId::parse("STOP:1").unwrap();
        let b = StopId::parse("STOP:1").unwrap();
        let c = StopId::parse("STOP:2").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }
}
