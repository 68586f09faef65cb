use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sentinel marking a field the current platform cannot supply.
pub const UNAVAILABLE: i64 = -1;

/// A point-in-time memory usage sample for a process.
///
/// Values are in OS-native units: pages when read from procfs, kilobytes when derived from
/// `getrusage(2)`. Every field is either a non-negative measurement or exactly [`UNAVAILABLE`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemoryUsage {
    /// Total virtual size of the process.
    pub size: i64,

    /// Resident set size.
    pub rss: i64,

    /// Shared pages.
    pub share: i64,

    /// Text (code) segment size.
    pub text: i64,

    /// Data plus stack segment size.
    pub data_stack: i64,
}

impl MemoryUsage {
    /// Creates a sample with every field marked unavailable.
    pub const fn unavailable() -> Self {
        Self {
            size: UNAVAILABLE,
            rss: UNAVAILABLE,
            share: UNAVAILABLE,
            text: UNAVAILABLE,
            data_stack: UNAVAILABLE,
        }
    }

    /// Returns `true` if every field holds a measurement rather than the sentinel.
    pub fn is_complete(&self) -> bool {
        self.size != UNAVAILABLE
            && self.rss != UNAVAILABLE
            && self.share != UNAVAILABLE
            && self.text != UNAVAILABLE
            && self.data_stack != UNAVAILABLE
    }
}

impl fmt::Display for MemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "size={} rss={} share={} text={} data_stack={}",
            self.size, self.rss, self.share, self.text, self.data_stack
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryUsage, UNAVAILABLE};

    #[test]
    fn unavailable_sample_is_incomplete() {
        let usage = MemoryUsage::unavailable();
        assert_eq!(usage.rss, UNAVAILABLE);
        assert!(!usage.is_complete());
    }

    #[test]
    fn full_sample_is_complete() {
        let usage = MemoryUsage {
            size: 100,
            rss: 50,
            share: 10,
            text: 5,
            data_stack: 20,
        };
        assert!(usage.is_complete());
        assert_eq!(usage.to_string(), "size=100 rss=50 share=10 text=5 data_stack=20");
    }
}
