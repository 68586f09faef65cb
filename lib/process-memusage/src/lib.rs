//! Process memory usage querying.
//!
//! This crate provides a single-shot query of a process's memory usage: virtual size, resident set
//! size, shared pages, text segment size, and data+stack segment size. Fields the current platform
//! cannot supply are reported as [`UNAVAILABLE`].
//!
//! ## Linux
//!
//! On Linux-like systems, [procfs](https://docs.kernel.org/filesystems/proc.html) is used: the
//! first five fields of `/proc/<pid>/statm` map directly onto the sample, measured in pages.
//!
//! ## Other Unix systems
//!
//! Elsewhere, [`getrusage(2)`](https://man7.org/linux/man-pages/man2/getrusage.2.html) is used. It
//! can only supply the maximum resident set size, so every other field is reported as unavailable.
//! Kernels that maintain the integral memory fields of `struct rusage` can additionally derive a
//! data+stack figure; enable the `integral-rusage` feature on such systems.

#![deny(missing_docs)]

use std::{io, path::PathBuf};

use snafu::Snafu;

mod sample;
pub use self::sample::{MemoryUsage, UNAVAILABLE};

#[cfg(any(target_os = "linux", target_os = "android"))]
mod procfs;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub use self::procfs::ProcfsQuerier;

#[cfg(unix)]
mod rusage;
#[cfg(unix)]
pub use self::rusage::RusageQuerier;

#[cfg(all(unix, feature = "ffi"))]
pub mod ffi;

/// The default querier for this platform.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub type Querier = ProcfsQuerier;

/// The default querier for this platform.
#[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
pub type Querier = RusageQuerier;

/// A memory usage query error.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)))]
pub enum QueryError {
    /// Process identifier too large to address under procfs.
    #[snafu(display("process ID {} is too large to address under procfs", pid))]
    IdentifierTooLarge {
        /// The offending process identifier.
        pid: u32,
    },

    /// Failed to read the statm file.
    #[snafu(display("failed to read {}: {}", path.display(), source))]
    Open {
        /// Path that could not be read.
        path: PathBuf,

        /// Error source.
        source: io::Error,
    },

    /// The statm file did not hold five parsable fields.
    #[snafu(display("malformed statm contents in {}", path.display()))]
    MalformedStatm {
        /// Path holding the malformed contents.
        path: PathBuf,
    },

    /// The resource usage syscall failed.
    #[snafu(display("getrusage failed: {}", source))]
    ResourceQuery {
        /// Error source.
        source: io::Error,
    },
}

/// A source of process memory usage samples.
pub trait MemoryQuerier {
    /// Queries the process's memory usage once.
    ///
    /// On success, every field of the returned sample is either a non-negative measurement or
    /// exactly [`UNAVAILABLE`].
    ///
    /// ## Errors
    ///
    /// If the underlying platform source cannot be queried, an error is returned.
    fn query(&mut self) -> Result<MemoryUsage, QueryError>;
}

/// Queries the current process's memory usage once.
///
/// Convenience for constructing the platform's default [`Querier`] and querying it a single time.
///
/// ## Errors
///
/// If the underlying platform source cannot be queried, an error is returned.
#[cfg(unix)]
pub fn query() -> Result<MemoryUsage, QueryError> {
    Querier::default().query()
}

#[cfg(all(test, unix))]
mod tests {
    use super::query;

    #[test]
    fn fields_are_measurements_or_sentinel() {
        let usage = query().unwrap();
        for value in [usage.size, usage.rss, usage.share, usage.text, usage.data_stack] {
            assert!(value >= -1);
        }
    }

    #[test]
    fn repeated_queries_stay_sane() {
        // Back-to-back queries on a quiescent process should both succeed and report a resident
        // set; we don't assert strict equality since the allocator may shift things underneath us.
        let first = query().unwrap();
        let second = query().unwrap();
        assert!(first.rss >= -1);
        assert!(second.rss >= -1);
    }
}
