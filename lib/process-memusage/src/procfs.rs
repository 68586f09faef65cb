use std::{fs::File, io::Read, path::PathBuf};

use snafu::ResultExt as _;
use tracing::error;

use crate::{IdentifierTooLarge, MalformedStatm, MemoryQuerier, MemoryUsage, Open, QueryError};

const DEFAULT_PROCFS_ROOT: &str = "/proc";

/// Largest process identifier accepted when building the statm path.
///
/// Identifiers beyond six digits are rejected before the path is built; callers depend on that
/// failure mode.
const MAX_FORMATTABLE_PID: u32 = 999_999;

/// A memory usage querier backed by procfs.
///
/// Reads the first five fields of `/proc/<pid>/statm`, which map directly onto a [`MemoryUsage`]
/// sample, measured in pages. The two trailing statm fields are ignored.
pub struct ProcfsQuerier {
    procfs_root: PathBuf,
    pid: u32,
}

impl ProcfsQuerier {
    /// Creates a querier reading from the given procfs root instead of `/proc`.
    ///
    /// Useful when procfs is mounted somewhere else, such as a host-mapped `/host/proc` inside a
    /// container.
    pub fn with_procfs_root<P: Into<PathBuf>>(procfs_root: P) -> Self {
        Self {
            procfs_root: procfs_root.into(),
            pid: std::process::id(),
        }
    }
}

impl Default for ProcfsQuerier {
    fn default() -> Self {
        Self::with_procfs_root(DEFAULT_PROCFS_ROOT)
    }
}

impl MemoryQuerier for ProcfsQuerier {
    fn query(&mut self) -> Result<MemoryUsage, QueryError> {
        if self.pid > MAX_FORMATTABLE_PID {
            error!(pid = self.pid, "Process ID too large to address under procfs.");
            return IdentifierTooLarge { pid: self.pid }.fail();
        }

        let path = self.procfs_root.join(self.pid.to_string()).join("statm");
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                error!(path = %path.display(), "Failed to open statm.");
                return Err(e).context(Open { path });
            }
        };

        // statm is a single short line of space-delimited integers, so a small stack buffer is
        // plenty: seven 20-digit fields plus separators still leave room to spare.
        let mut buf = [0; 256];
        let n = file.read(&mut buf).context(Open { path: path.clone() })?;
        if n == 0 || n == buf.len() {
            // Reading no bytes, or filling the entire buffer, means whatever we're looking at is
            // not a real statm file.
            return MalformedStatm { path }.fail();
        }

        parse_statm(&buf[..n]).ok_or_else(|| MalformedStatm { path }.build())
    }
}

/// Parses the five leading fields of a statm line.
///
/// Returns `None` unless five non-negative integers can be parsed; anything after the fifth field
/// is ignored.
fn parse_statm(raw: &[u8]) -> Option<MemoryUsage> {
    let contents = std::str::from_utf8(raw).ok()?;
    let mut fields = contents.split_ascii_whitespace();
    let mut next_field = || -> Option<i64> {
        let value = fields.next()?.parse::<i64>().ok()?;
        (value >= 0).then_some(value)
    };

    Some(MemoryUsage {
        size: next_field()?,
        rss: next_field()?,
        share: next_field()?,
        text: next_field()?,
        data_stack: next_field()?,
    })
}
