use std::{io, mem::MaybeUninit};

use libc::{getrusage, rusage, RUSAGE_SELF};
use snafu::ResultExt as _;

use crate::{MemoryQuerier, MemoryUsage, QueryError, ResourceQuery};

/// A memory usage querier backed by `getrusage(2)`.
///
/// The resource usage interface only reports the maximum resident set size, so every other field
/// of the sample is marked unavailable. Kernels that maintain the integral memory fields of
/// `struct rusage` can additionally derive a data+stack figure; enable the `integral-rusage`
/// feature on such systems.
#[derive(Default)]
pub struct RusageQuerier;

impl MemoryQuerier for RusageQuerier {
    fn query(&mut self) -> Result<MemoryUsage, QueryError> {
        let mut usage = MaybeUninit::<rusage>::uninit();

        // SAFETY: We're passing a valid pointer to a correctly-sized `rusage` struct.
        let result = unsafe { getrusage(RUSAGE_SELF, usage.as_mut_ptr()) };
        if result != 0 {
            return Err(io::Error::last_os_error()).context(ResourceQuery);
        }

        // SAFETY: We know the structure has been populated by `getrusage` at this point.
        let usage = unsafe { usage.assume_init() };

        let mut sample = MemoryUsage::unavailable();
        sample.rss = i64::from(usage.ru_maxrss);

        #[cfg(feature = "integral-rusage")]
        {
            sample.data_stack = i64::from(usage.ru_idrss) + i64::from(usage.ru_isrss);
        }

        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::RusageQuerier;
    use crate::{MemoryQuerier as _, UNAVAILABLE};

    #[test]
    fn reports_rss_and_sentinels() {
        let mut querier = RusageQuerier;
        let usage = querier.query().unwrap();

        assert!(usage.rss >= 0);
        assert_eq!(usage.size, UNAVAILABLE);
        assert_eq!(usage.share, UNAVAILABLE);
        assert_eq!(usage.text, UNAVAILABLE);

        #[cfg(not(feature = "integral-rusage"))]
        assert_eq!(usage.data_stack, UNAVAILABLE);

        #[cfg(feature = "integral-rusage")]
        assert!(usage.data_stack >= 0);
    }
}
