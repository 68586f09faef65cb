//! C ABI surface for callers without struct-return conventions.
//!
//! Fortran and C callers take the five output arguments by reference and get an integer status
//! back, so this surface is a single flat function behind the `ffi` feature. Rust callers should
//! use [`query`][crate::query] instead.

use std::os::raw::c_int;

use crate::{MemoryQuerier as _, Querier};

/// Queries the current process's memory usage, storing the sample through the given pointers.
///
/// Returns `0` on success after storing all five fields, `-1` on failure (including any null
/// output pointer), in which case nothing is stored. Fields the platform cannot supply are stored
/// as `-1`.
///
/// # Safety
///
/// Each pointer must be either null or valid for writing an `i64`.
#[no_mangle]
pub unsafe extern "C" fn memusage_query(
    size: *mut i64, rss: *mut i64, share: *mut i64, text: *mut i64, data_stack: *mut i64,
) -> c_int {
    if size.is_null() || rss.is_null() || share.is_null() || text.is_null() || data_stack.is_null()
    {
        return -1;
    }

    match Querier::default().query() {
        Ok(usage) => {
            // SAFETY: The caller guarantees non-null pointers are valid for writes.
            unsafe {
                size.write(usage.size);
                rss.write(usage.rss);
                share.write(usage.share);
                text.write(usage.text);
                data_stack.write(usage.data_stack);
            }
            0
        }
        Err(_) => -1,
    }
}
