//! Test assertion helpers.
//!
//! Polling-based assertions for tests that coordinate several threads.

use std::thread::sleep;
use std::time::{Duration, Instant};

/// Default polling interval for [`assert_eventually`].
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Polls a condition until it returns true or the timeout expires.
///
/// Use this instead of a fixed sleep when waiting for another thread to
/// reach a point, such as a commit entering the store.
///
/// # Returns
///
/// `true` if the condition became true before timeout, `false` otherwise.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::time::Duration;
/// use rowstore_test_utils::assert_eventually;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let setter = Arc::clone(&flag);
/// std::thread::spawn(move || setter.store(true, Ordering::SeqCst));
///
/// assert!(assert_eventually(Duration::from_secs(1), || flag.load(Ordering::SeqCst)));
/// ```
pub fn assert_eventually<F>(timeout: Duration, condition: F) -> bool
where
    F: Fn() -> bool,
{
    let start = Instant::now();

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        sleep(DEFAULT_POLL_INTERVAL);
    }

    // Final check after timeout
    condition()
}
