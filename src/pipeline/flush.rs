//! Frame flush - settle layout and deliver resize observations.

use crate::config;
use crate::layout;
use crate::state::resize_observer;

/// Bring layout up to date and deliver pending resize observations.
///
/// Observers may mutate the tree, which can produce new observations, so
/// delivery repeats until nothing is pending or `host.max_flush_passes` is
/// reached. Anything still pending after the last pass waits for the next
/// flush. Returns the number of passes that delivered something.
pub fn flush() -> usize {
    let max_passes = config::current().host.max_flush_passes;
    let mut passes = 0;

    loop {
        layout::ensure_layout();
        if resize_observer::deliver_pending() == 0 {
            break;
        }
        passes += 1;

        if passes >= max_passes {
            if resize_observer::has_pending() {
                log::warn!(
                    "resize observations still pending after {} passes, deferring to next flush",
                    passes
                );
            }
            break;
        }
    }

    passes
}
