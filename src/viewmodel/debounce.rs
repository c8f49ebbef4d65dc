//! Timer-restart coalescing for a stream of values published on a watch channel.

use std::time::Duration;

use tokio::sync::watch;

/// Apply the latest value of `rx` once it has been left alone for `quiet`.
///
/// Every change restarts the timer. A value equal to the one applied last is
/// skipped. The value present when the observer starts counts as a change, so
/// it is applied after the first quiet period. Returns when the sender is gone.
pub async fn debounce_distinct<T, F>(mut rx: watch::Receiver<T>, quiet: Duration, mut apply: F)
where
    T: Clone + PartialEq,
    F: FnMut(&T),
{
    let mut last_applied: Option<T> = None;
    loop {
        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(quiet) => break,
            }
        }

        let value = rx.borrow_and_update().clone();
        if last_applied.as_ref() != Some(&value) {
            apply(&value);
            last_applied = Some(value);
        }

        if rx.changed().await.is_err() {
            return;
        }
    }
}
