/// Status lines shown while filling, one per 15% bucket; the last one covers everything from 90% up.
pub const STATUS_MESSAGES: [&str; 7] = [
    "Initializing system...",
    "Loading components...",
    "Processing data...",
    "Transferring files...",
    "Almost complete...",
    "Finalizing...",
    "Completing installation...",
];

/// Shown for the whole drain.
pub const LEAK_MESSAGE: &str = "Leak detected! Draining system...";

/// Shown while the repair delay runs.
pub const REPAIR_MESSAGE: &str = "Patching leaks... Restarting flow...";

/// Shown by the gated variant while it waits for a (re)start.
pub const IDLE_MESSAGE: &str = "System idle. Press start to begin.";

const BUCKET_WIDTH: f64 = 15.0;

/// Index into [`STATUS_MESSAGES`] for a progress value.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss, reason = "value is floored and clamped to a small non-negative range first")]
pub fn status_index(progress: f64) -> usize {
    let last = STATUS_MESSAGES.len() - 1;
    let bucket = (progress / BUCKET_WIDTH).floor();
    if bucket.is_nan() || bucket <= 0.0 {
        0
    } else if bucket >= last as f64 {
        last
    } else {
        bucket as usize
    }
}

#[must_use]
pub fn status_message(progress: f64) -> &'static str {
    STATUS_MESSAGES[status_index(progress)]
}
