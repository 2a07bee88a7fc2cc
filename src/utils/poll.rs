//! Bounded busy waiting

/// Polls `done` until it returns `true` or `retries` polls were made
///
/// Returns `true` if `done` reported completion within the budget.
///
/// # Examples
///
/// ```
/// use nrf_ble_radio::utils::poll::poll_until;
///
/// let mut polls = 0;
/// assert!(poll_until(10, || {
///     polls += 1;
///     polls == 3
/// }));
/// assert!(!poll_until(10, || false));
/// ```
pub fn poll_until<F>(retries: u32, mut done: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..retries {
        if done() {
            return true;
        }
        core::hint::spin_loop();
    }
    false
}
