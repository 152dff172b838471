//! Best-effort capture of raw return addresses

/// Fill `out` with instruction pointers of the current call stack, innermost first.
///
/// Returns how many entries were written. Never fails: a platform without unwinding
/// support just yields zero entries. Addresses are not symbolicated.
pub fn capture_return_addresses(out: &mut [usize]) -> usize {
    let mut count = 0;
    if out.is_empty() {
        return count;
    }

    backtrace::trace(|frame| {
        out[count] = frame.ip() as usize;
        count += 1;
        count < out.len()
    });

    count
}
