//! Fixed-point conversion between raw counter ticks and nanoseconds.
//!
//! Counters tick at arbitrary frequencies (1 kHz tick counts, 1 MHz wall clocks,
//! multi-GHz performance counters). Multiplying a raw tick count by `1e9` before
//! dividing by the frequency overflows `u64` after a few seconds of uptime on fast
//! counters, so both directions split the value into a whole-second part and a
//! sub-second remainder and scale each separately.
//!
//! Both conversions are exact (they equal `floor(x * a / b)` computed in 128 bits).
//! Up to `MAX_FREQUENCY` the remainder term stays in `u64`; faster counters
//! widen only that term. Results that do not fit in `u64` saturate at
//! `u64::MAX` (roughly 584 years of nanoseconds).

/// Nanoseconds per second.
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Largest frequency for which the remainder products stay within `u64`.
///
/// `(frequency - 1) * 1e9` does not overflow up to ~18.4 GHz. Above that the
/// remainder term is computed in 128 bits.
pub const MAX_FREQUENCY: u64 = u64::MAX / NANOS_PER_SEC;

/// Converts `ticks` of a counter running at `frequency` Hz to nanoseconds.
#[inline]
pub fn ticks_to_nanos(ticks: u64, frequency: u64) -> u64 {
    debug_assert!(frequency > 0);

    let whole = (ticks / frequency).saturating_mul(NANOS_PER_SEC);
    let frac = mul_div(ticks % frequency, NANOS_PER_SEC, frequency);

    whole.saturating_add(frac)
}

/// Converts `nanos` to ticks of a counter running at `frequency` Hz.
///
/// Inverse of [`ticks_to_nanos`], rounding down to whole ticks.
#[inline]
pub fn nanos_to_ticks(nanos: u64, frequency: u64) -> u64 {
    debug_assert!(frequency > 0);

    let whole = (nanos / NANOS_PER_SEC).saturating_mul(frequency);
    let frac = mul_div(nanos % NANOS_PER_SEC, frequency, NANOS_PER_SEC);

    whole.saturating_add(frac)
}

/// `a * b / c` for `a < c`, so the quotient is below `b` and always fits.
#[inline]
fn mul_div(a: u64, b: u64, c: u64) -> u64 {
    match a.checked_mul(b) {
        Some(product) => product / c,
        None => (u128::from(a) * u128::from(b) / u128::from(c)) as u64,
    }
}
