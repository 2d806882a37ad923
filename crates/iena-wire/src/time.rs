//! The header's packed timestamp representation.
//!
//! The wire timestamp is a 40-bit microsecond count since a reference
//! instant, carried as an 8-bit high part and a 32-bit low part. It is
//! not byte-aligned to any standard integer width, so the header codec
//! treats the two sub-fields explicitly while the API surface exposes a
//! single logical microsecond value.

/// Microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// The packed timestamp wraps at 40 bits (a little under 13 days).
pub const TIME_WRAP_USEC: u64 = 1 << 40;

/// Pack a (seconds, microseconds) instant into the wire's high/low split.
///
/// Instants beyond the 40-bit range are truncated. That bound is inherent
/// to the wire representation, not a defect to repair here.
pub fn pack_time(seconds: u64, microseconds: u32) -> (u8, u32) {
    // Only the low 40 bits survive, so wrapping arithmetic loses nothing.
    split_usec(
        seconds
            .wrapping_mul(MICROS_PER_SEC)
            .wrapping_add(u64::from(microseconds)),
    )
}

/// Split a raw microsecond count into the high/low wire fields.
pub fn split_usec(usec: u64) -> (u8, u32) {
    let usec = usec % TIME_WRAP_USEC;
    ((usec >> 32) as u8, usec as u32)
}

/// Reassemble the microsecond count from the wire fields.
pub fn unpack_time(high: u8, low: u32) -> u64 {
    (u64::from(high) << 32) | u64::from(low)
}
