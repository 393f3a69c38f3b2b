//! Unit conversion utilities.
//!
//! Canvas geometry is computed in inches, font sizes are in points and the
//! document model stores lengths in EMUs (English Metric Units).

pub const EMUS_PER_INCH: i64 = 914_400;
pub const POINTS_PER_INCH: f64 = 72.0;

#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

#[inline]
pub fn inches_to_pt(inches: f64) -> f64 {
    inches * POINTS_PER_INCH
}

/// Font size in the hundredths-of-a-point encoding used by `a:rPr/@sz`.
#[inline]
pub fn pt_to_centipoints(pt: u32) -> u32 {
    pt.saturating_mul(100)
}
