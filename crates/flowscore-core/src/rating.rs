//! Focus rating scale conversion.

/// Map a 1-5 rating onto the engine's 1-10 scale.
///
/// 1 → 1, 2 → 3.25, 3 → 5.5, 4 → 7.75, 5 → 10. Out-of-range input is passed
/// through the same line unclamped; the engine clamps when it consumes the
/// result.
pub fn convert_focus_rating(rating5: f64) -> f64 {
    (rating5 - 1.0) * 2.25 + 1.0
}
