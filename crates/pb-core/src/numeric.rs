use crate::PbError;

/// Liquid quantities below this are treated as zero (liters).
///
/// Shared by tanks, transfer bookkeeping, and recipe-sum validation so that
/// "empty", "target reached", and "recipe adds up" all agree on a boundary.
pub const EPSILON_LITERS: f64 = 1e-6;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, PbError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PbError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_finite_rejects_infinities() {
        assert!(ensure_finite(f64::INFINITY, "test").is_err());
        assert!(ensure_finite(f64::NEG_INFINITY, "test").is_err());
    }

    #[test]
    fn ensure_finite_passes_values_through() {
        assert_eq!(ensure_finite(42.5, "test").unwrap(), 42.5);
    }
}
