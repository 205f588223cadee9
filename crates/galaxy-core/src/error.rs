use thiserror::Error;

/// Configuration errors raised while building particle layers.
///
/// Frame updates never fail; everything here is caught before the first
/// particle is placed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    /// Radial bounds where the inner edge does not sit strictly inside the outer edge.
    #[error("{layer}: inner radius {inner} must be smaller than outer radius {outer}")]
    InvalidRadius {
        layer: &'static str,
        inner: f32,
        outer: f32,
    },
    /// Any other `[min, max]` pair that is empty or inverted.
    #[error("{layer}: {what} range [{min}, {max}] is empty or inverted")]
    InvalidRange {
        layer: &'static str,
        what: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{layer}: {what} {value} is outside ({min}, {max}]")]
    OutOfRange {
        layer: &'static str,
        what: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("{layer}: {what} must be finite, got {value}")]
    NonFinite {
        layer: &'static str,
        what: &'static str,
        value: f32,
    },
    #[error("particle count for {layer} must not be negative, got {count}")]
    NegativeCount { layer: String, count: i64 },
    #[error("unknown layer name `{0}`")]
    UnknownLayer(String),
    #[error("viewport {width}x{height} must have positive dimensions")]
    InvalidViewport { width: f32, height: f32 },
}

pub type Result<T> = std::result::Result<T, FieldError>;

/// Fails with [`FieldError::NonFinite`] unless `value` is a real number.
pub(crate) fn ensure_finite(layer: &'static str, what: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FieldError::NonFinite { layer, what, value })
    }
}

/// Fails unless `min <= max` and both ends are finite.
pub(crate) fn ensure_range(
    layer: &'static str,
    what: &'static str,
    min: f32,
    max: f32,
) -> Result<()> {
    ensure_finite(layer, what, min)?;
    ensure_finite(layer, what, max)?;
    if min > max {
        return Err(FieldError::InvalidRange {
            layer,
            what,
            min,
            max,
        });
    }
    Ok(())
}

/// Fails unless `0 <= min <= max`.
pub(crate) fn ensure_sizes(layer: &'static str, min: f32, max: f32) -> Result<()> {
    ensure_range(layer, "size", min, max)?;
    ensure_range(layer, "size", 0.0, min)
}

/// Fails unless `0 <= inner < outer`, the radial bounds of a disk or shell.
pub(crate) fn ensure_radii(layer: &'static str, inner: f32, outer: f32) -> Result<()> {
    ensure_finite(layer, "inner radius", inner)?;
    ensure_finite(layer, "outer radius", outer)?;
    if inner < 0.0 || inner >= outer {
        return Err(FieldError::InvalidRadius {
            layer,
            inner,
            outer,
        });
    }
    Ok(())
}
