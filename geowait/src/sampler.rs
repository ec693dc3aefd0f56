//! Inverse-transform sampling of geometric delays.
//!
//! With `x = ln(1 - y) / ln(1 - p)`, `floor(x)` counts the failed slots before
//! the first success when every slot succeeds with probability `p`. The delay
//! is `x - 1` truncated toward zero: `floor(x) - 1` once `x >= 1`, and `0` for
//! `x` in `(0, 1)`. Writing `q = 1 - p`, a delay of `0` has probability
//! `1 - q^2` and the mean is `q / p - q`.

use crate::error::{DomainError, FindError};
use rand::Rng;
use tracing::debug;

/// Draw one delay using a single uniform sample from `rng`.
pub fn sample_delay<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> Result<i64, FindError> {
    check_scale(scale)?;
    let y: f64 = rng.gen();
    let delay = delay_from_uniform(y, scale)?;
    debug!(scale, y, delay, "sampled delay");
    Ok(delay)
}

/// Map a uniform draw `y` in `[0, 1)` to a delay.
///
/// A draw at or within rounding distance of `0` yields `-1`; every other draw
/// gives a non-negative delay. The value is returned as is; callers that
/// cannot accept a negative wait clamp it themselves.
pub fn delay_from_uniform(y: f64, scale: f64) -> Result<i64, FindError> {
    check_scale(scale)?;
    if !(0.0..1.0).contains(&y) {
        return Err(DomainError::UniformOutOfRange(y).into());
    }
    let trials = (-y).ln_1p() / (-scale).ln_1p();
    Ok((trials - 1.0) as i64)
}

fn check_scale(scale: f64) -> Result<(), FindError> {
    if scale > 0.0 && scale < 1.0 {
        Ok(())
    } else {
        Err(DomainError::ScaleOutOfRange(scale).into())
    }
}
