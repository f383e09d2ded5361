use crate::{
    error::{Error, Result},
    types::{BinPoint, DegeneratePolicy},
};
use itertools::{Itertools, MinMaxResult};
use tracing::warn;

/// Returns the minimum and maximum over the finite intensity values.
pub fn intensity_range(points: &[BinPoint]) -> Option<(f32, f32)> {
    let finite = points
        .iter()
        .map(|point| point.intensity)
        .filter(|intensity| intensity.is_finite());

    // finite floats are totally ordered
    match finite.minmax_by(|lhs, rhs| lhs.total_cmp(rhs)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(value) => Some((value, value)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

/// Maps each intensity to a gray `[n, n, n]` color, where `n` is the
/// intensity min-max normalized over the whole scan.
///
/// Returns `Ok(None)` when the scan should be written without colors,
/// which only happens for a degenerate range under
/// [`DegeneratePolicy::Uncolored`].
pub fn intensity_to_gray(
    points: &[BinPoint],
    policy: DegeneratePolicy,
) -> Result<Option<Vec<[f32; 3]>>> {
    let finite_range = intensity_range(points);
    let range = finite_range.filter(|&(min, max)| max > min);

    let Some((min, max)) = range else {
        return match policy {
            DegeneratePolicy::Zero => {
                if !points.is_empty() {
                    warn!("intensity range is degenerate, coloring all points black");
                }
                Ok(Some(vec![[0.0; 3]; points.len()]))
            }
            DegeneratePolicy::Uncolored => {
                if !points.is_empty() {
                    warn!("intensity range is degenerate, skipping colors");
                }
                Ok(None)
            }
            DegeneratePolicy::Error => match finite_range {
                Some((value, _)) => Err(Error::DegenerateIntensity { value }),
                None => Err(Error::NoFiniteIntensity),
            },
        };
    };

    // f32 subtraction overflows for ranges wider than f32::MAX
    let min = f64::from(min);
    let span = f64::from(max) - min;
    let colors = points
        .iter()
        .map(|point| {
            let gray = if point.intensity.is_finite() {
                ((f64::from(point.intensity) - min) / span).clamp(0.0, 1.0) as f32
            } else {
                0.0
            };
            [gray; 3]
        })
        .collect();

    Ok(Some(colors))
}
