//! Pure dimension math — no I/O, no pixels.

use crate::codec::Dimensions;

/// Target dimensions for a render pass, possibly partial.
///
/// When the caller supplies only one explicit axis the other stays `None`;
/// the codec derives it from the source aspect ratio per the fit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetDimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Scale original dimensions by a percentage.
///
/// Both axes are rounded half away from zero and clamped to a 1 px minimum
/// so extreme downscales of narrow images stay encodable.
///
/// # Examples
/// ```
/// # use image_thumbnail::{Dimensions, dimensions::scale_by_percentage};
/// let target = scale_by_percentage(Dimensions { width: 200, height: 100 }, 10.0);
/// assert_eq!(target.width, Some(20));
/// assert_eq!(target.height, Some(10));
/// ```
pub fn scale_by_percentage(original: Dimensions, percentage: f64) -> TargetDimensions {
    let factor = percentage / 100.0;
    let width = (original.width as f64 * factor).round() as u32;
    let height = (original.height as f64 * factor).round() as u32;

    TargetDimensions {
        width: Some(width.max(1)),
        height: Some(height.max(1)),
    }
}
