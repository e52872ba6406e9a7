//! Helpers for reasoning about the sizes and strides of a strided view.
//!
//! Strides are always in units of elements, not bytes, and may be negative or zero.

use crate::accessor::{SizesType, StridesType};
use crate::{Error, Result};

/// Compute the row-major (C order) strides of a tensor with the given sizes.
///
/// Dimensions of size `0` are treated as size `1` when computing the strides of the outer dimensions, so the
/// result is always well defined.
///
/// The products are computed with wrapping arithmetic: if the number of elements of the shape does not fit in
/// [`StridesType`], the outer strides are wrapped and meaningless. Such a layout is rejected with
/// [`Error::Overflow`] by the checked accessor constructors.
///
/// ```rust
/// use tensor_accessor::layout::contiguous_strides;
///
/// assert_eq!(contiguous_strides(&[2, 3, 4]), [12, 4, 1]);
/// assert_eq!(contiguous_strides(&[2, 0, 4]), [4, 4, 1]);
/// ```
pub fn contiguous_strides<const N: usize>(sizes: &[SizesType; N]) -> [StridesType; N] {
    let mut strides = [0; N];
    let mut stride: StridesType = 1;
    for (s, &size) in strides.iter_mut().zip(sizes).rev() {
        *s = stride;
        stride = stride.wrapping_mul(size.max(1));
    }
    strides
}

/// Check whether the given sizes and strides describe a row-major (C order) contiguous layout.
///
/// Dimensions of size `1` may have any stride, and an empty tensor is always contiguous.
pub fn is_contiguous<const N: usize>(sizes: &[SizesType; N], strides: &[StridesType; N]) -> bool {
    if sizes.iter().any(|&s| s == 0) {
        return true;
    }
    let mut expected: StridesType = 1;
    for (&size, &stride) in sizes.iter().zip(strides).rev() {
        if size == 1 {
            continue;
        }
        if stride != expected {
            return false;
        }
        expected = expected.wrapping_mul(size);
    }
    true
}

/// Compute the minimum and maximum element offsets reachable from the first element of a view.
///
/// Returns `Ok(None)` if the view is empty (one of the sizes is zero), otherwise `Ok(Some((min, max)))` where
/// `min <= 0 <= max`. A negative `min` means some index reaches elements located before the first element.
///
/// # Errors
///
/// - [`Error::InvalidSizes`] if one of the sizes is negative.
/// - [`Error::Overflow`] if an offset does not fit in `isize`.
pub fn offset_bounds<const N: usize>(
    sizes: &[SizesType; N],
    strides: &[StridesType; N],
) -> Result<Option<(isize, isize)>> {
    if sizes.iter().any(|&s| s < 0) {
        return Err(Error::InvalidSizes);
    }
    if sizes.iter().any(|&s| s == 0) {
        return Ok(None);
    }
    let (mut min, mut max) = (0isize, 0isize);
    for (&size, &stride) in sizes.iter().zip(strides) {
        let last = isize::try_from(size - 1).map_err(|_| Error::Overflow)?;
        let stride = isize::try_from(stride).map_err(|_| Error::Overflow)?;
        let extent = last.checked_mul(stride).ok_or(Error::Overflow)?;
        if extent < 0 {
            min = min.checked_add(extent).ok_or(Error::Overflow)?;
        } else {
            max = max.checked_add(extent).ok_or(Error::Overflow)?;
        }
    }
    Ok(Some((min, max)))
}

/// Verify that every index within `sizes` maps to an element of a buffer of `len` elements starting at the first
/// element of the view, and that the number of elements fits in `isize`.
pub(crate) fn check_in_bounds<const N: usize>(
    len: usize,
    sizes: &[SizesType; N],
    strides: &[StridesType; N],
) -> Result<()> {
    let bounds = offset_bounds(sizes, strides).map_err(|err| {
        crate::log::error!("Invalid layout sizes={sizes:?} strides={strides:?}: {err}");
        err
    })?;
    let Some((min, max)) = bounds else {
        return Ok(());
    };
    let numel = sizes
        .iter()
        .try_fold(1usize, |n, &s| n.checked_mul(s as usize))
        .filter(|&n| n <= isize::MAX as usize);
    if numel.is_none() {
        crate::log::error!("Layout sizes={sizes:?} has more than isize::MAX elements");
        return Err(Error::Overflow);
    }
    if min < 0 || max as usize >= len {
        crate::log::error!(
            "Layout sizes={sizes:?} strides={strides:?} reaches offsets [{min}, {max}] outside of a buffer of {len} elements",
        );
        return Err(Error::OutOfBounds);
    }
    Ok(())
}
