//! Conversions between accessors and [`ndarray`] array views.

use ndarray::{ArrayBase, ArrayView, ArrayViewMut, Axis, Dim, Dimension, Ix, ShapeBuilder};

use super::{
    PackedTensorAccessor, PackedTensorAccessorMut, SizesType, StridesType, TensorAccessor,
    TensorAccessorInner, TensorAccessorMut,
};

fn array_metadata<S: ndarray::RawData, const N: usize>(
    array: &ArrayBase<S, Dim<[Ix; N]>>,
) -> ([SizesType; N], [StridesType; N])
where
    Dim<[Ix; N]>: Dimension,
{
    let mut sizes = [0; N];
    let mut strides = [0; N];
    for (s, &d) in sizes.iter_mut().zip(array.shape()) {
        *s = d as SizesType;
    }
    for (s, &d) in strides.iter_mut().zip(ndarray::ArrayBase::strides(array)) {
        *s = d as StridesType;
    }
    (sizes, strides)
}

/// # Safety
///
/// The inner accessor must be valid for reads during `'b`, and its elements must not be mutated during `'b`.
unsafe fn array_view<'b, T, const N: usize>(
    inner: TensorAccessorInner<'_, T, N>,
) -> ArrayView<'b, T, Dim<[Ix; N]>>
where
    Dim<[Ix; N]>: Dimension,
{
    let mut dim = <Dim<[Ix; N]> as Dimension>::zeros(N);
    let mut strides = <Dim<[Ix; N]> as Dimension>::zeros(N);
    for (i, (&size, &stride)) in inner.sizes().iter().zip(inner.strides()).enumerate() {
        dim[i] = size as usize;
        strides[i] = stride.unsigned_abs() as usize;
    }

    // Build the view over absolute strides starting at the lowest address, and invert the axes with negative
    // strides afterwards, which moves the pointer back to the first logical element.
    let mut low_offset = 0isize;
    if inner.sizes().iter().all(|&s| s != 0) {
        for (&size, &stride) in inner.sizes().iter().zip(inner.strides()) {
            if stride < 0 {
                low_offset += (size as isize - 1) * stride as isize;
            }
        }
    }
    let ptr = unsafe { inner.data().offset(low_offset) } as *const T;
    let mut view = unsafe { ArrayView::from_shape_ptr(dim.strides(strides), ptr) };
    for (i, &stride) in inner.strides().iter().enumerate() {
        if stride < 0 {
            view.invert_axis(Axis(i));
        }
    }
    view
}

impl<'a, T, const N: usize> TensorAccessor<'a, T, N>
where
    Dim<[Ix; N]>: Dimension,
{
    /// Get an array view of the accessor elements.
    ///
    /// The view has the same sizes and strides as the accessor.
    pub fn as_array(&self) -> ArrayView<'a, T, Dim<[Ix; N]>> {
        unsafe { array_view(self.inner()) }
    }
}

impl<T, const N: usize> TensorAccessorMut<'_, T, N>
where
    Dim<[Ix; N]>: Dimension,
{
    /// Get an immutable array view of the accessor elements.
    pub fn as_array(&self) -> ArrayView<'_, T, Dim<[Ix; N]>> {
        unsafe { array_view(self.inner()) }
    }
}

impl<'a, T, const N: usize> PackedTensorAccessor<'a, T, N>
where
    Dim<[Ix; N]>: Dimension,
{
    /// Create a packed accessor over the elements of an array view, copying its shape and strides.
    ///
    /// Any array view can be converted, including views with negative strides.
    pub fn from_array(array: ArrayView<'a, T, Dim<[Ix; N]>>) -> Self {
        let (sizes, strides) = array_metadata(&array);
        unsafe { Self::from_raw_parts(array.as_ptr(), &sizes, &strides) }
    }

    /// Get an array view of the accessor elements.
    pub fn as_array(&self) -> ArrayView<'a, T, Dim<[Ix; N]>> {
        unsafe { array_view(self.inner()) }
    }
}

impl<'a, T, const N: usize> PackedTensorAccessorMut<'a, T, N>
where
    Dim<[Ix; N]>: Dimension,
{
    /// Create a mutable packed accessor over the elements of a mutable array view, copying its shape and strides.
    pub fn from_array_mut(mut array: ArrayViewMut<'a, T, Dim<[Ix; N]>>) -> Self {
        let (sizes, strides) = array_metadata(&array);
        unsafe { Self::from_raw_parts(array.as_mut_ptr(), &sizes, &strides) }
    }

    /// Get an immutable array view of the accessor elements.
    pub fn as_array(&self) -> ArrayView<'_, T, Dim<[Ix; N]>> {
        unsafe { array_view(self.inner()) }
    }
}
