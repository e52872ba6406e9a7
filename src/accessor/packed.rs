use std::marker::PhantomData;

use super::{
    impl_element_access, impl_element_access_mut, impl_metadata, SizesType, StridesType,
    TensorAccessor, TensorAccessorInner, TensorAccessorMut,
};
use crate::layout::check_in_bounds;
use crate::Result;

/// An accessor that owns a copy of the tensor sizes and strides.
///
/// Unlike [`TensorAccessor`], which borrows the sizes and strides arrays, this accessor copies them into fixed size
/// arrays when created. After construction it does not depend on the source arrays, which makes it suitable for
/// moving into another execution context, for example a worker thread, and indexing there.
///
/// Indexing the outermost dimension with [`select`](PackedTensorAccessor::select) returns a borrowing
/// [`TensorAccessor`] over the suffix of the metadata stored in this struct, so sub-accessors can not outlive it.
/// As for [`TensorAccessor`], `select` is implemented for ranks 2 to 6, and higher ranks use full indices only.
///
/// ```rust
/// use tensor_accessor::PackedTensorAccessor;
///
/// let data: Vec<f32> = (0..6).map(|x| x as f32).collect();
/// let packed = {
///     let (sizes, strides) = ([2, 3], [3, 1]);
///     PackedTensorAccessor::new(&data, &sizes, &strides).unwrap()
/// };
///
/// let sum = std::thread::scope(|s| {
///     s.spawn(move || (0..2).map(|i| packed.select(i)[2]).sum::<f32>())
///         .join()
///         .unwrap()
/// });
/// assert_eq!(sum, 2.0 + 5.0);
/// ```
pub struct PackedTensorAccessor<'a, T, const N: usize> {
    data: *mut T,
    sizes: [SizesType; N],
    strides: [StridesType; N],
    phantom: PhantomData<&'a T>,
}
impl<'a, T, const N: usize> PackedTensorAccessor<'a, T, N> {
    /// Create a new packed accessor over the given data, copying the sizes and strides.
    ///
    /// The first element of the accessor is `data[0]`.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the sizes is negative, or if some index within the sizes maps to an element
    /// outside of `data`.
    pub fn new(
        data: &'a [T],
        sizes: &[SizesType; N],
        strides: &[StridesType; N],
    ) -> Result<Self> {
        check_in_bounds(data.len(), sizes, strides)?;
        Ok(unsafe { Self::from_raw_parts(data.as_ptr(), sizes, strides) })
    }

    /// Create a new packed accessor from a pointer to the first element, copying the sizes and strides.
    ///
    /// No validation is performed.
    ///
    /// # Safety
    ///
    /// For every index within `sizes`, `data` offset by the strided offset of the index must point to an
    /// initialized element that is valid for reads for the lifetime `'a`, and that is not mutated during `'a`.
    pub unsafe fn from_raw_parts(
        data: *const T,
        sizes: &[SizesType; N],
        strides: &[StridesType; N],
    ) -> Self {
        crate::log::debug!("Packing accessor with sizes={sizes:?} strides={strides:?}");
        let this = Self {
            data: data.cast_mut(),
            sizes: *sizes,
            strides: *strides,
            phantom: PhantomData,
        };
        // validates the rank
        let _ = this.inner();
        this
    }

    pub(crate) fn inner(&self) -> TensorAccessorInner<'_, T, N> {
        unsafe { TensorAccessorInner::new(self.data, &self.sizes, &self.strides) }
    }

    /// Get a borrowing accessor to the same elements, over the metadata stored in this struct.
    pub fn as_accessor(&self) -> TensorAccessor<'_, T, N> {
        TensorAccessor::from_inner(self.inner())
    }
}
impl<T, const N: usize> Clone for PackedTensorAccessor<'_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, const N: usize> Copy for PackedTensorAccessor<'_, T, N> {}
impl_metadata!(PackedTensorAccessor);
impl_element_access!(PackedTensorAccessor);

// Safety: a PackedTensorAccessor is a shared reference to the elements, and owns its metadata
unsafe impl<T: Sync, const N: usize> Send for PackedTensorAccessor<'_, T, N> {}
unsafe impl<T: Sync, const N: usize> Sync for PackedTensorAccessor<'_, T, N> {}

/// A mutable accessor that owns a copy of the tensor sizes and strides.
///
/// This is similar to [`PackedTensorAccessor`], but allows for mutable access to the tensor elements.
/// See the immutable packed accessor for more details.
pub struct PackedTensorAccessorMut<'a, T, const N: usize> {
    data: *mut T,
    sizes: [SizesType; N],
    strides: [StridesType; N],
    phantom: PhantomData<&'a mut T>,
}
impl<'a, T, const N: usize> PackedTensorAccessorMut<'a, T, N> {
    /// Create a new mutable packed accessor over the given data, copying the sizes and strides.
    ///
    /// The first element of the accessor is `data[0]`.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the sizes is negative, or if some index within the sizes maps to an element
    /// outside of `data`.
    pub fn new(
        data: &'a mut [T],
        sizes: &[SizesType; N],
        strides: &[StridesType; N],
    ) -> Result<Self> {
        check_in_bounds(data.len(), sizes, strides)?;
        Ok(unsafe { Self::from_raw_parts(data.as_mut_ptr(), sizes, strides) })
    }

    /// Create a new mutable packed accessor from a pointer to the first element, copying the sizes and strides.
    ///
    /// No validation is performed.
    ///
    /// # Safety
    ///
    /// For every index within `sizes`, `data` offset by the strided offset of the index must point to an
    /// initialized element that is valid for reads and writes for the lifetime `'a`, and that is not accessed
    /// through any other pointer during `'a`.
    pub unsafe fn from_raw_parts(
        data: *mut T,
        sizes: &[SizesType; N],
        strides: &[StridesType; N],
    ) -> Self {
        crate::log::debug!("Packing mutable accessor with sizes={sizes:?} strides={strides:?}");
        let this = Self {
            data,
            sizes: *sizes,
            strides: *strides,
            phantom: PhantomData,
        };
        // validates the rank
        let _ = this.inner();
        this
    }

    pub(crate) fn inner(&self) -> TensorAccessorInner<'_, T, N> {
        unsafe { TensorAccessorInner::new(self.data, &self.sizes, &self.strides) }
    }

    /// Get an immutable borrowing accessor to the same elements.
    pub fn as_accessor(&self) -> TensorAccessor<'_, T, N> {
        TensorAccessor::from_inner(self.inner())
    }

    /// Get a mutable borrowing accessor to the same elements.
    pub fn as_accessor_mut(&mut self) -> TensorAccessorMut<'_, T, N> {
        TensorAccessorMut::from_inner(self.inner())
    }
}
impl_metadata!(PackedTensorAccessorMut);
impl_element_access!(PackedTensorAccessorMut);
impl_element_access_mut!(PackedTensorAccessorMut);

// Safety: a PackedTensorAccessorMut is a mutable reference to the elements, and owns its metadata
unsafe impl<T: Send, const N: usize> Send for PackedTensorAccessorMut<'_, T, N> {}
unsafe impl<T: Sync, const N: usize> Sync for PackedTensorAccessorMut<'_, T, N> {}

#[cfg(test)]
mod tests {
    use crate::tests::arange;
    use crate::Error;

    use super::*;

    #[test]
    fn packed_copies_metadata() {
        let data = arange::<24>();
        let mut sizes = [2, 3, 4];
        let mut strides = [12, 4, 1];
        let packed = PackedTensorAccessor::new(&data, &sizes, &strides).unwrap();
        assert_ne!(packed.sizes().as_ptr(), sizes.as_ptr());
        assert_ne!(packed.strides().as_ptr(), strides.as_ptr());

        sizes = [1, 1, 1];
        strides = [0, 0, 0];
        assert_eq!(sizes, [1, 1, 1]);
        assert_eq!(strides, [0, 0, 0]);

        assert_eq!(packed.sizes(), &[2, 3, 4]);
        assert_eq!(packed.strides(), &[12, 4, 1]);
        assert_eq!(packed.size(2), 4);
        assert_eq!(packed.stride(0), 12);
        assert_eq!(packed.select(1).select(2)[3], 23);
    }

    #[test]
    fn packed_matches_borrowed() {
        let data = arange::<60>();
        let (sizes, strides) = ([3, 4, 5], [1, 15, 3]);
        let borrowed = TensorAccessor::new(&data, &sizes, &strides).unwrap();
        let packed = PackedTensorAccessor::new(&data, &sizes, &strides).unwrap();
        assert_eq!(packed.dim(), borrowed.dim());
        assert_eq!(packed.numel(), borrowed.numel());
        assert_eq!(packed.as_ptr(), borrowed.as_ptr());
        for i in 0..3 {
            let (p, b) = (packed.select(i), borrowed.select(i));
            assert_eq!(p.sizes(), b.sizes());
            assert_eq!(p.strides(), b.strides());
            assert_eq!(p.as_ptr(), b.as_ptr());
            for j in 0..4 {
                let (p, b) = (p.select(j), b.select(j));
                assert_eq!(p.sizes(), b.sizes());
                for k in 0..5 {
                    assert_eq!(p[k], b[k]);
                    assert_eq!(packed[[i, j, k]], borrowed[[i, j, k]]);
                }
            }
        }
    }

    #[test]
    fn packed_sub_accessor_borrows_packed_metadata() {
        let data = arange::<6>();
        let packed = PackedTensorAccessor::new(&data, &[2, 3], &[3, 1]).unwrap();
        let row = packed.select(1);
        assert_eq!(row.sizes().as_ptr(), packed.sizes()[1..].as_ptr());
        assert_eq!(row.strides().as_ptr(), packed.strides()[1..].as_ptr());
        assert_eq!(row.as_ptr(), unsafe { data.as_ptr().add(3) });
    }

    #[test]
    fn packed_rank1() {
        let data = [10, 20, 30, 40, 50];
        let packed = PackedTensorAccessor::new(&data, &[5], &[1]).unwrap();
        assert_eq!(packed[3], 40);
        assert_eq!(packed.get(0), Some(&10));
        assert_eq!(packed.get(5), None);
        assert_eq!(unsafe { *packed.get_unchecked(1) }, 20);
        assert_eq!(packed.as_accessor()[4], 50);
    }

    #[test]
    fn packed_invalid_layout() {
        let data = arange::<6>();
        assert_eq!(
            PackedTensorAccessor::new(&data, &[2, 4], &[3, 1]).unwrap_err(),
            Error::OutOfBounds
        );
        assert_eq!(
            PackedTensorAccessor::new(&data, &[-2, 3], &[3, 1]).unwrap_err(),
            Error::InvalidSizes
        );
        let mut data = arange::<6>();
        assert_eq!(
            PackedTensorAccessorMut::new(&mut data, &[7], &[1]).unwrap_err(),
            Error::OutOfBounds
        );
    }

    #[test]
    #[should_panic(expected = "index 5 out of bounds for dimension of size 5")]
    fn packed_index_out_of_bounds() {
        let data = [10, 20, 30, 40, 50];
        let packed = PackedTensorAccessor::new(&data, &[5], &[1]).unwrap();
        let _ = packed[5];
    }

    #[test]
    fn packed_mut_write() {
        let mut data = [10, 20, 30, 40, 50];
        let mut packed = PackedTensorAccessorMut::new(&mut data, &[5], &[1]).unwrap();
        packed[3] = 60;
        assert_eq!(packed[3], 60);
        *packed.get_mut(4).unwrap() = 0;
        assert_eq!(packed.get_mut(5), None);
        unsafe { *packed.get_mut_unchecked(0) -= 10 };
        assert_eq!(data, [0, 20, 30, 60, 0]);
    }

    #[test]
    fn packed_mut_select() {
        let mut data = [0i32; 24];
        let mut packed = PackedTensorAccessorMut::new(&mut data, &[2, 3, 4], &[12, 4, 1]).unwrap();
        packed.select_mut(1).select_mut(2)[3] = 23;
        packed[[0, 1, 2]] = 6;
        unsafe { packed.select_mut_unchecked(1).select_mut(0)[0] = 12 };
        assert_eq!(packed.select(1)[[2, 3]], 23);
        assert_eq!(unsafe { packed.select_unchecked(0)[[1, 2]] }, 6);
        assert_eq!(packed.as_accessor_mut()[[1, 0, 0]], 12);
        assert_eq!(data[6], 6);
        assert_eq!(data[12], 12);
        assert_eq!(data[23], 23);
        assert_eq!(data.iter().sum::<i32>(), 41);
    }

    #[test]
    fn packed_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PackedTensorAccessor<f32, 3>>();
        assert_send_sync::<PackedTensorAccessorMut<f32, 3>>();
    }

    #[test]
    fn packed_is_copy() {
        struct NotCopy;
        fn assert_copy<T: Copy>() {}
        assert_copy::<PackedTensorAccessor<NotCopy, 2>>();
        assert_copy::<TensorAccessor<NotCopy, 2>>();
    }
}
