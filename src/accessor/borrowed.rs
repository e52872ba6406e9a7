use std::marker::PhantomData;

use super::{
    impl_element_access, impl_element_access_mut, impl_metadata, PackedTensorAccessor,
    PackedTensorAccessorMut, SizesType, StridesType, TensorAccessorInner,
};
use crate::layout::check_in_bounds;
use crate::Result;

/// A fast accessor for a tensor.
///
/// The accessor is a utility struct, templated over the type of the tensor elements and the number
/// of dimensions, which make it very efficient to access tensor elements by index.
/// It holds a pointer to the first element and *borrows* the sizes and strides arrays of the tensor, without
/// copying them. To obtain an accessor that owns a copy of the metadata, see [`PackedTensorAccessor`].
///
/// Use [`select`](TensorAccessor::select) to index the outermost dimension of an accessor of rank `N > 1`, which
/// returns an accessor of rank `N - 1`, and regular indexing (`accessor[i]`) to access the elements of a rank 1
/// accessor. Any accessor can also be indexed with a full index `accessor[[i0, i1, ...]]`.
///
/// `select` is implemented for ranks 2 to 6. Accessors of higher rank are indexed with full indices only.
///
/// ```rust
/// use tensor_accessor::TensorAccessor;
///
/// let data = [1, 2, 3, 4, 5, 6];
/// let (sizes, strides) = ([2, 3], [3, 1]);
/// let accessor = TensorAccessor::new(&data, &sizes, &strides).unwrap();
///
/// let row = accessor.select(1);
/// assert_eq!(row.sizes(), &[3]);
/// assert_eq!(row[2], 6);
/// ```
pub struct TensorAccessor<'a, T, const N: usize>(
    pub(crate) TensorAccessorInner<'a, T, N>,
    PhantomData<&'a T>,
);
impl<'a, T, const N: usize> TensorAccessor<'a, T, N> {
    /// Create a new accessor over the given data.
    ///
    /// The first element of the accessor is `data[0]`.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the sizes is negative, or if some index within the sizes maps to an element
    /// outside of `data`.
    pub fn new(
        data: &'a [T],
        sizes: &'a [SizesType; N],
        strides: &'a [StridesType; N],
    ) -> Result<Self> {
        check_in_bounds(data.len(), sizes, strides)?;
        Ok(unsafe { Self::from_raw_parts(data.as_ptr(), sizes, strides) })
    }

    /// Create a new accessor from a pointer to the first element and the sizes and strides arrays.
    ///
    /// No validation is performed and the metadata is not copied.
    ///
    /// # Safety
    ///
    /// For every index within `sizes`, `data` offset by the strided offset of the index must point to an
    /// initialized element that is valid for reads for the lifetime `'a`, and that is not mutated during `'a`.
    pub unsafe fn from_raw_parts(
        data: *const T,
        sizes: &'a [SizesType; N],
        strides: &'a [StridesType; N],
    ) -> Self {
        Self(
            unsafe { TensorAccessorInner::new(data.cast_mut(), sizes, strides) },
            PhantomData,
        )
    }

    pub(crate) fn from_inner(inner: TensorAccessorInner<'a, T, N>) -> Self {
        Self(inner, PhantomData)
    }

    pub(crate) fn inner(&self) -> TensorAccessorInner<'a, T, N> {
        self.0
    }

    /// Copy the sizes and strides of this accessor into a [`PackedTensorAccessor`].
    pub fn to_packed(&self) -> PackedTensorAccessor<'a, T, N> {
        unsafe { PackedTensorAccessor::from_raw_parts(self.as_ptr(), self.0.sizes(), self.0.strides()) }
    }

    /// Get a reference to the element at the given index.
    ///
    /// Unlike [`get_at`](Self::get_at), the returned reference is bound to the lifetime of the underlying data
    /// rather than to the accessor.
    pub fn get_at_ref(&self, index: [usize; N]) -> Option<&'a T> {
        let offset = self.0.offset_of(index)?;
        Some(unsafe { self.0.element(offset) })
    }
}
impl<'a, T> TensorAccessor<'a, T, 1> {
    /// Get a reference to the element at the given index, bound to the lifetime of the underlying data.
    pub fn get_ref(&self, index: usize) -> Option<&'a T> {
        self.get_at_ref([index])
    }
}
impl<T, const N: usize> Clone for TensorAccessor<'_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, const N: usize> Copy for TensorAccessor<'_, T, N> {}
impl_metadata!(TensorAccessor);
impl_element_access!(TensorAccessor);

// Safety: a TensorAccessor is a shared reference to the elements and the metadata
unsafe impl<T: Sync, const N: usize> Send for TensorAccessor<'_, T, N> {}
unsafe impl<T: Sync, const N: usize> Sync for TensorAccessor<'_, T, N> {}

/// A mutable accessor for a tensor.
///
/// The accessor is a utility struct, templated over the type of the tensor elements and the number
/// of dimensions, which make it very efficient to access tensor elements by index.
/// This is similar to [`TensorAccessor`], but allows for mutable access to the tensor elements.
/// See the immutable accessor for more details.
///
/// ```rust
/// use tensor_accessor::TensorAccessorMut;
///
/// let mut data = [10, 20, 30, 40, 50];
/// let (sizes, strides) = ([5], [1]);
/// let mut accessor = TensorAccessorMut::new(&mut data, &sizes, &strides).unwrap();
/// accessor[3] = 60;
/// assert_eq!(data, [10, 20, 30, 60, 50]);
/// ```
pub struct TensorAccessorMut<'a, T, const N: usize>(
    pub(crate) TensorAccessorInner<'a, T, N>,
    PhantomData<&'a mut T>,
);
impl<'a, T, const N: usize> TensorAccessorMut<'a, T, N> {
    /// Create a new mutable accessor over the given data.
    ///
    /// The first element of the accessor is `data[0]`.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the sizes is negative, or if some index within the sizes maps to an element
    /// outside of `data`.
    pub fn new(
        data: &'a mut [T],
        sizes: &'a [SizesType; N],
        strides: &'a [StridesType; N],
    ) -> Result<Self> {
        check_in_bounds(data.len(), sizes, strides)?;
        Ok(unsafe { Self::from_raw_parts(data.as_mut_ptr(), sizes, strides) })
    }

    /// Create a new mutable accessor from a pointer to the first element and the sizes and strides arrays.
    ///
    /// No validation is performed and the metadata is not copied.
    ///
    /// # Safety
    ///
    /// For every index within `sizes`, `data` offset by the strided offset of the index must point to an
    /// initialized element that is valid for reads and writes for the lifetime `'a`, and that is not accessed
    /// through any other pointer during `'a`.
    pub unsafe fn from_raw_parts(
        data: *mut T,
        sizes: &'a [SizesType; N],
        strides: &'a [StridesType; N],
    ) -> Self {
        Self(
            unsafe { TensorAccessorInner::new(data, sizes, strides) },
            PhantomData,
        )
    }

    pub(crate) fn from_inner(inner: TensorAccessorInner<'a, T, N>) -> Self {
        Self(inner, PhantomData)
    }

    pub(crate) fn inner(&self) -> TensorAccessorInner<'a, T, N> {
        self.0
    }

    /// Get an immutable accessor to the same elements.
    pub fn as_accessor(&self) -> TensorAccessor<'_, T, N> {
        TensorAccessor::from_inner(self.0)
    }

    /// Reborrow this accessor, for example to pass it to a function without giving up ownership.
    pub fn reborrow(&mut self) -> TensorAccessorMut<'_, T, N> {
        TensorAccessorMut::from_inner(self.0)
    }

    /// Convert into a [`PackedTensorAccessorMut`] owning a copy of the sizes and strides.
    pub fn into_packed(self) -> PackedTensorAccessorMut<'a, T, N> {
        unsafe {
            PackedTensorAccessorMut::from_raw_parts(self.0.data(), self.0.sizes(), self.0.strides())
        }
    }
}
impl_metadata!(TensorAccessorMut);
impl_element_access!(TensorAccessorMut);
impl_element_access_mut!(TensorAccessorMut);

// Safety: a TensorAccessorMut is a mutable reference to the elements and a shared reference to the metadata
unsafe impl<T: Send, const N: usize> Send for TensorAccessorMut<'_, T, N> {}
unsafe impl<T: Sync, const N: usize> Sync for TensorAccessorMut<'_, T, N> {}
