//! Fast accessors for strided tensor memory.
//!
//! An accessor is a view over an `N` dimensional array of elements of type `T`, described by a pointer to the first
//! element, `N` sizes and `N` strides (in elements). The rank and the element type are part of the accessor type,
//! which makes indexing a matter of a few multiply-adds.
//!
//! There are two families of accessors:
//! - [`TensorAccessor`] and [`TensorAccessorMut`] borrow their sizes and strides arrays. They never copy any
//!   metadata, and are only valid as long as the arrays they borrow.
//! - [`PackedTensorAccessor`] and [`PackedTensorAccessorMut`] copy the sizes and strides into fixed size arrays
//!   when created. They do not depend on the source arrays after construction, and can be moved into another
//!   execution context (e.g. sent to another thread) and indexed there.
//!
//! For both families, [`select`](TensorAccessor::select) on an accessor of rank `N > 1` returns a *borrowing*
//! accessor of rank `N - 1`, whose sizes and strides are the suffix of the parent's arrays. Indexing a rank 1
//! accessor returns a reference to an element. Descent is implemented for ranks up to 6.
//!
//! In addition, every accessor can be indexed with a full `[usize; N]` index, which is equivalent to descending
//! through all the dimensions.

use std::fmt;

mod borrowed;
pub use borrowed::*;

mod packed;
pub use packed::*;

mod select;

cfg_if::cfg_if! { if #[cfg(feature = "ndarray")] {
    mod array;
} }

/// A type that represents the sizes (dimensions) of a tensor.
pub type SizesType = i64;
/// A type that represents the strides of a tensor.
///
/// Strides are in units of the elements size, not in bytes.
pub type StridesType = i64;

/// Post-monomorphization check that accessors are never instantiated with rank 0.
struct AssertRank<const N: usize>;
impl<const N: usize> AssertRank<N> {
    const NON_ZERO: () = assert!(N > 0, "accessors must have at least one dimension");
}

/// The data pointer and metadata shared by all accessors.
///
/// Invariants: for every index within `sizes`, `data` offset by the strided offset of that index points to a valid
/// element, and the metadata arrays are never mutated while the inner struct is alive.
pub(crate) struct TensorAccessorInner<'a, T, const N: usize> {
    data: *mut T,
    sizes: &'a [SizesType; N],
    strides: &'a [StridesType; N],
}
impl<T, const N: usize> Clone for TensorAccessorInner<'_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, const N: usize> Copy for TensorAccessorInner<'_, T, N> {}

impl<'a, T, const N: usize> TensorAccessorInner<'a, T, N> {
    /// # Safety
    ///
    /// The caller must ensure that `data` is valid for every index within `sizes`, as long as `'a`.
    pub(crate) unsafe fn new(
        data: *mut T,
        sizes: &'a [SizesType; N],
        strides: &'a [StridesType; N],
    ) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = AssertRank::<N>::NON_ZERO;
        Self {
            data,
            sizes,
            strides,
        }
    }

    pub(crate) fn data(&self) -> *mut T {
        self.data
    }

    pub(crate) fn sizes(&self) -> &'a [SizesType; N] {
        self.sizes
    }

    pub(crate) fn strides(&self) -> &'a [StridesType; N] {
        self.strides
    }

    /// Saturates at `usize::MAX`, reachable only through `from_raw_parts` layouts.
    pub(crate) fn numel(&self) -> usize {
        self.sizes
            .iter()
            .fold(1usize, |n, &s| n.saturating_mul(s as usize))
    }

    fn in_bounds(index: usize, size: SizesType) -> bool {
        SizesType::try_from(index).is_ok_and(|index| index < size)
    }

    pub(crate) fn offset_of(&self, index: [usize; N]) -> Option<isize> {
        let valid_index = index
            .iter()
            .zip(self.sizes)
            .all(|(&idx, &size)| Self::in_bounds(idx, size));
        valid_index.then(|| unsafe { self.offset_of_unchecked(index) })
    }

    pub(crate) unsafe fn offset_of_unchecked(&self, index: [usize; N]) -> isize {
        debug_assert!(
            index
                .iter()
                .zip(self.sizes)
                .all(|(&idx, &size)| Self::in_bounds(idx, size)),
            "index {index:?} out of bounds for sizes {:?}",
            self.sizes,
        );
        let mut offset = 0isize;
        for (&idx, &stride) in index.iter().zip(self.strides) {
            offset += idx as isize * stride as isize;
        }
        offset
    }

    /// # Safety
    ///
    /// The offset must be the strided offset of an index within the sizes, and the returned reference must not
    /// outlive `'a` or alias a mutable reference to the same element.
    pub(crate) unsafe fn element<'b>(&self, offset: isize) -> &'b T {
        unsafe { &*self.data.offset(offset) }
    }

    /// # Safety
    ///
    /// Same as [`element`](Self::element), and in addition the data must be mutable and no other reference to the
    /// element may exist while the returned one is alive.
    pub(crate) unsafe fn element_mut<'b>(&self, offset: isize) -> &'b mut T {
        unsafe { &mut *self.data.offset(offset) }
    }

    /// Peel off the outermost dimension, without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be smaller than `sizes[0]`, and `M` must be `N - 1`.
    pub(crate) unsafe fn select_unchecked<const M: usize>(
        &self,
        index: usize,
    ) -> TensorAccessorInner<'a, T, M> {
        debug_assert!(
            Self::in_bounds(index, self.sizes[0]),
            "index {index} out of bounds for dimension of size {}",
            self.sizes[0],
        );
        let data = unsafe { self.data.offset(self.strides[0] as isize * index as isize) };
        unsafe { TensorAccessorInner::new(data, tail(self.sizes), tail(self.strides)) }
    }

    /// Peel off the outermost dimension.
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds for the outermost dimension.
    #[track_caller]
    pub(crate) fn select<const M: usize>(&self, index: usize) -> TensorAccessorInner<'a, T, M> {
        let size = self.sizes[0];
        if !Self::in_bounds(index, size) {
            panic!("index {index} out of bounds for dimension of size {size}");
        }
        unsafe { self.select_unchecked(index) }
    }

    pub(crate) fn fmt_fields(&self, name: &str, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct(name)
            .field("sizes", self.sizes)
            .field("strides", self.strides)
            .finish()
    }
}

/// The suffix `arr[1..]` as a fixed size array reference.
fn tail<const N: usize, const M: usize>(arr: &[i64; N]) -> &[i64; M] {
    assert_eq!(N, M + 1);
    // SAFETY: `M + 1 == N`, so the last `M` elements of `arr` are a valid `[i64; M]`
    unsafe { &*(arr.as_ptr().add(1) as *const [i64; M]) }
}

/// Implements the metadata getters shared by all accessor types.
///
/// The type must have an `inner(&self) -> TensorAccessorInner<'_, T, N>` method.
macro_rules! impl_metadata {
    ($accessor:ident) => {
        impl<T, const N: usize> $accessor<'_, T, N> {
            /// Returns the number of dimensions of the accessor, `N`.
            pub fn dim(&self) -> usize {
                N
            }

            /// Returns the size of the given dimension.
            ///
            /// # Panics
            ///
            /// If `dim >= N`.
            pub fn size(&self, dim: usize) -> SizesType {
                self.sizes()[dim]
            }

            /// Returns the stride of the given dimension, in elements.
            ///
            /// # Panics
            ///
            /// If `dim >= N`.
            pub fn stride(&self, dim: usize) -> StridesType {
                self.strides()[dim]
            }

            /// Returns the sizes of all dimensions, outermost first.
            pub fn sizes(&self) -> &[SizesType] {
                self.inner().sizes()
            }

            /// Returns the strides of all dimensions, outermost first.
            pub fn strides(&self) -> &[StridesType] {
                self.inner().strides()
            }

            /// Returns the number of elements reachable through the accessor.
            ///
            /// Accessors created with a checked constructor always have fewer than `isize::MAX` elements. For
            /// layouts passed to `from_raw_parts` the count saturates at `usize::MAX`.
            pub fn numel(&self) -> usize {
                self.inner().numel()
            }

            /// Returns a pointer to the first element of the accessor.
            pub fn as_ptr(&self) -> *const T {
                self.inner().data()
            }
        }
        impl<T, const N: usize> std::fmt::Debug for $accessor<'_, T, N> {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.inner().fmt_fields(stringify!($accessor), f)
            }
        }
    };
}
pub(crate) use impl_metadata;

/// Implements immutable element access shared by all accessor types.
macro_rules! impl_element_access {
    ($accessor:ident) => {
        impl<T, const N: usize> $accessor<'_, T, N> {
            /// Get a reference to the element at the given index.
            ///
            /// Returns the element at the given index, or `None` if the index is out of bounds.
            pub fn get_at(&self, index: [usize; N]) -> Option<&T> {
                let inner = self.inner();
                let offset = inner.offset_of(index)?;
                Some(unsafe { inner.element(offset) })
            }

            /// Get a reference to the element at the given index, without bounds checking.
            ///
            /// # Safety
            ///
            /// The caller must ensure that the index is within bounds.
            pub unsafe fn get_at_unchecked(&self, index: [usize; N]) -> &T {
                let inner = self.inner();
                unsafe { inner.element(inner.offset_of_unchecked(index)) }
            }
        }
        impl<T> $accessor<'_, T, 1> {
            /// Get a reference to the element at the given index.
            ///
            /// Returns the element at the given index, or `None` if the index is out of bounds.
            pub fn get(&self, index: usize) -> Option<&T> {
                self.get_at([index])
            }

            /// Get a reference to the element at the given index, without bounds checking.
            ///
            /// # Safety
            ///
            /// The caller must ensure that the index is within bounds.
            pub unsafe fn get_unchecked(&self, index: usize) -> &T {
                unsafe { self.get_at_unchecked([index]) }
            }
        }
        impl<T> std::ops::Index<usize> for $accessor<'_, T, 1> {
            type Output = T;

            #[track_caller]
            fn index(&self, index: usize) -> &Self::Output {
                self.get(index).unwrap_or_else(|| {
                    panic!("index {index} out of bounds for dimension of size {}", self.size(0))
                })
            }
        }
        impl<T, const N: usize> std::ops::Index<[usize; N]> for $accessor<'_, T, N> {
            type Output = T;

            #[track_caller]
            fn index(&self, index: [usize; N]) -> &Self::Output {
                self.get_at(index).unwrap_or_else(|| {
                    panic!("index {index:?} out of bounds for sizes {:?}", self.sizes())
                })
            }
        }
    };
}
pub(crate) use impl_element_access;

/// Implements mutable element access shared by the mutable accessor types.
macro_rules! impl_element_access_mut {
    ($accessor:ident) => {
        impl<T, const N: usize> $accessor<'_, T, N> {
            /// Returns a mutable pointer to the first element of the accessor.
            pub fn as_mut_ptr(&mut self) -> *mut T {
                self.inner().data()
            }

            /// Get a mutable reference to the element at the given index.
            ///
            /// Returns the element at the given index, or `None` if the index is out of bounds.
            pub fn get_at_mut(&mut self, index: [usize; N]) -> Option<&mut T> {
                let inner = self.inner();
                let offset = inner.offset_of(index)?;
                Some(unsafe { inner.element_mut(offset) })
            }

            /// Get a mutable reference to the element at the given index, without bounds checking.
            ///
            /// # Safety
            ///
            /// The caller must ensure that the index is within bounds.
            pub unsafe fn get_at_mut_unchecked(&mut self, index: [usize; N]) -> &mut T {
                let inner = self.inner();
                unsafe { inner.element_mut(inner.offset_of_unchecked(index)) }
            }
        }
        impl<T> $accessor<'_, T, 1> {
            /// Get a mutable reference to the element at the given index.
            ///
            /// Returns the element at the given index, or `None` if the index is out of bounds.
            pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
                self.get_at_mut([index])
            }

            /// Get a mutable reference to the element at the given index, without bounds checking.
            ///
            /// # Safety
            ///
            /// The caller must ensure that the index is within bounds.
            pub unsafe fn get_mut_unchecked(&mut self, index: usize) -> &mut T {
                unsafe { self.get_at_mut_unchecked([index]) }
            }
        }
        impl<T> std::ops::IndexMut<usize> for $accessor<'_, T, 1> {
            #[track_caller]
            fn index_mut(&mut self, index: usize) -> &mut Self::Output {
                let size = self.size(0);
                self.get_mut(index).unwrap_or_else(|| {
                    panic!("index {index} out of bounds for dimension of size {size}")
                })
            }
        }
        impl<T, const N: usize> std::ops::IndexMut<[usize; N]> for $accessor<'_, T, N> {
            #[track_caller]
            fn index_mut(&mut self, index: [usize; N]) -> &mut Self::Output {
                let sizes = *self.inner().sizes();
                self.get_at_mut(index).unwrap_or_else(|| {
                    panic!("index {index:?} out of bounds for sizes {sizes:?}")
                })
            }
        }
    };
}
pub(crate) use impl_element_access_mut;
