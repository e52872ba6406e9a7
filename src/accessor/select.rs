//! Rank descent: indexing the outermost dimension of an accessor of rank `N > 1`.
//!
//! The result of a descent is always a borrowing accessor whose sizes and strides are a suffix of the parent's
//! metadata arrays, so no metadata is copied.

use super::{
    PackedTensorAccessor, PackedTensorAccessorMut, TensorAccessor, TensorAccessorMut,
};

macro_rules! impl_select {
    ($rank:literal => $sub_rank:literal) => {
        impl<'a, T> TensorAccessor<'a, T, $rank> {
            /// Index the outermost dimension, returning an accessor of one less dimension.
            ///
            /// The returned accessor points to `data + strides[0] * index` and borrows the remaining sizes and
            /// strides of this accessor.
            ///
            /// # Panics
            ///
            /// If `index` is out of bounds for the outermost dimension.
            #[track_caller]
            pub fn select(&self, index: usize) -> TensorAccessor<'a, T, $sub_rank> {
                TensorAccessor::from_inner(self.0.select(index))
            }

            /// Index the outermost dimension without bounds checking.
            ///
            /// # Safety
            ///
            /// The caller must ensure that `index < self.size(0)`.
            pub unsafe fn select_unchecked(&self, index: usize) -> TensorAccessor<'a, T, $sub_rank> {
                TensorAccessor::from_inner(unsafe { self.0.select_unchecked(index) })
            }
        }

        impl<'a, T> TensorAccessorMut<'a, T, $rank> {
            /// Index the outermost dimension, returning an immutable accessor of one less dimension.
            ///
            /// # Panics
            ///
            /// If `index` is out of bounds for the outermost dimension.
            #[track_caller]
            pub fn select(&self, index: usize) -> TensorAccessor<'_, T, $sub_rank> {
                TensorAccessor::from_inner(self.0.select(index))
            }

            /// Index the outermost dimension without bounds checking.
            ///
            /// # Safety
            ///
            /// The caller must ensure that `index < self.size(0)`.
            pub unsafe fn select_unchecked(&self, index: usize) -> TensorAccessor<'_, T, $sub_rank> {
                TensorAccessor::from_inner(unsafe { self.0.select_unchecked(index) })
            }

            /// Index the outermost dimension, returning a mutable accessor of one less dimension.
            ///
            /// # Panics
            ///
            /// If `index` is out of bounds for the outermost dimension.
            #[track_caller]
            pub fn select_mut(&mut self, index: usize) -> TensorAccessorMut<'_, T, $sub_rank> {
                TensorAccessorMut::from_inner(self.0.select(index))
            }

            /// Index the outermost dimension without bounds checking, returning a mutable accessor.
            ///
            /// # Safety
            ///
            /// The caller must ensure that `index < self.size(0)`.
            pub unsafe fn select_mut_unchecked(
                &mut self,
                index: usize,
            ) -> TensorAccessorMut<'_, T, $sub_rank> {
                TensorAccessorMut::from_inner(unsafe { self.0.select_unchecked(index) })
            }

            /// Index the outermost dimension, consuming this accessor.
            ///
            /// # Panics
            ///
            /// If `index` is out of bounds for the outermost dimension.
            #[track_caller]
            pub fn into_select(self, index: usize) -> TensorAccessorMut<'a, T, $sub_rank> {
                TensorAccessorMut::from_inner(self.0.select(index))
            }
        }

        impl<T> PackedTensorAccessor<'_, T, $rank> {
            /// Index the outermost dimension, returning a borrowing accessor of one less dimension.
            ///
            /// The returned accessor borrows the sizes and strides stored in this packed accessor.
            ///
            /// # Panics
            ///
            /// If `index` is out of bounds for the outermost dimension.
            #[track_caller]
            pub fn select(&self, index: usize) -> TensorAccessor<'_, T, $sub_rank> {
                TensorAccessor::from_inner(self.inner().select(index))
            }

            /// Index the outermost dimension without bounds checking.
            ///
            /// # Safety
            ///
            /// The caller must ensure that `index < self.size(0)`.
            pub unsafe fn select_unchecked(&self, index: usize) -> TensorAccessor<'_, T, $sub_rank> {
                TensorAccessor::from_inner(unsafe { self.inner().select_unchecked(index) })
            }
        }

        impl<T> PackedTensorAccessorMut<'_, T, $rank> {
            /// Index the outermost dimension, returning an immutable borrowing accessor of one less dimension.
            ///
            /// # Panics
            ///
            /// If `index` is out of bounds for the outermost dimension.
            #[track_caller]
            pub fn select(&self, index: usize) -> TensorAccessor<'_, T, $sub_rank> {
                TensorAccessor::from_inner(self.inner().select(index))
            }

            /// Index the outermost dimension without bounds checking.
            ///
            /// # Safety
            ///
            /// The caller must ensure that `index < self.size(0)`.
            pub unsafe fn select_unchecked(&self, index: usize) -> TensorAccessor<'_, T, $sub_rank> {
                TensorAccessor::from_inner(unsafe { self.inner().select_unchecked(index) })
            }

            /// Index the outermost dimension, returning a mutable borrowing accessor of one less dimension.
            ///
            /// # Panics
            ///
            /// If `index` is out of bounds for the outermost dimension.
            #[track_caller]
            pub fn select_mut(&mut self, index: usize) -> TensorAccessorMut<'_, T, $sub_rank> {
                TensorAccessorMut::from_inner(self.inner().select(index))
            }

            /// Index the outermost dimension without bounds checking, returning a mutable accessor.
            ///
            /// # Safety
            ///
            /// The caller must ensure that `index < self.size(0)`.
            pub unsafe fn select_mut_unchecked(
                &mut self,
                index: usize,
            ) -> TensorAccessorMut<'_, T, $sub_rank> {
                TensorAccessorMut::from_inner(unsafe { self.inner().select_unchecked(index) })
            }
        }
    };
}
impl_select!(2 => 1);
impl_select!(3 => 2);
impl_select!(4 => 3);
impl_select!(5 => 4);
impl_select!(6 => 5);
