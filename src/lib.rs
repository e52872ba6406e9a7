#![cfg_attr(deny_warnings, deny(warnings))]
// some new clippy::lint annotations are supported in latest Rust but not recognized by older versions
#![cfg_attr(deny_warnings, allow(unknown_lints))]
#![cfg_attr(deny_warnings, deny(missing_docs))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Rank-typed accessors for strided tensor memory.
//!
//! A tensor library usually stores its number of dimensions and its element type dynamically. Inside a hot loop
//! that is wasteful: if the caller knows the element type `T` and the rank `N` at compile time, elements can be
//! reached with a handful of multiply-adds over a data pointer, a sizes array and a strides array.
//! This crate provides exactly that, in two flavors:
//!
//! - [`TensorAccessor`] and [`TensorAccessorMut`] borrow the sizes and strides arrays from their owner. They are
//!   free to construct and are meant to be used in the same scope that owns the tensor metadata.
//! - [`PackedTensorAccessor`] and [`PackedTensorAccessorMut`] copy the sizes and strides into inline
//!   `[i64; N]` arrays. The resulting value is self-contained and can be moved into another execution context,
//!   for example a worker thread, and indexed there.
//!
//! Indexing an accessor of rank `N > 1` with [`select`](TensorAccessor::select) peels off the outermost dimension
//! and returns a borrowing accessor of rank `N - 1`. Indexing a rank 1 accessor yields an element reference.
//!
//! ```rust
//! use tensor_accessor::TensorAccessor;
//!
//! let data: Vec<i32> = (0..24).collect();
//! let sizes = [2, 3, 4];
//! let strides = [12, 4, 1];
//! let accessor = TensorAccessor::new(&data, &sizes, &strides).unwrap();
//!
//! assert_eq!(accessor.select(1).select(2)[3], 23);
//! assert_eq!(accessor[[1, 2, 3]], 23);
//! ```
//!
//! ## Bounds checking
//! The safe API checks every index against the sizes and panics (or returns `None` for the `get*` methods) when it
//! is out of bounds. Performance critical code that already knows its indices are valid can use the `unsafe`
//! `*_unchecked` methods, which only check indices with debug assertions.
//!
//! The checked constructors (`new`) verify once that every index within the sizes maps into the given data slice.
//! The `unsafe` `from_raw_parts` constructors skip that validation.
//!
//! ## Cargo Features
//! - `ndarray`:
//!   Conversions between accessors and `ndarray` array views.
//!   Adds a dependency to the `ndarray` crate.
//!   This feature is enabled by default.
//! - `log`:
//!   Report construction failures and packed accessor creation through the `log` facade.
//!   This feature is enabled by default.
//! - `std`:
//!   Enable the standard library. This feature is enabled by default, but can be disabled to build
//!   [`tensor_accessor`](crate) in a `no_std` environment. The crate never allocates.
//!
//! By default the `std`, `ndarray` and `log` features are enabled.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate core as std;

mod log;

pub mod accessor;
mod error;
pub mod layout;

pub(crate) use error::Result;
pub use error::Error;

pub use accessor::{
    PackedTensorAccessor, PackedTensorAccessorMut, SizesType, StridesType, TensorAccessor,
    TensorAccessorMut,
};

#[cfg(feature = "ndarray")]
pub use ndarray;
