//! Crate internal logging macros.
//!
//! Messages are forwarded to the [`log`](https://docs.rs/log) facade when the `log` feature is enabled, and
//! compiled to nothing otherwise (the arguments are still type checked).

#[cfg(feature = "log")]
macro_rules! log {
    ($level:ident, $($arg:tt)*) => {{
        ::log::log!(target: "tensor_accessor", ::log::Level::$level, $($arg)*);
    }}
}
#[cfg(not(feature = "log"))]
macro_rules! log {
    ($level:ident, $($arg:tt)*) => {{
        let _ = core::format_args!($($arg)*);
    }}
}
macro_rules! error {
    ($($arg:tt)*) => {{
        crate::log::log!(Error, $($arg)*);
    }}
}
macro_rules! debug {
    ($($arg:tt)*) => {{
        crate::log::log!(Debug, $($arg)*);
    }}
}
pub(crate) use debug;
pub(crate) use error;
pub(crate) use log;
