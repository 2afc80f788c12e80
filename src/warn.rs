//! The warning sink used for every warn-and-continue condition in this crate (duplicate option
//! keys, deprecated boolean aliases, unknown options, primary-with-tags). Warnings never fail a
//! parse; they exist purely so the caller's logging pipeline can surface them.
//!
//! Mirrors the donor driver's `tracing-unstable` feature: when the feature is enabled (the
//! default) warnings are emitted via [`tracing::warn!`]; when it is disabled they are dropped.

#[cfg(feature = "tracing-unstable")]
macro_rules! warn_sink {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

#[cfg(not(feature = "tracing-unstable"))]
macro_rules! warn_sink {
    ($($arg:tt)*) => {
        let _ = format_args!($($arg)*);
    };
}

pub(crate) use warn_sink;
