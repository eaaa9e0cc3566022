//! Logging shim.
//!
//! Resolves to `defmt` when the `defmt` feature is on and to no-op macros
//! otherwise, so the control logic builds and tests on the host.
//!
//! The stubs carry `log_` names since a bare `macro_rules! warn` collides
//! with the built-in `#[warn]` attribute on re-export.

#[cfg(feature = "defmt")]
pub(crate) use defmt::{debug, info, warn};

// Stub macros when defmt is not available. Arguments are still evaluated
// (by reference) so host builds see them as used.
#[cfg(not(feature = "defmt"))]
macro_rules! log_warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $(let _ = &$arg;)*
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! log_info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $(let _ = &$arg;)*
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! log_debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $(let _ = &$arg;)*
    }};
}

#[cfg(not(feature = "defmt"))]
pub(crate) use {log_debug as debug, log_info as info, log_warn as warn};
