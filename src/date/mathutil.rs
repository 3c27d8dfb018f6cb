//! `floor`/`trunc` for `f64`, available in both hosted and `no_std` builds.
//!
//! `core` does not provide these (they lower to libm calls on most
//! targets), so bare `no_std` builds route through the `libm` crate; a
//! hosted build just uses the inherent `std` methods.

pub(crate) fn floor(x: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        x.floor()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::floor(x)
    }
}

pub(crate) fn trunc(x: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        x.trunc()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::trunc(x)
    }
}
