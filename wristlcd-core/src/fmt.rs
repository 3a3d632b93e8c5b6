//! Logging macros
//!
//! Forward to `defmt` when the `defmt` feature is on. Without it the
//! arguments are still evaluated by reference so no unused warnings leak
//! out, and nothing is emitted.

#![macro_use]
#![allow(unused_macros)]

macro_rules! log_forward {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(not(feature = "defmt"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! trace {
    ($($arg:tt)*) => { log_forward!(trace, $($arg)*) };
}

macro_rules! debug {
    ($($arg:tt)*) => { log_forward!(debug, $($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { log_forward!(info, $($arg)*) };
}

macro_rules! warn {
    ($($arg:tt)*) => { log_forward!(warn, $($arg)*) };
}

macro_rules! error {
    ($($arg:tt)*) => { log_forward!(error, $($arg)*) };
}
