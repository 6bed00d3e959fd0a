//! Crate-level test suite
//!
//! Unit tests live next to each module; the suites here exercise the public
//! API end to end.
