//! Client-side state driven by the site frontend.
//!
//! DESIGN
//! ======
//! State is an explicit context object owned by the UI shell, created at
//! application start and torn down on sign-out — not ambient globals. The
//! modules are framework-free: transitions are plain methods, and anything
//! the shell must do afterwards (navigation, notices) comes back as a value.

pub mod mirror;
pub mod wishlist;
