//! Active gamepad selection
//!
//! Picks the one gamepad an application should follow when several are
//! connected, without flickering on idle noise from the others.
//!
//! - [`picker`] - The scoring and hysteresis core, free of I/O
//! - [`controller`] - gilrs polling loop that drives the picker
//! - [`config`] - TOML configuration for both

pub mod config;
pub mod controller;
pub mod picker;
