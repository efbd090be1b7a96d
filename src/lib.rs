//! Starfall - a terminal vertical shoot-'em-up.
//!
//! The simulation runs in a fixed 640×960 pixel world; the display module
//! projects that world onto the terminal grid each frame.
//!
//! - `entities`: pure data types, no logic
//! - `compute`:  pure simulation functions (state in, state out)
//! - `display`:  all terminal I/O

pub mod compute;
pub mod display;
pub mod entities;
