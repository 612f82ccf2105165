//! Core types for the tilt-clock terminal clock.
//!
//! Everything in this crate is pure: hand angles from wall-clock time, the
//! orientation filter that turns raw pitch/roll samples into scene tilt, the
//! framing math that keeps the clock face and backdrop filling the viewport,
//! and the second-boundary gate that drives the tick sound.

mod angles;
mod framing;
mod readout;
mod theme;
mod tick;
mod tilt;

pub use angles::{ClockTime, HandAngles};
pub use framing::{Extent, FitAxis, ViewportFrame, ViewportFramer};
pub use readout::DigitalReadout;
pub use theme::{ColorTheme, TimeFormat};
pub use tick::SecondGate;
pub use tilt::{OrientationSample, SceneTilt, TiltFilter, TiltPermission, TiltState};
