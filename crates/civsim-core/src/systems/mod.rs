//! Systems - bulk transforms applied to the whole population each tick

mod death;
mod food;
mod hunger;
mod movement;
mod reproduction;
mod sharing;

pub use death::*;
pub use food::*;
pub use hunger::*;
pub use movement::*;
pub use reproduction::*;
pub use sharing::*;

/// Clamp a coordinate into `[0, extent)`.
pub(crate) fn clamp_coord(value: i32, extent: u32) -> i32 {
    let max = (extent as i32).saturating_sub(1).max(0);
    value.clamp(0, max)
}
