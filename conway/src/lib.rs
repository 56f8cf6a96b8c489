//! Canvas bridge for a Game of Life whose cells live in someone else's memory.
//!
//! - [`GridView`] reads the simulation's raw cell bytes in place.
//! - [`Renderer`] paints grid lines and cells onto a [`Canvas`].
//! - [`map_pointer_to_cell`] turns a click on the scaled canvas into a cell.
//! - [`AnimationController`] runs the play/pause loop on the host's frame clock.
//!
//! The simulation itself sits behind the [`Simulation`] trait; `universe::Universe`
//! implements it.

pub mod animation;
pub mod canvas;
pub mod config;
pub mod error;
pub mod grid_view;
pub mod input;
pub mod render;
pub mod simulation;

pub use animation::{
    AnimationController, AnimationState, FrameHandle, FrameScheduler, ManualScheduler,
};
pub use canvas::{Canvas, PixelCanvas};
pub use config::ViewConfig;
pub use error::{Error, Result};
pub use grid_view::{CellRegion, CellState, GridView};
pub use input::{InputMapper, ScreenRect, map_pointer_to_cell};
pub use render::Renderer;
pub use simulation::{CellCoord, Dimensions, Simulation};
