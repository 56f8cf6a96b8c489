// error.rs - Failures surfaced by the bridge

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A coordinate reached a mutation or read entry point outside the grid.
    #[error("cell ({row}, {col}) is outside the {width}x{height} grid")]
    InvalidCoordinate { row: u32, col: u32, width: u32, height: u32 },

    /// The pointer or the canvas bounding rectangle could not be mapped to a cell.
    #[error("cannot map pointer: {0}")]
    InvalidPointer(&'static str),

    /// A view or region was used after the simulation moved or rewrote its cells.
    #[error("stale memory view: {0}")]
    StaleMemoryView(String),

    /// The host refused to schedule the next animation frame.
    #[error("frame scheduling failed: {0}")]
    SchedulingFailure(String),

    /// The canvas is not the size fixed at initialization.
    #[error("canvas is {actual:?} pixels, expected {expected:?}")]
    CanvasMismatch { expected: (u32, u32), actual: (u32, u32) },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
