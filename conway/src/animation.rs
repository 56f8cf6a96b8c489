// animation.rs - Play/pause state machine driving advance + redraw each frame
//
// The host owns the frame clock. The controller asks it for one frame at a
// time through `FrameScheduler` and is told when that frame fires via
// `on_frame`. Only the handle it is currently waiting on counts; anything
// else (a frame cancelled by `pause` but already queued) is ignored.

use std::collections::VecDeque;

use egui::{Color32, Pos2};

use crate::canvas::{Canvas, PixelCanvas};
use crate::config::ViewConfig;
use crate::error::{Error, Result};
use crate::grid_view::GridView;
use crate::input::{InputMapper, ScreenRect};
use crate::render::Renderer;
use crate::simulation::{CellCoord, Dimensions, Simulation};

pub const PLAY_LABEL: &str = "▶";
pub const PAUSE_LABEL: &str = "⏸";

/// Opaque token for one scheduled frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's display-refresh callback.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle>;

    /// After this returns, `handle` must never be reported as due.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Deterministic scheduler: frames fire only when the caller pops them.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    queued: VecDeque<FrameHandle>,
    refusal: Option<String>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the oldest queued frame, as if the display refreshed.
    pub fn next_due(&mut self) -> Option<FrameHandle> {
        self.queued.pop_front()
    }

    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    /// Makes the next `request_frame` fail with `reason`.
    pub fn refuse_next(&mut self, reason: impl Into<String>) {
        self.refusal = Some(reason.into());
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle> {
        if let Some(reason) = self.refusal.take() {
            return Err(Error::SchedulingFailure(reason));
        }
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.queued.push_back(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queued.retain(|&queued| queued != handle);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    Paused,
    Running { pending: FrameHandle },
}

/// Owns the simulation handle, the canvas and the frame subscription.
///
/// Every iteration advances the simulation, then re-acquires a `GridView`
/// and redraws, then asks for the next frame. A failure at any step pauses
/// the loop and is returned to the caller; nothing is retried.
pub struct AnimationController<S, F> {
    simulation: S,
    scheduler: F,
    renderer: Renderer,
    canvas: PixelCanvas,
    dimensions: Dimensions,
    state: AnimationState,
}

impl<S: Simulation, F: FrameScheduler> AnimationController<S, F> {
    /// Sizes the canvas once for the simulation's grid and paints the
    /// current state. Starts paused.
    pub fn new(simulation: S, scheduler: F, config: ViewConfig) -> Result<Self> {
        let renderer = Renderer::new(config)?;
        let dimensions = simulation.dimensions();
        let (canvas_width, canvas_height) =
            config.canvas_size(dimensions.width, dimensions.height)?;

        let mut controller = Self {
            simulation,
            scheduler,
            renderer,
            canvas: PixelCanvas::new(canvas_width, canvas_height),
            dimensions,
            state: AnimationState::Paused,
        };
        controller.paint()?;
        tracing::debug!(
            width = dimensions.width,
            height = dimensions.height,
            canvas_width,
            canvas_height,
            "animation controller ready"
        );
        Ok(controller)
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == AnimationState::Paused
    }

    /// Label for the play/pause control.
    pub fn indicator(&self) -> &'static str {
        if self.is_paused() { PLAY_LABEL } else { PAUSE_LABEL }
    }

    /// Paused -> Running: runs one iteration right away and schedules the next.
    pub fn play(&mut self) -> Result<()> {
        if !self.is_paused() {
            return Ok(());
        }
        tracing::debug!("play");
        self.iterate()
    }

    /// Running -> Paused: the pending frame is cancelled and will not fire.
    pub fn pause(&mut self) {
        if let AnimationState::Running { pending } = self.state {
            self.scheduler.cancel_frame(pending);
            self.state = AnimationState::Paused;
            tracing::debug!(?pending, "pause");
        }
    }

    pub fn toggle(&mut self) -> Result<()> {
        if self.is_paused() {
            self.play()
        } else {
            self.pause();
            Ok(())
        }
    }

    /// Host callback for a fired frame.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Result<()> {
        match self.state {
            AnimationState::Running { pending } if pending == handle => self.iterate(),
            _ => {
                tracing::trace!(?handle, "ignoring frame that is no longer pending");
                Ok(())
            }
        }
    }

    fn iterate(&mut self) -> Result<()> {
        self.simulation.advance();
        let next = self.paint().and_then(|()| self.scheduler.request_frame());
        match next {
            Ok(pending) => {
                self.state = AnimationState::Running { pending };
                tracing::trace!(?pending, generation = ?self.simulation.generation(), "frame");
                Ok(())
            }
            Err(err) => Err(self.halt(err)),
        }
    }

    /// Pauses after a failure and hands the error back.
    fn halt(&mut self, err: Error) -> Error {
        self.pause();
        self.state = AnimationState::Paused;
        tracing::warn!(%err, "animation stopped");
        err
    }

    /// Repaints grid and cells from a freshly acquired view. A failure
    /// pauses the loop like any other.
    pub fn redraw(&mut self) -> Result<()> {
        self.paint().map_err(|err| self.halt(err))
    }

    fn paint(&mut self) -> Result<()> {
        let dimensions = self.simulation.dimensions();
        if dimensions != self.dimensions {
            let config = self.renderer.config();
            let expected = config.canvas_size(dimensions.width, dimensions.height)?;
            return Err(Error::CanvasMismatch { expected, actual: self.canvas.size() });
        }
        let view = GridView::acquire(&self.simulation)?;
        self.renderer.draw(&mut self.canvas, &view)
    }

    /// Flips one cell and repaints. The coordinate must already be in range.
    pub fn toggle_cell(&mut self, coord: CellCoord) -> Result<()> {
        self.dimensions.check(coord)?;
        self.simulation.toggle_cell(coord)?;
        self.redraw()
    }

    /// Maps a click on the displayed canvas to a cell and toggles it.
    pub fn click(&mut self, pointer: Pos2, screen: &ScreenRect) -> Result<CellCoord> {
        let coord = self.mapper().map(pointer, screen)?;
        self.toggle_cell(coord)?;
        Ok(coord)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.simulation.reset_cells();
        self.redraw()
    }

    /// Runs any other simulation entry point (pattern load, clear, ...) and
    /// repaints afterwards.
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> Result<R> {
        let out = f(&mut self.simulation);
        self.redraw()?;
        Ok(out)
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Applies a new palette and repaints.
    pub fn set_palette(&mut self, grid: Color32, dead: Color32, alive: Color32) -> Result<()> {
        self.renderer.set_palette(grid, dead, alive);
        self.redraw()
    }

    pub fn mapper(&self) -> InputMapper {
        InputMapper::new(self.dimensions, self.renderer.config().cell_size)
    }

    pub fn view(&self) -> Result<GridView<'_>> {
        GridView::acquire(&self.simulation)
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}
