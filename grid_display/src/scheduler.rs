// scheduler.rs - Frame scheduling on top of egui's repaint requests

use conway::{Error, FrameHandle, FrameScheduler, Result};

/// Requests one repaint per scheduled frame. The frame counts as fired when
/// the next `update` takes it with [`RepaintScheduler::take_due`].
#[derive(Default)]
pub struct RepaintScheduler {
    ctx: Option<egui::Context>,
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl RepaintScheduler {
    /// Until a context is attached every request is refused.
    pub fn attach(&mut self, ctx: egui::Context) {
        self.ctx = Some(ctx);
    }

    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameScheduler for RepaintScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle> {
        let Some(ctx) = &self.ctx else {
            return Err(Error::SchedulingFailure("no window attached".into()));
        };
        if let Some(pending) = self.pending {
            return Err(Error::SchedulingFailure(format!("frame {pending:?} is still pending")));
        }
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        ctx.request_repaint();
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
