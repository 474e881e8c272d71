/// Presentation surface driven by the frame loop. Real backends wrap a
/// windowing library; [`HeadlessWindow`] stands in when there is none.
pub trait Window {
    /// Current drawable size in pixels.
    fn size(&self) -> (u32, u32);

    fn should_close(&self) -> bool;

    /// Shows the finished frame and polls pending events.
    fn present(&mut self);
}

/// Window without a surface that asks to close after a fixed number of
/// presented frames.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    width: u32,
    height: u32,
    frames_left: u64,
    presented: u64,
}

impl HeadlessWindow {
    pub fn new(width: u32, height: u32, frame_count: u64) -> Self {
        Self {
            width,
            height,
            frames_left: frame_count,
            presented: 0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Window for HeadlessWindow {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn should_close(&self) -> bool {
        self.frames_left == 0
    }

    fn present(&mut self) {
        self.frames_left = self.frames_left.saturating_sub(1);
        self.presented += 1;
    }
}
