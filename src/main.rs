use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use orrery::rendering::DrawList;
use orrery::window::{HeadlessWindow, Window};
use orrery::{AppConfig, FrameLoop};

mod demo;

const FRAME_COUNT: u64 = 600;
const FRAME_TIME: Duration = Duration::from_micros(16_667);

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => AppConfig::default(),
    };

    let window = HeadlessWindow::new(config.width, config.height, FRAME_COUNT);
    let mut frame_loop = FrameLoop::new(config, demo::DemoApp::new(), window, DrawList::new())?;

    frame_loop.setup()?;
    while !frame_loop.window().should_close() {
        frame_loop.frame(FRAME_TIME)?;
    }

    info!(
        "Rendered {} frames at a simulated {} fps",
        frame_loop.window().presented(),
        frame_loop.fps()
    );
    frame_loop.shutdown()
}
