use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::{info, trace};

use crate::camera::{Camera, CameraHandle};
use crate::config::AppConfig;
use crate::rendering::RenderSink;
use crate::scene_graph::{FrameStats, Scene};
use crate::timer::{FpsCounter, Timer};
use crate::window::Window;

/// Stages of one frame, in the only order they ever run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    CameraUpdate,
    SceneUpdate,
    FixedTick,
    FilterRefresh,
    DeferredPass,
    ForwardPass,
    Present,
}

/// What application hooks can reach.
pub struct AppContext<'a> {
    pub scene: &'a mut Scene,
    pub camera: &'a Rc<RefCell<Camera>>,
    pub config: &'a AppConfig,
    pub timer: &'a Timer,
}

impl AppContext<'_> {
    /// Camera handle for filters created inside a hook.
    pub fn camera_handle(&self) -> CameraHandle {
        self.camera.clone()
    }
}

/// Application callbacks driven by [`FrameLoop`]. Every hook has a default.
pub trait App {
    fn on_initialize(&mut self, _ctx: &mut AppContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Fixed-rate update. `partial` is the fraction of the next tick interval
    /// that has already elapsed.
    fn on_update(&mut self, _ctx: &mut AppContext<'_>, _partial: f32) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_render_deferred(
        &mut self,
        ctx: &mut AppContext<'_>,
        sink: &mut dyn RenderSink,
    ) -> anyhow::Result<FrameStats> {
        Ok(ctx.scene.render_frame(sink))
    }

    fn on_render_forward(
        &mut self,
        _ctx: &mut AppContext<'_>,
        _sink: &mut dyn RenderSink,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_resize(&mut self, _ctx: &mut AppContext<'_>, _width: u32, _height: u32) {}

    fn on_destroy(&mut self, _ctx: &mut AppContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub stats: FrameStats,
    pub ticked: bool,
}

/// Owns the scene, camera and timing, and runs frames in a fixed order:
/// camera, scene update, optional fixed tick, filter refresh, deferred pass,
/// forward pass, present.
pub struct FrameLoop<A, W, S> {
    app: A,
    window: W,
    sink: S,
    config: AppConfig,
    scene: Scene,
    camera: Rc<RefCell<Camera>>,
    timer: Timer,
    fps: FpsCounter,
    window_size: (u32, u32),
}

macro_rules! context {
    ($self:ident) => {
        AppContext {
            scene: &mut $self.scene,
            camera: &$self.camera,
            config: &$self.config,
            timer: &$self.timer,
        }
    };
}

impl<A, W, S> FrameLoop<A, W, S>
where
    A: App,
    W: Window,
    S: RenderSink,
{
    pub fn new(config: AppConfig, app: A, window: W, sink: S) -> anyhow::Result<Self> {
        let interval = config
            .tick_interval()
            .context("Invalid frame loop configuration")?;
        let camera = Camera::from_config(&config).shared();

        Ok(Self {
            app,
            window,
            sink,
            config,
            scene: Scene::new(),
            camera,
            timer: Timer::new(interval),
            fps: FpsCounter::new(),
            window_size: (0, 0),
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &Rc<RefCell<Camera>> {
        &self.camera
    }

    pub fn camera_handle(&self) -> CameraHandle {
        self.camera.clone()
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// One-time preparation before the first frame.
    pub fn setup(&mut self) -> anyhow::Result<()> {
        info!("Starting up {}...", self.config.window_title);

        self.sync_window_size();
        self.timer.restart();
        self.scene.setup();

        self.app
            .on_initialize(&mut context!(self))
            .context("Application initialization failed")?;

        info!("Initialization complete.");
        Ok(())
    }

    /// Runs one frame that took `frame_time` since the previous one.
    pub fn frame(&mut self, frame_time: Duration) -> anyhow::Result<FrameReport> {
        trace!("{:?}", FramePhase::CameraUpdate);
        self.sync_window_size();
        self.camera.borrow_mut().update();

        trace!("{:?}", FramePhase::SceneUpdate);
        self.scene.update();

        self.timer.advance(frame_time);
        let ticked = self.timer.elapsed();
        if ticked {
            trace!("{:?}", FramePhase::FixedTick);
            self.timer.consume_tick();
            let partial = self.timer.partial();
            self.app
                .on_update(&mut context!(self), partial)
                .context("Fixed update failed")?;
        }

        // Every filter sees this frame's camera before any leaf is tested.
        trace!("{:?}", FramePhase::FilterRefresh);
        self.scene.render_manager_mut().update();

        trace!("{:?}", FramePhase::DeferredPass);
        self.sink.begin_deferred();
        let stats = self
            .app
            .on_render_deferred(&mut context!(self), &mut self.sink)
            .context("Deferred pass failed")?;
        self.sink.finish_deferred();

        trace!("{:?}", FramePhase::ForwardPass);
        self.app
            .on_render_forward(&mut context!(self), &mut self.sink)
            .context("Forward pass failed")?;

        trace!("{:?}", FramePhase::Present);
        self.fps.count(frame_time);
        self.window.present();

        Ok(FrameReport { stats, ticked })
    }

    /// Sets up, renders until the window asks to close, then tears down.
    pub fn run(mut self) -> anyhow::Result<()> {
        self.setup()?;

        let mut last_frame = Instant::now();
        while !self.window.should_close() {
            let now = Instant::now();
            let frame_time = now - last_frame;
            last_frame = now;

            self.frame(frame_time)?;
        }

        self.shutdown()
    }

    /// Ends the loop. Scene, filters and models are dropped together.
    pub fn shutdown(mut self) -> anyhow::Result<()> {
        info!("Shutting down...");
        self.app
            .on_destroy(&mut context!(self))
            .context("Application shutdown failed")
    }

    fn sync_window_size(&mut self) {
        let size = self.window.size();
        if size == self.window_size {
            return;
        }

        self.window_size = size;
        self.camera.borrow_mut().resize(size.0, size.1);
        self.app.on_resize(&mut context!(self), size.0, size.1);
    }
}
