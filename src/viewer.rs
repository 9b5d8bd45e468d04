// ============================================================================
// WINDOW VIEWER
// ============================================================================

use std::collections::VecDeque;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, error, info, warn};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::raster::{load_font, render_scene, Canvas, RenderStyle};
use crate::scene::Scene;
use crate::widget::{RenderEvent, Widget};

/// Messages a producer thread can send to a widget shown by [`Viewer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetCommand {
    Set(f64),
    Close,
}

/// Frames waiting to be presented, one per display tick.
///
/// Animation frames returned by a single `set` are shown in order, so an
/// arc sweep stays visible even when several updates arrive in one tick.
#[derive(Debug, Clone)]
pub struct FrameQueue {
    pending: VecDeque<RenderEvent>,
    current: Scene,
    last_sequence: u64,
}

impl FrameQueue {
    pub fn new(initial: &Scene) -> Self {
        Self {
            pending: VecDeque::new(),
            current: initial.clone(),
            last_sequence: 0,
        }
    }

    pub fn push(&mut self, events: Vec<RenderEvent>) {
        self.pending.extend(events);
    }

    /// Applies one command to `widget`, queueing what it publishes.
    ///
    /// Returns `false` once the viewer should close.
    pub fn apply<W: Widget>(&mut self, widget: &mut W, command: WidgetCommand) -> bool {
        match command {
            WidgetCommand::Set(value) => {
                match widget.set(value) {
                    Ok(events) => self.push(events),
                    Err(err) => warn!(value, %err, "update rejected"),
                }
                true
            }
            WidgetCommand::Close => false,
        }
    }

    /// Drains every command currently waiting on `receiver`.
    pub fn drain<W: Widget>(&mut self, widget: &mut W, receiver: &Receiver<WidgetCommand>) -> bool {
        while let Ok(command) = receiver.try_recv() {
            if !self.apply(widget, command) {
                return false;
            }
        }
        true
    }

    /// Moves to the next pending frame, if any, and returns the scene to draw.
    pub fn advance(&mut self) -> &Scene {
        if let Some(event) = self.pending.pop_front() {
            self.last_sequence = event.sequence;
            self.current = event.scene;
        }
        &self.current
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Sequence number of the last frame handed out by [`FrameQueue::advance`].
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }
}

/// Presents a widget's frames in a window.
pub struct Viewer {
    config: ViewerConfig,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Shows the widget's current scene until the window is closed.
    pub fn show<W: Widget>(&self, widget: &mut W) -> Result<()> {
        self.run_window(widget, None)
    }

    /// Shows the widget, applying commands from `receiver` as they arrive.
    pub fn show_with_commands<W: Widget>(
        &self,
        widget: &mut W,
        receiver: Receiver<WidgetCommand>,
    ) -> Result<()> {
        self.run_window(widget, Some(receiver))
    }

    fn render_style(&self) -> RenderStyle {
        let font = match &self.config.font_path {
            Some(path) => match load_font(path) {
                Ok(font) => Some(font),
                Err(err) => {
                    warn!(path = %path.display(), %err, "font unavailable, labels will not be drawn");
                    None
                }
            },
            None => {
                warn!("no font configured, labels will not be drawn");
                None
            }
        };
        RenderStyle {
            background: self.config.background,
            font,
        }
    }

    fn run_window<W: Widget>(
        &self,
        widget: &mut W,
        receiver: Option<Receiver<WidgetCommand>>,
    ) -> Result<()> {
        let style = self.render_style();

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width as f64,
                self.config.window_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;
        let window = Arc::new(window);

        let window_clone = window.clone();
        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();
        let mut queue = FrameQueue::new(widget.scene());
        let mut failure: Option<Error> = None;

        info!(
            title = %self.config.title,
            width = fb_width,
            height = fb_height,
            "viewer started"
        );

        event_loop.run(|event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            warn!(%err, "buffer resize failed");
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            warn!(%err, "surface resize failed");
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(ref receiver) = receiver {
                            if !queue.drain(widget, receiver) {
                                debug!("close command received");
                                window_target.exit();
                                return;
                            }
                        }

                        let scene = queue.advance();
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        render_scene(&mut canvas, scene, &style);
                        if let Err(err) = pixels.render() {
                            error!(%err, "presenting frame failed");
                            failure = Some(err.into());
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        info!(
            value = widget.value(),
            last_sequence = queue.last_sequence(),
            "viewer stopped"
        );

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
