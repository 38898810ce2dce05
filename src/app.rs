use std::sync::Arc;

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::config::SessionConfig;
use crate::error::{GrabError, Result};
use crate::gfx::{camera::FixedCamera, rendering::RenderEngine};
use crate::input::DesktopPointers;
use crate::interaction::FrameDriver;

/// Desktop viewer: one window, mouse-emulated devices, a fixed camera
pub struct GrabApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: SessionConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    camera: FixedCamera,
    pointers: DesktopPointers,
    driver: FrameDriver,
    error: Option<GrabError>,
}

impl GrabApp {
    /// Create the viewer and generate the shape pool
    pub fn new(config: SessionConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;

        let viewer = &config.viewer;
        let camera = FixedCamera::from_config(viewer);
        let pointers = DesktopPointers::new(viewer.width, viewer.height, viewer.device_offset);
        let driver = FrameDriver::from_config(&config)?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                camera,
                pointers,
                driver,
                error: None,
            },
        })
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.app_state.driver
    }

    /// Run the application until the window closes (consumes self)
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        info!(
            "Session ended after {} frames",
            self.app_state.driver.frame_count()
        );
        match self.app_state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, e: GrabError) {
        error!("{e}");
        self.error = Some(e);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let viewer = &self.config.viewer;
        let background = viewer.background;
        let attributes = WindowAttributes::default()
            .with_title("grabscene")
            .with_inner_size(PhysicalSize::new(viewer.width, viewer.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, GrabError::Render(format!("failed to create window: {e}")));
                return;
            }
        };
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        match pollster::block_on(RenderEngine::new(window, width, height, background)) {
            Ok(renderer) => {
                self.camera.resize_projection(width, height);
                self.pointers.resize(width, height);
                self.render_engine = Some(renderer);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        if self.pointers.process_window_event(&event) {
            return;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera.resize_projection(width, height);
                self.pointers.resize(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.pointers.update(&self.camera);
                render_engine.update(self.camera.uniform);

                if let Err(e) = self.driver.tick(&mut self.pointers, render_engine) {
                    self.fail(event_loop, e);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
