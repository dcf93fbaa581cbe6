//! tessera desktop — opens a window and draws the demo text through
//! the glyph atlas pipeline.
//!
//! Uses `winit` 0.30 for windowing and `tessera-render` for drawing.
//! Configuration errors (no font, bad atlas size, no GPU) terminate
//! the process with a message before the event loop starts spinning.

mod state;

use std::sync::Arc;

use log::info;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowAttributes, WindowId},
};

use state::AppState;
use tessera_render::{RenderContext, RenderError};

/// Winit 0.30 application handler.
struct App {
    window: Option<Arc<Window>>,
    state: Option<AppState>,
    frame_count: u64,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            state: None,
            frame_count: 0,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized.
        }

        let attrs = WindowAttributes::default()
            .with_title("tessera")
            .with_inner_size(LogicalSize::new(1008, 567))
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .unwrap_or_else(|e| die(&format!("failed to open window: {e}"))),
        );

        let size = window.inner_size();
        let ctx = pollster::block_on(RenderContext::for_window(
            window.clone(),
            size.width.max(1),
            size.height.max(1),
        ))
        .unwrap_or_else(|e| die(&format!("failed to initialize GPU: {e}")));

        let app_state = AppState::new(ctx, size.width.max(1), size.height.max(1))
            .unwrap_or_else(|e| die(&e));

        info!("tessera started at {}x{}", size.width, size.height);

        window.request_redraw();
        self.state = Some(app_state);
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(state)) = (self.window.as_ref(), self.state.as_mut()) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("window closed after {} frames", self.frame_count);
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed =>
            {
                if event.logical_key == Key::Named(NamedKey::Escape) {
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                state.resize(new_size.width, new_size.height);
                window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                match state.render_frame() {
                    Ok(stats) => {
                        self.frame_count += 1;
                        if self.frame_count % 300 == 0 {
                            info!(
                                "frame {}: {} quads, {} draw call(s)",
                                self.frame_count, stats.quads, stats.draw_calls
                            );
                        }
                    }
                    Err(RenderError::Surface(
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                    )) => {
                        // Reconfigure and try again next frame.
                        let size = window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("render error: {e}");
                    }
                }
                window.request_redraw();
            }

            _ => {}
        }
    }
}

/// The narrow fatal channel: print and terminate.
fn die(msg: &str) -> ! {
    eprintln!("fatal: {msg}");
    std::process::exit(1);
}

fn main() {
    env_logger::init();

    state::print_demo_grid();

    let event_loop = EventLoop::new()
        .unwrap_or_else(|e| die(&format!("failed to create event loop: {e}")));
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new();
    if let Err(e) = event_loop.run_app(&mut app) {
        die(&format!("event loop error: {e}"));
    }
}
