use anyhow::Result;
use engine::app::{App, FrameOutcome};
use engine::input::{EventQueue, GilrsBackend, InputConfig};
use engine::mode::LogRenderer;
use game::main_menu::MainMenuMode;
use log::{info, warn};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod engine;
mod game;

/// Input settings, read at startup and written back on exit
const CONFIG_PATH: &str = "input.toml";

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Orbit Ribbon...");

    // An unreadable file is left alone so the user can repair it
    let (config, save_on_exit) = match InputConfig::load_or_default(CONFIG_PATH) {
        Ok(config) => (config, true),
        Err(e) => {
            warn!("Could not load {}: {}; using default controls", CONFIG_PATH, e);
            (InputConfig::built_in_defaults(), false)
        }
    };

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Orbit Ribbon")
        .with_inner_size(winit::dpi::LogicalSize::new(800, 600))
        .with_resizable(false)
        .build(&event_loop)?;

    info!("Window created successfully");

    let mut gamepads = match GilrsBackend::new() {
        Ok(backend) => Some(backend),
        Err(e) => {
            warn!("{}; continuing without gamepads", e);
            None
        }
    };
    let pads = gamepads.as_ref().map(|g| g.gamepads()).unwrap_or_default();

    let mut app = App::new(config, pads, Box::new(MainMenuMode::new()));
    let mut queue = EventQueue::new();
    let mut renderer = LogRenderer::new();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                let events = queue.drain();
                if app.frame(&events, &mut renderer) == FrameOutcome::Exit {
                    let game_loop = app.game_loop();
                    info!(
                        "Shutting down after {} frames in {:.1?} ({:.0} fps)",
                        game_loop.frame_count(),
                        game_loop.elapsed(),
                        game_loop.fps()
                    );
                    if save_on_exit {
                        if let Err(e) = app.config().save_to_file(CONFIG_PATH) {
                            warn!("Failed to save input config: {}", e);
                        }
                    }
                    elwt.exit();
                    return;
                }
                window.set_cursor_visible(app.mouse_cursor_enabled());
            }
            Event::WindowEvent { event, .. } => queue.process_window_event(&event),
            Event::DeviceEvent { event, .. } => queue.process_device_event(&event),
            Event::AboutToWait => {
                if let Some(backend) = gamepads.as_mut() {
                    backend.poll(&mut queue);
                }
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
