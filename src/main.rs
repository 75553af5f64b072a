use anyhow::Result;
use log::info;
use rusted_input::engine::input::{action, InputManager, NoGamepads};
use std::time::Instant;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Input demo...");

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Rusted Input")
        .with_inner_size(winit::dpi::LogicalSize::new(640, 360))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    let mut input = InputManager::new(1);
    action::install_defaults(&mut input)?;

    // No gamepad backend is wired in yet
    let mut gamepads = NoGamepads;
    let mut last_frame = Instant::now();

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent { event, .. } => {
                input.process_window_event(&event);
            }
            Event::AboutToWait => {
                let now = Instant::now();
                let delta_time = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;

                input.update(delta_time, &mut gamepads);

                if input.button_pressed(0, action::JUMP) {
                    info!("Jump");
                }
                if input.button_pressed(0, action::SPRINT) {
                    info!("Sprint");
                }
                if input.button_pressed(0, action::MENU) {
                    info!("Menu requested, shutting down...");
                    elwt.exit();
                }

                let (x, y) = (
                    input.axis_state(0, action::MOVE_X),
                    input.axis_state(0, action::MOVE_Y),
                );
                if x != 0.0 || y != 0.0 {
                    log::debug!("Move ({:.2}, {:.2})", x, y);
                }

                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
