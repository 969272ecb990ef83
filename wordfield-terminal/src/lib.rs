/// Terminal host: runs a sketch through the ASCII rasterizer
use crossterm::{
    cursor,
    event::{self, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use wordfield_core::{FrameTime, OrbitControls, Result, Scene, Sketch, WordfieldConfig};

pub mod keymap;
pub mod renderer;

pub use keymap::{map_key, Command, Zoom};
pub use renderer::AsciiRenderer;

/// Camera aspect for a grid of terminal cells, which are about twice as
/// tall as they are wide
pub fn cell_aspect(width: u16, height: u16) -> f32 {
    if height == 0 {
        return 1.0;
    }
    width as f32 / (height as f32 * 2.0)
}

/// Wall clock for [`Sketch::tick`]
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last: now }
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let time = FrameTime {
            elapsed: (now - self.start).as_secs_f32(),
            delta: (now - self.last).as_secs_f32(),
        };
        self.last = now;
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    sketch: Box<dyn Sketch>,
    scene: Scene,
    controls: OrbitControls,
    renderer: AsciiRenderer,
    clock: FrameClock,
    target_frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(sketch: Box<dyn Sketch>, config: &WordfieldConfig) -> Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(sketch, config, width, height))
    }

    /// Build the app for a known terminal size without touching the terminal
    pub fn with_size(
        mut sketch: Box<dyn Sketch>,
        config: &WordfieldConfig,
        width: u16,
        height: u16,
    ) -> Self {
        let mut scene = sketch.build();
        scene.camera.set_aspect(cell_aspect(width, height));

        let mut controls = OrbitControls::new(scene.camera.target);
        controls.enable_damping = config.controls.enable_damping;
        controls.damping_factor = config.controls.damping;

        info!(
            sketch = sketch.name(),
            nodes = scene.len(),
            width,
            height,
            "built scene"
        );

        Self {
            sketch,
            scene,
            controls,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            clock: FrameClock::new(),
            target_frame_time: Duration::from_millis(1000 / u64::from(config.fps.max(1))),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup, also when the loop failed
        let raw = terminal::disable_raw_mode();
        let screen = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);

        result?;
        raw?;
        screen?;
        Ok(())
    }

    fn main_loop(&mut self) -> Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                self.handle_event(event);
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                if let Some(command) = map_key(key) {
                    self.execute(command);
                }
            }
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Quit => self.running = false,
            Command::Orbit { left, up } if self.sketch.orbit_enabled() => {
                self.controls.rotate_left(left);
                self.controls.rotate_up(up);
            }
            Command::Zoom(zoom) if self.sketch.orbit_enabled() => match zoom {
                Zoom::In => self.controls.dolly_in(),
                Zoom::Out => self.controls.dolly_out(),
            },
            Command::Pan { right, up } if self.sketch.orbit_enabled() => {
                self.controls.pan(right, up, &self.scene.camera);
            }
            Command::Orbit { .. } | Command::Zoom(_) | Command::Pan { .. } => {}
            Command::Sketch(action) => {
                if !self.sketch.apply(&mut self.scene, action) {
                    debug!(?action, sketch = self.sketch.name(), "action ignored");
                }
            }
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.scene.camera.set_aspect(cell_aspect(width, height));
        self.renderer.resize(width as usize, height as usize);
        debug!(width, height, "terminal resized");
    }

    /// Apply pending orbit motion, then advance the sketch. A sketch that
    /// places the camera itself overrides the controls.
    pub fn update(&mut self) {
        if self.sketch.orbit_enabled() {
            self.controls.update(&mut self.scene.camera);
        }
        let time = self.clock.tick();
        self.sketch.tick(&mut self.scene, time);
    }

    fn render(&mut self) -> Result<()> {
        self.renderer.render_scene(&self.scene);

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let status = self.sketch.status();
        let line = format!(
            "{} | FPS: {:.1} | {} | {}",
            self.sketch.name(),
            self.fps,
            status,
            keymap::HELP
        );
        let line: String = line.chars().take(self.renderer.width()).collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(line),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use wordfield_core::sketch::Part;
    use wordfield_core::{create, SketchAction};

    fn app(name: &str) -> TerminalApp {
        let config = WordfieldConfig {
            seed: Some(3),
            ..Default::default()
        };
        let sketch = create(name, &config).unwrap();
        TerminalApp::with_size(sketch, &config, 80, 24)
    }

    #[test]
    fn aspect_accounts_for_tall_cells() {
        assert_relative_eq!(cell_aspect(80, 20), 2.0);
        assert_eq!(cell_aspect(80, 0), 1.0);
    }

    #[test]
    fn quit_key_stops_the_app() {
        let mut app = app("bounce");
        assert!(app.is_running());
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(!app.is_running());
    }

    #[test]
    fn resize_updates_camera_and_buffers() {
        let mut app = app("smiley-cave");
        app.handle_event(Event::Resize(120, 30));
        assert_relative_eq!(app.scene().camera.aspect, 2.0);
        assert_eq!(app.renderer.width(), 120);
    }

    #[test]
    fn sketch_actions_reach_the_sketch() {
        let mut app = app("cave-changes");
        app.execute(Command::Sketch(SketchAction::SelectPart(Part::Two)));
        app.update();
        assert_relative_eq!(app.scene().camera.position.x, 25.0);
    }

    #[test]
    fn orbit_moves_the_camera_when_enabled() {
        let mut app = app("smiley-cave");
        app.controls.enable_damping = false;
        let before = app.scene().camera.position;
        app.execute(Command::Orbit { left: 0.5, up: 0.0 });
        app.update();
        assert_ne!(app.scene().camera.position, before);
    }

    #[test]
    fn pan_moves_camera_and_target_together() {
        let mut app = app("smiley-cave");
        app.controls.enable_damping = false;
        let position = app.scene().camera.position;
        let target = app.scene().camera.target;

        app.execute(Command::Pan { right: 1.0, up: 0.5 });
        app.update();

        let camera = &app.scene().camera;
        assert_relative_eq!(camera.target, app.controls.target, epsilon = 1e-5);
        assert!((camera.target - target).norm() > 0.5);
        assert_relative_eq!(camera.position - position, camera.target - target, epsilon = 1e-4);
    }

    #[test]
    fn turntable_wins_over_pending_orbit() {
        let mut config = WordfieldConfig {
            seed: Some(3),
            ..Default::default()
        };
        config.text.source = "The steward pressed the button.".to_string();
        let sketch = create("term-field", &config).unwrap();
        let mut app = TerminalApp::with_size(sketch, &config, 80, 24);

        app.execute(Command::Sketch(SketchAction::Advance));
        app.execute(Command::Sketch(SketchAction::Advance));
        app.execute(Command::Sketch(SketchAction::ToggleTurntable));
        app.execute(Command::Orbit { left: 0.5, up: 0.3 });
        app.execute(Command::Zoom(Zoom::In));

        for _ in 0..3 {
            app.update();
            let camera = &app.scene().camera;
            let radius = camera.position.x.hypot(camera.position.z);
            assert_relative_eq!(radius, 20.0, epsilon = 1e-4);
            assert_relative_eq!(camera.position.y, 5.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn orbit_is_ignored_for_pinned_cameras() {
        let mut app = app("bounce");
        let before = app.scene().camera.position;
        app.execute(Command::Orbit { left: 0.5, up: 0.0 });
        app.update();
        assert_eq!(app.scene().camera.position, before);
    }
}
