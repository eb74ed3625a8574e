/// Terminal previewer for hair strand files
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::Matrix4;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use strand_core::{Camera, HairShape, Point, RotationState, Transform};

pub mod renderer;
pub mod report;

pub use renderer::AsciiRenderer;
pub use report::Report;

/// Interactive preview of a hair shape's expanded primitives
pub struct TerminalApp {
    shape: HairShape,
    pivot: Point,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    spin: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(shape: HairShape) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let (width, height) = (width as u32, height as u32);

        let (camera, pivot) = match shape.store().bounds() {
            Some(bounds) => (Camera::framing(&bounds, width, height), bounds.center()),
            None => (Camera::new(width, height), Point::origin()),
        };
        log::debug!(
            "Previewing {} primitives at {}x{}",
            shape.primitive_count(),
            width,
            height
        );

        Ok(Self {
            shape,
            pivot,
            rotation: RotationState::zero(),
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            spin: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Char(' ') => self.spin = !self.spin,
                KeyCode::Char('w') | KeyCode::Up => self.rotation.rotate(0.1, 0.0, 0.0),
                KeyCode::Char('s') | KeyCode::Down => self.rotation.rotate(-0.1, 0.0, 0.0),
                KeyCode::Char('a') | KeyCode::Left => self.rotation.rotate(0.0, -0.1, 0.0),
                KeyCode::Char('d') | KeyCode::Right => self.rotation.rotate(0.0, 0.1, 0.0),
                KeyCode::Char('e') => self.rotation.rotate(0.0, 0.0, 0.1),
                KeyCode::Char('r') => self.rotation.rotate(0.0, 0.0, -0.1),
                _ => {}
            }
        }
        Ok(())
    }

    fn update(&mut self) {
        if self.spin {
            self.rotation.rotate(0.0, 0.02, 0.0);
        }
    }

    /// Rotation about the center of the strands' bounds
    fn model_matrix(&self) -> Matrix4<f32> {
        Transform::translation_matrix(&self.pivot)
            * Transform::rotation_matrix(&self.rotation)
            * Transform::translation_matrix(&Point::from(-self.pivot.coords))
    }

    fn render(&mut self) -> io::Result<()> {
        let model = self.model_matrix();

        self.renderer.clear();
        self.renderer
            .render_primitives(self.shape.primitives(), &model, &self.camera);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Strands | {} segments | FPS: {:.1} | WASD/Arrows=Rotate E/R=Roll Space=Spin Q=Quit",
                self.shape.segment_count(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
