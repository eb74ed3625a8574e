/// ASCII rasterizer for expanded strand primitives
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Matrix4;
use std::io::Write;
use strand_core::{Camera, Point, PrimitiveDescriptor};

/// Character luminosity ramp for depth shading (far to near)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%'];

/// Marker drawn at joint sphere centers
const JOINT: char = '@';

/// Screen cells a cylinder is sampled per along its axis, at most
const MAX_SAMPLES_PER_CYLINDER: usize = 256;

/// ASCII renderer that converts expanded strands to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn render_primitives<I>(
        &mut self,
        primitives: I,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) where
        I: IntoIterator<Item = PrimitiveDescriptor>,
    {
        for primitive in primitives {
            match primitive {
                PrimitiveDescriptor::Sphere { .. } => {
                    self.render_sphere(&primitive, model_matrix, camera)
                }
                PrimitiveDescriptor::Cylinder { length, .. } => {
                    self.render_cylinder(&primitive, length, model_matrix, camera)
                }
            }
        }
    }

    fn render_sphere(
        &mut self,
        sphere: &PrimitiveDescriptor,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        if let Some((x, y, depth)) = self.project(&sphere.origin(), model_matrix, camera) {
            self.plot(x, y, depth, JOINT);
        }
    }

    fn render_cylinder(
        &mut self,
        cylinder: &PrimitiveDescriptor,
        length: f32,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        let to_world = cylinder.to_world();
        let base = self.project(&cylinder.origin(), model_matrix, camera);
        let tip = self.project(
            &to_world.transform_point(&Point::new(0.0, 0.0, length)),
            model_matrix,
            camera,
        );

        // Enough samples to leave no gaps between the projected end points
        let samples = match (base, tip) {
            (Some(a), Some(b)) => {
                let span = (a.0 - b.0).abs().max((a.1 - b.1).abs());
                (span.ceil() as usize).max(1)
            }
            _ => MAX_SAMPLES_PER_CYLINDER,
        }
        .min(MAX_SAMPLES_PER_CYLINDER);

        for step in 0..=samples {
            let t = step as f32 / samples as f32;
            let point = to_world.transform_point(&Point::new(0.0, 0.0, t * length));
            if let Some((x, y, depth)) = self.project(&point, model_matrix, camera) {
                self.plot(x, y, depth, shade(depth));
            }
        }
    }

    fn project(
        &self,
        point: &Point,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) -> Option<(f32, f32, f32)> {
        camera.project_to_screen(point, model_matrix, self.width as u32, self.height as u32)
    }

    fn plot(&mut self, x: f32, y: f32, depth: f32, character: char) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
        }
    }

    /// Character at a cell, for inspection
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in self.char_buffer.chunks(self.width.max(1)) {
            for &c in row {
                // Color based on character intensity
                let color = match c {
                    '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' => Color::Yellow,
                    JOINT => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map an NDC depth in [-1, 1] onto the ramp, nearer is brighter
fn shade(depth: f32) -> char {
    let nearness = (1.0 - (depth + 1.0) * 0.5).clamp(0.0, 1.0);
    let index = (nearness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}
