/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;
use wordfield_core::{project_to_screen, Color, Material, MeshView, Scene};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light every lit surface receives regardless of orientation
const AMBIENT: f32 = 0.15;

/// Upper bound on samples per wireframe edge; edges may reach far off-screen
const MAX_LINE_STEPS: usize = 4096;

/// Lines are drawn slightly in front of coplanar faces
const LINE_DEPTH_BIAS: f32 = 1e-4;

/// Per-frame lighting inputs
struct Lighting {
    view: Matrix4<f32>,
    to_light: Vector3<f32>,
    strength: f32,
}

/// Character and color of one shaded face
#[derive(Clone, Copy)]
struct Shade {
    character: char,
    color: Color,
}

/// ASCII renderer that converts a scene to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    background: Option<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::WHITE; size],
            background: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate the buffers for a new terminal size
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::WHITE);
    }

    /// Number of cells covered by geometry in the last frame
    pub fn filled_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }

    pub fn render_scene(&mut self, scene: &Scene) {
        self.clear();
        self.background = scene.background;

        let view_projection = scene.camera.view_projection();
        let lighting = Lighting {
            view: scene.camera.view_matrix(),
            to_light: scene.light.to_light(),
            strength: scene.light.strength(),
        };

        for mesh in scene.visible_meshes() {
            self.render_mesh(&mesh, &view_projection, &lighting);
        }
    }

    fn render_mesh(&mut self, mesh: &MeshView<'_>, view_projection: &Matrix4<f32>, lighting: &Lighting) {
        let wireframe = mesh.material.wireframe();

        for triangle in &mesh.geometry.triangles {
            let world = triangle
                .vertices
                .map(|vertex| mesh.world.transform_point(&vertex.position));

            let Some(normal) = face_normal(&world) else {
                continue;
            };
            let shade = shade(mesh.material, &normal, lighting);

            // Project vertices to screen space
            let mut screen_coords = [(0.0, 0.0, 0.0); 3];
            let mut clipped = false;
            for (coords, point) in screen_coords.iter_mut().zip(&world) {
                match project_to_screen(view_projection, point, self.width as u32, self.height as u32) {
                    Some(projected) => *coords = projected,
                    None => {
                        clipped = true;
                        break;
                    }
                }
            }
            if clipped {
                continue;
            }

            if wireframe {
                for i in 0..3 {
                    self.draw_line(screen_coords[i], screen_coords[(i + 1) % 3], shade);
                }
            } else {
                self.rasterize_triangle(&screen_coords, shade);
            }
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], shade: Shade) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates, either winding
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, shade);
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, from: (f32, f32, f32), to: (f32, f32, f32), shade: Shade) {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let steps = (dx.abs().max(dy.abs()).ceil() as usize).clamp(1, MAX_LINE_STEPS);

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = from.0 + dx * t;
            let y = from.1 + dy * t;
            let depth = from.2 + (to.2 - from.2) * t - LINE_DEPTH_BIAS;
            self.plot(x.floor() as i32, y.floor() as i32, depth, shade);
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, shade: Shade) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = shade.character;
            self.color_buffer[idx] = shade.color;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            match self.background {
                Some(background) => writer.queue(SetBackgroundColor(term_color(background)))?,
                None => writer.queue(ResetColor)?,
            };

            let mut current = None;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = term_color(self.color_buffer[idx]);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn term_color(color: Color) -> TermColor {
    let (r, g, b) = color.to_rgb8();
    TermColor::Rgb { r, g, b }
}

/// Unit normal of a world-space triangle, `None` when degenerate
fn face_normal(points: &[Point3<f32>; 3]) -> Option<Vector3<f32>> {
    let normal = (points[1] - points[0]).cross(&(points[2] - points[0]));
    let length = normal.norm();
    if length > 1e-9 && length.is_finite() {
        Some(normal / length)
    } else {
        None
    }
}

fn ramp_char(brightness: f32) -> char {
    // Skip the blank so lit geometry is never invisible
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = 1 + (brightness.clamp(0.0, 1.0) * (last - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(last)]
}

fn shade(material: &Material, normal: &Vector3<f32>, lighting: &Lighting) -> Shade {
    match *material {
        Material::Standard { color } => {
            // Surfaces are double sided
            let diffuse = normal.dot(&lighting.to_light).abs() * lighting.strength;
            let brightness = (AMBIENT + diffuse).min(1.0);
            Shade {
                character: ramp_char(brightness),
                color: color.scaled(brightness),
            }
        }
        Material::Normal { .. } => {
            let mut view_normal = lighting.view.transform_vector(normal);
            if view_normal.z < 0.0 {
                view_normal = -view_normal;
            }
            let view_normal = view_normal.normalize();
            Shade {
                character: ramp_char(0.3 + 0.7 * view_normal.z),
                color: Color::rgb(
                    view_normal.x * 0.5 + 0.5,
                    view_normal.y * 0.5 + 0.5,
                    view_normal.z * 0.5 + 0.5,
                ),
            }
        }
        Material::Basic { color, .. } => Shade {
            character: ramp_char(0.8),
            color,
        },
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wordfield_core::{Camera, Mesh};

    fn scene() -> Scene {
        let mut camera = Camera::new(2.0);
        camera.set_position(0.0, 0.0, 5.0);
        Scene::new(camera)
    }

    #[test]
    fn cube_in_front_of_camera_is_drawn() {
        let mut scene = scene();
        scene.add_mesh(None, Arc::new(Mesh::cube(2.0)), Material::standard(Color::WHITE));

        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render_scene(&scene);

        assert!(renderer.filled_cells() > 0);
        assert_ne!(renderer.char_buffer[10 * 40 + 20], ' ');
    }

    #[test]
    fn empty_scene_draws_nothing() {
        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render_scene(&scene());
        assert_eq!(renderer.filled_cells(), 0);
    }

    #[test]
    fn hidden_groups_are_skipped() {
        let mut scene = scene();
        let group = scene.add_group(None);
        scene.add_mesh(Some(group), Arc::new(Mesh::cube(2.0)), Material::normal());
        scene.node_mut(group).visible = false;

        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render_scene(&scene);
        assert_eq!(renderer.filled_cells(), 0);
    }

    #[test]
    fn wireframe_leaves_gaps() {
        let mut solid = scene();
        solid.add_mesh(
            None,
            Arc::new(Mesh::plane(3.0, 3.0, 1, 1)),
            Material::Basic { color: Color::WHITE, wireframe: false },
        );
        let mut wire = scene();
        wire.add_mesh(
            None,
            Arc::new(Mesh::plane(3.0, 3.0, 1, 1)),
            Material::Basic { color: Color::WHITE, wireframe: true },
        );

        let mut renderer = AsciiRenderer::new(60, 30);
        renderer.render_scene(&solid);
        let solid_cells = renderer.filled_cells();
        renderer.render_scene(&wire);
        let wire_cells = renderer.filled_cells();

        assert!(wire_cells > 0);
        assert!(wire_cells < solid_cells);
    }

    #[test]
    fn resize_reallocates_buffers() {
        let mut renderer = AsciiRenderer::new(10, 5);
        renderer.resize(20, 8);
        assert_eq!((renderer.width(), renderer.height()), (20, 8));
        assert_eq!(renderer.char_buffer.len(), 160);
    }

    #[test]
    fn draw_writes_every_row() {
        let mut scene = scene();
        scene.background = Some(Color::BLACK);
        scene.add_mesh(None, Arc::new(Mesh::cube(2.0)), Material::normal());

        let mut renderer = AsciiRenderer::new(12, 6);
        renderer.render_scene(&scene);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        assert!(!out.is_empty());
    }

    #[test]
    fn ramp_never_blanks_lit_faces() {
        assert_eq!(ramp_char(0.0), '.');
        assert_eq!(ramp_char(1.0), '@');
    }
}
