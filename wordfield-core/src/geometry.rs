/// Geometry primitives for 3D rendering
use nalgebra::{Point3, Vector3};
use std::f32::consts::{PI, TAU};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Build a mesh from a vertex pool and triangle index triples
    pub fn from_indexed(vertices: &[Vertex], faces: &[[usize; 3]]) -> Self {
        let mut mesh = Self::with_capacity(faces.len());
        for &[a, b, c] in faces {
            mesh.add_triangle(Triangle::new(vertices[a], vertices[b], vertices[c]));
        }
        mesh
    }

    /// Axis-aligned cube centered on the origin
    pub fn cube(size: f32) -> Self {
        Self::cuboid(size, size, size)
    }

    /// Axis-aligned box centered on the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
        let mut mesh = Self::with_capacity(12);

        // (normal, four corners counter-clockwise seen from outside)
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, 1.0], [[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]]),
            ([0.0, 0.0, -1.0], [[hx, -hy, -hz], [-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz]]),
            ([0.0, 1.0, 0.0], [[-hx, hy, hz], [hx, hy, hz], [hx, hy, -hz], [-hx, hy, -hz]]),
            ([0.0, -1.0, 0.0], [[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]]),
            ([1.0, 0.0, 0.0], [[hx, -hy, hz], [hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz]]),
            ([-1.0, 0.0, 0.0], [[-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz], [-hx, hy, -hz]]),
        ];

        for ([nx, ny, nz], corners) in faces {
            let v: Vec<Vertex> = corners
                .iter()
                .map(|[x, y, z]| Vertex::new(*x, *y, *z, nx, ny, nz))
                .collect();
            mesh.add_triangle(Triangle::new(v[0], v[1], v[2]));
            mesh.add_triangle(Triangle::new(v[0], v[2], v[3]));
        }

        mesh
    }

    /// Subdivided plane in the XY plane, facing +Z
    pub fn plane(width: f32, height: f32, width_segments: usize, height_segments: usize) -> Self {
        let (sx, sy) = (width_segments.max(1), height_segments.max(1));
        let mut vertices = Vec::with_capacity((sx + 1) * (sy + 1));
        for iy in 0..=sy {
            let y = height / 2.0 - iy as f32 * height / sy as f32;
            for ix in 0..=sx {
                let x = ix as f32 * width / sx as f32 - width / 2.0;
                vertices.push(Vertex::new(x, y, 0.0, 0.0, 0.0, 1.0));
            }
        }

        let mut faces = Vec::with_capacity(sx * sy * 2);
        for iy in 0..sy {
            for ix in 0..sx {
                let a = ix + (sx + 1) * iy;
                let b = ix + (sx + 1) * (iy + 1);
                let c = ix + 1 + (sx + 1) * (iy + 1);
                let d = ix + 1 + (sx + 1) * iy;
                faces.push([a, b, d]);
                faces.push([b, c, d]);
            }
        }

        Self::from_indexed(&vertices, &faces)
    }

    /// Flat disc in the XY plane, facing +Z
    pub fn circle(radius: f32, segments: usize) -> Self {
        Self::ring(0.0, radius, segments, 0.0, TAU)
    }

    /// Flat annulus (or annular sector) in the XY plane, facing +Z
    pub fn ring(
        inner_radius: f32,
        outer_radius: f32,
        segments: usize,
        theta_start: f32,
        theta_length: f32,
    ) -> Self {
        let segments = segments.max(3);
        let mut vertices = Vec::with_capacity((segments + 1) * 2);
        for radius in [inner_radius, outer_radius] {
            for i in 0..=segments {
                let theta = theta_start + i as f32 / segments as f32 * theta_length;
                vertices.push(Vertex::new(
                    radius * theta.cos(),
                    radius * theta.sin(),
                    0.0,
                    0.0,
                    0.0,
                    1.0,
                ));
            }
        }

        let outer = segments + 1;
        let mut faces = Vec::with_capacity(segments * 2);
        for i in 0..segments {
            let (a, b) = (i, i + 1);
            let (c, d) = (outer + i + 1, outer + i);
            if inner_radius > 0.0 {
                faces.push([a, d, b]);
            }
            faces.push([b, d, c]);
        }

        Self::from_indexed(&vertices, &faces)
    }

    /// Latitude/longitude sphere centered on the origin
    pub fn uv_sphere(radius: f32, width_segments: usize, height_segments: usize) -> Self {
        let (ws, hs) = (width_segments.max(3), height_segments.max(2));
        let mut vertices = Vec::with_capacity((ws + 1) * (hs + 1));
        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let normal = Vector3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );
                vertices.push(Vertex::from_parts(Point3::from(normal * radius), normal));
            }
        }

        let mut faces = Vec::with_capacity(ws * hs * 2);
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * (ws + 1) + ix + 1;
                let b = iy * (ws + 1) + ix;
                let c = (iy + 1) * (ws + 1) + ix;
                let d = (iy + 1) * (ws + 1) + ix + 1;
                if iy != 0 {
                    faces.push([a, b, d]);
                }
                if iy != hs - 1 {
                    faces.push([b, c, d]);
                }
            }
        }

        Self::from_indexed(&vertices, &faces)
    }

    /// Regular icosahedron with flat-shaded faces
    pub fn icosahedron(radius: f32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let corners = [
            [-1.0, t, 0.0],
            [1.0, t, 0.0],
            [-1.0, -t, 0.0],
            [1.0, -t, 0.0],
            [0.0, -1.0, t],
            [0.0, 1.0, t],
            [0.0, -1.0, -t],
            [0.0, 1.0, -t],
            [t, 0.0, -1.0],
            [t, 0.0, 1.0],
            [-t, 0.0, -1.0],
            [-t, 0.0, 1.0],
        ];
        let faces: [[usize; 3]; 20] = [
            [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
            [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
            [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
            [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
        ];

        let points: Vec<Point3<f32>> = corners
            .iter()
            .map(|&[x, y, z]| Point3::from(Vector3::new(x, y, z).normalize() * radius))
            .collect();

        let mut mesh = Self::with_capacity(faces.len());
        for [a, b, c] in faces {
            let normal = (points[b] - points[a]).cross(&(points[c] - points[a])).normalize();
            mesh.add_triangle(Triangle::new(
                Vertex::from_parts(points[a], normal),
                Vertex::from_parts(points[b], normal),
                Vertex::from_parts(points[c], normal),
            ));
        }
        mesh
    }

    /// (p, q) torus knot swept with a circular tube
    pub fn torus_knot(
        radius: f32,
        tube: f32,
        tubular_segments: usize,
        radial_segments: usize,
        p: u32,
        q: u32,
    ) -> Self {
        let (ts, rs) = (tubular_segments.max(3), radial_segments.max(3));
        let (p, q) = (p as f32, q as f32);

        let curve = |u: f32| {
            let qu_over_p = q / p * u;
            let cs = qu_over_p.cos();
            Vector3::new(
                radius * (2.0 + cs) * 0.5 * u.cos(),
                radius * (2.0 + cs) * 0.5 * u.sin(),
                radius * qu_over_p.sin() * 0.5,
            )
        };

        let mut vertices = Vec::with_capacity((ts + 1) * (rs + 1));
        for i in 0..=ts {
            let u = i as f32 / ts as f32 * p * TAU;
            let p1 = curve(u);
            let p2 = curve(u + 0.01);

            // Frenet-like frame along the curve
            let tangent = p2 - p1;
            let bitangent = tangent.cross(&(p2 + p1)).normalize();
            let normal = bitangent.cross(&tangent).normalize();

            for j in 0..=rs {
                let v = j as f32 / rs as f32 * TAU;
                let cx = -tube * v.cos();
                let cy = tube * v.sin();
                let position = p1 + normal * cx + bitangent * cy;
                let vertex_normal = (position - p1).normalize();
                vertices.push(Vertex::from_parts(Point3::from(position), vertex_normal));
            }
        }

        let mut faces = Vec::with_capacity(ts * rs * 2);
        for j in 1..=ts {
            for i in 1..=rs {
                let a = (rs + 1) * (j - 1) + (i - 1);
                let b = (rs + 1) * j + (i - 1);
                let c = (rs + 1) * j + i;
                let d = (rs + 1) * (j - 1) + i;
                faces.push([a, b, d]);
                faces.push([b, c, d]);
            }
        }

        Self::from_indexed(&vertices, &faces)
    }

    /// Largest distance from the origin to any vertex
    pub fn bounding_radius(&self) -> f32 {
        self.triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .map(|v| v.position.coords.norm())
            .fold(0.0, f32::max)
    }
}
