//! Procedural primitive generation for the carousel geometry table.
//!
//! Each generator returns a [`MeshData`]: plain vertex/index vectors that
//! can be measured (bounding radius) before being uploaded into GPU buffers
//! with [`MeshData::into_mesh`]. All primitives are centred on the origin.

use std::collections::HashMap;

use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

use crate::data_structures::model::{Mesh, ModelVertex};

pub struct MeshData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Radius of the smallest origin-centred sphere containing the mesh.
    /// Captured at build time and used for whole-unit ray picking.
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| Vector3::from(v.position).magnitude())
            .fold(0.0, f32::max)
    }

    pub fn scale(&mut self, factor: f32) {
        for vertex in self.vertices.iter_mut() {
            vertex.position = (Vector3::from(vertex.position) * factor).into();
        }
    }

    /// Flip the winding order and normals, turning an outward-facing sphere
    /// into a backdrop viewed from the inside.
    pub fn invert(&mut self) {
        for triangle in self.indices.chunks_mut(3) {
            triangle.swap(1, 2);
        }
        for vertex in self.vertices.iter_mut() {
            vertex.normal = (-Vector3::from(vertex.normal)).into();
        }
    }

    pub fn into_mesh(self, device: &wgpu::Device, name: &str, material: usize) -> Mesh {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Vertex Buffer")),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Index Buffer")),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Mesh {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: self.indices.len() as u32,
            material,
        }
    }
}

fn vertex(position: Vector3<f32>, normal: Vector3<f32>, uv: [f32; 2]) -> ModelVertex {
    ModelVertex {
        position: position.into(),
        tex_coords: uv,
        normal: normal.into(),
    }
}

/// Latitude/longitude sphere.
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = v * std::f32::consts::PI;
        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let theta = u * std::f32::consts::TAU;
            let normal = Vector3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            );
            vertices.push(vertex(normal * radius, normal, [u, v]));
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * stride + segment;
            let b = a + stride;
            // Counter-clockwise from the outside.
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    MeshData { vertices, indices }
}

/// Icosahedron subdivided `subdivisions` times and projected onto a sphere.
pub fn icosphere(radius: f32, subdivisions: u32) -> MeshData {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let mut positions: Vec<Vector3<f32>> = [
        [-1.0, t, 0.0], [1.0, t, 0.0], [-1.0, -t, 0.0], [1.0, -t, 0.0],
        [0.0, -1.0, t], [0.0, 1.0, t], [0.0, -1.0, -t], [0.0, 1.0, -t],
        [t, 0.0, -1.0], [t, 0.0, 1.0], [-t, 0.0, -1.0], [-t, 0.0, 1.0],
    ]
    .into_iter()
    .map(|p| Vector3::from(p).normalize())
    .collect();

    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    for _ in 0..subdivisions {
        let mut next_faces = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut positions, &mut midpoints);
            let bc = midpoint(b, c, &mut positions, &mut midpoints);
            let ca = midpoint(c, a, &mut positions, &mut midpoints);
            next_faces.extend_from_slice(&[
                [a, ab, ca],
                [b, bc, ab],
                [c, ca, bc],
                [ab, bc, ca],
            ]);
        }
        faces = next_faces;
    }

    let vertices = positions
        .into_iter()
        .map(|normal| {
            let u = 0.5 + normal.z.atan2(normal.x) / std::f32::consts::TAU;
            let v = normal.y.clamp(-1.0, 1.0).acos() / std::f32::consts::PI;
            vertex(normal * radius, normal, [u, v])
        })
        .collect();
    let indices = faces.into_iter().flatten().collect();

    MeshData { vertices, indices }
}

fn midpoint(
    a: u32,
    b: u32,
    positions: &mut Vec<Vector3<f32>>,
    cache: &mut HashMap<(u32, u32), u32>,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&index) = cache.get(&key) {
        return index;
    }
    let mid = ((positions[a as usize] + positions[b as usize]) / 2.0).normalize();
    positions.push(mid);
    let index = (positions.len() - 1) as u32;
    cache.insert(key, index);
    index
}

/// Ring torus in the xy-plane.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * std::f32::consts::TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * std::f32::consts::TAU;
            let center = Vector3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let position = Vector3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let normal = (position - center).normalize();
            vertices.push(vertex(
                position,
                normal,
                [
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ],
            ));
        }
    }

    let stride = tubular_segments + 1;
    for j in 0..radial_segments {
        for i in 0..tubular_segments {
            let a = j * stride + i;
            let b = a + stride;
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    MeshData { vertices, indices }
}

/// (p, q) torus knot: a tube swept along a closed curve winding p times
/// around the torus axis and q times through its hole.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let curve_point = |u: f32| -> Vector3<f32> {
        let qu_over_p = q as f32 / p as f32 * u;
        let cs = qu_over_p.cos();
        Vector3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * 0.5 * u.sin(),
            radius * qu_over_p.sin() * 0.5,
        )
    };

    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * p as f32 * std::f32::consts::TAU;
        let p1 = curve_point(u);
        let p2 = curve_point(u + 0.01);

        // Frenet-style frame from neighbouring curve points.
        let tangent = p2 - p1;
        let mut normal = p2 + p1;
        let binormal = tangent.cross(normal).normalize();
        normal = binormal.cross(tangent).normalize();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * std::f32::consts::TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let position = p1 + normal * cx + binormal * cy;
            let surface_normal = (position - p1).normalize();
            vertices.push(vertex(
                position,
                surface_normal,
                [
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ],
            ));
        }
    }

    let stride = radial_segments + 1;
    for i in 0..tubular_segments {
        for j in 0..radial_segments {
            let a = i * stride + j;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    MeshData { vertices, indices }
}

/// Axis-aligned box with rounded corners: a subdivided cube whose vertices
/// are pulled onto the surface at distance `corner_radius` around an inner
/// box.
pub fn rounded_box(size: [f32; 3], segments: u32, corner_radius: f32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let half = Vector3::new(size[0] / 2.0, size[1] / 2.0, size[2] / 2.0);
    let inner = half - Vector3::new(corner_radius, corner_radius, corner_radius);

    // One grid per cube face: (origin corner, edge u, edge v).
    let faces: [(Vector3<f32>, Vector3<f32>, Vector3<f32>); 6] = [
        // +x
        (Vector3::new(half.x, -half.y, half.z), Vector3::new(0.0, 0.0, -size[2]), Vector3::new(0.0, size[1], 0.0)),
        // -x
        (Vector3::new(-half.x, -half.y, -half.z), Vector3::new(0.0, 0.0, size[2]), Vector3::new(0.0, size[1], 0.0)),
        // +y
        (Vector3::new(-half.x, half.y, half.z), Vector3::new(size[0], 0.0, 0.0), Vector3::new(0.0, 0.0, -size[2])),
        // -y
        (Vector3::new(-half.x, -half.y, -half.z), Vector3::new(size[0], 0.0, 0.0), Vector3::new(0.0, 0.0, size[2])),
        // +z
        (Vector3::new(-half.x, -half.y, half.z), Vector3::new(size[0], 0.0, 0.0), Vector3::new(0.0, size[1], 0.0)),
        // -z
        (Vector3::new(half.x, -half.y, -half.z), Vector3::new(-size[0], 0.0, 0.0), Vector3::new(0.0, size[1], 0.0)),
    ];

    for (origin, edge_u, edge_v) in faces {
        let base = vertices.len() as u32;
        for y in 0..=segments {
            let fv = y as f32 / segments as f32;
            for x in 0..=segments {
                let fu = x as f32 / segments as f32;
                let raw = origin + edge_u * fu + edge_v * fv;
                // Clamp into the inner box; the remainder becomes the
                // rounded corner offset.
                let clamped = Vector3::new(
                    raw.x.clamp(-inner.x, inner.x),
                    raw.y.clamp(-inner.y, inner.y),
                    raw.z.clamp(-inner.z, inner.z),
                );
                let offset = raw - clamped;
                let normal = offset.normalize();
                let position = clamped + normal * corner_radius;
                vertices.push(vertex(position, normal, [fu, fv]));
            }
        }
        let stride = segments + 1;
        for y in 0..segments {
            for x in 0..segments {
                let a = base + y * stride + x;
                let b = a + stride;
                indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
            }
        }
    }

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let sphere = uv_sphere(0.75, 16, 16);
        for v in &sphere.vertices {
            let len = Vector3::from(v.position).magnitude();
            assert!((len - 0.75).abs() < 1e-5);
        }
        assert!((sphere.bounding_radius() - 0.75).abs() < 1e-5);
    }

    #[test]
    fn icosphere_subdivision_grows_the_face_count() {
        let coarse = icosphere(1.0, 0);
        let fine = icosphere(1.0, 2);
        assert_eq!(coarse.indices.len(), 20 * 3);
        assert_eq!(fine.indices.len(), 20 * 4 * 4 * 3);
    }

    #[test]
    fn torus_knot_stays_inside_its_bound() {
        let knot = torus_knot(0.5, 0.2, 64, 16, 2, 3);
        // Curve radius (2 + 1) * 0.5 * 0.5 plus the tube.
        let bound = 0.5 * 3.0 * 0.5 + 0.2 + 1e-4;
        assert!(knot.bounding_radius() <= bound);
        assert!(knot.bounding_radius() > 0.5);
    }

    #[test]
    fn rounded_box_respects_its_extents() {
        let cube = rounded_box([1.0, 1.0, 1.0], 4, 0.02);
        let half_diagonal = Vector3::new(0.5, 0.5, 0.5).magnitude();
        for v in &cube.vertices {
            let p = Vector3::from(v.position);
            assert!(p.x.abs() <= 0.5 + 1e-5);
            assert!(p.y.abs() <= 0.5 + 1e-5);
            assert!(p.z.abs() <= 0.5 + 1e-5);
            assert!(p.magnitude() <= half_diagonal);
        }
    }

    #[test]
    fn inverting_flips_winding_and_normals() {
        let mut sphere = uv_sphere(1.0, 4, 4);
        let first_triangle = [sphere.indices[0], sphere.indices[1], sphere.indices[2]];
        let first_normal = Vector3::from(sphere.vertices[0].normal);
        sphere.invert();
        assert_eq!(sphere.indices[1], first_triangle[2]);
        assert_eq!(sphere.indices[2], first_triangle[1]);
        assert!((Vector3::from(sphere.vertices[0].normal) + first_normal).magnitude() < 1e-6);
    }
}
