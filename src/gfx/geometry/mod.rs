//! # Procedural Geometry Generation
//!
//! This module generates the meshes for the pickable shapes, the floor and
//! the device ray bars, so no model files are needed.
//!
//! ## Supported Primitives
//!
//! - **Box**: axis-aligned box with flat faces
//! - **Cone / Cylinder**: Y-aligned, centered on the origin
//! - **Sphere**: UV sphere
//! - **Torus**: ring in the XY plane
//! - **Plane**: horizontal XZ plane facing +Y
//!
//! All triangles wind counter-clockwise when seen from outside the shape.
//! The ray caster relies on this to skip back faces.
//!
//! ## Usage
//!
//! ```rust
//! use grabscene::gfx::geometry::{ShapeKind, generate_box};
//!
//! let cube = generate_box(0.2, 0.2, 0.2);
//! assert_eq!(cube.triangle_count(), 12);
//!
//! let torus = ShapeKind::Torus.geometry();
//! assert!(torus.triangle_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use std::fmt;

use cgmath::Vector3;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload and ray tests
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates over triangle corner positions in index order
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3<f32>; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            let corner = |i: u32| Vector3::from(self.vertices[i as usize]);
            [corner(tri[0]), corner(tri[1]), corner(tri[2])]
        })
    }

    /// Returns a copy with every vertex shifted by `offset`
    pub fn translated(mut self, offset: [f32; 3]) -> Self {
        for v in &mut self.vertices {
            v[0] += offset[0];
            v[1] += offset[1];
            v[2] += offset[2];
        }
        self
    }

    /// Interleaves positions and normals into the vertex format used by the renderer
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }

    fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        index
    }

    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }
}

/// The kinds of pickable shape that populate the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Box,
    Cone,
    Cylinder,
    Sphere,
    Torus,
}

impl ShapeKind {
    /// Every shape kind, in a fixed order
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Box,
        ShapeKind::Cone,
        ShapeKind::Cylinder,
        ShapeKind::Sphere,
        ShapeKind::Torus,
    ];

    /// Generates the shared mesh for this kind at its standard size (about 0.2 units)
    pub fn geometry(self) -> GeometryData {
        match self {
            ShapeKind::Box => generate_box(0.2, 0.2, 0.2),
            ShapeKind::Cone => generate_cone(0.2, 0.2, 64),
            ShapeKind::Cylinder => generate_cylinder(0.2, 0.2, 0.2, 64),
            ShapeKind::Sphere => generate_sphere(0.2, 32, 16),
            ShapeKind::Torus => generate_torus(0.2, 0.04, 64, 32),
        }
    }

    /// Lowercase display name
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Box => "box",
            ShapeKind::Cone => "cone",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Torus => "torus",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
