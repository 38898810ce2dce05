//! # Primitive Shape Generation
//!
//! This module contains functions to generate common 3D primitive shapes.
//! All shapes are Y-up, centered on the origin, and carry per-vertex normals.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate an axis-aligned box centered at the origin
///
/// Each face gets its own four vertices so the normals stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let half = [width * 0.5, height * 0.5, depth * 0.5];

    // (normal, u, v) with u x v == normal, so the corner order below is CCW
    // when viewed from outside.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];

    for (normal, u, v) in faces {
        let corner = |su: f32, sv: f32| {
            [
                (normal[0] + su * u[0] + sv * v[0]) * half[0],
                (normal[1] + su * u[1] + sv * v[1]) * half[1],
                (normal[2] + su * u[2] + sv * v[2]) * half[2],
            ]
        };

        let a = data.push_vertex(corner(-1.0, -1.0), normal);
        let b = data.push_vertex(corner(1.0, -1.0), normal);
        let c = data.push_vertex(corner(1.0, 1.0), normal);
        let d = data.push_vertex(corner(-1.0, 1.0), normal);

        data.push_triangle(a, b, c);
        data.push_triangle(c, d, a);
    }

    data
}

/// Generate a cylinder (or a frustum, when the radii differ) along the Y axis
///
/// # Arguments
/// * `radius_top` - Radius at `+height/2`; zero produces a cone tip
/// * `radius_bottom` - Radius at `-height/2`
/// * `height` - Height along Y
/// * `segments` - Number of radial segments
///
/// Caps are only emitted for non-zero radii.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;
    let slope = if height.abs() > f32::EPSILON {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    // Side: one top and one bottom vertex per segment boundary
    for i in 0..=segs {
        let theta = i as f32 / segs as f32 * 2.0 * PI;
        let (sin_t, cos_t) = theta.sin_cos();

        let normal = normalize([sin_t, slope, cos_t]);
        data.push_vertex([radius_top * sin_t, half_height, radius_top * cos_t], normal);
        data.push_vertex(
            [radius_bottom * sin_t, -half_height, radius_bottom * cos_t],
            normal,
        );
    }

    for i in 0..segs {
        let top = i * 2;
        let bottom = top + 1;
        let top_next = top + 2;
        let bottom_next = top + 3;

        data.push_triangle(top, bottom, top_next);
        data.push_triangle(bottom, bottom_next, top_next);
    }

    if radius_top > 0.0 {
        generate_cap(&mut data, radius_top, half_height, segs, true);
    }
    if radius_bottom > 0.0 {
        generate_cap(&mut data, radius_bottom, -half_height, segs, false);
    }

    data
}

/// Generate a cone along the Y axis with its tip at `+height/2`
pub fn generate_cone(radius: f32, height: f32, segments: u32) -> GeometryData {
    generate_cylinder(0.0, radius, height, segments)
}

fn generate_cap(data: &mut GeometryData, radius: f32, y: f32, segs: u32, top: bool) {
    let normal = if top { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let center = data.push_vertex([0.0, y, 0.0], normal);

    let first = data.vertices.len() as u32;
    for i in 0..=segs {
        let theta = i as f32 / segs as f32 * 2.0 * PI;
        let (sin_t, cos_t) = theta.sin_cos();
        data.push_vertex([radius * sin_t, y, radius * cos_t], normal);
    }

    for i in 0..segs {
        let current = first + i;
        let next = current + 1;
        if top {
            data.push_triangle(center, current, next);
        } else {
            data.push_triangle(center, next, current);
        }
    }
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let (sin_phi, cos_phi) = phi.sin_cos();

            let x = sin_theta * cos_phi;
            let y = cos_theta;
            let z = sin_theta * sin_phi;

            data.push_vertex([x * radius, y * radius, z * radius], [x, y, z]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.push_triangle(first, first + 1, second);
            data.push_triangle(second, first + 1, second + 1);
        }
    }

    data
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `radius` - Distance from the torus center to the tube center
/// * `tube` - Tube radius
/// * `radial_segments` - Segments around the tube cross-section
/// * `tubular_segments` - Segments around the ring
pub fn generate_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * 2.0 * PI;
        let (sin_v, cos_v) = v.sin_cos();

        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * 2.0 * PI;
            let (sin_u, cos_u) = u.sin_cos();

            let ring = radius + tube * cos_v;
            let position = [ring * cos_u, ring * sin_u, tube * sin_v];
            let center = [radius * cos_u, radius * sin_u, 0.0];
            let normal = normalize([
                position[0] - center[0],
                position[1] - center[1],
                position[2] - center[2],
            ]);

            data.push_vertex(position, normal);
        }
    }

    for j in 1..=radial {
        for i in 1..=tubular {
            let a = (tubular + 1) * j + i - 1;
            let b = (tubular + 1) * (j - 1) + i - 1;
            let c = (tubular + 1) * (j - 1) + i;
            let d = (tubular + 1) * j + i;

            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }

    data
}

/// Generate a horizontal plane in XZ facing +Y
pub fn generate_plane(width: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let hw = width * 0.5;
    let hd = depth * 0.5;
    let up = [0.0, 1.0, 0.0];

    let a = data.push_vertex([-hw, 0.0, hd], up);
    let b = data.push_vertex([hw, 0.0, hd], up);
    let c = data.push_vertex([hw, 0.0, -hd], up);
    let d = data.push_vertex([-hw, 0.0, -hd], up);

    data.push_triangle(a, b, c);
    data.push_triangle(c, d, a);

    data
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length > 0.0 {
        [v[0] / length, v[1] / length, v[2] / length]
    } else {
        v
    }
}
