//! Nearest-hit ray casting against pickable meshes.

use cgmath::InnerSpace;

use super::{PickResult, Ray};
use crate::gfx::scene::object::ObjectId;
use crate::gfx::scene::pool::ShapeMesh;
use crate::gfx::scene::transform::Transform;

/// Determinant threshold below which a triangle is back-facing or edge-on
const DET_EPSILON: f32 = 1e-10;
/// Slack on barycentric bounds so rays through shared edges are not lost
const BARY_EPSILON: f32 = 1e-6;

/// One object offered to the caster
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub id: ObjectId,
    /// Object-to-world transform
    pub world: Transform,
    pub mesh: &'a ShapeMesh,
}

/// Casts rays against candidate objects and reports the nearest hit
///
/// Only the listed candidates are tested; nothing is traversed beneath
/// them. Triangles are single-sided, so a ray starting inside a closed
/// shape does not hit it.
#[derive(Debug, Clone, Copy)]
pub struct RayCaster {
    /// Hits closer than this are ignored
    pub near: f32,
    /// Hits farther than this are ignored
    pub far: f32,
}

impl Default for RayCaster {
    fn default() -> Self {
        Self {
            near: 0.0,
            far: f32::INFINITY,
        }
    }
}

impl RayCaster {
    pub fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }

    /// Nearest candidate hit by `ray`, if any.
    ///
    /// Equal distances resolve to the candidate that came first.
    pub fn intersect<'a, I>(&self, ray: &Ray, candidates: I) -> Option<PickResult>
    where
        I: IntoIterator<Item = Candidate<'a>>,
    {
        if !ray.is_valid() {
            return None;
        }

        let mut closest: Option<PickResult> = None;
        for candidate in candidates {
            let Some(distance) = self.intersect_candidate(ray, &candidate) else {
                continue;
            };
            if closest.as_ref().map_or(true, |best| distance < best.distance) {
                closest = Some(PickResult {
                    object: candidate.id,
                    distance,
                    point: ray.point_at(distance),
                });
            }
        }
        closest
    }

    /// World-space hit distance against a single candidate
    fn intersect_candidate(&self, ray: &Ray, candidate: &Candidate<'_>) -> Option<f32> {
        let inverse = candidate.world.inverse()?;
        let local = ray.to_local(&inverse);

        let entry = candidate.mesh.bounds.intersect_ray(&local)?;
        if entry > self.far {
            return None;
        }

        candidate
            .mesh
            .geometry
            .triangles()
            .filter_map(|[v0, v1, v2]| {
                let edge1 = v1 - v0;
                let edge2 = v2 - v0;
                let pvec = local.direction.cross(edge2);
                let det = edge1.dot(pvec);
                if det <= DET_EPSILON {
                    return None;
                }

                let inv_det = 1.0 / det;
                let tvec = local.origin - v0;
                let u = tvec.dot(pvec) * inv_det;
                if !(-BARY_EPSILON..=1.0 + BARY_EPSILON).contains(&u) {
                    return None;
                }

                let qvec = tvec.cross(edge1);
                let v = local.direction.dot(qvec) * inv_det;
                if v < -BARY_EPSILON || u + v > 1.0 + BARY_EPSILON {
                    return None;
                }

                // Local direction is unnormalized, so t is already a world distance
                let t = edge2.dot(qvec) * inv_det;
                (t >= self.near && t <= self.far).then_some(t)
            })
            .min_by(|a, b| a.total_cmp(b))
    }
}
