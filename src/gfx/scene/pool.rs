//! # Shape Pool
//!
//! Owns every pickable object for the session, plus one shared mesh per
//! shape kind. Objects are created at startup and never removed; the only
//! thing that changes about them afterwards is their owner, their local
//! transform (on reparent) and their material indicators.

use std::collections::HashMap;
use std::f32::consts::TAU;

use cgmath::Vector3;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SceneConfig;
use crate::error::{GrabError, Result};
use crate::gfx::geometry::{GeometryData, ShapeKind};
use crate::gfx::picking::{Aabb, Candidate};
use crate::gfx::resources::Material;
use crate::gfx::scene::object::{ObjectId, Owner, PickableObject};
use crate::gfx::scene::transform::Transform;
use crate::input::DeviceId;

/// Geometry shared by all objects of one kind, with its local bounds
#[derive(Debug, Clone)]
pub struct ShapeMesh {
    pub geometry: GeometryData,
    pub bounds: Aabb,
}

impl ShapeMesh {
    pub fn new(geometry: GeometryData) -> Self {
        let bounds = Aabb::from_vertices(&geometry.vertices);
        Self { geometry, bounds }
    }
}

/// Number of objects per owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OwnerCounts {
    pub pool: usize,
    /// Indexed by [`DeviceId::index`]
    pub devices: [usize; 2],
}

impl OwnerCounts {
    pub fn total(&self) -> usize {
        self.pool + self.devices.iter().sum::<usize>()
    }
}

/// The set of pickable objects
#[derive(Debug, Default)]
pub struct ShapePool {
    objects: Vec<PickableObject>,
    meshes: HashMap<ShapeKind, ShapeMesh>,
}

impl ShapePool {
    /// Empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool populated from configuration, seeded for reproducibility
    pub fn from_config(config: &SceneConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random::<u64>);
        info!(
            "Generating {} shapes (seed {}; set [scene] seed to reproduce)",
            config.shape_count, seed
        );
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(config, &mut rng)
    }

    /// Fills a new pool with randomly placed shapes.
    ///
    /// Fails with [`GrabError::InvalidConfig`] if the volume or scale range
    /// is empty, inverted or non-finite.
    pub fn generate<R: Rng>(config: &SceneConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let mut pool = Self::new();
        let [scale_min, scale_max] = config.scale_range;

        for _ in 0..config.shape_count {
            let kind = ShapeKind::ALL[rng.random_range(0..ShapeKind::ALL.len())];

            let position = Vector3::new(
                rng.random_range(config.volume_min[0]..config.volume_max[0]),
                rng.random_range(config.volume_min[1]..config.volume_max[1]),
                rng.random_range(config.volume_min[2]..config.volume_max[2]),
            );
            let rotation = Transform::rotation_from_euler_xyz(
                rng.random_range(0.0..TAU),
                rng.random_range(0.0..TAU),
                rng.random_range(0.0..TAU),
            );
            let scale = rng.random_range(scale_min..scale_max);

            let material = Material::default().with_color(
                rng.random::<f32>(),
                rng.random::<f32>(),
                rng.random::<f32>(),
            );

            pool.insert(kind, Transform::new(position, rotation, scale), material);
        }

        debug!("Shape pool ready with {} objects", pool.len());
        Ok(pool)
    }

    /// Adds one pool-owned object with the given world transform
    pub fn insert(&mut self, kind: ShapeKind, transform: Transform, material: Material) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.meshes
            .entry(kind)
            .or_insert_with(|| ShapeMesh::new(kind.geometry()));
        self.objects.push(PickableObject {
            id,
            name: format!("{} {}", kind.name(), id.0),
            kind,
            local: transform,
            material,
            owner: Owner::Pool,
        });
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&PickableObject> {
        self.objects.get(id.0)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut PickableObject> {
        self.objects.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All objects in insertion order, whatever their owner
    pub fn iter(&self) -> impl Iterator<Item = &PickableObject> {
        self.objects.iter()
    }

    /// Objects currently owned by the pool, in insertion order
    pub fn pool_members(&self) -> impl Iterator<Item = &PickableObject> {
        self.objects.iter().filter(|object| object.in_pool())
    }

    /// Ray-cast candidates: pool members only, so held objects never qualify
    pub fn pool_candidates(&self) -> impl Iterator<Item = Candidate<'_>> {
        self.pool_members().filter_map(|object| {
            let mesh = self.meshes.get(&object.kind)?;
            Some(Candidate {
                id: object.id,
                world: object.local,
                mesh,
            })
        })
    }

    /// Shared mesh for a shape kind, if any object of that kind exists
    pub fn mesh(&self, kind: ShapeKind) -> Option<&ShapeMesh> {
        self.meshes.get(&kind)
    }

    /// Every mesh kind in use
    pub fn meshes(&self) -> impl Iterator<Item = (ShapeKind, &ShapeMesh)> {
        self.meshes.iter().map(|(kind, mesh)| (*kind, mesh))
    }

    /// Owner frame in world space
    fn frame(owner: Owner, device_poses: &[Transform; 2]) -> Transform {
        match owner {
            Owner::Pool => Transform::identity(),
            Owner::Device(device) => device_poses[device.index()],
        }
    }

    /// World transform of an object given the current device poses
    pub fn world_transform(&self, id: ObjectId, device_poses: &[Transform; 2]) -> Option<Transform> {
        let object = self.get(id)?;
        Some(Self::frame(object.owner, device_poses).concat(&object.local))
    }

    /// Moves an object to a new owner without changing its world transform.
    ///
    /// The new local transform is `frame(new)^-1 * frame(old) * local`. On
    /// error the object is left untouched.
    pub fn reparent(&mut self, id: ObjectId, to: Owner, device_poses: &[Transform; 2]) -> Result<()> {
        let world = self
            .world_transform(id, device_poses)
            .ok_or(GrabError::UnknownObject(id))?;
        let to_frame = Self::frame(to, device_poses)
            .inverse()
            .ok_or(GrabError::DegenerateFrame(id, to))?;

        let object = self.get_mut(id).ok_or(GrabError::UnknownObject(id))?;
        object.local = to_frame.concat(&world);
        object.owner = to;
        Ok(())
    }

    /// Tally of objects per owner; always sums to [`ShapePool::len`]
    pub fn owner_counts(&self) -> OwnerCounts {
        let mut counts = OwnerCounts::default();
        for object in &self.objects {
            match object.owner {
                Owner::Pool => counts.pool += 1,
                Owner::Device(device) => counts.devices[device.index()] += 1,
            }
        }
        counts
    }

    /// Objects held by a device
    pub fn held_by(&self, device: DeviceId) -> impl Iterator<Item = &PickableObject> {
        self.objects
            .iter()
            .filter(move |object| object.owner == Owner::Device(device))
    }
}
