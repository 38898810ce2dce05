//! Per-frame orchestration
//!
//! One [`FrameDriver::tick`] per displayed frame:
//!
//! 1. sample both device poses from the pointer source
//! 2. apply pending press/release events in arrival order
//! 3. clear last frame's highlights
//! 4. cast from each idle, tracked device (device 0 first) and highlight the hit
//! 5. hand a [`SceneView`] to the renderer

use log::{debug, info, trace};

use super::attachment::{DeviceState, EventOutcome};
use super::highlight::HighlightTracker;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::gfx::picking::RayCaster;
use crate::gfx::rendering::frame::{DeviceView, FrameRenderer, ObjectView, SceneView};
use crate::gfx::scene::pool::ShapePool;
use crate::gfx::scene::transform::Transform;
use crate::input::{DeviceId, PointerEvent, PointerEventKind, PointerSource};

/// Summary of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    /// Objects highlighted this frame
    pub highlighted: usize,
    /// Objects held by either device
    pub held: usize,
}

pub struct FrameDriver {
    pool: ShapePool,
    highlights: HighlightTracker,
    devices: [DeviceState; 2],
    caster: RayCaster,
    default_ray_length: f32,
    frame: u64,
}

impl FrameDriver {
    pub fn new(pool: ShapePool, default_ray_length: f32) -> Self {
        Self {
            pool,
            highlights: HighlightTracker::new(),
            devices: DeviceId::ALL.map(|id| DeviceState::new(id, default_ray_length)),
            caster: RayCaster::default(),
            default_ray_length,
            frame: 0,
        }
    }

    /// Generates the shape pool described by the configuration.
    ///
    /// The configuration is validated first, so a hand-built config with an
    /// empty volume or a non-positive ray length is reported, not sampled.
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        let pool = ShapePool::from_config(&config.scene)?;
        info!(
            "Session ready: {} shapes, default ray length {}",
            pool.len(),
            config.interaction.default_ray_length
        );
        Ok(Self::new(pool, config.interaction.default_ray_length))
    }

    pub fn pool(&self) -> &ShapePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut ShapePool {
        &mut self.pool
    }

    pub fn highlights(&self) -> &HighlightTracker {
        &self.highlights
    }

    pub fn device(&self, id: DeviceId) -> &DeviceState {
        &self.devices[id.index()]
    }

    pub fn devices(&self) -> &[DeviceState; 2] {
        &self.devices
    }

    pub fn default_ray_length(&self) -> f32 {
        self.default_ray_length
    }

    /// Number of completed ticks
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Last valid pose of each device, indexed by [`DeviceId::index`]
    pub fn device_poses(&self) -> [Transform; 2] {
        self.devices.map(|device| device.pose)
    }

    /// Samples both device poses
    pub fn sync_poses<P: PointerSource + ?Sized>(&mut self, pointers: &P) {
        for device in &mut self.devices {
            device.update_pose(pointers.device_pose(device.id));
        }
    }

    /// Applies one press or release to the device's state machine
    pub fn handle_event(&mut self, event: PointerEvent) -> Result<EventOutcome> {
        let poses = self.device_poses();
        let device = &mut self.devices[event.device.index()];
        match event.kind {
            PointerEventKind::Press => device.press(&mut self.pool, &self.caster, &poses),
            PointerEventKind::Release => device.release(&mut self.pool, &poses),
        }
    }

    /// Rebuilds the highlight set and ray lengths from the current poses
    pub fn update_highlights(&mut self) {
        self.highlights.clear(&mut self.pool);

        for device in &mut self.devices {
            if !device.is_idle() {
                continue;
            }
            let Some(ray) = device.ray() else {
                continue;
            };

            match self.caster.intersect(&ray, self.pool.pool_candidates()) {
                Some(hit) => {
                    self.highlights.mark(&mut self.pool, hit.object);
                    device.ray_length = hit.distance;
                }
                None => device.ray_length = self.default_ray_length,
            }
        }
    }

    /// Runs one full frame
    pub fn tick<P, R>(&mut self, pointers: &mut P, renderer: &mut R) -> Result<FrameStats>
    where
        P: PointerSource + ?Sized,
        R: FrameRenderer + ?Sized,
    {
        self.frame += 1;
        self.sync_poses(pointers);

        while let Some(event) = pointers.poll_event() {
            match self.handle_event(event) {
                Ok(outcome) => trace!("{:?} -> {:?}", event, outcome),
                Err(e) => debug!("{:?} absorbed: {}", event, e),
            }
        }

        self.update_highlights();
        renderer.render_frame(&self.view())?;

        let counts = self.pool.owner_counts();
        let stats = FrameStats {
            frame: self.frame,
            highlighted: self.highlights.len(),
            held: counts.total() - counts.pool,
        };
        trace!("{:?}", stats);
        Ok(stats)
    }

    /// Snapshot of the scene for rendering
    pub fn view(&self) -> SceneView<'_> {
        let poses = self.device_poses();
        let objects = self
            .pool
            .iter()
            .filter_map(|object| {
                Some(ObjectView {
                    id: object.id,
                    kind: object.kind,
                    world: self.pool.world_transform(object.id, &poses)?,
                    material: &object.material,
                    owner: object.owner,
                })
            })
            .collect();

        SceneView {
            frame: self.frame,
            objects,
            devices: self.devices.map(|device| DeviceView {
                id: device.id,
                pose: device.pose,
                tracked: device.tracked,
                ray_length: device.ray_length,
                holding: device.held(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrabError;
    use crate::gfx::geometry::ShapeKind;
    use crate::gfx::rendering::frame::NullRenderer;
    use crate::gfx::resources::{Indicator, Material};
    use crate::input::ScriptedPointers;
    use cgmath::Vector3;

    fn driver_with_box() -> FrameDriver {
        let mut pool = ShapePool::new();
        pool.insert(
            ShapeKind::Box,
            Transform::from_position(Vector3::new(0.0, 1.6, 1.0)),
            Material::default(),
        );
        FrameDriver::new(pool, 5.0)
    }

    fn eye() -> Transform {
        Transform::from_position(Vector3::new(0.0, 1.6, 3.0))
    }

    #[test]
    fn test_from_config_reports_invalid_config() {
        let inverted = SessionConfig::default()
            .with_volume([1.0, 0.0, 0.0], [0.0, 1.0, 1.0])
            .with_seed(1);
        assert!(matches!(
            FrameDriver::from_config(&inverted),
            Err(GrabError::InvalidConfig(_))
        ));

        let no_ray = SessionConfig::default().with_default_ray_length(0.0);
        assert!(matches!(
            FrameDriver::from_config(&no_ray),
            Err(GrabError::InvalidConfig(_))
        ));

        let driver = FrameDriver::from_config(&SessionConfig::default().with_seed(1)).unwrap();
        assert_eq!(driver.pool().len(), 50);
    }

    #[test]
    fn test_tick_counts_frames_and_renders() {
        let mut driver = driver_with_box();
        let mut pointers = ScriptedPointers::new();
        let mut renderer = NullRenderer::default();

        let stats = driver.tick(&mut pointers, &mut renderer).unwrap();
        assert_eq!(stats.frame, 1);
        assert_eq!(stats.highlighted, 0);
        assert_eq!(renderer.frames, 1);
        assert_eq!(driver.frame_count(), 1);
    }

    #[test]
    fn test_untracked_device_keeps_ray_length() {
        let mut driver = driver_with_box();
        let mut pointers = ScriptedPointers::new();
        let mut renderer = NullRenderer::default();

        pointers.set_pose(DeviceId::Left, Some(eye()));
        driver.tick(&mut pointers, &mut renderer).unwrap();
        assert!((driver.device(DeviceId::Left).ray_length - 1.9).abs() < 1e-4);

        pointers.set_pose(DeviceId::Left, None);
        let stats = driver.tick(&mut pointers, &mut renderer).unwrap();
        assert_eq!(stats.highlighted, 0);
        assert!((driver.device(DeviceId::Left).ray_length - 1.9).abs() < 1e-4);
        assert!(!driver.device(DeviceId::Left).tracked);
    }

    #[test]
    fn test_events_apply_before_highlight() {
        let mut driver = driver_with_box();
        let mut pointers = ScriptedPointers::new();
        let mut renderer = NullRenderer::default();

        pointers.set_pose(DeviceId::Left, Some(eye()));
        pointers.press(DeviceId::Left);
        let stats = driver.tick(&mut pointers, &mut renderer).unwrap();

        // Grabbed in the same frame, so nothing is left to highlight
        assert_eq!(stats.held, 1);
        assert_eq!(stats.highlighted, 0);
        let material = &driver.pool().iter().next().unwrap().material;
        assert_eq!(material.indicator(Indicator::Held), 1.0);
        assert_eq!(material.indicator(Indicator::Highlight), 0.0);
    }

    #[test]
    fn test_view_reports_world_transforms() {
        let mut driver = driver_with_box();
        let mut pointers = ScriptedPointers::new();
        let mut renderer = NullRenderer::default();

        pointers.set_pose(DeviceId::Right, Some(eye()));
        pointers.press(DeviceId::Right);
        driver.tick(&mut pointers, &mut renderer).unwrap();

        let view = driver.view();
        assert_eq!(view.objects.len(), 1);
        assert_eq!(view.objects[0].world.position, Vector3::new(0.0, 1.6, 1.0));
        assert_eq!(view.devices[1].holding, Some(view.objects[0].id));
        assert!(view.devices[1].tracked);
        assert!(!view.devices[0].tracked);
    }
}
