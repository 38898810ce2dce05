//! Ray-over highlight bookkeeping
//!
//! The tracker is the only writer of the highlight indicator. The set is
//! rebuilt every frame: [`HighlightTracker::clear`] switches every recorded
//! highlight off before the devices cast again.

use crate::gfx::resources::Indicator;
use crate::gfx::scene::object::ObjectId;
use crate::gfx::scene::pool::ShapePool;

#[derive(Debug, Default)]
pub struct HighlightTracker {
    highlighted: Vec<ObjectId>,
}

impl HighlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches off every recorded highlight and empties the set
    pub fn clear(&mut self, pool: &mut ShapePool) {
        for id in self.highlighted.drain(..) {
            if let Some(object) = pool.get_mut(id) {
                object.material.set_indicator(Indicator::Highlight, false);
            }
        }
    }

    /// Highlights an object; returns false if the object does not exist
    pub fn mark(&mut self, pool: &mut ShapePool, id: ObjectId) -> bool {
        let Some(object) = pool.get_mut(id) else {
            return false;
        };
        object.material.set_indicator(Indicator::Highlight, true);
        if !self.highlighted.contains(&id) {
            self.highlighted.push(id);
        }
        true
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.highlighted.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.highlighted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlighted.is_empty()
    }

    /// Highlighted objects in marking order
    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.highlighted.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::ShapeKind;
    use crate::gfx::resources::Material;
    use crate::gfx::scene::transform::Transform;

    fn pool_of(n: usize) -> ShapePool {
        let mut pool = ShapePool::new();
        for _ in 0..n {
            pool.insert(ShapeKind::Box, Transform::identity(), Material::default());
        }
        pool
    }

    fn highlight(pool: &ShapePool, id: usize) -> f32 {
        pool.get(ObjectId(id))
            .unwrap()
            .material
            .indicator(Indicator::Highlight)
    }

    #[test]
    fn test_mark_then_clear() {
        let mut pool = pool_of(3);
        let mut tracker = HighlightTracker::new();

        assert!(tracker.mark(&mut pool, ObjectId(1)));
        assert!(tracker.mark(&mut pool, ObjectId(2)));
        assert_eq!(highlight(&pool, 1), 1.0);
        assert_eq!(highlight(&pool, 0), 0.0);
        assert_eq!(tracker.len(), 2);

        tracker.clear(&mut pool);
        assert!(tracker.is_empty());
        for id in 0..3 {
            assert_eq!(highlight(&pool, id), 0.0);
        }
    }

    #[test]
    fn test_clear_twice_is_harmless() {
        let mut pool = pool_of(1);
        let mut tracker = HighlightTracker::new();
        tracker.mark(&mut pool, ObjectId(0));

        tracker.clear(&mut pool);
        assert!(tracker.is_empty());
        tracker.clear(&mut pool);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_mark_deduplicates() {
        let mut pool = pool_of(1);
        let mut tracker = HighlightTracker::new();
        tracker.mark(&mut pool, ObjectId(0));
        tracker.mark(&mut pool, ObjectId(0));

        assert_eq!(tracker.iter().collect::<Vec<_>>(), vec![ObjectId(0)]);
        assert!(!tracker.mark(&mut pool, ObjectId(5)));
    }

    #[test]
    fn test_clear_leaves_held_channel() {
        let mut pool = pool_of(1);
        let mut tracker = HighlightTracker::new();
        pool.get_mut(ObjectId(0))
            .unwrap()
            .material
            .set_indicator(Indicator::Held, true);

        tracker.mark(&mut pool, ObjectId(0));
        tracker.clear(&mut pool);

        let material = &pool.get(ObjectId(0)).unwrap().material;
        assert_eq!(material.indicator(Indicator::Held), 1.0);
        assert_eq!(material.indicator(Indicator::Highlight), 0.0);
    }
}
