//! Object Physics and Tap Resolution
//!
//! One-dimensional motion (objects only fall), off-screen culling back
//! into the pool, and tap-to-object resolution with the fixed priority
//! order gift > logo > glitch > bomb.

use crate::core::geom::Vec2;
use crate::game::object::{GameObject, ObjectPool, ObjectType};

/// Integrate object motion over `dt_ms`.
///
/// `speed_multiplier` is the slow-motion factor (1.0 when inactive).
/// Delta-time based: two different frame cadences covering the same wall
/// time move objects by the same distance.
pub fn step_objects(objects: &mut [GameObject], dt_ms: f64, speed_multiplier: f64) {
    let dt_s = dt_ms / 1000.0;
    for obj in objects.iter_mut() {
        if !obj.is_active {
            continue;
        }
        obj.position = obj.position.add(obj.velocity.scale(speed_multiplier * dt_s));
        obj.sync_hitbox();
    }
}

/// Return objects that fell past the bottom edge to the pool.
///
/// An object is gone once its top edge clears the screen bottom. List
/// order of the survivors is preserved — tap resolution breaks priority
/// ties by list position, so order is part of determinism.
pub fn cull_offscreen(objects: &mut Vec<GameObject>, screen_height: f64, pool: &mut ObjectPool) {
    let mut i = 0;
    while i < objects.len() {
        if objects[i].position.y - objects[i].size / 2.0 > screen_height {
            let obj = objects.remove(i);
            pool.release(obj);
        } else {
            i += 1;
        }
    }
}

/// Resolve a tap point to the single object it consumes.
///
/// Collects every active object whose hitbox (scaled by the shrink-ray
/// factor) contains the point, then picks the highest-priority one:
/// gift > logo > glitch > bomb. Lower-priority overlapping objects stay
/// live. Ties within a type go to the earliest-spawned (list order).
/// Returns the index into `objects`, or None for a miss.
pub fn find_tapped_object(
    objects: &[GameObject],
    point: Vec2,
    size_multiplier: f64,
) -> Option<usize> {
    let mut best: Option<(usize, u8)> = None;

    for (idx, obj) in objects.iter().enumerate() {
        if !obj.is_active {
            continue;
        }
        if !obj.hitbox.scaled(size_multiplier).contains(point) {
            continue;
        }
        let priority = obj.object_type.tap_priority();
        // Strict < keeps the earliest object on priority ties
        if best.map_or(true, |(_, p)| priority < p) {
            best = Some((idx, priority));
        }
    }

    best.map(|(idx, _)| idx)
}

/// Count live glitches on screen (glitch-purge payload).
pub fn count_glitches(objects: &[GameObject]) -> u32 {
    objects
        .iter()
        .filter(|o| o.is_active && o.object_type == ObjectType::Glitch)
        .count() as u32
}

/// Remove every live glitch, returning them to the pool.
///
/// Returns how many were cleared.
pub fn purge_glitches(objects: &mut Vec<GameObject>, pool: &mut ObjectPool) -> u32 {
    let mut cleared = 0;
    let mut i = 0;
    while i < objects.len() {
        if objects[i].object_type == ObjectType::Glitch {
            let obj = objects.remove(i);
            pool.release(obj);
            cleared += 1;
        } else {
            i += 1;
        }
    }
    cleared
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(pool: &mut ObjectPool, ty: ObjectType, x: f64, y: f64, id: &str) -> GameObject {
        let mut obj = pool.acquire(ty);
        obj.respawn(id.to_string(), Vec2::new(x, y), 150.0, 64.0, 0, None);
        obj
    }

    #[test]
    fn test_step_objects_moves_down_only() {
        let mut pool = ObjectPool::default();
        let mut objects = vec![spawn(&mut pool, ObjectType::Logo, 100.0, 50.0, "logo-1")];

        step_objects(&mut objects, 1000.0, 1.0);

        assert_eq!(objects[0].position.x, 100.0);
        assert_eq!(objects[0].position.y, 200.0); // 150 px/s over 1s
        assert_eq!(objects[0].hitbox.center, objects[0].position);
    }

    #[test]
    fn test_step_objects_slow_motion() {
        let mut pool = ObjectPool::default();
        let mut objects = vec![spawn(&mut pool, ObjectType::Logo, 100.0, 0.0, "logo-1")];

        step_objects(&mut objects, 1000.0, 0.5);
        assert_eq!(objects[0].position.y, 75.0);
    }

    #[test]
    fn test_step_is_frame_rate_independent() {
        let mut pool = ObjectPool::default();
        let mut coarse = vec![spawn(&mut pool, ObjectType::Bomb, 10.0, 0.0, "bomb-1")];
        let mut fine = coarse.clone();

        const FRAMES: usize = 16;
        step_objects(&mut coarse, 1000.0, 1.0);
        for _ in 0..FRAMES {
            step_objects(&mut fine, 1000.0 / FRAMES as f64, 1.0);
        }

        assert!((coarse[0].position.y - fine[0].position.y).abs() < 1e-9);
    }

    #[test]
    fn test_cull_offscreen_returns_to_pool() {
        let mut pool = ObjectPool::default();
        let mut objects = vec![
            spawn(&mut pool, ObjectType::Logo, 100.0, 700.0, "logo-1"), // gone
            spawn(&mut pool, ObjectType::Bomb, 100.0, 300.0, "bomb-1"), // still visible
            spawn(&mut pool, ObjectType::Logo, 100.0, 650.0, "logo-2"), // gone
        ];

        cull_offscreen(&mut objects, 600.0, &mut pool);

        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].id, "bomb-1");
        assert_eq!(pool.free_count(ObjectType::Logo), 2);
    }

    #[test]
    fn test_cull_boundary_top_edge() {
        let mut pool = ObjectPool::default();
        // Top edge exactly at the bottom of the screen: still on screen
        let mut objects = vec![spawn(&mut pool, ObjectType::Logo, 100.0, 632.0, "logo-1")];
        cull_offscreen(&mut objects, 600.0, &mut pool);
        assert_eq!(objects.len(), 1);

        // One pixel further: culled
        objects[0].position.y = 633.0;
        cull_offscreen(&mut objects, 600.0, &mut pool);
        assert!(objects.is_empty());
    }

    #[test]
    fn test_tap_priority_gift_wins() {
        let mut pool = ObjectPool::default();
        // Three overlapping hitboxes all containing (100, 100)
        let objects = vec![
            spawn(&mut pool, ObjectType::Bomb, 100.0, 100.0, "bomb-1"),
            spawn(&mut pool, ObjectType::Logo, 110.0, 100.0, "logo-1"),
            spawn(&mut pool, ObjectType::Gift, 90.0, 100.0, "gift-1"),
        ];

        let idx = find_tapped_object(&objects, Vec2::new(100.0, 100.0), 1.0).unwrap();
        assert_eq!(objects[idx].id, "gift-1");

        // Only the gift is consumed; bomb and logo remain untouched
        assert!(objects[0].is_active);
        assert!(objects[1].is_active);
    }

    #[test]
    fn test_tap_priority_logo_over_glitch_and_bomb() {
        let mut pool = ObjectPool::default();
        let objects = vec![
            spawn(&mut pool, ObjectType::Glitch, 100.0, 100.0, "glitch-1"),
            spawn(&mut pool, ObjectType::Bomb, 100.0, 100.0, "bomb-1"),
            spawn(&mut pool, ObjectType::Logo, 100.0, 100.0, "logo-1"),
        ];

        let idx = find_tapped_object(&objects, Vec2::new(100.0, 100.0), 1.0).unwrap();
        assert_eq!(objects[idx].id, "logo-1");
    }

    #[test]
    fn test_tap_same_type_tie_goes_to_earliest() {
        let mut pool = ObjectPool::default();
        let objects = vec![
            spawn(&mut pool, ObjectType::Logo, 100.0, 100.0, "logo-1"),
            spawn(&mut pool, ObjectType::Logo, 100.0, 100.0, "logo-2"),
        ];

        let idx = find_tapped_object(&objects, Vec2::new(100.0, 100.0), 1.0).unwrap();
        assert_eq!(objects[idx].id, "logo-1");
    }

    #[test]
    fn test_tap_miss() {
        let mut pool = ObjectPool::default();
        let objects = vec![spawn(&mut pool, ObjectType::Logo, 100.0, 100.0, "logo-1")];

        assert!(find_tapped_object(&objects, Vec2::new(500.0, 500.0), 1.0).is_none());
        assert!(find_tapped_object(&[], Vec2::new(100.0, 100.0), 1.0).is_none());
    }

    #[test]
    fn test_shrink_ray_narrows_hitbox() {
        let mut pool = ObjectPool::default();
        let objects = vec![spawn(&mut pool, ObjectType::Logo, 100.0, 100.0, "logo-1")];

        // Near-edge point: inside at full size, outside at half size
        let edge = Vec2::new(128.0, 100.0);
        assert!(find_tapped_object(&objects, edge, 1.0).is_some());
        assert!(find_tapped_object(&objects, edge, 0.5).is_none());

        // Center still tappable at half size
        assert!(find_tapped_object(&objects, Vec2::new(100.0, 100.0), 0.5).is_some());
    }

    #[test]
    fn test_purge_glitches() {
        let mut pool = ObjectPool::default();
        let mut objects = vec![
            spawn(&mut pool, ObjectType::Glitch, 50.0, 50.0, "glitch-1"),
            spawn(&mut pool, ObjectType::Logo, 100.0, 100.0, "logo-1"),
            spawn(&mut pool, ObjectType::Glitch, 150.0, 150.0, "glitch-2"),
        ];

        assert_eq!(count_glitches(&objects), 2);
        let cleared = purge_glitches(&mut objects, &mut pool);

        assert_eq!(cleared, 2);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].id, "logo-1");
        assert_eq!(pool.free_count(ObjectType::Glitch), 2);
    }
}
