//! Falling Objects and Object Pooling
//!
//! Objects move in one dimension (downward); the pool bounds allocation
//! under sustained high spawn rates by recycling deactivated objects
//! instead of freeing them. The pool is owned by the session and injected
//! where needed — never a process-wide singleton — so exhaustion and
//! growth are testable in isolation.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::geom::{Aabb, Vec2};
use crate::game::events::TapKind;
use crate::game::state::CardType;

// =============================================================================
// OBJECT TYPES
// =============================================================================

/// The four spawnable object kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum ObjectType {
    /// The wanted target; builds streak and score.
    Logo = 0,
    /// Streak breaker, life-neutral.
    Glitch = 1,
    /// Reveals a magic card when tapped.
    Gift = 2,
    /// Costs a life when tapped.
    Bomb = 3,
}

impl ObjectType {
    /// All object types, indexable by `ObjectType as usize`.
    pub const ALL: [ObjectType; 4] = [
        ObjectType::Logo,
        ObjectType::Glitch,
        ObjectType::Gift,
        ObjectType::Bomb,
    ];

    /// Tap resolution priority; lower wins when hitboxes overlap.
    ///
    /// gift > logo > glitch > bomb, so an overlapping punitive object can
    /// never steal a tap aimed at a wanted one. Fixed by contract.
    #[inline]
    pub fn tap_priority(self) -> u8 {
        match self {
            ObjectType::Gift => 0,
            ObjectType::Logo => 1,
            ObjectType::Glitch => 2,
            ObjectType::Bomb => 3,
        }
    }

    /// The tap-log kind a consumed object of this type records.
    pub fn tap_kind(self) -> TapKind {
        match self {
            ObjectType::Logo => TapKind::Logo,
            ObjectType::Glitch => TapKind::Glitch,
            ObjectType::Gift => TapKind::Gift,
            ObjectType::Bomb => TapKind::Bomb,
        }
    }

    /// Stable name used in object ids and logs.
    pub fn label(self) -> &'static str {
        match self {
            ObjectType::Logo => "logo",
            ObjectType::Glitch => "glitch",
            ObjectType::Gift => "gift",
            ObjectType::Bomb => "bomb",
        }
    }
}

// =============================================================================
// GAME OBJECT
// =============================================================================

/// One falling object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    /// Unique id within the session, e.g. `logo-17`.
    pub id: String,
    /// Object kind.
    pub object_type: ObjectType,
    /// Center position.
    pub position: Vec2,
    /// Velocity (px/s); only the y component is ever nonzero.
    pub velocity: Vec2,
    /// Hitbox side length.
    pub size: f64,
    /// Axis-aligned hitbox, kept in sync with position/size.
    pub hitbox: Aabb,
    /// Timestamp the object spawned (ms).
    pub spawn_time: u64,
    /// Live flag; inactive objects are pool residents.
    pub is_active: bool,
    /// The card a gift reveals; present only for gifts.
    pub card_type: Option<CardType>,
}

impl GameObject {
    fn blank(object_type: ObjectType) -> Self {
        Self {
            id: String::new(),
            object_type,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            size: 0.0,
            hitbox: Aabb::default(),
            spawn_time: 0,
            is_active: false,
            card_type: None,
        }
    }

    /// Re-initialize a pooled object for a fresh spawn.
    #[allow(clippy::too_many_arguments)]
    pub fn respawn(
        &mut self,
        id: String,
        position: Vec2,
        fall_speed: f64,
        size: f64,
        spawn_time: u64,
        card_type: Option<CardType>,
    ) {
        self.id = id;
        self.position = position;
        self.velocity = Vec2::new(0.0, fall_speed);
        self.size = size;
        self.spawn_time = spawn_time;
        self.is_active = true;
        self.card_type = card_type;
        self.sync_hitbox();
    }

    /// Mirror the hitbox onto the current position/size.
    #[inline]
    pub fn sync_hitbox(&mut self) {
        self.hitbox = Aabb::from_center_size(self.position, self.size, self.size);
    }
}

// =============================================================================
// OBJECT POOL
// =============================================================================

/// Free-list capacity preallocated per object type.
pub const POOL_INITIAL_CAPACITY: usize = 16;

/// Per-type free list of recycled objects.
///
/// Growth beyond the initial capacity is transparent (a tick must never
/// fail on exhaustion) but logged as a capacity-tuning signal.
#[derive(Clone, Debug)]
pub struct ObjectPool {
    free: [Vec<GameObject>; 4],
    created: [usize; 4],
    capacity: usize,
}

impl Default for ObjectPool {
    fn default() -> Self {
        Self::with_capacity(POOL_INITIAL_CAPACITY)
    }
}

impl ObjectPool {
    /// Create a pool with the given per-type capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            free: [
                Vec::with_capacity(capacity),
                Vec::with_capacity(capacity),
                Vec::with_capacity(capacity),
                Vec::with_capacity(capacity),
            ],
            created: [0; 4],
            capacity,
        }
    }

    /// Take an object of the given type, recycling if possible.
    pub fn acquire(&mut self, object_type: ObjectType) -> GameObject {
        let idx = object_type as usize;
        if let Some(obj) = self.free[idx].pop() {
            return obj;
        }

        self.created[idx] += 1;
        if self.created[idx] > self.capacity {
            warn!(
                object_type = object_type.label(),
                created = self.created[idx],
                capacity = self.capacity,
                "object pool grew beyond initial capacity"
            );
        }
        GameObject::blank(object_type)
    }

    /// Return a deactivated object to its free list.
    pub fn release(&mut self, mut obj: GameObject) {
        obj.is_active = false;
        obj.card_type = None;
        let idx = obj.object_type as usize;
        self.free[idx].push(obj);
    }

    /// Objects currently sitting in the free list for a type.
    pub fn free_count(&self, object_type: ObjectType) -> usize {
        self.free[object_type as usize].len()
    }

    /// Total objects ever created for a type (live + free).
    pub fn created_count(&self, object_type: ObjectType) -> usize {
        self.created[object_type as usize]
    }
}

// =============================================================================
// TESTS
// =============================================================================
