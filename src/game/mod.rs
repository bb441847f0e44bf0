//! Game simulation: state machine, scoring, physics, spawning and the
//! session orchestrator that ties them together.

pub mod events;
pub mod object;
pub mod physics;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod spawn;
pub mod state;

pub use events::{ActionBatcher, TapEvent, TapKind, TapResult};
pub use object::{GameObject, ObjectPool, ObjectType};
pub use rng::GameRng;
pub use session::{GameSession, SessionError, SessionExport, SessionPhase};
pub use spawn::{SpawnConfig, SpawnManager};
pub use state::{ActiveEffect, CardType, Difficulty, GameState};
