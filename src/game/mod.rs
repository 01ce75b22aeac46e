//! Game Module
//!
//! The platformer itself, on top of the engine layer:
//! - Input: key mapping and held-direction tracking
//! - Session: score, game over / restart, coins, camera follow
//! - Render: world pass plus HUD pass

mod input;
mod render;
mod session;

pub use input::GameKey;
pub use render::{draw_session, Textures};
pub use session::GameSession;
