//=========================================================================
// Core Systems
//
// Everything that runs inside the frame callback, independent of the
// window system.
//
// Layers (bottom-up):
// - `fsm`: generic state machine shared by the mode and flight machines
// - `config`: content descriptors and world tuning
// - `input`, `platform_bridge`: key events in, sampled frame input out
// - `render`, `overlay`: collaborators the modes draw through
// - `animation`, `entities`, `picker`: per-mode simulation pieces
// - `apps`: Space and Planet modes and the manager switching them
// - `sim_loop`, `world`: frame scheduling and the per-frame driver
//
//=========================================================================

//=== Module Declarations =================================================

pub mod animation;
pub mod apps;
pub mod config;
pub mod entities;
pub mod fsm;
pub mod input;
pub mod overlay;
pub mod picker;
pub mod platform_bridge;
pub mod render;
pub mod sim_loop;
pub mod world;

//=== Public API ==========================================================

pub use apps::{AppKey, AppPayload, WorldAppManager, WorldServices};
pub use config::{ContentConfig, WorldSettings};
pub use sim_loop::{FrameControl, SimulationLoop};
pub use world::{World, WorldError};
