//=========================================================================
// Stellar Folio Library Root
//
// A navigable solar-system portfolio: fly a ship between orbiting bodies,
// look at one, and land on it to read its content.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose `core` for embedding the world under another host or renderer
// - Keep the winit integration (`platform`) private
//
// Typical usage:
// ```no_run
// use std::path::Path;
// use stellar_folio::EngineBuilder;
// use stellar_folio::core::config::ContentConfig;
//
// let content = ContentConfig::load(Path::new("content.json"))?;
// EngineBuilder::new().build(content)?.run()?;
// # Ok::<(), Box<dyn std::error::Error>>(())
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the state machines, modes, entities and collaborator
// traits. It runs without a window, which is how it is tested.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the window and the event loop and is not part of the
// public API surface.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError};
