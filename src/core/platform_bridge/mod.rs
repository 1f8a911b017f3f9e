//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit) with the world.
//
// This module defines the contract between the host and core logic so the
// world can be driven by the real window or by a test harness alike.
//
// Components:
// - `interface`: Event types and error definitions (the contract)
// - `event_collector`: Core-side event collection
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event_collector;
pub mod interface;

//=== Public API ==========================================================

pub use event_collector::{EventCollector, TickControl};
pub use interface::{PlatformError, PlatformEvent};
