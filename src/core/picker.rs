//=========================================================================
// Interaction Picker
//=========================================================================
//
// Resolves which registered body the viewer is looking at.
//
// Architecture:
//   Ray (centre of view) → SceneRenderer::pick() → RenderHandle
//                        → registry → PickResult { body, label }
//
// A miss, or a hit on anything not registered (the sun, labels, the ship),
// yields no pick result. Results are recomputed every frame and never
// stored here.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::entities::BodyId;
use crate::core::render::{Ray, RenderHandle, SceneRenderer};

//=== PickResult ==========================================================

/// The body under the gaze ray this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickResult {
    pub body: BodyId,
    pub handle: RenderHandle,
    pub label: String,
}

//=== InteractionPicker ===================================================

#[derive(Debug, Default)]
pub struct InteractionPicker {
    registry: HashMap<RenderHandle, (BodyId, String)>,
}

impl InteractionPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` as the renderable of `body`.
    ///
    /// Returns `false` and keeps the existing entry if `handle` is already
    /// registered.
    pub fn register(&mut self, handle: RenderHandle, body: BodyId, label: impl Into<String>) -> bool {
        if self.registry.contains_key(&handle) {
            warn!("Render handle {:?} already registered, ignoring", handle);
            return false;
        }
        self.registry.insert(handle, (body, label.into()));
        true
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn clear(&mut self) {
        self.registry.clear();
    }

    /// Body hit by `ray`, if the nearest hit is a registered body.
    pub fn pick(&self, scene: &dyn SceneRenderer, ray: &Ray) -> Option<PickResult> {
        let handle = scene.pick(ray)?;
        match self.registry.get(&handle) {
            Some((body, label)) => Some(PickResult {
                body: *body,
                handle,
                label: label.clone(),
            }),
            None => {
                trace!("Gaze hit unregistered renderable {:?}", handle);
                None
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
