//=========================================================================
// Overlay Collaborator
//=========================================================================
//
// Host UI surface: hints, the "looked at" title and the content panel.
//
// The world only ever tells the overlay what to show; layout and styling
// are the host's business.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::config::PlanetContent;

//=== Overlay =============================================================

pub trait Overlay {
    /// Shows or hides the movement/activate hint of space mode.
    fn set_controls_hint(&mut self, visible: bool);

    /// Title of the body currently looked at, or `None`.
    fn set_looked_at(&mut self, title: Option<&str>);

    fn show_content(&mut self, content: &PlanetContent);

    fn hide_content(&mut self);

    /// Shows or hides the "back to space" hint of landed mode.
    fn set_back_hint(&mut self, visible: bool);
}

//=== LogOverlay ==========================================================

/// Overlay that reports to the log. Only changes are logged.
#[derive(Debug, Default)]
pub struct LogOverlay {
    controls_hint: bool,
    back_hint: bool,
    looked_at: Option<String>,
    content: Option<String>,
}

impl LogOverlay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Overlay for LogOverlay {
    fn set_controls_hint(&mut self, visible: bool) {
        if self.controls_hint != visible {
            self.controls_hint = visible;
            info!(
                "Controls hint {}",
                if visible { "shown: W/S thrust, A/D turn, E land" } else { "hidden" }
            );
        }
    }

    fn set_looked_at(&mut self, title: Option<&str>) {
        if self.looked_at.as_deref() == title {
            return;
        }
        self.looked_at = title.map(str::to_string);
        match title {
            Some(title) => info!("Looking at {}", title),
            None => info!("Looking at nothing"),
        }
    }

    fn show_content(&mut self, content: &PlanetContent) {
        info!(
            "Showing {} ({} sections)",
            content.title,
            content.sections.len()
        );
        for section in &content.sections {
            info!("  {}: {}", section.section_title, section.description);
            for item in &section.items {
                info!("    - {}", item);
            }
        }
        self.content = Some(content.title.clone());
    }

    fn hide_content(&mut self) {
        if let Some(title) = self.content.take() {
            info!("Hiding {}", title);
        }
    }

    fn set_back_hint(&mut self, visible: bool) {
        if self.back_hint != visible {
            self.back_hint = visible;
            info!("Back hint {}", if visible { "shown: Escape" } else { "hidden" });
        }
    }
}

//=========================================================================
// Test Support
//=========================================================================

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// One overlay call, as observed by tests.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum OverlayCall {
        ControlsHint(bool),
        LookedAt(Option<String>),
        ShowContent(String),
        HideContent,
        BackHint(bool),
    }

    /// Overlay that records every call into a shared log.
    #[derive(Debug, Default, Clone)]
    pub(crate) struct RecordingOverlay {
        pub(crate) calls: Rc<RefCell<Vec<OverlayCall>>>,
    }

    impl Overlay for RecordingOverlay {
        fn set_controls_hint(&mut self, visible: bool) {
            self.calls.borrow_mut().push(OverlayCall::ControlsHint(visible));
        }

        fn set_looked_at(&mut self, title: Option<&str>) {
            self.calls
                .borrow_mut()
                .push(OverlayCall::LookedAt(title.map(str::to_string)));
        }

        fn show_content(&mut self, content: &PlanetContent) {
            self.calls
                .borrow_mut()
                .push(OverlayCall::ShowContent(content.title.clone()));
        }

        fn hide_content(&mut self) {
            self.calls.borrow_mut().push(OverlayCall::HideContent);
        }

        fn set_back_hint(&mut self, visible: bool) {
            self.calls.borrow_mut().push(OverlayCall::BackHint(visible));
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TextureRef;

    #[test]
    fn log_overlay_tracks_current_state() {
        let mut overlay = LogOverlay::new();

        overlay.set_looked_at(Some("Projects"));
        overlay.set_looked_at(Some("Projects"));
        assert_eq!(overlay.looked_at.as_deref(), Some("Projects"));

        overlay.show_content(&PlanetContent {
            title: "Projects".into(),
            texture: TextureRef::new("t"),
            sections: vec![],
        });
        assert_eq!(overlay.content.as_deref(), Some("Projects"));

        overlay.hide_content();
        overlay.hide_content();
        assert!(overlay.content.is_none());
    }
}
