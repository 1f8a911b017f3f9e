//=========================================================================
// Animation Mixer
//=========================================================================
//
// Per-model clip playback with linear cross-fades.
//
// Architecture:
//   AnimationMixer
//     └─ actions: HashMap<clip, Action { weight, time, playing, fade }>
//
// Fades never block: `cross_fade` only records a target, and every
// `update(dt)` moves weights a step closer to it. The resulting weights
// are pushed to the renderer each frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{trace, warn};

//=== ClipWeight ==========================================================

/// Snapshot of one clip's playback state, as handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipWeight {
    pub clip: String,
    pub weight: f32,
    pub time: f32,
}

//=== Action ==============================================================

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Action {
    weight: f32,
    time: f32,
    playing: bool,
    fade: Option<Fade>,
}

impl Action {
    fn start_fade(&mut self, to: f32, duration: f32) {
        if duration <= 0.0 {
            self.weight = to;
            self.fade = None;
            self.playing = to > 0.0;
            return;
        }
        self.fade = Some(Fade {
            from: self.weight,
            to,
            elapsed: 0.0,
            duration,
        });
    }

    fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        self.time += dt;

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed = (fade.elapsed + dt).min(fade.duration);
            let t = fade.elapsed / fade.duration;
            self.weight = fade.from + (fade.to - fade.from) * t;

            if fade.elapsed >= fade.duration {
                let target = fade.to;
                self.fade = None;
                if target <= 0.0 {
                    self.playing = false;
                }
            }
        }
    }
}

//=== AnimationMixer ======================================================

/// Owns one action per clip of a loaded model.
#[derive(Debug, Clone, Default)]
pub struct AnimationMixer {
    actions: HashMap<String, Action>,
}

impl AnimationMixer {
    /// Builds a mixer with one stopped action for each clip name.
    pub fn from_clips<I, S>(clips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let actions = clips
            .into_iter()
            .map(|clip| (clip.into(), Action::default()))
            .collect();
        Self { actions }
    }

    pub fn has_clip(&self, clip: &str) -> bool {
        self.actions.contains_key(clip)
    }

    pub fn is_playing(&self, clip: &str) -> bool {
        self.actions.get(clip).is_some_and(|action| action.playing)
    }

    pub fn weight(&self, clip: &str) -> f32 {
        self.actions.get(clip).map_or(0.0, |action| action.weight)
    }

    //--- Playback ---------------------------------------------------------

    /// Starts `clip` at full weight from its beginning.
    ///
    /// Returns `false` if the clip is unknown.
    pub fn play(&mut self, clip: &str) -> bool {
        let Some(action) = self.actions.get_mut(clip) else {
            warn!("Cannot play unknown clip {:?}", clip);
            return false;
        };
        *action = Action {
            weight: 1.0,
            time: 0.0,
            playing: true,
            fade: None,
        };
        true
    }

    /// Blends from `from` into `to` over `duration` seconds.
    ///
    /// `to` restarts from time zero and fades in; `from` fades out and stops
    /// once its weight reaches zero. Returns `false` if `to` is unknown.
    pub fn cross_fade(&mut self, from: &str, to: &str, duration: f32) -> bool {
        if !self.has_clip(to) {
            warn!("Cannot fade into unknown clip {:?}", to);
            return false;
        }

        if let Some(outgoing) = self.actions.get_mut(from) {
            if from != to {
                outgoing.start_fade(0.0, duration);
            }
        }

        if let Some(incoming) = self.actions.get_mut(to) {
            incoming.time = 0.0;
            incoming.playing = true;
            if from == to {
                incoming.weight = 1.0;
                incoming.fade = None;
            } else {
                incoming.start_fade(1.0, duration);
            }
        }

        trace!("Cross-fading {:?} -> {:?} over {}s", from, to, duration);
        true
    }

    /// Advances every playing action.
    pub fn update(&mut self, dt: f32) {
        for action in self.actions.values_mut() {
            action.advance(dt);
        }
    }

    /// Weights of every playing clip, sorted by clip name.
    pub fn weights(&self) -> Vec<ClipWeight> {
        let mut weights: Vec<ClipWeight> = self
            .actions
            .iter()
            .filter(|(_, action)| action.playing)
            .map(|(clip, action)| ClipWeight {
                clip: clip.clone(),
                weight: action.weight,
                time: action.time,
            })
            .collect();
        weights.sort_by(|a, b| a.clip.cmp(&b.clip));
        weights
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn mixer() -> AnimationMixer {
        AnimationMixer::from_clips(["idle", "fly"])
    }

    #[test]
    fn play_starts_clip_at_full_weight() {
        let mut mixer = mixer();

        assert!(mixer.play("idle"));

        assert!(mixer.is_playing("idle"));
        assert_eq!(mixer.weight("idle"), 1.0);
        assert!(!mixer.is_playing("fly"));
    }

    #[test]
    fn unknown_clip_is_rejected() {
        let mut mixer = mixer();

        assert!(!mixer.play("dance"));
        assert!(!mixer.cross_fade("idle", "dance", 0.5));
    }

    #[test]
    fn cross_fade_blends_linearly() {
        let mut mixer = mixer();
        mixer.play("idle");
        mixer.cross_fade("idle", "fly", 0.5);

        mixer.update(0.25);

        assert!((mixer.weight("idle") - 0.5).abs() < EPSILON);
        assert!((mixer.weight("fly") - 0.5).abs() < EPSILON);
    }

    #[test]
    fn faded_out_clip_stops() {
        let mut mixer = mixer();
        mixer.play("idle");
        mixer.cross_fade("idle", "fly", 0.5);

        mixer.update(0.3);
        mixer.update(0.3);

        assert!(!mixer.is_playing("idle"));
        assert_eq!(mixer.weight("fly"), 1.0);

        let weights = mixer.weights();
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[0].clip, "fly");
    }

    #[test]
    fn cross_fade_restarts_incoming_clip() {
        let mut mixer = mixer();
        mixer.play("fly");
        mixer.update(2.0);

        mixer.cross_fade("idle", "fly", 0.5);

        let fly = mixer.weights().into_iter().find(|w| w.clip == "fly").unwrap();
        assert_eq!(fly.time, 0.0);
    }

    #[test]
    fn weights_are_sorted_by_clip() {
        let mut mixer = mixer();
        mixer.play("idle");
        mixer.play("fly");

        let clips: Vec<_> = mixer.weights().into_iter().map(|w| w.clip).collect();
        assert_eq!(clips, vec!["fly", "idle"]);
    }
}
