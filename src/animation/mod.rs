//! Animation clips and the mixers that play them.
//!
//! Only playback time is tracked here. Sampling keyframes and applying them
//! to transforms is left to whatever renders the scene.

use log::debug;
use serde::Serialize;

use crate::gfx::scene::ObjectId;

/// A named animation with its length in seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
        }
    }
}

/// Playback state of one clip inside a mixer
#[derive(Debug, Clone, PartialEq)]
pub struct ClipAction {
    clip: AnimationClip,
    time: f32,
    playing: bool,
}

impl ClipAction {
    fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            time: 0.0,
            playing: false,
        }
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Current position inside the clip, in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.time = 0.0;
    }

    fn advance(&mut self, delta: f32) {
        if !self.playing {
            return;
        }
        if self.clip.duration > 0.0 {
            self.time = (self.time + delta) % self.clip.duration;
        }
    }
}

/// Drives the clips of one loaded asset.
///
/// Clips loop forever once started.
#[derive(Debug, Clone)]
pub struct AnimationMixer {
    targets: Vec<ObjectId>,
    actions: Vec<ClipAction>,
}

impl AnimationMixer {
    /// Creates a mixer for the objects one asset produced
    pub fn new(targets: Vec<ObjectId>) -> Self {
        Self {
            targets,
            actions: Vec::new(),
        }
    }

    /// Adds every clip and starts it
    pub fn play_all(&mut self, clips: &[AnimationClip]) {
        for clip in clips {
            debug!("playing clip '{}' ({:.2}s)", clip.name, clip.duration);
            let mut action = ClipAction::new(clip.clone());
            action.play();
            self.actions.push(action);
        }
    }

    /// Advances all playing clips by `delta` seconds. Negative deltas are ignored.
    pub fn update(&mut self, delta: f32) {
        let delta = delta.max(0.0);
        for action in &mut self.actions {
            action.advance(delta);
        }
    }

    pub fn action(&self, name: &str) -> Option<&ClipAction> {
        self.actions.iter().find(|action| action.clip.name == name)
    }

    pub fn action_mut(&mut self, name: &str) -> Option<&mut ClipAction> {
        self.actions.iter_mut().find(|action| action.clip.name == name)
    }

    pub fn actions(&self) -> &[ClipAction] {
        &self.actions
    }

    pub fn targets(&self) -> &[ObjectId] {
        &self.targets
    }

    /// Drops an object from the mixer; returns whether it was a target
    pub(crate) fn release(&mut self, id: ObjectId) -> bool {
        let before = self.targets.len();
        self.targets.retain(|target| *target != id);
        self.targets.len() != before
    }
}
