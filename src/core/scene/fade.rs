//=========================================================================
// Fade Transition
//=========================================================================
//
// Tick-driven fade to black between the current scene and a pending one.
//
// While active, the manager keeps drawing the outgoing scene with a black
// overlay whose alpha rises linearly from 0 to 255 over `duration`
// seconds of update time. Once complete, the pending scene is pushed
// exactly as an ordinary append would.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::Scene;

//=== TransitionKind ======================================================

/// Visual effect used when moving to a new scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransitionKind {
    /// Fade the outgoing scene to black, then push.
    #[default]
    Fade,

    /// Push immediately.
    Cut,
}

impl TransitionKind {
    /// `"fade"` maps to `Fade`; every other name is an immediate `Cut`.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("fade") {
            Self::Fade
        } else {
            Self::Cut
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fade => "fade",
            Self::Cut => "cut",
        })
    }
}

//=== FadeTransition ======================================================

/// An in-progress fade holding the scene to push once it completes.
pub struct FadeTransition {
    pending: Box<dyn Scene>,
    duration: f32,
    elapsed: f32,
}

impl FadeTransition {
    /// Fade lasting `duration` seconds. Non-positive durations complete
    /// immediately.
    pub fn new(pending: Box<dyn Scene>, duration: f32) -> Self {
        Self {
            pending,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Advances the fade. Returns true once complete.
    pub fn advance(&mut self, delta_time: f32) -> bool {
        self.elapsed = (self.elapsed + delta_time.max(0.0)).min(self.duration);
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Completed fraction in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    /// Overlay alpha for the current progress.
    pub fn alpha(&self) -> u8 {
        (self.progress() * 255.0).round() as u8
    }

    pub fn pending(&self) -> &dyn Scene {
        self.pending.as_ref()
    }

    pub fn pending_mut(&mut self) -> &mut dyn Scene {
        self.pending.as_mut()
    }

    /// The scene waiting to be pushed.
    pub fn into_scene(self) -> Box<dyn Scene> {
        self.pending
    }
}

impl fmt::Debug for FadeTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FadeTransition")
            .field("pending", &self.pending.scene_name())
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
