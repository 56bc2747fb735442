//=========================================================================
// Scene Commands
//=========================================================================
//
// Queue for scene navigation requests.
//
// Scenes queue commands here from hooks and updates. The scene manager
// drains every live scene's queue at tick boundaries, so the stack is
// never mutated while one of its scenes is running.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::TransitionKind;

//=== SceneCommand ========================================================

/// Scene stack operation requested by a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Pushes a new instance of the named scene.
    Push(String),

    /// Pops the current scene.
    Pop,

    /// Replaces the whole stack with a new instance of the named scene.
    Reset(String),

    /// Moves to a new instance of the named scene with an effect.
    Transition {
        scene: String,
        kind: TransitionKind,
        duration: f32,
    },

    /// Rebuilds the current scene in place.
    Reload,
}

//=== SceneCommands =======================================================

/// FIFO queue of scene commands.
#[derive(Debug, Default)]
pub struct SceneCommands {
    queue: Vec<SceneCommand>,
}

impl SceneCommands {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a command for the next tick boundary.
    pub fn push(&mut self, command: SceneCommand) {
        self.queue.push(command);
    }

    //--- Shorthands -------------------------------------------------------

    pub fn push_scene(&mut self, name: impl Into<String>) {
        self.push(SceneCommand::Push(name.into()));
    }

    pub fn pop_scene(&mut self) {
        self.push(SceneCommand::Pop);
    }

    pub fn reset_to(&mut self, name: impl Into<String>) {
        self.push(SceneCommand::Reset(name.into()));
    }

    pub fn transition_to(&mut self, name: impl Into<String>, kind: TransitionKind, duration: f32) {
        self.push(SceneCommand::Transition {
            scene: name.into(),
            kind,
            duration,
        });
    }

    pub fn reload(&mut self) {
        self.push(SceneCommand::Reload);
    }

    //--- Queue ------------------------------------------------------------

    pub fn iter(&self) -> impl Iterator<Item = &SceneCommand> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes all queued commands, leaving the queue empty.
    pub fn take(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
