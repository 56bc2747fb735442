//=========================================================================
// Phase Executor
//=========================================================================
//
// Three-phase execution wrapper shared by the Logical, Drawable and
// Eventful capabilities.
//
// Contract per invocation:
//   1. Disabled → return Ok, no hooks, no profiling.
//   2. Start a timer only if profiling is enabled.
//   3. before → perform → after, stopping at the first failing step.
//   4. A failure goes to the error hook exactly once. The default hook
//      returns the error; overrides may swallow it by returning Ok.
//   5. If the timer was started, the profile hook fires exactly once,
//      whatever the outcome.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::error::{BoxError, HookResult};

//=== Phase / Step ========================================================

/// Capability phase being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Update,
    Draw,
    Event,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Update => "update",
            Self::Draw => "draw",
            Self::Event => "event",
        })
    }
}

/// Step within a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Before,
    Perform,
    After,
}

impl Step {
    /// Execution order of the steps.
    pub const SEQUENCE: [Step; 3] = [Step::Before, Step::Perform, Step::After];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Before => "before",
            Self::Perform => "perform",
            Self::After => "after",
        })
    }
}

//=== PhaseError ==========================================================

/// Failure captured while running a phase.
#[derive(Debug, Error)]
#[error("{phase} failed in {step} step")]
pub struct PhaseError {
    pub phase: Phase,
    pub step: Step,
    #[source]
    pub source: BoxError,
}

impl PhaseError {
    pub fn new(phase: Phase, step: Step, source: impl Into<BoxError>) -> Self {
        Self {
            phase,
            step,
            source: source.into(),
        }
    }
}

/// Outcome of a phase invocation.
pub type PhaseResult = Result<(), PhaseError>;

//=== PhaseFlags ==========================================================

/// Per-capability execution switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseFlags {
    /// When false the phase returns immediately: no hooks, no profiling.
    pub enabled: bool,

    /// When true the profile hook receives the elapsed time.
    pub profiling: bool,
}

impl Default for PhaseFlags {
    fn default() -> Self {
        Self {
            enabled: true,
            profiling: false,
        }
    }
}

//=== execute() ===========================================================

/// Runs one phase invocation against `target`.
///
/// `run_step` is called for each [`Step`] in order. The first failing step
/// is wrapped in a [`PhaseError`] and handed to `on_error`, whose return
/// value becomes the result. `on_profile` runs last when profiling was on.
pub fn execute<T: ?Sized>(
    target: &mut T,
    phase: Phase,
    flags: PhaseFlags,
    mut run_step: impl FnMut(&mut T, Step) -> HookResult,
    on_error: impl FnOnce(&mut T, PhaseError) -> PhaseResult,
    on_profile: impl FnOnce(&mut T, Duration),
) -> PhaseResult {
    if !flags.enabled {
        return Ok(());
    }

    let started = flags.profiling.then(Instant::now);

    let mut failure = None;
    for step in Step::SEQUENCE {
        if let Err(source) = run_step(target, step) {
            failure = Some(PhaseError::new(phase, step, source));
            break;
        }
    }

    let result = match failure {
        Some(error) => on_error(target, error),
        None => Ok(()),
    };

    if let Some(started) = started {
        on_profile(target, started.elapsed());
    }

    result
}

//=========================================================================
// Unit Tests
//=========================================================================
