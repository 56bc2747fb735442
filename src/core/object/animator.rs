//=========================================================================
// Animator
//=========================================================================
//
// Frame-sequence playback state machine.
//
// State:
//   current frame ∈ [0, N)   direction ∈ {Forward, Backward}
//   accumulator (ms) ≥ 0     finished
//
// Per update, elapsed time is accumulated and one frame is stepped for
// every whole frame duration it contains. After each single step the
// boundary policy applies:
//
//   pingpong   past the end → N-2, Backward | before 0 → 1, Forward
//   loop       past either end → 0 (Forward) or N-1 (Backward)
//   otherwise  finished, on_finish fires once, frame clamped to [0, N-1]
//
// An animator without frames is inert. Ping-pong with a single frame
// holds frame 0.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::warn;

//=== Internal Dependencies ===============================================

use super::Entity;
use crate::core::capability::{
    DrawState, Drawable, EventState, Eventful, Logical, PhaseFlags,
};
use crate::core::input::Event;
use crate::core::render::{Image, Point, Rect, Surface};
use crate::error::HookResult;

//=== Constants ===========================================================

const DEFAULT_FRAME_DURATION_MS: u32 = 100;

//=== Direction ===========================================================

/// Playback direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// +1 or -1.
    pub fn step(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    fn from_reverse(reverse: bool) -> Self {
        if reverse {
            Self::Backward
        } else {
            Self::Forward
        }
    }
}

/// Callback fired when a non-looping animation reaches its end.
pub type FinishCallback = Box<dyn FnMut()>;

//=== Animator ============================================================

/// Plays a fixed sequence of images.
///
/// ```rust
/// # use aetheric_stage::prelude::*;
/// let frames = (0..4).map(|i| Image::new(format!("coin_{i}"), Size::new(16, 16)));
/// let mut coin = Animator::new(frames)
///     .with_frame_duration(50)
///     .with_pingpong(true);
///
/// coin.update(0.05).unwrap();
/// assert_eq!(coin.frame(), 1);
/// ```
pub struct Animator {
    frames: Vec<Image>,
    frame_duration_ms: u32,
    current: usize,
    accumulator: f64,
    direction: Direction,
    looping: bool,
    pingpong: bool,
    reverse: bool,
    finished: bool,
    on_finish: Option<FinishCallback>,
    position: Point,

    update_flags: PhaseFlags,
    draw: DrawState,
    events: EventState,
}

impl Animator {
    //--- Construction -----------------------------------------------------

    /// Creates a looping, forward animator with 100 ms frames.
    pub fn new(frames: impl IntoIterator<Item = Image>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            current: 0,
            accumulator: 0.0,
            direction: Direction::Forward,
            looping: true,
            pingpong: false,
            reverse: false,
            finished: false,
            on_finish: None,
            position: Point::ORIGIN,
            update_flags: PhaseFlags::default(),
            draw: DrawState::default(),
            events: EventState::default(),
        }
    }

    pub fn with_frame_duration(mut self, ms: u32) -> Self {
        self.set_frame_duration(ms);
        self
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_pingpong(mut self, pingpong: bool) -> Self {
        self.pingpong = pingpong;
        self
    }

    /// Plays backwards, starting from the last frame.
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.set_reverse(reverse);
        self.reset();
        self
    }

    pub fn with_on_finish(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    //--- Configuration ----------------------------------------------------

    /// Sets the frame duration. Zero is raised to 1 ms.
    pub fn set_frame_duration(&mut self, ms: u32) {
        if ms == 0 {
            warn!("Animator frame duration of 0 ms raised to 1 ms");
        }
        self.frame_duration_ms = ms.max(1);
    }

    /// Sets the frame duration from a frame rate.
    pub fn set_speed(&mut self, fps: u32) {
        if fps == 0 {
            warn!("Ignoring animator speed of 0 fps");
            return;
        }
        self.set_frame_duration(1000 / fps);
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn set_pingpong(&mut self, pingpong: bool) {
        self.pingpong = pingpong;
    }

    /// Sets reverse playback and the matching direction.
    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
        self.direction = Direction::from_reverse(reverse);
    }

    pub fn set_on_finish(&mut self, callback: impl FnMut() + 'static) {
        self.on_finish = Some(Box::new(callback));
    }

    /// Replaces the frame sequence and resets playback.
    pub fn set_frames(&mut self, frames: impl IntoIterator<Item = Image>) {
        self.frames = frames.into_iter().collect();
        self.reset();
    }

    //--- Playback ---------------------------------------------------------

    /// Rewinds to the first frame of the current direction.
    pub fn reset(&mut self) {
        self.current = match self.direction {
            Direction::Forward => 0,
            Direction::Backward => self.frames.len().saturating_sub(1),
        };
        self.accumulator = 0.0;
        self.finished = false;
    }

    pub fn play(&mut self) {
        self.finished = false;
    }

    pub fn stop(&mut self) {
        self.finished = true;
    }

    /// Jumps to `index`. Out-of-range indices are ignored.
    pub fn set_frame(&mut self, index: usize) {
        if index < self.frames.len() {
            self.current = index;
        }
    }

    pub fn goto_and_play(&mut self, index: usize) {
        self.set_frame(index);
        self.play();
    }

    pub fn goto_and_stop(&mut self, index: usize) {
        self.set_frame(index);
        self.stop();
    }

    /// Advances playback by `elapsed_ms`.
    ///
    /// Non-finite elapsed times are ignored. Whole playback cycles are
    /// skipped arithmetically, so the cost does not grow with the delta.
    pub fn advance(&mut self, elapsed_ms: f64) {
        let count = self.frames.len();
        if self.finished || count == 0 {
            return;
        }
        if !elapsed_ms.is_finite() {
            warn!("Ignoring non-finite animator delta {}", elapsed_ms);
            return;
        }

        if self.pingpong && count < 2 {
            self.current = 0;
            self.accumulator = 0.0;
            return;
        }

        let duration = f64::from(self.frame_duration_ms);
        let last = count as isize - 1;

        self.accumulator += elapsed_ms.max(0.0);

        // A full cycle ends on the same frame and direction.
        let cycle_steps = if self.pingpong {
            2 * (count - 1)
        } else if self.looping {
            count
        } else {
            0
        };
        if cycle_steps > 0 {
            self.accumulator %= duration * cycle_steps as f64;
        }

        while self.accumulator >= duration {
            self.accumulator -= duration;
            let next = self.current as isize + self.direction.step();

            if self.pingpong {
                if next > last {
                    self.current = count - 2;
                    self.direction = Direction::Backward;
                } else if next < 0 {
                    self.current = 1;
                    self.direction = Direction::Forward;
                } else {
                    self.current = next as usize;
                }
            } else if next < 0 || next > last {
                if self.looping {
                    self.current = match self.direction {
                        Direction::Forward => 0,
                        Direction::Backward => count - 1,
                    };
                } else {
                    self.current = next.clamp(0, last) as usize;
                    self.accumulator = 0.0;
                    self.finish();
                    break;
                }
            } else {
                self.current = next as usize;
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        if let Some(callback) = self.on_finish.as_mut() {
            callback();
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn frame(&self) -> usize {
        self.current
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[Image] {
        &self.frames
    }

    pub fn current_image(&self) -> Option<&Image> {
        self.frames.get(self.current)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn frame_duration(&self) -> u32 {
        self.frame_duration_ms
    }

    /// Time accumulated toward the next frame, in ms.
    pub fn accumulated(&self) -> f64 {
        self.accumulator
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_pingpong(&self) -> bool {
        self.pingpong
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Screen rectangle of the current frame.
    pub fn rect(&self) -> Option<Rect> {
        self.current_image()
            .map(|image| Rect::at(self.position, image.size()))
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("frames", &self.frames.len())
            .field("current", &self.current)
            .field("direction", &self.direction)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

//=== Capabilities ========================================================

impl Logical for Animator {
    fn update_state(&self) -> &PhaseFlags {
        &self.update_flags
    }

    fn update_state_mut(&mut self) -> &mut PhaseFlags {
        &mut self.update_flags
    }

    /// `delta_time` is in seconds.
    fn perform_update(&mut self, delta_time: f32) -> HookResult {
        self.advance(f64::from(delta_time) * 1000.0);
        Ok(())
    }
}

impl Drawable for Animator {
    fn draw_state(&self) -> &DrawState {
        &self.draw
    }

    fn draw_state_mut(&mut self) -> &mut DrawState {
        &mut self.draw
    }

    fn perform_draw(&mut self, target: &mut dyn Surface) -> HookResult {
        if let Some(image) = self.current_image() {
            target.blit(image, Rect::at(self.position, image.size()));
        }
        Ok(())
    }
}

impl Eventful for Animator {
    fn event_state(&self) -> &EventState {
        &self.events
    }

    fn event_state_mut(&mut self) -> &mut EventState {
        &mut self.events
    }

    fn handle_event(&mut self, _event: &Event) -> HookResult {
        Ok(())
    }
}

impl Entity for Animator {
    fn as_logical(&mut self) -> Option<&mut dyn Logical> {
        Some(self)
    }

    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        Some(self)
    }

    fn as_eventful(&mut self) -> Option<&mut dyn Eventful> {
        Some(self)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
