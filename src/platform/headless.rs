//=========================================================================
// Headless Presenter
//=========================================================================
//
// Presenter with no window behind it. Keeps copies of the most recently
// presented frames' draw ops, for tests, servers and CI. History is
// bounded unless explicitly requested otherwise.
//
//=========================================================================

use std::collections::VecDeque;

use log::trace;

use super::Presenter;
use crate::core::render::{Canvas, DrawOp, Size, Surface};
use crate::error::HookResult;

//=== Constants ===========================================================

/// Frames kept by [`HeadlessPresenter::new`].
pub const DEFAULT_FRAME_LIMIT: usize = 120;

//=== HeadlessPresenter ===================================================

/// Records presented frames in memory.
#[derive(Debug)]
pub struct HeadlessPresenter {
    frames: VecDeque<Vec<DrawOp>>,
    last_size: Option<Size>,
    limit: Option<usize>,
}

impl Default for HeadlessPresenter {
    fn default() -> Self {
        Self::with_limit(DEFAULT_FRAME_LIMIT)
    }
}

impl HeadlessPresenter {
    /// Keeps the last [`DEFAULT_FRAME_LIMIT`] frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only the most recent `limit` frames.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            frames: VecDeque::new(),
            last_size: None,
            limit: Some(limit.max(1)),
        }
    }

    /// Keeps every frame. Memory grows with each present.
    pub fn unbounded() -> Self {
        Self {
            frames: VecDeque::new(),
            last_size: None,
            limit: None,
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Recorded frames, oldest first.
    pub fn frames(&self) -> impl Iterator<Item = &[DrawOp]> + '_ {
        self.frames.iter().map(Vec::as_slice)
    }

    /// Recorded frame by index, oldest first.
    pub fn frame(&self, index: usize) -> Option<&[DrawOp]> {
        self.frames.get(index).map(Vec::as_slice)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn last_frame(&self) -> Option<&[DrawOp]> {
        self.frames.back().map(Vec::as_slice)
    }

    /// Size of the most recently presented canvas.
    pub fn last_size(&self) -> Option<Size> {
        self.last_size
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.last_size = None;
    }
}

impl Presenter for HeadlessPresenter {
    fn present(&mut self, frame: &Canvas) -> HookResult {
        if let Some(limit) = self.limit {
            while self.frames.len() >= limit {
                self.frames.pop_front();
            }
        }

        self.frames.push_back(frame.ops().to_vec());
        self.last_size = Some(frame.size());
        trace!(target: "platform", "Presented frame with {} ops", frame.len());
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
