use crate::foundation::core::Canvas;
use crate::model::frame::Frame;

/// A named, independent timeline. Always holds at least one frame.
#[derive(Clone, Debug)]
pub struct State {
    pub id: String,
    pub name: String,
    frames: Vec<Frame>,
}

impl State {
    /// A state with a single blank frame.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        canvas: Canvas,
        duration_ms: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            frames: vec![Frame::blank(canvas, duration_ms)],
        }
    }

    /// `None` if `frames` is empty.
    pub fn with_frames(
        id: impl Into<String>,
        name: impl Into<String>,
        frames: Vec<Frame>,
    ) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            id: id.into(),
            name: name.into(),
            frames,
        })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut [Frame] {
        &mut self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frame_mut(&mut self, index: usize) -> Option<&mut Frame> {
        self.frames.get_mut(index)
    }

    /// Inserts at `index` (clamped to the end) and returns the final position.
    pub fn insert_frame(&mut self, index: usize, frame: Frame) -> usize {
        let index = index.min(self.frames.len());
        self.frames.insert(index, frame);
        index
    }

    /// Removes a frame; the last remaining frame is cleared in place instead.
    /// Returns `false` when `index` is out of range.
    pub fn remove_frame(&mut self, index: usize) -> bool {
        if index >= self.frames.len() {
            return false;
        }
        if self.frames.len() == 1 {
            self.frames[0].clear();
        } else {
            self.frames.remove(index);
        }
        true
    }

    pub fn reverse_frames(&mut self) {
        self.frames.reverse();
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.duration_ms())).sum()
    }

    /// Sum of the durations of the frames before `index`.
    pub fn offset_ms(&self, index: usize) -> u64 {
        self.frames
            .iter()
            .take(index)
            .map(|f| u64::from(f.duration_ms()))
            .sum()
    }

    pub fn durations_ms(&self) -> Vec<u32> {
        self.frames.iter().map(Frame::duration_ms).collect()
    }
}

/// Lowercase slug of a display name: alphanumeric runs joined by `-`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("state");
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/model/state.rs"]
mod tests;
