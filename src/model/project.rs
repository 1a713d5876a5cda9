use crate::animation::ease::Easing;
use crate::foundation::core::Canvas;
use crate::foundation::error::{StudioError, StudioResult};
use crate::model::frame::DEFAULT_FRAME_DURATION_MS;
use crate::model::state::{State, slugify};

pub const DEFAULT_FPS: u32 = 12;

/// Root aggregate: canvas size, playback settings, and the state machine of timelines.
///
/// There is always at least one state and exactly one of them is active.
#[derive(Clone, Debug)]
pub struct Project {
    canvas: Canvas,
    pub fps: u32,
    pub easing: Easing,
    states: Vec<State>,
    active: usize,
}

impl Project {
    /// A project with one blank `idle` state.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            fps: DEFAULT_FPS,
            easing: Easing::Linear,
            states: vec![State::new("idle", "Idle", canvas, DEFAULT_FRAME_DURATION_MS)],
            active: 0,
        }
    }

    /// Assembles a project from already-built states.
    ///
    /// An `active_state_id` that names no state falls back to the first state.
    pub fn from_parts(
        canvas: Canvas,
        fps: u32,
        easing: Easing,
        states: Vec<State>,
        active_state_id: Option<&str>,
    ) -> StudioResult<Self> {
        if states.is_empty() {
            return Err(StudioError::validation("a project needs at least one state"));
        }
        for (i, s) in states.iter().enumerate() {
            if states[..i].iter().any(|o| o.id == s.id) {
                return Err(StudioError::validation(format!(
                    "duplicate state id '{}'",
                    s.id
                )));
            }
            if s.frames().iter().any(|f| f.canvas() != canvas) {
                return Err(StudioError::validation(format!(
                    "state '{}' has frames of a different canvas size",
                    s.id
                )));
            }
        }
        let active = match active_state_id {
            Some(id) => states.iter().position(|s| s.id == id).unwrap_or_else(|| {
                tracing::warn!(id, "active state not found, using the first state");
                0
            }),
            None => 0,
        };
        Ok(Self {
            canvas,
            fps: fps.max(1),
            easing,
            states,
            active,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    pub fn state_mut(&mut self, id: &str) -> Option<&mut State> {
        self.states.iter_mut().find(|s| s.id == id)
    }

    pub fn active_state(&self) -> &State {
        &self.states[self.active]
    }

    pub fn active_state_mut(&mut self) -> &mut State {
        &mut self.states[self.active]
    }

    pub fn active_state_id(&self) -> &str {
        &self.states[self.active].id
    }

    pub fn set_active_state(&mut self, id: &str) -> StudioResult<()> {
        let idx = self
            .states
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StudioError::validation(format!("unknown state '{id}'")))?;
        self.active = idx;
        Ok(())
    }

    /// Appends a state with one blank frame and returns its id
    /// (slug of `name`, suffixed `-2`, `-3`, ... when taken).
    pub fn add_state(&mut self, name: &str, duration_ms: u32) -> String {
        let base = slugify(name);
        let mut id = base.clone();
        let mut n = 2;
        while self.state(&id).is_some() {
            id = format!("{base}-{n}");
            n += 1;
        }
        let display = if name.trim().is_empty() {
            id.clone()
        } else {
            name.trim().to_string()
        };
        self.states
            .push(State::new(id.clone(), display, self.canvas, duration_ms));
        id
    }

    pub fn rename_state(&mut self, id: &str, name: &str) -> StudioResult<()> {
        let state = self
            .state_mut(id)
            .ok_or_else(|| StudioError::validation(format!("unknown state '{id}'")))?;
        state.name = name.to_string();
        Ok(())
    }

    /// Removes a state. The last state cannot be removed; removing the active
    /// state activates the first remaining one.
    pub fn remove_state(&mut self, id: &str) -> StudioResult<()> {
        if self.states.len() <= 1 {
            return Err(StudioError::validation("cannot delete the only state"));
        }
        let idx = self
            .states
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StudioError::validation(format!("unknown state '{id}'")))?;
        self.states.remove(idx);
        if idx == self.active {
            self.active = 0;
        } else if idx < self.active {
            self.active -= 1;
        }
        Ok(())
    }

    /// Resizes every frame of every state, keeping the top-left overlap.
    #[tracing::instrument(skip(self), fields(from = ?self.canvas))]
    pub fn resize(&mut self, canvas: Canvas) {
        for state in &mut self.states {
            for frame in state.frames_mut() {
                frame.resize(canvas);
            }
        }
        self.canvas = canvas;
    }

    /// Raises every frame shorter than `min_ms` to it; returns how many changed.
    pub fn clamp_durations(&mut self, min_ms: u32) -> usize {
        let mut changed = 0;
        for state in &mut self.states {
            for frame in state.frames_mut() {
                if frame.duration_ms() < min_ms {
                    frame.set_duration_ms(min_ms);
                    changed += 1;
                }
            }
        }
        changed
    }

    pub fn total_frame_count(&self) -> usize {
        self.states.iter().map(State::frame_count).sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/project.rs"]
mod tests;
