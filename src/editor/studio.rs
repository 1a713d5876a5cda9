use crate::editor::history::History;
use crate::editor::presets::{EyePreset, eye_pair};
use crate::foundation::config::{StudioConfig, StyleDefaults};
use crate::foundation::core::{Bounds, Canvas, Point, Rgb8};
use crate::foundation::error::{StudioError, StudioResult};
use crate::foundation::ids::{ShapeId, ShapeIdGen};
use crate::model::frame::{Frame, FrameSnapshot};
use crate::model::path::NodeHandle;
use crate::model::project::Project;
use crate::model::shape::{Interaction, Shape, ShapePayload, ShapeStyle, ShapeType};
use crate::playback::clock::{LoopMode, PlaybackClock, Tick};
use crate::playback::scheduler::{FrameScheduler, TickToken};
use crate::render::preview::render_frame;
use crate::render::surface::Surface;

/// Offset applied to a duplicated shape.
pub const DUPLICATE_OFFSET: f64 = 20.0;
/// Offset applied to a pasted shape.
pub const PASTE_OFFSET: f64 = 10.0;

/// Target edge or axis for [`Studio::align_shape`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    CenterH,
    Right,
    Top,
    CenterV,
    Bottom,
}

impl Align {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "left" => Self::Left,
            "center-h" => Self::CenterH,
            "right" => Self::Right,
            "top" => Self::Top,
            "center-v" => Self::CenterV,
            "bottom" => Self::Bottom,
            _ => return None,
        })
    }
}

/// Interpolated view published by the last playback tick.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackView {
    pub tick: Tick,
    pub shapes: Vec<Shape>,
}

/// One editing session over a project.
///
/// Holds everything the editor works on: the project, the frame being edited
/// in the active state, the selection, both clipboards, the undo history of
/// the current frame, the id generator and the playback clock.
///
/// Every mutating operation records the current frame in the history before
/// changing it. Changing the current frame or state resets the history.
#[derive(Debug)]
pub struct Studio {
    project: Project,
    config: StudioConfig,
    current_frame: usize,
    selected: Option<ShapeId>,
    shape_clipboard: Option<Shape>,
    frame_clipboard: Option<FrameSnapshot>,
    history: History,
    ids: ShapeIdGen,
    clock: PlaybackClock,
    playback: Option<PlaybackView>,
}

impl Studio {
    /// A fresh project sized and styled from `config`.
    pub fn new(config: StudioConfig) -> Self {
        let mut project = Project::new(config.canvas);
        project.fps = config.fps.max(1);
        Self::open(project, config)
    }

    /// Starts a session on an existing project, on the first frame of its active state.
    /// Frames shorter than the configured minimum duration are raised to it.
    pub fn open(mut project: Project, config: StudioConfig) -> Self {
        let raised = project.clamp_durations(config.min_frame_duration_ms);
        if raised > 0 {
            tracing::debug!(raised, "raised frame durations to the configured minimum");
        }
        let mut ids = ShapeIdGen::default();
        for state in project.states() {
            for frame in state.frames() {
                for shape in &frame.shapes {
                    ids.observe(&shape.id);
                }
            }
        }
        let clock = PlaybackClock::new(
            LoopMode::default(),
            project.easing,
            config.pixels_per_second,
        );
        Self {
            history: History::new(config.history_capacity),
            project,
            config,
            current_frame: 0,
            selected: None,
            shape_clipboard: None,
            frame_clipboard: None,
            ids,
            clock,
            playback: None,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn into_project(self) -> Project {
        self.project
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Style applied to newly created shapes ("current color" and friends).
    pub fn style_defaults_mut(&mut self) -> &mut StyleDefaults {
        &mut self.config.style
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.project.fps = fps.max(1);
    }

    pub fn set_easing(&mut self, easing: crate::animation::ease::Easing) {
        self.project.easing = easing;
        self.clock.easing = easing;
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.clock.loop_mode = mode;
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.clock.loop_mode
    }

    pub fn current_frame_index(&self) -> usize {
        self.current_frame
    }

    pub fn frame_count(&self) -> usize {
        self.project.active_state().frame_count()
    }

    pub fn current_frame(&self) -> &Frame {
        let state = self.project.active_state();
        &state.frames()[self.current_frame.min(state.frame_count() - 1)]
    }

    fn frame_mut(&mut self) -> &mut Frame {
        let state = self.project.active_state_mut();
        let idx = self.current_frame.min(state.frame_count() - 1);
        &mut state.frames_mut()[idx]
    }

    fn snapshot_current(&mut self) {
        let state = self.project.active_state();
        let idx = self.current_frame.min(state.frame_count() - 1);
        self.history.snapshot(&state.frames()[idx]);
    }

    /// Snapshots the current frame, then hands it out for mutation.
    fn edit_frame(&mut self) -> &mut Frame {
        self.snapshot_current();
        self.frame_mut()
    }

    fn goto_frame(&mut self, index: usize) {
        let index = index.min(self.frame_count() - 1);
        if index != self.current_frame {
            self.history.clear();
            self.selected = None;
        }
        self.current_frame = index;
    }

    // --- history ---

    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.halt_playback();
        let idx = self.current_frame.min(self.frame_count() - 1);
        let frame = &mut self.project.active_state_mut().frames_mut()[idx];
        let done = self.history.undo(frame);
        if done {
            self.drop_dangling_selection();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        self.halt_playback();
        let idx = self.current_frame.min(self.frame_count() - 1);
        let frame = &mut self.project.active_state_mut().frames_mut()[idx];
        let done = self.history.redo(frame);
        if done {
            self.drop_dangling_selection();
        }
        done
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn drop_dangling_selection(&mut self) {
        if let Some(id) = &self.selected
            && self.current_frame().shape_index(id).is_none()
        {
            self.selected = None;
        }
    }

    // --- frames ---

    pub fn select_frame(&mut self, index: usize) -> StudioResult<()> {
        if index >= self.frame_count() {
            return Err(StudioError::validation(format!(
                "frame {index} out of range (state has {})",
                self.frame_count()
            )));
        }
        self.goto_frame(index);
        Ok(())
    }

    /// Inserts a blank frame after the current one and moves to it.
    pub fn add_frame(&mut self) -> usize {
        self.halt_playback();
        let duration = self.config.clamp_duration(self.config.default_frame_duration_ms);
        let frame = Frame::blank(self.project.canvas(), duration);
        let at = self.current_frame + 1;
        let at = self.project.active_state_mut().insert_frame(at, frame);
        self.goto_frame(at);
        at
    }

    /// Inserts a deep copy of the current frame after it (shape ids kept) and moves to it.
    pub fn duplicate_frame(&mut self) -> usize {
        self.halt_playback();
        self.snapshot_current();
        let copy = self.current_frame().clone();
        let at = self.current_frame + 1;
        let at = self.project.active_state_mut().insert_frame(at, copy);
        self.goto_frame(at);
        at
    }

    /// Deletes the current frame; a state's only frame is cleared instead.
    pub fn delete_frame(&mut self) {
        self.halt_playback();
        if self.frame_count() == 1 {
            self.edit_frame().clear();
            self.selected = None;
            return;
        }
        let idx = self.current_frame;
        self.project.active_state_mut().remove_frame(idx);
        self.history.clear();
        self.selected = None;
        self.current_frame = idx.min(self.frame_count() - 1);
    }

    /// Sets the current frame's duration, raised to the configured minimum.
    pub fn set_frame_duration(&mut self, duration_ms: u32) {
        self.halt_playback();
        let d = self.config.clamp_duration(duration_ms);
        self.edit_frame().set_duration_ms(d);
    }

    pub fn copy_frame(&mut self) {
        self.frame_clipboard = Some(self.current_frame().snapshot());
    }

    /// Replaces the current frame's content with the copied frame.
    pub fn paste_frame(&mut self) -> StudioResult<()> {
        let snapshot = self
            .frame_clipboard
            .clone()
            .ok_or_else(|| StudioError::selection("no frame has been copied"))?;
        if snapshot.pixels.len() != self.project.canvas().pixel_count() {
            return Err(StudioError::validation(
                "copied frame belongs to a different canvas size",
            ));
        }
        self.halt_playback();
        self.edit_frame().restore(snapshot);
        self.drop_dangling_selection();
        Ok(())
    }

    /// Reverses the active state's frame order; the current frame follows its content.
    pub fn reverse_frames(&mut self) {
        self.halt_playback();
        self.snapshot_current();
        let count = self.frame_count();
        self.project.active_state_mut().reverse_frames();
        self.current_frame = count - 1 - self.current_frame.min(count - 1);
    }

    // --- pixels ---

    /// Paints one pixel; coordinates outside the canvas are ignored.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgb8) -> bool {
        self.paint_stroke(&[(x, y)], Some(color))
    }

    pub fn erase_pixel(&mut self, x: i64, y: i64) -> bool {
        self.paint_stroke(&[(x, y)], None)
    }

    /// Writes many pixels as one undoable step. Returns whether any was inside the canvas.
    pub fn paint_stroke(&mut self, points: &[(i64, i64)], color: Option<Rgb8>) -> bool {
        let frame = self.edit_frame();
        let mut any = false;
        for &(x, y) in points {
            any |= frame.set_pixel(x, y, color);
        }
        any
    }

    /// Removes every pixel and shape from the current frame.
    pub fn clear_frame(&mut self) {
        self.edit_frame().clear();
        self.selected = None;
    }

    /// Inverts the colors of the pixel layer.
    pub fn invert_colors(&mut self) {
        self.edit_frame().invert_pixels();
    }

    /// Resizes every frame of every state; the top-left overlap is kept.
    pub fn resize_canvas(&mut self, width: u32, height: u32) -> StudioResult<()> {
        let canvas = Canvas::new(width, height)?;
        if canvas == self.project.canvas() {
            return Ok(());
        }
        self.project.resize(canvas);
        self.history.clear();
        self.frame_clipboard = None;
        Ok(())
    }

    // --- shapes ---

    pub fn selected(&self) -> Option<&ShapeId> {
        self.selected.as_ref()
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        let id = self.selected.as_ref()?;
        let frame = self.current_frame();
        frame.shapes.get(frame.shape_index(id)?)
    }

    pub fn select(&mut self, id: &ShapeId) -> StudioResult<()> {
        if self.current_frame().shape_index(id).is_none() {
            return Err(StudioError::selection(format!(
                "shape {id} is not on the current frame"
            )));
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Selects the topmost shape under the point, or clears the selection.
    pub fn select_at(&mut self, x: f64, y: f64) -> Option<ShapeId> {
        let frame = self.current_frame();
        self.selected = frame.hit_test(x, y).map(|i| frame.shapes[i].id.clone());
        self.selected.clone()
    }

    fn push_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id.clone();
        self.edit_frame().shapes.push(shape);
        self.selected = Some(id.clone());
        id
    }

    /// Adds a shape of `kind` filling `bounds` and selects it.
    pub fn add_shape(&mut self, kind: ShapeType, bounds: Bounds) -> ShapeId {
        let shape = Shape::new(self.ids.next_id(), kind, bounds, &self.config.style);
        self.push_shape(shape)
    }

    pub fn add_line(&mut self, from: Point, to: Point) -> ShapeId {
        let shape = Shape::line(self.ids.next_id(), from, to, &self.config.style);
        self.push_shape(shape)
    }

    pub fn add_text(&mut self, at: Point, text: &str) -> ShapeId {
        let shape = Shape::text(self.ids.next_id(), at, text, &self.config.style);
        self.push_shape(shape)
    }

    pub fn add_path(&mut self, bounds: Bounds, path_data: &str) -> ShapeId {
        let geom = crate::model::path::PathGeometry::from_data(path_data);
        let shape = Shape::path(self.ids.next_id(), bounds, geom, &self.config.style);
        self.push_shape(shape)
    }

    fn selected_index(&self) -> StudioResult<usize> {
        let id = self
            .selected
            .as_ref()
            .ok_or_else(|| StudioError::selection("no shape selected"))?;
        self.current_frame()
            .shape_index(id)
            .ok_or_else(|| StudioError::selection(format!("selected shape {id} no longer exists")))
    }

    /// Snapshots, then applies `f` to the selected shape.
    pub fn update_shape(&mut self, f: impl FnOnce(&mut Shape)) -> StudioResult<()> {
        let idx = self.selected_index()?;
        f(&mut self.edit_frame().shapes[idx]);
        Ok(())
    }

    pub fn update_style(&mut self, f: impl FnOnce(&mut ShapeStyle)) -> StudioResult<()> {
        self.update_shape(|s| {
            f(&mut s.style);
            s.style.opacity = s.style.opacity.clamp(0.0, 1.0);
            s.style.stroke_width = s.style.stroke_width.max(0.0);
            s.style.corner_radius = s.style.corner_radius.max(0.0);
        })
    }

    /// Moves the selection; lines move both endpoints.
    pub fn move_shape(&mut self, dx: f64, dy: f64) -> StudioResult<()> {
        self.update_shape(|s| s.translate(dx, dy))
    }

    /// Sets the selection's box; negative extents flip the origin.
    pub fn resize_shape(&mut self, bounds: Bounds) -> StudioResult<()> {
        self.update_shape(|s| s.set_bounds(bounds))
    }

    pub fn set_rotation(&mut self, degrees: f64) -> StudioResult<()> {
        self.update_shape(|s| s.rotation = degrees)
    }

    pub fn set_text(&mut self, text: &str) -> StudioResult<()> {
        let idx = self.selected_index()?;
        if self.current_frame().shapes[idx].shape_type() != ShapeType::Text {
            return Err(StudioError::selection("selected shape is not text"));
        }
        self.update_shape(|s| {
            if let ShapePayload::Text { text: t, .. } = &mut s.payload {
                *t = text.to_string();
            }
        })
    }

    pub fn set_interaction(&mut self, interaction: Option<Interaction>) -> StudioResult<()> {
        self.update_shape(|s| s.interaction = interaction)
    }

    pub fn delete_shape(&mut self) -> StudioResult<()> {
        let idx = self.selected_index()?;
        self.edit_frame().shapes.remove(idx);
        self.selected = None;
        Ok(())
    }

    /// Copies the selection with a new id, offset by 20px, and selects the copy.
    pub fn duplicate_shape(&mut self) -> StudioResult<ShapeId> {
        let idx = self.selected_index()?;
        let source = self.current_frame().shapes[idx].clone();
        let mut copy = source.clone_shape(false, &mut self.ids);
        copy.translate(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        Ok(self.push_shape(copy))
    }

    pub fn copy_shape(&mut self) -> StudioResult<()> {
        let idx = self.selected_index()?;
        self.shape_clipboard = Some(self.current_frame().shapes[idx].clone());
        Ok(())
    }

    /// Pastes the copied shape with a new id, offset by 10px, and selects it.
    pub fn paste_shape(&mut self) -> StudioResult<ShapeId> {
        let source = self
            .shape_clipboard
            .as_ref()
            .ok_or_else(|| StudioError::selection("no shape has been copied"))?;
        let mut copy = source.clone_shape(false, &mut self.ids);
        copy.translate(PASTE_OFFSET, PASTE_OFFSET);
        Ok(self.push_shape(copy))
    }

    /// Scales the selection's size around its top-left corner.
    pub fn scale_shape(&mut self, factor: f64) -> StudioResult<()> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(StudioError::validation(format!("invalid scale factor {factor}")));
        }
        self.update_shape(|s| s.scale(factor))
    }

    /// Aligns the selection's bounds to a canvas edge or center line.
    pub fn align_shape(&mut self, align: Align) -> StudioResult<()> {
        let canvas = self.project.canvas();
        let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
        self.update_shape(|s| {
            let b = s.bounds();
            let (dx, dy) = match align {
                Align::Left => (-b.x, 0.0),
                Align::CenterH => ((cw - b.width) / 2.0 - b.x, 0.0),
                Align::Right => (cw - b.width - b.x, 0.0),
                Align::Top => (0.0, -b.y),
                Align::CenterV => (0.0, (ch - b.height) / 2.0 - b.y),
                Align::Bottom => (0.0, ch - b.height - b.y),
            };
            s.translate(dx, dy);
        })
    }

    /// Swaps the selection with the shape above it. Returns `false` when already on top.
    pub fn move_layer_up(&mut self) -> StudioResult<bool> {
        let idx = self.selected_index()?;
        if idx + 1 >= self.current_frame().shapes.len() {
            return Ok(false);
        }
        self.edit_frame().shapes.swap(idx, idx + 1);
        Ok(true)
    }

    pub fn move_layer_down(&mut self) -> StudioResult<bool> {
        let idx = self.selected_index()?;
        if idx == 0 {
            return Ok(false);
        }
        self.edit_frame().shapes.swap(idx, idx - 1);
        Ok(true)
    }

    /// Drags a node handle of the selected path shape to a canvas position.
    pub fn move_path_node(
        &mut self,
        index: usize,
        handle: NodeHandle,
        to: Point,
    ) -> StudioResult<()> {
        let idx = self.selected_index()?;
        let shape = &self.current_frame().shapes[idx];
        let ShapePayload::Path(geom) = &shape.payload else {
            return Err(StudioError::selection("selected shape is not a path"));
        };
        let bounds = shape.box_bounds();
        let mut geom = geom.clone();
        if !geom.move_handle(&bounds, index, handle, to) {
            return Err(StudioError::validation(format!(
                "path node {index} has no {handle:?} handle"
            )));
        }
        self.update_shape(|s| s.payload = ShapePayload::Path(geom))
    }

    /// Replaces the current frame's shapes with a pair of eyes in the current color.
    pub fn apply_eye_preset(&mut self, preset: EyePreset) -> [ShapeId; 2] {
        let eyes = eye_pair(
            preset,
            self.project.canvas(),
            self.config.style.color,
            &self.config.style,
            &mut self.ids,
        );
        let ids = [eyes[0].id.clone(), eyes[1].id.clone()];
        self.edit_frame().shapes = eyes.into();
        self.selected = None;
        ids
    }

    // --- states ---

    /// Adds a state with one blank frame; the active state does not change.
    pub fn add_state(&mut self, name: &str) -> String {
        let duration = self.config.clamp_duration(self.config.default_frame_duration_ms);
        self.project.add_state(name, duration)
    }

    /// Activates a state at its first frame. Switching to the active state does nothing.
    pub fn switch_state(&mut self, id: &str) -> StudioResult<()> {
        if self.project.active_state_id() == id {
            return Ok(());
        }
        self.project.set_active_state(id)?;
        self.halt_playback();
        self.current_frame = 0;
        self.history.clear();
        self.selected = None;
        Ok(())
    }

    pub fn rename_state(&mut self, id: &str, name: &str) -> StudioResult<()> {
        self.project.rename_state(id, name)
    }

    /// Deletes a state other than the last one. Deleting the active state
    /// activates the first remaining state.
    pub fn delete_state(&mut self, id: &str) -> StudioResult<()> {
        let was_active = self.project.active_state_id() == id;
        self.project.remove_state(id)?;
        if was_active {
            self.halt_playback();
            self.current_frame = 0;
            self.history.clear();
            self.selected = None;
        }
        Ok(())
    }

    // --- playback ---

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Drops playback after an edit to the active timeline; the frame list
    /// the clock captured no longer matches.
    fn halt_playback(&mut self) {
        if let Some(token) = self.clock.halt() {
            tracing::debug!(?token, "timeline edited, playback stopped");
        }
        self.playback = None;
    }

    /// Starts playback from the current frame.
    pub fn play(&mut self, now_ms: f64, scheduler: &mut dyn FrameScheduler) -> bool {
        self.clock.easing = self.project.easing;
        let durations = self.project.active_state().durations_ms();
        self.clock.start(now_ms, &durations, self.current_frame, scheduler)
    }

    /// Stops playback; the current frame stays where playback left it.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        self.playback = None;
        self.clock.stop(scheduler)
    }

    /// Advances playback for a fired tick and publishes the interpolated shapes.
    pub fn on_tick(
        &mut self,
        token: TickToken,
        now_ms: f64,
        scheduler: &mut dyn FrameScheduler,
    ) -> Option<&PlaybackView> {
        let tick = self.clock.on_tick(token, now_ms, scheduler)?;
        let frames = self.project.active_state().frames();
        let Some(current) = frames.get(tick.frame_index) else {
            tracing::warn!(
                frame = tick.frame_index,
                frames = frames.len(),
                "playback tick past the end of the timeline"
            );
            self.stop(scheduler);
            return None;
        };
        let shapes = (!tick.finished).then(|| {
            crate::animation::interp::interpolate_shapes(
                current,
                frames.get(tick.next_index),
                tick.eased_t,
            )
        });
        self.goto_frame(tick.frame_index);
        let Some(shapes) = shapes else {
            self.playback = None;
            return None;
        };
        self.playback = Some(PlaybackView { tick, shapes });
        self.playback.as_ref()
    }

    pub fn playback_view(&self) -> Option<&PlaybackView> {
        self.playback.as_ref()
    }

    /// Renders the current frame, interpolated when playback is running.
    pub fn render(&self, surface: &mut dyn Surface, background: Rgb8) -> StudioResult<()> {
        let frames = self.project.active_state().frames();
        let tween = self
            .playback
            .as_ref()
            .and_then(|v| frames.get(v.tick.next_index).map(|next| (next, v.tick.eased_t)));
        render_frame(surface, self.current_frame(), tween, background)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/studio.rs"]
mod tests;
