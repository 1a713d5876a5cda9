//! Facestudio is the core of a robot-face animation editor.
//!
//! A [`Project`] holds named [`State`]s (idle, happy, ...), each a timeline of
//! keyframe [`Frame`]s made of a sparse pixel layer and vector [`Shape`]s.
//! Around that model the crate provides:
//!
//! - an editing session ([`Studio`]) with frame-scoped undo/redo
//! - shape interpolation, easing and a playback clock
//! - a CPU [`Surface`] for previews
//! - two LVGL code generators: baked RGB565 frames ([`bake_project`]) and a
//!   native object/animation state machine ([`emit_native`])
//! - the project JSON format and the device bridge payloads
#![forbid(unsafe_code)]

pub(crate) mod animation;
pub(crate) mod codegen;
pub(crate) mod editor;
pub(crate) mod foundation;
pub(crate) mod io;
pub(crate) mod model;
pub(crate) mod playback;
pub(crate) mod render;

pub use crate::foundation::config::{BakeSettings, StudioConfig, StyleDefaults};
pub use crate::foundation::core::{
    Affine, BezPath, Bounds, Canvas, MAX_CANVAS_SIDE, MIN_CANVAS_SIDE, Point, Rgb8, Vec2, lerp,
    round_half_up,
};
pub use crate::foundation::error::{StudioError, StudioResult};
pub use crate::foundation::ids::{ShapeId, ShapeIdGen};

pub use crate::model::blend::BlendMode;
pub use crate::model::frame::{
    DEFAULT_FRAME_DURATION_MS, Frame, FrameSnapshot, MIN_FRAME_DURATION_MS,
};
pub use crate::model::path::{
    NodeHandle, PATH_DESIGN_HEIGHT, PATH_DESIGN_WIDTH, PATH_EDIT_HEIGHT, PathGeometry, PathNode,
    format_path_data, parse_path_data,
};
pub use crate::model::project::{DEFAULT_FPS, Project};
pub use crate::model::shape::{
    Interaction, LINE_HIT_TOLERANCE, Shape, ShapePayload, ShapeStyle, ShapeType,
    TEXT_DEFAULT_SIZE,
};
pub use crate::model::state::{State, slugify};

pub use crate::animation::ease::{CubicBezier, Easing};
pub use crate::animation::interp::interpolate_shapes;

pub use crate::editor::history::History;
pub use crate::editor::presets::{EYE_HEIGHT, EYE_PADDING, EYE_WIDTH, EyePreset, eye_pair};
pub use crate::editor::studio::{
    Align, DUPLICATE_OFFSET, PASTE_OFFSET, PlaybackView, Studio,
};

pub use crate::playback::clock::{
    LoopMode, PlaybackClock, Tick, TimelinePosition, evaluate_at, resolve_position,
};
pub use crate::playback::scheduler::{FrameScheduler, ManualScheduler, TickToken};

pub use crate::render::composite::{PremulRgba8, blend, blend_in_place, over, unpremultiply};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::paint::{
    MIN_LINE_WIDTH, PaintOp, TEXT_FONT_FAMILY, paint_ops, rotation_transform, rounded_rect_path,
};
pub use crate::render::preview::render_frame;
pub use crate::render::surface::Surface;

pub use crate::codegen::native::{
    ANIMATION_EPSILON, AnimProperty, NativeArtifact, NativeObject, NativeProgram, NativeState,
    PropertyAnimation, Radius, Widget, emit_native, lower_project, lvgl_path, write_program,
};
pub use crate::codegen::raster::{RasterArtifacts, bake_project, encode_rgb565};
pub use crate::codegen::{DEFAULT_ARTIFACT_NAME, sanitize_c_name};

pub use crate::io::bridge::{
    DEFAULT_FILE_STEM, DeleteAnimPayload, PayloadFrame, PayloadState, SaveAnimPayload,
    sanitize_file_stem,
};
pub use crate::io::project_file::{
    FrameRecord, PROJECT_FILE_VERSION, PixelRecord, PointRecord, ProjectFile, ShapeRecord,
    StateRecord, export_project, import_project, sparse_pixels,
};
