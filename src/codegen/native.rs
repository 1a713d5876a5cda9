use std::collections::HashMap;

use crate::animation::ease::Easing;
use crate::codegen::{c_string_literal, sanitize_c_name};
use crate::foundation::core::{Rgb8, round_half_up};
use crate::foundation::error::{StudioError, StudioResult};
use crate::foundation::ids::ShapeId;
use crate::model::project::Project;
use crate::model::shape::{Shape, ShapePayload, ShapeType};
use crate::model::state::State;

/// Smallest property change between two keyframes that produces an animation.
pub const ANIMATION_EPSILON: f64 = 0.1;

/// A lowered project, ready to be printed as C.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeProgram {
    pub base: String,
    pub easing: Easing,
    pub states: Vec<NativeState>,
    /// State switched to by `init_{base}`.
    pub initial_state: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NativeState {
    pub id: String,
    pub name: String,
    /// Suffix of the `create_state_*` routine.
    pub ident: String,
    pub objects: Vec<NativeObject>,
    pub animations: Vec<PropertyAnimation>,
}

/// One retained object, seeded from the shape at its first appearing frame.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeObject {
    pub var: String,
    pub widget: Widget,
    pub x: i64,
    pub y: i64,
    /// `0..=255`.
    pub opacity: i64,
    /// Tenths of a degree; omitted when the shape is not rotated.
    pub rotation: Option<i64>,
    /// Not present in the state's first frame.
    pub hidden: bool,
    pub click_target: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Widget {
    Label {
        text: String,
    },
    Box {
        width: i64,
        height: i64,
        radius: Radius,
        color: Rgb8,
        border: Option<(i64, Rgb8)>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Radius {
    Circle,
    Px(i64),
}

/// Animated object property, in emission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimProperty {
    X,
    Y,
    Width,
    Height,
    Rotation,
    Opacity,
    StrokeWidth,
}

impl AnimProperty {
    pub const ALL: [Self; 7] = [
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::Rotation,
        Self::Opacity,
        Self::StrokeWidth,
    ];

    /// Value in the target's units (tenths of a degree, `0..=255` opacity).
    pub fn value(self, shape: &Shape) -> f64 {
        match self {
            Self::X => shape.x,
            Self::Y => shape.y,
            Self::Width => shape.width,
            Self::Height => shape.height,
            Self::Rotation => shape.rotation * 10.0,
            Self::Opacity => shape.style.opacity * 255.0,
            Self::StrokeWidth => shape.style.stroke_width,
        }
    }

    pub fn exec_cb(self) -> &'static str {
        match self {
            Self::X => "lv_obj_set_x",
            Self::Y => "lv_obj_set_y",
            Self::Width => "lv_obj_set_width",
            Self::Height => "lv_obj_set_height",
            Self::Rotation => "lv_obj_set_style_transform_rotation",
            Self::Opacity => "_lv_obj_set_bg_opa_anim",
            Self::StrokeWidth => "lv_obj_set_style_border_width",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyAnimation {
    pub var: String,
    pub property: AnimProperty,
    pub from: i64,
    pub to: i64,
    pub duration_ms: u32,
    pub delay_ms: u64,
}

/// Generated `<name>_native.c`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeArtifact {
    pub name: String,
    pub source: String,
}

impl NativeArtifact {
    pub fn file_name(&self) -> String {
        format!("{}_native.c", self.name)
    }
}

/// LVGL animation path for an easing; curves LVGL lacks map to linear.
pub fn lvgl_path(easing: Easing) -> &'static str {
    match easing {
        Easing::Linear => "lv_anim_path_linear",
        Easing::EaseIn => "lv_anim_path_ease_in",
        Easing::EaseOut => "lv_anim_path_ease_out",
        Easing::EaseInOut => "lv_anim_path_ease_in_out",
        Easing::Overshoot => "lv_anim_path_overshoot",
        Easing::Bounce => "lv_anim_path_bounce",
        Easing::Spring | Easing::Custom(_) => "lv_anim_path_linear",
    }
}

/// Lowers and prints the native state machine for `project`.
#[tracing::instrument(skip(project), fields(states = project.states().len()))]
pub fn emit_native(project: &Project, name: &str) -> StudioResult<NativeArtifact> {
    let program = lower_project(project, name)?;
    Ok(NativeArtifact {
        name: program.base.clone(),
        source: write_program(&program),
    })
}

pub fn lower_project(project: &Project, name: &str) -> StudioResult<NativeProgram> {
    let base = sanitize_c_name(name);
    let mut states = Vec::with_capacity(project.states().len());
    let mut idents: HashMap<String, &str> = HashMap::new();
    for state in project.states() {
        let lowered = lower_state(state);
        if let Some(other) = idents.insert(lowered.ident.clone(), &state.id) {
            return Err(StudioError::codegen(format!(
                "states '{other}' and '{}' map to the same C identifier '{}'",
                state.id, lowered.ident
            )));
        }
        states.push(lowered);
    }
    Ok(NativeProgram {
        base,
        easing: project.easing,
        states,
        initial_state: project.active_state_id().to_string(),
    })
}

fn lower_state(state: &State) -> NativeState {
    let frames = state.frames();

    // First appearance of every id, in frame then paint order.
    let mut order: Vec<(&ShapeId, usize, &Shape)> = Vec::new();
    for (fi, frame) in frames.iter().enumerate() {
        for shape in &frame.shapes {
            if !order.iter().any(|(id, _, _)| **id == shape.id) {
                order.push((&shape.id, fi, shape));
            }
        }
    }
    let vars: HashMap<&ShapeId, String> = order
        .iter()
        .enumerate()
        .map(|(i, (id, _, _))| (*id, format!("obj_{i}")))
        .collect();

    let objects = order
        .iter()
        .map(|(id, first, shape)| lower_object(vars[*id].clone(), shape, *first > 0))
        .collect();

    let mut animations = Vec::new();
    let mut delay_ms = 0u64;
    for pair in frames.windows(2) {
        let (f1, f2) = (&pair[0], &pair[1]);
        for s1 in &f1.shapes {
            let Some(s2) = f2.shapes.iter().find(|s| s.id == s1.id) else {
                continue;
            };
            for property in AnimProperty::ALL {
                let (v1, v2) = (property.value(s1), property.value(s2));
                if (v1 - v2).abs() > ANIMATION_EPSILON {
                    animations.push(PropertyAnimation {
                        var: vars[&s1.id].clone(),
                        property,
                        from: round_half_up(v1),
                        to: round_half_up(v2),
                        duration_ms: f1.duration_ms(),
                        delay_ms,
                    });
                }
            }
        }
        delay_ms += u64::from(f1.duration_ms());
    }

    NativeState {
        id: state.id.clone(),
        name: state.name.clone(),
        ident: sanitize_c_name(&state.id),
        objects,
        animations,
    }
}

fn lower_object(var: String, shape: &Shape, hidden: bool) -> NativeObject {
    let style = &shape.style;
    let widget = match &shape.payload {
        ShapePayload::Text { text, .. } => Widget::Label { text: text.clone() },
        _ => Widget::Box {
            width: round_half_up(shape.width),
            height: round_half_up(shape.height),
            radius: if shape.shape_type() == ShapeType::Ellipse {
                Radius::Circle
            } else if style.corner_radius > 0.0 {
                Radius::Px(round_half_up(style.corner_radius))
            } else {
                Radius::Px(0)
            },
            color: style.color,
            border: (style.stroke_width > 0.0)
                .then(|| (round_half_up(style.stroke_width), style.stroke_color)),
        },
    };
    NativeObject {
        var,
        widget,
        x: round_half_up(shape.x),
        y: round_half_up(shape.y),
        opacity: round_half_up(style.opacity * 255.0),
        rotation: (shape.rotation != 0.0).then(|| round_half_up(shape.rotation * 10.0)),
        hidden,
        click_target: shape
            .interaction
            .as_ref()
            .filter(|i| i.is_click())
            .map(|i| i.target_state_id.clone()),
    }
}

/// Prints a lowered program in the LVGL 8/9 object API.
pub fn write_program(program: &NativeProgram) -> String {
    let base = &program.base;
    let mut out = format!(
        r#"/**
 * @file {base}_native.c
 * @brief Auto-generated Native LVGL state machine from Robot Face Studio
 */
#include "lvgl/lvgl.h"

// Forward declarations
static lv_obj_t * face_container = NULL;
void {base}_switch_state(const char * state_id);

// Interaction callback
static void interaction_cb(lv_event_t * e) {{
    const char * next_state = (const char *)lv_event_get_user_data(e);
    if (next_state) {{
        {base}_switch_state(next_state);
    }}
}}

// Helper to set bg opacity for animations
static void _lv_obj_set_bg_opa_anim(void * obj, int32_t v) {{
    lv_obj_set_style_bg_opa((lv_obj_t*)obj, v, 0);
}}

"#
    );

    let path = lvgl_path(program.easing);
    for state in &program.states {
        write_state(&mut out, state, path);
    }

    out.push_str(&format!("void {base}_switch_state(const char * state_id) {{\n"));
    out.push_str("    if (!face_container) return;\n");
    out.push_str("    lv_obj_clean(face_container);\n");
    for (i, state) in program.states.iter().enumerate() {
        let cond = if i == 0 { "if" } else { "else if" };
        out.push_str(&format!(
            "    {cond} (strcmp(state_id, \"{}\") == 0) create_state_{}(face_container);\n",
            c_string_literal(&state.id),
            state.ident
        ));
    }
    out.push_str("}\n\n");

    out.push_str(&format!("void init_{base}(lv_obj_t * parent) {{\n"));
    out.push_str("    face_container = lv_obj_create(parent);\n");
    out.push_str("    lv_obj_set_size(face_container, LV_PCT(100), LV_PCT(100));\n");
    out.push_str("    lv_obj_set_style_bg_opa(face_container, 0, 0);\n");
    out.push_str("    lv_obj_set_style_border_width(face_container, 0, 0);\n");
    out.push_str(&format!(
        "    {base}_switch_state(\"{}\");\n",
        c_string_literal(&program.initial_state)
    ));
    out.push_str("}\n");
    out
}

fn write_state(out: &mut String, state: &NativeState, path: &str) {
    let title = state.name.replace(['\n', '\r'], " ");
    out.push_str(&format!("// --- State: {title} ---\n"));
    out.push_str(&format!(
        "static void create_state_{}(lv_obj_t * parent) {{\n",
        state.ident
    ));
    for obj in &state.objects {
        out.push_str(&format!("    lv_obj_t * {} = NULL;\n", obj.var));
    }
    for obj in &state.objects {
        write_object(out, obj);
    }
    for a in &state.animations {
        out.push_str(&format!(
            "    {{ lv_anim_t a; lv_anim_init(&a); lv_anim_set_var(&a, {var}); \
             lv_anim_set_values(&a, {from}, {to}); lv_anim_set_time(&a, {dur}); \
             lv_anim_set_delay(&a, {delay}); lv_anim_set_exec_cb(&a, (lv_anim_exec_xcb_t){cb}); \
             lv_anim_set_path_cb(&a, {path}); lv_anim_start(&a); }}\n",
            var = a.var,
            from = a.from,
            to = a.to,
            dur = a.duration_ms,
            delay = a.delay_ms,
            cb = a.property.exec_cb(),
        ));
    }
    out.push_str("}\n\n");
}

fn write_object(out: &mut String, obj: &NativeObject) {
    let var = &obj.var;
    match &obj.widget {
        Widget::Label { text } => {
            out.push_str(&format!("    {var} = lv_label_create(parent);\n"));
            out.push_str(&format!(
                "    lv_label_set_text({var}, \"{}\");\n",
                c_string_literal(text)
            ));
        }
        Widget::Box {
            width,
            height,
            radius,
            color,
            border,
        } => {
            out.push_str(&format!("    {var} = lv_obj_create(parent);\n"));
            out.push_str(&format!("    lv_obj_set_size({var}, {width}, {height});\n"));
            let radius = match radius {
                Radius::Circle => "LV_RADIUS_CIRCLE".to_string(),
                Radius::Px(r) => r.to_string(),
            };
            out.push_str(&format!("    lv_obj_set_style_radius({var}, {radius}, 0);\n"));
            out.push_str(&format!(
                "    lv_obj_set_style_bg_color({var}, lv_color_hex(0x{}), 0);\n",
                hex_digits(*color)
            ));
            match border {
                Some((w, c)) => {
                    out.push_str(&format!("    lv_obj_set_style_border_width({var}, {w}, 0);\n"));
                    out.push_str(&format!(
                        "    lv_obj_set_style_border_color({var}, lv_color_hex(0x{}), 0);\n",
                        hex_digits(*c)
                    ));
                }
                None => out.push_str(&format!("    lv_obj_set_style_border_width({var}, 0, 0);\n")),
            }
        }
    }
    out.push_str(&format!("    lv_obj_set_pos({var}, {}, {});\n", obj.x, obj.y));
    out.push_str(&format!("    lv_obj_set_style_bg_opa({var}, {}, 0);\n", obj.opacity));
    if let Some(rot) = obj.rotation {
        out.push_str(&format!(
            "    lv_obj_set_style_transform_rotation({var}, {rot}, 0);\n"
        ));
    }
    if obj.hidden {
        out.push_str(&format!("    lv_obj_add_flag({var}, LV_OBJ_FLAG_HIDDEN);\n"));
    }
    if let Some(target) = &obj.click_target {
        out.push_str(&format!("    lv_obj_add_flag({var}, LV_OBJ_FLAG_CLICKABLE);\n"));
        out.push_str(&format!(
            "    lv_obj_add_event_cb({var}, interaction_cb, LV_EVENT_CLICKED, (void*)\"{}\");\n",
            c_string_literal(target)
        ));
    }
}

fn hex_digits(c: Rgb8) -> String {
    format!("{:06x}", c.to_u32())
}

#[cfg(test)]
#[path = "../../tests/unit/codegen/native.rs"]
mod tests;
