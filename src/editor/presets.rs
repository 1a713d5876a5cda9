use crate::foundation::config::StyleDefaults;
use crate::foundation::core::{Bounds, Canvas, Rgb8};
use crate::foundation::ids::ShapeIdGen;
use crate::model::path::PathGeometry;
use crate::model::shape::Shape;

pub const EYE_WIDTH: f64 = 120.0;
pub const EYE_HEIGHT: f64 = 100.0;
/// Horizontal gap between the canvas center and each eye.
pub const EYE_PADDING: f64 = 75.0;

/// Ready-made eye shapes, drawn as a mirrored pair of path shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EyePreset {
    Angry,
    Alert,
    Sad,
    Evil,
    Bean,
    Slit,
}

impl EyePreset {
    pub const ALL: [Self; 6] = [
        Self::Angry,
        Self::Alert,
        Self::Sad,
        Self::Evil,
        Self::Bean,
        Self::Slit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Angry => "angry",
            Self::Alert => "alert",
            Self::Sad => "sad",
            Self::Evil => "evil",
            Self::Bean => "bean",
            Self::Slit => "slit",
        }
    }

    /// Unknown names fall back to [`EyePreset::Sad`].
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(Self::Sad)
    }

    /// Outline in the 100x100 path design box.
    pub fn path_data(self) -> &'static str {
        match self {
            Self::Angry => "M0,60 Q50,15 100,60 Q50,95 0,60 Z",
            Self::Alert => {
                "M50,5 C80,5 100,35 100,65 C100,90 80,100 50,100 C20,100 0,90 0,65 C0,35 20,5 50,5 Z"
            }
            Self::Sad => "M10,15 Q50,5 90,15 Q100,50 90,85 Q50,95 10,85 Q0,50 10,15 Z",
            Self::Evil => "M0,50 Q50,25 100,50 Q50,75 0,50 Z",
            Self::Bean => "M2,50 L98,50 Q98,100 50,100 Q2,100 2,50 Z",
            Self::Slit => "M5,42 L95,42 Q100,42 100,50 Q100,58 95,58 L5,58 Q0,58 0,50 Q0,42 5,42 Z",
        }
    }

    /// Tilt in degrees for the left or right eye.
    pub fn rotation(self, right: bool) -> f64 {
        let left = match self {
            Self::Angry => 25.0,
            Self::Evil => 15.0,
            Self::Sad => -10.0,
            Self::Alert | Self::Bean | Self::Slit => 0.0,
        };
        if right { -left } else { left }
    }
}

/// Left and right eye for `preset`, centered vertically on the canvas.
///
/// The right eye is the mirrored one.
pub fn eye_pair(
    preset: EyePreset,
    canvas: Canvas,
    color: Rgb8,
    defaults: &StyleDefaults,
    ids: &mut ShapeIdGen,
) -> [Shape; 2] {
    let center = canvas.center();
    let y = center.y - EYE_HEIGHT / 2.0;
    let make = |right: bool, ids: &mut ShapeIdGen| {
        let x = if right {
            center.x + EYE_PADDING
        } else {
            center.x - EYE_PADDING - EYE_WIDTH
        };
        let mut geom = PathGeometry::from_data(preset.path_data());
        geom.mirrored = right;
        let mut eye = Shape::path(
            ids.next_id(),
            Bounds::new(x, y, EYE_WIDTH, EYE_HEIGHT),
            geom,
            defaults,
        );
        eye.style.color = color;
        eye.rotation = preset.rotation(right);
        eye
    };
    let left = make(false, ids);
    let right = make(true, ids);
    [left, right]
}

#[cfg(test)]
#[path = "../../tests/unit/editor/presets.rs"]
mod tests;
