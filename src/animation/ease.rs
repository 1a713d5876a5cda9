/// Control points of a CSS-style cubic Bézier timing curve.
///
/// The curve runs from `(0,0)` to `(1,1)`; `p1`/`p2` are the inner control points.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CubicBezier {
    pub p1x: f64,
    pub p1y: f64,
    pub p2x: f64,
    pub p2y: f64,
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self {
            p1x: 0.42,
            p1y: 0.0,
            p2x: 0.58,
            p2y: 1.0,
        }
    }
}

impl CubicBezier {
    const NEWTON_ITERATIONS: usize = 8;
    const EPSILON: f64 = 1e-3;

    pub fn new(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Self {
        Self {
            p1x,
            p1y,
            p2x,
            p2y,
        }
    }

    /// Solves `x(s) = t` with Newton's method, then returns `y(s)`.
    ///
    /// Iteration stops early once the residual is below `1e-3`, or when the
    /// slope gets that flat; in the latter case the current estimate is kept.
    pub fn solve(&self, t: f64) -> f64 {
        let cx = 3.0 * self.p1x;
        let bx = 3.0 * (self.p2x - self.p1x) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * self.p1y;
        let by = 3.0 * (self.p2y - self.p1y) - cy;
        let ay = 1.0 - cy - by;

        let sample_x = |s: f64| ((ax * s + bx) * s + cx) * s;
        let sample_y = |s: f64| ((ay * s + by) * s + cy) * s;
        let slope_x = |s: f64| (3.0 * ax * s + 2.0 * bx) * s + cx;

        let mut s = t;
        for _ in 0..Self::NEWTON_ITERATIONS {
            let x = sample_x(s) - t;
            if x.abs() < Self::EPSILON {
                break;
            }
            let d = slope_x(s);
            if d.abs() < Self::EPSILON {
                break;
            }
            s -= x / d;
        }
        sample_y(s)
    }
}

/// Timing curve applied to the normalized progress within a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Pulls back before accelerating in.
    Overshoot,
    Bounce,
    /// Damped oscillation settling at 1; overshoots slightly at the end.
    Spring,
    Custom(CubicBezier),
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::Overshoot => 2.70158 * t * t * t - 1.70158 * t * t,
            Self::Bounce => bounce(t),
            Self::Spring => 1.0 - (-5.0 * t).exp() * (10.0 * t).cos(),
            Self::Custom(curve) => curve.solve(t),
        }
    }

    /// Name used in project files; custom curves store their points separately.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::Overshoot => "overshoot",
            Self::Bounce => "bounce",
            Self::Spring => "spring",
            Self::Custom(_) => "custom",
        }
    }

    /// Unknown names resolve to linear.
    pub fn from_name(name: &str, custom: Option<CubicBezier>) -> Self {
        match name {
            "ease-in" => Self::EaseIn,
            "ease-out" => Self::EaseOut,
            "ease-in-out" => Self::EaseInOut,
            "overshoot" => Self::Overshoot,
            "bounce" => Self::Bounce,
            "spring" => Self::Spring,
            "custom" => Self::Custom(custom.unwrap_or_default()),
            _ => Self::Linear,
        }
    }

    pub fn custom_curve(self) -> Option<CubicBezier> {
        match self {
            Self::Custom(c) => Some(c),
            _ => None,
        }
    }
}

fn bounce(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
