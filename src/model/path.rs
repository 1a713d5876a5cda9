use kurbo::{Affine, BezPath, Point};

use crate::foundation::core::Bounds;

/// Design-space box the path is drawn in; scaled onto the shape bounds.
pub const PATH_DESIGN_WIDTH: f64 = 100.0;
pub const PATH_DESIGN_HEIGHT: f64 = 100.0;
/// Vertical extent the node editor maps handles into.
pub const PATH_EDIT_HEIGHT: f64 = 60.0;

/// One editable command of a path outline, in absolute design-space coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathNode {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    CurveTo { c1: Point, c2: Point, to: Point },
    Close,
}

/// Which point of a node an edit addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeHandle {
    End,
    Ctrl1,
    Ctrl2,
}

impl PathNode {
    fn arity(cmd: char) -> Option<usize> {
        match cmd {
            'M' | 'L' => Some(2),
            'Q' => Some(4),
            'C' => Some(6),
            'Z' | 'z' => Some(0),
            _ => None,
        }
    }

    fn from_args(cmd: char, a: &[f64]) -> Option<Self> {
        let p = |i: usize| Point::new(a[i], a[i + 1]);
        Some(match cmd {
            'M' => Self::MoveTo(p(0)),
            'L' => Self::LineTo(p(0)),
            'Q' => Self::QuadTo {
                ctrl: p(0),
                to: p(2),
            },
            'C' => Self::CurveTo {
                c1: p(0),
                c2: p(2),
                to: p(4),
            },
            'Z' | 'z' => Self::Close,
            _ => return None,
        })
    }

    pub fn point(&self, handle: NodeHandle) -> Option<Point> {
        match (*self, handle) {
            (Self::MoveTo(p) | Self::LineTo(p), NodeHandle::End) => Some(p),
            (Self::QuadTo { ctrl, .. }, NodeHandle::Ctrl1) => Some(ctrl),
            (Self::QuadTo { to, .. }, NodeHandle::End) => Some(to),
            (Self::CurveTo { c1, .. }, NodeHandle::Ctrl1) => Some(c1),
            (Self::CurveTo { c2, .. }, NodeHandle::Ctrl2) => Some(c2),
            (Self::CurveTo { to, .. }, NodeHandle::End) => Some(to),
            _ => None,
        }
    }

    fn point_mut(&mut self, handle: NodeHandle) -> Option<&mut Point> {
        match (self, handle) {
            (Self::MoveTo(p) | Self::LineTo(p), NodeHandle::End) => Some(p),
            (Self::QuadTo { ctrl, .. }, NodeHandle::Ctrl1) => Some(ctrl),
            (Self::QuadTo { to, .. }, NodeHandle::End) => Some(to),
            (Self::CurveTo { c1, .. }, NodeHandle::Ctrl1) => Some(c1),
            (Self::CurveTo { c2, .. }, NodeHandle::Ctrl2) => Some(c2),
            (Self::CurveTo { to, .. }, NodeHandle::End) => Some(to),
            _ => None,
        }
    }

    fn write_to(&self, out: &mut String) {
        use std::fmt::Write as _;
        // Writing into a String cannot fail.
        let _ = match self {
            Self::MoveTo(p) => write!(out, "M{},{}", p.x, p.y),
            Self::LineTo(p) => write!(out, "L{},{}", p.x, p.y),
            Self::QuadTo { ctrl, to } => write!(out, "Q{},{} {},{}", ctrl.x, ctrl.y, to.x, to.y),
            Self::CurveTo { c1, c2, to } => write!(
                out,
                "C{},{} {},{} {},{}",
                c1.x, c1.y, c2.x, c2.y, to.x, to.y
            ),
            Self::Close => write!(out, "Z"),
        };
    }
}

/// Parses the `M`/`L`/`Q`/`C`/`Z` subset of SVG path data.
///
/// Arguments may be separated by commas or whitespace. Unknown commands and
/// commands with too few arguments are skipped; surplus arguments repeat the
/// command (`M` continues as `L`).
pub fn parse_path_data(data: &str) -> Vec<PathNode> {
    let mut nodes = Vec::new();
    let mut chars = data.char_indices().peekable();
    let mut segments: Vec<(char, &str)> = Vec::new();
    while let Some((start, c)) = chars.next() {
        if !c.is_ascii_alphabetic() || c == 'e' || c == 'E' {
            continue;
        }
        let mut end = data.len();
        while let Some(&(i, n)) = chars.peek() {
            if n.is_ascii_alphabetic() && n != 'e' && n != 'E' {
                end = i;
                break;
            }
            chars.next();
        }
        segments.push((c, &data[start + c.len_utf8()..end]));
    }

    for (cmd, rest) in segments {
        let Some(arity) = PathNode::arity(cmd) else {
            continue;
        };
        if arity == 0 {
            nodes.push(PathNode::Close);
            continue;
        }
        let args: Vec<f64> = rest
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<f64>().ok())
            .collect();
        let mut cmd = cmd;
        for chunk in args.chunks_exact(arity) {
            if let Some(node) = PathNode::from_args(cmd, chunk) {
                nodes.push(node);
            }
            if cmd == 'M' {
                cmd = 'L';
            }
        }
    }
    nodes
}

/// Inverse of [`parse_path_data`]: commands joined by single spaces.
pub fn format_path_data(nodes: &[PathNode]) -> String {
    let mut out = String::new();
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        node.write_to(&mut out);
    }
    out
}

/// Vector outline of a path shape plus its editable node list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathGeometry {
    data: String,
    nodes: Vec<PathNode>,
    pub mirrored: bool,
}

impl PathGeometry {
    pub fn from_data(data: impl Into<String>) -> Self {
        let data = data.into();
        let nodes = parse_path_data(&data);
        Self {
            data,
            nodes,
            mirrored: false,
        }
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.data.trim().is_empty()
    }

    /// Replaces the node list and regenerates the path data from it.
    pub fn set_nodes(&mut self, nodes: Vec<PathNode>) {
        self.data = format_path_data(&nodes);
        self.nodes = nodes;
    }

    pub fn to_bezpath(&self) -> BezPath {
        let mut path = BezPath::new();
        for node in &self.nodes {
            match *node {
                PathNode::MoveTo(p) => path.move_to(p),
                PathNode::LineTo(p) => path.line_to(p),
                PathNode::QuadTo { ctrl, to } => path.quad_to(ctrl, to),
                PathNode::CurveTo { c1, c2, to } => path.curve_to(c1, c2, to),
                PathNode::Close => path.close_path(),
            }
        }
        path
    }

    /// Maps design space onto `bounds`, flipping horizontally when mirrored.
    pub fn design_to_canvas(&self, bounds: &Bounds) -> Affine {
        self.box_transform(bounds, PATH_DESIGN_HEIGHT)
    }

    fn box_transform(&self, bounds: &Bounds, design_height: f64) -> Affine {
        let place = if self.mirrored {
            Affine::translate((bounds.x + bounds.width, bounds.y))
                * Affine::scale_non_uniform(-1.0, 1.0)
        } else {
            Affine::translate((bounds.x, bounds.y))
        };
        place
            * Affine::scale_non_uniform(
                bounds.width / PATH_DESIGN_WIDTH,
                bounds.height / design_height,
            )
    }

    /// Canvas position of a node handle as shown by the node editor.
    pub fn handle_position(&self, bounds: &Bounds, index: usize, handle: NodeHandle) -> Option<Point> {
        let p = self.nodes.get(index)?.point(handle)?;
        Some(self.box_transform(bounds, PATH_EDIT_HEIGHT) * p)
    }

    /// Moves a node handle to a canvas position. Returns `false` if the handle does not exist
    /// or the box is degenerate.
    pub fn move_handle(&mut self, bounds: &Bounds, index: usize, handle: NodeHandle, to: Point) -> bool {
        if bounds.width == 0.0 || bounds.height == 0.0 {
            return false;
        }
        let inv = self.box_transform(bounds, PATH_EDIT_HEIGHT).inverse();
        let mut nodes = self.nodes.clone();
        let Some(slot) = nodes.get_mut(index).and_then(|n| n.point_mut(handle)) else {
            return false;
        };
        *slot = inv * to;
        self.set_nodes(nodes);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/path.rs"]
mod tests;
