use std::fmt;

/// Stable shape identity, the join key for tweening across frames.
///
/// Project files written by older tools carry numeric ids (often fractional),
/// newer ones may carry strings. The textual form is kept verbatim together
/// with the JSON kind it was read as, so `7` and `"07"` stay distinct and each
/// is written back the way it came in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    raw: String,
    numeric: bool,
}

impl ShapeId {
    /// A string id.
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            numeric: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the id is a JSON number on the wire.
    pub fn is_numeric(&self) -> bool {
        self.numeric
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<u64> for ShapeId {
    fn from(value: u64) -> Self {
        Self {
            raw: value.to_string(),
            numeric: true,
        }
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<serde_json::Number> for ShapeId {
    fn from(value: serde_json::Number) -> Self {
        Self {
            raw: value.to_string(),
            numeric: true,
        }
    }
}

impl serde::Serialize for ShapeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.numeric
            && let Ok(n) = self.raw.parse::<serde_json::Number>()
        {
            return serde::Serialize::serialize(&n, serializer);
        }
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> serde::Deserialize<'de> for ShapeId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Number(n) => Self::from(n),
            Wire::Text(s) => Self::new(s),
        })
    }
}

/// Hands out fresh shape ids.
///
/// Owned by the editor session. After importing a project call
/// [`ShapeIdGen::observe`] for every existing id so new ids never collide.
#[derive(Clone, Debug)]
pub struct ShapeIdGen {
    next: u64,
}

impl Default for ShapeIdGen {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl ShapeIdGen {
    pub fn starting_at(next: u64) -> Self {
        Self { next: next.max(1) }
    }

    pub fn next_id(&mut self) -> ShapeId {
        let id = ShapeId::from(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    pub fn observe(&mut self, id: &ShapeId) {
        let floor = id
            .as_str()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.floor() as u64);
        if let Some(n) = floor
            && n >= self.next
        {
            self.next = n.saturating_add(1);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
