use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Rectangular wall surface the robot has to cover, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkArea {
    pub width: f64,
    pub height: f64,
}

impl WorkArea {
    pub fn new(width: f64, height: f64) -> DomainResult<Self> {
        let area = Self { width, height };
        area.validate()?;
        Ok(area)
    }

    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive("work area width", self.width)?;
        ensure_positive("work area height", self.height)
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox {
            min_x: 0.0,
            max_x: self.width,
            min_y: 0.0,
            max_y: self.height,
        }
    }
}

/// Axis-aligned rectangular obstacle given by its center and extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { name: None, x, y, w, h }
    }

    pub fn named(name: impl Into<String>, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { name: Some(name.into()), x, y, w, h }
    }

    pub fn validate(&self) -> DomainResult<()> {
        let label = self.name.as_deref().unwrap_or("unnamed");
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(DomainError::invalid(format!(
                "obstacle {} has a non-finite center",
                label
            )));
        }
        ensure_positive(&format!("obstacle {} width", label), self.w)?;
        ensure_positive(&format!("obstacle {} height", label), self.h)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min_x: self.x - self.w / 2.0,
            max_x: self.x + self.w / 2.0,
            min_y: self.y - self.h / 2.0,
            max_y: self.y + self.h / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Smallest box enclosing the segment between two points.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            max_x: x1.max(x2),
            min_y: y1.min(y2),
            max_y: y1.max(y2),
        }
    }

    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            max_x: self.max_x + margin,
            min_y: self.min_y - margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn center_x(&self) -> f64 {
        (self.min_x + self.max_x) / 2.0
    }

    /// True when the two boxes share interior area. Boxes that only touch along an
    /// edge, or a degenerate box lying on an edge, do not overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        spans_overlap(self.min_x, self.max_x, other.min_x, other.max_x)
            && spans_overlap(self.min_y, self.max_y, other.min_y, other.max_y)
    }

    /// Closed-box intersection; boxes touching along an edge count.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Closed span `[lo, hi]` against the open span `(min, max)`.
pub fn spans_overlap(lo: f64, hi: f64, min: f64, max: f64) -> bool {
    lo < max && hi > min
}

fn ensure_positive(what: &str, value: f64) -> DomainResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::invalid(format!(
            "{} must be a positive finite number, got {}",
            what, value
        )))
    }
}
