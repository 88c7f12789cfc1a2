//! Button layout and hit-testing.
//!
//! ```text
//!  (600,100) ┌───────────────────────────────────┐
//!            │ display strip (not clickable)     │
//!  (600,200) ├──────┬──────┬──────┬──────┬──────┤
//!            │  7   │  8   │  9   │  ^   │  (   │
//!            ├──────┼──────┼──────┼──────┼──────┤
//!            │  4   │  5   │  6   │  *   │  )   │
//!            ├──────┼──────┼──────┼──────┼──────┤
//!            │  1   │  2   │  3   │  -   │ DEL  │
//!            ├──────┼──────┼──────┼──────┼──────┤
//!            │  0   │  .   │  /   │  +   │  =   │
//!            └──────┴──────┴──────┼──────┴──────┤
//!                                 │    CLEAR    │
//!                                 └─────────────┘
//! ```
//!
//! Containment is inclusive on all four edges, so neighbouring cells share
//! their boundary pixels; a shared pixel belongs to whichever region comes
//! first in layout order.  Interiors never overlap.

use crate::projector::Point;

// ════════════════════════════════════════════════════════════════════════════
// Rect / Region
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x:      i32,
    pub y:      i32,
    pub width:  i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    /// Inclusive on both edges: `x <= px <= x + width`.
    pub fn contains(&self, p: Point) -> bool {
        self.x <= p.x && p.x <= self.x + self.width
            && self.y <= p.y && p.y <= self.y + self.height
    }

    /// True when the open interiors intersect (shared edges don't count).
    pub fn overlaps_interior(&self, other: &Rect) -> bool {
        self.x < other.x + other.width && other.x < self.x + self.width
            && self.y < other.y + other.height && other.y < self.y + self.height
    }

    /// Whether every pixel of the rect, far edges included, lies on a
    /// `width`×`height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0
            && i64::from(self.x) + i64::from(self.width) < i64::from(width)
            && i64::from(self.y) + i64::from(self.height) < i64::from(height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// A labelled button.  Immutable once the layout is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    rect:  Rect,
    value: String,
}

impl Region {
    pub fn new(rect: Rect, value: &str) -> Self {
        Region { rect, value: value.to_string() }
    }

    pub fn rect(&self)  -> Rect { self.rect }
    pub fn value(&self) -> &str { &self.value }

    pub fn contains(&self, p: Point) -> bool { self.rect.contains(p) }
}

// ════════════════════════════════════════════════════════════════════════════
// LayoutSpec
// ════════════════════════════════════════════════════════════════════════════

/// Recipe for a layout: a grid of equal cells plus free-standing buttons.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSpec {
    /// Top-left corner of the grid.
    pub origin: (i32, i32),
    /// Cell width and height.
    pub cell:   (i32, i32),
    /// Row-major button values.
    pub rows:   Vec<Vec<String>>,
    /// Buttons outside the grid, appended after it in this order.
    pub extras: Vec<(Rect, String)>,
    /// Where the expression text is shown.
    pub display: Rect,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        let rows = [
            ["7", "8", "9", "^", "("],
            ["4", "5", "6", "*", ")"],
            ["1", "2", "3", "-", "DEL"],
            ["0", ".", "/", "+", "="],
        ];
        LayoutSpec {
            origin: (600, 200),
            cell:   (80, 80),
            rows:   rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            extras:  vec![(Rect::new(840, 520, 160, 80), "CLEAR".to_string())],
            display: Rect::new(600, 100, 400, 100),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Layout
// ════════════════════════════════════════════════════════════════════════════

/// Ordered, read-only set of buttons.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    regions: Vec<Region>,
    display: Rect,
}

/// Build the regions described by `spec`.
///
/// Overlapping interiors are a layout bug and trip a debug assertion.
pub fn build_layout(spec: &LayoutSpec) -> Layout {
    let (ox, oy) = spec.origin;
    let (cw, ch) = spec.cell;

    let mut regions = Vec::new();
    for (row, values) in spec.rows.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            let rect = Rect::new(ox + cw * col as i32, oy + ch * row as i32, cw, ch);
            regions.push(Region::new(rect, value));
        }
    }
    for (rect, value) in &spec.extras {
        regions.push(Region::new(*rect, value));
    }

    let layout = Layout { regions, display: spec.display };
    debug_assert!(
        layout.overlapping_pair().is_none(),
        "layout regions overlap: {:?}",
        layout.overlapping_pair()
    );
    layout
}

impl Layout {
    pub fn regions(&self) -> &[Region] { &self.regions }
    pub fn display(&self) -> Rect { self.display }
    pub fn get(&self, index: usize) -> Option<&Region> { self.regions.get(index) }
    pub fn len(&self) -> usize { self.regions.len() }
    pub fn is_empty(&self) -> bool { self.regions.is_empty() }

    /// Index of the first region containing `point`.
    pub fn hit_index(&self, point: Option<Point>) -> Option<usize> {
        let p = point?;
        self.regions.iter().position(|r| r.contains(p))
    }

    /// First region containing `point`, or `None` when nothing is hit or
    /// there is no point.
    pub fn hit_test(&self, point: Option<Point>) -> Option<&Region> {
        self.hit_index(point).map(|i| &self.regions[i])
    }

    /// First pair of regions whose interiors overlap, if any.
    pub fn overlapping_pair(&self) -> Option<(usize, usize)> {
        for (i, a) in self.regions.iter().enumerate() {
            for (j, b) in self.regions.iter().enumerate().skip(i + 1) {
                if a.rect.overlaps_interior(&b.rect) {
                    return Some((i, j));
                }
            }
        }
        None
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
