//! Anchor geometry: placing a floating panel next to its anchor.
//!
//! [`resolve`] is a pure function over plain rectangles. It never touches a
//! host, so every placement rule can be tested with literal numbers.

/// Default margin between the anchor and the panel, and between the panel and
/// the viewport edges.
pub const DEFAULT_GAP: f64 = 8.0;

/// An axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// A rect with a non-positive (or non-finite) dimension has not been laid out.
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// Whether the point lies inside the rect (edges on the top/left are inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(known(self.width) && known(self.height))
    }
}

/// The side of the anchor the panel should open on.
///
/// This is a preference: the resolved position is clamped into the viewport,
/// and only flips to the opposite side when [`PositionOptions::flip`] is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Placement {
    pub fn opposite(self) -> Self {
        match self {
            Placement::Top => Placement::Bottom,
            Placement::Bottom => Placement::Top,
            Placement::Left => Placement::Right,
            Placement::Right => Placement::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Placement::Top | Placement::Bottom)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Placement::Top => "top",
            Placement::Bottom => "bottom",
            Placement::Left => "left",
            Placement::Right => "right",
        }
    }
}

/// Tuning for [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    /// Distance from the anchor and minimum distance from viewport edges.
    pub gap: f64,
    /// For top/bottom placements: align the panel's left edge with the anchor
    /// and give it the anchor's width (select-style dropdowns).
    pub match_anchor_width: bool,
    /// Flip to the opposite side when the preferred side does not fit and the
    /// opposite one does. Off by default.
    pub flip: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            match_anchor_width: false,
            flip: false,
        }
    }
}

/// Where the panel ends up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedPosition {
    pub top: f64,
    pub left: f64,
    /// Set when the panel must take the anchor's width.
    pub width: Option<f64>,
    /// The side actually used (differs from the request only after a flip).
    pub placement: Placement,
}

/// Compute the panel's viewport position.
///
/// The unclamped position follows the requested placement; each axis is then
/// clamped so the panel stays `gap` pixels inside the viewport. An axis whose
/// panel or viewport dimension is unknown (zero, negative or non-finite) is
/// left unclamped, so a panel that has not been laid out yet never produces
/// `NaN` coordinates.
pub fn resolve(
    anchor: Rect,
    panel: Size,
    placement: Placement,
    viewport: Size,
    options: &PositionOptions,
) -> ResolvedPosition {
    let mut panel = panel;
    let width = if options.match_anchor_width && placement.is_vertical() {
        panel.width = anchor.width;
        Some(anchor.width)
    } else {
        None
    };

    let placement = if options.flip {
        choose_side(anchor, panel, placement, viewport, options.gap)
    } else {
        placement
    };

    let (top, left) = unclamped(anchor, panel, placement, options);
    let left = clamp_axis(left, panel.width, viewport.width, options.gap);
    let top = clamp_axis(top, panel.height, viewport.height, options.gap);

    ResolvedPosition {
        top,
        left,
        width,
        placement,
    }
}

fn unclamped(anchor: Rect, panel: Size, placement: Placement, options: &PositionOptions) -> (f64, f64) {
    let gap = options.gap;
    let horizontal = if options.match_anchor_width {
        anchor.left
    } else {
        anchor.left + anchor.width / 2.0 - half(panel.width)
    };
    let vertical = anchor.top + anchor.height / 2.0 - half(panel.height);

    match placement {
        Placement::Bottom => (anchor.bottom() + gap, horizontal),
        Placement::Top => (anchor.top - dim(panel.height) - gap, horizontal),
        Placement::Left => (vertical, anchor.left - dim(panel.width) - gap),
        Placement::Right => (vertical, anchor.right() + gap),
    }
}

fn clamp_axis(start: f64, extent: f64, available: f64, gap: f64) -> f64 {
    if !known(extent) || !known(available) {
        return start;
    }
    let mut start = start;
    if start < gap {
        start = gap;
    }
    if start + extent > available - gap {
        start = available - extent - gap;
    }
    start
}

fn choose_side(anchor: Rect, panel: Size, preferred: Placement, viewport: Size, gap: f64) -> Placement {
    if panel.is_empty() || viewport.is_empty() {
        return preferred;
    }
    let room = |side: Placement| match side {
        Placement::Bottom => viewport.height - anchor.bottom() - gap * 2.0 >= panel.height,
        Placement::Top => anchor.top - gap * 2.0 >= panel.height,
        Placement::Right => viewport.width - anchor.right() - gap * 2.0 >= panel.width,
        Placement::Left => anchor.left - gap * 2.0 >= panel.width,
    };
    if !room(preferred) && room(preferred.opposite()) {
        preferred.opposite()
    } else {
        preferred
    }
}

fn known(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn dim(value: f64) -> f64 {
    if known(value) {
        value
    } else {
        0.0
    }
}

fn half(value: f64) -> f64 {
    dim(value) / 2.0
}
