//! Layout planning for the e-ink panel.
//!
//! The planner is pure: it consumes the device state, the projected events
//! and a measure-only view of the draw surface, and emits a [`RenderPlan`]
//! of absolutely positioned text lines and rules. The hardware shell (or
//! the host simulator) executes the plan; nothing here touches a panel.

pub mod planner;

pub use planner::RenderPlanner;

/// Font tiers available on the draw surface, strictly decreasing in size
/// from top to bottom of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontTier {
    /// Doubled-scale numerals for the date itself.
    Date,
    /// Weekday header.
    Title,
    /// Largest auto-scale tier, also the event-list header.
    Large,
    /// Middle auto-scale tier.
    Medium,
    /// Smallest tier; footer and list body. Accepted unconditionally as the
    /// auto-scale fallback of last resort.
    Small,
}

/// Auto-scale candidates for the today-event line, tried in order.
pub const AUTOSCALE_TIERS: [FontTier; 3] = [FontTier::Large, FontTier::Medium, FontTier::Small];

/// Rendered bounding box of a string: left-side bearing reported by the
/// glyph metrics, and total width in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBounds {
    pub offset_x: i32,
    pub width: u32,
}

/// Measure-only capability of the draw surface; the one piece of "display"
/// the planner needs, kept as a trait so tests run with fixed metrics.
pub trait TextMetrics {
    fn measure(&self, text: &str, tier: FontTier) -> TextBounds;
}

/// Usable panel dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSpec {
    /// The 4.2" 400x300 panel this device ships with.
    pub const EPD_4IN2: SurfaceSpec = SurfaceSpec {
        width: 400,
        height: 300,
    };
}

/// One positioned string. `x`/`y` address the text baseline origin the way
/// the draw surface's cursor does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub tier: FontTier,
}

/// Horizontal rule between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub from: (i32, i32),
    pub to: (i32, i32),
}

/// Everything one full-window refresh paints.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    pub lines: Vec<TextLine>,
    pub rules: Vec<Rule>,
}
