//! Panel draw surface: font tiers, text measurement and plan execution.
//!
//! The five logical font tiers map to u8g2 outline fonts sized for the
//! 400x300 panel. `FontTable` implements the measure-only capability the
//! planner consumes; `paint` replays a finished plan into the frame buffer
//! (clear, draw everything, single full-window commit done by the caller).

use anyhow::{anyhow, Result};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use epd_waveshare::color::Color;
use epd_waveshare::epd4in2::Display4in2;
use u8g2_fonts::types::{FontColor, VerticalPosition};
use u8g2_fonts::{fonts, FontRenderer};

use ekalendarz::render::{FontTier, RenderPlan, TextBounds, TextMetrics};

/// One renderer per tier, strictly decreasing in size.
pub struct FontTable {
    date: FontRenderer,
    title: FontRenderer,
    large: FontRenderer,
    medium: FontRenderer,
    small: FontRenderer,
}

impl FontTable {
    pub fn new() -> Self {
        FontTable {
            date: FontRenderer::new::<fonts::u8g2_font_logisoso46_tf>(),
            title: FontRenderer::new::<fonts::u8g2_font_fub25_tf>(),
            large: FontRenderer::new::<fonts::u8g2_font_fub20_tf>(),
            medium: FontRenderer::new::<fonts::u8g2_font_fub14_tf>(),
            small: FontRenderer::new::<fonts::u8g2_font_fub11_tf>(),
        }
    }

    fn renderer(&self, tier: FontTier) -> &FontRenderer {
        match tier {
            FontTier::Date => &self.date,
            FontTier::Title => &self.title,
            FontTier::Large => &self.large,
            FontTier::Medium => &self.medium,
            FontTier::Small => &self.small,
        }
    }
}

impl TextMetrics for FontTable {
    fn measure(&self, text: &str, tier: FontTier) -> TextBounds {
        let dimensions = self
            .renderer(tier)
            .get_rendered_dimensions(text, Point::zero(), VerticalPosition::Baseline);
        match dimensions {
            Ok(dims) => match dims.bounding_box {
                Some(bounds) => TextBounds {
                    offset_x: bounds.top_left.x,
                    width: bounds.size.width,
                },
                // Whitespace-only string: no ink, nothing to center.
                None => TextBounds::default(),
            },
            Err(_) => TextBounds::default(),
        }
    }
}

/// Replays `plan` into the frame buffer. The caller commits the buffer to
/// the panel afterwards.
pub fn paint(display: &mut Display4in2, plan: &RenderPlan, fonts: &FontTable) -> Result<()> {
    display.clear(Color::White)?;

    let stroke = PrimitiveStyle::with_stroke(Color::Black, 1);
    for rule in &plan.rules {
        Line::new(
            Point::new(rule.from.0, rule.from.1),
            Point::new(rule.to.0, rule.to.1),
        )
        .into_styled(stroke)
        .draw(display)?;
    }

    for line in &plan.lines {
        fonts
            .renderer(line.tier)
            .render(
                line.text.as_str(),
                Point::new(line.x, line.y),
                VerticalPosition::Baseline,
                FontColor::Transparent(Color::Black),
                display,
            )
            .map_err(|err| anyhow!("text render failed: {err:?}"))?;
    }

    Ok(())
}
