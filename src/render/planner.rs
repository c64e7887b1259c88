//! The two panel layouts and their placement rules.

use crate::cycle::{DeviceState, DisplayMode};
use crate::events::projector::ProjectedEvent;
use crate::locale::Locale;
use crate::render::{
    FontTier, RenderPlan, Rule, SurfaceSpec, TextLine, TextMetrics, AUTOSCALE_TIERS,
};

/// Side margin shared by the full-width rules and the auto-scale width limit.
const MARGIN: i32 = 20;

// Calendar layout baselines.
const WEEKDAY_BASELINE: i32 = 38;
const HEADER_RULE_Y: i32 = 48;
const DATE_BASELINE: i32 = 125;
const TODAY_EVENT_BASELINE: i32 = 200;
const FOOTER_RULE_Y: i32 = 230;
const FOOTER_START: i32 = 252;
const FOOTER_PITCH: i32 = 20;

// Event-list layout baselines.
const LIST_HEADER_BASELINE: i32 = 35;
const LIST_RULE_Y: i32 = 45;
const LIST_BODY_START: i32 = 70;
const LIST_PITCH: i32 = 25;
/// The short separator under the today line spans this x range.
const LIST_SEPARATOR_X: (i32, i32) = (100, 300);
/// No line starts once the running baseline passes height minus this.
const LIST_BOTTOM_MARGIN: i32 = 10;

/// Lays out one frame for a given surface, metrics source and word table.
pub struct RenderPlanner<'a, M: TextMetrics> {
    surface: SurfaceSpec,
    metrics: &'a M,
    locale: &'a Locale,
}

impl<'a, M: TextMetrics> RenderPlanner<'a, M> {
    pub fn new(surface: SurfaceSpec, metrics: &'a M, locale: &'a Locale) -> Self {
        RenderPlanner {
            surface,
            metrics,
            locale,
        }
    }

    /// Builds the full plan for the cycle: layout selected by the display
    /// mode, everything positioned and font-tiered.
    pub fn plan(
        &self,
        state: &DeviceState,
        today_event: Option<&str>,
        upcoming: &[ProjectedEvent],
    ) -> RenderPlan {
        match state.mode {
            DisplayMode::Calendar => self.calendar_layout(state, today_event, upcoming),
            DisplayMode::EventList => self.event_list_layout(today_event, upcoming),
        }
    }

    fn calendar_layout(
        &self,
        state: &DeviceState,
        today_event: Option<&str>,
        upcoming: &[ProjectedEvent],
    ) -> RenderPlan {
        let mut plan = RenderPlan::default();

        let weekday = self.locale.weekday_name(state.clock.weekday);
        plan.lines.push(self.centered(weekday, WEEKDAY_BASELINE, FontTier::Title));
        plan.rules.push(self.full_rule(HEADER_RULE_Y));

        plan.lines
            .push(self.centered(&state.clock.date_label(), DATE_BASELINE, FontTier::Date));

        if let Some(text) = today_event {
            plan.lines.push(self.autoscaled(text, TODAY_EVENT_BASELINE));
        }

        if !upcoming.is_empty() {
            plan.rules.push(self.full_rule(FOOTER_RULE_Y));
            let mut y = FOOTER_START;
            for event in upcoming {
                let line = self.locale.footer_line(event);
                plan.lines.push(self.centered(&line, y, FontTier::Small));
                y += FOOTER_PITCH;
            }
        }

        plan
    }

    fn event_list_layout(
        &self,
        today_event: Option<&str>,
        upcoming: &[ProjectedEvent],
    ) -> RenderPlan {
        let mut plan = RenderPlan::default();

        plan.lines.push(self.centered(
            self.locale.list_header,
            LIST_HEADER_BASELINE,
            FontTier::Large,
        ));
        plan.rules.push(self.full_rule(LIST_RULE_Y));

        let mut y = LIST_BODY_START;
        let today_line = self.locale.today_line(today_event);
        plan.lines.push(self.centered(&today_line, y, FontTier::Small));
        y += LIST_PITCH;

        plan.rules.push(Rule {
            from: (LIST_SEPARATOR_X.0, y - 10),
            to: (LIST_SEPARATOR_X.1, y - 10),
        });
        y += 15;

        let limit = self.surface.height as i32 - LIST_BOTTOM_MARGIN;
        for event in upcoming {
            let line = self.locale.list_line(event);
            plan.lines.push(self.centered(&line, y, FontTier::Small));
            y += LIST_PITCH;
            if y > limit {
                // Remaining entries are dropped, not wrapped.
                break;
            }
        }

        plan
    }

    /// Centers `text` by its rendered bounding box, compensating for the
    /// left-side bearing the metrics report.
    fn centered(&self, text: &str, y: i32, tier: FontTier) -> TextLine {
        let bounds = self.metrics.measure(text, tier);
        let x = (self.surface.width as i32 - bounds.width as i32) / 2 - bounds.offset_x;
        TextLine {
            text: text.to_string(),
            x,
            y,
            tier,
        }
    }

    /// Auto-scale: first tier whose measured width fits the limit wins; the
    /// smallest tier is taken unconditionally, overflow or not. The limit
    /// leaves one margin's width of slack (380 on the 400 px panel).
    fn autoscaled(&self, text: &str, y: i32) -> TextLine {
        let limit = self.surface.width - MARGIN as u32;
        let (head, last) = AUTOSCALE_TIERS.split_at(AUTOSCALE_TIERS.len() - 1);
        for &tier in head {
            if self.metrics.measure(text, tier).width <= limit {
                return self.centered(text, y, tier);
            }
        }
        self.centered(text, y, last[0])
    }

    fn full_rule(&self, y: i32) -> Rule {
        Rule {
            from: (MARGIN, y),
            to: (self.surface.width as i32 - MARGIN, y),
        }
    }
}
