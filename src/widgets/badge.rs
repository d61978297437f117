use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::connectivity::{BadgePresentation, Connectivity, Swatch};
use crate::palette;

/// How long badge colors take to settle after the feed flips.
pub const TRANSITION: Duration = Duration::from_millis(300);

const DOT: &str = "●";

/// An in-flight color transition towards the current tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    /// Colors on screen when the flip happened. A flip in the middle of a
    /// fade starts from the half-blended colors, not from a pure tone.
    pub from: Swatch,
    /// 0.0 paints `from`, 1.0 paints the current tone.
    pub progress: f32,
}

impl Fade {
    /// The fade `elapsed` after a flip away from `from`, or `None` once it
    /// has finished.
    pub fn since(from: Swatch, elapsed: Duration) -> Option<Self> {
        if elapsed >= TRANSITION {
            return None;
        }
        Some(Self {
            from,
            progress: elapsed.as_secs_f32() / TRANSITION.as_secs_f32(),
        })
    }
}

/// Pill showing the feed state: `( ● LIVE FEED )`.
///
/// In a narrow area the pill drops its caps, then its dot, so the label
/// stays readable as long as possible.
#[derive(Debug, Clone, Copy)]
pub struct Badge {
    presentation: BadgePresentation,
    fade: Option<Fade>,
}

impl Badge {
    pub fn new(connectivity: Connectivity) -> Self {
        Self {
            presentation: connectivity.presentation(),
            fade: None,
        }
    }

    pub fn fade(mut self, fade: Option<Fade>) -> Self {
        self.fade = fade;
        self
    }

    /// Width this badge occupies for the current label.
    pub fn width(&self) -> u16 {
        Self::width_for(self.label_width())
    }

    /// Width that fits either label.
    pub fn max_width() -> u16 {
        Self::width_for(BadgePresentation::max_label_width())
    }

    fn label_width(&self) -> usize {
        self.presentation.label.chars().count()
    }

    fn width_for(label: usize) -> u16 {
        // "(" + " ● " + label + " " + ")"
        u16::try_from(label + 6).unwrap_or(u16::MAX)
    }

    /// Colors currently painted, mid-fade included.
    pub fn swatch(&self) -> Swatch {
        let target = self.presentation.tone.swatch();
        match self.fade {
            Some(fade) => fade.from.blend(target, fade.progress.clamp(0.0, 1.0)),
            None => target,
        }
    }
}

impl Widget for Badge {
    /// Right-aligned within `area` so the badge hugs the action cluster.
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let swatch = self.swatch();

        let edge = Style::default().fg(swatch.border).bg(palette::surface());
        let fill = Style::default().bg(swatch.background);
        let text = fill.fg(swatch.text).add_modifier(Modifier::BOLD);
        let mut dot = fill.fg(swatch.dot);
        if self.presentation.pulse {
            dot = dot.add_modifier(Modifier::SLOW_BLINK);
        }

        let label = self.presentation.label;
        let available = usize::from(area.width);
        let spans = if available >= usize::from(self.width()) {
            vec![
                Span::styled("(", edge),
                Span::styled(" ", fill),
                Span::styled(DOT, dot),
                Span::styled(" ", fill),
                Span::styled(label, text),
                Span::styled(" ", fill),
                Span::styled(")", edge),
            ]
        } else if available >= self.label_width() + 2 {
            vec![
                Span::styled(DOT, dot),
                Span::styled(" ", fill),
                Span::styled(label, text),
            ]
        } else {
            vec![Span::styled(label, text)]
        };

        let line = Line::from(spans);
        let width = u16::try_from(line.width())
            .unwrap_or(u16::MAX)
            .min(area.width);
        let x = area.x + area.width - width;
        line.render(Rect::new(x, area.y, width, 1), buf);
    }
}
