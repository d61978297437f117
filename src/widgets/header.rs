//! Dashboard status header: breadcrumb, feed badge and action cluster.
//!
//! The header is rebuilt from its inputs on every frame and keeps no state
//! of its own.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::connectivity::Connectivity;
use crate::palette;
use crate::widgets::badge::{Badge, Fade};

/// Rows the header always occupies: padding, content, bottom rule.
pub const HEIGHT: u16 = 3;

/// Breadcrumb shown until a router supplies its own trail.
pub const CRUMBS: &[&str] = &["Manufacturing", "Live Monitoring"];

const CRUMB_SEPARATOR: &str = " / ";
const BELL: &str = "⍾";
const MARKER: &str = "•";
const RULE: &str = "│";

const PAD_X: u16 = 2;
const GAP: u16 = 2;

/// Where each zone of the header lands inside a given area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    pub breadcrumb: Rect,
    pub badge: Rect,
    pub bell: Rect,
    pub marker: Rect,
    pub divider: Rect,
    pub spacer: Rect,
}

impl HeaderLayout {
    /// Lay out the zones right to left so the action cluster keeps a fixed
    /// position no matter which badge label is showing.
    ///
    /// When the area is too narrow, zones give way in order: breadcrumb,
    /// then both dividers, then the badge shrinks. Zones never overlap;
    /// dropped zones are empty rects.
    pub fn new(area: Rect) -> Self {
        let top = area.y;
        let row = if area.height >= 2 { area.y + 1 } else { area.y };
        let pad = PAD_X.min(area.width / 2);
        let left = area.x + pad;
        let mut x = area.right() - pad;

        let rules = 1 + GAP + 1 + GAP;
        let bell_w = 2;
        let full = rules + bell_w + GAP + Badge::max_width();

        let mut spacer = Rect::default();
        let mut divider = Rect::default();
        if x - left >= full {
            x -= 1;
            spacer = Rect::new(x, row, 1, 1);
            x -= GAP + 1;
            divider = Rect::new(x, top, 1, row - top + 1);
            x -= GAP;
        }

        let mut bell = Rect::default();
        let mut marker = Rect::default();
        if x - left >= bell_w {
            x -= 1;
            marker = Rect::new(x, row, 1, 1);
            x -= 1;
            bell = Rect::new(x, row, 1, 1);
        }

        let gap = if bell.is_empty() { 0 } else { GAP };
        let badge_w = Badge::max_width().min((x - left).saturating_sub(gap));
        let mut badge = Rect::default();
        if badge_w > 0 {
            x -= gap + badge_w;
            badge = Rect::new(x, row, badge_w, 1);
        }

        let crumbs_w = x.saturating_sub(GAP).saturating_sub(left);
        let breadcrumb = if crumbs_w > 0 {
            Rect::new(left, row, crumbs_w, 1)
        } else {
            Rect::default()
        };

        Self {
            breadcrumb,
            badge,
            bell,
            marker,
            divider,
            spacer,
        }
    }

    /// Whether a click at `pos` lands on the notification bell.
    pub fn hits_bell(&self, pos: Position) -> bool {
        self.bell.contains(pos) || self.marker.contains(pos)
    }
}

/// The header widget.
#[derive(Debug, Clone, Copy)]
pub struct StatusHeader<'a> {
    connectivity: Connectivity,
    crumbs: &'a [&'a str],
    fade: Option<Fade>,
}

impl<'a> StatusHeader<'a> {
    pub fn new(connectivity: Connectivity) -> Self {
        Self {
            connectivity,
            crumbs: CRUMBS,
            fade: None,
        }
    }

    pub fn crumbs(mut self, crumbs: &'a [&'a str]) -> Self {
        self.crumbs = crumbs;
        self
    }

    pub fn fade(mut self, fade: Option<Fade>) -> Self {
        self.fade = fade;
        self
    }

    fn breadcrumb(&self) -> Line<'a> {
        let mut spans = Vec::with_capacity(self.crumbs.len() * 2);
        let last = self.crumbs.len().saturating_sub(1);
        for (i, crumb) in self.crumbs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    CRUMB_SEPARATOR,
                    Style::default().fg(palette::faint()),
                ));
            }
            let style = if i == last {
                Style::default()
                    .fg(palette::white())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette::muted())
            };
            spans.push(Span::styled(*crumb, style));
        }
        Line::from(spans)
    }
}

impl Widget for StatusHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }

        buf.set_style(area, Style::default().bg(palette::surface()));
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(palette::rule()))
            .render(area, buf);

        let layout = HeaderLayout::new(area);

        if !layout.breadcrumb.is_empty() {
            self.breadcrumb().render(layout.breadcrumb, buf);
        }

        if !layout.badge.is_empty() {
            Badge::new(self.connectivity)
                .fade(self.fade)
                .render(layout.badge, buf);
        }

        if !layout.bell.is_empty() {
            buf.set_string(
                layout.bell.x,
                layout.bell.y,
                BELL,
                Style::default().fg(palette::muted()),
            );
        }

        // Unread marker is always on; there is no count source yet.
        if !layout.marker.is_empty() {
            buf.set_string(
                layout.marker.x,
                layout.marker.y,
                MARKER,
                Style::default().fg(palette::blue()),
            );
        }

        if !layout.divider.is_empty() {
            for y in layout.divider.top()..layout.divider.bottom() {
                buf.set_string(
                    layout.divider.x,
                    y,
                    RULE,
                    Style::default().fg(palette::rule()),
                );
            }
        }

        // Spacer reserves its column but never draws.
        if !layout.spacer.is_empty() {
            buf.set_string(
                layout.spacer.x,
                layout.spacer.y,
                " ",
                Style::default().bg(palette::surface()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    const LABELS: [&str; 2] = ["LIVE FEED", "DISCONNECTED"];

    fn area() -> Rect {
        Rect::new(0, 0, 80, HEIGHT)
    }

    fn render(header: StatusHeader<'_>) -> Buffer {
        let mut buf = Buffer::empty(area());
        header.render(area(), &mut buf);
        buf
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn content(buf: &Buffer) -> String {
        row(buf, 1)
    }

    #[test]
    fn exactly_one_label_for_each_state() {
        for c in [Connectivity::Live, Connectivity::Disconnected] {
            let text = content(&render(StatusHeader::new(c)));
            let shown: Vec<_> = LABELS.iter().filter(|l| text.contains(*l)).collect();
            assert_eq!(shown, vec![&c.presentation().label]);
        }
    }

    #[test]
    fn live_header() {
        let buf = render(StatusHeader::new(Connectivity::Live));
        let text = content(&buf);
        assert!(text.contains("( ● LIVE FEED )"));

        let x = text.chars().position(|c| c == '●').expect("dot") as u16;
        let dot = &buf[(x, 1)];
        assert_eq!(dot.fg, palette::emerald());
        assert!(dot.modifier.contains(Modifier::SLOW_BLINK));
    }

    #[test]
    fn disconnected_header() {
        let buf = render(StatusHeader::new(Connectivity::Disconnected));
        let text = content(&buf);
        assert!(text.contains("( ● DISCONNECTED )"));

        let x = text.chars().position(|c| c == '●').expect("dot") as u16;
        let dot = &buf[(x, 1)];
        assert_eq!(dot.fg, palette::rose());
        assert!(!dot.modifier.contains(Modifier::SLOW_BLINK));
    }

    #[test]
    fn rendering_is_idempotent() {
        for c in [Connectivity::Live, Connectivity::Disconnected] {
            assert_eq!(render(StatusHeader::new(c)), render(StatusHeader::new(c)));
        }
    }

    #[test]
    fn toggling_swaps_label_and_pulse() {
        let off = render(StatusHeader::new(Connectivity::Disconnected));
        let on = render(StatusHeader::new(Connectivity::Disconnected.toggled()));
        assert!(content(&off).contains("DISCONNECTED"));
        assert!(content(&on).contains("LIVE FEED"));
        assert!(!content(&on).contains("DISCONNECTED"));

        let back = render(StatusHeader::new(Connectivity::Live.toggled()));
        assert_eq!(back, off);
    }

    #[test]
    fn breadcrumb_trail() {
        let buf = render(StatusHeader::new(Connectivity::Live));
        let text = content(&buf);
        assert!(text.starts_with("  Manufacturing / Live Monitoring"));

        let layout = HeaderLayout::new(area());
        let first = &buf[(layout.breadcrumb.x, 1)];
        assert_eq!(first.fg, palette::muted());
        let current = &buf[(layout.breadcrumb.x + 16, 1)];
        assert_eq!(current.symbol(), "L");
        assert_eq!(current.fg, palette::white());
    }

    #[test]
    fn custom_crumbs() {
        let crumbs = ["Plant 7", "Line B", "Press 3"];
        let buf = render(StatusHeader::new(Connectivity::Live).crumbs(&crumbs));
        assert!(content(&buf).contains("Plant 7 / Line B / Press 3"));
    }

    #[test]
    fn marker_present_in_both_states() {
        let layout = HeaderLayout::new(area());
        for c in [Connectivity::Live, Connectivity::Disconnected] {
            let buf = render(StatusHeader::new(c));
            assert_eq!(buf[(layout.bell.x, layout.bell.y)].symbol(), BELL);
            let marker = &buf[(layout.marker.x, layout.marker.y)];
            assert_eq!(marker.symbol(), MARKER);
            assert_eq!(marker.fg, palette::blue());
            assert_eq!(content(&buf).matches(MARKER).count(), 1);
        }
    }

    #[test]
    fn spacer_never_visible() {
        let layout = HeaderLayout::new(area());
        for c in [Connectivity::Live, Connectivity::Disconnected] {
            let buf = render(StatusHeader::new(c));
            let spacer = &buf[(layout.spacer.x, layout.spacer.y)];
            assert_eq!(spacer.symbol(), " ");
            assert_eq!(spacer.fg, Color::Reset);
        }
    }

    #[test]
    fn one_visible_divider() {
        let buf = render(StatusHeader::new(Connectivity::Live));
        assert_eq!(content(&buf).matches(RULE).count(), 1);
        let layout = HeaderLayout::new(area());
        assert_eq!(buf[(layout.divider.x, 1)].symbol(), RULE);
        assert_eq!(layout.spacer.x, layout.divider.x + GAP + 1);
    }

    #[test]
    fn bottom_rule_spans_width() {
        let buf = render(StatusHeader::new(Connectivity::Disconnected));
        assert!(row(&buf, 2).chars().all(|c| c == '─'));
    }

    #[test]
    fn cluster_does_not_move_between_states() {
        let a = HeaderLayout::new(area());
        let live = content(&render(StatusHeader::new(Connectivity::Live)));
        let down = content(&render(StatusHeader::new(Connectivity::Disconnected)));
        let bell = |s: &str| s.chars().position(|c| c == '⍾');
        assert_eq!(bell(&live), Some(a.bell.x as usize));
        assert_eq!(bell(&down), Some(a.bell.x as usize));
    }

    #[test]
    fn fade_tints_badge_with_previous_tone() {
        let fade = Some(Fade {
            from: crate::connectivity::Tone::Alert.swatch(),
            progress: 0.0,
        });
        let buf = render(StatusHeader::new(Connectivity::Live).fade(fade));
        let text = content(&buf);
        assert!(text.contains("LIVE FEED"));
        let x = text.chars().position(|c| c == '●').expect("dot") as u16;
        assert_eq!(buf[(x, 1)].fg, palette::rose());
    }

    #[test]
    fn bell_hit_testing() {
        let layout = HeaderLayout::new(area());
        assert!(layout.hits_bell(Position::new(layout.bell.x, 1)));
        assert!(layout.hits_bell(Position::new(layout.marker.x, 1)));
        assert!(!layout.hits_bell(Position::new(layout.bell.x, 0)));
        assert!(!layout.hits_bell(Position::new(layout.divider.x, 1)));
        assert!(!layout.hits_bell(Position::new(layout.badge.x, 1)));
    }

    fn zones(layout: &HeaderLayout) -> [Rect; 6] {
        [
            layout.breadcrumb,
            layout.badge,
            layout.bell,
            layout.marker,
            layout.divider,
            layout.spacer,
        ]
    }

    #[test]
    fn zones_never_overlap_when_narrow() {
        for width in 0..=40 {
            let area = Rect::new(3, 2, width, HEIGHT);
            let layout = HeaderLayout::new(area);
            let shown: Vec<Rect> = zones(&layout)
                .into_iter()
                .filter(|r| !r.is_empty())
                .collect();
            for (i, a) in shown.iter().enumerate() {
                assert_eq!(a.intersection(area), *a, "zone {a:?} leaks out at width {width}");
                for b in &shown[i + 1..] {
                    assert!(!a.intersects(*b), "{a:?} overlaps {b:?} at width {width}");
                }
            }
        }
    }

    #[test]
    fn narrow_header_keeps_whole_label() {
        for width in 20..=40 {
            let area = Rect::new(0, 0, width, HEIGHT);
            for c in [Connectivity::Live, Connectivity::Disconnected] {
                let mut buf = Buffer::empty(area);
                StatusHeader::new(c).render(area, &mut buf);
                let text = row(&buf, 1);
                let shown: Vec<_> = LABELS.iter().filter(|l| text.contains(*l)).collect();
                assert_eq!(shown, vec![&c.presentation().label], "width {width}: {text:?}");
                assert_eq!(text.matches(MARKER).count(), 1, "width {width}: {text:?}");
            }
        }
    }

    #[test]
    fn dividers_give_way_before_badge() {
        let layout = HeaderLayout::new(Rect::new(0, 0, 27, HEIGHT));
        assert!(layout.divider.is_empty());
        assert!(layout.spacer.is_empty());
        assert!(layout.breadcrumb.is_empty());
        assert_eq!(layout.badge.width, Badge::max_width());
        assert!(!layout.bell.is_empty());

        let layout = HeaderLayout::new(Rect::new(0, 0, 32, HEIGHT));
        assert!(!layout.divider.is_empty());
        assert!(!layout.spacer.is_empty());
    }

    #[test]
    fn tiny_areas_do_not_panic() {
        for (w, h) in [(0, 0), (1, 1), (10, 1), (25, 2), (40, 3)] {
            let area = Rect::new(0, 0, w, h);
            let mut buf = Buffer::empty(area);
            StatusHeader::new(Connectivity::Live).render(area, &mut buf);
        }
    }
}
