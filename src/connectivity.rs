//! Feed connectivity and how it is presented in the header badge.

use ratatui::style::Color;

use crate::palette;

/// Whether the live data feed is reachable.
///
/// There is deliberately no third "connecting" state: the badge always shows
/// one of two presentations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connectivity {
    Live,
    Disconnected,
}

impl Connectivity {
    pub fn is_live(self) -> bool {
        matches!(self, Connectivity::Live)
    }

    pub fn toggled(self) -> Self {
        match self {
            Connectivity::Live => Connectivity::Disconnected,
            Connectivity::Disconnected => Connectivity::Live,
        }
    }

    pub fn presentation(self) -> BadgePresentation {
        match self {
            Connectivity::Live => BadgePresentation {
                label: "LIVE FEED",
                tone: Tone::Success,
                pulse: true,
            },
            Connectivity::Disconnected => BadgePresentation {
                label: "DISCONNECTED",
                tone: Tone::Alert,
                pulse: false,
            },
        }
    }
}

impl From<bool> for Connectivity {
    fn from(is_connected: bool) -> Self {
        if is_connected {
            Connectivity::Live
        } else {
            Connectivity::Disconnected
        }
    }
}

/// A flag that may not have been reported yet. Anything other than an
/// explicit `true` is treated as disconnected.
impl From<Option<bool>> for Connectivity {
    fn from(flag: Option<bool>) -> Self {
        Connectivity::from(flag == Some(true))
    }
}

/// What the badge shows for a given [`Connectivity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgePresentation {
    pub label: &'static str,
    pub tone: Tone,
    /// Dot blinks continuously.
    pub pulse: bool,
}

impl BadgePresentation {
    /// Width of the widest label, so the badge keeps its footprint across
    /// state changes.
    pub fn max_label_width() -> usize {
        [Connectivity::Live, Connectivity::Disconnected]
            .iter()
            .map(|c| c.presentation().label.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Semantic color family of the badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Success,
    Alert,
}

impl Tone {
    pub fn swatch(self) -> Swatch {
        let (base, text) = match self {
            Tone::Success => (palette::emerald(), palette::emerald_light()),
            Tone::Alert => (palette::rose(), palette::rose_light()),
        };
        Swatch {
            background: palette::mix(base, palette::surface(), 0.10),
            border: palette::mix(base, palette::surface(), 0.20),
            text,
            dot: base,
        }
    }
}

/// Concrete colors for one tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub background: Color,
    pub border: Color,
    pub text: Color,
    pub dot: Color,
}

impl Swatch {
    /// Interpolate every color from `self` towards `to`.
    pub fn blend(self, to: Swatch, progress: f32) -> Swatch {
        Swatch {
            background: palette::mix(to.background, self.background, progress),
            border: palette::mix(to.border, self.border, progress),
            text: palette::mix(to.text, self.text, progress),
            dot: palette::mix(to.dot, self.dot, progress),
        }
    }
}
