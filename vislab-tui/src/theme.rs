//! Neon-on-charcoal palette and the styles derived from it.
//!
//! - **Accent**: electric cyan (focus, titles)
//! - **Positive**: neon green (long leg, positive series)
//! - **Negative**: hot pink (short leg, negated series)
//! - **Neutral**: cool purple (combined leg, arcs)
//! - **Muted**: steel blue (axes, hints)

use ratatui::style::{Color, Modifier, Style};
use vislab_core::signals::Leg;
use vislab_core::Direction;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    pub fn leg_color(&self, leg: Leg) -> Color {
        match leg {
            Leg::Long => self.positive,
            Leg::Short => self.negative,
            Leg::Combined => self.neutral,
        }
    }

    pub fn direction_color(&self, direction: Direction) -> Color {
        match direction {
            Direction::Positive => self.positive,
            Direction::Negative => self.negative,
        }
    }

    /// Above 1 is a winning leg.
    pub fn pf_color(&self, pf: f64) -> Color {
        match pf {
            p if p.is_infinite() => self.accent,
            p if p > 1.0 => self.positive,
            p if p == 1.0 => self.neutral,
            p if p > 0.0 => self.negative,
            _ => self.muted,
        }
    }

    pub fn panel_border(&self, active: bool) -> Style {
        if active {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn panel_title(&self, active: bool) -> Style {
        self.panel_border(active).add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn accent_bold(&self) -> Style {
        self.accent().add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Secondary text, e.g. descriptions next to key hints.
    pub fn secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    /// Fill for the panel area.
    pub fn canvas(&self) -> Style {
        Style::default().bg(self.background)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }
}
