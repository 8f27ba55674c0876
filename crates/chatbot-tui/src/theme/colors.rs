//! Colour palettes for the chat widget.
//!
//! Both palettes share the same layout and differ only in their accent
//! family, so swapping one for the other never changes behaviour.

use chatbot_engine::ThemeVariant;
use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // Backgrounds
    pub base: Color,
    pub surface: Color,

    // Foregrounds
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,

    // Accent (launcher, title bar, send hint)
    pub accent: Color,
    pub on_accent: Color,

    // Senders
    pub me: Color,
    pub ai: Color,

    // Semantic
    pub error: Color,
    pub link: Color,
    pub code: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::crimson()
    }
}

impl Theme {
    /// Dark palette with a red accent (default).
    pub fn crimson() -> Self {
        Self {
            base: Color::Rgb(24, 24, 27),    // #18181b
            surface: Color::Rgb(39, 39, 42), // #27272a

            text: Color::Rgb(228, 228, 231),    // #e4e4e7
            subtext: Color::Rgb(161, 161, 170), // #a1a1aa
            muted: Color::Rgb(113, 113, 122),   // #71717a

            accent: Color::Rgb(220, 38, 38),     // #dc2626
            on_accent: Color::Rgb(254, 242, 242), // #fef2f2

            me: Color::Rgb(248, 113, 113), // #f87171
            ai: Color::Rgb(228, 228, 231), // #e4e4e7

            error: Color::Rgb(251, 146, 60), // #fb923c
            link: Color::Rgb(96, 165, 250),  // #60a5fa
            code: Color::Rgb(252, 165, 165), // #fca5a5

            border: Color::Rgb(63, 63, 70),         // #3f3f46
            border_focused: Color::Rgb(220, 38, 38), // #dc2626
        }
    }

    /// Same layout as [`Theme::crimson`] with an amber accent.
    pub fn ember() -> Self {
        Self {
            base: Color::Rgb(28, 25, 23),    // #1c1917
            surface: Color::Rgb(41, 37, 36), // #292524

            text: Color::Rgb(231, 229, 228),    // #e7e5e4
            subtext: Color::Rgb(168, 162, 158), // #a8a29e
            muted: Color::Rgb(120, 113, 108),   // #78716c

            accent: Color::Rgb(234, 88, 12),      // #ea580c
            on_accent: Color::Rgb(255, 247, 237), // #fff7ed

            me: Color::Rgb(251, 146, 60),  // #fb923c
            ai: Color::Rgb(231, 229, 228), // #e7e5e4

            error: Color::Rgb(248, 113, 113), // #f87171
            link: Color::Rgb(125, 211, 252),  // #7dd3fc
            code: Color::Rgb(253, 186, 116),  // #fdba74

            border: Color::Rgb(68, 64, 60),         // #44403c
            border_focused: Color::Rgb(234, 88, 12), // #ea580c
        }
    }

    /// Palette for a configured variant.
    pub fn from_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Crimson => Self::crimson(),
            ThemeVariant::Ember => Self::ember(),
        }
    }
}
