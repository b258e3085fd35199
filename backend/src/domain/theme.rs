//! Static theme catalogue.
//!
//! Pure configuration data: an immutable lookup table with a stable default
//! entry. Profiles reference a theme by id; unknown ids resolve to the
//! default so stale records keep rendering.

use serde::Serialize;
use utoipa::ToSchema;

/// Identifier of the theme applied to new profiles.
pub const DEFAULT_THEME_ID: &str = "default";

/// A selectable visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Stable identifier stored on profiles.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// One-line description shown in the picker.
    pub description: &'static str,
    /// Page background CSS classes.
    pub background_css: &'static str,
    /// Font stack CSS class.
    pub font_family: &'static str,
    /// Button CSS classes.
    pub button_style: &'static str,
    /// Card CSS classes.
    pub card_style: &'static str,
}

const THEMES: &[Theme] = &[
    Theme {
        id: DEFAULT_THEME_ID,
        name: "Default",
        description: "Clean and minimal design",
        background_css: "bg-white dark:bg-gray-900",
        font_family: "font-sans",
        button_style: "rounded-md bg-primary text-white hover:bg-primary/90",
        card_style: "bg-white dark:bg-gray-800 shadow-sm",
    },
    Theme {
        id: "dark",
        name: "Dark Mode",
        description: "Sleek dark interface",
        background_css: "bg-gray-900",
        font_family: "font-sans",
        button_style: "rounded-md bg-blue-600 text-white hover:bg-blue-700",
        card_style: "bg-gray-800 shadow-md",
    },
    Theme {
        id: "gradient-purple",
        name: "Purple Gradient",
        description: "Vibrant purple gradient background",
        background_css: "bg-gradient-to-br from-purple-500 to-pink-500",
        font_family: "font-sans",
        button_style: "rounded-md bg-white/20 backdrop-blur-sm border border-white/30 text-white",
        card_style: "bg-white/10 backdrop-blur-sm",
    },
    Theme {
        id: "gradient-ocean",
        name: "Ocean Gradient",
        description: "Calm blue-green gradient",
        background_css: "bg-gradient-to-br from-cyan-500 to-blue-600",
        font_family: "font-sans",
        button_style: "rounded-full bg-white/20 backdrop-blur-sm text-white",
        card_style: "bg-white/10 backdrop-blur-sm",
    },
    Theme {
        id: "minimal-mono",
        name: "Minimal Mono",
        description: "Black on white with monospace type",
        background_css: "bg-white",
        font_family: "font-mono",
        button_style: "border border-black text-black hover:bg-black hover:text-white",
        card_style: "border border-gray-200",
    },
    Theme {
        id: "sunset",
        name: "Sunset",
        description: "Warm orange and pink tones",
        background_css: "bg-gradient-to-br from-orange-400 to-rose-500",
        font_family: "font-serif",
        button_style: "rounded-lg bg-white text-rose-600 hover:bg-rose-50",
        card_style: "bg-white/20 backdrop-blur-sm",
    },
];

/// Every available theme, default first.
pub fn all() -> &'static [Theme] {
    THEMES
}

/// Look up a theme by id, falling back to the default entry.
pub fn by_id(id: &str) -> &'static Theme {
    THEMES
        .iter()
        .find(|theme| theme.id == id)
        .unwrap_or_else(|| default_theme())
}

/// Whether `id` names a catalogue entry.
pub fn is_known(id: &str) -> bool {
    THEMES.iter().any(|theme| theme.id == id)
}

fn default_theme() -> &'static Theme {
    // The catalogue always carries the default entry first.
    THEMES
        .first()
        .unwrap_or_else(|| panic!("theme catalogue must not be empty"))
}
