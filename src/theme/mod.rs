//! Menu themes.
//!
//! A [`MenuTheme`] is an immutable bundle of colors, font and effect
//! parameters. Buttons and panels hold it behind an [`Arc`] and swap it
//! wholesale through [`Themeable::apply_theme`]; nothing ever mutates a theme
//! in place.

mod presets;

use std::sync::Arc;

use egui::{Color32, FontId, Shadow};

pub use presets::{DARK, LIGHT, PLAIN};

/// Something that can be restyled with a [`MenuTheme`].
pub trait Themeable {
    /// Replace the current theme and restyle immediately.
    fn apply_theme(&mut self, theme: &Arc<MenuTheme>);
}

/// Backdrop blur requested behind the button chrome and the panel.
///
/// egui has no real backdrop blur, so the renderer approximates each style
/// with a translucent wash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlurStyle {
    /// Very light frosted glass
    ExtraLight,
    /// Light frosted glass
    Light,
    /// Dark frosted glass
    Dark,
    /// Neutral frosted glass
    Regular,
}

impl BlurStyle {
    /// Fill used to approximate the blurred backdrop.
    pub fn backdrop(self) -> Color32 {
        match self {
            BlurStyle::ExtraLight => Color32::from_white_alpha(230),
            BlurStyle::Light => Color32::from_white_alpha(200),
            BlurStyle::Dark => Color32::from_black_alpha(190),
            BlurStyle::Regular => Color32::from_gray(128).gamma_multiply(0.75),
        }
    }
}

/// Colors, font and effects for a menu button and its panel.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuTheme {
    /// Font for the button title and the panel rows
    pub font: FontId,
    /// Backdrop blur, `None` for an opaque look
    pub blur: Option<BlurStyle>,
    /// Color of the panel shadow
    pub shadow_color: Color32,
    /// Opacity applied to `shadow_color`, in `0.0..=1.0`
    pub shadow_opacity: f32,
    /// Blur radius of the panel shadow in points
    pub shadow_radius: f32,

    /// Button title color
    pub menu_text_color: Color32,
    /// Tint drawn over the button backdrop
    pub menu_background_color: Color32,
    /// Color of the small grab bar under the button title
    pub gesture_bar_tint: Color32,

    /// Row text color
    pub content_text_color: Color32,
    /// Row text color while highlighted
    pub highlighted_text_color: Color32,
    /// Row fill while highlighted
    pub highlighted_background_color: Color32,
    /// Tint drawn over the panel backdrop
    pub content_background_color: Color32,
    /// Separator line color
    pub separator_color: Color32,
}

impl MenuTheme {
    /// Shared light theme.
    pub fn light() -> Arc<MenuTheme> {
        Arc::clone(&LIGHT)
    }

    /// Shared dark theme.
    pub fn dark() -> Arc<MenuTheme> {
        Arc::clone(&DARK)
    }

    /// Shared opaque blue theme without blur.
    pub fn plain() -> Arc<MenuTheme> {
        Arc::clone(&PLAIN)
    }

    /// Panel shadow in egui terms.
    pub fn shadow(&self) -> Shadow {
        Shadow {
            offset: [0, 2],
            blur: self.shadow_radius.clamp(0.0, u8::MAX as f32).round() as u8,
            spread: 0,
            color: self
                .shadow_color
                .gamma_multiply(self.shadow_opacity.clamp(0.0, 1.0)),
        }
    }
}

impl Default for MenuTheme {
    fn default() -> Self {
        LIGHT.as_ref().clone()
    }
}
