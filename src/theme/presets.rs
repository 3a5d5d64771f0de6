use std::sync::Arc;

use egui::{Color32, FontId};
use lazy_static::lazy_static;

use super::{BlurStyle, MenuTheme};

const SYSTEM_BLUE: Color32 = Color32::from_rgb(0, 122, 255);
const MENU_FONT_SIZE: f32 = 16.0;

fn gesture_bar() -> Color32 {
    Color32::from_rgba_unmultiplied(36, 36, 36, 43)
}

lazy_static! {
    /// Frosted light theme with dark text.
    pub static ref LIGHT: Arc<MenuTheme> = Arc::new(MenuTheme {
        font: FontId::proportional(MENU_FONT_SIZE),
        blur: Some(BlurStyle::Light),
        shadow_color: Color32::BLACK,
        shadow_opacity: 0.3,
        shadow_radius: 7.0,

        menu_text_color: Color32::BLACK,
        menu_background_color: Color32::from_white_alpha(38),
        gesture_bar_tint: gesture_bar(),

        content_text_color: Color32::BLACK,
        highlighted_text_color: Color32::WHITE,
        highlighted_background_color: SYSTEM_BLUE,
        content_background_color: Color32::from_white_alpha(38),
        separator_color: Color32::from_black_alpha(26),
    });

    /// Frosted dark theme with light text.
    pub static ref DARK: Arc<MenuTheme> = Arc::new(MenuTheme {
        font: FontId::proportional(MENU_FONT_SIZE),
        blur: Some(BlurStyle::Dark),
        shadow_color: Color32::BLACK,
        shadow_opacity: 0.3,
        shadow_radius: 7.0,

        menu_text_color: Color32::WHITE,
        menu_background_color: Color32::TRANSPARENT,
        gesture_bar_tint: gesture_bar(),

        content_text_color: Color32::WHITE,
        highlighted_text_color: Color32::WHITE,
        highlighted_background_color: SYSTEM_BLUE,
        content_background_color: Color32::TRANSPARENT,
        separator_color: Color32::from_white_alpha(102),
    });

    /// Opaque blue theme, no blur.
    pub static ref PLAIN: Arc<MenuTheme> = Arc::new(MenuTheme {
        font: FontId::proportional(MENU_FONT_SIZE),
        blur: None,
        shadow_color: Color32::BLACK,
        shadow_opacity: 0.3,
        shadow_radius: 7.0,

        menu_text_color: Color32::WHITE,
        menu_background_color: Color32::BLUE,
        gesture_bar_tint: gesture_bar(),

        content_text_color: Color32::WHITE,
        highlighted_text_color: Color32::WHITE,
        highlighted_background_color: SYSTEM_BLUE,
        content_background_color: Color32::BLUE,
        separator_color: Color32::WHITE,
    });
}
