//! egui front end: text measurement, painting and pointer plumbing.
//!
//! Nothing in here owns menu state. [`MenuButton::show`] reads the pointer
//! from the egui context, turns it into [`GestureEvent`]s and paints whatever
//! the state machine currently holds.
//!
//! [`MenuButton::show`]: crate::MenuButton::show
//! [`GestureEvent`]: crate::GestureEvent

mod button;
mod paint;

use egui::{Color32, Context, FontId};

use crate::menu::geometry::MeasureText;

pub use paint::{paint_chrome, paint_panel};

/// Text measurement backed by the egui font system.
#[derive(Clone)]
pub struct EguiTextMeasure {
    ctx: Context,
}

impl EguiTextMeasure {
    /// Measure with the fonts of `ctx`.
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl MeasureText for EguiTextMeasure {
    fn text_width(&self, text: &str, font: &FontId) -> f32 {
        self.ctx.fonts_mut(|f| {
            f.layout_no_wrap(text.to_owned(), font.clone(), Color32::WHITE)
                .size()
                .x
        })
    }
}
