use egui::{Align2, Color32, CornerRadius, Painter, Pos2, Rect, Shadow, Stroke, Vec2, pos2, vec2};

use crate::menu::button::ButtonChrome;
use crate::menu::items::MenuItem;
use crate::menu::panel::ContentPanel;
use crate::utils::rounded_corners::corner_radius_for;

const GESTURE_BAR_SIZE: Vec2 = Vec2::new(24.0, 4.0);
const HIGHLIGHT_INSET: f32 = 4.0;

/// Paint a closed button into `rect`.
///
/// Nothing is painted while `effect_hidden` is set, the open panel's tab
/// covers the button then.
pub fn paint_chrome(
    painter: &Painter,
    rect: Rect,
    chrome: &ButtonChrome,
    title: &str,
    effect_hidden: bool,
    corner_radius: f32,
) {
    if effect_hidden {
        return;
    }

    let radius = CornerRadius::same(corner_radius_for(rect, corner_radius));
    if let Some(blur) = chrome.blur {
        painter.rect_filled(rect, radius, blur.backdrop());
    }
    painter.rect_filled(rect, radius, chrome.tint);

    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        title,
        chrome.font.clone(),
        chrome.title_color,
    );

    let bar = Rect::from_center_size(pos2(rect.center().x, rect.max.y - 5.0), GESTURE_BAR_SIZE);
    painter.rect_filled(bar, CornerRadius::same(2), chrome.gesture_bar_color);
}

/// Paint `panel` with its top-left corner at `origin`, faded by `opacity`.
pub fn paint_panel(painter: &Painter, panel: &ContentPanel, origin: Pos2, opacity: f32) {
    let style = panel.style();
    let metrics = panel.metrics();
    let offset = origin.to_vec2();
    let fade = |color: Color32| color.gamma_multiply(opacity);
    let parts = panel.shape().parts();

    let shadow = Shadow {
        color: fade(style.shadow.color),
        ..style.shadow
    };
    for (rect, radius) in parts {
        if rect.height() > 0.0 {
            painter.add(shadow.as_shape(rect.translate(offset), radius));
        }
    }
    for (rect, radius) in parts {
        if rect.height() <= 0.0 {
            continue;
        }
        let rect = rect.translate(offset);
        if let Some(blur) = style.blur {
            painter.rect_filled(rect, radius, fade(blur.backdrop()));
        }
        painter.rect_filled(rect, radius, fade(style.background_color));
    }

    let tab = panel.geometry().tab.translate(offset);
    painter.text(
        tab.center(),
        Align2::CENTER_CENTER,
        panel.title(),
        style.font.clone(),
        fade(style.text_color),
    );

    let padding = metrics.horizontal_padding;
    for (index, (item, slot)) in panel
        .items()
        .iter()
        .zip(&panel.geometry().slots)
        .enumerate()
    {
        let rect = slot.rect().translate(offset);
        match item {
            MenuItem::Separator => {
                painter.hline(
                    rect.min.x + padding..=rect.max.x - padding,
                    rect.center().y,
                    Stroke::new(1.0, fade(style.separator_color)),
                );
            }
            MenuItem::Action(action) => {
                let text_color = if panel.highlighted() == Some(index) {
                    painter.rect_filled(
                        rect.shrink2(vec2(HIGHLIGHT_INSET, 0.0)),
                        CornerRadius::same(HIGHLIGHT_INSET as u8),
                        fade(style.highlighted_background_color),
                    );
                    style.highlighted_text_color
                } else {
                    style.text_color
                };

                painter.text(
                    pos2(rect.min.x + padding, rect.center().y),
                    Align2::LEFT_CENTER,
                    &action.label,
                    style.font.clone(),
                    fade(text_color),
                );
                if let Some(shortcut) = &action.shortcut {
                    painter.text(
                        pos2(rect.max.x - padding, rect.center().y),
                        Align2::RIGHT_CENTER,
                        shortcut.to_string(),
                        style.font.clone(),
                        fade(text_color.gamma_multiply(0.6)),
                    );
                }
            }
        }
    }
}
