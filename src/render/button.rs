use egui::{Area, Context, Id, Order, Pos2, Rect, Response, Sense, Ui, vec2};
use tracing::warn;

use super::EguiTextMeasure;
use super::paint::{paint_chrome, paint_panel};
use crate::menu::button::{GestureEvent, GesturePhase, HitTarget, MenuButton, TransitionHandle};
use crate::menu::geometry::MeasureText;

impl MenuButton {
    /// Lay out, paint and drive the button inside `ui`.
    ///
    /// Call once per frame. The open panel is painted on a foreground
    /// [`Area`] covering the whole viewport, which also swallows pointer
    /// input meant for widgets underneath while the panel is up.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # fn demo(ui: &mut egui::Ui, menu: &mut egui_drag_menu::MenuButton) {
    /// ui.horizontal(|ui| {
    ///     menu.show(ui);
    /// });
    /// # }
    /// ```
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let ctx = ui.ctx().clone();
        let measure = EguiTextMeasure::new(ctx.clone());
        if !self.is_open() {
            self.set_text_measure(measure.clone());
        }

        let chrome = self.chrome();
        let title = self.title();
        let metrics = self.metrics();
        let size = vec2(
            measure.text_width(&title, &chrome.font) + metrics.horizontal_padding * 2.0,
            metrics.row_height,
        );
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        self.set_frame(rect);
        self.set_surface(Some(ctx.content_rect()));

        paint_chrome(
            ui.painter(),
            rect,
            &chrome,
            &title,
            self.is_effect_hidden(),
            metrics.corner_radius,
        );

        self.drive_pointer(&ctx, &response);
        self.show_overlay(&ctx);
        self.show_fading(&ctx);

        if self.is_open() || self.is_closing() {
            ctx.request_repaint();
        }
        response
    }

    fn drive_pointer(&mut self, ctx: &Context, response: &Response) {
        let (pressed, released, down, pos, time) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.interact_pos().or(i.pointer.latest_pos()),
                i.time,
            )
        });
        let Some(pos) = pos else {
            // Pointer left the viewport mid-drag; cancel over the tab, which selects nothing.
            if self.session().is_some() {
                let event = GestureEvent::new(GesturePhase::Cancel, self.frame().min, time);
                if let Err(err) = self.handle_overlay_event(event) {
                    warn!(id = %self.id(), %err, "menu gesture dropped");
                }
            }
            return;
        };

        let mut phases = Vec::with_capacity(2);
        if pressed {
            phases.push(GesturePhase::Press);
        }
        if released {
            phases.push(GesturePhase::Release);
        } else if down && !pressed && self.session().is_some() {
            phases.push(GesturePhase::Move);
        }

        for phase in phases {
            let event = GestureEvent::new(phase, pos, time);
            let result = if self.overlay().is_some() {
                self.handle_overlay_event(event)
            } else if phase == GesturePhase::Press && response.contains_pointer() {
                let local = pos - self.frame().min.to_vec2();
                if self.hit_test(local) == HitTarget::Button {
                    self.handle_gesture(GestureEvent::new(phase, local, time))
                } else {
                    Ok(())
                }
            } else {
                Ok(())
            };

            if let Err(err) = result {
                warn!(id = %self.id(), %err, "menu gesture dropped");
            }
        }
    }

    fn show_overlay(&self, ctx: &Context) {
        let (Some(overlay), Some(origin)) = (self.overlay(), self.panel_origin()) else {
            return;
        };
        let bounds = overlay.bounds();

        Area::new(Id::new(("drag_menu_overlay", self.id())))
            .fixed_pos(bounds.min)
            .order(Order::Foreground)
            .show(ctx, |ui| {
                let _ = ui.allocate_exact_size(bounds.size(), Sense::click_and_drag());
                self.with_panel(|panel| paint_panel(ui.painter(), panel, origin, 1.0));
            });
    }

    fn show_fading(&mut self, ctx: &Context) {
        let now = ctx.input(|i| i.time);
        let mut finished: Vec<TransitionHandle> = Vec::new();

        Area::new(Id::new(("drag_menu_fading", self.id())))
            .fixed_pos(Pos2::ZERO)
            .order(Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                self.for_each_fading(|fading| {
                    let id = Id::new(("drag_menu_fade_start", self.id(), fading.handle.id()));
                    let started = ctx.memory_mut(|m| *m.data.get_temp_mut_or_insert_with(id, || now));
                    let duration = f64::from(fading.handle.duration()).max(f64::EPSILON);
                    let opacity = 1.0 - ((now - started) / duration).clamp(0.0, 1.0) as f32;

                    if opacity <= 0.0 {
                        ctx.memory_mut(|m| m.data.remove::<f64>(id));
                        finished.push(fading.handle);
                    } else {
                        paint_panel(ui.painter(), &fading.panel, fading.origin, opacity);
                    }
                });
            });

        for handle in finished {
            if let Err(err) = self.complete_transition(handle) {
                warn!(id = %self.id(), %err, "fade finished twice");
            }
        }
    }

    /// Bounding box of the open panel in surface coordinates.
    pub fn panel_rect(&self) -> Option<Rect> {
        let origin = self.panel_origin()?;
        self.with_panel(|panel| Rect::from_min_size(origin, panel.geometry().size))
    }
}
