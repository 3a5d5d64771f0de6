use egui::{Pos2, Rect};

use crate::menu::button::GestureEvent;

/// Transparent capture layer covering the whole presentation surface while a
/// panel is open.
///
/// It lets a drag that started on the small button keep reporting once the
/// pointer has left the button. It holds no state of its own beyond where
/// the owning button sits, and every event it captures is handed back to the
/// button translated into the button's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlaySurface {
    bounds: Rect,
    button_origin: Pos2,
}

impl OverlaySurface {
    /// Overlay spanning `bounds`, forwarding to a button whose top-left
    /// corner sits at `button_origin` (both in surface coordinates).
    pub fn new(bounds: Rect, button_origin: Pos2) -> Self {
        Self {
            bounds,
            button_origin,
        }
    }

    /// Extent of the overlay in surface coordinates.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Translate an event captured in surface coordinates into the button's
    /// local space, otherwise unchanged.
    pub fn forward(&self, event: GestureEvent) -> GestureEvent {
        GestureEvent {
            position: event.position - self.button_origin.to_vec2(),
            ..event
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::button::GesturePhase;
    use egui::{pos2, vec2};

    #[test]
    fn forward_translates_into_button_space() {
        let overlay = OverlaySurface::new(
            Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0)),
            pos2(20.0, 64.0),
        );
        let event = GestureEvent::new(GesturePhase::Move, pos2(120.0, 100.0), 1.5);
        let forwarded = overlay.forward(event);

        assert_eq!(forwarded.position, pos2(100.0, 36.0));
        assert_eq!(forwarded.phase, GesturePhase::Move);
        assert_eq!(forwarded.time, 1.5);
    }
}
