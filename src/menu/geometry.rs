//! Panel layout and the menu shape.
//!
//! Panel-local coordinates put the origin at the top-left corner of the
//! panel's bounding box. The top of the panel is a *tab* exactly the size of
//! the button it grows out of; the rows live in the *body* underneath.

use egui::{CornerRadius, FontId, Pos2, Rect, Vec2, pos2, vec2};

use crate::menu::items::MenuItem;
use crate::utils::rounded_corners::{corner_radius_for, rounded_rect_contains};

/// Which way the panel grows from its button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Right edges line up; the panel extends to the left
    Left,
    /// Centers line up
    Center,
    /// Left edges line up; the panel extends to the right
    #[default]
    Right,
}

/// Layout constants for the panel and timing constants for the gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuMetrics {
    /// Height of a selectable row
    pub row_height: f32,
    /// Height of the gap a separator occupies
    pub separator_height: f32,
    /// Space above the first and below the last row
    pub vertical_padding: f32,
    /// Space on each side of a row's text
    pub horizontal_padding: f32,
    /// Minimum space between a label and its shortcut
    pub shortcut_gap: f32,
    /// Radius of the outer corners of the menu shape
    pub corner_radius: f32,
    /// Narrowest allowed panel body
    pub min_panel_width: f32,
    /// Duration of the fade-out on an animated close, in seconds
    pub fade_duration: f32,
    /// A first press must be held longer than this, in seconds, before its
    /// release selects anything
    pub select_hold_threshold: f64,
}

impl Default for MenuMetrics {
    fn default() -> Self {
        Self {
            row_height: 36.0,
            separator_height: 9.0,
            vertical_padding: 6.0,
            horizontal_padding: 16.0,
            shortcut_gap: 24.0,
            corner_radius: 8.0,
            min_panel_width: 160.0,
            fade_duration: 0.2,
            select_hold_threshold: 0.3,
        }
    }
}

/// Text measurement supplied by the host's font system.
pub trait MeasureText {
    /// Width in points of `text` laid out on one line with `font`.
    fn text_width(&self, text: &str, font: &FontId) -> f32;
}

/// Character-count estimate, for hosts without a font system and for tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxTextMeasure;

impl MeasureText for ApproxTextMeasure {
    fn text_width(&self, text: &str, font: &FontId) -> f32 {
        text.chars().count() as f32 * font.size * 0.6
    }
}

/// Vertical slot taken by one menu item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Slot {
    /// Hit rectangle of a selectable row
    Row(Rect),
    /// Space taken by a separator; never hit
    Gap(Rect),
}

impl Slot {
    /// Rectangle of the slot, whatever its kind.
    pub fn rect(&self) -> Rect {
        match *self {
            Slot::Row(rect) | Slot::Gap(rect) => rect,
        }
    }
}

/// Resolved layout of a panel, one slot per item in item order.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelGeometry {
    /// Bounding size of the whole panel
    pub size: Vec2,
    /// Title area, the footprint of the button
    pub tab: Rect,
    /// Area below the tab holding the rows
    pub body: Rect,
    /// One slot per item
    pub slots: Vec<Slot>,
}

impl PanelGeometry {
    /// Lay out `items` under a tab of `anchor` size.
    ///
    /// Rows span the full body width and are stacked top to bottom in item
    /// order; separators take a fixed gap and produce no hit rectangle. The
    /// body is as wide as the widest row, never narrower than the button or
    /// `metrics.min_panel_width`. An empty list yields a bare tab and an empty
    /// body.
    pub fn compute(
        items: &[MenuItem],
        alignment: Alignment,
        anchor: Vec2,
        font: &FontId,
        metrics: &MenuMetrics,
        measure: &dyn MeasureText,
    ) -> Self {
        let anchor = vec2(anchor.x.max(0.0), anchor.y.max(0.0));

        if items.is_empty() {
            let tab = Rect::from_min_size(Pos2::ZERO, anchor);
            return Self {
                size: anchor,
                tab,
                body: Rect::from_min_size(tab.left_bottom(), vec2(anchor.x, 0.0)),
                slots: Vec::new(),
            };
        }

        let content_width = items
            .iter()
            .filter_map(|item| match item {
                MenuItem::Action(action) => {
                    let label = measure.text_width(&action.label, font);
                    let shortcut = action
                        .shortcut
                        .as_ref()
                        .map(|s| metrics.shortcut_gap + measure.text_width(&s.to_string(), font))
                        .unwrap_or(0.0);
                    Some(metrics.horizontal_padding * 2.0 + label + shortcut)
                }
                MenuItem::Separator => None,
            })
            .fold(metrics.min_panel_width, f32::max);
        let width = content_width.max(anchor.x);

        let tab_x = match alignment {
            Alignment::Left => width - anchor.x,
            Alignment::Center => (width - anchor.x) / 2.0,
            Alignment::Right => 0.0,
        };
        let tab = Rect::from_min_size(pos2(tab_x, 0.0), anchor);

        let mut y = anchor.y + metrics.vertical_padding;
        let slots = items
            .iter()
            .map(|item| {
                let height = if item.is_separator() {
                    metrics.separator_height
                } else {
                    metrics.row_height
                };
                let rect = Rect::from_min_size(pos2(0.0, y), vec2(width, height));
                y += height;
                if item.is_separator() {
                    Slot::Gap(rect)
                } else {
                    Slot::Row(rect)
                }
            })
            .collect();

        let height = y + metrics.vertical_padding;
        let body = Rect::from_min_max(pos2(0.0, anchor.y), pos2(width, height));

        Self {
            size: vec2(width, height),
            tab,
            body,
            slots,
        }
    }

    /// Whether the layout has no items.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Hit rectangle of item `index`; `None` for separators and out of range.
    pub fn item_rect(&self, index: usize) -> Option<Rect> {
        match self.slots.get(index) {
            Some(Slot::Row(rect)) => Some(*rect),
            _ => None,
        }
    }

    /// Index of the row whose rectangle contains `point`.
    ///
    /// Rectangles are half-open, so a point on the boundary between two
    /// rows belongs to the lower one.
    pub fn row_at(&self, point: Pos2) -> Option<usize> {
        self.slots.iter().position(|slot| match slot {
            Slot::Row(rect) => {
                point.x >= rect.min.x
                    && point.x < rect.max.x
                    && point.y >= rect.min.y
                    && point.y < rect.max.y
            }
            Slot::Gap(_) => false,
        })
    }

    /// Offset from the button's local space into panel-local space.
    pub fn button_offset(&self) -> Vec2 {
        self.tab.min.to_vec2()
    }
}

/// Rounded outline of the panel: the union of the tab and the body.
///
/// Outer corners are rounded; corners where the tab meets the body stay
/// square, so the shape appears to grow out of the button's corner on the
/// anchored side. The shape clips the panel when drawn and is the boundary
/// for every hit test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuShape {
    tab: Rect,
    tab_radius: CornerRadius,
    body: Rect,
    body_radius: CornerRadius,
    empty: bool,
}

impl MenuShape {
    /// Derive the shape for `geometry` laid out with `alignment`.
    pub fn generate(geometry: &PanelGeometry, alignment: Alignment, corner_radius: f32) -> Self {
        let tab = geometry.tab;
        let body = geometry.body;

        let tab_corner = corner_radius_for(tab, corner_radius);
        let tab_radius = CornerRadius {
            nw: tab_corner,
            ne: tab_corner,
            sw: 0,
            se: 0,
        };

        let body_corner = corner_radius_for(body, corner_radius);
        let exposed_left = (tab.min.x - body.min.x).max(0.0);
        let exposed_right = (body.max.x - tab.max.x).max(0.0);
        let exposed = |width: f32| body_corner.min(width.round().min(u8::MAX as f32) as u8);
        let (nw, ne) = match alignment {
            Alignment::Right => (0, exposed(exposed_right)),
            Alignment::Left => (exposed(exposed_left), 0),
            Alignment::Center => (exposed(exposed_left), exposed(exposed_right)),
        };
        let body_radius = CornerRadius {
            nw,
            ne,
            sw: body_corner,
            se: body_corner,
        };

        Self {
            tab,
            tab_radius,
            body,
            body_radius,
            empty: geometry.is_empty(),
        }
    }

    /// Point-in-shape test in panel-local coordinates. Always `false` for a
    /// panel without items.
    pub fn contains(&self, point: Pos2) -> bool {
        !self.empty
            && (rounded_rect_contains(self.tab, self.tab_radius, point)
                || rounded_rect_contains(self.body, self.body_radius, point))
    }

    /// Whether the shape encloses nothing.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// The two rounded rectangles making up the shape, tab first.
    pub fn parts(&self) -> [(Rect, CornerRadius); 2] {
        [(self.tab, self.tab_radius), (self.body, self.body_radius)]
    }

    /// Bounding box of the shape.
    pub fn bounds(&self) -> Rect {
        self.tab.union(self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::items::Shortcut;

    fn items() -> Vec<MenuItem> {
        vec![
            MenuItem::action("Undo", || {}).with_shortcut(Shortcut::command("Z")),
            MenuItem::action("Redo", || {}),
            MenuItem::separator(),
            MenuItem::action("Help", || {}),
        ]
    }

    fn layout(items: &[MenuItem], alignment: Alignment) -> PanelGeometry {
        PanelGeometry::compute(
            items,
            alignment,
            vec2(100.0, 40.0),
            &FontId::proportional(16.0),
            &MenuMetrics::default(),
            &ApproxTextMeasure,
        )
    }

    #[test]
    fn rows_stack_in_order_with_separator_gap() {
        let geometry = layout(&items(), Alignment::Right);
        let metrics = MenuMetrics::default();

        let undo = geometry.item_rect(0).unwrap();
        let redo = geometry.item_rect(1).unwrap();
        let help = geometry.item_rect(3).unwrap();

        assert_eq!(undo.min.y, 40.0 + metrics.vertical_padding);
        assert_eq!(redo.min.y, undo.max.y);
        assert_eq!(help.min.y, redo.max.y + metrics.separator_height);
        assert!(geometry.item_rect(2).is_none());
        assert_eq!(geometry.size.y, help.max.y + metrics.vertical_padding);
    }

    #[test]
    fn shared_boundary_belongs_to_lower_row() {
        let geometry = layout(&items(), Alignment::Right);
        let boundary = geometry.item_rect(1).unwrap().min.y;
        assert_eq!(geometry.row_at(pos2(10.0, boundary)), Some(1));
        assert_eq!(geometry.row_at(pos2(10.0, boundary - 0.01)), Some(0));
    }

    #[test]
    fn separator_gap_is_never_a_row() {
        let geometry = layout(&items(), Alignment::Right);
        let gap = geometry.slots[2].rect();
        assert_eq!(geometry.row_at(gap.center()), None);
    }

    #[test]
    fn tab_follows_alignment() {
        let right = layout(&items(), Alignment::Right);
        let left = layout(&items(), Alignment::Left);
        let center = layout(&items(), Alignment::Center);

        assert_eq!(right.tab.min.x, 0.0);
        assert_eq!(left.tab.max.x, left.size.x);
        assert!((center.tab.center().x - center.size.x / 2.0).abs() < 1e-3);
        assert_eq!(left.button_offset(), vec2(left.size.x - 100.0, 0.0));
    }

    #[test]
    fn compute_is_deterministic() {
        let items = items();
        let a = layout(&items, Alignment::Center);
        let b = layout(&items, Alignment::Center);
        assert_eq!(a, b);
        assert_eq!(
            MenuShape::generate(&a, Alignment::Center, 8.0),
            MenuShape::generate(&b, Alignment::Center, 8.0)
        );
    }

    #[test]
    fn empty_panel_has_no_shape() {
        let geometry = layout(&[], Alignment::Right);
        let shape = MenuShape::generate(&geometry, Alignment::Right, 8.0);
        assert!(geometry.is_empty());
        assert_eq!(geometry.size, vec2(100.0, 40.0));
        assert!(!shape.contains(pos2(50.0, 20.0)));
        assert!(shape.is_empty());
    }

    #[test]
    fn joint_corner_is_square_on_anchor_side() {
        let geometry = layout(&items(), Alignment::Right);
        let shape = MenuShape::generate(&geometry, Alignment::Right, 8.0);
        let [(_, tab), (_, body)] = shape.parts();

        assert_eq!(tab.sw, 0);
        assert_eq!(body.nw, 0);
        assert_eq!(body.ne, 8);
        assert!(shape.contains(pos2(0.5, 40.5)));
        assert!(!shape.contains(pos2(geometry.size.x - 0.5, geometry.size.y - 0.5)));
    }

    #[test]
    fn wide_labels_widen_the_panel() {
        let long = vec![MenuItem::action("A rather long menu entry label", || {})];
        let geometry = layout(&long, Alignment::Right);
        let metrics = MenuMetrics::default();
        let expected = 30.0 * 16.0 * 0.6 + metrics.horizontal_padding * 2.0;
        assert!((geometry.size.x - expected).abs() < 1e-3);
    }
}
