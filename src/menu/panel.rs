use std::fmt;
use std::sync::Arc;

use egui::{Color32, FontId, Pos2, Shadow, Vec2};
use tracing::trace;

use crate::menu::geometry::{Alignment, MeasureText, MenuMetrics, MenuShape, PanelGeometry};
use crate::menu::items::MenuItem;
use crate::theme::{BlurStyle, MenuTheme, Themeable};

/// Resolved colors and effects of a content panel.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelStyle {
    /// Row and tab title font
    pub font: FontId,
    /// Row text color
    pub text_color: Color32,
    /// Highlighted row text color
    pub highlighted_text_color: Color32,
    /// Highlighted row fill
    pub highlighted_background_color: Color32,
    /// Tint over the backdrop
    pub background_color: Color32,
    /// Separator hairline color
    pub separator_color: Color32,
    /// Backdrop blur
    pub blur: Option<BlurStyle>,
    /// Drop shadow under the menu shape
    pub shadow: Shadow,
}

impl PanelStyle {
    /// Style derived from `theme`.
    pub fn from_theme(theme: &MenuTheme) -> Self {
        Self {
            font: theme.font.clone(),
            text_color: theme.content_text_color,
            highlighted_text_color: theme.highlighted_text_color,
            highlighted_background_color: theme.highlighted_background_color,
            background_color: theme.content_background_color,
            separator_color: theme.separator_color,
            blur: theme.blur,
            shadow: theme.shadow(),
        }
    }
}

type HighlightCallback = Box<dyn Fn(Option<usize>)>;

/// The floating list of items shown while a menu is open.
///
/// A panel is built fresh on every open and owns its items, its layout and
/// its menu shape. The shape is regenerated every time the layout changes,
/// so hit tests always run against the current layout.
pub struct ContentPanel {
    title: String,
    items: Vec<MenuItem>,
    alignment: Alignment,
    anchor: Vec2,
    metrics: MenuMetrics,
    theme: Arc<MenuTheme>,
    style: PanelStyle,
    geometry: PanelGeometry,
    shape: MenuShape,
    highlighted: Option<usize>,
    interactive_drag_active: bool,
    on_highlight_changed: Option<HighlightCallback>,
}

impl ContentPanel {
    /// Build a panel for `items` growing out of a button of size `anchor`.
    pub fn new(
        title: impl Into<String>,
        items: Vec<MenuItem>,
        theme: Arc<MenuTheme>,
        alignment: Alignment,
        anchor: Vec2,
        metrics: MenuMetrics,
        measure: &dyn MeasureText,
    ) -> Self {
        let geometry =
            PanelGeometry::compute(&items, alignment, anchor, &theme.font, &metrics, measure);
        let shape = MenuShape::generate(&geometry, alignment, metrics.corner_radius);
        Self {
            title: title.into(),
            style: PanelStyle::from_theme(&theme),
            items,
            alignment,
            anchor,
            metrics,
            theme,
            geometry,
            shape,
            highlighted: None,
            interactive_drag_active: false,
            on_highlight_changed: None,
        }
    }

    /// Recompute the layout and regenerate the menu shape.
    ///
    /// The highlight is dropped if it no longer names a row.
    pub fn relayout(&mut self, measure: &dyn MeasureText) {
        self.geometry = PanelGeometry::compute(
            &self.items,
            self.alignment,
            self.anchor,
            &self.theme.font,
            &self.metrics,
            measure,
        );
        self.shape = MenuShape::generate(&self.geometry, self.alignment, self.metrics.corner_radius);
        if let Some(index) = self.highlighted {
            if self.geometry.item_rect(index).is_none() {
                self.highlighted = None;
            }
        }
    }

    /// Change the button size the panel grows out of.
    pub fn set_anchor(&mut self, anchor: Vec2, measure: &dyn MeasureText) {
        if self.anchor != anchor {
            self.anchor = anchor;
            self.relayout(measure);
        }
    }

    /// Register the callback fired when the highlighted row changes.
    pub fn set_on_highlight_changed(&mut self, callback: impl Fn(Option<usize>) + 'static) {
        self.on_highlight_changed = Some(Box::new(callback));
    }

    /// Whether `point` (panel-local) lies inside the menu shape.
    pub fn point_inside_menu_shape(&self, point: Pos2) -> bool {
        self.shape.contains(point)
    }

    fn resolve(&self, point: Pos2) -> Option<usize> {
        if self.shape.contains(point) {
            self.geometry.row_at(point)
        } else {
            None
        }
    }

    /// Highlight the row under `point` (panel-local) and return its index.
    ///
    /// Points over a separator, the padding, the tab or outside the shape
    /// clear the highlight. Setting the same highlight again is a no-op and
    /// does not fire the highlight callback.
    pub fn set_highlight(&mut self, point: Pos2) -> Option<usize> {
        let index = self.resolve(point);
        if index != self.highlighted {
            trace!(title = %self.title, from = ?self.highlighted, to = ?index, "highlight changed");
            self.highlighted = index;
            if let Some(callback) = &self.on_highlight_changed {
                callback(index);
            }
        }
        index
    }

    /// Item that a release at `point` (panel-local) selects.
    pub fn select_at(&self, point: Pos2) -> Option<MenuItem> {
        self.resolve(point)
            .and_then(|index| self.items.get(index))
            .filter(|item| !item.is_separator())
            .cloned()
    }

    /// Currently highlighted row.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Mark whether a press-drag is currently steering the highlight.
    pub fn set_interactive_drag_active(&mut self, active: bool) {
        self.interactive_drag_active = active;
    }

    /// Whether a press-drag is currently steering the highlight.
    pub fn is_interactive_drag_active(&self) -> bool {
        self.interactive_drag_active
    }

    /// Title shown in the tab.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the title shown in the tab.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Items in display order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Alignment the panel was laid out with.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Current layout.
    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    /// Current menu shape.
    pub fn shape(&self) -> &MenuShape {
        &self.shape
    }

    /// Layout constants the panel was built with.
    pub fn metrics(&self) -> &MenuMetrics {
        &self.metrics
    }

    /// Current style.
    pub fn style(&self) -> &PanelStyle {
        &self.style
    }

    /// Theme the style was derived from.
    pub fn theme(&self) -> &Arc<MenuTheme> {
        &self.theme
    }
}

impl Themeable for ContentPanel {
    fn apply_theme(&mut self, theme: &Arc<MenuTheme>) {
        self.theme = Arc::clone(theme);
        self.style = PanelStyle::from_theme(theme);
    }
}

impl fmt::Debug for ContentPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentPanel")
            .field("title", &self.title)
            .field("items", &self.items.len())
            .field("alignment", &self.alignment)
            .field("highlighted", &self.highlighted)
            .field("interactive_drag_active", &self.interactive_drag_active)
            .finish_non_exhaustive()
    }
}
