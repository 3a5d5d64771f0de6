//! The menu button and its press-drag-release state machine.
//!
//! A press on an idle button opens its panel and starts a session. Moves
//! steer the highlight while the pointer is inside the menu shape. The
//! release decides: a first press held longer than the hold threshold, or
//! any press on an already open panel, commits the row under the pointer;
//! a quick tap just closes the panel again.
//!
//! Everything a broadcast from another button has to reach lives in a
//! shared `MenuState` cell, so the coordinator can close this button while
//! only holding a weak reference to it.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use egui::{Color32, CornerRadius, FontId, Pos2, Rect};
use tracing::{debug, error, trace, warn};

use crate::error::{MenuError, Result};
use crate::menu::coordinator::{MenuCoordinator, MenuId, OpeningListener, Subscription};
use crate::menu::feedback::{NoFeedback, SelectionFeedback};
use crate::menu::geometry::{Alignment, ApproxTextMeasure, MeasureText, MenuMetrics};
use crate::menu::items::MenuItem;
use crate::menu::overlay::OverlaySurface;
use crate::menu::panel::ContentPanel;
use crate::theme::{BlurStyle, MenuTheme, Themeable};
use crate::utils::rounded_corners::{corner_radius_for, rounded_rect_contains};

/// Stage of a pointer gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// Pointer went down
    Press,
    /// Pointer moved while down
    Move,
    /// Pointer went up
    Release,
    /// The platform took the gesture away
    Cancel,
    /// A discrete tap, recognized alongside the press
    Tap,
}

/// One pointer event in the button's local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEvent {
    /// What happened
    pub phase: GesturePhase,
    /// Pointer position relative to the button's top-left corner
    pub position: Pos2,
    /// Event time in seconds on any monotonic clock
    pub time: f64,
}

impl GestureEvent {
    /// Create an event.
    pub fn new(phase: GesturePhase, position: Pos2, time: f64) -> Self {
        Self {
            phase,
            position,
            time,
        }
    }
}

/// How a session began, which decides how its release is treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// The press opened the panel; a quick release selects nothing
    FirstPress,
    /// The panel was already open; the release always commits
    ReopenDrag,
}

/// Bookkeeping for one press-drag-release interaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSession {
    /// How the session began
    pub kind: SessionKind,
    /// Time of the press, in seconds
    pub started_at: f64,
    /// Row highlighted by the last tracked position
    pub highlighted: Option<usize>,
}

/// Handle for a fading panel.
///
/// An animated close detaches the panel right away but keeps it around for
/// drawing until the host's animation driver calls
/// [`MenuButton::complete_transition`] with this handle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionHandle {
    id: u64,
    duration: f32,
}

impl TransitionHandle {
    /// Stable id of the transition.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Requested fade duration in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }
}

/// Result of hit testing a point against a button and its open panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// Inside the closed button
    Button,
    /// Inside the open panel's menu shape, over the given row if any
    Panel(Option<usize>),
    /// Neither
    Outside,
}

/// Resolved styling of the button itself.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonChrome {
    /// Title font
    pub font: FontId,
    /// Title color
    pub title_color: Color32,
    /// Grab bar color
    pub gesture_bar_color: Color32,
    /// Tint drawn over the backdrop
    pub tint: Color32,
    /// Backdrop blur
    pub blur: Option<BlurStyle>,
}

impl ButtonChrome {
    /// Chrome derived from `theme`.
    pub fn from_theme(theme: &MenuTheme) -> Self {
        Self {
            font: theme.font.clone(),
            title_color: theme.menu_text_color,
            gesture_bar_color: theme.gesture_bar_tint,
            tint: theme.menu_background_color,
            blur: theme.blur,
        }
    }
}

pub(crate) struct FadingPanel {
    pub(crate) handle: TransitionHandle,
    pub(crate) panel: ContentPanel,
    pub(crate) origin: Pos2,
}

type Hook = Rc<dyn Fn()>;

struct Detached {
    handle: Option<TransitionHandle>,
    on_hide: Option<Hook>,
}

pub(crate) struct MenuState {
    id: MenuId,
    title: String,
    theme: Arc<MenuTheme>,
    chrome: ButtonChrome,
    alignment: Alignment,
    metrics: MenuMetrics,
    measure: Rc<dyn MeasureText>,
    feedback: Rc<dyn SelectionFeedback>,
    frame: Rect,
    surface: Option<Rect>,
    panel: Option<ContentPanel>,
    overlay: Option<OverlaySurface>,
    session: Option<GestureSession>,
    effect_hidden: bool,
    fading: Vec<FadingPanel>,
    next_transition: u64,
    presentations: u64,
    on_show: Option<Hook>,
    on_hide: Option<Hook>,
}

impl MenuState {
    fn new(id: MenuId, title: String, theme: Arc<MenuTheme>) -> Self {
        Self {
            id,
            title,
            chrome: ButtonChrome::from_theme(&theme),
            theme,
            alignment: Alignment::default(),
            metrics: MenuMetrics::default(),
            measure: Rc::new(ApproxTextMeasure),
            feedback: Rc::new(NoFeedback),
            frame: Rect::ZERO,
            surface: None,
            panel: None,
            overlay: None,
            session: None,
            effect_hidden: false,
            fading: Vec::new(),
            next_transition: 0,
            presentations: 0,
            on_show: None,
            on_hide: None,
        }
    }

    fn present(&mut self, surface: Rect, items: Vec<MenuItem>) {
        let mut panel = ContentPanel::new(
            self.title.clone(),
            items,
            Arc::clone(&self.theme),
            self.alignment,
            self.frame.size(),
            self.metrics.clone(),
            self.measure.as_ref(),
        );

        let feedback = Rc::clone(&self.feedback);
        panel.set_on_highlight_changed(move |index| {
            if index.is_some() {
                feedback.selection_changed();
            }
        });
        self.feedback.prepare();

        self.overlay = Some(OverlaySurface::new(surface, self.frame.min));
        self.panel = Some(panel);
        self.effect_hidden = true;
        self.presentations += 1;
    }

    fn detach(&mut self, animated: bool) -> Option<Detached> {
        let panel = self.panel.take()?;
        let origin = self.frame.min - panel.geometry().button_offset();
        self.overlay = None;
        self.session = None;
        self.effect_hidden = false;

        let handle = if animated {
            let handle = TransitionHandle {
                id: self.next_transition,
                duration: self.metrics.fade_duration,
            };
            self.next_transition += 1;
            self.fading.push(FadingPanel {
                handle,
                panel,
                origin,
            });
            Some(handle)
        } else {
            None
        };

        debug!(id = %self.id, title = %self.title, animated, "menu closed");
        Some(Detached {
            handle,
            on_hide: self.on_hide.clone(),
        })
    }

    fn panel_origin(&self) -> Option<Pos2> {
        self.panel
            .as_ref()
            .map(|panel| self.frame.min - panel.geometry().button_offset())
    }
}

impl OpeningListener for RefCell<MenuState> {
    fn menu_opening(&self, opener: MenuId) {
        let detached = match self.try_borrow_mut() {
            Ok(mut state) => {
                if state.panel.is_none() {
                    return;
                }
                debug!(id = %state.id, %opener, "closing for another menu");
                state.detach(false)
            }
            Err(_) => {
                warn!(%opener, "menu busy while another menu opened, not closing");
                return;
            }
        };

        if let Some(on_hide) = detached.and_then(|d| d.on_hide) {
            on_hide();
        }
    }
}

/// A titled button that presents a [`ContentPanel`] on press.
///
/// # Examples
///
/// ```rust
/// use std::rc::Rc;
/// use egui::{pos2, vec2, Rect};
/// use egui_drag_menu::{GestureEvent, GesturePhase, MenuButton, MenuCoordinator, MenuItem, MenuTheme};
///
/// let coordinator = Rc::new(MenuCoordinator::new());
/// let mut menu = MenuButton::new("Edit", MenuTheme::dark(), &coordinator, || {
///     vec![MenuItem::action("Undo", || {})]
/// })
/// .with_frame(Rect::from_min_size(pos2(20.0, 64.0), vec2(100.0, 40.0)))
/// .with_surface(Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0)));
///
/// menu.handle_gesture(GestureEvent::new(GesturePhase::Press, pos2(50.0, 20.0), 0.0))?;
/// assert!(menu.is_open());
/// # Ok::<(), egui_drag_menu::MenuError>(())
/// ```
pub struct MenuButton {
    id: MenuId,
    state: Rc<RefCell<MenuState>>,
    coordinator: Rc<MenuCoordinator>,
    item_source: Box<dyn Fn() -> Vec<MenuItem>>,
    _subscription: Subscription,
}

impl MenuButton {
    /// Create a button titled `title`.
    ///
    /// `item_source` is called on every open, so the items may reflect
    /// current application state.
    pub fn new(
        title: impl Into<String>,
        theme: Arc<MenuTheme>,
        coordinator: &Rc<MenuCoordinator>,
        item_source: impl Fn() -> Vec<MenuItem> + 'static,
    ) -> Self {
        let id = coordinator.allocate_id();
        let state = Rc::new(RefCell::new(MenuState::new(id, title.into(), theme)));
        let listener: Weak<dyn OpeningListener> = Rc::downgrade(&state) as Weak<dyn OpeningListener>;
        let subscription = coordinator.subscribe(id, listener);

        Self {
            id,
            state,
            coordinator: Rc::clone(coordinator),
            item_source: Box::new(item_source),
            _subscription: subscription,
        }
    }

    /// Set which way the panel grows from the button
    ///
    /// The alignment is read when the panel opens, so changing it never
    /// moves a panel that is already shown.
    ///
    /// # Arguments
    /// * `alignment` - Which edge of the panel lines up with the button
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// menu.with_alignment(Alignment::Center)
    /// ```
    pub fn with_alignment(self, alignment: Alignment) -> Self {
        self.set_alignment(alignment);
        self
    }

    /// Replace the layout and timing constants
    ///
    /// Row heights, paddings, the fade duration and the hold threshold all
    /// come from `metrics`. Read when the panel opens.
    ///
    /// # Arguments
    /// * `metrics` - The new constants
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// menu.with_metrics(MenuMetrics { row_height: 44.0, ..MenuMetrics::default() })
    /// ```
    pub fn with_metrics(self, metrics: MenuMetrics) -> Self {
        self.state.borrow_mut().metrics = metrics;
        self
    }

    /// Set the selection feedback
    ///
    /// `feedback` is prepared on every open and ticked whenever the drag
    /// moves the highlight onto another row.
    ///
    /// # Arguments
    /// * `feedback` - Haptic or audio hook
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// menu.with_feedback(NoFeedback)
    /// ```
    pub fn with_feedback(self, feedback: impl SelectionFeedback + 'static) -> Self {
        self.state.borrow_mut().feedback = Rc::new(feedback);
        self
    }

    /// Set the text measurement used to size panel rows
    ///
    /// Defaults to a character-count estimate; [`MenuButton::show`]
    /// switches to the egui font system on its own.
    ///
    /// # Arguments
    /// * `measure` - Text width provider
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// menu.with_text_measure(EguiTextMeasure::new(ctx.clone()))
    /// ```
    pub fn with_text_measure(self, measure: impl MeasureText + 'static) -> Self {
        self.set_text_measure(measure);
        self
    }

    /// Set the button frame
    ///
    /// See [`MenuButton::set_frame`].
    ///
    /// # Arguments
    /// * `frame` - Button rectangle in surface coordinates
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// menu.with_frame(Rect::from_min_size(pos2(20.0, 64.0), vec2(100.0, 40.0)))
    /// ```
    pub fn with_frame(self, frame: Rect) -> Self {
        self.set_frame(frame);
        self
    }

    /// Set the presentation surface
    ///
    /// Opening fails with [`MenuError::MissingSurface`] until a surface is
    /// set. See [`MenuButton::set_surface`].
    ///
    /// # Arguments
    /// * `surface` - Area the overlay covers, usually the whole viewport
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// menu.with_surface(ctx.content_rect())
    /// ```
    pub fn with_surface(self, surface: Rect) -> Self {
        self.set_surface(Some(surface));
        self
    }

    /// Register a callback for when the panel opens
    ///
    /// Called once per presented panel, after the panel is built.
    ///
    /// # Arguments
    /// * `callback` - Function to run on open
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// menu.on_show(|| println!("menu opened"))
    /// ```
    pub fn on_show(self, callback: impl Fn() + 'static) -> Self {
        self.state.borrow_mut().on_show = Some(Rc::new(callback));
        self
    }

    /// Register a callback for when the panel closes
    ///
    /// Called once per close of a presented panel, whether animated, on
    /// selection or because another menu opened.
    ///
    /// # Arguments
    /// * `callback` - Function to run on close
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// menu.on_hide(|| println!("menu closed"))
    /// ```
    pub fn on_hide(self, callback: impl Fn() + 'static) -> Self {
        self.state.borrow_mut().on_hide = Some(Rc::new(callback));
        self
    }

    /// Id under which the button is known to its coordinator.
    pub fn id(&self) -> MenuId {
        self.id
    }

    /// Whether a panel is currently presented.
    pub fn is_open(&self) -> bool {
        self.state.borrow().panel.is_some()
    }

    /// Whether any closed panel is still waiting for its fade to finish.
    pub fn is_closing(&self) -> bool {
        !self.state.borrow().fading.is_empty()
    }

    /// Current title.
    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    /// Change the title, also on the open panel.
    pub fn set_title(&self, title: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        state.title = title.into();
        let title = state.title.clone();
        if let Some(panel) = state.panel.as_mut() {
            panel.set_title(title);
        }
    }

    /// Alignment used for the next open.
    pub fn alignment(&self) -> Alignment {
        self.state.borrow().alignment
    }

    /// Set the alignment used for the next open.
    pub fn set_alignment(&self, alignment: Alignment) {
        self.state.borrow_mut().alignment = alignment;
    }

    /// Layout and timing constants.
    pub fn metrics(&self) -> MenuMetrics {
        self.state.borrow().metrics.clone()
    }

    /// Replace the text measurement used to size panel rows.
    pub fn set_text_measure(&self, measure: impl MeasureText + 'static) {
        self.state.borrow_mut().measure = Rc::new(measure);
    }

    /// Button frame in surface coordinates.
    pub fn frame(&self) -> Rect {
        self.state.borrow().frame
    }

    /// Update the button frame as resolved by the host's layout.
    ///
    /// An open panel follows the button and is laid out again if the size
    /// changed.
    pub fn set_frame(&self, frame: Rect) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        if state.frame == frame {
            return;
        }
        state.frame = frame;
        if let Some(overlay) = state.overlay.as_mut() {
            *overlay = OverlaySurface::new(overlay.bounds(), frame.min);
        }
        if let Some(panel) = state.panel.as_mut() {
            panel.set_anchor(frame.size(), state.measure.as_ref());
        }
    }

    /// Set or clear the surface panels are presented on.
    pub fn set_surface(&self, surface: Option<Rect>) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        state.surface = surface;
        if let (Some(surface), Some(overlay)) = (surface, state.overlay.as_mut()) {
            *overlay = OverlaySurface::new(surface, state.frame.min);
        }
    }

    /// Styling of the button itself.
    pub fn chrome(&self) -> ButtonChrome {
        self.state.borrow().chrome.clone()
    }

    /// Whether the button's own backdrop is hidden because its panel covers it.
    pub fn is_effect_hidden(&self) -> bool {
        self.state.borrow().effect_hidden
    }

    /// Theme currently applied.
    pub fn theme(&self) -> Arc<MenuTheme> {
        Arc::clone(&self.state.borrow().theme)
    }

    /// Active gesture session, if a press is in progress.
    pub fn session(&self) -> Option<GestureSession> {
        self.state.borrow().session
    }

    /// Row highlighted on the open panel.
    pub fn highlighted(&self) -> Option<usize> {
        self.state
            .borrow()
            .panel
            .as_ref()
            .and_then(ContentPanel::highlighted)
    }

    /// Number of panels presented over the button's lifetime.
    pub fn presentation_count(&self) -> u64 {
        self.state.borrow().presentations
    }

    /// Top-left corner of the open panel in surface coordinates.
    pub fn panel_origin(&self) -> Option<Pos2> {
        self.state.borrow().panel_origin()
    }

    /// The overlay capturing input while the panel is open.
    pub fn overlay(&self) -> Option<OverlaySurface> {
        self.state.borrow().overlay
    }

    /// Run `f` on the open panel.
    pub fn with_panel<R>(&self, f: impl FnOnce(&ContentPanel) -> R) -> Option<R> {
        self.state.borrow().panel.as_ref().map(f)
    }

    pub(crate) fn for_each_fading(&self, mut f: impl FnMut(&FadingPanel)) {
        for fading in &self.state.borrow().fading {
            f(fading);
        }
    }

    /// Present the panel.
    ///
    /// Every other open button on the same coordinator is closed, without
    /// animation, before the panel is built. Returns `Ok(false)` if the
    /// panel was already open.
    ///
    /// # Errors
    ///
    /// [`MenuError::MissingSurface`] if no presentation surface was set.
    pub fn open(&mut self) -> Result<bool> {
        let surface = {
            let state = self.state.borrow();
            if state.panel.is_some() {
                trace!(id = %self.id, "menu already open");
                return Ok(false);
            }
            match state.surface {
                Some(surface) => surface,
                None => {
                    error!(id = %self.id, title = %state.title, "menu has no presentation surface");
                    return Err(MenuError::MissingSurface {
                        title: state.title.clone(),
                    });
                }
            }
        };

        self.coordinator.announce_opening(self.id);

        let items = (self.item_source)();
        let on_show = {
            let mut state = self.state.borrow_mut();
            debug!(id = %self.id, title = %state.title, items = items.len(), "menu opened");
            state.present(surface, items);
            state.on_show.clone()
        };

        if let Some(on_show) = on_show {
            on_show();
        }
        Ok(true)
    }

    /// Close the panel.
    ///
    /// The panel and overlay are detached immediately, so [`is_open`]
    /// reports `false` on return. With `animated` the panel stays around
    /// for drawing and the returned handle must be passed to
    /// [`complete_transition`] once the fade is done. Closing a closed
    /// button does nothing.
    ///
    /// [`is_open`]: MenuButton::is_open
    /// [`complete_transition`]: MenuButton::complete_transition
    pub fn close(&mut self, animated: bool) -> Option<TransitionHandle> {
        let detached = self.state.borrow_mut().detach(animated)?;
        if let Some(on_hide) = detached.on_hide {
            on_hide();
        }
        detached.handle
    }

    /// Finish an animated close, dropping the faded panel.
    ///
    /// # Errors
    ///
    /// [`MenuError::UnknownTransition`] if the handle is not pending.
    pub fn complete_transition(&mut self, handle: TransitionHandle) -> Result<()> {
        let mut state = self.state.borrow_mut();
        match state.fading.iter().position(|f| f.handle.id == handle.id) {
            Some(index) => {
                state.fading.remove(index);
                debug!(id = %self.id, transition = handle.id, "close transition completed");
                Ok(())
            }
            None => {
                warn!(id = %self.id, transition = handle.id, "unknown close transition");
                Err(MenuError::UnknownTransition(handle.id))
            }
        }
    }

    /// Hit test a point in button-local coordinates.
    ///
    /// With a panel open the panel's menu shape decides; the button's own
    /// rounded frame is only consulted while closed. Pure: nothing is
    /// highlighted or closed.
    pub fn hit_test(&self, point: Pos2) -> HitTarget {
        let state = self.state.borrow();
        if let Some(panel) = state.panel.as_ref() {
            let panel_point = point + panel.geometry().button_offset();
            return if panel.point_inside_menu_shape(panel_point) {
                HitTarget::Panel(panel.geometry().row_at(panel_point))
            } else {
                HitTarget::Outside
            };
        }

        let bounds = Rect::from_min_size(Pos2::ZERO, state.frame.size());
        let radius = CornerRadius::same(corner_radius_for(bounds, state.metrics.corner_radius));
        if rounded_rect_contains(bounds, radius, point) {
            HitTarget::Button
        } else {
            HitTarget::Outside
        }
    }

    /// Feed an event captured by the overlay, in surface coordinates.
    ///
    /// Ignored when no overlay is up.
    pub fn handle_overlay_event(&mut self, event: GestureEvent) -> Result<()> {
        let overlay = self.state.borrow().overlay;
        match overlay {
            Some(overlay) => self.handle_gesture(overlay.forward(event)),
            None => Ok(()),
        }
    }

    /// Drive the state machine with one event in button-local coordinates.
    ///
    /// Taps are accepted and ignored: selection always goes through the
    /// press and release pair.
    ///
    /// # Errors
    ///
    /// Propagates [`MenuButton::open`] failures on press.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> Result<()> {
        trace!(id = %self.id, phase = ?event.phase, x = event.position.x, y = event.position.y, "gesture");
        match event.phase {
            GesturePhase::Press => self.begin_session(event)?,
            GesturePhase::Move => self.track(event.position),
            GesturePhase::Release | GesturePhase::Cancel => self.end_session(event),
            GesturePhase::Tap => {}
        }
        Ok(())
    }

    fn begin_session(&mut self, event: GestureEvent) -> Result<()> {
        if self.state.borrow().session.is_some() {
            return Ok(());
        }

        let kind = if self.is_open() {
            SessionKind::ReopenDrag
        } else {
            self.open()?;
            SessionKind::FirstPress
        };

        {
            let mut state = self.state.borrow_mut();
            state.session = Some(GestureSession {
                kind,
                started_at: event.time,
                highlighted: None,
            });
            if let Some(panel) = state.panel.as_mut() {
                panel.set_interactive_drag_active(true);
            }
        }

        self.track(event.position);
        Ok(())
    }

    fn track(&mut self, position: Pos2) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let (Some(session), Some(panel)) = (state.session.as_mut(), state.panel.as_mut()) else {
            return;
        };

        let point = position + panel.geometry().button_offset();
        if panel.point_inside_menu_shape(point) {
            session.highlighted = panel.set_highlight(point);
        }
    }

    fn end_session(&mut self, event: GestureEvent) {
        self.track(event.position);

        let (commits, item) = {
            let mut state = self.state.borrow_mut();
            let Some(session) = state.session.take() else {
                return;
            };
            let threshold = state.metrics.select_hold_threshold;
            let Some(panel) = state.panel.as_mut() else {
                return;
            };
            panel.set_interactive_drag_active(false);

            let commits = match session.kind {
                SessionKind::ReopenDrag => true,
                SessionKind::FirstPress => {
                    held_longer_than(session.started_at, event.time, threshold)
                }
            };
            let item = if commits {
                panel.select_at(event.position + panel.geometry().button_offset())
            } else {
                None
            };
            (commits, item)
        };

        if !commits {
            debug!(id = %self.id, "short press, closing without selection");
        }
        self.close(true);

        if let Some(item) = item {
            debug!(id = %self.id, label = item.label().unwrap_or_default(), "menu item selected");
            item.perform();
        }
    }
}

/// Whether a press from `start` to `end` lasted longer than `threshold`.
///
/// Compared in whole milliseconds, so a press of exactly the threshold is
/// never longer than it.
fn held_longer_than(start: f64, end: f64, threshold: f64) -> bool {
    ((end - start) * 1000.0).round() > (threshold * 1000.0).round()
}

impl Themeable for MenuButton {
    fn apply_theme(&mut self, theme: &Arc<MenuTheme>) {
        let mut state = self.state.borrow_mut();
        state.theme = Arc::clone(theme);
        state.chrome = ButtonChrome::from_theme(theme);
        if let Some(panel) = state.panel.as_mut() {
            panel.apply_theme(theme);
        }
    }
}

impl fmt::Debug for MenuButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MenuButton")
            .field("id", &self.id)
            .field("title", &state.title)
            .field("alignment", &state.alignment)
            .field("open", &state.panel.is_some())
            .field("session", &state.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};
    use std::cell::Cell;

    #[derive(Clone, Default)]
    struct Log {
        selected: Rc<RefCell<Vec<&'static str>>>,
        shown: Rc<Cell<u32>>,
        hidden: Rc<Cell<u32>>,
        ticks: Rc<Cell<u32>>,
    }

    struct Ticks(Rc<Cell<u32>>);

    impl SelectionFeedback for Ticks {
        fn selection_changed(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    const FRAME: Rect = Rect {
        min: Pos2 { x: 20.0, y: 64.0 },
        max: Pos2 { x: 120.0, y: 104.0 },
    };

    fn button(log: &Log) -> MenuButton {
        let coordinator = Rc::new(MenuCoordinator::new());
        button_on(&coordinator, log)
    }

    fn button_on(coordinator: &Rc<MenuCoordinator>, log: &Log) -> MenuButton {
        let selected = Rc::clone(&log.selected);
        let shown = Rc::clone(&log.shown);
        let hidden = Rc::clone(&log.hidden);
        MenuButton::new("Edit", MenuTheme::light(), coordinator, move || {
            let undo = Rc::clone(&selected);
            let redo = Rc::clone(&selected);
            vec![
                MenuItem::action("Undo", move || undo.borrow_mut().push("Undo")),
                MenuItem::separator(),
                MenuItem::action("Redo", move || redo.borrow_mut().push("Redo")),
            ]
        })
        .with_frame(FRAME)
        .with_surface(Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0)))
        .with_feedback(Ticks(Rc::clone(&log.ticks)))
        .on_show(move || shown.set(shown.get() + 1))
        .on_hide(move || hidden.set(hidden.get() + 1))
    }

    /// Center of item `index` in button-local coordinates.
    fn row_center(menu: &MenuButton, index: usize) -> Pos2 {
        menu.with_panel(|panel| {
            let geometry = panel.geometry();
            geometry.item_rect(index).unwrap().center() - geometry.button_offset()
        })
        .unwrap()
    }

    fn event(phase: GesturePhase, position: Pos2, time: f64) -> GestureEvent {
        GestureEvent::new(phase, position, time)
    }

    #[test]
    fn press_opens_and_starts_first_press_session() {
        let log = Log::default();
        let mut menu = button(&log);

        menu.handle_gesture(event(GesturePhase::Press, pos2(50.0, 20.0), 1.0))
            .unwrap();

        assert!(menu.is_open());
        assert!(menu.is_effect_hidden());
        assert_eq!(menu.session().unwrap().kind, SessionKind::FirstPress);
        assert_eq!(log.shown.get(), 1);
        assert!(menu.overlay().is_some());
    }

    #[test]
    fn long_press_commits_row_under_release() {
        let log = Log::default();
        let mut menu = button(&log);

        menu.handle_gesture(event(GesturePhase::Press, pos2(50.0, 20.0), 1.0))
            .unwrap();
        let redo = row_center(&menu, 2);
        menu.handle_gesture(event(GesturePhase::Move, redo, 1.2)).unwrap();
        assert_eq!(menu.highlighted(), Some(2));
        menu.handle_gesture(event(GesturePhase::Release, redo, 1.5))
            .unwrap();

        assert_eq!(*log.selected.borrow(), vec!["Redo"]);
        assert!(!menu.is_open());
        assert!(menu.is_closing());
        assert!(menu.session().is_none());
        assert_eq!(log.hidden.get(), 1);
    }

    #[test]
    fn short_tap_closes_without_selecting() {
        let log = Log::default();
        let mut menu = button(&log);

        menu.handle_gesture(event(GesturePhase::Press, pos2(50.0, 20.0), 1.0))
            .unwrap();
        let undo = row_center(&menu, 0);
        menu.handle_gesture(event(GesturePhase::Release, undo, 1.2))
            .unwrap();

        assert!(log.selected.borrow().is_empty());
        assert!(!menu.is_open());
        assert_eq!(log.hidden.get(), 1);
    }

    #[test]
    fn release_at_exactly_the_hold_threshold_selects_nothing() {
        let log = Log::default();
        let mut menu = button(&log);

        menu.handle_gesture(event(GesturePhase::Press, pos2(50.0, 20.0), 1.0))
            .unwrap();
        let undo = row_center(&menu, 0);
        menu.handle_gesture(event(GesturePhase::Move, undo, 1.1)).unwrap();
        menu.handle_gesture(event(GesturePhase::Release, undo, 1.3))
            .unwrap();

        assert!(log.selected.borrow().is_empty());
        assert!(!menu.is_open());
        assert_eq!(log.hidden.get(), 1);
    }

    #[test]
    fn hold_threshold_compares_whole_milliseconds() {
        assert!(!held_longer_than(1.0, 1.3, 0.3));
        assert!(!held_longer_than(0.1, 0.4, 0.3));
        assert!(held_longer_than(1.0, 1.301, 0.3));
        assert!(!held_longer_than(1.0, 1.2, 0.3));
    }

    #[test]
    fn cancel_is_treated_like_release() {
        let log = Log::default();
        let mut menu = button(&log);

        menu.handle_gesture(event(GesturePhase::Press, pos2(50.0, 20.0), 0.0))
            .unwrap();
        let undo = row_center(&menu, 0);
        menu.handle_gesture(event(GesturePhase::Cancel, undo, 0.8))
            .unwrap();

        assert_eq!(*log.selected.borrow(), vec!["Undo"]);
    }

    #[test]
    fn press_on_open_panel_always_commits() {
        let log = Log::default();
        let mut menu = button(&log);
        menu.open().unwrap();

        let undo = row_center(&menu, 0);
        menu.handle_gesture(event(GesturePhase::Press, undo, 5.0)).unwrap();
        assert_eq!(menu.session().unwrap().kind, SessionKind::ReopenDrag);
        menu.handle_gesture(event(GesturePhase::Release, undo, 5.05))
            .unwrap();

        assert_eq!(*log.selected.borrow(), vec!["Undo"]);
        assert!(!menu.is_open());
    }

    #[test]
    fn release_outside_shape_closes_without_action() {
        let log = Log::default();
        let mut menu = button(&log);
        menu.open().unwrap();

        let outside = pos2(700.0, 500.0);
        assert_eq!(menu.hit_test(outside), HitTarget::Outside);
        menu.handle_gesture(event(GesturePhase::Press, outside, 2.0))
            .unwrap();
        menu.handle_gesture(event(GesturePhase::Release, outside, 2.5))
            .unwrap();

        assert!(log.selected.borrow().is_empty());
        assert!(!menu.is_open());
    }

    #[test]
    fn leaving_the_shape_keeps_highlight() {
        let log = Log::default();
        let mut menu = button(&log);

        menu.handle_gesture(event(GesturePhase::Press, pos2(50.0, 20.0), 0.0))
            .unwrap();
        let undo = row_center(&menu, 0);
        menu.handle_gesture(event(GesturePhase::Move, undo, 0.1)).unwrap();
        menu.handle_gesture(event(GesturePhase::Move, pos2(700.0, 500.0), 0.2))
            .unwrap();

        assert_eq!(menu.highlighted(), Some(0));
        assert_eq!(menu.session().unwrap().highlighted, Some(0));
    }

    #[test]
    fn feedback_ticks_once_per_row_change() {
        let log = Log::default();
        let mut menu = button(&log);

        menu.handle_gesture(event(GesturePhase::Press, pos2(50.0, 20.0), 0.0))
            .unwrap();
        let undo = row_center(&menu, 0);
        let redo = row_center(&menu, 2);
        menu.handle_gesture(event(GesturePhase::Move, undo, 0.1)).unwrap();
        menu.handle_gesture(event(GesturePhase::Move, undo + vec2(3.0, 0.0), 0.2))
            .unwrap();
        menu.handle_gesture(event(GesturePhase::Move, redo, 0.3)).unwrap();

        assert_eq!(log.ticks.get(), 2);
    }

    #[test]
    fn open_is_idempotent() {
        let log = Log::default();
        let mut menu = button(&log);

        assert!(menu.open().unwrap());
        let geometry = menu.with_panel(|p| p.geometry().clone());
        assert!(!menu.open().unwrap());

        assert_eq!(menu.presentation_count(), 1);
        assert_eq!(menu.with_panel(|p| p.geometry().clone()), geometry);
        assert_eq!(log.shown.get(), 1);
    }

    #[test]
    fn open_without_surface_fails() {
        let coordinator = Rc::new(MenuCoordinator::new());
        let mut menu = MenuButton::new("File", MenuTheme::light(), &coordinator, Vec::new);

        let err = menu.open().unwrap_err();
        assert_eq!(
            err,
            MenuError::MissingSurface {
                title: "File".into()
            }
        );
        assert!(!menu.is_open());
    }

    #[test]
    fn double_close_is_a_noop() {
        let log = Log::default();
        let mut menu = button(&log);
        menu.open().unwrap();

        assert!(menu.close(false).is_none());
        assert!(menu.close(true).is_none());
        assert_eq!(log.hidden.get(), 1);
        assert!(!menu.is_closing());
    }

    #[test]
    fn animated_close_completes_once() {
        let log = Log::default();
        let mut menu = button(&log);
        menu.open().unwrap();

        let handle = menu.close(true).unwrap();
        assert!(!menu.is_open());
        assert!(menu.is_closing());
        assert!(menu.overlay().is_none());

        menu.complete_transition(handle).unwrap();
        assert!(!menu.is_closing());
        assert_eq!(
            menu.complete_transition(handle),
            Err(MenuError::UnknownTransition(handle.id()))
        );
    }

    #[test]
    fn theme_reaches_chrome_and_open_panel() {
        let log = Log::default();
        let mut menu = button(&log);
        menu.open().unwrap();
        let chrome = menu.chrome();
        let style = menu.with_panel(|p| p.style().clone()).unwrap();

        menu.apply_theme(&MenuTheme::dark());
        assert_eq!(menu.chrome().title_color, Color32::WHITE);
        assert_ne!(menu.with_panel(|p| p.style().clone()).unwrap(), style);

        menu.apply_theme(&MenuTheme::plain());
        menu.apply_theme(&MenuTheme::light());
        assert_eq!(menu.chrome(), chrome);
        assert_eq!(menu.with_panel(|p| p.style().clone()).unwrap(), style);
    }

    #[test]
    fn hit_test_delegates_to_panel_when_open() {
        let log = Log::default();
        let mut menu = button(&log);
        assert_eq!(menu.hit_test(pos2(50.0, 20.0)), HitTarget::Button);
        assert_eq!(menu.hit_test(pos2(50.0, 80.0)), HitTarget::Outside);

        menu.open().unwrap();
        let redo = row_center(&menu, 2);
        assert_eq!(menu.hit_test(redo), HitTarget::Panel(Some(2)));
        assert_eq!(menu.hit_test(pos2(50.0, 20.0)), HitTarget::Panel(None));
        assert_eq!(menu.highlighted(), None);
    }

    #[test]
    fn overlay_events_reach_the_state_machine() {
        let log = Log::default();
        let mut menu = button(&log);
        menu.open().unwrap();

        let undo = row_center(&menu, 0) + FRAME.min.to_vec2();
        menu.handle_overlay_event(event(GesturePhase::Press, undo, 3.0))
            .unwrap();
        menu.handle_overlay_event(event(GesturePhase::Release, undo, 3.4))
            .unwrap();

        assert_eq!(*log.selected.borrow(), vec!["Undo"]);
    }

    #[test]
    fn left_alignment_puts_panel_left_of_button() {
        let log = Log::default();
        let mut menu = button(&log).with_alignment(Alignment::Left);
        menu.open().unwrap();

        let origin = menu.panel_origin().unwrap();
        let width = menu.with_panel(|p| p.geometry().size.x).unwrap();
        assert_eq!(origin.x + width, FRAME.max.x);
        assert_eq!(origin.y, FRAME.min.y);
    }

    #[test]
    fn taps_are_ignored() {
        let log = Log::default();
        let mut menu = button(&log);
        menu.open().unwrap();
        let undo = row_center(&menu, 0);

        menu.handle_gesture(event(GesturePhase::Tap, undo, 1.0)).unwrap();

        assert!(menu.is_open());
        assert!(log.selected.borrow().is_empty());
    }
}
