//! Press-and-drag pull-down menu buttons for egui.
//!
//! A [`MenuButton`] is a small titled button. Pressing it opens a floating
//! [`ContentPanel`] of items that grows out of the button; dragging over the
//! panel highlights rows and releasing on a row runs its action. Several
//! buttons share a [`MenuCoordinator`] so that only one panel is ever open.
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use egui_drag_menu::{MenuButton, MenuCoordinator, MenuItem, MenuTheme, Shortcut};
//!
//! let coordinator = Rc::new(MenuCoordinator::new());
//! let mut edit = MenuButton::new("Edit", MenuTheme::light(), &coordinator, || {
//!     vec![
//!         MenuItem::action("Undo", || println!("undo")).with_shortcut(Shortcut::command("Z")),
//!         MenuItem::separator(),
//!         MenuItem::action("Help", || println!("help")),
//!     ]
//! });
//!
//! // Inside `eframe::App::update`:
//! // edit.show(ui);
//! # let _ = &mut edit;
//! ```
//!
//! The state machine itself does not depend on egui's input handling: hosts
//! that drive it from another event source feed [`GestureEvent`]s to
//! [`MenuButton::handle_gesture`] and read back the panel geometry.

pub mod error;
pub mod menu;
pub mod render;
pub mod theme;
mod utils;

pub use error::{MenuError, Result};
pub use menu::button::{
    ButtonChrome, GestureEvent, GesturePhase, GestureSession, HitTarget, MenuButton, SessionKind,
    TransitionHandle,
};
pub use menu::coordinator::{MenuCoordinator, MenuId, OpeningListener, Subscription};
pub use menu::feedback::{NoFeedback, SelectionFeedback};
pub use menu::geometry::{
    Alignment, ApproxTextMeasure, MeasureText, MenuMetrics, MenuShape, PanelGeometry,
};
pub use menu::items::{ActionItem, MenuItem, Shortcut};
pub use menu::overlay::OverlaySurface;
pub use menu::panel::{ContentPanel, PanelStyle};
pub use render::EguiTextMeasure;
pub use theme::{BlurStyle, MenuTheme, Themeable};
