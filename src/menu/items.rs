use std::fmt;
use std::rc::Rc;

use egui::Modifiers;

/// A keyboard shortcut shown next to a menu row.
///
/// The menu only displays shortcuts; dispatching key presses is left to the
/// host.
///
/// # Examples
///
/// ```rust
/// use egui_drag_menu::Shortcut;
///
/// let redo = Shortcut::command("Z").with_shift();
/// assert_eq!(redo.to_string(), "⇧⌘Z");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shortcut {
    /// Key label, e.g. `"Z"` or `"?"`
    pub key: String,
    /// Modifier keys held with `key`
    pub modifiers: Modifiers,
}

impl Shortcut {
    /// Shortcut with no modifiers.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Shortcut using the platform command key.
    pub fn command(key: impl Into<String>) -> Self {
        Self::new(key).with_command()
    }

    /// Add the command modifier.
    pub fn with_command(mut self) -> Self {
        self.modifiers.command = true;
        self
    }

    /// Add the shift modifier.
    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    /// Add the alt / option modifier.
    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    /// Add the control modifier.
    pub fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Standard glyph order: control, option, shift, command.
        if self.modifiers.ctrl {
            f.write_str("⌃")?;
        }
        if self.modifiers.alt {
            f.write_str("⌥")?;
        }
        if self.modifiers.shift {
            f.write_str("⇧")?;
        }
        if self.modifiers.command || self.modifiers.mac_cmd {
            f.write_str("⌘")?;
        }
        f.write_str(&self.key)
    }
}

/// A selectable row that runs an action.
#[derive(Clone)]
pub struct ActionItem {
    /// Row text
    pub label: String,
    /// Optional shortcut shown at the trailing edge of the row
    pub shortcut: Option<Shortcut>,
    action: Rc<dyn Fn()>,
}

impl ActionItem {
    /// Create a row with `label` that runs `action` when selected.
    pub fn new(label: impl Into<String>, action: impl Fn() + 'static) -> Self {
        Self {
            label: label.into(),
            shortcut: None,
            action: Rc::new(action),
        }
    }

    /// Attach a shortcut for display.
    pub fn with_shortcut(mut self, shortcut: Shortcut) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Run the action.
    pub fn perform(&self) {
        (self.action)();
    }
}

impl fmt::Debug for ActionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionItem")
            .field("label", &self.label)
            .field("shortcut", &self.shortcut)
            .finish_non_exhaustive()
    }
}

/// One entry of a menu, in display order.
#[derive(Clone, Debug)]
pub enum MenuItem {
    /// Selectable row
    Action(ActionItem),
    /// Visual gap with a hairline; never highlighted or selected
    Separator,
}

impl MenuItem {
    /// Shorthand for an [`ActionItem`] without shortcut.
    pub fn action(label: impl Into<String>, action: impl Fn() + 'static) -> Self {
        MenuItem::Action(ActionItem::new(label, action))
    }

    /// A separator.
    pub fn separator() -> Self {
        MenuItem::Separator
    }

    /// Attach a shortcut. Separators are returned unchanged.
    pub fn with_shortcut(self, shortcut: Shortcut) -> Self {
        match self {
            MenuItem::Action(item) => MenuItem::Action(item.with_shortcut(shortcut)),
            MenuItem::Separator => MenuItem::Separator,
        }
    }

    /// Whether this entry is a separator.
    pub fn is_separator(&self) -> bool {
        matches!(self, MenuItem::Separator)
    }

    /// Row text, `None` for separators.
    pub fn label(&self) -> Option<&str> {
        match self {
            MenuItem::Action(item) => Some(&item.label),
            MenuItem::Separator => None,
        }
    }

    /// Row shortcut, if any.
    pub fn shortcut(&self) -> Option<&Shortcut> {
        match self {
            MenuItem::Action(item) => item.shortcut.as_ref(),
            MenuItem::Separator => None,
        }
    }

    /// Run the action of an action row; separators do nothing.
    pub fn perform(&self) {
        if let MenuItem::Action(item) = self {
            item.perform();
        }
    }
}

impl From<ActionItem> for MenuItem {
    fn from(item: ActionItem) -> Self {
        MenuItem::Action(item)
    }
}
