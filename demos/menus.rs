//! Three drag menus, one per built-in theme.
//!
//! Run with `RUST_LOG=egui_drag_menu=debug cargo run --example menus` to
//! watch the open, select and close events.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use eframe::egui;
use egui_drag_menu::{Alignment, MenuButton, MenuCoordinator, MenuItem, MenuTheme, Shortcut};
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Drag Menus",
        options,
        Box::new(|_cc| Ok(Box::new(MenusApp::new()))),
    )
}

type Alert = Rc<RefCell<Option<String>>>;

fn edit_items(alert: &Alert) -> Vec<MenuItem> {
    let undo = Rc::clone(alert);
    vec![
        MenuItem::action("Undo", move || {
            *undo.borrow_mut() = Some("You selected undo".to_owned());
        })
        .with_shortcut(Shortcut::command("Z")),
        MenuItem::action("Redo", || {}).with_shortcut(Shortcut::command("Z").with_shift()),
        MenuItem::separator(),
        MenuItem::action("Insert Image…", || {}).with_shortcut(Shortcut::command("I").with_alt()),
        MenuItem::action("Insert Link…", || {}).with_shortcut(Shortcut::command("L").with_alt()),
        MenuItem::separator(),
        MenuItem::action("Help", || {}).with_shortcut(Shortcut::command("?")),
    ]
}

struct MenusApp {
    menus: Vec<MenuButton>,
    alert: Alert,
}

impl MenusApp {
    fn new() -> Self {
        let coordinator = Rc::new(MenuCoordinator::new());
        let alert: Alert = Rc::new(RefCell::new(None));

        let menu = |title: &str, theme: Arc<MenuTheme>, alignment: Alignment| {
            let alert = Rc::clone(&alert);
            MenuButton::new(title, theme, &coordinator, move || edit_items(&alert))
                .with_alignment(alignment)
        };

        let menus = vec![
            menu("LightMenu", MenuTheme::light(), Alignment::Right),
            menu("DarkMenu", MenuTheme::dark(), Alignment::Center),
            menu("PlainMenu", MenuTheme::plain(), Alignment::Left),
        ];

        Self { menus, alert }
    }
}

impl eframe::App for MenusApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::from_rgb(120, 160, 200)))
            .show(ctx, |ui| {
                ui.add_space(64.0);
                ui.horizontal(|ui| {
                    ui.add_space(24.0);
                    for menu in &mut self.menus {
                        menu.show(ui);
                        ui.add_space(120.0);
                    }
                });
            });

        let message = self.alert.borrow().clone();
        if let Some(message) = message {
            let mut dismissed = false;
            egui::Window::new("Undo Action")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            if dismissed {
                *self.alert.borrow_mut() = None;
            }
        }
    }
}
