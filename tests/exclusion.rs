use std::cell::RefCell;
use std::rc::Rc;

use egui::{Pos2, Rect, pos2, vec2};
use egui_drag_menu::{
    GestureEvent, GesturePhase, MenuButton, MenuCoordinator, MenuError, MenuItem, MenuTheme,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("egui_drag_menu=trace")
        .with_test_writer()
        .try_init();
}

fn surface() -> Rect {
    Rect::from_min_size(Pos2::ZERO, vec2(1024.0, 768.0))
}

fn menu(coordinator: &Rc<MenuCoordinator>, index: usize, log: &Rc<RefCell<Vec<String>>>) -> MenuButton {
    let log = Rc::clone(log);
    let title = format!("Menu {index}");
    let label = title.clone();
    MenuButton::new(title, MenuTheme::light(), coordinator, move || {
        let log = Rc::clone(&log);
        let label = label.clone();
        vec![
            MenuItem::action("Open", move || log.borrow_mut().push(format!("{label}: Open"))),
            MenuItem::separator(),
            MenuItem::action("Close", || {}),
        ]
    })
    .with_frame(Rect::from_min_size(
        pos2(20.0 + 180.0 * index as f32, 40.0),
        vec2(120.0, 36.0),
    ))
    .with_surface(surface())
}

#[test]
fn at_most_one_menu_is_open() {
    init_tracing();
    let coordinator = Rc::new(MenuCoordinator::new());
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut menus: Vec<MenuButton> = (0..4).map(|i| menu(&coordinator, i, &log)).collect();

    for round in [0, 2, 1, 3, 3, 0] {
        menus[round].open().unwrap();
        let open: Vec<usize> = menus
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_open())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(open, vec![round]);
    }

    // Broadcast closes are immediate, nothing is left fading.
    assert!(menus.iter().all(|m| !m.is_closing()));
}

#[test]
fn press_drag_release_selects_and_fades_out() {
    init_tracing();
    let coordinator = Rc::new(MenuCoordinator::new());
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut first = menu(&coordinator, 0, &log);
    let mut second = menu(&coordinator, 1, &log);

    second.open().unwrap();

    first
        .handle_gesture(GestureEvent::new(GesturePhase::Press, pos2(60.0, 18.0), 10.0))
        .unwrap();
    assert!(first.is_open());
    assert!(!second.is_open());

    let target = first
        .panel_rect()
        .and_then(|rect| {
            first.with_panel(|panel| panel.geometry().item_rect(0).unwrap().translate(rect.min.to_vec2()))
        })
        .unwrap();

    let start = pos2(60.0, 18.0);
    let release = target.center() - first.frame().min.to_vec2();
    for (step, time) in [(0.25, 10.1), (0.5, 10.2), (1.0, 10.4)] {
        first
            .handle_gesture(GestureEvent::new(GesturePhase::Move, start.lerp(release, step), time))
            .unwrap();
    }
    assert_eq!(first.highlighted(), Some(0));
    first
        .handle_gesture(GestureEvent::new(GesturePhase::Release, release, 10.5))
        .unwrap();

    assert_eq!(*log.borrow(), vec!["Menu 0: Open".to_owned()]);
    assert!(!first.is_open());
    assert!(first.is_closing());
}

#[test]
fn dropped_menu_leaves_the_coordinator() {
    let coordinator = Rc::new(MenuCoordinator::new());
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut kept = menu(&coordinator, 0, &log);
    let dropped = menu(&coordinator, 1, &log);
    assert_eq!(coordinator.subscriber_count(), 2);

    drop(dropped);
    kept.open().unwrap();

    assert_eq!(coordinator.subscriber_count(), 1);
    assert!(kept.is_open());
}

#[test]
fn stale_transition_handles_are_rejected() {
    let coordinator = Rc::new(MenuCoordinator::new());
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut menu = menu(&coordinator, 0, &log);

    menu.open().unwrap();
    let handle = menu.close(true).unwrap();
    menu.open().unwrap();
    let second = menu.close(true).unwrap();
    assert_ne!(handle.id(), second.id());

    menu.complete_transition(second).unwrap();
    assert!(menu.is_closing());
    menu.complete_transition(handle).unwrap();
    assert!(!menu.is_closing());
    assert_eq!(
        menu.complete_transition(handle),
        Err(MenuError::UnknownTransition(handle.id()))
    );
}
