//! Input routed through the app to stock widgets.

use std::cell::RefCell;
use std::rc::Rc;

use tui_stage::app::{App, AppConfig};
use tui_stage::core::widgets::ToggleButton;
use tui_stage::core::{ToggleGroup, ToggleState, WidgetBuilder, WidgetId};
use tui_stage::types::{InputEvent, MouseButton, MouseEvent, MouseEventKind, Point, Size};

fn app() -> App {
    App::new(AppConfig::default(), Size::new(8, 20)).unwrap()
}

fn click(app: &mut App, row: i32, col: i32) -> bool {
    let mut consumed = false;
    for kind in [MouseEventKind::Press, MouseEventKind::Release] {
        let event = MouseEvent::new(Point::new(row, col), kind, MouseButton::Left);
        consumed |= app.handle_event(InputEvent::Mouse(event));
    }
    consumed
}

fn state(app: &App, id: WidgetId) -> ToggleState {
    app.root()
        .borrow()
        .tree()
        .behavior::<ToggleButton>(id)
        .map(|b| b.toggle_state())
        .unwrap()
}

#[test]
fn clicks_toggle_the_topmost_button_only() {
    let mut app = app();
    let root = app.root_id();
    let below = app
        .add_widget(root, WidgetBuilder::new().pos((0, 0)).size((1, 10)).behavior(ToggleButton::new("below")))
        .unwrap();
    let above = app
        .add_widget(root, WidgetBuilder::new().pos((0, 4)).size((1, 10)).behavior(ToggleButton::new("above")))
        .unwrap();

    assert!(click(&mut app, 0, 6));
    assert_eq!(state(&app, above), ToggleState::On);
    assert_eq!(state(&app, below), ToggleState::Off);

    assert!(click(&mut app, 0, 1));
    assert_eq!(state(&app, below), ToggleState::On);

    assert!(!click(&mut app, 5, 5));
}

#[test]
fn disabled_container_ignores_clicks() {
    let mut app = app();
    let root = app.root_id();
    let panel = app
        .add_widget(root, WidgetBuilder::new().size((3, 12)).enabled(false))
        .unwrap();
    let button = app
        .add_widget(panel, WidgetBuilder::new().size((1, 10)).behavior(ToggleButton::new("off")))
        .unwrap();

    assert!(!click(&mut app, 0, 1));
    assert_eq!(state(&app, button), ToggleState::Off);

    app.root().borrow_mut().tree_mut().set_enabled(panel, true).unwrap();
    assert!(click(&mut app, 0, 1));
    assert_eq!(state(&app, button), ToggleState::On);
}

#[test]
fn radio_group_selection_moves_and_reports() {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let mut app = app();
    let root = app.root_id();
    let group = ToggleGroup::new(false);
    let ids: Vec<WidgetId> = ["easy", "normal", "hard"]
        .iter()
        .enumerate()
        .map(|(row, label)| {
            let log = changes.clone();
            let button = ToggleButton::grouped(*label, group.clone())
                .on_toggle(move |id, s| log.borrow_mut().push((id, s)));
            app.add_widget(root, WidgetBuilder::new().pos((row as i32, 0)).size((1, 10)).behavior(button))
                .unwrap()
        })
        .collect();
    assert_eq!(group.selected(), Some(ids[0]));

    click(&mut app, 2, 0);
    assert_eq!(group.selected(), Some(ids[2]));
    assert_eq!(state(&app, ids[0]), ToggleState::Off);
    assert_eq!(state(&app, ids[2]), ToggleState::On);
    assert!(changes.borrow().contains(&(ids[2], ToggleState::On)));

    // Clicking the selected radio keeps it selected.
    click(&mut app, 2, 0);
    assert_eq!(group.selected(), Some(ids[2]));
}

#[test]
fn removed_widgets_stop_receiving_input() {
    let mut app = app();
    let root = app.root_id();
    let button = app
        .add_widget(root, WidgetBuilder::new().size((1, 10)).behavior(ToggleButton::new("gone")))
        .unwrap();
    app.remove_widget(button).unwrap();
    assert!(!click(&mut app, 0, 0));
    assert!(!app.root().borrow().tree().contains(button));
}
