//! Mapping from crossterm events to toolkit input events.

use crossterm::event::{
    Event, KeyCode, KeyEvent as CtKeyEvent, KeyEventKind, KeyModifiers, MouseButton as CtMouseButton,
    MouseEvent as CtMouseEvent, MouseEventKind as CtMouseEventKind,
};

use crate::types::{
    InputEvent, Key, KeyEvent, Mods, MouseButton, MouseEvent, MouseEventKind, Point, Size,
};

/// Translate a terminal event. Returns `None` for events the toolkit ignores
/// (key releases, focus changes, unsupported keys).
pub fn map_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => map_key(key).map(InputEvent::Key),
        Event::Mouse(mouse) => map_mouse(mouse).map(InputEvent::Mouse),
        Event::Paste(text) => Some(InputEvent::Paste(text)),
        Event::Resize(cols, rows) => Some(InputEvent::Resize(Size::new(rows, cols))),
        Event::FocusGained | Event::FocusLost => None,
    }
}

pub fn map_key(key: CtKeyEvent) -> Option<KeyEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let code = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Insert => Key::Insert,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    let mods = Mods {
        alt: key.modifiers.contains(KeyModifiers::ALT),
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    };
    Some(KeyEvent::new(code, mods))
}

pub fn map_mouse(mouse: CtMouseEvent) -> Option<MouseEvent> {
    let (kind, button) = match mouse.kind {
        CtMouseEventKind::Down(b) => (MouseEventKind::Press, map_button(b)),
        CtMouseEventKind::Up(b) => (MouseEventKind::Release, map_button(b)),
        CtMouseEventKind::Drag(b) => (MouseEventKind::Move, map_button(b)),
        CtMouseEventKind::Moved => (MouseEventKind::Move, MouseButton::None),
        CtMouseEventKind::ScrollUp => (MouseEventKind::ScrollUp, MouseButton::None),
        CtMouseEventKind::ScrollDown => (MouseEventKind::ScrollDown, MouseButton::None),
        CtMouseEventKind::ScrollLeft | CtMouseEventKind::ScrollRight => return None,
    };
    let pos = Point::new(mouse.row as i32, mouse.column as i32);
    Some(MouseEvent::new(pos, kind, button))
}

fn map_button(button: CtMouseButton) -> MouseButton {
    match button {
        CtMouseButton::Left => MouseButton::Left,
        CtMouseButton::Middle => MouseButton::Middle,
        CtMouseButton::Right => MouseButton::Right,
    }
}

/// Check if key should stop the application.
pub fn should_quit(key: CtKeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && key.code == KeyCode::Char('c')
        && key.modifiers.contains(KeyModifiers::CONTROL)
}
