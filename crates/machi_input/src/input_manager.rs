use std::{cell::RefCell, rc::Rc};

use machi_core::BitTable;
use machi_event::{Event, EventKind, EventManager, Modifiers, SubscriberId};
use nalgebra_glm as glm;

use crate::{keyboard::Key, mouse::MouseButton};

pub const KEY_COUNT: usize = 1024;
pub const MOUSE_BUTTON_COUNT: usize = 16;

/// Current keyboard and mouse state, rebuilt from input events.
///
/// [`InputManager::on_event`] is the only writer. Codes outside the tables
/// are ignored on write and read back as released.
#[derive(Debug)]
pub struct InputManager {
    keys: BitTable,
    buttons: BitTable,
    modifiers: Modifiers,
    mouse_position: glm::DVec2,
    mouse_delta: glm::DVec2,
    scroll_delta: glm::DVec2,
    has_cursor: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self {
            keys: BitTable::new(KEY_COUNT),
            buttons: BitTable::new(MOUSE_BUTTON_COUNT),
            modifiers: Modifiers::empty(),
            mouse_position: glm::DVec2::zeros(),
            mouse_delta: glm::DVec2::zeros(),
            scroll_delta: glm::DVec2::zeros(),
            has_cursor: false,
        }
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a shared input manager to `events`.
    pub fn subscribe(this: &Rc<RefCell<Self>>, events: &mut EventManager) -> SubscriberId {
        let input = this.clone();
        events.subscribe(move |event, _| {
            input.borrow_mut().on_event(event);
            Ok(())
        })
    }

    pub fn on_event(&mut self, event: &Event) {
        match event.kind {
            EventKind::KeyPress(data) => {
                self.keys.set(data.key.into(), true);
                self.modifiers = data.mods;
            }
            EventKind::KeyRelease(data) => {
                self.keys.set(data.key.into(), false);
                self.modifiers = data.mods;
            }
            EventKind::MousePress(data) => {
                self.buttons.set(data.button.into(), true);
                self.modifiers = data.mods;
            }
            EventKind::MouseRelease(data) => {
                self.buttons.set(data.button.into(), false);
                self.modifiers = data.mods;
            }
            EventKind::MouseMove { x, y } => {
                let position = glm::vec2(x, y);
                // The first reported position has nothing to be relative to.
                if self.has_cursor {
                    self.mouse_delta += position - self.mouse_position;
                }
                self.mouse_position = position;
                self.has_cursor = true;
            }
            EventKind::MouseScroll { x_offset, y_offset } => {
                self.scroll_delta += glm::vec2(x_offset, y_offset);
            }
            EventKind::WindowResize { .. }
            | EventKind::WindowClose
            | EventKind::EngineShutdown => {}
        }
    }

    pub fn is_key_pressed(&self, key: impl Into<i32>) -> bool {
        let code: i32 = key.into();
        self.keys.get(code.into())
    }

    pub fn is_mouse_button_pressed(&self, button: impl Into<i32>) -> bool {
        let code: i32 = button.into();
        self.buttons.get(code.into())
    }

    /// Modifiers reported by the latest key or button event.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn pressed_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys.iter_set().map(|code| Key::from_raw(code as i32))
    }

    pub fn pressed_buttons(&self) -> impl Iterator<Item = MouseButton> + '_ {
        self.buttons
            .iter_set()
            .map(|code| MouseButton::from_raw(code as i32))
    }

    pub fn mouse_position(&self) -> glm::DVec2 {
        self.mouse_position
    }

    /// Cursor movement accumulated since the last [`InputManager::reset_mouse_delta`].
    pub fn mouse_delta(&self) -> glm::DVec2 {
        self.mouse_delta
    }

    pub fn scroll_delta(&self) -> glm::DVec2 {
        self.scroll_delta
    }

    pub fn reset_mouse_delta(&mut self) {
        self.mouse_delta = glm::DVec2::zeros();
    }

    pub fn clear_scroll(&mut self) {
        self.scroll_delta = glm::DVec2::zeros();
    }

    /// Drops per-frame impulses.
    pub fn end_frame(&mut self) {
        self.reset_mouse_delta();
        self.clear_scroll();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use machi_event::EventKind;

    use super::*;

    fn press(key: i32) -> Event {
        Event::key_press(key, 0, Modifiers::empty(), 0.0)
    }

    fn release(key: i32) -> Event {
        Event::key_release(key, 0, Modifiers::empty(), 0.0)
    }

    #[test]
    fn key_state_follows_press_and_release() {
        let mut input = InputManager::new();

        input.on_event(&press(Key::W.into()));
        assert!(input.is_key_pressed(Key::W));
        assert!(!input.is_key_pressed(Key::S));

        input.on_event(&release(Key::W.into()));
        assert!(!input.is_key_pressed(Key::W));
    }

    #[test]
    fn out_of_range_codes_are_ignored() {
        let mut input = InputManager::new();

        input.on_event(&press(-1));
        input.on_event(&press(KEY_COUNT as i32));
        input.on_event(&Event::mouse_press(99, Modifiers::empty(), 0.0));

        assert!(!input.is_key_pressed(-1));
        assert!(!input.is_key_pressed(KEY_COUNT as i32));
        assert!(!input.is_mouse_button_pressed(99));
        assert_eq!(input.pressed_keys().count(), 0);

        input.on_event(&press(KEY_COUNT as i32 - 1));
        assert!(input.is_key_pressed(KEY_COUNT as i32 - 1));
    }

    #[test]
    fn mouse_buttons_and_modifiers() {
        let mut input = InputManager::new();

        input.on_event(&Event::mouse_press(
            MouseButton::Right.into(),
            Modifiers::CONTROL,
            0.0,
        ));

        assert!(input.is_mouse_button_pressed(MouseButton::Right));
        assert_eq!(input.modifiers(), Modifiers::CONTROL);
        assert_eq!(
            input.pressed_buttons().collect::<Vec<_>>(),
            vec![MouseButton::Right]
        );

        input.on_event(&Event::mouse_release(
            MouseButton::Right.into(),
            Modifiers::empty(),
            0.0,
        ));
        assert!(!input.is_mouse_button_pressed(MouseButton::Right));
    }

    #[test]
    fn first_move_only_records_position() {
        let mut input = InputManager::new();

        input.on_event(&Event::mouse_move(400.0, 300.0, 0.0));
        assert_relative_eq!(input.mouse_delta(), glm::DVec2::zeros());
        assert_relative_eq!(input.mouse_position(), glm::vec2(400.0, 300.0));

        input.on_event(&Event::mouse_move(410.0, 295.0, 0.0));
        input.on_event(&Event::mouse_move(415.0, 300.0, 0.0));
        assert_relative_eq!(input.mouse_delta(), glm::vec2(15.0, 0.0));

        input.reset_mouse_delta();
        assert_relative_eq!(input.mouse_delta(), glm::DVec2::zeros());
        assert_relative_eq!(input.mouse_position(), glm::vec2(415.0, 300.0));
    }

    #[test]
    fn scroll_accumulates_until_cleared() {
        let mut input = InputManager::new();

        input.on_event(&Event::mouse_scroll(0.0, 1.0, 0.0));
        input.on_event(&Event::mouse_scroll(0.5, 2.0, 0.0));
        assert_relative_eq!(input.scroll_delta(), glm::vec2(0.5, 3.0));

        input.end_frame();
        assert_relative_eq!(input.scroll_delta(), glm::DVec2::zeros());
    }

    #[test]
    fn other_events_leave_state_alone() {
        let mut input = InputManager::new();
        input.on_event(&Event::new(EventKind::WindowClose, 0.0));
        input.on_event(&Event::window_resize(800, 600, 0.0));

        assert_eq!(input.pressed_keys().count(), 0);
        assert_relative_eq!(input.mouse_delta(), glm::DVec2::zeros());
    }

    #[test]
    fn subscribed_manager_sees_dispatched_events() {
        let input = Rc::new(RefCell::new(InputManager::new()));
        let mut events = EventManager::default();
        InputManager::subscribe(&input, &mut events);

        events.post_event(press(Key::Space.into()));
        events.dispatch();

        assert!(input.borrow().is_key_pressed(Key::Space));
    }
}
