use std::{cell::RefCell, rc::Rc};

use nalgebra_glm::UVec2;

#[derive(Debug, Default)]
struct ControlState {
    shutdown: bool,
    fullscreen_toggles: u32,
    print_stats: bool,
    resize: Option<UVec2>,
}

/// Requests raised while events are dispatched, applied by the engine once
/// dispatch is over.
#[derive(Debug, Default)]
pub(crate) struct Requests {
    pub fullscreen_toggles: u32,
    pub print_stats: bool,
    pub resize: Option<UVec2>,
}

/// Cloneable handle for asking the engine to do something from places that
/// can't borrow it, such as event handlers.
///
/// A shutdown request sticks. Everything else is consumed once per frame.
#[derive(Debug, Clone, Default)]
pub struct EngineControl {
    state: Rc<RefCell<ControlState>>,
}

impl EngineControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_shutdown(&self) {
        self.state.borrow_mut().shutdown = true;
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.state.borrow().shutdown
    }

    pub fn request_fullscreen_toggle(&self) {
        self.state.borrow_mut().fullscreen_toggles += 1;
    }

    pub fn request_frame_stats(&self) {
        self.state.borrow_mut().print_stats = true;
    }

    /// The last request of a frame wins.
    pub fn request_resize(&self, width: u32, height: u32) {
        self.state.borrow_mut().resize = Some(UVec2::new(width, height));
    }

    pub(crate) fn take_requests(&self) -> Requests {
        let mut state = self.state.borrow_mut();

        Requests {
            fullscreen_toggles: std::mem::take(&mut state.fullscreen_toggles),
            print_stats: std::mem::take(&mut state.print_stats),
            resize: state.resize.take(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_consumed_but_shutdown_sticks() {
        let control = EngineControl::new();
        let handler_side = control.clone();

        handler_side.request_fullscreen_toggle();
        handler_side.request_fullscreen_toggle();
        handler_side.request_frame_stats();
        handler_side.request_resize(800, 600);
        handler_side.request_resize(640, 480);
        handler_side.request_shutdown();

        let requests = control.take_requests();
        assert_eq!(requests.fullscreen_toggles, 2);
        assert!(requests.print_stats);
        assert_eq!(requests.resize, Some(UVec2::new(640, 480)));

        let requests = control.take_requests();
        assert_eq!(requests.fullscreen_toggles, 0);
        assert!(!requests.print_stats);
        assert_eq!(requests.resize, None);

        assert!(control.is_shutdown_requested());
    }
}
