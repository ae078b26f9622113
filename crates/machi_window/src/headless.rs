use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use nalgebra_glm::UVec2;

use crate::{
    window_error::WindowError, ContextInfo, RawWindowEvent, WindowBackend, WindowConfig,
    WindowResult,
};

#[derive(Debug, Default)]
struct HeadlessState {
    titles: Vec<String>,
    sizes: Vec<UVec2>,
    fullscreen: bool,
    vsync: bool,
    swaps: usize,
    polls: usize,
    released: bool,
}

/// Read access to what a [`HeadlessWindow`] was asked to do. Stays valid
/// after the window itself is dropped.
#[derive(Debug, Clone)]
pub struct HeadlessProbe(Rc<RefCell<HeadlessState>>);

impl HeadlessProbe {
    /// Every title set on the window, the creation title first.
    pub fn titles(&self) -> Vec<String> {
        self.0.borrow().titles.clone()
    }

    pub fn last_title(&self) -> Option<String> {
        self.0.borrow().titles.last().cloned()
    }

    /// Every size the window had, the creation size first.
    pub fn sizes(&self) -> Vec<UVec2> {
        self.0.borrow().sizes.clone()
    }

    pub fn fullscreen(&self) -> bool {
        self.0.borrow().fullscreen
    }

    pub fn vsync(&self) -> bool {
        self.0.borrow().vsync
    }

    pub fn swaps(&self) -> usize {
        self.0.borrow().swaps
    }

    pub fn polls(&self) -> usize {
        self.0.borrow().polls
    }

    /// `true` once the window has been dropped.
    pub fn released(&self) -> bool {
        self.0.borrow().released
    }
}

/// Window backend without an OS window. Raw events come from a script of
/// frames, one frame per [`WindowBackend::poll_events`] call.
///
/// Unless [`HeadlessWindow::keep_open`] is used the window reports that it
/// should close as soon as its script is used up.
#[derive(Debug)]
pub struct HeadlessWindow {
    frames: VecDeque<Vec<RawWindowEvent>>,
    close_when_exhausted: bool,
    init_error: Option<String>,
    initialized: bool,
    close_requested: bool,
    size: UVec2,
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessWindow {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::new(),
            close_when_exhausted: true,
            init_error: None,
            initialized: false,
            close_requested: false,
            size: UVec2::zeros(),
            state: Default::default(),
        }
    }

    /// A window whose initialization always fails.
    pub fn failing(reason: impl Into<String>) -> Self {
        let mut window = Self::new();
        window.init_error = Some(reason.into());
        window
    }

    pub fn with_frame(mut self, events: impl IntoIterator<Item = RawWindowEvent>) -> Self {
        self.frames.push_back(events.into_iter().collect());
        self
    }

    /// Appends `count` frames without events.
    pub fn with_idle_frames(mut self, count: usize) -> Self {
        self.frames.extend((0..count).map(|_| Vec::new()));
        self
    }

    /// Keeps the window open after the script ends.
    pub fn keep_open(mut self) -> Self {
        self.close_when_exhausted = false;
        self
    }

    pub fn probe(&self) -> HeadlessProbe {
        HeadlessProbe(self.state.clone())
    }

    /// Queues raw events for the next poll.
    pub fn push_frame(&mut self, events: impl IntoIterator<Item = RawWindowEvent>) {
        self.frames.push_back(events.into_iter().collect());
    }
}

impl Default for HeadlessWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowBackend for HeadlessWindow {
    fn initialize(&mut self, config: &WindowConfig) -> WindowResult<()> {
        if let Some(reason) = self.init_error.as_ref() {
            return Err(WindowError::InitFailed(reason.clone()));
        }

        self.size = config.size;
        self.initialized = true;

        let mut state = self.state.borrow_mut();
        state.titles.push(config.title.clone());
        state.sizes.push(config.size);
        state.fullscreen = config.fullscreen;
        state.vsync = config.vsync;

        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn should_close(&self) -> bool {
        self.close_requested || (self.close_when_exhausted && self.frames.is_empty())
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }

    fn poll_events(&mut self) -> WindowResult<Vec<RawWindowEvent>> {
        if !self.initialized {
            return Err(WindowError::NotInitialized);
        }

        self.state.borrow_mut().polls += 1;

        let events = self.frames.pop_front().unwrap_or_default();
        for event in events.iter() {
            match event {
                RawWindowEvent::CloseRequested => self.close_requested = true,
                RawWindowEvent::Resized { width, height } => {
                    self.size = UVec2::new(*width, *height);
                    self.state.borrow_mut().sizes.push(self.size);
                }
                _ => {}
            }
        }

        Ok(events)
    }

    fn swap_buffers(&mut self) {
        self.state.borrow_mut().swaps += 1;
    }

    fn size(&self) -> UVec2 {
        self.size
    }

    fn set_size(&mut self, size: UVec2) -> WindowResult<()> {
        self.size = size;
        self.state.borrow_mut().sizes.push(size);
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> WindowResult<()> {
        self.state.borrow_mut().titles.push(title.to_string());
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> WindowResult<()> {
        self.state.borrow_mut().fullscreen = fullscreen;
        Ok(())
    }

    fn is_fullscreen(&self) -> bool {
        self.state.borrow().fullscreen
    }

    fn set_vsync(&mut self, enabled: bool) -> WindowResult<()> {
        self.state.borrow_mut().vsync = enabled;
        Ok(())
    }

    fn context_info(&self) -> ContextInfo {
        ContextInfo {
            backend: "headless".into(),
            video_driver: "none".into(),
            context_version: "none".into(),
        }
    }
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        self.state.borrow_mut().released = true;
    }
}
