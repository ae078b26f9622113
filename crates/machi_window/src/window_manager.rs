use machi_event::{Event, EventKind, EventQueue, Modifiers};
use machi_log::{debug, info, Logger};
use nalgebra_glm::UVec2;

use crate::{
    window_error::WindowError, Action, ContextInfo, RawWindowEvent, WindowBackend, WindowConfig,
    WindowResult,
};

/// What a window callback gets to work with: the queue typed events go to
/// and the time of the poll that produced the raw event.
pub struct WindowEventContext<'a> {
    pub events: &'a mut EventQueue,
    pub timestamp: f64,
}

impl WindowEventContext<'_> {
    pub fn post(&mut self, kind: EventKind) {
        self.events.push_event(Event::new(kind, self.timestamp));
    }
}

type CloseCallback = Box<dyn FnMut(&mut WindowEventContext<'_>)>;
type ResizeCallback = Box<dyn FnMut(&mut WindowEventContext<'_>, u32, u32)>;
type KeyCallback = Box<dyn FnMut(&mut WindowEventContext<'_>, i32, i32, Action, Modifiers)>;
type MouseButtonCallback = Box<dyn FnMut(&mut WindowEventContext<'_>, i32, Action, Modifiers)>;
type CursorCallback = Box<dyn FnMut(&mut WindowEventContext<'_>, f64, f64)>;
type ScrollCallback = Box<dyn FnMut(&mut WindowEventContext<'_>, f64, f64)>;

#[derive(Default)]
struct Callbacks {
    close: Option<CloseCallback>,
    resize: Option<ResizeCallback>,
    key: Option<KeyCallback>,
    mouse_button: Option<MouseButtonCallback>,
    cursor: Option<CursorCallback>,
    scroll: Option<ScrollCallback>,
}

/// Owns a [`WindowBackend`] and routes its raw events to the installed
/// callbacks. Each callback slot holds at most one callback; installing a new
/// one replaces the old, and raw events without a callback are dropped.
pub struct WindowManager<B: WindowBackend> {
    backend: B,
    callbacks: Callbacks,
    logger: Logger,
}

impl<B: WindowBackend> WindowManager<B> {
    pub fn new(backend: B, logger: Logger) -> Self {
        Self {
            backend,
            callbacks: Callbacks::default(),
            logger: logger.scoped("Window"),
        }
    }

    pub fn initialize(&mut self, config: &WindowConfig) -> WindowResult<()> {
        if config.size.x == 0 || config.size.y == 0 {
            return Err(WindowError::InvalidSize {
                width: config.size.x,
                height: config.size.y,
            });
        }

        self.backend.initialize(config)?;

        info!(
            self.logger,
            "Created window \"{}\" {}x{} ({})",
            config.title,
            config.size.x,
            config.size.y,
            self.backend.context_info()
        );

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_initialized()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn set_close_callback(&mut self, callback: impl FnMut(&mut WindowEventContext<'_>) + 'static) {
        self.callbacks.close = Some(Box::new(callback));
    }

    pub fn set_resize_callback(
        &mut self,
        callback: impl FnMut(&mut WindowEventContext<'_>, u32, u32) + 'static,
    ) {
        self.callbacks.resize = Some(Box::new(callback));
    }

    pub fn set_key_callback(
        &mut self,
        callback: impl FnMut(&mut WindowEventContext<'_>, i32, i32, Action, Modifiers) + 'static,
    ) {
        self.callbacks.key = Some(Box::new(callback));
    }

    pub fn set_mouse_button_callback(
        &mut self,
        callback: impl FnMut(&mut WindowEventContext<'_>, i32, Action, Modifiers) + 'static,
    ) {
        self.callbacks.mouse_button = Some(Box::new(callback));
    }

    pub fn set_cursor_callback(
        &mut self,
        callback: impl FnMut(&mut WindowEventContext<'_>, f64, f64) + 'static,
    ) {
        self.callbacks.cursor = Some(Box::new(callback));
    }

    pub fn set_scroll_callback(
        &mut self,
        callback: impl FnMut(&mut WindowEventContext<'_>, f64, f64) + 'static,
    ) {
        self.callbacks.scroll = Some(Box::new(callback));
    }

    pub fn clear_close_callback(&mut self) {
        self.callbacks.close = None;
    }

    pub fn clear_resize_callback(&mut self) {
        self.callbacks.resize = None;
    }

    pub fn clear_key_callback(&mut self) {
        self.callbacks.key = None;
    }

    pub fn clear_mouse_button_callback(&mut self) {
        self.callbacks.mouse_button = None;
    }

    pub fn clear_cursor_callback(&mut self) {
        self.callbacks.cursor = None;
    }

    pub fn clear_scroll_callback(&mut self) {
        self.callbacks.scroll = None;
    }

    pub fn clear_callbacks(&mut self) {
        self.callbacks = Callbacks::default();
    }

    /// Polls the backend and runs the matching callback for every raw event.
    /// Returns the number of raw events polled.
    pub fn poll_events(&mut self, events: &mut EventQueue, timestamp: f64) -> WindowResult<usize> {
        let raw_events = self.backend.poll_events()?;
        let mut ctx = WindowEventContext { events, timestamp };
        let callbacks = &mut self.callbacks;

        for raw in raw_events.iter().copied() {
            match raw {
                RawWindowEvent::CloseRequested => {
                    if let Some(cb) = callbacks.close.as_mut() {
                        cb(&mut ctx)
                    }
                }
                RawWindowEvent::Resized { width, height } => {
                    if let Some(cb) = callbacks.resize.as_mut() {
                        cb(&mut ctx, width, height)
                    }
                }
                RawWindowEvent::Key {
                    key,
                    scancode,
                    action,
                    mods,
                } => {
                    if let Some(cb) = callbacks.key.as_mut() {
                        cb(&mut ctx, key, scancode, action, mods)
                    }
                }
                RawWindowEvent::MouseButton {
                    button,
                    action,
                    mods,
                } => {
                    if let Some(cb) = callbacks.mouse_button.as_mut() {
                        cb(&mut ctx, button, action, mods)
                    }
                }
                RawWindowEvent::CursorMoved { x, y } => {
                    if let Some(cb) = callbacks.cursor.as_mut() {
                        cb(&mut ctx, x, y)
                    }
                }
                RawWindowEvent::Scrolled { x_offset, y_offset } => {
                    if let Some(cb) = callbacks.scroll.as_mut() {
                        cb(&mut ctx, x_offset, y_offset)
                    }
                }
            }
        }

        Ok(raw_events.len())
    }

    pub fn should_close(&self) -> bool {
        self.backend.should_close()
    }

    pub fn request_close(&mut self) {
        self.backend.request_close();
    }

    pub fn swap_buffers(&mut self) {
        self.backend.swap_buffers();
    }

    pub fn size(&self) -> UVec2 {
        self.backend.size()
    }

    pub fn set_size(&mut self, size: UVec2) -> WindowResult<()> {
        if size.x == 0 || size.y == 0 {
            return Err(WindowError::InvalidSize {
                width: size.x,
                height: size.y,
            });
        }
        self.backend.set_size(size)
    }

    pub fn set_title(&mut self, title: &str) -> WindowResult<()> {
        self.backend.set_title(title)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.backend.is_fullscreen()
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) -> WindowResult<()> {
        debug!(self.logger, "Fullscreen: {fullscreen}");
        self.backend.set_fullscreen(fullscreen)
    }

    pub fn toggle_fullscreen(&mut self) -> WindowResult<bool> {
        let fullscreen = !self.backend.is_fullscreen();
        self.set_fullscreen(fullscreen)?;
        Ok(fullscreen)
    }

    pub fn set_vsync(&mut self, enabled: bool) -> WindowResult<()> {
        self.backend.set_vsync(enabled)
    }

    pub fn context_info(&self) -> ContextInfo {
        self.backend.context_info()
    }
}
