use std::{
    cell::{Ref, RefCell},
    rc::Rc,
    time::Duration,
};

use machi_event::{
    Event, EventKind, EventManager, EventQueue, KeyboardData, MouseButtonData, SubscriberId,
};
use machi_input::{InputManager, Key};
use machi_log::{debug, error, info, warning, Logger};
use machi_render::GraphicsDevice;
use machi_window::{Action, WindowBackend, WindowManager};
use nalgebra_glm::{UVec2, Vec4};

use crate::{
    Application, Clock, EngineConfig, EngineControl, EngineError, EngineResult, Frame,
    SystemClock,
};

pub const ENGINE_VERSION: &str = "1.0.0";

/// FPS is recomputed whenever this many seconds of frames have accumulated.
const FPS_UPDATE_INTERVAL: f32 = 0.5;

pub fn engine_version() -> &'static str {
    ENGINE_VERSION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    Uninitialized,
    Initialized,
    Running,
    Paused,
    ShuttingDown,
    Shutdown,
}

/// Owns the window, the graphics device, the event system and input state,
/// and drives them through the frame loop.
///
/// ```text
/// Uninitialized -> Initialized -> Running <-> Paused -> ShuttingDown -> Shutdown
/// ```
///
/// A failed [`Engine::initialize`] leaves the engine `Uninitialized` so it can
/// be retried. `Shutdown` is terminal.
pub struct Engine<W: WindowBackend, D: GraphicsDevice> {
    config: EngineConfig,
    state: EngineState,

    window: Option<WindowManager<W>>,
    device: D,
    events: EventManager,
    input: Rc<RefCell<InputManager>>,
    control: EngineControl,
    builtin_subscribers: Vec<SubscriberId>,

    clock: Box<dyn Clock>,
    logger: Logger,

    start_time: Duration,
    last_frame: Duration,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    fps: f32,
    fps_frames: u32,
    fps_timer: f32,
}

impl<W: WindowBackend, D: GraphicsDevice> Engine<W, D> {
    pub fn new(config: EngineConfig, window: W, device: D, logger: Logger) -> Self {
        let engine_logger = logger.scoped("Engine");
        info!(
            engine_logger,
            "Engine created with window title: {}", config.window_title
        );

        Self {
            config,
            state: EngineState::Uninitialized,
            window: Some(WindowManager::new(window, logger.clone())),
            device,
            events: EventManager::new(logger),
            input: Rc::new(RefCell::new(InputManager::new())),
            control: EngineControl::new(),
            builtin_subscribers: Vec::new(),
            clock: Box::new(SystemClock::new()),
            logger: engine_logger,
            start_time: Duration::ZERO,
            last_frame: Duration::ZERO,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frames: 0,
            fps_timer: 0.0,
        }
    }

    /// Replaces the time source. Meant to be called before `initialize`.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Brings up the window, the graphics state and the input system, in
    /// that order. Returns `false` and stays uninitialized on failure.
    pub fn initialize(&mut self) -> bool {
        match self.state {
            EngineState::Uninitialized => {}
            EngineState::ShuttingDown | EngineState::Shutdown => {
                error!(
                    self.logger,
                    "Cannot initialize an engine that has been shut down"
                );
                return false;
            }
            _ => {
                warning!(self.logger, "Engine already initialized");
                return true;
            }
        }

        info!(self.logger, "Initializing engine...");

        if let Err(err) = self.initialize_systems() {
            error!(self.logger, "Engine initialization failed: {err}");
            self.rollback_initialization();
            return false;
        }

        self.start_time = self.clock.now();
        self.last_frame = self.start_time;
        self.state = EngineState::Initialized;

        info!(self.logger, "Engine initialized successfully");
        self.print_system_info();

        true
    }

    fn initialize_systems(&mut self) -> EngineResult<()> {
        self.initialize_window()?;
        self.initialize_graphics();
        self.initialize_input();
        Ok(())
    }

    fn initialize_window(&mut self) -> EngineResult<()> {
        let window = self.window.as_mut().ok_or(EngineError::ShutDown)?;
        window.initialize(&self.config.window_config())?;

        window.set_close_callback(|ctx| ctx.post(EventKind::WindowClose));
        window.set_resize_callback(|ctx, width, height| {
            ctx.post(EventKind::WindowResize { width, height })
        });
        window.set_key_callback(|ctx, key, scancode, action, mods| {
            let data = KeyboardData {
                key,
                scancode,
                mods,
            };
            ctx.post(match action {
                Action::Press | Action::Repeat => EventKind::KeyPress(data),
                Action::Release => EventKind::KeyRelease(data),
            })
        });
        window.set_mouse_button_callback(|ctx, button, action, mods| {
            let data = MouseButtonData { button, mods };
            ctx.post(match action {
                Action::Press | Action::Repeat => EventKind::MousePress(data),
                Action::Release => EventKind::MouseRelease(data),
            })
        });
        window.set_cursor_callback(|ctx, x, y| ctx.post(EventKind::MouseMove { x, y }));
        window.set_scroll_callback(|ctx, x_offset, y_offset| {
            ctx.post(EventKind::MouseScroll { x_offset, y_offset })
        });

        info!(self.logger, "Window system initialized");
        Ok(())
    }

    fn initialize_graphics(&mut self) {
        let size = self.window_size();

        self.device.set_clear_color(self.config.clear_color());
        self.device.set_depth_test(self.config.enable_depth_test);
        self.device.set_blending(self.config.enable_blending);
        self.device.set_viewport(0, 0, size.x, size.y);

        info!(
            self.logger,
            "Graphics initialized on {}",
            self.device.info().renderer
        );
    }

    fn initialize_input(&mut self) {
        let input = InputManager::subscribe(&self.input, &mut self.events);

        let control = self.control.clone();
        let logger = self.logger.clone();
        let bindings = self.events.subscribe(move |event, _| {
            handle_builtin_bindings(event, &control, &logger);
            Ok(())
        });

        self.builtin_subscribers = vec![input, bindings];
        info!(self.logger, "Input system initialized");
    }

    fn rollback_initialization(&mut self) {
        for id in self.builtin_subscribers.drain(..) {
            self.events.unsubscribe(id);
        }
        if let Some(window) = self.window.as_mut() {
            window.clear_callbacks();
        }
    }

    /// Moves an initialized engine into `Running`. Returns `false` if the
    /// engine can't run.
    pub fn start(&mut self) -> bool {
        match self.state {
            EngineState::Initialized => {
                self.state = EngineState::Running;
                self.last_frame = self.clock.now();
                info!(self.logger, "Starting main loop");
                true
            }
            EngineState::Running | EngineState::Paused => true,
            _ => {
                error!(self.logger, "Cannot run: the engine is not initialized");
                false
            }
        }
    }

    /// Runs the loop with no application attached.
    pub fn run(&mut self) {
        self.run_app(&mut ());
    }

    /// Runs frames until the window closes or a shutdown is requested, then
    /// shuts the engine down.
    pub fn run_app<A: Application + ?Sized>(&mut self, app: &mut A) {
        if !self.start() {
            return;
        }

        while self.run_frame(app) {}

        info!(
            self.logger,
            "Main loop ended after {} frames", self.frame_count
        );
        app.on_shutdown(&mut self.device);
        self.shutdown();
    }

    /// Runs a single iteration of the loop. Returns whether another frame
    /// should follow.
    pub fn run_frame<A: Application + ?Sized>(&mut self, app: &mut A) -> bool {
        if !self.is_running() || self.should_stop() {
            return false;
        }

        let frame_start = self.clock.now();
        self.delta_time = frame_start.saturating_sub(self.last_frame).as_secs_f32();
        self.last_frame = frame_start;
        self.total_time = frame_start.saturating_sub(self.start_time).as_secs_f32();

        self.process_events();
        self.apply_requests();

        if self.state == EngineState::Running {
            let window_size = self.window_size();
            let input = self.input.borrow();
            let mut frame = Frame {
                device: &mut self.device,
                input: &input,
                control: &self.control,
                delta_time: self.delta_time,
                total_time: self.total_time,
                window_size,
            };

            app.update(&mut frame);
            frame.device.clear();
            app.render(&mut frame);
        }

        if let Some(window) = self.window.as_mut() {
            window.swap_buffers();
        }
        self.input.borrow_mut().end_frame();

        self.update_frame_stats();
        self.limit_frame_rate(frame_start);

        !self.should_stop()
    }

    fn should_stop(&self) -> bool {
        self.control.is_shutdown_requested()
            || self.window.as_ref().map_or(true, |window| window.should_close())
    }

    fn process_events(&mut self) {
        if let Some(window) = self.window.as_mut() {
            let timestamp = self.total_time as f64;
            if let Err(err) = window.poll_events(self.events.queue_mut(), timestamp) {
                error!(self.logger, "Failed to poll window events: {err}");
            }
        }

        self.events.dispatch();
    }

    fn apply_requests(&mut self) {
        let requests = self.control.take_requests();

        if let Some(size) = requests.resize {
            self.on_resize(size);
        }
        for _ in 0..requests.fullscreen_toggles {
            self.toggle_fullscreen();
        }
        if requests.print_stats {
            self.print_frame_stats();
        }
    }

    fn on_resize(&mut self, size: UVec2) {
        self.config.window_width = size.x;
        self.config.window_height = size.y;

        // Minimized windows report a zero size.
        if size.x > 0 && size.y > 0 {
            self.device.set_viewport(0, 0, size.x, size.y);
        }
        debug!(self.logger, "Window resized to {}x{}", size.x, size.y);
    }

    fn update_frame_stats(&mut self) {
        self.frame_count += 1;
        self.fps_frames += 1;
        self.fps_timer += self.delta_time;

        if self.fps_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.fps_frames as f32 / self.fps_timer;
            self.fps_frames = 0;
            self.fps_timer = 0.0;

            if self.config.show_fps_in_title {
                let title = format!("{} - FPS: {:.1}", self.config.window_title, self.fps);
                if let Some(window) = self.window.as_mut() {
                    if let Err(err) = window.set_title(&title) {
                        warning!(self.logger, "Could not update window title: {err}");
                    }
                }
            }
        }
    }

    fn limit_frame_rate(&self, frame_start: Duration) {
        if self.config.target_fps.is_nan() || self.config.target_fps <= 0.0 {
            return;
        }

        let Ok(target) = Duration::try_from_secs_f32(1.0 / self.config.target_fps) else {
            debug!(
                self.logger,
                "Frame limiter skipped for target FPS {}", self.config.target_fps
            );
            return;
        };
        let elapsed = self.clock.now().saturating_sub(frame_start);
        if elapsed < target {
            self.clock.sleep(target - elapsed);
        }
    }

    pub fn pause(&mut self) {
        if self.state == EngineState::Running {
            self.state = EngineState::Paused;
            info!(self.logger, "Engine paused");
        } else {
            warning!(self.logger, "Cannot pause: the engine is {:?}", self.state);
        }
    }

    /// Resumes a paused engine. The time spent paused is not counted into the
    /// next frame's delta.
    pub fn resume(&mut self) {
        if self.state == EngineState::Paused {
            self.state = EngineState::Running;
            self.last_frame = self.clock.now();
            info!(self.logger, "Engine resumed");
        } else {
            warning!(self.logger, "Cannot resume: the engine is {:?}", self.state);
        }
    }

    /// Notifies subscribers with [`EventKind::EngineShutdown`], then releases
    /// the window and every subscriber. Calling it again does nothing.
    pub fn shutdown(&mut self) {
        match self.state {
            EngineState::Uninitialized | EngineState::ShuttingDown | EngineState::Shutdown => {
                return
            }
            _ => {}
        }

        info!(self.logger, "Shutting down engine...");
        self.state = EngineState::ShuttingDown;

        let timestamp = self.clock.now().saturating_sub(self.start_time).as_secs_f64();
        self.events
            .post_event(Event::new(EventKind::EngineShutdown, timestamp));
        self.events.dispatch();

        self.events.clear_subscribers();
        self.events.clear_queue();
        self.builtin_subscribers.clear();
        self.window = None;

        self.state = EngineState::Shutdown;
        info!(self.logger, "Engine shutdown complete");
        self.logger.flush();
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        matches!(
            self.state,
            EngineState::Initialized | EngineState::Running | EngineState::Paused
        )
    }

    /// `true` while the loop is active, paused or not.
    pub fn is_running(&self) -> bool {
        matches!(self.state, EngineState::Running | EngineState::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.state == EngineState::Paused
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn input(&self) -> Ref<'_, InputManager> {
        self.input.borrow()
    }

    pub fn control(&self) -> EngineControl {
        self.control.clone()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn window(&self) -> Option<&WindowManager<W>> {
        self.window.as_ref()
    }

    pub fn window_mut(&mut self) -> Option<&mut WindowManager<W>> {
        self.window.as_mut()
    }

    /// Adds an event handler. Handlers run in subscription order, after the
    /// engine's own ones if they were added after `initialize`.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: FnMut(&Event, &mut EventQueue) -> anyhow::Result<()> + 'static,
    {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Queues an event for the next frame's dispatch.
    pub fn post_event(&mut self, kind: EventKind) {
        let event = Event::new(kind, self.total_time as f64);
        self.events.post_event(event);
    }

    fn live_window(&mut self) -> Option<&mut WindowManager<W>> {
        self.window
            .as_mut()
            .filter(|window| window.is_initialized())
    }

    pub fn window_size(&self) -> UVec2 {
        match self.window.as_ref() {
            Some(window) if window.is_initialized() => window.size(),
            _ => self.config.window_size(),
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        match self.window.as_ref() {
            Some(window) if window.is_initialized() => window.is_fullscreen(),
            _ => self.config.fullscreen,
        }
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        let size = UVec2::new(width, height);

        if let Some(window) = self.live_window() {
            if let Err(err) = window.set_size(size) {
                error!(self.logger, "Could not resize window: {err}");
                return;
            }
        }

        self.config.window_width = width;
        self.config.window_height = height;
        if self.is_initialized() {
            self.device.set_viewport(0, 0, width, height);
        }
    }

    pub fn set_window_title(&mut self, title: impl Into<String>) {
        self.config.window_title = title.into();

        let title = self.config.window_title.clone();
        if let Some(window) = self.live_window() {
            if let Err(err) = window.set_title(&title) {
                error!(self.logger, "Could not set window title: {err}");
            }
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        let Some(window) = self.live_window() else {
            self.config.fullscreen = !self.config.fullscreen;
            return;
        };

        match window.toggle_fullscreen() {
            Ok(fullscreen) => {
                self.config.fullscreen = fullscreen;
                info!(
                    self.logger,
                    "Fullscreen {}",
                    if fullscreen { "enabled" } else { "disabled" }
                );
            }
            Err(err) => error!(self.logger, "Could not toggle fullscreen: {err}"),
        }
    }

    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.config.clear_color = [r, g, b, a];
        if self.is_initialized() {
            self.device.set_clear_color(Vec4::new(r, g, b, a));
        }
    }

    pub fn enable_depth_test(&mut self, enabled: bool) {
        self.config.enable_depth_test = enabled;
        if self.is_initialized() {
            self.device.set_depth_test(enabled);
        }
    }

    pub fn enable_blending(&mut self, enabled: bool) {
        self.config.enable_blending = enabled;
        if self.is_initialized() {
            self.device.set_blending(enabled);
        }
    }

    pub fn enable_vsync(&mut self, enabled: bool) {
        self.config.vsync = enabled;
        if let Some(window) = self.live_window() {
            if let Err(err) = window.set_vsync(enabled) {
                error!(self.logger, "Could not change vsync: {err}");
            }
        }
    }

    /// Replaces the configuration and pushes every changed setting to the
    /// window and the graphics device.
    pub fn update_config(&mut self, config: EngineConfig) {
        let old = std::mem::replace(&mut self.config, config.clone());

        if old.window_title != config.window_title {
            self.set_window_title(config.window_title.clone());
        }
        if old.window_size() != config.window_size() {
            self.set_window_size(config.window_width, config.window_height);
        }
        if old.fullscreen != config.fullscreen && self.is_fullscreen() != config.fullscreen {
            self.toggle_fullscreen();
        }
        if old.vsync != config.vsync {
            self.enable_vsync(config.vsync);
        }

        let [r, g, b, a] = config.clear_color;
        self.set_clear_color(r, g, b, a);
        self.enable_depth_test(config.enable_depth_test);
        self.enable_blending(config.enable_blending);
        self.logger.set_min_level(config.log_level);

        if old.msaa_samples != config.msaa_samples {
            warning!(
                self.logger,
                "MSAA sample count changes apply to the next window only"
            );
        }

        info!(self.logger, "Configuration updated");
    }

    pub fn print_system_info(&self) {
        let size = self.window_size();

        info!(self.logger, "=== ENGINE SYSTEM INFORMATION ===");
        info!(self.logger, "Engine Version: {ENGINE_VERSION}");
        info!(self.logger, "Window Size: {}x{}", size.x, size.y);
        info!(
            self.logger,
            "Fullscreen: {}",
            if self.is_fullscreen() { "Yes" } else { "No" }
        );
        info!(
            self.logger,
            "VSync: {}",
            if self.config.vsync { "Enabled" } else { "Disabled" }
        );
        info!(self.logger, "MSAA Samples: {}", self.config.msaa_samples);
        if let Some(window) = self.window.as_ref() {
            info!(self.logger, "Window Context: {}", window.context_info());
        }
        info!(self.logger, "Graphics Device: {}", self.device.info());
        info!(self.logger, "================================");
    }

    pub fn print_frame_stats(&self) {
        info!(self.logger, "=== FRAME STATISTICS ===");
        info!(self.logger, "Current FPS: {:.1}", self.fps);
        info!(self.logger, "Frame Time: {:.3}ms", self.delta_time * 1000.0);
        info!(self.logger, "Total Runtime: {:.2}s", self.total_time);
        info!(self.logger, "Frames Rendered: {}", self.frame_count);
        info!(self.logger, "========================");
    }

    pub fn build_info(&self) -> String {
        let profile = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        };

        format!(
            "Machi Engine {ENGINE_VERSION} ({profile} build) | Graphics: {}",
            self.device.info().version
        )
    }
}

impl<W: WindowBackend, D: GraphicsDevice> Drop for Engine<W, D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn handle_builtin_bindings(event: &Event, control: &EngineControl, logger: &Logger) {
    match &event.kind {
        EventKind::KeyPress(data) => match Key::from_raw(data.key) {
            Key::Escape => {
                info!(logger, "Escape pressed, requesting shutdown");
                control.request_shutdown();
            }
            Key::F1 => control.request_frame_stats(),
            Key::F2 => control.request_fullscreen_toggle(),
            _ => {}
        },
        EventKind::WindowClose => {
            info!(logger, "Window close requested");
            control.request_shutdown();
        }
        EventKind::WindowResize { width, height } => control.request_resize(*width, *height),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use approx::assert_relative_eq;
    use machi_event::{EventType, Modifiers};
    use machi_log::{LogLevel, MemoryTarget};
    use machi_render::HeadlessDevice;
    use machi_window::{HeadlessProbe, HeadlessWindow, RawWindowEvent};

    use super::*;
    use crate::ManualClock;

    type TestEngine = Engine<HeadlessWindow, HeadlessDevice>;

    struct Harness {
        engine: TestEngine,
        probe: HeadlessProbe,
        clock: ManualClock,
        log: MemoryTarget,
    }

    fn harness_with(window: HeadlessWindow, config: EngineConfig) -> Harness {
        let log = MemoryTarget::default();
        let logger = Logger::builder()
            .with_label("Test")
            .with_target(log.clone())
            .with_min_level(LogLevel::Trace)
            .build();
        let clock = ManualClock::new();
        let probe = window.probe();
        let engine = Engine::new(config, window, HeadlessDevice::new(), logger)
            .with_clock(clock.clone());

        Harness {
            engine,
            probe,
            clock,
            log,
        }
    }

    fn harness(window: HeadlessWindow) -> Harness {
        let config = EngineConfig {
            target_fps: 0.0,
            show_fps_in_title: false,
            ..Default::default()
        };
        harness_with(window, config)
    }

    fn key(key: Key, action: Action) -> RawWindowEvent {
        RawWindowEvent::Key {
            key: key.into_raw(),
            scancode: 0,
            action,
            mods: Modifiers::empty(),
        }
    }

    #[derive(Default)]
    struct CountingApp {
        updates: usize,
        renders: usize,
        shutdowns: usize,
        saw_w_pressed: bool,
        mouse_deltas: Vec<(f64, f64)>,
    }

    impl Application for CountingApp {
        fn update(&mut self, frame: &mut Frame<'_>) {
            self.updates += 1;
            self.saw_w_pressed |= frame.input.is_key_pressed(Key::W);
            let delta = frame.input.mouse_delta();
            self.mouse_deltas.push((delta.x, delta.y));
        }

        fn render(&mut self, _frame: &mut Frame<'_>) {
            self.renders += 1;
        }

        fn on_shutdown(&mut self, _device: &mut dyn GraphicsDevice) {
            self.shutdowns += 1;
        }
    }

    #[test]
    fn failed_window_keeps_engine_uninitialized() {
        let mut h = harness(HeadlessWindow::failing("no display"));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        h.engine.subscribe(move |event, _| {
            sink.borrow_mut().push(event.event_type());
            Ok(())
        });

        assert!(!h.engine.initialize());
        assert_eq!(h.engine.state(), EngineState::Uninitialized);
        assert!(h
            .log
            .contains("Engine initialization failed: Window system failed"));

        h.engine.run();
        assert!(h.log.contains("Cannot run: the engine is not initialized"));
        assert_eq!(h.engine.frame_count(), 0);

        assert!(!h.engine.initialize());
        assert_eq!(h.engine.state(), EngineState::Uninitialized);

        drop(h);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn initialize_sets_up_graphics_state() {
        let mut h = harness(HeadlessWindow::new().keep_open());

        assert!(h.engine.initialize());
        assert!(h.engine.initialize());
        assert_eq!(h.engine.state(), EngineState::Initialized);

        let device = h.engine.device();
        assert_eq!(device.clear_color(), Vec4::new(0.2, 0.3, 0.3, 1.0));
        assert!(device.depth_test());
        assert!(!device.blending());
        assert_eq!(device.viewport(), (0, 0, 1024, 768));

        assert_eq!(h.probe.last_title().as_deref(), Some("Machi Engine"));
        assert!(h.log.contains("=== ENGINE SYSTEM INFORMATION ==="));
        assert!(h.log.contains("Engine Version: 1.0.0"));
    }

    #[test]
    fn runs_until_the_script_ends() {
        let mut h = harness(HeadlessWindow::new().with_idle_frames(3));
        let mut app = CountingApp::default();

        assert!(h.engine.initialize());
        h.engine.run_app(&mut app);

        assert_eq!(h.engine.frame_count(), 3);
        assert_eq!(app.updates, 3);
        assert_eq!(app.renders, 3);
        assert_eq!(app.shutdowns, 1);
        assert_eq!(h.probe.swaps(), 3);
        assert_eq!(h.engine.device().clear_count(), 3);
        assert_eq!(h.engine.state(), EngineState::Shutdown);
        assert!(h.probe.released());
    }

    #[test]
    fn escape_requests_shutdown() {
        let window = HeadlessWindow::new()
            .with_frame([key(Key::Escape, Action::Press)])
            .keep_open();
        let mut h = harness(window);
        let mut app = CountingApp::default();

        assert!(h.engine.initialize());
        h.engine.run_app(&mut app);

        assert_eq!(h.engine.frame_count(), 1);
        assert_eq!(app.updates, 1);
        assert_eq!(app.renders, 1);
        assert_eq!(h.probe.swaps(), 1);
        assert_eq!(h.engine.state(), EngineState::Shutdown);
        assert!(h.probe.released());
        assert!(h.log.contains("Escape pressed, requesting shutdown"));
    }

    #[test]
    fn window_close_stops_the_loop() {
        let window = HeadlessWindow::new()
            .with_frame([RawWindowEvent::CloseRequested])
            .with_idle_frames(5)
            .keep_open();
        let mut h = harness(window);

        assert!(h.engine.initialize());
        h.engine.run();

        assert_eq!(h.engine.frame_count(), 1);
        assert!(h.log.contains("Window close requested"));
        assert_eq!(h.engine.state(), EngineState::Shutdown);
    }

    #[test]
    fn input_is_visible_in_the_same_frame() {
        let window = HeadlessWindow::new()
            .with_frame([
                key(Key::W, Action::Press),
                RawWindowEvent::CursorMoved { x: 1.0, y: 1.0 },
            ])
            .with_frame([RawWindowEvent::CursorMoved { x: 5.0, y: 3.0 }])
            .with_idle_frames(1);
        let mut h = harness(window);
        let mut app = CountingApp::default();

        assert!(h.engine.initialize());
        h.engine.run_app(&mut app);

        assert!(app.saw_w_pressed);
        assert_eq!(app.mouse_deltas, vec![(0.0, 0.0), (4.0, 2.0), (0.0, 0.0)]);
    }

    #[test]
    fn resume_does_not_count_paused_time() {
        let mut h = harness(HeadlessWindow::new().keep_open());
        let mut app = CountingApp::default();

        assert!(h.engine.initialize());
        assert!(h.engine.start());

        h.clock.advance(Duration::from_millis(16));
        assert!(h.engine.run_frame(&mut app));
        assert_relative_eq!(h.engine.delta_time(), 0.016, epsilon = 1e-6);

        h.engine.pause();
        assert!(h.engine.is_paused());
        assert!(h.engine.is_running());

        h.clock.advance(Duration::from_secs(5));
        h.engine.resume();
        assert!(!h.engine.is_paused());

        h.clock.advance(Duration::from_millis(10));
        assert!(h.engine.run_frame(&mut app));
        assert_relative_eq!(h.engine.delta_time(), 0.010, epsilon = 1e-6);
        assert_relative_eq!(h.engine.total_time(), 5.026, epsilon = 1e-4);
    }

    #[test]
    fn paused_frames_skip_the_application() {
        let mut h = harness(HeadlessWindow::new().keep_open());
        let mut app = CountingApp::default();

        assert!(h.engine.initialize());
        assert!(h.engine.start());
        h.engine.pause();

        assert!(h.engine.run_frame(&mut app));
        assert_eq!(app.updates, 0);
        assert_eq!(app.renders, 0);
        assert_eq!(h.probe.swaps(), 1);
        assert_eq!(h.engine.frame_count(), 1);
    }

    #[test]
    fn pause_requires_a_running_engine() {
        let mut h = harness(HeadlessWindow::new().keep_open());
        assert!(h.engine.initialize());

        h.engine.pause();

        assert_eq!(h.engine.state(), EngineState::Initialized);
        assert!(h.log.contains("Cannot pause: the engine is Initialized"));
    }

    #[test]
    fn shutdown_notifies_subscribers_once() {
        let mut h = harness(HeadlessWindow::new().keep_open());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        h.engine.subscribe(move |event, _| {
            sink.borrow_mut().push(event.event_type());
            Ok(())
        });

        assert!(h.engine.initialize());
        h.engine.shutdown();
        h.engine.shutdown();

        assert_eq!(*seen.borrow(), vec![EventType::EngineShutdown]);
        assert_eq!(h.engine.state(), EngineState::Shutdown);
        assert!(h.engine.window().is_none());
        assert!(h.probe.released());

        assert!(!h.engine.initialize());
        assert!(!h.engine.start());
    }

    #[test]
    fn dropping_the_engine_shuts_it_down() {
        let h = harness(HeadlessWindow::new().keep_open());
        let Harness {
            mut engine, probe, ..
        } = h;
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        engine.subscribe(move |event, _| {
            sink.borrow_mut().push(event.event_type());
            Ok(())
        });
        assert!(engine.initialize());

        drop(engine);

        assert_eq!(*seen.borrow(), vec![EventType::EngineShutdown]);
        assert!(probe.released());
    }

    #[test]
    fn shutdown_before_initialize_does_nothing() {
        let mut h = harness(HeadlessWindow::new());
        h.engine.shutdown();
        assert_eq!(h.engine.state(), EngineState::Uninitialized);
        assert!(h.engine.initialize());
    }

    #[test]
    fn fps_is_measured_over_half_a_second() {
        let config = EngineConfig {
            target_fps: 0.0,
            window_title: "Demo".into(),
            ..Default::default()
        };
        let mut h = harness_with(HeadlessWindow::new().keep_open(), config);
        let mut app = CountingApp::default();

        assert!(h.engine.initialize());
        assert!(h.engine.start());

        for _ in 0..4 {
            h.clock.advance(Duration::from_millis(125));
            assert!(h.engine.run_frame(&mut app));
        }

        assert_relative_eq!(h.engine.fps(), 8.0);
        assert_eq!(h.probe.last_title().as_deref(), Some("Demo - FPS: 8.0"));
    }

    #[test]
    fn frame_limiter_sleeps_on_the_engine_clock() {
        let config = EngineConfig {
            target_fps: 50.0,
            show_fps_in_title: false,
            ..Default::default()
        };
        let mut h = harness_with(HeadlessWindow::new().keep_open(), config);
        let mut app = CountingApp::default();

        assert!(h.engine.initialize());
        assert!(h.engine.start());
        assert!(h.engine.run_frame(&mut app));
        assert!(h.engine.run_frame(&mut app));

        assert_relative_eq!(h.engine.delta_time(), 0.02, epsilon = 1e-6);
    }

    #[test]
    fn unusable_target_fps_disables_the_limiter() {
        for target_fps in [f32::NAN, f32::from_bits(1), -30.0] {
            let config = EngineConfig {
                target_fps,
                show_fps_in_title: false,
                ..Default::default()
            };
            let mut h = harness_with(HeadlessWindow::new().keep_open(), config);

            assert!(h.engine.initialize());
            assert!(h.engine.start());
            assert!(h.engine.run_frame(&mut ()));
            assert!(h.engine.run_frame(&mut ()));

            assert_eq!(h.clock.now(), Duration::ZERO);
            assert_relative_eq!(h.engine.delta_time(), 0.0);
        }
    }

    #[test]
    fn resize_updates_config_and_viewport() {
        let window = HeadlessWindow::new()
            .with_frame([RawWindowEvent::Resized {
                width: 800,
                height: 600,
            }])
            .keep_open();
        let mut h = harness(window);
        let mut app = CountingApp::default();

        assert!(h.engine.initialize());
        assert!(h.engine.start());
        assert!(h.engine.run_frame(&mut app));

        assert_eq!(h.engine.config().window_size(), UVec2::new(800, 600));
        assert_eq!(h.engine.window_size(), UVec2::new(800, 600));
        assert_eq!(h.engine.device().viewport(), (0, 0, 800, 600));
    }

    #[test]
    fn f2_toggles_fullscreen() {
        let window = HeadlessWindow::new()
            .with_frame([key(Key::F2, Action::Press)])
            .with_frame([key(Key::F2, Action::Release)])
            .keep_open();
        let mut h = harness(window);
        let mut app = CountingApp::default();

        assert!(h.engine.initialize());
        assert!(h.engine.start());
        assert!(h.engine.run_frame(&mut app));

        assert!(h.engine.is_fullscreen());
        assert!(h.engine.config().fullscreen);
        assert!(h.probe.fullscreen());

        assert!(h.engine.run_frame(&mut app));
        assert!(h.engine.is_fullscreen());
    }

    #[test]
    fn f1_prints_frame_statistics() {
        let window = HeadlessWindow::new()
            .with_frame([key(Key::F1, Action::Press)])
            .keep_open();
        let mut h = harness(window);

        assert!(h.engine.initialize());
        assert!(h.engine.start());
        assert!(h.engine.run_frame(&mut ()));

        assert!(h.log.contains("=== FRAME STATISTICS ==="));
        assert!(h.log.contains("Current FPS: 0.0"));
    }

    #[test]
    fn handlers_can_request_shutdown_through_the_control() {
        let window = HeadlessWindow::new()
            .with_frame([RawWindowEvent::Scrolled {
                x_offset: 0.0,
                y_offset: 1.0,
            }])
            .with_idle_frames(5)
            .keep_open();
        let mut h = harness(window);
        let control = h.engine.control();
        h.engine.subscribe(move |event, _| {
            if event.event_type() == EventType::MouseScroll {
                control.request_shutdown();
            }
            Ok(())
        });
        let mut app = CountingApp::default();

        assert!(h.engine.initialize());
        h.engine.run_app(&mut app);

        assert_eq!(h.engine.frame_count(), 1);
        assert_eq!(app.updates, 1);
        assert_eq!(app.renders, 1);
        assert_eq!(h.engine.state(), EngineState::Shutdown);
    }

    #[test]
    fn posted_events_reach_subscribers_on_the_next_frame() {
        let mut h = harness(HeadlessWindow::new().keep_open());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        h.engine.subscribe(move |event, _| {
            sink.borrow_mut().push(event.event_type());
            Ok(())
        });

        assert!(h.engine.initialize());
        assert!(h.engine.start());
        h.engine.post_event(EventKind::MouseScroll {
            x_offset: 0.0,
            y_offset: 2.0,
        });
        assert!(seen.borrow().is_empty());

        assert!(h.engine.run_frame(&mut ()));

        assert_eq!(*seen.borrow(), vec![EventType::MouseScroll]);
        // Scroll is a per-frame impulse.
        assert_eq!(h.engine.input().scroll_delta().y, 0.0);
    }

    #[test]
    fn setters_reach_the_collaborators() {
        let mut h = harness(HeadlessWindow::new().keep_open());
        assert!(h.engine.initialize());

        h.engine.set_clear_color(0.0, 0.0, 0.0, 1.0);
        h.engine.enable_blending(true);
        h.engine.enable_depth_test(false);
        h.engine.enable_vsync(false);
        h.engine.set_window_title("Renamed");
        h.engine.set_window_size(640, 480);

        let device = h.engine.device();
        assert_eq!(device.clear_color(), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!(device.blending());
        assert!(!device.depth_test());
        assert_eq!(device.viewport(), (0, 0, 640, 480));

        assert!(!h.probe.vsync());
        assert_eq!(h.probe.last_title().as_deref(), Some("Renamed"));
        assert_eq!(h.engine.window_size(), UVec2::new(640, 480));
        assert_eq!(h.engine.config().window_title, "Renamed");
    }

    #[test]
    fn setters_before_initialize_only_change_the_config() {
        let mut h = harness(HeadlessWindow::new().keep_open());

        h.engine.set_window_size(320, 240);
        h.engine.enable_blending(true);
        h.engine.toggle_fullscreen();

        assert!(h.engine.device().calls().is_empty());
        assert!(h.engine.is_fullscreen());

        assert!(h.engine.initialize());
        assert!(h.probe.fullscreen());
        assert_eq!(h.engine.device().viewport(), (0, 0, 320, 240));
        assert!(h.engine.device().blending());
    }

    #[test]
    fn update_config_applies_changes() {
        let mut h = harness(HeadlessWindow::new().keep_open());
        assert!(h.engine.initialize());

        let config = EngineConfig {
            window_title: "Updated".into(),
            fullscreen: true,
            vsync: false,
            enable_blending: true,
            msaa_samples: 8,
            ..h.engine.config().clone()
        };
        h.engine.update_config(config);

        assert_eq!(h.probe.last_title().as_deref(), Some("Updated"));
        assert!(h.probe.fullscreen());
        assert!(!h.probe.vsync());
        assert!(h.engine.device().blending());
        assert!(h.log.contains("MSAA sample count changes apply to the next window only"));
    }

    #[test]
    fn build_info_names_the_version() {
        let h = harness(HeadlessWindow::new());
        assert_eq!(engine_version(), "1.0.0");
        assert!(h.engine.build_info().starts_with("Machi Engine 1.0.0"));
    }
}
