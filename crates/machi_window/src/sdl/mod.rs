use machi_event::Modifiers;
use nalgebra_glm::UVec2;
use sdl2::{
    event::{Event as SdlEvent, WindowEvent},
    keyboard::Mod,
    video::{FullscreenType, GLContext, GLProfile, SwapInterval, Window},
    EventPump, Sdl, VideoSubsystem,
};

use crate::{
    window_error::WindowError, Action, ContextInfo, RawWindowEvent, WindowBackend, WindowConfig,
    WindowResult,
};

mod keymap;

const GL_MAJOR: u8 = 3;
const GL_MINOR: u8 = 3;

// Field order matters: the context has to go before the window it belongs
// to, and the window before the subsystems.
struct SdlParts {
    event_pump: EventPump,
    _gl_context: GLContext,
    window: Window,
    video: VideoSubsystem,
    sdl: Sdl,
}

/// Desktop window with an OpenGL 3.3 core context, backed by SDL2.
///
/// SDL has to be driven from the thread that initialized it, so the
/// window is neither `Send` nor `Sync`.
#[derive(Default)]
pub struct SdlWindow {
    parts: Option<SdlParts>,
    close_requested: bool,
}

impl SdlWindow {
    pub fn new() -> Self {
        Self::default()
    }

    fn parts(&self) -> WindowResult<&SdlParts> {
        self.parts.as_ref().ok_or(WindowError::NotInitialized)
    }

    fn parts_mut(&mut self) -> WindowResult<&mut SdlParts> {
        self.parts.as_mut().ok_or(WindowError::NotInitialized)
    }
}

impl WindowBackend for SdlWindow {
    fn initialize(&mut self, config: &WindowConfig) -> WindowResult<()> {
        let sdl = sdl2::init().map_err(WindowError::InitFailed)?;
        let video = sdl.video().map_err(WindowError::InitFailed)?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(GL_MAJOR, GL_MINOR);
        if config.samples > 0 {
            gl_attr.set_multisample_buffers(1);
            gl_attr.set_multisample_samples(config.samples);
        }

        let mut builder = video.window(&config.title, config.size.x, config.size.y);
        builder.opengl().position_centered();
        if config.resizable {
            builder.resizable();
        }
        if config.fullscreen {
            builder.fullscreen_desktop();
        }

        let window = builder
            .build()
            .map_err(|err| WindowError::InitFailed(err.to_string()))?;

        let gl_context = window
            .gl_create_context()
            .map_err(WindowError::ContextCreation)?;
        window
            .gl_make_current(&gl_context)
            .map_err(WindowError::ContextCreation)?;

        let interval = if config.vsync {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        };
        video
            .gl_set_swap_interval(interval)
            .map_err(WindowError::Backend)?;

        let event_pump = sdl.event_pump().map_err(WindowError::InitFailed)?;

        self.parts = Some(SdlParts {
            event_pump,
            _gl_context: gl_context,
            window,
            video,
            sdl,
        });
        self.close_requested = false;

        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.parts.is_some()
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }

    fn poll_events(&mut self) -> WindowResult<Vec<RawWindowEvent>> {
        let parts = self.parts_mut()?;
        // Mouse events carry no modifier state of their own.
        let mouse_mods = modifiers(parts.sdl.keyboard().mod_state());

        let events = parts
            .event_pump
            .poll_iter()
            .filter_map(|event| translate_event(event, mouse_mods))
            .collect::<Vec<_>>();

        if events.contains(&RawWindowEvent::CloseRequested) {
            self.close_requested = true;
        }

        Ok(events)
    }

    fn swap_buffers(&mut self) {
        if let Some(parts) = self.parts.as_ref() {
            parts.window.gl_swap_window();
        }
    }

    fn size(&self) -> UVec2 {
        self.parts
            .as_ref()
            .map(|parts| {
                let (width, height) = parts.window.size();
                UVec2::new(width, height)
            })
            .unwrap_or_else(UVec2::zeros)
    }

    fn set_size(&mut self, size: UVec2) -> WindowResult<()> {
        self.parts_mut()?
            .window
            .set_size(size.x, size.y)
            .map_err(|err| WindowError::Backend(err.to_string()))
    }

    fn set_title(&mut self, title: &str) -> WindowResult<()> {
        self.parts_mut()?
            .window
            .set_title(title)
            .map_err(|err| WindowError::Backend(err.to_string()))
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> WindowResult<()> {
        let mode = if fullscreen {
            FullscreenType::Desktop
        } else {
            FullscreenType::Off
        };
        self.parts_mut()?
            .window
            .set_fullscreen(mode)
            .map_err(WindowError::Backend)
    }

    fn is_fullscreen(&self) -> bool {
        self.parts
            .as_ref()
            .is_some_and(|parts| parts.window.fullscreen_state() != FullscreenType::Off)
    }

    fn set_vsync(&mut self, enabled: bool) -> WindowResult<()> {
        let interval = if enabled {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        };
        self.parts()?
            .video
            .gl_set_swap_interval(interval)
            .map_err(WindowError::Backend)
    }

    fn context_info(&self) -> ContextInfo {
        let video_driver = self
            .parts
            .as_ref()
            .map(|parts| parts.video.current_video_driver().to_string())
            .unwrap_or_else(|| "none".into());

        ContextInfo {
            backend: "SDL2".into(),
            video_driver,
            context_version: format!("OpenGL {GL_MAJOR}.{GL_MINOR} core"),
        }
    }
}

fn translate_event(event: SdlEvent, mouse_mods: Modifiers) -> Option<RawWindowEvent> {
    let raw = match event {
        SdlEvent::Quit { .. } => RawWindowEvent::CloseRequested,
        SdlEvent::Window {
            win_event: WindowEvent::Close,
            ..
        } => RawWindowEvent::CloseRequested,
        SdlEvent::Window {
            win_event: WindowEvent::SizeChanged(width, height),
            ..
        } => RawWindowEvent::Resized {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        },
        SdlEvent::KeyDown {
            scancode,
            keymod,
            repeat,
            ..
        } => RawWindowEvent::Key {
            key: scancode.map(keymap::key_code).unwrap_or(-1),
            scancode: scancode.map(|code| code as i32).unwrap_or(-1),
            action: if repeat { Action::Repeat } else { Action::Press },
            mods: modifiers(keymod),
        },
        SdlEvent::KeyUp {
            scancode, keymod, ..
        } => RawWindowEvent::Key {
            key: scancode.map(keymap::key_code).unwrap_or(-1),
            scancode: scancode.map(|code| code as i32).unwrap_or(-1),
            action: Action::Release,
            mods: modifiers(keymod),
        },
        SdlEvent::MouseButtonDown { mouse_btn, .. } => RawWindowEvent::MouseButton {
            button: keymap::button_code(mouse_btn),
            action: Action::Press,
            mods: mouse_mods,
        },
        SdlEvent::MouseButtonUp { mouse_btn, .. } => RawWindowEvent::MouseButton {
            button: keymap::button_code(mouse_btn),
            action: Action::Release,
            mods: mouse_mods,
        },
        SdlEvent::MouseMotion { x, y, .. } => RawWindowEvent::CursorMoved {
            x: x as f64,
            y: y as f64,
        },
        SdlEvent::MouseWheel { x, y, .. } => RawWindowEvent::Scrolled {
            x_offset: x as f64,
            y_offset: y as f64,
        },
        _ => return None,
    };

    Some(raw)
}

fn modifiers(keymod: Mod) -> Modifiers {
    let mut mods = Modifiers::empty();
    mods.set(Modifiers::SHIFT, keymod.intersects(Mod::LSHIFTMOD | Mod::RSHIFTMOD));
    mods.set(Modifiers::CONTROL, keymod.intersects(Mod::LCTRLMOD | Mod::RCTRLMOD));
    mods.set(Modifiers::ALT, keymod.intersects(Mod::LALTMOD | Mod::RALTMOD));
    mods.set(Modifiers::SUPER, keymod.intersects(Mod::LGUIMOD | Mod::RGUIMOD));
    mods.set(Modifiers::CAPS_LOCK, keymod.contains(Mod::CAPSMOD));
    mods.set(Modifiers::NUM_LOCK, keymod.contains(Mod::NUMMOD));
    mods
}
