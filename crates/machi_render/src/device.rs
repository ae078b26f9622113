use std::fmt::Display;

use machi_core::Handle;
use nalgebra_glm::{Mat3, Mat4, Vec2, Vec3, Vec4};
use thiserror::Error;

pub struct ShaderObject;
pub struct ProgramObject;
pub struct TextureObject;

pub type ShaderHandle = Handle<ShaderObject>;
pub type ProgramHandle = Handle<ProgramObject>;
pub type TextureHandle = Handle<TextureObject>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "Vertex"),
            ShaderStage::Fragment => write!(f, "Fragment"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

/// Pixel layout of uploaded texture data, one byte per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    R8,
    Rg8,
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(Self::R8),
            2 => Some(Self::Rg8),
            3 => Some(Self::Rgb8),
            4 => Some(Self::Rgba8),
            _ => None,
        }
    }

    pub fn channels(self) -> u8 {
        match self {
            Self::R8 => 1,
            Self::Rg8 => 2,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureWrap {
    #[default]
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
    LinearMipmapLinear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureParams {
    pub wrap_s: TextureWrap,
    pub wrap_t: TextureWrap,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub generate_mipmaps: bool,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            wrap_s: TextureWrap::Repeat,
            wrap_t: TextureWrap::Repeat,
            min_filter: TextureFilter::LinearMipmapLinear,
            mag_filter: TextureFilter::Linear,
            generate_mipmaps: true,
        }
    }
}

pub struct TextureData<'a> {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: &'a [u8],
    pub params: TextureParams,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub shading_language: String,
}

impl Display for DeviceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} (version {}, shading language {})",
            self.vendor, self.renderer, self.version, self.shading_language
        )
    }
}

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("{stage} shader compilation failed: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("Shader program linking failed: {log}")]
    Link { log: String },
    #[error("Texture upload failed: {0}")]
    TextureUpload(String),
    #[error("Unknown {kind} handle {raw}")]
    InvalidHandle { kind: &'static str, raw: usize },
}

pub type DeviceResult<T> = Result<T, DeviceError>;

/// The GPU as the rest of the engine sees it.
///
/// Calls map one-to-one onto the usual immediate-mode graphics API. Handles
/// that were never issued or were already deleted are ignored by the
/// `delete_*`, `use_*` and `bind_*` calls.
pub trait GraphicsDevice {
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> DeviceResult<ShaderHandle>;
    fn link_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> DeviceResult<ProgramHandle>;
    fn delete_shader(&mut self, shader: ShaderHandle);
    fn delete_program(&mut self, program: ProgramHandle);
    fn use_program(&mut self, program: ProgramHandle);
    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;
    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue);

    fn create_texture(&mut self, data: &TextureData<'_>) -> DeviceResult<TextureHandle>;
    fn bind_texture(&mut self, slot: u32, texture: TextureHandle);
    fn delete_texture(&mut self, texture: TextureHandle);

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);
    fn set_clear_color(&mut self, color: Vec4);
    fn set_depth_test(&mut self, enabled: bool);
    fn set_blending(&mut self, enabled: bool);
    /// Clears color, and depth when depth testing is on.
    fn clear(&mut self);

    fn info(&self) -> DeviceInfo;
}
