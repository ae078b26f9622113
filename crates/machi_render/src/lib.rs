pub mod camera;
pub mod device;
pub mod glm_ext;
pub mod headless_device;
pub mod shader;
pub mod texture;

pub use camera::{Camera, CameraBindings};
pub use device::{
    DeviceError, DeviceInfo, DeviceResult, GraphicsDevice, PixelFormat, ProgramHandle,
    ShaderHandle, ShaderStage, TextureData, TextureFilter, TextureHandle, TextureParams,
    TextureWrap, UniformLocation, UniformValue,
};
pub use headless_device::{DeviceCall, HeadlessDevice};
pub use shader::{Shader, ShaderError, ShaderResult};
pub use texture::{Texture, TextureError, TextureResult};
