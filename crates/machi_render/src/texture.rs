use std::{
    io,
    path::{Path, PathBuf},
};

use image::{DynamicImage, ImageError};
use machi_core::utils::{io_err_mapper, FromIoError};
use machi_log::{error, info, Logger};
use thiserror::Error;

use crate::device::{
    DeviceError, GraphicsDevice, PixelFormat, TextureData, TextureHandle, TextureParams,
};

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error on `{path}`: {source}")]
    Io { path: String, source: io::Error },
    #[error("Could not decode `{path}`: {source}")]
    Decode { path: String, source: ImageError },
    #[error("`{path}` has an unsupported channel count: {channels}")]
    UnsupportedChannels { path: String, channels: u8 },
    #[error(transparent)]
    Device(#[from] DeviceError),
}

impl FromIoError for TextureError {
    fn io_err<P: AsRef<Path>>(path: P, err: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_string_lossy().into(),
            source: err,
        }
    }
}

pub type TextureResult<T> = Result<T, TextureError>;

/// 2D texture bound to a fixed texture unit.
#[derive(Debug)]
pub struct Texture {
    handle: Option<TextureHandle>,
    slot: u32,
    width: u32,
    height: u32,
    format: Option<PixelFormat>,
    path: PathBuf,
}

impl Texture {
    /// Decodes the image at `path` and uploads it. Failures are logged and
    /// give back a texture that binds nothing.
    pub fn new(
        device: &mut dyn GraphicsDevice,
        logger: &Logger,
        slot: u32,
        path: impl AsRef<Path>,
    ) -> Self {
        let logger = logger.scoped("Texture");
        let path = path.as_ref();

        match Self::load(device, slot, path, TextureParams::default()) {
            Ok(texture) => {
                info!(
                    logger,
                    "Loaded `{}` ({}x{}, {} channels) into slot {slot}",
                    path.display(),
                    texture.width,
                    texture.height,
                    texture.channels()
                );
                texture
            }
            Err(err) => {
                error!(logger, "{err}");
                Self {
                    handle: None,
                    slot,
                    width: 0,
                    height: 0,
                    format: None,
                    path: path.to_path_buf(),
                }
            }
        }
    }

    pub fn load(
        device: &mut dyn GraphicsDevice,
        slot: u32,
        path: impl AsRef<Path>,
        params: TextureParams,
    ) -> TextureResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(io_err_mapper::<_, TextureError>(path))?;
        let image = image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
            path: path.to_string_lossy().into(),
            source,
        })?;

        let channels = image.color().channel_count();
        let format =
            PixelFormat::from_channels(channels).ok_or_else(|| TextureError::UnsupportedChannels {
                path: path.to_string_lossy().into(),
                channels,
            })?;

        let (width, height) = (image.width(), image.height());
        let pixels = pixel_bytes(image, format);

        let handle = device.create_texture(&TextureData {
            width,
            height,
            format,
            pixels: &pixels,
            params,
        })?;

        Ok(Self {
            handle: Some(handle),
            slot,
            width,
            height,
            format: Some(format),
            path: path.to_path_buf(),
        })
    }

    /// Activates the texture's unit and binds it there.
    pub fn bind(&self, device: &mut dyn GraphicsDevice) {
        if let Some(handle) = self.handle {
            device.bind_texture(self.slot, handle);
        }
    }

    pub fn release(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(handle) = self.handle.take() {
            device.delete_texture(handle);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> Option<PixelFormat> {
        self.format
    }

    pub fn channels(&self) -> u8 {
        self.format.map(PixelFormat::channels).unwrap_or(0)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn pixel_bytes(image: DynamicImage, format: PixelFormat) -> Vec<u8> {
    match format {
        PixelFormat::R8 => image.into_luma8().into_raw(),
        PixelFormat::Rg8 => image.into_luma_alpha8().into_raw(),
        PixelFormat::Rgb8 => image.into_rgb8().into_raw(),
        PixelFormat::Rgba8 => image.into_rgba8().into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use machi_log::{LogLevel, MemoryTarget};
    use tempfile::TempDir;

    use super::*;
    use crate::{DeviceCall, HeadlessDevice};

    fn logger() -> (Logger, MemoryTarget) {
        let target = MemoryTarget::default();
        let logger = Logger::builder()
            .with_label("Test")
            .with_target(target.clone())
            .with_min_level(LogLevel::Info)
            .build();
        (logger, target)
    }

    #[test]
    fn channel_count_picks_format() -> Result<()> {
        let dir = TempDir::new()?;
        let (logger, _) = logger();
        let mut device = HeadlessDevice::new();

        let gray = dir.path().join("gray.png");
        GrayImage::from_pixel(4, 2, Luma([7])).save(&gray)?;
        let rgb = dir.path().join("rgb.png");
        RgbImage::from_pixel(3, 3, Rgb([1, 2, 3])).save(&rgb)?;
        let rgba = dir.path().join("rgba.png");
        RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4])).save(&rgba)?;

        let gray = Texture::new(&mut device, &logger, 0, &gray);
        let rgb = Texture::new(&mut device, &logger, 1, &rgb);
        let rgba = Texture::new(&mut device, &logger, 2, &rgba);

        assert_eq!(gray.format(), Some(PixelFormat::R8));
        assert_eq!((gray.width(), gray.height()), (4, 2));
        assert_eq!(rgb.format(), Some(PixelFormat::Rgb8));
        assert_eq!(rgba.format(), Some(PixelFormat::Rgba8));
        assert_eq!(device.live_textures(), 3);

        Ok(())
    }

    #[test]
    fn bind_uses_texture_slot() -> Result<()> {
        let dir = TempDir::new()?;
        let (logger, target) = logger();
        let mut device = HeadlessDevice::new();

        let path = dir.path().join("wall.png");
        RgbImage::from_pixel(2, 2, Rgb([9, 9, 9])).save(&path)?;

        let texture = Texture::new(&mut device, &logger, 1, &path);
        texture.bind(&mut device);

        assert_eq!(device.bound_texture(1), texture.handle());
        assert!(target.contains("into slot 1"));
        assert!(matches!(
            device.calls().last(),
            Some(DeviceCall::BindTexture { slot: 1, .. })
        ));
        Ok(())
    }

    #[test]
    fn missing_file_gives_invalid_texture() {
        let (logger, target) = logger();
        let mut device = HeadlessDevice::new();

        let texture = Texture::new(&mut device, &logger, 0, "no/such/texture.png");
        texture.bind(&mut device);

        assert!(!texture.is_valid());
        assert_eq!(texture.channels(), 0);
        assert!(device.calls().is_empty());
        assert!(target.contains("[Texture] ERROR: IO error on `no/such/texture.png`"));
    }

    #[test]
    fn unreadable_path_is_an_io_error() {
        let mut device = HeadlessDevice::new();
        let err = Texture::load(&mut device, 0, "no/such/texture.png", TextureParams::default())
            .unwrap_err();

        match err {
            TextureError::Io { path, .. } => assert_eq!(path, "no/such/texture.png"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(device.calls().is_empty());
    }

    #[test]
    fn garbage_is_a_decode_error() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png")?;

        let mut device = HeadlessDevice::new();
        let err = Texture::load(&mut device, 0, &path, TextureParams::default()).unwrap_err();

        assert!(matches!(err, TextureError::Decode { .. }));
        assert_eq!(device.live_textures(), 0);
        Ok(())
    }

    #[test]
    fn release_deletes_texture() -> Result<()> {
        let dir = TempDir::new()?;
        let (logger, _) = logger();
        let mut device = HeadlessDevice::new();

        let path = dir.path().join("wall.png");
        RgbImage::from_pixel(1, 1, Rgb([0, 0, 0])).save(&path)?;

        let mut texture = Texture::new(&mut device, &logger, 0, &path);
        texture.release(&mut device);

        assert!(!texture.is_valid());
        assert_eq!(device.live_textures(), 0);
        Ok(())
    }
}
