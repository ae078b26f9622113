use std::{collections::HashMap, io, path::Path};

use machi_core::utils::{read_text, FromIoError};
use machi_log::{debug, error, info, warning, Logger};
use nalgebra_glm::{Mat3, Mat4, Vec2, Vec3, Vec4};
use thiserror::Error;

use crate::device::{
    DeviceError, GraphicsDevice, ProgramHandle, ShaderStage, UniformLocation, UniformValue,
};

#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("IO error on `{path}`: {source}")]
    Io { path: String, source: io::Error },
    #[error(transparent)]
    Device(#[from] DeviceError),
}

impl FromIoError for ShaderError {
    fn io_err<P: AsRef<Path>>(path: P, err: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_string_lossy().into(),
            source: err,
        }
    }
}

pub type ShaderResult<T> = Result<T, ShaderError>;

/// A linked vertex + fragment program.
///
/// A shader that failed to load stays usable: [`Shader::use_program`] and
/// the uniform setters log a warning and do nothing.
pub struct Shader {
    program: Option<ProgramHandle>,
    locations: HashMap<String, Option<UniformLocation>>,
    logger: Logger,
}

impl Shader {
    pub fn new(logger: &Logger) -> Self {
        Self {
            program: None,
            locations: HashMap::new(),
            logger: logger.scoped("Shader"),
        }
    }

    pub fn load_from_file(
        &mut self,
        device: &mut dyn GraphicsDevice,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> ShaderResult<()> {
        let vertex_path = vertex_path.as_ref();
        let fragment_path = fragment_path.as_ref();

        info!(
            self.logger,
            "Loading shader from `{}` and `{}`",
            vertex_path.display(),
            fragment_path.display()
        );

        let sources = read_text::<_, ShaderError>(vertex_path).and_then(|vertex| {
            read_text::<_, ShaderError>(fragment_path).map(|fragment| (vertex, fragment))
        });

        match sources {
            Ok((vertex, fragment)) => self.load_from_source(device, &vertex, &fragment),
            Err(err) => {
                error!(self.logger, "{err}");
                self.release(device);
                Err(err)
            }
        }
    }

    /// Compiles and links a new program, replacing the current one.
    pub fn load_from_source(
        &mut self,
        device: &mut dyn GraphicsDevice,
        vertex_source: &str,
        fragment_source: &str,
    ) -> ShaderResult<()> {
        self.release(device);

        match Self::build_program(device, vertex_source, fragment_source) {
            Ok(program) => {
                info!(
                    self.logger,
                    "Shader compiled successfully (program {})",
                    program.as_raw()
                );
                self.program = Some(program);
                Ok(())
            }
            Err(err) => {
                error!(self.logger, "{err}");
                Err(err.into())
            }
        }
    }

    fn build_program(
        device: &mut dyn GraphicsDevice,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, DeviceError> {
        let vertex = device.compile_shader(ShaderStage::Vertex, vertex_source)?;

        let fragment = match device.compile_shader(ShaderStage::Fragment, fragment_source) {
            Ok(fragment) => fragment,
            Err(err) => {
                device.delete_shader(vertex);
                return Err(err);
            }
        };

        let program = device.link_program(vertex, fragment);

        device.delete_shader(vertex);
        device.delete_shader(fragment);

        program
    }

    pub fn is_valid(&self) -> bool {
        self.program.is_some()
    }

    pub fn program(&self) -> Option<ProgramHandle> {
        self.program
    }

    pub fn use_program(&self, device: &mut dyn GraphicsDevice) {
        match self.program {
            Some(program) => device.use_program(program),
            None => warning!(self.logger, "Attempted to use an invalid shader program"),
        }
    }

    pub fn set_int(&mut self, device: &mut dyn GraphicsDevice, name: &str, value: i32) {
        self.set_uniform(device, name, UniformValue::Int(value));
    }

    pub fn set_float(&mut self, device: &mut dyn GraphicsDevice, name: &str, value: f32) {
        self.set_uniform(device, name, UniformValue::Float(value));
    }

    pub fn set_vec2(&mut self, device: &mut dyn GraphicsDevice, name: &str, value: &Vec2) {
        self.set_uniform(device, name, UniformValue::Vec2(*value));
    }

    pub fn set_vec3(&mut self, device: &mut dyn GraphicsDevice, name: &str, value: &Vec3) {
        self.set_uniform(device, name, UniformValue::Vec3(*value));
    }

    pub fn set_vec4(&mut self, device: &mut dyn GraphicsDevice, name: &str, value: &Vec4) {
        self.set_uniform(device, name, UniformValue::Vec4(*value));
    }

    pub fn set_mat3(&mut self, device: &mut dyn GraphicsDevice, name: &str, value: &Mat3) {
        self.set_uniform(device, name, UniformValue::Mat3(*value));
    }

    pub fn set_mat4(&mut self, device: &mut dyn GraphicsDevice, name: &str, value: &Mat4) {
        self.set_uniform(device, name, UniformValue::Mat4(*value));
    }

    /// Unknown uniform names are skipped, like a `-1` location would be.
    pub fn set_uniform(&mut self, device: &mut dyn GraphicsDevice, name: &str, value: UniformValue) {
        let Some(program) = self.program else {
            warning!(self.logger, "Cannot set `{name}`: shader program is not valid");
            return;
        };

        let location = match self.locations.get(name) {
            Some(location) => *location,
            None => {
                let location = device.uniform_location(program, name);
                if location.is_none() {
                    debug!(self.logger, "Uniform `{name}` is not active in program {}", program.as_raw());
                }
                self.locations.insert(name.to_string(), location);
                location
            }
        };

        if let Some(location) = location {
            device.set_uniform(location, value);
        }
    }

    /// Deletes the program. The shader is invalid afterwards.
    pub fn release(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(program) = self.program.take() {
            device.delete_program(program);
            debug!(self.logger, "Deleted shader program {}", program.as_raw());
        }
        self.locations.clear();
    }
}
