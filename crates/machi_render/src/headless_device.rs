use std::collections::HashMap;

use machi_core::HandleAllocator;
use nalgebra_glm::Vec4;

use crate::device::{
    DeviceError, DeviceInfo, DeviceResult, GraphicsDevice, PixelFormat, ProgramHandle,
    ProgramObject, ShaderHandle, ShaderObject, ShaderStage, TextureData, TextureHandle,
    TextureObject, UniformLocation, UniformValue,
};

/// One call made on a [`HeadlessDevice`].
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceCall {
    CompileShader(ShaderStage, ShaderHandle),
    LinkProgram(ProgramHandle),
    DeleteShader(ShaderHandle),
    DeleteProgram(ProgramHandle),
    UseProgram(ProgramHandle),
    SetUniform(UniformLocation, UniformValue),
    CreateTexture {
        texture: TextureHandle,
        width: u32,
        height: u32,
        format: PixelFormat,
    },
    BindTexture {
        slot: u32,
        texture: TextureHandle,
    },
    DeleteTexture(TextureHandle),
    SetViewport {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    SetClearColor(Vec4),
    SetDepthTest(bool),
    SetBlending(bool),
    Clear,
}

struct CompiledShader {
    stage: ShaderStage,
    uniforms: Vec<String>,
}

/// Graphics device that keeps everything in memory and records every call.
///
/// Shader sources are "compiled" by collecting their `uniform` declarations.
/// Empty sources and sources containing `#error` fail to compile.
pub struct HeadlessDevice {
    calls: Vec<DeviceCall>,
    shader_ids: HandleAllocator<ShaderObject>,
    program_ids: HandleAllocator<ProgramObject>,
    texture_ids: HandleAllocator<TextureObject>,
    shaders: HashMap<ShaderHandle, CompiledShader>,
    programs: HashMap<ProgramHandle, Vec<String>>,
    textures: HashMap<TextureHandle, (u32, u32, PixelFormat)>,
    current_program: Option<ProgramHandle>,
    bound_textures: HashMap<u32, TextureHandle>,
    clear_color: Vec4,
    depth_test: bool,
    blending: bool,
    viewport: (i32, i32, u32, u32),
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            shader_ids: HandleAllocator::new(),
            program_ids: HandleAllocator::new(),
            texture_ids: HandleAllocator::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            textures: HashMap::new(),
            current_program: None,
            bound_textures: HashMap::new(),
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            depth_test: false,
            blending: false,
            viewport: (0, 0, 0, 0),
        }
    }
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of `clear` calls, which is one per rendered frame.
    pub fn clear_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DeviceCall::Clear))
            .count()
    }

    pub fn clear_color(&self) -> Vec4 {
        self.clear_color
    }

    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    pub fn blending(&self) -> bool {
        self.blending
    }

    /// `(x, y, width, height)`
    pub fn viewport(&self) -> (i32, i32, u32, u32) {
        self.viewport
    }

    pub fn current_program(&self) -> Option<ProgramHandle> {
        self.current_program
    }

    pub fn bound_texture(&self, slot: u32) -> Option<TextureHandle> {
        self.bound_textures.get(&slot).copied()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Uniform values set so far, in call order.
    pub fn uniform_values(&self) -> Vec<(UniformLocation, UniformValue)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::SetUniform(location, value) => Some((*location, *value)),
                _ => None,
            })
            .collect()
    }
}

fn uniform_names(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace().skip_while(|token| *token != "uniform");
            tokens.next()?;
            let _ty = tokens.next()?;
            let name = tokens.next()?;
            let name = name.split(&['[', ';'][..]).next()?;
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

impl GraphicsDevice for HeadlessDevice {
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> DeviceResult<ShaderHandle> {
        if source.trim().is_empty() {
            return Err(DeviceError::Compile {
                stage,
                log: "empty shader source".into(),
            });
        }

        if let Some(line) = source.lines().find(|line| line.contains("#error")) {
            return Err(DeviceError::Compile {
                stage,
                log: line.trim().to_string(),
            });
        }

        let handle = self.shader_ids.allocate();
        self.shaders.insert(
            handle,
            CompiledShader {
                stage,
                uniforms: uniform_names(source),
            },
        );
        self.calls.push(DeviceCall::CompileShader(stage, handle));

        Ok(handle)
    }

    fn link_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> DeviceResult<ProgramHandle> {
        let (Some(vs), Some(fs)) = (self.shaders.get(&vertex), self.shaders.get(&fragment)) else {
            return Err(DeviceError::Link {
                log: "attached shader does not exist".into(),
            });
        };

        if vs.stage != ShaderStage::Vertex || fs.stage != ShaderStage::Fragment {
            return Err(DeviceError::Link {
                log: format!("expected vertex and fragment stages, got {} and {}", vs.stage, fs.stage),
            });
        }

        let mut uniforms = vs.uniforms.clone();
        for name in fs.uniforms.iter() {
            if !uniforms.contains(name) {
                uniforms.push(name.clone());
            }
        }

        let handle = self.program_ids.allocate();
        self.programs.insert(handle, uniforms);
        self.calls.push(DeviceCall::LinkProgram(handle));

        Ok(handle)
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        if self.shaders.remove(&shader).is_some() {
            self.calls.push(DeviceCall::DeleteShader(shader));
        }
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if self.programs.remove(&program).is_some() {
            if self.current_program == Some(program) {
                self.current_program = None;
            }
            self.calls.push(DeviceCall::DeleteProgram(program));
        }
    }

    fn use_program(&mut self, program: ProgramHandle) {
        if self.programs.contains_key(&program) {
            self.current_program = Some(program);
            self.calls.push(DeviceCall::UseProgram(program));
        }
    }

    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.programs
            .get(&program)?
            .iter()
            .position(|uniform| uniform == name)
            .map(|index| UniformLocation(index as i32))
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        self.calls.push(DeviceCall::SetUniform(location, value));
    }

    fn create_texture(&mut self, data: &TextureData<'_>) -> DeviceResult<TextureHandle> {
        let expected =
            data.width as usize * data.height as usize * data.format.channels() as usize;

        if data.width == 0 || data.height == 0 {
            return Err(DeviceError::TextureUpload("texture has no pixels".into()));
        }

        if data.pixels.len() != expected {
            return Err(DeviceError::TextureUpload(format!(
                "expected {expected} bytes of pixel data, got {}",
                data.pixels.len()
            )));
        }

        let texture = self.texture_ids.allocate();
        self.textures
            .insert(texture, (data.width, data.height, data.format));
        self.calls.push(DeviceCall::CreateTexture {
            texture,
            width: data.width,
            height: data.height,
            format: data.format,
        });

        Ok(texture)
    }

    fn bind_texture(&mut self, slot: u32, texture: TextureHandle) {
        if self.textures.contains_key(&texture) {
            self.bound_textures.insert(slot, texture);
            self.calls.push(DeviceCall::BindTexture { slot, texture });
        }
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture).is_some() {
            self.bound_textures.retain(|_, bound| *bound != texture);
            self.calls.push(DeviceCall::DeleteTexture(texture));
        }
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = (x, y, width, height);
        self.calls.push(DeviceCall::SetViewport {
            x,
            y,
            width,
            height,
        });
    }

    fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = color;
        self.calls.push(DeviceCall::SetClearColor(color));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
        self.calls.push(DeviceCall::SetDepthTest(enabled));
    }

    fn set_blending(&mut self, enabled: bool) {
        self.blending = enabled;
        self.calls.push(DeviceCall::SetBlending(enabled));
    }

    fn clear(&mut self) {
        self.calls.push(DeviceCall::Clear);
    }

    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            vendor: "machi".into(),
            renderer: "headless".into(),
            version: "3.3 core".into(),
            shading_language: "330".into(),
        }
    }
}
