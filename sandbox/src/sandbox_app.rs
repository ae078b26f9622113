use std::path::PathBuf;

use machi_engine::{
    log::{info, warning, Logger},
    render::{Camera, GraphicsDevice, Shader, Texture},
    Application, Frame,
};
use nalgebra_glm::{self as glm, Mat4, Vec3, Vec4};

const ROTATION_SPEED: f32 = 50.0;

fn asset(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join(relative)
}

/// A spinning textured model viewed through a fly camera.
pub struct SandboxApp {
    camera: Camera,
    shader: Shader,
    texture: Option<Texture>,
    rotation: f32,
    logger: Logger,
}

impl SandboxApp {
    pub fn new(device: &mut dyn GraphicsDevice, logger: &Logger) -> Self {
        let logger = logger.scoped("Sandbox");

        let mut shader = Shader::new(&logger);
        let loaded = shader.load_from_file(
            device,
            asset("shaders/basic.vert"),
            asset("shaders/basic.frag"),
        );
        if loaded.is_err() {
            warning!(logger, "Continuing without the basic shader");
        }

        let texture_path = asset("textures/container.png");
        let texture = texture_path
            .exists()
            .then(|| Texture::new(device, &logger, 0, &texture_path));

        Self {
            camera: Camera::new(Vec3::new(0.0, 0.0, 3.0)),
            shader,
            texture,
            rotation: 0.0,
            logger,
        }
    }
}

impl Application for SandboxApp {
    fn update(&mut self, frame: &mut Frame<'_>) {
        self.camera.update(frame.input, frame.delta_time);
        self.rotation = (self.rotation + ROTATION_SPEED * frame.delta_time) % 360.0;
    }

    fn render(&mut self, frame: &mut Frame<'_>) {
        let aspect = frame.aspect_ratio();
        let device = &mut *frame.device;

        self.shader.use_program(device);

        if let Some(texture) = self.texture.as_ref().filter(|t| t.is_valid()) {
            texture.bind(device);
            self.shader.set_int(device, "texture1", texture.slot() as i32);
        }

        let axis = glm::normalize(&Vec3::new(0.5, 1.0, 0.0));
        let model = glm::rotate(&Mat4::identity(), self.rotation.to_radians(), &axis);

        self.shader.set_mat4(device, "model", &model);
        self.shader
            .set_mat4(device, "view", &self.camera.view_matrix());
        self.shader
            .set_mat4(device, "projection", &self.camera.projection_matrix(aspect));
        self.shader
            .set_vec4(device, "tint", &Vec4::new(1.0, 1.0, 1.0, 1.0));
    }

    fn on_shutdown(&mut self, device: &mut dyn GraphicsDevice) {
        let position = self.camera.position();
        info!(
            self.logger,
            "Camera ended at ({:.2}, {:.2}, {:.2}), fov {:.1}",
            position.x,
            position.y,
            position.z,
            self.camera.fov()
        );

        self.shader.release(device);
        if let Some(texture) = self.texture.as_mut() {
            texture.release(device);
        }
    }
}
