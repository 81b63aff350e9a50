use crate::renderable::RenderableError;
use crate::shaders;
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::{debug, info};

/// Resolves shader names to WGSL source and compiles them.
///
/// Without a directory the embedded sources are used. With one, `<dir>/<name>.wgsl`
/// must exist; there is no fallback to the embedded copy.
#[derive(Debug, Clone, Default)]
pub struct ShaderLibrary {
    dir: Option<PathBuf>,
}

impl ShaderLibrary {
    pub fn embedded() -> Self {
        Self { dir: None }
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        info!("Loading shaders from {}", dir.display());
        Self { dir: Some(dir) }
    }

    pub fn source(&self, name: &str) -> Result<Cow<'static, str>, RenderableError> {
        match &self.dir {
            Some(dir) => {
                let path = dir.join(format!("{name}.wgsl"));
                std::fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|source| RenderableError::ShaderUnavailable { path, source })
            }
            None => shaders::embedded(name)
                .map(Cow::Borrowed)
                .ok_or_else(|| RenderableError::UnknownShader(name.to_string())),
        }
    }

    /// Load and compile `name`, reporting WGSL errors instead of panicking.
    pub fn compile(
        &self,
        device: &wgpu::Device,
        name: &str,
    ) -> Result<wgpu::ShaderModule, RenderableError> {
        let source = self.source(name)?;
        debug!("Compiling shader {name}");
        validated(device, name, || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(name),
                source: wgpu::ShaderSource::Wgsl(source),
            })
        })
    }
}

/// Run `create` inside a validation error scope.
pub fn validated<T>(
    device: &wgpu::Device,
    label: &str,
    create: impl FnOnce() -> T,
) -> Result<T, RenderableError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(value),
        Some(error) => Err(RenderableError::Validation {
            label: label.to_string(),
            message: error.to_string(),
        }),
    }
}
