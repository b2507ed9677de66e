//! Error types for gamma-shield.
//!
//! Configuration problems are caught once, before any run starts. Rendering
//! errors come from whichever [`Renderer`](crate::render::Renderer) the driver
//! was handed.

use std::fmt;

/// Errors found while loading or validating a [`SimConfig`](crate::SimConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Attenuation coefficient is negative or not a finite number.
    NegativeAttenuation { material: String, mu: f32 },
    /// Material thickness must be strictly positive.
    NonPositiveThickness(f32),
    /// Particle count of zero.
    NoParticles,
    /// Canvas width or height is not a positive finite number.
    InvalidCanvas { width: f32, height: f32 },
    /// Tick cap of zero.
    NoTicks,
    /// Material list is empty.
    NoMaterials,
    /// Two materials share a name.
    DuplicateMaterial(String),
    /// Emission speed is not finite.
    InvalidSpeed(f32),
    /// Failed to read or write a config file.
    Io(std::io::Error),
    /// Config file is not valid JSON for [`SimConfig`](crate::SimConfig).
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NegativeAttenuation { material, mu } => write!(
                f,
                "Material '{}' has invalid attenuation coefficient {} (must be finite and >= 0)",
                material, mu
            ),
            ConfigError::NonPositiveThickness(t) => {
                write!(f, "Material thickness must be > 0, got {}", t)
            }
            ConfigError::NoParticles => write!(f, "Particle count must be > 0"),
            ConfigError::InvalidCanvas { width, height } => write!(
                f,
                "Canvas must have positive finite dimensions, got {} x {}",
                width, height
            ),
            ConfigError::NoTicks => write!(f, "Tick cap must be > 0"),
            ConfigError::NoMaterials => write!(f, "At least one material is required"),
            ConfigError::DuplicateMaterial(name) => {
                write!(f, "Material '{}' is declared more than once", name)
            }
            ConfigError::InvalidSpeed(s) => write!(f, "Emission speed must be finite, got {}", s),
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(
                f,
                "No compatible GPU adapter found. Use --headless or --output-dir to run without a display."
            ),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors raised by a renderer while drawing.
#[derive(Debug)]
pub enum RenderError {
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Failed to create or pump the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create a window.
    Window(winit::error::OsError),
    /// Surface could not provide a frame.
    Surface(wgpu::SurfaceError),
    /// Failed to encode an image.
    Image(image::ImageError),
    /// Failed to write output.
    Io(std::io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Gpu(e) => write!(f, "GPU error: {}", e),
            RenderError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            RenderError::Window(e) => write!(f, "Failed to create window: {}", e),
            RenderError::Surface(e) => write!(f, "Surface error: {}", e),
            RenderError::Image(e) => write!(f, "Failed to write image: {}", e),
            RenderError::Io(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Gpu(e) => Some(e),
            RenderError::EventLoop(e) => Some(e),
            RenderError::Window(e) => Some(e),
            RenderError::Surface(e) => Some(e),
            RenderError::Image(e) => Some(e),
            RenderError::Io(e) => Some(e),
        }
    }
}

impl From<GpuError> for RenderError {
    fn from(e: GpuError) -> Self {
        RenderError::Gpu(e)
    }
}

impl From<winit::error::EventLoopError> for RenderError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RenderError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for RenderError {
    fn from(e: winit::error::OsError) -> Self {
        RenderError::Window(e)
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        RenderError::Surface(e)
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        RenderError::Image(e)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

/// Errors that can occur when running a simulation session.
#[derive(Debug)]
pub enum SimulationError {
    /// Configuration rejected before the first run.
    Config(ConfigError),
    /// The renderer failed.
    Render(RenderError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "Invalid configuration: {}", e),
            SimulationError::Render(e) => write!(f, "Rendering failed: {}", e),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Render(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

impl From<RenderError> for SimulationError {
    fn from(e: RenderError) -> Self {
        SimulationError::Render(e)
    }
}
