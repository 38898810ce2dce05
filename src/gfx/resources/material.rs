//! Material definitions for pickable shapes
//!
//! Each object owns its material; the renderer reads it every frame. The
//! emissive color doubles as the interaction feedback channel: red is the
//! ray-over highlight and blue marks an object held by a device.

/// One emissive color channel used to signal interaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Ray is currently over the object (red channel)
    Highlight,
    /// Object is currently held by a device (blue channel)
    Held,
}

impl Indicator {
    /// Index into [`Material::emissive`]
    pub const fn channel(self) -> usize {
        match self {
            Indicator::Highlight => 0,
            Indicator::Held => 2,
        }
    }
}

/// Material definition with basic PBR properties
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.7,
            emissive: [0.0, 0.0, 0.0],
        }
    }
}

impl Material {
    /// Creates a new material with basic PBR properties
    ///
    /// # Arguments
    /// * `base_color` - RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            emissive: [0.0, 0.0, 0.0],
        }
    }

    /// Builder pattern: Set base color from RGB values
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b, self.base_color[3]];
        self
    }

    /// Builder pattern: Set metallic factor
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Current value of an indicator channel (0.0 or 1.0)
    pub fn indicator(&self, indicator: Indicator) -> f32 {
        self.emissive[indicator.channel()]
    }

    /// Switches an indicator channel fully on or off
    pub fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        self.emissive[indicator.channel()] = if on { 1.0 } else { 0.0 };
    }
}
