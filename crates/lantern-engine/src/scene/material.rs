use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::controls::range::{self, SliderRange};

/// Blinn-Phong surface coefficients.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: 1.0,
            diffuse: 0.5,
            specular: 0.5,
            shininess: 128.0,
        }
    }
}

/// Individually adjustable material field.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MaterialField {
    Ambient,
    Diffuse,
    Specular,
    Shininess,
}

impl MaterialField {
    pub const ALL: [MaterialField; 4] = [
        MaterialField::Ambient,
        MaterialField::Diffuse,
        MaterialField::Specular,
        MaterialField::Shininess,
    ];

    pub fn range(self) -> SliderRange {
        match self {
            MaterialField::Shininess => range::SHININESS,
            _ => range::MATERIAL_COEFFICIENT,
        }
    }
}

impl fmt::Display for MaterialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MaterialField::Ambient => "AmbientK",
            MaterialField::Diffuse => "DiffuseK",
            MaterialField::Specular => "SpecularK",
            MaterialField::Shininess => "Shininess",
        })
    }
}

impl Material {
    pub fn get(&self, field: MaterialField) -> f32 {
        match field {
            MaterialField::Ambient => self.ambient,
            MaterialField::Diffuse => self.diffuse,
            MaterialField::Specular => self.specular,
            MaterialField::Shininess => self.shininess,
        }
    }

    /// Stores `v` clamped to the field's range and returns the stored value.
    pub fn set(&mut self, field: MaterialField, v: f32) -> f32 {
        let v = field.range().clamp(v);
        let slot = match field {
            MaterialField::Ambient => &mut self.ambient,
            MaterialField::Diffuse => &mut self.diffuse,
            MaterialField::Specular => &mut self.specular,
            MaterialField::Shininess => &mut self.shininess,
        };
        *slot = v;
        v
    }

    pub fn nudge(&mut self, field: MaterialField, steps: i32) -> f32 {
        let v = field.range().nudge(self.get(field), steps);
        self.set(field, v)
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            shininess: self.shininess,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let m = Material::default();
        assert_eq!((m.ambient, m.diffuse, m.specular, m.shininess), (1.0, 0.5, 0.5, 128.0));
    }

    #[test]
    fn coefficients_clamp_to_unit_range() {
        let mut m = Material::default();
        assert_eq!(m.set(MaterialField::Diffuse, 1.5), 1.0);
        assert_eq!(m.set(MaterialField::Specular, -0.1), 0.0);
        assert_eq!(m.nudge(MaterialField::Ambient, 1), 1.0);
    }

    #[test]
    fn shininess_clamps_to_its_own_range() {
        let mut m = Material::default();
        assert_eq!(m.set(MaterialField::Shininess, 0.0), 2.0);
        assert_eq!(m.set(MaterialField::Shininess, 4096.0), 1024.0);
    }

    #[test]
    fn uniform_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 16);
        assert_eq!(Material::default().uniform().shininess, 128.0);
    }
}
