use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::controls::range::{self, SliderRange};

/// Identifier of a selectable post-process effect.
///
/// Order matches the effect list shown to the user.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum EffectKind {
    #[default]
    None,
    Grayscale,
    Blur,
    Inverse,
    ChromaticAberration,
    /// Listed but has no program; cannot be selected.
    Crt,
}

impl EffectKind {
    pub const ALL: [EffectKind; 6] = [
        EffectKind::None,
        EffectKind::Grayscale,
        EffectKind::Blur,
        EffectKind::Inverse,
        EffectKind::ChromaticAberration,
        EffectKind::Crt,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EffectKind::None => "None",
            EffectKind::Grayscale => "Grayscale",
            EffectKind::Blur => "Kernel Blur",
            EffectKind::Inverse => "Inverse",
            EffectKind::ChromaticAberration => "Chromatic Aberration",
            EffectKind::Crt => "CRT",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether a program exists for this effect.
    pub fn is_implemented(self) -> bool {
        !matches!(self, EffectKind::Crt)
    }

    /// Slider components shown while this effect is active.
    pub fn param_slots(self) -> &'static [ParamSlot] {
        match self {
            EffectKind::Blur => &[ParamSlot::BlurStrength],
            EffectKind::ChromaticAberration => &[
                ParamSlot::AberrationOffset(0),
                ParamSlot::AberrationOffset(1),
                ParamSlot::AberrationOffset(2),
                ParamSlot::AberrationDirection(0),
                ParamSlot::AberrationDirection(1),
            ],
            EffectKind::None | EffectKind::Grayscale | EffectKind::Inverse | EffectKind::Crt => &[],
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One slider component of an effect parameter block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ParamSlot {
    BlurStrength,
    /// Component 0..3 of the aberration offset.
    AberrationOffset(u8),
    /// Component 0..2 of the aberration direction.
    AberrationDirection(u8),
}

impl ParamSlot {
    pub fn range(self) -> SliderRange {
        match self {
            ParamSlot::BlurStrength => range::BLUR_STRENGTH,
            ParamSlot::AberrationOffset(_) => range::ABERRATION_OFFSET,
            ParamSlot::AberrationDirection(_) => range::ABERRATION_DIRECTION,
        }
    }

    pub fn effect(self) -> EffectKind {
        match self {
            ParamSlot::BlurStrength => EffectKind::Blur,
            ParamSlot::AberrationOffset(_) | ParamSlot::AberrationDirection(_) => {
                EffectKind::ChromaticAberration
            }
        }
    }
}

impl fmt::Display for ParamSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const XYZ: [&str; 3] = ["x", "y", "z"];
        match self {
            ParamSlot::BlurStrength => f.write_str("strength"),
            ParamSlot::AberrationOffset(i) => write!(f, "offset.{}", XYZ[*i as usize % 3]),
            ParamSlot::AberrationDirection(i) => write!(f, "direction.{}", XYZ[*i as usize % 2]),
        }
    }
}

/// Kernel blur parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlurParams {
    strength: f32,
}

impl BlurParams {
    pub const DEFAULT_STRENGTH: f32 = 16.0;

    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Sets the strength, clamped to the slider range [0, 32].
    pub fn set_strength(&mut self, v: f32) -> f32 {
        self.strength = range::BLUR_STRENGTH.clamp(v);
        self.strength
    }
}

impl Default for BlurParams {
    fn default() -> Self {
        Self { strength: Self::DEFAULT_STRENGTH }
    }
}

/// Chromatic aberration parameters: per-channel (r, g, b) offset along `direction`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AberrationParams {
    offset: Vec3,
    direction: Vec2,
}

impl AberrationParams {
    pub const DEFAULT_OFFSET: Vec3 = Vec3::new(0.009, 0.006, -0.006);
    pub const DEFAULT_DIRECTION: Vec2 = Vec2::new(1.0, 1.0);

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn set_offset(&mut self, v: Vec3) -> Vec3 {
        let r = range::ABERRATION_OFFSET;
        self.offset = Vec3::new(r.clamp(v.x), r.clamp(v.y), r.clamp(v.z));
        self.offset
    }

    pub fn set_direction(&mut self, v: Vec2) -> Vec2 {
        let r = range::ABERRATION_DIRECTION;
        self.direction = Vec2::new(r.clamp(v.x), r.clamp(v.y));
        self.direction
    }
}

impl Default for AberrationParams {
    fn default() -> Self {
        Self {
            offset: Self::DEFAULT_OFFSET,
            direction: Self::DEFAULT_DIRECTION,
        }
    }
}

/// The active effect, carrying only its own parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Effect {
    None,
    Grayscale,
    Blur(BlurParams),
    Inverse,
    ChromaticAberration(AberrationParams),
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::None => EffectKind::None,
            Effect::Grayscale => EffectKind::Grayscale,
            Effect::Blur(_) => EffectKind::Blur,
            Effect::Inverse => EffectKind::Inverse,
            Effect::ChromaticAberration(_) => EffectKind::ChromaticAberration,
        }
    }

    /// Uniform block for this effect's program.
    pub fn uniforms(&self) -> EffectUniforms {
        match self {
            Effect::None | Effect::Grayscale | Effect::Inverse => EffectUniforms::None,
            Effect::Blur(p) => EffectUniforms::Blur(BlurUniform {
                strength: p.strength,
                _pad: [0.0; 3],
            }),
            Effect::ChromaticAberration(p) => EffectUniforms::ChromaticAberration(AberrationUniform {
                offset: p.offset.to_array(),
                _pad0: 0.0,
                direction: p.direction.to_array(),
                _pad1: [0.0; 2],
            }),
        }
    }
}

/// GPU layout of the blur uniform (16 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BlurUniform {
    pub strength: f32,
    pub _pad: [f32; 3],
}

/// GPU layout of the aberration uniform: vec3 offset, vec2 direction (32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct AberrationUniform {
    pub offset: [f32; 3],
    pub _pad0: f32,
    pub direction: [f32; 2],
    pub _pad1: [f32; 2],
}

/// Uniform values pushed for one post pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EffectUniforms {
    None,
    Blur(BlurUniform),
    ChromaticAberration(AberrationUniform),
}

impl EffectUniforms {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            EffectUniforms::None => None,
            EffectUniforms::Blur(u) => Some(bytemuck::bytes_of(u)),
            EffectUniforms::ChromaticAberration(u) => Some(bytemuck::bytes_of(u)),
        }
    }
}

/// Selecting an effect that has no program.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UnsupportedEffect(pub EffectKind);

impl fmt::Display for UnsupportedEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect \"{}\" has no program", self.0)
    }
}

impl std::error::Error for UnsupportedEffect {}

/// User-facing effect selection.
///
/// Exactly one effect is active. Every effect keeps its own parameter block
/// across switches; only the active one is read when a frame is drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectSettings {
    active: EffectKind,
    blur: BlurParams,
    aberration: AberrationParams,
}

impl EffectSettings {
    pub fn active_kind(&self) -> EffectKind {
        self.active
    }

    /// The active effect with its parameters.
    pub fn active(&self) -> Effect {
        match self.active {
            // `select` never stores Crt.
            EffectKind::None | EffectKind::Crt => Effect::None,
            EffectKind::Grayscale => Effect::Grayscale,
            EffectKind::Blur => Effect::Blur(self.blur),
            EffectKind::Inverse => Effect::Inverse,
            EffectKind::ChromaticAberration => Effect::ChromaticAberration(self.aberration),
        }
    }

    /// Makes `kind` the active effect. Unimplemented effects are rejected and
    /// the current selection is kept.
    pub fn select(&mut self, kind: EffectKind) -> Result<(), UnsupportedEffect> {
        if !kind.is_implemented() {
            return Err(UnsupportedEffect(kind));
        }
        self.active = kind;
        Ok(())
    }

    /// Steps through the effect list, skipping unimplemented entries, and
    /// returns the new active effect.
    pub fn cycle(&mut self, forward: bool) -> EffectKind {
        let n = EffectKind::ALL.len();
        let mut i = self.active.index();
        for _ in 0..n {
            i = if forward { (i + 1) % n } else { (i + n - 1) % n };
            let kind = EffectKind::ALL[i];
            if kind.is_implemented() {
                self.active = kind;
                break;
            }
        }
        self.active
    }

    pub fn blur(&self) -> &BlurParams {
        &self.blur
    }

    pub fn aberration(&self) -> &AberrationParams {
        &self.aberration
    }

    /// Reads one slider component.
    pub fn param(&self, slot: ParamSlot) -> f32 {
        match slot {
            ParamSlot::BlurStrength => self.blur.strength,
            ParamSlot::AberrationOffset(i) => self.aberration.offset[i as usize % 3],
            ParamSlot::AberrationDirection(i) => self.aberration.direction[i as usize % 2],
        }
    }

    /// Writes one slider component, clamped to its range. Returns the stored value.
    pub fn set_param(&mut self, slot: ParamSlot, v: f32) -> f32 {
        match slot {
            ParamSlot::BlurStrength => self.blur.set_strength(v),
            ParamSlot::AberrationOffset(i) => {
                let mut offset = self.aberration.offset;
                offset[i as usize % 3] = v;
                self.aberration.set_offset(offset)[i as usize % 3]
            }
            ParamSlot::AberrationDirection(i) => {
                let mut dir = self.aberration.direction;
                dir[i as usize % 2] = v;
                self.aberration.set_direction(dir)[i as usize % 2]
            }
        }
    }

    pub fn nudge_param(&mut self, slot: ParamSlot, steps: i32) -> f32 {
        let v = slot.range().nudge(self.param(slot), steps);
        self.set_param(slot, v)
    }
}
