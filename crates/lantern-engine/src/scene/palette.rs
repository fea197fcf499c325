use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Two-tone lighting colors for toon shading.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub name: &'static str,
    pub highlight: Vec3,
    pub shadow: Vec3,
}

pub const PRESETS: [Palette; 4] = [
    Palette {
        name: "Sunny Day",
        highlight: Vec3::new(1.00, 1.00, 1.00),
        shadow: Vec3::new(0.60, 0.54, 0.52),
    },
    Palette {
        name: "Bright Night",
        highlight: Vec3::new(0.47, 0.58, 0.68),
        shadow: Vec3::new(0.32, 0.39, 0.57),
    },
    Palette {
        name: "Rainy Day",
        highlight: Vec3::new(0.62, 0.69, 0.67),
        shadow: Vec3::new(0.50, 0.55, 0.50),
    },
    Palette {
        name: "Rainy Night",
        highlight: Vec3::new(0.24, 0.36, 0.54),
        shadow: Vec3::new(0.25, 0.31, 0.31),
    },
];

impl Palette {
    pub fn uniform(&self) -> PaletteUniform {
        PaletteUniform {
            highlight: self.highlight.to_array(),
            _pad0: 0.0,
            shadow: self.shadow.to_array(),
            _pad1: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PaletteUniform {
    pub highlight: [f32; 3],
    pub _pad0: f32,
    pub shadow: [f32; 3],
    pub _pad1: f32,
}

/// Index into [`PRESETS`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PaletteSelection {
    index: usize,
}

impl PaletteSelection {
    pub fn current(&self) -> &'static Palette {
        &PRESETS[self.index % PRESETS.len()]
    }

    pub fn cycle(&mut self) -> &'static Palette {
        self.index = (self.index + 1) % PRESETS.len();
        self.current()
    }

    pub fn index(&self) -> usize {
        self.index % PRESETS.len()
    }

    /// Picks a preset by position; out-of-range positions wrap.
    pub fn select(&mut self, index: usize) -> &'static Palette {
        self.index = index % PRESETS.len();
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_sunny_day_and_wraps() {
        let mut sel = PaletteSelection::default();
        assert_eq!(sel.current().name, "Sunny Day");
        let names: Vec<_> = (0..4).map(|_| sel.cycle().name).collect();
        assert_eq!(names, ["Bright Night", "Rainy Day", "Rainy Night", "Sunny Day"]);
    }

    #[test]
    fn select_by_position_wraps() {
        let mut sel = PaletteSelection::default();
        assert_eq!(sel.select(2).name, "Rainy Day");
        assert_eq!(sel.index(), 2);
        assert_eq!(sel.select(5).name, "Bright Night");
    }

    #[test]
    fn uniform_pads_vec3s() {
        assert_eq!(std::mem::size_of::<PaletteUniform>(), 32);
        let u = PRESETS[1].uniform();
        assert_eq!(u.shadow, [0.32, 0.39, 0.57]);
    }
}
