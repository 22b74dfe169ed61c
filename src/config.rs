// config.rs - Mount-time field configuration
//
// Parameters are fixed for a mount's lifetime. Changing them means
// unmounting and mounting a fresh field.

use crate::color::Rgb;

pub const DEFAULT_PARTICLE_COUNT: usize = 25;
pub const DEFAULT_PARTICLE_COLOR: Rgb = Rgb::new(0xf9, 0x73, 0x16);
pub const DEFAULT_CONNECTION_COLOR: Rgb = Rgb::new(0x63, 0x66, 0xf1);

#[derive(Clone, Copy, Debug)]
pub struct FieldConfig {
    /// Ambient particle population size.
    pub particle_count: usize,
    /// Fill/glow color for ambient and burst particles.
    pub particle_color: Rgb,
    /// Stroke color for inter-particle connection lines.
    pub connection_color: Rgb,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            particle_color: DEFAULT_PARTICLE_COLOR,
            connection_color: DEFAULT_CONNECTION_COLOR,
        }
    }
}

impl FieldConfig {
    /// Build from embedder-supplied values. A zero count or a malformed
    /// color falls back to the matching default.
    pub fn from_css(particle_count: usize, particle_color: &str, connection_color: &str) -> Self {
        Self {
            particle_count: if particle_count == 0 {
                DEFAULT_PARTICLE_COUNT
            } else {
                particle_count
            },
            particle_color: parse_or_default(particle_color, DEFAULT_PARTICLE_COLOR),
            connection_color: parse_or_default(connection_color, DEFAULT_CONNECTION_COLOR),
        }
    }
}

fn parse_or_default(s: &str, fallback: Rgb) -> Rgb {
    Rgb::parse_hex(s).unwrap_or_else(|| {
        log::warn!("unparseable color {s:?}, using default");
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_css_accepts_valid_values() {
        let config = FieldConfig::from_css(40, "#112233", "#445566");
        assert_eq!(config.particle_count, 40);
        assert_eq!(config.particle_color, Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(config.connection_color, Rgb::new(0x44, 0x55, 0x66));
    }

    #[test]
    fn from_css_falls_back_on_garbage() {
        let config = FieldConfig::from_css(0, "orange", "");
        assert_eq!(config.particle_count, DEFAULT_PARTICLE_COUNT);
        assert_eq!(config.particle_color, DEFAULT_PARTICLE_COLOR);
        assert_eq!(config.connection_color, DEFAULT_CONNECTION_COLOR);
    }
}
