/// Render configuration shared by every scene
use nalgebra::Vector3;

/// Characters used for the three shading levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadeRamp {
    pub light: char,
    pub medium: char,
    pub dark: char,
    pub blank: char,
}

impl Default for ShadeRamp {
    fn default() -> Self {
        Self {
            light: '\u{2591}',
            medium: '\u{2592}',
            dark: '\u{2593}',
            blank: ' ',
        }
    }
}

/// Light direction, shading thresholds and glyphs.
///
/// Built once at startup and handed to [`Scene::new`](crate::Scene::new).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Direction the light travels; faces whose normal opposes it are brightest
    pub light: Vector3<f64>,
    /// Intensity above which a face gets the dark glyph
    pub dark_threshold: f64,
    /// Intensity above which a face gets the medium glyph
    pub medium_threshold: f64,
    pub ramp: ShadeRamp,
}

impl RenderConfig {
    /// Shading intensity of a face: `-dot(light, normal)`
    pub fn intensity(&self, normal: &Vector3<f64>) -> f64 {
        -self.light.dot(normal)
    }

    /// Map a face normal onto the three-level ramp
    pub fn shade(&self, normal: &Vector3<f64>) -> char {
        let intensity = self.intensity(normal);
        if intensity > self.dark_threshold {
            self.ramp.dark
        } else if intensity > self.medium_threshold {
            self.ramp.medium
        } else {
            self.ramp.light
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        let half_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        Self {
            light: Vector3::new(half_sqrt2, 0.0, -half_sqrt2),
            dark_threshold: 0.8,
            medium_threshold: 0.4,
            ramp: ShadeRamp::default(),
        }
    }
}
