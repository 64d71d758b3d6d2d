//! Scene lights.
//!
//! Lights are plain scene data. They never take part in picking.

use serde::Serialize;

use crate::gfx::resources::material::hex_to_rgb;

/// Name of the ambient light created by [`environment_lights`]
pub const AMBIENT_LIGHT: &str = "ambient";
/// Name of the shadow-casting key light created by [`environment_lights`]
pub const MAIN_LIGHT: &str = "main_light";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Light {
    Ambient {
        name: String,
        color: [f32; 3],
        intensity: f32,
    },
    Directional {
        name: String,
        color: [f32; 3],
        intensity: f32,
        position: [f32; 3],
        cast_shadow: bool,
        shadow_map_size: u32,
    },
    Point {
        name: String,
        color: [f32; 3],
        intensity: f32,
        position: [f32; 3],
        range: f32,
    },
}

impl Light {
    pub fn name(&self) -> &str {
        match self {
            Light::Ambient { name, .. }
            | Light::Directional { name, .. }
            | Light::Point { name, .. } => name,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. } => *intensity,
        }
    }

    pub fn set_intensity(&mut self, value: f32) {
        match self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. } => *intensity = value,
        }
    }
}

/// The default environment rig: white ambient, a shadow-casting key light
/// high above the scene and two weak point fills.
///
/// The key light gets whatever `ambient_total` the ambient term leaves over.
pub fn environment_lights(ambient: f32, ambient_total: f32) -> Vec<Light> {
    let white = hex_to_rgb(0xffffff);
    vec![
        Light::Ambient {
            name: AMBIENT_LIGHT.to_string(),
            color: white,
            intensity: ambient,
        },
        Light::Directional {
            name: MAIN_LIGHT.to_string(),
            color: white,
            intensity: (ambient_total - ambient).max(0.0),
            position: [-2.0, 30.0, 2.0],
            cast_shadow: true,
            shadow_map_size: 2048,
        },
        Light::Point {
            name: "point_light_1".to_string(),
            color: white,
            intensity: 0.35,
            position: [10.0, 20.0, 20.0],
            range: 100.0,
        },
        Light::Point {
            name: "point_light_2".to_string(),
            color: white,
            intensity: 0.1,
            position: [-40.0, 10.0, 20.0],
            range: 60.0,
        },
    ]
}

/// Where the environment rig's ambient and key lights sit in a scene's light
/// list. Lights are only ever appended, so the positions stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightRig {
    ambient: usize,
    main: usize,
}

impl LightRig {
    /// Appends [`environment_lights`] to `lights`
    pub fn install(lights: &mut Vec<Light>, ambient: f32, ambient_total: f32) -> Self {
        let start = lights.len();
        lights.extend(environment_lights(ambient, ambient_total));
        Self {
            ambient: start,
            main: start + 1,
        }
    }

    /// Splits `ambient_total` between the rig's ambient and key lights.
    ///
    /// Other lights are left alone even when they share the rig's names.
    pub fn balance(&self, lights: &mut [Light], ambient: f32, ambient_total: f32) {
        let ambient = ambient.clamp(0.0, ambient_total.max(0.0));
        if let Some(light) = lights.get_mut(self.ambient) {
            if matches!(light, Light::Ambient { .. }) {
                light.set_intensity(ambient);
            }
        }
        if let Some(light) = lights.get_mut(self.main) {
            if matches!(light, Light::Directional { .. }) {
                light.set_intensity((ambient_total - ambient).max(0.0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intensity_of(lights: &[Light], name: &str) -> f32 {
        lights
            .iter()
            .find(|light| light.name() == name)
            .map(Light::intensity)
            .unwrap_or(f32::NAN)
    }

    #[test]
    fn test_environment_split() {
        let lights = environment_lights(0.67, 1.05);
        assert_eq!(lights.len(), 4);
        assert!((intensity_of(&lights, AMBIENT_LIGHT) - 0.67).abs() < 1e-6);
        assert!((intensity_of(&lights, MAIN_LIGHT) - 0.38).abs() < 1e-6);
    }

    #[test]
    fn test_balance_clamps() {
        let mut lights = Vec::new();
        let rig = LightRig::install(&mut lights, 0.67, 1.05);

        rig.balance(&mut lights, 0.2, 1.05);
        assert!((intensity_of(&lights, MAIN_LIGHT) - 0.85).abs() < 1e-6);

        rig.balance(&mut lights, 3.0, 1.05);
        assert!((intensity_of(&lights, AMBIENT_LIGHT) - 1.05).abs() < 1e-6);
        assert_eq!(intensity_of(&lights, MAIN_LIGHT), 0.0);

        // Fill lights untouched
        assert!((intensity_of(&lights, "point_light_1") - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_balance_ignores_lights_outside_the_rig() {
        let mut lights = vec![Light::Ambient {
            name: AMBIENT_LIGHT.to_string(),
            color: [1.0, 1.0, 1.0],
            intensity: 0.1,
        }];
        let rig = LightRig::install(&mut lights, 0.67, 1.05);
        lights.push(Light::Directional {
            name: MAIN_LIGHT.to_string(),
            color: [1.0, 1.0, 1.0],
            intensity: 0.5,
            position: [0.0, 10.0, 0.0],
            cast_shadow: false,
            shadow_map_size: 512,
        });

        rig.balance(&mut lights, 0.25, 1.05);
        assert_eq!(lights[0].intensity(), 0.1);
        assert_eq!(lights[1].intensity(), 0.25);
        assert!((lights[2].intensity() - 0.8).abs() < 1e-6);
        assert_eq!(lights[5].intensity(), 0.5);
    }
}
