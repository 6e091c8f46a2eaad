//! Rotatiestatus en scène-instellingen voor de host.
//!
//! De host (three.js) bezit renderer, camera en licht; deze module beschrijft
//! alleen welke waarden daarvoor gebruikt worden.

use std::f64::consts::{PI, TAU};

use serde::Serialize;

/// Animatie per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationConfig {
    /// Radialen rond de Y-as per frame.
    pub rotation_speed: f64,
    /// Vaste kanteling rond de X-as.
    pub tilt: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 0.01,
            tilt: -PI / 16.0,
        }
    }
}

/// Oriëntatie van de ring. Blijft behouden wanneer de mesh opnieuw wordt
/// opgebouwd.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub rotation_x: f64,
    pub rotation_y: f64,
}

impl DisplayState {
    /// Eén frame verder: draai rond Y, houd X op de ingestelde kanteling.
    pub fn advance(&mut self, config: &AnimationConfig) {
        self.rotation_y = (self.rotation_y + config.rotation_speed).rem_euclid(TAU);
        self.rotation_x = config.tilt;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraConfig {
    /// Verticale kijkhoek in graden.
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    pub position_z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightConfig {
    pub color: u32,
    /// Genormaliseerde richting.
    pub direction: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    pub background: u32,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub material_color: u32,
    pub animation: AnimationConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let len = (5.0_f64 * 5.0 + 10.0 * 10.0).sqrt();
        Self {
            background: 0x00_0000,
            camera: CameraConfig {
                fov: 1.0,
                near: 1.0,
                far: 1000.0,
                position_z: 400.0,
            },
            light: LightConfig {
                color: 0xff_ffff,
                direction: [0.0, 5.0 / len, 10.0 / len],
            },
            material_color: 0xff_8000,
            animation: AnimationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_rotates_and_tilts() {
        let config = AnimationConfig::default();
        let mut state = DisplayState::default();
        state.advance(&config);
        assert!((state.rotation_y - 0.01).abs() < 1e-15);
        assert_eq!(state.rotation_x, -PI / 16.0);

        for _ in 0..99 {
            state.advance(&config);
        }
        assert!((state.rotation_y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_wraps_into_full_turn() {
        let config = AnimationConfig {
            rotation_speed: 1.0,
            tilt: 0.0,
        };
        let mut state = DisplayState {
            rotation_x: 0.3,
            rotation_y: 6.0,
        };
        state.advance(&config);
        assert!((state.rotation_y - (7.0 - TAU)).abs() < 1e-12);
        assert_eq!(state.rotation_x, 0.0);

        let backwards = AnimationConfig {
            rotation_speed: -0.5,
            tilt: 0.0,
        };
        let mut state = DisplayState::default();
        state.advance(&backwards);
        assert!(state.rotation_y >= 0.0 && state.rotation_y < TAU);
    }

    #[test]
    fn default_scene_matches_host_setup() {
        let scene = SceneConfig::default();
        assert_eq!(scene.camera.fov, 1.0);
        assert_eq!(scene.camera.position_z, 400.0);
        assert_eq!(scene.material_color, 0xff8000);

        let [x, y, z] = scene.light.direction;
        assert_eq!(x, 0.0);
        assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-12);
        assert!((z / y - 2.0).abs() < 1e-12);
    }
}
