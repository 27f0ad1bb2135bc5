use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default = "RenderSettings::default_fov_y_degrees")]
    pub fov_y_degrees: f32,
    #[serde(default = "RenderSettings::default_ortho_depth")]
    pub ortho_depth: f32,
    #[serde(default = "RenderSettings::default_stroke_weight")]
    pub stroke_weight: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            fov_y_degrees: Self::default_fov_y_degrees(),
            ortho_depth: Self::default_ortho_depth(),
            stroke_weight: Self::default_stroke_weight(),
        }
    }
}

impl RenderSettings {
    pub fn load() -> Self {
        Self::load_from_path("settings.json")
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        use std::fs;

        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|err| {
                warn!(
                    "Failed to parse {:?} ({}). Falling back to default render settings.",
                    path, err
                );
                RenderSettings::default()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Render settings file {:?} not found. Using default settings.",
                    path
                );
                RenderSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default render settings.",
                    path, err
                );
                RenderSettings::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RenderSettings>(contents).map(RenderSettings::validate)
    }

    fn validate(mut self) -> Self {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            warn!("Resolution must be greater than zero. Using default resolution.");
            self.resolution = Resolution::default();
        }

        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            warn!(
                "Field of view {} is outside (0, 180). Using default value.",
                self.fov_y_degrees
            );
            self.fov_y_degrees = Self::default_fov_y_degrees();
        }

        if !(self.ortho_depth > 0.0) {
            warn!("Orthographic depth must be positive. Using default value.");
            self.ortho_depth = Self::default_ortho_depth();
        }

        if !(self.stroke_weight > 0.0) {
            warn!("Stroke weight must be positive. Using 1 instead.");
            self.stroke_weight = Self::default_stroke_weight();
        }

        self
    }

    const fn default_fov_y_degrees() -> f32 {
        45.0
    }

    const fn default_ortho_depth() -> f32 {
        1000.0
    }

    const fn default_stroke_weight() -> f32 {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_settings() -> RenderSettings {
        RenderSettings {
            resolution: Resolution {
                width: 0,
                height: 0,
            },
            fov_y_degrees: 180.0,
            ortho_depth: -1.0,
            stroke_weight: f32::NAN,
        }
    }

    #[test]
    fn validate_replaces_invalid_values_with_defaults() {
        let validated = invalid_settings().validate();
        let defaults = RenderSettings::default();

        assert_eq!(validated.resolution, defaults.resolution);
        assert_eq!(validated.fov_y_degrees, defaults.fov_y_degrees);
        assert_eq!(validated.ortho_depth, defaults.ortho_depth);
        assert_eq!(validated.stroke_weight, defaults.stroke_weight);
    }

    #[test]
    fn validate_preserves_valid_values() {
        let valid = RenderSettings {
            resolution: Resolution {
                width: 1920,
                height: 1080,
            },
            fov_y_degrees: 60.0,
            ortho_depth: 500.0,
            stroke_weight: 2.0,
        };

        let validated = valid.clone().validate();

        assert_eq!(validated.resolution, valid.resolution);
        assert_eq!(validated.fov_y_degrees, 60.0);
        assert_eq!(validated.ortho_depth, 500.0);
        assert_eq!(validated.stroke_weight, 2.0);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings = RenderSettings::from_json(r#"{ "resolution": { "width": 800, "height": 600 } }"#)
            .unwrap();
        assert_eq!(settings.resolution, Resolution { width: 800, height: 600 });
        assert_eq!(settings.fov_y_degrees, 45.0);
        assert_eq!(settings.ortho_depth, 1000.0);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let settings = RenderSettings::load_from_path("definitely/not/here/settings.json");
        assert_eq!(settings.resolution, Resolution::default());
    }
}
