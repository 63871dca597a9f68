use glam::Vec3;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;

/// Camera description as loaded from a `<camera>` XML document.
///
/// Every element is optional; omitted values fall back to the defaults the
/// runtime boots with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_position")]
    pub position: Vec3,
    #[serde(default = "default_direction")]
    pub direction: Vec3,
    #[serde(default = "default_up")]
    pub up: Vec3,
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub far: Option<f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_position(),
            direction: default_direction(),
            up: default_up(),
            fov_degrees: default_fov(),
            near: default_near(),
            far: Some(default_far()),
        }
    }
}

fn default_position() -> Vec3 {
    Vec3::new(0.0, 0.0, -5.0)
}

fn default_direction() -> Vec3 {
    Vec3::new(0.0, 0.0, 1.0)
}

fn default_up() -> Vec3 {
    Vec3::Y
}

fn default_fov() -> f32 {
    70.0
}

fn default_near() -> f32 {
    0.01
}

fn default_far() -> f32 {
    1000.0
}

/// Failure while reading a camera description.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid camera XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("<{tag}> is not a valid number")]
    InvalidNumber { tag: &'static str },
    #[error("<{tag}> is missing vector components")]
    MissingComponents { tag: &'static str },
}

impl CameraConfig {
    /// Parses a `<camera>` document. Unknown elements are ignored and
    /// missing elements keep their defaults.
    pub fn from_xml(xml: &str) -> Result<Self, ConfigError> {
        let document = Document::parse(xml)?;
        let root = document.root_element();

        let mut config = Self::default();
        if let Some(position) = parse_vec3(&root, "position")? {
            config.position = position;
        }
        if let Some(direction) = parse_vec3(&root, "direction")? {
            config.direction = direction;
        }
        if let Some(up) = parse_vec3(&root, "up")? {
            config.up = up;
        }
        if let Some(fov) = parse_f32(&root, "fov")? {
            config.fov_degrees = fov;
        }
        if let Some(near) = parse_f32(&root, "near")? {
            config.near = near;
        }
        if let Some(far) = parse_f32(&root, "far")? {
            config.far = Some(far);
        }
        Ok(config)
    }

    /// Builds the camera for the given aspect ratio.
    pub fn to_camera(&self, aspect: f32) -> Camera {
        Camera::new(
            self.position,
            self.direction,
            self.fov_degrees,
            self.near,
            self.far,
            aspect,
            self.up,
        )
    }
}

fn element_text<'a>(root: &'a Node<'_, '_>, tag: &str) -> Option<&'a str> {
    root.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn parse_vec3(root: &Node<'_, '_>, tag: &'static str) -> Result<Option<Vec3>, ConfigError> {
    let Some(text) = element_text(root, tag) else {
        return Ok(None);
    };
    let mut components = [0.0f32; 3];
    let mut parts = text.split_whitespace();
    for slot in &mut components {
        let part = parts.next().ok_or(ConfigError::MissingComponents { tag })?;
        *slot = part
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { tag })?;
    }
    Ok(Some(Vec3::from_array(components)))
}

fn parse_f32(root: &Node<'_, '_>, tag: &'static str) -> Result<Option<f32>, ConfigError> {
    let Some(text) = element_text(root, tag) else {
        return Ok(None);
    };
    text.parse::<f32>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { tag })
}
