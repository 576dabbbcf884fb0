//! Light rig for the playground scene.
//!
//! Three light sources with live-editable attributes: an ambient term, a
//! directional "sun" and a point light. The structs are plain attribute
//! bags — the control panel mutates them directly and the renderer reads
//! them when filling the global uniform buffer each frame.
//!
//! Toggling `visible` zeroes a light's *contribution* while leaving its
//! stored intensity untouched, so re-enabling restores the previous value.

use cgmath::{ortho, perspective, Deg, InnerSpace, Matrix4, Point3, Vector3};

use crate::gfx::camera::orbit_camera::OPENGL_TO_WGPU_MATRIX;

/// Uniform base illumination with no position or direction.
#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub visible: bool,
}

impl AmbientLight {
    pub fn effective_intensity(&self) -> f32 {
        if self.visible {
            self.intensity
        } else {
            0.0
        }
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.5,
            visible: true,
        }
    }
}

/// Sun-like light with parallel rays. The position only determines the ray
/// direction (toward the origin) and the shadow frustum; there is no falloff.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub position: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    pub visible: bool,
    pub cast_shadow: bool,
}

impl DirectionalLight {
    pub fn effective_intensity(&self) -> f32 {
        if self.visible {
            self.intensity
        } else {
            0.0
        }
    }

    /// View-projection matrix for this light's shadow pass: an orthographic
    /// frustum looking from the light position at the origin.
    pub fn view_proj(&self) -> Matrix4<f32> {
        let eye = non_degenerate(self.position);
        let view = Matrix4::look_at_rh(
            Point3::new(eye.x, eye.y, eye.z),
            Point3::new(0.0, 0.0, 0.0),
            stable_up(eye),
        );
        let proj = ortho(-15.0, 15.0, -15.0, 15.0, 0.5, 60.0);
        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: Vector3::new(5.0, 10.0, 7.5),
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            visible: true,
            cast_shadow: true,
        }
    }
}

/// Light radiating from a point with distance falloff up to `range`.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    pub range: f32,
    pub visible: bool,
    pub cast_shadow: bool,
}

impl PointLight {
    pub fn effective_intensity(&self) -> f32 {
        if self.visible {
            self.intensity
        } else {
            0.0
        }
    }

    /// View-projection matrix for this light's shadow pass: a wide
    /// perspective frustum aimed at the origin, reaching out to `range`.
    pub fn view_proj(&self) -> Matrix4<f32> {
        let eye = non_degenerate(self.position);
        let view = Matrix4::look_at_rh(
            Point3::new(eye.x, eye.y, eye.z),
            Point3::new(0.0, 0.0, 0.0),
            stable_up(eye),
        );
        let proj = perspective(Deg(100.0), 1.0, 0.5, self.range.max(1.0));
        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vector3::new(-5.0, 5.0, 0.0),
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            range: 50.0,
            visible: true,
            cast_shadow: true,
        }
    }
}

/// The full light rig: exactly one light of each kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub point: PointLight,
}

impl LightRig {
    /// The playground's starting rig: soft white ambient at half strength,
    /// a shadow-casting sun above the stage, and a point light off to the
    /// side.
    pub fn playground() -> Self {
        Self::default()
    }

    pub const LIGHT_COUNT: usize = 3;
}

/// Light positions are user-driven; a position at the look-at target would
/// make the view matrix degenerate.
fn non_degenerate(position: Vector3<f32>) -> Vector3<f32> {
    if position.magnitude2() < 1e-6 {
        Vector3::new(0.0, 1.0, 0.0)
    } else {
        position
    }
}

/// Pick an up vector that is not collinear with the view direction.
fn stable_up(eye: Vector3<f32>) -> Vector3<f32> {
    if eye.x.abs() < 1e-4 && eye.z.abs() < 1e-4 {
        Vector3::unit_z()
    } else {
        Vector3::unit_y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    #[test]
    fn playground_rig_has_expected_defaults() {
        let rig = LightRig::playground();
        assert_eq!(rig.ambient.intensity, 0.5);
        assert_eq!(rig.directional.intensity, 1.0);
        assert_eq!(rig.directional.position, Vector3::new(5.0, 10.0, 7.5));
        assert_eq!(rig.point.intensity, 1.0);
        assert_eq!(rig.point.range, 50.0);
        assert_eq!(rig.point.position, Vector3::new(-5.0, 5.0, 0.0));
        assert!(rig.directional.cast_shadow);
        assert!(rig.point.cast_shadow);
        assert_eq!(LightRig::LIGHT_COUNT, 3);
    }

    #[test]
    fn hiding_a_light_keeps_its_stored_intensity() {
        let mut light = AmbientLight {
            intensity: 1.7,
            ..Default::default()
        };
        light.visible = false;
        assert_eq!(light.effective_intensity(), 0.0);
        assert_eq!(light.intensity, 1.7);

        light.visible = true;
        assert_eq!(light.effective_intensity(), 1.7);
    }

    #[test]
    fn position_writes_pass_through_unclamped() {
        let mut light = PointLight::default();
        light.position = Vector3::new(-25.0, 40.0, 13.5);
        assert_eq!(light.position, Vector3::new(-25.0, 40.0, 13.5));
    }

    #[test]
    fn light_matrices_are_invertible() {
        let rig = LightRig::playground();
        assert!(rig.directional.view_proj().invert().is_some());
        assert!(rig.point.view_proj().invert().is_some());
    }

    #[test]
    fn light_matrices_survive_degenerate_positions() {
        // straight overhead: view direction collinear with the world up
        let overhead = DirectionalLight {
            position: Vector3::new(0.0, 10.0, 0.0),
            ..Default::default()
        };
        assert!(overhead.view_proj().invert().is_some());

        // at the look-at target itself
        let at_origin = PointLight {
            position: Vector3::new(0.0, 0.0, 0.0),
            ..Default::default()
        };
        assert!(at_origin.view_proj().invert().is_some());
    }

    #[test]
    fn shadow_frustum_contains_the_stage_origin() {
        let rig = LightRig::playground();
        for view_proj in [rig.directional.view_proj(), rig.point.view_proj()] {
            let clip = view_proj * cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0);
            let ndc_z = clip.z / clip.w;
            assert!(
                (0.0..=1.0).contains(&ndc_z),
                "origin fell outside the shadow depth range: {ndc_z}"
            );
        }
    }
}
