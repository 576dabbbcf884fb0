//! The lighting control panel
//!
//! One window, one folder per light plus one for the shared material. Every
//! widget is bound by mutable reference to the attribute it controls, so a
//! slider drag is a direct write into the scene.

use imgui::TreeNodeFlags;

use crate::gfx::scene::{
    light::{AmbientLight, DirectionalLight, PointLight},
    scene::Scene,
};
use crate::stage;

/// Panel controlling the light rig and the primitives' shared material.
///
/// Install with [`crate::LightboxApp::set_ui`].
pub fn lighting_panel(ui: &imgui::Ui, scene: &mut Scene) {
    ui.window("Lighting")
        .size([360.0, 640.0], imgui::Condition::FirstUseEver)
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .collapsible(true)
        .build(|| {
            ambient_controls(ui, &mut scene.lights.ambient);
            directional_controls(ui, &mut scene.lights.directional);
            point_controls(ui, &mut scene.lights.point);

            if let Some(material) = scene.material_manager.get_material_mut(stage::SHARED_MATERIAL)
            {
                if ui.collapsing_header("Material", TreeNodeFlags::DEFAULT_OPEN) {
                    ui.slider("Roughness", 0.0, 1.0, &mut material.roughness);
                    ui.slider("Metalness", 0.0, 1.0, &mut material.metallic);
                }
            }
        });
}

fn ambient_controls(ui: &imgui::Ui, light: &mut AmbientLight) {
    if ui.collapsing_header("Ambient Light", TreeNodeFlags::DEFAULT_OPEN) {
        ui.slider("Intensity##ambient", 0.0, 2.0, &mut light.intensity);
        ui.checkbox("Enabled##ambient", &mut light.visible);
    }
}

fn directional_controls(ui: &imgui::Ui, light: &mut DirectionalLight) {
    if ui.collapsing_header("Directional Light", TreeNodeFlags::DEFAULT_OPEN) {
        ui.slider("Intensity##directional", 0.0, 2.0, &mut light.intensity);
        ui.checkbox("Enabled##directional", &mut light.visible);
        position_controls(ui, "directional", &mut light.position);
    }
}

fn point_controls(ui: &imgui::Ui, light: &mut PointLight) {
    if ui.collapsing_header("Point Light", TreeNodeFlags::DEFAULT_OPEN) {
        ui.slider("Intensity##point", 0.0, 3.0, &mut light.intensity);
        ui.checkbox("Enabled##point", &mut light.visible);
        position_controls(ui, "point", &mut light.position);
    }
}

fn position_controls(ui: &imgui::Ui, id: &str, position: &mut cgmath::Vector3<f32>) {
    ui.slider(format!("Position X##{id}"), -10.0, 10.0, &mut position.x);
    ui.slider(format!("Position Y##{id}"), -10.0, 10.0, &mut position.y);
    ui.slider(format!("Position Z##{id}"), -10.0, 10.0, &mut position.z);
}
