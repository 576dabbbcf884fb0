//! Assembles the playground stage.
//!
//! A fixed set piece: a ground plane that catches shadows, and three
//! primitives — sphere, box, torus — lined up on it, all sharing one
//! material so the panel's material sliders visibly affect all three at
//! once. Geometry and placement are compile-time constants; assembly cannot
//! fail.

use cgmath::{Deg, Vector3};

use crate::gfx::{
    geometry::{generate_cube, generate_plane, generate_sphere, generate_torus},
    scene::scene::Scene,
};

/// ID of the material shared by the sphere, box, and torus. The panel edits
/// this one instance and every primitive picks up the change.
pub const SHARED_MATERIAL: &str = "shapes";

/// ID of the ground plane's own material.
pub const GROUND_MATERIAL: &str = "ground";

/// Builds the stage into an (empty) scene: four objects and the light rig
/// defaults that come with [`Scene::new`].
pub fn build(scene: &mut Scene) {
    scene.add_material(GROUND_MATERIAL, [0.667, 0.667, 0.667, 1.0], 0.0, 0.5);
    // Metalness starts at zero; the panel's slider drives it from there
    scene.add_material(SHARED_MATERIAL, [0.0, 1.0, 0.0, 1.0], 0.0, 0.4);

    // Ground: generated upright, laid flat by its transform. Catches
    // shadows but casts none.
    let ground = scene.add_shape("ground", generate_plane(20.0, 20.0, 1, 1));
    ground.set_rotation_x(Deg(-90.0));
    ground.receive_shadow = true;
    ground.set_material(GROUND_MATERIAL);

    let sphere = scene.add_shape("sphere", generate_sphere(32, 32));
    sphere.set_translation(Vector3::new(-3.0, 1.0, 0.0));
    sphere.cast_shadow = true;
    sphere.receive_shadow = true;
    sphere.set_material(SHARED_MATERIAL);

    let cube = scene.add_shape("box", generate_cube());
    cube.set_transform_trs(Vector3::new(0.0, 0.75, 0.0), Deg(0.0), 1.5);
    cube.cast_shadow = true;
    cube.receive_shadow = true;
    cube.set_material(SHARED_MATERIAL);

    let torus = scene.add_shape("torus", generate_torus(1.0, 0.4, 16, 100));
    torus.set_translation(Vector3::new(3.0, 1.2, 0.0));
    torus.cast_shadow = true;
    torus.receive_shadow = true;
    torus.set_material(SHARED_MATERIAL);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{
        camera_controller::CameraController, camera_utils::CameraManager,
        orbit_camera::OrbitCamera,
    };
    use cgmath::Zero;

    fn test_scene() -> Scene {
        let camera = OrbitCamera::new(12.25, 0.42, 0.46, Vector3::zero(), 1.0);
        let controller = CameraController::new(0.005, 0.1);
        let mut scene = Scene::new(CameraManager::new(camera, controller));
        build(&mut scene);
        scene
    }

    #[test]
    fn stage_has_four_objects_and_three_lights() {
        let scene = test_scene();
        assert_eq!(scene.object_count(), 4);
        for name in ["ground", "sphere", "box", "torus"] {
            assert!(scene.get_object(name).is_some(), "missing object '{name}'");
        }
        assert_eq!(crate::gfx::scene::light::LightRig::LIGHT_COUNT, 3);
    }

    #[test]
    fn primitives_share_one_material_instance() {
        let scene = test_scene();
        let sphere = scene.get_object("sphere").unwrap();
        let cube = scene.get_object("box").unwrap();
        let torus = scene.get_object("torus").unwrap();

        let sphere_material = scene.get_material_for_object(sphere);
        let cube_material = scene.get_material_for_object(cube);
        let torus_material = scene.get_material_for_object(torus);

        assert!(std::ptr::eq(sphere_material, cube_material));
        assert!(std::ptr::eq(cube_material, torus_material));

        let ground_material = scene.get_material_for_object(scene.get_object("ground").unwrap());
        assert!(!std::ptr::eq(sphere_material, ground_material));
    }

    #[test]
    fn material_edit_is_visible_through_every_primitive() {
        let mut scene = test_scene();
        scene
            .material_manager
            .get_material_mut(SHARED_MATERIAL)
            .unwrap()
            .roughness = 0.9;

        for name in ["sphere", "box", "torus"] {
            let object = scene.get_object(name).unwrap();
            assert_eq!(scene.get_material_for_object(object).roughness, 0.9);
        }
    }

    #[test]
    fn shadow_flags_match_the_set_piece() {
        let scene = test_scene();

        let ground = scene.get_object("ground").unwrap();
        assert!(!ground.cast_shadow);
        assert!(ground.receive_shadow);

        for name in ["sphere", "box", "torus"] {
            let object = scene.get_object(name).unwrap();
            assert!(object.cast_shadow, "'{name}' should cast shadows");
            assert!(object.receive_shadow, "'{name}' should receive shadows");
        }
    }

    #[test]
    fn shared_material_starts_green_and_rough() {
        let scene = test_scene();
        let material = scene.material_manager.get_material(SHARED_MATERIAL).unwrap();
        assert_eq!(material.base_color, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(material.roughness, 0.4);
        assert_eq!(material.metallic, 0.0);
    }

    #[test]
    fn rig_defaults_survive_assembly() {
        let scene = test_scene();
        assert_eq!(scene.lights.ambient.intensity, 0.5);
        assert_eq!(scene.lights.directional.intensity, 1.0);
        assert_eq!(scene.lights.point.range, 50.0);
    }
}
