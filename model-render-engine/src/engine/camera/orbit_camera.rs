use bevy::input::mouse::MouseScrollUnit;
use bevy::math::EulerRot;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};

use crate::geometry::measure::BoundingExtent;

/// Orbit camera state: the rendered camera chases this every frame.
#[derive(Resource)]
pub struct OrbitCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::ZERO,
            distance: 10.0,
            yaw: 0.6,
            pitch: -0.5,
        }
    }
}

impl OrbitCamera {
    /// Frame the camera so the whole extent sits comfortably in view.
    pub fn frame(&mut self, extent: &BoundingExtent) {
        self.focus_point = extent.center();
        self.distance = (extent.size().length() * 1.2).max(0.5);
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Right drag orbits around the focus point.
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        orbit.yaw += -mouse_delta.x * yaw_sens;
        orbit.pitch += -mouse_delta.y * pitch_sens;
        orbit.pitch = orbit.pitch.clamp(-1.55, 1.55);
    }

    // Middle drag pans in the view plane.
    if mouse_button.pressed(MouseButton::Middle) && mouse_delta != Vec2::ZERO {
        let view_rot = Quat::from_euler(EulerRot::YXZ, orbit.yaw, orbit.pitch, 0.0);
        let right = view_rot * Vec3::X;
        let up = view_rot * Vec3::Y;
        let pan_speed = orbit.distance * 0.001;
        orbit.focus_point += (-right * mouse_delta.x + up * mouse_delta.y) * pan_speed;
    }

    // Mouse wheel scroll accumulation (pixel and line scroll).
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    // Dolly towards or away from the focus point.
    if scroll_accum.abs() > f32::EPSILON {
        let dolly_speed = (orbit.distance * 0.1).max(0.01);
        orbit.distance = (orbit.distance - scroll_accum * dolly_speed).max(0.05);
    }

    let target_rot = Quat::from_euler(EulerRot::YXZ, orbit.yaw, orbit.pitch, 0.0);
    let target_pos = orbit.focus_point + target_rot * (Vec3::Z * orbit.distance);

    let lerp_speed = 12.0 * time.delta_secs();
    camera_transform.translation = camera_transform
        .translation
        .lerp(target_pos, lerp_speed.min(1.0));
    camera_transform.rotation = camera_transform
        .rotation
        .slerp(target_rot, lerp_speed.min(1.0));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_centres_the_focus_on_the_extent() {
        let mut orbit = OrbitCamera::default();
        let extent = BoundingExtent {
            min: Vec3::new(-2.0, 0.0, -2.0),
            max: Vec3::new(2.0, 4.0, 2.0),
        };
        orbit.frame(&extent);
        assert_eq!(orbit.focus_point, Vec3::new(0.0, 2.0, 0.0));
        assert!(orbit.distance > extent.largest_dimension());
    }

    #[test]
    fn framing_a_point_keeps_a_usable_distance() {
        let mut orbit = OrbitCamera::default();
        let extent = BoundingExtent {
            min: Vec3::ONE,
            max: Vec3::ONE,
        };
        orbit.frame(&extent);
        assert!(orbit.distance >= 0.5);
    }
}
