use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use constants::render_settings::PENDING_MARKER_COLOUR;

use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::annotations::{
    spawn_marker, spawn_measurement_visuals, AnnotationKind, AnnotationSet, PendingStartMarker,
};
use crate::tools::picking::{cursor_to_ndc, pick_point, PickableGeometry};

/// Two-click measurement state. Holds at most one pending start point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MeasurementSession {
    #[default]
    Idle,
    AwaitingSecondPoint(Vec3),
}

/// What a successful pick did to the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickOutcome {
    Started(Vec3),
    Completed { start: Vec3, end: Vec3 },
}

#[derive(Resource, Default)]
pub struct MeasureTool {
    active: bool,
    session: MeasurementSession,
}

impl MeasureTool {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn session(&self) -> MeasurementSession {
        self.session
    }

    /// Activate or deactivate the tool. Re-asserting the current state is
    /// a no-op and keeps any pending start point. Returns true when
    /// deactivation interrupted a half-finished measurement; the caller
    /// must then clear all annotations, matching the panel contract that
    /// switching the tool off mid-measurement resets the view.
    pub fn set_active(&mut self, active: bool) -> bool {
        if active == self.active {
            return false;
        }
        let interrupted =
            !active && matches!(self.session, MeasurementSession::AwaitingSecondPoint(_));
        self.active = active;
        self.session = MeasurementSession::Idle;
        interrupted
    }

    /// Advance the session with a picked surface point. First pick stores
    /// the start, second pick completes the pair and returns to idle.
    pub fn handle_pick(&mut self, point: Vec3) -> PickOutcome {
        match self.session {
            MeasurementSession::Idle => {
                self.session = MeasurementSession::AwaitingSecondPoint(point);
                PickOutcome::Started(point)
            }
            MeasurementSession::AwaitingSecondPoint(start) => {
                self.session = MeasurementSession::Idle;
                PickOutcome::Completed { start, end: point }
            }
        }
    }

    pub fn reset(&mut self) {
        self.session = MeasurementSession::Idle;
    }
}

/// Left-click handling for the measure tool. Casts a ray through the
/// cursor, picks the nearest model surface point, and advances the
/// session. Clicks that miss the model are no-ops.
pub fn measure_tool_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut measure_tool: ResMut<MeasureTool>,
    mut annotations: ResMut<AnnotationSet>,
    geometry: Res<PickableGeometry>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    pending_markers: Query<Entity, With<PendingStartMarker>>,
) {
    if !measure_tool.is_active() || !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    let ndc = cursor_to_ndc(cursor, window.size());
    let Some(point) = pick_point(camera, camera_transform, ndc, &geometry) else {
        return;
    };
    let model_size = geometry.model_size();

    match measure_tool.handle_pick(point) {
        PickOutcome::Started(start) => {
            let marker = spawn_marker(
                &mut commands,
                &mut meshes,
                &mut materials,
                start,
                model_size,
                PENDING_MARKER_COLOUR,
            );
            commands.entity(marker).insert(PendingStartMarker);
            rpc_interface.send_notification(
                "measure_started",
                serde_json::json!({ "start": [start.x, start.y, start.z] }),
            );
        }
        PickOutcome::Completed { start, end } => {
            for entity in pending_markers.iter() {
                commands.entity(entity).despawn();
            }
            let measurement = annotations.register(AnnotationKind::PointMeasure, start, end);
            spawn_measurement_visuals(
                &mut commands,
                &mut meshes,
                &mut materials,
                &measurement,
                model_size,
            );
            info!("Measurement completed: {}", measurement.label);
            rpc_interface.send_notification(
                "measure_completed",
                serde_json::json!({
                    "id": measurement.id,
                    "start": [start.x, start.y, start.z],
                    "end": [end.x, end.y, end.z],
                    "distance": measurement.distance,
                    "label": measurement.label,
                }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_picks_complete_a_measurement() {
        let mut tool = MeasureTool::default();
        tool.set_active(true);

        let first = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(tool.handle_pick(first), PickOutcome::Started(first));
        assert_eq!(tool.session(), MeasurementSession::AwaitingSecondPoint(first));

        let second = Vec3::new(4.0, 2.0, 3.0);
        assert_eq!(
            tool.handle_pick(second),
            PickOutcome::Completed { start: first, end: second }
        );
        assert_eq!(tool.session(), MeasurementSession::Idle);
    }

    #[test]
    fn deactivation_mid_measurement_requests_a_clear() {
        let mut tool = MeasureTool::default();
        tool.set_active(true);
        tool.handle_pick(Vec3::ONE);

        assert!(tool.set_active(false));
        assert_eq!(tool.session(), MeasurementSession::Idle);
        assert!(!tool.is_active());
    }

    #[test]
    fn redundant_activation_keeps_the_pending_start() {
        let mut tool = MeasureTool::default();
        tool.set_active(true);
        tool.handle_pick(Vec3::ONE);

        // The host re-sending the enable must not discard the session.
        assert!(!tool.set_active(true));
        assert_eq!(tool.session(), MeasurementSession::AwaitingSecondPoint(Vec3::ONE));
        assert_eq!(
            tool.handle_pick(Vec3::ZERO),
            PickOutcome::Completed { start: Vec3::ONE, end: Vec3::ZERO }
        );
    }

    #[test]
    fn idle_deactivation_needs_no_clear() {
        let mut tool = MeasureTool::default();
        tool.set_active(true);
        assert!(!tool.set_active(false));
        // Activation never requests one either.
        assert!(!tool.set_active(true));
    }
}
