use bevy::prelude::*;

use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::annotations::{
    clear_all_annotations, despawn_by_ids, AnnotationKind, AnnotationLabel, AnnotationSet,
    AnnotationVisual, PendingStartMarker,
};
use crate::tools::bounding_box::{despawn_bounding_box, spawn_bounding_box, BoundingBoxVisual};
use crate::tools::edge_annotations::spawn_edge_annotations;
use crate::tools::measure::MeasureTool;
use crate::tools::picking::PickableGeometry;

/// The three panel toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelControl {
    EdgeMeasurements,
    PointMeasure,
    BoundingBox,
}

impl PanelControl {
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "edge_measurements" => Some(Self::EdgeMeasurements),
            "point_measure" => Some(Self::PointMeasure),
            "bounding_box" => Some(Self::BoundingBox),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EdgeMeasurements => "edge_measurements",
            Self::PointMeasure => "point_measure",
            Self::BoundingBox => "bounding_box",
        }
    }
}

/// Current toggle states, mirrored to the host panel after every change.
#[derive(Resource, Default)]
pub struct PanelState {
    pub show_edge_measurements: bool,
    pub show_bounding_box: bool,
}

/// A panel action, raised by keyboard shortcut or host RPC.
#[derive(Event, Debug, Clone, Copy)]
pub enum PanelCommandEvent {
    SetControl(PanelControl, bool),
    ClearMeasurements,
}

/// Native keyboard shortcuts for the panel controls. In the browser the
/// host page drives the same commands over RPC instead.
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_panel_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    panel: Res<PanelState>,
    measure_tool: Res<MeasureTool>,
    mut events: EventWriter<PanelCommandEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyE) {
        events.write(PanelCommandEvent::SetControl(
            PanelControl::EdgeMeasurements,
            !panel.show_edge_measurements,
        ));
    }
    if keyboard.just_pressed(KeyCode::KeyM) {
        events.write(PanelCommandEvent::SetControl(
            PanelControl::PointMeasure,
            !measure_tool.is_active(),
        ));
    }
    if keyboard.just_pressed(KeyCode::KeyB) {
        events.write(PanelCommandEvent::SetControl(
            PanelControl::BoundingBox,
            !panel.show_bounding_box,
        ));
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        events.write(PanelCommandEvent::ClearMeasurements);
    }
}

/// Apply panel commands: toggle the edge, measure and bounding-box tools
/// and handle the clear-all action. Re-enabling an already-enabled toggle
/// rebuilds its annotations rather than duplicating them.
pub fn apply_panel_commands(
    mut commands: Commands,
    mut events: EventReader<PanelCommandEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut panel: ResMut<PanelState>,
    mut measure_tool: ResMut<MeasureTool>,
    mut annotations: ResMut<AnnotationSet>,
    geometry: Res<PickableGeometry>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    visuals: Query<(Entity, &AnnotationVisual)>,
    labels: Query<(Entity, &AnnotationLabel)>,
    pending_markers: Query<Entity, With<PendingStartMarker>>,
    box_visuals: Query<Entity, With<BoundingBoxVisual>>,
) {
    for event in events.read() {
        match *event {
            PanelCommandEvent::SetControl(PanelControl::EdgeMeasurements, enabled) => {
                let removed = annotations.remove_kind(AnnotationKind::Edge);
                despawn_by_ids(&mut commands, &removed, &visuals, &labels);
                panel.show_edge_measurements = enabled;
                if enabled {
                    let shown = spawn_edge_annotations(
                        &mut commands,
                        &mut meshes,
                        &mut materials,
                        &mut annotations,
                        &geometry,
                    );
                    panel.show_edge_measurements = shown > 0;
                }
                notify_control(
                    &mut rpc_interface,
                    PanelControl::EdgeMeasurements,
                    panel.show_edge_measurements,
                );
            }
            PanelCommandEvent::SetControl(PanelControl::PointMeasure, enabled) => {
                if measure_tool.set_active(enabled) {
                    // Deactivated with a start point pending: everything on
                    // screen is cleared, same as an explicit clear.
                    let removed = clear_all_annotations(
                        &mut commands,
                        &mut annotations,
                        &visuals,
                        &labels,
                        &pending_markers,
                        &box_visuals,
                    );
                    panel.show_edge_measurements = false;
                    panel.show_bounding_box = false;
                    info!("Measure tool interrupted, cleared {} annotations", removed);
                    rpc_interface.send_notification("measure_cleared", serde_json::json!({}));
                }
                notify_control(
                    &mut rpc_interface,
                    PanelControl::PointMeasure,
                    measure_tool.is_active(),
                );
            }
            PanelCommandEvent::SetControl(PanelControl::BoundingBox, enabled) => {
                despawn_bounding_box(
                    &mut commands,
                    &mut annotations,
                    &box_visuals,
                    &visuals,
                    &labels,
                );
                panel.show_bounding_box = enabled
                    && spawn_bounding_box(
                        &mut commands,
                        &mut meshes,
                        &mut materials,
                        &mut annotations,
                        &geometry,
                    );
                notify_control(
                    &mut rpc_interface,
                    PanelControl::BoundingBox,
                    panel.show_bounding_box,
                );
            }
            PanelCommandEvent::ClearMeasurements => {
                let removed = clear_all_annotations(
                    &mut commands,
                    &mut annotations,
                    &visuals,
                    &labels,
                    &pending_markers,
                    &box_visuals,
                );
                measure_tool.reset();
                panel.show_edge_measurements = false;
                panel.show_bounding_box = false;
                info!("Cleared {} annotations", removed);
                rpc_interface.send_notification(
                    "measure_cleared",
                    serde_json::json!({ "removed": removed }),
                );
            }
        }
    }
}

fn notify_control(rpc_interface: &mut WebRpcInterface, control: PanelControl, active: bool) {
    rpc_interface.send_notification(
        "tool_state_changed",
        serde_json::json!({ "tool": control.as_str(), "active": active }),
    );
}
