use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, VertexAttributeValues};
use bevy::scene::SceneInstance;
use std::collections::HashSet;

use crate::engine::assets::model_info::ModelInfo;
use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::core::app_state::AppState;
use crate::geometry::measure::triangle_extent;
use crate::geometry::sampler::world_triangles;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::annotations::{
    clear_all_annotations, AnnotationLabel, AnnotationSet, AnnotationVisual, PendingStartMarker,
};
use crate::tools::bounding_box::BoundingBoxVisual;
use crate::tools::measure::MeasureTool;
use crate::tools::picking::PickableGeometry;
use crate::tools::tool_manager::PanelState;

pub const DEFAULT_MODEL_PATH: &str = "models/model.glb";

/// Root entity of the currently loaded glTF scene.
#[derive(Component)]
pub struct ModelRoot;

#[derive(Resource)]
pub struct ModelLoader {
    pub path: String,
    pub scene_root: Option<Entity>,
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self {
            path: DEFAULT_MODEL_PATH.to_string(),
            scene_root: None,
        }
    }
}

/// Request to replace the current model with another glTF asset.
#[derive(Event, Debug, Clone)]
pub struct LoadModelEvent {
    pub path: String,
}

/// Kick off the glTF scene load for the current path. Runs at startup and
/// again whenever a reload re-enters the loading state; a scene already in
/// flight is left alone.
pub fn start_loading(
    mut commands: Commands,
    mut loader: ResMut<ModelLoader>,
    asset_server: Res<AssetServer>,
) {
    if loader.scene_root.is_some() {
        return;
    }
    info!("Loading model from: {}", loader.path);
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(loader.path.clone()));
    let root = commands
        .spawn((
            SceneRoot(scene),
            Transform::default(),
            Visibility::default(),
            ModelRoot,
        ))
        .id();
    loader.scene_root = Some(root);
}

/// Wait for the scene instance to finish spawning its entities.
pub fn check_model_ready(
    scene_spawner: Res<SceneSpawner>,
    instances: Query<&SceneInstance, With<ModelRoot>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if let Ok(instance) = instances.single() {
        if scene_spawner.instance_is_ready(**instance) {
            next_state.set(AppState::ModelLoaded);
        }
    }
}

/// Sample the spawned scene into world-space pickable triangles, derive
/// the model info, frame the camera and hand over to `Running`.
pub fn prepare_model(
    loader: Res<ModelLoader>,
    children: Query<&Children>,
    mesh_entities: Query<(&Mesh3d, &GlobalTransform, &MeshMaterial3d<StandardMaterial>)>,
    meshes: Res<Assets<Mesh>>,
    mut geometry: ResMut<PickableGeometry>,
    mut model_info: ResMut<ModelInfo>,
    mut orbit: ResMut<OrbitCamera>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(root) = loader.scene_root else {
        return;
    };

    geometry.clear();
    let mut vertices = 0;
    let mut mesh_count = 0;
    let mut materials = HashSet::new();

    for entity in children.iter_descendants(root) {
        let Ok((mesh3d, transform, material)) = mesh_entities.get(entity) else {
            continue;
        };
        let Some(mesh) = meshes.get(&mesh3d.0) else {
            continue;
        };
        let Some(VertexAttributeValues::Float32x3(values)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            continue;
        };
        let positions: &[f32] = bytemuck::cast_slice(values.as_slice());
        let indices: Option<Vec<u32>> = mesh.indices().map(|indices| match indices {
            Indices::U16(values) => values.iter().map(|&i| i as u32).collect(),
            Indices::U32(values) => values.clone(),
        });

        vertices += values.len();
        mesh_count += 1;
        materials.insert(material.0.id());
        geometry
            .triangles
            .extend(world_triangles(positions, indices.as_deref(), transform));
    }

    geometry.extent = triangle_extent(&geometry.triangles).ok();
    *model_info = ModelInfo::from_geometry(
        geometry.extent.as_ref(),
        &geometry.triangles,
        vertices,
        mesh_count,
        materials.len(),
    );
    if let Some(extent) = geometry.extent {
        orbit.frame(&extent);
    } else {
        warn!("Model '{}' carries no measurable geometry", loader.path);
    }

    info!(
        "Model ready: {} triangles across {} meshes",
        geometry.triangles.len(),
        mesh_count
    );
    match serde_json::to_value(&*model_info) {
        Ok(info) => rpc_interface.send_notification("model_info", info),
        Err(e) => error!("Failed to serialise model info: {}", e),
    }
    next_state.set(AppState::Running);
}

/// Replace the model. Annotations are cleared before the scene is torn
/// down so nothing ever refers to geometry that no longer exists, then
/// the viewer goes back through `Loading` for the new asset.
pub fn handle_model_reload(
    mut commands: Commands,
    mut events: EventReader<LoadModelEvent>,
    mut loader: ResMut<ModelLoader>,
    mut annotations: ResMut<AnnotationSet>,
    mut measure_tool: ResMut<MeasureTool>,
    mut panel: ResMut<PanelState>,
    mut geometry: ResMut<PickableGeometry>,
    mut model_info: ResMut<ModelInfo>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    visuals: Query<(Entity, &AnnotationVisual)>,
    labels: Query<(Entity, &AnnotationLabel)>,
    pending_markers: Query<Entity, With<PendingStartMarker>>,
    box_visuals: Query<Entity, With<BoundingBoxVisual>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(event) = events.read().last() else {
        return;
    };

    let removed = clear_all_annotations(
        &mut commands,
        &mut annotations,
        &visuals,
        &labels,
        &pending_markers,
        &box_visuals,
    );
    measure_tool.set_active(false);
    panel.show_edge_measurements = false;
    panel.show_bounding_box = false;
    if removed > 0 {
        rpc_interface.send_notification("measure_cleared", serde_json::json!({ "removed": removed }));
    }

    if let Some(root) = loader.scene_root.take() {
        commands.entity(root).despawn();
    }
    geometry.clear();
    *model_info = ModelInfo::default();

    loader.path = event.path.clone();
    next_state.set(AppState::Loading);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    use crate::tools::annotations::AnnotationKind;

    fn reload_test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<AppState>();
        app.init_resource::<ModelLoader>()
            .init_resource::<ModelInfo>()
            .init_resource::<AnnotationSet>()
            .init_resource::<MeasureTool>()
            .init_resource::<PanelState>()
            .init_resource::<PickableGeometry>()
            .init_resource::<WebRpcInterface>()
            .add_event::<LoadModelEvent>()
            .add_systems(Update, handle_model_reload);
        app
    }

    #[test]
    fn reload_requested_before_running_is_not_dropped() {
        let mut app = reload_test_app();
        // The viewer starts in `Loading`; a host request arriving now must
        // still be applied, not expire unread in the event buffer.
        app.world_mut().send_event(LoadModelEvent {
            path: "models/other.glb".to_string(),
        });
        app.update();

        let loader = app.world().resource::<ModelLoader>();
        assert_eq!(loader.path, "models/other.glb");
        assert!(loader.scene_root.is_none());
    }

    #[test]
    fn reload_clears_annotations_before_the_new_model_arrives() {
        let mut app = reload_test_app();
        app.world_mut()
            .resource_mut::<AnnotationSet>()
            .register(AnnotationKind::PointMeasure, Vec3::ZERO, Vec3::X);

        app.world_mut().send_event(LoadModelEvent {
            path: "models/other.glb".to_string(),
        });
        app.update();

        assert!(app.world().resource::<AnnotationSet>().is_empty());
        assert!(app.world().resource::<PickableGeometry>().extent.is_none());
    }
}
