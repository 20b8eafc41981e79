use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;

use crate::engine::assets::model_info::ModelInfo;
use crate::engine::assets::model_loader::{
    check_model_ready, handle_model_reload, prepare_model, start_loading, LoadModelEvent,
    ModelLoader,
};
use crate::engine::camera::orbit_camera::{camera_controller, OrbitCamera};
use crate::engine::core::app_state::AppState;
use crate::engine::core::window_config::create_window_config;
use crate::engine::scene::lighting::spawn_lighting;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::MeasurementToolsPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::{FpsText, InfoPanelText};
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::fps_text_update_system;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::info_panel::info_panel_update_system;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(WebRpcPlugin)
        .add_plugins(MeasurementToolsPlugin);

    // Initialise resources early
    app.init_resource::<ModelLoader>()
        .init_resource::<ModelInfo>()
        .init_resource::<OrbitCamera>()
        .add_event::<LoadModelEvent>();

    // State-based system scheduling. Reload requests are consumed in every
    // state so a command arriving mid-load is never lost to the event
    // buffer; `start_loading` re-runs inside `Loading` and picks up the
    // replacement path once the old scene is gone.
    app.add_systems(Startup, setup)
        .add_systems(
            Update,
            (start_loading, check_model_ready)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            prepare_model.run_if(in_state(AppState::ModelLoaded)),
        )
        .add_systems(Update, handle_model_reload)
        .add_systems(
            Update,
            (camera_controller, fps_notification_system).run_if(in_state(AppState::Running)),
        );

    // Native-only overlay refresh.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, (fps_text_update_system, info_panel_update_system));
    }

    app
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-2.5, 4.5, 9.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                InfoPanelText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
