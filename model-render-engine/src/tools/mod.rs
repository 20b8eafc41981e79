//! Measurement tooling for the viewer.
//!
//! Three tools share one annotation pipeline:
//!
//! - **Point measure**: two surface picks become a labelled distance
//!   measurement. Picks ray-cast against the sampled model triangles, so
//!   measurements always land on real surfaces, never on other
//!   annotations.
//! - **Edge measurements**: significant axis-aligned edges of the model
//!   are annotated automatically.
//! - **Bounding box**: a wireframe box around the model with labelled
//!   width, height and depth.
//!
//! All three register their results in [`annotations::AnnotationSet`],
//! which stays 1:1 with the rendered primitive groups. Panel commands
//! arrive as [`tool_manager::PanelCommandEvent`]s, raised natively by
//! keyboard shortcuts and in the browser over the RPC bridge.

pub mod annotations;
pub mod bounding_box;
pub mod edge_annotations;
pub mod measure;
pub mod picking;
pub mod tool_manager;

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;

pub struct MeasurementToolsPlugin;

impl Plugin for MeasurementToolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<measure::MeasureTool>()
            .init_resource::<annotations::AnnotationSet>()
            .init_resource::<picking::PickableGeometry>()
            .init_resource::<tool_manager::PanelState>()
            .add_event::<tool_manager::PanelCommandEvent>()
            .add_systems(
                Update,
                (
                    // Panel commands are consumed in every state; an RPC
                    // command raised during a load must not expire in the
                    // event buffer before a consumer runs.
                    tool_manager::apply_panel_commands,
                    measure::measure_tool_system.run_if(in_state(AppState::Running)),
                    annotations::sync_annotation_labels,
                )
                    .chain(),
            );

        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(
            Update,
            tool_manager::handle_panel_shortcuts.before(tool_manager::apply_panel_commands),
        );
    }
}
