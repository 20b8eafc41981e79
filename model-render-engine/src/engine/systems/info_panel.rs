use bevy::prelude::*;

use crate::engine::assets::model_info::ModelInfo;
use crate::engine::core::app_state::InfoPanelText;

/// Refresh the native overlay whenever the model info changes.
pub fn info_panel_update_system(
    model_info: Res<ModelInfo>,
    mut query: Query<&mut Text, With<InfoPanelText>>,
) {
    if !model_info.is_changed() {
        return;
    }
    for mut text in &mut query {
        text.0 = model_info.overlay_text();
    }
}
