use bevy::prelude::*;

/// Viewer lifecycle. `Loading` covers the glTF fetch and scene spawn,
/// `ModelLoaded` the one-frame geometry sampling pass, `Running` the
/// interactive viewer.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    ModelLoaded,
    Running,
}

#[derive(Component)]
pub struct FpsText;

/// Native overlay showing model dimensions and statistics.
#[derive(Component)]
pub struct InfoPanelText;
