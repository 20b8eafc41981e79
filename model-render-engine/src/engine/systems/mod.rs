pub mod fps_tracking;
pub mod info_panel;
