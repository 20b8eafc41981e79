//! Browser-embeddable glTF model viewer with measurement tooling.
//!
//! The engine renders a single glTF asset, samples its triangles into a
//! pickable world-space soup, and layers measurement tools on top:
//! two-click point measurements, automatic significant-edge annotation,
//! and a labelled bounding-box overlay. A JSON-RPC bridge lets the host
//! page drive the tool panel and receive measurement and model-info
//! notifications.

pub mod engine;
pub mod geometry;
pub mod rpc;
pub mod tools;
