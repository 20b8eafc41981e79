//! JSON-RPC 2.0 bridge to the embedding web page.

pub mod web_rpc;
