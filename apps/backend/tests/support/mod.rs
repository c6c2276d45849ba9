#![allow(dead_code)]

pub mod logging;
pub mod providers;
pub mod server;
pub mod websocket_client;
