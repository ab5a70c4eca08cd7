// Infrastructure layer - External dependencies and adapters
pub mod bitmap;
pub mod config;
pub mod darksky_client;
pub mod epd2in7;
pub mod frame_store;
pub mod host_sensors;
pub mod icon_loader;
#[cfg(feature = "rpi")]
pub mod rpi;
pub mod thingspeak_client;
