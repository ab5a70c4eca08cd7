// Application layer - Use cases and the traits they depend on
pub mod button_handler;
pub mod panel_service;
pub mod refresh_loop;
pub mod sensor_uploader;
pub mod station_service;
pub mod weather_sources;
