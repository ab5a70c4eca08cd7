// Domain layer - plain records and pure transforms
pub mod compass;
pub mod forecast;
pub mod icon;
pub mod options;
pub mod slot;
pub mod telemetry;
pub mod view_model;
