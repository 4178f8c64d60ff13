#[path = "frame/properties.rs"]
mod properties;
#[path = "frame/wire.rs"]
mod wire;
