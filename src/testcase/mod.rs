pub mod api;
pub mod model;
pub mod normalize;
pub mod service;
