/// Camera crops, fit-whole-route sizing and zoom-out easing.
pub mod camera;
/// Bounded search for the most detailed feasible zoom.
pub mod zoom;
