/// Pace sample arrays and their validation.
pub mod samples;
/// Distance-paced frame timeline construction.
pub mod timeline;
