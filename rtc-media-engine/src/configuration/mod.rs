pub mod media_engine;
pub mod setting_engine;

pub(crate) const UNSPECIFIED_STR: &str = "Unspecified";
