pub mod randomize;
pub mod settings;
pub mod spheres;
pub mod spoiler_log;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
