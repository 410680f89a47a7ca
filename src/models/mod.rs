pub mod angle;
pub mod job;
pub mod loaders;
pub mod scene;
pub mod style;

pub use angle::AnglePreset;
pub use job::{BatchReport, Job, JobState};
pub use loaders::{load_all_toml_files, load_toml_to_scene_request};
pub use scene::{AngleSpec, SceneRequest};
pub use style::Style;
