pub mod config;
pub mod embed;
pub mod import;
pub mod link;
pub mod process;
pub mod recommend;
pub mod resolve;
pub mod show_embedding;
pub mod status;

pub use embed::run_embed;
pub use import::run_import;
pub use link::run_link_images;
pub use process::run_process;
pub use recommend::run_recommend;
pub use resolve::run_resolve;
pub use show_embedding::show_random_embedding;
pub use status::show_status;
