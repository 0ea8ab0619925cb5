mod builder;
mod document;
pub mod format;
mod html;
mod index;
mod markdown;
mod page;
mod paths;
pub mod pipeline;
mod render;
pub mod source;

pub use builder::Builder;
pub use paths::base_path_from_config;
