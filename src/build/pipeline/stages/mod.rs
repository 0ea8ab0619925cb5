//! Default pipeline stages.
//!
//! The standard document processing pipeline consists of:
//!
//! 1. **FrontMatterStage** - Split metadata from body text, assign URLs
//! 2. **MarkupStage** - Parse the body into a tree and render it to HTML
//! 3. **TemplateStage** - Wrap content in the page template
//! 4. **WriteStage** - Write final HTML to output directory
//!
//! followed by the build-wide **IndexStage**, which writes the archive and
//! tag pages.

mod front_matter;
mod index;
mod markup;
mod template;
mod write;

pub use front_matter::FrontMatterStage;
pub use index::IndexStage;
pub use markup::MarkupStage;
pub use template::TemplateStage;
pub use write::WriteStage;
