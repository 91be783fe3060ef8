/// Toolbox pipeline: one parameterized run per tool and an editing session.
///
/// The host decodes an image once, picks a [`ToolConfig`], and gets back an
/// [`Artifact`] it can preview or export.

pub mod pipeline;
pub mod session;

pub use pipeline::{Artifact, ExportRequest, Exporter, export, harmonic, load_tool_config, run};
pub use session::{Rendered, Session};
pub use tb_core::config::ToolConfig;
