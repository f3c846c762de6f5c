//! Output encoders for a serialized provenance document.
//!
//! Four independent renderers consume the profile-mapped
//! [`SerializedDocument`](crate::serialize::SerializedDocument): PROV-N text,
//! PROV-JSON, PROV-XML and the d3-style Graph-JSON view.

pub mod graphjson;
pub mod provjson;
pub mod provn;
pub mod provxml;

use crate::error::RenderError;
use crate::serialize::SerializedDocument;

/// Wire format of the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    ProvN,
    #[default]
    ProvJson,
    ProvXml,
    /// Visualization request; serves the same payload as [`OutputFormat::GraphJson`]
    /// (the HTML wrapper page is not part of this service).
    Graph,
    GraphJson,
}

impl OutputFormat {
    /// The RESPONSEFORMAT value naming this format.
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::ProvN => "PROV-N",
            OutputFormat::ProvJson => "PROV-JSON",
            OutputFormat::ProvXml => "PROV-XML",
            OutputFormat::Graph => "GRAPH",
            OutputFormat::GraphJson => "GRAPH-JSON",
        }
    }

    /// Media type of the rendered body.
    pub fn media_type(self) -> &'static str {
        match self {
            OutputFormat::ProvN => "text/plain",
            OutputFormat::ProvJson => "application/json",
            OutputFormat::ProvXml => "text/xml",
            OutputFormat::Graph | OutputFormat::GraphJson => "application/json",
        }
    }
}

/// A rendered response body with its media type.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub body: String,
    pub media_type: &'static str,
}

/// Render the document in the requested format.
pub fn render(doc: &SerializedDocument, format: OutputFormat) -> Result<Rendered, RenderError> {
    let body = match format {
        OutputFormat::ProvN => provn::render(doc),
        OutputFormat::ProvJson => provjson::render(doc)?,
        OutputFormat::ProvXml => provxml::render(doc)?,
        OutputFormat::Graph | OutputFormat::GraphJson => graphjson::render(doc)?,
    };
    Ok(Rendered { body, media_type: format.media_type() })
}
