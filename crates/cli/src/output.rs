use crate::args::OutputFormat;
use anyhow::Result;
use member_graph::{render_dot, to_json, MemberGraph, Palette};
use std::path::Path;

pub struct Renderer {
    format: OutputFormat,
    palette: Palette,
}

impl Renderer {
    pub fn new(format: OutputFormat, palette: Palette) -> Self {
        Self { format, palette }
    }

    pub fn render(&self, graph: &MemberGraph) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Dot => render_dot(graph, &self.palette),
            OutputFormat::Json => {
                let mut json = to_json(graph, &self.palette)?;
                json.push('\n');
                json
            }
        })
    }
}

pub async fn emit(text: &str, target: Option<&Path>) -> Result<()> {
    match target {
        Some(path) => {
            tokio::fs::write(path, text).await?;
            log::info!("Wrote graph to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
