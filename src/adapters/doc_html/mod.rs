// HTML document builder - Markdown rendering wrapped in a standalone page

use std::path::{Path, PathBuf};

use pulldown_cmark::{html, Options, Parser};
use tracing::info;

use crate::adapters::doc_markdown::render_markdown;
use crate::domain::errors::DomainError;
use crate::domain::model::InstructionStep;
use crate::ports::DocumentPort;

const STYLE: &str = "body{font-family:sans-serif;max-width:860px;margin:2em auto;line-height:1.5}\
img{max-width:100%;border:1px solid #ccc}h2{margin-top:2em}";

/// Writes `steps.html`
pub struct HtmlDocumentBuilder;

impl HtmlDocumentBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Convert Markdown into a complete HTML page
    pub fn render_page(title: &str, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
        let mut body = String::new();
        html::push_html(&mut body, parser);

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
            escape(title),
            STYLE,
            body
        )
    }
}

impl Default for HtmlDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl DocumentPort for HtmlDocumentBuilder {
    fn name(&self) -> &str {
        "HTML"
    }

    fn dir_name(&self) -> &str {
        "html"
    }

    fn build(
        &self,
        title: &str,
        steps: &[InstructionStep],
        output_dir: &Path,
    ) -> Result<PathBuf, DomainError> {
        std::fs::create_dir_all(output_dir)
            .map_err(|e| DomainError::FsFail(format!("Failed to create {}: {}", output_dir.display(), e)))?;

        let markdown = render_markdown(title, steps, output_dir);
        let path = output_dir.join("steps.html");
        std::fs::write(&path, Self::render_page(title, &markdown))
            .map_err(|e| DomainError::DocumentFail(format!("Failed to write {}: {}", path.display(), e)))?;

        info!("Wrote HTML document with {} steps to {}", steps.len(), path.display());
        Ok(path)
    }
}
