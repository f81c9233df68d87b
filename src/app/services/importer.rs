//! Import of base texts into the editor: DOCX binaries converted by an
//! external collaborator, and markdown rendered locally.
//!
//! Network and conversion work runs on a background thread that posts its
//! outcome back as a [`Message`]; the document is only touched on the main
//! loop, at the cursor position current when the result arrives. A failed
//! import therefore never leaves the content half-modified.

use pulldown_cmark::{Options, Parser, html};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::app::domain::messages::Message;
use crate::app::infrastructure::error::{AppError, Result};

const FETCH_TIMEOUT_SECS: u64 = 10;

/// External binary-document converter: bytes in, markup out.
pub trait DocxConverter: Send + Sync {
    fn convert(&self, bytes: &[u8]) -> Result<String>;
}

/// Fetch a DOCX binary over HTTP. Non-success status codes surface as a
/// descriptive import error.
pub fn fetch_docx(url: &str) -> Result<Vec<u8>> {
    let response = minreq::get(url)
        .with_timeout(FETCH_TIMEOUT_SECS)
        .send()
        .map_err(|e| AppError::Import(format!("Falha ao carregar DOCX ({})", e)))?;

    if !(200..300).contains(&response.status_code) {
        return Err(AppError::Import(format!(
            "Falha ao carregar DOCX ({})",
            response.status_code
        )));
    }

    Ok(response.as_bytes().to_vec())
}

/// Fetch from `url` and convert on a background thread; the outcome comes
/// back through `sender` as `Message::DocxImported`.
pub fn import_from_url(url: String, converter: Arc<dyn DocxConverter>, sender: Sender<Message>) {
    std::thread::spawn(move || {
        let result = fetch_docx(&url).and_then(|bytes| converter.convert(&bytes));
        let _ = sender.send(Message::DocxImported(result.map_err(|e| e.to_string())));
    });
}

/// Read a local DOCX file and convert on a background thread.
pub fn import_from_file(path: PathBuf, converter: Arc<dyn DocxConverter>, sender: Sender<Message>) {
    std::thread::spawn(move || {
        let result = fs::read(&path)
            .map_err(|e| AppError::Import(format!("Falha ao ler {}: {}", path.display(), e)))
            .and_then(|bytes| converter.convert(&bytes));
        let _ = sender.send(Message::DocxImported(result.map_err(|e| e.to_string())));
    });
}

/// Render a markdown base text to markup.
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(text, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}
