use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::mpsc;

use editalgen::app::controllers::outline::NullViewport;
use editalgen::app::controllers::pagination::{BlockRenderer, NoPrint, RenderSurface};
use editalgen::app::domain::catalog::FieldCatalog;
use editalgen::app::domain::layout::Orientation;
use editalgen::app::domain::messages::Message;
use editalgen::app::domain::settings::AppSettings;
use editalgen::app::infrastructure::error::{AppError, Result};
use editalgen::app::services::importer::{self, DocxConverter};
use editalgen::app::state::{AppState, PreviewWidgets};

const USAGE: &str =
    "uso: editalgen <catalogo.json> [texto-base.md|.html] [-o saida.html] [--landscape]";

/// Stands in until a real DOCX conversion backend is wired up.
struct UnavailableConverter;

impl DocxConverter for UnavailableConverter {
    fn convert(&self, _bytes: &[u8]) -> Result<String> {
        Err(AppError::Import(
            "conversão DOCX não configurada".to_string(),
        ))
    }
}

fn main() {
    let mut catalog_path: Option<PathBuf> = None;
    let mut base_path: Option<PathBuf> = None;
    let mut out_path = PathBuf::from("preview.html");
    let mut landscape = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" => match args.next() {
                Some(path) => out_path = PathBuf::from(path),
                None => {
                    eprintln!("{}", USAGE);
                    process::exit(2);
                }
            },
            "--landscape" => landscape = true,
            _ if catalog_path.is_none() => catalog_path = Some(PathBuf::from(arg)),
            _ if base_path.is_none() => base_path = Some(PathBuf::from(arg)),
            _ => {
                eprintln!("{}", USAGE);
                process::exit(2);
            }
        }
    }
    let Some(catalog_path) = catalog_path else {
        eprintln!("{}", USAGE);
        process::exit(2);
    };

    let mut settings = AppSettings::load();
    if landscape {
        settings.orientation = Orientation::Landscape;
    }

    let catalog = fs::read_to_string(&catalog_path)
        .map_err(AppError::from)
        .and_then(|json| FieldCatalog::from_json(&json));
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Erro ao carregar o catálogo: {}", e);
            process::exit(1);
        }
    };

    let (sender, receiver) = mpsc::channel();
    let mut state = AppState::new(
        catalog,
        settings,
        Arc::new(UnavailableConverter),
        Box::new(NullViewport),
        sender.clone(),
    );

    if let Some(base) = base_path {
        match fs::read_to_string(&base) {
            Ok(text) => {
                let markup = if base.extension().is_some_and(|ext| ext == "md") {
                    importer::render_markdown(&text)
                } else {
                    text
                };
                state.set_base_content(&markup);
            }
            Err(e) => {
                eprintln!("Erro ao ler o texto base {}: {}", base.display(), e);
                process::exit(1);
            }
        }
    }

    println!("Campos ({}):", state.chips().len());
    for chip in state.chips() {
        println!(
            "  [{}] {} = {}  {}",
            chip.origin, chip.label, chip.value, chip.token
        );
    }

    let rows = state.outline_rows();
    if !rows.is_empty() {
        println!("Sumário:");
        for row in rows {
            let indent = "  ".repeat(row.level as usize);
            println!("{}{} ({})", indent, row.text, row.id);
        }
    }

    let mut renderer = BlockRenderer::default();
    let mut surface = RenderSurface::new();
    let mut printer = NoPrint;

    let _ = sender.send(Message::OpenPreview { auto_print: false });
    while let Ok(message) = receiver.try_recv() {
        let mut preview = PreviewWidgets {
            renderer: &mut renderer,
            surface: &mut surface,
            printer: &mut printer,
        };
        state.handle_message(message, &mut preview);
    }

    if let Err(e) = fs::write(&out_path, surface.html()) {
        eprintln!("Erro ao gravar {}: {}", out_path.display(), e);
        process::exit(1);
    }
    println!(
        "Prévia gravada em {} ({} página(s))",
        out_path.display(),
        surface.page_count()
    );

    if let Err(e) = state.settings.save() {
        eprintln!("Não foi possível salvar as configurações: {}", e);
    }
}
