//! Orchestrates the paginated preview: builds a standalone render source
//! from the live content plus layout-derived page rules, delegates physical
//! pagination to a renderer, and optionally triggers printing.
//!
//! Rendering is scheduled rather than run inline. A new schedule supersedes
//! any pending job, and closing the preview discards pending work together
//! with the surface output, so a stale render can never show up.

use crate::app::domain::layout::PageLayoutConfig;
use crate::app::infrastructure::error::Result;

/// Mount target the renderer writes into. Each render fully replaces the
/// prior output.
#[derive(Debug, Default)]
pub struct RenderSurface {
    html: String,
    pages: usize,
}

impl RenderSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.html.clear();
        self.pages = 0;
    }

    pub fn write(&mut self, html: String, pages: usize) {
        self.html = html;
        self.pages = pages;
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// External physical-pagination collaborator.
pub trait PaginationRenderer {
    fn paginate(&mut self, source: &str, surface: &mut RenderSurface) -> Result<()>;
}

/// Platform print hook, invoked after pagination when auto-print is set.
pub trait PrintAction {
    fn print(&mut self);
}

/// Print hook for headless use.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintAction for NoPrint {
    fn print(&mut self) {}
}

#[derive(Debug, Clone)]
struct RenderJob {
    source: String,
    auto_print: bool,
}

#[derive(Debug, Default)]
pub struct PaginationCoordinator {
    pending: Option<RenderJob>,
}

impl PaginationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a render of `content` under `layout`, superseding any job not
    /// yet run.
    pub fn schedule(&mut self, content: &str, layout: PageLayoutConfig, auto_print: bool) {
        let source = format!("<style>{}</style>{}", layout.page_style(), content);
        self.pending = Some(RenderJob { source, auto_print });
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop pending work without rendering (preview closed).
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Run the pending job if there is one. The surface is cleared first, so
    /// a renderer failure leaves it empty rather than showing stale pages;
    /// the error is returned for the caller to report. Returns Ok(true) when
    /// a job ran to completion.
    pub fn run_pending(
        &mut self,
        renderer: &mut dyn PaginationRenderer,
        surface: &mut RenderSurface,
        printer: &mut dyn PrintAction,
    ) -> Result<bool> {
        let Some(job) = self.pending.take() else {
            return Ok(false);
        };

        surface.clear();
        renderer.paginate(&job.source, surface)?;
        if job.auto_print {
            printer.print();
        }
        Ok(true)
    }
}

/// Built-in renderer: splits the source into top-level blocks and groups a
/// fixed number of blocks per A4 page section. Stands in when no platform
/// pagination backend is wired up.
#[derive(Debug)]
pub struct BlockRenderer {
    pub blocks_per_page: usize,
}

impl Default for BlockRenderer {
    fn default() -> Self {
        Self { blocks_per_page: 12 }
    }
}

impl PaginationRenderer for BlockRenderer {
    fn paginate(&mut self, source: &str, surface: &mut RenderSurface) -> Result<()> {
        let blocks = split_blocks(source);
        let chunk = self.blocks_per_page.max(1);
        let mut html = String::with_capacity(source.len() + 128);
        let mut pages = 0;

        for page_blocks in blocks.chunks(chunk) {
            pages += 1;
            html.push_str(&format!("<section class=\"page\" data-page=\"{}\">", pages));
            for block in page_blocks {
                html.push_str(block);
            }
            html.push_str("</section>");
        }

        if pages == 0 {
            pages = 1;
            html.push_str("<section class=\"page\" data-page=\"1\"></section>");
        }

        surface.write(html, pages);
        Ok(())
    }
}

const BLOCK_CLOSERS: &[&str] = &[
    "</style>",
    "</p>",
    "</h1>",
    "</h2>",
    "</h3>",
    "</h4>",
    "</ul>",
    "</ol>",
    "</table>",
    "</blockquote>",
];

/// Split markup at block-element boundaries, keeping the closing tag with
/// its block. Trailing loose text forms a final block of its own.
fn split_blocks(source: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = source;

    'outer: while !rest.is_empty() {
        let mut earliest: Option<usize> = None;
        for closer in BLOCK_CLOSERS {
            if let Some(pos) = rest.find(closer) {
                let end = pos + closer.len();
                earliest = Some(match earliest {
                    Some(e) => e.min(end),
                    None => end,
                });
            }
        }
        match earliest {
            Some(end) => {
                blocks.push(&rest[..end]);
                rest = &rest[end..];
            }
            None => {
                if !rest.trim().is_empty() {
                    blocks.push(rest);
                }
                break 'outer;
            }
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::layout::{Margins, Orientation};
    use crate::app::infrastructure::error::AppError;

    #[derive(Default)]
    struct CountingPrinter {
        prints: usize,
    }

    impl PrintAction for CountingPrinter {
        fn print(&mut self) {
            self.prints += 1;
        }
    }

    struct FailingRenderer;

    impl PaginationRenderer for FailingRenderer {
        fn paginate(&mut self, _source: &str, _surface: &mut RenderSurface) -> Result<()> {
            Err(AppError::Render("backend indisponível".to_string()))
        }
    }

    fn layout() -> PageLayoutConfig {
        PageLayoutConfig::new(Orientation::Portrait, Margins::uniform(20))
    }

    #[test]
    fn test_schedule_and_run_renders_into_surface() {
        let mut coordinator = PaginationCoordinator::new();
        let mut renderer = BlockRenderer::default();
        let mut surface = RenderSurface::new();
        let mut printer = CountingPrinter::default();

        coordinator.schedule("<p>conteúdo</p>", layout(), false);
        assert!(coordinator.has_pending());

        let ran = coordinator
            .run_pending(&mut renderer, &mut surface, &mut printer)
            .unwrap();
        assert!(ran);
        assert!(!coordinator.has_pending());
        assert!(surface.html().contains("<p>conteúdo</p>"));
        assert!(surface.html().contains("size: A4 portrait;"));
        assert_eq!(printer.prints, 0);
    }

    #[test]
    fn test_run_without_pending_is_noop() {
        let mut coordinator = PaginationCoordinator::new();
        let mut renderer = BlockRenderer::default();
        let mut surface = RenderSurface::new();
        let mut printer = CountingPrinter::default();

        let ran = coordinator
            .run_pending(&mut renderer, &mut surface, &mut printer)
            .unwrap();
        assert!(!ran);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_new_schedule_supersedes_pending() {
        let mut coordinator = PaginationCoordinator::new();
        let mut renderer = BlockRenderer::default();
        let mut surface = RenderSurface::new();
        let mut printer = NoPrint;

        coordinator.schedule("<p>antigo</p>", layout(), false);
        coordinator.schedule("<p>novo</p>", layout(), false);
        coordinator
            .run_pending(&mut renderer, &mut surface, &mut printer)
            .unwrap();

        assert!(surface.html().contains("novo"));
        assert!(!surface.html().contains("antigo"));
    }

    #[test]
    fn test_auto_print_triggers_once_after_render() {
        let mut coordinator = PaginationCoordinator::new();
        let mut renderer = BlockRenderer::default();
        let mut surface = RenderSurface::new();
        let mut printer = CountingPrinter::default();

        coordinator.schedule("<p>x</p>", layout(), true);
        coordinator
            .run_pending(&mut renderer, &mut surface, &mut printer)
            .unwrap();
        assert_eq!(printer.prints, 1);
    }

    #[test]
    fn test_render_failure_leaves_surface_cleared() {
        let mut coordinator = PaginationCoordinator::new();
        let mut renderer = FailingRenderer;
        let mut surface = RenderSurface::new();
        surface.write("<section>velho</section>".to_string(), 1);
        let mut printer = CountingPrinter::default();

        coordinator.schedule("<p>x</p>", layout(), true);
        let err = coordinator
            .run_pending(&mut renderer, &mut surface, &mut printer)
            .unwrap_err();
        assert!(err.to_string().contains("backend indisponível"));
        assert!(surface.is_empty());
        // Print never fires on failure.
        assert_eq!(printer.prints, 0);
        // The failed job is consumed; the session stays usable.
        assert!(!coordinator.has_pending());
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut coordinator = PaginationCoordinator::new();
        coordinator.schedule("<p>x</p>", layout(), false);
        coordinator.cancel();
        assert!(!coordinator.has_pending());
    }

    #[test]
    fn test_block_renderer_splits_pages() {
        let mut renderer = BlockRenderer { blocks_per_page: 2 };
        let mut surface = RenderSurface::new();
        renderer
            .paginate("<p>a</p><p>b</p><p>c</p>", &mut surface)
            .unwrap();
        assert_eq!(surface.page_count(), 2);
        assert!(surface.html().contains("data-page=\"1\"><p>a</p><p>b</p>"));
        assert!(surface.html().contains("data-page=\"2\"><p>c</p>"));
    }

    #[test]
    fn test_block_renderer_empty_source_yields_one_page() {
        let mut renderer = BlockRenderer::default();
        let mut surface = RenderSurface::new();
        renderer.paginate("", &mut surface).unwrap();
        assert_eq!(surface.page_count(), 1);
    }

    #[test]
    fn test_split_blocks_keeps_closers() {
        let blocks = split_blocks("<h1>T</h1><p>a</p>resto");
        assert_eq!(blocks, vec!["<h1>T</h1>", "<p>a</p>", "resto"]);
    }
}
