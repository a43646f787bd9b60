use crate::{
    config::Config,
    engine::{NoProgress, OutputSerializer, PageImage, PageSource, ProgressObserver, Recognizers},
    output::ContentListWriter,
    page::PageProcessor,
    types::{DocumentResult, PageResult},
    util::elapsed_ms,
};
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

pub const STAGE_PROCESSING: &str = "Processing";
pub const STAGE_OUTPUT: &str = "Output";

pub struct Pipeline {
    cfg: Config,
    recognizers: Recognizers,
    serializers: Vec<Box<dyn OutputSerializer>>,
    observer: Box<dyn ProgressObserver>,
}

/// Result of one submitted page, possibly produced out of order.
pub struct PageOutcome {
    pub page_index: usize,
    pub result: Result<PageResult>,
}

impl Pipeline {
    pub fn new(cfg: &Config, recognizers: Recognizers) -> Self {
        let mut serializers: Vec<Box<dyn OutputSerializer>> = Vec::new();
        if cfg.stages.content_list {
            serializers.push(Box::new(ContentListWriter::new(&cfg.output.content_list_filename)));
        }
        Self {
            cfg: cfg.clone(),
            recognizers,
            serializers,
            observer: Box::new(NoProgress),
        }
    }

    pub fn with_observer(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_serializer(mut self, serializer: impl OutputSerializer + 'static) -> Self {
        self.serializers.push(Box::new(serializer));
        self
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Processes a single raster without a page source.
    pub fn process_image(&self, page: &PageImage) -> Result<PageResult> {
        PageProcessor::new(&self.cfg, &self.recognizers).process(page)
    }

    pub fn run(&self, source: &dyn PageSource) -> Result<DocumentResult> {
        let started = Instant::now();
        self.cfg.validate()?;

        let total_pages = match source
            .page_count()
            .with_context(|| "page source could not count pages")
        {
            Ok(n) => n,
            Err(err) => {
                warn!("{err:#}");
                return Ok(DocumentResult::default());
            }
        };
        if total_pages == 0 {
            warn!("document has no pages");
            return Ok(DocumentResult::default());
        }

        let limit = match self.cfg.runtime.max_pages {
            0 => total_pages,
            n => n.min(total_pages),
        };
        let workers = self.cfg.runtime.max_concurrent_pages.min(limit);
        info!(
            "processing {} of {} pages with {} worker(s)",
            limit, total_pages, workers
        );

        let outcomes = if workers > 1 {
            self.run_parallel(source, limit, workers)?
        } else {
            self.run_sequential(source, limit)
        };

        let mut doc = assemble_document(total_pages, outcomes);
        self.serialize(&mut doc);
        doc.total_ms = elapsed_ms(started);

        info!(
            "document complete: {}/{} pages, {} failed, {} skipped elements, {:.1}ms",
            doc.processed_pages,
            doc.total_pages,
            doc.failed_pages.len(),
            doc.skipped_elements,
            doc.total_ms
        );
        Ok(doc)
    }

    fn run_sequential(&self, source: &dyn PageSource, limit: usize) -> Vec<PageOutcome> {
        let mut outcomes = Vec::with_capacity(limit);
        for i in 0..limit {
            outcomes.push(self.process_page(source, i));
            self.observer.on_progress(STAGE_PROCESSING, i + 1, limit);
        }
        outcomes
    }

    fn run_parallel(&self, source: &dyn PageSource, limit: usize, workers: usize) -> Result<Vec<PageOutcome>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| anyhow!("failed to start page workers: {e}"))?;
        let done = AtomicUsize::new(0);

        Ok(pool.install(|| {
            (0..limit)
                .into_par_iter()
                .map(|i| {
                    let outcome = self.process_page(source, i);
                    let n = done.fetch_add(1, Ordering::SeqCst) + 1;
                    self.observer.on_progress(STAGE_PROCESSING, n, limit);
                    outcome
                })
                .collect()
        }))
    }

    fn process_page(&self, source: &dyn PageSource, page_index: usize) -> PageOutcome {
        let t = Instant::now();
        let result = source
            .render(page_index)
            .with_context(|| format!("rendering page {page_index}"))
            .and_then(|page| {
                let render_ms = elapsed_ms(t);
                debug!(
                    "page {} rendered {}x{} in {:.1}ms",
                    page_index,
                    page.width(),
                    page.height(),
                    render_ms
                );
                let mut result = self.process_image(&page)?;
                result.timings.render_ms = render_ms;
                Ok(result)
            });
        PageOutcome { page_index, result }
    }

    fn serialize(&self, doc: &mut DocumentResult) {
        if self.serializers.is_empty() {
            return;
        }
        self.observer.on_progress(STAGE_OUTPUT, 0, 1);
        let t = Instant::now();
        let outputs = self
            .serializers
            .iter()
            .filter_map(|s| match s.serialize(doc) {
                Ok(out) => Some(out),
                Err(err) => {
                    warn!("output serializer failed: {err:#}");
                    None
                }
            })
            .collect();
        doc.outputs = outputs;
        doc.stats.output_ms = elapsed_ms(t);
        self.observer.on_progress(STAGE_OUTPUT, 1, 1);
    }
}

/// Folds page outcomes into a document, resequenced by page index.
pub fn assemble_document(total_pages: usize, mut outcomes: Vec<PageOutcome>) -> DocumentResult {
    outcomes.sort_by_key(|o| o.page_index);

    let mut doc = DocumentResult {
        total_pages,
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome.result {
            Ok(page) => {
                doc.stats.absorb(&page.timings);
                doc.skipped_elements += page.skipped_count();
                doc.processed_pages += 1;
                doc.pages.push(page);
            }
            Err(err) => {
                warn!("page {} failed: {:#}", outcome.page_index, err);
                doc.failed_pages.push(outcome.page_index);
            }
        }
    }
    doc
}
