use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result, anyhow};
use clap::Args;
use extraction::{
    CandidateFallback, ExtractOptions, Extractor, GridMethod, Runtime, Schema,
    detect::GridStrategy, options::DEFAULT_REGION_MARGIN,
};
use pdf::{PdfFile, SingleThreadedTabulaExtractor};
use pdfium_render::prelude::Pdfium;

use crate::{distpaths, output};

/// Name reported in the optional runtime block.
const ENGINE: &str = "pdfium+tabula";

#[derive(Args, Debug)]
pub struct Command {
    /// Path to input PDF.
    pub input_pdf: PathBuf,

    /// Path to the JSON schema describing the tables to extract.
    #[arg(long)]
    pub schema: PathBuf,

    /// Path to write the JSON result to, or "-" for standard output.
    #[arg(long, default_value = "-")]
    pub out: PathBuf,

    /// Path to Tabula JAR file. Defaults to the tabula.jar distributed alongside this program.
    #[arg(long)]
    pub tabula_libpath: Option<String>,

    /// Path to the pdfium shared library. Defaults to the library distributed alongside this
    /// program, then to the system library.
    #[arg(long)]
    pub pdfium_libpath: Option<PathBuf>,

    /// Distance in points that each table region extends below its anchor.
    #[arg(long, default_value_t = DEFAULT_REGION_MARGIN)]
    pub region_margin: f32,

    /// Grid detection strategies, tried in order until one finds a table.
    ///
    /// Defaults to lines,text,lines-strict.
    #[arg(long, value_delimiter(','))]
    pub strategies: Vec<GridMethod>,

    /// Report no_candidate_matched instead of using the first candidate grid when no candidate
    /// matches any expected column or row.
    #[arg(long)]
    pub reject_unscored_candidates: bool,

    /// Include engine name and elapsed time in the output. This makes output differ between runs.
    #[arg(long)]
    pub with_runtime: bool,
}

impl Command {
    pub fn extract_options(&self) -> ExtractOptions {
        let mut options = ExtractOptions {
            region_margin: self.region_margin,
            ..Default::default()
        };
        if !self.strategies.is_empty() {
            options.strategies = self
                .strategies
                .iter()
                .copied()
                .map(GridStrategy::from)
                .collect();
        }
        if self.reject_unscored_candidates {
            options.candidate_fallback = CandidateFallback::Reject;
        }
        options
    }
}

/// Runs the extraction.
pub fn run(cmd: &Command) -> Result<()> {
    let schema =
        Schema::load(&cmd.schema).with_context(|| format!("loading schema {:?}", cmd.schema))?;
    let options = cmd.extract_options();
    log::debug!("Extracting with {options:?}.");

    let pdfium = bind_pdfium(cmd.pdfium_libpath.as_deref())?;

    let tabula_libpath = cmd
        .tabula_libpath
        .clone()
        .or_else(distpaths::tabula_jar)
        .ok_or_else(|| anyhow!("no Tabula JAR found; pass --tabula-libpath"))?;
    let vm = tabula::TabulaVM::new(&tabula_libpath, false).with_context(|| "initialising Tabula")?;
    let env = vm.attach().with_context(|| "attaching to TabulaVM")?;
    let tabula = SingleThreadedTabulaExtractor::new(env);

    let started = Instant::now();
    let extractor = Extractor::new(&schema, &options);
    let mut result =
        extractor.extract_document(|| PdfFile::open(&pdfium, &tabula, &cmd.input_pdf));
    if cmd.with_runtime {
        result.runtime = Some(Runtime {
            engine: ENGINE.into(),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        });
    }

    output::write_json(&result, &cmd.out)
}

fn bind_pdfium(libpath: Option<&Path>) -> Result<Pdfium> {
    let bindings = match libpath.map(Path::to_owned).or_else(distpaths::pdfium_library) {
        Some(path) => Pdfium::bind_to_library(&path)
            .with_context(|| format!("binding to pdfium library {path:?}"))?,
        None => Pdfium::bind_to_system_library().with_context(|| "binding to system pdfium")?,
    };
    Ok(Pdfium::new(bindings))
}
