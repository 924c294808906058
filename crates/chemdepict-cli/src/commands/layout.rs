use crate::cli::LayoutArgs;
use crate::config::build_settings;
use crate::error::{CliError, Result};
use chemdepict::{
    core::io::document::{DocumentFile, JsonDocument},
    engine::progress::{Progress, ProgressReporter},
    workflows,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{info, warn};

pub fn run(args: LayoutArgs) -> Result<()> {
    let settings = build_settings(&args)?;

    info!("Loading input document from {:?}", &args.input);
    let mut mol =
        JsonDocument::read_from_path(&args.input).map_err(|e| CliError::parsing(&args.input, e))?;

    let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
        Progress::PhaseStart { name } => info!("Phase started: {}", name),
        Progress::PhaseFinish { name, items } => info!("Phase finished: {} ({} items)", name, items),
        Progress::Warning(message) => warn!("{}", message),
    }));

    let report = workflows::layout::run(&mut mol, &settings, &reporter)?;

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writer.flush()?;
            println!("Layout report written to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &report)?;
            writeln!(handle)?;
        }
    }

    if let Some(path) = &args.save_document {
        JsonDocument::write_to_path(&mol, path).map_err(|e| CliError::parsing(path, e))?;
        info!("Laid out document written to {:?}", path);
    }

    if report.stereo_failures() > 0 {
        eprintln!(
            "Warning: {} stereocenter(s) could not be depicted.",
            report.stereo_failures()
        );
    }
    Ok(())
}
