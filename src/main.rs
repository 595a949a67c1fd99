use crossword_grid::config::{parse_cli, RuntimeConfig};
use crossword_grid::image::io::{write_json_file, DirectorySink};
use crossword_grid::{CrosswordExtractor, ExtractionReport, NoopSink};
use std::env;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "crossword_grid".to_string());
    let rest: Vec<String> = args.collect();
    let config = parse_cli(&program, &rest)?;

    let image = config.load_input()?;
    let extractor = CrosswordExtractor::new(config.params.clone());

    let report = match &config.output.debug_dir {
        Some(dir) => {
            let mut sink = DirectorySink::new(dir);
            let report = extractor.process_with_report(&image, &mut sink);
            eprintln!(
                "{} debug images written to {}",
                sink.written().len(),
                dir.display()
            );
            report
        }
        None => extractor.process_with_report(&image, &mut NoopSink),
    };

    write_report(&config, &report)?;
    let grid = report.result().map_err(|e| e.to_string())?;
    println!("{}", grid.encode());
    Ok(())
}

fn write_report(config: &RuntimeConfig, report: &ExtractionReport) -> Result<(), String> {
    if let Some(path) = &config.output.json_out {
        write_json_file(path, report)?;
        eprintln!("JSON report written to {}", path.display());
    }
    Ok(())
}
