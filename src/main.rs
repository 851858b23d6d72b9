// Tarn: compiler front end for the Tarn language

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use tarn::diagnostics::{self, Reporter};
use tarn::printer;
use tarn::source::SourceMap;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let color = cli.color.enabled(diagnostics::stderr_is_terminal());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_directive())),
        )
        .with_ansi(color)
        .with_writer(io::stderr)
        .init();

    if let Some(output) = &cli.output {
        debug!(output = %output.display(), "output path is reserved; nothing is written");
    }

    let mut sources = SourceMap::new();
    let mut warnings = Vec::new();
    let result = tarn::compile_file(&mut sources, &cli.file, &mut warnings);

    let reporter = Reporter::new(&sources, color);
    for warning in &warnings {
        eprintln!("{}", reporter.render_lex(warning));
    }

    match result {
        Ok((file, program)) => {
            debug!(%file, declarations = program.declarations.len(), "printing program");
            let text = printer::print_program(&program);
            let mut stdout = io::stdout().lock();
            if let Err(err) = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
                eprintln!("Error: cannot write output: {err}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", reporter.render(&err));
            ExitCode::FAILURE
        }
    }
}
