mod archive;
mod cli;
mod fields_cmd;
mod fill_cmd;
mod interrupt;
mod row_range;
mod rows;
mod shared;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
mod test_fixtures;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        cli::Commands::Fields {
            ref template,
            ref data,
            ref format,
        } => fields_cmd::run(template, data.as_deref(), format),
        cli::Commands::Fill {
            ref template,
            ref data,
            ref naming_key,
            ref pad,
            no_default_pad,
            read_only,
            reject_duplicates,
            ref rows,
            jobs,
            ref output,
            ref format,
        } => fill_cmd::run(&fill_cmd::FillArgs {
            template,
            data,
            naming_key,
            pad,
            no_default_pad,
            read_only,
            reject_duplicates,
            rows: rows.as_deref(),
            jobs,
            output: output.as_deref(),
            format,
        }),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
