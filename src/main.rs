use std::io::{self, BufRead, Write};
use std::process;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use cloudctl::cli::{command_tree, output, parse_invocation, Cli, CliResult, Dispatch, Invocation};
use cloudctl::exitcode;
use cloudctl::infrastructure::di::ServiceContainer;

fn main() {
    let cli = Cli::parse();
    let tree = command_tree();

    let invocation = match parse_invocation(&cli, &tree) {
        Ok(Dispatch::Help(text) | Dispatch::Version(text)) => {
            println!("{text}");
            process::exit(exitcode::OK);
        }
        Ok(Dispatch::Command(invocation)) => invocation,
        Err(e) => {
            output::error(&e);
            process::exit(e.exit_code());
        }
    };

    setup_logging(invocation.globals.debug);

    if let Err(e) = run(&invocation) {
        output::error(&e);
        process::exit(e.exit_code());
    }
}

fn run(invocation: &Invocation<'_>) -> CliResult<()> {
    let globals = &invocation.globals;
    let settings = globals.load_settings()?;
    let container = ServiceContainer::new(settings, globals.echo_headers(), globals.verbose)?;

    let mut out: Box<dyn Write> = if globals.silent {
        Box::new(io::sink())
    } else {
        Box::new(io::stdout().lock())
    };
    let stdin = io::stdin();
    let mut input: Box<dyn BufRead> = Box::new(stdin.lock());

    invocation.run(&container, out.as_mut(), input.as_mut())
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // HTTP stack internals are noise even at trace level
    let noisy_modules = ["hyper", "reqwest", "rustls"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        cloudctl::cli::Cli::command().debug_assert()
    }
}
