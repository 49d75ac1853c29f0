//! Run a scripted person-table session.

use std::{io, panic};

use anyhow::Result;
use arbor::config::RuntimeConfig;
use arbor_examples::session::{self, Script};
use clap::Parser;
use color_backtrace::{BacktracePrinter, default_output_stream};
use tracing::Level;

/// CLI flags for the person table example.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Name to type into the form.
    #[clap(short, long)]
    name: Option<String>,

    /// Age to type into the form.
    #[clap(short, long)]
    age: Option<String>,

    /// Click save after filling the form.
    #[clap(short, long)]
    save: bool,

    /// Click clear at the end.
    #[clap(long)]
    clear: bool,

    /// Print the form's command table.
    #[clap(short, long)]
    commands: bool,

    /// Run without controllers, as a designer would.
    #[clap(long)]
    designer: bool,

    /// Log level; overrides ARBOR_LOG.
    #[clap(long)]
    log: Option<String>,
}

/// Run the person table example.
pub fn main() -> Result<()> {
    panic::set_hook(Box::new(|pi| {
        #[allow(unused_must_use)]
        {
            BacktracePrinter::new().print_panic_info(pi, &mut default_output_stream());
        }
    }));

    let args = Args::parse();
    let mut config = RuntimeConfig::from_env();
    if args.designer {
        config = config.with_designer(true);
    }
    if let Some(level) = args.log {
        config.log_level = level;
    }

    let level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .compact()
        .init();

    let script = Script {
        name: args.name,
        age: args.age,
        save: args.save,
        clear: args.clear,
        commands: args.commands,
    };
    let report = session::run(&config, &script, &mut io::stdout())?;
    println!("{report:#?}");
    Ok(())
}
