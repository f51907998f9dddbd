use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod aggregate;
mod allocate;
mod calendar;
mod cli;
mod error;
mod ext;
mod ingest;
mod model;
mod params;
mod processor;
mod render;
mod util;
mod week;

use crate::cli::{normalize, Cli};

fn init_tracing() {
  // stdout carries the report; logs go to stderr
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  init_tracing();

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: load, allocate, render
  crate::processor::process(&cfg)
}
