#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod battery;
mod cli;
mod coordinator;
mod entity;
mod prelude;
mod quantity;
mod state;
mod tables;

use clap::{Parser, crate_version};

use crate::{cli::Args, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    args.command.run(&args.device).await?;

    info!("done!");
    Ok(())
}
