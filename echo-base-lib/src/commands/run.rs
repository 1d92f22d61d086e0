//! Command-line entry point for echo-base

use super::assemble::Assembler;
use super::common::{LogLevel, init_logging};
use super::config::Config;
use crate::documents::{EchoBase, json_doc};
use crate::fetch::SwapiClient;
use crate::records::{FieldTypes, Normalizer, Record};
use crate::{Host, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use ohno::EnrichableExt;
use serde_json::Value;
use std::io::Write;

const LOG_TARGET: &str = "       run";

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "echo-base", author, version, long_about = None)]
#[command(about = "Assemble the Echo Base record and the list of uninhabited planets")]
#[command(styles = CLAP_STYLES)]
struct Args {
    /// Path to configuration file (default is `echo_base.toml` in the input directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<Utf8PathBuf>,

    /// Base URL of the Star Wars API, overriding the configuration
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Directory holding the input documents
    #[arg(long, value_name = "PATH", default_value = ".")]
    input_dir: Utf8PathBuf,

    /// Directory where the output documents are written (default is the input directory)
    #[arg(long, value_name = "PATH")]
    output_dir: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    log_level: LogLevel,
}

/// Parse the command line and produce both output documents
///
/// Nothing is written unless both documents were assembled successfully.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if configuration is invalid, an input document cannot be read,
/// a remote lookup fails, or the outputs cannot be written
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let args = Args::parse_from(args);
    init_logging(args.log_level);

    match assemble_outputs(host, &args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Echo Base assembly failed, no output files were changed");
            Err(e)
        }
    }
}

async fn assemble_outputs<H: Host>(host: &mut H, args: &Args) -> Result<()> {
    let mut config = Config::load(&args.input_dir, args.config.as_ref())?;
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.as_str())?;
    }

    let output_dir = args.output_dir.as_ref().unwrap_or(&args.input_dir);
    let planets_input = args.input_dir.join(&config.planets_input);
    let echo_base_input = args.input_dir.join(&config.echo_base_input);
    let planets_output = output_dir.join(&config.planets_output);
    let echo_base_output = output_dir.join(&config.echo_base_output);

    log::info!(target: LOG_TARGET, "Using endpoint {}", config.endpoint);

    let client = SwapiClient::new(&config.endpoint, config.request_timeout)?;
    let normalizer = Normalizer::new(FieldTypes::default(), client).with_max_depth(config.max_reference_depth);
    let assembler = Assembler::new(normalizer);

    let planets: Vec<Record> = json_doc::load(&planets_input)?;
    let uninhabited = assembler
        .uninhabited_planets(planets)
        .await
        .map_err(|e| e.enrich_with(|| format!("selecting uninhabited planets from '{planets_input}'")))?;

    let mut echo_base = EchoBase::from_value(json_doc::load(&echo_base_input)?)?;
    assembler
        .echo_base(&mut echo_base)
        .await
        .map_err(|e| e.enrich_with(|| format!("assembling the Echo Base document from '{echo_base_input}'")))?;

    let planet_count = uninhabited.len();
    let uninhabited = Value::Array(uninhabited.into_iter().map(Record::into_value).collect());
    json_doc::save_all(&[
        (planets_output.as_path(), &uninhabited),
        (echo_base_output.as_path(), echo_base.as_value()),
    ])?;

    let _ = writeln!(host.output(), "Wrote {planet_count} uninhabited planets to {planets_output}");
    let _ = writeln!(host.output(), "Wrote the Echo Base document to {echo_base_output}");

    Ok(())
}
