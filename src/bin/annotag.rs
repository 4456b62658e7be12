//! Command-line interface for annotag
//! Parses annotation shorthand and resolves tags against a metadata table.
//!
//! Usage:
//!   annotag parse `<value>`...                          - Parse raw values of one tag
//!   annotag resolve `<metadata>` `<class>` `<tag>` [--property `<name>` | --all-properties]
//!                                                     - Resolve a tag on a class
//!   annotag properties `<metadata>` `<class>`           - List gettable properties
//!
//! Global options: --config `<file>`, --format json|yaml, --verbose

use annotag::config::{AnnotagConfig, Loader};
use annotag::formats::{render, OutputFormat};
use annotag::metadata::{MetadataProvider, MetadataTable, PropertyEnumerator};
use annotag::parsing::ExpressionParser;
use annotag::resolver::{AnnotationResolver, PropertySelector};
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use serde::Serialize;
use std::error::Error;

fn main() {
    let matches = Command::new("annotag")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse and resolve docblock annotation shorthand")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .global(true)
                .value_parser(OutputFormat::NAMES)
                .help("Output format (defaults to output.format from the configuration)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log parser and resolver decisions to stderr"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse the raw values of one tag as an occurrence list")
                .arg(
                    Arg::new("values")
                        .help("Raw tag values, one per occurrence")
                        .num_args(0..)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a tag on a class from a metadata table")
                .arg(
                    Arg::new("metadata")
                        .help("Metadata table (.json, .yaml or .yml)")
                        .required(true)
                        .index(1),
                )
                .arg(Arg::new("class").help("Class name").required(true).index(2))
                .arg(Arg::new("tag").help("Tag name").required(true).index(3))
                .arg(
                    Arg::new("property")
                        .long("property")
                        .short('p')
                        .help("Resolve the tag on one property"),
                )
                .arg(
                    Arg::new("all-properties")
                        .long("all-properties")
                        .short('a')
                        .action(ArgAction::SetTrue)
                        .help("Resolve the tag on every property"),
                )
                .group(
                    ArgGroup::new("selector")
                        .args(["property", "all-properties"])
                        .multiple(false),
                ),
        )
        .subcommand(
            Command::new("properties")
                .about("List the gettable properties of a class in order")
                .arg(
                    Arg::new("metadata")
                        .help("Metadata table (.json, .yaml or .yml)")
                        .required(true)
                        .index(1),
                )
                .arg(Arg::new("class").help("Class name").required(true).index(2)),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    init_logging(matches.get_flag("verbose"));

    let config = load_config(matches)?;
    let output = Output {
        format: config.output.format,
        pretty: config.output.pretty,
    };
    let parser = ExpressionParser::from_config(&config.parser);

    match matches.subcommand() {
        Some(("parse", parse_matches)) => handle_parse_command(parse_matches, &parser, output),
        Some(("resolve", resolve_matches)) => {
            handle_resolve_command(resolve_matches, parser, output)
        }
        Some(("properties", properties_matches)) => {
            handle_properties_command(properties_matches, output)
        }
        _ => unreachable!(),
    }
}

#[derive(Debug, Clone, Copy)]
struct Output {
    format: OutputFormat,
    pretty: bool,
}

impl Output {
    fn print<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), Box<dyn Error>> {
        let rendered = render(value, self.format, self.pretty)?;
        if rendered.ends_with('\n') {
            print!("{}", rendered);
        } else {
            println!("{}", rendered);
        }
        Ok(())
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // A logger may already be installed when run under a harness.
    let _ = builder.try_init();
}

fn load_config(matches: &ArgMatches) -> Result<AnnotagConfig, Box<dyn Error>> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    Ok(loader.build()?)
}

fn required<'m>(matches: &'m ArgMatches, name: &str) -> &'m str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

/// Handle the parse command
fn handle_parse_command(
    matches: &ArgMatches,
    parser: &ExpressionParser,
    output: Output,
) -> Result<(), Box<dyn Error>> {
    let values: Vec<&String> = matches
        .get_many::<String>("values")
        .map(|values| values.collect())
        .unwrap_or_default();
    let annotation = parser.parse_occurrences(&values)?;
    output.print(&annotation)
}

/// Handle the resolve command
fn handle_resolve_command(
    matches: &ArgMatches,
    parser: ExpressionParser,
    output: Output,
) -> Result<(), Box<dyn Error>> {
    let table = MetadataTable::load(required(matches, "metadata"))?;
    let class = required(matches, "class");
    let tag = required(matches, "tag");

    let selector = if matches.get_flag("all-properties") {
        PropertySelector::AllProperties
    } else if let Some(property) = matches.get_one::<String>("property") {
        PropertySelector::property(property.as_str())
    } else {
        PropertySelector::Class
    };

    let resolver = AnnotationResolver::new(&table).with_parser(parser);
    let resolution = resolver.resolve(class, tag, &selector)?;
    output.print(&resolution)
}

/// Handle the properties command
fn handle_properties_command(matches: &ArgMatches, output: Output) -> Result<(), Box<dyn Error>> {
    let table = MetadataTable::load(required(matches, "metadata"))?;
    let class = required(matches, "class");
    let order = PropertyEnumerator::enumerate(&table.describe(class))?;
    output.print(&order)
}
