// Command-line interface for markup
//
// This binary converts documents between Markdown and the Markup tree, and exposes the
// converter's intermediate stages for inspection.
//
// Usage:
//  markup <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  markup convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  markup inspect <path> [<transform>]      - Execute a transform (defaults to "markup-treeviz")
//  markup compare <left> [<right>]          - Compare two Markdown files, or one with its round trip
//  markup --list-transforms                 - List available transforms
//
// Extra Parameters:
//
// Options can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and applies them over the loaded configuration.
// Example:
//  markup inspect notes.md --extra-show-attrs --extra-ref-url app://

mod transforms;

use clap::{Arg, ArgAction, Command, ValueHint};
use markup_babel::{is_equivalent, similarity, ConvertOptions, FormatRegistry};
use markup_config::{Loader, MarkupConfig};
use std::collections::HashMap;
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            let has_value = args
                .get(i + 1)
                .map(|next| !next.starts_with('-'))
                .unwrap_or(false);

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("markup")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between Markdown and the Markup document tree")
        .long_about(
            "markup converts Markdown into a Markup (ProseMirror-style) document tree and back.\n\n\
            Commands:\n  \
            - convert: Transform between document formats (markdown, html, json, treeviz)\n  \
            - inspect: View internal representations (tokens, tree, round trip)\n  \
            - compare: Check two Markdown documents for equivalence\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            markup inspect notes.md                 # View tree visualization\n  \
            markup notes.md --to json               # Convert to JSON (outputs to stdout)\n  \
            markup doc.json --to markdown -o out.md # Convert a stored tree back to Markdown\n  \
            markup compare notes.md                 # Check that notes.md survives a round trip",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a markup.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect internal representations of Markdown files")
                .long_about(
                    "View a Markdown file at different processing stages.\n\n\
                    Transforms (stage-format):\n  \
                    - tokens-json:     Token stream as JSON\n  \
                    - tokens-simple:   Token names, one per line\n  \
                    - markup-json:     Markup tree as JSON\n  \
                    - markup-treeviz:  Markup tree visualization (default)\n  \
                    - roundtrip:       Markdown serialized back from the tree\n\n\
                    Extra Parameters:\n  \
                    --extra-show-attrs    Show node attributes in the tree\n  \
                    --extra-show-marks    Show text marks in the tree",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the Markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format). Defaults to 'markup-treeviz'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - markdown: Markdown (.md)\n  \
                    - html:     HTML fragment (.html)\n  \
                    - json:     Markup tree as JSON (.json)\n  \
                    - treeviz:  Tree visualization (output only)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Compare Markdown documents for equivalence")
                .long_about(
                    "Compare two Markdown files, ignoring line endings, trailing whitespace\n\
                    and blank lines, and print their bigram similarity.\n\n\
                    With a single file, the file is compared with its own round trip\n\
                    through the Markup tree.\n\n\
                    Exits with status 0 when the documents are equivalent and 1 otherwise.",
                )
                .arg(
                    Arg::new("left")
                        .help("First Markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("right")
                        .help("Second Markdown file (defaults to the round trip of the first)")
                        .required(false)
                        .index(2)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare file argument means "convert"
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !["inspect", "convert", "compare", "help"].contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    init_logging(&config);

    let options = config.convert_options().unwrap_or_else(|err| {
        eprintln!("Invalid configuration: {err}");
        std::process::exit(1);
    });

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let path = required_arg(sub_matches, "path");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or("markup-treeviz");
            handle_inspect_command(path, transform, &options, &config);
        }
        Some(("convert", sub_matches)) => {
            let input = required_arg(sub_matches, "input");
            let to = required_arg(sub_matches, "to");
            let registry = FormatRegistry::with_options(&options);

            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => match registry.detect_format_from_filename(input) {
                    Some(detected) => detected,
                    None => {
                        eprintln!("Error: Could not detect format from filename '{input}'");
                        eprintln!("Please specify --from explicitly");
                        std::process::exit(1);
                    }
                },
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(&registry, input, &from, to, output);
        }
        Some(("compare", sub_matches)) => {
            let left = required_arg(sub_matches, "left");
            let right = sub_matches.get_one::<String>("right").map(|s| s.as_str());
            handle_compare_command(left, right, &options);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required_arg<'a>(matches: &'a clap::ArgMatches, name: &str) -> &'a str {
    match matches.get_one::<String>(name) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Missing required argument <{name}>");
            std::process::exit(1);
        }
    }
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    options: &ConvertOptions,
    config: &MarkupConfig,
) {
    let source = read_source(path);
    let params = build_inspect_params(config);
    let output = transforms::execute_transform(&source, transform, options, &params)
        .unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });
    print!("{output}");
}

/// Handle the convert command
fn handle_convert_command(
    registry: &FormatRegistry,
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
) {
    for name in [from, to] {
        if let Err(e) = registry.get(name) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let source = read_source(input);
    debug!(input, from, to, "converting");

    let doc = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });
    let result = registry.serialize(&doc, to).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });

    match output {
        Some(path) => fs::write(path, result).unwrap_or_else(|e| {
            eprintln!("Error writing file '{path}': {e}");
            std::process::exit(1);
        }),
        None => print!("{result}"),
    }
}

/// Handle the compare command
fn handle_compare_command(left: &str, right: Option<&str>, options: &ConvertOptions) {
    let left_source = read_source(left);
    let right_source = match right {
        Some(path) => read_source(path),
        None => {
            let roundtrip = markup_babel::markdown_to_markup(&left_source, options)
                .and_then(|doc| markup_babel::markup_to_markdown(&doc, options));
            roundtrip.unwrap_or_else(|e| {
                eprintln!("Round trip failed: {e}");
                std::process::exit(1);
            })
        }
    };

    let equivalent = is_equivalent(&left_source, &right_source);
    println!("{}", if equivalent { "equivalent" } else { "different" });
    println!(
        "similarity: {:.3}",
        similarity(&left_source, &right_source)
    );

    if !equivalent {
        std::process::exit(1);
    }
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    println!("Stages:");
    println!("  tokens  - Markdown token stream (after todo list post-processing)");
    println!("  markup  - Markup document tree");
    println!("  roundtrip - Markdown serialized back from the tree\n");
    println!("Available transform combinations:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }
    println!("\nConversion formats:");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        println!("  {format_name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> MarkupConfig {
    let loader = Loader::new().with_optional_file("markup.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };
    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Log to stderr. `RUST_LOG` wins over the configured level.
fn init_logging(config: &MarkupConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_config_overrides(config: &mut MarkupConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(url) = extra_params.remove("ref-url") {
        config.urls.reference = url;
    }
    if let Some(url) = extra_params.remove("image-url") {
        config.urls.image = url;
    }
    if let Some(raw) = extra_params.remove("loose-lists") {
        config.serializer.tight_lists = !parse_bool_arg("loose-lists", &raw);
    }
    if let Some(bullet) = extra_params.remove("bullet") {
        config.serializer.bullet = bullet;
    }
    if let Some(raw) = extra_params.remove("show-attrs") {
        config.inspect.treeviz.show_attrs = parse_bool_arg("show-attrs", &raw);
    }
    if let Some(raw) = extra_params.remove("show-marks") {
        config.inspect.treeviz.show_marks = parse_bool_arg("show-marks", &raw);
    }
    if let Some(level) = extra_params.remove("log-level") {
        config.logging.level = level;
    }
    for key in extra_params.keys() {
        eprintln!("Ignoring unknown parameter --extra-{key}");
    }
}

fn build_inspect_params(config: &MarkupConfig) -> HashMap<String, String> {
    let mut params = HashMap::new();
    params.insert(
        "attrs".to_string(),
        config.inspect.treeviz.show_attrs.to_string(),
    );
    params.insert(
        "marks".to_string(),
        config.inspect.treeviz.show_marks.to_string(),
    );
    params
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
