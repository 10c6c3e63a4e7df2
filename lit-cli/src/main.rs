// Command-line interface for lit
//
// The lit program converts documents between lit and the formats lit-babel knows about,
// normalizes lit text, and shows the parsed tree for debugging.
//
// Usage:
//  lit <input> --to <format> [--from <format>] [-o <file>]          - Convert (default)
//  lit convert <input> --to <format> [--from <format>] [-o <file>]  - Same as above (explicit)
//  lit format <input>                                                - Re-emit lit text
//  lit inspect <input> [<transform>]                                 - Show the tree (defaults to "tree")
//  lit --list-transforms                                             - List transforms and formats
//
// The source format is detected from the file extension unless --from is given.
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// Known keys update the loaded configuration; the rest go to the target format.
// Example:
//  lit notes.lit --to html --extra-standalone --extra-title "My notes"

mod transforms;

use clap::{Arg, ArgAction, Command, ValueHint};
use lit_babel::formats::lit::formatting_rules::FormattingRules;
use lit_babel::{Format, FormatRegistry, HtmlFormat, LitFormat};
use lit_config::{LitConfig, Loader};
use log::{debug, LevelFilter};
use std::collections::HashMap;
use std::fs;

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
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));
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

fn input_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("lit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting and inspecting lit files")
        .long_about(
            "lit is a command-line tool for working with lit markup.\n\n\
            Commands:\n  \
            - convert: Transform between document formats (lit, tex, html, csv, debug)\n  \
            - format:  Re-emit a lit file with the configured indentation\n  \
            - inspect: View the parsed tree or token stream\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            lit notes.lit --to tex                      # Convert to TeX (stdout)\n  \
            lit paper.tex --to lit -o paper.lit         # Import TeX\n  \
            lit notes.lit --to html --extra-standalone  # Complete HTML page\n  \
            lit inspect notes.lit tree-json             # Tree as JSON",
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
                .help("Path to a lit.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect the parsed tree of a document")
                .long_about(
                    "View the structure a document parses into.\n\n\
                    Transforms:\n  \
                    - tree:        indented node tree (default)\n  \
                    - tree-json:   tree as nested JSON\n  \
                    - tokens-json: token stream as JSON\n\n\
                    The input format is detected from the file extension.",
                )
                .arg(input_arg("path", "Path to the document"))
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'tree'")
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
                .arg(input_arg("input", "Input file path"))
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
            Command::new("format")
                .about("Format a lit file")
                .long_about(
                    "Parse a lit file and write it back with the configured\n\
                    indentation and line width. Output is always written to stdout.",
                )
                .arg(input_arg("input", "Input file path")),
        )
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare file as first argument means the default "convert" subcommand
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !matches!(
                    cleaned_args[1].as_str(),
                    "inspect" | "convert" | "format" | "help"
                )
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

    init_logging(matches.get_flag("verbose"));

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let path = required(sub_matches, "path");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or("tree");
            handle_inspect_command(path, transform, &config);
        }
        Some(("convert", sub_matches)) => {
            let input = required(sub_matches, "input");
            let to = required(sub_matches, "to");
            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => detect_format(input),
            };
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, &extra_params, &config);
        }
        Some(("format", sub_matches)) => {
            let input = required(sub_matches, "input");
            handle_convert_command(input, "lit", "lit", None, &extra_params, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a clap::ArgMatches, name: &str) -> &'a str {
    match matches.get_one::<String>(name) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Error: missing argument '{name}'");
            std::process::exit(1);
        }
    }
}

fn detect_format(input: &str) -> String {
    let registry = FormatRegistry::default();
    match registry.detect_format_from_filename(input) {
        Some(detected) => detected,
        None => {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Please specify --from explicitly");
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
fn handle_inspect_command(path: &str, transform: &str, config: &LitConfig) {
    let source = read_source(path);
    let format = FormatRegistry::default()
        .detect_format_from_filename(path)
        .unwrap_or_else(|| "lit".to_string());
    debug!("inspecting {path} as {format} with {transform}");

    let output = transforms::execute_transform(&source, &format, transform, &config.inspect.indent)
        .unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &LitConfig,
) {
    let registry = FormatRegistry::default();

    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = read_source(input);
    debug!("converting {input} from {from} to {to}");

    let doc = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    // Configured variants of the writers take precedence over the registry defaults
    let result = match to {
        "lit" => {
            let rules = FormattingRules::from(&config.formatting.rules);
            LitFormat::new(rules).serialize_with_options(&doc, extra_params)
        }
        "html" => {
            let options = config.convert.html.to_options().unwrap_or_else(|e| {
                eprintln!("Error reading custom CSS: {e}");
                std::process::exit(1);
            });
            HtmlFormat::new(options).serialize_with_options(&doc, extra_params)
        }
        _ => registry.serialize_with_options(&doc, to, extra_params),
    };
    let text = result.unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });

    match output {
        Some(path) => {
            fs::write(path, ensure_trailing_newline(text)).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{}", ensure_trailing_newline(text)),
    }
}

fn ensure_trailing_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    println!("  tree         - Indented node tree");
    println!("  tree-json    - Tree as nested JSON");
    println!("  tokens-json  - Token stream as JSON");

    println!("\nConversion formats:");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        println!("  {format_name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> LitConfig {
    let loader = Loader::new().with_optional_file("lit.toml");
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

fn apply_config_overrides(config: &mut LitConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["indent", "indent-string"]) {
        config.formatting.rules.indent_string = raw;
    }
    if let Some(raw) = extra_params.remove("prefix") {
        config.formatting.rules.prefix = raw;
    }

    if let Some(raw) = extra_params.remove("standalone") {
        config.convert.html.standalone = parse_bool_arg("standalone", &raw);
    }
    if let Some(raw) = extra_params.remove("title") {
        config.convert.html.title = Some(raw);
    }
    if let Some(path) = take_override(extra_params, &["css", "css-path"]) {
        config.convert.html.custom_css = Some(path.into());
    }

    if let Some(raw) = extra_params.remove("inspect-indent") {
        config.inspect.indent = raw;
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
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
