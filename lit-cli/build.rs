use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of src/transforms.rs; build scripts can't reach src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &["tree", "tree-json", "tokens-json"];

const FORMATS: &[&str] = &["lit", "tex", "html", "csv", "debug"];

fn input_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let formats = clap::builder::PossibleValuesParser::new(FORMATS);

    let mut cmd = Command::new("lit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting and inspecting lit files")
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a lit.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("convert")
                .arg(input_arg("input"))
                .arg(Arg::new("from").long("from").value_parser(formats.clone()))
                .arg(Arg::new("to").long("to").required(true).value_parser(formats))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(Command::new("format").arg(input_arg("input")))
        .subcommand(
            Command::new("inspect").arg(input_arg("path")).arg(
                Arg::new("transform")
                    .index(2)
                    .value_parser(clap::builder::PossibleValuesParser::new(
                        AVAILABLE_TRANSFORMS,
                    )),
            ),
        );

    generate_to(Bash, &mut cmd, "lit", &outdir)?;
    generate_to(Zsh, &mut cmd, "lit", &outdir)?;
    generate_to(Fish, &mut cmd, "lit", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
