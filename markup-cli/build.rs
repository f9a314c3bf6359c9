use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of AVAILABLE_TRANSFORMS in src/transforms.rs; build scripts can't reach src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &[
    "tokens-json",
    "tokens-simple",
    "markup-json",
    "markup-treeviz",
    "roundtrip",
];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("markup")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between Markdown and the Markup document tree")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a markup.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(
            Command::new("inspect")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_TRANSFORMS,
                        ))
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("convert")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("from").long("from"))
                .arg(Arg::new("to").long("to").required(true))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("compare")
                .arg(
                    Arg::new("left")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("right").index(2).value_hint(ValueHint::FilePath)),
        );

    generate_to(Bash, &mut cmd, "markup", &outdir)?;
    generate_to(Zsh, &mut cmd, "markup", &outdir)?;
    generate_to(Fish, &mut cmd, "markup", &outdir)?;

    println!("cargo:rerun-if-changed=build.rs");

    Ok(())
}
