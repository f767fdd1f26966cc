mod commands;

use clap::{Arg, ArgAction, ArgMatches, Command};

const BLUE: &str = "\x1B[1;34m";
const RESET: &str = "\x1B[0m";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    let default_filter = if matches.get_flag("verbose") {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match matches.subcommand() {
        Some(("single", sub)) => commands::single(sub),
        Some(("multi", sub)) => commands::multi(sub),
        Some(("batch", sub)) => commands::batch(sub),
        Some(("check", sub)) => commands::check(sub),
        Some(("version", _)) => {
            println!("OfficeForge v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn cli() -> Command {
    Command::new("officeforge")
        .about(format!(
            "{BLUE}OfficeForge: generate Word, PowerPoint and Excel documents from templates{RESET}"
        ))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log progress (RUST_LOG overrides)"),
        )
        .subcommand(
            Command::new("single")
                .about("Replace a single keyword in a template")
                .arg(input_arg("template"))
                .arg(output_arg("file"))
                .arg(
                    Arg::new("key")
                        .short('k')
                        .long("key")
                        .value_name("keyword")
                        .required(true)
                        .help("Keyword to replace, e.g. CLIENT_NAME or {{CLIENT_NAME}}"),
                )
                .arg(
                    Arg::new("value")
                        .long("value")
                        .value_name("text")
                        .required(true)
                        .help("Replacement text"),
                )
                .args(document_args()),
        )
        .subcommand(
            Command::new("multi")
                .about("Replace multiple keywords from a JSON object")
                .arg(input_arg("template"))
                .arg(output_arg("file"))
                .arg(data_arg("JSON object of keyword → value").required(true))
                .args(document_args()),
        )
        .subcommand(
            Command::new("batch")
                .about("Generate one document per record of a CSV or JSON file")
                .arg(input_arg("template"))
                .arg(output_arg("directory"))
                .arg(data_arg("Records as .csv (header row) or .json (array of objects)").required(true))
                .arg(
                    Arg::new("pattern")
                        .short('p')
                        .long("pattern")
                        .value_name("pattern")
                        .help("Output file name pattern"),
                )
                .arg(
                    Arg::new("parallel")
                        .long("parallel")
                        .action(ArgAction::SetTrue)
                        .help("Generate documents concurrently"),
                )
                .args(document_args())
                .after_help(
                    "Pattern examples:
  --pattern \"contract_%d.docx\"        Sequential: contract_1.docx, contract_2.docx
  --pattern \"{NAME}_contract.docx\"    From data: Alice_contract.docx, Bob_contract.docx
  --pattern \"{ID}_{COMPANY}.docx\"     Multiple fields: 001_Acme.docx, 002_TechCorp.docx
  --pattern \"{NAME}_{INDEX}.docx\"     Combine data and index: Alice_1.docx, Bob_2.docx",
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Check whether keywords exist in a document")
                .arg(input_arg("file"))
                .arg(
                    Arg::new("keys")
                        .short('k')
                        .long("keys")
                        .value_name("K1,K2")
                        .conflicts_with("data")
                        .required_unless_present("data")
                        .help("Comma-separated keywords"),
                )
                .arg(data_arg("Keywords from .json (array or object keys) or .csv (header row)"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print results as a JSON object"),
                )
                .args(document_args()),
        )
        .subcommand(Command::new("version").about("Show version"))
}

fn input_arg(what: &'static str) -> Arg {
    Arg::new("input")
        .short('i')
        .long("input")
        .value_name(what)
        .required(true)
        .help(format!("Input {what}"))
}

fn output_arg(what: &'static str) -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name(what)
        .required(true)
        .help(format!("Output {what}"))
}

fn data_arg(help: &'static str) -> Arg {
    Arg::new("data")
        .short('d')
        .long("data")
        .value_name("file")
        .help(help)
}

fn document_args() -> [Arg; 3] {
    [
        Arg::new("format")
            .short('f')
            .long("format")
            .value_parser(["docx", "pptx", "xlsx"])
            .help("Document format (default: from the input extension)"),
        Arg::new("raw_keys")
            .long("raw-keys")
            .action(ArgAction::SetTrue)
            .help("Match keys exactly instead of wrapping them in {{ }}"),
        Arg::new("wrap_keys")
            .long("wrap-keys")
            .action(ArgAction::SetTrue)
            .conflicts_with("raw_keys")
            .help("Wrap keys in {{ }} (default for xlsx only)"),
    ]
}

pub(crate) fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn check_requires_keys_or_data() {
        let err = cli()
            .try_get_matches_from(["officeforge", "check", "--input", "a.docx"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let ok = cli().try_get_matches_from([
            "officeforge",
            "check",
            "-i",
            "a.docx",
            "--keys",
            "A,B",
            "--json",
        ]);
        assert!(ok.is_ok());
    }

    #[test]
    fn key_wrapping_flags_conflict() {
        let err = cli()
            .try_get_matches_from([
                "officeforge", "single", "-i", "a.docx", "-o", "b.docx", "--key", "K",
                "--value", "V", "--raw-keys", "--wrap-keys",
            ])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
