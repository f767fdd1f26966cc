use std::error::Error;
use std::path::Path;
use std::process;

use clap::ArgMatches;

use officeforge_rs::records::{read_keyword_list, read_records, read_replacements, split_keys};
use officeforge_rs::{DocumentKind, DocumentReport, NamingStrategy, OfficeForge};

use crate::{required, BLUE, RESET};

const GREEN: &str = "\x1B[1;32m";
const RED: &str = "\x1B[1;31m";
const YELLOW: &str = "\x1B[1;33m";

type CmdResult = Result<(), Box<dyn Error>>;

fn forge(matches: &ArgMatches) -> Result<OfficeForge, Box<dyn Error>> {
    let kind = match matches.get_one::<String>("format") {
        Some(format) => DocumentKind::try_from(format.as_str())?,
        None => DocumentKind::from_path(required(matches, "input"))?,
    };
    let forge = OfficeForge::new(kind);
    Ok(if matches.get_flag("raw_keys") {
        forge.with_normalized_keys(false)
    } else if matches.get_flag("wrap_keys") {
        forge.with_normalized_keys(true)
    } else {
        forge
    })
}

fn print_report(output: &Path, report: &DocumentReport) {
    println!(
        "{GREEN}✓ Created {} ({} replacement(s)){RESET}",
        output.display(),
        report.replacements()
    );
    for diagnostic in &report.diagnostics {
        eprintln!("{YELLOW}  ! {diagnostic}{RESET}");
    }
}

pub fn single(matches: &ArgMatches) -> CmdResult {
    let forge = forge(matches)?;
    let input = Path::new(required(matches, "input"));
    let output = Path::new(required(matches, "output"));

    let report = forge.process_single(
        input,
        output,
        required(matches, "key"),
        required(matches, "value"),
    )?;
    print_report(output, &report);
    Ok(())
}

pub fn multi(matches: &ArgMatches) -> CmdResult {
    let forge = forge(matches)?;
    let input = Path::new(required(matches, "input"));
    let output = Path::new(required(matches, "output"));

    let replacements = read_replacements(Path::new(required(matches, "data")))?;
    let report = forge.process_multi(input, output, &replacements)?;
    print_report(output, &report);
    Ok(())
}

pub fn batch(matches: &ArgMatches) -> CmdResult {
    let forge = forge(matches)?.with_parallel(matches.get_flag("parallel"));
    let input = Path::new(required(matches, "input"));
    let output_dir = Path::new(required(matches, "output"));
    let pattern = matches
        .get_one::<String>("pattern")
        .map(String::as_str)
        .unwrap_or_default();

    let records = read_records(Path::new(required(matches, "data")))?;
    let strategy = NamingStrategy::parse(pattern, forge.kind())?;
    if let Some(first) = records.first() {
        strategy.validate(first)?;
    }
    eprintln!("{BLUE}Using {strategy}{RESET}");

    let summary = forge.process_records_with(input, output_dir, &records, &strategy)?;
    for failure in summary.failures() {
        if let Err(e) = &failure.result {
            eprintln!(
                "{RED}✘ Record {} ({}): {e}{RESET}",
                failure.index,
                failure.output.display()
            );
        }
    }
    println!(
        "{GREEN}✓ Generated {}/{} documents in: {}{RESET}",
        summary.succeeded(),
        summary.submitted(),
        output_dir.display()
    );

    if summary.succeeded() < summary.submitted() {
        process::exit(1);
    }
    Ok(())
}

/// Exits 1 when any keyword is missing and 2 when the check itself failed.
pub fn check(matches: &ArgMatches) -> CmdResult {
    let as_json = matches.get_flag("json");
    let input = required(matches, "input");

    let result = forge(matches).and_then(|forge| {
        let keywords = match matches.get_one::<String>("keys") {
            Some(list) => split_keys(list),
            None => read_keyword_list(Path::new(required(matches, "data")))?,
        };
        Ok(forge.check_keywords(Path::new(input), &keywords)?)
    });

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if as_json {
                println!("{}", serde_json::json!({ "error": e.to_string() }));
            } else {
                eprintln!("{RED}Error: {e}{RESET}");
            }
            process::exit(2);
        }
    };

    if as_json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("\nKeyword Check Results for: {input}");
        println!("{}", "-".repeat(40));
        for (keyword, found) in report.iter() {
            let status = if found {
                format!("{GREEN}✓ Found{RESET}")
            } else {
                format!("{RED}✘ Missing{RESET}")
            };
            println!("{keyword:<25} {status}");
        }
        println!("{}", "-".repeat(40));
        println!(
            "Summary: {}/{} keywords present",
            report.found(),
            report.len()
        );
    }

    if !report.all_found() {
        process::exit(1);
    }
    Ok(())
}
