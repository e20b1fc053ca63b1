//! Recast CLI
//!
//! List and apply refactorings at a byte span of a source file.

use recast::commands::{self, CliError};
use recast_refactor::RefactoringKind;

fn main() {
    recast::init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let result = match command.as_str() {
        "list" => {
            if args.len() < 4 {
                eprintln!("Usage: recast list <file> <start>..<end>");
                std::process::exit(1);
            }
            run_list(&args[2], &args[3])
        }
        "apply" => {
            if args.len() < 5 {
                eprintln!("Usage: recast apply <file> <start>..<end> <kind>");
                eprintln!();
                eprintln!("Run `recast kinds` to see available refactorings.");
                std::process::exit(1);
            }
            run_apply(&args[2], &args[3], &args[4])
        }
        "print" => {
            if args.len() < 3 {
                eprintln!("Usage: recast print <file>");
                std::process::exit(1);
            }
            commands::read_source(&args[2])
                .and_then(|source| commands::print(&source))
                .map(|printed| print!("{printed}"))
        }
        "kinds" => {
            for kind in RefactoringKind::ALL {
                println!("{kind}");
            }
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "version" | "--version" | "-v" => {
            println!("recast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run_list(path: &str, span: &str) -> Result<(), CliError> {
    let span = commands::parse_span(span)?;
    let source = commands::read_source(path)?;
    let offers = commands::list(&source, span)?;
    if offers.is_empty() {
        println!("no refactorings available at {span}");
    }
    for offer in offers {
        println!("{:<16} {}", offer.kind.name(), offer.title);
    }
    Ok(())
}

fn run_apply(path: &str, span: &str, kind: &str) -> Result<(), CliError> {
    let span = commands::parse_span(span)?;
    let kind = commands::parse_kind(kind)?;
    let source = commands::read_source(path)?;
    print!("{}", commands::apply(&source, span, kind)?);
    Ok(())
}

fn print_usage() {
    println!("Recast - symbol-aware refactorings");
    println!();
    println!("Usage: recast <command> [options]");
    println!();
    println!("Commands:");
    println!("  list <file> <start>..<end>         List refactorings available at a span");
    println!("  apply <file> <start>..<end> <kind> Print the file rewritten by a refactoring");
    println!("  print <file>                       Parse and print a file");
    println!("  kinds                              List refactoring kinds");
    println!("  help                               Show this help message");
    println!("  version                            Show version information");
    println!();
    println!("Spans are byte offsets; the smallest node covering the span is used.");
    println!("Set RUST_LOG=recast_refactor=trace to see why a refactoring was declined.");
    println!();
    println!("Examples:");
    println!("  recast list Program.cs 120..125");
    println!("  recast apply Program.cs 120..125 merge-where");
    println!("  recast print Program.cs");
}
