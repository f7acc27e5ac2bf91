//! cfdi2oc – command-line CFDI → purchase-order converter.
//!
//! Usage:
//!   cfdi2oc <factura.xml> [salida.pdf] [--logo logo.jpg] [--firma firma.png]
//!           [--batch edits.json] [--no-prompt]
//!
//! If `salida.pdf` is omitted the PDF is written next to the input file with
//! the same stem (e.g. `factura.xml` → `factura.pdf`).

use std::{env, path::PathBuf, process};

use cfdi2oc::edit::{BatchEdits, ConsoleEdits, EditProvider, NoEdits};
use cfdi2oc::pipeline::{generate_order_to_file, OrderConfig};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut logo: Option<PathBuf> = None;
    let mut signature: Option<PathBuf> = None;
    let mut font: Option<PathBuf> = None;
    let mut batch: Option<PathBuf> = None;
    let mut no_prompt = false;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--logo" => logo = iter.next().map(PathBuf::from),
            "--firma" | "--signature" => signature = iter.next().map(PathBuf::from),
            "--font" => font = iter.next().map(PathBuf::from),
            "--batch" | "-b" => batch = iter.next().map(PathBuf::from),
            "--no-prompt" | "-n" => no_prompt = true,
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 {
                    input_path = Some(PathBuf::from(path));
                } else if positional == 1 {
                    output_path = Some(PathBuf::from(path));
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    let input = match input_path {
        Some(p) => p,
        None => {
            eprintln!("Error: no input file specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    // Default output: same directory + same stem as input, but with .pdf
    let output = output_path.unwrap_or_else(|| {
        let mut o = input.clone();
        o.set_extension("pdf");
        o
    });

    let config = OrderConfig {
        logo,
        signature,
        measurement_font: font,
        ..OrderConfig::default()
    };

    let mut batch_edits;
    let mut console_edits;
    let mut no_edits;
    let edits: &mut dyn EditProvider = if let Some(path) = batch {
        batch_edits = match BatchEdits::from_path(&path) {
            Ok(e) => e,
            Err(e) => {
                eprintln!("Error loading edits file: {e}");
                process::exit(1);
            }
        };
        &mut batch_edits
    } else if no_prompt {
        no_edits = NoEdits;
        &mut no_edits
    } else {
        console_edits = ConsoleEdits::stdin();
        &mut console_edits
    };

    match generate_order_to_file(&input, &output, &config, edits) {
        Ok(report) => {
            for warning in &report.warnings {
                eprintln!("Advertencia: {warning}");
            }
            eprintln!(
                "PDF generado en: {} ({} página{})",
                output.display(),
                report.pages,
                if report.pages == 1 { "" } else { "s" }
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("cfdi2oc – CFDI invoice to purchase-order PDF");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <factura.xml> [salida.pdf] [flags]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <factura.xml>  CFDI invoice to convert");
    eprintln!("  [salida.pdf]   Output path (default: same stem as input with .pdf)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --logo <img>       Logo image (placeholder box when omitted)");
    eprintln!("  --firma <img>      Signature image (placeholder box when omitted)");
    eprintln!("  --font <ttf>       TTF used for text-width estimation only");
    eprintln!("  --batch <json>     Take order fields and overrides from a JSON file");
    eprintln!("  --no-prompt        Skip interactive prompts, keep extracted values");
    eprintln!("  --help             Print this message");
}
