use std::{env, path::PathBuf, process};

use colored::Colorize;

use wizard_loop::{
    config::load_wizard_config,
    init,
    session::read_items,
    summary::{
        add_loop_sections, display_text, summary_for, SectionRow, SectionSource, StandardSummary,
    },
    Catalog, MemorySession, WizardError,
};

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let command = args.next().unwrap_or_else(|| {
        print_usage();
        process::exit(1);
    });

    match command.as_str() {
        "summary" => {
            let wizard_path = next_path(&mut args)?;
            let session_path = next_path(&mut args)?;
            let translator = load_catalog(args.next())?;

            let wizard = load_wizard_config(&wizard_path)?;
            let session = MemorySession::load_from_path(&session_path)?;
            let base = StandardSummary.parse_sections(&wizard, &session, &translator);
            let sections = add_loop_sections(&wizard, base, &session, &translator);

            if sections.is_empty() {
                println!("{}", "Nothing to summarise.".dimmed());
            }
            for section in sections {
                println!("{}", format!("=== {} ===", section.section).bold());
                for row in &section.fields {
                    match row {
                        SectionRow::Field(field) => println!(
                            "  {}: {}  {}",
                            field.label.cyan(),
                            display_text(&field.value),
                            format!("({})", field.step).dimmed()
                        ),
                        SectionRow::Spacer(_) => println!(),
                    }
                }
            }
        }
        "items" => {
            let wizard_path = next_path(&mut args)?;
            let step = args.next().ok_or_else(|| missing("step"))?;
            let session_path = next_path(&mut args)?;
            let translator = load_catalog(args.next())?;

            let wizard = load_wizard_config(&wizard_path)?;
            let loop_config = wizard.loop_for(&step).ok_or_else(|| {
                WizardError::InvalidInput(format!("`{step}` is not a loop step"))
            })?;
            let session = MemorySession::load_from_path(&session_path)?;
            let items = read_items(&session, loop_config.store_key());
            let page_path = format!(
                "{}-{}",
                loop_config.section_key(),
                loop_config.final_step().unwrap_or_default()
            );
            let page = summary_for(&translator, &page_path, &items, &loop_config, &wizard.fields);
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }

    Ok(())
}

fn next_path(args: &mut impl Iterator<Item = String>) -> Result<PathBuf, WizardError> {
    args.next().map(PathBuf::from).ok_or_else(|| missing("path"))
}

fn missing(what: &str) -> WizardError {
    WizardError::InvalidInput(format!("missing {what} argument"))
}

/// Locale catalog, or an empty one that leaves every key untranslated.
fn load_catalog(path: Option<String>) -> Result<Catalog, WizardError> {
    match path {
        Some(path) => Catalog::load_from_path(&PathBuf::from(path)),
        None => Ok(Catalog::new()),
    }
}

fn print_usage() {
    eprintln!(
        "Usage: wizard_loop_cli <command>\n\
         Commands:\n  \
         summary <wizard.json> <session.json> [locale.json]\n  \
         items <wizard.json> <step> <session.json> [locale.json]"
    );
}
