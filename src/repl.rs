use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, WrapErr};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::inspect::Session;

fn get_history_path() -> Option<PathBuf> {
    let home_env = std::env::var("HOME").ok()?;
    let path = format!("{home_env}/.boxword.history");
    Some(PathBuf::from(path))
}

fn save_history(rl: &mut DefaultEditor, path: &Path) -> miette::Result<()> {
    rl.append_history(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("could not save history to {}", path.display()))
}

/// Reads one value per line and prints its report. Errors are printed and
/// the session goes on.
pub fn run(session: &mut Session) -> miette::Result<()> {
    let mut rl = DefaultEditor::new().into_diagnostic()?;
    let path = get_history_path();

    if let Some(path) = path.as_ref() {
        if rl.load_history(path).is_err() {
            println!("No previous history.");
        }
    }

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                rl.add_history_entry(line.as_str()).into_diagnostic()?;

                match session.inspect(&line) {
                    Ok(report) => println!("{report}"),
                    Err(err) => println!("{:?}", miette::Report::new(err)),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                println!("Error: {err:?}");
                break;
            }
        }
    }

    if let Some(path) = path {
        if let Err(err) = save_history(&mut rl, &path) {
            println!("{err:?}");
        }
    }

    Ok(())
}
