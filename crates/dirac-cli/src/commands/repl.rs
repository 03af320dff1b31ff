//! Interactive evaluation, one expression per line.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use console::style;
use dirac_core::{Style, evaluate_notation_with};
use tracing::debug;

use super::Settings;

const HELP: &str = "\
Enter an expression such as `(|0> + i|1>)/sqrt(2)` or `<0|1>`.
Commands:
  :normalize on|off   toggle normalization of bras, kets and scalars
  :style NAME         switch output style (ascii, unicode, tex, html)
  :help               show this message
  :quit               leave";

/// Execute the repl command on stdin and stdout.
pub fn execute(settings: Settings) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(stdin.lock(), stdout.lock(), settings, true)
}

/// Read lines from `input` until end of input or `:quit`, writing one
/// result or error per line to `output`.
pub fn run<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    mut settings: Settings,
    prompt: bool,
) -> Result<()> {
    if prompt {
        write!(output, "{} ", style("dirac>").cyan().bold())?;
        output.flush()?;
    }

    for line in input.lines() {
        let line = line?;
        let line = line.trim();

        match line {
            "" => {}
            ":quit" | ":q" | ":exit" => break,
            ":help" => writeln!(output, "{HELP}")?,
            _ if line.starts_with(':') => {
                if let Err(e) = apply_command(line, &mut settings) {
                    writeln!(output, "{} {}", style("Error:").red().bold(), e)?;
                }
            }
            expression => match evaluate_notation_with(expression, settings.normalize, &settings.spec)
            {
                Ok(text) => writeln!(output, "{text}")?,
                Err(e) => writeln!(output, "{} {}", style("Error:").red().bold(), e)?,
            },
        }

        if prompt {
            write!(output, "{} ", style("dirac>").cyan().bold())?;
            output.flush()?;
        }
    }

    Ok(())
}

fn apply_command(line: &str, settings: &mut Settings) -> Result<()> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    let arg = words.next();

    match (command, arg) {
        (":normalize", Some("on")) => settings.normalize = true,
        (":normalize", Some("off")) => settings.normalize = false,
        (":normalize", None) => settings.normalize = !settings.normalize,
        (":style", Some(name)) => {
            let decimals = settings.spec.decimals;
            let min_qubits = settings.spec.min_qubits;
            settings.spec = name.parse::<Style>()?.spec().with_decimals(decimals);
            settings.spec.min_qubits = min_qubits;
        }
        _ => anyhow::bail!("Unknown command: '{line}' (try :help)"),
    }

    debug!("Settings now {:?}", settings);
    Ok(())
}
