//! Version command implementation.

use console::style;
use dirac_core::Style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - Dirac bra-ket notation calculator",
        style("dirac").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  dirac-expr  Complex scalar and matrix expression evaluator");
    println!("  dirac-core  Shapes, algebra, notation parsing and formatting");
    println!("  dirac-cli   Command-line interface");
    println!();
    let styles: Vec<String> = Style::ALL.iter().map(ToString::to_string).collect();
    println!("Styles:     {}", styles.join(", "));
    println!(
        "Repository: {}",
        style(env!("CARGO_PKG_REPOSITORY")).underlined()
    );
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
