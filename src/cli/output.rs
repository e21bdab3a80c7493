//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::{GuardDecision, SessionState, UserRole};
use crate::validation::ValidationResult;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Format a role as a colored string
pub fn format_role(role: UserRole) -> String {
    match role {
        UserRole::Company => role.as_str().cyan().to_string(),
        UserRole::Candidate => role.as_str().green().to_string(),
        UserRole::Admin => role.as_str().red().to_string(),
        UserRole::Association => role.as_str().magenta().to_string(),
    }
}

/// Format a guard decision as a colored string
pub fn format_decision(decision: &GuardDecision) -> String {
    match decision {
        GuardDecision::Render => "render".green().to_string(),
        GuardDecision::Loading => "loading".yellow().to_string(),
        GuardDecision::Redirect(view) => format!("{} {}", "redirect".red(), view.path()),
    }
}

/// Print the signed-in user and company
pub fn print_session_detail(state: &SessionState) {
    let Some(user) = &state.user else {
        info("Not logged in. Run 'handijobs login --email <email>'");
        return;
    };

    println!("{}", "Session".bold().underline());
    println!();
    println!("  {} {}", "Name:".bold(), user.full_name());
    println!("  {} {}", "Email:".bold(), user.email);
    println!("  {} {}", "Role:".bold(), format_role(user.role));
    println!("  {} {}", "Home:".bold(), user.role.landing_view().path().cyan());

    if let Some(last_login) = user.last_login_at {
        println!(
            "  {} {}",
            "Last login:".bold(),
            last_login.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    if let Some(company) = &state.company {
        println!();
        println!("  {}", "Company:".bold());
        println!("    {} {}", "Name:".bold(), company.name);
        println!("    {} {}", "Size:".bold(), company.size.as_str());
        let rate = format!("{:.1}%", company.oeth_rate);
        let rate = if company.oeth_compliant {
            rate.green()
        } else {
            rate.red()
        };
        println!("    {} {}", "OETH rate:".bold(), rate);
    }
}

/// Print field errors as a table
pub fn print_validation_errors(result: &ValidationResult) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Field").fg(Color::Cyan),
            Cell::new("Message").fg(Color::Cyan),
        ]);

    for error in &result.errors {
        table.add_row(vec![
            Cell::new(&error.field).fg(Color::Red),
            Cell::new(&error.message),
        ]);
    }

    println!("{table}");
}
