use colored::Colorize;

use user_store::models::{is_unset, User};

fn timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    if is_unset(ts) {
        "-".to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

pub fn print_user(label: &str, user: &User) {
    println!("\n{}", label.cyan().bold());
    println!("  {:<11} {}", "id".dimmed(), user.id);
    println!("  {:<11} {}", "email".dimmed(), user.email);
    println!("  {:<11} {}", "username".dimmed(), user.username);
    println!("  {:<11} {}", "full name".dimmed(), or_dash(&user.full_name));
    println!("  {:<11} {}", "created".dimmed(), timestamp(&user.created_at));
    println!("  {:<11} {}", "last login".dimmed(), timestamp(&user.last_login));
    println!(
        "  {:<11} {}",
        "active".dimmed(),
        if user.is_active {
            "yes".green()
        } else {
            "no".red()
        }
    );
}

pub fn print_table(users: &[User]) {
    if users.is_empty() {
        println!("  {}", "no users".dimmed());
        return;
    }

    println!(
        "  {:<36}  {:<30}  {:<20}  {:<19}  {}",
        "ID".bold(),
        "EMAIL".bold(),
        "USERNAME".bold(),
        "CREATED".bold(),
        "ACTIVE".bold()
    );
    for user in users {
        println!(
            "  {:<36}  {:<30}  {:<20}  {:<19}  {}",
            user.id,
            user.email,
            user.username,
            timestamp(&user.created_at),
            if user.is_active { "yes" } else { "no" }
        );
    }
}
