use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use uuid::Uuid;

use user_store::prelude::*;

use crate::{fake, output};

#[derive(Args)]
pub struct SearchArgs {
    /// Exact email, matched case-insensitively
    #[arg(long)]
    email: Option<String>,

    /// Substring of the username, case-insensitive
    #[arg(long)]
    username: Option<String>,

    /// Words to look for in the full name
    #[arg(long, value_name = "TEXT")]
    text: Option<String>,

    /// Only active (true) or inactive (false) users
    #[arg(long)]
    active: Option<bool>,

    /// Created at or after (RFC 3339)
    #[arg(long, value_name = "TIME")]
    created_from: Option<DateTime<Utc>>,

    /// Created at or before (RFC 3339)
    #[arg(long, value_name = "TIME")]
    created_to: Option<DateTime<Utc>>,

    /// Maximum number of users, 0 for no limit
    #[arg(long, default_value_t = 20)]
    limit: i64,

    /// Number of users to skip
    #[arg(long, default_value_t = 0)]
    offset: i64,

    /// Sort field as FIELD[:asc|:desc], repeatable
    #[arg(long = "sort", value_name = "FIELD", value_parser = parse_sort_field)]
    sort: Vec<SortField>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl SearchArgs {
    fn filter(&self) -> UserFilter {
        UserFilter {
            ids: Vec::new(),
            email: self.email.clone(),
            username: self.username.clone(),
            full_text: self.text.clone(),
            is_active: self.active,
            created_from: self.created_from,
            created_to: self.created_to,
        }
    }

    fn pagination(&self) -> PaginationOptions {
        PaginationOptions::builder()
            .limit(self.limit)
            .offset(self.offset)
            .sort_fields(self.sort.iter().cloned())
            .build()
    }
}

/// Parse `field`, `field:asc` or `field:desc`
pub fn parse_sort_field(value: &str) -> std::result::Result<SortField, String> {
    let (name, direction) = match value.rsplit_once(':') {
        Some((name, dir)) => match dir.to_ascii_lowercase().as_str() {
            "asc" => (name, OrderDirection::Ascending),
            "desc" => (name, OrderDirection::Descending),
            other => return Err(format!("unknown direction '{}', use asc or desc", other)),
        },
        None => (value, OrderDirection::Ascending),
    };
    if name.trim().is_empty() {
        return Err("sort field name is empty".to_string());
    }
    Ok(SortField::new(name.trim(), direction))
}

/// Create a random user, then read it back through every operation
pub async fn demo<R: UserRepository>(repo: &R) -> Result<()> {
    let user = fake::user(&mut rand::rng());
    println!("{} {}", "Creating".green().bold(), user.email);

    let created = repo.create(&user).await.context("create failed")?;
    output::print_user("created", &created);

    let by_id = repo.get_by_id(created.id).await.context("get_by_id failed")?;
    output::print_user("get_by_id", &by_id);

    let by_email = repo
        .find_by_email(&created.email)
        .await
        .context("find_by_email failed")?;
    output::print_user("find_by_email", &by_email);

    let filter = UserFilter::default()
        .with_email(created.email.as_str())
        .with_is_active(created.is_active);
    let pagination = PaginationOptions::builder()
        .limit(10)
        .offset(0)
        .sort_by(SortField::desc("email"))
        .build();
    let found = repo
        .search(&filter, &pagination)
        .await
        .context("search failed")?;

    println!("\n{} {} user(s)", "search".cyan().bold(), found.len());
    output::print_table(&found);
    Ok(())
}

pub async fn get<R: UserRepository>(repo: &R, id: Uuid) -> Result<()> {
    let user = repo.get_by_id(id).await?;
    output::print_user("get_by_id", &user);
    Ok(())
}

pub async fn find<R: UserRepository>(repo: &R, email: &str) -> Result<()> {
    let user = repo.find_by_email(email).await?;
    output::print_user("find_by_email", &user);
    Ok(())
}

pub async fn search<R: UserRepository>(repo: &R, args: SearchArgs) -> Result<()> {
    let users = repo.search(&args.filter(), &args.pagination()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&users)?);
    } else {
        println!("{} {} user(s)", "search".cyan().bold(), users.len());
        output::print_table(&users);
    }
    Ok(())
}
