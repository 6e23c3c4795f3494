//! Random demo users

use chrono::{Duration, Utc};
use rand::distr::Alphanumeric;
use rand::seq::IndexedRandom;
use rand::Rng;

use user_store::models::User;

const DOMAINS: [&str; 5] = ["example.com", "test.org", "demo.net", "mail.io", "sample.dev"];

const FIRST_NAMES: [&str; 8] = [
    "Alice", "Bruno", "Chidi", "Dana", "Emeka", "Farah", "Goran", "Hana",
];

const LAST_NAMES: [&str; 8] = [
    "Ito", "Jensen", "Kowalski", "Lopez", "Mensah", "Novak", "Okafor", "Petrov",
];

fn token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// A random, probably unique email address
pub fn email<R: Rng + ?Sized>(rng: &mut R) -> String {
    let domain = DOMAINS.choose(rng).copied().unwrap_or(DOMAINS[0]);
    format!("{}@{}", token(rng, 10), domain)
}

/// A random user with a full name, a recent login and a random active flag
pub fn user<R: Rng + ?Sized>(rng: &mut R) -> User {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or(FIRST_NAMES[0]);
    let last = LAST_NAMES.choose(rng).copied().unwrap_or(LAST_NAMES[0]);
    let username = format!("{}_{}", first.to_lowercase(), token(rng, 4));
    let last_login = Utc::now() - Duration::minutes(rng.random_range(1..=60 * 24 * 30));

    User::new(email(rng), username)
        .with_full_name(format!("{} {}", first, last))
        .with_last_login(last_login)
        .active(rng.random_bool(0.5))
}
