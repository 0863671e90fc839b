//! Synthetic form data

use crate::config::target::{FieldRole, NamedField};
use rand::seq::IndexedRandom;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Olivia", "Liam", "Emma", "Noah", "Amelia", "Lucas", "Sophia", "Ethan",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Thomas", "Taylor", "Moore", "Jackson",
    "Martin", "Lee", "Thompson", "White", "Harris", "Clark", "Lewis", "Walker", "Young", "King",
];

const AREA_CODES: &[&str] = &[
    "226", "289", "343", "416", "437", "438", "450", "514", "587", "604", "613", "647", "705",
    "778", "780", "819", "902", "905", "212", "213", "312", "415", "512", "617", "646", "718",
];

const EMAIL_DOMAINS: &[&str] = &["gmail.com", "yahoo.com", "outlook.com", "hotmail.com"];

const WORDS: &[&str] = &[
    "cool", "star", "ninja", "storm", "tiger", "byte", "cloud", "quest", "river", "blue", "gold",
    "swift", "maple", "pixel", "echo", "lunar", "rock", "jazz", "surf", "trail",
];

const SEPARATORS: &[&str] = &["", ".", "_", "-"];

/// What to do with one field during a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAction {
    Type(String),
    Click,
}

/// One coherent person per submission so the email can echo the name.
#[derive(Debug, Clone)]
pub struct Identity {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl Identity {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let first_name = pick(FIRST_NAMES, rng).to_string();
        let last_name = pick(LAST_NAMES, rng).to_string();
        let email = email_for(&first_name, &last_name, rng);
        Self {
            first_name,
            last_name,
            email,
            phone: phone(rng),
        }
    }
}

fn pick<R: Rng + ?Sized>(pool: &'static [&'static str], rng: &mut R) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

pub fn phone<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}{}{}",
        pick(AREA_CODES, rng),
        rng.random_range(200..=999),
        rng.random_range(1000..=9999)
    )
}

/// Name-based local part 40% of the time, otherwise a word mash.
pub fn email_for<R: Rng + ?Sized>(first: &str, last: &str, rng: &mut R) -> String {
    let local = if rng.random_bool(0.4) {
        format!(
            "{}{}{}{}",
            first.to_lowercase(),
            pick(SEPARATORS, rng),
            last.to_lowercase(),
            rng.random_range(1..=999)
        )
    } else {
        format!(
            "{}{}{}{}",
            pick(WORDS, rng),
            pick(SEPARATORS, rng),
            pick(WORDS, rng),
            rng.random_range(1..=999)
        )
    };
    format!("{}@{}", local, pick(EMAIL_DOMAINS, rng))
}

/// Role from the explicit hint, else from common field names.
pub fn role_of(field: &NamedField) -> FieldRole {
    if field.spec.role != FieldRole::Generic {
        return field.spec.role;
    }
    match field.name.to_ascii_lowercase().as_str() {
        "first_name" | "firstname" | "first" | "fname" => FieldRole::FirstName,
        "last_name" | "lastname" | "last" | "lname" => FieldRole::LastName,
        "email" | "email_address" | "emailaddress" => FieldRole::Email,
        "phone" | "phone_number" | "phonenumber" => FieldRole::Phone,
        _ => FieldRole::Generic,
    }
}

pub fn action_for<R: Rng + ?Sized>(field: &NamedField, identity: &Identity, rng: &mut R) -> FieldAction {
    if field.spec.is_checkbox() {
        return FieldAction::Click;
    }
    if let Some(option) = field.spec.options.choose(rng) {
        return FieldAction::Type(option.clone());
    }
    let value = match role_of(field) {
        FieldRole::FirstName => identity.first_name.clone(),
        FieldRole::LastName => identity.last_name.clone(),
        FieldRole::Email => identity.email.clone(),
        FieldRole::Phone => identity.phone.clone(),
        FieldRole::Generic => format!("test_{}", rng.random_range(1000..=9999)),
    };
    FieldAction::Type(value)
}
