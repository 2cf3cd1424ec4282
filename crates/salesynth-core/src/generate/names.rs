//! Customer name synthesis from fixed first/last name pools. First and last
//! names are drawn independently and uniformly, then joined with a space.

use rand::Rng;

pub const FIRST_NAMES: [&str; 12] = [
    "Amina", "Sara", "Ali", "Omar", "Zain", "Nadia", "Riya", "Ishan", "Misha", "Anika", "Ayaan",
    "Kashvi",
];

pub const LAST_NAMES: [&str; 11] = [
    "Khan", "Sharma", "Patel", "Singh", "Desai", "Gupta", "Acharya", "Chandra", "Thakur", "Ram",
    "Yadav",
];

/// Draw a full customer name. Consumes exactly two RNG samples.
pub fn customer_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
    format!("{} {}", first, last)
}
