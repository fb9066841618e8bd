//! Coupon codes, coupon letters and registration exports.
//!
//! Codes are generated fresh on every export; they are not persisted and
//! carry no link back to the registration.

use std::fmt::Write as _;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::models::CouponEmail;

/// Every coupon code starts with this prefix.
pub const COUPON_PREFIX: &str = "KESENNUMA";

/// Number of random characters after the prefix.
pub const COUPON_SUFFIX_LEN: usize = 6;

/// How long a coupon stays valid after it is issued.
pub const COUPON_VALIDITY: Duration = Duration::days(30);

const EVENT_NAME: &str = "Kesennuma Hackatsuon 2025";
const DEFAULT_RECIPIENT: &str = "Valued Participant";
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CSV_HEADER: [&str; 4] = ["Email", "Name", "Registration Date", "Coupon Code"];

/// Generate a coupon code such as `KESENNUMA7Q2ZK9`.
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut code = String::with_capacity(COUPON_PREFIX.len() + COUPON_SUFFIX_LEN);
    code.push_str(COUPON_PREFIX);
    for _ in 0..COUPON_SUFFIX_LEN {
        if let Some(&byte) = CODE_ALPHABET.choose(rng) {
            code.push(char::from(byte));
        }
    }
    code
}

/// Render the plain-text coupon letter for one registrant.
#[must_use]
pub fn coupon_letter(registration: &CouponEmail, code: &str, issued_at: DateTime<Utc>) -> String {
    let name = registration.name.as_deref().unwrap_or(DEFAULT_RECIPIENT);
    let valid_until = (issued_at + COUPON_VALIDITY).format("%Y-%m-%d");

    format!(
        "Dear {name},\n\
         \n\
         Thank you for participating in the {EVENT_NAME} voting!\n\
         \n\
         Your exclusive coupon code: {code}\n\
         \n\
         This code can be used at participating local businesses in Kesennuma for a special \
         discount. Present this code at checkout to receive your reward.\n\
         \n\
         Participating businesses:\n\
         - Local restaurants and cafes\n\
         - Traditional craft shops\n\
         - Tourism and experience providers\n\
         - Selected retail stores\n\
         \n\
         Valid until: {valid_until}\n\
         \n\
         Thank you for supporting innovation in Kesennuma!\n\
         \n\
         Best regards,\n\
         {EVENT_NAME} Team"
    )
}

/// Export registrations as CSV with a fresh coupon code per row.
///
/// Every field is double-quoted; embedded quotes are doubled.
pub fn export_csv<R: Rng + ?Sized>(registrations: &[CouponEmail], rng: &mut R) -> String {
    let mut csv = csv_row(CSV_HEADER);
    for registration in registrations {
        let date = registration.created_at.format("%Y-%m-%d").to_string();
        let code = generate_code(rng);
        csv.push('\n');
        csv.push_str(&csv_row([
            registration.email.as_str(),
            registration.name.as_deref().unwrap_or(""),
            &date,
            &code,
        ]));
    }
    csv
}

fn csv_row<const N: usize>(fields: [&str; N]) -> String {
    let mut row = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            row.push(',');
        }
        let _ = write!(row, "\"{}\"", field.replace('"', "\"\""));
    }
    row
}
