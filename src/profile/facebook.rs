//! Facebook Graph attribute normalization
//!
//! Extracts the canonical profile from the JSON document the Graph profile
//! endpoint returns. Data-quality problems on optional fields (birthday,
//! timezone) are absorbed silently; a document missing its required `id` or
//! `name` is a provider fault and surfaces as a typed error.

use chrono::NaiveDate;
use serde_json::{json, Value};
use thiserror::Error;

use crate::profile::Profile;

/// A provider profile document that cannot be normalized.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("provider profile is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Normalize a Graph `me` document into a canonical profile.
///
/// # Errors
///
/// Returns [`ProfileError::MissingField`] when the document lacks `id` or
/// `name`.
pub fn facebook_profile(data: &Value) -> Result<Profile, ProfileError> {
    let id = string_field(data, "id").ok_or(ProfileError::MissingField("id"))?;
    let name = string_field(data, "name").ok_or(ProfileError::MissingField("name"))?;

    // The trailing segment of the profile link doubles as a username, but
    // only when the user picked one (otherwise it is just the numeric id).
    let nick = string_field(data, "link")
        .and_then(|link| link.rsplit('/').next())
        .filter(|last| !last.is_empty() && *last != id);

    let email = string_field(data, "email");
    let verified = data.get("verified").and_then(Value::as_bool) == Some(true);

    let mut profile = Profile::new();
    profile.insert(
        "accounts",
        json!([{"domain": "facebook.com", "userid": id}]),
    );
    profile.insert("providerName", "Facebook");
    profile.insert("displayName", name);
    // An unverified email becomes `false` here and is stripped by
    // compaction; verifiedEmail is a string or absent, never `false`.
    profile.insert(
        "verifiedEmail",
        if verified {
            email.map_or(Value::Bool(false), Value::from)
        } else {
            Value::Bool(false)
        },
    );
    profile.insert_opt("gender", string_field(data, "gender"));
    profile.insert("preferredUsername", nick.unwrap_or(name));
    profile.insert_opt("emails", email.map(|e| json!([{"value": e}])));

    profile.insert_opt(
        "utcOffset",
        data.get("timezone")
            .and_then(render_timezone)
            .map(format_utc_offset),
    );
    profile.insert_opt(
        "birthday",
        string_field(data, "birthday")
            .and_then(parse_birthday)
            .map(|date| date.format("%Y-%m-%d").to_string()),
    );

    let mut pcard = serde_json::Map::new();
    for (key, canonical) in [("first_name", "givenName"), ("last_name", "familyName")] {
        if let Some(part) = string_field(data, key) {
            pcard.insert(canonical.to_owned(), json!(part));
        }
    }
    pcard.insert("formatted".to_owned(), json!(name));
    profile.insert("name", pcard);

    profile.compact();
    Ok(profile)
}

fn string_field<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

/// The Graph API reports the timezone either as a number of hours or as an
/// `"H:MM"` string. Anything else (null, a zero, an empty string) carries
/// no offset and is skipped.
fn render_timezone(tz: &Value) -> Option<String> {
    match tz {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Reformat a numeric offset into `H(H):MM`.
///
/// The padding rule is asymmetric on purpose: a single digit paired with a
/// sign gets a zero inserted after the sign (`"-5"` becomes `"-05"`), a bare
/// single digit is left alone (`"5:30"` keeps hour `"5"`), and anything
/// longer passes through unchanged. Minutes default to `"00"`.
fn format_utc_offset(tz: String) -> String {
    let (hour, minute) = match tz.split_once(':') {
        Some((h, m)) => (h, m),
        None => (tz.as_str(), "00"),
    };
    let hour = if hour.len() == 2 && hour.starts_with(['-', '+']) {
        let mut padded = String::with_capacity(3);
        padded.push_str(&hour[..1]);
        padded.push('0');
        padded.push_str(&hour[1..]);
        padded
    } else {
        hour.to_owned()
    };
    format!("{hour}:{minute}")
}

/// Parse the Graph `MM/DD/YYYY` birthday. Malformed input is dropped
/// silently; the rest of the profile is unaffected.
fn parse_birthday(bday: &str) -> Option<NaiveDate> {
    let mut parts = bday.splitn(3, '/');
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> Value {
        json!({
            "id": "100",
            "name": "Jane Doe",
            "link": "https://facebook.com/jane.doe",
            "email": "jane@example.com",
            "verified": true,
        })
    }

    #[test]
    fn verified_profile_extracts_all_fields() {
        let profile = facebook_profile(&jane()).unwrap();

        assert_eq!(profile.get_str("displayName"), Some("Jane Doe"));
        assert_eq!(profile.get_str("preferredUsername"), Some("jane.doe"));
        assert_eq!(profile.get_str("verifiedEmail"), Some("jane@example.com"));
        assert_eq!(
            profile.get("emails").unwrap()[0]["value"],
            "jane@example.com"
        );
        let account = &profile.get("accounts").unwrap()[0];
        assert_eq!(account["domain"], "facebook.com");
        assert_eq!(account["userid"], "100");
        assert_eq!(profile.get("name").unwrap()["formatted"], "Jane Doe");
    }

    #[test]
    fn unverified_email_leaves_verified_email_absent() {
        let mut data = jane();
        data["verified"] = json!(false);
        let profile = facebook_profile(&data).unwrap();

        // The false marker is stripped by compaction, not emitted.
        assert!(!profile.contains("verifiedEmail"));
        assert_eq!(
            profile.get("emails").unwrap()[0]["value"],
            "jane@example.com"
        );
    }

    #[test]
    fn numeric_link_segment_falls_back_to_display_name() {
        let mut data = jane();
        data["link"] = json!("https://facebook.com/100");
        let profile = facebook_profile(&data).unwrap();
        assert_eq!(profile.get_str("preferredUsername"), Some("Jane Doe"));
    }

    #[test]
    fn trailing_slash_link_falls_back_to_display_name() {
        let mut data = jane();
        data["link"] = json!("https://facebook.com/jane.doe/");
        let profile = facebook_profile(&data).unwrap();
        assert_eq!(profile.get_str("preferredUsername"), Some("Jane Doe"));
    }

    #[test]
    fn name_parts_map_to_canonical_fields() {
        let mut data = jane();
        data["first_name"] = json!("Jane");
        data["last_name"] = json!("Doe");
        let profile = facebook_profile(&data).unwrap();
        let name = profile.get("name").unwrap();
        assert_eq!(name["givenName"], "Jane");
        assert_eq!(name["familyName"], "Doe");
    }

    #[test]
    fn missing_id_is_a_provider_fault() {
        let data = json!({"name": "Jane Doe"});
        assert!(matches!(
            facebook_profile(&data),
            Err(ProfileError::MissingField("id"))
        ));
    }

    #[test]
    fn timezone_pads_signed_single_digit() {
        assert_eq!(format_utc_offset("-5".into()), "-05:00");
        assert_eq!(format_utc_offset("5:30".into()), "5:30");
        assert_eq!(format_utc_offset("-10:15".into()), "-10:15");
        assert_eq!(format_utc_offset("10".into()), "10:00");
    }

    #[test]
    fn numeric_timezone_is_rendered_then_formatted() {
        let mut data = jane();
        data["timezone"] = json!(-5);
        let profile = facebook_profile(&data).unwrap();
        assert_eq!(profile.get_str("utcOffset"), Some("-05:00"));
    }

    #[test]
    fn non_scalar_timezone_is_skipped() {
        for tz in [json!(null), json!(false), json!(0), json!("")] {
            let mut data = jane();
            data["timezone"] = tz;
            let profile = facebook_profile(&data).unwrap();
            assert!(!profile.contains("utcOffset"));
        }
    }

    #[test]
    fn birthday_parses_month_first() {
        assert_eq!(
            parse_birthday("01/02/1990"),
            NaiveDate::from_ymd_opt(1990, 1, 2)
        );
        let mut data = jane();
        data["birthday"] = json!("01/02/1990");
        let profile = facebook_profile(&data).unwrap();
        assert_eq!(profile.get_str("birthday"), Some("1990-01-02"));
    }

    #[test]
    fn malformed_birthday_is_dropped_silently() {
        let mut data = jane();
        data["birthday"] = json!("notadate");
        let profile = facebook_profile(&data).unwrap();
        assert!(!profile.contains("birthday"));
        assert_eq!(profile.get_str("displayName"), Some("Jane Doe"));
    }
}
