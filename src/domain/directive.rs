//! Owner command grammar.
//!
//! [`parse`] turns the raw text of an owner message into a [`Directive`].
//! Matching is literal and keyword based: fixed phrases must equal the whole
//! trimmed, uppercased message, parameterized commands match on a prefix.
//! Text that matches nothing is not a command and belongs to the normal
//! customer flow, even when the owner sent it.
//!
//! ```text
//! AIDE | HELP | ?                       -> ShowHelp
//! STATUS                                -> QueryStatus
//! STATS                                 -> QueryStats
//! COMPLET CE SOIR | COMPLET SOIR | ...  -> SetFullTonight
//! COMPLET MIDI | COMPLET CE MIDI | ...  -> SetFullLunch
//! COMPLET <DD/MM>                       -> SetFullOnDate
//! FERMÉ AUJOURD'HUI | FERMÉ | ...       -> SetClosedToday
//! FERMÉ <DD/MM>                         -> SetClosedOnDate
//! FERMÉ DU <DD/MM> AU <DD/MM>           -> SetClosedRange
//! OUVERT | OPEN | NORMAL                -> SetOpen
//! MESSAGE <texte> | MESSAGE OFF         -> SetTempMessage | ClearTempMessage
//! ```

use chrono::{Datelike, NaiveDate};

/// A structured, validated owner command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Show the command reference.
    ShowHelp,
    /// Report the current availability state.
    QueryStatus,
    /// Report today's counters.
    QueryStats,
    /// Mark tonight's dinner service as fully booked.
    SetFullTonight,
    /// Mark today's lunch service as fully booked.
    SetFullLunch,
    /// Mark a whole day as fully booked.
    SetFullOnDate(NaiveDate),
    /// Close the restaurant for today.
    SetClosedToday,
    /// Close the restaurant on one date.
    SetClosedOnDate(NaiveDate),
    /// Close the restaurant for every day of an inclusive range.
    SetClosedRange {
        /// First closed day.
        start: NaiveDate,
        /// Last closed day.
        end: NaiveDate,
    },
    /// Return to normal service.
    SetOpen,
    /// Show a temporary message to customers.
    SetTempMessage(String),
    /// Remove the temporary message.
    ClearTempMessage,
}

/// A date token in an owner command did not parse as `DD/MM`.
///
/// The display text is the corrective reply sent back to the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDate {
    /// Bad date after `COMPLET`.
    #[error("❌ Format de date non reconnu. Utilisez : COMPLET 28/02")]
    FullOnDate,
    /// Bad date after `FERMÉ`.
    #[error("❌ Format non reconnu. Utilisez : FERMÉ 01/03")]
    ClosedOnDate,
    /// Bad bound in a `FERMÉ DU .. AU ..` range.
    #[error("❌ Format non reconnu. Utilisez : FERMÉ DU 01/03 AU 15/03")]
    ClosedRange,
}

/// Parses an owner message.
///
/// `today` supplies the year every `DD/MM` token resolves to. Dates are never
/// rolled over to the next year, even when already past.
///
/// Returns `Ok(None)` when the message is not a command.
///
/// # Errors
///
/// Returns [`InvalidDate`] when a date-taking command carries a token that is
/// not a valid day/month in the current year.
pub fn parse(raw: &str, today: NaiveDate) -> Result<Option<Directive>, InvalidDate> {
    let trimmed = raw.trim();
    let msg = trimmed.replace('\u{2019}', "'").to_uppercase();

    let directive = match msg.as_str() {
        "AIDE" | "HELP" | "?" => Directive::ShowHelp,
        "STATUS" => Directive::QueryStatus,
        "STATS" => Directive::QueryStats,
        "COMPLET CE SOIR" | "COMPLET SOIR" | "FULL TONIGHT" => Directive::SetFullTonight,
        "COMPLET MIDI" | "COMPLET CE MIDI" | "FULL LUNCH" => Directive::SetFullLunch,
        "FERMÉ AUJOURD'HUI" | "FERME AUJOURD'HUI" | "FERMÉ" | "FERME" | "CLOSED TODAY" => {
            Directive::SetClosedToday
        }
        "OUVERT" | "OPEN" | "NORMAL" => Directive::SetOpen,
        _ => return parse_parameterized(trimmed, &msg, today.year()),
    };
    Ok(Some(directive))
}

/// Prefix-matched commands, tried in grammar order.
fn parse_parameterized(
    original: &str,
    msg: &str,
    year: i32,
) -> Result<Option<Directive>, InvalidDate> {
    if let Some(rest) = msg.strip_prefix("COMPLET ") {
        let date = day_month(rest, year).ok_or(InvalidDate::FullOnDate)?;
        return Ok(Some(Directive::SetFullOnDate(date)));
    }

    if let Some(rest) = msg
        .strip_prefix("FERMÉ ")
        .or_else(|| msg.strip_prefix("FERME "))
    {
        if let Some((left, right)) = rest.split_once("AU") {
            let left = left.trim();
            let left = left.strip_prefix("DU").unwrap_or(left);
            let (Some(start), Some(end)) = (day_month(left, year), day_month(right, year)) else {
                return Err(InvalidDate::ClosedRange);
            };
            return Ok(Some(Directive::SetClosedRange { start, end }));
        }
        let date = day_month(rest, year).ok_or(InvalidDate::ClosedOnDate)?;
        return Ok(Some(Directive::SetClosedOnDate(date)));
    }

    // The body keeps the owner's casing, so match the prefix on the original.
    if let Some(head) = original.get(..8)
        && head.eq_ignore_ascii_case("MESSAGE ")
    {
        let text = original.get(8..).unwrap_or_default().trim();
        if text.eq_ignore_ascii_case("OFF") {
            return Ok(Some(Directive::ClearTempMessage));
        }
        return Ok(Some(Directive::SetTempMessage(text.to_string())));
    }

    Ok(None)
}

/// Parses a strict `D/M` or `DD/MM` token into a date of `year`.
fn day_month(token: &str, year: i32) -> Option<NaiveDate> {
    let (day, month) = token.trim().split_once('/')?;
    NaiveDate::from_ymd_opt(year, small_number(month)?, small_number(day)?)
}

fn small_number(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("valid date");
        };
        date
    }

    fn today() -> NaiveDate {
        date(2026, 10, 16)
    }

    fn parsed(raw: &str) -> Option<Directive> {
        let Ok(result) = parse(raw, today()) else {
            panic!("unexpected invalid date for {raw:?}");
        };
        result
    }

    #[test]
    fn fixed_phrases_are_case_insensitive() {
        assert_eq!(parsed("aide"), Some(Directive::ShowHelp));
        assert_eq!(parsed("  Help "), Some(Directive::ShowHelp));
        assert_eq!(parsed("?"), Some(Directive::ShowHelp));
        assert_eq!(parsed("status"), Some(Directive::QueryStatus));
        assert_eq!(parsed("Stats"), Some(Directive::QueryStats));
        assert_eq!(parsed("complet ce soir"), Some(Directive::SetFullTonight));
        assert_eq!(parsed("FULL TONIGHT"), Some(Directive::SetFullTonight));
        assert_eq!(parsed("complet midi"), Some(Directive::SetFullLunch));
        assert_eq!(parsed("Full lunch"), Some(Directive::SetFullLunch));
        assert_eq!(parsed("ouvert"), Some(Directive::SetOpen));
        assert_eq!(parsed("normal"), Some(Directive::SetOpen));
    }

    #[test]
    fn closed_today_variants() {
        for raw in [
            "fermé aujourd'hui",
            "FERME AUJOURD'HUI",
            "Fermé aujourd’hui",
            "fermé",
            "ferme",
            "closed today",
        ] {
            assert_eq!(parsed(raw), Some(Directive::SetClosedToday), "{raw}");
        }
    }

    #[test]
    fn full_on_date_uses_current_year_even_when_past() {
        assert_eq!(
            parsed("COMPLET 28/02"),
            Some(Directive::SetFullOnDate(date(2026, 2, 28)))
        );
        assert_eq!(
            parsed("complet 1/3"),
            Some(Directive::SetFullOnDate(date(2026, 3, 1)))
        );
    }

    #[test]
    fn full_on_date_rejects_garbage() {
        assert_eq!(parse("COMPLET demain", today()), Err(InvalidDate::FullOnDate));
        assert_eq!(parse("COMPLET 32/01", today()), Err(InvalidDate::FullOnDate));
        assert_eq!(parse("COMPLET 28/02/2027", today()), Err(InvalidDate::FullOnDate));
    }

    #[test]
    fn closed_on_date_and_range() {
        assert_eq!(
            parsed("FERMÉ 01/03"),
            Some(Directive::SetClosedOnDate(date(2026, 3, 1)))
        );
        assert_eq!(
            parsed("ferme du 01/03 au 03/03"),
            Some(Directive::SetClosedRange {
                start: date(2026, 3, 1),
                end: date(2026, 3, 3),
            })
        );
        assert_eq!(
            parsed("FERMÉ 10/03 AU 12/03"),
            Some(Directive::SetClosedRange {
                start: date(2026, 3, 10),
                end: date(2026, 3, 12),
            })
        );
    }

    #[test]
    fn inverted_range_is_still_parsed() {
        assert_eq!(
            parsed("FERMÉ DU 05/03 AU 01/03"),
            Some(Directive::SetClosedRange {
                start: date(2026, 3, 5),
                end: date(2026, 3, 1),
            })
        );
    }

    #[test]
    fn closed_forms_reject_garbage() {
        assert_eq!(parse("FERMÉ lundi", today()), Err(InvalidDate::ClosedOnDate));
        assert_eq!(
            parse("FERMÉ DU 01/03 AU fin mars", today()),
            Err(InvalidDate::ClosedRange)
        );
    }

    #[test]
    fn closed_prefix_wins_over_later_keywords() {
        assert_eq!(
            parse("FERMÉ COMPLET 01/03", today()),
            Err(InvalidDate::ClosedOnDate)
        );
    }

    #[test]
    fn leap_day_depends_on_current_year() {
        assert_eq!(
            parse("COMPLET 29/02", date(2028, 1, 1)),
            Ok(Some(Directive::SetFullOnDate(date(2028, 2, 29))))
        );
        assert_eq!(parse("COMPLET 29/02", today()), Err(InvalidDate::FullOnDate));
    }

    #[test]
    fn message_keeps_original_case() {
        assert_eq!(
            parsed("message Menu Truffe ce soir !"),
            Some(Directive::SetTempMessage("Menu Truffe ce soir !".to_string()))
        );
    }

    #[test]
    fn message_off_always_clears() {
        assert_eq!(parsed("MESSAGE OFF"), Some(Directive::ClearTempMessage));
        assert_eq!(parsed("message off"), Some(Directive::ClearTempMessage));
        assert_eq!(parsed("Message Off"), Some(Directive::ClearTempMessage));
    }

    #[test]
    fn free_text_is_not_a_command() {
        assert_eq!(parsed("Bonjour, vous êtes ouverts ?"), None);
        assert_eq!(parsed("MESSAGE"), None);
        assert_eq!(parsed("COMPLET"), None);
        assert_eq!(parsed(""), None);
    }

    #[test]
    fn invalid_date_text_names_expected_format() {
        assert!(InvalidDate::FullOnDate.to_string().contains("COMPLET 28/02"));
        assert!(InvalidDate::ClosedRange.to_string().contains("FERMÉ DU 01/03 AU 15/03"));
    }
}
