//! Availability constraints injected into the assistant's system prompt.
//!
//! The constraint line is computed in priority order, each later check
//! overwriting the previous one:
//!
//! 1. the quick status (full tonight, full lunch, closed today);
//! 2. today listed in `closed_dates`;
//! 3. today listed in `full_dates`, with its period.
//!
//! Upcoming closures and the temporary message are then appended.

use chrono::NaiveDate;

use super::{AvailabilityRecord, Status};

const FULL_TONIGHT: &str = "⚠️ IMPORTANT : Le restaurant est COMPLET CE SOIR. \
     Informe poliment le client et propose de réserver pour un autre soir.";
const FULL_LUNCH: &str = "⚠️ IMPORTANT : Le restaurant est COMPLET CE MIDI. \
     Informe poliment le client et propose de réserver pour un autre créneau.";
const CLOSED_TODAY_STATUS: &str = "⚠️ IMPORTANT : Le restaurant est FERMÉ AUJOURD'HUI \
     (fermeture exceptionnelle). Informe poliment le client et propose de réserver pour un autre jour.";
const CLOSED_TODAY_DATE: &str = "⚠️ IMPORTANT : Le restaurant est FERMÉ AUJOURD'HUI. \
     Informe poliment et propose un autre jour.";

/// Builds the constraint block for `today`. Empty when nothing applies.
#[must_use]
pub fn project(record: &AvailabilityRecord, today: NaiveDate) -> String {
    let mut constraint = match record.status {
        Status::Open => None,
        Status::FullTonight => Some(FULL_TONIGHT.to_string()),
        Status::FullLunch => Some(FULL_LUNCH.to_string()),
        Status::ClosedToday => Some(CLOSED_TODAY_STATUS.to_string()),
    };

    if record.is_closed_on(today) {
        constraint = Some(CLOSED_TODAY_DATE.to_string());
    }

    if let Some(period) = record.full_period_on(today) {
        constraint = Some(format!(
            "⚠️ IMPORTANT : Le restaurant est COMPLET ({period}) aujourd'hui. \
             Informe poliment et propose un autre créneau."
        ));
    }

    let mut lines: Vec<String> = constraint.into_iter().collect();

    let upcoming: Vec<String> = record
        .closed_dates
        .iter()
        .filter(|date| **date > today)
        .map(ToString::to_string)
        .collect();
    if !upcoming.is_empty() {
        lines.push(format!(
            "Fermetures prévues : {}. Si le client veut réserver à ces dates, \
             informe-le que c'est fermé.",
            upcoming.join(", ")
        ));
    }

    if let Some(message) = record.active_temp_message() {
        lines.push(format!(
            "📢 MESSAGE DU RESTAURANT : {message}. \
             Mentionne cette info si c'est pertinent pour le client."
        ));
    }

    lines.join("\n")
}
