//! Owner command dispatcher.
//!
//! [`execute`] applies a parsed [`Directive`] to a restaurant entry and
//! returns the confirmation text sent back verbatim to the owner. It never
//! fails: malformed input was already turned into an
//! [`InvalidDate`](super::InvalidDate) or a non-command by the parser.
//!
//! Quick status setters also touch today's entry in the date sets, but
//! [`Directive::SetOpen`] only resets the status. Today stays in
//! `closed_dates` / `full_dates` until the owner changes it, and the prompt
//! projector keeps reporting it.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};

use super::{Directive, FullPeriod, RestaurantEntry, Status};

/// Static reply to `AIDE`.
pub const HELP_TEXT: &str = "🤖 *Commandes RestoBot :*

📊 *STATUS* — Voir le statut actuel
📈 *STATS* — Statistiques du jour

🔴 *COMPLET CE SOIR* — Marquer complet ce soir
🔴 *COMPLET MIDI* — Marquer complet ce midi
🔴 *COMPLET* [date] — Marquer complet (ex: COMPLET 28/02)
🟡 *FERMÉ AUJOURD'HUI* — Fermeture exceptionnelle aujourd'hui
🟡 *FERMÉ* [date] — Fermeture exceptionnelle (ex: FERMÉ 01/03)
🟡 *FERMÉ DU* [date] *AU* [date] — Fermeture période
🟢 *OUVERT* — Retour à la normale

💬 *MESSAGE* [texte] — Ajouter un message temporaire pour les clients
💬 *MESSAGE OFF* — Supprimer le message temporaire

❓ *AIDE* — Afficher cette aide";

/// Values the dispatcher needs besides the entry itself.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext {
    /// Current calendar day.
    pub today: NaiveDate,
    /// Timestamp stamped on mutations.
    pub now: DateTime<Utc>,
    /// Conversations currently held for this restaurant.
    pub active_conversations: usize,
}

/// Applies `directive` to `entry` and returns the reply for the owner.
pub fn execute(directive: &Directive, entry: &mut RestaurantEntry, ctx: &CommandContext) -> String {
    let today = ctx.today;
    let record = &mut entry.availability;

    let reply = match directive {
        Directive::ShowHelp => return HELP_TEXT.to_string(),
        Directive::QueryStatus => return status_report(entry),
        Directive::QueryStats => return stats_report(entry, ctx),
        Directive::SetFullTonight => {
            record.status = Status::FullTonight;
            record.full_dates.insert(today, FullPeriod::Dinner);
            "🔴 C'est noté ! L'agent informe les clients que vous êtes complet ce soir. \
             Envoyez *OUVERT* pour revenir à la normale."
                .to_string()
        }
        Directive::SetFullLunch => {
            record.status = Status::FullLunch;
            record.full_dates.insert(today, FullPeriod::Lunch);
            "🔴 C'est noté ! L'agent informe les clients que vous êtes complet ce midi. \
             Envoyez *OUVERT* pour revenir à la normale."
                .to_string()
        }
        Directive::SetFullOnDate(date) => {
            record.full_dates.insert(*date, FullPeriod::Day);
            format!("🔴 Noté : complet le {}.", date.format("%d/%m/%Y"))
        }
        Directive::SetClosedToday => {
            record.status = Status::ClosedToday;
            record.closed_dates.push(today);
            "🟡 Fermeture exceptionnelle enregistrée pour aujourd'hui. \
             L'agent prévient les clients. Envoyez *OUVERT* demain."
                .to_string()
        }
        Directive::SetClosedOnDate(date) => {
            record.closed_dates.push(*date);
            format!("🟡 Fermeture enregistrée le {}.", date.format("%d/%m/%Y"))
        }
        Directive::SetClosedRange { start, end } => {
            // An inverted range appends nothing and still confirms.
            record
                .closed_dates
                .extend(start.iter_days().take_while(|day| day <= end));
            format!(
                "🟡 Fermeture enregistrée du {} au {}.",
                start.format("%d/%m"),
                end.format("%d/%m")
            )
        }
        Directive::SetOpen => {
            record.status = Status::Open;
            "🟢 Statut remis à *ouvert*. L'agent reprend normalement.".to_string()
        }
        Directive::SetTempMessage(text) => {
            record.temp_message.clone_from(text);
            format!(
                "💬 Message temporaire activé :\n\"{text}\"\n\n\
                 Les clients verront ce message. Envoyez *MESSAGE OFF* pour le retirer."
            )
        }
        Directive::ClearTempMessage => {
            record.temp_message.clear();
            "💬 Message temporaire supprimé.".to_string()
        }
    };

    record.updated_at = ctx.now;
    reply
}

fn status_report(entry: &RestaurantEntry) -> String {
    let record = &entry.availability;
    let mut text = format!("📊 *Statut actuel :* {}\n", record.status.label());
    if let Some(message) = record.active_temp_message() {
        let _ = writeln!(text, "💬 Message actif : \"{message}\"");
    }
    if !record.closed_dates.is_empty() {
        let dates: Vec<String> = record.closed_dates.iter().map(ToString::to_string).collect();
        let _ = writeln!(text, "📅 Fermetures prévues : {}", dates.join(", "));
    }
    if !record.full_dates.is_empty() {
        let dates: Vec<String> = record
            .full_dates
            .iter()
            .map(|(date, period)| format!("{date} ({period})"))
            .collect();
        let _ = writeln!(text, "📅 Complet : {}", dates.join(", "));
    }
    text
}

fn stats_report(entry: &mut RestaurantEntry, ctx: &CommandContext) -> String {
    let stats = entry.stats.snapshot(ctx.today);
    let languages: Vec<String> = stats
        .language_counts
        .iter()
        .map(|(lang, count)| format!("{lang}: {count}"))
        .collect();
    format!(
        "📈 *Statistiques du jour :*\n\n\
         💬 Messages traités : {}\n\
         🍽️ Réservations : {}\n\
         🌍 Langues : {}\n\
         👥 Conversations actives : {}",
        stats.messages_today,
        stats.bookings_today,
        languages.join(", "),
        ctx.active_conversations
    )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{ChannelId, RestaurantProfile};
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("valid date");
        };
        date
    }

    fn today() -> NaiveDate {
        date(2026, 2, 24)
    }

    fn ctx() -> CommandContext {
        CommandContext {
            today: today(),
            now: Utc::now(),
            active_conversations: 3,
        }
    }

    fn entry() -> RestaurantEntry {
        let profile = RestaurantProfile {
            name: "Le Cosi".to_string(),
            channel_id: ChannelId::from("chan"),
            ..RestaurantProfile::default()
        };
        RestaurantEntry::new(profile, today(), Utc::now() - Duration::hours(1))
    }

    #[test]
    fn full_tonight_sets_status_and_today() {
        let mut entry = entry();
        let reply = execute(&Directive::SetFullTonight, &mut entry, &ctx());
        assert_eq!(entry.availability.status, Status::FullTonight);
        assert_eq!(
            entry.availability.full_period_on(today()),
            Some(FullPeriod::Dinner)
        );
        assert!(reply.contains("OUVERT"));
    }

    #[test]
    fn full_lunch_sets_status_and_today() {
        let mut entry = entry();
        execute(&Directive::SetFullLunch, &mut entry, &ctx());
        assert_eq!(entry.availability.status, Status::FullLunch);
        assert_eq!(
            entry.availability.full_period_on(today()),
            Some(FullPeriod::Lunch)
        );
    }

    #[test]
    fn full_on_past_date_keeps_current_year_and_status() {
        let mut entry = entry();
        let reply = execute(
            &Directive::SetFullOnDate(date(2026, 1, 5)),
            &mut entry,
            &ctx(),
        );
        assert_eq!(entry.availability.status, Status::Open);
        assert_eq!(
            entry.availability.full_period_on(date(2026, 1, 5)),
            Some(FullPeriod::Day)
        );
        assert!(reply.contains("05/01/2026"));
    }

    #[test]
    fn closed_today_appends_without_dedup() {
        let mut entry = entry();
        execute(&Directive::SetClosedToday, &mut entry, &ctx());
        execute(&Directive::SetClosedToday, &mut entry, &ctx());
        assert_eq!(entry.availability.status, Status::ClosedToday);
        assert_eq!(entry.availability.closed_dates, vec![today(), today()]);
    }

    #[test]
    fn closed_on_date_leaves_status() {
        let mut entry = entry();
        let reply = execute(
            &Directive::SetClosedOnDate(date(2026, 3, 1)),
            &mut entry,
            &ctx(),
        );
        assert_eq!(entry.availability.status, Status::Open);
        assert_eq!(entry.availability.closed_dates, vec![date(2026, 3, 1)]);
        assert!(reply.contains("01/03/2026"));
    }

    #[test]
    fn closed_range_is_inclusive() {
        let mut entry = entry();
        let reply = execute(
            &Directive::SetClosedRange {
                start: date(2026, 3, 1),
                end: date(2026, 3, 3),
            },
            &mut entry,
            &ctx(),
        );
        assert_eq!(
            entry.availability.closed_dates,
            vec![date(2026, 3, 1), date(2026, 3, 2), date(2026, 3, 3)]
        );
        assert!(reply.contains("du 01/03 au 03/03"));
    }

    #[test]
    fn inverted_range_appends_nothing_but_confirms() {
        let mut entry = entry();
        let reply = execute(
            &Directive::SetClosedRange {
                start: date(2026, 3, 5),
                end: date(2026, 3, 1),
            },
            &mut entry,
            &ctx(),
        );
        assert!(entry.availability.closed_dates.is_empty());
        assert!(reply.starts_with("🟡 Fermeture enregistrée"));
    }

    #[test]
    fn open_does_not_purge_date_sets() {
        let mut entry = entry();
        execute(&Directive::SetClosedToday, &mut entry, &ctx());
        execute(&Directive::SetFullTonight, &mut entry, &ctx());
        execute(&Directive::SetTempMessage("Truffe".to_string()), &mut entry, &ctx());
        execute(&Directive::SetOpen, &mut entry, &ctx());

        assert_eq!(entry.availability.status, Status::Open);
        assert!(entry.availability.is_closed_on(today()));
        assert!(entry.availability.full_period_on(today()).is_some());
        assert_eq!(entry.availability.temp_message, "Truffe");
    }

    #[test]
    fn temp_message_set_and_clear() {
        let mut entry = entry();
        let reply = execute(
            &Directive::SetTempMessage("Menu truffe ce soir !".to_string()),
            &mut entry,
            &ctx(),
        );
        assert_eq!(entry.availability.temp_message, "Menu truffe ce soir !");
        assert!(reply.contains("\"Menu truffe ce soir !\""));

        execute(&Directive::ClearTempMessage, &mut entry, &ctx());
        assert_eq!(entry.availability.active_temp_message(), None);
    }

    #[test]
    fn mutations_stamp_updated_at() {
        let mut entry = entry();
        let context = ctx();
        assert_ne!(entry.availability.updated_at, context.now);
        execute(&Directive::SetOpen, &mut entry, &context);
        assert_eq!(entry.availability.updated_at, context.now);
    }

    #[test]
    fn queries_do_not_mutate() {
        let mut entry = entry();
        let before = entry.availability.clone();
        execute(&Directive::QueryStatus, &mut entry, &ctx());
        execute(&Directive::ShowHelp, &mut entry, &ctx());
        execute(&Directive::QueryStats, &mut entry, &ctx());
        assert_eq!(entry.availability, before);
    }

    #[test]
    fn status_report_lists_everything() {
        let mut entry = entry();
        execute(&Directive::SetFullTonight, &mut entry, &ctx());
        execute(&Directive::SetClosedOnDate(date(2026, 3, 1)), &mut entry, &ctx());
        execute(&Directive::SetTempMessage("Terrasse ouverte".to_string()), &mut entry, &ctx());

        let report = execute(&Directive::QueryStatus, &mut entry, &ctx());
        assert!(report.contains("🔴 Complet ce soir"));
        assert!(report.contains("\"Terrasse ouverte\""));
        assert!(report.contains("2026-03-01"));
        assert!(report.contains("2026-02-24 (soir)"));
    }

    #[test]
    fn stats_report_resets_lazily_and_counts_conversations() {
        let mut entry = entry();
        entry.stats.record_message(today(), "fr");
        entry.stats.record_booking(today());

        let report = execute(&Directive::QueryStats, &mut entry, &ctx());
        assert!(report.contains("Messages traités : 1"));
        assert!(report.contains("Réservations : 1"));
        assert!(report.contains("fr: 1"));
        assert!(report.contains("Conversations actives : 3"));

        let tomorrow = CommandContext {
            today: date(2026, 2, 25),
            ..ctx()
        };
        let report = execute(&Directive::QueryStats, &mut entry, &tomorrow);
        assert!(report.contains("Messages traités : 0"));
        assert_eq!(entry.stats.last_reset_date, date(2026, 2, 25));
    }

    #[test]
    fn help_lists_grammar() {
        let mut entry = entry();
        let help = execute(&Directive::ShowHelp, &mut entry, &ctx());
        for keyword in ["STATUS", "STATS", "COMPLET CE SOIR", "FERMÉ DU", "OUVERT", "MESSAGE OFF"] {
            assert!(help.contains(keyword), "{keyword}");
        }
    }
}
