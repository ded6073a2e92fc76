//! System prompt assembly.

use super::RestaurantProfile;

const DEFAULT_TONE: &str = "Professionnel mais chaleureux";

/// Builds the assistant's system prompt for a restaurant.
///
/// `constraints` is the availability block produced by
/// [`super::prompt_context::project`]; it is inserted verbatim right after
/// the tone and language instructions.
#[must_use]
pub fn build_system_prompt(profile: &RestaurantProfile, constraints: &str) -> String {
    let tone = non_empty(&profile.tone, DEFAULT_TONE);
    let languages = non_empty(&profile.languages, "français");
    let menu = non_empty(&profile.menu, "Non renseigné");
    let allergens = non_empty(&profile.allergens_policy, "Demander au restaurant");

    let booking = if profile.booking_link.is_empty() {
        "RÉSERVATION : Si le client veut réserver, collecte : nombre de personnes, date, heure, nom. \
         Confirme et dis que le restaurant va valider."
            .to_string()
    } else {
        format!(
            "RÉSERVATION : Si le client veut réserver, envoie-lui ce lien : {}",
            profile.booking_link
        )
    };

    format!(
        "Tu es l'assistant virtuel du restaurant \"{name}\".

RÔLE : Tu réponds aux clients sur WhatsApp de manière naturelle et chaleureuse.
Tu parles comme un membre de l'équipe, pas comme un robot.

TON : {tone}
LANGUES : Réponds dans la langue du client. Tu parles {languages}.
{constraints}

INFORMATIONS DU RESTAURANT :
- Description : {description}
- Adresse : {address}
- Téléphone : {phone}
- Horaires : {hours}
- Infos pratiques : {special_info}

MENU :
{menu}

ALLERGÈNES : {allergens}
{booking}

RÈGLES STRICTES :
- Ne JAMAIS inventer d'information. Si tu ne sais pas, dis-le et propose d'appeler le restaurant.
- Sur les allergènes/santé : TOUJOURS recommander de confirmer directement avec le restaurant.
- Reste dans ton rôle : tu ne parles QUE du restaurant et de sujets liés.
- Si le message n'a rien à voir, redirige poliment.
- Sois concis : 2-4 phrases max par réponse, sauf si le client pose plusieurs questions.
- Si une demande est complexe ou urgente, propose de transférer au restaurant.
",
        name = profile.name,
        description = profile.description,
        address = profile.address,
        phone = profile.phone,
        hours = profile.hours,
        special_info = profile.special_info,
    )
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}
