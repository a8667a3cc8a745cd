use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

use crate::intent::{Analysis, Competition, IntentTag};
use crate::stats::{AwardDetail, StatsDocument, TeamRecord};
use crate::text::{format_ratio, format_thousands};

pub const RELOAD_MESSAGE: &str = "⚠️ No pude cargar mis datos. Intentá recargar.";

pub const GREETINGS: [&str; 4] = [
    "¡Hola! Soy el bot de Messi ⚽ Preguntame lo que quieras sobre mi carrera.",
    "¡Buenas! ¿Qué querés saber? Goles, títulos, premios... ¡preguntá nomás!",
    "¡Hola! Qué bueno verte por acá. ¿Hablamos de fútbol? ⚽",
    "¡Hey! Estoy listo para contarte todo sobre mi carrera. 🏆",
];

pub const THANKS: [&str; 2] = [
    "¡De nada! ¿Querés saber algo más? ⚽",
    "¡Un placer! Preguntame lo que quieras. 💙",
];

pub const GOODBYES: [&str; 2] = [
    "¡Hasta luego! Fue un placer charlar. 👋⚽",
    "¡Chau! Volvé cuando quieras. 💙",
];

pub const HELP: &str = "📋 Podés preguntarme sobre:\n• Goles y estadísticas por equipo\n• Títulos y logros\n• Balón de Oro y premios\n• Récords\n• Equipos donde jugué\n• ¡Y mucho más!";

pub const FALLBACKS: [&str; 4] = [
    "🤔 **Preguntame cosas como:**\n• ¿Cuántos goles marcaste?\n• ¿Ganaste el Mundial?\n• ¿Cuántos Balones de Oro tenés?\n• ¿Dónde jugás ahora?",
    "⚽ **Puedo hablarte sobre:**\n• Mis estadísticas (goles, asistencias, partidos)\n• Títulos y trofeos\n• Premios individuales\n• Equipos donde jugué",
    "🏆 **Tengo información sobre:**\n• Barcelona, PSG, Inter Miami y Argentina\n• Balones de Oro y premios\n• Champions League, Mundiales y más\n• Récords y logros",
    "✨ **Respondo preguntas como:**\n• ¿Cuántos goles en [equipo]?\n• ¿Ganaste [torneo]?\n• ¿Cuántos [premio] tenés?\n• ¿Dónde jugás?",
];

pub const GOALS_HINT: &str = "🎯 **¿Sobre qué goles querés saber?**\n• ¿Cuántos goles marcaste en total?\n• ¿Cuántos goles en Barcelona?\n• Goles con Argentina\n• ¿Cuántos goles hiciste en 2012?";
pub const AWARDS_HINT: &str = "🏆 **¿Qué premios te interesan?**\n• ¿Cuántos Balones de Oro ganaste?\n• Botas de Oro\n• Trofeos Pichichi\n• The Best FIFA";
pub const TITLES_HINT: &str = "🏆 **¿Sobre qué títulos querés saber?**\n• ¿Cuántos títulos ganaste?\n• ¿Ganaste el Mundial?\n• ¿Cuántas Champions League ganaste?\n• Títulos con Barcelona";
pub const WORLD_CUP_HINT: &str = "⭐ **¿Querés saber sobre el Mundial?**\n• ¿Ganaste un Mundial?\n• ¿Sos campeón del mundo?\n• Mundial 2022";

// Hardcoded award answers used when `individual_awards` lacks the key. These are the last
// known figures and may be stale relative to the live document.
pub const BALON_ORO_FALLBACK: &str = "Gané 8 Balones de Oro.";
pub const BOTA_ORO_FALLBACK: &str = "Gané 6 Botas de Oro.";
pub const PICHICHI_FALLBACK: &str = "Gané 8 Trofeos Pichichi.";
pub const THE_BEST_FALLBACK: &str = "Gané 3 premios The Best FIFA.";

pub const WORLD_CUP_FALLBACK: &str =
    "¡Sí! Gané la Copa Mundial FIFA 2022 con Argentina en Qatar.";
pub const BEST_YEAR_FALLBACK: &str =
    "Mi mejor año fue 2012, marqué 91 goles en total (club + selección).";
pub const CURRENT_TEAM_FALLBACK: &str = "Inter Miami CF";
pub const BIRTH_DATE_FALLBACK: &str = "1987-06-24";
const BIRTH_PLACE_FALLBACK: &str = "Rosario, Santa Fe, Argentina";
const NATIONALITY_FALLBACK: &str = "argentino";

const DAYS_PER_YEAR: f64 = 365.25;

// Keyword hints match at word starts so "toro" or "angola" do not trigger them.
static GOALS_HINT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bgol").expect("goals hint regex"));
static AWARDS_HINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(balon|ballon|premio|bota|award)|\boro\b").expect("awards hint regex")
});
static TITLES_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(titulo|copa|campeon|ganaste)").expect("titles hint regex"));
static WORLD_CUP_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(mundial|world cup|qatar)").expect("world cup hint regex"));

/// Builds the answer for one classified message. Never fails: a missing document yields
/// `RELOAD_MESSAGE`, missing sub-records degrade to sentences built from the totals.
pub fn compose<R: Rng + ?Sized>(
    analysis: &Analysis,
    stats: Option<&StatsDocument>,
    today: NaiveDate,
    rng: &mut R,
) -> String {
    let Some(doc) = stats else {
        return RELOAD_MESSAGE.to_string();
    };

    let team = analysis
        .team
        .as_deref()
        .and_then(|key| doc.teams.get(key));

    let Some(intent) = analysis.intent else {
        return match team {
            Some(team) => team_summary(team),
            None => fallback(&analysis.normalized, rng),
        };
    };

    match intent {
        IntentTag::Greeting => pick(&GREETINGS, rng),
        IntentTag::Thanks => pick(&THANKS, rng),
        IntentTag::Goodbye => pick(&GOODBYES, rng),
        IntentTag::Help => HELP.to_string(),
        IntentTag::WonWorldCup => world_cup(doc),
        IntentTag::BalonOro => award(doc, "balon_oro", "🏅", BALON_ORO_FALLBACK),
        IntentTag::BotaOro => award(doc, "bota_oro", "👟", BOTA_ORO_FALLBACK),
        IntentTag::Pichichi => award(doc, "pichichi", "🎯", PICHICHI_FALLBACK),
        IntentTag::TheBest => award(doc, "the_best", "🌟", THE_BEST_FALLBACK),
        IntentTag::TitlesSpecific => match analysis.competition {
            Some(competition) => competition_titles(doc, competition),
            None => titles_total(doc, team),
        },
        IntentTag::TitlesTotal => titles_total(doc, team),
        IntentTag::BestYear => best_year(doc),
        IntentTag::GoalsYear => match analysis.year {
            Some(year) => goals_in_year(doc, team, year),
            None => goals(doc, team),
        },
        IntentTag::Goals => goals(doc, team),
        IntentTag::Assists => assists(doc, team),
        IntentTag::Matches => matches(doc, team),
        IntentTag::TeamsPlayed => teams_played(doc),
        IntentTag::CurrentTeam => current_team(doc),
        IntentTag::Age => age(doc, today),
        IntentTag::Nationality => nationality(doc),
        IntentTag::Records => records(doc),
        IntentTag::DataSource => data_source(doc),
    }
}

fn pick<R: Rng + ?Sized>(options: &[&str], rng: &mut R) -> String {
    options
        .choose(rng)
        .copied()
        .unwrap_or_default()
        .to_string()
}

/// Secondary keyword layer for messages the classifier could not place.
fn fallback<R: Rng + ?Sized>(normalized: &str, rng: &mut R) -> String {
    let hints: [(&Lazy<Regex>, &str); 4] = [
        (&GOALS_HINT_RE, GOALS_HINT),
        (&AWARDS_HINT_RE, AWARDS_HINT),
        (&TITLES_HINT_RE, TITLES_HINT),
        (&WORLD_CUP_HINT_RE, WORLD_CUP_HINT),
    ];
    if let Some((_, hint)) = hints.iter().find(|(re, _)| re.is_match(normalized)) {
        return hint.to_string();
    }
    pick(&FALLBACKS, rng)
}

fn team_summary(team: &TeamRecord) -> String {
    format!(
        "📊 En {} ({}):\n⚽ {} goles\n📋 {} partidos\n🎯 {} asistencias\n🏆 {} títulos",
        team.name,
        team.period,
        format_thousands(team.goals),
        format_thousands(team.matches),
        format_thousands(team.assists),
        format_thousands(team.titles),
    )
}

fn years_line(years: &[u16]) -> String {
    if years.is_empty() {
        return String::new();
    }
    let joined = years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("\n📅 **Años:** {joined}")
}

fn detail_answer(emoji: &str, detail: &AwardDetail) -> String {
    format!("{emoji} **{}**{}", detail.answer, years_line(&detail.years))
}

fn award(doc: &StatsDocument, key: &str, emoji: &str, fallback: &str) -> String {
    match doc.individual_awards.get(key) {
        Some(detail) => detail_answer(emoji, detail),
        None => format!("{emoji} {fallback}"),
    }
}

fn world_cup(doc: &StatsDocument) -> String {
    match doc.titles_detail.by_competition.get(Competition::WorldCup.key()) {
        Some(detail) => format!(
            "🏆⭐ **¡Sí! {}**{}\n🇦🇷 ¡El sueño de mi vida hecho realidad!",
            detail.answer,
            years_line(&detail.years)
        ),
        None => format!("🏆⭐ {WORLD_CUP_FALLBACK}"),
    }
}

fn competition_titles(doc: &StatsDocument, competition: Competition) -> String {
    match doc.titles_detail.by_competition.get(competition.key()) {
        Some(detail) => detail_answer("🏆", detail),
        None => format!(
            "🏆 No tengo a mano el detalle de {}, pero en total llevo {} títulos en mi carrera.",
            competition.label(),
            format_thousands(doc.career_totals.titles)
        ),
    }
}

fn team_breakdown(doc: &StatsDocument, unit: &str, field: fn(&TeamRecord) -> u32) -> String {
    if doc.teams.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n\n📊 **Por equipos:**");
    for (_, team) in doc.teams_by_period() {
        out.push_str(&format!(
            "\n• {}: {} {unit}",
            team.name,
            format_thousands(field(team))
        ));
    }
    out
}

fn ratio_line(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) if r.is_finite() => format!("\n📈 Promedio: {} goles por partido.", format_ratio(r)),
        _ => String::new(),
    }
}

fn goals(doc: &StatsDocument, team: Option<&TeamRecord>) -> String {
    if let Some(team) = team {
        return format!(
            "⚽ En {} marqué **{} goles** en {} partidos ({}).{}",
            team.name,
            format_thousands(team.goals),
            format_thousands(team.matches),
            team.period,
            ratio_line(team.goals_per_match())
        );
    }
    let totals = doc.career_totals;
    format!(
        "⚽ Llevo **{} goles** en toda mi carrera profesional ({} partidos).{}{}",
        format_thousands(totals.goals),
        format_thousands(totals.matches),
        ratio_line(totals.goals_per_match()),
        team_breakdown(doc, "goles", |t| t.goals)
    )
}

fn goals_in_year(doc: &StatsDocument, team: Option<&TeamRecord>, year: u16) -> String {
    if let Some(team) = team {
        let scored = team.goals_by_year.as_ref().and_then(|m| m.get(&year));
        return match scored {
            Some(goals) => format!(
                "⚽ En {year} marqué **{} goles** con {}.",
                format_thousands(*goals),
                team.name
            ),
            None => format!(
                "📅 No tengo registrados mis goles de {year} con {}. En total con {} llevo {} goles.",
                team.name,
                team.name,
                format_thousands(team.goals)
            ),
        };
    }
    match doc.goals_in_year(year) {
        Some(total) => {
            let mut out = format!("⚽ En {year} marqué **{} goles** en total.", format_thousands(total));
            for (_, team) in doc.teams_by_period() {
                if let Some(goals) = team.goals_by_year.as_ref().and_then(|m| m.get(&year)) {
                    out.push_str(&format!("\n• {}: {}", team.name, format_thousands(*goals)));
                }
            }
            out
        }
        None => format!(
            "📅 No tengo el detalle de goles de {year}, pero en toda mi carrera llevo {} goles.",
            format_thousands(doc.career_totals.goals)
        ),
    }
}

fn assists(doc: &StatsDocument, team: Option<&TeamRecord>) -> String {
    if let Some(team) = team {
        return format!(
            "🎯 En {} di **{} asistencias** en {} partidos.",
            team.name,
            format_thousands(team.assists),
            format_thousands(team.matches)
        );
    }
    format!(
        "🎯 Llevo **{} asistencias** en toda mi carrera.{}",
        format_thousands(doc.career_totals.assists),
        team_breakdown(doc, "asistencias", |t| t.assists)
    )
}

fn matches(doc: &StatsDocument, team: Option<&TeamRecord>) -> String {
    if let Some(team) = team {
        return format!(
            "📊 En {} jugué **{} partidos** ({}).",
            team.name,
            format_thousands(team.matches),
            team.period
        );
    }
    format!(
        "📊 Jugué **{} partidos** en toda mi carrera.{}",
        format_thousands(doc.career_totals.matches),
        team_breakdown(doc, "partidos", |t| t.matches)
    )
}

fn titles_total(doc: &StatsDocument, team: Option<&TeamRecord>) -> String {
    if let Some(team) = team {
        return format!(
            "🏆 Con {} gané **{} títulos** ({}).",
            team.name,
            format_thousands(team.titles),
            team.period
        );
    }
    let mut out = format!(
        "🏆 He ganado **{} títulos** en mi carrera.{}",
        format_thousands(doc.career_totals.titles),
        team_breakdown(doc, "títulos", |t| t.titles)
    );
    if let Some(summary) = doc
        .titles_detail
        .major_titles_summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        out.push_str("\n\n");
        out.push_str(summary);
    }
    out
}

fn best_year(doc: &StatsDocument) -> String {
    match doc.best_goal_year() {
        Some((year, goals)) => format!(
            "🔥 Mi mejor año en goles fue **{year}** con {} goles. ⚽",
            format_thousands(goals)
        ),
        None => format!("🔥 {BEST_YEAR_FALLBACK}"),
    }
}

fn teams_played(doc: &StatsDocument) -> String {
    let rows = doc.teams_by_period();
    if rows.is_empty() {
        return "🏟️ No tengo cargado el detalle de mis equipos.".to_string();
    }
    let lines = rows
        .iter()
        .map(|(_, t)| format!("• {} ({})", t.name, t.period))
        .collect::<Vec<_>>()
        .join("\n");
    format!("🏟️ Jugué en {} equipos:\n{lines}", rows.len())
}

fn current_team(doc: &StatsDocument) -> String {
    let name = doc
        .personal_info
        .current_team
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(CURRENT_TEAM_FALLBACK);
    let mut out = format!("⚽ Actualmente juego en **{name}**.");
    let record = doc
        .teams
        .values()
        .find(|t| t.name.eq_ignore_ascii_case(name));
    if let Some(team) = record {
        out.push_str(&format!(
            "\n• {} goles en {} partidos\n• {} asistencias\n• {} títulos",
            format_thousands(team.goals),
            format_thousands(team.matches),
            format_thousands(team.assists),
            format_thousands(team.titles)
        ));
    }
    out
}

/// Whole years elapsed using 365.25-day years. Not calendar-exact: it can be off by one
/// on the days around a birthday.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - birth).num_days();
    if days <= 0 {
        return 0;
    }
    (days as f64 / DAYS_PER_YEAR).floor() as u32
}

fn parse_birth_date(doc: &StatsDocument) -> Option<NaiveDate> {
    let raw = doc
        .personal_info
        .birth_date
        .as_deref()
        .unwrap_or(BIRTH_DATE_FALLBACK);
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(BIRTH_DATE_FALLBACK, "%Y-%m-%d"))
        .ok()
}

fn month_name(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ];
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

fn age(doc: &StatsDocument, today: NaiveDate) -> String {
    let Some(birth) = parse_birth_date(doc) else {
        return "🎂 No tengo mi fecha de nacimiento a mano.".to_string();
    };
    let place = doc
        .personal_info
        .birth_place
        .as_deref()
        .unwrap_or(BIRTH_PLACE_FALLBACK);
    format!(
        "🎂 Tengo {} años. Nací el {} de {} de {} en {place}.",
        age_in_years(birth, today),
        birth.day(),
        month_name(birth.month()),
        birth.year()
    )
}

fn nationality(doc: &StatsDocument) -> String {
    let info = &doc.personal_info;
    format!(
        "🇦🇷 Soy {}, nacido en {}.",
        info.nationality.as_deref().unwrap_or(NATIONALITY_FALLBACK),
        info.birth_place.as_deref().unwrap_or(BIRTH_PLACE_FALLBACK)
    )
}

fn records(doc: &StatsDocument) -> String {
    if doc.records.is_empty() {
        return format!(
            "📈 No tengo mis récords cargados, pero llevo {} goles y {} títulos.",
            format_thousands(doc.career_totals.goals),
            format_thousands(doc.career_totals.titles)
        );
    }
    let lines = doc
        .records
        .values()
        .map(|r| format!("• {r}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("📈 **Algunos de mis récords:**\n{lines}")
}

fn data_source(doc: &StatsDocument) -> String {
    match (doc.last_updated.as_deref(), doc.data_source.as_deref()) {
        (Some(updated), Some(source)) => {
            format!("📊 Datos actualizados: {updated} | Fuente: {source}")
        }
        (Some(updated), None) => format!("📊 Datos actualizados: {updated}"),
        (None, Some(source)) => format!("📊 Fuente de los datos: {source}"),
        (None, None) => "📊 Mis datos vienen del documento de estadísticas cargado al iniciar."
            .to_string(),
    }
}
