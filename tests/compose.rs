use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use regex::Regex;

use messi_chat::compose::{
    AWARDS_HINT, BALON_ORO_FALLBACK, BEST_YEAR_FALLBACK, FALLBACKS, GOALS_HINT, GREETINGS,
    RELOAD_MESSAGE, THANKS, age_in_years, compose,
};
use messi_chat::intent::Classifier;
use messi_chat::stats::{StatsDocument, TeamRecord};
use messi_chat::store::parse_stats_json;
use messi_chat::text::format_thousands;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_doc() -> StatsDocument {
    parse_stats_json(&read_fixture("messi_stats.json")).expect("fixture should parse")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 19).expect("valid date")
}

fn ask(doc: &StatsDocument, question: &str) -> String {
    let classifier = Classifier::for_document(doc);
    let mut rng = StdRng::seed_from_u64(7);
    compose(&classifier.classify(question), Some(doc), today(), &mut rng)
}

#[test]
fn barcelona_goals_include_counts_and_name() {
    let doc = fixture_doc();
    let answer = ask(&doc, "cuantos goles en barcelona");
    assert!(answer.contains("672"), "{answer}");
    assert!(answer.contains("778"), "{answer}");
    assert!(answer.contains("FC Barcelona"), "{answer}");
    assert!(answer.contains("0.86"), "{answer}");
}

#[test]
fn every_document_team_answers_its_goal_count() {
    let mut doc = fixture_doc();
    doc.teams.insert(
        "newells".to_string(),
        TeamRecord {
            name: "Newell's Old Boys".to_string(),
            period: "1994-2000".to_string(),
            matches: 1500,
            goals: 1234,
            ..TeamRecord::default()
        },
    );
    for (key, team) in &doc.teams {
        let alias = key.replace('_', " ");
        let answer = ask(&doc, &format!("cuantos goles en {alias}"));
        assert!(
            answer.contains(&format_thousands(team.goals)),
            "{key}: {answer}"
        );
        assert!(answer.contains(&team.name), "{key}: {answer}");
    }
    assert!(ask(&doc, "cuantos goles en newells").contains("1.234"));
}

#[test]
fn goals_per_match_has_two_decimals() {
    let doc = fixture_doc();
    let ratio = Regex::new(r"Promedio: (\d+\.\d+) goles por partido").expect("regex");
    for question in [
        "¿Cuántos goles marcaste?",
        "cuantos goles en barcelona",
        "goles con el psg",
        "goles en inter miami",
    ] {
        let answer = ask(&doc, question);
        let caps = ratio.captures(&answer).expect("ratio line present");
        let value = &caps[1];
        assert_eq!(value.split('.').nth(1).map(str::len), Some(2), "{value}");
        let parsed: f64 = value.parse().expect("numeric ratio");
        assert!(parsed.is_finite() && parsed >= 0.0);
    }
}

#[test]
fn zero_matches_omits_ratio() {
    let mut doc = fixture_doc();
    doc.career_totals.matches = 0;
    if let Some(team) = doc.teams.get_mut("psg") {
        team.matches = 0;
    }
    for question in ["¿Cuántos goles marcaste?", "goles con el psg"] {
        let answer = ask(&doc, question);
        assert!(!answer.contains("Promedio"), "{answer}");
        assert!(!answer.contains("NaN"), "{answer}");
        assert!(!answer.contains("inf"), "{answer}");
    }
}

#[test]
fn career_totals_use_thousands_separator() {
    let doc = fixture_doc();
    let answer = ask(&doc, "¿Cuántos goles marcaste?");
    assert!(answer.contains("890"), "{answer}");
    assert!(answer.contains("1.128"), "{answer}");
    assert!(answer.contains("Paris Saint-Germain: 32 goles"), "{answer}");
}

#[test]
fn empty_input_falls_back() {
    let doc = fixture_doc();
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        let analysis = Classifier::default().classify("");
        let answer = compose(&analysis, Some(&doc), today(), &mut rng);
        assert!(FALLBACKS.contains(&answer.as_str()), "{answer}");
    }
}

#[test]
fn hola_is_one_of_the_greetings() {
    let doc = fixture_doc();
    let classifier = Classifier::default();
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let answer = compose(&classifier.classify("hola"), Some(&doc), today(), &mut rng);
        assert!(GREETINGS.contains(&answer.as_str()), "{answer}");
    }
    let mut rng = StdRng::seed_from_u64(3);
    let answer = compose(&classifier.classify("gracias!"), Some(&doc), today(), &mut rng);
    assert!(THANKS.contains(&answer.as_str()));
}

#[test]
fn same_seed_same_canned_answer() {
    let doc = fixture_doc();
    let analysis = Classifier::default().classify("hola");
    let a = compose(&analysis, Some(&doc), today(), &mut StdRng::seed_from_u64(42));
    let b = compose(&analysis, Some(&doc), today(), &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn missing_balon_oro_uses_hardcoded_constant() {
    let mut doc = fixture_doc();
    doc.individual_awards.remove("balon_oro");
    let answer = ask(&doc, "cuantos balones de oro tenes");
    assert!(answer.contains(BALON_ORO_FALLBACK), "{answer}");
}

#[test]
fn present_award_reads_document_with_years() {
    let doc = fixture_doc();
    let answer = ask(&doc, "cuantos balones de oro tenes");
    assert!(answer.contains("Gané 8 Balones de Oro"), "{answer}");
    assert!(answer.contains("2009, 2010, 2011, 2012"), "{answer}");
}

#[test]
fn world_cup_answer_reads_copa_mundial_detail() {
    let doc = fixture_doc();
    let answer = ask(&doc, "¿Ganaste el mundial?");
    assert!(answer.contains("¡Sí!"), "{answer}");
    assert!(answer.contains("2022"), "{answer}");
    assert!(!answer.contains("He ganado"), "{answer}");
}

#[test]
fn missing_competition_detail_degrades_to_totals() {
    let doc = fixture_doc();
    let answer = ask(&doc, "supporters shield");
    assert!(answer.contains("Supporters' Shield"), "{answer}");
    assert!(answer.contains("47 títulos"), "{answer}");

    let mut doc = fixture_doc();
    doc.titles_detail.by_competition.clear();
    let answer = ask(&doc, "cuantas champions ganaste");
    assert!(answer.contains("47"), "{answer}");
}

#[test]
fn goal_and_match_questions_naming_a_tournament_answer_counts() {
    let doc = fixture_doc();
    let answer = ask(&doc, "cuantos goles hiciste en el mundial");
    assert!(answer.contains("890"), "{answer}");
    assert!(!answer.contains("Gané"), "{answer}");

    let answer = ask(&doc, "cuantos partidos jugaste en la champions");
    assert!(answer.contains("1.128"), "{answer}");
    assert!(!answer.contains("Gané"), "{answer}");
}

#[test]
fn titles_total_lists_teams_and_summary() {
    let doc = fixture_doc();
    let answer = ask(&doc, "¿Cuántos títulos ganaste?");
    assert!(answer.contains("47 títulos"), "{answer}");
    assert!(answer.contains("FC Barcelona: 35"), "{answer}");
    assert!(answer.contains("Entre ellos"), "{answer}");

    let scoped = ask(&doc, "titulos con el barca");
    assert!(scoped.contains("35 títulos"), "{scoped}");
}

#[test]
fn team_without_intent_gets_summary() {
    let doc = fixture_doc();
    let answer = ask(&doc, "inter miami");
    assert!(answer.contains("Inter Miami CF"), "{answer}");
    assert!(answer.contains("71 goles"), "{answer}");
    assert!(answer.contains("82 partidos"), "{answer}");
    assert!(answer.contains("45 asistencias"), "{answer}");
    assert!(answer.contains("3 títulos"), "{answer}");
}

#[test]
fn team_key_absent_from_document_uses_career_totals() {
    let mut doc = fixture_doc();
    doc.teams.remove("psg");
    let answer = ask(&doc, "cuantas asistencias con el psg");
    assert!(answer.contains("444"), "{answer}");
}

#[test]
fn goals_in_year_sum_across_teams() {
    let doc = fixture_doc();
    let answer = ask(&doc, "cuantos goles hiciste en 2012");
    assert!(answer.contains("91"), "{answer}");

    let scoped = ask(&doc, "goles con argentina en 2022");
    assert!(scoped.contains("18"), "{scoped}");
    assert!(scoped.contains("Selección Argentina"), "{scoped}");

    let missing = ask(&doc, "goles en 1999");
    assert!(missing.contains("1999"), "{missing}");
    assert!(missing.contains("890"), "{missing}");
}

#[test]
fn best_year_comes_from_goals_by_year() {
    let doc = fixture_doc();
    let answer = ask(&doc, "cual fue tu mejor año");
    assert!(answer.contains("2012"), "{answer}");
    assert!(answer.contains("91"), "{answer}");

    let mut bare = fixture_doc();
    for team in bare.teams.values_mut() {
        team.goals_by_year = None;
    }
    assert!(ask(&bare, "cual fue tu mejor año").contains(BEST_YEAR_FALLBACK));
}

#[test]
fn teams_played_orders_by_period() {
    let doc = fixture_doc();
    let answer = ask(&doc, "¿En qué equipos jugaste?");
    let barca = answer.find("FC Barcelona").expect("barcelona listed");
    let arg = answer.find("Selección Argentina").expect("argentina listed");
    let psg = answer.find("Paris Saint-Germain").expect("psg listed");
    let miami = answer.find("Inter Miami CF").expect("miami listed");
    assert!(barca < arg && arg < psg && psg < miami, "{answer}");
    assert!(answer.contains("4 equipos"), "{answer}");
}

#[test]
fn current_team_and_personal_info() {
    let doc = fixture_doc();
    let current = ask(&doc, "¿Dónde jugás ahora?");
    assert!(current.contains("Inter Miami CF"), "{current}");
    assert!(current.contains("71 goles en 82 partidos"), "{current}");

    let nationality = ask(&doc, "de donde sos");
    assert!(nationality.contains("argentino"), "{nationality}");
    assert!(nationality.contains("Rosario"), "{nationality}");

    let records = ask(&doc, "tus records");
    assert!(records.contains("91 goles en un año calendario"), "{records}");

    let source = ask(&doc, "de donde sacas los datos");
    assert!(source.contains("2025-10-20"), "{source}");
    assert!(source.contains("messi.com"), "{source}");
}

#[test]
fn age_uses_365_25_day_years() {
    let doc = fixture_doc();
    let answer = ask(&doc, "¿Cuántos años tenés?");
    assert!(answer.contains("Tengo 38 años"), "{answer}");
    assert!(answer.contains("24 de junio de 1987"), "{answer}");

    let birth = NaiveDate::from_ymd_opt(1987, 6, 24).expect("date");
    let day_before = NaiveDate::from_ymd_opt(2025, 6, 23).expect("date");
    let birthday = NaiveDate::from_ymd_opt(2025, 6, 24).expect("date");
    assert_eq!(age_in_years(birth, day_before), 37);
    assert_eq!(age_in_years(birth, birthday), 38);

    // Not calendar-exact: 365 days after 2001-01-01 is a full calendar year, but falls
    // short of 365.25.
    let born = NaiveDate::from_ymd_opt(2001, 1, 1).expect("date");
    let first_birthday = NaiveDate::from_ymd_opt(2002, 1, 1).expect("date");
    assert_eq!(age_in_years(born, first_birthday), 0);
    assert_eq!(age_in_years(born, first_birthday.succ_opt().expect("date")), 1);

    assert_eq!(age_in_years(birthday, birth), 0);
}

#[test]
fn fallback_keyword_hints() {
    let doc = fixture_doc();
    assert_eq!(ask(&doc, "goles"), GOALS_HINT);
    assert_eq!(ask(&doc, "premios"), AWARDS_HINT);
    assert_eq!(ask(&doc, "oro"), AWARDS_HINT);
}

#[test]
fn hint_keywords_only_match_whole_word_starts() {
    let doc = fixture_doc();
    for q in ["toro", "un tesoro escondido", "angola"] {
        let answer = ask(&doc, q);
        assert!(FALLBACKS.contains(&answer.as_str()), "{q}: {answer}");
    }
}

#[test]
fn unloaded_document_asks_for_reload() {
    let analysis = Classifier::default().classify("cuantos goles en barcelona");
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(compose(&analysis, None, today(), &mut rng), RELOAD_MESSAGE);
}

#[test]
fn sparse_document_never_panics() {
    let doc = parse_stats_json(
        r#"{"career_totals":{"matches":0,"goals":0,"assists":0,"titles":0}}"#,
    )
    .expect("minimal document parses");
    let questions = [
        "hola",
        "cuantos goles marcaste",
        "cuantos goles en barcelona",
        "goles en 2012",
        "ganaste el mundial",
        "cuantas champions",
        "cuantos titulos",
        "balon de oro",
        "bota de oro",
        "pichichi",
        "the best",
        "mejor año",
        "asistencias",
        "partidos",
        "en que equipos jugaste",
        "donde juegas ahora",
        "edad",
        "nacionalidad",
        "records",
        "fuente de datos",
        "chau",
        "ayuda",
        "",
        "xyz",
    ];
    for q in questions {
        let answer = ask(&doc, q);
        assert!(!answer.is_empty(), "{q}");
        assert!(!answer.contains("NaN"), "{q}: {answer}");
    }
}
