use std::fmt;

use regex::Regex;

use crate::stats::StatsDocument;
use crate::text::{Utterance, normalize_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentTag {
    WonWorldCup,
    BalonOro,
    BotaOro,
    Pichichi,
    TheBest,
    TitlesSpecific,
    TitlesTotal,
    BestYear,
    GoalsYear,
    Assists,
    Goals,
    Matches,
    TeamsPlayed,
    CurrentTeam,
    Age,
    Nationality,
    Records,
    DataSource,
    Greeting,
    Thanks,
    Goodbye,
    Help,
}

impl IntentTag {
    /// Evaluation order of the default classifier, highest priority first.
    pub const ALL: [IntentTag; 22] = [
        IntentTag::WonWorldCup,
        IntentTag::BalonOro,
        IntentTag::BotaOro,
        IntentTag::Pichichi,
        IntentTag::TheBest,
        IntentTag::TitlesSpecific,
        IntentTag::TitlesTotal,
        IntentTag::BestYear,
        IntentTag::GoalsYear,
        IntentTag::Assists,
        IntentTag::Goals,
        IntentTag::Matches,
        IntentTag::TeamsPlayed,
        IntentTag::CurrentTeam,
        IntentTag::Age,
        IntentTag::Nationality,
        IntentTag::Records,
        IntentTag::DataSource,
        IntentTag::Greeting,
        IntentTag::Thanks,
        IntentTag::Goodbye,
        IntentTag::Help,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IntentTag::WonWorldCup => "wonWorldCup",
            IntentTag::BalonOro => "balonOro",
            IntentTag::BotaOro => "botaOro",
            IntentTag::Pichichi => "pichichi",
            IntentTag::TheBest => "theBest",
            IntentTag::TitlesSpecific => "titlesSpecific",
            IntentTag::TitlesTotal => "titlesTotal",
            IntentTag::BestYear => "bestYear",
            IntentTag::GoalsYear => "goalsYear",
            IntentTag::Assists => "assists",
            IntentTag::Goals => "goals",
            IntentTag::Matches => "matches",
            IntentTag::TeamsPlayed => "teamsPlayed",
            IntentTag::CurrentTeam => "currentTeam",
            IntentTag::Age => "age",
            IntentTag::Nationality => "nationality",
            IntentTag::Records => "records",
            IntentTag::DataSource => "dataSource",
            IntentTag::Greeting => "greeting",
            IntentTag::Thanks => "thanks",
            IntentTag::Goodbye => "goodbye",
            IntentTag::Help => "help",
        }
    }
}

impl fmt::Display for IntentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Competition {
    WorldCup,
    ChampionsLeague,
    CopaAmerica,
    LeaguesCup,
    SupportersShield,
    Ligue1,
    LaLiga,
}

impl Competition {
    /// Key under `titles_detail.by_competition`.
    pub fn key(self) -> &'static str {
        match self {
            Competition::WorldCup => "copa_mundial",
            Competition::ChampionsLeague => "champions_league",
            Competition::CopaAmerica => "copa_america",
            Competition::LeaguesCup => "leagues_cup",
            Competition::SupportersShield => "supporters_shield",
            Competition::Ligue1 => "ligue1",
            Competition::LaLiga => "la_liga",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Competition::WorldCup => "Copa del Mundo",
            Competition::ChampionsLeague => "Champions League",
            Competition::CopaAmerica => "Copa América",
            Competition::LeaguesCup => "Leagues Cup",
            Competition::SupportersShield => "Supporters' Shield",
            Competition::Ligue1 => "Ligue 1",
            Competition::LaLiga => "La Liga",
        }
    }
}

// Patterns are matched against `normalize_text` output: lower-case, no accents, no ¿?¡!.
const INTENT_PATTERNS: &[(IntentTag, &str)] = &[
    (
        IntentTag::WonWorldCup,
        r"ganaste.*mundial|mundial.*ganaste|mundo.*ganaste|campeon.*mundo|(ganaste|campeon|titulo|sos|fuiste).*(mundial|copa del mundo|world cup)|mundial.*(campeon|titulo)",
    ),
    (
        IntentTag::BalonOro,
        r"balon.*oro|oro.*balon|balones|ballon|pallone|golden ball|pelota.*oro",
    ),
    (
        IntentTag::BotaOro,
        r"bota.*oro|oro.*bota|\bbotas\b|golden boot|zapato.*oro",
    ),
    (IntentTag::Pichichi, r"pichichi"),
    (IntentTag::TheBest, r"the best|fifa.*best|mejor.*fifa|premio.*fifa"),
    // TitlesSpecific and GoalsYear are built from predicates, see `default_intent_rules`.
    (IntentTag::TitlesTotal, r"titulo|campeonato|trofeo"),
    (
        IntentTag::BestYear,
        r"mejor (ano|temporada)|\bano\b.*mejor|mas goles.*\bano\b|\bano\b.*mas goles",
    ),
    (IntentTag::Assists, r"asistencia|pases? (de )?gol"),
    (
        IntentTag::Goals,
        r"cuantos? gol|total.*\bgol|\bgol.*total|\bgol.*carrera|\bgol.*(marcaste|hiciste|metiste|llevas)|(marcaste|hiciste|metiste|llevas).*\bgol|\bgol\w* (en|con|para)\b",
    ),
    (IntentTag::Matches, r"partido|encuentro"),
    (IntentTag::TeamsPlayed, r"equipos|donde jugaste|\bclub(e)?s\b"),
    (
        IntentTag::CurrentTeam,
        r"donde (juegas|jugas)|(juegas|jugas).*donde|equipo actual|ahora (juegas|jugas)|(juegas|jugas) ahora|en que equipo|actualmente|jugando ahora",
    ),
    (IntentTag::Age, r"edad|\banos\b|viejo|cumpleanos|cuando naciste"),
    (
        IntentTag::Nationality,
        r"nacionalidad|de donde (eres|sos)|donde naciste|\bpais\b|argentino",
    ),
    (IntentTag::Records, r"record|\bmarcas?\b|logro|mejor jugador|hazana"),
    (IntentTag::DataSource, r"actualiza|fuente|de donde (sacas|salen)"),
    (
        IntentTag::Greeting,
        r"\b(hola|buenas|buen dia|hey|saludos|que tal|como estas|como andas)\b",
    ),
    (IntentTag::Thanks, r"\b(gracias|gracia|thx|thanks|thank you)\b"),
    (IntentTag::Goodbye, r"\b(chau|adios|bye|hasta luego|nos vemos)\b"),
    (IntentTag::Help, r"ayuda|help|que puedo preguntar|que sabes"),
];

const COMPETITION_PATTERNS: &[(Competition, &str)] = &[
    (Competition::WorldCup, r"mundial|world cup|copa del mundo|\bqatar\b"),
    (
        Competition::ChampionsLeague,
        r"champions|orejona|copa de europa|\buefa\b",
    ),
    (Competition::CopaAmerica, r"copas? america"),
    (Competition::LeaguesCup, r"leagues cup"),
    (Competition::SupportersShield, r"supporters|shield"),
    (Competition::Ligue1, r"ligue|liga (de )?franc"),
    (Competition::LaLiga, r"\bla liga\b|\bligas?\b"),
];

const TEAM_PATTERNS: &[(&str, &str)] = &[
    (
        "barcelona",
        r"barcelona|\bbarca\b|\bbarsa\b|\bcule\b|blaugrana",
    ),
    ("psg", r"\bpsg\b|paris|saint.germain"),
    ("inter_miami", r"miami|\bmls\b"),
    ("argentina", r"argentina|seleccion|albiceleste"),
];

const GOAL_KEYWORD: &str = r"\bgol";
// A competition name next to one of these asks for a count, not for trophies.
const STAT_KEYWORDS: &str = r"\bgol|partido|encuentro|asistencia";

pub struct IntentRule {
    pub tag: IntentTag,
    accepts: Box<dyn Fn(&Utterance) -> bool + Send + Sync>,
}

impl IntentRule {
    pub fn new(
        tag: IntentTag,
        accepts: impl Fn(&Utterance) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            tag,
            accepts: Box::new(accepts),
        }
    }

    pub fn pattern(tag: IntentTag, pattern: Regex) -> Self {
        Self::new(tag, move |u| pattern.is_match(&u.normalized))
    }

    pub fn accepts(&self, utterance: &Utterance) -> bool {
        (self.accepts)(utterance)
    }
}

impl fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentRule").field("tag", &self.tag).finish()
    }
}

#[derive(Debug, Clone)]
pub struct TeamRule {
    pub key: String,
    pattern: Regex,
}

impl TeamRule {
    pub fn new(key: impl Into<String>, pattern: Regex) -> Self {
        Self {
            key: key.into(),
            pattern,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompetitionRule {
    pub competition: Competition,
    pattern: Regex,
}

/// Ephemeral result of classifying one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub normalized: String,
    pub intent: Option<IntentTag>,
    pub team: Option<String>,
    pub competition: Option<Competition>,
    pub year: Option<u16>,
}

impl Analysis {
    pub fn is_unrecognized(&self) -> bool {
        self.intent.is_none() && self.team.is_none()
    }
}

#[derive(Debug)]
pub struct Classifier {
    intents: Vec<IntentRule>,
    teams: Vec<TeamRule>,
    competitions: Vec<CompetitionRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_intent_rules(), default_team_rules())
    }
}

impl Classifier {
    pub fn new(intents: Vec<IntentRule>, teams: Vec<TeamRule>) -> Self {
        Self {
            intents,
            teams,
            competitions: default_competition_rules(),
        }
    }

    /// Default rules plus an alias rule for every document team the built-in table misses,
    /// matched by its key (underscores as spaces) or its display name.
    pub fn for_document(doc: &StatsDocument) -> Self {
        let mut classifier = Self::default();
        for (key, team) in &doc.teams {
            if classifier.teams.iter().any(|rule| &rule.key == key) {
                continue;
            }
            let mut aliases = vec![normalize_text(&key.replace('_', " "))];
            let name = normalize_text(&team.name);
            if !name.is_empty() && !aliases.contains(&name) {
                aliases.push(name);
            }
            let pattern = aliases
                .iter()
                .filter(|alias| !alias.is_empty())
                .map(|alias| format!(r"\b{}\b", regex::escape(alias)))
                .collect::<Vec<_>>()
                .join("|");
            if pattern.is_empty() {
                continue;
            }
            if let Ok(re) = Regex::new(&pattern) {
                classifier.teams.push(TeamRule::new(key.clone(), re));
            }
        }
        classifier
    }

    pub fn intent_order(&self) -> Vec<IntentTag> {
        self.intents.iter().map(|rule| rule.tag).collect()
    }

    pub fn team_order(&self) -> Vec<&str> {
        self.teams.iter().map(|rule| rule.key.as_str()).collect()
    }

    pub fn classify(&self, text: &str) -> Analysis {
        self.analyze(&Utterance::new(text))
    }

    pub fn analyze(&self, utterance: &Utterance) -> Analysis {
        if utterance.is_blank() {
            return Analysis {
                normalized: String::new(),
                intent: None,
                team: None,
                competition: None,
                year: None,
            };
        }
        let intent = self
            .intents
            .iter()
            .find(|rule| rule.accepts(utterance))
            .map(|rule| rule.tag);
        let team = self
            .teams
            .iter()
            .find(|rule| rule.pattern.is_match(&utterance.normalized))
            .map(|rule| rule.key.clone());
        let competition = self
            .competitions
            .iter()
            .find(|rule| rule.pattern.is_match(&utterance.normalized))
            .map(|rule| rule.competition);
        Analysis {
            normalized: utterance.normalized.clone(),
            intent,
            team,
            competition,
            year: utterance.year,
        }
    }
}

pub fn default_intent_rules() -> Vec<IntentRule> {
    let goal = compile(GOAL_KEYWORD);
    let stat = compile(STAT_KEYWORDS);
    let any_competition = compile(
        &COMPETITION_PATTERNS
            .iter()
            .map(|(_, p)| format!("(?:{p})"))
            .collect::<Vec<_>>()
            .join("|"),
    );
    let mut rules = Vec::with_capacity(IntentTag::ALL.len());
    for tag in IntentTag::ALL {
        let rule = match tag {
            IntentTag::TitlesSpecific => {
                let any_competition = any_competition.clone();
                let stat = stat.clone();
                IntentRule::new(tag, move |u| {
                    any_competition.is_match(&u.normalized) && !stat.is_match(&u.normalized)
                })
            }
            IntentTag::GoalsYear => {
                let goal = goal.clone();
                IntentRule::new(tag, move |u| u.year.is_some() && goal.is_match(&u.normalized))
            }
            _ => {
                let Some((_, pattern)) = INTENT_PATTERNS.iter().find(|(t, _)| *t == tag) else {
                    continue;
                };
                IntentRule::pattern(tag, compile(pattern))
            }
        };
        rules.push(rule);
    }
    rules
}

pub fn default_team_rules() -> Vec<TeamRule> {
    TEAM_PATTERNS
        .iter()
        .map(|(key, pattern)| TeamRule::new(*key, compile(pattern)))
        .collect()
}

fn default_competition_rules() -> Vec<CompetitionRule> {
    COMPETITION_PATTERNS
        .iter()
        .map(|(competition, pattern)| CompetitionRule {
            competition: *competition,
            pattern: compile(pattern),
        })
        .collect()
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern should compile")
}
