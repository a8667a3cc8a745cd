use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsDocument {
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub data_source: Option<String>,
    pub career_totals: CareerTotals,
    #[serde(default)]
    pub teams: BTreeMap<String, TeamRecord>,
    #[serde(default)]
    pub individual_awards: BTreeMap<String, AwardDetail>,
    #[serde(default)]
    pub titles_detail: TitlesDetail,
    #[serde(default)]
    pub records: BTreeMap<String, String>,
    #[serde(default)]
    pub personal_info: PersonalInfo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CareerTotals {
    #[serde(default)]
    pub matches: u32,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub titles: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub matches: u32,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub titles: u32,
    #[serde(default)]
    pub goals_by_year: Option<BTreeMap<u16, u32>>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Shared shape of `individual_awards` and `titles_detail.by_competition` entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwardDetail {
    pub answer: String,
    #[serde(default)]
    pub years: Vec<u16>,
}

pub type CompetitionDetail = AwardDetail;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitlesDetail {
    #[serde(default)]
    pub by_competition: BTreeMap<String, CompetitionDetail>,
    #[serde(default)]
    pub major_titles_summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub current_team: Option<String>,
    #[serde(default)]
    pub birth_place: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalsField {
    Matches,
    Goals,
    Assists,
    Titles,
}

impl TotalsField {
    pub fn label(self) -> &'static str {
        match self {
            TotalsField::Matches => "matches",
            TotalsField::Goals => "goals",
            TotalsField::Assists => "assists",
            TotalsField::Titles => "titles",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalsMismatch {
    pub field: TotalsField,
    pub career: u32,
    pub team_sum: u32,
}

impl TeamRecord {
    /// Goals per match, `None` when no matches were played.
    pub fn goals_per_match(&self) -> Option<f64> {
        ratio(self.goals, self.matches)
    }

    fn period_start(&self) -> Option<u16> {
        self.period
            .split(|c: char| !c.is_ascii_digit())
            .find(|chunk| chunk.len() == 4)
            .and_then(|chunk| chunk.parse().ok())
    }
}

impl CareerTotals {
    pub fn goals_per_match(&self) -> Option<f64> {
        ratio(self.goals, self.matches)
    }
}

impl StatsDocument {
    /// Teams ordered by the first year of their period, key as tiebreak.
    pub fn teams_by_period(&self) -> Vec<(&str, &TeamRecord)> {
        let mut rows: Vec<(&str, &TeamRecord)> = self
            .teams
            .iter()
            .map(|(key, team)| (key.as_str(), team))
            .collect();
        rows.sort_by(|a, b| {
            let sa = a.1.period_start().unwrap_or(u16::MAX);
            let sb = b.1.period_start().unwrap_or(u16::MAX);
            sa.cmp(&sb).then(a.0.cmp(b.0))
        });
        rows
    }

    /// Goals scored in `year`, summed over every team that tracks that year.
    pub fn goals_in_year(&self, year: u16) -> Option<u32> {
        let mut found = false;
        let mut total = 0u32;
        for team in self.teams.values() {
            if let Some(goals) = team.goals_by_year.as_ref().and_then(|m| m.get(&year)) {
                found = true;
                total = total.saturating_add(*goals);
            }
        }
        found.then_some(total)
    }

    /// Year with the most goals across all teams; earliest year wins a tie.
    pub fn best_goal_year(&self) -> Option<(u16, u32)> {
        let mut per_year: BTreeMap<u16, u32> = BTreeMap::new();
        for by_year in self.teams.values().filter_map(|t| t.goals_by_year.as_ref()) {
            for (year, goals) in by_year {
                let slot = per_year.entry(*year).or_insert(0);
                *slot = slot.saturating_add(*goals);
            }
        }
        let mut best: Option<(u16, u32)> = None;
        for (year, goals) in per_year {
            if best.map(|(_, g)| goals > g).unwrap_or(true) {
                best = Some((year, goals));
            }
        }
        best
    }

    /// Compares `career_totals` against the sum over `teams`. The document is expected to
    /// agree with itself but nothing upstream guarantees it.
    pub fn totals_mismatches(&self) -> Vec<TotalsMismatch> {
        if self.teams.is_empty() {
            return Vec::new();
        }
        let totals = self.career_totals;
        let checks = [
            (TotalsField::Matches, totals.matches, self.team_sum(|t| t.matches)),
            (TotalsField::Goals, totals.goals, self.team_sum(|t| t.goals)),
            (TotalsField::Assists, totals.assists, self.team_sum(|t| t.assists)),
            (TotalsField::Titles, totals.titles, self.team_sum(|t| t.titles)),
        ];
        checks
            .into_iter()
            .filter(|(_, career, team_sum)| career != team_sum)
            .map(|(field, career, team_sum)| TotalsMismatch {
                field,
                career,
                team_sum,
            })
            .collect()
    }

    fn team_sum(&self, field: fn(&TeamRecord) -> u32) -> u32 {
        self.teams
            .values()
            .map(field)
            .fold(0u32, |acc, v| acc.saturating_add(v))
    }
}

fn ratio(num: u32, den: u32) -> Option<f64> {
    if den == 0 {
        return None;
    }
    Some(num as f64 / den as f64)
}
