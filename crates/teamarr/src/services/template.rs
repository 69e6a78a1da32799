//! Builds the `{name}` variable dictionary used to render title, subtitle,
//! and description patterns, and resolves a template's ordered conditional
//! description list.
//!
//! Variables are drawn from three contexts — the current game (bare
//! names), the next scheduled game (`.next` suffix), and the most recently
//! completed game (`.last` suffix) — each contributing the same base set of
//! names. A missing context renders its suffixed variables as empty
//! strings rather than omitting them, so a pattern referencing `{team_score
//! .next}` never fails to substitute.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{DescriptionOption, Event};

/// Every variable name a single game context contributes, with no suffix.
/// Used both to render the current-game context and to seed empty values
/// for a missing `.next`/`.last` context.
const BASE_VARIABLE_NAMES: &[&str] = &[
    "home",
    "away",
    "home_score",
    "away_score",
    "team_name",
    "team_abbreviation",
    "team_location",
    "team_record",
    "team_rank",
    "team_streak",
    "team_score",
    "opponent_name",
    "opponent_abbreviation",
    "opponent_location",
    "opponent_score",
    "venue_name",
    "venue_city",
    "broadcast_list",
    "odds_spread",
    "odds_over_under",
    "odds_moneyline_home",
    "odds_moneyline_away",
    "is_home",
    "has_odds",
    "game_date",
    "day_of_week",
    "result_text",
    "final_score",
    "win_loss_margin",
    "overtime_suffix",
];

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z0-9_]+(?:\.(?:next|last))?)\}").expect("valid regex"));

#[derive(Debug, Default, Clone)]
pub struct VariableDictionary(HashMap<String, String>);

impl VariableDictionary {
    /// Builds the full dictionary from up to three game contexts. Each
    /// `Option<(event, is_home)>` is `None` when that context doesn't
    /// exist yet (no next game scheduled, no completed game yet).
    pub fn build(
        current: Option<(&Event, bool)>,
        next: Option<(&Event, bool)>,
        last: Option<(&Event, bool)>,
    ) -> Self {
        let mut vars = HashMap::new();
        merge_context(&mut vars, "", current);
        merge_context(&mut vars, ".next", next);
        merge_context(&mut vars, ".last", last);
        Self(vars)
    }

    /// Substitutes every `{name}` / `{name.next}` / `{name.last}`
    /// reference in `pattern`. An unrecognized placeholder is left as a
    /// literal empty string rather than erroring.
    pub fn render(&self, pattern: &str) -> String {
        PLACEHOLDER
            .replace_all(pattern, |caps: &regex::Captures| {
                self.0.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned()
    }
}

fn merge_context(vars: &mut HashMap<String, String>, suffix: &str, context: Option<(&Event, bool)>) {
    match context {
        Some((event, is_home)) => {
            for (name, value) in variables_for(event, is_home) {
                vars.insert(format!("{name}{suffix}"), value);
            }
        }
        None => {
            for name in BASE_VARIABLE_NAMES {
                vars.insert(format!("{name}{suffix}"), String::new());
            }
        }
    }
}

fn variables_for(event: &Event, is_home: bool) -> Vec<(&'static str, String)> {
    let (team, opponent) = if is_home {
        (&event.home_team, &event.away_team)
    } else {
        (&event.away_team, &event.home_team)
    };

    let result_text = match (team.score, opponent.score) {
        (Some(ours), Some(theirs)) if ours > theirs => "W".to_string(),
        (Some(ours), Some(theirs)) if ours < theirs => "L".to_string(),
        (Some(_), Some(_)) => "T".to_string(),
        _ => String::new(),
    };
    let final_score = match (team.score, opponent.score) {
        (Some(ours), Some(theirs)) => format!("{ours}-{theirs}"),
        _ => String::new(),
    };
    let win_loss_margin = match (team.score, opponent.score) {
        (Some(ours), Some(theirs)) => format!("{}", (ours - theirs).abs()),
        _ => String::new(),
    };
    let overtime_suffix = if event.status.detail.to_lowercase().contains("ot") {
        "OT".to_string()
    } else {
        String::new()
    };

    vec![
        ("home", event.home_team.name.clone()),
        ("away", event.away_team.name.clone()),
        ("home_score", event.home_team.score.map(|s| s.to_string()).unwrap_or_default()),
        ("away_score", event.away_team.score.map(|s| s.to_string()).unwrap_or_default()),
        ("team_name", team.name.clone()),
        ("team_abbreviation", team.abbreviation.clone()),
        ("team_location", team.location.clone()),
        ("team_record", team.record.clone().unwrap_or_default()),
        ("team_rank", team.rank.map(|r| r.to_string()).unwrap_or_default()),
        ("team_streak", team.streak.clone().unwrap_or_default()),
        ("team_score", team.score.map(|s| s.to_string()).unwrap_or_default()),
        ("opponent_name", opponent.name.clone()),
        ("opponent_abbreviation", opponent.abbreviation.clone()),
        ("opponent_location", opponent.location.clone()),
        ("opponent_score", opponent.score.map(|s| s.to_string()).unwrap_or_default()),
        ("venue_name", event.venue.as_ref().map(|v| v.name.clone()).unwrap_or_default()),
        (
            "venue_city",
            event
                .venue
                .as_ref()
                .and_then(|v| v.city.clone())
                .unwrap_or_default(),
        ),
        (
            "broadcast_list",
            event
                .broadcasts
                .iter()
                .map(|b| b.network.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        (
            "odds_spread",
            event
                .odds
                .as_ref()
                .and_then(|o| o.spread)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        ),
        (
            "odds_over_under",
            event
                .odds
                .as_ref()
                .and_then(|o| o.over_under)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        ),
        (
            "odds_moneyline_home",
            event
                .odds
                .as_ref()
                .and_then(|o| o.home_moneyline)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        ),
        (
            "odds_moneyline_away",
            event
                .odds
                .as_ref()
                .and_then(|o| o.away_moneyline)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        ),
        ("is_home", is_home.to_string()),
        ("has_odds", event.has_odds.to_string()),
        ("game_date", event.start_time.format("%A, %B %-d").to_string()),
        ("day_of_week", event.start_time.format("%A").to_string()),
        ("result_text", result_text),
        ("final_score", final_score),
        ("win_loss_margin", win_loss_margin),
        ("overtime_suffix", overtime_suffix),
    ]
}

/// Evaluates one description option's condition against the dictionary.
/// Supports a comparison (`name>=3`, `name==playoff`) or a bare boolean
/// flag name (true when the variable's value is the literal `"true"`).
fn evaluate_condition(condition: &str, vars: &VariableDictionary) -> bool {
    const OPERATORS: &[&str] = &[">=", "<=", "==", "!=", ">", "<"];

    for op in OPERATORS {
        if let Some(idx) = condition.find(op) {
            let (name, rhs) = (condition[..idx].trim(), condition[idx + op.len()..].trim());
            let value = vars.0.get(name).cloned().unwrap_or_default();
            return compare(&value, op, rhs);
        }
    }

    vars.0.get(condition.trim()).map(|v| v == "true").unwrap_or(false)
}

fn compare(lhs: &str, op: &str, rhs: &str) -> bool {
    if let (Ok(lhs_num), Ok(rhs_num)) = (lhs.parse::<f64>(), rhs.parse::<f64>()) {
        return match op {
            ">=" => lhs_num >= rhs_num,
            "<=" => lhs_num <= rhs_num,
            ">" => lhs_num > rhs_num,
            "<" => lhs_num < rhs_num,
            "==" => lhs_num == rhs_num,
            "!=" => lhs_num != rhs_num,
            _ => false,
        };
    }
    match op {
        "==" => lhs == rhs,
        "!=" => lhs != rhs,
        _ => false,
    }
}

/// Picks a description body from the template's ordered option list:
/// ascending priority, first true conditional wins; failing that, the
/// last unconditional (priority 100) fallback in the list, if any.
pub fn resolve_description(options: &[DescriptionOption], vars: &VariableDictionary) -> Option<String> {
    let mut conditionals: Vec<&DescriptionOption> = options.iter().filter(|o| !o.is_fallback()).collect();
    conditionals.sort_by_key(|o| o.priority);

    for option in conditionals {
        if let Some(condition) = &option.condition {
            if evaluate_condition(condition, vars) {
                return Some(option.body.clone());
            }
        }
    }

    options.iter().filter(|o| o.is_fallback()).last().map(|o| o.body.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventStatus, EventStatusState, Team};

    fn team(name: &str, score: Option<i32>) -> Team {
        Team {
            id: name.to_string(),
            provider: "espn".into(),
            name: name.to_string(),
            short_name: name.to_string(),
            abbreviation: name.chars().take(3).collect::<String>().to_uppercase(),
            location: "City".into(),
            league: "nfl".into(),
            logo: None,
            color: None,
            score,
            streak: None,
            record: Some("10-2".into()),
            rank: Some(5),
        }
    }

    fn event(home_score: Option<i32>, away_score: Option<i32>) -> Event {
        Event {
            id: "evt-1".into(),
            provider: "espn".into(),
            league: "nfl".into(),
            season: None,
            name: "Cowboys at Eagles".into(),
            short_name: "DAL @ PHI".into(),
            start_time: chrono::Utc::now(),
            status: EventStatus {
                state: EventStatusState::Final,
                detail: "Final".into(),
                period: None,
                clock: None,
            },
            home_team: team("Eagles", home_score),
            away_team: team("Cowboys", away_score),
            venue: None,
            broadcasts: vec![],
            odds: None,
            has_odds: false,
            competitions: None,
        }
    }

    #[test]
    fn missing_context_renders_suffixed_variables_empty() {
        let vars = VariableDictionary::build(Some((&event(None, None), true)), None, None);
        assert_eq!(vars.render("{team_name} next: {team_name.next}"), "Eagles next: ");
    }

    #[test]
    fn renders_result_text_and_final_score_from_home_perspective() {
        let vars = VariableDictionary::build(Some((&event(Some(24), Some(17)), true)), None, None);
        assert_eq!(vars.render("{result_text} {final_score}"), "W 24-17");
    }

    #[test]
    fn first_true_conditional_wins_over_later_ones() {
        let vars = VariableDictionary::build(Some((&event(Some(24), Some(17)), true)), None, None);
        let options = vec![
            DescriptionOption {
                priority: 1,
                condition: Some("is_home==true".into()),
                body: "Home game".into(),
            },
            DescriptionOption {
                priority: 2,
                condition: Some("has_odds==true".into()),
                body: "Odds available".into(),
            },
            DescriptionOption {
                priority: 100,
                condition: None,
                body: "Fallback".into(),
            },
        ];
        assert_eq!(resolve_description(&options, &vars), Some("Home game".into()));
    }

    #[test]
    fn last_fallback_wins_when_no_conditional_matches() {
        let vars = VariableDictionary::build(Some((&event(None, None), true)), None, None);
        let options = vec![
            DescriptionOption {
                priority: 1,
                condition: Some("has_odds==true".into()),
                body: "Odds".into(),
            },
            DescriptionOption {
                priority: 100,
                condition: None,
                body: "First fallback".into(),
            },
            DescriptionOption {
                priority: 100,
                condition: None,
                body: "Last fallback".into(),
            },
        ];
        assert_eq!(resolve_description(&options, &vars), Some("Last fallback".into()));
    }
}
