//! Read-only exports of a finished (or running) game: a results table, the
//! throw-by-throw history and a full JSON dump.
//!
//! Timestamps in exports are rendered in Japan Standard Time, the zone the
//! scoring sheets are kept in.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde_json::Value;

use crate::game::model::{EventAction, GameState};
use crate::game::stats::GameStats;

const JST_OFFSET_SECS: i32 = 9 * 3600;

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// `YYYY-MM-DD HH:MM:SS` in JST.
pub fn format_jst(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&jst()).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Quote every cell and join rows with `\n`.
fn to_csv(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One row per team with final score, totals and status.
pub fn results_csv(state: &GameState, stats: &GameStats) -> String {
    let mut rows = vec![
        [
            "Team Name",
            "Final Score",
            "Total Points Scored",
            "Successful Throws",
            "Misses",
            "Average Score",
            "Status",
        ]
        .map(String::from)
        .to_vec(),
    ];

    for team in &state.teams {
        let ts = stats.team_stats.iter().find(|s| s.team_id == team.id);
        let status = if team.is_eliminated {
            "Eliminated"
        } else if state.winner == Some(team.id) {
            "Winner"
        } else {
            "Active"
        };
        rows.push(vec![
            team.name.clone(),
            team.score.to_string(),
            ts.map_or(0, |s| s.total_points).to_string(),
            ts.map_or(0, |s| s.successful_throws).to_string(),
            ts.map_or(0, |s| s.miss_count).to_string(),
            format!("{:.2}", ts.map_or(0.0, |s| s.average_score)),
            status.to_string(),
        ]);
    }

    to_csv(&rows)
}

/// One row per logged throw, oldest first.
pub fn history_csv(state: &GameState) -> String {
    let mut rows = vec![
        [
            "Timestamp (JST)",
            "Team",
            "Player",
            "Action",
            "Points",
            "Hit Type",
        ]
        .map(String::from)
        .to_vec(),
    ];

    for event in &state.history {
        let team = state.find_team(event.team_id);
        let player = team.and_then(|t| t.find_player(event.player_id));
        let points = event.points.unwrap_or(0);

        let hit_type = match event.action {
            EventAction::Score if points > 0 => {
                if event.pins_knocked == Some(1) { "Single" } else { "Multi" }
            }
            EventAction::Miss => "Miss",
            _ => "",
        };

        rows.push(vec![
            format_jst(event.timestamp),
            team.map_or("Unknown Team", |t| t.name.as_str()).to_string(),
            player.map_or("Unknown Player", |p| p.name.as_str()).to_string(),
            event.action.label().to_string(),
            points.to_string(),
            hit_type.to_string(),
        ]);
    }

    to_csv(&rows)
}

/// Pretty JSON with stats, the full state (history timestamps in JST) and
/// the export time.
pub fn game_json(state: &GameState, stats: &GameStats, now: DateTime<Utc>) -> String {
    let mut state_value = serde_json::to_value(state).unwrap_or(Value::Null);
    if let Some(Value::Array(history)) = state_value.get_mut("history") {
        for (value, event) in history.iter_mut().zip(&state.history) {
            if let Some(obj) = value.as_object_mut() {
                obj.insert("timestamp".into(), Value::String(format_jst(event.timestamp)));
            }
        }
    }

    let export = serde_json::json!({
        "gameStats": stats,
        "gameState": state_value,
        "exportTime": format_jst(now),
    });
    serde_json::to_string_pretty(&export).unwrap_or_else(|_| "{}".to_string())
}

/// File name for an export, stamped with the UTC date.
pub fn file_name(prefix: &str, ext: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}-{}.{ext}", now.format("%Y-%m-%d"))
}

/// A `<script>` that hands `content` to the browser as a file download.
pub fn download_script(content: &str, mime: &str, file_name: &str) -> String {
    let encoded = STANDARD.encode(content.as_bytes());
    format!(
        r#"<script>
(function() {{
  var a = document.createElement('a');
  a.href = 'data:{mime};charset=utf-8;base64,{encoded}';
  a.download = '{file_name}';
  a.click();
  console.log('[molkky] exported {file_name}');
}})();
</script>"#
    )
}
