//! `/api/export/*` routes: download the results table, the throw history
//! or a full JSON dump of the current game.

use crate::export;
use crate::game::state::with_engine;
use crate::routes::util::{get_param, parse_query};

// ── GET /api/export/results ────────────────────────────────────────

pub fn handle_results_get(_query: &str) -> String {
    with_engine(|e| {
        let csv = export::results_csv(e.state(), &e.stats());
        let name = export::file_name("molkky-results", "csv", e.now());
        export::download_script(&csv, "text/csv", &name)
    })
}

// ── GET /api/export/history ────────────────────────────────────────

pub fn handle_history_get(_query: &str) -> String {
    with_engine(|e| {
        let csv = export::history_csv(e.state());
        let name = export::file_name("molkky-history", "csv", e.now());
        export::download_script(&csv, "text/csv", &name)
    })
}

// ── GET /api/export/json ───────────────────────────────────────────

/// Handle GET /api/export/json
/// `?raw=true` returns the JSON document itself instead of a download.
pub fn handle_json_get(query: &str) -> String {
    let params = parse_query(query);
    let raw = get_param(&params, "raw") == Some("true");
    with_engine(|e| {
        let now = e.now();
        let json = export::game_json(e.state(), &e.stats(), now);
        if raw {
            json
        } else {
            let name = export::file_name("molkky-game", "json", now);
            export::download_script(&json, "application/json", &name)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{reset_engine, with_engine_mut};

    fn seed() {
        reset_engine();
        with_engine_mut(|e| {
            let a = e.add_team("Hauki");
            let b = e.add_team("Ahven");
            e.add_player(a, "Aino");
            e.add_player(b, "Bo");
            e.start_game();
            e.record_score(9, Some(1));
        });
    }

    #[test]
    fn results_download() {
        seed();
        let html = handle_results_get("");
        assert!(html.contains("<script>"));
        assert!(html.contains("data:text/csv"));
        assert!(html.contains("molkky-results-"));
        reset_engine();
    }

    #[test]
    fn history_download() {
        seed();
        let html = handle_history_get("");
        assert!(html.contains("molkky-history-"));
        reset_engine();
    }

    #[test]
    fn raw_json() {
        seed();
        let json = handle_json_get("?raw=true");
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["gameState"]["teams"][0]["score"], 9);
        assert_eq!(v["gameState"]["history"][0]["pinsKnocked"], 1);
        assert!(handle_json_get("").contains("application/json"));
        reset_engine();
    }
}
