//! Mölkky score tracker, compiled to WASM and hosted in a Web Worker.
//!
//! Exports `handle_request(method, path, query, body)` for the page bridge
//! to call. Uses `matchit` for URL routing, the same router engine that
//! powers Axum. Responses are JSON (state views, stats, rules, errors) or,
//! for exports, a `<script>` that triggers the download.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod export;
pub mod game;
pub mod logging;
pub mod routes;

/// Install logging and the panic hook. Call once after the module loads.
#[wasm_bindgen]
pub fn init() {
    logging::init();
    tracing::info!("molkky engine ready");
}

/// Process an HTTP-like request and return the response body.
///
/// # Arguments
/// * `method` : HTTP method ("GET" or "POST")
/// * `path`   : URL path (e.g., "/api/game/score")
/// * `query`  : Query string (e.g., "?raw=true")
/// * `body`   : Request body (form data, or JSON for the config route).
///   Empty string for GET requests.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    // Build the router. matchit compiles route patterns into a radix tree.
    let mut router = matchit::Router::new();

    router.insert("/api/game/state", "game_state").ok();
    router.insert("/api/game/stats", "game_stats").ok();
    router.insert("/api/game/config", "game_config").ok();
    router.insert("/api/game/start", "game_start").ok();
    router.insert("/api/game/reset", "game_reset").ok();
    router.insert("/api/game/undo", "game_undo").ok();
    router.insert("/api/game/score", "game_score").ok();
    router.insert("/api/game/skip", "game_skip").ok();

    router.insert("/api/teams", "teams").ok();
    router.insert("/api/players", "players").ok();

    router.insert("/api/export/results", "export_results").ok();
    router.insert("/api/export/history", "export_history").ok();
    router.insert("/api/export/json", "export_json").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            ("game_state", "GET") => routes::game::handle_state_get(query),
            ("game_stats", "GET") => routes::game::handle_stats_get(query),
            ("game_config", "GET") => routes::game::handle_config_get(query),
            ("game_config", "POST") => routes::game::handle_config_post(body),
            ("game_start", "POST") => routes::game::handle_start_post(body),
            ("game_reset", "POST") => routes::game::handle_reset_post(body),
            ("game_undo", "POST") => routes::game::handle_undo_post(body),
            ("game_score", "POST") => routes::game::handle_score_post(body),
            ("game_skip", "POST") => routes::game::handle_skip_post(body),

            ("teams", "POST") => routes::roster::handle_teams_post(body),
            ("players", "POST") => routes::roster::handle_players_post(body),

            ("export_results", "GET") => routes::export::handle_results_get(query),
            ("export_history", "GET") => routes::export::handle_history_get(query),
            ("export_json", "GET") => routes::export::handle_json_get(query),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

fn not_found() -> String {
    r#"{"error":"404: route not found"}"#.to_string()
}

fn method_not_allowed() -> String {
    r#"{"error":"405: method not allowed"}"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{reset_engine, with_engine};

    #[test]
    fn returns_404_for_unknown_route() {
        let json = handle_request("GET", "/api/nonexistent", "", "");
        assert!(json.contains("404"));
    }

    #[test]
    fn returns_405_for_wrong_method() {
        let json = handle_request("POST", "/api/game/state", "", "");
        assert!(json.contains("405"));
        let json = handle_request("GET", "/api/game/score", "", "");
        assert!(json.contains("405"));
    }

    #[test]
    fn routes_game_state_get() {
        reset_engine();
        let json = handle_request("GET", "/api/game/state", "", "");
        assert!(json.contains(r#""gameStatus":"setup""#));
        assert!(json.contains(r#""canUndo":false"#));
    }

    #[test]
    fn full_game_through_router() {
        reset_engine();
        handle_request("POST", "/api/game/config", "", r#"{"cooldown_ms":0}"#);
        handle_request("POST", "/api/teams", "", "action=add&name=Hauki");
        handle_request("POST", "/api/teams", "", "action=add&name=Ahven");
        let ids: Vec<u64> = with_engine(|e| e.state().teams.iter().map(|t| t.id.0).collect());
        handle_request("POST", "/api/players", "", &format!("action=add&team={}&name=Aino", ids[0]));
        handle_request("POST", "/api/players", "", &format!("action=add&team={}&name=Bo", ids[1]));
        handle_request("POST", "/api/game/start", "", "");

        // Hauki: 12 ×4 = 48 then 2 = 50; Ahven misses twice then scores.
        for body in [
            "kind=single&pin=12", "kind=miss",
            "kind=single&pin=12", "kind=miss",
            "kind=single&pin=12", "kind=multi&count=3",
            "kind=single&pin=12", "kind=multi&count=3",
        ] {
            handle_request("POST", "/api/game/score", "", body);
        }
        let json = handle_request("POST", "/api/game/score", "", "kind=multi&count=2");
        assert!(json.contains(r#""gameStatus":"finished""#));
        assert!(json.contains(r#""winner":{"id":"#));
        assert!(json.contains(r#""name":"Hauki""#));

        let late = handle_request("POST", "/api/game/score", "", "kind=miss");
        assert!(late.contains("while the game is finished"));

        let csv = handle_request("GET", "/api/export/results", "", "");
        assert!(csv.contains("molkky-results-"));
        reset_engine();
    }
}
