use std::collections::BTreeMap;

use fit_terminal::state::{
    AppState, Delta, FitLabel, Phase, PlayerSearchResult, SIMULATION_FAILED_MSG,
    SimulationResult, Team, apply_delta,
};

fn result_with_score(score: f64) -> SimulationResult {
    SimulationResult {
        player_id: 1,
        player_name: "LeBron James".to_string(),
        team_id: 100,
        team_name: "Lakers".to_string(),
        fit_score: score,
        fit_label: FitLabel::Starter,
        estimated_minutes: 32.0,
        projected_role: "Starter".to_string(),
        player_archetypes: vec!["Ball Dominant".to_string()],
        team_needs_addressed: vec!["Playmaking".to_string()],
        reasons: vec!["Bom encaixe".to_string()],
        warnings: Vec::new(),
        breakdown: BTreeMap::new(),
        player_analysis: None,
        team_needs: None,
        friction_result: None,
    }
}

fn player(id: u32, name: &str) -> PlayerSearchResult {
    PlayerSearchResult {
        id,
        full_name: name.to_string(),
        is_active: true,
    }
}

#[test]
fn set_teams_replaces_list_and_clears_loading() {
    let mut state = AppState::new();
    state.teams_loading = true;
    state.teams_selected = 5;

    apply_delta(
        &mut state,
        Delta::SetTeams(vec![Team {
            id: 1,
            full_name: "Los Angeles Lakers".to_string(),
            abbreviation: "LAL".to_string(),
            city: "Los Angeles".to_string(),
        }]),
    );

    assert!(!state.teams_loading);
    assert_eq!(state.teams.len(), 1);
    assert_eq!(state.teams_selected, 0);
}

#[test]
fn team_failure_is_logged_not_surfaced() {
    let mut state = AppState::new();
    state.teams_loading = true;

    apply_delta(&mut state, Delta::TeamsFailed("connection refused".to_string()));

    assert!(state.teams.is_empty());
    assert!(!state.teams_loading);
    assert!(state.error.is_none());
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.logs.back().is_some_and(|l| l.contains("[WARN] Team load error")));
}

#[test]
fn stale_search_response_is_dropped() {
    let mut state = AppState::new();
    state.search_token = 3;
    state.players = vec![player(9, "Current")];

    apply_delta(
        &mut state,
        Delta::SetPlayers {
            token: 2,
            players: vec![player(1, "Old")],
        },
    );
    assert_eq!(state.players, vec![player(9, "Current")]);

    apply_delta(
        &mut state,
        Delta::SetPlayers {
            token: 3,
            players: vec![player(1, "LeBron James")],
        },
    );
    assert_eq!(state.players.len(), 1);
    assert_eq!(state.players[0].full_name, "LeBron James");
}

#[test]
fn search_failure_keeps_results() {
    let mut state = AppState::new();
    state.search_token = 1;
    state.players = vec![player(1, "LeBron James")];

    apply_delta(
        &mut state,
        Delta::PlayersFailed {
            token: 1,
            error: "http 500".to_string(),
        },
    );

    assert_eq!(state.players.len(), 1);
    assert!(state.error.is_none());
}

#[test]
fn latest_simulation_wins_over_straggler() {
    let mut state = AppState::new();
    state.phase = Phase::Loading;
    state.simulation_token = 2;

    apply_delta(
        &mut state,
        Delta::SimulationReady {
            token: 2,
            result: Box::new(result_with_score(85.0)),
        },
    );
    apply_delta(
        &mut state,
        Delta::SimulationReady {
            token: 1,
            result: Box::new(result_with_score(12.0)),
        },
    );

    assert_eq!(state.phase, Phase::Success);
    let stored = state.simulation_result.as_ref().expect("result stored");
    assert_eq!(stored.fit_score, 85.0);
}

#[test]
fn stale_failure_does_not_override_loading() {
    let mut state = AppState::new();
    state.phase = Phase::Loading;
    state.simulation_token = 4;

    apply_delta(
        &mut state,
        Delta::SimulationFailed {
            token: 3,
            error: "timeout".to_string(),
        },
    );

    assert_eq!(state.phase, Phase::Loading);
    assert!(state.error.is_none());
}

#[test]
fn current_failure_sets_fixed_message() {
    let mut state = AppState::new();
    state.phase = Phase::Loading;
    state.simulation_token = 1;

    apply_delta(
        &mut state,
        Delta::SimulationFailed {
            token: 1,
            error: "http 500 Internal Server Error: boom".to_string(),
        },
    );

    assert_eq!(state.phase, Phase::Error);
    assert!(!state.is_loading());
    assert_eq!(state.error.as_deref(), Some(SIMULATION_FAILED_MSG));
    assert!(state.logs.iter().any(|l| l.contains("boom")));
}

#[test]
fn console_is_bounded() {
    let mut state = AppState::new();
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert!(state.logs.back().is_some_and(|l| l.ends_with("line 249")));
}
