use std::sync::mpsc::Sender;

use crate::state::{
    AppState, Delta, MISSING_SELECTION_MSG, MIN_QUERY_CHARS, Phase, PlayerSearchResult,
    ProviderCommand, SIMULATION_FAILED_MSG, Team, apply_delta,
};

/// Owns the view state and turns user intents into provider commands.
///
/// Nothing here blocks: every method mutates state synchronously and queues
/// at most one command for the provider thread.
pub struct FitController {
    pub state: AppState,
    cmd_tx: Option<Sender<ProviderCommand>>,
}

impl FitController {
    pub fn new(cmd_tx: Option<Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            cmd_tx,
        }
    }

    pub fn init(&mut self) {
        self.state.teams_loading = true;
        if !self.dispatch(ProviderCommand::FetchTeams) {
            self.state.teams_loading = false;
            self.state.push_log("[WARN] Team fetch unavailable");
        }
    }

    pub fn search_players(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.state.player_query = query.clone();
        // Any newer query invalidates responses still in flight.
        self.state.search_token += 1;

        if query.chars().count() < MIN_QUERY_CHARS {
            self.state.clear_players();
            return;
        }

        let token = self.state.search_token;
        if !self.dispatch(ProviderCommand::SearchPlayers { token, query }) {
            self.state.push_log("[WARN] Player search request failed");
        }
    }

    pub fn push_query_char(&mut self, c: char) {
        let mut query = self.state.player_query.clone();
        query.push(c);
        self.search_players(query);
    }

    pub fn pop_query_char(&mut self) {
        let mut query = self.state.player_query.clone();
        if query.pop().is_some() {
            self.search_players(query);
        }
    }

    pub fn select_player(&mut self, player: PlayerSearchResult) {
        self.state.player_query = player.full_name.clone();
        self.state.search_token += 1;
        self.state.clear_players();
        self.state
            .push_log(format!("[INFO] Player selected: {}", player.full_name));
        self.state.selected_player = Some(player);
    }

    pub fn select_highlighted_player(&mut self) {
        if let Some(player) = self.state.highlighted_player().cloned() {
            self.select_player(player);
        }
    }

    pub fn select_team(&mut self, team: Team) {
        self.state
            .push_log(format!("[INFO] Team selected: {}", team.full_name));
        self.state.selected_team = Some(team);
    }

    pub fn select_highlighted_team(&mut self) {
        if let Some(team) = self.state.highlighted_team().cloned() {
            self.select_team(team);
        }
    }

    pub fn simulate_fit(&mut self) {
        let selection = self
            .state
            .selected_player
            .as_ref()
            .zip(self.state.selected_team.as_ref())
            .map(|(player, team)| (player.id, team.id));
        let Some((player_id, team_id)) = selection else {
            self.state.error = Some(MISSING_SELECTION_MSG.to_string());
            self.state.phase = Phase::Error;
            return;
        };

        self.state.phase = Phase::Loading;
        self.state.error = None;
        self.state.simulation_result = None;
        self.state.result_scroll = 0;
        self.state.simulation_token += 1;
        let token = self.state.simulation_token;

        if self.dispatch(ProviderCommand::SimulateFit {
            token,
            player_id,
            team_id,
        }) {
            self.state.push_log(format!(
                "[INFO] Simulation #{token} sent (player {player_id}, team {team_id})"
            ));
        } else {
            self.state.push_log("[WARN] Simulation request failed");
            self.state.error = Some(SIMULATION_FAILED_MSG.to_string());
            self.state.phase = Phase::Error;
        }
    }

    pub fn apply(&mut self, delta: Delta) {
        apply_delta(&mut self.state, delta);
    }

    fn dispatch(&self, cmd: ProviderCommand) -> bool {
        match &self.cmd_tx {
            Some(tx) => tx.send(cmd).is_ok(),
            None => false,
        }
    }
}
