use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Queries shorter than this (in chars) never reach the backend.
pub const MIN_QUERY_CHARS: usize = 2;
pub const MISSING_SELECTION_MSG: &str = "Selecione um jogador e um time.";
pub const SIMULATION_FAILED_MSG: &str = "Erro ao simular encaixe. Tente novamente.";

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSearchResult {
    pub id: u32,
    pub full_name: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub full_name: String,
    pub abbreviation: String,
    pub city: String,
}

/// Categorical verdict returned with every simulation.
///
/// The wire format is the plain label string. Labels outside the known set
/// are kept verbatim in `Other` so a newer backend never breaks decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FitLabel {
    FranchiseSavior,
    PerfectFit,
    Starter,
    SixthMan,
    RotationPlayer,
    Situational,
    BadFit,
    Redundant,
    Other(String),
}

impl FitLabel {
    pub const KNOWN: [FitLabel; 8] = [
        FitLabel::FranchiseSavior,
        FitLabel::PerfectFit,
        FitLabel::Starter,
        FitLabel::SixthMan,
        FitLabel::RotationPlayer,
        FitLabel::Situational,
        FitLabel::BadFit,
        FitLabel::Redundant,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw {
            "Franchise Savior" => FitLabel::FranchiseSavior,
            "Perfect Fit" => FitLabel::PerfectFit,
            "Starter" => FitLabel::Starter,
            "6th Man" => FitLabel::SixthMan,
            "Rotation Player" => FitLabel::RotationPlayer,
            "Situational" => FitLabel::Situational,
            "Bad Fit" => FitLabel::BadFit,
            "Redundant" => FitLabel::Redundant,
            other => FitLabel::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FitLabel::FranchiseSavior => "Franchise Savior",
            FitLabel::PerfectFit => "Perfect Fit",
            FitLabel::Starter => "Starter",
            FitLabel::SixthMan => "6th Man",
            FitLabel::RotationPlayer => "Rotation Player",
            FitLabel::Situational => "Situational",
            FitLabel::BadFit => "Bad Fit",
            FitLabel::Redundant => "Redundant",
            FitLabel::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FitLabel::Other(_))
    }
}

impl From<String> for FitLabel {
    fn from(raw: String) -> Self {
        FitLabel::parse(&raw)
    }
}

impl From<FitLabel> for String {
    fn from(label: FitLabel) -> Self {
        label.as_str().to_string()
    }
}

impl fmt::Display for FitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAnalysis {
    pub player_id: u32,
    pub player_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub archetypes: Vec<String>,
    #[serde(default)]
    pub is_ball_dominant: bool,
    #[serde(default)]
    pub is_elite_shooter: bool,
    #[serde(default)]
    pub is_defensive_anchor: bool,
    #[serde(default)]
    pub per: Option<f64>,
    #[serde(default)]
    pub estimated_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamNeeds {
    pub team_id: u32,
    pub team_name: String,
    #[serde(default)]
    pub needs: Vec<String>,
    #[serde(default)]
    pub style_alerts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConflict {
    pub conflict_type: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub penalty_points: i32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterFrictionResult {
    #[serde(default)]
    pub total_penalty: i32,
    #[serde(default)]
    pub conflicts: Vec<RosterConflict>,
    #[serde(default)]
    pub suggested_role: String,
    #[serde(default)]
    pub blocking_players: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub player_id: u32,
    pub player_name: String,
    pub team_id: u32,
    pub team_name: String,
    pub fit_score: f64,
    pub fit_label: FitLabel,
    #[serde(default)]
    pub estimated_minutes: f64,
    #[serde(default)]
    pub projected_role: String,
    #[serde(default)]
    pub player_archetypes: Vec<String>,
    #[serde(default)]
    pub team_needs_addressed: Vec<String>,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub breakdown: BTreeMap<String, f64>,
    #[serde(default)]
    pub player_analysis: Option<PlayerAnalysis>,
    #[serde(default)]
    pub team_needs: Option<TeamNeeds>,
    #[serde(default)]
    pub friction_result: Option<RosterFrictionResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Teams,
    Result,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub focus: Focus,
    pub player_query: String,
    pub players: Vec<PlayerSearchResult>,
    pub players_selected: usize,
    pub teams: Vec<Team>,
    pub teams_selected: usize,
    pub teams_loading: bool,
    pub selected_player: Option<PlayerSearchResult>,
    pub selected_team: Option<Team>,
    pub phase: Phase,
    pub simulation_result: Option<SimulationResult>,
    pub error: Option<String>,
    /// Latest issued search token; responses carrying an older one are dropped.
    pub search_token: u64,
    /// Latest issued simulation token; responses carrying an older one are dropped.
    pub simulation_token: u64,
    pub result_scroll: u16,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            focus: Focus::Search,
            player_query: String::new(),
            players: Vec::with_capacity(16),
            players_selected: 0,
            teams: Vec::with_capacity(32),
            teams_selected: 0,
            teams_loading: false,
            selected_player: None,
            selected_team: None,
            phase: Phase::Idle,
            simulation_result: None,
            error: None,
            search_token: 0,
            simulation_token: 0,
            result_scroll: 0,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn highlighted_player(&self) -> Option<&PlayerSearchResult> {
        self.players.get(self.players_selected)
    }

    pub fn highlighted_team(&self) -> Option<&Team> {
        self.teams.get(self.teams_selected)
    }

    pub fn select_next_player(&mut self) {
        if self.players.is_empty() {
            self.players_selected = 0;
            return;
        }
        self.players_selected = (self.players_selected + 1).min(self.players.len() - 1);
    }

    pub fn select_prev_player(&mut self) {
        self.players_selected = self.players_selected.saturating_sub(1);
    }

    pub fn select_next_team(&mut self) {
        if self.teams.is_empty() {
            self.teams_selected = 0;
            return;
        }
        self.teams_selected = (self.teams_selected + 1).min(self.teams.len() - 1);
    }

    pub fn select_prev_team(&mut self) {
        self.teams_selected = self.teams_selected.saturating_sub(1);
    }

    pub fn cycle_focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Search => Focus::Teams,
            Focus::Teams => Focus::Result,
            Focus::Result => Focus::Search,
        };
    }

    pub fn cycle_focus_prev(&mut self) {
        self.focus = match self.focus {
            Focus::Search => Focus::Result,
            Focus::Teams => Focus::Search,
            Focus::Result => Focus::Teams,
        };
    }

    pub fn scroll_result_down(&mut self) {
        if self.simulation_result.is_some() {
            self.result_scroll = self.result_scroll.saturating_add(1);
        }
    }

    pub fn scroll_result_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub fn clear_players(&mut self) {
        self.players.clear();
        self.players_selected = 0;
    }
}

/// Provider -> UI state updates.
#[derive(Debug, Clone)]
pub enum Delta {
    SetTeams(Vec<Team>),
    TeamsFailed(String),
    SetPlayers {
        token: u64,
        players: Vec<PlayerSearchResult>,
    },
    PlayersFailed {
        token: u64,
        error: String,
    },
    SimulationReady {
        token: u64,
        result: Box<SimulationResult>,
    },
    SimulationFailed {
        token: u64,
        error: String,
    },
    Log(String),
}

/// UI -> provider requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchTeams,
    SearchPlayers {
        token: u64,
        query: String,
    },
    SimulateFit {
        token: u64,
        player_id: u32,
        team_id: u32,
    },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetTeams(teams) => {
            state.teams_loading = false;
            state.push_log(format!("[INFO] Loaded {} teams", teams.len()));
            state.teams = teams;
            if state.teams_selected >= state.teams.len() {
                state.teams_selected = 0;
            }
        }
        Delta::TeamsFailed(error) => {
            state.teams_loading = false;
            state.push_log(format!("[WARN] Team load error: {error}"));
        }
        Delta::SetPlayers { token, players } => {
            if token != state.search_token {
                state.push_log(format!("[INFO] Dropped stale search response #{token}"));
                return;
            }
            state.players = players;
            state.players_selected = 0;
        }
        Delta::PlayersFailed { token, error } => {
            state.push_log(format!("[WARN] Player search error (#{token}): {error}"));
        }
        Delta::SimulationReady { token, result } => {
            if token != state.simulation_token {
                state.push_log(format!("[INFO] Dropped stale simulation #{token}"));
                return;
            }
            state.push_log(format!(
                "[INFO] Fit for {} at {}: {}",
                result.player_name, result.team_name, result.fit_label
            ));
            state.simulation_result = Some(*result);
            state.error = None;
            state.result_scroll = 0;
            state.phase = Phase::Success;
        }
        Delta::SimulationFailed { token, error } => {
            if token != state.simulation_token {
                state.push_log(format!("[INFO] Dropped stale simulation error #{token}"));
                return;
            }
            state.push_log(format!("[WARN] Fit simulation error: {error}"));
            state.error = Some(SIMULATION_FAILED_MSG.to_string());
            state.phase = Phase::Error;
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
