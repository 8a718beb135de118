use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::fit_api::FitService;
use crate::state::{Delta, ProviderCommand};

/// Dispatches every command onto its own worker so a slow call never holds up
/// the others. Stale answers are filtered by request token in `apply_delta`.
///
/// The dispatcher exits once the command channel closes; in-flight workers
/// finish their call and drop the answer if the UI is gone.
pub fn spawn_provider<S>(
    service: S,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()>
where
    S: FitService + Send + Sync + 'static,
{
    let service = Arc::new(service);
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let worker_service = Arc::clone(&service);
            let worker_tx = tx.clone();
            let spawned = thread::Builder::new()
                .name("fit-request".to_string())
                .spawn(move || {
                    let _ = worker_tx.send(handle_command(worker_service.as_ref(), cmd));
                });
            if let Err(err) = spawned {
                let _ = tx.send(Delta::Log(format!("[WARN] Request worker failed: {err}")));
            }
        }
    })
}

pub fn handle_command<S>(service: &S, cmd: ProviderCommand) -> Delta
where
    S: FitService + ?Sized,
{
    match cmd {
        ProviderCommand::FetchTeams => match service.list_teams() {
            Ok(teams) => Delta::SetTeams(teams),
            Err(err) => Delta::TeamsFailed(err.to_string()),
        },
        ProviderCommand::SearchPlayers { token, query } => match service.search_players(&query)
        {
            Ok(players) => Delta::SetPlayers { token, players },
            Err(err) => Delta::PlayersFailed {
                token,
                error: err.to_string(),
            },
        },
        ProviderCommand::SimulateFit {
            token,
            player_id,
            team_id,
        } => match service.evaluate_fit(player_id, team_id) {
            Ok(result) => Delta::SimulationReady {
                token,
                result: Box::new(result),
            },
            Err(err) => Delta::SimulationFailed {
                token,
                error: err.to_string(),
            },
        },
    }
}
