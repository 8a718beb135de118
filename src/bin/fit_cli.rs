use anyhow::{Context, Result, bail};

use fit_terminal::config::{self, AppConfig};
use fit_terminal::fit_api::{FitService, HttpFitService};
use fit_terminal::labels::{
    analysis_summary, breakdown_rows, color_for_label, format_minutes, format_score,
};
use fit_terminal::state::SimulationResult;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Teams,
    Search(String),
    Simulate { player_id: u32, team_id: u32 },
}

fn main() -> Result<()> {
    config::load_dotenv();
    let cfg = AppConfig::from_env();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let command = parse_command(&args)?;
    let service = HttpFitService::new(&cfg.api_url)?;

    match command {
        Command::Teams => {
            let teams = service.list_teams().context("team list failed")?;
            for team in &teams {
                println!("{:>12}  {:<4} {}", team.id, team.abbreviation, team.full_name);
            }
            println!("Teams: {}", teams.len());
        }
        Command::Search(name) => {
            let players = service
                .search_players(&name)
                .with_context(|| format!("player search for {name:?} failed"))?;
            if players.is_empty() {
                println!("No players match {name:?}");
            }
            for player in players {
                let status = if player.is_active { "active" } else { "inactive" };
                println!("{:>10}  {} ({status})", player.id, player.full_name);
            }
        }
        Command::Simulate { player_id, team_id } => {
            let result = service
                .evaluate_fit(player_id, team_id)
                .context("fit simulation failed")?;
            for line in report_lines(&result) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn report_lines(result: &SimulationResult) -> Vec<String> {
    let mut out = vec![
        format!("{} -> {}", result.player_name, result.team_name),
        format!(
            "Verdict: {} ({})",
            result.fit_label,
            color_for_label(result.fit_label.as_str())
        ),
        format!("Score: {} / 100", format_score(result.fit_score)),
        format!("Minutes: {}", format_minutes(result.estimated_minutes)),
        format!("Role: {}", result.projected_role),
    ];
    if !result.player_archetypes.is_empty() {
        out.push(format!("Archetypes: {}", result.player_archetypes.join(", ")));
    }
    if !result.team_needs_addressed.is_empty() {
        out.push(format!(
            "Needs addressed: {}",
            result.team_needs_addressed.join(", ")
        ));
    }
    out.extend(result.reasons.iter().map(|r| format!(" + {r}")));
    out.extend(result.warnings.iter().map(|w| format!(" ! {w}")));
    for (name, value) in breakdown_rows(result) {
        out.push(format!("   {name:<24} {:>5}", format_score(value)));
    }
    if let Some(analysis) = &result.player_analysis {
        out.push(format!("Player analysis: {}", analysis_summary(analysis)));
    }
    if let Some(needs) = &result.team_needs {
        if !needs.needs.is_empty() {
            out.push(format!("Team needs: {}", needs.needs.join(", ")));
        }
        out.extend(needs.style_alerts.iter().map(|a| format!(" ~ {a}")));
    }
    if let Some(friction) = &result.friction_result {
        if !friction.conflicts.is_empty() {
            out.push(format!("Roster friction: -{} pts", friction.total_penalty));
        }
        if !friction.suggested_role.is_empty() {
            out.push(format!("Suggested role: {}", friction.suggested_role));
        }
    }
    out
}

fn parse_command(args: &[String]) -> Result<Command> {
    let Some(first) = args.first() else {
        bail!("usage: fit_cli --teams | --search <name> | --simulate <player_id> <team_id>");
    };
    match first.as_str() {
        "--teams" => Ok(Command::Teams),
        "--search" => {
            let name = args[1..].join(" ");
            if name.trim().is_empty() {
                bail!("--search needs a player name");
            }
            Ok(Command::Search(name.trim().to_string()))
        }
        "--simulate" => {
            let (Some(player), Some(team)) = (args.get(1), args.get(2)) else {
                bail!("--simulate needs <player_id> <team_id>");
            };
            let player_id = player
                .parse::<u32>()
                .with_context(|| format!("invalid player id {player:?}"))?;
            let team_id = team
                .parse::<u32>()
                .with_context(|| format!("invalid team id {team:?}"))?;
            Ok(Command::Simulate { player_id, team_id })
        }
        other => bail!("unknown argument {other:?}"),
    }
}
