use crate::model::{DangerScore, PlayerProfile, ScoutResult, Tier};
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct PlayerRow {
    player: String,
    rank: String,
    role: String,
    #[tabled(rename = "recent")]
    recent: String,
    threat: String,
    playstyle: String,
}

#[derive(Tabled)]
struct BanRow {
    #[tabled(rename = "#")]
    rank: String,
    champion: String,
    player: String,
    role: String,
    score: String,
    reasons: String,
}

/// How our roster compares to the enemy, from `enemy / ours` threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Favourable,
    Even,
    Unfavourable,
}

pub fn comparison_verdict(ratio: f64) -> Verdict {
    if ratio < 0.8 {
        Verdict::Favourable
    } else if ratio > 1.2 {
        Verdict::Unfavourable
    } else {
        Verdict::Even
    }
}

/// `"Gold (1420)"`
pub fn elo_label(average_elo: i64) -> String {
    format!("{} ({})", Tier::from_rank_value(average_elo).label(), average_elo)
}

pub fn display_scout_result(result: &ScoutResult) {
    let title = match &result.team_name {
        Some(name) => format!("🛡️  Clash scouting report: {}", name),
        None => "🛡️  Scouting report".to_string(),
    };
    println!("\n{}", title.bold().cyan());
    println!("{}\n", "=".repeat(70).cyan());

    println!(
        "{} {}   {} {}",
        "Composition:".bold(),
        result.team_composition,
        "Average elo:".bold(),
        elo_label(result.average_elo)
    );

    display_players(&result.players);

    if !result.has_danger_data() {
        println!(
            "{}",
            "No ban recommendations available (not enough data)".yellow()
        );
        return;
    }

    display_bans("🚫 OPTIMAL BANS", &result.optimal_bans, 0);
    if !result.alternative_bans.is_empty() {
        display_bans("🔁 ALTERNATIVE BANS", &result.alternative_bans, result.optimal_bans.len());
    }

    if let Some(top) = result.optimal_bans.first() {
        println!("{}", "Top Priority Ban".bold().red());
        println!("  {}", ban_summary(top));
    }
    println!();
}

/// One-line explanation of a ban. Flex players already carry their role
/// breakdown in the reasons.
pub fn ban_summary(ban: &DangerScore) -> String {
    let is_flex = ban.reasons.iter().any(|r| r.starts_with("Flex: "));
    if is_flex {
        format!("{} on {}: {}", ban.champion_name, ban.player_name, ban.reasons.join(", "))
    } else {
        format!(
            "{} on {} ({}): {}",
            ban.champion_name,
            ban.player_name,
            ban.role_context,
            ban.reasons.join(", ")
        )
    }
}

fn display_players(players: &[PlayerProfile]) {
    let rows: Vec<PlayerRow> = players
        .iter()
        .map(|p| {
            let rank = p
                .solo_rank
                .as_ref()
                .map(|r| r.label())
                .unwrap_or_else(|| "Unranked".to_string());
            let recent = if p.recent_games == 0 {
                "-".to_string()
            } else {
                format!("{:.0}% WR, {:.2} KDA ({} g)", p.recent_winrate, p.recent_kda, p.recent_games)
            };
            let (threat, playstyle) = match &p.error {
                Some(error) => ("-".to_string(), error.red().to_string()),
                None => (format!("{:.1}", p.threat_score), p.playstyle.clone()),
            };
            PlayerRow {
                player: p.riot_id(),
                rank,
                role: p.main_role().unwrap_or("-").to_string(),
                recent,
                threat,
                playstyle,
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("\n{}\n", table);
}

fn display_bans(heading: &str, bans: &[DangerScore], offset: usize) {
    println!("{}", heading.bold().yellow());

    let rows: Vec<BanRow> = bans
        .iter()
        .enumerate()
        .map(|(idx, ban)| BanRow {
            rank: format!("#{}", offset + idx + 1),
            champion: ban.champion_name.clone(),
            player: ban.player_name.clone(),
            role: ban.role_context.clone(),
            score: score_cell(ban.total_score),
            reasons: ban.reasons.join(", "),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn score_cell(score: i64) -> String {
    let text = score.to_string();
    if score >= 100 {
        text.red().bold().to_string()
    } else if score >= 50 {
        text.yellow().to_string()
    } else {
        text
    }
}

pub fn display_comparison(ratio: f64) {
    println!("{}", "⚖️  TEAM COMPARISON".bold().cyan());
    let ratio_text = if ratio.is_finite() {
        format!("{:.2}", ratio)
    } else {
        "∞".to_string()
    };
    let verdict = match comparison_verdict(ratio) {
        Verdict::Favourable => "Favourable matchup".green(),
        Verdict::Even => "Even matchup".yellow(),
        Verdict::Unfavourable => "Unfavourable matchup".red(),
    };
    println!("  Enemy/our threat ratio: {} → {}\n", ratio_text, verdict);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
