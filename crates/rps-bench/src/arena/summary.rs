use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use rps_core::AppInfo;
use rps_core::game::Side;

use super::MatchResult;

pub fn write_markdown(path: &Path, run_id: &str, results: &[MatchResult]) -> io::Result<()> {
    fs::write(path, render_markdown(run_id, results))
}

pub(crate) fn render_markdown(run_id: &str, results: &[MatchResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Match summary: {run_id}");
    let _ = writeln!(out, "_{} {}_", AppInfo::name(), AppInfo::version());
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "| Opponent | Rounds | Wins | Losses | Ties | Win rate | Leader | Winner | Top policy |"
    );
    let _ = writeln!(out, "|---|---:|---:|---:|---:|---:|---|---|---|");

    for result in results {
        let leader = side_label(result.leader);
        let winner = side_label(result.winner);
        let top = result
            .most_selected()
            .map(|(name, count)| format!("{name} ({count})"))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {:.3} | {} | {} | {} |",
            result.opponent,
            result.rounds,
            result.wins,
            result.losses,
            result.ties,
            result.win_rate(),
            leader,
            winner,
            top
        );
    }

    let rounds: usize = results.iter().map(|r| r.rounds).sum();
    let wins: u32 = results.iter().map(|r| r.wins).sum();
    let losses: u32 = results.iter().map(|r| r.losses).sum();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Totals: {rounds} rounds, {wins} wins, {losses} losses across {} matches.",
        results.len()
    );
    out
}

fn side_label(side: Option<Side>) -> String {
    side.map(|side| side.to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn result(opponent: &str, wins: u32, losses: u32, ties: u32) -> MatchResult {
        let mut selections = BTreeMap::new();
        selections.insert("mirror_switch:paper".to_string(), 7);
        selections.insert("counter_switch:paper".to_string(), 3);
        MatchResult {
            opponent: opponent.to_string(),
            rounds: (wins + losses + ties) as usize,
            wins,
            losses,
            ties,
            leader: match wins.cmp(&losses) {
                std::cmp::Ordering::Greater => Some(Side::Own),
                std::cmp::Ordering::Less => Some(Side::Opponent),
                std::cmp::Ordering::Equal => None,
            },
            winner: None,
            selections,
        }
    }

    #[test]
    fn renders_one_row_per_match() {
        let mut first = result("rocky", 9, 0, 1);
        first.winner = Some(Side::Own);
        let results = vec![first, result("wheel", 4, 4, 2), result("dealer", 2, 5, 3)];
        let md = render_markdown("smoke", &results);

        assert!(md.starts_with("# Match summary: smoke\n"));
        assert!(md.contains(&format!("_{} {}_", AppInfo::name(), AppInfo::version())));
        assert!(md.contains("| rocky | 10 | 9 | 0 | 1 | 0.900 | Own | Own | mirror_switch:paper (7) |"));
        assert!(md.contains("| wheel | 10 | 4 | 4 | 2 | 0.400 | - | - |"));
        assert!(md.contains("| dealer | 10 | 2 | 5 | 3 | 0.200 | Opponent | - |"));
        assert!(md.contains("Totals: 30 rounds, 15 wins, 9 losses across 3 matches."));
    }
}
