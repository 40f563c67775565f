// Line-oriented console front end: turns typed lines into controller input
// and pages into plain text.
//
//   #/stats        fragment change
//   ? chrono       set the search text
//   game 42        select a game
//   system 7       select a system
//   quit

use std::fmt::Write;

use gamecat_core::view::{GameRow, NavTab, Page};

use crate::controller::Input;

/// Parse one console line. `None` for blank or unknown lines.
pub fn parse_command(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.starts_with('#') {
        return Some(Input::Fragment(line.to_string()));
    }
    if let Some(query) = line.strip_prefix('?') {
        return Some(Input::Query(query.trim_start().to_string()));
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match word {
        "quit" | "q" => Some(Input::Quit),
        "game" => rest.trim().parse().ok().map(Input::SelectGame),
        "system" => rest.trim().parse().ok().map(Input::SelectSystem),
        _ => None,
    }
}

/// Render a page as plain text.
pub fn render_text(page: &Page) -> String {
    let mut out = String::new();
    match page {
        Page::Loading => out.push_str("...loading...\n"),
        Page::Error(message) => {
            let _ = writeln!(out, "ERROR\n{message}");
        }
        Page::NotFound => out.push_str("Not Found\n"),
        Page::List(view) => {
            out.push_str("Game Catalog\n");
            write_nav(&mut out, &view.nav);
            out.push_str("Choose System:\n");
            for entry in &view.chooser {
                let _ = writeln!(out, "  {}  {}", entry.href, entry.label);
            }
            match &view.system {
                Some(info) => {
                    let _ = write!(out, "{}", info.label);
                    if let Some(release) = &info.release {
                        let _ = write!(out, " | {release}");
                    }
                    if !info.comments.is_empty() {
                        let _ = write!(out, " | {}", info.comments);
                    }
                    out.push('\n');
                }
                None => out.push_str("No System. Showing all games.\n"),
            }
            write_games(&mut out, &view.games);
        }
        Page::Search(view) => {
            out.push_str("Search\n");
            write_nav(&mut out, &view.nav);
            let _ = writeln!(out, "Query: {}", view.query);
            if view.results.is_empty() {
                let _ = writeln!(out, "No Results yet for \"{}\"", view.query);
            } else {
                write_games(&mut out, &view.results);
            }
        }
        Page::Stats(view) => {
            out.push_str("Stats\n");
            write_nav(&mut out, &view.nav);
            let _ = writeln!(out, "{} Games", view.report.total_games);
            let _ = writeln!(out, "{} Systems", view.report.total_systems);
            out.push_str("Per System\n");
            for row in &view.report.per_system {
                let _ = writeln!(out, "  {}: {}", row.system.label(), row.count);
            }
        }
        Page::EditGame(view) => {
            out.push_str("Edit Game\n");
            write_nav(&mut out, &view.nav);
            let _ = writeln!(out, "Name: {}", view.game.name);
            let _ = writeln!(out, "System: {}", view.system.label());
            let _ = writeln!(out, "Comments: {}", view.game.comment);
            let _ = writeln!(out, "Release: {}", view.game.release);
            for flag in &view.flags {
                let mark = if flag.checked { "x" } else { " " };
                let _ = writeln!(out, "  [{mark}] {}", flag.label);
            }
        }
        Page::EditSystem(view) => {
            out.push_str("Edit System\n");
            write_nav(&mut out, &view.nav);
            if let Some(system) = &view.system {
                let _ = writeln!(out, "{}", system.label());
            }
        }
    }
    out
}

fn write_nav(out: &mut String, tabs: &[NavTab]) {
    let labels: Vec<String> = tabs
        .iter()
        .map(|t| {
            if t.active {
                format!("[{}]", t.label)
            } else {
                t.label.clone()
            }
        })
        .collect();
    let _ = writeln!(out, "{}", labels.join(" | "));
}

fn write_games(out: &mut String, games: &[GameRow]) {
    let _ = writeln!(out, "{} Games", games.len());
    for game in games {
        let mut cells = vec![game.name.clone()];
        cells.extend(game.release.clone());
        if !game.comment.is_empty() {
            cells.push(game.comment.clone());
        }
        cells.extend(game.system.clone());
        let badges: String = game.badges.iter().map(|b| b.to_string()).collect();
        if !badges.is_empty() {
            cells.push(badges);
        }
        let _ = writeln!(out, "  {}  ({})", cells.join(" | "), game.edit_href);
    }
}
