//! Text rendering of engine snapshots.
//!
//! [`Renderer`] turns an [`ArenaState`] into terminal-ready strings. It
//! never prints; the app decides whether a string goes to stdout, stderr
//! or the shared printer slot.
//!
//! Every rendered block ends with a newline.

use arena_runtime::engine::{BattleSlice, HistorySlice, ScoreboardSlice};
use arena_runtime::{ArenaState, VoteState};
use arena_types::{Battle, MessageStatus, Persona, Phase};
use std::fmt::Write;

const BOLD: &str = "1";
const DIM: &str = "2";
const RED: &str = "31";
const GREEN: &str = "32";
const YELLOW: &str = "33";
const CYAN: &str = "36";

/// REPL help block.
pub const HELP_TEXT: &str = "Commands:\n\
    \x20 <topic>                 - Start a free-for-all battle\n\
    \x20 @arena [matchup] <topic> - Start a battle with a matchup\n\
    \x20 /dethrone <topic>       - Challenge the current champ\n\
    \x20 :vote <persona>         - Vote on the finished battle (claude, gpt, gemini)\n\
    \x20 :open <n|id>            - Open a battle from history\n\
    \x20 :new                    - Clear the current battle\n\
    \x20 :scores                 - Show the scoreboard\n\
    \x20 :history                - Show recent battles\n\
    \x20 :refresh                - Reload scoreboard and history\n\
    \x20 :help                   - Show this help\n\
    \x20 :quit                   - Quit\n";

/// Formats engine state for the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    color: bool,
    verbose: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Renderer {
    #[must_use]
    pub const fn new(color: bool, verbose: bool) -> Self {
        Self { color, verbose }
    }

    /// Plain output without ANSI codes.
    #[must_use]
    pub const fn plain() -> Self {
        Self::new(false, false)
    }

    #[must_use]
    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1B[{code}m{text}\x1B[0m")
        } else {
            text.to_string()
        }
    }

    /// Champion, per-persona records and the streak.
    #[must_use]
    pub fn scoreboard(&self, slice: &ScoreboardSlice) -> String {
        let mut out = String::new();
        let champion = slice.champion();
        let _ = writeln!(
            out,
            "{} {} ({})  streak {}",
            self.paint(BOLD, "Champion:"),
            self.paint(YELLOW, champion.display_name()),
            champion.title(),
            slice.streak()
        );
        for persona in Persona::ALL {
            let record = slice.record(persona);
            let _ = writeln!(
                out,
                "  {:<8} {}-{}",
                persona.display_name(),
                record.wins,
                record.losses
            );
        }
        if slice.loading {
            let _ = writeln!(out, "{}", self.paint(DIM, "  (refreshing...)"));
        }
        if let Some(error) = &slice.error {
            let _ = writeln!(out, "{}", self.error(error).trim_end());
        }
        out
    }

    /// The battle slice: loading marker, error, or the battle itself.
    #[must_use]
    pub fn battle_slice(&self, slice: &BattleSlice) -> String {
        let mut out = String::new();
        if slice.loading {
            let _ = writeln!(out, "{}", self.paint(DIM, "Battle in progress..."));
        }
        if let Some(error) = &slice.error {
            out.push_str(&self.error(error));
        }
        match &slice.current {
            Some(battle) => out.push_str(&self.battle(battle)),
            None if out.is_empty() => {
                let _ = writeln!(out, "No battle yet. Type a topic to start one.");
            }
            None => {}
        }
        out
    }

    /// Header, rounds in server order, winner and vote hint.
    #[must_use]
    pub fn battle(&self, battle: &Battle) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} [{}] {}",
            self.paint(BOLD, &format!("Battle {}", battle.id)),
            battle.matchup,
            battle.topic
        );
        if self.verbose {
            if let Some(created_at) = battle.created_at {
                let _ = writeln!(out, "{}", self.paint(DIM, &format!("  started {created_at}")));
            }
        }

        for round in &battle.rounds {
            let _ = writeln!(out, "{}", self.paint(CYAN, &phase_divider(round.phase)));
            for persona in Persona::ALL {
                let message = round.message(persona);
                // Absent entries mean the persona is not in this matchup.
                if message.status == MessageStatus::Idle && message.text.is_empty() {
                    continue;
                }
                let text = match message.status {
                    MessageStatus::Ready => message.text,
                    MessageStatus::Loading => self.paint(DIM, "(thinking...)"),
                    MessageStatus::Idle => self.paint(DIM, "(waiting)"),
                };
                let _ = writeln!(
                    out,
                    "  {}: {text}",
                    self.paint(BOLD, persona.display_name())
                );
            }
        }

        if let Some(winner) = battle.winner {
            let _ = writeln!(
                out,
                "{} {}",
                self.paint(BOLD, "Winner:"),
                self.paint(GREEN, winner.display_name())
            );
        } else if battle.is_votable() {
            let _ = writeln!(
                out,
                "{}",
                self.paint(DIM, "Vote with :vote <claude|gpt|gemini>")
            );
        }
        out
    }

    /// Recent battles, numbered from 1 as `:open` expects.
    #[must_use]
    pub fn history(&self, slice: &HistorySlice) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint(BOLD, "Recent battles:"));
        if slice.entries.is_empty() {
            let text = if slice.loading { "  (loading...)" } else { "  No battles yet." };
            let _ = writeln!(out, "{}", self.paint(DIM, text));
        }
        for (i, entry) in slice.entries.iter().enumerate() {
            let winner = entry
                .winner
                .map_or_else(|| "-".to_string(), |p| p.display_name().to_string());
            let _ = write!(
                out,
                "  {:>2}. {} [{}] winner: {winner}  {}",
                i + 1,
                entry.topic,
                entry.matchup,
                self.paint(DIM, &entry.id)
            );
            if self.verbose {
                let _ = write!(out, "  {}", entry.created_at.format("%Y-%m-%d %H:%M:%S"));
            }
            out.push('\n');
        }
        if let Some(error) = &slice.error {
            out.push_str(&self.error(error));
        }
        out
    }

    /// One line for the vote state, `None` while idle.
    #[must_use]
    pub fn vote(&self, vote: &VoteState) -> Option<String> {
        match vote {
            VoteState::Idle => None,
            VoteState::Submitting => Some(format!("{}\n", self.paint(DIM, "Submitting vote..."))),
            VoteState::Success { winner } => Some(format!(
                "{}\n",
                self.paint(GREEN, &format!("Vote recorded for {}.", winner.display_name()))
            )),
            VoteState::Error { message } => Some(self.error(&format!("Vote failed: {message}"))),
        }
    }

    #[must_use]
    pub fn error(&self, message: &str) -> String {
        format!("{} {message}\n", self.paint(RED, "Error:"))
    }

    /// Command feedback followed by the battle slice.
    #[must_use]
    pub fn command_outcome(&self, state: &ArenaState) -> String {
        match &state.command_error {
            Some(reason) => self.error(reason),
            None => self.battle_slice(&state.battle),
        }
    }
}

fn phase_divider(phase: Phase) -> String {
    format!("-- {} --", phase.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_client::testing::{battle, history_entry};
    use arena_types::{Message, Record, Round, Scoreboard};
    use std::collections::BTreeMap;

    #[test]
    fn plain_has_no_escape_codes() {
        let out = Renderer::plain().battle(&battle("b-1", "tabs"));
        assert!(!out.contains('\x1B'));
    }

    #[test]
    fn color_wraps_in_escape_codes() {
        let out = Renderer::new(true, false).error("boom");
        assert!(out.starts_with("\x1B[31m"));
        assert!(out.ends_with("boom\n"));
    }

    #[test]
    fn battle_lists_rounds_in_order() {
        let out = Renderer::plain().battle(&battle("b-1", "tabs"));
        let opening = out.find("-- Opening --").unwrap();
        let rebuttal = out.find("-- Rebuttal --").unwrap();
        let closer = out.find("-- Closer --").unwrap();
        assert!(opening < rebuttal && rebuttal < closer);
        assert!(out.starts_with("Battle b-1 [ffa] tabs\n"));
        assert!(out.contains("  Claude: claude on tabs\n"));
        assert!(out.contains("Vote with :vote"));
    }

    #[test]
    fn battle_shows_status_markers_and_skips_absent() {
        let mut messages = BTreeMap::new();
        messages.insert(
            Persona::Gpt,
            Message::Detailed {
                text: String::new(),
                status: MessageStatus::Loading,
            },
        );
        messages.insert(Persona::Claude, Message::Text("ready".into()));
        let mut b = battle("b-2", "t");
        b.rounds = vec![Round {
            phase: Phase::Opening,
            messages,
        }];

        let out = Renderer::plain().battle(&b);
        assert!(out.contains("  GPT: (thinking...)"));
        assert!(out.contains("  Claude: ready"));
        assert!(!out.contains("Gemini"));
        assert!(!out.contains("Vote with"));
    }

    #[test]
    fn winner_replaces_vote_hint() {
        let mut b = battle("b-3", "t");
        b.winner = Some(Persona::Gemini);
        let out = Renderer::plain().battle(&b);
        assert!(out.contains("Winner: Gemini"));
        assert!(!out.contains("Vote with"));
    }

    #[test]
    fn scoreboard_defaults_and_records() {
        let empty = Renderer::plain().scoreboard(&ScoreboardSlice::default());
        assert!(empty.starts_with("Champion: GPT (The Surgical Sniper)  streak 0"));
        assert!(empty.contains("  Gemini   0-0"));

        let mut records = BTreeMap::new();
        records.insert(Persona::Claude, Record { wins: 4, losses: 2 });
        let slice = ScoreboardSlice {
            data: Some(Scoreboard {
                champion: Some(Persona::Claude),
                records,
                streak: 3,
            }),
            loading: false,
            error: Some("Request failed with 500".into()),
        };
        let out = Renderer::plain().scoreboard(&slice);
        assert!(out.starts_with("Champion: Claude"));
        assert!(out.contains("streak 3"));
        assert!(out.contains("  Claude   4-2"));
        assert!(out.contains("Error: Request failed with 500"));
    }

    #[test]
    fn history_is_numbered_from_one() {
        let slice = HistorySlice {
            entries: vec![history_entry("new", 2), history_entry("old", 1)],
            ..HistorySlice::default()
        };
        let out = Renderer::plain().history(&slice);
        assert!(out.contains("   1. topic new [ffa] winner: -  new\n"));
        assert!(out.contains("   2. topic old"));
        assert!(!out.contains("1970"));

        let verbose = Renderer::new(false, true).history(&slice);
        assert!(verbose.contains("1970-01-01 00:00:02"));
    }

    #[test]
    fn empty_history() {
        let out = Renderer::plain().history(&HistorySlice::default());
        assert!(out.contains("No battles yet."));
    }

    #[test]
    fn vote_lines() {
        let r = Renderer::plain();
        assert_eq!(r.vote(&VoteState::Idle), None);
        assert_eq!(
            r.vote(&VoteState::Success {
                winner: Persona::Claude
            })
            .as_deref(),
            Some("Vote recorded for Claude.\n")
        );
        assert_eq!(
            r.vote(&VoteState::Error {
                message: "nope".into()
            })
            .as_deref(),
            Some("Error: Vote failed: nope\n")
        );
    }

    #[test]
    fn command_outcome_prefers_command_error() {
        let state = ArenaState {
            command_error: Some("Add a topic after /dethrone.".into()),
            ..ArenaState::default()
        };
        assert_eq!(
            Renderer::plain().command_outcome(&state),
            "Error: Add a topic after /dethrone.\n"
        );

        let empty = Renderer::plain().command_outcome(&ArenaState::default());
        assert!(empty.contains("No battle yet"));
    }
}
