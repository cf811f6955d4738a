//! # Interactive Menu Module
//!
//! The numbered text menu. Each [`Menu`] is a table of `(label, Action)`
//! entries; the [`Shell`] prints the table, reads a selection and dispatches
//! it. The session is passed to every handler explicitly.
//!
//! ```text
//! Main ── Explore ── info / sample / missing chart / fill
//!     └── Analyze ── Listening behavior ── 5 analyses
//!                 ├── Temporal trends ──── 3 analyses
//!                 └── Interaction patterns 2 analyses
//! ```

use crate::session::{Analysis, Session};
use anyhow::Result;
use log::debug;
use std::io::{BufRead, Write};

/// Identifies one menu screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuId {
    Main,
    Explore,
    Analyze,
    Listening,
    Temporal,
    Interaction,
}

/// What a menu entry does when selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open(MenuId),
    Run(Analysis),
    ViewSample,
    FillMissing,
    Back,
    Exit,
}

/// A titled list of entries, numbered from 1.
#[derive(Debug, Clone)]
pub struct Menu {
    pub title: &'static str,
    pub entries: Vec<(&'static str, Action)>,
}

impl Menu {
    pub fn get(id: MenuId) -> Self {
        use Action::*;
        let (title, entries) = match id {
            MenuId::Main => (
                "Spotify History Analysis Menu:",
                vec![
                    ("Explore", Open(MenuId::Explore)),
                    ("Analyze", Open(MenuId::Analyze)),
                    ("Exit", Exit),
                ],
            ),
            MenuId::Explore => (
                "Explore Menu:",
                vec![
                    ("Information about the dataset", Run(Analysis::DatasetInfo)),
                    ("View sample of the dataset", ViewSample),
                    ("Use bar chart to visualize missing data", Run(Analysis::MissingValues)),
                    ("Fill missing values", FillMissing),
                    ("Go back", Back),
                ],
            ),
            MenuId::Analyze => (
                "Analyze Menu:",
                vec![
                    ("Listening behavior", Open(MenuId::Listening)),
                    ("Temporal trends", Open(MenuId::Temporal)),
                    ("Interaction patterns", Open(MenuId::Interaction)),
                    ("Back to Main Menu", Back),
                ],
            ),
            MenuId::Listening => (
                "Listening behavior Menu:",
                vec![
                    ("Total listening time by artist", Run(Analysis::ArtistListeningTime)),
                    ("Peak listening hours and days", Run(Analysis::PeakListeningTimes)),
                    ("Most played tracks/artist", Run(Analysis::MostPlayedArtists)),
                    ("Skip rate insight", Run(Analysis::SkipRates)),
                    ("Platform usage distribution", Run(Analysis::PlatformUsage)),
                    ("Back to Analyze Menu", Back),
                ],
            ),
            MenuId::Temporal => (
                "Temporal trends Menu:",
                vec![
                    ("Monthly/yearly listening patterns", Run(Analysis::ListeningPatterns)),
                    ("Hour of day listening frequency", Run(Analysis::HourlyListening)),
                    ("Year-over-year listening behavior changes", Run(Analysis::YearOverYear)),
                    ("Back to Analyze Menu", Back),
                ],
            ),
            MenuId::Interaction => (
                "Interaction patterns Menu:",
                vec![
                    ("Shuffle vs non-shuffle listening", Run(Analysis::ShuffleListening)),
                    ("Reason for track start/end", Run(Analysis::TrackStartEndReasons)),
                    ("Back to Analyze Menu", Back),
                ],
            ),
        };
        Self { title, entries }
    }

    /// Map a typed selection ("1", "2", ...) to its action.
    pub fn select(&self, choice: &str) -> Option<Action> {
        let index: usize = choice.trim().parse().ok()?;
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|(_, action)| *action)
    }

    fn print(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "\n{}", self.title)?;
        for (i, (label, _)) in self.entries.iter().enumerate() {
            writeln!(out, "{}. {label}", i + 1)?;
        }
        writeln!(out)
    }
}

/// How a submenu was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Back,
    Exit,
}

/// Reads selections from `input` and writes menus and reports to `output`.
pub struct Shell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run from the main menu until the user exits or input ends.
    pub fn run(&mut self, session: &mut Session) -> Result<()> {
        writeln!(self.output, "{}", "*".repeat(50))?;
        writeln!(self.output, "\tWelcome to Spotify History Analysis")?;
        writeln!(self.output, "{}", "*".repeat(50))?;
        writeln!(self.output, "\nThis tool will help you analyze your streaming history\n")?;

        self.run_menu(MenuId::Main, session)?;
        Ok(())
    }

    fn run_menu(&mut self, id: MenuId, session: &mut Session) -> Result<Flow> {
        let menu = Menu::get(id);
        loop {
            menu.print(&mut self.output)?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                debug!("Input closed in {id:?} menu");
                return Ok(Flow::Exit);
            };

            let Some(action) = menu.select(&choice) else {
                writeln!(self.output, "Invalid choice. Please try again.")?;
                continue;
            };
            debug!("{id:?} menu: {action:?}");

            match action {
                Action::Back => return Ok(Flow::Back),
                Action::Exit => {
                    writeln!(self.output, "Exiting...")?;
                    return Ok(Flow::Exit);
                }
                Action::Open(next) => {
                    let next = if next == MenuId::Analyze && session.needs_fill()? {
                        writeln!(self.output, "Missing values found. Please fill missing values first.")?;
                        MenuId::Explore
                    } else {
                        next
                    };
                    if self.run_menu(next, session)? == Flow::Exit {
                        return Ok(Flow::Exit);
                    }
                }
                Action::Run(analysis) => session.perform(analysis, &mut self.output)?,
                Action::ViewSample => self.view_sample(session)?,
                Action::FillMissing => {
                    writeln!(self.output, "\nFill missing values:\n")?;
                    if session.needs_fill()? {
                        session.fill_missing(&[])?;
                        writeln!(self.output, "Missing values filled successfully.")?;
                    } else {
                        writeln!(self.output, "No missing values found.")?;
                    }
                }
            }
        }
    }

    fn view_sample(&mut self, session: &Session) -> Result<()> {
        writeln!(self.output, "\nView data samples:")?;
        let Some(answer) = self.prompt("\nHow many samples to display: ")? else {
            return Ok(());
        };
        match answer.trim().parse::<usize>() {
            Ok(n) => session.show_sample(n, &mut self.output),
            Err(_) => {
                writeln!(self.output, "Invalid input. Please enter a number.")?;
                Ok(())
            }
        }
    }

    /// `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::history;
    use crate::config::RuntimeConfig;
    use crate::dataset::Dataset;
    use std::io::Cursor;

    fn run(script: &str, session: &mut Session) -> String {
        let mut shell = Shell::new(Cursor::new(script.to_string()), Vec::new());
        shell.run(session).unwrap();
        String::from_utf8(shell.into_output()).unwrap()
    }

    fn session() -> Session {
        Session::new(Dataset::with_all_columns(history()), RuntimeConfig::default())
    }

    #[test]
    fn test_select() {
        let menu = Menu::get(MenuId::Main);
        assert_eq!(menu.select("1"), Some(Action::Open(MenuId::Explore)));
        assert_eq!(menu.select(" 3 "), Some(Action::Exit));
        assert_eq!(menu.select("0"), None);
        assert_eq!(menu.select("4"), None);
        assert_eq!(menu.select("abc"), None);
    }

    #[test]
    fn test_every_menu_ends_with_a_way_out() {
        for id in [
            MenuId::Main,
            MenuId::Explore,
            MenuId::Analyze,
            MenuId::Listening,
            MenuId::Temporal,
            MenuId::Interaction,
        ] {
            let last = Menu::get(id).entries.last().map(|(_, a)| *a);
            assert!(matches!(last, Some(Action::Back | Action::Exit)), "{id:?}");
        }
    }

    #[test]
    fn test_exit() {
        let text = run("3\n", &mut session());
        assert!(text.contains("Welcome"));
        assert!(text.contains("Exiting..."));
    }

    #[test]
    fn test_invalid_choice() {
        let text = run("9\n3\n", &mut session());
        assert!(text.contains("Invalid choice. Please try again."));
    }

    #[test]
    fn test_analyze_requires_fill() {
        let mut session = session();
        // Analyze -> redirected to Explore -> fill -> back -> Analyze -> Listening -> skip rates
        let text = run("2\n4\n5\n2\n1\n4\n6\n4\n3\n", &mut session);

        assert!(text.contains("Missing values found. Please fill missing values first."));
        assert!(text.contains("Missing values filled successfully."));
        assert!(text.contains("Overall skip rate"));
        assert!(text.contains("Exiting..."));
        assert!(!session.needs_fill().unwrap());
    }

    #[test]
    fn test_sample_rejects_non_numbers() {
        let text = run("1\n2\nmany\n5\n3\n", &mut session());
        assert!(text.contains("Invalid input. Please enter a number."));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let text = run("1\n", &mut session());
        assert!(text.contains("Explore Menu:"));
    }
}
