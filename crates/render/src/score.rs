use runner_kernel::{FrameReport, Scoreboard};

/// Receives the scoreboard numbers whenever one of them changes.
pub trait ScoreDisplay {
    fn show(&mut self, board: &Scoreboard);
}

/// Formats the scoreboard as one text line.
#[derive(Debug, Default)]
pub struct TextScoreDisplay {
    line: String,
    updates: u32,
}

impl TextScoreDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last formatted line, empty before the first update.
    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn updates(&self) -> u32 {
        self.updates
    }

    pub fn format(board: &Scoreboard) -> String {
        format!(
            "Score: {}  Distance: {}m  High Score: {}  Best Distance: {}m",
            board.score, board.distance, board.high_score, board.high_distance
        )
    }
}

impl ScoreDisplay for TextScoreDisplay {
    fn show(&mut self, board: &Scoreboard) {
        self.line = Self::format(board);
        self.updates += 1;
    }
}

/// Forwards a scoreboard to its display only when it changed.
#[derive(Debug)]
pub struct ScoreboardWatcher<D> {
    display: D,
    last: Option<Scoreboard>,
}

impl<D: ScoreDisplay> ScoreboardWatcher<D> {
    pub fn new(display: D) -> Self {
        Self {
            display,
            last: None,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    /// Push `board` through if it differs from the last one shown. The first
    /// board is always shown. Returns whether the display was updated.
    pub fn observe(&mut self, board: Scoreboard) -> bool {
        if self.last == Some(board) {
            return false;
        }
        tracing::trace!(?board, "scoreboard changed");
        self.display.show(&board);
        self.last = Some(board);
        true
    }

    pub fn observe_report(&mut self, report: &FrameReport) -> bool {
        self.observe(report.scoreboard)
    }
}
