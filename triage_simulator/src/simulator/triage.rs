use triage_shared::ColorCode;

/// Round-robin color assignment applied when triage completes.
///
/// Cycles WHITE -> YELLOW -> RED -> WHITE. The rotation starts as if RED had
/// just been handed out, so the first triaged patient is WHITE.
#[derive(Debug, Clone)]
pub struct ColorRotation {
    last: ColorCode,
}

impl Default for ColorRotation {
    fn default() -> Self {
        Self { last: ColorCode::Red }
    }
}

impl ColorRotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit and return the next color.
    pub fn next(&mut self) -> ColorCode {
        self.last = match self.last {
            ColorCode::White => ColorCode::Yellow,
            ColorCode::Yellow => ColorCode::Red,
            _ => ColorCode::White,
        };
        self.last
    }

    pub fn last(&self) -> ColorCode {
        self.last
    }
}
