use crate::time::SimTime;
use serde::Serialize;
use std::fmt;

/// Stable handle for a patient: the index of its arrival slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PatientId(pub usize);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Triage color, doubling as the patient's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorCode {
    New,
    White,
    Yellow,
    Red,
    Treating,
    Out,
    Black,
}

impl ColorCode {
    /// Triaged and sitting in the waiting room.
    pub fn is_waiting(self) -> bool {
        matches!(self, ColorCode::White | ColorCode::Yellow | ColorCode::Red)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ColorCode::Out | ColorCode::Black)
    }

    /// Admission priority, higher first. `None` outside the waiting colors.
    pub fn priority(self) -> Option<u8> {
        match self {
            ColorCode::Red => Some(2),
            ColorCode::Yellow => Some(1),
            ColorCode::White => Some(0),
            _ => None,
        }
    }
}

impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorCode::New => "NEW",
            ColorCode::White => "WHITE",
            ColorCode::Yellow => "YELLOW",
            ColorCode::Red => "RED",
            ColorCode::Treating => "TREATING",
            ColorCode::Out => "OUT",
            ColorCode::Black => "BLACK",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Patient {
    pub id: PatientId,
    pub arrival: SimTime,
    pub color: ColorCode,
}

impl Patient {
    pub fn new(id: PatientId, arrival: SimTime) -> Self {
        Self {
            id,
            arrival,
            color: ColorCode::New,
        }
    }
}
