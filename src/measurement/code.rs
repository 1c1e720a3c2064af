#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ranging code type of a signal, as described by the RINEX
/// observation code attribute (third letter of "C1C", "L5Q"..).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CodeType {
    /// Galileo E1A, E6A, IRNSS L5A
    A,
    /// Galileo E1B, E6B, IRNSS L5B
    B,
    /// GPS L1 C/A, GLONASS G1 C/A, Galileo E1C, QZSS L1C/A
    #[default]
    C,
    /// GPS L5 I, GLONASS G3 I, Galileo E5a+b I, BeiDou B1 I
    I,
    /// GPS L1C (P), L2C (L), QZSS L1C (P), L2C (L), LEX (L)
    L,
    /// GPS L1M, L2M
    M,
    /// GPS L1 codeless, L2 codeless
    N,
    /// GPS L1P, L2P, GLONASS G1P, G2P
    P,
    /// GPS L5 Q, GLONASS G3 Q, Galileo E5a+b Q, BeiDou B1 Q
    Q,
    /// GPS L1C (D), L2C (M), QZSS L1C (D), L2C (M), LEX (S)
    S,
    /// GPS L1 Z-tracking, L2 Z-tracking
    W,
    /// Combined tracking (D+P, I+Q, M+L, B+C)
    X,
    /// GPS L1Y, L2Y
    Y,
    /// Galileo E1 (A+B+C), E6 (A+B+C), QZSS L1-SAIF
    Z,
    /// Any other code, described by a free-text name
    Other,
}

impl CodeType {
    /// Every [CodeType] described by a single letter
    pub const LETTERS: [Self; 14] = [
        Self::A,
        Self::B,
        Self::C,
        Self::I,
        Self::L,
        Self::M,
        Self::N,
        Self::P,
        Self::Q,
        Self::S,
        Self::W,
        Self::X,
        Self::Y,
        Self::Z,
    ];

    /// Returns the single letter describing this [CodeType],
    /// None for [CodeType::Other].
    pub fn letter(&self) -> Option<&'static str> {
        match self {
            Self::A => Some("A"),
            Self::B => Some("B"),
            Self::C => Some("C"),
            Self::I => Some("I"),
            Self::L => Some("L"),
            Self::M => Some("M"),
            Self::N => Some("N"),
            Self::P => Some("P"),
            Self::Q => Some("Q"),
            Self::S => Some("S"),
            Self::W => Some("W"),
            Self::X => Some("X"),
            Self::Y => Some("Y"),
            Self::Z => Some("Z"),
            Self::Other => None,
        }
    }
}

impl std::fmt::Display for CodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.letter() {
            Some(letter) => write!(f, "{}", letter),
            None => write!(f, "other"),
        }
    }
}
