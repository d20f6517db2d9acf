//! Answer-category colours.

use serde::{Serialize, Serializer};

use crate::domain::{ANSWER_APPROVE, ANSWER_DISAPPROVE};

/// 24-bit colour, serialised as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

pub const APPROVE_COLOR: Rgb = Rgb(0x4C, 0xAF, 0x50);
pub const DISAPPROVE_COLOR: Rgb = Rgb(0xE9, 0x1E, 0x63);

/// Cycled through for answers other than the two canonical ones.
pub const FALLBACK_PALETTE: [Rgb; 6] = [
    Rgb(0x21, 0x96, 0xF3),
    Rgb(0xFF, 0x98, 0x00),
    Rgb(0x9C, 0x27, 0xB0),
    Rgb(0x00, 0xBC, 0xD4),
    Rgb(0x79, 0x55, 0x48),
    Rgb(0x60, 0x7D, 0x8B),
];

/// Answer → colour mapping, fixed for the whole session so a category looks the
/// same in every chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMap {
    extra: Vec<String>,
}

impl ColorMap {
    /// Build from the dataset's answers in first-seen order.
    pub fn from_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extra: Vec<String> = Vec::new();
        for answer in answers {
            let answer = answer.as_ref();
            if is_canonical(answer) || extra.iter().any(|a| a == answer) {
                continue;
            }
            extra.push(answer.to_string());
        }
        Self { extra }
    }

    pub fn color(&self, answer: &str) -> Rgb {
        match answer {
            ANSWER_APPROVE => APPROVE_COLOR,
            ANSWER_DISAPPROVE => DISAPPROVE_COLOR,
            _ => {
                let slot = self
                    .extra
                    .iter()
                    .position(|a| a == answer)
                    .unwrap_or_else(|| self.extra.len() + stable_hash(answer));
                FALLBACK_PALETTE[slot % FALLBACK_PALETTE.len()]
            }
        }
    }
}

fn is_canonical(answer: &str) -> bool {
    answer == ANSWER_APPROVE || answer == ANSWER_DISAPPROVE
}

// FNV-1a; `DefaultHasher` is not guaranteed stable across releases.
fn stable_hash(s: &str) -> usize {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in s.bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    (h % FALLBACK_PALETTE.len() as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_answers_have_fixed_colors() {
        let map = ColorMap::default();
        assert_eq!(map.color("Approve").hex(), "#4CAF50");
        assert_eq!(map.color("Disapprove").hex(), "#E91E63");
    }

    #[test]
    fn extra_answers_cycle_through_the_palette() {
        let answers = ["Approve", "Unsure", "Disapprove", "Refused", "Unsure"];
        let map = ColorMap::from_answers(answers);
        assert_eq!(map.color("Unsure"), FALLBACK_PALETTE[0]);
        assert_eq!(map.color("Refused"), FALLBACK_PALETTE[1]);
        // Unknown answers still get a deterministic colour.
        assert_eq!(map.color("Other"), map.color("Other"));
    }
}
