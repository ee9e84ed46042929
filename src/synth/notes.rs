/// Number of steps in each voice's table.
pub const NOTE_COUNT: usize = 5;

/// The two frequencies sounding together at one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotePair {
    pub voice1: f32,
    pub voice2: f32,
}

/// Two fixed, equally long frequency tables (Hz) walked in lockstep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteTable {
    voice1: [f32; NOTE_COUNT],
    voice2: [f32; NOTE_COUNT],
}

impl NoteTable {
    /// C2 E2 G2 B2 C3 under C3 E3 G3 B3 C4: a Cmaj7 arpeggio doubled an octave up.
    pub const DEFAULT: NoteTable = NoteTable {
        voice1: [65.41, 82.41, 98.0, 123.47, 130.81],
        voice2: [130.81, 164.81, 196.0, 246.94, 261.63],
    };

    /// Frequencies at `index`. Callers keep the index inside `0..NOTE_COUNT`.
    pub fn pair(&self, index: usize) -> NotePair {
        NotePair {
            voice1: self.voice1[index],
            voice2: self.voice2[index],
        }
    }
}

impl Default for NoteTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_endpoints() {
        let table = NoteTable::default();
        assert_eq!(NOTE_COUNT, 5);
        assert_eq!(
            table.pair(0),
            NotePair {
                voice1: 65.41,
                voice2: 130.81
            }
        );
        assert_eq!(
            table.pair(4),
            NotePair {
                voice1: 130.81,
                voice2: 261.63
            }
        );
    }
}
