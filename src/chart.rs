use crate::feet::Side;
use serde::{Deserialize, Serialize};

/// Note kinds as they appear in an annotated chart row.
///
/// `HoldBody`/`RollBody` never appear in the raw text; the row producer
/// synthesizes them for every row a hold or roll stays active in its column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteType {
    None,
    Tap,
    HoldHead,
    HoldTail,
    RollHead,
    Mine,
    HoldBody,
    RollBody,
}

impl NoteType {
    pub fn from_char(ch: char) -> Self {
        match ch {
            '1' => NoteType::Tap,
            '2' => NoteType::HoldHead,
            '3' => NoteType::HoldTail,
            '4' => NoteType::RollHead,
            'M' => NoteType::Mine,
            'H' => NoteType::HoldBody,
            'R' => NoteType::RollBody,
            _ => NoteType::None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            NoteType::None => '0',
            NoteType::Tap => '1',
            NoteType::HoldHead => '2',
            NoteType::HoldTail => '3',
            NoteType::RollHead => '4',
            NoteType::Mine => 'M',
            NoteType::HoldBody => 'H',
            NoteType::RollBody => 'R',
        }
    }

    /// True for the rows of a sustained note after its head, where the foot
    /// is expected to stay planted.
    #[inline(always)]
    pub fn is_hold_continuation(self) -> bool {
        matches!(self, NoteType::HoldBody | NoteType::RollBody | NoteType::HoldTail)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoldType {
    None,
    HoldBody,
    RollBody,
}

impl HoldType {
    /// The body note a hold of this kind fills empty cells with.
    pub fn body_note(self) -> NoteType {
        match self {
            HoldType::None => NoteType::None,
            HoldType::HoldBody => NoteType::HoldBody,
            HoldType::RollBody => NoteType::RollBody,
        }
    }
}

/// Which part of which foot strikes a note.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FootPart {
    None,
    LeftHeel,
    LeftToe,
    RightHeel,
    RightToe,
}

impl FootPart {
    pub const ALL: [FootPart; 4] = [
        FootPart::LeftHeel,
        FootPart::LeftToe,
        FootPart::RightHeel,
        FootPart::RightToe,
    ];

    pub fn from_char(ch: char) -> Self {
        match ch {
            'L' => FootPart::LeftHeel,
            'l' => FootPart::LeftToe,
            'R' => FootPart::RightHeel,
            'r' => FootPart::RightToe,
            _ => FootPart::None,
        }
    }

    pub fn is_toe(self) -> bool {
        matches!(self, FootPart::LeftToe | FootPart::RightToe)
    }

    /// Which foot this part belongs to; `None` for untagged notes.
    pub fn side(self) -> Option<Side> {
        match self {
            FootPart::LeftHeel | FootPart::LeftToe => Some(Side::Left),
            FootPart::RightHeel | FootPart::RightToe => Some(Side::Right),
            FootPart::None => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub note_type: NoteType,
    pub hold_type: HoldType,
    pub column: usize,
    pub foot_part: FootPart,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub notes: Vec<Note>,
    pub beat: f32,
}

impl Row {
    pub fn note_at(&self, column: usize) -> Option<&Note> {
        self.notes.iter().find(|n| n.column == column)
    }

    /// Column struck by the given foot part this row, if any.
    pub fn column_for(&self, part: FootPart) -> Option<usize> {
        if part == FootPart::None {
            return None;
        }
        self.notes.iter().find(|n| n.foot_part == part).map(|n| n.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(column: usize, note_type: NoteType, foot_part: FootPart) -> Note {
        Note {
            note_type,
            hold_type: HoldType::None,
            column,
            foot_part,
        }
    }

    #[test]
    fn note_chars_round_trip_for_chart_alphabet() {
        for ch in ['0', '1', '2', '3', '4', 'M', 'H', 'R'] {
            assert_eq!(NoteType::from_char(ch).as_char(), ch);
        }
        assert_eq!(NoteType::from_char('F'), NoteType::None);
    }

    #[test]
    fn hold_continuation_set() {
        assert!(NoteType::HoldBody.is_hold_continuation());
        assert!(NoteType::RollBody.is_hold_continuation());
        assert!(NoteType::HoldTail.is_hold_continuation());
        assert!(!NoteType::HoldHead.is_hold_continuation());
        assert!(!NoteType::RollHead.is_hold_continuation());
        assert!(!NoteType::Tap.is_hold_continuation());
    }

    #[test]
    fn foot_part_chars_are_case_sensitive() {
        assert_eq!(FootPart::from_char('L'), FootPart::LeftHeel);
        assert_eq!(FootPart::from_char('l'), FootPart::LeftToe);
        assert_eq!(FootPart::from_char('R'), FootPart::RightHeel);
        assert_eq!(FootPart::from_char('r'), FootPart::RightToe);
        assert_eq!(FootPart::from_char('x'), FootPart::None);
        assert!(FootPart::LeftToe.is_toe());
        assert!(!FootPart::RightHeel.is_toe());
    }

    #[test]
    fn foot_parts_belong_to_one_side() {
        assert_eq!(FootPart::LeftHeel.side(), Some(Side::Left));
        assert_eq!(FootPart::LeftToe.side(), Some(Side::Left));
        assert_eq!(FootPart::RightHeel.side(), Some(Side::Right));
        assert_eq!(FootPart::RightToe.side(), Some(Side::Right));
        assert_eq!(FootPart::None.side(), None);
        let lefts = FootPart::ALL.iter().filter(|p| p.side() == Some(Side::Left)).count();
        assert_eq!(lefts, 2);
    }

    #[test]
    fn row_lookups_by_column_and_part() {
        let row = Row {
            notes: vec![
                note(0, NoteType::Tap, FootPart::LeftHeel),
                note(3, NoteType::HoldBody, FootPart::RightHeel),
            ],
            beat: 1.0,
        };
        assert_eq!(row.note_at(3).map(|n| n.note_type), Some(NoteType::HoldBody));
        assert!(row.note_at(1).is_none());
        assert_eq!(row.column_for(FootPart::LeftHeel), Some(0));
        assert_eq!(row.column_for(FootPart::LeftToe), None);
        assert_eq!(row.column_for(FootPart::None), None);
    }
}
