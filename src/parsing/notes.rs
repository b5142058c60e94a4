use super::ChartError;
use crate::chart::{FootPart, HoldType, Note, NoteType, Row};
use crate::config::{DEFAULT_QUANTIZATION, MAX_QUANTIZATION};
use crate::stage::StageLayout;
use log::{info, warn};

/// Beats between consecutive rows for a chart written at `quantization`.
pub fn beats_per_row(quantization: u32) -> f32 {
    (MAX_QUANTIZATION as f32 / DEFAULT_QUANTIZATION as f32) / quantization.max(1) as f32
}

/// Parses annotated note text into rows.
///
/// Each line holds one note character per column followed by one foot-part
/// character for every note in the row, in column order. Columns inside an
/// open hold or roll get a synthesized body note, which also consumes a
/// foot-part character.
pub fn parse_stepchart(
    text: &str,
    quantization: u32,
    layout: &StageLayout,
) -> Result<Vec<Row>, ChartError> {
    let column_count = layout.column_count();
    let beat_step = beats_per_row(quantization);
    let mut column_holds = vec![HoldType::None; column_count];
    let mut rows: Vec<Row> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed == "," || trimmed.starts_with("//") {
            continue;
        }

        let chars: Vec<char> = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() < column_count {
            warn!("Could not parse chart line {}: '{}'", line_no + 1, trimmed);
            continue;
        }
        let (cells, placements) = chars.split_at(column_count);
        let mut placements = placements.iter();

        let mut notes = Vec::new();
        for (column, &ch) in cells.iter().enumerate() {
            let mut note_type = NoteType::from_char(ch);
            let mut hold_type = HoldType::None;

            if note_type == NoteType::None && column_holds[column] != HoldType::None {
                note_type = column_holds[column].body_note();
                hold_type = column_holds[column];
            }
            if note_type == NoteType::None {
                continue;
            }

            let foot_part = placements.next().map_or(FootPart::None, |&c| FootPart::from_char(c));

            match note_type {
                NoteType::HoldHead => {
                    hold_type = HoldType::HoldBody;
                    column_holds[column] = HoldType::HoldBody;
                }
                NoteType::RollHead => {
                    hold_type = HoldType::RollBody;
                    column_holds[column] = HoldType::RollBody;
                }
                NoteType::HoldTail => {
                    hold_type = column_holds[column];
                    column_holds[column] = HoldType::None;
                }
                _ => {}
            }

            notes.push(Note {
                note_type,
                hold_type,
                column,
                foot_part,
            });
        }

        let beat = rows.len() as f32 * beat_step + 1.0;
        rows.push(Row { notes, beat });
    }

    validate_rows(&rows, layout)?;
    info!("Parsed {} rows for '{}'.", rows.len(), layout.name);
    Ok(rows)
}

/// Reads rows produced elsewhere as JSON and checks them against the layout.
pub fn rows_from_json(json: &str, layout: &StageLayout) -> Result<Vec<Row>, ChartError> {
    let rows: Vec<Row> = serde_json::from_str(json)?;
    validate_rows(&rows, layout)?;
    info!("Loaded {} rows from JSON for '{}'.", rows.len(), layout.name);
    Ok(rows)
}

/// Every column must exist on the pad and each foot part may strike at most
/// one note per row.
pub fn validate_rows(rows: &[Row], layout: &StageLayout) -> Result<(), ChartError> {
    let column_count = layout.column_count();
    for (row_index, row) in rows.iter().enumerate() {
        let mut seen = [false; 4];
        for note in &row.notes {
            if note.column >= column_count {
                return Err(ChartError::ColumnOutOfRange {
                    row: row_index,
                    column: note.column,
                    column_count,
                });
            }
            if let Some(slot) = FootPart::ALL.iter().position(|&p| p == note.foot_part) {
                if seen[slot] {
                    return Err(ChartError::DuplicateFootPart {
                        row: row_index,
                        part: note.foot_part,
                    });
                }
                seen[slot] = true;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::layout_by_name;

    fn single() -> &'static StageLayout {
        layout_by_name("dance-single").unwrap()
    }

    #[test]
    fn parses_taps_with_foot_parts() {
        let rows = parse_stepchart("1001 LR\n0100L\n", 4, single()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].beat, 1.0);
        assert_eq!(rows[1].beat, 2.0);
        assert_eq!(rows[0].column_for(FootPart::LeftHeel), Some(0));
        assert_eq!(rows[0].column_for(FootPart::RightHeel), Some(3));
        assert_eq!(rows[1].notes.len(), 1);
        assert_eq!(rows[1].notes[0].column, 1);
    }

    #[test]
    fn skips_blank_comment_and_short_lines() {
        let text = "// measure 0\n\n1000L\n,\n10\n0001R\n";
        let rows = parse_stepchart(text, 4, single()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].beat, 2.0);
    }

    #[test]
    fn sixteenth_rows_are_a_quarter_beat_apart() {
        assert_eq!(beats_per_row(4), 1.0);
        assert_eq!(beats_per_row(16), 0.25);
        let rows = parse_stepchart("1000L\n0001R\n", 16, single()).unwrap();
        assert_eq!(rows[1].beat, 1.25);
    }

    #[test]
    fn holds_fill_body_rows_until_tail() {
        let text = "2000L\n0000L\n0001LR\n3000L\n1000L\n";
        let rows = parse_stepchart(text, 4, single()).unwrap();

        assert_eq!(rows[0].notes[0].note_type, NoteType::HoldHead);
        assert_eq!(rows[0].notes[0].hold_type, HoldType::HoldBody);

        let body = rows[1].note_at(0).unwrap();
        assert_eq!(body.note_type, NoteType::HoldBody);
        assert_eq!(body.foot_part, FootPart::LeftHeel);

        assert_eq!(rows[2].note_at(0).unwrap().note_type, NoteType::HoldBody);
        assert_eq!(rows[2].note_at(3).unwrap().foot_part, FootPart::RightHeel);

        let tail = rows[3].note_at(0).unwrap();
        assert_eq!(tail.note_type, NoteType::HoldTail);
        assert_eq!(tail.hold_type, HoldType::HoldBody);

        assert_eq!(rows[4].note_at(0).unwrap().note_type, NoteType::Tap);
    }

    #[test]
    fn rolls_become_roll_bodies() {
        let rows = parse_stepchart("0004R\n0000R\n0003R\n", 4, single()).unwrap();
        assert_eq!(rows[1].note_at(3).unwrap().note_type, NoteType::RollBody);
        assert_eq!(rows[2].note_at(3).unwrap().hold_type, HoldType::RollBody);
    }

    #[test]
    fn missing_placements_leave_notes_untagged() {
        let rows = parse_stepchart("1100L\n", 4, single()).unwrap();
        assert_eq!(rows[0].note_at(1).unwrap().foot_part, FootPart::None);
    }

    #[test]
    fn duplicate_foot_part_is_rejected() {
        let err = parse_stepchart("1100LL\n", 4, single()).unwrap_err();
        assert!(matches!(
            err,
            ChartError::DuplicateFootPart {
                row: 0,
                part: FootPart::LeftHeel
            }
        ));
    }

    #[test]
    fn out_of_range_column_is_rejected() {
        let json = r#"[{"notes":[{"note_type":"Tap","hold_type":"None","column":4,
            "foot_part":"LeftHeel"}],"beat":1.0}]"#;
        let err = rows_from_json(json, single()).unwrap_err();
        assert!(matches!(
            err,
            ChartError::ColumnOutOfRange {
                row: 0,
                column: 4,
                column_count: 4
            }
        ));
    }

    #[test]
    fn json_rows_load() {
        let json = r#"[{"notes":[{"note_type":"Tap","hold_type":"None","column":2,
            "foot_part":"RightHeel"}],"beat":3.5}]"#;
        let rows = rows_from_json(json, single()).unwrap();
        assert_eq!(rows[0].beat, 3.5);
        assert_eq!(rows[0].column_for(FootPart::RightHeel), Some(2));
        assert!(matches!(rows_from_json("not json", single()), Err(ChartError::Json(_))));
    }

    #[test]
    fn untagged_notes_may_repeat() {
        let rows = parse_stepchart("1111\n", 4, single()).unwrap();
        assert_eq!(rows[0].notes.len(), 4);
    }
}
