//! Error types for preset rendering and AIFF encoding.

use ariadne::{Config, Label, Report, ReportKind, Source};

/// Errors raised while loading presets, synthesizing, or writing audio.
#[derive(thiserror::Error, Debug)]
pub enum SynthError {
    /// The preset's `type` discriminant is neither `tone` nor `sequence`.
    #[error("Unknown preset type '{kind}' (preset '{name}')")]
    UnknownPresetType { kind: String, name: String },

    /// No preset with this name exists in the library.
    #[error("Preset '{0}' not found")]
    PresetNotFound(String),

    /// Preset JSON could not be parsed.
    #[error("Invalid preset data: {0}")]
    PresetFormat(#[from] serde_json::Error),

    /// NaN or infinity handed to the extended-float encoder.
    #[error("Cannot encode non-finite value {0} as an 80-bit extended float")]
    NonFiniteValue(f64),

    /// The frame count does not fit the 32-bit `numFrames` field.
    #[error("Sample buffer of {0} frames is too large for an AIFF container")]
    BufferTooLarge(usize),

    /// Malformed container bytes handed to the reader.
    #[error("Malformed AIFF data: {0}")]
    Container(String),

    /// Filesystem failure while creating directories or writing the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for synthesis operations.
pub type Result<T> = std::result::Result<T, SynthError>;

impl SynthError {
    /// Render this error as a plain-text diagnostic.
    ///
    /// Preset parse errors are drawn against `source`, pointing at the line
    /// and column serde_json reported. Other errors fall back to their
    /// `Display` message.
    ///
    /// Syntax errors land on the offending character. A well-formed preset
    /// with a bad field (say `"freq": "x"`) is only checked once its whole
    /// object has been read, so the label lands at the end of that preset's
    /// object; the message still names the field problem.
    pub fn report(&self, source_name: &str, source: &str) -> String {
        let SynthError::PresetFormat(err) = self else {
            return self.to_string();
        };
        if err.line() == 0 {
            return self.to_string();
        }

        let offset = char_offset(source, err.line(), err.column());
        let end = (offset + 1).min(source.chars().count()).max(offset);
        let span = offset..end;

        let mut out = Vec::new();
        let written = Report::build(ReportKind::Error, (source_name, span.clone()))
            .with_config(Config::default().with_color(false))
            .with_message("invalid preset data")
            .with_label(Label::new((source_name, span)).with_message(err.to_string()))
            .finish()
            .write((source_name, Source::from(source)), &mut out);

        match written {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Convert serde_json's 1-based line / column into a char offset.
fn char_offset(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let in_line = column.saturating_sub(1).min(text.chars().count());
            return offset + in_line;
        }
        offset += text.chars().count();
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_message_names_type_and_preset() {
        let err = SynthError::UnknownPresetType {
            kind: "unknown".to_string(),
            name: "doorbell".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("unknown"), "got {msg}");
        assert!(msg.contains("doorbell"), "got {msg}");
    }

    #[test]
    fn char_offset_finds_line_and_column() {
        let src = "{\n  \"a\": 1,\n  oops\n}";
        // line 3, column 3 -> the 'o' of "oops"
        let offset = char_offset(src, 3, 3);
        assert_eq!(src.chars().nth(offset), Some('o'));
    }

    #[test]
    fn report_points_into_source() {
        let src = "{\n  \"ping\": {\"type\": \"tone\",}\n}";
        let err: SynthError = serde_json::from_str::<serde_json::Value>(src)
            .unwrap_err()
            .into();
        let report = err.report("presets.json", src);
        assert!(report.contains("presets.json"), "got {report}");
        assert!(report.contains("invalid preset data"), "got {report}");
    }

    #[test]
    fn bad_field_is_reported_at_end_of_its_preset() {
        let src = "{\n  \"ping\": {\"type\": \"tone\", \"freq\": \"x\",\n    \"duration\": 0.2}}";
        let err = crate::preset::PresetLibrary::from_json_str(src).unwrap_err();
        let SynthError::PresetFormat(json_err) = &err else {
            panic!("expected a preset format error, got {err:?}");
        };
        // "freq" sits on line 2; the preset object closes on line 3.
        assert_eq!(json_err.line(), 3);
        let report = err.report("presets.json", src);
        assert!(report.contains("presets.json:3:"), "got {report}");
        assert!(report.contains("invalid type"), "got {report}");
    }

    #[test]
    fn report_falls_back_to_display() {
        let err = SynthError::PresetNotFound("chime".to_string());
        assert_eq!(err.report("presets.json", "{}"), "Preset 'chime' not found");
    }
}
