use std::fmt;

/// Machine-readable error codes surfaced by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    SourceUnreadable,
    SourceMalformed,
    InvalidRow,
    InvalidTimestamp,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::SourceUnreadable => "E4001",
            Self::SourceMalformed => "E4002",
            Self::InvalidRow => "E4003",
            Self::InvalidTimestamp => "E4004",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::SourceUnreadable => "Row dump could not be read",
            Self::SourceMalformed => "Row dump is not a JSON array",
            Self::InvalidRow => "Row is not a JSON object",
            Self::InvalidTimestamp => "Timestamp could not be parsed",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .shiftfeed/config.toml and retry."),
            Self::SourceUnreadable => Some("Check the path and read permissions."),
            Self::SourceMalformed => {
                Some("Export the table as a JSON array of row objects.")
            }
            Self::InvalidRow => Some("Every array element must be an object keyed by column."),
            Self::InvalidTimestamp => {
                Some("Use RFC 3339, e.g. 2026-03-01T08:00:00Z.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 5] = [
        ErrorCode::ConfigParseError,
        ErrorCode::SourceUnreadable,
        ErrorCode::SourceMalformed,
        ErrorCode::InvalidRow,
        ErrorCode::InvalidTimestamp,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn codes_cover_config_and_source_failures_only() {
        let codes: Vec<&str> = ALL.iter().map(|code| code.code()).collect();
        assert_eq!(codes, ["E1002", "E4001", "E4002", "E4003", "E4004"]);
        assert!(ALL.iter().all(|code| code.hint().is_some()));
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let text = code.code();
            assert_eq!(text.len(), 5);
            assert!(text.starts_with('E'));
            assert!(text.chars().skip(1).all(|c| c.is_ascii_digit()));
            assert_eq!(code.to_string(), text);
        }
    }
}
