use std::fmt;
use std::path::PathBuf;

use study_core::model::{HskLevel, LessonId, QuizKind, QuizSettings};

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidValue { flag: &'static str, reason: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidValue { flag, reason } => write!(f, "invalid {flag}: {reason}"),
        }
    }
}

impl std::error::Error for ArgsError {}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app flashcards [--catalog <file>] [--level <1-6>] [--search <term>]");
    eprintln!("  app quiz       [--catalog <file>] [--level <1-6>] [--kind <kind|mixed>]");
    eprintln!("                 [--count <n>] [--time-limit <secs|0|unlimited>] [--shuffle]");
    eprintln!("  app lesson     [--catalog <file>] [--lesson <id>]");
    eprintln!();
    eprintln!("Without --catalog the built-in HSK1 sample catalog is used.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_CATALOG, STUDY_TIME_LIMIT, STUDY_QUESTION_COUNT, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Flashcards {
        level: Option<HskLevel>,
        search: Option<String>,
    },
    Quiz {
        settings: QuizSettings,
        shuffle: bool,
    },
    Lesson {
        lesson_id: LessonId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub catalog: Option<PathBuf>,
    pub command: Command,
}

/// Reads one setting from the environment, treating blanks as unset.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<N: std::str::FromStr>(flag: &'static str, raw: &str) -> Result<N, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidNumber {
        flag,
        raw: raw.to_string(),
    })
}

/// `0` or `unlimited` means an untimed quiz.
fn parse_time_limit(flag: &'static str, raw: &str) -> Result<Option<u32>, ArgsError> {
    if raw.trim().eq_ignore_ascii_case("unlimited") {
        return Ok(None);
    }
    let secs: u32 = parse_number(flag, raw)?;
    Ok((secs > 0).then_some(secs))
}

fn parse_level(raw: &str) -> Result<HskLevel, ArgsError> {
    let value: u8 = parse_number("--level", raw)?;
    HskLevel::new(value).map_err(|e| ArgsError::InvalidValue {
        flag: "--level",
        reason: e.to_string(),
    })
}

impl Args {
    /// Parse the process arguments (without the program name).
    ///
    /// Returns `Ok(None)` when help was requested.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown commands, unknown flags or bad values.
    pub fn parse(argv: impl IntoIterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut args = argv.into_iter();
        let Some(cmd) = args.next() else {
            return Ok(None);
        };

        let mut catalog = env_value("STUDY_CATALOG").map(PathBuf::from);
        let command = match cmd.as_str() {
            "--help" | "-h" | "help" => return Ok(None),
            "flashcards" => Self::parse_flashcards(&mut args, &mut catalog)?,
            "quiz" => Self::parse_quiz(&mut args, &mut catalog)?,
            "lesson" => Self::parse_lesson(&mut args, &mut catalog)?,
            other => return Err(ArgsError::UnknownCommand(other.to_string())),
        };

        match command {
            Some(command) => Ok(Some(Self { catalog, command })),
            None => Ok(None),
        }
    }

    fn parse_flashcards(
        args: &mut impl Iterator<Item = String>,
        catalog: &mut Option<PathBuf>,
    ) -> Result<Option<Command>, ArgsError> {
        let mut level = None;
        let mut search = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => *catalog = Some(require_value(args, "--catalog")?.into()),
                "--level" => level = Some(parse_level(&require_value(args, "--level")?)?),
                "--search" => search = Some(require_value(args, "--search")?),
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(Some(Command::Flashcards { level, search }))
    }

    fn parse_quiz(
        args: &mut impl Iterator<Item = String>,
        catalog: &mut Option<PathBuf>,
    ) -> Result<Option<Command>, ArgsError> {
        let defaults = QuizSettings::default();
        let mut level = defaults.level();
        let mut kind = defaults.kind();
        let mut count = match env_value("STUDY_QUESTION_COUNT") {
            Some(raw) => parse_number("STUDY_QUESTION_COUNT", &raw)?,
            None => defaults.question_count(),
        };
        let mut time_limit = match env_value("STUDY_TIME_LIMIT") {
            Some(raw) => parse_time_limit("STUDY_TIME_LIMIT", &raw)?,
            None => defaults.time_limit_secs(),
        };
        let mut shuffle = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => *catalog = Some(require_value(args, "--catalog")?.into()),
                "--level" => level = parse_level(&require_value(args, "--level")?)?,
                "--kind" => {
                    let raw = require_value(args, "--kind")?;
                    kind = QuizKind::parse(&raw).map_err(|e| ArgsError::InvalidValue {
                        flag: "--kind",
                        reason: e.to_string(),
                    })?;
                }
                "--count" => count = parse_number("--count", &require_value(args, "--count")?)?,
                "--time-limit" => {
                    time_limit =
                        parse_time_limit("--time-limit", &require_value(args, "--time-limit")?)?;
                }
                "--shuffle" => shuffle = true,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let settings = QuizSettings::new(level, kind, count, time_limit).map_err(|e| {
            ArgsError::InvalidValue {
                flag: "quiz settings",
                reason: e.to_string(),
            }
        })?;
        Ok(Some(Command::Quiz { settings, shuffle }))
    }

    fn parse_lesson(
        args: &mut impl Iterator<Item = String>,
        catalog: &mut Option<PathBuf>,
    ) -> Result<Option<Command>, ArgsError> {
        let mut lesson_id = LessonId::new(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => *catalog = Some(require_value(args, "--catalog")?.into()),
                "--lesson" => {
                    let raw = require_value(args, "--lesson")?;
                    lesson_id = raw.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--lesson",
                        raw: raw.clone(),
                    })?;
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(Some(Command::Lesson { lesson_id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::QuestionKind;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn no_arguments_means_help() {
        assert!(Args::parse(Vec::new()).unwrap().is_none());
    }

    #[test]
    fn quiz_flags_override_defaults() {
        let args = Args::parse(argv(&[
            "quiz",
            "--kind",
            "grammar",
            "--count",
            "3",
            "--time-limit",
            "45",
            "--shuffle",
        ]))
        .unwrap()
        .unwrap();
        let Command::Quiz { settings, shuffle } = args.command else {
            panic!("expected quiz command");
        };
        assert!(shuffle);
        assert_eq!(settings.question_count(), 3);
        assert_eq!(settings.time_limit_secs(), Some(45));
        assert_eq!(settings.kind(), QuizKind::Only(QuestionKind::Grammar));
    }

    #[test]
    fn zero_or_unlimited_time_limit_means_untimed_quiz() {
        for raw in ["0", "unlimited"] {
            let args = Args::parse(argv(&["quiz", "--time-limit", raw]))
                .unwrap()
                .unwrap();
            let Command::Quiz { settings, .. } = args.command else {
                panic!("expected quiz command");
            };
            assert_eq!(settings.time_limit_secs(), None);
            assert!(!settings.session_options().is_timed());
        }
        assert!(matches!(
            Args::parse(argv(&["quiz", "--time-limit", "soon"])).unwrap_err(),
            ArgsError::InvalidNumber { .. }
        ));
    }

    #[test]
    fn flashcard_level_is_validated() {
        let err = Args::parse(argv(&["flashcards", "--level", "9"])).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidValue { flag: "--level", .. }));

        let args = Args::parse(argv(&["flashcards", "--search", "merci"]))
            .unwrap()
            .unwrap();
        assert_eq!(
            args.command,
            Command::Flashcards {
                level: None,
                search: Some("merci".into())
            }
        );
    }

    #[test]
    fn lesson_id_and_unknown_flags() {
        let args = Args::parse(argv(&["lesson", "--lesson", "2"])).unwrap().unwrap();
        assert_eq!(
            args.command,
            Command::Lesson {
                lesson_id: LessonId::new(2)
            }
        );
        assert!(matches!(
            Args::parse(argv(&["lesson", "--bogus"])).unwrap_err(),
            ArgsError::UnknownArg(_)
        ));
        assert!(matches!(
            Args::parse(argv(&["dance"])).unwrap_err(),
            ArgsError::UnknownCommand(_)
        ));
    }
}
