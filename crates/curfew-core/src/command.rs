//! Remote command grammar
//!
//! Commands arrive as plain text on the command topic. Keywords and
//! prefixes are case-sensitive (`SHUTDOWN` is not a command); argument
//! values such as the action mode and weekday names stay tolerant. A
//! message that starts with a known keyword but carries a bad argument is
//! `Malformed` (acknowledged with a warning); anything else is `Unknown`
//! (logged and ignored).

use curfew_config::ActionMode;

/// One `day=windows` clause of a `periods` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClause {
    pub day: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Execute the given action right now, regardless of windows.
    Immediate(ActionMode),

    /// Persist a new enforcement action mode.
    SetAction(ActionMode),

    /// Persist new allowed windows for the named days.
    SetWindows(Vec<WindowClause>),

    /// Restore the defaults profile.
    Reset,

    /// Report the current action mode and all allowed windows.
    Status,

    /// Recognized keyword with a bad argument.
    Malformed { input: String, reason: String },

    /// Unrecognized message.
    Unknown(String),
}

impl RemoteCommand {
    pub fn parse(text: &str) -> Self {
        let input = text.trim();

        match input {
            "shutdown" | "關機" => return RemoteCommand::Immediate(ActionMode::Shutdown),
            "lock" | "鎖定" => return RemoteCommand::Immediate(ActionMode::Lock),
            "reset" | "重設" => return RemoteCommand::Reset,
            "status" | "狀態" => return RemoteCommand::Status,
            _ => {}
        }

        if let Some(rest) = input.strip_prefix("action") {
            return Self::parse_action(input, rest);
        }
        if let Some(rest) = input.strip_prefix("periods") {
            return Self::parse_periods(input, rest);
        }

        RemoteCommand::Unknown(input.to_string())
    }

    fn parse_action(input: &str, rest: &str) -> Self {
        let rest = rest.trim_start();
        let Some(value) = rest.strip_prefix('=') else {
            return RemoteCommand::Malformed {
                input: input.to_string(),
                reason: "expected 'action = lock|shutdown'".into(),
            };
        };
        match value.trim().parse::<ActionMode>() {
            Ok(mode) => RemoteCommand::SetAction(mode),
            Err(reason) => RemoteCommand::Malformed {
                input: input.to_string(),
                reason,
            },
        }
    }

    fn parse_periods(input: &str, rest: &str) -> Self {
        let clauses: Vec<WindowClause> = rest
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .filter_map(|part| {
                let (day, text) = part.split_once('=')?;
                let day = day.trim();
                if day.is_empty() {
                    return None;
                }
                Some(WindowClause {
                    day: day.to_string(),
                    text: text.trim().to_string(),
                })
            })
            .collect();

        if clauses.is_empty() {
            return RemoteCommand::Malformed {
                input: input.to_string(),
                reason: "no valid periods".into(),
            };
        }
        RemoteCommand::SetWindows(clauses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_keywords() {
        assert_eq!(
            RemoteCommand::parse("shutdown"),
            RemoteCommand::Immediate(ActionMode::Shutdown)
        );
        assert_eq!(
            RemoteCommand::parse("  lock \n"),
            RemoteCommand::Immediate(ActionMode::Lock)
        );
        assert_eq!(RemoteCommand::parse("reset"), RemoteCommand::Reset);
        assert_eq!(RemoteCommand::parse("status"), RemoteCommand::Status);
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            RemoteCommand::parse("SHUTDOWN"),
            RemoteCommand::Unknown("SHUTDOWN".into())
        );
        assert_eq!(
            RemoteCommand::parse("Lock"),
            RemoteCommand::Unknown("Lock".into())
        );
        assert_eq!(
            RemoteCommand::parse("Action = lock"),
            RemoteCommand::Unknown("Action = lock".into())
        );
        assert_eq!(
            RemoteCommand::parse("PERIODS monday=09:00-17:00"),
            RemoteCommand::Unknown("PERIODS monday=09:00-17:00".into())
        );
    }

    #[test]
    fn chinese_keywords() {
        assert_eq!(
            RemoteCommand::parse("關機"),
            RemoteCommand::Immediate(ActionMode::Shutdown)
        );
        assert_eq!(
            RemoteCommand::parse("鎖定"),
            RemoteCommand::Immediate(ActionMode::Lock)
        );
        assert_eq!(RemoteCommand::parse("重設"), RemoteCommand::Reset);
        assert_eq!(RemoteCommand::parse("狀態"), RemoteCommand::Status);
    }

    #[test]
    fn action_assignment() {
        assert_eq!(
            RemoteCommand::parse("action = shutdown"),
            RemoteCommand::SetAction(ActionMode::Shutdown)
        );
        // The mode value stays tolerant even though the keyword is not.
        assert_eq!(
            RemoteCommand::parse("action=Lock"),
            RemoteCommand::SetAction(ActionMode::Lock)
        );
    }

    #[test]
    fn bad_action_is_malformed() {
        assert!(matches!(
            RemoteCommand::parse("action = hibernate"),
            RemoteCommand::Malformed { .. }
        ));
        assert!(matches!(
            RemoteCommand::parse("action lock"),
            RemoteCommand::Malformed { .. }
        ));
    }

    #[test]
    fn periods_clauses() {
        let cmd = RemoteCommand::parse("periods monday=09:00-17:00;tuesday=10:00-12:00");
        let RemoteCommand::SetWindows(clauses) = cmd else {
            panic!("expected SetWindows");
        };
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].day, "monday");
        assert_eq!(clauses[0].text, "09:00-17:00");
        assert_eq!(clauses[1].day, "tuesday");
    }

    #[test]
    fn periods_drops_clauses_without_equals() {
        let cmd = RemoteCommand::parse("periods monday=09:00-17:00;garbage");
        let RemoteCommand::SetWindows(clauses) = cmd else {
            panic!("expected SetWindows");
        };
        assert_eq!(clauses.len(), 1);
    }

    #[test]
    fn periods_drops_clauses_with_empty_day() {
        let cmd = RemoteCommand::parse("periods =09:00-17:00;monday=10:00-12:00");
        let RemoteCommand::SetWindows(clauses) = cmd else {
            panic!("expected SetWindows");
        };
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].day, "monday");
    }

    #[test]
    fn periods_with_no_clauses_is_malformed() {
        assert!(matches!(
            RemoteCommand::parse("periods"),
            RemoteCommand::Malformed { .. }
        ));
        assert!(matches!(
            RemoteCommand::parse("periods ;;"),
            RemoteCommand::Malformed { .. }
        ));
        assert!(matches!(
            RemoteCommand::parse("periods =09:00-17:00"),
            RemoteCommand::Malformed { .. }
        ));
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(
            RemoteCommand::parse("hello there"),
            RemoteCommand::Unknown("hello there".into())
        );
    }
}
