//! Line commands of the console wizard.

use campus::admissions::FileSlot;
use campus::domain::reference::{CascadeTarget, ReferenceList};
use std::path::PathBuf;

pub const HELP: &str = "\
commands:
  show                          current step and draft
  set <field> <value...>        set a text field (e.g. set firstName Abebe)
  attach <photo|document> <path>
  detach <photo|document>
  region <birth|current> <code> select a region and load its zones
  zone <birth|current> <code>   select a zone and load its woredas
  woreda <birth|current> <code>
  options <list>                departments, regions, bcys, ...
  zones <birth|current>
  woredas <birth|current>
  next | back
  submit | discard
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Set { field: String, value: String },
    Attach { slot: FileSlot, path: PathBuf },
    Detach(FileSlot),
    Region(CascadeTarget, String),
    Zone(CascadeTarget, String),
    Woreda(CascadeTarget, String),
    Options(ReferenceList),
    Zones(CascadeTarget),
    Woredas(CascadeTarget),
    Next,
    Back,
    Submit,
    Discard,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. `Ok(None)` for blank lines.
    ///
    /// # Errors
    /// Returns a usage message for unknown commands or bad arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match verb {
            "" => return Ok(None),
            "show" => Self::Show,
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err("usage: set <field> <value...>".to_owned());
                }
                Self::Set { field: field.to_owned(), value: value.trim().to_owned() }
            },
            "attach" => {
                let (slot, path) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let path = path.trim();
                if path.is_empty() {
                    return Err("usage: attach <photo|document> <path>".to_owned());
                }
                Self::Attach { slot: parse_arg(slot)?, path: PathBuf::from(path) }
            },
            "detach" => Self::Detach(parse_arg(rest)?),
            "region" | "zone" | "woreda" => {
                let (target, code) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let target = parse_arg(target)?;
                let code = code.trim().to_owned();
                match verb {
                    "region" => Self::Region(target, code),
                    "zone" => Self::Zone(target, code),
                    _ => Self::Woreda(target, code),
                }
            },
            "options" => Self::Options(parse_arg(rest)?),
            "zones" => Self::Zones(parse_arg(rest)?),
            "woredas" => Self::Woredas(parse_arg(rest)?),
            "next" => Self::Next,
            "back" => Self::Back,
            "submit" => Self::Submit,
            "discard" => Self::Discard,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };
        Ok(Some(command))
    }
}

fn parse_arg<T: std::str::FromStr>(raw: &str) -> Result<T, String> {
    raw.trim().parse().map_err(|_| format!("unexpected argument '{}'", raw.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_spaces_in_the_value() {
        assert_eq!(
            Command::parse("set schoolName  Addis Ketema Preparatory ").unwrap(),
            Some(Command::Set {
                field: "schoolName".to_owned(),
                value: "Addis Ketema Preparatory".to_owned(),
            })
        );
    }

    #[test]
    fn cascade_commands_take_a_target() {
        assert_eq!(
            Command::parse("region current 03").unwrap(),
            Some(Command::Region(CascadeTarget::Current, "03".to_owned()))
        );
        assert_eq!(
            Command::parse("zones birth").unwrap(),
            Some(Command::Zones(CascadeTarget::Birth))
        );
        assert!(Command::parse("region home 03").is_err());
    }

    #[test]
    fn reference_lists_use_kebab_names() {
        assert_eq!(
            Command::parse("options student-statuses").unwrap(),
            Some(Command::Options(ReferenceList::StudentStatuses))
        );
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert!(Command::parse("fly").unwrap_err().contains("unknown command"));
        assert!(Command::parse("attach photo").is_err());
    }
}
