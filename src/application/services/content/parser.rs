//! Actions XML parser
//!
//! Validates a content source against the actions schema while walking it:
//!
//! ```xml
//! <actions>
//!     <team name="Knight">
//!         <tier level="2">
//!             <normal_attack is_critical="true">...</normal_attack>
//!             <heavy_attack>...</heavy_attack>
//!             <defend>...</defend>
//!         </tier>
//!         <normal_attack>applies to every tier</normal_attack>
//!     </team>
//!     <bribe>${DISPLAY_NAME} offers a bribe to ${BOTNAME}.</bribe>
//! </actions>
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{ContentError, ContentSource};
use crate::domain::entities::ContentEntry;
use crate::domain::value_objects::{MoveType, Team, Tier};

const ROOT: &str = "actions";
const TEAM: &str = "team";
const TIER: &str = "tier";

#[derive(Debug)]
enum Scope {
    Root,
    Team(Team),
    Tier(Team, Tier),
    Entry { entry: ContentEntry, text: String },
}

/// Parse one source into its entries, or fail on the first schema violation.
pub(super) fn parse_source(source: &ContentSource) -> Result<Vec<ContentEntry>, ContentError> {
    SourceParser::new(source).run()
}

struct SourceParser<'a> {
    source: &'a ContentSource,
    stack: Vec<Scope>,
    entries: Vec<ContentEntry>,
    seen_root: bool,
}

impl<'a> SourceParser<'a> {
    fn new(source: &'a ContentSource) -> Self {
        Self {
            source,
            stack: Vec::new(),
            entries: Vec::new(),
            seen_root: false,
        }
    }

    fn invalid(&self, message: impl Into<String>) -> ContentError {
        ContentError::Validation {
            source_name: self.source.name.clone(),
            message: message.into(),
        }
    }

    fn run(mut self) -> Result<Vec<ContentEntry>, ContentError> {
        let source = self.source;
        let mut reader = Reader::from_str(&source.text);

        loop {
            let event = reader.read_event().map_err(|e| {
                self.invalid(format!("malformed XML at byte {}: {}", reader.error_position(), e))
            })?;

            match event {
                Event::Start(element) => self.open(&element)?,
                Event::Empty(element) => {
                    self.open(&element)?;
                    self.close()?;
                }
                Event::End(_) => self.close()?,
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| self.invalid(format!("bad text: {e}")))?;
                    self.text(&text)?;
                }
                Event::CData(data) => {
                    let text = String::from_utf8(data.into_inner().into_owned())
                        .map_err(|e| self.invalid(format!("bad CDATA: {e}")))?;
                    self.text(&text)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !self.stack.is_empty() {
            return Err(self.invalid("unexpected end of document"));
        }
        if !self.seen_root {
            return Err(self.invalid(format!("missing <{ROOT}> root element")));
        }

        Ok(self.entries)
    }

    fn open(&mut self, element: &BytesStart<'_>) -> Result<(), ContentError> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        let attributes = self.attributes(element)?;

        let scope = match (self.stack.last(), name.as_str()) {
            (None, ROOT) if !self.seen_root => {
                self.expect_no_attributes(&name, &attributes)?;
                self.seen_root = true;
                Scope::Root
            }
            (None, ROOT) => return Err(self.invalid(format!("only one <{ROOT}> root is allowed"))),
            (None, other) => {
                return Err(self.invalid(format!("root element must be <{ROOT}>, found <{other}>")))
            }

            (Some(Scope::Root), TEAM) => Scope::Team(self.team_attribute(&attributes)?),
            (Some(Scope::Root), "bribe") => {
                self.expect_no_attributes(&name, &attributes)?;
                Scope::Entry {
                    entry: ContentEntry::new(MoveType::Bribe, ""),
                    text: String::new(),
                }
            }

            (Some(Scope::Team(team)), TIER) => {
                let team = *team;
                Scope::Tier(team, self.tier_attribute(&attributes)?)
            }
            (Some(Scope::Team(team)), leaf) if is_team_move(leaf) => {
                let entry = ContentEntry::new(team_move(leaf), "").for_team(*team);
                self.entry_scope(entry, &attributes)?
            }
            (Some(Scope::Tier(team, tier)), leaf) if is_team_move(leaf) => {
                let entry = ContentEntry::new(team_move(leaf), "")
                    .for_team(*team)
                    .in_tier(*tier);
                self.entry_scope(entry, &attributes)?
            }

            (Some(Scope::Root), leaf) if is_team_move(leaf) || leaf == TIER => {
                return Err(self.invalid(format!("<{leaf}> must be inside a <{TEAM}>")))
            }
            (Some(Scope::Team(_) | Scope::Tier(..)), "bribe") => {
                return Err(self.invalid(format!("<bribe> must be a direct child of <{ROOT}>")))
            }
            (Some(Scope::Team(_) | Scope::Tier(..)), TEAM) => {
                return Err(self.invalid(format!("<{TEAM}> elements cannot be nested")))
            }
            (Some(Scope::Tier(..)), TIER) => {
                return Err(self.invalid(format!("<{TIER}> elements cannot be nested")))
            }
            (Some(Scope::Entry { entry, .. }), child) => {
                return Err(self.invalid(format!(
                    "<{}> cannot contain elements, found <{child}>",
                    entry.move_type
                )))
            }
            (Some(_), other) => return Err(self.invalid(format!("unknown element <{other}>"))),
        };

        self.stack.push(scope);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ContentError> {
        match self.stack.pop() {
            Some(Scope::Entry { mut entry, text }) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(self.invalid(format!("<{}> has no story text", entry.move_type)));
                }
                entry.text = text.to_string();
                self.entries.push(entry);
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(self.invalid("unbalanced closing tag")),
        }
    }

    fn text(&mut self, text: &str) -> Result<(), ContentError> {
        match self.stack.last_mut() {
            Some(Scope::Entry { text: buffer, .. }) => {
                buffer.push_str(text);
                Ok(())
            }
            _ if text.trim().is_empty() => Ok(()),
            _ => Err(self.invalid(format!("unexpected text outside a story: {:?}", text.trim()))),
        }
    }

    fn entry_scope(
        &self,
        entry: ContentEntry,
        attributes: &[(String, String)],
    ) -> Result<Scope, ContentError> {
        let mut entry = entry;
        for (key, value) in attributes {
            match key.as_str() {
                "is_critical" | "critical" if entry.move_type.is_attack() => {
                    entry.critical = parse_bool(value).ok_or_else(|| {
                        self.invalid(format!("{key}=\"{value}\" is not a boolean"))
                    })?;
                }
                "is_critical" | "critical" => {
                    return Err(self.invalid(format!("<{}> cannot be critical", entry.move_type)))
                }
                other => {
                    return Err(self.invalid(format!(
                        "unknown attribute {other:?} on <{}>",
                        entry.move_type
                    )))
                }
            }
        }
        Ok(Scope::Entry {
            entry,
            text: String::new(),
        })
    }

    fn team_attribute(&self, attributes: &[(String, String)]) -> Result<Team, ContentError> {
        let mut team = None;
        for (key, value) in attributes {
            match key.as_str() {
                "name" => {
                    team = Some(value.parse::<Team>().map_err(|e| self.invalid(e.to_string()))?)
                }
                other => {
                    return Err(self.invalid(format!("unknown attribute {other:?} on <{TEAM}>")))
                }
            }
        }
        team.ok_or_else(|| self.invalid(format!("<{TEAM}> requires a name attribute")))
    }

    fn tier_attribute(&self, attributes: &[(String, String)]) -> Result<Tier, ContentError> {
        let mut tier = None;
        for (key, value) in attributes {
            match key.as_str() {
                "level" => {
                    let level = value
                        .trim()
                        .parse::<u8>()
                        .ok()
                        .and_then(Tier::new)
                        .ok_or_else(|| {
                            self.invalid(format!("tier level must be 1, 2 or 3, got {value:?}"))
                        })?;
                    tier = Some(level);
                }
                other => {
                    return Err(self.invalid(format!("unknown attribute {other:?} on <{TIER}>")))
                }
            }
        }
        tier.ok_or_else(|| self.invalid(format!("<{TIER}> requires a level attribute")))
    }

    fn expect_no_attributes(
        &self,
        element: &str,
        attributes: &[(String, String)],
    ) -> Result<(), ContentError> {
        match attributes.first() {
            Some((key, _)) => Err(self.invalid(format!("unknown attribute {key:?} on <{element}>"))),
            None => Ok(()),
        }
    }

    fn attributes(&self, element: &BytesStart<'_>) -> Result<Vec<(String, String)>, ContentError> {
        element
            .attributes()
            .map(|attribute| {
                let attribute = attribute.map_err(|e| self.invalid(format!("bad attribute: {e}")))?;
                let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
                let value = attribute
                    .unescape_value()
                    .map_err(|e| self.invalid(format!("bad attribute value: {e}")))?
                    .into_owned();
                Ok((key, value))
            })
            .collect()
    }
}

fn is_team_move(name: &str) -> bool {
    matches!(name, "normal_attack" | "heavy_attack" | "defend")
}

fn team_move(name: &str) -> MoveType {
    match name {
        "heavy_attack" => MoveType::HeavyAttack,
        "defend" => MoveType::Defend,
        _ => MoveType::NormalAttack,
    }
}

/// xsd:boolean lexical forms
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
