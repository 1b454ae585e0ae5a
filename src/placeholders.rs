//! Literal `{token}` substitution for message templates
//!
//! Supported tokens: `{endpoint}`, `{server-name}`, `{players}` and
//! `{max-players}`. Unknown tokens are left untouched.

use crate::connect::{DEFAULT_ENDPOINT, DEFAULT_SERVER_NAME};

/// Values substituted into message templates at send time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    pub endpoint: Option<String>,
    pub server_name: Option<String>,
    pub players: u32,
    pub max_players: u32,
}

impl Placeholders {
    /// Renders `template` in one left-to-right pass
    ///
    /// Substituted values are never scanned again, so a server name such as
    /// `"{players} club"` comes out verbatim.
    pub fn apply(&self, template: &str) -> String {
        let mut rendered = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let candidate = &rest[open..];

            match candidate.find('}').and_then(|close| {
                self.value_for(&candidate[1..close]).map(|value| (close, value))
            }) {
                Some((close, value)) => {
                    rendered.push_str(&value);
                    rest = &candidate[close + 1..];
                }
                None => {
                    rendered.push('{');
                    rest = &candidate[1..];
                }
            }
        }

        rendered.push_str(rest);
        rendered
    }

    fn value_for(&self, token: &str) -> Option<String> {
        let value = match token {
            "endpoint" => non_empty(self.endpoint.as_deref())
                .unwrap_or(DEFAULT_ENDPOINT)
                .to_string(),
            "server-name" => non_empty(self.server_name.as_deref())
                .unwrap_or(DEFAULT_SERVER_NAME)
                .to_string(),
            "players" => self.players.to_string(),
            "max-players" => self.max_players.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
