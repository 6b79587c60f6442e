use serde::{Deserialize, Serialize};
use std::fmt;

/// Formatted notification for a single listing
///
/// Holds every derived field separately so callers and tests can inspect them;
/// the `Display` impl renders the Telegram Markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    #[serde(rename = "typeLabel")]
    pub type_label: String,
    pub title: String,
    pub reward: String,
    pub sponsor: String,
    pub skills: String,
    pub deadline: String,
    pub url: String,
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🚀 *New {}!*", self.type_label)?;
        writeln!(f)?;
        writeln!(f, "*{}*", escape_markdown(&self.title))?;
        writeln!(f)?;
        writeln!(f, "💰 *Reward:* {}", escape_markdown(&self.reward))?;
        writeln!(f, "🏢 *Sponsor:* {}", escape_markdown(&self.sponsor))?;
        writeln!(f, "🎯 *Skills:* {}", escape_markdown(&self.skills))?;
        writeln!(f, "⏰ *Deadline:* {}", self.deadline)?;
        writeln!(f)?;
        write!(f, "[View Details & Apply]({})", self.url)
    }
}

/// Escape the characters legacy Telegram Markdown treats as entity markers
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
