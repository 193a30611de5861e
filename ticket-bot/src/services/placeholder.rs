//! Shared pure functions for `{token}` placeholder substitution.
//!
//! Used by the ticket service (initial messages, channel names) and the
//! panel publisher. One regex scan per template; the token table is a
//! match. Unrecognized tokens are left verbatim, braces included.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Everything a template may reference.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderContext {
    pub user_id: i64,
    pub username: String,
    /// Platform mention, e.g. `<@42>`.
    pub user_mention: String,
    pub ticket_number: Option<i64>,
    /// Channel mention of the ticket channel, e.g. `<#99>`.
    pub ticket_channel_mention: Option<String>,
    pub option_name: Option<String>,
    pub server_name: Option<String>,
    /// Modal answers keyed by field id, for `modal:<fieldId>` tokens.
    pub modal_answers: HashMap<String, String>,
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_.:\-]+)\}").expect("valid pattern"))
}

/// Resolves one token name against the context. None means "unknown token,
/// leave it verbatim".
fn resolve(token: &str, ctx: &PlaceholderContext) -> Option<String> {
    match token {
        "user" => Some(ctx.user_mention.clone()),
        "user.id" => Some(ctx.user_id.to_string()),
        "username" => Some(ctx.username.clone()),
        "ticketNumber" => ctx.ticket_number.map(|n| format!("{:04}", n)),
        "ticket.number" => ctx.ticket_number.map(|n| n.to_string()),
        "ticket.channel" => ctx.ticket_channel_mention.clone(),
        "option" | "option.name" => ctx.option_name.clone(),
        "server" | "server.name" => ctx.server_name.clone(),
        _ => token
            .strip_prefix("modal:")
            .and_then(|field_id| ctx.modal_answers.get(field_id).cloned()),
    }
}

/// Replaces every known `{token}` in `template` per the fixed lookup table:
/// `user`, `user.id`, `username`, `ticketNumber` (zero-padded to 4 digits),
/// `ticket.number` (unpadded), `ticket.channel`, `option`/`option.name`,
/// `server`/`server.name`, and `modal:<fieldId>`.
pub fn replace_placeholders(template: &str, ctx: &PlaceholderContext) -> String {
    token_pattern()
        .replace_all(template, |caps: &regex::Captures<'_>| {
            resolve(&caps[1], ctx).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Tokens that make sense inside a channel name; mention-style tokens are
/// excluded because they never survive the slug sanitizer.
fn resolve_for_channel_name(token: &str, ctx: &PlaceholderContext) -> Option<String> {
    match token {
        "username" | "ticketNumber" | "ticket.number" | "option" | "option.name" => {
            resolve(token, ctx)
        }
        _ => None,
    }
}

/// Substitutes the restricted token subset, then sanitizes the result into
/// a valid channel-name slug: lowercase, spaces become hyphens, anything
/// outside `[a-z0-9-_]` is stripped, truncated to 100 characters.
pub fn replace_channel_name_placeholders(template: &str, ctx: &PlaceholderContext) -> String {
    let substituted = token_pattern()
        .replace_all(template, |caps: &regex::Captures<'_>| {
            resolve_for_channel_name(&caps[1], ctx).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned();

    let slug: String = substituted
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')
        .collect();

    slug.chars().take(100).collect()
}
