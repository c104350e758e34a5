//! Shell escaping primitives.
//!
//! Two escape sets exist and they are intentionally not merged: banner text
//! is escaped against every shell metacharacter, while path tokens only have
//! spaces and parentheses escaped so that `~` and globs keep working.

/// Characters escaped in banner messages.
pub const BANNER_SPECIAL: &[char] = &[
  '\\', '\'', '"', '<', '>', '|', '(', ')', '&', ';', '$', '`', '*', '?', '[', ']', '{', '}', '#', '~', '!',
];

/// Characters escaped in path tokens.
pub const PATH_SPECIAL: &[char] = &[' ', '(', ')'];

/// Backslash-escape every shell metacharacter in `message`, once.
///
/// Line breaks become spaces so the message cannot start a new command.
pub fn escape_banner(message: &str) -> String {
  let mut out = String::with_capacity(message.len() + 8);
  for c in message.chars() {
    match c {
      '\n' | '\r' => out.push(' '),
      c if BANNER_SPECIAL.contains(&c) => {
        out.push('\\');
        out.push(c);
      }
      c => out.push(c),
    }
  }
  out
}

/// Escape spaces and parentheses in a path-like token.
///
/// Idempotent: a character that is already preceded by a backslash is left
/// alone, so escaping an escaped token returns it unchanged.
///
/// ```
/// use vmprov_lib::script::escape_path_token;
///
/// let once = escape_path_token("Command Line Tools (OS X 10.9).pkg");
/// assert_eq!(once, r"Command\ Line\ Tools\ \(OS\ X\ 10.9\).pkg");
/// assert_eq!(escape_path_token(&once), once);
/// ```
pub fn escape_path_token(token: &str) -> String {
  let mut out = String::with_capacity(token.len() + 4);
  let mut chars = token.chars();
  while let Some(c) = chars.next() {
    if c == '\\' {
      out.push(c);
      if let Some(next) = chars.next() {
        out.push(next);
      }
    } else if PATH_SPECIAL.contains(&c) {
      out.push('\\');
      out.push(c);
    } else {
      out.push(c);
    }
  }
  out
}

/// Wrap `value` in double quotes, escaping what stays live inside them.
pub fn double_quote(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    if matches!(c, '\\' | '"' | '$' | '`') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('"');
  out
}
