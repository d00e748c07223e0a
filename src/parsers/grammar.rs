//! Grammar helpers shared by several parsers.
//!
//! Two mechanics are covered:
//!
//! - `;`-delimited `KEY:value` fields with backslash escapes (WiFi, MeCard,
//!   MATMSG)
//! - line-oriented content lines with folding (vCard, iCalendar)

/// Splits `body` on unescaped `separator`, removing the escapes.
///
/// A backslash makes the following character literal, so `\;`, `\\`,
/// `\,` and `\"` survive the split as `;`, `\`, `,` and `"`. A trailing
/// lone backslash is kept as-is.
pub fn split_escaped(body: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => current.push(next),
                None => current.push('\\'),
            }
        } else if c == separator {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);

    parts
}

/// Fields of an escaped `KEY:value;KEY:value;` record.
#[derive(Debug, Default)]
pub struct EscapedFields {
    entries: Vec<(String, String)>,
}

impl EscapedFields {
    /// Parses the record body (the text after the format prefix).
    ///
    /// Keys are upper-cased; segments without a `:` are ignored.
    pub fn parse(body: &str) -> Self {
        let entries = split_escaped(body, ';')
            .into_iter()
            .filter_map(|segment| {
                let (key, value) = segment.split_once(':')?;
                let key = key.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key.to_ascii_uppercase(), value.to_string()))
            })
            .collect();
        Self { entries }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First non-empty value for `key`, trimmed.
    pub fn get_nonempty(&self, key: &str) -> Option<String> {
        self.get_all(key).into_iter().next()
    }

    /// Every non-empty value for `key`, in order.
    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Joins folded lines: a line starting with a space or tab continues the
/// previous logical line, with its leading whitespace stripped.
pub fn unfold_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        if line.starts_with([' ', '\t']) {
            if let Some(previous) = lines.last_mut() {
                previous.push_str(line.trim_start());
                continue;
            }
        }
        lines.push(line.to_string());
    }
    lines
}

/// A single unfolded `NAME;PARAM=..:value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Upper-cased property name without group or parameters.
    pub name: String,
    /// Unescaped value.
    pub value: String,
}

impl ContentLine {
    /// Splits a line at its first `:`. `None` when there is no colon.
    pub fn parse(line: &str) -> Option<Self> {
        let (key, value) = line.split_once(':')?;
        let name = key.split(';').next().unwrap_or(key).trim();
        // Apple-style grouping: `item1.TEL`.
        let name = name.rsplit('.').next().unwrap_or(name);
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_ascii_uppercase(),
            value: value.to_string(),
        })
    }

    /// True when this line's key is `name`, regardless of parameters.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// The value with TEXT escapes (`\n`, `\,`, `\;`, `\\`) resolved.
    pub fn text(&self) -> String {
        unescape_text(&self.value)
    }
}

/// Content lines between `BEGIN:<component>` and `END:<component>`.
///
/// Returns `None` if no `BEGIN` line is present. A missing `END` runs to
/// the end of input.
pub fn component_lines(text: &str, component: &str) -> Option<Vec<ContentLine>> {
    let lines = unfold_lines(text);
    let begin = lines.iter().position(|l| is_marker(l, "BEGIN", component))?;

    Some(
        lines[begin + 1..]
            .iter()
            .take_while(|l| !is_marker(l, "END", component))
            .filter_map(|l| ContentLine::parse(l))
            .collect(),
    )
}

fn is_marker(line: &str, marker: &str, component: &str) -> bool {
    match line.trim().split_once(':') {
        Some((m, c)) => m.eq_ignore_ascii_case(marker) && c.trim().eq_ignore_ascii_case(component),
        None => false,
    }
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out.trim().to_string()
}
