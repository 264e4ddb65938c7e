#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteVerb {
    Insert,
    Update,
    Delete,
}

impl WriteVerb {
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "insert" => Some(WriteVerb::Insert),
            "update" => Some(WriteVerb::Update),
            "delete" => Some(WriteVerb::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WriteVerb::Insert => "insert",
            WriteVerb::Update => "update",
            WriteVerb::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Read(String),
    Write { verb: WriteVerb, sql: String },
}

/// Strips Markdown fences, surrounding whitespace and trailing semicolons.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // drop the info string ("sql") on the opening fence
        text = match rest.find('\n') {
            Some(pos) => &rest[pos + 1..],
            None => rest,
        };
        if let Some(body) = text.trim_end().strip_suffix("```") {
            text = body;
        }
    }
    text.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace()).to_string()
}

struct Scan {
    words: Vec<String>,
    separators: usize,
}

/// Collects lowercase words outside string literals, quoted identifiers and
/// comments, and counts `;` found in the same positions.
fn scan(sql: &str) -> Scan {
    let chars: Vec<char> = sql.chars().collect();
    let mut words = Vec::new();
    let mut separators = 0;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' | '`' => {
                i += 1;
                while i < chars.len() {
                    if chars[i] == c {
                        // doubled quote is an escaped quote
                        if i + 1 < chars.len() && chars[i + 1] == c {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            '[' => {
                while i < chars.len() && chars[i] != ']' {
                    i += 1;
                }
                i += 1;
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            ';' => {
                separators += 1;
                i += 1;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                words.push(chars[start..i].iter().collect::<String>().to_lowercase());
            }
            _ => i += 1,
        }
    }
    Scan { words, separators }
}

/// Classifies a normalized statement. The error is a human-readable reason.
pub fn classify(sql: &str) -> Result<Statement, String> {
    if sql.trim().is_empty() {
        return Err("empty statement".into());
    }
    let Scan { words, separators } = scan(sql);
    if separators > 0 {
        return Err("multiple statements".into());
    }
    let first = words.first().map(String::as_str).unwrap_or("");
    if first == "select" {
        return Ok(Statement::Read(sql.to_string()));
    }
    match WriteVerb::parse(first) {
        Some(verb @ (WriteVerb::Update | WriteVerb::Delete))
            if !words.iter().any(|w| w == "where") =>
        {
            Err(format!("{} without a WHERE clause", verb.as_str().to_uppercase()))
        }
        Some(verb) => Ok(Statement::Write {
            verb,
            sql: sql.to_string(),
        }),
        None if first.is_empty() => Err("no SQL keyword found".into()),
        None => Err(format!("{} statements are not allowed", first.to_uppercase())),
    }
}
