//! Parameter-Value-Language (PVL) label parser.
//!
//! Both product families carry ASCII PVL headers: PDS3 QUB files
//! (`OBJECT = QUBE … END_OBJECT`, uppercase) and ISIS3 cubes
//! (`Object = Core … End_Object`, CamelCase). The parser is
//! case-insensitive on the structural keywords and keeps keys verbatim.

use crate::errors::{Result, VimsError};

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A single PVL value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    /// Quoted string.
    String(String),
    /// Unquoted token (identifiers, dates, …).
    Symbol(String),
    /// Number with a `<unit>` suffix.
    Unit { value: f64, unit: String },
    Sequence(Vec<Value>),
}

impl Value {
    /// Integer content (integers only).
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric content (integers, floats and unit-tagged numbers).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Unit { value, .. } => Some(*value),
            Value::Symbol(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text content (quoted strings and symbols).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Sequence content; a scalar is promoted to a 1-element sequence.
    pub fn as_sequence(&self) -> Vec<&Value> {
        match self {
            Value::Sequence(seq) => seq.iter().collect(),
            scalar => vec![scalar],
        }
    }
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// An OBJECT / GROUP block: ordered keys plus nested blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    /// Block name (empty for the label root).
    pub name: String,
    keys: Vec<(String, Value)>,
    blocks: Vec<Block>,
}

impl Block {
    /// Raw value for a key (first occurrence wins on duplicates).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.keys
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Whether the key is present in this block.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Key names, in file order.
    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|(k, _)| k.as_str())
    }

    /// Integer value for a key.
    pub fn int(&self, key: &str) -> Result<i64> {
        self.get(key)
            .ok_or_else(|| VimsError::MissingKey(key.into()))?
            .as_int()
            .ok_or_else(|| VimsError::WrongType(key.into()))
    }

    /// Float value for a key (integers are promoted).
    pub fn float(&self, key: &str) -> Result<f64> {
        self.get(key)
            .ok_or_else(|| VimsError::MissingKey(key.into()))?
            .as_f64()
            .ok_or_else(|| VimsError::WrongType(key.into()))
    }

    /// Text value for a key.
    pub fn str(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| VimsError::MissingKey(key.into()))?
            .as_str()
            .ok_or_else(|| VimsError::WrongType(key.into()))
    }

    /// Integer sequence for a key (a scalar yields one element).
    pub fn ints(&self, key: &str) -> Result<Vec<i64>> {
        self.get(key)
            .ok_or_else(|| VimsError::MissingKey(key.into()))?
            .as_sequence()
            .iter()
            .map(|v| v.as_int().ok_or_else(|| VimsError::WrongType(key.into())))
            .collect()
    }

    /// Float sequence for a key (a scalar yields one element).
    pub fn floats(&self, key: &str) -> Result<Vec<f64>> {
        self.get(key)
            .ok_or_else(|| VimsError::MissingKey(key.into()))?
            .as_sequence()
            .iter()
            .map(|v| v.as_f64().ok_or_else(|| VimsError::WrongType(key.into())))
            .collect()
    }

    /// Text sequence for a key (a scalar yields one element).
    pub fn strs(&self, key: &str) -> Result<Vec<String>> {
        self.get(key)
            .ok_or_else(|| VimsError::MissingKey(key.into()))?
            .as_sequence()
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| VimsError::WrongType(key.into()))
            })
            .collect()
    }

    /// Direct child block by name (case-insensitive).
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Nested block following a path of names.
    pub fn block_path(&self, path: &[&str]) -> Option<&Block> {
        let mut here = self;
        for name in path {
            here = here.block(name)?;
        }
        Some(here)
    }

    /// Depth-first search for a block by name.
    pub fn find_block(&self, name: &str) -> Option<&Block> {
        if self.name.eq_ignore_ascii_case(name) {
            return Some(self);
        }
        self.blocks.iter().find_map(|b| b.find_block(name))
    }

    /// Child blocks, in file order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// A parsed PVL label.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    root: Block,
}

impl std::ops::Deref for Label {
    type Target = Block;

    fn deref(&self) -> &Block {
        &self.root
    }
}

impl Label {
    /// Parse a label from text. Parsing stops at the `END` statement
    /// (or end of input).
    pub fn parse(text: &str) -> Result<Label> {
        let text = strip_comments(text);

        let mut stack: Vec<Block> = vec![Block::default()];
        let mut lines = text.lines().enumerate();

        while let Some((lineno, raw)) = lines.next() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("END") {
                break;
            }

            let (key, mut value) = match line.split_once('=') {
                Some((k, v)) => (k.trim().to_string(), v.trim().to_string()),
                None => {
                    if line.eq_ignore_ascii_case("END_OBJECT")
                        || line.eq_ignore_ascii_case("END_GROUP")
                    {
                        close_block(&mut stack, lineno)?;
                        continue;
                    }
                    // Stray token (SFDU record padding and the like).
                    continue;
                }
            };

            // Pull continuation lines until quotes and parens balance.
            while !balanced(&value) {
                match lines.next() {
                    Some((_, next)) => {
                        value.push(' ');
                        value.push_str(next.trim());
                    }
                    None => {
                        return Err(VimsError::Pvl {
                            line: lineno + 1,
                            message: format!("unterminated value for `{key}`"),
                        })
                    }
                }
            }

            if key.eq_ignore_ascii_case("OBJECT") || key.eq_ignore_ascii_case("GROUP") {
                stack.push(Block {
                    name: value,
                    ..Block::default()
                });
            } else if key.eq_ignore_ascii_case("END_OBJECT")
                || key.eq_ignore_ascii_case("END_GROUP")
            {
                close_block(&mut stack, lineno)?;
            } else {
                let parsed = parse_value(&value, lineno)?;
                let here = stack.last_mut().expect("stack is never empty");
                if here.get(&key).is_none() {
                    here.keys.push((key, parsed));
                }
            }
        }

        // Close any block left open at EOF.
        while stack.len() > 1 {
            let block = stack.pop().expect("checked length");
            stack
                .last_mut()
                .expect("checked length")
                .blocks
                .push(block);
        }

        Ok(Label {
            root: stack.pop().expect("root block"),
        })
    }

    /// Record pointer (`^QUBE` style) value.
    pub fn pointer(&self, name: &str) -> Option<i64> {
        self.root.get(&format!("^{name}")).and_then(Value::as_int)
    }
}

fn close_block(stack: &mut Vec<Block>, lineno: usize) -> Result<()> {
    if stack.len() < 2 {
        return Err(VimsError::Pvl {
            line: lineno + 1,
            message: "unbalanced END_OBJECT / END_GROUP".into(),
        });
    }
    let block = stack.pop().expect("checked length");
    stack
        .last_mut()
        .expect("checked length")
        .blocks
        .push(block);
    Ok(())
}

/// Remove `/* … */` comments (kept simple: non-nested).
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start..].find("*/") {
            Some(stop) => rest = &rest[start + stop + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Whether quotes and parentheses balance in a value fragment.
fn balanced(value: &str) -> bool {
    let mut depth = 0_i32;
    let mut quote: Option<char> = None;
    for c in value.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' | '{' => depth += 1,
                ')' | '}' => depth -= 1,
                _ => {}
            },
        }
    }
    quote.is_none() && depth <= 0
}

fn parse_value(value: &str, lineno: usize) -> Result<Value> {
    let value = value.trim();

    if value.starts_with('(') || value.starts_with('{') {
        // Strip exactly one level of brackets; nested items recurse.
        let inner = &value[1..];
        let inner = match inner.rfind([')', '}']) {
            Some(i) => &inner[..i],
            None => inner,
        };
        let items = split_top_level(inner);
        let seq = items
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| parse_value(s, lineno))
            .collect::<Result<Vec<_>>>()
            .map_err(|_| VimsError::Pvl {
                line: lineno + 1,
                message: format!("invalid sequence `{value}`"),
            })?;
        return Ok(Value::Sequence(seq));
    }

    parse_scalar(value)
}

/// Split a sequence body on top-level commas (quotes respected).
fn split_top_level(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0_i32;
    let mut quote: Option<char> = None;
    for c in inner.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => {
                    current.push(c);
                    quote = Some(c);
                }
                '(' | '{' => {
                    depth += 1;
                    current.push(c);
                }
                ')' | '}' => {
                    depth -= 1;
                    current.push(c);
                }
                ',' if depth == 0 => {
                    items.push(current.trim().to_string());
                    current = String::new();
                }
                _ => current.push(c),
            },
        }
    }
    if !current.trim().is_empty() {
        items.push(current.trim().to_string());
    }
    items
}

fn parse_scalar(value: &str) -> Result<Value> {
    let value = value.trim();

    if (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
        || (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
    {
        let inner = &value[1..value.len() - 1];
        // Collapse the line-wrap whitespace quoted strings may carry.
        let collapsed = inner.split_whitespace().collect::<Vec<_>>().join(" ");
        return Ok(Value::String(collapsed));
    }

    // `value <unit>` pairs.
    if let Some((head, unit)) = value.split_once('<') {
        let head = head.trim();
        if let Ok(v) = head.parse::<f64>() {
            return Ok(Value::Unit {
                value: v,
                unit: unit.trim_end_matches('>').trim().to_string(),
            });
        }
    }

    if let Ok(i) = value.parse::<i64>() {
        return Ok(Value::Integer(i));
    }
    if let Ok(f) = value.parse::<f64>() {
        return Ok(Value::Float(f));
    }

    Ok(Value::Symbol(value.to_string()))
}
