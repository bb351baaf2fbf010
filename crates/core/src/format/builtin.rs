use super::Formatter;
use crate::{
    error::{Error, Result},
    parser::{GoParser, utils::first_error},
    types::GenerationMode,
};

/// Package clause placed in front of stub text before it is parsed
const STUB_PRELUDE: &str = "package stub\n";

/// Re-indents by delimiter depth and checks the result parses as Go
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFormatter;

impl Formatter for BuiltinFormatter {
    fn format(&self, source: &str, mode: GenerationMode) -> Result<String> {
        let formatted = reindent(source)?;
        validate(&formatted, mode)?;
        Ok(formatted)
    }

    fn name(&self) -> &str {
        "builtin"
    }
}

/// Lexical state carried from one line to the next
#[derive(Debug, Default)]
struct Scanner {
    in_raw_string: bool,
    in_block_comment: bool,
}

impl Scanner {
    /// Net change in delimiter depth over `line`, and how many closing
    /// delimiters it starts with
    fn scan(&mut self, line: &str) -> (isize, usize) {
        let mut net = 0isize;
        let mut leading = 0usize;
        let mut at_start = true;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if self.in_raw_string {
                if c == '`' {
                    self.in_raw_string = false;
                }
                at_start = false;
                continue;
            }
            if self.in_block_comment {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    self.in_block_comment = false;
                }
                continue;
            }
            match c {
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    self.in_block_comment = true;
                    continue;
                }
                '"' | '\'' => skip_quoted(&mut chars, c),
                '`' => self.in_raw_string = true,
                '{' | '(' | '[' => net += 1,
                '}' | ')' | ']' => {
                    net -= 1;
                    if at_start {
                        leading += 1;
                        continue;
                    }
                }
                c if c.is_whitespace() => continue,
                _ => {}
            }
            at_start = false;
        }
        (net, leading)
    }
}

fn skip_quoted(chars: &mut std::iter::Peekable<std::str::Chars>, quote: char) {
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            c if c == quote => return,
            _ => {}
        }
    }
}

/// Trim trailing whitespace, collapse blank runs and indent with tabs
fn reindent(source: &str) -> Result<String> {
    let mut scanner = Scanner::default();
    let mut depth = 0isize;
    let mut out = String::with_capacity(source.len());
    let mut pending_blank = false;

    for (row, raw) in source.lines().enumerate() {
        let verbatim = scanner.in_raw_string;
        let line = raw.trim();
        let (net, leading) = scanner.scan(line);

        if verbatim {
            out.push_str(raw.trim_end());
            out.push('\n');
            depth += net;
            continue;
        }
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }

        let indent = depth - leading as isize;
        if indent < 0 {
            return Err(Error::format_failure(
                format!("unbalanced closing delimiter at line {}", row + 1),
                source,
            ));
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }
        for _ in 0..indent {
            out.push('\t');
        }
        out.push_str(line);
        out.push('\n');
        depth += net;
    }

    if depth != 0 || scanner.in_raw_string {
        return Err(Error::format_failure(
            format!("{depth} unclosed delimiter(s) at end of input"),
            source,
        ));
    }
    Ok(out)
}

fn validate(text: &str, mode: GenerationMode) -> Result<()> {
    let (wrapped, offset) = match mode {
        GenerationMode::Stub => (format!("{STUB_PRELUDE}{text}"), 1),
        GenerationMode::Mock => (text.to_string(), 0),
    };
    let mut parser = GoParser::new()?;
    let tree = parser.parse(&wrapped)?;
    if let Some((row, column)) = first_error(&tree.root_node()) {
        return Err(Error::format_failure(
            format!(
                "{}:{}: syntax error",
                (row + 1).saturating_sub(offset),
                column + 1
            ),
            text,
        ));
    }
    Ok(())
}
