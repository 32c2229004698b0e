//! One-line command parser: exactly one call on a bare name, literal (or
//! unary-negated numeric literal) arguments only. Anything else is rejected
//! so that every turn stays a single atomic, traceable operation.

use crate::command::ParsedCommand;
use crate::error::CommandError;
use crate::value::Value;

const HINT_BARE_CALL: &str = "The command must be a single call on a bare function name.";
const HINT_CONSTANT_ARG: &str = "Function arguments must be literal constants.";
const HINT_NO_NESTED: &str = "Nested calls are not allowed; issue one call per turn.";
const HINT_MINUS: &str = "Unary minus must be applied directly to a number.";

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Eq,
    Minus,
    Dot,
}

/// Parse one line of text into a [`ParsedCommand`].
pub fn parse_command(line: &str) -> Result<ParsedCommand, CommandError> {
    let command = line.trim();
    if command.is_empty() {
        return Err(CommandError::Syntax(command.to_string()));
    }
    let tokens = tokenize(command)?;
    Parser {
        command,
        tokens,
        pos: 0,
    }
    .parse_call()
}

fn tokenize(command: &str) -> Result<Vec<Token>, CommandError> {
    let chars: Vec<char> = command.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '[' => {
                tokens.push(Token::LBracket);
                i += 1;
            }
            ']' => {
                tokens.push(Token::RBracket);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '=' => {
                tokens.push(Token::Eq);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '.' => {
                tokens.push(Token::Dot);
                i += 1;
            }
            '"' | '\'' => {
                let (text, next) = lex_string(&chars, i, command)?;
                tokens.push(Token::Str(text));
                i = next;
            }
            _ if c.is_ascii_digit() => {
                let (token, next) = lex_number(&chars, i, command)?;
                tokens.push(token);
                i = next;
            }
            _ if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            _ => return Err(CommandError::Syntax(command.to_string())),
        }
    }
    Ok(tokens)
}

fn lex_string(chars: &[char], start: usize, command: &str) -> Result<(String, usize), CommandError> {
    let quote = chars[start];
    let mut out = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            let Some(&next) = chars.get(i + 1) else {
                return Err(CommandError::Syntax(command.to_string()));
            };
            out.push(match next {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
            i += 2;
        } else if c == quote {
            return Ok((out, i + 1));
        } else {
            out.push(c);
            i += 1;
        }
    }
    // Unterminated string.
    Err(CommandError::Syntax(command.to_string()))
}

fn lex_number(chars: &[char], start: usize, command: &str) -> Result<(Token, usize), CommandError> {
    let mut i = start;
    let mut is_float = false;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()) {
        is_float = true;
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            is_float = true;
            i = j;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        }
    }
    let text: String = chars[start..i].iter().collect();
    if is_float {
        let value = text
            .parse::<f64>()
            .map_err(|_| CommandError::Syntax(command.to_string()))?;
        return Ok((Token::Float(value), i));
    }
    match text.parse::<i64>() {
        Ok(value) => Ok((Token::Int(value), i)),
        // Integers beyond i64 degrade to float rather than failing outright.
        Err(_) => {
            let value = text
                .parse::<f64>()
                .map_err(|_| CommandError::Syntax(command.to_string()))?;
            Ok((Token::Float(value), i))
        }
    }
}

fn literal_word(word: &str) -> Option<Value> {
    match word {
        "true" | "True" => Some(Value::Bool(true)),
        "false" | "False" => Some(Value::Bool(false)),
        "null" | "None" => Some(Value::Null),
        _ => None,
    }
}

struct Parser<'a> {
    command: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn syntax(&self) -> CommandError {
        CommandError::Syntax(self.command.to_string())
    }

    fn unsupported(&self, hint: &str) -> CommandError {
        CommandError::UnsupportedConstruct {
            command: self.command.to_string(),
            hint: hint.to_string(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_call(mut self) -> Result<ParsedCommand, CommandError> {
        let name = match self.next() {
            Some(Token::Ident(name)) => {
                if literal_word(&name).is_some() {
                    return Err(self.unsupported(HINT_BARE_CALL));
                }
                name
            }
            _ => return Err(self.syntax()),
        };

        match self.peek() {
            Some(Token::LParen) => self.pos += 1,
            // Attribute access or indexing in callee position, or a bare name
            // that is not a call at all.
            Some(Token::Dot) | Some(Token::LBracket) | None => {
                return Err(self.unsupported(HINT_BARE_CALL));
            }
            Some(_) => return Err(self.syntax()),
        }

        let (positional, keyword) = self.parse_args()?;

        // Anything left after the closing paren means more than one statement.
        match self.peek() {
            None => {}
            Some(Token::LParen) => return Err(self.unsupported(HINT_NO_NESTED)),
            Some(_) => return Err(self.syntax()),
        }

        Ok(ParsedCommand {
            name,
            positional,
            keyword,
        })
    }

    fn parse_args(&mut self) -> Result<(Vec<Value>, Vec<(String, Value)>), CommandError> {
        let mut positional = Vec::new();
        let mut keyword: Vec<(String, Value)> = Vec::new();
        if matches!(self.peek(), Some(Token::RParen)) {
            self.pos += 1;
            return Ok((positional, keyword));
        }
        loop {
            self.parse_arg(&mut positional, &mut keyword)?;
            match self.next() {
                Some(Token::Comma) => {
                    // Trailing comma before the close is fine.
                    if matches!(self.peek(), Some(Token::RParen)) {
                        self.pos += 1;
                        return Ok((positional, keyword));
                    }
                }
                Some(Token::RParen) => return Ok((positional, keyword)),
                _ => return Err(self.syntax()),
            }
        }
    }

    fn parse_arg(
        &mut self,
        positional: &mut Vec<Value>,
        keyword: &mut Vec<(String, Value)>,
    ) -> Result<(), CommandError> {
        if let Some(Token::Ident(word)) = self.peek() {
            if literal_word(word).is_none() {
                let word = word.clone();
                self.pos += 1;
                return match self.peek() {
                    Some(Token::Eq) => {
                        self.pos += 1;
                        if keyword.iter().any(|(name, _)| *name == word) {
                            return Err(self.syntax());
                        }
                        let value = self.parse_literal()?;
                        keyword.push((word, value));
                        Ok(())
                    }
                    Some(Token::LParen) => Err(self.unsupported(HINT_NO_NESTED)),
                    _ => Err(self.unsupported(HINT_CONSTANT_ARG)),
                };
            }
        }
        if !keyword.is_empty() {
            // Positional arguments may not follow keyword arguments.
            return Err(self.syntax());
        }
        let value = self.parse_literal()?;
        positional.push(value);
        Ok(())
    }

    fn parse_literal(&mut self) -> Result<Value, CommandError> {
        match self.next() {
            Some(Token::Minus) => match self.next() {
                Some(Token::Int(n)) => Ok(Value::Int(-n)),
                Some(Token::Float(x)) => Ok(Value::Float(-x)),
                _ => Err(self.unsupported(HINT_MINUS)),
            },
            Some(Token::Int(n)) => Ok(Value::Int(n)),
            Some(Token::Float(x)) => Ok(Value::Float(x)),
            Some(Token::Str(text)) => Ok(Value::Str(text)),
            Some(Token::Ident(word)) => match literal_word(&word) {
                Some(value) => Ok(value),
                None if matches!(self.peek(), Some(Token::LParen)) => {
                    Err(self.unsupported(HINT_NO_NESTED))
                }
                None => Err(self.unsupported(HINT_CONSTANT_ARG)),
            },
            Some(Token::LBracket) => self.parse_list(),
            _ => Err(self.syntax()),
        }
    }

    fn parse_list(&mut self) -> Result<Value, CommandError> {
        let mut items = Vec::new();
        if matches!(self.peek(), Some(Token::RBracket)) {
            self.pos += 1;
            return Ok(Value::List(items));
        }
        loop {
            items.push(self.parse_literal()?);
            match self.next() {
                Some(Token::Comma) => {
                    if matches!(self.peek(), Some(Token::RBracket)) {
                        self.pos += 1;
                        return Ok(Value::List(items));
                    }
                }
                Some(Token::RBracket) => return Ok(Value::List(items)),
                _ => return Err(self.syntax()),
            }
        }
    }
}
