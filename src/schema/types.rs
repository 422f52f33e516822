//! Recursive column types in the catalog's Hive-style syntax.
//!
//! Grammar (no whitespace, as the catalog stores it):
//!   type   := prim | "array<" type ">" | "struct<" field ("," field)* ">"
//!   field  := ident ":" type
//!   prim   := "string" | "int" | "bigint" | "double" | "timestamp" | "boolean"

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticType {
    String,
    Int,
    BigInt,
    Double,
    Timestamp,
    Boolean,
    Array(Box<SemanticType>),
    /// Field names keep their case; order is significant.
    Struct(Vec<(String, SemanticType)>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset} in {input:?}")]
pub struct TypeParseError {
    pub input: String,
    pub offset: usize,
    pub message: String,
}

impl SemanticType {
    pub fn parse(input: &str) -> Result<Self, TypeParseError> {
        let mut parser = Parser { input, pos: 0 };
        let ty = parser.parse_type()?;
        if parser.pos != input.len() {
            return Err(parser.error("trailing input"));
        }
        Ok(ty)
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, SemanticType::Array(_) | SemanticType::Struct(_))
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::String => f.write_str("string"),
            SemanticType::Int => f.write_str("int"),
            SemanticType::BigInt => f.write_str("bigint"),
            SemanticType::Double => f.write_str("double"),
            SemanticType::Timestamp => f.write_str("timestamp"),
            SemanticType::Boolean => f.write_str("boolean"),
            SemanticType::Array(inner) => write!(f, "array<{}>", inner),
            SemanticType::Struct(fields) => {
                f.write_str("struct<")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{}", name, ty)?;
                }
                f.write_str(">")
            }
        }
    }
}

impl Serialize for SemanticType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse_type(&mut self) -> Result<SemanticType, TypeParseError> {
        let start = self.pos;
        let word = self.ident()?;
        let ty = match word {
            "string" => SemanticType::String,
            "int" => SemanticType::Int,
            "bigint" => SemanticType::BigInt,
            "double" => SemanticType::Double,
            "timestamp" => SemanticType::Timestamp,
            "boolean" => SemanticType::Boolean,
            "array" => {
                self.expect('<')?;
                let inner = self.parse_type()?;
                self.expect('>')?;
                SemanticType::Array(Box::new(inner))
            }
            "struct" => {
                self.expect('<')?;
                let mut fields = Vec::new();
                loop {
                    let name = self.ident()?.to_string();
                    self.expect(':')?;
                    let ty = self.parse_type()?;
                    fields.push((name, ty));
                    if !self.eat(',') {
                        break;
                    }
                }
                self.expect('>')?;
                SemanticType::Struct(fields)
            }
            other => {
                self.pos = start;
                return Err(self.error(&format!("unknown type `{}`", other)));
            }
        };
        Ok(ty)
    }

    fn ident(&mut self) -> Result<&'a str, TypeParseError> {
        let rest = &self.input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected identifier"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.input[self.pos..].starts_with(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ch: char) -> Result<(), TypeParseError> {
        if self.eat(ch) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", ch)))
        }
    }

    fn error(&self, message: &str) -> TypeParseError {
        TypeParseError {
            input: self.input.to_string(),
            offset: self.pos,
            message: message.to_string(),
        }
    }
}
