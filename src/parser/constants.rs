//! Constant table loader
//!
//! The front end hands the VM a table of literal values keyed by address.
//! On disk it is a line-oriented text file:
//!
//! ```text
//! # type   address  literal
//! int      200000   5
//! real     210000   2.5
//! bool     220000   true
//! string   230000   "hello\n"
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use super::lexer::{Lexer, SourceLocation, Token};
use crate::memory::store::ConstantTable;
use crate::memory::value::{Address, Value};
use crate::memory::{AddressSpace, DataType, ScopeSector};
use std::fmt;

/// Errors raised while loading a constant table
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Malformed line
    Syntax {
        message: String,
        location: SourceLocation,
    },

    /// Unknown type keyword
    UnknownType {
        name: String,
        location: SourceLocation,
    },

    /// Literal does not match the declared type
    InvalidLiteral {
        data_type: DataType,
        literal: String,
        location: SourceLocation,
    },

    /// Address outside the constant sub-range of the declared type
    MisplacedAddress {
        address: Address,
        data_type: DataType,
        location: SourceLocation,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Syntax { message, location } => {
                write!(f, "Syntax error at {}: {}", location, message)
            }
            LoadError::UnknownType { name, location } => {
                write!(f, "Unknown type '{}' at {}", name, location)
            }
            LoadError::InvalidLiteral {
                data_type,
                literal,
                location,
            } => {
                write!(
                    f,
                    "Invalid {} literal '{}' at {}",
                    data_type, literal, location
                )
            }
            LoadError::MisplacedAddress {
                address,
                data_type,
                location,
            } => {
                write!(
                    f,
                    "Address {} is not a {} constant slot at {}",
                    address, data_type, location
                )
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Parse a constant table from text
pub fn parse_constants(source: &str) -> Result<ConstantTable, LoadError> {
    let mut table = ConstantTable::default();
    let space = AddressSpace::new();

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens = Lexer::new(line, line_no)
            .tokenize()
            .map_err(|message| LoadError::Syntax {
                message,
                location: SourceLocation::new(line_no, 1),
            })?;

        let [type_token, address_token, literal_token] = tokens.as_slice() else {
            return Err(LoadError::Syntax {
                message: format!("expected '<type> <address> <literal>', got {} tokens", tokens.len()),
                location: SourceLocation::new(line_no, 1),
            });
        };

        let data_type = match type_token {
            Token::Word(name, location) => {
                DataType::from_keyword(name).ok_or_else(|| LoadError::UnknownType {
                    name: name.clone(),
                    location: *location,
                })?
            }
            Token::StringLiteral(_, location) => {
                return Err(LoadError::Syntax {
                    message: "type must be a bare word".to_string(),
                    location: *location,
                })
            }
        };

        let address = match address_token {
            Token::Word(text, location) => {
                let address = text.parse::<Address>().map_err(|_| LoadError::Syntax {
                    message: format!("invalid address '{}'", text),
                    location: *location,
                })?;
                match space.classify(address) {
                    Ok((ScopeSector::Constant, owner)) if owner == data_type => address,
                    _ => {
                        return Err(LoadError::MisplacedAddress {
                            address,
                            data_type,
                            location: *location,
                        })
                    }
                }
            }
            Token::StringLiteral(_, location) => {
                return Err(LoadError::Syntax {
                    message: "address must be an integer".to_string(),
                    location: *location,
                })
            }
        };

        let value = parse_literal(data_type, literal_token)?;
        table.entry(data_type).or_default().insert(address, value);
    }

    Ok(table)
}

fn parse_literal(data_type: DataType, token: &Token) -> Result<Value, LoadError> {
    let location = token.location();
    let invalid = |literal: &str| LoadError::InvalidLiteral {
        data_type,
        literal: literal.to_string(),
        location,
    };

    match (data_type, token) {
        (DataType::Str, Token::StringLiteral(text, _)) => Ok(Value::Str(text.clone())),
        (DataType::Str, Token::Word(text, _)) => Err(invalid(text)),
        (_, Token::StringLiteral(text, _)) => Err(invalid(text)),
        (DataType::Int, Token::Word(text, _)) => {
            text.parse::<i64>().map(Value::Int).map_err(|_| invalid(text))
        }
        (DataType::Real, Token::Word(text, _)) => {
            text.parse::<f64>().map(Value::Real).map_err(|_| invalid(text))
        }
        (DataType::Bool, Token::Word(text, _)) => match text.as_str() {
            "true" | "True" => Ok(Value::Bool(true)),
            "false" | "False" => Ok(Value::Bool(false)),
            _ => Err(invalid(text)),
        },
    }
}
