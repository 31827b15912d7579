use crate::ast::Command;
use crate::diagnostics::Span;
use crate::integrator::IntegrationMethod;
use crate::mesh::WebConfig;
use glam::DVec3;
use thiserror::Error;

/// Largest count accepted by `create` and by the web's ring and side counts.
pub const MAX_COUNT: usize = 1_000_000;

/// Parse error with optional span information
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{message}")]
    SyntaxError {
        message: String,
        span: Option<Span>,
    },
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::SyntaxError { span, .. } => *span,
        }
    }
}

/// Helper to track byte offsets while parsing
struct ParseContext {
    line_offsets: Vec<usize>, // Byte offset of start of each line
    len: usize,
}

impl ParseContext {
    fn new(source: &str) -> Self {
        let mut line_offsets = vec![0];
        let mut offset = 0;
        for ch in source.chars() {
            offset += ch.len_utf8();
            if ch == '\n' {
                line_offsets.push(offset);
            }
        }
        Self {
            line_offsets,
            len: source.len(),
        }
    }

    /// Get byte offset for start of line (0-indexed)
    fn line_start(&self, line: usize) -> usize {
        self.line_offsets.get(line).copied().unwrap_or(self.len)
    }

    /// Create a span for the entire line
    fn full_line_span(&self, line: usize) -> Span {
        let start = self.line_start(line);
        let end = self.line_start(line + 1);
        Span::new(start, end)
    }
}

/// One raw line of a scene source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number.
    pub number: usize,
    pub text: &'a str,
    pub span: Span,
}

/// Every line of `source` with its number and byte span.
pub fn scene_lines(source: &str) -> impl Iterator<Item = SourceLine<'_>> {
    let ctx = ParseContext::new(source);
    source.lines().enumerate().map(move |(i, text)| SourceLine {
        number: i + 1,
        text,
        span: ctx.full_line_span(i),
    })
}

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str, span: Option<Span>) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let tokens = Tokens::new(line, span);
    let command = match tokens.keyword() {
        "create" => parse_create(&tokens)?,
        "particle" => {
            tokens.expect_len(9, "particle I m x y z vx vy vz")?;
            Command::Particle {
                index: tokens.index(1)?,
                mass: tokens.number(2)?,
                pos: tokens.vec3(3)?,
                vel: tokens.vec3(6)?,
            }
        }
        "all_velocities" => {
            tokens.expect_len(4, "all_velocities vx vy vz")?;
            Command::AllVelocities(tokens.vec3(1)?)
        }
        "link" => {
            tokens.expect_len(7, "link S I J ks kd rest")?;
            Command::Link {
                spring: tokens.index(1)?,
                particle_i: tokens.index(2)?,
                particle_j: tokens.index(3)?,
                ks: tokens.number(4)?,
                kd: tokens.number(5)?,
                rest_length: tokens.number(6)?,
            }
        }
        "integration" => {
            tokens.expect_len(3, "integration METHOD dt")?;
            let method = tokens.words[1]
                .parse::<IntegrationMethod>()
                .map_err(|e| ParseError::new(e.to_string(), span))?;
            let timestep = tokens.number(2)?;
            if timestep <= 0.0 {
                return Err(ParseError::new(
                    format!("Timestep must be positive, got {}", timestep),
                    span,
                ));
            }
            Command::Integration { method, timestep }
        }
        "gravity" => {
            tokens.expect_len(2, "gravity g")?;
            Command::Gravity(tokens.number(1)?)
        }
        "ground" => {
            tokens.expect_len(3, "ground ks kd")?;
            Command::Ground {
                ks: tokens.number(1)?,
                kd: tokens.number(2)?,
            }
        }
        "web" => {
            tokens.expect_len(10, "web cx cy cz rings sides radius ks kd modifier")?;
            let (rings, sides) = (tokens.count(4)?, tokens.count(5)?);
            if rings.saturating_mul(sides) > MAX_COUNT {
                return Err(ParseError::new(
                    format!("A {}x{} web exceeds the limit of {} particles", rings, sides, MAX_COUNT),
                    span,
                ));
            }
            Command::Web(WebConfig {
                center: tokens.vec3(1)?,
                rings,
                sides,
                radius: tokens.number(6)?,
                ks: tokens.number(7)?,
                kd: tokens.number(8)?,
                rest_length_modifier: tokens.number(9)?,
                ..WebConfig::default()
            })
        }
        "anchor" => {
            tokens.expect_len(2, "anchor I")?;
            Command::Anchor(tokens.index(1)?)
        }
        "sticky" => {
            tokens.expect_len(1, "sticky")?;
            Command::Sticky
        }
        "break" => {
            tokens.expect_len(1, "break")?;
            Command::Break
        }
        "projectile" => {
            tokens.expect_len(8, "projectile m x y z vx vy vz")?;
            Command::Projectile {
                mass: tokens.number(1)?,
                pos: tokens.vec3(2)?,
                vel: tokens.vec3(5)?,
            }
        }
        other => {
            return Err(ParseError::new(format!("Unexpected token: {}", other), span));
        }
    };

    Ok(Some(command))
}

/// Parse `create particles N` or `create springs N`
fn parse_create(tokens: &Tokens<'_>) -> Result<Command, ParseError> {
    tokens.expect_len(3, "create particles|springs N")?;
    let count = tokens.count(2)?;
    match tokens.words[1] {
        "particles" => Ok(Command::CreateParticles(count)),
        "springs" => Ok(Command::CreateSprings(count)),
        other => Err(ParseError::new(
            format!("Expected 'particles' or 'springs' after 'create', found '{}'", other),
            tokens.span,
        )),
    }
}

/// Whitespace-separated words of one non-empty line
struct Tokens<'a> {
    words: Vec<&'a str>,
    span: Option<Span>,
}

impl<'a> Tokens<'a> {
    fn new(line: &'a str, span: Option<Span>) -> Self {
        Self {
            words: line.split_whitespace().collect(),
            span,
        }
    }

    fn keyword(&self) -> &'a str {
        self.words.first().copied().unwrap_or("")
    }

    fn expect_len(&self, len: usize, usage: &str) -> Result<(), ParseError> {
        if self.words.len() == len {
            Ok(())
        } else {
            Err(ParseError::new(
                format!(
                    "Expected {} argument(s) for '{}', got {} (usage: {})",
                    len - 1,
                    self.keyword(),
                    self.words.len() - 1,
                    usage
                ),
                self.span,
            ))
        }
    }

    fn word(&self, i: usize) -> Result<&'a str, ParseError> {
        self.words.get(i).copied().ok_or_else(|| {
            ParseError::new(format!("Missing argument {} for '{}'", i, self.keyword()), self.span)
        })
    }

    fn number(&self, i: usize) -> Result<f64, ParseError> {
        let word = self.word(i)?;
        match word.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ParseError::new(format!("Expected a number, found '{}'", word), self.span)),
        }
    }

    fn index(&self, i: usize) -> Result<usize, ParseError> {
        let word = self.word(i)?;
        word.parse::<usize>().map_err(|_| {
            ParseError::new(
                format!("Expected a non-negative integer, found '{}'", word),
                self.span,
            )
        })
    }

    /// An index that also sizes an allocation, so it is bounded.
    fn count(&self, i: usize) -> Result<usize, ParseError> {
        let count = self.index(i)?;
        if count > MAX_COUNT {
            return Err(ParseError::new(
                format!("Count {} exceeds the limit of {}", count, MAX_COUNT),
                self.span,
            ));
        }
        Ok(count)
    }

    fn vec3(&self, i: usize) -> Result<DVec3, ParseError> {
        Ok(DVec3::new(self.number(i)?, self.number(i + 1)?, self.number(i + 2)?))
    }
}
