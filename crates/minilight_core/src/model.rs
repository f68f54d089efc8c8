//! Model file grammar.
//!
//! ```text
//! #MiniLight
//! <iterations>
//! <width> <height>
//! (<px> <py> <pz>) (<dx> <dy> <dz>) <angle degrees>
//! (<sky rgb>) (<ground rgb>)
//! (<v0>) (<v1>) (<v2>) (<reflectivity rgb>) (<emissivity rgb>)
//! ...
//! ```
//!
//! The triangle list runs to end of file; everything before it is
//! mandatory. Values are not range-checked here - the renderer clamps
//! them to its own invariants on construction.

use minilight_math::Vec3;
use thiserror::Error;

use crate::tokens::TokenStream;

/// Magic marker that must open every model file.
pub const MAGIC: &str = "#MiniLight";

/// Upper limit on the triangle list length (2^24).
pub const MAX_TRIANGLES: usize = 0x0100_0000;

/// Errors that can occur while reading a model file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("not a MiniLight model file (found {0:?}, expected {MAGIC:?})")]
    BadMagic(String),

    #[error("invalid number {found:?} for {field}")]
    InvalidNumber { field: &'static str, found: String },

    #[error("unexpected end of file while reading {0}")]
    UnexpectedEof(&'static str),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Camera block of a model file.
#[derive(Debug, Clone, Copy)]
pub struct CameraDescription {
    pub position: Vec3,
    pub direction: Vec3,
    pub angle_degrees: f64,
}

/// One triangle record of a model file.
#[derive(Debug, Clone, Copy)]
pub struct TriangleDescription {
    pub vertices: [Vec3; 3],
    pub reflectivity: Vec3,
    pub emissivity: Vec3,
}

/// A fully parsed model file.
#[derive(Debug, Clone)]
pub struct ModelDescription {
    pub iterations: u32,
    pub width: i64,
    pub height: i64,
    pub camera: CameraDescription,
    pub sky_emission: Vec3,
    pub ground_reflection: Vec3,
    pub triangles: Vec<TriangleDescription>,
}

impl ModelDescription {
    /// Parse model file text.
    pub fn parse(content: &str) -> ParseResult<Self> {
        let mut tokens = TokenStream::new(content);

        read_magic(&mut tokens)?;
        let iterations = read_int(&mut tokens, "iteration count")?.clamp(0, u32::MAX as i64) as u32;
        let width = read_int(&mut tokens, "image width")?;
        let height = read_int(&mut tokens, "image height")?;
        let camera = CameraDescription {
            position: read_vector(&mut tokens, "camera position")?,
            direction: read_vector(&mut tokens, "camera direction")?,
            angle_degrees: read_real(&mut tokens, "camera view angle")?,
        };
        let sky_emission = read_vector(&mut tokens, "sky emission")?;
        let ground_reflection = read_vector(&mut tokens, "ground reflection")?;

        let mut triangles = Vec::new();
        while triangles.len() < MAX_TRIANGLES {
            match read_triangle(&mut tokens)? {
                Some(triangle) => triangles.push(triangle),
                None => break,
            }
        }

        Ok(Self {
            iterations,
            width,
            height,
            camera,
            sky_emission,
            ground_reflection,
            triangles,
        })
    }
}

/// Consume the file magic, accepting it either as one token or split in two.
fn read_magic(tokens: &mut TokenStream) -> ParseResult<()> {
    match tokens.next() {
        Some(token) if token == MAGIC => Ok(()),
        Some("#") => match tokens.next() {
            Some("MiniLight") => Ok(()),
            Some(other) => Err(ParseError::BadMagic(format!("# {other}"))),
            None => Err(ParseError::UnexpectedEof("file magic")),
        },
        Some(other) => Err(ParseError::BadMagic(other.to_string())),
        None => Err(ParseError::UnexpectedEof("file magic")),
    }
}

fn read_token<'a>(tokens: &mut TokenStream<'a>, field: &'static str) -> ParseResult<&'a str> {
    tokens.next().ok_or(ParseError::UnexpectedEof(field))
}

fn read_real(tokens: &mut TokenStream, field: &'static str) -> ParseResult<f64> {
    let token = read_token(tokens, field)?;
    token.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        found: token.to_string(),
    })
}

fn read_int(tokens: &mut TokenStream, field: &'static str) -> ParseResult<i64> {
    let token = read_token(tokens, field)?;
    token.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        found: token.to_string(),
    })
}

fn read_vector(tokens: &mut TokenStream, field: &'static str) -> ParseResult<Vec3> {
    let x = read_real(tokens, field)?;
    let y = read_real(tokens, field)?;
    let z = read_real(tokens, field)?;
    Ok(Vec3::new(x, y, z))
}

/// Read one triangle record; end of file anywhere in the record ends the
/// list, discarding any trailing partial record.
fn read_triangle(tokens: &mut TokenStream) -> ParseResult<Option<TriangleDescription>> {
    let mut reals = [0.0; 15];
    for value in reals.iter_mut() {
        match tokens.next() {
            Some(token) => {
                *value = token.parse().map_err(|_| ParseError::InvalidNumber {
                    field: "triangle",
                    found: token.to_string(),
                })?;
            }
            None => return Ok(None),
        }
    }
    let v = |i: usize| Vec3::new(reals[i], reals[i + 1], reals[i + 2]);
    Ok(Some(TriangleDescription {
        vertices: [v(0), v(3), v(6)],
        reflectivity: v(9),
        emissivity: v(12),
    }))
}
