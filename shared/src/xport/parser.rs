//! rrdtool XML export parser using nom.
//!
//! Parses documents like:
//!
//! ```xml
//! <?xml version="1.0" encoding="ISO-8859-1"?>
//! <xport>
//!   <meta>
//!     <start>1388869740</start>
//!     <step>9</step>
//!     <end>1388869740</end>
//!     <rows>2</rows>
//!     <columns>2</columns>
//!     <legend><entry>sensor1</entry><entry>sensor2</entry></legend>
//!   </meta>
//!   <data>
//!     <row><t>1388859588</t><v0>1.6190174283e+05</v0><v1>2.6382257170e+04</v1></row>
//!     <row><t>1388859597</t><v0>NaN</v0><v1>NaN</v1></row>
//!   </data>
//! </xport>
//! ```
//!
//! Columns may be plain `<v>` elements or enumerated `<v0>`, `<v1>`, ... as
//! produced by `--enumds`.

use super::document::{Export, ExportMeta, ExportRow};
use crate::models::Timestamp;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_until, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, opt, value},
    error::{Error as NomError, ErrorKind},
    multi::many0,
    sequence::{delimited, preceded},
    IResult, Parser,
};
use thiserror::Error;

/// Errors that can occur while parsing an export.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum XportError {
    /// The input is empty.
    #[error("Empty export")]
    Empty,

    /// The XML is not well formed.
    #[error("Invalid export syntax: {0}")]
    SyntaxError(String),

    /// The root element is not `<xport>`.
    #[error("Unexpected root element: expected 'xport', found '{0}'")]
    UnexpectedRoot(String),

    /// A required element is missing.
    #[error("Missing element: <{0}>")]
    MissingElement(&'static str),

    /// An element holds text that is not a valid number.
    #[error("Invalid number in <{element}>: '{found}'")]
    InvalidNumber {
        /// The element name.
        element: String,
        /// The text found.
        found: String,
    },

    /// A row has a different number of values than the header declares.
    #[error("Row at {t} has {found} value(s), expected {expected}")]
    ColumnMismatch {
        /// Row timestamp.
        t: Timestamp,
        /// Declared column count.
        expected: usize,
        /// Values present in the row.
        found: usize,
    },
}

/// Parses an rrdtool XML export into an [`Export`].
///
/// # Errors
///
/// Returns an `XportError` if:
/// - The input is empty or not well-formed XML
/// - The root is not `<xport>`, or `<meta>`/`<data>` is missing
/// - A timestamp, count, or value is not a number
/// - A row's value count does not match `<columns>`
///
/// # Examples
///
/// ```
/// use shared::xport::parse_xport;
///
/// let xml = "<xport><meta><start>10</start><step>1</step><end>10</end>\
///            <rows>1</rows><columns>1</columns><legend><entry>sensor1</entry></legend></meta>\
///            <data><row><t>10</t><v>2.1500000000e+01</v></row></data></xport>";
/// let export = parse_xport(xml).unwrap();
/// assert_eq!(export.rows[0].values, vec![Some(21.5)]);
/// ```
pub fn parse_xport(input: &str) -> Result<Export, XportError> {
    if input.trim().is_empty() {
        return Err(XportError::Empty);
    }

    let root = match document(input) {
        Ok((remaining, root)) => {
            let remaining = remaining.trim();
            if !remaining.is_empty() {
                return Err(XportError::SyntaxError(format!(
                    "Unexpected trailing content: '{}'",
                    truncate(remaining)
                )));
            }
            root
        }
        Err(e) => return Err(XportError::SyntaxError(format!("{e}"))),
    };

    if root.name != "xport" {
        return Err(XportError::UnexpectedRoot(root.name.to_string()));
    }

    let meta = root.child("meta").ok_or(XportError::MissingElement("meta"))?;
    let data = root.child("data").ok_or(XportError::MissingElement("data"))?;

    let meta = ExportMeta {
        start: number_field(meta, "start")?,
        step: number_field(meta, "step")?,
        end: number_field(meta, "end")?,
        rows: number_field(meta, "rows")?,
        columns: number_field(meta, "columns")?,
        legend: meta
            .child("legend")
            .map(|legend| {
                legend
                    .children_named("entry")
                    .map(|entry| entry.text.trim().to_string())
                    .collect()
            })
            .unwrap_or_default(),
    };

    let rows = data
        .children_named("row")
        .map(|row| parse_row(row, meta.columns))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Export { meta, rows })
}

fn parse_row(row: &Element<'_>, columns: usize) -> Result<ExportRow, XportError> {
    let t = number_field(row, "t")?;

    let mut indexed: Vec<(usize, Option<f64>)> = Vec::new();
    for (position, cell) in row.children.iter().filter(|c| c.name != "t").enumerate() {
        let Some(index) = value_column(cell.name, position) else {
            continue;
        };
        indexed.push((index, parse_value(cell.name, &cell.text)?));
    }
    indexed.sort_by_key(|(index, _)| *index);

    if indexed.len() != columns {
        return Err(XportError::ColumnMismatch {
            t,
            expected: columns,
            found: indexed.len(),
        });
    }

    Ok(ExportRow {
        t,
        values: indexed.into_iter().map(|(_, v)| v).collect(),
    })
}

/// Column index of a value cell: `<vN>` is column N, plain `<v>` takes its position.
fn value_column(name: &str, position: usize) -> Option<usize> {
    let suffix = name.strip_prefix('v')?;
    if suffix.is_empty() {
        Some(position)
    } else {
        suffix.parse().ok()
    }
}

fn parse_value(element: &str, text: &str) -> Result<Option<f64>, XportError> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("nan")
        || text.eq_ignore_ascii_case("-nan")
        || text.eq_ignore_ascii_case("unkn")
    {
        return Ok(None);
    }

    let value: f64 = text.parse().map_err(|_| XportError::InvalidNumber {
        element: element.to_string(),
        found: text.to_string(),
    })?;

    Ok(if value.is_nan() { None } else { Some(value) })
}

fn number_field<T: std::str::FromStr>(
    parent: &Element<'_>,
    name: &'static str,
) -> Result<T, XportError> {
    let text = parent
        .child(name)
        .ok_or(XportError::MissingElement(name))?
        .text
        .trim();
    text.parse().map_err(|_| XportError::InvalidNumber {
        element: name.to_string(),
        found: text.to_string(),
    })
}

fn truncate(s: &str) -> String {
    s.chars().take(40).collect()
}

// ============================================================================
// Element tree
// ============================================================================

/// A parsed XML element. Attributes are accepted and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Element<'a> {
    name: &'a str,
    text: String,
    children: Vec<Element<'a>>,
}

impl<'a> Element<'a> {
    fn child(&self, name: &str) -> Option<&Element<'a>> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Element<'a>> + 's {
        self.children.iter().filter(move |c| c.name == name)
    }
}

enum Node<'a> {
    Element(Element<'a>),
    Text(String),
    Skip,
}

// ============================================================================
// Document parser
// ============================================================================

fn document(input: &str) -> IResult<&str, Element<'_>> {
    let (input, _) = misc(input)?;
    let (input, root) = element(input)?;
    let (input, _) = misc(input)?;
    Ok((input, root))
}

/// Whitespace, processing instructions, comments, and doctype declarations.
fn misc(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            whitespace,
            processing_instruction,
            comment,
            doctype,
        ))),
    )
    .parse(input)
}

fn whitespace(input: &str) -> IResult<&str, ()> {
    value((), multispace1).parse(input)
}

fn processing_instruction(input: &str) -> IResult<&str, ()> {
    value((), delimited(tag("<?"), take_until("?>"), tag("?>"))).parse(input)
}

fn comment(input: &str) -> IResult<&str, ()> {
    value((), delimited(tag("<!--"), take_until("-->"), tag("-->"))).parse(input)
}

fn doctype(input: &str) -> IResult<&str, ()> {
    value((), delimited(tag("<!DOCTYPE"), is_not(">"), char('>'))).parse(input)
}

// ============================================================================
// Element parser
// ============================================================================

fn element(input: &str) -> IResult<&str, Element<'_>> {
    let (input, _) = char('<').parse(input)?;
    let (input, name) = element_name(input)?;
    let (input, _) = many0(preceded(whitespace, attribute)).parse(input)?;
    let (input, _) = multispace0(input)?;

    let (input, self_closing) = opt(tag("/>")).parse(input)?;
    if self_closing.is_some() {
        return Ok((
            input,
            Element {
                name,
                text: String::new(),
                children: Vec::new(),
            },
        ));
    }

    let (input, _) = char('>').parse(input)?;
    let (input, nodes) = many0(content_node).parse(input)?;
    let (input, _) = closing_tag(input, name)?;

    let mut text = String::new();
    let mut children = Vec::new();
    for node in nodes {
        match node {
            Node::Element(child) => children.push(child),
            Node::Text(t) => text.push_str(&t),
            Node::Skip => {}
        }
    }

    Ok((
        input,
        Element {
            name,
            text,
            children,
        },
    ))
}

fn content_node(input: &str) -> IResult<&str, Node<'_>> {
    alt((
        map(comment, |()| Node::Skip),
        map(processing_instruction, |()| Node::Skip),
        map(element, Node::Element),
        map(take_while1(|c: char| c != '<'), |t: &str| {
            Node::Text(decode_entities(t))
        }),
    ))
    .parse(input)
}

fn closing_tag<'a>(input: &'a str, name: &str) -> IResult<&'a str, ()> {
    let (rest, _) = tag("</").parse(input)?;
    let (rest, found) = element_name(rest)?;
    if found != name {
        return Err(nom::Err::Failure(NomError::new(input, ErrorKind::Tag)));
    }
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('>').parse(rest)?;
    Ok((rest, ()))
}

fn element_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')).parse(input)
}

fn attribute(input: &str) -> IResult<&str, ()> {
    let (input, _) = element_name(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('=').parse(input)?;
    let (input, _) = multispace0(input)?;
    value(
        (),
        alt((
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
        )),
    )
    .parse(input)
}

/// Decodes the predefined XML entities and numeric character references.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let Some(semi) = rest.find(';') else {
            break;
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };

        if let Some(c) = decoded {
            out.push(c);
            rest = &rest[semi + 1..];
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }

    out.push_str(rest);
    out
}
