//! Positional message formatting
//!
//! Templates reference arguments by position: `{0}`, `{1,number}`,
//! `{0,date,long}`, `{2,choice,0#none|1#one|1<many}`. A single quote starts
//! quoted literal text, so `'{0}'` prints the braces and `''` prints one quote.
//! A lone `}` outside an argument is plain text.

use crate::error::FormatError;
use crate::locale::Locale;
use crate::replacement::Replacement;
use crate::symbols::{chrono_locale, locale_data, DateStyle, LocaleData, NumberSymbols};
use chrono::{DateTime, Utc};
use std::fmt::Write;

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Argument { index: usize, kind: ArgumentKind },
}

#[derive(Debug, Clone)]
enum ArgumentKind {
    Plain,
    Number(NumberStyle),
    Date(DateTimeStyle),
    Time(DateTimeStyle),
    Choice(Vec<ChoiceBranch>),
}

#[derive(Debug, Clone)]
enum NumberStyle {
    General,
    Integer,
    Percent,
    Pattern(DecimalFormat),
}

#[derive(Debug, Clone)]
enum DateTimeStyle {
    Preset(DateStyle),
    /// Already translated to strftime syntax
    Pattern(String),
}

#[derive(Debug, Clone)]
struct ChoiceBranch {
    limit: f64,
    /// `<` limits match values strictly greater than the limit
    exclusive: bool,
    message: Vec<Segment>,
}

/// A parsed template bound to a locale
#[derive(Debug, Clone)]
pub struct MessageFormat {
    locale: Locale,
    segments: Vec<Segment>,
}

impl MessageFormat {
    /// Parse `pattern` for formatting in `locale`
    pub fn new(pattern: &str, locale: &Locale) -> Result<Self, FormatError> {
        Ok(Self {
            locale: locale.clone(),
            segments: parse_segments(pattern)?,
        })
    }

    /// Locale the message is formatted in
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Substitute `args` into the template.
    ///
    /// Every referenced index must be supplied; unreferenced arguments are
    /// ignored.
    pub fn format(&self, args: &[Replacement]) -> Result<String, FormatError> {
        let data = locale_data(&self.locale);
        let context = Context {
            chrono: chrono_locale(&self.locale, &data),
            data,
        };

        let mut out = String::new();
        write_segments(&self.segments, args, &context, &mut out)?;
        Ok(out)
    }
}

/// Parse and format in one step
pub fn format_message(
    pattern: &str,
    locale: &Locale,
    args: &[Replacement],
) -> Result<String, FormatError> {
    MessageFormat::new(pattern, locale)?.format(args)
}

fn parse_segments(pattern: &str) -> Result<Vec<Segment>, FormatError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut quoted = false;
    let mut pos = 0;

    while let Some(c) = pattern[pos..].chars().next() {
        let next = pos + c.len_utf8();
        match c {
            '\'' if pattern[next..].starts_with('\'') => {
                literal.push('\'');
                pos = next + 1;
                continue;
            }
            '\'' => quoted = !quoted,
            '{' if !quoted => {
                let end = element_end(pattern, next).ok_or(FormatError::UnmatchedBrace { offset: pos })?;
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(parse_element(&pattern[next..end])?);
                pos = end + 1;
                continue;
            }
            _ => literal.push(c),
        }
        pos = next;
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Byte offset of the `}` closing an element whose body starts at `start`
fn element_end(pattern: &str, start: usize) -> Option<usize> {
    let mut depth = 0_usize;
    let mut quoted = false;

    for (i, c) in pattern[start..].char_indices() {
        match c {
            '\'' => quoted = !quoted,
            '{' if !quoted => depth += 1,
            '}' if !quoted => {
                if depth == 0 {
                    return Some(start + i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

fn parse_element(body: &str) -> Result<Segment, FormatError> {
    let mut parts = body.splitn(3, ',');
    let index_text = parts.next().unwrap_or_default().trim();
    let index = index_text
        .parse::<usize>()
        .map_err(|_| FormatError::InvalidArgumentIndex(index_text.to_string()))?;

    let format_type = parts.next().map(|t| t.trim().to_ascii_lowercase());
    let style = parts.next();

    let kind = match format_type.as_deref() {
        None | Some("") if style.is_none() => ArgumentKind::Plain,
        Some("number") => ArgumentKind::Number(parse_number_style(style)?),
        Some("date") => ArgumentKind::Date(parse_date_style(style, "date")?),
        Some("time") => ArgumentKind::Time(parse_date_style(style, "time")?),
        Some("choice") => ArgumentKind::Choice(parse_choice(style.unwrap_or_default())?),
        other => {
            return Err(FormatError::UnknownFormatType(
                other.unwrap_or_default().to_string(),
            ))
        }
    };

    Ok(Segment::Argument { index, kind })
}

fn parse_number_style(style: Option<&str>) -> Result<NumberStyle, FormatError> {
    let style = style.map(str::trim).unwrap_or_default();
    Ok(match style.to_ascii_lowercase().as_str() {
        "" => NumberStyle::General,
        "integer" => NumberStyle::Integer,
        "percent" => NumberStyle::Percent,
        _ => NumberStyle::Pattern(DecimalFormat::parse(style)?),
    })
}

fn parse_date_style(style: Option<&str>, kind: &'static str) -> Result<DateTimeStyle, FormatError> {
    let style = style.map(str::trim).unwrap_or_default();
    Ok(match style.to_ascii_lowercase().as_str() {
        "" | "medium" => DateTimeStyle::Preset(DateStyle::Medium),
        "short" => DateTimeStyle::Preset(DateStyle::Short),
        "long" => DateTimeStyle::Preset(DateStyle::Long),
        "full" => DateTimeStyle::Preset(DateStyle::Full),
        _ => DateTimeStyle::Pattern(strftime_pattern(style, kind)?),
    })
}

fn parse_choice(style: &str) -> Result<Vec<ChoiceBranch>, FormatError> {
    let invalid = || FormatError::InvalidChoice(style.to_string());
    let mut branches: Vec<ChoiceBranch> = Vec::new();

    for branch in split_choice(style) {
        let at = branch.find(['#', '<', '\u{2264}']).ok_or_else(invalid)?;
        let limit = parse_limit(&branch[..at]).ok_or_else(invalid)?;
        let separator = branch[at..].chars().next().unwrap_or('#');
        let text = &branch[at + separator.len_utf8()..];

        if branches.last().is_some_and(|previous| limit < previous.limit) {
            return Err(invalid());
        }

        branches.push(ChoiceBranch {
            limit,
            exclusive: separator == '<',
            message: parse_segments(text)?,
        });
    }

    if branches.is_empty() {
        return Err(invalid());
    }
    Ok(branches)
}

/// Split a choice pattern on `|` outside quotes and nested arguments
fn split_choice(style: &str) -> Vec<&str> {
    let mut branches = Vec::new();
    let mut depth = 0_usize;
    let mut quoted = false;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            '{' if !quoted => depth += 1,
            '}' if !quoted => depth = depth.saturating_sub(1),
            '|' if !quoted && depth == 0 => {
                branches.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < style.len() {
        branches.push(&style[start..]);
    }
    branches
}

fn parse_limit(text: &str) -> Option<f64> {
    match text.trim() {
        "\u{221e}" | "+\u{221e}" => Some(f64::INFINITY),
        "-\u{221e}" => Some(f64::NEG_INFINITY),
        number => number.parse().ok(),
    }
}

/// Translate a date pattern (`yyyy-MM-dd HH:mm`) into strftime syntax
fn strftime_pattern(pattern: &str, kind: &'static str) -> Result<String, FormatError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut quoted = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
            } else {
                quoted = !quoted;
                i += 1;
            }
            continue;
        }
        if quoted || !c.is_ascii_alphabetic() {
            if c == '%' {
                out.push_str("%%");
            } else {
                out.push(c);
            }
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&next| next == c).count();
        let directive = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('S', _) => "%3f",
            ('a', _) => "%p",
            ('z', _) => "%Z",
            ('Z', _) => "%z",
            _ => {
                return Err(FormatError::InvalidStyle {
                    kind,
                    style: pattern.to_string(),
                })
            }
        };
        out.push_str(directive);
        i += run;
    }

    Ok(out)
}

struct Context {
    data: LocaleData,
    chrono: chrono::Locale,
}

fn write_segments(
    segments: &[Segment],
    args: &[Replacement],
    context: &Context,
    out: &mut String,
) -> Result<(), FormatError> {
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Argument { index, kind } => {
                let value = args.get(*index).ok_or(FormatError::MissingArgument {
                    index: *index,
                    supplied: args.len(),
                })?;
                write_argument(*index, value, kind, args, context, out)?;
            }
        }
    }
    Ok(())
}

fn write_argument(
    index: usize,
    value: &Replacement,
    kind: &ArgumentKind,
    args: &[Replacement],
    context: &Context,
    out: &mut String,
) -> Result<(), FormatError> {
    let symbols = &context.data.numbers;
    let mismatch = |expected| FormatError::TypeMismatch { index, expected };

    match kind {
        ArgumentKind::Plain => match value {
            Replacement::Null => out.push_str("null"),
            Replacement::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
            Replacement::Int(_) | Replacement::Float(_) => {
                let number = Number::from_replacement(value).ok_or_else(|| mismatch("number"))?;
                out.push_str(&DecimalFormat::general().format(number, symbols));
            }
            Replacement::Str(text) => out.push_str(text),
            Replacement::DateTime(when) => {
                let dates = &context.data.dates;
                render_datetime(out, when, dates.date(DateStyle::Short), context, "date")?;
                out.push_str(dates.joiner);
                render_datetime(out, when, dates.time(DateStyle::Short), context, "time")?;
            }
        },
        ArgumentKind::Number(style) => {
            let number = Number::from_replacement(value).ok_or_else(|| mismatch("number"))?;
            let format = match style {
                NumberStyle::General => DecimalFormat::general(),
                NumberStyle::Integer => DecimalFormat::integer(),
                NumberStyle::Percent => DecimalFormat::percent(symbols),
                NumberStyle::Pattern(format) => format.clone(),
            };
            out.push_str(&format.format(number, symbols));
        }
        ArgumentKind::Date(style) | ArgumentKind::Time(style) => {
            let is_date = matches!(kind, ArgumentKind::Date(_));
            let label = if is_date { "date" } else { "time" };
            let when = as_datetime(value).ok_or_else(|| mismatch("date"))?;
            let pattern = match style {
                DateTimeStyle::Preset(preset) if is_date => context.data.dates.date(*preset),
                DateTimeStyle::Preset(preset) => context.data.dates.time(*preset),
                DateTimeStyle::Pattern(pattern) => pattern.as_str(),
            };
            render_datetime(out, &when, pattern, context, label)?;
        }
        ArgumentKind::Choice(branches) => {
            let number = value.as_f64().ok_or_else(|| mismatch("number"))?;
            let branch = select_branch(branches, number)
                .ok_or_else(|| FormatError::InvalidChoice(String::new()))?;
            write_segments(&branch.message, args, context, out)?;
        }
    }
    Ok(())
}

fn select_branch(branches: &[ChoiceBranch], value: f64) -> Option<&ChoiceBranch> {
    let mut selected = branches.first()?;
    for branch in branches {
        let matches = if branch.exclusive {
            value > branch.limit
        } else {
            value >= branch.limit
        };
        if !matches {
            break;
        }
        selected = branch;
    }
    Some(selected)
}

/// Date-times, or integers taken as epoch milliseconds
fn as_datetime(value: &Replacement) -> Option<DateTime<Utc>> {
    match value {
        Replacement::DateTime(when) => Some(*when),
        Replacement::Int(millis) => DateTime::from_timestamp_millis(*millis),
        _ => None,
    }
}

fn render_datetime(
    out: &mut String,
    when: &DateTime<Utc>,
    pattern: &str,
    context: &Context,
    kind: &'static str,
) -> Result<(), FormatError> {
    write!(out, "{}", when.format_localized(pattern, context.chrono)).map_err(|_| {
        FormatError::InvalidStyle {
            kind,
            style: pattern.to_string(),
        }
    })
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn from_replacement(value: &Replacement) -> Option<Self> {
        match value {
            Replacement::Int(value) => Some(Self::Int(*value)),
            Replacement::Float(value) => Some(Self::Float(*value)),
            _ => None,
        }
    }

    fn times_hundred(self) -> Self {
        match self {
            Self::Int(value) => value
                .checked_mul(100)
                .map_or(Self::Float(value as f64 * 100.0), Self::Int),
            Self::Float(value) => Self::Float(value * 100.0),
        }
    }
}

/// Decimal number layout: digits, grouping and affixes
#[derive(Debug, Clone, PartialEq, Eq)]
struct DecimalFormat {
    prefix: String,
    suffix: String,
    min_int: usize,
    min_frac: usize,
    max_frac: usize,
    grouping: Option<usize>,
    percent: bool,
}

fn is_number_char(c: char) -> bool {
    matches!(c, '#' | '0' | ',' | '.')
}

impl DecimalFormat {
    /// `#,##0.###`
    fn general() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            min_int: 1,
            min_frac: 0,
            max_frac: 3,
            grouping: Some(3),
            percent: false,
        }
    }

    /// `#,##0`
    fn integer() -> Self {
        Self {
            max_frac: 0,
            ..Self::general()
        }
    }

    fn percent(symbols: &NumberSymbols) -> Self {
        Self {
            suffix: symbols.percent_suffix.to_string(),
            max_frac: 0,
            percent: true,
            ..Self::general()
        }
    }

    /// Parse the `#`, `0`, `,`, `.` pattern subset with literal affixes
    fn parse(pattern: &str) -> Result<Self, FormatError> {
        let invalid = || FormatError::InvalidStyle {
            kind: "number",
            style: pattern.to_string(),
        };

        let positive = pattern.split(';').next().unwrap_or_default();
        let start = positive.find(is_number_char).ok_or_else(invalid)?;
        let end = positive[start..]
            .find(|c| !is_number_char(c))
            .map_or(positive.len(), |offset| start + offset);

        let body = &positive[start..end];
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if frac_part.contains(['.', ',']) || !body.contains(['#', '0']) {
            return Err(invalid());
        }

        let grouping = int_part.rfind(',').map(|at| int_part.len() - at - 1);
        if grouping == Some(0) {
            return Err(invalid());
        }

        let (prefix, percent_prefix) = parse_affix(&positive[..start]);
        let (suffix, percent_suffix) = parse_affix(&positive[end..]);

        Ok(Self {
            min_int: int_part.matches('0').count(),
            min_frac: frac_part.matches('0').count(),
            max_frac: frac_part.len(),
            grouping,
            percent: percent_prefix || percent_suffix,
            prefix,
            suffix,
        })
    }

    fn format(&self, number: Number, symbols: &NumberSymbols) -> String {
        let number = if self.percent {
            number.times_hundred()
        } else {
            number
        };

        let (negative, int_digits, mut frac) = match number {
            Number::Int(value) => (value < 0, value.unsigned_abs().to_string(), String::new()),
            Number::Float(value) if value.is_nan() => return "NaN".to_string(),
            Number::Float(value) if value.is_infinite() => {
                let sign = if value < 0.0 { symbols.minus.to_string() } else { String::new() };
                return format!("{sign}{}\u{221e}{}", self.prefix, self.suffix);
            }
            Number::Float(value) => {
                let rendered = format!("{:.*}", self.max_frac, value.abs());
                let (int, frac) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
                (value < 0.0, int.to_string(), frac.to_string())
            }
        };

        while frac.len() > self.min_frac && frac.ends_with('0') {
            frac.pop();
        }

        let mut int = int_digits.trim_start_matches('0').to_string();
        while int.len() < self.min_int {
            int.insert(0, '0');
        }
        if int.is_empty() && frac.is_empty() {
            int.push('0');
        }

        let is_zero = !int.chars().chain(frac.chars()).any(|c| c != '0');
        let mut out = String::new();
        if negative && !is_zero {
            out.push(symbols.minus);
        }
        out.push_str(&self.prefix);
        out.push_str(&group_digits(&int, self.grouping, symbols.group));
        if !frac.is_empty() {
            out.push(symbols.decimal);
            out.push_str(&frac);
        }
        out.push_str(&self.suffix);
        out
    }
}

fn group_digits(digits: &str, size: Option<usize>, separator: char) -> String {
    let Some(size) = size.filter(|size| *size > 0) else {
        return digits.to_string();
    };

    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / size);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % size == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Strip quotes from a number pattern affix, reporting an unquoted `%`
fn parse_affix(affix: &str) -> (String, bool) {
    let mut out = String::with_capacity(affix.len());
    let mut quoted = false;
    let mut percent = false;
    let mut chars = affix.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                if chars.next_if_eq(&'\'').is_some() {
                    out.push('\'');
                } else {
                    quoted = !quoted;
                }
            }
            '%' if !quoted => {
                percent = true;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    (out, percent)
}
