//! Legacy line-oriented text protocol.
//!
//! ```text
//! 3
//! Stop Tolstopaltsevo: 55.611087, 37.20829, 3900m to Marushkino
//! Stop Marushkino: 55.595884, 37.209755
//! Bus 750: Tolstopaltsevo - Marushkino
//! 2
//! Bus 750
//! Stop Marushkino
//! ```
//!
//! Bus routes separate stops with ` > ` for roundtrip routes and ` - ` for
//! linear ones. Each query produces one output line.

use std::io::{BufRead, Write};

use crate::models::{Bus, Result, RouteKind, Stop, TransitError};
use crate::requests::{BaseRequest, Batch, Outcome, RequestType, StatRequest, StatResponse};

const ROUNDTRIP_SEPARATOR: &str = " > ";
const LINEAR_SEPARATOR: &str = " - ";

/// Significant digits of route lengths in text output
const LENGTH_PRECISION: usize = 6;
/// Significant digits of curvature in text output
const CURVATURE_PRECISION: usize = 7;

/// Read a complete batch: a base request count, that many base request
/// lines, a stat request count and that many stat request lines.
pub fn parse_batch<R: BufRead>(reader: R) -> Result<Batch> {
    let mut lines = reader.lines();
    let mut next_line = |what: &str| -> Result<String> {
        lines
            .next()
            .transpose()?
            .ok_or_else(|| TransitError::InvalidData(format!("unexpected end of input, expected {}", what)))
    };

    let base_count = parse_count(&next_line("base request count")?)?;
    let base_requests = (0..base_count)
        .map(|_| next_line("base request").and_then(|line| parse_base_request(&line)))
        .collect::<Result<Vec<_>>>()?;

    let stat_count = parse_count(&next_line("stat request count")?)?;
    let stat_requests = (0..stat_count)
        .map(|_| next_line("stat request").and_then(|line| parse_stat_request(&line)))
        .collect::<Result<Vec<_>>>()?;

    Ok(Batch {
        base_requests,
        stat_requests,
    })
}

fn parse_count(line: &str) -> Result<usize> {
    line.trim()
        .parse()
        .map_err(|_| TransitError::InvalidData(format!("expected a request count, got '{}'", line.trim())))
}

fn parse_number(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| TransitError::InvalidData(format!("invalid number '{}'", text.trim())))
}

/// Split `Tag rest` into the request type and the rest of the line.
fn split_tag(line: &str) -> Result<(RequestType, &str)> {
    let line = line.trim();
    let (tag, rest) = line.split_once(' ').unwrap_or((line, ""));
    Ok((RequestType::from_tag(tag)?, rest.trim()))
}

pub fn parse_base_request(line: &str) -> Result<BaseRequest> {
    let (request_type, body) = split_tag(line)?;
    let (name, description) = body
        .split_once(':')
        .ok_or_else(|| TransitError::InvalidData(format!("missing ':' in '{}'", line.trim())))?;
    let name = name.trim();
    let description = description.trim();

    match request_type {
        RequestType::Bus => Ok(BaseRequest::Bus(parse_bus(name, description))),
        RequestType::Stop => parse_stop(name, description).map(BaseRequest::Stop),
    }
}

fn parse_bus(name: &str, route: &str) -> Bus {
    let (separator, kind) = if route.contains(ROUNDTRIP_SEPARATOR) {
        (ROUNDTRIP_SEPARATOR, RouteKind::Roundtrip)
    } else {
        (LINEAR_SEPARATOR, RouteKind::Linear)
    };

    let stops = route.split(separator).map(str::trim).filter(|stop| !stop.is_empty());
    Bus::new(name, stops, kind)
}

fn parse_stop(name: &str, description: &str) -> Result<Stop> {
    let mut fields = description.split(',');
    let mut coordinate = |what: &str| {
        fields
            .next()
            .ok_or_else(|| TransitError::InvalidData(format!("stop {} has no {}", name, what)))
            .and_then(parse_number)
    };
    let latitude = coordinate("latitude")?;
    let longitude = coordinate("longitude")?;

    let mut stop = Stop::new(name, latitude, longitude);
    for field in fields {
        let (meters, to) = field
            .split_once("m to ")
            .ok_or_else(|| TransitError::InvalidData(format!("invalid road distance '{}'", field.trim())))?;
        stop.add_road_distance(to.trim(), parse_number(meters)?);
    }
    Ok(stop)
}

pub fn parse_stat_request(line: &str) -> Result<StatRequest> {
    let (request_type, name) = split_tag(line)?;
    if name.is_empty() {
        return Err(TransitError::InvalidData(format!("query '{}' has no name", line.trim())));
    }
    Ok(StatRequest {
        id: None,
        request_type,
        name: name.to_owned(),
    })
}

/// Render one response line (without the newline).
pub fn format_response(response: &StatResponse) -> String {
    match &response.outcome {
        Outcome::Bus(stats) => {
            let mut line = format!(
                "Bus {}: {} stops on route, {} unique stops, {} route length",
                stats.name,
                stats.stop_count,
                stats.unique_stop_count,
                format_significant(stats.route_length(), LENGTH_PRECISION)
            );
            if let Some(curvature) = stats.curvature() {
                line.push_str(&format!(", {} curvature", format_significant(curvature, CURVATURE_PRECISION)));
            }
            line
        }
        Outcome::Stop(stats) if stats.buses.is_empty() => format!("Stop {}: no buses", stats.name),
        Outcome::Stop(stats) => {
            let buses: Vec<&str> = stats.buses.iter().map(|bus| bus.as_str()).collect();
            format!("Stop {}: buses {}", stats.name, buses.join(" "))
        }
        Outcome::NotFound { request_type, name } => format!("{} {}: not found", request_type.as_str(), name),
    }
}

/// Format like C's `%.<digits>g`: `digits` significant digits, trailing
/// zeros removed, scientific notation for very small or large magnitudes.
pub fn format_significant(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = digits.max(1);

    // The exponent must come from the rounded value
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_fraction_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        strip_fraction_zeros(&format!("{:.*}", decimals, value)).to_owned()
    }
}

fn strip_fraction_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Parse a legacy batch from `reader`, run it and write one line per query.
pub fn process_lines<R: BufRead, W: Write>(reader: R, writer: &mut W) -> Result<()> {
    let batch = parse_batch(reader)?;
    let responses = batch.execute()?;

    for response in &responses {
        writeln!(writer, "{}", format_response(response))?;
    }
    Ok(())
}
