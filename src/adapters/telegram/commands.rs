//! Chat command parsing.
//!
//! Splits incoming message text into typed bot commands. Parsing here
//! is lexical; semantic validation (VIN checksums, grade ranges, dates)
//! happens in the domain validators when the command is dispatched.

use chrono::NaiveDate;

use crate::domain::filter::{FilterCriteria, SaleWindow};
use crate::domain::foundation::{Grade, Mileage, Region};
use crate::domain::pagination::PageDirection;

/// Forecast horizon used when /trend is issued without an argument.
pub const DEFAULT_TREND_MONTHS: u32 = 3;

const VIN_USAGE: &str = "Please provide a VIN. Examples:\n\
/vin 1HGCM82633A123456\n\
/vin 1HGCM82633A123456 SE  (with subseries)\n\
/vin 1HGCM82633A123456 SE AUTO  (with subseries and transmission)\n\n\
For advanced options, use keyword arguments after the VIN:\n\
/vin WBA3C1C5XFP853102 color=WHITE grade=3.5 odometer=20000 region=NE";

const YMM_USAGE: &str =
    "Please provide Year, Make, and Model. Example: /ymm 2020 Honda Accord\n\
Optionally add a trim or refinement parameters:\n\
/ymm 2020 Honda Accord trim=Sport grade=4.0";

const FILTER_USAGE: &str = "Filter the cached transactions. Examples:\n\
/filter grade=4.0          (condition grade 4.0 or better)\n\
/filter odometer=80000     (at most 80,000 miles)\n\
/filter months=6           (sold in the last 6 months)\n\
/filter since=2024-01-01   (sold on or after a date)\n\
/filter region=NE,SE       (sold in any of the listed regions)\n\
/filter clear              (drop all filters)\n\n\
Fields can be combined: /filter grade=3.5 region=MW months=12\n\
Each /filter call replaces the previous filter.";

const PAGE_USAGE: &str = "Browse the transaction list. Examples:\n\
/page          (next page)\n\
/page prev     (previous page)\n\
/page first    (back to the first page)";

const TREND_USAGE: &str =
    "Forecast the price trend. /trend projects 3 months ahead; /trend 6 projects 6.";

/// A parsed bot command, still carrying raw argument strings.
#[derive(Debug, Clone, PartialEq)]
pub enum BotCommand {
    Start,
    Help,
    Vin {
        vin: String,
        subseries: Option<String>,
        transmission: Option<String>,
        refinements: Vec<(String, String)>,
    },
    Ymm {
        year: String,
        make: String,
        model: String,
        trim: Option<String>,
        refinements: Vec<(String, String)>,
    },
    Filter(Vec<(String, String)>),
    FilterClear,
    Page(PageDirection),
    Trend {
        months: u32,
    },
    History,
}

/// A command the user got wrong, with the usage text to send back.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    fn usage(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parses one message. Returns None for plain text that is not a
/// command; commands with bad arguments come back as errors carrying a
/// user-facing usage message.
pub fn parse(text: &str) -> Option<Result<BotCommand, CommandError>> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut tokens = trimmed.split_whitespace();
    let head = tokens.next()?;
    // Group chats append the bot mention: "/vin@SomeBot".
    let name = head
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    let args: Vec<&str> = tokens.collect();

    let result = match name.as_str() {
        "start" => Ok(BotCommand::Start),
        "help" => Ok(BotCommand::Help),
        "vin" => parse_vin(&args),
        "ymm" => parse_ymm(&args),
        "filter" => parse_filter(&args),
        "page" => parse_page(&args),
        "trend" => parse_trend(&args),
        "history" => Ok(BotCommand::History),
        _ => Err(CommandError::usage(
            "Unknown command. Type /help for the list of commands.",
        )),
    };
    Some(result)
}

fn parse_vin(args: &[&str]) -> Result<BotCommand, CommandError> {
    let vin = match args.first() {
        Some(vin) => (*vin).to_string(),
        None => return Err(CommandError::usage(VIN_USAGE)),
    };
    let rest = &args[1..];

    // key=value anywhere after the VIN switches the whole tail to
    // keyword mode, matching how positional subseries lookups never mix
    // with refinement parameters.
    let has_keyword_args = rest.iter().any(|arg| arg.contains('='));

    let mut subseries = None;
    let mut transmission = None;
    let mut refinements = Vec::new();

    if has_keyword_args {
        for arg in rest {
            if let Some((key, value)) = arg.split_once('=') {
                refinements.push((key.to_ascii_lowercase(), value.to_string()));
            }
        }
    } else {
        subseries = rest.first().map(|s| (*s).to_string());
        transmission = rest.get(1).map(|s| (*s).to_string());
    }

    Ok(BotCommand::Vin {
        vin,
        subseries,
        transmission,
        refinements,
    })
}

fn parse_ymm(args: &[&str]) -> Result<BotCommand, CommandError> {
    // Positional words first (the model may span several), key=value
    // tokens from the first '=' onward.
    let split = args
        .iter()
        .position(|arg| arg.contains('='))
        .unwrap_or(args.len());
    let (positional, keyword) = args.split_at(split);

    if positional.len() < 3 {
        return Err(CommandError::usage(YMM_USAGE));
    }

    let mut trim = None;
    let mut refinements = Vec::new();
    for arg in keyword {
        if let Some((key, value)) = arg.split_once('=') {
            let key = key.to_ascii_lowercase();
            if key == "trim" {
                trim = Some(value.to_string());
            } else {
                refinements.push((key, value.to_string()));
            }
        }
    }

    Ok(BotCommand::Ymm {
        year: positional[0].to_string(),
        make: positional[1].to_string(),
        model: positional[2..].join(" "),
        trim,
        refinements,
    })
}

fn parse_filter(args: &[&str]) -> Result<BotCommand, CommandError> {
    if args.len() == 1 && args[0].eq_ignore_ascii_case("clear") {
        return Ok(BotCommand::FilterClear);
    }
    if args.is_empty() {
        return Err(CommandError::usage(FILTER_USAGE));
    }

    let mut pairs = Vec::new();
    for arg in args {
        match arg.split_once('=') {
            Some((key, value)) => pairs.push((key.to_ascii_lowercase(), value.to_string())),
            None => return Err(CommandError::usage(FILTER_USAGE)),
        }
    }
    Ok(BotCommand::Filter(pairs))
}

fn parse_page(args: &[&str]) -> Result<BotCommand, CommandError> {
    let token = args.first().map(|s| s.to_ascii_lowercase());
    let direction = match token.as_deref() {
        None | Some("next") => PageDirection::Next,
        Some("prev") | Some("previous") => PageDirection::Previous,
        Some("first") => PageDirection::First,
        Some(_) => return Err(CommandError::usage(PAGE_USAGE)),
    };
    Ok(BotCommand::Page(direction))
}

fn parse_trend(args: &[&str]) -> Result<BotCommand, CommandError> {
    let months = match args.first() {
        None => DEFAULT_TREND_MONTHS,
        Some(raw) => raw
            .parse()
            .map_err(|_| CommandError::usage(TREND_USAGE))?,
    };
    Ok(BotCommand::Trend { months })
}

/// Builds filter criteria from parsed `key=value` pairs. The whole set
/// replaces any previously active filter.
pub fn parse_filter_criteria(pairs: &[(String, String)]) -> Result<FilterCriteria, CommandError> {
    let mut criteria = FilterCriteria::default();

    for (key, value) in pairs {
        match key.as_str() {
            "grade" => {
                let raw: f64 = value.parse().map_err(|_| {
                    CommandError::usage("grade must be a number between 0.0 and 5.0")
                })?;
                let grade =
                    Grade::try_new(raw).map_err(|e| CommandError::usage(e.to_string()))?;
                criteria.min_grade = Some(grade);
            }
            "odometer" => {
                let miles: u32 = value.parse().map_err(|_| {
                    CommandError::usage("odometer must be a whole number of miles")
                })?;
                criteria.max_odometer = Some(Mileage::new(miles));
            }
            "months" => {
                let months: u32 = value
                    .parse()
                    .map_err(|_| CommandError::usage("months must be a whole number"))?;
                if months == 0 {
                    return Err(CommandError::usage("months must be at least 1"));
                }
                criteria.sale_window = Some(SaleWindow::LastMonths(months));
            }
            "since" => {
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                    CommandError::usage("since must be a date like 2024-01-31")
                })?;
                criteria.sale_window = Some(SaleWindow::Since(date));
            }
            "region" => {
                for code in value.split(',') {
                    let region = code
                        .parse::<Region>()
                        .map_err(|e| CommandError::usage(e.to_string()))?;
                    criteria.regions.insert(region);
                }
            }
            other => {
                return Err(CommandError::usage(format!(
                    "Unknown filter field '{}'.\n\n{}",
                    other, FILTER_USAGE
                )));
            }
        }
    }

    Ok(criteria)
}
