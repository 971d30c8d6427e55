//! Extractors for the follow-up annotation lines of a request.
//!
//! Each function looks at the text of one annotation cell and returns the
//! fragment it recognised, or None when its pattern does not occur.

use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

use super::values::parse_decimal;
use crate::model::{ConnectionPoint, CounterInfo, Inspection};

// "Т.учета: № 0123456 СО-505 1 р. 2,0 кл. госп: 15.08.2018"
static COUNTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"№\s*(?P<number>\d+)\s+(?P<type>.+?)\s+\d\s*[рp]\.(?:.*?госп:\s*\d{2}\.(?P<month>\d{2})\.(?P<year>\d{4}))?",
    )
    .expect("counter pattern")
});

static SUBSTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ТП:\s*([\w-]+)").expect("substation pattern"));

static FEEDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Ф\.\s*(\d+)").expect("feeder pattern"));

static PILLAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"оп\.\s*([\w/]+)").expect("pillar pattern"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"тел\.:\s*\+?(\d{5,12})").expect("phone pattern"));

static POWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Мощность:\s*(\d{1,3},?\d?)").expect("power pattern"));

/// Meter number, type and (optionally) the last state verification date.
pub fn extract_counter(text: &str) -> Option<CounterInfo> {
    let caps = COUNTER.captures(text)?;

    let inspection = match (caps.name("month"), caps.name("year")) {
        (Some(month), Some(year)) => {
            let month: u32 = month.as_str().parse().ok()?;
            let year: i32 = year.as_str().parse().ok()?;
            Inspection::from_month(month, year)
        }
        _ => None,
    };

    Some(CounterInfo {
        number: caps["number"].to_string(),
        meter_type: caps["type"].trim().to_string(),
        inspection,
    })
}

/// Substation, feeder and pillar codes; None when none of them occur.
pub fn extract_connection_point(text: &str) -> Option<ConnectionPoint> {
    let point = ConnectionPoint {
        substation: first_group(&SUBSTATION, text),
        feeder: first_group(&FEEDER, text),
        pillar: first_group(&PILLAR, text),
    };

    if point.is_empty() {
        None
    } else {
        Some(point)
    }
}

/// Phone digits without the leading "+".
pub fn extract_phone(text: &str) -> Option<String> {
    first_group(&PHONE, text)
}

fn first_group(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|c| c[1].to_string())
}

/// Connected power rating as written, plus its numeric value when it parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerRating {
    pub raw: String,
    pub value: Option<Decimal>,
}

impl PowerRating {
    /// A literal "0" means the dispatcher left the field unset.
    pub fn is_unset(&self) -> bool {
        self.raw == "0"
    }

    pub fn fragment(&self) -> String {
        format!("М: {}", self.raw)
    }
}

pub fn extract_power(text: &str) -> Option<PowerRating> {
    let raw = POWER.captures(text)?[1].to_string();
    let value = parse_decimal(&raw);
    Some(PowerRating { raw, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ANNOTATION: &str = "ТП: ТП-5 Ф. 12 оп. 7/3 тел.: +79781234567 Мощность: 0";

    #[test]
    fn test_counter_with_inspection() {
        let c = extract_counter("Т.учета: № 0123456 СО-505 1 р. 2,0 кл. госп: 15.08.2018").unwrap();
        assert_eq!(c.number, "0123456");
        assert_eq!(c.meter_type, "СО-505");
        assert_eq!(
            c.inspection,
            Some(Inspection {
                quarter: 3,
                year: 2018
            })
        );
    }

    #[test]
    fn test_counter_without_inspection() {
        let c = extract_counter("Т.учета: № 42 Меркурий 201 1 р.").unwrap();
        assert_eq!(c.number, "42");
        assert_eq!(c.meter_type, "Меркурий 201");
        assert!(c.inspection.is_none());
    }

    #[test]
    fn test_counter_latin_class_marker() {
        let c = extract_counter("Т.учета: № 7 ЦЭ6807 2 p. госп: 01.12.2015").unwrap();
        assert_eq!(c.meter_type, "ЦЭ6807");
        assert_eq!(c.inspection.unwrap().quarter, 4);
    }

    #[test]
    fn test_counter_invalid_month_drops_inspection() {
        let c = extract_counter("Т.учета: № 7 ЦЭ6807 2 р. госп: 01.13.2015").unwrap();
        assert!(c.inspection.is_none());
    }

    #[test]
    fn test_counter_miss() {
        assert!(extract_counter("Т.учета: нет данных").is_none());
    }

    #[test]
    fn test_connection_point() {
        let cp = extract_connection_point(ANNOTATION).unwrap();
        assert_eq!(cp.substation.as_deref(), Some("ТП-5"));
        assert_eq!(cp.feeder.as_deref(), Some("12"));
        assert_eq!(cp.pillar.as_deref(), Some("7/3"));
    }

    #[test]
    fn test_connection_point_partial() {
        let cp = extract_connection_point("ТП: КТП112 тел.: 12345").unwrap();
        assert_eq!(cp.substation.as_deref(), Some("КТП112"));
        assert!(cp.feeder.is_none());
        assert!(cp.pillar.is_none());
    }

    #[test]
    fn test_connection_point_absent() {
        assert!(extract_connection_point("тел.: 79781234567").is_none());
    }

    #[test]
    fn test_phone() {
        assert_eq!(extract_phone(ANNOTATION).as_deref(), Some("79781234567"));
        assert_eq!(extract_phone("тел.: 61234").as_deref(), Some("61234"));
        assert!(extract_phone("тел.: 1234").is_none());
    }

    #[test]
    fn test_power_zero_is_unset() {
        let p = extract_power(ANNOTATION).unwrap();
        assert!(p.is_unset());
        assert_eq!(p.value, Some(dec!(0)));
    }

    #[test]
    fn test_power_decimal_comma() {
        let p = extract_power("ТП: ТП-1 Мощность: 15,5").unwrap();
        assert!(!p.is_unset());
        assert_eq!(p.value, Some(dec!(15.5)));
        assert_eq!(p.fragment(), "М: 15,5");
    }
}
