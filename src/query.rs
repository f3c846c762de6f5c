//! ProvDAL request parameter resolution.
//!
//! Normalizes the request parameters case-insensitively, rejects duplicates
//! and unrecognized names, parses depth/direction/model/flag values, and
//! negotiates the response format against an `Accept`-style header. The
//! HTTP layer hands the raw name/value pairs in verbatim so repeated and
//! unknown parameters are still visible here.

use crate::error::QueryError;
use crate::render::OutputFormat;
use crate::serialize::Profile;
use crate::traverse::{DepthBudget, Direction, FollowFlags};

/// Parameter names this service recognizes.
const KNOWN_PARAMETERS: &[&str] = &[
    "ID",
    "DEPTH",
    "DIRECTION",
    "RESPONSEFORMAT",
    "MODEL",
    "MEMBERS",
    "STEPS",
    "AGENT",
];

/// Formats in negotiation preference order.
const FORMATS: &[OutputFormat] = &[
    OutputFormat::ProvN,
    OutputFormat::ProvJson,
    OutputFormat::ProvXml,
    OutputFormat::Graph,
    OutputFormat::GraphJson,
];

/// A fully validated ProvDAL query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    pub ids: Vec<String>,
    pub depth: DepthBudget,
    pub direction: Direction,
    pub flags: FollowFlags,
    pub format: OutputFormat,
    pub profile: Profile,
}

/// Resolve raw name/value pairs plus an optional Accept header into a query.
pub fn resolve(
    params: &[(String, String)],
    accept: Option<&str>,
) -> Result<ResolvedQuery, QueryError> {
    // Unrecognized names are aggregated alphabetically into one message.
    let mut unknown: Vec<String> = params
        .iter()
        .map(|(name, _)| name.to_uppercase())
        .filter(|name| !KNOWN_PARAMETERS.contains(&name.as_str()))
        .collect();
    if !unknown.is_empty() {
        unknown.sort();
        unknown.dedup();
        return Err(QueryError::UnknownParameters { names: unknown });
    }

    let mut ids = Vec::new();
    let mut single: Vec<(&'static str, String)> = Vec::new();
    for (name, value) in params {
        let name = name.to_uppercase();
        if name == "ID" {
            ids.push(value.clone());
            continue;
        }
        let known = *KNOWN_PARAMETERS.iter().find(|k| **k == name).expect("checked above");
        if single.iter().any(|(existing, _)| *existing == known) {
            return Err(QueryError::DuplicateParameter { name });
        }
        single.push((known, value.clone()));
    }

    if ids.is_empty() {
        return Err(QueryError::MissingId);
    }

    let get = |name: &str| single.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str());

    let depth = match get("DEPTH") {
        None => DepthBudget::Finite(1),
        Some(value) if value.eq_ignore_ascii_case("ALL") => DepthBudget::Unbounded,
        Some(value) => match value.parse::<u32>() {
            Ok(n) => DepthBudget::Finite(n),
            Err(_) => {
                return Err(QueryError::InvalidValue { name: "DEPTH", value: value.to_string() })
            }
        },
    };

    let direction = match get("DIRECTION") {
        None => Direction::Back,
        Some(value) if value.eq_ignore_ascii_case("BACK") => Direction::Back,
        Some(value) if value.eq_ignore_ascii_case("FORTH") => Direction::Forth,
        Some(value) => {
            return Err(QueryError::InvalidValue { name: "DIRECTION", value: value.to_string() })
        }
    };

    let profile = match get("MODEL") {
        None => Profile::VoProv,
        Some(value) if value.eq_ignore_ascii_case("IVOA") => Profile::VoProv,
        Some(value) if value.eq_ignore_ascii_case("W3C") => Profile::W3c,
        Some(value) => {
            return Err(QueryError::InvalidValue { name: "MODEL", value: value.to_string() })
        }
    };

    let flags = FollowFlags {
        members: parse_flag("MEMBERS", get("MEMBERS"))?,
        steps: parse_flag("STEPS", get("STEPS"))?,
        agents: parse_flag("AGENT", get("AGENT"))?,
    };

    let format = negotiate_format(get("RESPONSEFORMAT"), accept)?;

    Ok(ResolvedQuery { ids, depth, direction, flags, format, profile })
}

fn parse_flag(name: &'static str, value: Option<&str>) -> Result<bool, QueryError> {
    match value {
        None => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("TRUE") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("FALSE") || v == "0" => Ok(false),
        Some(v) => Err(QueryError::InvalidValue { name, value: v.to_string() }),
    }
}

/// Media ranges from an Accept-style header; a missing or empty header
/// accepts everything.
fn accept_ranges(accept: Option<&str>) -> Vec<String> {
    let header = accept.unwrap_or("*/*").trim();
    if header.is_empty() {
        return vec!["*/*".to_string()];
    }
    header
        .split(',')
        .map(|range| range.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .filter(|range| !range.is_empty())
        .collect()
}

fn accepts(ranges: &[String], media_type: &str) -> bool {
    let main_type = media_type.split('/').next().unwrap_or(media_type);
    ranges.iter().any(|range| {
        range == "*/*" || range == media_type || *range == format!("{main_type}/*")
    })
}

/// Negotiate the output format against the Accept header.
///
/// An explicitly requested format that the header rules out is 406; with no
/// explicit request the default (PROV-JSON) is used when acceptable,
/// otherwise the first supported format the header accepts. A header ruling
/// out every supported media type is 415, as is an unknown format value.
fn negotiate_format(
    requested: Option<&str>,
    accept: Option<&str>,
) -> Result<OutputFormat, QueryError> {
    let ranges = accept_ranges(accept);

    if !FORMATS.iter().any(|f| accepts(&ranges, f.media_type())) {
        return Err(QueryError::UnsupportedAccept {
            accept: accept.unwrap_or_default().to_string(),
        });
    }

    match requested {
        Some(value) => {
            let format = FORMATS
                .iter()
                .find(|f| f.name().eq_ignore_ascii_case(value))
                .copied()
                .ok_or_else(|| QueryError::UnsupportedFormat { format: value.to_string() })?;
            if !accepts(&ranges, format.media_type()) {
                return Err(QueryError::NotAcceptable {
                    format: format.name(),
                    accept: accept.unwrap_or_default().to_string(),
                });
            }
            Ok(format)
        }
        None => {
            let default = OutputFormat::ProvJson;
            if accepts(&ranges, default.media_type()) {
                Ok(default)
            } else {
                // Header excludes the default; fall back to whatever it takes.
                Ok(*FORMATS
                    .iter()
                    .find(|f| accepts(&ranges, f.media_type()))
                    .expect("checked above"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter().map(|(n, v)| (n.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_apply_when_only_id_given() {
        let query = resolve(&pairs(&[("ID", "ex:ent")]), None).unwrap();
        assert_eq!(query.ids, vec!["ex:ent"]);
        assert_eq!(query.depth, DepthBudget::Finite(1));
        assert_eq!(query.direction, Direction::Back);
        assert_eq!(query.format, OutputFormat::ProvJson);
        assert_eq!(query.profile, Profile::VoProv);
        assert_eq!(query.flags, FollowFlags::default());
    }

    #[test]
    fn parameter_names_are_case_insensitive() {
        let query = resolve(
            &pairs(&[("id", "ex:a"), ("ID", "ex:b"), ("depth", "ALL"), ("direction", "FORTH")]),
            None,
        )
        .unwrap();
        assert_eq!(query.ids, vec!["ex:a", "ex:b"]);
        assert_eq!(query.depth, DepthBudget::Unbounded);
        assert_eq!(query.direction, Direction::Forth);
    }

    #[test]
    fn missing_id_is_rejected() {
        let err = resolve(&pairs(&[("DEPTH", "1")]), None).unwrap_err();
        assert!(matches!(err, QueryError::MissingId));
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn duplicate_single_valued_parameter_is_rejected() {
        for name in ["DEPTH", "DIRECTION", "RESPONSEFORMAT", "MODEL", "MEMBERS", "STEPS", "AGENT"] {
            let err = resolve(
                &pairs(&[("ID", "ex:ent"), (name, "1"), (name, "2")]),
                None,
            )
            .unwrap_err();
            match err {
                QueryError::DuplicateParameter { name: reported } => assert_eq!(reported, name),
                other => panic!("expected DuplicateParameter, got {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_parameters_are_aggregated_alphabetically() {
        let err = resolve(
            &pairs(&[("ID", "ex:ent"), ("SOMETHING", "nothing"), ("ANYTHING", "null")]),
            None,
        )
        .unwrap_err();
        match err {
            QueryError::UnknownParameters { names } => {
                assert_eq!(names, vec!["ANYTHING", "SOMETHING"]);
            }
            other => panic!("expected UnknownParameters, got {other:?}"),
        }
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [("DEPTH", "deep"), ("DIRECTION", "SIDEWAYS"), ("MODEL", "DC"), ("MEMBERS", "maybe")];
        for (name, value) in cases {
            let err = resolve(&pairs(&[("ID", "ex:ent"), (name, value)]), None).unwrap_err();
            assert!(matches!(err, QueryError::InvalidValue { .. }), "{name}={value}");
        }
    }

    #[test]
    fn boolean_flags_accept_numeric_spellings() {
        let query = resolve(
            &pairs(&[("ID", "ex:ent"), ("MEMBERS", "1"), ("STEPS", "true"), ("AGENT", "FALSE")]),
            None,
        )
        .unwrap();
        assert!(query.flags.members);
        assert!(query.flags.steps);
        assert!(!query.flags.agents);
    }

    #[test]
    fn format_negotiation_matrix() {
        // Explicit format, compatible accept headers.
        for accept in [None, Some("*/*"), Some("text/*"), Some("text/plain")] {
            let query = resolve(
                &pairs(&[("ID", "ex:ent"), ("RESPONSEFORMAT", "PROV-N")]),
                accept,
            )
            .unwrap();
            assert_eq!(query.format, OutputFormat::ProvN);
        }

        // Explicit format ruled out by the header: 406.
        let err = resolve(
            &pairs(&[("ID", "ex:ent"), ("RESPONSEFORMAT", "PROV-N")]),
            Some("application/json"),
        )
        .unwrap_err();
        assert_eq!(err.http_status(), 406);

        // Unknown format value: 415.
        let err = resolve(
            &pairs(&[("ID", "ex:ent"), ("RESPONSEFORMAT", "HUBBA")]),
            None,
        )
        .unwrap_err();
        assert_eq!(err.http_status(), 415);

        // Accept header matching nothing supported: 415.
        let err = resolve(&pairs(&[("ID", "ex:ent")]), Some("image/png")).unwrap_err();
        assert_eq!(err.http_status(), 415);

        // Defaulted format bends to the header.
        let query = resolve(&pairs(&[("ID", "ex:ent")]), Some("text/plain")).unwrap();
        assert_eq!(query.format, OutputFormat::ProvN);
    }

    #[test]
    fn accept_header_ignores_quality_parameters() {
        let query = resolve(
            &pairs(&[("ID", "ex:ent"), ("RESPONSEFORMAT", "PROV-JSON")]),
            Some("text/html;q=0.9, application/json;q=0.8"),
        )
        .unwrap();
        assert_eq!(query.format, OutputFormat::ProvJson);
    }

    #[test]
    fn graph_formats_negotiate_as_json() {
        let query = resolve(
            &pairs(&[("ID", "ex:ent"), ("RESPONSEFORMAT", "GRAPH-JSON")]),
            Some("application/*"),
        )
        .unwrap();
        assert_eq!(query.format, OutputFormat::GraphJson);

        let query = resolve(
            &pairs(&[("ID", "ex:ent"), ("RESPONSEFORMAT", "GRAPH")]),
            None,
        )
        .unwrap();
        assert_eq!(query.format, OutputFormat::Graph);
    }
}
