//! Parsing of the raw `key=value,key=value` label lists given on the command line
//! (or in the environment) into the label fragment of an exposition sample line.
use tracing::debug;
use winnow::{
    combinator::separated,
    error::ContextError,
    token::take_till,
    Parser,
};

/// A label token that could not be turned into `key="value"`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum LabelError {
    /// Holds the offending raw token
    #[display(fmt = "invalid label: {_0}")]
    Invalid(String),
}

impl std::error::Error for LabelError {}

/// Split `raw` on every `sep`, keeping empty fields.
///
/// Examples (`sep` = `,`):
/// * `a=1,b=2` -> `["a=1", "b=2"]`
/// * `a=1,,` -> `["a=1", "", ""]`
/// * `` -> `[""]`
fn fields<'i>(sep: char) -> impl Parser<&'i str, Vec<&'i str>, ContextError> {
    separated(1.., take_till(0.., sep), sep)
}

fn split(raw: &str, sep: char) -> Vec<&str> {
    // The field parser accepts any input, a failure here would be a bug in it.
    fields(sep).parse(raw).unwrap_or_else(|_| vec![raw])
}

/// Merge the labels from the environment with the ones from the command line.
/// The environment labels come first.
pub fn combine(env_labels: &str, cli_labels: &str) -> String {
    match (env_labels.is_empty(), cli_labels.is_empty()) {
        (false, false) => format!("{env_labels},{cli_labels}"),
        (false, true) => env_labels.to_owned(),
        (true, _) => cli_labels.to_owned(),
    }
}

/// Format a single `key=value` token.
///
/// A value without any `"` is quoted. A value that starts and ends with `"` is taken as
/// already quoted and kept as is. Any other `"` in the value, a `"` in the key, or a
/// token that does not hold exactly one `=` is an error.
///
/// Examples:
/// * `a=1` -> `a="1"`
/// * `a="1"` -> `a="1"`
pub fn format_label(raw: &str) -> Result<String, LabelError> {
    debug!(label = raw, "Formatting label");
    let invalid = || LabelError::Invalid(raw.to_owned());

    let parts = split(raw, '=');
    let [key, value] = parts[..] else {
        return Err(invalid());
    };
    if key.contains('"') {
        return Err(invalid());
    }
    if !value.contains('"') {
        return Ok(format!("{key}=\"{value}\""));
    }
    match value.starts_with('"') && value.ends_with('"') {
        true => Ok(format!("{key}={value}")),
        false => Err(invalid()),
    }
}

/// Format a comma separated list of `key=value` tokens, stopping at the first invalid one.
///
/// An empty `raw` gives an empty fragment. An empty token inside a non empty list
/// (`a=1,`) is an invalid label.
pub fn format_labels(raw: &str) -> Result<String, LabelError> {
    if raw.is_empty() {
        return Ok(String::new());
    }
    let formatted = split(raw, ',')
        .into_iter()
        .map(format_label)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(formatted.join(","))
}

/// Combine both label sources and format them. No labels at all gives an empty fragment.
pub fn parse_labels(env_labels: &str, cli_labels: &str) -> Result<String, LabelError> {
    let all_labels = combine(env_labels, cli_labels);
    if all_labels.is_empty() {
        return Ok(String::new());
    }
    format_labels(&all_labels)
}

#[cfg(test)]
mod tests {
    use super::{
        combine,
        format_label,
        format_labels,
        parse_labels,
        split,
        LabelError,
    };
    use crate::tests::init_test_logging;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tracing::info;

    #[test]
    fn test_split() {
        init_test_logging();

        let cases = [
            ("a=1,b=2", vec!["a=1", "b=2"]),
            ("a=1", vec!["a=1"]),
            ("", vec![""]),
            ("a=1,,", vec!["a=1", "", ""]),
            (",", vec!["", ""]),
        ];
        for (expr, expected) in cases {
            info!("Testing split of '{expr}'");
            assert_eq!(split(expr, ','), expected);
        }
        assert_eq!(split("a=1=2", '='), vec!["a", "1", "2"]);
    }

    #[rstest]
    #[case("", "", "")]
    #[case("a=1", "", "a=1")]
    #[case("", "b=2", "b=2")]
    #[case("a=1", "b=2", "a=1,b=2")]
    #[case("a=1,c=3", "b=2", "a=1,c=3,b=2")]
    fn test_combine(#[case] env: &str, #[case] cli: &str, #[case] expected: &str) {
        assert_eq!(combine(env, cli), expected);
    }

    #[test]
    fn test_format_label() {
        init_test_logging();

        let success_cases = [
            ("a=1", r#"a="1""#),
            (r#"a="1""#, r#"a="1""#),
            ("room=kitchen", r#"room="kitchen""#),
            ("a=", r#"a="""#),
            (r#"a="""#, r#"a="""#),
            ("a=some value", r#"a="some value""#),
            (r#"a="x"y""#, r#"a="x"y""#),
        ];
        for (expr, expected) in success_cases {
            info!("Testing successful expr: '{expr}'");
            assert_eq!(format_label(expr).unwrap(), expected);
        }
        let error_cases = [
            r#"a=1""#,
            r#"a="1"#,
            r#"a"=1"#,
            r#""a"="1""#,
            "a=1=2",
            "a1",
            "",
        ];
        for expr in error_cases {
            info!("Testing failure expr: '{expr}'");
            assert_eq!(
                format_label(expr),
                Err(LabelError::Invalid(expr.to_owned()))
            );
        }
    }

    #[test]
    fn test_label_error_message() {
        let err = format_label("a1").unwrap_err();
        assert_eq!(err.to_string(), "invalid label: a1");
    }

    #[test]
    fn test_format_labels() {
        init_test_logging();

        assert_eq!(format_labels("a=1,b=2").unwrap(), r#"a="1",b="2""#);
        assert_eq!(format_labels(r#"b="2",a=1"#).unwrap(), r#"b="2",a="1""#);
        assert_eq!(format_labels("single=1").unwrap(), r#"single="1""#);
        assert_eq!(format_labels(""), Ok(String::new()));
    }

    #[rstest]
    #[case("a=1,bad", "bad")]
    #[case("bad,a=1", "bad")]
    #[case("a=1,b=2=3,c", "b=2=3")]
    #[case("a=1,", "")]
    #[case(",a=1", "")]
    fn test_format_labels_first_failure(#[case] raw: &str, #[case] offending: &str) {
        init_test_logging();

        assert_eq!(
            format_labels(raw),
            Err(LabelError::Invalid(offending.to_owned()))
        );
    }

    #[test]
    fn test_parse_labels() {
        init_test_logging();

        assert_eq!(parse_labels("", "").unwrap(), "");
        assert_eq!(parse_labels("host=a", "").unwrap(), r#"host="a""#);
        assert_eq!(parse_labels("", "room=kitchen").unwrap(), r#"room="kitchen""#);
        assert_eq!(
            parse_labels("host=a", "room=kitchen").unwrap(),
            r#"host="a",room="kitchen""#
        );
        assert_eq!(
            parse_labels("host", "room=kitchen"),
            Err(LabelError::Invalid("host".to_owned()))
        );
    }
}
