use crate::domain::Recipient;

/// Placeholder delimiters, `{{field_name}}` style
const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Render a message template against a recipient
///
/// Substitutes `{{first_name}}`, `{{last_name}}` and `{{phone_number}}`
/// (whitespace inside the braces is tolerated) with the recipient's
/// fields. Rendering is best-effort: without a recipient the template is
/// returned verbatim, and any malformed or unknown placeholder falls
/// back to the original template rather than surfacing an error, so a
/// preview is always available.
pub fn render(template: &str, record: Option<&Recipient>) -> String {
    let Some(record) = record else {
        return template.to_string();
    };
    substitute(template, record).unwrap_or_else(|_| template.to_string())
}

/// Substitution failure, recovered by `render`
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
enum SubstituteError {
    #[error("unterminated placeholder")]
    Unterminated,
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

fn substitute(template: &str, record: &Recipient) -> Result<String, SubstituteError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(OPEN) {
        rendered.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let end = after_open
            .find(CLOSE)
            .ok_or(SubstituteError::Unterminated)?;
        let field = after_open[..end].trim();
        let value = match field {
            "first_name" => &record.first_name,
            "last_name" => &record.last_name,
            "phone_number" => &record.phone_number,
            unknown => return Err(SubstituteError::UnknownField(unknown.to_string())),
        };
        rendered.push_str(value);
        rest = &after_open[end + CLOSE.len()..];
    }
    rendered.push_str(rest);
    Ok(rendered)
}
