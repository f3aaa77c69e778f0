use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::PhotoError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(PhotoError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for PhotoError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> PhotoError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.to_string();
            if let Some(field) = extract_missing_field(&message) {
                PhotoError::invalid_message(format!("missing {field}"))
            } else {
                PhotoError::invalid_message(format!("invalid push envelope: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            PhotoError::invalid_message(format!("invalid push envelope: {err}"))
        }
        JsonRejection::MissingJsonContentType(_) => PhotoError::invalid_message(
            "missing `Content-Type: application/json` header",
        ),
        _ => PhotoError::invalid_message(rejection.to_string()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_missing_field() {
        assert_eq!(
            extract_missing_field("missing field `message` at line 1 column 2"),
            Some("message")
        );
        assert_eq!(extract_missing_field("expected value"), None);
    }
}
