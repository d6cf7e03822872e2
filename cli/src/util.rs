use serde_json::json;

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn print_json(value: &serde_json::Value, to_stderr: bool) {
    let formatted =
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    if to_stderr {
        eprintln!("{formatted}");
    } else {
        println!("{formatted}");
    }
}

pub fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    print_json(&err, true);
    std::process::exit(4);
}

/// Map an HTTP status to the CLI exit code.
pub fn exit_code_for(status: u16) -> i32 {
    match status {
        200..=299 => 0,
        400..=499 => 1,
        _ => 2,
    }
}

/// Execute an API request, print the response body, return a structured exit code.
///
/// Exit codes: 0=success (2xx), 1=client error (4xx), 2=server error (5xx),
///             3=connection error, 4=usage error
pub async fn api_request(
    api_url: &str,
    method: reqwest::Method,
    path: &str,
    body: Option<serde_json::Value>,
) -> i32 {
    let url = match reqwest::Url::parse(&format!("{}{path}", api_url.trim_end_matches('/'))) {
        Ok(u) => u,
        Err(e) => {
            print_json(
                &json!({
                    "error": "cli_error",
                    "message": format!("Invalid URL: {api_url}{path}: {e}")
                }),
                true,
            );
            return 4;
        }
    };

    let mut req = client().request(method.clone(), url);
    if let Some(b) = body {
        req = req.json(&b);
    }

    tracing::debug!(%method, path, "sending request");

    let resp = match req.send().await {
        Ok(r) => r,
        Err(e) => {
            print_json(
                &json!({
                    "error": "connection_error",
                    "message": format!("{e}"),
                    "docs_hint": "Is the skill service running? Check GARDEN_API_URL."
                }),
                true,
            );
            return 3;
        }
    };

    let status = resp.status().as_u16();
    let exit_code = exit_code_for(status);
    tracing::debug!(status, "response received");

    let resp_body: serde_json::Value = match resp.json().await {
        Ok(v) => v,
        Err(e) => json!({"raw_error": format!("Failed to parse response as JSON: {e}")}),
    };

    print_json(&resp_body, exit_code != 0);
    exit_code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_status_class() {
        assert_eq!(exit_code_for(200), 0);
        assert_eq!(exit_code_for(204), 0);
        assert_eq!(exit_code_for(400), 1);
        assert_eq!(exit_code_for(403), 1);
        assert_eq!(exit_code_for(500), 2);
        assert_eq!(exit_code_for(503), 2);
    }
}
